//! Property tests: generated records always satisfy the form constraints.

use chrono::NaiveDate;
use demoqa_e2e::{birth_date_bounds, is_valid_email, RecordGenerator, MOBILE_LEN};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn date(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default() + chrono::Duration::days(offset)
}

proptest! {
    #[test]
    fn prop_registration_records_are_valid(seed in any::<u64>(), offset in 0i64..20_000) {
        let today = date(offset);
        let record = RecordGenerator::with_rng(StdRng::seed_from_u64(seed))
            .on(today)
            .registration();

        prop_assert!(record.violations(today).is_empty(), "{:?}", record.violations(today));
        prop_assert_eq!(record.mobile.len(), MOBILE_LEN);
        prop_assert!(is_valid_email(&record.email));

        let (earliest, latest) = birth_date_bounds(today);
        prop_assert!(record.date_of_birth >= earliest && record.date_of_birth <= latest);
        prop_assert_eq!(record.city.state(), record.state);
    }

    #[test]
    fn prop_hobbies_are_distinct_and_non_empty(seed in any::<u64>()) {
        let hobbies = RecordGenerator::with_rng(StdRng::seed_from_u64(seed)).hobbies();
        prop_assert!(!hobbies.is_empty());
        let mut sorted: Vec<_> = hobbies.iter().map(|h| h.label()).collect();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), hobbies.len());
    }

    #[test]
    fn prop_text_box_records_are_valid(seed in any::<u64>()) {
        let record = RecordGenerator::with_rng(StdRng::seed_from_u64(seed)).text_box();
        prop_assert!(record.violations().is_empty(), "{:?}", record.violations());
    }

    #[test]
    fn prop_same_seed_same_record(seed in any::<u64>()) {
        let today = date(9_000);
        let a = RecordGenerator::with_rng(StdRng::seed_from_u64(seed)).on(today).registration();
        let b = RecordGenerator::with_rng(StdRng::seed_from_u64(seed)).on(today).registration();
        prop_assert_eq!(a, b);
    }
}
