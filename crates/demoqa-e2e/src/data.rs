//! Form records and randomized test-data generation.
//!
//! Choice fields (gender, hobbies, subject, state, city) are enums with
//! exhaustive label mappings, so a new option cannot be added without every
//! lookup being updated.

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

use chrono::{Local, Months, NaiveDate};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use crate::logger::TestLogger;

/// Minimum age of a generated student, in years
pub const MIN_AGE_YEARS: u32 = 18;
/// Maximum age of a generated student, in years
pub const MAX_AGE_YEARS: u32 = 60;
/// Required length of a mobile number
pub const MOBILE_LEN: usize = 10;

/// Path of the picture uploaded by the registration form
#[must_use]
pub fn picture_asset() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets").join("cat.jpeg")
}

/// Check an email address against the shape the demo forms accept
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").ok()
        })
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

/// Gender radio options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    /// "Male"
    Male,
    /// "Female"
    Female,
    /// "Other"
    Other,
}

impl Gender {
    /// All options in page order
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Other];

    /// Label shown on the page and in the confirmation table
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

/// Hobby checkboxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hobby {
    /// "Sports"
    Sports,
    /// "Reading"
    Reading,
    /// "Music"
    Music,
}

impl Hobby {
    /// All options in page order
    pub const ALL: [Self; 3] = [Self::Sports, Self::Reading, Self::Music];

    /// Checkbox label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sports => "Sports",
            Self::Reading => "Reading",
            Self::Music => "Music",
        }
    }
}

/// Subjects offered by the autocomplete input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    /// "Maths"
    Maths,
    /// "Physics"
    Physics,
    /// "Chemistry"
    Chemistry,
    /// "Biology"
    Biology,
    /// "English"
    English,
    /// "History"
    History,
    /// "Economics"
    Economics,
    /// "Computer Science"
    ComputerScience,
}

impl Subject {
    /// All options
    pub const ALL: [Self; 8] = [
        Self::Maths,
        Self::Physics,
        Self::Chemistry,
        Self::Biology,
        Self::English,
        Self::History,
        Self::Economics,
        Self::ComputerScience,
    ];

    /// Option label in the autocomplete list and the confirmation table
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Maths => "Maths",
            Self::Physics => "Physics",
            Self::Chemistry => "Chemistry",
            Self::Biology => "Biology",
            Self::English => "English",
            Self::History => "History",
            Self::Economics => "Economics",
            Self::ComputerScience => "Computer Science",
        }
    }

    /// Text typed into the autocomplete input to surface the option
    #[must_use]
    pub fn query(self) -> &'static str {
        let label = self.label();
        &label[..label.len().min(4)]
    }
}

/// State dropdown options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// "NCR"
    Ncr,
    /// "Uttar Pradesh"
    UttarPradesh,
    /// "Haryana"
    Haryana,
    /// "Rajasthan"
    Rajasthan,
}

impl State {
    /// All options in dropdown order
    pub const ALL: [Self; 4] = [Self::Ncr, Self::UttarPradesh, Self::Haryana, Self::Rajasthan];

    /// Dropdown label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ncr => "NCR",
            Self::UttarPradesh => "Uttar Pradesh",
            Self::Haryana => "Haryana",
            Self::Rajasthan => "Rajasthan",
        }
    }

    /// Cities offered once this state is selected
    #[must_use]
    pub const fn cities(self) -> &'static [City] {
        match self {
            Self::Ncr => &[City::Delhi, City::Gurgaon, City::Noida],
            Self::UttarPradesh => &[City::Agra, City::Lucknow, City::Merrut],
            Self::Haryana => &[City::Karnal, City::Panipat],
            Self::Rajasthan => &[City::Jaipur, City::Jaiselmer],
        }
    }
}

/// City dropdown options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum City {
    /// NCR
    Delhi,
    /// NCR
    Gurgaon,
    /// NCR
    Noida,
    /// Uttar Pradesh
    Agra,
    /// Uttar Pradesh
    Lucknow,
    /// Uttar Pradesh (spelled as on the page)
    Merrut,
    /// Haryana
    Karnal,
    /// Haryana
    Panipat,
    /// Rajasthan
    Jaipur,
    /// Rajasthan (spelled as on the page)
    Jaiselmer,
}

impl City {
    /// Dropdown label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Delhi => "Delhi",
            Self::Gurgaon => "Gurgaon",
            Self::Noida => "Noida",
            Self::Agra => "Agra",
            Self::Lucknow => "Lucknow",
            Self::Merrut => "Merrut",
            Self::Karnal => "Karnal",
            Self::Panipat => "Panipat",
            Self::Jaipur => "Jaipur",
            Self::Jaiselmer => "Jaiselmer",
        }
    }

    /// State the city belongs to
    #[must_use]
    pub const fn state(self) -> State {
        match self {
            Self::Delhi | Self::Gurgaon | Self::Noida => State::Ncr,
            Self::Agra | Self::Lucknow | Self::Merrut => State::UttarPradesh,
            Self::Karnal | Self::Panipat => State::Haryana,
            Self::Jaipur | Self::Jaiselmer => State::Rajasthan,
        }
    }
}

/// Values submitted through the student registration form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Gender,
    pub mobile: String,
    pub date_of_birth: NaiveDate,
    pub subject: Subject,
    pub hobbies: Vec<Hobby>,
    pub picture: PathBuf,
    pub current_address: String,
    pub state: State,
    pub city: City,
}

impl RegistrationRecord {
    /// Full name as the confirmation table shows it
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Date typed into the date-of-birth input (`dd MMM yyyy`)
    #[must_use]
    pub fn date_input(&self) -> String {
        self.date_of_birth.format("%d %b %Y").to_string()
    }

    /// Date as the confirmation table shows it (`dd MMMM,yyyy`)
    #[must_use]
    pub fn date_output(&self) -> String {
        self.date_of_birth.format("%d %B,%Y").to_string()
    }

    /// Hobbies as the confirmation table shows them
    #[must_use]
    pub fn hobbies_output(&self) -> String {
        self.hobbies
            .iter()
            .map(|h| h.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Uploaded file name without its directory
    #[must_use]
    pub fn picture_name(&self) -> String {
        self.picture
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Constraint violations relative to `today`; empty when the record is valid
    #[must_use]
    pub fn violations(&self, today: NaiveDate) -> Vec<String> {
        let mut out = Vec::new();
        if self.first_name.trim().is_empty() {
            out.push("first name is empty".to_string());
        }
        if self.last_name.trim().is_empty() {
            out.push("last name is empty".to_string());
        }
        if !is_valid_email(&self.email) {
            out.push(format!("email {:?} is not valid", self.email));
        }
        if self.mobile.len() != MOBILE_LEN || !self.mobile.bytes().all(|b| b.is_ascii_digit()) {
            out.push(format!("mobile {:?} is not {MOBILE_LEN} digits", self.mobile));
        }
        let (earliest, latest) = birth_date_bounds(today);
        if self.date_of_birth < earliest || self.date_of_birth > latest {
            out.push(format!(
                "date of birth {} outside [{earliest}, {latest}]",
                self.date_of_birth
            ));
        }
        if self.hobbies.is_empty() {
            out.push("no hobby selected".to_string());
        }
        let mut seen = Vec::new();
        for hobby in &self.hobbies {
            if seen.contains(hobby) {
                out.push(format!("hobby {} repeated", hobby.label()));
            }
            seen.push(*hobby);
        }
        if !self.picture.is_file() {
            out.push(format!("picture {} does not exist", self.picture.display()));
        }
        if self.current_address.trim().is_empty() {
            out.push("current address is empty".to_string());
        }
        if self.city.state() != self.state {
            out.push(format!(
                "city {} is not in {}",
                self.city.label(),
                self.state.label()
            ));
        }
        out
    }
}

/// Values submitted through the text box form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBoxRecord {
    pub full_name: String,
    pub email: String,
    pub current_address: String,
    pub permanent_address: String,
}

impl TextBoxRecord {
    /// Constraint violations; empty when the record is valid
    #[must_use]
    pub fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.full_name.trim().is_empty() {
            out.push("full name is empty".to_string());
        }
        if !is_valid_email(&self.email) {
            out.push(format!("email {:?} is not valid", self.email));
        }
        if self.current_address.trim().is_empty() {
            out.push("current address is empty".to_string());
        }
        if self.permanent_address.trim().is_empty() {
            out.push("permanent address is empty".to_string());
        }
        out
    }
}

/// Inclusive birth date range for an age window of 18..=60 years
#[must_use]
pub fn birth_date_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let earliest = today
        .checked_sub_months(Months::new(MAX_AGE_YEARS * 12))
        .unwrap_or(NaiveDate::MIN);
    let latest = today
        .checked_sub_months(Months::new(MIN_AGE_YEARS * 12))
        .unwrap_or(today);
    (earliest, latest)
}

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Maya", "Liam", "Olivia", "Noah", "Emma", "Ishaan", "Sofia", "Lucas", "Amara",
    "Mateo", "Chloe", "Ravi", "Hannah", "Elena", "Kenji", "Priya", "Oscar", "Nadia", "Theo",
];

const LAST_NAMES: &[&str] = &[
    "Sharma", "Johnson", "Garcia", "Okafor", "Nguyen", "Schmidt", "Kowalski", "Rossi",
    "Tanaka", "Patel", "Fischer", "Moreau", "Silva", "Larsen", "Haddad", "Brennan",
];

const STREETS: &[&str] = &[
    "Maple Avenue", "Oak Street", "Cedar Lane", "Elm Drive", "Park Road", "Lakeview Court",
    "Hillcrest Way", "River Road", "Sunset Boulevard", "Willow Street",
];

const CITIES: &[&str] = &[
    "Springfield", "Riverton", "Fairview", "Georgetown", "Lakewood", "Brookside", "Ashford",
    "Kingsport",
];

const REGIONS: &[&str] = &[
    "California", "Texas", "Ohio", "Oregon", "Vermont", "Nevada", "Georgia", "Maine",
];

const COUNTRIES: &[&str] = &[
    "United States", "Canada", "India", "Germany", "Ireland", "Australia", "Japan", "Brazil",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "mail.test", "inbox.example.org", "demo.dev"];

fn pick<R: Rng + ?Sized>(rng: &mut R, items: &'static [&'static str]) -> &'static str {
    items.choose(rng).copied().unwrap_or_default()
}

/// Randomized record source.
///
/// Every draw goes through the wrapped RNG; the optional logger only receives
/// `debug` traces of the values produced.
#[derive(Debug)]
pub struct RecordGenerator<'l, R> {
    rng: R,
    today: NaiveDate,
    logger: Option<&'l TestLogger>,
}

impl RecordGenerator<'static, ThreadRng> {
    /// Generator over the thread RNG, dated today
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl Default for RecordGenerator<'static, ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'l, R: Rng> RecordGenerator<'l, R> {
    /// Generator over a caller-provided RNG (e.g. a seeded `StdRng`)
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            today: Local::now().date_naive(),
            logger: None,
        }
    }

    /// Fix the reference date used for the age window
    #[must_use]
    pub const fn on(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Trace generated values to a test logger
    #[must_use]
    pub fn with_logger<'m>(self, logger: &'m TestLogger) -> RecordGenerator<'m, R> {
        RecordGenerator {
            rng: self.rng,
            today: self.today,
            logger: Some(logger),
        }
    }

    /// Reference date
    #[must_use]
    pub const fn today(&self) -> NaiveDate {
        self.today
    }

    fn trace(&self, message: impl FnOnce() -> String) {
        if let Some(logger) = self.logger {
            logger.debug(message());
        }
    }

    /// Random person name pair
    pub fn name(&mut self) -> (String, String) {
        (
            pick(&mut self.rng, FIRST_NAMES).to_string(),
            pick(&mut self.rng, LAST_NAMES).to_string(),
        )
    }

    /// Email derived from a name, always in the accepted shape
    pub fn email(&mut self, first: &str, last: &str) -> String {
        let n: u16 = self.rng.gen_range(1..1000);
        let domain = pick(&mut self.rng, EMAIL_DOMAINS);
        format!("{}.{}{n}@{domain}", first.to_lowercase(), last.to_lowercase())
    }

    /// `street, city, region zip, country`
    pub fn address(&mut self) -> String {
        let number: u16 = self.rng.gen_range(1..9999);
        let street = pick(&mut self.rng, STREETS);
        let city = pick(&mut self.rng, CITIES);
        let region = pick(&mut self.rng, REGIONS);
        let zip: u32 = self.rng.gen_range(10_000..100_000);
        let country = pick(&mut self.rng, COUNTRIES);
        format!("{number} {street}, {city}, {region} {zip}, {country}")
    }

    /// Ten random digits
    pub fn mobile(&mut self) -> String {
        (0..MOBILE_LEN)
            .map(|_| char::from(b'0' + self.rng.gen_range(0..10u8)))
            .collect()
    }

    /// Birth date uniformly inside the 18..=60 year age window
    pub fn date_of_birth(&mut self) -> NaiveDate {
        let (earliest, latest) = birth_date_bounds(self.today);
        let span = (latest - earliest).num_days();
        earliest + chrono::Duration::days(self.rng.gen_range(0..=span))
    }

    /// Non-empty set of distinct hobbies in random order
    pub fn hobbies(&mut self) -> Vec<Hobby> {
        let mut all = Hobby::ALL.to_vec();
        all.shuffle(&mut self.rng);
        let count = self.rng.gen_range(1..=all.len());
        all.truncate(count);
        all
    }

    /// A registration record satisfying every form constraint
    pub fn registration(&mut self) -> RegistrationRecord {
        let (first_name, last_name) = self.name();
        let email = self.email(&first_name, &last_name);
        let gender = *Gender::ALL.choose(&mut self.rng).unwrap_or(&Gender::Other);
        let mobile = self.mobile();
        let date_of_birth = self.date_of_birth();
        let subject = *Subject::ALL.choose(&mut self.rng).unwrap_or(&Subject::Chemistry);
        let hobbies = self.hobbies();
        let current_address = self.address();
        let state = *State::ALL.choose(&mut self.rng).unwrap_or(&State::Ncr);
        let city = *state.cities().choose(&mut self.rng).unwrap_or(&City::Delhi);

        let record = RegistrationRecord {
            first_name,
            last_name,
            email,
            gender,
            mobile,
            date_of_birth,
            subject,
            hobbies,
            picture: picture_asset(),
            current_address,
            state,
            city,
        };
        self.trace(|| format!("Generated registration record: {record:?}"));
        record
    }

    /// A text box record whose permanent address equals the current one
    pub fn text_box(&mut self) -> TextBoxRecord {
        let (first, last) = self.name();
        let email = self.email(&first, &last);
        let address = self.address();
        let record = TextBoxRecord {
            full_name: format!("{first} {last}"),
            email,
            permanent_address: address.clone(),
            current_address: address,
        };
        self.trace(|| format!("Generated text box record: {record:?}"));
        record
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod choice_tests {
        use super::*;

        #[test]
        fn test_gender_labels_are_capitalized() {
            assert_eq!(Gender::Female.label(), "Female");
            assert_eq!(Gender::Female.to_string(), "female");
        }

        #[test]
        fn test_every_city_listed_under_its_state() {
            for state in State::ALL {
                for city in state.cities() {
                    assert_eq!(city.state(), state);
                }
            }
        }

        #[test]
        fn test_subject_query_is_prefix() {
            for subject in Subject::ALL {
                assert!(subject.label().starts_with(subject.query()));
            }
            assert_eq!(Subject::Chemistry.query(), "Chem");
        }
    }

    mod email_tests {
        use super::*;

        #[test]
        fn test_valid_emails() {
            assert!(is_valid_email("maya.rossi42@example.com"));
            assert!(is_valid_email("a+b@inbox.example.org"));
        }

        #[test]
        fn test_invalid_emails() {
            assert!(!is_valid_email("plainaddress"));
            assert!(!is_valid_email("no-domain@"));
            assert!(!is_valid_email("a@b"));
            assert!(!is_valid_email("spaces in@example.com"));
        }
    }

    mod generator_tests {
        use super::*;
        use crate::logger::{memory_logger, TestPath};

        #[test]
        fn test_birth_date_bounds() {
            let (earliest, latest) = birth_date_bounds(day(2026, 10, 17));
            assert_eq!(earliest, day(1966, 10, 17));
            assert_eq!(latest, day(2008, 10, 17));
        }

        #[test]
        fn test_birth_date_bounds_leap_day() {
            let (earliest, latest) = birth_date_bounds(day(2024, 2, 29));
            assert_eq!(earliest, day(1964, 2, 29));
            assert_eq!(latest, day(2006, 2, 28));
        }

        #[test]
        fn test_registration_record_is_valid() {
            let mut gen = RecordGenerator::with_rng(StdRng::seed_from_u64(7)).on(day(2026, 10, 17));
            let record = gen.registration();
            assert!(record.violations(gen.today()).is_empty(), "{record:?}");
        }

        #[test]
        fn test_text_box_addresses_identical() {
            let record = RecordGenerator::with_rng(StdRng::seed_from_u64(3)).text_box();
            assert_eq!(record.current_address, record.permanent_address);
            assert!(record.violations().is_empty());
        }

        #[test]
        fn test_same_seed_same_record() {
            let a = RecordGenerator::with_rng(StdRng::seed_from_u64(11)).on(day(2026, 1, 1)).registration();
            let b = RecordGenerator::with_rng(StdRng::seed_from_u64(11)).on(day(2026, 1, 1)).registration();
            assert_eq!(a, b);
        }

        #[test]
        fn test_logger_does_not_change_values() {
            let (logger, out) =
                memory_logger(TestPath::new("data.rs", "Data Generator", "trace"));
            let mut plain =
                RecordGenerator::with_rng(StdRng::seed_from_u64(29)).on(day(2026, 1, 1));
            let mut traced = RecordGenerator::with_rng(StdRng::seed_from_u64(29))
                .on(day(2026, 1, 1))
                .with_logger(&logger);

            assert_eq!(plain.registration(), traced.registration());
            assert_eq!(plain.text_box(), traced.text_box());

            let log = out.contents();
            assert!(log.contains("[DEBUG] [Data Generator > trace]: Generated registration record"));
            assert!(log.contains("Generated text box record"));
        }

        #[test]
        fn test_mobile_is_ten_digits() {
            let mobile = RecordGenerator::with_rng(StdRng::seed_from_u64(1)).mobile();
            assert_eq!(mobile.len(), MOBILE_LEN);
            assert!(mobile.chars().all(|c| c.is_ascii_digit()));
        }
    }

    mod record_tests {
        use super::*;

        fn sample() -> RegistrationRecord {
            RegistrationRecord {
                first_name: "Maya".into(),
                last_name: "Rossi".into(),
                email: "maya.rossi@example.com".into(),
                gender: Gender::Female,
                mobile: "1234567890".into(),
                date_of_birth: day(1990, 3, 5),
                subject: Subject::Chemistry,
                hobbies: vec![Hobby::Music, Hobby::Reading],
                picture: picture_asset(),
                current_address: "1 Oak Street".into(),
                state: State::Ncr,
                city: City::Delhi,
            }
        }

        #[test]
        fn test_output_transforms() {
            let record = sample();
            assert_eq!(record.full_name(), "Maya Rossi");
            assert_eq!(record.date_input(), "05 Mar 1990");
            assert_eq!(record.date_output(), "05 March,1990");
            assert_eq!(record.hobbies_output(), "Music, Reading");
            assert_eq!(record.picture_name(), "cat.jpeg");
        }

        #[test]
        fn test_violations_reported() {
            let mut record = sample();
            record.mobile = "12345".into();
            record.city = City::Jaipur;
            record.hobbies = vec![Hobby::Music, Hobby::Music];
            let violations = record.violations(day(2026, 10, 17));
            assert_eq!(violations.len(), 3, "{violations:?}");
        }

        #[test]
        fn test_too_young_rejected() {
            let mut record = sample();
            record.date_of_birth = day(2010, 1, 1);
            assert_eq!(record.violations(day(2026, 10, 17)).len(), 1);
        }
    }
}
