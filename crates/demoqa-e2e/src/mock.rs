//! In-process page double.
//!
//! [`MockPage`] implements [`Page`] over a keyed element table ([`MockDom`]).
//! A [`MockSite`] reacts to navigation, fills and clicks the way a real site
//! would; [`DemoQaSite`] simulates the two demo forms closely enough to run
//! every scenario without a browser. The DOM only changes in response to the
//! test's own actions, so waits resolve (or time out) immediately instead of
//! sleeping.
//!
//! ```rust,ignore
//! let page = MockPage::demoqa();
//! let handle = page.handle();
//! run_scenario(&page).await?;
//! assert!(handle.is_closed());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::browser::Page;
use crate::data::{is_valid_email, City, Gender, Hobby, State, Subject, MOBILE_LEN};
use crate::locator::{Locator, Selector};
use crate::pages::{registration, text_box};
use crate::result::{FormError, FormResult};

/// Smallest valid PNG (1x1, transparent), returned by mock screenshots
pub const MOCK_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

/// A simulated element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    /// Text content
    pub text: String,
    /// Input value
    pub value: String,
    /// Rendered and visible
    pub visible: bool,
    /// Accepts input
    pub enabled: bool,
    /// Number of elements the selector matches
    pub count: usize,
    /// Files attached to a file input
    pub files: Vec<PathBuf>,
}

impl MockElement {
    /// Visible element with static text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: String::new(),
            visible: true,
            enabled: true,
            count: 1,
            files: Vec::new(),
        }
    }

    /// Empty, editable input
    #[must_use]
    pub fn input() -> Self {
        Self::text("")
    }

    /// Start hidden
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Start disabled
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Make the selector match `count` elements
    #[must_use]
    pub fn duplicated(mut self, count: usize) -> Self {
        self.count = count;
        self
    }
}

/// Element table plus scratch memory for the simulated site
#[derive(Debug, Default)]
pub struct MockDom {
    elements: HashMap<Selector, MockElement>,
    memory: HashMap<&'static str, String>,
}

impl MockDom {
    /// Add or replace an element
    pub fn insert(&mut self, locator: &Locator, element: MockElement) {
        self.elements.insert(locator.selector().clone(), element);
    }

    /// Remove an element
    pub fn remove(&mut self, locator: &Locator) -> Option<MockElement> {
        self.elements.remove(locator.selector())
    }

    /// Look up an element
    #[must_use]
    pub fn get(&self, locator: &Locator) -> Option<&MockElement> {
        self.elements.get(locator.selector())
    }

    /// Look up an element mutably
    pub fn get_mut(&mut self, locator: &Locator) -> Option<&mut MockElement> {
        self.elements.get_mut(locator.selector())
    }

    /// Current input value, empty if the element is absent
    #[must_use]
    pub fn value(&self, locator: &Locator) -> String {
        self.get(locator).map(|e| e.value.clone()).unwrap_or_default()
    }

    /// Show or hide an element if present
    pub fn set_visible(&mut self, locator: &Locator, visible: bool) {
        if let Some(element) = self.get_mut(locator) {
            element.visible = visible;
        }
    }

    /// Enable or disable an element if present
    pub fn set_enabled(&mut self, locator: &Locator, enabled: bool) {
        if let Some(element) = self.get_mut(locator) {
            element.enabled = enabled;
        }
    }

    /// Replace the text of an element if present
    pub fn set_text(&mut self, locator: &Locator, text: impl Into<String>) {
        if let Some(element) = self.get_mut(locator) {
            element.text = text.into();
        }
    }

    /// Number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True when no element exists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Drop every element and all memory
    pub fn clear(&mut self) {
        self.elements.clear();
        self.memory.clear();
    }

    /// Store a site-level value
    pub fn remember(&mut self, key: &'static str, value: impl Into<String>) {
        self.memory.insert(key, value.into());
    }

    /// Read a site-level value
    #[must_use]
    pub fn recall(&self, key: &'static str) -> Option<&str> {
        self.memory.get(key).map(String::as_str)
    }

    /// Remove a site-level value
    pub fn forget(&mut self, key: &'static str) -> Option<String> {
        self.memory.remove(key)
    }
}

/// Behavior of a simulated site
pub trait MockSite: Send + Sync + fmt::Debug {
    /// Populate the DOM for a freshly loaded URL
    fn load(&self, url: &str, dom: &mut MockDom);

    /// React to a completed fill
    fn on_fill(&self, _locator: &Locator, _value: &str, _dom: &mut MockDom) {}

    /// React to a completed click
    fn on_click(&self, _locator: &Locator, _dom: &mut MockDom) {}
}

/// A site that loads empty pages; tests populate the DOM through [`MockHandle`]
#[derive(Debug, Default, Clone, Copy)]
pub struct BlankSite;

impl MockSite for BlankSite {
    fn load(&self, _url: &str, _dom: &mut MockDom) {}
}

/// Recorded page interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAction {
    /// Navigation
    Goto(String),
    /// Fill of an input
    Fill {
        /// Locator description
        locator: String,
        /// Value typed
        value: String,
    },
    /// Click
    Click(String),
    /// File upload
    Upload {
        /// Locator description
        locator: String,
        /// Uploaded file
        path: PathBuf,
    },
    /// Screenshot capture
    Screenshot,
    /// Page release
    Close,
}

#[derive(Debug, Default)]
struct MockState {
    url: String,
    dom: MockDom,
    actions: Vec<MockAction>,
    closed: bool,
    screenshots: usize,
    fail_screenshot: bool,
    panic_on_screenshot: bool,
    fail_close: bool,
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared view of a [`MockPage`]'s state, usable after the page moved into a fixture
#[derive(Debug, Clone)]
pub struct MockHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockHandle {
    /// Whether `close` succeeded
    #[must_use]
    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }

    /// Number of screenshots taken
    #[must_use]
    pub fn screenshot_count(&self) -> usize {
        lock(&self.state).screenshots
    }

    /// Recorded interactions in order
    #[must_use]
    pub fn actions(&self) -> Vec<MockAction> {
        lock(&self.state).actions.clone()
    }

    /// Last navigated URL
    #[must_use]
    pub fn url(&self) -> String {
        lock(&self.state).url.clone()
    }

    /// Make screenshots fail
    pub fn fail_screenshots(&self, fail: bool) {
        lock(&self.state).fail_screenshot = fail;
    }

    /// Make screenshots panic
    pub fn panic_on_screenshot(&self, panic: bool) {
        lock(&self.state).panic_on_screenshot = panic;
    }

    /// Make `close` fail
    pub fn fail_close(&self, fail: bool) {
        lock(&self.state).fail_close = fail;
    }

    /// Run a closure against the DOM
    pub fn with_dom<R>(&self, f: impl FnOnce(&mut MockDom) -> R) -> R {
        f(&mut lock(&self.state).dom)
    }

    /// Text of an element, if present
    #[must_use]
    pub fn text_of(&self, locator: &Locator) -> Option<String> {
        self.with_dom(|dom| dom.get(locator).map(|e| e.text.clone()))
    }

    /// Value of an input, if present
    #[must_use]
    pub fn value_of(&self, locator: &Locator) -> Option<String> {
        self.with_dom(|dom| dom.get(locator).map(|e| e.value.clone()))
    }
}

/// A scripted [`Page`]
pub struct MockPage {
    state: Arc<Mutex<MockState>>,
    site: Arc<dyn MockSite>,
}

impl fmt::Debug for MockPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockPage")
            .field("url", &lock(&self.state).url)
            .field("site", &self.site)
            .finish()
    }
}

impl Default for MockPage {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Need {
    Attached,
    Actionable,
}

impl MockPage {
    /// Page over [`BlankSite`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_site(BlankSite)
    }

    /// Page over a custom site
    #[must_use]
    pub fn with_site(site: impl MockSite + 'static) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                url: String::from("about:blank"),
                ..MockState::default()
            })),
            site: Arc::new(site),
        }
    }

    /// Page over the simulated demo forms at the default base URL
    #[must_use]
    pub fn demoqa() -> Self {
        Self::with_site(DemoQaSite::default())
    }

    /// Inspection handle sharing this page's state
    #[must_use]
    pub fn handle(&self) -> MockHandle {
        MockHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn open(&self) -> FormResult<MutexGuard<'_, MockState>> {
        let state = lock(&self.state);
        if state.closed {
            return Err(FormError::PageClosed);
        }
        Ok(state)
    }

    fn resolve<'d>(
        dom: &'d mut MockDom,
        locator: &Locator,
        need: Need,
    ) -> FormResult<&'d mut MockElement> {
        let element = dom
            .get_mut(locator)
            .ok_or_else(|| FormError::ElementNotFound {
                locator: locator.to_string(),
            })?;

        if element.count > 1 && locator.options().strict {
            return Err(FormError::AmbiguousLocator {
                locator: locator.to_string(),
                count: element.count,
            });
        }
        if need == Need::Actionable {
            let problem = if !element.visible {
                Some("element is not visible")
            } else if !element.enabled {
                Some("element is disabled")
            } else {
                None
            };
            if let Some(message) = problem {
                return Err(FormError::ElementNotInteractable {
                    locator: locator.to_string(),
                    message: message.to_string(),
                });
            }
        }
        Ok(element)
    }
}

#[async_trait]
impl Page for MockPage {
    async fn goto(&self, url: &str) -> FormResult<()> {
        let mut state = self.open()?;
        state.actions.push(MockAction::Goto(url.to_string()));
        state.url = url.to_string();
        state.dom.clear();
        self.site.load(url, &mut state.dom);
        Ok(())
    }

    async fn wait_for(&self, locator: &Locator, timeout: Duration) -> FormResult<()> {
        let mut state = self.open()?;
        match Self::resolve(&mut state.dom, locator, Need::Attached) {
            Ok(element) if element.visible => Ok(()),
            Err(e @ FormError::AmbiguousLocator { .. }) => Err(e),
            _ => Err(FormError::Timeout {
                locator: locator.to_string(),
                ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn fill(&self, locator: &Locator, value: &str) -> FormResult<()> {
        let mut state = self.open()?;
        Self::resolve(&mut state.dom, locator, Need::Actionable)?.value = value.to_string();
        state.actions.push(MockAction::Fill {
            locator: locator.to_string(),
            value: value.to_string(),
        });
        self.site.on_fill(locator, value, &mut state.dom);
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> FormResult<()> {
        let mut state = self.open()?;
        Self::resolve(&mut state.dom, locator, Need::Actionable)?;
        state.actions.push(MockAction::Click(locator.to_string()));
        self.site.on_click(locator, &mut state.dom);
        Ok(())
    }

    async fn set_input_files(&self, locator: &Locator, path: &Path) -> FormResult<()> {
        std::fs::metadata(path)?;
        let mut state = self.open()?;
        Self::resolve(&mut state.dom, locator, Need::Attached)?.files = vec![path.to_path_buf()];
        state.actions.push(MockAction::Upload {
            locator: locator.to_string(),
            path: path.to_path_buf(),
        });
        Ok(())
    }

    async fn text_content(&self, locator: &Locator) -> FormResult<String> {
        let mut state = self.open()?;
        Ok(Self::resolve(&mut state.dom, locator, Need::Attached)?.text.clone())
    }

    async fn screenshot(&self, _full_page: bool) -> FormResult<Vec<u8>> {
        let mut state = self.open()?;
        if state.panic_on_screenshot {
            drop(state);
            panic!("screenshot backend crashed");
        }
        if state.fail_screenshot {
            return Err(FormError::Screenshot {
                message: "capture failed".to_string(),
            });
        }
        state.screenshots += 1;
        state.actions.push(MockAction::Screenshot);
        Ok(MOCK_PNG.to_vec())
    }

    async fn close(&self) -> FormResult<()> {
        let mut state = lock(&self.state);
        if state.fail_close {
            return Err(FormError::page("target crashed while closing"));
        }
        state.closed = true;
        state.actions.push(MockAction::Close);
        Ok(())
    }

    fn current_url(&self) -> String {
        lock(&self.state).url.clone()
    }

    fn default_timeout(&self) -> Duration {
        Duration::ZERO
    }
}

fn same(locator: &Locator, other: &Locator) -> bool {
    locator.selector() == other.selector()
}

const PENDING_DOB: &str = "pending_dob";
const DOB: &str = "dob";
const GENDER: &str = "gender";
const SUBJECTS: &str = "subjects";
const HOBBIES: &str = "hobbies";
const STATE: &str = "state";
const CITY: &str = "city";

/// Simulation of the DemoQA registration and text box forms.
///
/// Mirrors the behaviors the page objects rely on: the date picker commits
/// a typed date when the selected day is clicked, the subject autocomplete
/// lists matching options, the city dropdown unlocks once a state is chosen,
/// and submission validates required fields before rendering the output.
#[derive(Debug, Clone)]
pub struct DemoQaSite {
    today: NaiveDate,
}

impl Default for DemoQaSite {
    fn default() -> Self {
        Self {
            today: chrono::Local::now().date_naive(),
        }
    }
}

impl DemoQaSite {
    /// Site whose date picker starts at `today`
    #[must_use]
    pub const fn on(today: NaiveDate) -> Self {
        Self { today }
    }

    fn path_of(url: &str) -> &str {
        let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
        let path = rest.find('/').map_or("", |i| &rest[i..]);
        path.split(['?', '#']).next().unwrap_or_default().trim_end_matches('/')
    }

    fn load_registration(&self, dom: &mut MockDom) {
        use registration::locators as l;

        dom.insert(&l::heading(), MockElement::text("Student Registration Form"));
        for input in [
            l::first_name(),
            l::last_name(),
            l::email(),
            l::mobile(),
            l::subject_input(),
            l::current_address(),
            l::picture(),
        ] {
            dom.insert(&input, MockElement::input());
        }
        for gender in Gender::ALL {
            dom.insert(&l::gender(gender), MockElement::text(gender.label()));
        }
        for hobby in Hobby::ALL {
            dom.insert(&l::hobby(hobby), MockElement::text(hobby.label()));
        }

        let mut dob = MockElement::input();
        dob.value = self.today.format("%d %b %Y").to_string();
        dom.insert(&l::date_of_birth(), dob);
        dom.remember(DOB, self.today.format("%Y-%m-%d").to_string());

        dom.insert(&l::state_dropdown(), MockElement::text("Select State"));
        dom.insert(&l::city_dropdown(), MockElement::text("Select City").disabled());
        dom.insert(&l::submit(), MockElement::text("Submit"));
    }

    fn load_text_box(dom: &mut MockDom) {
        use text_box::locators as l;

        for input in [
            l::full_name(),
            l::email(),
            l::current_address(),
            l::permanent_address(),
        ] {
            dom.insert(&input, MockElement::input());
        }
        dom.insert(&l::submit(), MockElement::text("Submit"));
    }

    fn registration_fill(locator: &Locator, value: &str, dom: &mut MockDom) {
        use registration::locators as l;

        if same(locator, &l::date_of_birth()) {
            if let Ok(date) = NaiveDate::parse_from_str(value, "%d %b %Y") {
                dom.remember(PENDING_DOB, date.format("%Y-%m-%d").to_string());
                dom.insert(
                    &l::selected_day(),
                    MockElement::text(date.format("%-d").to_string()),
                );
            }
        } else if same(locator, &l::subject_input()) {
            let query = value.to_lowercase();
            for subject in Subject::ALL {
                let option = l::subject_option(subject);
                if !query.is_empty() && subject.label().to_lowercase().contains(&query) {
                    dom.insert(&option, MockElement::text(subject.label()));
                } else {
                    dom.remove(&option);
                }
            }
        }
    }

    fn registration_click(locator: &Locator, dom: &mut MockDom) {
        use registration::locators as l;

        if same(locator, &l::selected_day()) {
            if let Some(pending) = dom.forget(PENDING_DOB) {
                if let Ok(date) = NaiveDate::parse_from_str(&pending, "%Y-%m-%d") {
                    if let Some(input) = dom.get_mut(&l::date_of_birth()) {
                        input.value = date.format("%d %b %Y").to_string();
                    }
                }
                dom.remember(DOB, pending);
            }
            dom.remove(&l::selected_day());
            return;
        }

        if same(locator, &l::submit()) {
            Self::registration_submit(dom);
            return;
        }

        if same(locator, &l::state_dropdown()) {
            for state in State::ALL {
                dom.insert(&l::state_option(state), MockElement::text(state.label()));
            }
            return;
        }

        if same(locator, &l::city_dropdown()) {
            let chosen = dom.recall(STATE).map(str::to_string);
            if let Some(state) = State::ALL.into_iter().find(|s| Some(s.label()) == chosen.as_deref()) {
                for city in state.cities() {
                    dom.insert(&l::city_option(*city), MockElement::text(city.label()));
                }
            }
            return;
        }

        if let Some(gender) = Gender::ALL.into_iter().find(|g| same(locator, &l::gender(*g))) {
            dom.remember(GENDER, gender.label());
            return;
        }

        if let Some(hobby) = Hobby::ALL.into_iter().find(|h| same(locator, &l::hobby(*h))) {
            let mut checked: Vec<String> = dom
                .recall(HOBBIES)
                .map(|s| s.split(", ").filter(|h| !h.is_empty()).map(str::to_string).collect())
                .unwrap_or_default();
            if let Some(pos) = checked.iter().position(|h| h == hobby.label()) {
                checked.remove(pos);
            } else {
                checked.push(hobby.label().to_string());
            }
            dom.remember(HOBBIES, checked.join(", "));
            return;
        }

        if let Some(subject) = Subject::ALL.into_iter().find(|s| same(locator, &l::subject_option(*s))) {
            let mut subjects: Vec<String> = dom
                .recall(SUBJECTS)
                .map(|s| s.split(", ").filter(|s| !s.is_empty()).map(str::to_string).collect())
                .unwrap_or_default();
            if !subjects.iter().any(|s| s == subject.label()) {
                subjects.push(subject.label().to_string());
            }
            dom.remember(SUBJECTS, subjects.join(", "));
            for option in Subject::ALL {
                dom.remove(&l::subject_option(option));
            }
            if let Some(input) = dom.get_mut(&l::subject_input()) {
                input.value.clear();
            }
            return;
        }

        if let Some(state) = State::ALL.into_iter().find(|s| same(locator, &l::state_option(*s))) {
            dom.remember(STATE, state.label());
            dom.forget(CITY);
            dom.set_text(&l::state_dropdown(), state.label());
            dom.set_text(&l::city_dropdown(), "Select City");
            dom.set_enabled(&l::city_dropdown(), true);
            for option in State::ALL {
                dom.remove(&l::state_option(option));
            }
            return;
        }

        let cities = State::ALL.iter().flat_map(|s| s.cities().iter().copied());
        if let Some(city) = cities.clone().find(|c: &City| same(locator, &l::city_option(*c))) {
            dom.remember(CITY, city.label());
            dom.set_text(&l::city_dropdown(), city.label());
            for option in cities {
                dom.remove(&l::city_option(option));
            }
        }
    }

    fn registration_submit(dom: &mut MockDom) {
        use registration::locators as l;

        let first = dom.value(&l::first_name());
        let last = dom.value(&l::last_name());
        let email = dom.value(&l::email());
        let mobile = dom.value(&l::mobile());
        let gender = dom.recall(GENDER).unwrap_or_default().to_string();

        let valid = !first.is_empty()
            && !last.is_empty()
            && !gender.is_empty()
            && mobile.len() == MOBILE_LEN
            && mobile.bytes().all(|b| b.is_ascii_digit())
            && (email.is_empty() || is_valid_email(&email));
        if !valid {
            return;
        }

        let dob = dom
            .recall(DOB)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|d| d.format("%d %B,%Y").to_string())
            .unwrap_or_default();
        let picture = dom
            .get(&l::picture())
            .and_then(|e| e.files.first())
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let state_and_city = match (dom.recall(STATE), dom.recall(CITY)) {
            (Some(state), Some(city)) => format!("{state} {city}"),
            (Some(state), None) => state.to_string(),
            _ => String::new(),
        };

        let rows = [
            (registration::STUDENT_NAME, format!("{first} {last}")),
            (registration::STUDENT_EMAIL, email),
            (registration::GENDER, gender),
            (registration::MOBILE, mobile),
            (registration::DATE_OF_BIRTH, dob),
            (registration::SUBJECTS, dom.recall(SUBJECTS).unwrap_or_default().to_string()),
            (registration::HOBBIES, dom.recall(HOBBIES).unwrap_or_default().to_string()),
            (registration::PICTURE, picture),
            (registration::ADDRESS, dom.value(&l::current_address())),
            (registration::STATE_AND_CITY, state_and_city),
        ];

        dom.insert(&l::confirmation(), MockElement::text("Thanks for submitting the form"));
        for (label, value) in rows {
            dom.insert(&l::table_value(label), MockElement::text(value));
        }
    }

    fn text_box_submit(dom: &mut MockDom) {
        use text_box::locators as l;

        let email = dom.value(&l::email());
        if !email.is_empty() && !is_valid_email(&email) {
            return;
        }

        let outputs = [
            (l::name_output(), "Name:", dom.value(&l::full_name())),
            (l::email_output(), "Email:", email),
            (l::current_address_output(), "Current Address :", dom.value(&l::current_address())),
            (
                l::permanent_address_output(),
                "Permananet Address :",
                dom.value(&l::permanent_address()),
            ),
        ];
        for (locator, prefix, value) in outputs {
            if value.is_empty() {
                dom.remove(&locator);
            } else {
                dom.insert(&locator, MockElement::text(format!("{prefix}{value}")));
            }
        }
    }
}

impl MockSite for DemoQaSite {
    fn load(&self, url: &str, dom: &mut MockDom) {
        match Self::path_of(url) {
            registration::PATH => self.load_registration(dom),
            text_box::PATH => Self::load_text_box(dom),
            _ => {}
        }
    }

    fn on_fill(&self, locator: &Locator, value: &str, dom: &mut MockDom) {
        if dom.get(&registration::locators::heading()).is_some() {
            Self::registration_fill(locator, value, dom);
        }
    }

    fn on_click(&self, locator: &Locator, dom: &mut MockDom) {
        if dom.get(&registration::locators::heading()).is_some() {
            Self::registration_click(locator, dom);
        } else if same(locator, &text_box::locators::submit()) {
            Self::text_box_submit(dom);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod page_tests {
        use super::*;

        #[tokio::test]
        async fn test_missing_element_not_found() {
            let page = MockPage::new();
            let err = page.click(&Locator::new("#nope")).await.unwrap_err();
            assert!(matches!(err, FormError::ElementNotFound { .. }));
        }

        #[tokio::test]
        async fn test_duplicate_element_ambiguous() {
            let page = MockPage::new();
            let locator = Locator::text("Sports");
            page.handle()
                .with_dom(|dom| dom.insert(&locator, MockElement::text("Sports").duplicated(2)));

            let err = page.click(&locator).await.unwrap_err();
            assert!(matches!(err, FormError::AmbiguousLocator { count: 2, .. }));
            assert!(page.click(&locator.with_strict(false)).await.is_ok());
        }

        #[tokio::test]
        async fn test_disabled_not_interactable() {
            let page = MockPage::new();
            let locator = Locator::new("#city");
            page.handle()
                .with_dom(|dom| dom.insert(&locator, MockElement::input().disabled()));
            let err = page.fill(&locator, "x").await.unwrap_err();
            assert!(matches!(err, FormError::ElementNotInteractable { .. }));
        }

        #[tokio::test]
        async fn test_wait_for_hidden_times_out() {
            let page = MockPage::new();
            let locator = Locator::new("#modal");
            page.handle()
                .with_dom(|dom| dom.insert(&locator, MockElement::text("hi").hidden()));
            let err = page.wait_for(&locator, Duration::from_millis(250)).await.unwrap_err();
            assert!(matches!(err, FormError::Timeout { ms: 250, .. }));
        }

        #[tokio::test]
        async fn test_closed_page_rejects_actions() {
            let page = MockPage::new();
            page.close().await.unwrap();
            assert!(page.handle().is_closed());
            assert!(matches!(page.goto("https://x").await, Err(FormError::PageClosed)));
            assert!(matches!(page.screenshot(true).await, Err(FormError::PageClosed)));
        }

        #[tokio::test]
        async fn test_screenshot_is_png() {
            let page = MockPage::new();
            let bytes = page.screenshot(true).await.unwrap();
            assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
            assert_eq!(page.handle().screenshot_count(), 1);
        }

        #[tokio::test]
        async fn test_upload_missing_file_is_io_error() {
            let page = MockPage::new();
            let locator = Locator::new("#uploadPicture");
            page.handle().with_dom(|dom| dom.insert(&locator, MockElement::input()));
            let err = page
                .set_input_files(&locator, Path::new("/definitely/not/here.png"))
                .await
                .unwrap_err();
            assert!(matches!(err, FormError::Io(_)));
        }
    }

    mod site_tests {
        use super::*;

        #[test]
        fn test_path_of() {
            assert_eq!(DemoQaSite::path_of("https://demoqa.com/text-box"), "/text-box");
            assert_eq!(DemoQaSite::path_of("http://localhost:8080/text-box/?a=1"), "/text-box");
            assert_eq!(DemoQaSite::path_of("https://demoqa.com"), "");
        }

        #[tokio::test]
        async fn test_unknown_path_loads_empty() {
            let page = MockPage::demoqa();
            page.goto("https://demoqa.com/nowhere").await.unwrap();
            assert!(page.handle().with_dom(|dom| dom.is_empty()));
        }

        #[tokio::test]
        async fn test_city_locked_until_state_chosen() {
            use registration::locators as l;

            let page = MockPage::demoqa();
            page.goto("https://demoqa.com/automation-practice-form").await.unwrap();
            assert!(page.click(&l::city_dropdown()).await.is_err());

            page.click(&l::state_dropdown()).await.unwrap();
            page.click(&l::state_option(State::Haryana)).await.unwrap();
            page.click(&l::city_dropdown()).await.unwrap();
            assert!(page.click(&l::city_option(City::Delhi)).await.is_err());
            page.click(&l::city_option(City::Karnal)).await.unwrap();
        }

        #[tokio::test]
        async fn test_text_box_rejects_bad_email() {
            use text_box::locators as l;

            let page = MockPage::demoqa();
            page.goto("https://demoqa.com/text-box").await.unwrap();
            page.fill(&l::full_name(), "Maya Rossi").await.unwrap();
            page.fill(&l::email(), "not-an-email").await.unwrap();
            page.click(&l::submit()).await.unwrap();
            assert!(page.handle().text_of(&l::name_output()).is_none());
        }
    }
}
