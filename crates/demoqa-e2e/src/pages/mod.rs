//! Page objects for the two demo forms.

pub mod registration;
pub mod text_box;

pub use registration::RegistrationPage;
pub use text_box::TextBoxPage;
