pub mod errors;
pub mod form;

pub use errors::{ValidationErrors, ValidationErrorsExt};
pub use form::Form;
