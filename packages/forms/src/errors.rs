use std::collections::HashMap;

/// Failing messages keyed by field name.
pub type ValidationErrors = HashMap<String, Vec<String>>;

pub trait ValidationErrorsExt {
    fn add_error(&mut self, field: &str, message: String);
}

impl ValidationErrorsExt for ValidationErrors {
    fn add_error(&mut self, field: &str, message: String) {
        self.entry(field.to_string()).or_default().push(message);
    }
}
