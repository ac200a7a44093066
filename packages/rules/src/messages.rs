use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading message overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid message configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Default failure messages used when a rule is built without one.
///
/// Any key missing from an override document keeps its built-in value.
/// `max_length` and `min_length` are templates; `{length}` is replaced by
/// the configured bound.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub required: String,
    pub email: String,
    pub phone: String,
    pub matches: String,
    pub max_length: String,
    pub min_length: String,
    pub username: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            required: "This field is required.".to_string(),
            email: "Invalid email address format.".to_string(),
            phone: "Invalid phone number format".to_string(),
            matches: "Passwords must match.".to_string(),
            max_length: "Max {length} characters allowed.".to_string(),
            min_length: "Min {length} characters allowed.".to_string(),
            username: "Only letters, numbers and underscore are allowed.".to_string(),
        }
    }
}

impl Messages {
    /// Load overrides from a JSON object. Blank entries keep the built-in text
    /// so a rule never reports an empty message.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let parsed: Messages = serde_json::from_str(source)?;
        Ok(parsed.filled())
    }

    /// Replace blank entries with the built-in text.
    pub(crate) fn filled(mut self) -> Self {
        let defaults = Messages::default();
        for (slot, fallback) in [
            (&mut self.required, defaults.required),
            (&mut self.email, defaults.email),
            (&mut self.phone, defaults.phone),
            (&mut self.matches, defaults.matches),
            (&mut self.max_length, defaults.max_length),
            (&mut self.min_length, defaults.min_length),
            (&mut self.username, defaults.username),
        ] {
            if slot.trim().is_empty() {
                *slot = fallback;
            }
        }
        self
    }

    pub(crate) fn max_length_for(&self, length: usize) -> String {
        fill_length(&self.max_length, length)
    }

    pub(crate) fn min_length_for(&self, length: usize) -> String {
        fill_length(&self.min_length, length)
    }
}

fn fill_length(template: &str, length: usize) -> String {
    template.replace("{length}", &length.to_string())
}

const LAST_RESORT: &str = "Invalid value.";

/// Pick the caller's message unless it is missing or blank.
pub(crate) fn message_or(message: Option<&str>, fallback: &str) -> String {
    match message {
        Some(m) if !m.trim().is_empty() => m.to_string(),
        _ if !fallback.trim().is_empty() => fallback.to_string(),
        _ => LAST_RESORT.to_string(),
    }
}
