use std::cell::RefCell;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::decision::{decision, DecisionFn};
use crate::messages::{message_or, Messages};
use crate::value::{as_text, is_truthy, length};

// Word characters are ASCII only; `\w` in `regex` would also accept Unicode letters.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_]+([.+-]?[A-Za-z0-9_]+)*\+?@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,24})+$",
    )
    .unwrap()
});
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\+?([0-9]{1,3}[\s.-]?)?(\([0-9]{3}\)|[0-9]{3})?[\s.-]?[0-9]{3}[\s.-]?[0-9]{4,6}$")
        .unwrap()
});
static USERNAME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

/// Builds decision functions, falling back to its [`Messages`] when a rule
/// is created without a message of its own.
#[derive(Debug, Clone, Default)]
pub struct RuleFactory {
    messages: Messages,
}

impl RuleFactory {
    /// Blank entries in `messages` fall back to the built-in text.
    pub fn new(messages: Messages) -> Self {
        Self {
            messages: messages.filled(),
        }
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Fails on falsy values and on strings or arrays of length zero.
    ///
    /// Numeric zero and `false` are falsy and therefore fail too.
    pub fn required(&self, message: Option<&str>) -> DecisionFn {
        let message = message_or(message, &self.messages.required);
        decision(move |value| {
            let present = match length(value) {
                Some(len) => len >= 1,
                None => is_truthy(value),
            };
            if present {
                Ok(())
            } else {
                Err(message.clone())
            }
        })
    }

    pub fn email(&self, message: Option<&str>) -> DecisionFn {
        pattern_rule(&EMAIL_REGEX, message_or(message, &self.messages.email))
    }

    pub fn phone(&self, message: Option<&str>) -> DecisionFn {
        pattern_rule(&PHONE_REGEX, message_or(message, &self.messages.phone))
    }

    pub fn username(&self, message: Option<&str>) -> DecisionFn {
        pattern_rule(&USERNAME_REGEX, message_or(message, &self.messages.username))
    }

    /// Passes when the input equals whatever `resolve` returns at evaluation time.
    pub fn matches<F>(&self, resolve: F, message: Option<&str>) -> DecisionFn
    where
        F: Fn() -> Value + 'static,
    {
        let message = message_or(message, &self.messages.matches);
        decision(move |value| {
            if resolve() == *value {
                Ok(())
            } else {
                Err(message.clone())
            }
        })
    }

    /// [`RuleFactory::matches`] against `values[key]`, read lazily. A missing
    /// key reads as `Null`.
    pub fn matches_field(
        &self,
        values: Rc<RefCell<Map<String, Value>>>,
        key: &str,
        message: Option<&str>,
    ) -> DecisionFn {
        let key = key.to_string();
        self.matches(
            move || match values.try_borrow() {
                Ok(map) => map.get(&key).cloned().unwrap_or(Value::Null),
                Err(_) => Value::Null,
            },
            message,
        )
    }

    /// Only enforced when a value is present; pair with `required` to make
    /// the field mandatory.
    pub fn max_length(&self, max: usize, message: Option<&str>) -> DecisionFn {
        let message = message_or(message, &self.messages.max_length_for(max));
        decision(move |value| match measured(value) {
            Some(len) if len > max => Err(message.clone()),
            _ => Ok(()),
        })
    }

    pub fn min_length(&self, min: usize, message: Option<&str>) -> DecisionFn {
        let message = message_or(message, &self.messages.min_length_for(min));
        decision(move |value| match measured(value) {
            Some(len) if len < min => Err(message.clone()),
            _ => Ok(()),
        })
    }
}

// Length of a present value; absent or falsy values skip the bound.
fn measured(value: &Value) -> Option<usize> {
    if is_truthy(value) {
        length(value)
    } else {
        None
    }
}

fn pattern_rule(pattern: &'static Regex, message: String) -> DecisionFn {
    decision(move |value| match as_text(value) {
        Some(text) if pattern.is_match(text) => Ok(()),
        _ => Err(message.clone()),
    })
}

pub fn required(message: Option<&str>) -> DecisionFn {
    RuleFactory::default().required(message)
}

pub fn email(message: Option<&str>) -> DecisionFn {
    RuleFactory::default().email(message)
}

pub fn phone(message: Option<&str>) -> DecisionFn {
    RuleFactory::default().phone(message)
}

pub fn username(message: Option<&str>) -> DecisionFn {
    RuleFactory::default().username(message)
}

pub fn matches<F>(resolve: F, message: Option<&str>) -> DecisionFn
where
    F: Fn() -> Value + 'static,
{
    RuleFactory::default().matches(resolve, message)
}

pub fn matches_field(
    values: Rc<RefCell<Map<String, Value>>>,
    key: &str,
    message: Option<&str>,
) -> DecisionFn {
    RuleFactory::default().matches_field(values, key, message)
}

pub fn max_length(max: usize, message: Option<&str>) -> DecisionFn {
    RuleFactory::default().max_length(max, message)
}

pub fn min_length(min: usize, message: Option<&str>) -> DecisionFn {
    RuleFactory::default().min_length(min, message)
}
