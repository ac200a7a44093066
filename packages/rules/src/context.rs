use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use thiserror::Error;

use crate::decision::{decision, DecisionFn};

/// The host form that owns field values and shows failing messages.
///
/// `validate` must run synchronously and must not call back into the
/// [`ValidationContext`] that invoked it.
#[cfg_attr(test, mockall::automock)]
pub trait FormAdapter {
    /// Evaluate every field against its current value and surface failures.
    fn validate(&mut self) -> bool;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    #[error("no form has been bound; call bind_and_validate first")]
    Unbound,
    #[error("the bound form is already validating")]
    Reentrant,
}

type ActiveCodes = Rc<RefCell<HashSet<String>>>;

/// Per-form state that lets server error codes show up for a single
/// validation pass.
///
/// One instance belongs to one form. Codes are only active while
/// [`ValidationContext::report_server_error`] is running the bound form's
/// `validate`; outside of that call the set is empty.
#[derive(Default)]
pub struct ValidationContext {
    active_codes: ActiveCodes,
    bound_form: Option<Rc<RefCell<dyn FormAdapter>>>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A rule that ignores the field value and fails with `message` while
    /// `error_code` is being reported.
    pub fn api_error_rule(&self, error_code: &str, message: &str) -> DecisionFn {
        let codes = Rc::clone(&self.active_codes);
        let code = error_code.to_string();
        let message = if message.trim().is_empty() {
            format!("Server rejected this value. ({})", error_code)
        } else {
            message.to_string()
        };
        decision(move |_| {
            if codes.borrow().contains(&code) {
                Err(message.clone())
            } else {
                Ok(())
            }
        })
    }

    /// Remember `form` for later server errors and run its pre-submit check.
    pub fn bind_and_validate(
        &mut self,
        form: Rc<RefCell<dyn FormAdapter>>,
    ) -> Result<bool, ContextError> {
        let mut validating = form.try_borrow_mut().map_err(|_| ContextError::Reentrant)?;
        self.bound_form = Some(Rc::clone(&form));
        let valid = validating.validate();
        tracing::debug!(valid, "bound form validated");
        Ok(valid)
    }

    /// Re-validate the bound form with `error_code` as the only active code,
    /// then clear it again.
    ///
    /// The form's own result is ignored; only the messages it surfaces matter.
    pub fn report_server_error(&self, error_code: &str) -> Result<(), ContextError> {
        let Some(form) = self.bound_form.as_ref() else {
            tracing::warn!(error_code, "server error reported before a form was bound");
            return Err(ContextError::Unbound);
        };
        let mut form = match form.try_borrow_mut() {
            Ok(form) => form,
            Err(_) => {
                tracing::warn!(error_code, "server error reported during validation");
                return Err(ContextError::Reentrant);
            }
        };

        tracing::debug!(error_code, "injecting server error code");
        let _injected = Injection::begin(&self.active_codes, error_code);
        form.validate();
        Ok(())
    }

    /// Codes visible to [`ValidationContext::api_error_rule`] right now.
    pub fn active_codes(&self) -> HashSet<String> {
        self.active_codes.borrow().clone()
    }

    pub fn is_bound(&self) -> bool {
        self.bound_form.is_some()
    }
}

// Holds the code active for one pass and clears the set when dropped,
// including when the host's validate panics.
struct Injection<'a> {
    codes: &'a ActiveCodes,
}

impl<'a> Injection<'a> {
    fn begin(codes: &'a ActiveCodes, code: &str) -> Self {
        let mut active = codes.borrow_mut();
        active.clear();
        active.insert(code.to_string());
        drop(active);
        Self { codes }
    }
}

impl Drop for Injection<'_> {
    fn drop(&mut self) {
        self.codes.borrow_mut().clear();
    }
}
