use std::cell::RefCell;
use std::rc::Rc;

use forms::Form;
use rules::{
    email, matches_field, max_length, min_length, required, username, ContextError, FormAdapter,
    ValidationContext,
};
use serde_json::{json, Value};

fn sign_up_form(context: &ValidationContext) -> Form {
    let form = Form::new();
    let values = form.values();
    form.field(
        "email",
        vec![
            required(None),
            email(None),
            context.api_error_rule("dup-email", "This email is already registered."),
        ],
    )
    .field(
        "username",
        vec![
            required(None),
            username(None),
            max_length(16, None),
            context.api_error_rule("dup-username", "This username is taken."),
        ],
    )
    .field("password", vec![required(None), min_length(8, None)])
    .field(
        "password_confirmation",
        vec![
            required(None),
            matches_field(values, "password", Some("Passwords must match.")),
        ],
    )
}

fn fill_valid(form: &Form) {
    form.set_value("email", json!("user@example.com"));
    form.set_value("username", json!("new_user"));
    form.set_value("password", json!("correct horse"));
    form.set_value("password_confirmation", json!("correct horse"));
}

#[test]
fn test_server_error_surfaces_for_one_pass() {
    let mut context = ValidationContext::new();
    let form = Rc::new(RefCell::new(sign_up_form(&context)));
    fill_valid(&form.borrow());

    assert_eq!(context.bind_and_validate(form.clone()), Ok(true));

    context.report_server_error("dup-email").unwrap();
    assert_eq!(
        form.borrow().error("email"),
        Some("This email is already registered.")
    );
    assert_eq!(form.borrow().error("username"), None);
    assert!(context.active_codes().is_empty());

    // The next ordinary check no longer sees the server code.
    assert_eq!(context.bind_and_validate(form.clone()), Ok(true));
    assert!(form.borrow().errors().is_empty());
}

#[test]
fn test_api_rule_passes_after_report_returns() {
    let mut context = ValidationContext::new();
    let rule = context.api_error_rule("dup-email", "taken");
    let form = Rc::new(RefCell::new(Form::new().field("email", vec![rule.clone()])));

    context.bind_and_validate(form.clone()).unwrap();
    context.report_server_error("dup-email").unwrap();

    assert_eq!(form.borrow().error("email"), Some("taken"));
    assert_eq!(rule(&json!("user@example.com")), Ok(()));
}

#[test]
fn test_field_errors_take_priority_over_server_errors() {
    let mut context = ValidationContext::new();
    let form = Rc::new(RefCell::new(sign_up_form(&context)));
    fill_valid(&form.borrow());
    form.borrow().set_value("email", json!("not-an-email"));

    assert_eq!(context.bind_and_validate(form.clone()), Ok(false));
    context.report_server_error("dup-email").unwrap();
    assert_eq!(
        form.borrow().error("email"),
        Some("Invalid email address format.")
    );
}

#[test]
fn test_confirmation_tracks_password_changes() {
    let mut context = ValidationContext::new();
    let form = Rc::new(RefCell::new(sign_up_form(&context)));
    fill_valid(&form.borrow());

    form.borrow().set_value("password", json!("another secret"));
    assert_eq!(context.bind_and_validate(form.clone()), Ok(false));
    assert_eq!(
        form.borrow().error("password_confirmation"),
        Some("Passwords must match.")
    );

    form.borrow()
        .set_value("password_confirmation", json!("another secret"));
    assert_eq!(context.bind_and_validate(form.clone()), Ok(true));
}

#[test]
fn test_bind_and_validate_is_idempotent() {
    let mut context = ValidationContext::new();
    let form = Rc::new(RefCell::new(sign_up_form(&context)));
    form.borrow().set_value("email", json!("user@example.com"));

    let first = context.bind_and_validate(form.clone()).unwrap();
    let first_errors = form.borrow().errors().clone();
    let second = context.bind_and_validate(form.clone()).unwrap();

    assert!(!first);
    assert_eq!(first, second);
    assert_eq!(&first_errors, form.borrow().errors());
}

#[test]
fn test_report_without_bound_form() {
    let context = ValidationContext::new();
    assert_eq!(
        context.report_server_error("dup-email"),
        Err(ContextError::Unbound)
    );
}

// A host whose validate calls back into the context that is validating it.
struct ReentrantHost {
    context: Rc<RefCell<Option<Rc<ValidationContext>>>>,
    outcome: Rc<RefCell<Option<Result<(), ContextError>>>>,
}

impl FormAdapter for ReentrantHost {
    fn validate(&mut self) -> bool {
        if let Some(context) = self.context.borrow().as_ref() {
            *self.outcome.borrow_mut() = Some(context.report_server_error("nested"));
        }
        true
    }
}

#[test]
fn test_reentrant_report_is_rejected() {
    let slot = Rc::new(RefCell::new(None));
    let outcome = Rc::new(RefCell::new(None));
    let host = Rc::new(RefCell::new(ReentrantHost {
        context: slot.clone(),
        outcome: outcome.clone(),
    }));

    let mut context = ValidationContext::new();
    context.bind_and_validate(host).unwrap();
    let context = Rc::new(context);
    *slot.borrow_mut() = Some(context.clone());

    assert_eq!(context.report_server_error("outer"), Ok(()));
    assert_eq!(*outcome.borrow(), Some(Err(ContextError::Reentrant)));
    assert!(context.active_codes().is_empty());

    slot.borrow_mut().take();
}

#[test]
fn test_absent_values_are_null() {
    let form = Form::new().field("email", vec![required(None)]);
    assert_eq!(form.value("email"), Value::Null);
}
