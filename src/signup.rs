// src/signup.rs

use forms::Form;
use rules::{optional, DecisionFn, RuleFactory, ValidationContext};

/// Server codes the sign-up endpoint is known to return, paired with the
/// field they belong to and the message shown there.
pub(crate) const SERVER_ERRORS: [(&str, &str, &str); 3] = [
    ("email", "dup-email", "This email is already registered."),
    ("username", "dup-username", "This username is taken."),
    ("phone", "invalid-phone", "The phone number could not be verified."),
];

fn server_rules(context: &ValidationContext, field: &str) -> Vec<DecisionFn> {
    SERVER_ERRORS
        .iter()
        .filter(|(owner, _, _)| *owner == field)
        .map(|(_, code, message)| context.api_error_rule(code, message))
        .collect()
}

pub(crate) fn sign_up_form(factory: &RuleFactory, context: &ValidationContext) -> Form {
    let form = Form::new();
    let values = form.values();

    let mut email = vec![factory.required(None), factory.email(None)];
    email.extend(server_rules(context, "email"));

    let mut username = vec![
        factory.required(None),
        factory.username(None),
        factory.min_length(3, None),
        factory.max_length(24, None),
    ];
    username.extend(server_rules(context, "username"));

    let mut phone = vec![optional(factory.phone(None))];
    phone.extend(server_rules(context, "phone"));

    form.field("email", email)
        .field("username", username)
        .field("phone", phone)
        .field(
            "password",
            vec![factory.required(None), factory.min_length(8, None), factory.max_length(128, None)],
        )
        .field(
            "password_confirmation",
            vec![factory.required(None), factory.matches_field(values, "password", None)],
        )
}
