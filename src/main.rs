mod setup;
mod signup;

use std::cell::RefCell;
use std::io::{self, Read};
use std::process::ExitCode;
use std::rc::Rc;

use rules::{RuleFactory, ValidationContext};
use serde_json::{json, Map, Value};
use setup::{load_settings, set_up_tracing, AppError};
use signup::sign_up_form;

fn run() -> Result<bool, AppError> {
    let settings = load_settings()?;
    let factory = RuleFactory::new(settings.messages);

    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let values: Map<String, Value> = serde_json::from_str(&input)?;

    let mut context = ValidationContext::new();
    let form = Rc::new(RefCell::new(sign_up_form(&factory, &context)));
    form.borrow().fill(values);

    let mut valid = context.bind_and_validate(form.clone())?;
    tracing::info!(valid, "pre-submit check finished");

    if let Some(code) = settings.server_error.as_deref() {
        if valid {
            context.report_server_error(code)?;
            valid = false;
            tracing::info!(code, "server error replayed");
        } else {
            tracing::info!(code, "skipping server error, form did not pass the pre-submit check");
        }
    }

    let form = form.borrow();
    let report = json!({
        "valid": valid,
        "errors": form.errors(),
        "summary": form.summary(),
    });
    println!("{}", report);
    Ok(valid)
}

fn main() -> ExitCode {
    set_up_tracing();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            tracing::error!(error = %err, "fieldcheck failed");
            ExitCode::from(2)
        }
    }
}
