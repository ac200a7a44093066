// src/setup.rs

use std::env;
use std::fs;
use std::io;

use rules::{ConfigError, ContextError, Messages};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const MESSAGES_VAR: &str = "FIELDCHECK_MESSAGES";
const SERVER_ERROR_VAR: &str = "FIELDCHECK_SERVER_ERROR";
const LOG_FORMAT_VAR: &str = "LOG_FORMAT";

#[derive(Debug, Error)]
pub(super) enum AppError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to read field values from stdin: {0}")]
    Stdin(#[from] io::Error),
    #[error("field values must be a JSON object: {0}")]
    Values(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Context(#[from] ContextError),
}

pub(super) struct Settings {
    pub messages: Messages,
    pub server_error: Option<String>,
}

pub(super) fn set_up_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    if env::var(LOG_FORMAT_VAR).is_ok_and(|format| format == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

pub(super) fn load_settings() -> Result<Settings, AppError> {
    dotenvy::dotenv().ok();

    let messages = match env::var(MESSAGES_VAR) {
        Ok(path) => {
            let source = fs::read_to_string(&path).map_err(|source| AppError::Read {
                path: path.clone(),
                source,
            })?;
            tracing::info!(path, "loaded message overrides");
            Messages::from_json_str(&source)?
        }
        Err(_) => Messages::default(),
    };

    let server_error = env::var(SERVER_ERROR_VAR).ok().filter(|code| !code.is_empty());

    Ok(Settings {
        messages,
        server_error,
    })
}
