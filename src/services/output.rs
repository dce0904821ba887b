use crate::domain::models::{ErrorBody, JsonErr, JsonOut};
use crate::services::client::SubmissionError;
use crate::services::report::NoResultError;
use crate::services::staging::ValidationError;
use crate::services::storage::StateError;
use serde::Serialize;

pub fn print_one<T: Serialize>(json: bool, data: T, row: impl Fn(&T) -> String) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

/// Stable machine code for an error, for the `--json` envelope. Typed
/// pipeline errors map to their own codes; anything else is INTERNAL.
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(v) = err.downcast_ref::<ValidationError>() {
        return match v {
            ValidationError::UnsupportedType => "UNSUPPORTED_TYPE",
            ValidationError::TooLarge(_) => "TOO_LARGE",
        };
    }
    if let Some(s) = err.downcast_ref::<SubmissionError>() {
        return match s {
            SubmissionError::HttpStatus(_) => "HTTP_STATUS",
            SubmissionError::Transport => "TRANSPORT",
        };
    }
    if err.downcast_ref::<NoResultError>().is_some() {
        return "NO_RESULT";
    }
    if let Some(s) = err.downcast_ref::<StateError>() {
        return match s {
            StateError::NoStagedFile => "NO_STAGED_FILE",
            StateError::AuditInProgress => "AUDIT_IN_PROGRESS",
        };
    }
    "INTERNAL"
}

pub fn print_failure(json: bool, err: &anyhow::Error) {
    if json {
        let out = JsonErr {
            ok: false,
            error: ErrorBody {
                code: error_code(err).to_string(),
                message: err.to_string(),
            },
        };
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{}", s),
            Err(_) => eprintln!("error: {}", err),
        }
    } else {
        eprintln!("error: {}", err);
    }
}
