use thiserror::Error;

use crate::transport::http::TransportError;
use crate::workflow::error::ConfigError;

/// Shown when a failure carries no message of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Why a submission did not render a result.
///
/// Every variant is surfaced the same way: its message goes into the
/// workflow's error region.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// No response was obtained
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// Non-2xx status; the body is logged, never shown
    #[error("Server error: {status}")]
    Http { status: u16, body: String },

    /// 2xx status but the body carries an `error` field
    #[error("{0}")]
    Application(String),

    /// Body is not a JSON object
    #[error("{0}")]
    Decode(String),
}

impl SubmitError {
    /// Message written into the error region.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

/// Misuse of the coordinator itself, as opposed to a failed submission.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown workflow '{0}'")]
    UnknownWorkflow(String),

    #[error("unknown trigger '{0}'")]
    UnknownTrigger(String),

    #[error("trigger '{0}' has no action bound")]
    UnboundTrigger(String),
}
