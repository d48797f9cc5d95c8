use std::fmt;

use shared::domain::FreelancerId;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Failure of a call against the record service, normalized across transports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("invalid record service url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// No response arrived.
    #[error("network error: {0}")]
    Network(String),
    /// A 2xx response whose body is not the expected JSON.
    #[error("undecodable response: {0}")]
    Decode(String),
    #[error("server responded {status}: {}", .body.as_deref().unwrap_or("<empty body>"))]
    Server { status: u16, body: Option<String> },
}

impl RemoteError {
    /// Text to show the operator: the server's body verbatim when it sent one,
    /// `fallback` otherwise.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            RemoteError::Server {
                body: Some(body), ..
            } => body.clone(),
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(value: reqwest::Error) -> Self {
        RemoteError::Network(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Workflow {
    Create,
    Edit,
    Delete,
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Workflow::Create => "create",
            Workflow::Edit => "edit",
            Workflow::Delete => "delete",
        })
    }
}

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("record {0} is not on the current page")]
    NotOnPage(FreelancerId),
    #[error("{workflow} workflow cannot {action} while {state}")]
    InvalidState {
        workflow: Workflow,
        action: &'static str,
        state: &'static str,
    },
}
