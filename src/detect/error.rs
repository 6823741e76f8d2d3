use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectErrorKind {
    InvalidRequest,
    ProbeFailed,
    IdentityUnavailable,
    AlreadyInstalled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct DetectError {
    pub kind: DetectErrorKind,
    pub message: String,
}

impl DetectError {
    pub fn new(kind: DetectErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

pub fn invalid_request(message: impl Into<String>) -> DetectError {
    DetectError::new(DetectErrorKind::InvalidRequest, message)
}

pub fn probe_failed(message: impl Into<String>) -> DetectError {
    DetectError::new(DetectErrorKind::ProbeFailed, message)
}

pub fn identity_unavailable(message: impl Into<String>) -> DetectError {
    DetectError::new(DetectErrorKind::IdentityUnavailable, message)
}

pub fn already_installed(message: impl Into<String>) -> DetectError {
    DetectError::new(DetectErrorKind::AlreadyInstalled, message)
}
