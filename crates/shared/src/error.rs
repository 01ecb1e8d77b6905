//! Error types for VESTA
//!
//! Every pipeline failure family is a closed enum; each maps to an HTTP
//! status so the API boundary never invents its own categories.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input validation failures (pipeline stage 1).
///
/// Messages are intentionally generic: the offending text is never echoed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("command is empty")]
    Empty,

    #[error("command exceeds the maximum length of {limit} characters")]
    TooLong { limit: usize },

    #[error("command contains disallowed content")]
    MaliciousPattern,
}

/// Entity resolution failures (pipeline stage 3)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    #[error("unrecognized entity '{value}'")]
    UnknownEntity { value: String },

    #[error("value '{value}' for '{slot}' is out of range")]
    OutOfRange { slot: String, value: String },

    #[error("device domain '{domain}' is not permitted")]
    DomainNotPermitted { domain: String },
}

/// Session admission failures (pipeline stage 4)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernorError {
    #[error("session has expired; start a new session")]
    SessionExpired,

    #[error("session command quota of {limit} reached; wait and retry")]
    QuotaExceeded { limit: u32 },
}

/// Closed enumeration of controller dispatch failures.
///
/// None of these carry the controller's response body; that boundary keeps
/// upstream error detail from leaking to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ControllerTimeout,
    ControllerUnreachable,
    ControllerAuthFailure,
    ControllerRejected,
}

impl ErrorKind {
    /// HTTP status surfaced to the caller for this failure
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::ControllerTimeout => 504,
            ErrorKind::ControllerUnreachable
            | ErrorKind::ControllerAuthFailure
            | ErrorKind::ControllerRejected => 502,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ControllerTimeout => "controller_timeout",
            ErrorKind::ControllerUnreachable => "controller_unreachable",
            ErrorKind::ControllerAuthFailure => "controller_auth_failure",
            ErrorKind::ControllerRejected => "controller_rejected",
        }
    }
}

/// A pipeline stage failure, converted to the uniform outward-facing shape.
///
/// Controller failures are not represented here: the dispatcher encodes them
/// inside `DispatchResult` rather than short-circuiting the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Governor(#[from] GovernorError),
}

impl PipelineError {
    /// HTTP status for this failure per the error handling design
    pub fn http_status(&self) -> u16 {
        match self {
            PipelineError::Validation(_) => 400,
            PipelineError::Resolution(ResolutionError::DomainNotPermitted { .. }) => 403,
            PipelineError::Resolution(_) => 400,
            PipelineError::Governor(_) => 429,
        }
    }

    /// Category prefix used in the API error shape (`"<category>: <reason>"`)
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Resolution(ResolutionError::DomainNotPermitted { .. }) => {
                "authorization"
            }
            PipelineError::Resolution(_) => "resolution",
            PipelineError::Governor(_) => "session",
        }
    }
}

/// General VESTA error type for setup and configuration paths
#[derive(Debug, Error)]
pub enum VestaError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, VestaError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ============== Status Mapping Tests ==============

    #[test]
    fn test_validation_errors_map_to_400() {
        for err in [
            ValidationError::Empty,
            ValidationError::TooLong { limit: 5000 },
            ValidationError::MaliciousPattern,
        ] {
            assert_eq!(PipelineError::from(err).http_status(), 400);
        }
    }

    #[test]
    fn test_domain_not_permitted_maps_to_403() {
        let err = PipelineError::from(ResolutionError::DomainNotPermitted {
            domain: "switch".to_string(),
        });
        assert_eq!(err.http_status(), 403);
        assert_eq!(err.category(), "authorization");
    }

    #[test]
    fn test_other_resolution_errors_map_to_400() {
        let unknown = PipelineError::from(ResolutionError::UnknownEntity {
            value: "attic".to_string(),
        });
        let range = PipelineError::from(ResolutionError::OutOfRange {
            slot: "temperature".to_string(),
            value: "999".to_string(),
        });

        assert_eq!(unknown.http_status(), 400);
        assert_eq!(range.http_status(), 400);
    }

    #[test]
    fn test_governor_errors_map_to_429() {
        assert_eq!(
            PipelineError::from(GovernorError::SessionExpired).http_status(),
            429
        );
        assert_eq!(
            PipelineError::from(GovernorError::QuotaExceeded { limit: 100 }).http_status(),
            429
        );
    }

    #[test]
    fn test_controller_failure_statuses() {
        assert_eq!(ErrorKind::ControllerTimeout.http_status(), 504);
        assert_eq!(ErrorKind::ControllerUnreachable.http_status(), 502);
        assert_eq!(ErrorKind::ControllerAuthFailure.http_status(), 502);
        assert_eq!(ErrorKind::ControllerRejected.http_status(), 502);
    }

    // ============== Message Tests ==============

    #[test]
    fn test_governor_messages_distinguish_recovery() {
        // Expired tells the caller to start over; quota tells them to wait.
        assert!(GovernorError::SessionExpired
            .to_string()
            .contains("new session"));
        assert!(GovernorError::QuotaExceeded { limit: 100 }
            .to_string()
            .contains("wait"));
    }

    #[test]
    fn test_validation_messages_do_not_echo_input() {
        let msg = ValidationError::MaliciousPattern.to_string();
        assert_eq!(msg, "command contains disallowed content");
    }

    #[test]
    fn test_error_kind_serde() {
        let json = serde_json::to_string(&ErrorKind::ControllerTimeout).unwrap();
        assert_eq!(json, "\"controller_timeout\"");
    }

    #[test]
    fn test_pipeline_error_categories() {
        assert_eq!(
            PipelineError::from(ValidationError::Empty).category(),
            "validation"
        );
        assert_eq!(
            PipelineError::from(GovernorError::SessionExpired).category(),
            "session"
        );
        assert_eq!(
            PipelineError::from(ResolutionError::UnknownEntity {
                value: "x".to_string()
            })
            .category(),
            "resolution"
        );
    }
}
