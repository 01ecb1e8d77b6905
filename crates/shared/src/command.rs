//! Command and result types for the pipeline

use crate::error::ErrorKind;
use crate::intent::IntentKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One incoming command. Immutable once received, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub raw_text: String,
    pub session_id: String,
}

impl Command {
    pub fn new(raw_text: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            session_id: session_id.into(),
        }
    }
}

/// Pipeline stages, in execution order. Audit events record the furthest
/// stage a command reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Validation,
    Classification,
    Resolution,
    Admission,
    Dispatch,
    Completed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Validation => "validation",
            PipelineStage::Classification => "classification",
            PipelineStage::Resolution => "resolution",
            PipelineStage::Admission => "admission",
            PipelineStage::Dispatch => "dispatch",
            PipelineStage::Completed => "completed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of one dispatch attempt. Returned to the caller and
/// never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub success: bool,
    pub intent: IntentKind,
    pub entity_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl DispatchResult {
    /// Successful actuation with a human-readable confirmation
    pub fn ok(intent: IntentKind, entity_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            intent,
            entity_id: entity_id.into(),
            message: message.into(),
            error_kind: None,
        }
    }

    /// Failed actuation with a closed failure kind
    pub fn failed(intent: IntentKind, entity_id: impl Into<String>, kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::ControllerTimeout => "controller did not respond in time",
            ErrorKind::ControllerUnreachable => "cannot reach the controller",
            ErrorKind::ControllerAuthFailure => "controller rejected our credentials",
            ErrorKind::ControllerRejected => "controller rejected the request",
        };
        Self {
            success: false,
            intent,
            entity_id: entity_id.into(),
            message: message.to_string(),
            error_kind: Some(kind),
        }
    }

    /// Non-actionable outcome for an unrecognized command. Not an error:
    /// no dispatch was attempted and no failure kind applies.
    pub fn not_actionable() -> Self {
        Self {
            success: false,
            intent: IntentKind::Unknown,
            entity_id: String::new(),
            message: "I didn't recognize that command. Try commands like \
                      \"turn on the lights\", \"set temperature to 72\", or \"play music\"."
                .to_string(),
            error_kind: None,
        }
    }
}

/// Final outward-facing result of one pipeline run that reached
/// classification: success, controller failure, or unknown intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Echo of the input text, original casing preserved
    pub command: String,
    pub session_id: String,
    pub intent: IntentKind,
    pub parameters: Value,
    pub result: DispatchResult,
}

impl CommandOutcome {
    /// HTTP status for this outcome: 200 unless the controller failed
    pub fn http_status(&self) -> u16 {
        match self.result.error_kind {
            Some(kind) => kind.http_status(),
            None => 200,
        }
    }
}
