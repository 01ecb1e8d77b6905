//! Input validation: bounds and a structural-attack deny list
//!
//! Runs before any matching. The validator never echoes offending text;
//! all rejections carry generic messages.

use shared::{ValidationError, ValidationLimits};

/// Deny-list of structural attack fragments, matched against the
/// lower-cased input: shell metacharacters, SQL tokens, script/code
/// injection, and path traversal.
const DENY_PATTERNS: &[&str] = &[
    // shell
    ";",
    "`",
    "$(",
    "&&",
    "||",
    "rm -rf",
    "del /f",
    "format c:",
    // sql
    "drop table",
    "delete from",
    "insert into",
    "update set",
    "' or '",
    // script / code injection
    "<script",
    "eval(",
    "exec(",
    "__import__",
    "subprocess",
    "import os",
    // path traversal
    "../",
    "..\\",
];

/// A command that passed validation. `original` keeps the caller's casing
/// for echo and audit; `normalized` is what the classifier matches against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedText {
    pub original: String,
    pub normalized: String,
}

/// Sanitizes and bounds raw command text
#[derive(Debug, Clone)]
pub struct InputValidator {
    limits: ValidationLimits,
}

impl InputValidator {
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    /// Validate raw text and return a normalized copy for matching
    pub fn validate(&self, raw_text: &str) -> Result<ValidatedText, ValidationError> {
        let trimmed = raw_text.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty);
        }

        if trimmed.chars().count() > self.limits.max_command_length {
            return Err(ValidationError::TooLong {
                limit: self.limits.max_command_length,
            });
        }

        // Non-whitespace control characters have no place in spoken text
        if trimmed.chars().any(|c| c.is_control() && !c.is_whitespace()) {
            return Err(ValidationError::MaliciousPattern);
        }

        let normalized = trimmed.to_lowercase();
        if DENY_PATTERNS.iter().any(|p| normalized.contains(p)) {
            return Err(ValidationError::MaliciousPattern);
        }

        Ok(ValidatedText {
            original: trimmed.to_string(),
            normalized,
        })
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new(ValidationLimits::default())
    }
}
