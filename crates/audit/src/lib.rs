//! # VESTA Audit
//!
//! Audit logging and session governance for VESTA.

mod audit_log;
mod session_governor;

pub use audit_log::{AuditEvent, AuditLog, AuditOutcome, AuditStats};
pub use session_governor::{Admitted, Session, SessionGovernor};
