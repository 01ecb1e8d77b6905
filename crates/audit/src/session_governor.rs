//! SessionGovernor - per-session quota and expiry enforcement
//!
//! State machine per session: Active → Active (command accepted),
//! Active → Expired (idle timeout or max duration), Active → Throttled
//! (quota reached). The whole read-modify-write happens under one lock per
//! call, so two concurrent commands can never both pass a quota boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{GovernorError, SessionPolicy};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// One tracked session record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub command_count: u32,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Proof of admission: a snapshot of the session after the accepted command
#[derive(Debug, Clone)]
pub struct Admitted {
    pub session: Session,
}

/// Keyed session store with admission control
#[derive(Debug, Clone)]
pub struct SessionGovernor {
    policy: SessionPolicy,
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl SessionGovernor {
    pub fn new(policy: SessionPolicy) -> Self {
        Self {
            policy,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Admit one command for this session, or fail without consuming quota
    pub fn admit(&self, session_id: &str) -> Result<Admitted, GovernorError> {
        self.admit_at(session_id, Utc::now())
    }

    /// Admission with an injected clock. Expiry is checked before quota;
    /// a failed admit never increments the counter.
    pub fn admit_at(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Admitted, GovernorError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);

        let expired = sessions.get(session_id).is_some_and(|s| {
            now.signed_duration_since(s.last_seen_at) > self.policy.idle_timeout()
                || now.signed_duration_since(s.created_at) > self.policy.max_duration()
        });
        if expired {
            // The record is deleted so the same opaque id can start a fresh
            // session on the caller's next attempt.
            sessions.remove(session_id);
            return Err(GovernorError::SessionExpired);
        }

        let session = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Session {
                session_id: session_id.to_string(),
                command_count: 0,
                created_at: now,
                last_seen_at: now,
            });

        if session.command_count >= self.policy.max_commands {
            return Err(GovernorError::QuotaExceeded {
                limit: self.policy.max_commands,
            });
        }

        session.command_count += 1;
        session.last_seen_at = now;

        Ok(Admitted {
            session: session.clone(),
        })
    }

    /// Snapshot of a session record, if one is tracked
    pub fn session(&self, session_id: &str) -> Option<Session> {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.get(session_id).cloned()
    }

    /// Number of currently tracked sessions
    pub fn active_sessions(&self) -> usize {
        let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.len()
    }
}
