//! AuditLog - one event per completed pipeline run
//!
//! Entries are ring-buffered in memory and internally synchronized so
//! concurrent pipeline instances record through a shared handle.

use serde::{Deserialize, Serialize};
use shared::{IntentKind, PipelineStage};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

/// Outcome of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Completed,
    Rejected,
}

/// One audit record, emitted exactly once per command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub timestamp: String,
    pub session_id: String,
    pub intent: IntentKind,
    pub entity_id: Option<String>,
    /// Furthest stage the command reached
    pub stage: PipelineStage,
    pub outcome: AuditOutcome,
    pub detail: Option<String>,
}

/// Capped in-memory audit log
#[derive(Debug, Clone)]
pub struct AuditLog {
    entries: Arc<Mutex<VecDeque<AuditEvent>>>,
    max_entries: usize,
}

impl AuditLog {
    /// Create a new AuditLog holding at most `max_entries` events
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(max_entries))),
            max_entries,
        }
    }

    /// Record an event, evicting the oldest when full
    pub fn record(&self, event: AuditEvent) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.len() >= self.max_entries {
            entries.pop_front();
        }
        entries.push_back(event);
    }

    /// Record one pipeline run with the current timestamp
    pub fn record_run(
        &self,
        session_id: &str,
        intent: IntentKind,
        entity_id: Option<&str>,
        stage: PipelineStage,
        outcome: AuditOutcome,
        detail: Option<&str>,
    ) {
        self.record(AuditEvent {
            timestamp: chrono::Utc::now().to_rfc3339(),
            session_id: session_id.to_string(),
            intent,
            entity_id: entity_id.map(|s| s.to_string()),
            stage,
            outcome,
            detail: detail.map(|s| s.to_string()),
        });
    }

    /// Most recent events, newest first
    pub fn recent(&self, limit: usize) -> Vec<AuditEvent> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().rev().take(limit).cloned().collect()
    }

    /// Most recent rejected runs, newest first
    pub fn recent_rejections(&self, limit: usize) -> Vec<AuditEvent> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .iter()
            .rev()
            .filter(|e| e.outcome == AuditOutcome::Rejected)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Get statistics
    pub fn stats(&self) -> AuditStats {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        AuditStats {
            total_entries: entries.len(),
            rejection_count: entries
                .iter()
                .filter(|e| e.outcome == AuditOutcome::Rejected)
                .count(),
        }
    }

    /// Export as JSON
    pub fn export_json(&self) -> serde_json::Value {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_value(entries.iter().collect::<Vec<_>>()).unwrap_or_default()
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(10000)
    }
}

/// Audit statistics
#[derive(Debug, Clone)]
pub struct AuditStats {
    pub total_entries: usize,
    pub rejection_count: usize,
}
