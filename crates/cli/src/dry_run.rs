//! Dry-run dispatcher: resolves and reports without actuating anything

use async_trait::async_trait;
use gateway::Dispatch;
use shared::{DispatchResult, ResolvedEntities};

/// Stands in for the controller client wherever no actuation should leave
/// the machine (interactive mode, `send --dry-run`, tests).
#[derive(Debug, Clone, Default)]
pub struct DryRunDispatcher;

#[async_trait]
impl Dispatch for DryRunDispatcher {
    async fn dispatch(&self, resolved: &ResolvedEntities) -> DispatchResult {
        DispatchResult::ok(
            resolved.intent,
            &resolved.entity_id,
            format!(
                "[dry-run] would execute {} on {}",
                resolved.intent, resolved.entity_id
            ),
        )
    }
}
