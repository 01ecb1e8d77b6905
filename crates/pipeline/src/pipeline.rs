//! CommandPipeline - the central orchestrator
//!
//! Sequences validation → classification → resolution → admission →
//! dispatch for one command, short-circuits on the first failing stage,
//! and emits exactly one audit event per run whatever happens. No failure
//! escapes as a panic; a bad command never takes the service down.

use audit::{AuditLog, AuditOutcome, SessionGovernor};
use gateway::Dispatch;
use lexicon::{EntityLexicon, EntityResolver};
use nlu::{IntentClassifier, RuleTable};
use serde_json::{json, Value};
use shared::{
    Command, CommandOutcome, DispatchResult, IntentKind, Logger, ParsedIntent, PipelineError,
    PipelineStage, ResolvedEntities, Result, SlotValue, VestaError, VestaConfig,
};
use std::sync::Arc;

use crate::input_validator::InputValidator;

/// One pipeline instance. Cheap to clone and safe to share across
/// concurrent request handlers; the only shared mutable state lives behind
/// the governor's and audit log's own locks.
#[derive(Clone)]
pub struct CommandPipeline {
    validator: InputValidator,
    classifier: IntentClassifier,
    resolver: EntityResolver,
    governor: SessionGovernor,
    dispatcher: Arc<dyn Dispatch>,
    audit: AuditLog,
    logger: Arc<dyn Logger>,
}

impl CommandPipeline {
    /// Build a pipeline from configuration. Rule table and lexicon come
    /// from their configured files when set, builtin tables otherwise;
    /// a malformed table fails construction, never a request.
    pub fn new(
        config: &VestaConfig,
        dispatcher: Arc<dyn Dispatch>,
        logger: Arc<dyn Logger>,
    ) -> Result<Self> {
        let table = match &config.rules_path {
            Some(path) => RuleTable::from_yaml(path),
            None => RuleTable::builtin(),
        }
        .map_err(|e| VestaError::Config(e.to_string()))?;

        let lexicon = match &config.lexicon_path {
            Some(path) => EntityLexicon::from_yaml(path)?,
            None => EntityLexicon::builtin(),
        };

        Ok(Self {
            validator: InputValidator::new(config.validation),
            classifier: IntentClassifier::new(table),
            resolver: EntityResolver::new(lexicon, config.climate),
            governor: SessionGovernor::new(config.session),
            dispatcher,
            audit: AuditLog::default(),
            logger,
        })
    }

    /// Run one command through the pipeline.
    ///
    /// `Ok` covers successful actuation, controller failure (encoded in the
    /// result), and the non-actionable Unknown intent; `Err` covers the
    /// stages that reject a command before any dispatch is attempted.
    pub async fn handle(&self, command: Command) -> std::result::Result<CommandOutcome, PipelineError> {
        let session_id = command.session_id.clone();

        let validated = match self.validator.validate(&command.raw_text) {
            Ok(v) => v,
            Err(e) => {
                self.logger
                    .warn(&format!("command rejected at validation: {}", e), None);
                self.reject(&session_id, IntentKind::Unknown, None, PipelineStage::Validation, &e);
                return Err(e.into());
            }
        };

        let parsed = self.classifier.classify(&validated.normalized);

        if parsed.intent == IntentKind::Unknown {
            // Non-actionable, not an error: no quota consumed, no dispatch.
            self.logger.info("no rule matched command", None);
            self.audit.record_run(
                &session_id,
                IntentKind::Unknown,
                None,
                PipelineStage::Classification,
                AuditOutcome::Completed,
                None,
            );
            return Ok(CommandOutcome {
                command: validated.original,
                session_id,
                intent: IntentKind::Unknown,
                parameters: slot_parameters(&parsed),
                result: DispatchResult::not_actionable(),
            });
        }

        let resolved = match self.resolver.resolve(&parsed) {
            Ok(r) => r,
            Err(e) => {
                self.logger
                    .warn(&format!("command rejected at resolution: {}", e), None);
                self.reject(&session_id, parsed.intent, None, PipelineStage::Resolution, &e);
                return Err(e.into());
            }
        };

        // Admission runs strictly before dispatch: no controller call is
        // ever issued for a throttled or expired session.
        if let Err(e) = self.governor.admit(&session_id) {
            self.logger
                .warn(&format!("session {} not admitted: {}", session_id, e), None);
            self.reject(
                &session_id,
                parsed.intent,
                Some(&resolved.entity_id),
                PipelineStage::Admission,
                &e,
            );
            return Err(e.into());
        }

        let result = self.dispatcher.dispatch(&resolved).await;

        let (stage, outcome) = if result.success {
            (PipelineStage::Completed, AuditOutcome::Completed)
        } else {
            (PipelineStage::Dispatch, AuditOutcome::Rejected)
        };
        self.audit.record_run(
            &session_id,
            parsed.intent,
            Some(&resolved.entity_id),
            stage,
            outcome,
            result.error_kind.map(|k| k.as_str()),
        );

        Ok(CommandOutcome {
            command: validated.original,
            session_id,
            intent: parsed.intent,
            parameters: merged_parameters(&parsed, &resolved),
            result,
        })
    }

    fn reject(
        &self,
        session_id: &str,
        intent: IntentKind,
        entity_id: Option<&str>,
        stage: PipelineStage,
        error: &dyn std::fmt::Display,
    ) {
        self.audit.record_run(
            session_id,
            intent,
            entity_id,
            stage,
            AuditOutcome::Rejected,
            Some(&error.to_string()),
        );
    }

    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn governor(&self) -> &SessionGovernor {
        &self.governor
    }
}

/// Raw slots as a JSON object; absent slots serialize as null
fn slot_parameters(parsed: &ParsedIntent) -> Value {
    let mut map = serde_json::Map::new();
    for (name, slot) in &parsed.raw_slots {
        let value = match slot {
            SlotValue::Present(v) => json!(v),
            SlotValue::Absent => Value::Null,
        };
        map.insert(name.clone(), value);
    }
    Value::Object(map)
}

/// Raw slots plus resolved numeric parameters (numerics win on collision)
fn merged_parameters(parsed: &ParsedIntent, resolved: &ResolvedEntities) -> Value {
    let mut value = slot_parameters(parsed);
    if let Value::Object(map) = &mut value {
        for (name, v) in &resolved.numeric_params {
            map.insert(name.clone(), json!(v));
        }
    }
    value
}
