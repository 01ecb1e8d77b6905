//! Intent types for the command interpretation pipeline

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Canonical action category a command maps to.
///
/// Wire names are snake_case; `Unknown` serializes as `unknown_command` so
/// callers can offer a clarification UX on that exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    TurnOnLight,
    TurnOffLight,
    ToggleLight,
    SetBrightness,
    SetTemperature,
    PlayMedia,
    StopMedia,
    ActivateScene,
    LockDoor,
    UnlockDoor,
    #[serde(rename = "unknown_command")]
    Unknown,
}

impl IntentKind {
    /// Wire name of this intent
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::TurnOnLight => "turn_on_light",
            IntentKind::TurnOffLight => "turn_off_light",
            IntentKind::ToggleLight => "toggle_light",
            IntentKind::SetBrightness => "set_brightness",
            IntentKind::SetTemperature => "set_temperature",
            IntentKind::PlayMedia => "play_media",
            IntentKind::StopMedia => "stop_media",
            IntentKind::ActivateScene => "activate_scene",
            IntentKind::LockDoor => "lock_door",
            IntentKind::UnlockDoor => "unlock_door",
            IntentKind::Unknown => "unknown_command",
        }
    }

    /// Whether this intent can be dispatched to the controller
    pub fn is_actionable(&self) -> bool {
        !matches!(self, IntentKind::Unknown)
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A captured slot value.
///
/// `Absent` is an explicit marker distinct from an empty string, so
/// downstream defaulting can tell "not mentioned" from "mentioned as empty".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    Present(String),
    Absent,
}

impl SlotValue {
    pub fn as_present(&self) -> Option<&str> {
        match self {
            SlotValue::Present(s) => Some(s),
            SlotValue::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, SlotValue::Absent)
    }
}

/// Slot name used to carry the verbatim text of an unclassifiable command.
pub const ORIGINAL_COMMAND_SLOT: &str = "original_command";

/// Output of the intent classifier: the winning intent plus its raw slots.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIntent {
    pub intent: IntentKind,
    pub raw_slots: HashMap<String, SlotValue>,
}

impl ParsedIntent {
    /// Build a parsed intent with the given slots
    pub fn new(intent: IntentKind, raw_slots: HashMap<String, SlotValue>) -> Self {
        Self { intent, raw_slots }
    }

    /// Build the non-actionable Unknown result, carrying the text verbatim
    pub fn unknown(text: impl Into<String>) -> Self {
        let mut raw_slots = HashMap::new();
        raw_slots.insert(
            ORIGINAL_COMMAND_SLOT.to_string(),
            SlotValue::Present(text.into()),
        );
        Self {
            intent: IntentKind::Unknown,
            raw_slots,
        }
    }

    /// Look up a slot; unknown names read as Absent
    pub fn slot(&self, name: &str) -> &SlotValue {
        self.raw_slots.get(name).unwrap_or(&SlotValue::Absent)
    }
}

/// Output of the entity resolver: a concrete, addressable actuation target.
///
/// `entity_id` is always a controller-namespace identifier
/// (`<domain>.<object>`), never a raw user phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEntities {
    pub intent: IntentKind,
    pub entity_id: String,
    pub numeric_params: HashMap<String, f64>,
    /// Media content request for `play_media` (e.g. "some jazz music")
    pub media_query: Option<String>,
}

impl ResolvedEntities {
    pub fn new(intent: IntentKind, entity_id: impl Into<String>) -> Self {
        Self {
            intent,
            entity_id: entity_id.into(),
            numeric_params: HashMap::new(),
            media_query: None,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: f64) -> Self {
        self.numeric_params.insert(name.into(), value);
        self
    }

    pub fn with_media_query(mut self, query: impl Into<String>) -> Self {
        self.media_query = Some(query.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============== IntentKind Tests ==============

    #[test]
    fn test_intent_wire_names() {
        assert_eq!(IntentKind::TurnOnLight.as_str(), "turn_on_light");
        assert_eq!(IntentKind::SetTemperature.as_str(), "set_temperature");
        assert_eq!(IntentKind::Unknown.as_str(), "unknown_command");
    }

    #[test]
    fn test_intent_serde_snake_case() {
        let json = serde_json::to_string(&IntentKind::TurnOnLight).unwrap();
        assert_eq!(json, "\"turn_on_light\"");

        let parsed: IntentKind = serde_json::from_str("\"lock_door\"").unwrap();
        assert_eq!(parsed, IntentKind::LockDoor);
    }

    #[test]
    fn test_unknown_serializes_as_unknown_command() {
        let json = serde_json::to_string(&IntentKind::Unknown).unwrap();
        assert_eq!(json, "\"unknown_command\"");

        let parsed: IntentKind = serde_json::from_str("\"unknown_command\"").unwrap();
        assert_eq!(parsed, IntentKind::Unknown);
    }

    #[test]
    fn test_actionable() {
        assert!(IntentKind::TurnOnLight.is_actionable());
        assert!(IntentKind::ActivateScene.is_actionable());
        assert!(!IntentKind::Unknown.is_actionable());
    }

    // ============== SlotValue Tests ==============

    #[test]
    fn test_slot_value_present() {
        let slot = SlotValue::Present("living room".to_string());
        assert_eq!(slot.as_present(), Some("living room"));
        assert!(!slot.is_absent());
    }

    #[test]
    fn test_slot_value_absent_is_not_empty_string() {
        let absent = SlotValue::Absent;
        let empty = SlotValue::Present(String::new());

        assert!(absent.is_absent());
        assert!(!empty.is_absent());
        assert_ne!(absent, empty);
    }

    // ============== ParsedIntent Tests ==============

    #[test]
    fn test_unknown_carries_original_text() {
        let parsed = ParsedIntent::unknown("do a backflip");

        assert_eq!(parsed.intent, IntentKind::Unknown);
        assert_eq!(
            parsed.slot(ORIGINAL_COMMAND_SLOT).as_present(),
            Some("do a backflip")
        );
    }

    #[test]
    fn test_missing_slot_reads_as_absent() {
        let parsed = ParsedIntent::new(IntentKind::TurnOnLight, HashMap::new());
        assert!(parsed.slot("room").is_absent());
    }

    // ============== ResolvedEntities Tests ==============

    #[test]
    fn test_resolved_entities_builder() {
        let resolved = ResolvedEntities::new(IntentKind::SetTemperature, "climate.main_thermostat")
            .with_param("temperature", 72.0);

        assert_eq!(resolved.entity_id, "climate.main_thermostat");
        assert_eq!(resolved.numeric_params.get("temperature"), Some(&72.0));
        assert!(resolved.media_query.is_none());
    }

    #[test]
    fn test_resolved_entities_media_query() {
        let resolved = ResolvedEntities::new(IntentKind::PlayMedia, "media_player.spotify")
            .with_media_query("some jazz music");

        assert_eq!(resolved.media_query.as_deref(), Some("some jazz music"));
    }
}
