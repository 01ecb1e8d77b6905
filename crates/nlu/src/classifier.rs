//! Intent classifier: first structural match over the rule table
//!
//! Classification is a pure function of the input text and the static
//! table. Identical input always yields an identical `ParsedIntent`.

use crate::rule_table::{IntentRule, RuleTable};
use shared::{ParsedIntent, SlotValue};
use std::collections::HashMap;

/// Matches validated, normalized command text against the rule table
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    table: RuleTable,
}

impl IntentClassifier {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    /// Classify a command. Expects normalized (trimmed, lower-cased) text.
    ///
    /// A command no rule matches returns the `Unknown` intent carrying the
    /// text verbatim; that is a non-actionable result, not an error.
    pub fn classify(&self, text: &str) -> ParsedIntent {
        match self.match_rule(text) {
            Some(rule) => ParsedIntent::new(rule.intent(), extract_slots(rule, text)),
            None => ParsedIntent::unknown(text),
        }
    }

    /// First matching rule in ascending priority order, if any
    pub fn match_rule(&self, text: &str) -> Option<&IntentRule> {
        self.table.rules().iter().find(|r| r.pattern().is_match(text))
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }
}

/// Extract the winning rule's declared slots. A slot whose capture is
/// missing or trims to nothing maps to the explicit Absent marker.
fn extract_slots(rule: &IntentRule, text: &str) -> HashMap<String, SlotValue> {
    let mut raw_slots = HashMap::new();

    let captures = rule.pattern().captures(text);
    for slot in rule.slot_names() {
        let value = captures
            .as_ref()
            .and_then(|caps| caps.name(slot))
            .map(|m| m.as_str().trim())
            .filter(|v| !v.is_empty());

        raw_slots.insert(
            slot.clone(),
            match value {
                Some(v) => SlotValue::Present(v.to_string()),
                None => SlotValue::Absent,
            },
        );
    }

    raw_slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{IntentKind, ORIGINAL_COMMAND_SLOT};

    fn classifier() -> IntentClassifier {
        IntentClassifier::new(RuleTable::builtin().unwrap())
    }

    // ============== Basic Classification Tests ==============

    #[test]
    fn test_turn_on_light_with_room() {
        let parsed = classifier().classify("turn on the living room lights");

        assert_eq!(parsed.intent, IntentKind::TurnOnLight);
        assert_eq!(parsed.slot("room").as_present(), Some("living room"));
    }

    #[test]
    fn test_turn_on_light_room_after_light_word() {
        let parsed = classifier().classify("turn on the lights in the kitchen");

        assert_eq!(parsed.intent, IntentKind::TurnOnLight);
        assert_eq!(parsed.slot("room").as_present(), Some("kitchen"));
    }

    #[test]
    fn test_turn_on_light_bare() {
        let parsed = classifier().classify("turn on the lights");

        assert_eq!(parsed.intent, IntentKind::TurnOnLight);
        // Bare form declares no slots at all
        assert!(parsed.raw_slots.is_empty());
    }

    #[test]
    fn test_turn_on_named_light() {
        let parsed = classifier().classify("turn on the desk lamp");

        assert_eq!(parsed.intent, IntentKind::TurnOnLight);
        assert_eq!(parsed.slot("light_name").as_present(), Some("desk"));
    }

    #[test]
    fn test_turn_off_light() {
        let parsed = classifier().classify("switch off the bedroom lights");

        assert_eq!(parsed.intent, IntentKind::TurnOffLight);
        assert_eq!(parsed.slot("room").as_present(), Some("bedroom"));
    }

    #[test]
    fn test_toggle_light() {
        let parsed = classifier().classify("toggle the office lights");

        assert_eq!(parsed.intent, IntentKind::ToggleLight);
        assert_eq!(parsed.slot("room").as_present(), Some("office"));
    }

    #[test]
    fn test_set_brightness() {
        let parsed = classifier().classify("set brightness to 128");

        assert_eq!(parsed.intent, IntentKind::SetBrightness);
        assert_eq!(parsed.slot("brightness").as_present(), Some("128"));
    }

    #[test]
    fn test_set_brightness_with_room() {
        let parsed = classifier().classify("set the living room brightness to 80");

        assert_eq!(parsed.intent, IntentKind::SetBrightness);
        assert_eq!(parsed.slot("room").as_present(), Some("living room"));
        assert_eq!(parsed.slot("brightness").as_present(), Some("80"));
    }

    #[test]
    fn test_set_temperature_no_room() {
        let parsed = classifier().classify("set temperature to 72 degrees");

        assert_eq!(parsed.intent, IntentKind::SetTemperature);
        assert_eq!(parsed.slot("temperature").as_present(), Some("72"));
        assert!(parsed.slot("room").is_absent());
    }

    #[test]
    fn test_set_temperature_with_room() {
        let parsed = classifier().classify("set the bedroom temperature to 68");

        assert_eq!(parsed.intent, IntentKind::SetTemperature);
        assert_eq!(parsed.slot("room").as_present(), Some("bedroom"));
        assert_eq!(parsed.slot("temperature").as_present(), Some("68"));
    }

    #[test]
    fn test_play_media() {
        let parsed = classifier().classify("play some jazz music");

        assert_eq!(parsed.intent, IntentKind::PlayMedia);
        assert_eq!(parsed.slot("query").as_present(), Some("some jazz music"));
    }

    #[test]
    fn test_stop_media() {
        let parsed = classifier().classify("stop the music");
        assert_eq!(parsed.intent, IntentKind::StopMedia);
    }

    #[test]
    fn test_activate_scene() {
        let parsed = classifier().classify("activate scene movie night");

        assert_eq!(parsed.intent, IntentKind::ActivateScene);
        assert_eq!(parsed.slot("scene_name").as_present(), Some("movie night"));
    }

    #[test]
    fn test_activate_scene_name_first() {
        let parsed = classifier().classify("turn on the movie night scene");

        assert_eq!(parsed.intent, IntentKind::ActivateScene);
        assert_eq!(parsed.slot("scene_name").as_present(), Some("movie night"));
    }

    #[test]
    fn test_lock_door() {
        let parsed = classifier().classify("lock the front door");

        assert_eq!(parsed.intent, IntentKind::LockDoor);
        assert_eq!(parsed.slot("door").as_present(), Some("front"));
    }

    #[test]
    fn test_lock_door_unspecified() {
        let parsed = classifier().classify("lock the door");

        assert_eq!(parsed.intent, IntentKind::LockDoor);
        assert!(parsed.slot("door").is_absent());
    }

    #[test]
    fn test_unlock_door() {
        let parsed = classifier().classify("unlock the back door");

        assert_eq!(parsed.intent, IntentKind::UnlockDoor);
        assert_eq!(parsed.slot("door").as_present(), Some("back"));
    }

    #[test]
    fn test_unknown_command() {
        let parsed = classifier().classify("do a backflip");

        assert_eq!(parsed.intent, IntentKind::Unknown);
        assert_eq!(
            parsed.slot(ORIGINAL_COMMAND_SLOT).as_present(),
            Some("do a backflip")
        );
    }

    // ============== Determinism Tests ==============

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = classifier();
        let inputs = [
            "turn on the living room lights",
            "set temperature to 72 degrees",
            "do a backflip",
            "lock the front door",
        ];

        for input in inputs {
            assert_eq!(classifier.classify(input), classifier.classify(input));
        }
    }

    // ============== Priority Tests ==============

    #[test]
    fn test_room_rule_beats_named_light_rule() {
        // "living room" would also parse as a light name; the lower-priority
        // room rule must win so the room default applies downstream.
        let classifier = classifier();
        let rule = classifier
            .match_rule("turn on the living room lights")
            .unwrap();

        assert_eq!(rule.priority(), 10);
        let parsed = classifier.classify("turn on the living room lights");
        assert!(parsed.slot("light_name").is_absent());
        assert_eq!(parsed.slot("room").as_present(), Some("living room"));
    }

    #[test]
    fn test_overlapping_rules_resolve_to_lowest_priority() {
        let classifier = classifier();

        // For every input, the matched rule must be the first (lowest
        // priority) of all rules whose pattern matches.
        let inputs = [
            "turn on the living room lights",
            "turn on the lights",
            "turn off the lamps in the garage",
            "set the kitchen brightness to 40",
            "set the office temperature to 70",
        ];

        for input in inputs {
            let winner = classifier.match_rule(input).unwrap().priority();
            let lowest = classifier
                .table()
                .rules()
                .iter()
                .filter(|r| r.pattern().is_match(input))
                .map(|r| r.priority())
                .min()
                .unwrap();
            assert_eq!(winner, lowest, "input: {}", input);
        }
    }

    // ============== Reachability Tests ==============

    #[test]
    fn test_every_builtin_rule_is_reachable() {
        // One example per rule priority whose first match is that rule.
        // A rule with no reachable example is dead weight in the table.
        let examples: &[(u32, &str)] = &[
            (10, "turn on the living room lights"),
            (11, "turn on the lights in the kitchen"),
            (12, "turn on the lights"),
            (13, "turn on the desk lamp"),
            (14, "turn on, please, the hallway lamps"),
            (20, "turn off the bedroom lights"),
            (21, "switch off the lights in the office"),
            (22, "turn off all the lights"),
            (23, "turn off the porch light"),
            (24, "turn off, if you would, all the lamps"),
            (30, "toggle the basement lights"),
            (31, "toggle the lights in the garage"),
            (32, "toggle the lights"),
            (33, "toggle the floor lamp"),
            (34, "toggle, please, all of the lamps"),
            (40, "set the living room brightness to 80"),
            (41, "set brightness to 200"),
            (50, "set the bedroom temperature to 68"),
            (51, "set temperature to 72 degrees"),
            (60, "play some jazz music"),
            (65, "stop the music"),
            (70, "activate scene movie night"),
            (71, "activate the good morning scene"),
            (80, "lock the front door"),
            (85, "unlock the front door"),
        ];

        let classifier = classifier();
        assert_eq!(
            examples.len(),
            classifier.table().len(),
            "every rule needs exactly one reachability example"
        );

        for (priority, input) in examples {
            let rule = classifier
                .match_rule(input)
                .unwrap_or_else(|| panic!("no rule matched: {}", input));
            assert_eq!(
                rule.priority(),
                *priority,
                "input {:?} matched rule {} instead of {}",
                input,
                rule.priority(),
                priority
            );
        }
    }

    // ============== Slot Extraction Edge Cases ==============

    #[test]
    fn test_absent_slot_is_marker_not_empty_string() {
        let parsed = classifier().classify("lock the door");

        assert_eq!(parsed.slot("door"), &SlotValue::Absent);
        assert_ne!(parsed.slot("door"), &SlotValue::Present(String::new()));
    }

    #[test]
    fn test_slot_values_are_trimmed() {
        let parsed = classifier().classify("play  some jazz music");

        // Captured text keeps interior spacing but no surrounding whitespace
        let query = parsed.slot("query").as_present().unwrap();
        assert_eq!(query, query.trim());
    }

    #[test]
    fn test_unlock_does_not_trigger_lock() {
        let parsed = classifier().classify("unlock the door");
        assert_eq!(parsed.intent, IntentKind::UnlockDoor);
    }
}
