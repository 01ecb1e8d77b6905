//! Intent rule table: priority-ordered patterns with named capture slots
//!
//! Rules are static data built once at process start. Evaluation order is
//! ascending priority and the first structural match wins, so precedence is
//! a property of the table itself, not of scan order in calling code.

use regex::Regex;
use serde::{Deserialize, Serialize};
use shared::IntentKind;
use std::path::Path;
use thiserror::Error;

/// Room vocabulary recognized inside rule patterns. Longer phrases first so
/// alternation picks "living room" over a bare "room" fragment.
const ROOM_PATTERN: &str = "living room|sitting room|dining room|master bedroom|bedroom|kitchen\
                            |bathroom|washroom|office|study|lounge|garage|basement|cellar";

/// Rule table construction failures. All of these abort process start;
/// a malformed table is never served.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("duplicate rule priority {0}")]
    DuplicatePriority(u32),

    #[error("invalid pattern for rule priority {priority}: {source}")]
    BadPattern {
        priority: u32,
        #[source]
        source: regex::Error,
    },

    #[error("pattern for rule priority {priority} does not capture declared slot '{slot}'")]
    MissingSlotCapture { priority: u32, slot: String },

    #[error("rule table error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// One pattern → intent rule with named capture slots
#[derive(Debug, Clone)]
pub struct IntentRule {
    priority: u32,
    intent: IntentKind,
    pattern: Regex,
    slot_names: Vec<String>,
}

impl IntentRule {
    /// Compile a rule, verifying every declared slot has a matching named
    /// capture group in the pattern.
    pub fn new(
        priority: u32,
        intent: IntentKind,
        pattern: &str,
        slot_names: &[&str],
    ) -> Result<Self, RuleError> {
        if intent == IntentKind::Unknown {
            return Err(RuleError::Config(
                "a rule cannot target unknown_command".to_string(),
            ));
        }

        let regex =
            Regex::new(pattern).map_err(|source| RuleError::BadPattern { priority, source })?;

        let capture_names: Vec<&str> = regex.capture_names().flatten().collect();
        for slot in slot_names {
            if !capture_names.contains(slot) {
                return Err(RuleError::MissingSlotCapture {
                    priority,
                    slot: (*slot).to_string(),
                });
            }
        }

        Ok(Self {
            priority,
            intent,
            pattern: regex,
            slot_names: slot_names.iter().map(|s| (*s).to_string()).collect(),
        })
    }

    fn from_spec(spec: &RuleSpec) -> Result<Self, RuleError> {
        let slots: Vec<&str> = spec.slots.iter().map(String::as_str).collect();
        Self::new(spec.priority, spec.intent, &spec.pattern, &slots)
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn intent(&self) -> IntentKind {
        self.intent
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    pub fn pattern_str(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn slot_names(&self) -> &[String] {
        &self.slot_names
    }
}

/// Serialized form of a rule, for table files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSpec {
    pub intent: IntentKind,
    pub priority: u32,
    pub pattern: String,
    #[serde(default)]
    pub slots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RuleFile {
    rules: Vec<RuleSpec>,
}

/// Ordered set of intent rules. Invariant: priorities are unique and the
/// internal vector is sorted ascending, so iteration order is match order.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<IntentRule>,
}

impl RuleTable {
    /// Build a table, rejecting duplicate priorities
    pub fn new(mut rules: Vec<IntentRule>) -> Result<Self, RuleError> {
        rules.sort_by_key(|r| r.priority);
        for pair in rules.windows(2) {
            if pair[0].priority == pair[1].priority {
                return Err(RuleError::DuplicatePriority(pair[0].priority));
            }
        }
        Ok(Self { rules })
    }

    /// The default rule set shipped with VESTA.
    ///
    /// Light-control intents share a five-pattern block: room before the
    /// light word, room after it, a bare "the lights" form, a named light,
    /// and a loose catch-all. Lower offsets carry more information, so the
    /// most specific reading of an utterance wins.
    pub fn builtin() -> Result<Self, RuleError> {
        let mut rules = Vec::new();

        for (base, intent, verbs) in [
            (10, IntentKind::TurnOnLight, "turn on|switch on"),
            (20, IntentKind::TurnOffLight, "turn off|switch off"),
            (30, IntentKind::ToggleLight, "toggle|flip"),
        ] {
            rules.push(IntentRule::new(
                base,
                intent,
                &format!(r"\b(?:{verbs})\b.*\b(?P<room>{ROOM_PATTERN})\b.*\b(?:lights?|lamps?)\b"),
                &["room"],
            )?);
            rules.push(IntentRule::new(
                base + 1,
                intent,
                &format!(r"\b(?:{verbs})\b.*\b(?:lights?|lamps?)\b.*\b(?P<room>{ROOM_PATTERN})\b"),
                &["room"],
            )?);
            rules.push(IntentRule::new(
                base + 2,
                intent,
                &format!(r"\b(?:{verbs})\s+(?:all\s+)?(?:the\s+)?(?:lights?|lamps?)\b"),
                &[],
            )?);
            rules.push(IntentRule::new(
                base + 3,
                intent,
                &format!(r"\b(?:{verbs})\s+(?:the\s+)?(?P<light_name>[a-z][a-z ]*?)\s+(?:light|lamp)s?\b"),
                &["light_name"],
            )?);
            rules.push(IntentRule::new(
                base + 4,
                intent,
                &format!(r"\b(?:{verbs})\b.*\b(?:lights?|lamps?)\b"),
                &[],
            )?);
        }

        rules.push(IntentRule::new(
            40,
            IntentKind::SetBrightness,
            &format!(
                r"\b(?:set|dim|change)\b.*\b(?P<room>{ROOM_PATTERN})\b.*\bbrightness\b.*?\b(?P<brightness>\d+)\b"
            ),
            &["room", "brightness"],
        )?);
        rules.push(IntentRule::new(
            41,
            IntentKind::SetBrightness,
            r"\b(?:set|dim|change)\b.*\bbrightness\b.*?\b(?P<brightness>\d+)\b",
            &["brightness"],
        )?);

        rules.push(IntentRule::new(
            50,
            IntentKind::SetTemperature,
            &format!(
                r"\b(?:set|change)\b.*\b(?P<room>{ROOM_PATTERN})\b.*\btemperature\b.*?\b(?P<temperature>\d+)\b"
            ),
            &["room", "temperature"],
        )?);
        rules.push(IntentRule::new(
            51,
            IntentKind::SetTemperature,
            r"\b(?:set|change)\b.*\btemperature\b.*?\b(?P<temperature>\d+)\b",
            &["temperature"],
        )?);

        rules.push(IntentRule::new(
            60,
            IntentKind::PlayMedia,
            r"\b(?:play|start|resume)\s+(?P<query>[^,.]*\b(?:music|song|playlist|spotify|youtube)\b[^,.]*)",
            &["query"],
        )?);
        rules.push(IntentRule::new(
            65,
            IntentKind::StopMedia,
            r"\b(?:stop|pause|halt)\b.*\b(?:music|song|media|playing)\b",
            &[],
        )?);

        rules.push(IntentRule::new(
            70,
            IntentKind::ActivateScene,
            r"\b(?:activate|set|turn on)\b.*\bscene\s+(?P<scene_name>[a-z][a-z ]*)",
            &["scene_name"],
        )?);
        rules.push(IntentRule::new(
            71,
            IntentKind::ActivateScene,
            r"\b(?:activate|run|set|turn on)\s+(?:the\s+)?(?P<scene_name>[a-z][a-z ]*?)\s+scene\b",
            &["scene_name"],
        )?);

        rules.push(IntentRule::new(
            80,
            IntentKind::LockDoor,
            r"\block\b.*?\b(?:(?P<door>front|back|side|garage)\s+)?doors?\b",
            &["door"],
        )?);
        rules.push(IntentRule::new(
            85,
            IntentKind::UnlockDoor,
            r"\bunlock\b.*?\b(?:(?P<door>front|back|side|garage)\s+)?doors?\b",
            &["door"],
        )?);

        Self::new(rules)
    }

    /// Load a rule table from a YAML file
    pub fn from_yaml(path: &Path) -> Result<Self, RuleError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse a rule table from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self, RuleError> {
        let file: RuleFile = serde_yaml::from_str(content)?;
        let rules = file
            .rules
            .iter()
            .map(IntentRule::from_spec)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rules)
    }

    /// Rules in evaluation (ascending priority) order
    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
