//! Entity lexicon: synonym tables and default entity identifiers
//!
//! Keys are stored lower-cased; lookups lower-case and trim the query, so
//! matching is case-insensitive regardless of where the phrase came from.

use serde::{Deserialize, Serialize};
use shared::{Result, VestaError};
use std::collections::HashMap;
use std::path::Path;

/// Default entity targets used when a command names no locality
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultEntities {
    #[serde(default = "default_all_lights")]
    pub all_lights: String,

    #[serde(default = "default_thermostat")]
    pub thermostat: String,

    #[serde(default = "default_media_player")]
    pub media_player: String,

    #[serde(default = "default_door")]
    pub door: String,
}

fn default_all_lights() -> String {
    "light.all_lights".to_string()
}

fn default_thermostat() -> String {
    "climate.main_thermostat".to_string()
}

fn default_media_player() -> String {
    "media_player.spotify".to_string()
}

fn default_door() -> String {
    "lock.front_door".to_string()
}

impl Default for DefaultEntities {
    fn default() -> Self {
        Self {
            all_lights: default_all_lights(),
            thermostat: default_thermostat(),
            media_player: default_media_player(),
            door: default_door(),
        }
    }
}

/// Static mapping tables from user phrases to canonical identifiers.
///
/// `rooms` maps synonyms to canonical room ids (`lounge` → `living_room`);
/// the other tables map names directly to controller entity ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityLexicon {
    #[serde(default)]
    rooms: HashMap<String, String>,

    #[serde(default)]
    devices: HashMap<String, String>,

    #[serde(default)]
    scenes: HashMap<String, String>,

    #[serde(default)]
    doors: HashMap<String, String>,

    #[serde(default)]
    pub defaults: DefaultEntities,
}

impl EntityLexicon {
    /// The default household lexicon shipped with VESTA
    pub fn builtin() -> Self {
        let rooms = [
            ("living room", "living_room"),
            ("lounge", "living_room"),
            ("sitting room", "living_room"),
            ("bedroom", "bedroom"),
            ("master bedroom", "master_bedroom"),
            ("kitchen", "kitchen"),
            ("bathroom", "bathroom"),
            ("washroom", "bathroom"),
            ("office", "office"),
            ("study", "office"),
            ("dining room", "dining_room"),
            ("garage", "garage"),
            ("basement", "basement"),
            ("cellar", "basement"),
        ];

        // Keys are the name as captured, without the trailing light/lamp word
        let devices = [
            ("desk", "light.desk_lamp"),
            ("floor", "light.floor_lamp"),
            ("reading", "light.reading_lamp"),
            ("porch", "light.porch_light"),
            ("hallway", "light.hallway_lights"),
            ("christmas tree", "light.christmas_tree"),
        ];

        let scenes = [
            ("movie night", "scene.movie_night"),
            ("good morning", "scene.good_morning"),
            ("good night", "scene.good_night"),
            ("bedtime", "scene.bedtime"),
            ("romantic", "scene.romantic"),
            ("party", "scene.party"),
        ];

        let doors = [
            ("front", "lock.front_door"),
            ("back", "lock.back_door"),
            ("side", "lock.side_door"),
            ("garage", "lock.garage_door"),
        ];

        fn table(pairs: &[(&str, &str)]) -> HashMap<String, String> {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        }

        Self {
            rooms: table(&rooms),
            devices: table(&devices),
            scenes: table(&scenes),
            doors: table(&doors),
            defaults: DefaultEntities::default(),
        }
    }

    /// Load a lexicon from a YAML file. Keys are normalized to lower case.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse a lexicon from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let mut lexicon: Self = serde_yaml::from_str(content)?;
        lexicon.normalize_keys();
        if lexicon.rooms.is_empty()
            && lexicon.devices.is_empty()
            && lexicon.scenes.is_empty()
            && lexicon.doors.is_empty()
        {
            return Err(VestaError::Config(
                "lexicon file defines no entity tables".to_string(),
            ));
        }
        Ok(lexicon)
    }

    fn normalize_keys(&mut self) {
        for map in [
            &mut self.rooms,
            &mut self.devices,
            &mut self.scenes,
            &mut self.doors,
        ] {
            let entries = std::mem::take(map);
            *map = entries
                .into_iter()
                .map(|(k, v)| (k.trim().to_lowercase(), v))
                .collect();
        }
    }

    fn lookup<'a>(map: &'a HashMap<String, String>, phrase: &str) -> Option<&'a str> {
        map.get(&phrase.trim().to_lowercase()).map(String::as_str)
    }

    /// Canonical room id for a room phrase
    pub fn room(&self, phrase: &str) -> Option<&str> {
        Self::lookup(&self.rooms, phrase)
    }

    /// Entity id for a named device
    pub fn device(&self, phrase: &str) -> Option<&str> {
        Self::lookup(&self.devices, phrase)
    }

    /// Entity id for a scene name
    pub fn scene(&self, phrase: &str) -> Option<&str> {
        Self::lookup(&self.scenes, phrase)
    }

    /// Entity id for a door name
    pub fn door(&self, phrase: &str) -> Option<&str> {
        Self::lookup(&self.doors, phrase)
    }

    /// Every entity id this lexicon can emit, defaults included.
    /// Used to verify the allow-list closure property.
    pub fn all_entity_ids(&self) -> Vec<&str> {
        self.devices
            .values()
            .chain(self.scenes.values())
            .chain(self.doors.values())
            .map(String::as_str)
            .chain([
                self.defaults.all_lights.as_str(),
                self.defaults.thermostat.as_str(),
                self.defaults.media_player.as_str(),
                self.defaults.door.as_str(),
            ])
            .collect()
    }
}

impl Default for EntityLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}
