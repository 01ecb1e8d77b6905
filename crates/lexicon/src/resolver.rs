//! Entity resolver: raw capture slots → concrete controller entities
//!
//! Fallback policy: an absent locality slot gets the intent's documented
//! default target; a present-but-unrecognized phrase fails rather than
//! guessing. Every output passes the domain allow-list.

use crate::domain::permitted_domain;
use crate::tables::EntityLexicon;
use shared::{
    ClimateBounds, IntentKind, ParsedIntent, ResolutionError, ResolvedEntities,
    ORIGINAL_COMMAND_SLOT,
};

/// Brightness is a controller-level byte; not configurable
const BRIGHTNESS_MIN: f64 = 0.0;
const BRIGHTNESS_MAX: f64 = 255.0;

/// Resolves parsed intents against the entity lexicon
#[derive(Debug, Clone)]
pub struct EntityResolver {
    lexicon: EntityLexicon,
    climate: ClimateBounds,
}

impl EntityResolver {
    pub fn new(lexicon: EntityLexicon, climate: ClimateBounds) -> Self {
        Self { lexicon, climate }
    }

    pub fn lexicon(&self) -> &EntityLexicon {
        &self.lexicon
    }

    /// Resolve a parsed intent into an addressable actuation target
    pub fn resolve(&self, parsed: &ParsedIntent) -> Result<ResolvedEntities, ResolutionError> {
        let resolved = match parsed.intent {
            IntentKind::TurnOnLight | IntentKind::TurnOffLight | IntentKind::ToggleLight => {
                self.light_target(parsed)?
            }

            IntentKind::SetBrightness => {
                let brightness =
                    self.numeric_slot(parsed, "brightness", BRIGHTNESS_MIN, BRIGHTNESS_MAX)?;
                self.light_target(parsed)?.with_param("brightness", brightness)
            }

            IntentKind::SetTemperature => {
                let temperature = self.numeric_slot(
                    parsed,
                    "temperature",
                    self.climate.min_temperature,
                    self.climate.max_temperature,
                )?;
                ResolvedEntities::new(parsed.intent, self.climate_target(parsed)?)
                    .with_param("temperature", temperature)
            }

            IntentKind::PlayMedia => {
                let base = ResolvedEntities::new(
                    parsed.intent,
                    self.lexicon.defaults.media_player.clone(),
                );
                match parsed.slot("query").as_present() {
                    Some(query) => base.with_media_query(query),
                    None => base,
                }
            }

            IntentKind::StopMedia => ResolvedEntities::new(
                parsed.intent,
                self.lexicon.defaults.media_player.clone(),
            ),

            IntentKind::ActivateScene => {
                let name = parsed.slot("scene_name").as_present().ok_or_else(|| {
                    ResolutionError::UnknownEntity {
                        value: "unnamed scene".to_string(),
                    }
                })?;
                let entity_id =
                    self.lexicon
                        .scene(name)
                        .ok_or_else(|| ResolutionError::UnknownEntity {
                            value: name.to_string(),
                        })?;
                ResolvedEntities::new(parsed.intent, entity_id)
            }

            IntentKind::LockDoor | IntentKind::UnlockDoor => {
                let entity_id = match parsed.slot("door").as_present() {
                    Some(door) => self
                        .lexicon
                        .door(door)
                        .ok_or_else(|| ResolutionError::UnknownEntity {
                            value: door.to_string(),
                        })?
                        .to_string(),
                    None => self.lexicon.defaults.door.clone(),
                };
                ResolvedEntities::new(parsed.intent, entity_id)
            }

            IntentKind::Unknown => {
                let value = parsed
                    .slot(ORIGINAL_COMMAND_SLOT)
                    .as_present()
                    .unwrap_or("unknown command")
                    .to_string();
                return Err(ResolutionError::UnknownEntity { value });
            }
        };

        // Authorization boundary: no output may leave the allow-list, even
        // when a configured lexicon maps a phrase into another domain.
        permitted_domain(&resolved.entity_id)?;
        Ok(resolved)
    }

    /// Light target precedence: named device, then room group, then the
    /// whole-house default.
    fn light_target(&self, parsed: &ParsedIntent) -> Result<ResolvedEntities, ResolutionError> {
        if let Some(name) = parsed.slot("light_name").as_present() {
            let entity_id =
                self.lexicon
                    .device(name)
                    .ok_or_else(|| ResolutionError::UnknownEntity {
                        value: name.to_string(),
                    })?;
            return Ok(ResolvedEntities::new(parsed.intent, entity_id));
        }

        if let Some(room) = parsed.slot("room").as_present() {
            let canonical =
                self.lexicon
                    .room(room)
                    .ok_or_else(|| ResolutionError::UnknownEntity {
                        value: room.to_string(),
                    })?;
            return Ok(ResolvedEntities::new(
                parsed.intent,
                format!("light.{}_lights", canonical),
            ));
        }

        Ok(ResolvedEntities::new(
            parsed.intent,
            self.lexicon.defaults.all_lights.clone(),
        ))
    }

    fn climate_target(&self, parsed: &ParsedIntent) -> Result<String, ResolutionError> {
        match parsed.slot("room").as_present() {
            Some(room) => {
                let canonical =
                    self.lexicon
                        .room(room)
                        .ok_or_else(|| ResolutionError::UnknownEntity {
                            value: room.to_string(),
                        })?;
                Ok(format!("climate.{}", canonical))
            }
            None => Ok(self.lexicon.defaults.thermostat.clone()),
        }
    }

    /// Parse and range-check a numeric slot. Absent or unparseable values
    /// fail the same way out-of-range ones do.
    fn numeric_slot(
        &self,
        parsed: &ParsedIntent,
        name: &str,
        min: f64,
        max: f64,
    ) -> Result<f64, ResolutionError> {
        let raw = parsed
            .slot(name)
            .as_present()
            .ok_or_else(|| ResolutionError::OutOfRange {
                slot: name.to_string(),
                value: "(absent)".to_string(),
            })?;

        let value: f64 = raw.parse().map_err(|_| ResolutionError::OutOfRange {
            slot: name.to_string(),
            value: raw.to_string(),
        })?;

        if value < min || value > max {
            return Err(ResolutionError::OutOfRange {
                slot: name.to_string(),
                value: raw.to_string(),
            });
        }

        Ok(value)
    }
}
