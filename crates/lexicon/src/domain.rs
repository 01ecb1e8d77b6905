//! Entity domain allow-list
//!
//! The authorization boundary for actuation: only these device classes may
//! ever appear in a resolved entity id. Anything else fails closed, even if
//! a configured lexicon maps a phrase to it.

use serde::{Deserialize, Serialize};
use shared::ResolutionError;
use std::fmt;

/// Permitted controller domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityDomain {
    Light,
    Climate,
    Lock,
    MediaPlayer,
    Scene,
}

impl EntityDomain {
    pub const ALL: [EntityDomain; 5] = [
        EntityDomain::Light,
        EntityDomain::Climate,
        EntityDomain::Lock,
        EntityDomain::MediaPlayer,
        EntityDomain::Scene,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityDomain::Light => "light",
            EntityDomain::Climate => "climate",
            EntityDomain::Lock => "lock",
            EntityDomain::MediaPlayer => "media_player",
            EntityDomain::Scene => "scene",
        }
    }

    /// Parse a controller domain prefix; non-allow-listed domains are None
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(EntityDomain::Light),
            "climate" => Some(EntityDomain::Climate),
            "lock" => Some(EntityDomain::Lock),
            "media_player" => Some(EntityDomain::MediaPlayer),
            "scene" => Some(EntityDomain::Scene),
            _ => None,
        }
    }
}

impl fmt::Display for EntityDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check a resolved entity id against the allow-list.
///
/// The domain is the prefix before the first `.` in the controller's
/// addressing scheme (`light.kitchen_lights`).
pub fn permitted_domain(entity_id: &str) -> Result<EntityDomain, ResolutionError> {
    let prefix = entity_id.split('.').next().unwrap_or_default();
    EntityDomain::parse(prefix).ok_or_else(|| ResolutionError::DomainNotPermitted {
        domain: prefix.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_domains_pass() {
        assert_eq!(
            permitted_domain("light.living_room_lights").unwrap(),
            EntityDomain::Light
        );
        assert_eq!(
            permitted_domain("climate.main_thermostat").unwrap(),
            EntityDomain::Climate
        );
        assert_eq!(permitted_domain("lock.front_door").unwrap(), EntityDomain::Lock);
        assert_eq!(
            permitted_domain("media_player.spotify").unwrap(),
            EntityDomain::MediaPlayer
        );
        assert_eq!(
            permitted_domain("scene.movie_night").unwrap(),
            EntityDomain::Scene
        );
    }

    #[test]
    fn test_disallowed_domains_fail() {
        for id in [
            "switch.ceiling_fan",
            "camera.front_porch",
            "cover.garage_door",
            "automation.morning_routine",
            "script.panic",
        ] {
            let err = permitted_domain(id).unwrap_err();
            assert!(
                matches!(err, ResolutionError::DomainNotPermitted { .. }),
                "{} should be rejected",
                id
            );
        }
    }

    #[test]
    fn test_malformed_entity_id_fails() {
        assert!(permitted_domain("").is_err());
        assert!(permitted_domain("no_dot_here").is_err());
        assert!(permitted_domain(".leading_dot").is_err());
    }

    #[test]
    fn test_domain_display() {
        assert_eq!(EntityDomain::MediaPlayer.to_string(), "media_player");
        assert_eq!(EntityDomain::ALL.len(), 5);
    }
}
