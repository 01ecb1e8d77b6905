//! ControllerClient - single-attempt dispatch to the home-automation controller

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use shared::{
    ControllerConfig, DispatchResult, ErrorKind, IntentKind, ResolvedEntities, Result, VestaError,
};
use std::fmt;
use std::time::Duration;

/// Sends one actuation attempt for a resolved command.
///
/// The trait seam exists so the pipeline can be exercised without a live
/// controller; the HTTP client below is the production implementation.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(&self, resolved: &ResolvedEntities) -> DispatchResult;
}

/// HTTP client for the controller's REST service surface
#[derive(Clone)]
pub struct ControllerClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ControllerClient {
    /// Build a client with the configured request timeout.
    ///
    /// The bearer token arrives separately from the config because it is
    /// sourced from the environment, not the config file.
    pub fn new(config: &ControllerConfig, token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VestaError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

// Manual Debug: the bearer token must never reach a log line
impl fmt::Debug for ControllerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Controller service route (domain, service) implied by an intent
fn service_route(intent: IntentKind) -> Option<(&'static str, &'static str)> {
    match intent {
        IntentKind::TurnOnLight => Some(("light", "turn_on")),
        IntentKind::TurnOffLight => Some(("light", "turn_off")),
        IntentKind::ToggleLight => Some(("light", "toggle")),
        // Brightness rides on turn_on in the controller's service model
        IntentKind::SetBrightness => Some(("light", "turn_on")),
        IntentKind::SetTemperature => Some(("climate", "set_temperature")),
        IntentKind::PlayMedia => Some(("media_player", "play_media")),
        IntentKind::StopMedia => Some(("media_player", "media_stop")),
        IntentKind::ActivateScene => Some(("scene", "turn_on")),
        IntentKind::LockDoor => Some(("lock", "lock")),
        IntentKind::UnlockDoor => Some(("lock", "unlock")),
        IntentKind::Unknown => None,
    }
}

/// JSON body for the service call
fn request_body(resolved: &ResolvedEntities) -> Value {
    let mut body = serde_json::Map::new();
    body.insert("entity_id".to_string(), json!(resolved.entity_id));

    for (name, value) in &resolved.numeric_params {
        body.insert(name.clone(), json!(value));
    }

    if resolved.intent == IntentKind::PlayMedia {
        body.insert(
            "media_content_id".to_string(),
            json!(resolved.media_query.clone().unwrap_or_default()),
        );
        body.insert("media_content_type".to_string(), json!("music"));
    }

    Value::Object(body)
}

#[async_trait]
impl Dispatch for ControllerClient {
    /// Exactly one outbound attempt per call. Every failure mode maps to a
    /// closed `ErrorKind`; nothing is retried and nothing panics.
    async fn dispatch(&self, resolved: &ResolvedEntities) -> DispatchResult {
        let Some((domain, service)) = service_route(resolved.intent) else {
            return DispatchResult::not_actionable();
        };

        let url = format!("{}/api/services/{}/{}", self.base_url, domain, service);
        let body = request_body(resolved);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await;

        match response {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    DispatchResult::ok(
                        resolved.intent,
                        &resolved.entity_id,
                        format!(
                            "Successfully executed {} on {}",
                            resolved.intent, resolved.entity_id
                        ),
                    )
                } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                    DispatchResult::failed(
                        resolved.intent,
                        &resolved.entity_id,
                        ErrorKind::ControllerAuthFailure,
                    )
                } else {
                    // The controller's error body is dropped here on purpose.
                    DispatchResult::failed(
                        resolved.intent,
                        &resolved.entity_id,
                        ErrorKind::ControllerRejected,
                    )
                }
            }
            Err(e) if e.is_timeout() => DispatchResult::failed(
                resolved.intent,
                &resolved.entity_id,
                ErrorKind::ControllerTimeout,
            ),
            Err(_) => DispatchResult::failed(
                resolved.intent,
                &resolved.entity_id,
                ErrorKind::ControllerUnreachable,
            ),
        }
    }
}
