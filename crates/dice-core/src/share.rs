#![forbid(unsafe_code)]

//! Shareable scene links.
//!
//! A link carries the scene plus a `uiState` sidecar in its fragment:
//!
//! ```text
//! <base>#config=<base64url(deflate(json))>
//! ```
//!
//! A payload that is not valid URL-safe base64, does not inflate, inflates
//! past [`MAX_DECODED_BYTES`], is not JSON, or lacks `particles` /
//! `interactivity` is rejected with [`SceneError::DecodeFailed`] or
//! [`SceneError::ConfigInvalid`].

use std::io::{Read, Write};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chaos::ChaosLevel;
use crate::error::{Result, SceneError};
use crate::scene::{OutModes, SceneConfig, is_valid_configuration};
use crate::state::AppState;

pub const FRAGMENT_PREFIX: &str = "#config=";
const UI_STATE_KEY: &str = "uiState";

/// Upper bound on the inflated payload.
pub const MAX_DECODED_BYTES: u64 = 1024 * 1024;

fn default_true() -> bool {
    true
}

/// UI toggles travelling alongside a shared scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedUiState {
    #[serde(default)]
    pub chaos_level: ChaosLevel,
    #[serde(default = "default_true")]
    pub is_dark_mode: bool,
    #[serde(default)]
    pub is_cursor_particle: bool,
    #[serde(default)]
    pub is_gravity_on: bool,
    #[serde(default)]
    pub are_walls_on: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_out_modes: Option<OutModes>,
}

impl SharedUiState {
    #[must_use]
    pub fn capture(state: &AppState) -> Self {
        Self {
            chaos_level: state.particles.chaos,
            is_dark_mode: state.ui.dark_mode,
            is_cursor_particle: state.ui.cursor_particle_on,
            is_gravity_on: state.ui.gravity_on,
            are_walls_on: state.ui.walls_on,
            original_out_modes: state
                .ui
                .walls_on
                .then_some(state.particles.original_modes.out_modes)
                .flatten(),
        }
    }

    /// Write the sidecar into `state`. The out-mode memory only travels
    /// with walls on.
    pub fn apply_to(&self, state: &mut AppState) {
        state.particles.chaos = self.chaos_level;
        state.ui.dark_mode = self.is_dark_mode;
        state.ui.cursor_particle_on = self.is_cursor_particle;
        state.ui.gravity_on = self.is_gravity_on;
        state.ui.walls_on = self.are_walls_on;
        if self.are_walls_on {
            state.particles.original_modes.out_modes = self.original_out_modes;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SharedScene {
    pub config: SceneConfig,
    pub ui_state: Option<SharedUiState>,
}

impl SharedScene {
    #[must_use]
    pub fn capture(config: SceneConfig, state: &AppState) -> Self {
        Self {
            config,
            ui_state: Some(SharedUiState::capture(state)),
        }
    }

    /// Encode into the URL-safe payload (without the fragment prefix).
    pub fn encode(&self) -> Result<String> {
        let mut value =
            serde_json::to_value(&self.config).map_err(|err| SceneError::invalid(err.to_string()))?;
        if let (Some(ui_state), Some(map)) = (self.ui_state.as_ref(), value.as_object_mut()) {
            let sidecar =
                serde_json::to_value(ui_state).map_err(|err| SceneError::invalid(err.to_string()))?;
            map.insert(UI_STATE_KEY.to_owned(), sidecar);
        }
        let json = serde_json::to_vec(&value).map_err(|err| SceneError::invalid(err.to_string()))?;

        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&json)
            .map_err(|err| SceneError::decode(format!("deflate failed: {err}")))?;
        let compressed = encoder
            .finish()
            .map_err(|err| SceneError::decode(format!("deflate failed: {err}")))?;
        Ok(URL_SAFE_NO_PAD.encode(compressed))
    }

    /// Decode a payload produced by [`SharedScene::encode`].
    pub fn decode(payload: &str) -> Result<Self> {
        let compressed = URL_SAFE_NO_PAD
            .decode(payload.trim().as_bytes())
            .map_err(|err| SceneError::decode(format!("invalid base64: {err}")))?;

        let mut json = Vec::new();
        DeflateDecoder::new(compressed.as_slice())
            .take(MAX_DECODED_BYTES + 1)
            .read_to_end(&mut json)
            .map_err(|err| SceneError::decode(format!("inflate failed: {err}")))?;
        if json.len() as u64 > MAX_DECODED_BYTES {
            return Err(SceneError::decode(format!(
                "payload exceeds {MAX_DECODED_BYTES} bytes"
            )));
        }

        let mut value: Value = serde_json::from_slice(&json)
            .map_err(|err| SceneError::decode(format!("payload is not JSON: {err}")))?;
        if !is_valid_configuration(&value) {
            return Err(SceneError::invalid(
                "shared scene must contain `particles` and `interactivity`",
            ));
        }
        let ui_state = value
            .as_object_mut()
            .and_then(|map| map.remove(UI_STATE_KEY))
            .and_then(|raw| match serde_json::from_value::<SharedUiState>(raw) {
                Ok(ui_state) => Some(ui_state),
                Err(err) => {
                    tracing::debug!(error = %err, "ignoring malformed uiState sidecar");
                    None
                }
            });
        let config = SceneConfig::from_value(value)?;
        Ok(Self { config, ui_state })
    }

    /// Full link: `base_url` with any existing fragment replaced.
    pub fn to_link(&self, base_url: &str) -> Result<String> {
        let base = base_url.split('#').next().unwrap_or(base_url);
        Ok(format!("{base}{FRAGMENT_PREFIX}{}", self.encode()?))
    }
}

/// Payload part of a `#config=` fragment, if `fragment` is one. Accepts a
/// bare fragment or a whole URL.
#[must_use]
pub fn fragment_payload(fragment: &str) -> Option<&str> {
    let hash = fragment.find('#').map_or(fragment, |idx| &fragment[idx..]);
    hash.strip_prefix(FRAGMENT_PREFIX)
        .filter(|payload| !payload.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::OutMode;
    use serde_json::json;

    fn encode_raw(value: &Value) -> String {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(value.to_string().as_bytes()).unwrap();
        URL_SAFE_NO_PAD.encode(encoder.finish().unwrap())
    }

    #[test]
    fn link_round_trip_keeps_scene_and_sidecar() {
        let mut state = AppState::new(ChaosLevel::new(8), false);
        state.ui.walls_on = true;
        state.particles.original_modes.out_modes = Some(OutModes::new(OutMode::Destroy));
        let shared = SharedScene::capture(SceneConfig::default(), &state);

        let link = shared.to_link("https://dice.example/app#old").unwrap();
        assert!(link.starts_with("https://dice.example/app#config="));
        let payload = fragment_payload(&link).unwrap();
        let decoded = SharedScene::decode(payload).unwrap();
        assert_eq!(decoded, shared);

        let mut restored = AppState::default();
        decoded.ui_state.unwrap().apply_to(&mut restored);
        assert_eq!(restored.particles.chaos.get(), 8);
        assert!(!restored.ui.dark_mode);
        assert!(restored.ui.walls_on);
        assert_eq!(
            restored.particles.original_modes.out_modes,
            Some(OutModes::new(OutMode::Destroy))
        );
    }

    #[test]
    fn out_modes_only_travel_with_walls() {
        let mut state = AppState::default();
        state.particles.original_modes.out_modes = Some(OutModes::new(OutMode::Split));
        let sidecar = SharedUiState::capture(&state);
        assert!(sidecar.original_out_modes.is_none());
        let value = serde_json::to_value(sidecar).unwrap();
        assert!(value.get("originalOutModes").is_none());
        assert_eq!(value["chaosLevel"], json!(5));
    }

    #[test]
    fn sidecar_defaults_when_fields_missing() {
        let sidecar: SharedUiState = serde_json::from_value(json!({})).unwrap();
        assert_eq!(sidecar.chaos_level, ChaosLevel::NEUTRAL);
        assert!(sidecar.is_dark_mode);
        assert!(!sidecar.are_walls_on);
    }

    #[test]
    fn rejects_bad_base64() {
        let err = SharedScene::decode("not base64 !!").unwrap_err();
        assert_eq!(err.kind(), "decode_failed");
    }

    #[test]
    fn rejects_garbage_deflate_stream() {
        let payload = URL_SAFE_NO_PAD.encode([0xff_u8, 0x00, 0x13, 0x37]);
        let err = SharedScene::decode(&payload).unwrap_err();
        assert_eq!(err.kind(), "decode_failed");
    }

    #[test]
    fn rejects_missing_interactivity() {
        let payload = encode_raw(&json!({ "particles": {} }));
        let err = SharedScene::decode(&payload).unwrap_err();
        assert_eq!(err.kind(), "config_invalid");
    }

    #[test]
    fn rejects_oversized_payload() {
        let padding = "x".repeat(MAX_DECODED_BYTES as usize + 16);
        let payload = encode_raw(&json!({ "particles": {}, "interactivity": {}, "pad": padding }));
        let err = SharedScene::decode(&payload).unwrap_err();
        assert_eq!(err.kind(), "decode_failed");
    }

    #[test]
    fn malformed_sidecar_is_dropped() {
        let payload = encode_raw(&json!({
            "particles": {},
            "interactivity": {},
            "uiState": "loud"
        }));
        let decoded = SharedScene::decode(&payload).unwrap();
        assert!(decoded.ui_state.is_none());
    }

    #[test]
    fn fragment_payload_matches_prefix_only() {
        assert_eq!(fragment_payload("#config=abc"), Some("abc"));
        assert_eq!(fragment_payload("https://x.test/#config=abc"), Some("abc"));
        assert_eq!(fragment_payload("#config="), None);
        assert_eq!(fragment_payload("#other=abc"), None);
        assert_eq!(fragment_payload(""), None);
    }
}
