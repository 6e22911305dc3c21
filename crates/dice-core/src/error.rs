#![forbid(unsafe_code)]

//! Error taxonomy shared by every layer of the dice.
//!
//! None of these errors is fatal to the process. The studio decides per
//! variant whether to fall back silently, recover through the rendering
//! engine, or tell the user:
//!
//! | variant            | handling                                              |
//! |--------------------|-------------------------------------------------------|
//! | `ConfigInvalid`    | discard input, keep last-known-good or build fresh    |
//! | `DecodeFailed`     | discard shared link, fall back to storage or fresh    |
//! | `EngineLoadFailed` | reload previous configuration, then notify            |
//! | `StorageFailed`    | swallowed after switching to the in-memory fallback   |

use thiserror::Error;

use crate::storage::StorageError;

pub type Result<T> = std::result::Result<T, SceneError>;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid scene configuration: {reason}")]
    ConfigInvalid { reason: String },

    #[error("rendering engine rejected the configuration: {0}")]
    EngineLoadFailed(String),

    #[error("storage operation failed: {0}")]
    StorageFailed(#[from] StorageError),

    #[error("shared link could not be decoded: {0}")]
    DecodeFailed(String),
}

impl SceneError {
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::DecodeFailed(reason.into())
    }

    /// Stable short name used as the telemetry event kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ConfigInvalid { .. } => "config_invalid",
            Self::EngineLoadFailed(_) => "engine_load_failed",
            Self::StorageFailed(_) => "storage_failed",
            Self::DecodeFailed(_) => "decode_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SceneError;
    use crate::storage::StorageError;

    #[test]
    fn invalid_constructor_keeps_reason() {
        let error = SceneError::invalid("missing interactivity");
        assert_eq!(
            error.to_string(),
            "invalid scene configuration: missing interactivity"
        );
        assert_eq!(error.kind(), "config_invalid");
    }

    #[test]
    fn storage_errors_convert() {
        let error: SceneError = StorageError::Unavailable.into();
        assert_eq!(error.kind(), "storage_failed");
        assert!(error.to_string().contains("storage"));
    }
}
