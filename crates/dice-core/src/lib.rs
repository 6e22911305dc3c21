#![forbid(unsafe_code)]

//! Dice Core
//!
//! Synchronous building blocks of the particle-scene dice: the typed scene
//! model, the chaos-scaled generator, the application state store, toggle
//! overrides, scene assembly, storage, shareable links, settings and
//! telemetry.
//!
//! # Key Components
//!
//! - [`SceneConfig`] - Typed scene description as the rendering engine reads it
//! - [`SceneGenerator`] - Produces one scene section at a time from a [`SceneRng`]
//! - [`AppState`] - UI toggles, chaos level and the live scene
//! - [`build_configuration`] - Merges generator output into the live scene
//! - [`SafeStorage`] - Durable storage that falls back to memory
//! - [`SharedScene`] - `#config=` link codec
//!
//! # Role
//! `dice-core` never awaits and never talks to the rendering engine. The
//! `dice-runtime` crate drives it through commands and the history manager.

pub mod assembly;
pub mod chaos;
pub mod error;
pub mod generator;
pub mod palette;
pub mod random;
pub mod scene;
pub mod settings;
pub mod share;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod toggles;

pub use assembly::{ShuffleScope, build_configuration, recolor_for_theme};
pub use chaos::ChaosLevel;
pub use error::{Result, SceneError};
pub use generator::{GenerationParams, SceneGenerator};
pub use random::{SceneRng, scaled_probability};
pub use scene::{SceneConfig, is_valid_configuration};
pub use settings::{DiceSettings, SettingsError};
pub use share::{SharedScene, SharedUiState};
pub use state::{AppState, StateAction, ToggleKey, ToggleSnapshot};
pub use storage::{FileStorage, MemoryStorage, SafeStorage, StorageBackend, StorageError};
pub use telemetry::Telemetry;
