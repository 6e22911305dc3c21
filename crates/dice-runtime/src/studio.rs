#![forbid(unsafe_code)]

//! The studio: application state plus everything that talks to the outside.
//!
//! A [`Studio`] owns the [`AppState`], durable storage, settings, telemetry,
//! the random source, the rendering engine with its live handle, and the
//! notifier. Commands and the history manager borrow it mutably for the
//! duration of one operation, which is what keeps operations from
//! interleaving.
//!
//! # Loading and recovery
//!
//! ```text
//! load(candidate)
//!   ├─ ok ───────────────────────────────► Loaded
//!   └─ err ─┬─ previous scene? ─ reload ─┬─ ok ─► Recovered  "Config error - restored previous state"
//!           │                            └─ err ► Failed     "Failed to load particles - please refresh"
//!           └─ none ──────────────────────────────► Failed     "Failed to load particle configuration"
//! ```
//!
//! The store never keeps pointing at a candidate the engine rejected.

use std::fmt;

use dice_core::assembly::{self, ShuffleScope};
use dice_core::palette;
use dice_core::share::{SharedScene, fragment_payload};
use dice_core::storage::{LAST_CONFIG_KEY, persist_state, restore_state};
use dice_core::toggles::apply_toggle;
use dice_core::{
    AppState, ChaosLevel, DiceSettings, SafeStorage, SceneConfig, SceneError, SceneRng,
    StateAction, Telemetry,
};
use serde_json::json;

use crate::engine::{EngineHandle, RenderEngine};
use crate::notify::Notifier;

pub const RECOVERED_MESSAGE: &str = "Config error - restored previous state";
pub const RECOVERY_FAILED_MESSAGE: &str = "Failed to load particles - please refresh";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load particle configuration";
pub const REFRESHED_TOAST: &str = "Scene refreshed!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum LoadOutcome {
    /// The candidate is running.
    Loaded,
    /// The candidate was rejected and the previous scene is running again.
    Recovered,
    /// Nothing could be loaded.
    Failed,
}

impl LoadOutcome {
    pub const fn is_loaded(self) -> bool {
        matches!(self, Self::Loaded)
    }
}

/// Where the scene loaded at boot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootSource {
    SharedLink,
    Storage,
    Fresh,
}

pub struct Studio {
    state: AppState,
    storage: SafeStorage,
    settings: DiceSettings,
    telemetry: Telemetry,
    rng: SceneRng,
    engine: Box<dyn RenderEngine>,
    handle: Option<Box<dyn EngineHandle>>,
    notifier: Box<dyn Notifier>,
}

impl fmt::Debug for Studio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Studio")
            .field("state", &self.state)
            .field("storage", &self.storage)
            .field("settings", &self.settings)
            .field("telemetry_events", &self.telemetry.len())
            .field("has_handle", &self.handle.is_some())
            .finish()
    }
}

impl Studio {
    pub fn new(engine: impl RenderEngine + 'static, notifier: impl Notifier + 'static) -> Self {
        let settings = DiceSettings::default();
        Self {
            state: AppState::new(settings.defaults.chaos_level, settings.defaults.dark_mode),
            storage: SafeStorage::memory_only(),
            settings,
            telemetry: Telemetry::new(),
            rng: SceneRng::from_os_rng(),
            engine: Box::new(engine),
            handle: None,
            notifier: Box::new(notifier),
        }
    }

    /// Replace the settings and reset the state to their startup defaults.
    #[must_use]
    pub fn with_settings(mut self, settings: DiceSettings) -> Self {
        self.state = AppState::new(settings.defaults.chaos_level, settings.defaults.dark_mode);
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_storage(mut self, storage: SafeStorage) -> Self {
        self.storage = storage;
        self
    }

    #[must_use]
    pub fn with_rng(mut self, rng: SceneRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = SceneRng::seeded(seed);
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    #[must_use]
    pub fn settings(&self) -> &DiceSettings {
        &self.settings
    }

    #[must_use]
    pub fn storage(&self) -> &SafeStorage {
        &self.storage
    }

    #[must_use]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn telemetry_mut(&mut self) -> &mut Telemetry {
        &mut self.telemetry
    }

    #[must_use]
    pub fn has_engine_handle(&self) -> bool {
        self.handle.is_some()
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub fn announce(&mut self, message: &str) {
        self.notifier.announce(message);
    }

    pub fn toast(&mut self, message: &str) {
        self.notifier.toast(message);
    }

    pub fn toast_and_announce(&mut self, message: &str) {
        self.notifier.toast(message);
        self.notifier.announce(message);
    }

    pub fn sync_ui(&mut self) {
        self.notifier.sync_ui(&self.state);
    }

    // ------------------------------------------------------------------
    // Scene assembly
    // ------------------------------------------------------------------

    /// Build the next scene for `scope` without loading it.
    pub fn build_configuration(&mut self, scope: ShuffleScope) -> SceneConfig {
        let config =
            assembly::build_configuration(&mut self.state, &mut self.rng, &self.settings, scope);
        self.telemetry.log(
            "config_built",
            json!({
                "scope": scope.label(),
                "chaos": self.state.particles.chaos.get(),
                "count": config.particles.number.value,
            }),
        );
        config
    }

    /// Apply the override for `key` at its current flag value to `config`.
    pub fn apply_toggle_to(&mut self, config: &mut SceneConfig, key: dice_core::ToggleKey) {
        let enabled = self.state.toggle(key);
        apply_toggle(
            config,
            key,
            enabled,
            &mut self.state.particles.original_modes,
            &self.settings,
        );
    }

    /// A palette color for the given theme.
    pub fn pick_particle_color(&mut self, dark_mode: bool) -> String {
        (*self.rng.pick(palette::color_palette(dark_mode))).to_owned()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Best-effort write of theme, chaos and the current scene.
    pub fn persist(&mut self) {
        let durable = persist_state(&mut self.storage, &self.state);
        if !durable && !self.storage.using_fallback() {
            self.telemetry
                .log("storage_fallback", json!({ "reason": "backend write failed" }));
        }
    }

    // ------------------------------------------------------------------
    // Engine
    // ------------------------------------------------------------------

    /// Load `config` into the engine, recovering the previous scene on
    /// failure.
    pub async fn load_configuration(&mut self, config: SceneConfig) -> LoadOutcome {
        let previous = self.state.particles.current.replace(config.clone());
        self.persist();

        let attempt = self
            .engine
            .load(&self.settings.engine.container_id, &config)
            .await;
        let err = match attempt {
            Ok(handle) => {
                self.handle = Some(handle);
                self.state.ui.paused = false;
                self.telemetry.log(
                    "config_loaded",
                    json!({ "count": config.particles.number.value }),
                );
                self.sync_ui();
                return LoadOutcome::Loaded;
            }
            Err(err) => err,
        };

        tracing::warn!(error = %err, "engine rejected scene");
        let scene_err = SceneError::EngineLoadFailed(err.to_string());
        self.telemetry
            .log_error(scene_err.kind(), &scene_err, json!({ "stage": "load" }));

        let Some(previous) = previous else {
            self.state.particles.current = None;
            self.storage.remove(LAST_CONFIG_KEY);
            self.toast_and_announce(LOAD_FAILED_MESSAGE);
            return LoadOutcome::Failed;
        };

        self.state.particles.current = Some(previous.clone());
        self.persist();
        let retry = self
            .engine
            .load(&self.settings.engine.container_id, &previous)
            .await;
        match retry {
            Ok(handle) => {
                self.handle = Some(handle);
                self.state.ui.paused = false;
                self.telemetry.log("config_recovered", json!({}));
                self.toast_and_announce(RECOVERED_MESSAGE);
                self.sync_ui();
                LoadOutcome::Recovered
            }
            Err(err) => {
                tracing::error!(error = %err, "recovery load failed");
                let scene_err = SceneError::EngineLoadFailed(err.to_string());
                self.telemetry
                    .log_error(scene_err.kind(), &scene_err, json!({ "stage": "recovery" }));
                self.toast_and_announce(RECOVERY_FAILED_MESSAGE);
                LoadOutcome::Failed
            }
        }
    }

    /// Drop the current scene and tear down the running instance.
    pub fn clear_scene(&mut self) {
        self.state.particles.current = None;
        if let Some(mut handle) = self.handle.take() {
            handle.destroy();
        }
        self.storage.remove(LAST_CONFIG_KEY);
        self.sync_ui();
    }

    // ------------------------------------------------------------------
    // Startup
    // ------------------------------------------------------------------

    /// Restore from storage, let a valid shared link override it, fall back
    /// to one fresh build, then load.
    pub async fn boot(&mut self, fragment: Option<&str>) -> BootSource {
        let restored = restore_state(&mut self.storage);
        if let Err(err) = self.state.reduce(StateAction::InitFromStorage(restored)) {
            tracing::warn!(error = %err, "ignoring stored state");
        }
        let mut source = if self.state.has_scene() {
            BootSource::Storage
        } else {
            BootSource::Fresh
        };

        if let Some(payload) = fragment.and_then(fragment_payload) {
            match SharedScene::decode(payload) {
                Ok(shared) => {
                    match shared.ui_state {
                        Some(ui_state) => ui_state.apply_to(&mut self.state),
                        None => {
                            self.state.particles.current = Some(shared.config.clone());
                            self.state.derive_toggles_from_scene();
                        }
                    }
                    self.state.particles.initial_from_link = Some(shared.config.clone());
                    self.state.particles.current = Some(shared.config);
                    source = BootSource::SharedLink;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "discarding shared link");
                    self.telemetry
                        .log_error(err.kind(), &err, json!({ "stage": "boot" }));
                }
            }
        }

        let config = match self.state.particles.current.take() {
            Some(config) => config,
            None => self.build_configuration(ShuffleScope::All),
        };
        tracing::info!(source = ?source, "booting scene");
        self.telemetry
            .log("boot", json!({ "source": format!("{source:?}") }));
        let outcome = self.load_configuration(config).await;
        if !outcome.is_loaded() {
            tracing::warn!(source = ?source, outcome = ?outcome, "boot scene did not load");
            self.telemetry.log(
                "boot_degraded",
                json!({
                    "source": format!("{source:?}"),
                    "outcome": format!("{outcome:?}"),
                }),
            );
        }
        source
    }

    // ------------------------------------------------------------------
    // Other operations
    // ------------------------------------------------------------------

    /// Link carrying the current scene and UI toggles.
    pub fn share_link(&self, base_url: &str) -> Result<String, SceneError> {
        let config = self
            .state
            .particles
            .current
            .clone()
            .ok_or_else(|| SceneError::invalid("no scene loaded to share"))?;
        SharedScene::capture(config, &self.state).to_link(base_url)
    }

    pub fn set_chaos_level(&mut self, level: i64) -> ChaosLevel {
        // SetChaosLevel cannot fail.
        let _ = self.state.reduce(StateAction::SetChaosLevel(level));
        self.persist();
        let chaos = self.state.particles.chaos;
        self.announce(&format!("Chaos level {chaos}"));
        self.sync_ui();
        chaos
    }

    /// Pause or resume the running instance. Without one this is a no-op.
    pub fn toggle_pause(&mut self) -> bool {
        if self.handle.is_none() {
            return self.state.ui.paused;
        }
        self.state.ui.paused = !self.state.ui.paused;
        self.apply_pause();
        self.state.ui.paused
    }

    fn apply_pause(&mut self) {
        let paused = self.state.ui.paused;
        if let Some(handle) = self.handle.as_mut() {
            if paused {
                handle.pause();
            } else {
                handle.play();
            }
        }
        self.announce(if paused {
            "Animation paused"
        } else {
            "Animation resumed"
        });
        self.sync_ui();
    }

    /// Reload the current scene from scratch.
    pub async fn refresh(&mut self) -> Option<LoadOutcome> {
        let config = self.state.particles.current.clone()?;
        let outcome = self.load_configuration(config).await;
        if outcome.is_loaded() {
            self.toast(REFRESHED_TOAST);
            self.announce("Scene refreshed");
        }
        Some(outcome)
    }

    /// Ask the running instance to redraw in place.
    pub fn redraw(&mut self) -> bool {
        match self.handle.as_mut() {
            Some(handle) => {
                handle.refresh();
                true
            }
            None => false,
        }
    }

    /// Apply a state action and carry out its side effects.
    ///
    /// Toggle actions re-impose the override on the live scene and reload
    /// it; the outcome of that load is returned.
    pub async fn dispatch(&mut self, action: StateAction) -> Result<Option<LoadOutcome>, SceneError> {
        let toggle = action.toggle_key();
        let pause = matches!(action, StateAction::TogglePause);
        if pause && self.handle.is_none() {
            return Ok(None);
        }

        let persist = self.state.reduce(action)?;
        if persist {
            self.persist();
        }

        if pause {
            self.apply_pause();
            return Ok(None);
        }
        if let Some(key) = toggle
            && let Some(mut config) = self.state.particles.current.clone()
        {
            self.apply_toggle_to(&mut config, key);
            return Ok(Some(self.load_configuration(config).await));
        }
        self.sync_ui();
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessEngine;
    use crate::notify::RecordingNotifier;
    use dice_core::ToggleKey;
    use dice_core::scene::OutMode;
    use pollster::block_on;

    fn studio() -> (Studio, crate::headless::EngineProbe, crate::notify::NoticeFeed) {
        let engine = HeadlessEngine::new();
        let probe = engine.probe();
        let notifier = RecordingNotifier::new();
        let feed = notifier.feed();
        let studio = Studio::new(engine, notifier).with_rng(SceneRng::seeded(17));
        (studio, probe, feed)
    }

    #[test]
    fn load_success_clears_pause_and_syncs() {
        let (mut studio, probe, feed) = studio();
        studio.state_mut().ui.paused = true;
        let config = studio.build_configuration(ShuffleScope::All);
        assert_eq!(block_on(studio.load_configuration(config.clone())), LoadOutcome::Loaded);
        assert!(!studio.state().ui.paused);
        assert_eq!(studio.state().particles.current.as_ref(), Some(&config));
        assert_eq!(probe.loaded().len(), 1);
        assert_eq!(feed.sync_count(), 1);
    }

    #[test]
    fn failure_without_previous_leaves_store_empty() {
        let (mut studio, probe, feed) = studio();
        probe.fail_next(1);
        let config = studio.build_configuration(ShuffleScope::All);
        assert_eq!(block_on(studio.load_configuration(config)), LoadOutcome::Failed);
        assert!(studio.state().particles.current.is_none());
        assert!(studio.storage().get(LAST_CONFIG_KEY).is_none());
        assert_eq!(feed.count(LOAD_FAILED_MESSAGE), 2);
    }

    #[test]
    #[tracing_test::traced_test]
    fn boot_reports_a_scene_that_did_not_load() {
        let (mut studio, probe, _feed) = studio();
        probe.fail_next(1);
        assert_eq!(block_on(studio.boot(None)), BootSource::Fresh);
        assert_eq!(probe.attempts(), 1);
        assert_eq!(studio.telemetry().count("boot_degraded"), 1);
        assert!(logs_contain("boot scene did not load"));
    }

    #[test]
    fn clean_boot_is_not_degraded() {
        let (mut studio, _probe, _feed) = studio();
        assert_eq!(block_on(studio.boot(None)), BootSource::Fresh);
        assert_eq!(studio.telemetry().count("boot_degraded"), 0);
    }

    #[test]
    fn double_failure_asks_for_refresh() {
        let (mut studio, probe, feed) = studio();
        let first = studio.build_configuration(ShuffleScope::All);
        assert!(block_on(studio.load_configuration(first.clone())).is_loaded());

        probe.fail_next(2);
        let second = studio.build_configuration(ShuffleScope::All);
        assert_eq!(block_on(studio.load_configuration(second)), LoadOutcome::Failed);
        assert_eq!(studio.state().particles.current.as_ref(), Some(&first));
        assert_eq!(feed.toasts(), vec![RECOVERY_FAILED_MESSAGE.to_owned()]);
        assert_eq!(studio.telemetry().count("error:engine_load_failed"), 2);
    }

    #[test]
    fn pause_without_handle_is_noop() {
        let (mut studio, probe, feed) = studio();
        assert!(!studio.toggle_pause());
        assert!(probe.handle_events().is_empty());
        assert!(feed.announcements().is_empty());
    }

    #[test]
    fn pause_round_trip_drives_handle() {
        let (mut studio, probe, feed) = studio();
        let config = studio.build_configuration(ShuffleScope::All);
        let _ = block_on(studio.load_configuration(config));
        assert!(studio.toggle_pause());
        assert!(!studio.toggle_pause());
        assert_eq!(
            probe.handle_events(),
            vec![
                crate::headless::HandleEvent::Paused(1),
                crate::headless::HandleEvent::Played(1)
            ]
        );
        assert_eq!(
            feed.announcements(),
            vec!["Animation paused".to_owned(), "Animation resumed".to_owned()]
        );
    }

    #[test]
    fn chaos_is_clamped_persisted_and_announced() {
        let (mut studio, _probe, feed) = studio();
        assert_eq!(studio.set_chaos_level(42), ChaosLevel::MAX);
        assert_eq!(
            studio.storage().get(dice_core::storage::CHAOS_KEY).as_deref(),
            Some("10")
        );
        assert_eq!(feed.announcements(), vec!["Chaos level 10".to_owned()]);
    }

    #[test]
    fn refresh_reloads_and_toasts() {
        let (mut studio, probe, feed) = studio();
        assert_eq!(block_on(studio.refresh()), None);
        let config = studio.build_configuration(ShuffleScope::All);
        let _ = block_on(studio.load_configuration(config));
        assert_eq!(block_on(studio.refresh()), Some(LoadOutcome::Loaded));
        assert_eq!(probe.loaded().len(), 2);
        assert_eq!(feed.toasts(), vec![REFRESHED_TOAST.to_owned()]);
        assert!(studio.redraw());
    }

    #[test]
    fn dispatched_toggle_reloads_scene() {
        let (mut studio, probe, _feed) = studio();
        let config = studio.build_configuration(ShuffleScope::All);
        let _ = block_on(studio.load_configuration(config));

        let outcome = block_on(studio.dispatch(StateAction::ToggleWalls)).unwrap();
        assert_eq!(outcome, Some(LoadOutcome::Loaded));
        assert!(studio.state().toggle(ToggleKey::Walls));
        assert_eq!(probe.last_loaded().unwrap().out_mode(), OutMode::Bounce);
    }

    #[test]
    fn dispatch_rejects_invalid_config() {
        let (mut studio, _probe, _feed) = studio();
        let err = block_on(studio.dispatch(StateAction::SetConfig(json!({}))))
            .unwrap_err();
        assert_eq!(err.kind(), "config_invalid");
    }

    #[test]
    fn share_link_requires_scene() {
        let (mut studio, _probe, _feed) = studio();
        assert!(studio.share_link("https://dice.test/").is_err());
        let config = studio.build_configuration(ShuffleScope::All);
        let _ = block_on(studio.load_configuration(config));
        let link = studio.share_link("https://dice.test/").unwrap();
        assert!(link.starts_with("https://dice.test/#config="));
    }
}
