#![forbid(unsafe_code)]

//! Undoable scene commands.
//!
//! A command carries everything it needs to replay itself: the shuffle keeps
//! the scene it replaced and, once executed, the scene it produced; the
//! theme flip keeps the particle color it picked for each theme.
//!
//! # Invariants
//!
//! - `execute()` followed by `undo()` restores the prior scene and toggles
//! - A redo after an undo reloads the cached result without drawing new
//!   randomness
//! - A command whose load is rejected leaves the toggle flags and mode
//!   memory as they were before it ran

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use dice_core::assembly::{ShuffleScope, recolor_for_theme};
use dice_core::{AppState, SceneConfig, SceneError, StateAction, ToggleKey, ToggleSnapshot};
use thiserror::Error;

use crate::studio::Studio;

/// Future returned by [`CustomCommand`] methods.
pub type CommandFuture<'a> = Pin<Box<dyn Future<Output = Result<(), CommandError>> + 'a>>;

#[derive(Debug, Error)]
pub enum CommandError {
    /// The engine rejected the scene this command tried to load.
    #[error("`{description}` could not load its scene")]
    LoadRejected { description: String },
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("{0}")]
    Custom(String),
}

impl CommandError {
    fn rejected(description: &str) -> Self {
        Self::LoadRejected {
            description: description.to_owned(),
        }
    }
}

/// A caller-defined undoable command.
pub trait CustomCommand {
    fn description(&self) -> &str;
    fn execute<'a>(&'a mut self, studio: &'a mut Studio) -> CommandFuture<'a>;
    fn undo<'a>(&'a mut self, studio: &'a mut Studio) -> CommandFuture<'a>;
}

/// Every command the history manager knows how to run.
pub enum SceneCommand {
    Shuffle(ShuffleCommand),
    Toggle(ToggleCommand),
    Theme(ThemeCommand),
    Custom(Box<dyn CustomCommand>),
}

impl fmt::Debug for SceneCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shuffle(cmd) => f.debug_tuple("Shuffle").field(cmd).finish(),
            Self::Toggle(cmd) => f.debug_tuple("Toggle").field(cmd).finish(),
            Self::Theme(cmd) => f.debug_tuple("Theme").field(cmd).finish(),
            Self::Custom(cmd) => f.debug_tuple("Custom").field(&cmd.description()).finish(),
        }
    }
}

impl SceneCommand {
    #[must_use]
    pub fn shuffle(scope: ShuffleScope, state: &AppState) -> Self {
        Self::Shuffle(ShuffleCommand::new(scope, state))
    }

    #[must_use]
    pub fn toggle(key: ToggleKey) -> Self {
        Self::Toggle(ToggleCommand::new(key))
    }

    #[must_use]
    pub fn theme() -> Self {
        Self::Theme(ThemeCommand::new())
    }

    #[must_use]
    pub fn custom(command: impl CustomCommand + 'static) -> Self {
        Self::Custom(Box::new(command))
    }

    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Shuffle(cmd) => &cmd.description,
            Self::Toggle(cmd) => &cmd.description,
            Self::Theme(_) => ThemeCommand::DESCRIPTION,
            Self::Custom(cmd) => cmd.description(),
        }
    }

    /// The scene a shuffle produced or prepared.
    #[must_use]
    pub fn shuffle_result(&self) -> Option<&SceneConfig> {
        match self {
            Self::Shuffle(cmd) => cmd.after.as_ref().map(|after| &after.config),
            _ => None,
        }
    }

    /// Do the synchronous part of a first execute. Only shuffles have one.
    pub fn prepare(&mut self, studio: &mut Studio) {
        if let Self::Shuffle(cmd) = self {
            cmd.prepare(studio);
        }
    }

    /// Roll back [`SceneCommand::prepare`] for a command that will not run.
    pub fn discard(&mut self, studio: &mut Studio) {
        if let Self::Shuffle(cmd) = self {
            cmd.discard(studio);
        }
    }

    pub async fn execute(&mut self, studio: &mut Studio) -> Result<(), CommandError> {
        match self {
            Self::Shuffle(cmd) => cmd.execute(studio).await,
            Self::Toggle(cmd) => cmd.execute(studio).await,
            Self::Theme(cmd) => cmd.flip(studio).await,
            Self::Custom(cmd) => cmd.execute(studio).await,
        }
    }

    pub async fn undo(&mut self, studio: &mut Studio) -> Result<(), CommandError> {
        match self {
            Self::Shuffle(cmd) => cmd.undo(studio).await,
            Self::Toggle(cmd) => cmd.execute(studio).await,
            Self::Theme(cmd) => cmd.flip(studio).await,
            Self::Custom(cmd) => cmd.undo(studio).await,
        }
    }
}

// ============================================================================
// Shuffle
// ============================================================================

#[derive(Debug, Clone)]
struct ShuffleResult {
    config: SceneConfig,
    toggles: ToggleSnapshot,
}

/// Regenerates one scope of the scene.
#[derive(Debug, Clone)]
pub struct ShuffleCommand {
    scope: ShuffleScope,
    description: String,
    before_config: Option<SceneConfig>,
    before_toggles: ToggleSnapshot,
    after: Option<ShuffleResult>,
    /// Set once the prepared scene has been loaded.
    applied: bool,
}

impl ShuffleCommand {
    #[must_use]
    pub fn new(scope: ShuffleScope, state: &AppState) -> Self {
        Self {
            scope,
            description: format!("{scope} shuffle"),
            before_config: state.particles.current.clone(),
            before_toggles: ToggleSnapshot::capture(state),
            after: None,
            applied: false,
        }
    }

    #[must_use]
    pub const fn scope(&self) -> ShuffleScope {
        self.scope
    }

    /// Build the scene this shuffle will load, without loading it.
    ///
    /// Only the first call builds; the result is kept for every later
    /// execute. Assembly updates the mode memory, so a prepared shuffle that
    /// is then discarded must be dropped with [`ShuffleCommand::discard`].
    pub fn prepare(&mut self, studio: &mut Studio) {
        if self.after.is_some() {
            return;
        }
        let config = studio.build_configuration(self.scope);
        self.after = Some(ShuffleResult {
            config,
            toggles: ToggleSnapshot::capture(studio.state()),
        });
    }

    /// Undo the state changes of [`ShuffleCommand::prepare`].
    pub fn discard(&mut self, studio: &mut Studio) {
        if !self.applied {
            self.before_toggles.restore(studio.state_mut());
            self.after = None;
        }
    }

    async fn execute(&mut self, studio: &mut Studio) -> Result<(), CommandError> {
        let redo = self.applied;
        self.prepare(studio);
        let Some(after) = self.after.clone() else {
            return Err(CommandError::rejected(&self.description));
        };
        if redo {
            after.toggles.restore(studio.state_mut());
            studio.toast_and_announce(&format!("Redid {} shuffle", self.scope));
        }

        if !studio.load_configuration(after.config).await.is_loaded() {
            self.before_toggles.restore(studio.state_mut());
            if !redo {
                self.after = None;
            }
            return Err(CommandError::rejected(&self.description));
        }
        self.applied = true;
        studio.announce("New scene generated.");
        Ok(())
    }

    async fn undo(&mut self, studio: &mut Studio) -> Result<(), CommandError> {
        self.before_toggles.restore(studio.state_mut());
        match self.before_config.clone() {
            Some(config) => {
                if !studio.load_configuration(config).await.is_loaded() {
                    if let Some(after) = self.after.as_ref() {
                        after.toggles.restore(studio.state_mut());
                    }
                    return Err(CommandError::rejected(&self.description));
                }
            }
            None => studio.clear_scene(),
        }
        studio.toast_and_announce(&format!("Undid {} shuffle", self.scope));
        Ok(())
    }
}

// ============================================================================
// Toggle
// ============================================================================

/// Flips gravity, walls or the cursor particle on the live scene.
#[derive(Debug, Clone)]
pub struct ToggleCommand {
    key: ToggleKey,
    description: String,
}

impl ToggleCommand {
    #[must_use]
    pub fn new(key: ToggleKey) -> Self {
        Self {
            key,
            description: format!("Toggle {}", key.label().to_lowercase()),
        }
    }

    #[must_use]
    pub const fn key(&self) -> ToggleKey {
        self.key
    }

    /// Flip the flag and apply it. Running this twice is the identity.
    async fn execute(&mut self, studio: &mut Studio) -> Result<(), CommandError> {
        let snapshot = ToggleSnapshot::capture(studio.state());
        let enabled = studio.state_mut().flip(self.key);

        if let Some(mut config) = studio.state().particles.current.clone() {
            studio.apply_toggle_to(&mut config, self.key);
            if !studio.load_configuration(config).await.is_loaded() {
                snapshot.restore(studio.state_mut());
                return Err(CommandError::rejected(&self.description));
            }
        } else {
            studio.sync_ui();
        }

        let verb = if enabled { "enabled" } else { "disabled" };
        studio.announce(&format!("{} {verb}", self.key.label()));
        Ok(())
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Switches between the dark and light themes.
///
/// The particle color shown under each theme is cached the first time the
/// command sees it, so flipping back restores the exact same scene.
#[derive(Debug, Clone, Default)]
pub struct ThemeCommand {
    dark_color: Option<String>,
    light_color: Option<String>,
}

impl ThemeCommand {
    pub const DESCRIPTION: &'static str = "Toggle theme";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, dark_mode: bool) -> &mut Option<String> {
        if dark_mode {
            &mut self.dark_color
        } else {
            &mut self.light_color
        }
    }

    async fn flip(&mut self, studio: &mut Studio) -> Result<(), CommandError> {
        let from_dark = studio.state().ui.dark_mode;
        let to_dark = !from_dark;
        let current = studio.state().particles.current.clone();

        if let Some(config) = current.as_ref() {
            let outgoing = self.slot(from_dark);
            if outgoing.is_none() {
                *outgoing = Some(config.particles.appearance.color.value.clone());
            }
        }
        let cached = self.slot(to_dark).clone();
        let color = match cached {
            Some(color) => color,
            None => {
                let picked = studio.pick_particle_color(to_dark);
                *self.slot(to_dark) = Some(picked.clone());
                picked
            }
        };

        studio.state_mut().reduce(StateAction::SetTheme(to_dark))?;
        studio.persist();

        if let Some(mut config) = current {
            recolor_for_theme(&mut config, to_dark, &color);
            if !studio.load_configuration(config).await.is_loaded() {
                studio.state_mut().reduce(StateAction::SetTheme(from_dark))?;
                studio.persist();
                studio.sync_ui();
                return Err(CommandError::rejected(Self::DESCRIPTION));
            }
        } else {
            studio.sync_ui();
        }

        studio.announce(if to_dark {
            "Dark theme enabled"
        } else {
            "Light theme enabled"
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{EngineProbe, HeadlessEngine};
    use crate::notify::{NoticeFeed, RecordingNotifier};
    use dice_core::SceneRng;
    use dice_core::palette;
    use dice_core::scene::OutMode;
    use pollster::block_on;

    fn loaded_studio(seed: u64) -> (Studio, EngineProbe, NoticeFeed) {
        let engine = HeadlessEngine::new();
        let probe = engine.probe();
        let notifier = RecordingNotifier::new();
        let feed = notifier.feed();
        let mut studio = Studio::new(engine, notifier).with_rng(SceneRng::seeded(seed));
        let config = studio.build_configuration(ShuffleScope::All);
        assert!(block_on(studio.load_configuration(config)).is_loaded());
        feed.clear();
        (studio, probe, feed)
    }

    #[test]
    fn shuffle_undo_restores_previous_scene() {
        let (mut studio, probe, feed) = loaded_studio(3);
        let before = studio.state().particles.current.clone();

        let mut cmd = SceneCommand::shuffle(ShuffleScope::Movement, studio.state());
        block_on(cmd.execute(&mut studio)).unwrap();
        assert_eq!(feed.announcements(), vec!["New scene generated.".to_owned()]);
        assert!(cmd.shuffle_result().is_some());

        block_on(cmd.undo(&mut studio)).unwrap();
        assert_eq!(studio.state().particles.current, before);
        assert_eq!(probe.last_loaded(), before);
        assert_eq!(feed.toasts(), vec!["Undid Movement shuffle".to_owned()]);
    }

    #[test]
    fn shuffle_undo_from_empty_clears_scene() {
        let engine = HeadlessEngine::new();
        let probe = engine.probe();
        let mut studio =
            Studio::new(engine, RecordingNotifier::new()).with_rng(SceneRng::seeded(8));

        let mut cmd = SceneCommand::shuffle(ShuffleScope::All, studio.state());
        block_on(cmd.execute(&mut studio)).unwrap();
        assert!(studio.has_engine_handle());

        block_on(cmd.undo(&mut studio)).unwrap();
        assert!(!studio.state().has_scene());
        assert!(!studio.has_engine_handle());
        assert_eq!(
            probe.handle_events(),
            vec![crate::headless::HandleEvent::Destroyed(1)]
        );
    }

    #[test]
    fn rejected_shuffle_keeps_toggles() {
        let (mut studio, probe, _feed) = loaded_studio(5);
        studio.state_mut().ui.walls_on = true;
        let before = ToggleSnapshot::capture(studio.state());

        probe.fail_next(1);
        let mut cmd = SceneCommand::shuffle(ShuffleScope::All, studio.state());
        let err = block_on(cmd.execute(&mut studio)).unwrap_err();
        assert!(matches!(err, CommandError::LoadRejected { .. }));
        assert_eq!(ToggleSnapshot::capture(studio.state()), before);
        assert!(cmd.shuffle_result().is_none());
    }

    #[test]
    fn toggle_twice_is_identity() {
        let (mut studio, _probe, feed) = loaded_studio(11);
        let before = studio.state().clone();

        let mut cmd = SceneCommand::toggle(ToggleKey::Walls);
        block_on(cmd.execute(&mut studio)).unwrap();
        assert_eq!(
            studio.state().particles.current.as_ref().unwrap().out_mode(),
            OutMode::Bounce
        );
        block_on(cmd.undo(&mut studio)).unwrap();

        assert_eq!(studio.state().particles.current, before.particles.current);
        assert_eq!(studio.state().ui, before.ui);
        assert_eq!(
            feed.announcements(),
            vec!["Walls enabled".to_owned(), "Walls disabled".to_owned()]
        );
    }

    #[test]
    fn rejected_toggle_reverts_flag() {
        let (mut studio, probe, _feed) = loaded_studio(12);
        probe.fail_next(1);
        let mut cmd = SceneCommand::toggle(ToggleKey::Gravity);
        assert!(block_on(cmd.execute(&mut studio)).is_err());
        assert!(!studio.state().ui.gravity_on);
        assert!(studio.state().particles.original_modes.out_modes.is_none());
    }

    #[test]
    fn theme_flip_is_an_involution() {
        let (mut studio, _probe, feed) = loaded_studio(21);
        let before = studio.state().particles.current.clone();

        let mut cmd = SceneCommand::theme();
        block_on(cmd.execute(&mut studio)).unwrap();
        assert!(!studio.state().ui.dark_mode);
        let light = studio.state().particles.current.clone().unwrap();
        assert_eq!(
            light.background.color.value,
            palette::background_color(false)
        );

        block_on(cmd.undo(&mut studio)).unwrap();
        assert!(studio.state().ui.dark_mode);
        assert_eq!(studio.state().particles.current, before);

        block_on(cmd.execute(&mut studio)).unwrap();
        assert_eq!(studio.state().particles.current.as_ref(), Some(&light));
        assert_eq!(
            feed.announcements(),
            vec![
                "Light theme enabled".to_owned(),
                "Dark theme enabled".to_owned(),
                "Light theme enabled".to_owned()
            ]
        );
    }

    #[test]
    fn descriptions() {
        let state = AppState::default();
        assert_eq!(
            SceneCommand::shuffle(ShuffleScope::Fx, &state).description(),
            "Special FX shuffle"
        );
        assert_eq!(
            SceneCommand::toggle(ToggleKey::CursorParticle).description(),
            "Toggle cursor particle"
        );
        assert_eq!(SceneCommand::theme().description(), "Toggle theme");
    }
}
