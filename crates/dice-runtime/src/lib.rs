#![forbid(unsafe_code)]

//! Dice Runtime
//!
//! The asynchronous side of the particle dice: the [`Studio`] context that
//! loads scenes into a rendering engine and recovers from rejected ones,
//! undoable [`SceneCommand`]s, and the [`HistoryManager`] that runs them.
//!
//! # Key Components
//!
//! - [`Studio`] - Owns the state, storage, engine handle and notifier
//! - [`SceneCommand`] - Shuffle, toggle, theme and caller-defined commands
//! - [`HistoryManager`] - Undo/redo stacks with shuffle deduplication
//! - [`RenderEngine`] - Seam to the particle renderer
//! - [`HeadlessEngine`] - In-memory engine with failure injection
//! - [`Notifier`] - Announcements, toasts and UI resync requests
//!
//! # Concurrency
//! Everything runs on one cooperative thread. Futures are not `Send` and
//! hold `&mut Studio` across their awaits, so two operations can never
//! interleave.

pub mod command;
pub mod engine;
pub mod headless;
pub mod history;
pub mod logging;
pub mod notify;
pub mod studio;

pub use command::{
    CommandError, CommandFuture, CustomCommand, SceneCommand, ShuffleCommand, ThemeCommand,
    ToggleCommand,
};
pub use engine::{EngineError, EngineHandle, LoadFuture, RenderEngine};
pub use headless::{EngineProbe, HandleEvent, HeadlessEngine};
pub use history::{ExecuteOutcome, HistoryManager};
pub use logging::{LogFormat, install_subscriber, try_install};
pub use notify::{Notice, NoticeFeed, Notifier, RecordingNotifier, TracingNotifier};
pub use studio::{BootSource, LoadOutcome, Studio};
