#![forbid(unsafe_code)]

//! User-facing notification seam.
//!
//! The core only requests that something be said; formatting and placement
//! belong to the UI layer behind [`Notifier`].

use std::cell::RefCell;
use std::rc::Rc;

use dice_core::AppState;

pub trait Notifier {
    /// Screen-reader announcement.
    fn announce(&mut self, message: &str);
    /// Transient visible message.
    fn toast(&mut self, message: &str);
    /// Ask the UI to re-read `state` and refresh its controls.
    fn sync_ui(&mut self, state: &AppState);
}

/// Writes every notification to the log. Used when no UI is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn announce(&mut self, message: &str) {
        tracing::info!(kind = "announce", "{message}");
    }

    fn toast(&mut self, message: &str) {
        tracing::info!(kind = "toast", "{message}");
    }

    fn sync_ui(&mut self, state: &AppState) {
        tracing::trace!(
            dark_mode = state.ui.dark_mode,
            chaos = state.particles.chaos.get(),
            paused = state.ui.paused,
            "ui sync requested"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Announce(String),
    Toast(String),
    SyncUi,
}

/// Records notifications into a feed that outlives the notifier.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    feed: NoticeFeed,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn feed(&self) -> NoticeFeed {
        self.feed.clone()
    }
}

impl Notifier for RecordingNotifier {
    fn announce(&mut self, message: &str) {
        self.feed.push(Notice::Announce(message.to_owned()));
    }

    fn toast(&mut self, message: &str) {
        self.feed.push(Notice::Toast(message.to_owned()));
    }

    fn sync_ui(&mut self, _state: &AppState) {
        self.feed.push(Notice::SyncUi);
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoticeFeed {
    notices: Rc<RefCell<Vec<Notice>>>,
}

impl NoticeFeed {
    fn push(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }

    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    #[must_use]
    pub fn announcements(&self) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .filter_map(|notice| match notice {
                Notice::Announce(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn toasts(&self) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .filter_map(|notice| match notice {
                Notice::Toast(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// How many announcements and toasts carried exactly `message`.
    #[must_use]
    pub fn count(&self, message: &str) -> usize {
        self.notices
            .borrow()
            .iter()
            .filter(|notice| {
                matches!(notice, Notice::Announce(m) | Notice::Toast(m) if m == message)
            })
            .count()
    }

    #[must_use]
    pub fn sync_count(&self) -> usize {
        self.notices
            .borrow()
            .iter()
            .filter(|notice| **notice == Notice::SyncUi)
            .count()
    }

    pub fn clear(&self) {
        self.notices.borrow_mut().clear();
    }
}
