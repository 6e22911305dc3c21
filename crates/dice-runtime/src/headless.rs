#![forbid(unsafe_code)]

//! In-memory rendering engine.
//!
//! [`HeadlessEngine`] accepts every scene unless told to fail, and records
//! what it was asked to do. An [`EngineProbe`] shares that record so the
//! caller can inspect it after the engine has been moved into a studio.

use std::cell::RefCell;
use std::rc::Rc;

use dice_core::SceneConfig;

use crate::engine::{EngineError, EngineHandle, LoadFuture, RenderEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleEvent {
    Paused(usize),
    Played(usize),
    Destroyed(usize),
    Refreshed(usize),
}

#[derive(Debug, Default)]
struct EngineLog {
    attempts: usize,
    fail_remaining: usize,
    loaded: Vec<SceneConfig>,
    handle_events: Vec<HandleEvent>,
}

#[derive(Debug, Default)]
pub struct HeadlessEngine {
    log: Rc<RefCell<EngineLog>>,
}

impl HeadlessEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn probe(&self) -> EngineProbe {
        EngineProbe {
            log: Rc::clone(&self.log),
        }
    }
}

impl RenderEngine for HeadlessEngine {
    fn load<'a>(&'a mut self, container_id: &'a str, config: &'a SceneConfig) -> LoadFuture<'a> {
        let shared = Rc::clone(&self.log);
        Box::pin(async move {
            let mut log = shared.borrow_mut();
            log.attempts += 1;
            if log.fail_remaining > 0 {
                log.fail_remaining -= 1;
                return Err(EngineError::new(format!(
                    "injected failure loading into `{container_id}`"
                )));
            }
            log.loaded.push(config.clone());
            let handle = HeadlessHandle {
                id: log.loaded.len(),
                log: Rc::clone(&shared),
            };
            Ok(Box::new(handle) as Box<dyn EngineHandle>)
        })
    }
}

#[derive(Debug)]
struct HeadlessHandle {
    id: usize,
    log: Rc<RefCell<EngineLog>>,
}

impl HeadlessHandle {
    fn record(&self, event: HandleEvent) {
        self.log.borrow_mut().handle_events.push(event);
    }
}

impl EngineHandle for HeadlessHandle {
    fn pause(&mut self) {
        self.record(HandleEvent::Paused(self.id));
    }

    fn play(&mut self) {
        self.record(HandleEvent::Played(self.id));
    }

    fn destroy(&mut self) {
        self.record(HandleEvent::Destroyed(self.id));
    }

    fn refresh(&mut self) {
        self.record(HandleEvent::Refreshed(self.id));
    }
}

/// Shared view of a [`HeadlessEngine`]'s record.
#[derive(Debug, Clone)]
pub struct EngineProbe {
    log: Rc<RefCell<EngineLog>>,
}

impl EngineProbe {
    /// Make the next `n` loads fail.
    pub fn fail_next(&self, n: usize) {
        self.log.borrow_mut().fail_remaining = n;
    }

    /// Every load attempt, successful or not.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.log.borrow().attempts
    }

    /// Scenes that loaded successfully, oldest first.
    #[must_use]
    pub fn loaded(&self) -> Vec<SceneConfig> {
        self.log.borrow().loaded.clone()
    }

    #[must_use]
    pub fn last_loaded(&self) -> Option<SceneConfig> {
        self.log.borrow().loaded.last().cloned()
    }

    #[must_use]
    pub fn handle_events(&self) -> Vec<HandleEvent> {
        self.log.borrow().handle_events.clone()
    }
}
