#![forbid(unsafe_code)]

//! Rendering-engine seam.
//!
//! The particle renderer lives outside this workspace. The studio only needs
//! to hand it a scene and get back a handle to the running instance.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use dice_core::SceneConfig;
use thiserror::Error;

/// Future returned by [`RenderEngine::load`]. Not `Send`; the studio runs
/// on a single cooperative thread.
pub type LoadFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Box<dyn EngineHandle>, EngineError>> + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rendering engine error: {0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub trait RenderEngine {
    /// Mount `config` into the container `container_id`, replacing whatever
    /// was running there.
    fn load<'a>(&'a mut self, container_id: &'a str, config: &'a SceneConfig) -> LoadFuture<'a>;
}

/// A running scene instance.
pub trait EngineHandle: fmt::Debug {
    fn pause(&mut self);
    fn play(&mut self);
    fn destroy(&mut self);
    fn refresh(&mut self);
}
