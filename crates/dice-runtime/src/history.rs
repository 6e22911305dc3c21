#![forbid(unsafe_code)]

//! Undo/redo history for scene commands.
//!
//! [`HistoryManager`] keeps two stacks of executed [`SceneCommand`]s. Unlike
//! a push-only history it runs the command itself, so a command the engine
//! rejects never reaches the undo stack.
//!
//! # Invariants
//!
//! 1. A failed execute, undo or redo leaves both stacks as they were
//! 2. The redo stack is cleared whenever a new command is pushed
//! 3. Two consecutive shuffles that produce the same scene occupy one entry;
//!    the second one is never loaded
//!
//! ```text
//! execute(cmd3)
//! ┌───────────────────────────────┐
//! │ Undo Stack: [cmd1, cmd2, cmd3]│
//! │ Redo Stack: []                │
//! └───────────────────────────────┘
//!
//! undo()
//! ┌───────────────────────────────┐
//! │ Undo Stack: [cmd1, cmd2]      │
//! │ Redo Stack: [cmd3]            │
//! └───────────────────────────────┘
//!
//! execute(cmd4)  <-- new branch, clears redo
//! ┌───────────────────────────────┐
//! │ Undo Stack: [cmd1, cmd2, cmd4]│
//! │ Redo Stack: []                │
//! └───────────────────────────────┘
//! ```

use std::collections::VecDeque;
use std::fmt;

use serde_json::json;

use crate::command::{CommandError, SceneCommand};
use crate::studio::Studio;

/// What [`HistoryManager::execute`] did with a successful command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteOutcome {
    Pushed,
    /// The command produced the same scene as the shuffle on top of the
    /// undo stack and was dropped.
    Deduplicated,
}

#[derive(Default)]
pub struct HistoryManager {
    /// Newest at back.
    undo_stack: VecDeque<SceneCommand>,
    /// Newest at back.
    redo_stack: VecDeque<SceneCommand>,
}

impl fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .finish()
    }
}

impl HistoryManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Execute `command` and record it.
    ///
    /// A shuffle is prepared first; when it would produce the scene already
    /// on top of the undo stack it is discarded without loading anything.
    pub async fn execute(
        &mut self,
        studio: &mut Studio,
        mut command: SceneCommand,
    ) -> Result<ExecuteOutcome, CommandError> {
        let description = command.description().to_owned();
        command.prepare(studio);
        if self.duplicates_top(&command) {
            tracing::debug!(command = %description, "dropping duplicate shuffle");
            command.discard(studio);
            return Ok(ExecuteOutcome::Deduplicated);
        }

        if let Err(err) = command.execute(studio).await {
            tracing::warn!(command = %description, error = %err, "command failed");
            studio.telemetry_mut().log_error(
                "history_execute",
                &err,
                json!({ "command": description }),
            );
            return Err(err);
        }

        self.redo_stack.clear();
        self.undo_stack.push_back(command);
        studio.sync_ui();
        Ok(ExecuteOutcome::Pushed)
    }

    /// Undo the last command.
    ///
    /// # Returns
    ///
    /// - `Ok(description)` if undo succeeded
    /// - `Err(error)` if undo failed (command remains on undo stack)
    /// - `None` if no commands to undo
    pub async fn undo(&mut self, studio: &mut Studio) -> Option<Result<String, CommandError>> {
        let mut command = self.undo_stack.pop_back()?;
        let description = command.description().to_owned();

        match command.undo(studio).await {
            Ok(()) => {
                self.redo_stack.push_back(command);
                studio.announce("Action undone.");
                studio.sync_ui();
                Some(Ok(description))
            }
            Err(err) => {
                tracing::warn!(command = %description, error = %err, "undo failed");
                self.undo_stack.push_back(command);
                Some(Err(err))
            }
        }
    }

    /// Redo the last undone command.
    ///
    /// # Returns
    ///
    /// - `Ok(description)` if redo succeeded
    /// - `Err(error)` if redo failed (command remains on redo stack)
    /// - `None` if no commands to redo
    pub async fn redo(&mut self, studio: &mut Studio) -> Option<Result<String, CommandError>> {
        let mut command = self.redo_stack.pop_back()?;
        let description = command.description().to_owned();

        match command.execute(studio).await {
            Ok(()) => {
                self.undo_stack.push_back(command);
                studio.announce("Action redone.");
                studio.sync_ui();
                Some(Ok(description))
            }
            Err(err) => {
                tracing::warn!(command = %description, error = %err, "redo failed");
                self.redo_stack.push_back(command);
                Some(Err(err))
            }
        }
    }

    fn duplicates_top(&self, command: &SceneCommand) -> bool {
        let Some(produced) = command.shuffle_result() else {
            return false;
        };
        self.undo_stack
            .back()
            .and_then(SceneCommand::shuffle_result)
            .is_some_and(|top| top.same_scene(produced))
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    // ========================================================================
    // Info
    // ========================================================================

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Descriptions of undoable commands, most recent first.
    pub fn undo_descriptions(&self, limit: usize) -> Vec<&str> {
        self.undo_stack
            .iter()
            .rev()
            .take(limit)
            .map(SceneCommand::description)
            .collect()
    }

    /// Descriptions of redoable commands, most recent first.
    pub fn redo_descriptions(&self, limit: usize) -> Vec<&str> {
        self.redo_stack
            .iter()
            .rev()
            .take(limit)
            .map(SceneCommand::description)
            .collect()
    }

    #[must_use]
    pub fn next_undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(SceneCommand::description)
    }

    #[must_use]
    pub fn next_redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(SceneCommand::description)
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
