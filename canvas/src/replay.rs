//! Replay engine: projects the action log onto the drawing surface.
//!
//! The engine owns the surface for as long as the room view is mounted — no
//! other component touches it. Brand-new drawable actions apply
//! incrementally; anything that hides or restores mid-log content goes
//! through a full deterministic rebuild, because un-layering an arbitrary
//! action from a stacked drawing cannot be done in place.

#[cfg(test)]
#[path = "replay_test.rs"]
mod replay_test;

use wire::{ActionData, DrawAction};

use crate::log::ActionLog;
use crate::surface::{DrawingSurface, Primitive};

/// Owns a [`DrawingSurface`] and keeps it consistent with an [`ActionLog`].
#[derive(Clone, Debug, Default)]
pub struct Replayer<S: DrawingSurface> {
    surface: S,
}

impl<S: DrawingSurface> Replayer<S> {
    /// Take exclusive ownership of a surface.
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Apply a single brand-new action on top of current content.
    ///
    /// Only valid for drawable actions and clears; undo/redo must go through
    /// [`rebuild`](Self::rebuild). A stray history edit here is logged and
    /// ignored rather than corrupting the surface.
    pub fn apply_incremental(&mut self, action: &DrawAction) {
        match &action.data {
            ActionData::Clear(_) => self.surface.clear(),
            ActionData::Undo(_) | ActionData::Redo(_) => {
                tracing::warn!(id = %action.id, "history edit routed to incremental apply; ignoring");
            }
            data => {
                if let Some(primitive) = Primitive::from_action(data) {
                    self.surface.add_primitive(primitive);
                }
            }
        }
    }

    /// Rebuild the surface from scratch: clear, then replay the log in
    /// insertion order, skipping hidden actions and history edits.
    ///
    /// Deterministic and idempotent — for a fixed log, any number of rebuilds
    /// produces identical surface content. An empty or fully hidden log
    /// rebuilds to the blank background.
    pub fn rebuild(&mut self, log: &ActionLog) {
        self.surface.clear();
        for action in log.actions() {
            if action.kind().is_history_edit() || log.is_hidden(&action.id) {
                continue;
            }
            match &action.data {
                ActionData::Clear(_) => self.surface.clear(),
                data => {
                    if let Some(primitive) = Primitive::from_action(data) {
                        self.surface.add_primitive(primitive);
                    }
                }
            }
        }
    }

    /// Read access to the owned surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Release the surface, ending this engine's ownership.
    pub fn into_surface(self) -> S {
        self.surface
    }
}
