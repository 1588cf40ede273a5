//! Action log and undo/redo manager — the source of truth for canvas content.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every canvas edit, local or remote, is recorded here as an immutable
//! [`DrawAction`]. Insertion order is the replay order. Undo does not delete:
//! it tombstones the target id, and a matching redo lifts the tombstone. A
//! new drawable edit after an undo compacts the log — the hidden branch is
//! discarded for good, which is standard linear undo-history semantics.
//!
//! Remote peers deliver actions with no cross-sender ordering guarantee, so
//! an undo may arrive before the action it targets. Recording it is accepted
//! and harmless: the unknown id tombstones nothing until (and unless) its
//! target shows up.

#[cfg(test)]
#[path = "log_test.rs"]
mod log_test;

use uuid::Uuid;
use wire::{ActionData, DrawAction, UndoData};

/// How a recorded action can be projected onto the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The action only adds on top of current content; apply it directly.
    Incremental,
    /// The action hides or restores mid-log content; replay from scratch.
    NeedsRebuild,
}

/// Ordered action log plus the tombstone stack of currently hidden ids.
#[derive(Clone, Debug, Default)]
pub struct ActionLog {
    actions: Vec<DrawAction>,
    /// Hidden action ids, most recently hidden last (redo pops from the top).
    tombstones: Vec<String>,
}

impl ActionLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action and report how to project it onto the surface.
    ///
    /// `Undo`/`Redo` append unconditionally and adjust the tombstone stack.
    /// Any other kind first compacts: every currently tombstoned action is
    /// permanently dropped and the stack cleared — once a new edit lands, the
    /// redo branch is gone.
    pub fn record(&mut self, action: DrawAction) -> Applied {
        match &action.data {
            ActionData::Undo(data) => {
                let target = data.target_action_id.clone();
                if !self.tombstones.contains(&target) {
                    self.tombstones.push(target);
                }
                self.actions.push(action);
                Applied::NeedsRebuild
            }
            ActionData::Redo(data) => {
                self.tombstones.retain(|id| *id != data.target_action_id);
                self.actions.push(action);
                Applied::NeedsRebuild
            }
            _ => {
                self.compact();
                self.actions.push(action);
                Applied::Incremental
            }
        }
    }

    /// Build an undo for the most recent visible drawable action.
    ///
    /// Returns `None` when nothing is left to hide. The returned action is
    /// not recorded; callers record it (and broadcast it) like any other
    /// action.
    #[must_use]
    pub fn create_undo(&self, timestamp: i64) -> Option<DrawAction> {
        let target = self.latest_visible_drawable()?;
        Some(DrawAction {
            id: Uuid::new_v4().to_string(),
            timestamp,
            data: ActionData::Undo(UndoData { target_action_id: target.to_owned() }),
        })
    }

    /// Build a redo for the most recently hidden action.
    ///
    /// Returns `None` when the tombstone stack is empty.
    #[must_use]
    pub fn create_redo(&self, timestamp: i64) -> Option<DrawAction> {
        let target = self.tombstones.last()?;
        Some(DrawAction {
            id: Uuid::new_v4().to_string(),
            timestamp,
            data: ActionData::Redo(UndoData { target_action_id: target.clone() }),
        })
    }

    /// True when [`create_undo`](Self::create_undo) would return an action.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.latest_visible_drawable().is_some()
    }

    /// True when [`create_redo`](Self::create_redo) would return an action.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.tombstones.is_empty()
    }

    /// All recorded actions in insertion order.
    #[must_use]
    pub fn actions(&self) -> &[DrawAction] {
        &self.actions
    }

    /// True when `id` is currently hidden by an unmatched undo.
    #[must_use]
    pub fn is_hidden(&self, id: &str) -> bool {
        self.tombstones.iter().any(|t| t == id)
    }

    /// True when an action with this id has been recorded. Used to drop
    /// duplicate deliveries from an at-least-once transport.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.actions.iter().any(|a| a.id == id)
    }

    /// Number of recorded actions (tombstoned ones included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Forget everything; used when leaving a room.
    pub fn reset(&mut self) {
        self.actions.clear();
        self.tombstones.clear();
    }

    fn latest_visible_drawable(&self) -> Option<&str> {
        self.actions
            .iter()
            .rev()
            .find(|a| !a.kind().is_history_edit() && !self.is_hidden(&a.id))
            .map(|a| a.id.as_str())
    }

    fn compact(&mut self) {
        if self.tombstones.is_empty() {
            return;
        }
        let tombstones = std::mem::take(&mut self.tombstones);
        self.actions.retain(|a| !tombstones.contains(&a.id));
    }
}
