//! Drawing-surface capability: portable primitives and the trait the replay
//! engine renders through.
//!
//! DESIGN
//! ======
//! The real rasterizer (2D canvas, SVG layer, whatever the host ships) lives
//! outside this repo. This module defines the narrow contract it must meet:
//! append a primitive, wipe to blank, and enumerate what is currently drawn.
//! `Primitive` doubles as the portable descriptor — it serializes to the same
//! shapes that travel on the wire, so surface content can be captured and
//! compared bit-for-bit.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use serde::{Deserialize, Serialize};
use wire::{ActionData, ShapeData, StrokeData};

/// A single drawable element in its portable form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Primitive {
    /// Freehand path with stroke styling.
    Path(StrokeData),
    /// Geometric shape with outline styling.
    Shape(ShapeData),
}

impl Primitive {
    /// Build the primitive described by an action payload.
    ///
    /// Returns `None` for payloads that do not describe a drawable (`Clear`
    /// mutates the surface without adding anything; `Undo`/`Redo` are
    /// history edits).
    #[must_use]
    pub fn from_action(data: &ActionData) -> Option<Self> {
        match data {
            ActionData::Stroke(stroke) => Some(Self::Path(stroke.clone())),
            ActionData::Shape(shape) => Some(Self::Shape(shape.clone())),
            ActionData::Clear(_) | ActionData::Undo(_) | ActionData::Redo(_) => None,
        }
    }
}

/// The capability a host rasterizer exposes to the replay engine.
///
/// Implementations only ever append and wipe; nothing in this repo removes
/// individual primitives (structural edits go through a full rebuild).
pub trait DrawingSurface {
    /// Append a primitive above everything already drawn.
    fn add_primitive(&mut self, primitive: Primitive);

    /// Wipe the surface to the blank background.
    fn clear(&mut self);

    /// Visit every primitive in draw order (bottom-most first).
    fn for_each_primitive(&self, visit: &mut dyn FnMut(&Primitive));
}

/// In-memory surface: an ordered primitive list.
///
/// Serves headless hosts and tests, and is the reference answer for what any
/// rasterizing surface should contain after a replay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemorySurface {
    primitives: Vec<Primitive>,
}

impl MemorySurface {
    /// Create an empty (blank) surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current primitives in draw order.
    #[must_use]
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Number of primitives currently drawn.
    #[must_use]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Returns `true` when the surface shows the blank background.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl DrawingSurface for MemorySurface {
    fn add_primitive(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    fn clear(&mut self) {
        self.primitives.clear();
    }

    fn for_each_primitive(&self, visit: &mut dyn FnMut(&Primitive)) {
        for primitive in &self.primitives {
            visit(primitive);
        }
    }
}
