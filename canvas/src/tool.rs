//! Local drawing tool — the brush/shape settings the local user draws with.
//!
//! Tool state is owned exclusively by the local client and is never part of
//! the action log: peers only ever see the finished actions it produces.

#[cfg(test)]
#[path = "tool_test.rs"]
mod tool_test;

use wire::{ShapeData, ShapeKind, StrokeData, StrokeTool};

/// What the active tool draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolKind {
    /// Freehand brush.
    #[default]
    Brush,
    /// Freehand eraser.
    Eraser,
    /// Rectangle shape.
    Rectangle,
    /// Circle shape.
    Circle,
    /// Line shape.
    Line,
}

/// Mutable local tool settings.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawingTool {
    /// Active tool.
    pub kind: ToolKind,
    /// Draw color as a CSS color string.
    pub color: String,
    /// Stroke width in canvas units.
    pub width: f64,
}

impl Default for DrawingTool {
    fn default() -> Self {
        Self { kind: ToolKind::Brush, color: "#1F1A17".to_owned(), width: 4.0 }
    }
}

impl DrawingTool {
    /// Stroke payload for a finished freehand path drawn with this tool.
    ///
    /// Returns `None` when a shape tool is active.
    #[must_use]
    pub fn stroke_payload(&self, path: &str) -> Option<StrokeData> {
        let tool = match self.kind {
            ToolKind::Brush => StrokeTool::Brush,
            ToolKind::Eraser => StrokeTool::Eraser,
            _ => return None,
        };
        Some(StrokeData {
            path: path.to_owned(),
            color: self.color.clone(),
            width: self.width,
            tool,
        })
    }

    /// Shape payload for a finished drag with this tool's shape.
    ///
    /// Returns `None` when a freehand tool is active.
    #[must_use]
    pub fn shape_payload(&self, x: f64, y: f64, width: f64, height: f64) -> Option<ShapeData> {
        let shape = match self.kind {
            ToolKind::Rectangle => ShapeKind::Rectangle,
            ToolKind::Circle => ShapeKind::Circle,
            ToolKind::Line => ShapeKind::Line,
            ToolKind::Brush | ToolKind::Eraser => return None,
        };
        Some(ShapeData {
            shape,
            x,
            y,
            width,
            height,
            color: self.color.clone(),
            stroke_width: self.width,
        })
    }
}
