#![allow(clippy::float_cmp)]

use wire::{ShapeKind, StrokeTool};

use super::*;

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_tool_is_brush() {
    let tool = DrawingTool::default();
    assert_eq!(tool.kind, ToolKind::Brush);
    assert_eq!(tool.color, "#1F1A17");
    assert_eq!(tool.width, 4.0);
}

// =============================================================
// Stroke payloads
// =============================================================

#[test]
fn brush_builds_stroke_payload() {
    let tool = DrawingTool { kind: ToolKind::Brush, color: "#AA0000".to_owned(), width: 6.0 };
    let payload = tool.stroke_payload("M0,0 L5,5").unwrap();
    assert_eq!(payload.path, "M0,0 L5,5");
    assert_eq!(payload.color, "#AA0000");
    assert_eq!(payload.width, 6.0);
    assert_eq!(payload.tool, StrokeTool::Brush);
}

#[test]
fn eraser_builds_eraser_stroke_payload() {
    let tool = DrawingTool { kind: ToolKind::Eraser, ..Default::default() };
    assert_eq!(tool.stroke_payload("M1,1").unwrap().tool, StrokeTool::Eraser);
}

#[test]
fn shape_tools_build_no_stroke_payload() {
    for kind in [ToolKind::Rectangle, ToolKind::Circle, ToolKind::Line] {
        let tool = DrawingTool { kind, ..Default::default() };
        assert!(tool.stroke_payload("M0,0").is_none());
    }
}

// =============================================================
// Shape payloads
// =============================================================

#[test]
fn shape_tools_build_matching_shape_payload() {
    let cases = [
        (ToolKind::Rectangle, ShapeKind::Rectangle),
        (ToolKind::Circle, ShapeKind::Circle),
        (ToolKind::Line, ShapeKind::Line),
    ];
    for (kind, expected) in cases {
        let tool = DrawingTool { kind, color: "#123456".to_owned(), width: 2.0 };
        let payload = tool.shape_payload(1.0, 2.0, 30.0, 40.0).unwrap();
        assert_eq!(payload.shape, expected);
        assert_eq!(payload.x, 1.0);
        assert_eq!(payload.y, 2.0);
        assert_eq!(payload.width, 30.0);
        assert_eq!(payload.height, 40.0);
        assert_eq!(payload.color, "#123456");
        assert_eq!(payload.stroke_width, 2.0);
    }
}

#[test]
fn freehand_tools_build_no_shape_payload() {
    for kind in [ToolKind::Brush, ToolKind::Eraser] {
        let tool = DrawingTool { kind, ..Default::default() };
        assert!(tool.shape_payload(0.0, 0.0, 1.0, 1.0).is_none());
    }
}
