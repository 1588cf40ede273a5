use wire::{ActionData, ClearData, ShapeData, ShapeKind, StrokeData, StrokeTool, UndoData};

use super::*;

fn path_primitive(path: &str) -> Primitive {
    Primitive::Path(StrokeData {
        path: path.to_owned(),
        color: "#1F1A17".to_owned(),
        width: 4.0,
        tool: StrokeTool::Brush,
    })
}

fn shape_primitive() -> Primitive {
    Primitive::Shape(ShapeData {
        shape: ShapeKind::Circle,
        x: 1.0,
        y: 2.0,
        width: 30.0,
        height: 30.0,
        color: "#336699".to_owned(),
        stroke_width: 3.0,
    })
}

// =============================================================
// MemorySurface
// =============================================================

#[test]
fn new_surface_is_blank() {
    let surface = MemorySurface::new();
    assert!(surface.is_empty());
    assert_eq!(surface.len(), 0);
}

#[test]
fn add_primitive_appends_in_draw_order() {
    let mut surface = MemorySurface::new();
    surface.add_primitive(path_primitive("first"));
    surface.add_primitive(shape_primitive());
    assert_eq!(surface.len(), 2);
    assert_eq!(surface.primitives()[0], path_primitive("first"));
    assert_eq!(surface.primitives()[1], shape_primitive());
}

#[test]
fn clear_wipes_to_blank() {
    let mut surface = MemorySurface::new();
    surface.add_primitive(path_primitive("p"));
    surface.clear();
    assert!(surface.is_empty());
}

#[test]
fn for_each_visits_bottom_most_first() {
    let mut surface = MemorySurface::new();
    surface.add_primitive(path_primitive("a"));
    surface.add_primitive(path_primitive("b"));

    let mut seen = Vec::new();
    surface.for_each_primitive(&mut |p| {
        if let Primitive::Path(stroke) = p {
            seen.push(stroke.path.clone());
        }
    });
    assert_eq!(seen, vec!["a", "b"]);
}

// =============================================================
// Primitive construction from action payloads
// =============================================================

#[test]
fn from_action_builds_path_for_stroke() {
    let data = ActionData::Stroke(StrokeData {
        path: "M0,0".to_owned(),
        color: "#000".to_owned(),
        width: 1.0,
        tool: StrokeTool::Eraser,
    });
    let Some(Primitive::Path(stroke)) = Primitive::from_action(&data) else {
        panic!("expected a path primitive");
    };
    assert_eq!(stroke.tool, StrokeTool::Eraser);
}

#[test]
fn from_action_builds_shape_for_shape() {
    let data = ActionData::Shape(ShapeData {
        shape: ShapeKind::Line,
        x: 0.0,
        y: 0.0,
        width: 10.0,
        height: 5.0,
        color: "#000".to_owned(),
        stroke_width: 1.0,
    });
    assert!(matches!(Primitive::from_action(&data), Some(Primitive::Shape(_))));
}

#[test]
fn from_action_returns_none_for_non_drawables() {
    assert!(Primitive::from_action(&ActionData::Clear(ClearData::default())).is_none());
    let undo = ActionData::Undo(UndoData { target_action_id: "a".to_owned() });
    assert!(Primitive::from_action(&undo).is_none());
    let redo = ActionData::Redo(UndoData { target_action_id: "a".to_owned() });
    assert!(Primitive::from_action(&redo).is_none());
}

// =============================================================
// Portable descriptor round-trip
// =============================================================

#[test]
fn primitive_descriptor_roundtrip() {
    for primitive in [path_primitive("M0,0 L9,9"), shape_primitive()] {
        let text = serde_json::to_string(&primitive).unwrap();
        let back: Primitive = serde_json::from_str(&text).unwrap();
        assert_eq!(back, primitive);
    }
}

#[test]
fn primitive_descriptor_is_tagged_by_kind() {
    let value = serde_json::to_value(path_primitive("M0,0")).unwrap();
    assert_eq!(value["kind"], "path");
    let value = serde_json::to_value(shape_primitive()).unwrap();
    assert_eq!(value["kind"], "shape");
}
