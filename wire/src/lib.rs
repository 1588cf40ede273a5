//! Shared wire model and JSON codec for the realtime hub transport.
//!
//! This crate owns the wire representation used by every other crate in the
//! repo: the `DrawAction` record that carries canvas edits between peers, the
//! payload DTOs for inbound hub events, and the argument types for outbound
//! hub methods. The hub dialect is plain JSON with camelCase keys, so these
//! types must round-trip losslessly through `serde_json` — replay correctness
//! depends on it.

use serde::{Deserialize, Serialize};

/// Error returned by [`decode_action`] and [`encode_action`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The text could not be (de)serialized as a well-formed action.
    #[error("malformed action payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Discriminant of a [`DrawAction`] payload, used where code needs to branch
/// on the action family without borrowing the payload itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    /// Freehand stroke.
    Stroke,
    /// Geometric shape.
    Shape,
    /// Wipe the surface to the blank background.
    Clear,
    /// Hide a previously drawn action.
    Undo,
    /// Restore a previously hidden action.
    Redo,
}

impl ActionKind {
    /// True for the history-editing kinds (`Undo`/`Redo`) that never render
    /// anything themselves.
    #[must_use]
    pub fn is_history_edit(self) -> bool {
        matches!(self, Self::Undo | Self::Redo)
    }
}

/// Source tool of a freehand stroke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeTool {
    /// Pigment stroke in the stroke color.
    Brush,
    /// Background-colored stroke that visually erases.
    Eraser,
}

/// Geometric shape family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    Rectangle,
    /// Ellipse inscribed within the bounding box.
    Circle,
    /// Line segment running corner-to-corner through the bounding box.
    Line,
}

/// Payload of a freehand stroke action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeData {
    /// Serialized freehand path in the drawing surface's portable path format.
    pub path: String,
    /// Stroke color as a CSS color string.
    pub color: String,
    /// Stroke width in canvas units.
    pub width: f64,
    /// Tool that produced the stroke.
    pub tool: StrokeTool,
}

/// Payload of a geometric shape action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeData {
    /// Shape family.
    pub shape: ShapeKind,
    /// Left edge of the bounding box.
    pub x: f64,
    /// Top edge of the bounding box.
    pub y: f64,
    /// Bounding-box width.
    pub width: f64,
    /// Bounding-box height.
    pub height: f64,
    /// Outline color as a CSS color string.
    pub color: String,
    /// Outline width in canvas units.
    pub stroke_width: f64,
}

/// Payload of a clear action. Carries no fields; kept as a struct so the wire
/// shape stays `{"type": "Clear", "data": {}}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearData {}

/// Payload of an undo or redo action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoData {
    /// Id of the action being hidden (undo) or restored (redo).
    pub target_action_id: String,
}

/// Variant payload of a [`DrawAction`], keyed by the `type` field on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ActionData {
    /// Freehand stroke.
    Stroke(StrokeData),
    /// Geometric shape.
    Shape(ShapeData),
    /// Wipe to blank background.
    Clear(ClearData),
    /// Hide the targeted action.
    Undo(UndoData),
    /// Restore the targeted action.
    Redo(UndoData),
}

impl ActionData {
    /// Discriminant of this payload.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Stroke(_) => ActionKind::Stroke,
            Self::Shape(_) => ActionKind::Shape,
            Self::Clear(_) => ActionKind::Clear,
            Self::Undo(_) => ActionKind::Undo,
            Self::Redo(_) => ActionKind::Redo,
        }
    }

    /// Target id when this is an undo or redo payload.
    #[must_use]
    pub fn history_target(&self) -> Option<&str> {
        match self {
            Self::Undo(data) | Self::Redo(data) => Some(&data.target_action_id),
            _ => None,
        }
    }
}

/// One canvas edit as it travels between peers and lives in the action log.
///
/// Immutable once created. `id` is minted by the originating client and must
/// stay unique for the lifetime of a session; `timestamp` is the originating
/// client's clock and is advisory only — it never participates in ordering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawAction {
    /// Client-generated unique identifier.
    pub id: String,
    /// Milliseconds since the Unix epoch on the originating client's clock.
    pub timestamp: i64,
    /// Variant payload, flattened on the wire into `type` + `data`.
    #[serde(flatten)]
    pub data: ActionData,
}

impl DrawAction {
    /// Discriminant of this action's payload.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.data.kind()
    }
}

/// Encode an action into its JSON wire form.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails (cannot happen for
/// well-formed actions; kept fallible so callers propagate uniformly).
pub fn encode_action(action: &DrawAction) -> Result<String, CodecError> {
    Ok(serde_json::to_string(action)?)
}

/// Decode an action from its JSON wire form.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed text, unknown `type` values, or
/// payloads whose shape does not match their `type`.
pub fn decode_action(text: &str) -> Result<DrawAction, CodecError> {
    Ok(serde_json::from_str(text)?)
}

/// A participant as named in hub calls and roster events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDescriptor {
    /// Stable player identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Avatar image URL, if set.
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Requested configuration for a rematch room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RematchConfig {
    /// Number of rounds to play.
    pub total_rounds: u32,
    /// Drawing-phase length per round, in seconds.
    pub draw_seconds: u32,
}

/// Payload of the inbound `JoinRoom` acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomPayload {
    /// Room that was joined.
    pub room_id: String,
    /// Roster at join time. Absent on older hubs.
    #[serde(default)]
    pub players: Vec<PlayerDescriptor>,
}

/// Payload of the inbound `RoundStarted` event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundStartedPayload {
    /// 1-based round number now starting.
    pub round_number: u32,
    /// Total rounds in this game.
    pub total_rounds: u32,
    /// Drawing-phase length in seconds.
    pub duration_seconds: u32,
    /// Phase start, milliseconds since the Unix epoch (server clock).
    pub start_time: i64,
    /// Player drawing this round, when the hub names one.
    #[serde(default)]
    pub drawer_id: Option<String>,
}

/// Payload of the inbound `PhaseChanged` event.
///
/// `phase` is kept as a raw string: unknown values are a protocol anomaly the
/// state machine absorbs, not a deserialization failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseChangedPayload {
    /// Phase name: `drawing`, `guessing`, or `reveal`.
    pub phase: String,
    /// Phase length in seconds.
    pub duration_seconds: u32,
    /// Phase start, milliseconds since the Unix epoch (server clock).
    pub start_time: i64,
}

/// Payload of the inbound `WordToDraw` event (sent only to the drawer).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordToDrawPayload {
    /// The full secret word.
    pub word: String,
}

/// Payload of the inbound `WordRevealed` event (progressive hint).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRevealedPayload {
    /// Partially masked word exactly as the server rendered it.
    pub word: String,
}

/// Payload of the inbound `GuessMessageWrongReceived` event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessWrongPayload {
    /// Player who guessed.
    pub player_id: String,
    /// The guess text, shown in the guess feed.
    pub message: String,
}

/// Payload of the inbound `GuessMessageCorrectReceived` event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessCorrectPayload {
    /// Player who guessed correctly.
    pub player_id: String,
    /// That player's new absolute score (not a delta).
    pub new_score: i64,
}

/// Payload of the inbound `RoomMessageReceived` event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomMessagePayload {
    /// Sending player's id.
    pub player_id: String,
    /// Sending player's display name.
    pub name: String,
    /// Message text.
    pub text: String,
}

/// Payload of the inbound `UserLeft` event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeftPayload {
    /// Player who left the room.
    pub player_id: String,
}

/// Payload of the inbound `RematchRoomCreated` event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RematchRoomCreatedPayload {
    /// Id of the freshly created rematch room.
    pub room_id: String,
}

/// Payload of the inbound `NotifyAccessDenied` event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDeniedPayload {
    /// Human-readable denial reason.
    pub reason: String,
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
