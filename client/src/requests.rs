//! Typed outbound hub calls — one function per method the server exposes.
//!
//! Payload shapes are the hub's camelCase dialect; keeping them here means
//! call sites never hand-build json and the wire shape lives in one place.

#[cfg(test)]
#[path = "requests_test.rs"]
mod requests_test;

use serde_json::json;
use wire::{DrawAction, PlayerDescriptor, RematchConfig};

use crate::hub::{HubConnection, HubError};

/// Join a room as the given player.
///
/// # Errors
///
/// Propagates [`HubError`] from [`HubConnection::invoke`].
pub fn send_join_room(hub: &mut HubConnection, room_id: &str, player: &PlayerDescriptor) -> Result<(), HubError> {
    hub.invoke("JoinRoom", json!({ "roomId": room_id, "player": player }))
}

/// Leave a room.
///
/// # Errors
///
/// Propagates [`HubError`] from [`HubConnection::invoke`].
pub fn send_leave_room(hub: &mut HubConnection, room_id: &str, player: &PlayerDescriptor) -> Result<(), HubError> {
    hub.invoke("LeaveRoom", json!({ "roomId": room_id, "player": player }))
}

/// Post a waiting-room chat message.
///
/// # Errors
///
/// Propagates [`HubError`] from [`HubConnection::invoke`].
pub fn send_room_message(hub: &mut HubConnection, room_id: &str, text: &str) -> Result<(), HubError> {
    hub.invoke("SendRoomMessage", json!({ "roomId": room_id, "text": text }))
}

/// Ask the server to remove a player from the room. The server decides
/// whether the caller has the authority.
///
/// # Errors
///
/// Propagates [`HubError`] from [`HubConnection::invoke`].
pub fn send_kick_player(hub: &mut HubConnection, room_id: &str, player: &PlayerDescriptor) -> Result<(), HubError> {
    hub.invoke("KickPlayer", json!({ "roomId": room_id, "player": player }))
}

/// Ask the server to move the room to a named phase.
///
/// # Errors
///
/// Propagates [`HubError`] from [`HubConnection::invoke`].
pub fn send_set_room_state(hub: &mut HubConnection, room_id: &str, phase: &str) -> Result<(), HubError> {
    hub.invoke("SetRoomState", json!({ "roomId": room_id, "phase": phase }))
}

/// Ask the server to start the next round.
///
/// # Errors
///
/// Propagates [`HubError`] from [`HubConnection::invoke`].
pub fn send_start_round(hub: &mut HubConnection, room_id: &str) -> Result<(), HubError> {
    hub.invoke("StartRound", json!({ "roomId": room_id }))
}

/// Broadcast one canvas edit to the room.
///
/// # Errors
///
/// Propagates [`HubError`] from [`HubConnection::invoke`].
pub fn send_draw_action(hub: &mut HubConnection, room_id: &str, action: &DrawAction) -> Result<(), HubError> {
    hub.invoke("SendDrawAction", json!({ "roomId": room_id, "action": action }))
}

/// Submit a guess.
///
/// # Errors
///
/// Propagates [`HubError`] from [`HubConnection::invoke`].
pub fn send_guess_message(hub: &mut HubConnection, room_id: &str, text: &str) -> Result<(), HubError> {
    hub.invoke("SendGuessMessage", json!({ "roomId": room_id, "text": text }))
}

/// Request a rematch room with the given configuration.
///
/// # Errors
///
/// Propagates [`HubError`] from [`HubConnection::invoke`].
pub fn send_request_rematch(hub: &mut HubConnection, room_id: &str, config: &RematchConfig) -> Result<(), HubError> {
    hub.invoke("RequestRematch", json!({ "roomId": room_id, "config": config }))
}
