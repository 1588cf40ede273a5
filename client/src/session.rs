//! Game session state machine for one room visit.
//!
//! SYSTEM CONTEXT
//! ==============
//! Phase and round state are server-authoritative: every transition here is
//! driven by an inbound hub event, and with no events the session sits still
//! forever — a timer reaching zero changes nothing until the server says so.
//! The only locally driven transition is [`GameSession::reset`], used when
//! leaving a room or tearing down before a rematch.
//!
//! Unknown phase names and other structurally valid but unrecognized inputs
//! are protocol anomalies: logged and absorbed, never fatal, because peer
//! delivery order is not guaranteed.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashMap;

use wire::{
    GuessCorrectPayload, GuessWrongPayload, JoinRoomPayload, PhaseChangedPayload, PlayerDescriptor,
    RoomMessagePayload, RoundStartedPayload,
};

/// Wrong guesses the local player may submit per round.
pub const ROUND_HEARTS: u32 = 3;

/// Maximum entries retained in each message feed.
pub const FEED_CAP: usize = 200;

/// Stage of the current game round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GamePhase {
    /// In the waiting room; no round running.
    #[default]
    Waiting,
    /// The drawer is drawing.
    Drawing,
    /// Guessers are guessing.
    Guessing,
    /// The word is being revealed between rounds.
    Reveal,
    /// Game over. Terminal; only [`GameSession::reset`] leaves it.
    Finished,
}

/// One participant as tracked on the scoreboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerEntry {
    /// Display name.
    pub name: String,
    /// Avatar image URL, if set.
    pub avatar: Option<String>,
    /// Current absolute score.
    pub score: i64,
}

/// One waiting-room chat message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomMessage {
    /// Sending player's id.
    pub player_id: String,
    /// Sending player's display name.
    pub name: String,
    /// Message text.
    pub text: String,
}

/// One wrong guess shown in the guess feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuessEntry {
    /// Guessing player's id.
    pub player_id: String,
    /// The guess text.
    pub message: String,
}

/// Per-room game state, driven exclusively by inbound hub events.
#[derive(Clone, Debug)]
pub struct GameSession {
    /// Current phase.
    pub phase: GamePhase,
    /// 1-based round number; 0 before the first round.
    pub current_round: u32,
    /// Total rounds in this game; 0 until the first round announces it.
    pub total_rounds: u32,
    /// Start of the current timed phase, ms since the Unix epoch.
    pub phase_start_ms: Option<i64>,
    /// Length of the current timed phase in seconds.
    pub phase_duration_seconds: Option<u32>,
    /// Player currently drawing, when known.
    pub current_drawer_id: Option<String>,
    /// The secret word: full for the drawer, partially masked for guessers,
    /// exactly as the server sent it.
    pub current_word: Option<String>,
    /// Scoreboard keyed by player id.
    pub players: HashMap<String, PlayerEntry>,
    /// Wrong guesses the local player has left this round.
    pub hearts_remaining: u32,
    /// The local player's id; guess events for other players never touch
    /// hearts.
    pub local_player_id: Option<String>,
    /// Waiting-room chat, oldest first, bounded by [`FEED_CAP`].
    pub room_messages: Vec<RoomMessage>,
    /// Wrong guesses, oldest first, bounded by [`FEED_CAP`].
    pub guess_feed: Vec<GuessEntry>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            phase: GamePhase::Waiting,
            current_round: 0,
            total_rounds: 0,
            phase_start_ms: None,
            phase_duration_seconds: None,
            current_drawer_id: None,
            current_word: None,
            players: HashMap::new(),
            hearts_remaining: ROUND_HEARTS,
            local_player_id: None,
            room_messages: Vec::new(),
            guess_feed: Vec::new(),
        }
    }
}

impl GameSession {
    /// Fresh session for the given local player.
    #[must_use]
    pub fn new(local_player_id: impl Into<String>) -> Self {
        Self { local_player_id: Some(local_player_id.into()), ..Self::default() }
    }

    /// Seed the roster from the join acknowledgement.
    pub fn joined(&mut self, payload: &JoinRoomPayload) {
        for player in &payload.players {
            self.user_joined(player);
        }
    }

    /// A new round is starting: enter the drawing phase and reset round
    /// state. The previous word and the local hearts are cleared.
    pub fn round_started(&mut self, payload: &RoundStartedPayload) {
        if self.phase == GamePhase::Finished {
            tracing::warn!("RoundStarted after game end; ignoring (a rematch is a new session)");
            return;
        }
        self.phase = GamePhase::Drawing;
        self.current_round = payload.round_number;
        self.total_rounds = payload.total_rounds;
        self.phase_start_ms = Some(payload.start_time);
        self.phase_duration_seconds = Some(payload.duration_seconds);
        self.current_word = None;
        self.hearts_remaining = ROUND_HEARTS;
        if let Some(drawer) = &payload.drawer_id {
            self.current_drawer_id = Some(drawer.clone());
        }
    }

    /// The server moved the round to another phase.
    ///
    /// Only `drawing`, `guessing`, and `reveal` are legal here; anything else
    /// is a protocol anomaly and leaves the session untouched. Game over has
    /// its own event ([`ended_game`](Self::ended_game)).
    pub fn phase_changed(&mut self, payload: &PhaseChangedPayload) {
        if self.phase == GamePhase::Finished {
            tracing::warn!("PhaseChanged after game end; ignoring");
            return;
        }
        let phase = match payload.phase.as_str() {
            "drawing" => GamePhase::Drawing,
            "guessing" => GamePhase::Guessing,
            "reveal" => GamePhase::Reveal,
            other => {
                tracing::warn!(phase = %other, "unrecognized phase in PhaseChanged; ignoring");
                return;
            }
        };
        self.phase = phase;
        self.phase_start_ms = Some(payload.start_time);
        self.phase_duration_seconds = Some(payload.duration_seconds);
    }

    /// The full secret word, sent to the drawer only.
    pub fn word_to_draw(&mut self, word: &str) {
        self.current_word = Some(word.to_owned());
    }

    /// A progressive hint. The client performs no masking of its own — the
    /// word is stored exactly as the server rendered it.
    pub fn word_revealed(&mut self, masked_word: &str) {
        self.current_word = Some(masked_word.to_owned());
    }

    /// A wrong guess: append it to the guess feed, and when it was the local
    /// player's, spend a heart (floored at zero).
    pub fn guess_wrong(&mut self, payload: &GuessWrongPayload) {
        push_bounded(
            &mut self.guess_feed,
            GuessEntry { player_id: payload.player_id.clone(), message: payload.message.clone() },
        );
        if self.local_player_id.as_deref() == Some(payload.player_id.as_str()) {
            self.hearts_remaining = self.hearts_remaining.saturating_sub(1);
        }
    }

    /// A correct guess: the server sends the player's new absolute score and
    /// the last value wins.
    pub fn guess_correct(&mut self, payload: &GuessCorrectPayload) {
        let entry = self
            .players
            .entry(payload.player_id.clone())
            .or_insert_with(|| PlayerEntry { name: String::new(), avatar: None, score: 0 });
        entry.score = payload.new_score;
    }

    /// Game over; terminal until [`reset`](Self::reset).
    pub fn ended_game(&mut self) {
        self.phase = GamePhase::Finished;
        self.phase_start_ms = None;
        self.phase_duration_seconds = None;
    }

    /// A player joined the room. Rejoining players keep their score.
    pub fn user_joined(&mut self, player: &PlayerDescriptor) {
        self.players.entry(player.id.clone()).or_insert_with(|| PlayerEntry {
            name: player.name.clone(),
            avatar: player.avatar.clone(),
            score: 0,
        });
    }

    /// A player left the room.
    pub fn user_left(&mut self, player_id: &str) {
        self.players.remove(player_id);
        if self.current_drawer_id.as_deref() == Some(player_id) {
            self.current_drawer_id = None;
        }
    }

    /// A waiting-room chat message.
    pub fn room_message(&mut self, payload: &RoomMessagePayload) {
        push_bounded(
            &mut self.room_messages,
            RoomMessage {
                player_id: payload.player_id.clone(),
                name: payload.name.clone(),
                text: payload.text.clone(),
            },
        );
    }

    /// Seconds left in the current timed phase at `now_ms`, floored at zero.
    ///
    /// `None` when no timed phase is active. Recomputed from the wall clock
    /// on every call — never cached.
    #[must_use]
    pub fn remaining_seconds(&self, now_ms: i64) -> Option<i64> {
        let start = self.phase_start_ms?;
        let duration = i64::from(self.phase_duration_seconds?);
        let elapsed = (now_ms - start) / 1000;
        Some((duration - elapsed).clamp(0, duration))
    }

    /// True when the local player is the current drawer.
    #[must_use]
    pub fn is_local_drawer(&self) -> bool {
        self.local_player_id.is_some() && self.local_player_id == self.current_drawer_id
    }

    /// Restore initial state, keeping only the local player's identity. Used
    /// when leaving a room or before joining a rematch room.
    pub fn reset(&mut self) {
        let local_player_id = self.local_player_id.take();
        *self = Self { local_player_id, ..Self::default() };
    }
}

fn push_bounded<T>(feed: &mut Vec<T>, entry: T) {
    if feed.len() >= FEED_CAP {
        feed.remove(0);
    }
    feed.push(entry);
}
