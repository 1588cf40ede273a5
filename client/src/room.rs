//! Per-room session runtime: wires the action log, replay engine, game
//! session, and hub connection into one unit with a `create`/`leave`
//! lifecycle scoped to a single room visit.
//!
//! DATA FLOW
//! =========
//! Local input applies optimistically (record + project onto the surface)
//! before anything touches the network, then the action is emitted to peers —
//! freehand strokes through the leading+trailing throttle, discrete edits
//! directly. Inbound events flow the other way: the transport hands them to
//! the hub connection, whose handlers mutate the shared room state. Phase and
//! round state only ever move on inbound events.
//!
//! ERROR HANDLING
//! ==============
//! Payloads that fail to parse are logged and dropped — peer ordering makes
//! stray or early events normal, and one bad payload must never wedge the
//! room. Access denials and terminal connection failures become user-visible
//! notices; everything else is absorbed.

#[cfg(test)]
#[path = "room_test.rs"]
mod room_test;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use canvas::{ActionLog, Applied, DrawingSurface, DrawingTool, Replayer};
use serde_json::Value;
use uuid::Uuid;
use wire::{
    AccessDeniedPayload, ActionData, ClearData, DrawAction, GuessCorrectPayload, GuessWrongPayload,
    JoinRoomPayload, PhaseChangedPayload, PlayerDescriptor, RematchConfig, RematchRoomCreatedPayload,
    RoomMessagePayload, RoundStartedPayload, UserLeftPayload, WordRevealedPayload, WordToDrawPayload,
};

use crate::hub::{ConnectionState, HubConnection, HubError, HubTransport, TransportEvent};
use crate::requests;
use crate::session::GameSession;
use crate::throttle::{DEFAULT_INTERVAL_MS, EmitThrottle};

/// Maximum user-visible notices retained before the oldest is evicted.
pub const NOTICE_CAP: usize = 20;

/// Family of a user-visible notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    /// The server denied access to the room.
    AccessDenied,
    /// The connection failed terminally.
    ConnectionFailed,
}

/// One transient user-visible notice for the UI layer to show and discard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Notice family.
    pub kind: NoticeKind,
    /// Human-readable text.
    pub text: String,
}

/// State shared between the room's methods and the hub event handlers.
struct RoomState<S: DrawingSurface> {
    log: ActionLog,
    replayer: Replayer<S>,
    session: GameSession,
    notices: Vec<Notice>,
    rematch_room_id: Option<String>,
}

impl<S: DrawingSurface> RoomState<S> {
    /// Record an action and project it onto the surface the way the log
    /// prescribes: on top for drawables, via full rebuild for history edits.
    fn record_and_apply(&mut self, action: DrawAction) {
        match self.log.record(action.clone()) {
            Applied::Incremental => self.replayer.apply_incremental(&action),
            Applied::NeedsRebuild => self.replayer.rebuild(&self.log),
        }
    }

    /// Forget the log and wipe the surface back to blank.
    fn reset_canvas(&mut self) {
        self.log.reset();
        self.replayer.rebuild(&self.log);
    }

    fn push_notice(&mut self, kind: NoticeKind, text: String) {
        if self.notices.len() >= NOTICE_CAP {
            self.notices.remove(0);
        }
        self.notices.push(Notice { kind, text });
    }
}

/// One room visit: local canvas replica, game state, and hub connection.
pub struct Room<S: DrawingSurface + 'static> {
    room_id: String,
    local_player: PlayerDescriptor,
    state: Rc<RefCell<RoomState<S>>>,
    hub: HubConnection,
    throttle: EmitThrottle,
    /// The local drawing tool. Local-only; peers never see it.
    pub tool: DrawingTool,
}

impl<S: DrawingSurface + 'static> Room<S> {
    /// Create the runtime for one room visit.
    ///
    /// Takes exclusive ownership of the drawing surface and the transport.
    /// No I/O happens until [`connect`](Self::connect).
    pub fn create(
        room_id: impl Into<String>,
        local_player: PlayerDescriptor,
        surface: S,
        transport: Box<dyn HubTransport>,
        credential: impl Into<String>,
    ) -> Self {
        let state = Rc::new(RefCell::new(RoomState {
            log: ActionLog::new(),
            replayer: Replayer::new(surface),
            session: GameSession::new(local_player.id.clone()),
            notices: Vec::new(),
            rematch_room_id: None,
        }));

        let mut hub = HubConnection::new(transport, credential);
        {
            let state = Rc::clone(&state);
            hub.set_on_error(move |error| {
                state
                    .borrow_mut()
                    .push_notice(NoticeKind::ConnectionFailed, error.to_string());
            });
        }
        register_handlers(&mut hub, &state);

        Self {
            room_id: room_id.into(),
            local_player,
            state,
            hub,
            throttle: EmitThrottle::new(DEFAULT_INTERVAL_MS),
            tool: DrawingTool::default(),
        }
    }

    /// Open the hub connection. The join request goes out once the transport
    /// reports up.
    ///
    /// # Errors
    ///
    /// Propagates [`HubError::Transport`] when the transport refuses to open.
    pub fn connect(&mut self) -> Result<(), HubError> {
        self.hub.connect()
    }

    /// Feed one transport notification through the hub connection.
    ///
    /// Whenever this completes a (re)connection, the room re-issues its join
    /// request so the server re-associates the transport with the room.
    pub fn handle_transport(&mut self, event: TransportEvent) {
        let was_connected = self.hub.state() == ConnectionState::Connected;
        self.hub.transport_event(event);
        if !was_connected && self.hub.state() == ConnectionState::Connected {
            if let Err(error) = requests::send_join_room(&mut self.hub, &self.room_id, &self.local_player) {
                tracing::warn!(%error, "join request failed after connect");
            }
        }
    }

    /// Draw a finished freehand path with the current tool.
    ///
    /// The stroke always applies locally first; emission to peers goes
    /// through the throttle and may be deferred to a later
    /// [`flush_emission`](Self::flush_emission).
    ///
    /// # Errors
    ///
    /// Propagates [`HubError`] when the leading-edge emission fails. Local
    /// state is already updated at that point.
    pub fn submit_stroke(&mut self, path: &str, now_ms: i64) -> Result<(), HubError> {
        let Some(payload) = self.tool.stroke_payload(path) else {
            return Ok(());
        };
        let action = new_action(ActionData::Stroke(payload), now_ms);
        self.state.borrow_mut().record_and_apply(action.clone());
        if let Some(due) = self.throttle.offer(action, now_ms) {
            requests::send_draw_action(&mut self.hub, &self.room_id, &due)?;
        }
        Ok(())
    }

    /// Draw a shape with the current tool from a finished drag.
    ///
    /// # Errors
    ///
    /// Propagates [`HubError`] when emission fails; local state is already
    /// updated at that point.
    pub fn submit_shape(&mut self, x: f64, y: f64, width: f64, height: f64, now_ms: i64) -> Result<(), HubError> {
        let Some(payload) = self.tool.shape_payload(x, y, width, height) else {
            return Ok(());
        };
        let action = new_action(ActionData::Shape(payload), now_ms);
        self.state.borrow_mut().record_and_apply(action.clone());
        requests::send_draw_action(&mut self.hub, &self.room_id, &action)
    }

    /// Wipe the canvas for everyone.
    ///
    /// # Errors
    ///
    /// Propagates [`HubError`] when emission fails; local state is already
    /// updated at that point.
    pub fn clear_canvas(&mut self, now_ms: i64) -> Result<(), HubError> {
        let action = new_action(ActionData::Clear(ClearData::default()), now_ms);
        self.state.borrow_mut().record_and_apply(action.clone());
        requests::send_draw_action(&mut self.hub, &self.room_id, &action)
    }

    /// Hide the most recent visible edit. No-op when there is nothing to
    /// undo.
    ///
    /// # Errors
    ///
    /// Propagates [`HubError`] when emission fails; local state is already
    /// updated at that point.
    pub fn undo(&mut self, now_ms: i64) -> Result<(), HubError> {
        let action = {
            let mut state = self.state.borrow_mut();
            let Some(action) = state.log.create_undo(now_ms) else {
                return Ok(());
            };
            state.record_and_apply(action.clone());
            action
        };
        requests::send_draw_action(&mut self.hub, &self.room_id, &action)
    }

    /// Restore the most recently hidden edit. No-op when the redo stack is
    /// empty.
    ///
    /// # Errors
    ///
    /// Propagates [`HubError`] when emission fails; local state is already
    /// updated at that point.
    pub fn redo(&mut self, now_ms: i64) -> Result<(), HubError> {
        let action = {
            let mut state = self.state.borrow_mut();
            let Some(action) = state.log.create_redo(now_ms) else {
                return Ok(());
            };
            state.record_and_apply(action.clone());
            action
        };
        requests::send_draw_action(&mut self.hub, &self.room_id, &action)
    }

    /// Release throttled stroke emissions that have come due. Hosts call
    /// this from their frame or timer tick; failures are logged and the
    /// affected actions discarded rather than retried.
    pub fn flush_emission(&mut self, now_ms: i64) {
        for action in self.throttle.flush(now_ms) {
            if let Err(error) = requests::send_draw_action(&mut self.hub, &self.room_id, &action) {
                tracing::warn!(%error, "deferred draw emission failed; discarding");
                break;
            }
        }
    }

    /// Submit a guess for the current word.
    ///
    /// # Errors
    ///
    /// Propagates [`HubError`] from the invocation.
    pub fn send_guess(&mut self, text: &str) -> Result<(), HubError> {
        requests::send_guess_message(&mut self.hub, &self.room_id, text)
    }

    /// Post a waiting-room chat message.
    ///
    /// # Errors
    ///
    /// Propagates [`HubError`] from the invocation.
    pub fn send_message(&mut self, text: &str) -> Result<(), HubError> {
        requests::send_room_message(&mut self.hub, &self.room_id, text)
    }

    /// Ask the server to start the next round.
    ///
    /// # Errors
    ///
    /// Propagates [`HubError`] from the invocation.
    pub fn start_round(&mut self) -> Result<(), HubError> {
        requests::send_start_round(&mut self.hub, &self.room_id)
    }

    /// Ask the server to move the room to a named phase.
    ///
    /// # Errors
    ///
    /// Propagates [`HubError`] from the invocation.
    pub fn set_room_state(&mut self, phase: &str) -> Result<(), HubError> {
        requests::send_set_room_state(&mut self.hub, &self.room_id, phase)
    }

    /// Ask the server to remove a player from the room.
    ///
    /// # Errors
    ///
    /// Propagates [`HubError`] from the invocation.
    pub fn kick_player(&mut self, player: &PlayerDescriptor) -> Result<(), HubError> {
        requests::send_kick_player(&mut self.hub, &self.room_id, player)
    }

    /// Request a rematch room.
    ///
    /// # Errors
    ///
    /// Propagates [`HubError`] from the invocation.
    pub fn request_rematch(&mut self, config: &RematchConfig) -> Result<(), HubError> {
        requests::send_request_rematch(&mut self.hub, &self.room_id, config)
    }

    /// Leave the room: notify the server on a best-effort basis, tear the
    /// connection down, and restore all local state to initial values. Any
    /// in-flight invocation result is discarded.
    pub fn leave(&mut self) {
        let _ = requests::send_leave_room(&mut self.hub, &self.room_id, &self.local_player);
        self.hub.disconnect();
        self.throttle.reset();

        let mut state = self.state.borrow_mut();
        state.reset_canvas();
        state.session.reset();
        state.notices.clear();
        state.rematch_room_id = None;
    }

    /// Current hub connection state.
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.hub.state()
    }

    /// Read access to the game session.
    #[must_use]
    pub fn session(&self) -> Ref<'_, GameSession> {
        Ref::map(self.state.borrow(), |s| &s.session)
    }

    /// Read access to the action log.
    #[must_use]
    pub fn log(&self) -> Ref<'_, ActionLog> {
        Ref::map(self.state.borrow(), |s| &s.log)
    }

    /// Read access to the drawing surface.
    #[must_use]
    pub fn surface(&self) -> Ref<'_, S> {
        Ref::map(self.state.borrow(), |s| s.replayer.surface())
    }

    /// True when an undo is currently possible.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.state.borrow().log.can_undo()
    }

    /// True when a redo is currently possible.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.state.borrow().log.can_redo()
    }

    /// Seconds left in the current timed phase, if one is active.
    #[must_use]
    pub fn remaining_seconds(&self, now_ms: i64) -> Option<i64> {
        self.state.borrow().session.remaining_seconds(now_ms)
    }

    /// Take the pending user-visible notices, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.state.borrow_mut().notices)
    }

    /// Take the rematch room id announced by the server, if one arrived.
    pub fn take_rematch_room(&mut self) -> Option<String> {
        self.state.borrow_mut().rematch_room_id.take()
    }
}

/// Mint a local action with a fresh id.
fn new_action(data: ActionData, now_ms: i64) -> DrawAction {
    DrawAction { id: Uuid::new_v4().to_string(), timestamp: now_ms, data }
}

/// Parse an event payload, logging and dropping it on mismatch.
fn parse_payload<T: serde::de::DeserializeOwned>(event: &str, payload: &Value) -> Option<T> {
    match serde_json::from_value(payload.clone()) {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            tracing::warn!(%event, %error, "malformed event payload; dropping");
            None
        }
    }
}

/// Register one handler per inbound hub event. Handlers share the room state
/// and stay registered for the life of the room, across reconnects.
fn register_handlers<S: DrawingSurface + 'static>(hub: &mut HubConnection, state: &Rc<RefCell<RoomState<S>>>) {
    let st = Rc::clone(state);
    hub.on("JoinRoom", move |payload| {
        if let Some(parsed) = parse_payload::<JoinRoomPayload>("JoinRoom", payload) {
            st.borrow_mut().session.joined(&parsed);
        }
    });

    let st = Rc::clone(state);
    hub.on("UserJoined", move |payload| {
        if let Some(player) = parse_payload::<PlayerDescriptor>("UserJoined", payload) {
            st.borrow_mut().session.user_joined(&player);
        }
    });

    let st = Rc::clone(state);
    hub.on("UserLeft", move |payload| {
        if let Some(parsed) = parse_payload::<UserLeftPayload>("UserLeft", payload) {
            st.borrow_mut().session.user_left(&parsed.player_id);
        }
    });

    let st = Rc::clone(state);
    hub.on("RoomMessageReceived", move |payload| {
        if let Some(parsed) = parse_payload::<RoomMessagePayload>("RoomMessageReceived", payload) {
            st.borrow_mut().session.room_message(&parsed);
        }
    });

    let st = Rc::clone(state);
    hub.on("DrawActionReceived", move |payload| {
        if let Some(action) = parse_payload::<DrawAction>("DrawActionReceived", payload) {
            let mut state = st.borrow_mut();
            // At-least-once delivery: our own echoes and re-deliveries are
            // dropped by id.
            if state.log.contains(&action.id) {
                return;
            }
            state.record_and_apply(action);
        }
    });

    let st = Rc::clone(state);
    hub.on("RoundStarted", move |payload| {
        if let Some(parsed) = parse_payload::<RoundStartedPayload>("RoundStarted", payload) {
            let mut state = st.borrow_mut();
            state.session.round_started(&parsed);
            // Each round draws on a fresh canvas.
            state.reset_canvas();
        }
    });

    let st = Rc::clone(state);
    hub.on("PhaseChanged", move |payload| {
        if let Some(parsed) = parse_payload::<PhaseChangedPayload>("PhaseChanged", payload) {
            st.borrow_mut().session.phase_changed(&parsed);
        }
    });

    let st = Rc::clone(state);
    hub.on("WordToDraw", move |payload| {
        if let Some(parsed) = parse_payload::<WordToDrawPayload>("WordToDraw", payload) {
            st.borrow_mut().session.word_to_draw(&parsed.word);
        }
    });

    let st = Rc::clone(state);
    hub.on("WordRevealed", move |payload| {
        if let Some(parsed) = parse_payload::<WordRevealedPayload>("WordRevealed", payload) {
            st.borrow_mut().session.word_revealed(&parsed.word);
        }
    });

    let st = Rc::clone(state);
    hub.on("GuessMessageWrongReceived", move |payload| {
        if let Some(parsed) = parse_payload::<GuessWrongPayload>("GuessMessageWrongReceived", payload) {
            st.borrow_mut().session.guess_wrong(&parsed);
        }
    });

    let st = Rc::clone(state);
    hub.on("GuessMessageCorrectReceived", move |payload| {
        if let Some(parsed) = parse_payload::<GuessCorrectPayload>("GuessMessageCorrectReceived", payload) {
            st.borrow_mut().session.guess_correct(&parsed);
        }
    });

    let st = Rc::clone(state);
    hub.on("EndedGame", move |_payload| {
        st.borrow_mut().session.ended_game();
    });

    let st = Rc::clone(state);
    hub.on("RematchRoomCreated", move |payload| {
        if let Some(parsed) = parse_payload::<RematchRoomCreatedPayload>("RematchRoomCreated", payload) {
            st.borrow_mut().rematch_room_id = Some(parsed.room_id);
        }
    });

    let st = Rc::clone(state);
    hub.on("NotifyAccessDenied", move |payload| {
        let reason = parse_payload::<AccessDeniedPayload>("NotifyAccessDenied", payload)
            .map_or_else(|| "access denied".to_owned(), |p| p.reason);
        st.borrow_mut().push_notice(NoticeKind::AccessDenied, reason);
    });
}
