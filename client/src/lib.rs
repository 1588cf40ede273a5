//! Game-client core: the realtime hub connection, the server-driven game
//! session state machine, and the per-room runtime that keeps a local canvas
//! replica in sync with peers.
//!
//! Everything here is single-threaded and event-driven: state mutation is
//! synchronous and runs to completion, and the only suspension points are
//! inside the host's transport implementation. The host shell owns the event
//! loop; this crate owns the state.

pub mod hub;
pub mod requests;
pub mod room;
pub mod session;
pub mod throttle;

pub use hub::{ConnectionState, HubConnection, HubError, HubTransport, TransportError, TransportEvent};
pub use room::{Notice, NoticeKind, Room};
pub use session::{GamePhase, GameSession, PlayerEntry};
pub use throttle::EmitThrottle;
