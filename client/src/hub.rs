//! Realtime hub connection manager.
//!
//! SYSTEM CONTEXT
//! ==============
//! One logical connection to the game's event hub per room visit. The actual
//! socket (and its reconnect machinery) is a host capability behind
//! [`HubTransport`]; this manager owns the lifecycle state, the outbound
//! invoke gate, and the inbound handler registry. Handlers are held locally
//! and survive transport churn, so a handler registered before a network drop
//! keeps firing after the transport comes back — callers never re-register.
//!
//! ERROR HANDLING
//! ==============
//! Invoking while not connected fails synchronously and is never queued or
//! retried. Terminal transport failures land in a caller-supplied error
//! callback; transient drops only flip the state to `Reconnecting`.

#[cfg(test)]
#[path = "hub_test.rs"]
mod hub_test;

use std::collections::HashMap;

use serde_json::Value;

/// Connection lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No transport; nothing in flight.
    #[default]
    Disconnected,
    /// Transport open requested, not yet up.
    Connecting,
    /// Transport up; outbound invocations are valid.
    Connected,
    /// Transport dropped transiently and is re-establishing itself.
    Reconnecting,
}

/// Error reported by a [`HubTransport`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The transport could not open or deliver.
    #[error("transport failure: {0}")]
    Failed(String),
}

/// Error surfaced to callers of the connection manager.
#[derive(Debug, thiserror::Error)]
pub enum HubError {
    /// An outbound invocation was attempted outside the `Connected` state.
    #[error("not connected to the hub")]
    NotConnected,
    /// The transport failed while opening or delivering.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// The capability a host socket implementation exposes to the manager.
///
/// Reconnection is the transport's own concern: after a transient drop it
/// keeps trying and reports the outcome through [`TransportEvent`]s.
pub trait HubTransport {
    /// Begin opening the transport, authenticating with `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the open cannot even be started.
    fn open(&mut self, credential: &str) -> Result<(), TransportError>;

    /// Tear the transport down. Must be safe to call in any state.
    fn close(&mut self);

    /// Send one outbound method invocation.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the message cannot be handed to the
    /// socket.
    fn invoke(&mut self, method: &str, args: Value) -> Result<(), TransportError>;
}

/// Lifecycle and traffic notifications pushed in by the transport.
#[derive(Clone, Debug)]
pub enum TransportEvent {
    /// The transport is up (first open or reconnect success).
    Opened,
    /// One inbound hub event, in delivery order.
    Message {
        /// Hub event name, e.g. `"DrawActionReceived"`.
        event: String,
        /// Raw JSON payload.
        payload: Value,
    },
    /// Transient drop; the transport is retrying on its own.
    Lost,
    /// Terminal failure; the transport has given up.
    Failed(String),
}

type EventHandler = Box<dyn FnMut(&Value)>;
type ErrorCallback = Box<dyn FnMut(&HubError)>;

/// One logical connection to the game's event hub.
pub struct HubConnection {
    transport: Box<dyn HubTransport>,
    credential: String,
    state: ConnectionState,
    handlers: HashMap<String, EventHandler>,
    on_error: Option<ErrorCallback>,
}

impl HubConnection {
    /// Wrap a transport. No I/O happens until [`connect`](Self::connect).
    pub fn new(transport: Box<dyn HubTransport>, credential: impl Into<String>) -> Self {
        Self {
            transport,
            credential: credential.into(),
            state: ConnectionState::Disconnected,
            handlers: HashMap::new(),
            on_error: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Install the callback that receives terminal connection errors.
    pub fn set_on_error(&mut self, callback: impl FnMut(&HubError) + 'static) {
        self.on_error = Some(Box::new(callback));
    }

    /// Open the connection. No-op when already connected or connecting.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Transport`] when the transport refuses to start
    /// opening; the connection stays `Disconnected`.
    pub fn connect(&mut self) -> Result<(), HubError> {
        match self.state {
            ConnectionState::Connected | ConnectionState::Connecting | ConnectionState::Reconnecting => Ok(()),
            ConnectionState::Disconnected => {
                self.transport.open(&self.credential)?;
                self.state = ConnectionState::Connecting;
                tracing::debug!("hub connecting");
                Ok(())
            }
        }
    }

    /// Tear the connection down. Idempotent; the handler registry survives
    /// so a later [`connect`](Self::connect) picks it back up.
    pub fn disconnect(&mut self) {
        self.transport.close();
        self.state = ConnectionState::Disconnected;
        tracing::debug!("hub disconnected");
    }

    /// Invoke an outbound hub method.
    ///
    /// # Errors
    ///
    /// [`HubError::NotConnected`] outside the `Connected` state — callers
    /// gate UI actions on [`state`](Self::state) rather than relying on
    /// queueing. [`HubError::Transport`] when the send itself fails; the
    /// failure is surfaced once and never retried here.
    pub fn invoke(&mut self, method: &str, args: Value) -> Result<(), HubError> {
        if self.state != ConnectionState::Connected {
            return Err(HubError::NotConnected);
        }
        self.transport.invoke(method, args)?;
        Ok(())
    }

    /// Register the handler for one inbound event name, replacing any
    /// previous one. Safe to call before any connection exists.
    pub fn on(&mut self, event: impl Into<String>, handler: impl FnMut(&Value) + 'static) {
        self.handlers.insert(event.into(), Box::new(handler));
    }

    /// Unregister the handler for an event name, if any.
    pub fn off(&mut self, event: &str) {
        self.handlers.remove(event);
    }

    /// Feed one transport notification into the manager.
    ///
    /// Messages are dispatched to handlers in exactly the order this method
    /// is called — no reordering, no buffering.
    pub fn transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Opened => match self.state {
                ConnectionState::Connecting | ConnectionState::Reconnecting => {
                    self.state = ConnectionState::Connected;
                    tracing::debug!("hub connected");
                }
                ConnectionState::Disconnected | ConnectionState::Connected => {
                    tracing::warn!(state = ?self.state, "ignoring stale transport open");
                }
            },
            TransportEvent::Message { event, payload } => {
                if let Some(handler) = self.handlers.get_mut(&event) {
                    handler(&payload);
                } else {
                    tracing::debug!(%event, "no handler registered; dropping event");
                }
            }
            TransportEvent::Lost => {
                if matches!(self.state, ConnectionState::Connected | ConnectionState::Connecting) {
                    self.state = ConnectionState::Reconnecting;
                    tracing::debug!("hub reconnecting");
                }
            }
            TransportEvent::Failed(reason) => {
                self.state = ConnectionState::Disconnected;
                let error = HubError::Transport(TransportError::Failed(reason));
                tracing::warn!(%error, "hub connection failed");
                if let Some(callback) = self.on_error.as_mut() {
                    callback(&error);
                }
            }
        }
    }
}
