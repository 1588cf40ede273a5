use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Value, json};

use super::*;

#[derive(Default)]
struct TransportLog {
    opened: u32,
    closed: u32,
    credentials: Vec<String>,
    sent: Vec<(String, Value)>,
    fail_open: bool,
    fail_invoke: bool,
}

/// Test transport that records every call through a shared handle.
#[derive(Clone, Default)]
struct FakeTransport(Rc<RefCell<TransportLog>>);

impl HubTransport for FakeTransport {
    fn open(&mut self, credential: &str) -> Result<(), TransportError> {
        let mut log = self.0.borrow_mut();
        if log.fail_open {
            return Err(TransportError::Failed("open refused".to_owned()));
        }
        log.opened += 1;
        log.credentials.push(credential.to_owned());
        Ok(())
    }

    fn close(&mut self) {
        self.0.borrow_mut().closed += 1;
    }

    fn invoke(&mut self, method: &str, args: Value) -> Result<(), TransportError> {
        let mut log = self.0.borrow_mut();
        if log.fail_invoke {
            return Err(TransportError::Failed("send failed".to_owned()));
        }
        log.sent.push((method.to_owned(), args));
        Ok(())
    }
}

fn hub() -> (HubConnection, FakeTransport) {
    let transport = FakeTransport::default();
    let hub = HubConnection::new(Box::new(transport.clone()), "ticket-1");
    (hub, transport)
}

fn connected_hub() -> (HubConnection, FakeTransport) {
    let (mut hub, transport) = hub();
    hub.connect().unwrap();
    hub.transport_event(TransportEvent::Opened);
    (hub, transport)
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn new_hub_is_disconnected() {
    let (hub, _transport) = hub();
    assert_eq!(hub.state(), ConnectionState::Disconnected);
}

#[test]
fn connect_opens_transport_with_credential() {
    let (mut hub, transport) = hub();
    hub.connect().unwrap();
    assert_eq!(hub.state(), ConnectionState::Connecting);
    assert_eq!(transport.0.borrow().opened, 1);
    assert_eq!(transport.0.borrow().credentials, vec!["ticket-1"]);
}

#[test]
fn connect_while_connecting_is_noop() {
    let (mut hub, transport) = hub();
    hub.connect().unwrap();
    hub.connect().unwrap();
    assert_eq!(transport.0.borrow().opened, 1);
}

#[test]
fn connect_while_connected_is_noop() {
    let (mut hub, transport) = connected_hub();
    hub.connect().unwrap();
    assert_eq!(hub.state(), ConnectionState::Connected);
    assert_eq!(transport.0.borrow().opened, 1);
}

#[test]
fn connect_failure_stays_disconnected() {
    let (mut hub, transport) = hub();
    transport.0.borrow_mut().fail_open = true;
    assert!(matches!(hub.connect(), Err(HubError::Transport(_))));
    assert_eq!(hub.state(), ConnectionState::Disconnected);
}

#[test]
fn opened_event_completes_connection() {
    let (mut hub, _transport) = hub();
    hub.connect().unwrap();
    hub.transport_event(TransportEvent::Opened);
    assert_eq!(hub.state(), ConnectionState::Connected);
}

#[test]
fn stale_opened_while_disconnected_is_ignored() {
    let (mut hub, _transport) = hub();
    hub.transport_event(TransportEvent::Opened);
    assert_eq!(hub.state(), ConnectionState::Disconnected);
}

#[test]
fn disconnect_closes_transport_and_is_idempotent() {
    let (mut hub, transport) = connected_hub();
    hub.disconnect();
    hub.disconnect();
    assert_eq!(hub.state(), ConnectionState::Disconnected);
    assert_eq!(transport.0.borrow().closed, 2);
}

#[test]
fn lost_then_opened_reconnects() {
    let (mut hub, _transport) = connected_hub();
    hub.transport_event(TransportEvent::Lost);
    assert_eq!(hub.state(), ConnectionState::Reconnecting);
    hub.transport_event(TransportEvent::Opened);
    assert_eq!(hub.state(), ConnectionState::Connected);
}

#[test]
fn failed_event_disconnects_and_reports() {
    let (mut hub, _transport) = connected_hub();
    let reported = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&reported);
    hub.set_on_error(move |error| sink.borrow_mut().push(error.to_string()));

    hub.transport_event(TransportEvent::Failed("socket torn".to_owned()));
    assert_eq!(hub.state(), ConnectionState::Disconnected);
    assert_eq!(reported.borrow().len(), 1);
    assert!(reported.borrow()[0].contains("socket torn"));
}

// =============================================================
// Invoke gating
// =============================================================

#[test]
fn invoke_while_disconnected_is_rejected() {
    let (mut hub, transport) = hub();
    let result = hub.invoke("JoinRoom", json!({}));
    assert!(matches!(result, Err(HubError::NotConnected)));
    assert!(transport.0.borrow().sent.is_empty());
}

#[test]
fn invoke_while_connecting_is_rejected() {
    let (mut hub, _transport) = hub();
    hub.connect().unwrap();
    assert!(matches!(hub.invoke("JoinRoom", json!({})), Err(HubError::NotConnected)));
}

#[test]
fn invoke_while_reconnecting_is_rejected() {
    let (mut hub, _transport) = connected_hub();
    hub.transport_event(TransportEvent::Lost);
    assert!(matches!(hub.invoke("JoinRoom", json!({})), Err(HubError::NotConnected)));
}

#[test]
fn invoke_while_connected_sends() {
    let (mut hub, transport) = connected_hub();
    hub.invoke("StartRound", json!({"roomId": "r1"})).unwrap();
    let sent = &transport.0.borrow().sent;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "StartRound");
    assert_eq!(sent[0].1["roomId"], "r1");
}

#[test]
fn invoke_transport_failure_surfaces_once() {
    let (mut hub, transport) = connected_hub();
    transport.0.borrow_mut().fail_invoke = true;
    assert!(matches!(hub.invoke("StartRound", json!({})), Err(HubError::Transport(_))));
}

// =============================================================
// Handler registry and dispatch
// =============================================================

#[test]
fn handler_registered_before_connect_fires() {
    let (mut hub, _transport) = hub();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    hub.on("WordRevealed", move |payload| sink.borrow_mut().push(payload.clone()));

    hub.connect().unwrap();
    hub.transport_event(TransportEvent::Opened);
    hub.transport_event(TransportEvent::Message {
        event: "WordRevealed".to_owned(),
        payload: json!({"word": "c_t"}),
    });
    assert_eq!(seen.borrow().len(), 1);
    assert_eq!(seen.borrow()[0]["word"], "c_t");
}

#[test]
fn handler_survives_reconnect_without_reregistration() {
    let (mut hub, _transport) = connected_hub();
    let seen = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&seen);
    hub.on("RoundStarted", move |_| *sink.borrow_mut() += 1);

    hub.transport_event(TransportEvent::Lost);
    hub.transport_event(TransportEvent::Opened);
    hub.transport_event(TransportEvent::Message {
        event: "RoundStarted".to_owned(),
        payload: json!({}),
    });
    assert_eq!(*seen.borrow(), 1);
}

#[test]
fn handler_survives_explicit_disconnect_and_reconnect() {
    let (mut hub, _transport) = connected_hub();
    let seen = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&seen);
    hub.on("EndedGame", move |_| *sink.borrow_mut() += 1);

    hub.disconnect();
    hub.connect().unwrap();
    hub.transport_event(TransportEvent::Opened);
    hub.transport_event(TransportEvent::Message { event: "EndedGame".to_owned(), payload: json!({}) });
    assert_eq!(*seen.borrow(), 1);
}

#[test]
fn off_unregisters_handler() {
    let (mut hub, _transport) = connected_hub();
    let seen = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&seen);
    hub.on("EndedGame", move |_| *sink.borrow_mut() += 1);
    hub.off("EndedGame");

    hub.transport_event(TransportEvent::Message { event: "EndedGame".to_owned(), payload: json!({}) });
    assert_eq!(*seen.borrow(), 0);
}

#[test]
fn dispatch_preserves_delivery_order() {
    let (mut hub, _transport) = connected_hub();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    hub.on("RoomMessageReceived", move |payload| {
        sink.borrow_mut().push(payload["text"].as_str().unwrap_or_default().to_owned());
    });

    for text in ["first", "second", "third"] {
        hub.transport_event(TransportEvent::Message {
            event: "RoomMessageReceived".to_owned(),
            payload: json!({"text": text}),
        });
    }
    assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn unhandled_event_is_dropped() {
    let (mut hub, _transport) = connected_hub();
    // Must absorb quietly; there is no handler for this name.
    hub.transport_event(TransportEvent::Message {
        event: "SomethingNew".to_owned(),
        payload: json!({"x": 1}),
    });
    assert_eq!(hub.state(), ConnectionState::Connected);
}
