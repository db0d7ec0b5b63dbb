//! WebSocket handler for real-time updates
//!
//! GET /ws upgrades to a socket that forwards broadcast events and answers
//! client commands.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use super::error::{WsError, WsResult};
use super::events::{ClientMessage, VesselPosition, WsEvent};
use crate::api::middleware::RealtimeClient;
use crate::api::routes::AppState;
use crate::db::repositories::{PortRepository, VesselRepository};

/// Events buffered per receiver before a slow client starts skipping
pub const BROADCAST_CAPACITY: usize = 100;

/// WebSocket broadcast state
#[derive(Debug, Clone)]
pub struct BroadcastState {
    /// Broadcast sender for events
    pub tx: broadcast::Sender<WsEvent>,
}

impl BroadcastState {
    pub fn new() -> Self {
        Self::with_capacity(BROADCAST_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Broadcast an event to all subscribers; returns how many received it
    pub fn broadcast(&self, event: WsEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WsEvent> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastState {
    fn default() -> Self {
        Self::new()
    }
}

/// GET /ws?token=
///
/// Needs a session whose plan includes real-time updates; the check runs
/// before the upgrade so refused clients get a plain HTTP error.
pub async fn ws_handler(
    client: RealtimeClient,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, client))
}

/// What a client receives of one broadcast event
///
/// Proximity events need port insights and follow the client's port filter.
pub fn deliverable(event: &WsEvent, port_filter: Option<&str>, port_insights: bool) -> Option<WsEvent> {
    if !port_insights && matches!(event, WsEvent::PortProximity { .. }) {
        return None;
    }
    event.for_subscription(port_filter)
}

type WsSink = SplitSink<WebSocket, Message>;

async fn send_event(sink: &mut WsSink, state: &AppState, client_id: &str, event: &WsEvent) -> WsResult<()> {
    let text = serde_json::to_string(event)?;
    let bytes = text.len() as u64;
    sink.send(Message::Text(text))
        .await
        .map_err(|e| WsError::Send(e.to_string()))?;
    state.metrics.record_message_sent(bytes);
    state.connections.increment_message_count(client_id);
    Ok(())
}

async fn handle_socket(socket: WebSocket, state: AppState, client: RealtimeClient) {
    let (mut sink, mut stream) = socket.split();

    let client_id = match state.connections.connect() {
        Ok(id) => id,
        Err(e) => {
            warn!("Rejecting WebSocket client: {}", e);
            state.metrics.record_rejection();
            if let Ok(text) = serde_json::to_string(&WsEvent::error(e.to_string(), e.code())) {
                let _ = sink.send(Message::Text(text)).await;
            }
            let _ = sink.send(Message::Close(None)).await;
            return;
        }
    };

    state.metrics.record_connection();
    let mut rx = state.broadcast.subscribe();
    info!(client_id = %client_id, user_id = %client.user.id, "WebSocket client connected");

    let connected = WsEvent::Connected {
        client_id: client_id.clone(),
        server: state.config.server.name.clone(),
    };

    if send_event(&mut sink, &state, &client_id, &connected).await.is_ok() {
        loop {
            tokio::select! {
                incoming = stream.next() => match incoming {
                    Some(Ok(Message::Text(text))) => {
                        state.metrics.record_message_received(text.len() as u64);
                        state.connections.record_activity(&client_id);
                        let reply = handle_client_message(&state, &client_id, &text).await;
                        if let Err(e) = send_event(&mut sink, &state, &client_id, &reply).await {
                            if e.is_fatal() {
                                break;
                            }
                            warn!(client_id = %client_id, "Dropped WebSocket reply: {}", e);
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => state.connections.record_activity(&client_id),
                    Some(Err(e)) => {
                        debug!(client_id = %client_id, "WebSocket read failed: {}", e);
                        state.metrics.record_error();
                        break;
                    }
                },
                event = rx.recv() => match event {
                    Ok(event) => {
                        let filter = state.connections.port_filter(&client_id);
                        if let Some(event) = deliverable(&event, filter.as_deref(), client.port_insights) {
                            if let Err(e) = send_event(&mut sink, &state, &client_id, &event).await {
                                if e.is_fatal() {
                                    break;
                                }
                                warn!(client_id = %client_id, "Dropped WebSocket event: {}", e);
                            }
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(client_id = %client_id, skipped, "WebSocket client lagging, skipped events");
                        state.metrics.record_skipped(skipped);
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
    }

    state.connections.disconnect(&client_id);
    state.metrics.record_disconnection();
    info!(client_id = %client_id, "WebSocket client disconnected");
}

/// Answer one text frame from a client
///
/// Every command gets exactly one reply event; failures become `error`
/// events and the connection stays open.
pub async fn handle_client_message(state: &AppState, client_id: &str, text: &str) -> WsEvent {
    match dispatch(state, client_id, text).await {
        Ok(event) => event,
        Err(e) => {
            state.metrics.record_error();
            debug!(client_id, "WebSocket command failed: {}", e);
            WsEvent::error(e.to_string(), e.code())
        }
    }
}

async fn dispatch(state: &AppState, client_id: &str, text: &str) -> WsResult<WsEvent> {
    let message: ClientMessage =
        serde_json::from_str(text).map_err(|e| WsError::InvalidMessage(e.to_string()))?;

    match message {
        ClientMessage::Subscribe { port_id } => {
            if PortRepository::get_by_id(state.db.pool(), &port_id).await?.is_none() {
                return Err(WsError::UnknownPort(port_id));
            }
            state.connections.set_port_filter(client_id, Some(port_id.clone()));
            Ok(WsEvent::Subscribed { port_id })
        }
        ClientMessage::Unsubscribe => {
            state.connections.set_port_filter(client_id, None);
            Ok(WsEvent::Unsubscribed)
        }
        ClientMessage::Ping => Ok(WsEvent::Pong),
        ClientMessage::Positions => {
            let vessels = VesselRepository::list_positioned(state.db.pool()).await?;
            Ok(WsEvent::vessel_positions(VesselPosition::snapshot(&vessels)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::db::repositories::{NewPort, NewVessel};
    use crate::db::DatabaseConnection;

    async fn state() -> AppState {
        let db = DatabaseConnection::in_memory().await.unwrap();
        AppState::new(db, ServerConfig::default())
    }

    #[test]
    fn test_broadcast_without_receivers() {
        let broadcast = BroadcastState::new();
        assert_eq!(broadcast.receiver_count(), 0);
        assert_eq!(broadcast.broadcast(WsEvent::Pong), 0);
    }

    #[tokio::test]
    async fn test_lagging_receiver_skips_events() {
        let broadcast = BroadcastState::with_capacity(2);
        let mut rx = broadcast.subscribe();
        for _ in 0..5 {
            broadcast.broadcast(WsEvent::Pong);
        }
        assert!(matches!(rx.recv().await, Err(RecvError::Lagged(3))));
        assert_eq!(rx.recv().await.unwrap(), WsEvent::Pong);
    }

    #[test]
    fn test_proximity_needs_port_insights() {
        let proximity = WsEvent::port_proximity(Vec::new());
        assert_eq!(deliverable(&proximity, None, false), None);
        assert_eq!(deliverable(&proximity, None, true), Some(proximity.clone()));

        let positions = WsEvent::vessel_positions(Vec::new());
        assert_eq!(deliverable(&positions, None, false), Some(positions.clone()));
        assert_eq!(deliverable(&WsEvent::Pong, Some("p-1"), false), Some(WsEvent::Pong));
    }

    #[tokio::test]
    async fn test_ping_and_malformed_messages() {
        let state = state().await;
        let client_id = state.connections.connect().unwrap();

        assert_eq!(handle_client_message(&state, &client_id, r#"{"type":"ping"}"#).await, WsEvent::Pong);

        match handle_client_message(&state, &client_id, "not json").await {
            WsEvent::Error { code, .. } => assert_eq!(code, "INVALID_MESSAGE"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(state.metrics.snapshot().error_count, 1);
    }

    #[tokio::test]
    async fn test_subscribe_requires_known_port() {
        let state = state().await;
        let client_id = state.connections.connect().unwrap();

        match handle_client_message(&state, &client_id, r#"{"type":"subscribe","port_id":"nope"}"#).await {
            WsEvent::Error { code, .. } => assert_eq!(code, "PORT_NOT_FOUND"),
            other => panic!("unexpected {:?}", other),
        }

        PortRepository::create(
            state.db.pool(),
            "p-1",
            NewPort {
                name: "Rotterdam".into(),
                country: "Netherlands".into(),
                region: "Europe".into(),
                lat: 51.95,
                lng: 4.14,
                port_type: "oil".into(),
                status: "operational".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let reply = handle_client_message(&state, &client_id, r#"{"type":"subscribe","port_id":"p-1"}"#).await;
        assert_eq!(reply, WsEvent::Subscribed { port_id: "p-1".into() });
        assert_eq!(state.connections.port_filter(&client_id).as_deref(), Some("p-1"));

        let reply = handle_client_message(&state, &client_id, r#"{"type":"unsubscribe"}"#).await;
        assert_eq!(reply, WsEvent::Unsubscribed);
        assert_eq!(state.connections.port_filter(&client_id), None);
    }

    #[tokio::test]
    async fn test_positions_snapshot() {
        let state = state().await;
        let client_id = state.connections.connect().unwrap();

        VesselRepository::create(
            state.db.pool(),
            "v-1",
            NewVessel {
                name: "Aegean Star".into(),
                imo: "9321483".into(),
                vessel_type: "VLCC".into(),
                current_lat: Some(25.0),
                current_lng: Some(55.0),
                speed_knots: 12.0,
                status: "underway".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        match handle_client_message(&state, &client_id, r#"{"type":"positions"}"#).await {
            WsEvent::VesselPositions { positions, .. } => {
                assert_eq!(positions.len(), 1);
                assert_eq!(positions[0].vessel_id, "v-1");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
