//! Events exchanged over the WebSocket
//!
//! Server events and client commands are JSON objects tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::db::models::Vessel;
use crate::geo::PortProximity;

/// Live position of one vessel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselPosition {
    pub vessel_id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub speed_knots: f64,
    pub status: String,
    pub destination_port_id: Option<String>,
}

impl VesselPosition {
    /// Position of a vessel with valid coordinates
    pub fn from_vessel(vessel: &Vessel) -> Option<Self> {
        let coords = vessel.coordinates().filter(|c| c.is_valid())?;
        Some(Self {
            vessel_id: vessel.id.clone(),
            name: vessel.name.clone(),
            lat: coords.lat,
            lng: coords.lng,
            speed_knots: vessel.speed_knots,
            status: vessel.status.clone(),
            destination_port_id: vessel.destination_port_id.clone(),
        })
    }

    /// Positions of every vessel that has one
    pub fn snapshot(vessels: &[Vessel]) -> Vec<Self> {
        vessels.iter().filter_map(Self::from_vessel).collect()
    }
}

/// Server to client events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsEvent {
    /// Connection established
    Connected { client_id: String, server: String },

    /// Current position of every positioned vessel
    VesselPositions {
        positions: Vec<VesselPosition>,
        timestamp: String,
    },

    /// Vessels within the proximity radius of each port
    PortProximity {
        ports: Vec<PortProximity>,
        timestamp: String,
    },

    /// Proximity events narrowed to one port
    Subscribed { port_id: String },

    /// Port filter cleared
    Unsubscribed,

    /// Keep-alive pong response
    Pong,

    /// Error event
    Error { message: String, code: String },
}

impl WsEvent {
    pub fn vessel_positions(positions: Vec<VesselPosition>) -> Self {
        WsEvent::VesselPositions {
            positions,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn port_proximity(ports: Vec<PortProximity>) -> Self {
        WsEvent::PortProximity {
            ports,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: impl Into<String>, code: impl Into<String>) -> Self {
        WsEvent::Error {
            message: message.into(),
            code: code.into(),
        }
    }

    /// The event as seen by a client subscribed to `port_id`
    ///
    /// Proximity events keep only the subscribed port and are dropped when
    /// it is absent. Every other event passes through unchanged.
    pub fn for_subscription(&self, port_id: Option<&str>) -> Option<WsEvent> {
        match (self, port_id) {
            (WsEvent::PortProximity { ports, timestamp }, Some(port_id)) => {
                let ports: Vec<PortProximity> = ports
                    .iter()
                    .filter(|p| p.port_id == port_id)
                    .cloned()
                    .collect();
                if ports.is_empty() {
                    None
                } else {
                    Some(WsEvent::PortProximity {
                        ports,
                        timestamp: timestamp.clone(),
                    })
                }
            }
            _ => Some(self.clone()),
        }
    }
}

/// Client to server commands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe { port_id: String },
    Unsubscribe,
    Ping,
    /// Request an immediate position snapshot
    Positions,
}
