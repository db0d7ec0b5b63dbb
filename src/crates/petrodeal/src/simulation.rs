//! Vessel movement simulator and periodic broadcasts
//!
//! Two background loops run on `tokio::time::interval`: one advances underway
//! vessels toward their destination ports and persists the new positions,
//! the other computes port proximity and pushes both snapshots to WebSocket
//! subscribers.

use std::collections::HashMap;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::ws::{BroadcastState, VesselPosition, WsEvent};
use crate::config::{ServerConfig, SimulationConfig};
use crate::db::models::{Port, Vessel};
use crate::db::repositories::{PortRepository, VesselRepository};
use crate::db::{DatabaseConnection, DatabasePool, DbResult};
use crate::geo::{
    destination_point, haversine_km, initial_bearing_deg, port_proximity, wrap_longitude,
    Coordinates, KM_PER_NAUTICAL_MILE,
};

/// Largest random deviation from the course to the destination, in degrees
pub const HEADING_JITTER_DEG: f64 = 5.0;

/// Simulated positions stay clear of the poles
pub const MAX_ABS_LAT: f64 = 85.0;

/// New position for one vessel
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub vessel_id: String,
    pub lat: f64,
    pub lng: f64,
    pub status: String,
    /// Snapped onto the destination port this tick
    pub arrived: bool,
}

fn bounded(point: Coordinates) -> Coordinates {
    let lng = if point.lng.abs() <= 180.0 { point.lng } else { wrap_longitude(point.lng) };
    Coordinates::new(point.lat.clamp(-MAX_ABS_LAT, MAX_ABS_LAT), lng)
}

/// Advance one vessel by `elapsed`
///
/// Only underway vessels with a valid position move. Returns `None` when the
/// vessel stays where it is.
pub fn step_vessel<R: Rng + ?Sized>(
    vessel: &Vessel,
    destination: Option<&Port>,
    elapsed: Duration,
    config: &SimulationConfig,
    rng: &mut R,
) -> Option<Movement> {
    if !vessel.is_underway() {
        return None;
    }
    let position = vessel.coordinates().filter(Coordinates::is_valid)?;

    let hours = elapsed.as_secs_f64() / 3600.0;
    let step_km = (vessel.speed_knots.max(0.0) * KM_PER_NAUTICAL_MILE * hours).min(config.max_step_km);
    let target = destination.map(Port::coordinates).filter(Coordinates::is_valid);

    if let Some(target) = target {
        let remaining_km = haversine_km(position, target);
        if remaining_km <= config.arrival_threshold_km || (step_km > 0.0 && remaining_km <= step_km) {
            let port = bounded(target);
            return Some(Movement {
                vessel_id: vessel.id.clone(),
                lat: port.lat,
                lng: port.lng,
                status: "at_port".to_string(),
                arrived: true,
            });
        }
    }

    if !step_km.is_finite() || step_km <= 0.0 {
        return None;
    }

    let bearing = match target {
        Some(target) => {
            initial_bearing_deg(position, target)
                + rng.gen_range(-HEADING_JITTER_DEG..=HEADING_JITTER_DEG)
        }
        // No destination: drift
        None => rng.gen_range(0.0..360.0),
    };

    let next = bounded(destination_point(position, bearing, step_km));
    Some(Movement {
        vessel_id: vessel.id.clone(),
        lat: next.lat,
        lng: next.lng,
        status: vessel.status.clone(),
        arrived: false,
    })
}

/// Move every underway vessel once and persist the results
///
/// Returns the movements applied.
pub async fn simulate_tick<R: Rng + ?Sized>(
    pool: &DatabasePool,
    config: &SimulationConfig,
    elapsed: Duration,
    rng: &mut R,
) -> DbResult<Vec<Movement>> {
    let vessels = VesselRepository::list_underway(pool).await?;
    if vessels.is_empty() {
        return Ok(Vec::new());
    }

    let ports: HashMap<String, Port> = PortRepository::list(pool)
        .await?
        .into_iter()
        .map(|p| (p.id.clone(), p))
        .collect();

    let movements = vessels
        .iter()
        .filter_map(|vessel| {
            let destination = vessel
                .destination_port_id
                .as_deref()
                .and_then(|id| ports.get(id));
            step_vessel(vessel, destination, elapsed, config, rng)
        })
        .collect();

    apply_movements(pool, movements).await
}

/// Persist movements, skipping vessels deleted since they were listed
///
/// Returns the movements that were stored.
pub async fn apply_movements(pool: &DatabasePool, movements: Vec<Movement>) -> DbResult<Vec<Movement>> {
    let mut applied = Vec::with_capacity(movements.len());
    for movement in movements {
        match VesselRepository::update_position(pool, &movement.vessel_id, movement.lat, movement.lng, &movement.status)
            .await
        {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                warn!(vessel_id = %movement.vessel_id, "Vessel removed before its position was saved");
                continue;
            }
            Err(e) => return Err(e),
        }
        if movement.arrived {
            info!(vessel_id = %movement.vessel_id, "Vessel arrived at destination");
        }
        applied.push(movement);
    }

    Ok(applied)
}

/// Broadcast the position and proximity snapshots
///
/// Returns how many subscribers received the positions event.
pub async fn broadcast_tick(
    pool: &DatabasePool,
    broadcast: &BroadcastState,
    radius_km: f64,
) -> DbResult<usize> {
    if broadcast.receiver_count() == 0 {
        return Ok(0);
    }

    let vessels = VesselRepository::list_positioned(pool).await?;
    let ports = PortRepository::list(pool).await?;

    let delivered = broadcast.broadcast(WsEvent::vessel_positions(VesselPosition::snapshot(&vessels)));
    broadcast.broadcast(WsEvent::port_proximity(port_proximity(&ports, &vessels, radius_km)));
    Ok(delivered)
}

/// Handles to the running background loops
pub struct BackgroundTasks {
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    /// Start the movement loop (when enabled) and the broadcast loop
    pub fn spawn(db: DatabaseConnection, broadcast: BroadcastState, config: &ServerConfig) -> Self {
        let mut handles = Vec::new();

        if config.simulation.enabled {
            let pool = db.pool().clone();
            let simulation = config.simulation.clone();
            handles.push(tokio::spawn(async move {
                movement_loop(pool, simulation).await;
            }));
        } else {
            info!("Vessel simulation disabled");
        }

        let pool = db.pool().clone();
        let radius_km = config.proximity.default_radius_km;
        let every = Duration::from_secs(config.proximity.broadcast_interval_secs.max(1));
        handles.push(tokio::spawn(async move {
            broadcast_loop(pool, broadcast, radius_km, every).await;
        }));

        Self { handles }
    }

    /// Number of running loops
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Abort every loop
    pub fn shutdown(self) {
        for handle in &self.handles {
            handle.abort();
        }
        info!("Background tasks stopped");
    }
}

async fn movement_loop(pool: DatabasePool, config: SimulationConfig) {
    let every = Duration::from_secs(config.interval_secs.max(1));
    let mut ticker = tokio::time::interval(every);
    let mut rng = StdRng::from_entropy();
    info!(interval_secs = every.as_secs(), "Vessel simulation started");

    // The first tick completes immediately
    ticker.tick().await;
    loop {
        ticker.tick().await;
        match simulate_tick(&pool, &config, every, &mut rng).await {
            Ok(moved) if !moved.is_empty() => debug!(moved = moved.len(), "Simulation tick"),
            Ok(_) => {}
            Err(e) => warn!("Simulation tick failed: {}", e),
        }
    }
}

async fn broadcast_loop(pool: DatabasePool, broadcast: BroadcastState, radius_km: f64, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        match broadcast_tick(&pool, &broadcast, radius_km).await {
            Ok(0) => {}
            Ok(delivered) => debug!(delivered, "Broadcast vessel snapshot"),
            Err(e) => warn!("Proximity broadcast failed: {}", e),
        }
    }
}
