//! Great-circle geometry and port/vessel proximity
//!
//! All distances are kilometres on a spherical earth.

use serde::{Deserialize, Serialize};

use crate::db::models::{Port, Vessel};

/// Mean earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometres per nautical mile
pub const KM_PER_NAUTICAL_MILE: f64 = 1.852;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and within [-90, 90] x [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.lat.abs() <= 90.0
            && self.lng.abs() <= 180.0
    }
}

/// Haversine distance between two points
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Initial bearing from `from` to `to`, degrees clockwise from north in [0, 360)
pub fn initial_bearing_deg(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlng = (to.lng - from.lng).to_radians();

    let y = dlng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Point reached by travelling `distance_km` from `origin` on `bearing_deg`
///
/// Longitude is normalised into [-180, 180].
pub fn destination_point(origin: Coordinates, bearing_deg: f64, distance_km: f64) -> Coordinates {
    let angular = distance_km / EARTH_RADIUS_KM;
    let bearing = bearing_deg.to_radians();
    let lat1 = origin.lat.to_radians();
    let lng1 = origin.lng.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

    Coordinates::new(lat2.to_degrees(), wrap_longitude(lng2.to_degrees()))
}

/// Wrap a longitude into [-180, 180]
pub fn wrap_longitude(lng: f64) -> f64 {
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lng > 0.0 {
        180.0
    } else {
        wrapped
    }
}

/// A vessel within range of some origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyVessel {
    pub vessel_id: String,
    pub name: String,
    pub vessel_type: String,
    pub status: String,
    pub lat: f64,
    pub lng: f64,
    pub distance_km: f64,
}

/// Vessels within `radius_km` of `origin`, nearest first
///
/// Vessels without a position or with malformed coordinates are skipped.
/// An invalid origin or a non-positive radius yields an empty list.
pub fn find_nearby(
    origin: Coordinates,
    vessels: &[Vessel],
    radius_km: f64,
    limit: Option<usize>,
) -> Vec<NearbyVessel> {
    if !origin.is_valid() || !radius_km.is_finite() || radius_km <= 0.0 {
        return Vec::new();
    }

    let mut nearby: Vec<NearbyVessel> = vessels
        .iter()
        .filter_map(|vessel| {
            let position = vessel.coordinates().filter(Coordinates::is_valid)?;
            let distance_km = haversine_km(origin, position);
            (distance_km <= radius_km).then(|| NearbyVessel {
                vessel_id: vessel.id.clone(),
                name: vessel.name.clone(),
                vessel_type: vessel.vessel_type.clone(),
                status: vessel.status.clone(),
                lat: position.lat,
                lng: position.lng,
                distance_km,
            })
        })
        .collect();

    nearby.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.name.cmp(&b.name))
    });

    if let Some(limit) = limit {
        nearby.truncate(limit);
    }
    nearby
}

/// Vessels near one port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortProximity {
    pub port_id: String,
    pub port_name: String,
    pub radius_km: f64,
    pub vessels: Vec<NearbyVessel>,
}

/// Proximity of every port with valid coordinates
pub fn port_proximity(ports: &[Port], vessels: &[Vessel], radius_km: f64) -> Vec<PortProximity> {
    ports
        .iter()
        .filter(|port| port.coordinates().is_valid())
        .map(|port| PortProximity {
            port_id: port.id.clone(),
            port_name: port.name.clone(),
            radius_km,
            vessels: find_nearby(port.coordinates(), vessels, radius_km, None),
        })
        .collect()
}
