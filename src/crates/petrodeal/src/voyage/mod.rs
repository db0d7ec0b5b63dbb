//! Voyage progress
//!
//! Progress is a linear interpolation between departure and ETA. A
//! generated narrative can be attached through a [`VoyageNarrator`].

pub mod narrator;

pub use narrator::{narrate_or_template, LlmNarrator, TemplateNarrator, VoyageContext, VoyageNarrator};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::models::{Port, Vessel};
use crate::geo::{haversine_km, Coordinates};

/// Percent of the way from `departure` to `eta` at `now`, clamped to [0, 100]
///
/// A zero or negative window counts as complete once `now` reaches `eta`.
pub fn time_progress(departure: DateTime<Utc>, eta: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    if eta <= departure {
        return if now >= eta { 100.0 } else { 0.0 };
    }

    let total = (eta - departure).num_milliseconds() as f64;
    let elapsed = (now - departure).num_milliseconds() as f64;
    (elapsed / total * 100.0).clamp(0.0, 100.0)
}

/// Where a vessel is in its voyage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoyagePhase {
    NotDeparted,
    InTransit,
    Arrived,
    Unknown,
}

impl VoyagePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoyagePhase::NotDeparted => "not_departed",
            VoyagePhase::InTransit => "in_transit",
            VoyagePhase::Arrived => "arrived",
            VoyagePhase::Unknown => "unknown",
        }
    }
}

/// Progress report for one vessel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoyageProgress {
    pub vessel_id: String,
    pub percent: f64,
    pub departure_date: Option<String>,
    pub eta: Option<String>,
    pub distance_total_km: Option<f64>,
    pub distance_remaining_km: Option<f64>,
    pub status: VoyagePhase,
    pub narrative: Option<String>,
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn valid(coordinates: Coordinates) -> Option<Coordinates> {
    coordinates.is_valid().then_some(coordinates)
}

impl VoyageProgress {
    /// Compute progress for `vessel` travelling between the given ports
    pub fn build(
        vessel: &Vessel,
        departure_port: Option<&Port>,
        destination_port: Option<&Port>,
        now: DateTime<Utc>,
    ) -> Self {
        let departure = parse_timestamp(vessel.departure_date.as_deref());
        let eta = parse_timestamp(vessel.eta.as_deref());
        let docked = matches!(vessel.status.as_str(), "at_port" | "moored");

        let (percent, status) = match (departure, eta) {
            (_, Some(eta)) if docked && eta <= now => (100.0, VoyagePhase::Arrived),
            (Some(departure), Some(eta)) => {
                let percent = time_progress(departure, eta, now);
                let phase = if now < departure {
                    VoyagePhase::NotDeparted
                } else if percent >= 100.0 {
                    VoyagePhase::Arrived
                } else {
                    VoyagePhase::InTransit
                };
                (percent, phase)
            }
            _ => (0.0, VoyagePhase::Unknown),
        };

        let origin = departure_port.and_then(|p| valid(p.coordinates()));
        let target = destination_port.and_then(|p| valid(p.coordinates()));
        let position = vessel.coordinates().and_then(valid);

        let distance_total_km = origin.zip(target).map(|(a, b)| haversine_km(a, b));
        let distance_remaining_km = position.zip(target).map(|(a, b)| haversine_km(a, b));

        Self {
            vessel_id: vessel.id.clone(),
            percent,
            departure_date: vessel.departure_date.clone(),
            eta: vessel.eta.clone(),
            distance_total_km,
            distance_remaining_km,
            status,
            narrative: None,
        }
    }
}
