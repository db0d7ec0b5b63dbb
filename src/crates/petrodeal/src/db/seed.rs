//! Sample reference data for demos and local development
//!
//! Seeding is idempotent: rows are matched by their natural key (company and
//! port/refinery name, vessel IMO) and skipped when already present.

use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::connection::DatabasePool;
use crate::db::error::DbResult;
use crate::db::repositories::{
    CompanyRepository, NewCompany, NewPort, NewRefinery, NewVessel, PortRepository,
    RefineryRepository, VesselRepository,
};

/// Counts of rows inserted by one seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct SeedReport {
    pub companies: usize,
    pub ports: usize,
    pub refineries: usize,
    pub vessels: usize,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.companies + self.ports + self.refineries + self.vessels
    }
}

struct PortSeed {
    name: &'static str,
    country: &'static str,
    region: &'static str,
    lat: f64,
    lng: f64,
    port_type: &'static str,
    capacity: i64,
}

const PORTS: &[PortSeed] = &[
    PortSeed { name: "Rotterdam", country: "Netherlands", region: "Europe", lat: 51.95, lng: 4.14, port_type: "oil", capacity: 100_000_000 },
    PortSeed { name: "Fujairah", country: "United Arab Emirates", region: "Middle East", lat: 25.17, lng: 56.36, port_type: "oil", capacity: 70_000_000 },
    PortSeed { name: "Houston", country: "United States", region: "North America", lat: 29.73, lng: -95.27, port_type: "mixed", capacity: 80_000_000 },
    PortSeed { name: "Ras Tanura", country: "Saudi Arabia", region: "Middle East", lat: 26.64, lng: 50.16, port_type: "oil", capacity: 120_000_000 },
    PortSeed { name: "Singapore", country: "Singapore", region: "Asia", lat: 1.26, lng: 103.84, port_type: "mixed", capacity: 90_000_000 },
];

struct RefinerySeed {
    name: &'static str,
    country: &'static str,
    region: &'static str,
    lat: f64,
    lng: f64,
    capacity_bpd: i64,
    operator: &'static str,
}

const REFINERIES: &[RefinerySeed] = &[
    RefinerySeed { name: "Jamnagar", country: "India", region: "Asia", lat: 22.35, lng: 69.86, capacity_bpd: 1_240_000, operator: "Reliance Industries" },
    RefinerySeed { name: "Ruwais", country: "United Arab Emirates", region: "Middle East", lat: 24.11, lng: 52.73, capacity_bpd: 922_000, operator: "ADNOC" },
    RefinerySeed { name: "Port Arthur", country: "United States", region: "North America", lat: 29.87, lng: -93.94, capacity_bpd: 626_000, operator: "Motiva" },
];

const COMPANIES: &[(&str, &str, &str, &str, i64)] = &[
    ("Aegean Tankers", "Greece", "Europe", "shipping", 14),
    ("Gulf Crude Trading", "United Arab Emirates", "Middle East", "trading", 0),
    ("Lone Star Refining", "United States", "North America", "refining", 0),
];

struct VesselSeed {
    name: &'static str,
    imo: &'static str,
    vessel_type: &'static str,
    flag: &'static str,
    deadweight: i64,
    lat: f64,
    lng: f64,
    region: &'static str,
    speed_knots: f64,
    status: &'static str,
    cargo_type: &'static str,
    cargo_capacity: i64,
    departure: Option<&'static str>,
    destination: Option<&'static str>,
    days_out: i64,
    days_left: i64,
    company: Option<&'static str>,
}

const VESSELS: &[VesselSeed] = &[
    VesselSeed { name: "Aegean Star", imo: "9321483", vessel_type: "VLCC", flag: "Greece", deadweight: 318_000, lat: 24.90, lng: 58.40, region: "Middle East", speed_knots: 13.5, status: "underway", cargo_type: "Arab Light", cargo_capacity: 2_000_000, departure: Some("Ras Tanura"), destination: Some("Singapore"), days_out: 2, days_left: 12, company: Some("Aegean Tankers") },
    VesselSeed { name: "Nordic Spirit", imo: "9412077", vessel_type: "Suezmax", flag: "Norway", deadweight: 158_000, lat: 50.10, lng: -2.50, region: "Europe", speed_knots: 12.0, status: "underway", cargo_type: "Brent Crude", cargo_capacity: 1_000_000, departure: Some("Houston"), destination: Some("Rotterdam"), days_out: 14, days_left: 1, company: Some("Aegean Tankers") },
    VesselSeed { name: "Gulf Pearl", imo: "9503311", vessel_type: "Aframax", flag: "Marshall Islands", deadweight: 115_000, lat: 25.20, lng: 56.40, region: "Middle East", speed_knots: 0.0, status: "loading", cargo_type: "Murban", cargo_capacity: 700_000, departure: None, destination: Some("Fujairah"), days_out: 0, days_left: 0, company: Some("Gulf Crude Trading") },
    VesselSeed { name: "Texas Ranger", imo: "9618842", vessel_type: "Product Tanker", flag: "Liberia", deadweight: 50_000, lat: 29.70, lng: -95.10, region: "North America", speed_knots: 0.0, status: "at_port", cargo_type: "Diesel", cargo_capacity: 350_000, departure: None, destination: Some("Houston"), days_out: 0, days_left: 0, company: None },
    VesselSeed { name: "Straits Voyager", imo: "9724415", vessel_type: "LNG Carrier", flag: "Singapore", deadweight: 95_000, lat: 5.80, lng: 95.10, region: "Asia", speed_knots: 16.0, status: "underway", cargo_type: "LNG", cargo_capacity: 174_000, departure: Some("Fujairah"), destination: Some("Singapore"), days_out: 6, days_left: 2, company: None },
];

/// Insert any missing sample companies, ports, refineries and vessels
pub async fn seed_reference_data(pool: &DatabasePool) -> DbResult<SeedReport> {
    let mut report = SeedReport::default();

    for (name, country, region, company_type, fleet_size) in COMPANIES {
        if CompanyRepository::get_by_name(pool, name).await?.is_some() {
            debug!(company = name, "Seed company already present");
            continue;
        }
        CompanyRepository::create(
            pool,
            &Uuid::new_v4().to_string(),
            NewCompany {
                name: name.to_string(),
                country: Some(country.to_string()),
                region: Some(region.to_string()),
                company_type: company_type.to_string(),
                website: None,
                description: None,
                fleet_size: *fleet_size,
            },
        )
        .await?;
        report.companies += 1;
    }

    for seed in PORTS {
        if PortRepository::get_by_name(pool, seed.name).await?.is_some() {
            continue;
        }
        PortRepository::create(
            pool,
            &Uuid::new_v4().to_string(),
            NewPort {
                name: seed.name.to_string(),
                country: seed.country.to_string(),
                region: seed.region.to_string(),
                lat: seed.lat,
                lng: seed.lng,
                port_type: seed.port_type.to_string(),
                capacity: Some(seed.capacity),
                status: "operational".to_string(),
                description: None,
            },
        )
        .await?;
        report.ports += 1;
    }

    for seed in REFINERIES {
        if RefineryRepository::get_by_name(pool, seed.name).await?.is_some() {
            continue;
        }
        RefineryRepository::create(
            pool,
            &Uuid::new_v4().to_string(),
            NewRefinery {
                name: seed.name.to_string(),
                country: seed.country.to_string(),
                region: seed.region.to_string(),
                lat: seed.lat,
                lng: seed.lng,
                capacity_bpd: Some(seed.capacity_bpd),
                operator: Some(seed.operator.to_string()),
                status: "operational".to_string(),
                description: None,
            },
        )
        .await?;
        report.refineries += 1;
    }

    let now = Utc::now();
    for seed in VESSELS {
        if VesselRepository::get_by_imo(pool, seed.imo).await?.is_some() {
            continue;
        }

        let departure_port_id = match seed.departure {
            Some(name) => PortRepository::get_by_name(pool, name).await?.map(|p| p.id),
            None => None,
        };
        let destination_port_id = match seed.destination {
            Some(name) => PortRepository::get_by_name(pool, name).await?.map(|p| p.id),
            None => None,
        };
        let company_id = match seed.company {
            Some(name) => CompanyRepository::get_by_name(pool, name).await?.map(|c| c.id),
            None => None,
        };
        let (departure_date, eta) = if seed.departure.is_some() {
            (
                Some((now - Duration::days(seed.days_out)).to_rfc3339()),
                Some((now + Duration::days(seed.days_left)).to_rfc3339()),
            )
        } else {
            (None, None)
        };

        VesselRepository::create(
            pool,
            &Uuid::new_v4().to_string(),
            NewVessel {
                name: seed.name.to_string(),
                imo: seed.imo.to_string(),
                mmsi: None,
                vessel_type: seed.vessel_type.to_string(),
                flag: Some(seed.flag.to_string()),
                built: None,
                deadweight: Some(seed.deadweight),
                current_lat: Some(seed.lat),
                current_lng: Some(seed.lng),
                current_region: Some(seed.region.to_string()),
                speed_knots: seed.speed_knots,
                status: seed.status.to_string(),
                cargo_type: Some(seed.cargo_type.to_string()),
                cargo_capacity: Some(seed.cargo_capacity),
                departure_port_id,
                destination_port_id,
                departure_date,
                eta,
                company_id,
            },
        )
        .await?;
        report.vessels += 1;
    }

    info!(
        companies = report.companies,
        ports = report.ports,
        refineries = report.refineries,
        vessels = report.vessels,
        "Reference data seeded"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConnection;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = DatabaseConnection::in_memory().await.unwrap();

        let first = seed_reference_data(db.pool()).await.unwrap();
        assert_eq!(first.ports, PORTS.len());
        assert_eq!(first.vessels, VESSELS.len());

        let second = seed_reference_data(db.pool()).await.unwrap();
        assert_eq!(second.total(), 0);
        assert_eq!(
            VesselRepository::count(db.pool()).await.unwrap(),
            VESSELS.len() as i64
        );
    }

    #[tokio::test]
    async fn test_seeded_voyages_link_ports() {
        let db = DatabaseConnection::in_memory().await.unwrap();
        seed_reference_data(db.pool()).await.unwrap();

        let vessel = VesselRepository::get_by_imo(db.pool(), "9321483")
            .await
            .unwrap()
            .unwrap();
        let destination = PortRepository::get_by_id(db.pool(), vessel.destination_port_id.as_deref().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(destination.name, "Singapore");
        assert!(vessel.eta.is_some());
        assert!(vessel.company_id.is_some());
    }
}
