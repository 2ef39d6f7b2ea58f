//! Test fixtures for drone-route-planner.
//!
//! Provides realistic test data including:
//! - Real central-Edinburgh locations
//! - Builders for drones, schedules and delivery requests
//! - An in-memory `DataSource`

#![allow(dead_code)]

pub mod edinburgh_locations;

pub use edinburgh_locations::*;

use chrono::{NaiveDate, NaiveTime};

use drone_route_planner::client::DataSourceError;
use drone_route_planner::model::{
    AvailabilityWindow, Capability, DeliveryRequest, Drone, DroneSchedule, NoFlyZone, Position,
    Region, Requirements, ServicePoint, ServicePointDrones,
};
use drone_route_planner::traits::DataSource;

pub const APPLETON_ID: u64 = 1;
pub const OCEAN_TERMINAL_ID: u64 = 2;

/// Monday 2025-12-22.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 22).unwrap()
}

/// Tuesday 2025-12-23.
pub fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 23).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

// ============================================================================
// Drones
// ============================================================================

/// Builder for test drones with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestDrone {
    drone: Drone,
}

impl TestDrone {
    pub fn new(id: &str) -> Self {
        Self {
            drone: Drone {
                id: id.to_string(),
                name: format!("Drone {id}"),
                capability: Capability {
                    cooling: false,
                    heating: false,
                    capacity: 4.0,
                    max_moves: 2000,
                    cost_per_move: 0.01,
                    cost_initial: 1.0,
                    cost_final: 1.0,
                },
            },
        }
    }

    pub fn capacity(mut self, kg: f64) -> Self {
        self.drone.capability.capacity = kg;
        self
    }

    pub fn cooling(mut self) -> Self {
        self.drone.capability.cooling = true;
        self
    }

    pub fn heating(mut self) -> Self {
        self.drone.capability.heating = true;
        self
    }

    pub fn cost_per_move(mut self, cost: f64) -> Self {
        self.drone.capability.cost_per_move = cost;
        self
    }

    pub fn max_moves(mut self, moves: u32) -> Self {
        self.drone.capability.max_moves = moves;
        self
    }

    pub fn build(self) -> Drone {
        self.drone
    }
}

/// Monday and Tuesday, 08:00-18:00.
pub fn weekday_schedule(id: &str) -> DroneSchedule {
    schedule(id, &["MONDAY", "TUESDAY"], at(8, 0), at(18, 0))
}

pub fn schedule(id: &str, days: &[&str], from: NaiveTime, until: NaiveTime) -> DroneSchedule {
    DroneSchedule {
        id: id.to_string(),
        availability: days
            .iter()
            .map(|day| AvailabilityWindow {
                day_of_week: day.to_string(),
                from,
                until,
            })
            .collect(),
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Builder for test requests. Defaults to 1kg on Monday 10:00, no
/// cooling/heating/budget constraint.
#[derive(Clone, Debug)]
pub struct TestRequest {
    request: DeliveryRequest,
}

impl TestRequest {
    pub fn new(id: u64, delivery: Position) -> Self {
        Self {
            request: DeliveryRequest {
                id,
                date: monday(),
                time: at(10, 0),
                requirements: Requirements {
                    capacity: 1.0,
                    ..Requirements::default()
                },
                delivery,
            },
        }
    }

    pub fn capacity(mut self, kg: f64) -> Self {
        self.request.requirements.capacity = kg;
        self
    }

    pub fn cooling(mut self, required: bool) -> Self {
        self.request.requirements.cooling = Some(required);
        self
    }

    pub fn heating(mut self, required: bool) -> Self {
        self.request.requirements.heating = Some(required);
        self
    }

    pub fn max_cost(mut self, cost: f64) -> Self {
        self.request.requirements.max_cost = Some(cost);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.request.date = date;
        self
    }

    pub fn time(mut self, time: NaiveTime) -> Self {
        self.request.time = time;
        self
    }

    pub fn build(self) -> DeliveryRequest {
        self.request
    }
}

/// A point `offset` degrees due east of Appleton Tower.
pub fn east_of_appleton(offset: f64) -> Position {
    Position::new(APPLETON_TOWER.lng + offset, APPLETON_TOWER.lat)
}

// ============================================================================
// Data source
// ============================================================================

/// In-memory fleet records. `fail` makes every read error out.
#[derive(Clone, Debug, Default)]
pub struct MockSource {
    pub drones: Vec<Drone>,
    pub service_points: Vec<ServicePoint>,
    pub assignments: Vec<ServicePointDrones>,
    pub no_fly_zones: Vec<NoFlyZone>,
    pub fail: bool,
}

impl MockSource {
    /// Every drone stationed at Appleton Tower on the weekday schedule.
    pub fn appleton(drones: Vec<Drone>) -> Self {
        let schedules = drones.iter().map(|drone| weekday_schedule(&drone.id)).collect();
        Self {
            drones,
            service_points: vec![ServicePoint {
                id: APPLETON_ID,
                name: APPLETON_TOWER.name.to_string(),
                location: APPLETON_TOWER.position(),
            }],
            assignments: vec![ServicePointDrones {
                service_point_id: APPLETON_ID,
                drones: schedules,
            }],
            no_fly_zones: Vec::new(),
            fail: false,
        }
    }

    pub fn with_zone(mut self, region: Region) -> Self {
        self.no_fly_zones.push(NoFlyZone {
            name: region.name,
            id: None,
            vertices: region.vertices,
        });
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn read<T: Clone>(&self, records: &[T]) -> Result<Vec<T>, DataSourceError> {
        if self.fail {
            return Err(DataSourceError::Unavailable("mock outage".to_string()));
        }
        Ok(records.to_vec())
    }
}

impl DataSource for MockSource {
    fn drones(&self) -> Result<Vec<Drone>, DataSourceError> {
        self.read(&self.drones)
    }

    fn service_points(&self) -> Result<Vec<ServicePoint>, DataSourceError> {
        self.read(&self.service_points)
    }

    fn drone_assignments(&self) -> Result<Vec<ServicePointDrones>, DataSourceError> {
        self.read(&self.assignments)
    }

    fn no_fly_zones(&self) -> Result<Vec<NoFlyZone>, DataSourceError> {
        self.read(&self.no_fly_zones)
    }
}
