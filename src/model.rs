//! Data model shared by the planner, matcher and explainer.
//!
//! Field names follow the upstream data service (camelCase JSON). Unknown
//! fields on incoming records are ignored.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Scale used to quantize coordinates for hashing (1e-7 degrees).
const KEY_SCALE: f64 = 1e7;

/// A (longitude, latitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
}

impl Position {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Lattice key used for equality in hash-based sets and caches.
    ///
    /// Repeated `step` compositions accumulate rounding noise, so two
    /// positions reached by different move sequences compare equal here even
    /// when their raw bits differ.
    pub fn key(&self) -> PositionKey {
        PositionKey(
            (self.lng * KEY_SCALE).round() as i64,
            (self.lat * KEY_SCALE).round() as i64,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PositionKey(i64, i64);

/// A named closed polygon. The first and last vertex must be identical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub vertices: Vec<Position>,
}

impl Region {
    pub fn new(name: impl Into<String>, vertices: Vec<Position>) -> Self {
        Self {
            name: name.into(),
            vertices,
        }
    }
}

/// A no-fly zone as published by the data service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoFlyZone {
    pub name: String,
    #[serde(default)]
    pub id: Option<u64>,
    pub vertices: Vec<Position>,
}

impl From<NoFlyZone> for Region {
    fn from(zone: NoFlyZone) -> Self {
        Region::new(zone.name, zone.vertices)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drone {
    pub id: String,
    pub name: String,
    pub capability: Capability,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capability {
    pub cooling: bool,
    pub heating: bool,
    /// Payload capacity in kg.
    pub capacity: f64,
    pub max_moves: u32,
    pub cost_per_move: f64,
    pub cost_initial: f64,
    pub cost_final: f64,
}

impl Capability {
    /// Cost of one trip of `moves` moves: fixed take-off and landing
    /// charges plus the per-move rate.
    pub fn trip_cost(&self, moves: f64) -> f64 {
        self.cost_initial + self.cost_final + moves * self.cost_per_move
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePoint {
    pub id: u64,
    pub name: String,
    pub location: Position,
}

/// Drones stationed at one service point together with their weekly schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePointDrones {
    pub service_point_id: u64,
    pub drones: Vec<DroneSchedule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneSchedule {
    pub id: String,
    pub availability: Vec<AvailabilityWindow>,
}

/// A weekly half-open window `[from, until)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    pub day_of_week: String,
    pub from: NaiveTime,
    pub until: NaiveTime,
}

impl AvailabilityWindow {
    /// Day names are matched case-insensitively ("MONDAY", "Monday", "mon").
    /// An unparsable day never matches.
    pub fn weekday(&self) -> Option<Weekday> {
        self.day_of_week.trim().to_ascii_lowercase().parse().ok()
    }

    pub fn covers(&self, day: Weekday, time: NaiveTime) -> bool {
        self.weekday() == Some(day) && time >= self.from && time < self.until
    }
}

/// A single delivery request (dispatch record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRequest {
    pub id: u64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub requirements: Requirements,
    pub delivery: Position,
}

impl DeliveryRequest {
    pub fn weekday(&self) -> Weekday {
        use chrono::Datelike;
        self.date.weekday()
    }
}

/// Optional fields mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    pub capacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooling: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heating: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<f64>,
}

impl Requirements {
    pub fn needs_cooling(&self) -> bool {
        self.cooling.unwrap_or(false)
    }

    pub fn needs_heating(&self) -> bool {
        self.heating.unwrap_or(false)
    }

    pub fn within_budget(&self, cost: f64) -> bool {
        self.max_cost.is_none_or(|max| cost <= max)
    }
}

/// One request's share of a flight: the waypoints flown for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySegment {
    pub delivery_id: u64,
    pub flight_path: Vec<Position>,
}

/// A planned drone trip out of and back to one service point.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub drone_id: String,
    pub service_point_id: u64,
    pub deliveries: Vec<DeliverySegment>,
    pub total_cost: f64,
    pub total_moves: u32,
}

impl Trip {
    pub fn delivery_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.deliveries.iter().map(|segment| segment.delivery_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DronePath {
    pub drone_id: String,
    pub deliveries: Vec<DeliverySegment>,
}

impl From<Trip> for DronePath {
    fn from(trip: Trip) -> Self {
        Self {
            drone_id: trip.drone_id,
            deliveries: trip.deliveries,
        }
    }
}

/// The full result of one planning call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPlan {
    #[serde(rename = "cost")]
    pub total_cost: f64,
    pub total_moves: u32,
    pub drone_paths: Vec<DronePath>,
}
