//! Per-call snapshot of fleet records and the constraint predicates shared by
//! the matcher and the explainer.

use std::collections::HashMap;

use chrono::{NaiveTime, Weekday};
use tracing::debug;

use crate::client::DataSourceError;
use crate::model::{Drone, NoFlyZone, Region, ServicePoint, ServicePointDrones};
use crate::traits::DataSource;

/// Everything a planning call needs from the data service, fetched once at
/// the start of the call and never shared between calls.
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    drones: Vec<Drone>,
    service_points: Vec<ServicePoint>,
    assignments: Vec<ServicePointDrones>,
    no_fly_zones: Vec<Region>,
    /// Drone id -> index into `service_points`, for the first assignment
    /// that names the drone.
    stationed_at: HashMap<String, usize>,
}

impl Fleet {
    pub fn fetch<S: DataSource>(source: &S) -> Result<Self, DataSourceError> {
        let fleet = Self::new(
            source.drones()?,
            source.service_points()?,
            source.drone_assignments()?,
            source.no_fly_zones()?,
        );
        debug!(
            drones = fleet.drones.len(),
            service_points = fleet.service_points.len(),
            no_fly_zones = fleet.no_fly_zones.len(),
            "fleet snapshot loaded"
        );
        Ok(fleet)
    }

    pub fn new(
        drones: Vec<Drone>,
        service_points: Vec<ServicePoint>,
        assignments: Vec<ServicePointDrones>,
        no_fly_zones: Vec<NoFlyZone>,
    ) -> Self {
        let mut stationed_at = HashMap::new();
        for assignment in &assignments {
            let Some(index) = service_points
                .iter()
                .position(|sp| sp.id == assignment.service_point_id)
            else {
                continue;
            };
            for schedule in &assignment.drones {
                stationed_at.entry(schedule.id.clone()).or_insert(index);
            }
        }

        Self {
            drones,
            service_points,
            assignments,
            no_fly_zones: no_fly_zones.into_iter().map(Region::from).collect(),
            stationed_at,
        }
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn service_points(&self) -> &[ServicePoint] {
        &self.service_points
    }

    pub fn no_fly_zones(&self) -> &[Region] {
        &self.no_fly_zones
    }

    pub fn drone(&self, id: &str) -> Option<&Drone> {
        self.drones.iter().find(|drone| drone.id == id)
    }

    /// The service point a drone is stationed at, if any.
    pub fn service_point_for(&self, drone_id: &str) -> Option<&ServicePoint> {
        self.stationed_at
            .get(drone_id)
            .map(|&index| &self.service_points[index])
    }

    /// True if any weekly window for this drone covers `day` at `time`.
    pub fn is_available(&self, drone_id: &str, day: Weekday, time: NaiveTime) -> bool {
        self.assignments
            .iter()
            .flat_map(|assignment| &assignment.drones)
            .filter(|schedule| schedule.id == drone_id)
            .flat_map(|schedule| &schedule.availability)
            .any(|window| window.covers(day, time))
    }

    pub fn drones_with_cooling(&self, state: bool) -> Vec<&str> {
        self.drones
            .iter()
            .filter(|drone| drone.capability.cooling == state)
            .map(|drone| drone.id.as_str())
            .collect()
    }
}
