//! Candidate drone selection for one or more delivery requests.
//!
//! The cost check here is an approximation on straight-line distances; the
//! planner re-verifies every candidate with routed paths.

use tracing::debug;

use crate::error::PlannerError;
use crate::estimate;
use crate::fleet::Fleet;
use crate::model::{DeliveryRequest, Drone};
use crate::traits::DataSource;

/// Ids of drones that could serve every request in `requests` in one trip,
/// against a fresh fleet snapshot.
pub fn query_available_drones<S: DataSource>(
    source: &S,
    requests: &[DeliveryRequest],
) -> Result<Vec<String>, PlannerError> {
    let fleet = Fleet::fetch(source)?;
    let requests: Vec<&DeliveryRequest> = requests.iter().collect();
    let ids = DroneMatcher::new(&fleet).candidate_ids(&requests);
    debug!(requests = requests.len(), candidates = ids.len(), "available drones queried");
    Ok(ids)
}

/// Combined requirements of a group of requests flown together.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregateRequirements {
    pub capacity: f64,
    pub cooling: bool,
    pub heating: bool,
}

impl AggregateRequirements {
    pub fn of(requests: &[&DeliveryRequest]) -> Self {
        requests.iter().fold(Self::default(), |acc, request| Self {
            capacity: acc.capacity + request.requirements.capacity,
            cooling: acc.cooling || request.requirements.needs_cooling(),
            heating: acc.heating || request.requirements.needs_heating(),
        })
    }

    pub fn satisfied_by(&self, drone: &Drone) -> bool {
        let capability = &drone.capability;
        capability.capacity >= self.capacity
            && (!self.cooling || capability.cooling)
            && (!self.heating || capability.heating)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DroneMatcher<'a> {
    fleet: &'a Fleet,
}

impl<'a> DroneMatcher<'a> {
    pub fn new(fleet: &'a Fleet) -> Self {
        Self { fleet }
    }

    /// Drones that could serve all `requests` in one trip, in fleet order.
    ///
    /// A drone qualifies when it carries the combined load with the needed
    /// cooling/heating, is stationed at a service point, has a schedule window
    /// covering every request, and its approximate pro-rata tour cost fits
    /// every request's budget.
    pub fn candidates(&self, requests: &[&DeliveryRequest]) -> Vec<&'a Drone> {
        if requests.is_empty() {
            return Vec::new();
        }
        let needs = AggregateRequirements::of(requests);

        self.fleet
            .drones()
            .iter()
            .filter(|drone| needs.satisfied_by(drone))
            .filter(|drone| {
                requests.iter().all(|request| {
                    self.fleet
                        .is_available(&drone.id, request.weekday(), request.time)
                })
            })
            .filter(|drone| self.within_budget(drone, requests))
            .collect()
    }

    pub fn candidate_ids(&self, requests: &[&DeliveryRequest]) -> Vec<String> {
        self.candidates(requests)
            .into_iter()
            .map(|drone| drone.id.clone())
            .collect()
    }

    fn within_budget(&self, drone: &Drone, requests: &[&DeliveryRequest]) -> bool {
        let Some(service_point) = self.fleet.service_point_for(&drone.id) else {
            return false;
        };
        let pro_rata =
            estimate::pro_rata_tour_cost(&drone.capability, service_point.location, requests);
        requests
            .iter()
            .all(|request| request.requirements.within_budget(pro_rata))
    }
}
