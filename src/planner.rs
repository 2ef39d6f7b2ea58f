//! Trip planner: groups delivery requests into drone trips, one date at a
//! time, consolidating as many requests per trip as the drone limits allow.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::cache::PathCache;
use crate::error::PlannerError;
use crate::estimate;
use crate::fleet::Fleet;
use crate::geojson::FeatureCollection;
use crate::matcher::DroneMatcher;
use crate::model::{DeliveryPlan, DeliveryRequest, DeliverySegment, Position, Trip};
use crate::pathfinder::{Pathfinder, SearchOptions};
use crate::traits::DataSource;

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub search: SearchOptions,
    /// Try to fly several requests in one trip before falling back to
    /// single-delivery trips.
    pub consolidate: bool,
    /// Largest group tried for one trip. `None` means all remaining requests.
    pub max_consolidation: Option<usize>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            search: SearchOptions::default(),
            consolidate: true,
            max_consolidation: None,
        }
    }
}

/// Fetches a fresh fleet snapshot and plans all `requests`.
pub fn plan_deliveries<S: DataSource>(
    source: &S,
    requests: &[DeliveryRequest],
    options: PlanOptions,
) -> Result<DeliveryPlan, PlannerError> {
    let fleet = Fleet::fetch(source)?;
    let mut planner = TripPlanner::new(&fleet, options)?;
    Ok(planner.plan(requests))
}

/// Plans `requests` and projects the result as line geometry.
///
/// The projection is only produced when every request falls on one date and
/// the plan consists of exactly one trip; otherwise the collection is empty.
pub fn plan_deliveries_geojson<S: DataSource>(
    source: &S,
    requests: &[DeliveryRequest],
    options: PlanOptions,
) -> Result<FeatureCollection, PlannerError> {
    let dates: HashSet<NaiveDate> = requests.iter().map(|request| request.date).collect();
    if dates.len() > 1 {
        warn!(dates = dates.len(), "line projection needs requests on a single date");
        return Ok(FeatureCollection::empty());
    }

    let plan = plan_deliveries(source, requests, options)?;
    if plan.drone_paths.len() != 1 {
        warn!(
            trips = plan.drone_paths.len(),
            "line projection needs exactly one drone trip"
        );
        return Ok(FeatureCollection::empty());
    }

    Ok(FeatureCollection::from_plan(&plan))
}

/// Plans trips against one fleet snapshot. Owns the path cache, so a planner
/// should serve a single top-level planning call.
pub struct TripPlanner<'a> {
    fleet: &'a Fleet,
    matcher: DroneMatcher<'a>,
    pathfinder: Pathfinder<'a>,
    cache: PathCache,
    options: PlanOptions,
}

impl<'a> TripPlanner<'a> {
    pub fn new(fleet: &'a Fleet, options: PlanOptions) -> Result<Self, PlannerError> {
        let pathfinder = Pathfinder::new(fleet.no_fly_zones(), options.search.clone())?;
        Ok(Self {
            fleet,
            matcher: DroneMatcher::new(fleet),
            pathfinder,
            cache: PathCache::new(),
            options,
        })
    }

    pub fn cache(&self) -> &PathCache {
        &self.cache
    }

    pub fn plan(&mut self, requests: &[DeliveryRequest]) -> DeliveryPlan {
        info!(requests = requests.len(), "planning deliveries");

        let mut by_date: BTreeMap<NaiveDate, Vec<&DeliveryRequest>> = BTreeMap::new();
        for request in requests {
            by_date.entry(request.date).or_default().push(request);
        }

        let mut plan = DeliveryPlan::default();
        for (date, day_requests) in by_date {
            info!(%date, requests = day_requests.len(), "planning date");
            for trip in self.plan_day(day_requests) {
                plan.total_cost += trip.total_cost;
                plan.total_moves += trip.total_moves;
                plan.drone_paths.push(trip.into());
            }
        }

        info!(
            total_moves = plan.total_moves,
            total_cost = plan.total_cost,
            trips = plan.drone_paths.len(),
            cache_hits = self.cache.hits(),
            cache_misses = self.cache.misses(),
            "planning finished"
        );
        plan
    }

    fn plan_day(&mut self, mut remaining: Vec<&DeliveryRequest>) -> Vec<Trip> {
        let mut trips = Vec::new();

        while !remaining.is_empty() {
            if let Some(trip) = self.plan_largest_group(&remaining) {
                let served: HashSet<u64> = trip.delivery_ids().collect();
                remaining.retain(|request| !served.contains(&request.id));
                trips.push(trip);
                continue;
            }

            let request = remaining.remove(0);
            let Some(drone) = self.matcher.candidates(&[request]).into_iter().next() else {
                warn!(request = request.id, "no drone available, skipping request");
                continue;
            };
            match self.plan_single(&drone.id, request) {
                Some(trip) => trips.push(trip),
                None => warn!(request = request.id, "could not plan trip, skipping request"),
            }
        }

        trips
    }

    /// Greedy consolidation: the longest prefix of `remaining` (at least two
    /// requests) that the first matching drone can fly in one trip.
    fn plan_largest_group(&mut self, remaining: &[&DeliveryRequest]) -> Option<Trip> {
        if !self.options.consolidate {
            return None;
        }
        let largest = self
            .options
            .max_consolidation
            .map_or(remaining.len(), |cap| cap.min(remaining.len()));

        for size in (2..=largest).rev() {
            let group = &remaining[..size];
            let Some(drone) = self.matcher.candidates(group).into_iter().next() else {
                continue;
            };
            if let Some(trip) = self.plan_multi(&drone.id, group) {
                return Some(trip);
            }
        }
        None
    }

    /// Service point -> delivery -> service point, with a hover at the
    /// delivery.
    pub fn plan_single(&mut self, drone_id: &str, request: &DeliveryRequest) -> Option<Trip> {
        let fleet = self.fleet;
        let drone = fleet.drone(drone_id)?;
        let service_point = fleet.service_point_for(drone_id)?;
        let base = service_point.location;
        debug!(drone = drone_id, request = request.id, "planning single-delivery trip");

        let outward = self.route(base, request.delivery);
        let Some(&arrival) = outward.last() else {
            warn!(request = request.id, "no path to delivery");
            return None;
        };
        let inward = self.route(arrival, base);
        if inward.is_empty() {
            warn!(request = request.id, "no return path from delivery");
            return None;
        }

        let mut flight_path = outward;
        flight_path.push(arrival);
        flight_path.extend_from_slice(&inward[1..]);

        let moves = move_count(flight_path.len() - 1);
        let capability = &drone.capability;
        if moves > capability.max_moves {
            warn!(
                request = request.id,
                drone = drone_id,
                moves,
                max_moves = capability.max_moves,
                "trip exceeds drone move limit"
            );
            return None;
        }

        let cost = capability.trip_cost(f64::from(moves));
        if !request.requirements.within_budget(cost) {
            warn!(request = request.id, cost, max_cost = ?request.requirements.max_cost, "trip exceeds budget");
            return None;
        }

        Some(Trip {
            drone_id: drone.id.clone(),
            service_point_id: service_point.id,
            deliveries: vec![DeliverySegment {
                delivery_id: request.id,
                flight_path,
            }],
            total_cost: cost,
            total_moves: moves,
        })
    }

    /// One trip through every request in greedy nearest-neighbour order.
    ///
    /// Each segment carries its full approach path and a hover point, so the
    /// boundary point between consecutive segments appears in both. The
    /// return leg is appended to the last segment. Either every request is
    /// served or the whole trip is rejected.
    pub fn plan_multi(&mut self, drone_id: &str, requests: &[&DeliveryRequest]) -> Option<Trip> {
        let fleet = self.fleet;
        let drone = fleet.drone(drone_id)?;
        let service_point = fleet.service_point_for(drone_id)?;
        let base = service_point.location;
        debug!(
            drone = drone_id,
            requests = requests.len(),
            "planning multi-delivery trip"
        );

        let ordered = estimate::nearest_neighbor_order(base, requests);
        let mut segments: Vec<DeliverySegment> = Vec::with_capacity(ordered.len());
        let mut current = base;

        for request in &ordered {
            let approach = self.route(current, request.delivery);
            let Some(&arrival) = approach.last() else {
                warn!(request = request.id, "no path to delivery");
                return None;
            };
            let mut flight_path = approach;
            flight_path.push(arrival);
            segments.push(DeliverySegment {
                delivery_id: request.id,
                flight_path,
            });
            current = arrival;
        }

        let inward = self.route(current, base);
        if inward.is_empty() {
            warn!("no return path to service point");
            return None;
        }
        if let Some(last) = segments.last_mut() {
            last.flight_path.extend_from_slice(&inward[1..]);
        }

        let moves = move_count(
            segments
                .iter()
                .map(|segment| segment.flight_path.len() - 1)
                .sum(),
        );
        let capability = &drone.capability;
        if moves > capability.max_moves {
            warn!(
                drone = drone_id,
                moves,
                max_moves = capability.max_moves,
                "multi-delivery trip exceeds drone move limit"
            );
            return None;
        }

        let cost = capability.trip_cost(f64::from(moves));
        let pro_rata = cost / requests.len() as f64;
        if let Some(over) = requests
            .iter()
            .find(|request| !request.requirements.within_budget(pro_rata))
        {
            warn!(
                request = over.id,
                pro_rata,
                max_cost = ?over.requirements.max_cost,
                "multi-delivery trip exceeds budget"
            );
            return None;
        }

        Some(Trip {
            drone_id: drone.id.clone(),
            service_point_id: service_point.id,
            deliveries: segments,
            total_cost: cost,
            total_moves: moves,
        })
    }

    fn route(&mut self, start: Position, end: Position) -> Vec<Position> {
        self.cache.get_or_search(&self.pathfinder, start, end).to_vec()
    }
}

fn move_count(moves: usize) -> u32 {
    u32::try_from(moves).unwrap_or(u32::MAX)
}
