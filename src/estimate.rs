//! Straight-line trip estimates (no obstacle awareness).
//!
//! Used to pick candidate drones cheaply before any path search runs. The
//! real routed cost is always rechecked by the planner afterwards.

use crate::geometry::{self, MOVE_LENGTH};
use crate::model::{Capability, DeliveryRequest, Position};

/// Orders requests by repeatedly visiting the nearest remaining delivery
/// point, starting from `start`. Ties keep input order.
pub fn nearest_neighbor_order<'r>(
    start: Position,
    requests: &[&'r DeliveryRequest],
) -> Vec<&'r DeliveryRequest> {
    let mut remaining: Vec<&DeliveryRequest> = requests.to_vec();
    let mut ordered = Vec::with_capacity(remaining.len());
    let mut current = start;

    while !remaining.is_empty() {
        let mut nearest = 0;
        let mut nearest_distance = f64::INFINITY;
        for (index, request) in remaining.iter().enumerate() {
            let d = geometry::distance(current, request.delivery);
            if d < nearest_distance {
                nearest = index;
                nearest_distance = d;
            }
        }
        let request = remaining.remove(nearest);
        current = request.delivery;
        ordered.push(request);
    }

    ordered
}

/// Length of the closed tour `base -> stops... -> base`.
pub fn tour_distance(base: Position, stops: &[Position]) -> f64 {
    let mut total = 0.0;
    let mut current = base;
    for &stop in stops {
        total += geometry::distance(current, stop);
        current = stop;
    }
    total + geometry::distance(current, base)
}

/// Straight-line distance converted to (fractional) moves.
pub fn approx_moves(distance: f64) -> f64 {
    distance / MOVE_LENGTH
}

/// Approximate per-request cost of serving `requests` in one greedy tour from
/// `base`: the whole tour cost split evenly across the requests.
pub fn pro_rata_tour_cost(
    capability: &Capability,
    base: Position,
    requests: &[&DeliveryRequest],
) -> f64 {
    if requests.is_empty() {
        return 0.0;
    }
    let stops: Vec<Position> = nearest_neighbor_order(base, requests)
        .iter()
        .map(|request| request.delivery)
        .collect();
    let moves = approx_moves(tour_distance(base, &stops));
    capability.trip_cost(moves) / requests.len() as f64
}

/// Round-trip estimate for a single delivery.
pub fn round_trip_cost(capability: &Capability, base: Position, delivery: Position) -> f64 {
    capability.trip_cost(approx_moves(geometry::distance(base, delivery) * 2.0))
}
