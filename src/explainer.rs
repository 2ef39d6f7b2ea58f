//! Per-drone diagnostics for a single delivery request.
//!
//! Every drone in the fleet is checked independently and every failed
//! constraint is reported, together with suggestions for how the request
//! could be changed to become serviceable. Suggestions are derived from the
//! structured failures, never from the rendered messages.

use std::fmt;

use chrono::{NaiveTime, Weekday};
use serde::Serialize;
use tracing::debug;

use crate::error::PlannerError;
use crate::estimate;
use crate::fleet::Fleet;
use crate::model::{DeliveryRequest, Drone};
use crate::traits::DataSource;

/// One constraint a drone failed to meet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConstraintFailure {
    MissingCooling,
    MissingHeating,
    InsufficientCapacity { available: f64, required: f64 },
    Unavailable { day: Weekday, time: NaiveTime },
    NoServicePoint,
    OverBudget { estimated: f64, max_cost: f64 },
}

impl ConstraintFailure {
    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::InsufficientCapacity { .. })
    }

    pub fn is_schedule(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    pub fn is_cooling(&self) -> bool {
        matches!(self, Self::MissingCooling)
    }

    pub fn is_cost(&self) -> bool {
        matches!(self, Self::OverBudget { .. })
    }
}

impl fmt::Display for ConstraintFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCooling => {
                write!(f, "Missing cooling capability (delivery requires refrigeration)")
            }
            Self::MissingHeating => {
                write!(f, "Missing heating capability (delivery requires heating)")
            }
            Self::InsufficientCapacity {
                available,
                required,
            } => write!(
                f,
                "Insufficient capacity: {available}kg max, need {required}kg"
            ),
            Self::Unavailable { day, time } => {
                write!(
                    f,
                    "Not available on {} at {}",
                    day_name(*day),
                    time.format("%H:%M")
                )
            }
            Self::NoServicePoint => write!(f, "No service point assigned to this drone"),
            Self::OverBudget {
                estimated,
                max_cost,
            } => write!(
                f,
                "Estimated cost £{estimated:.2} exceeds max budget £{max_cost:.2}"
            ),
        }
    }
}

/// Upper-case day name as used by the data service ("MONDAY").
fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

/// Remediation hints for an unserviceable request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Suggestion {
    SplitShipment,
    SplitInto { parts: u32, kg_each: f64 },
    DifferentTime,
    RelaxCooling,
    RaiseBudget,
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SplitShipment => {
                write!(f, "Consider splitting the delivery into multiple smaller shipments")
            }
            Self::SplitInto { parts, kg_each } => {
                write!(f, "Split into {parts} deliveries of ~{kg_each:.1}kg each")
            }
            Self::DifferentTime => write!(
                f,
                "Try scheduling at a different time (some drones have limited availability)"
            ),
            Self::RelaxCooling => write!(
                f,
                "Consider if this delivery actually needs cooling - some medicines don't require it"
            ),
            Self::RaiseBudget => write!(
                f,
                "Increase the budget, or choose a delivery location closer to a service point"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroneCheck {
    pub drone_id: String,
    pub drone_name: String,
    pub available: bool,
    /// Human-readable reasons, one per failure (or a single success note).
    pub reasons: Vec<String>,
    pub failures: Vec<ConstraintFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityExplanation {
    pub drone_checks: Vec<DroneCheck>,
    pub suggestions: Vec<String>,
    #[serde(skip)]
    pub suggestion_kinds: Vec<Suggestion>,
}

impl AvailabilityExplanation {
    pub fn any_available(&self) -> bool {
        self.drone_checks.iter().any(|check| check.available)
    }
}

const AVAILABLE_NOTE: &str = "Available - meets all requirements";

/// Fetches a fresh fleet snapshot and explains `request` against it.
pub fn explain_availability<S: DataSource>(
    source: &S,
    request: &DeliveryRequest,
) -> Result<AvailabilityExplanation, PlannerError> {
    let fleet = Fleet::fetch(source)?;
    Ok(explain(&fleet, request))
}

pub fn explain(fleet: &Fleet, request: &DeliveryRequest) -> AvailabilityExplanation {
    let drone_checks: Vec<DroneCheck> = fleet
        .drones()
        .iter()
        .map(|drone| check_drone(fleet, drone, request))
        .collect();
    let suggestion_kinds = suggest(&drone_checks, request);
    debug!(
        request = request.id,
        drones = drone_checks.len(),
        available = drone_checks.iter().filter(|c| c.available).count(),
        "availability explained"
    );

    AvailabilityExplanation {
        suggestions: suggestion_kinds.iter().map(ToString::to_string).collect(),
        suggestion_kinds,
        drone_checks,
    }
}

fn check_drone(fleet: &Fleet, drone: &Drone, request: &DeliveryRequest) -> DroneCheck {
    let capability = &drone.capability;
    let needs = &request.requirements;
    let mut failures = Vec::new();

    if needs.needs_cooling() && !capability.cooling {
        failures.push(ConstraintFailure::MissingCooling);
    }
    if needs.needs_heating() && !capability.heating {
        failures.push(ConstraintFailure::MissingHeating);
    }
    if needs.capacity > capability.capacity {
        failures.push(ConstraintFailure::InsufficientCapacity {
            available: capability.capacity,
            required: needs.capacity,
        });
    }

    let day = request.weekday();
    if !fleet.is_available(&drone.id, day, request.time) {
        failures.push(ConstraintFailure::Unavailable {
            day,
            time: request.time,
        });
    }

    let service_point = fleet.service_point_for(&drone.id);
    if service_point.is_none() {
        failures.push(ConstraintFailure::NoServicePoint);
    }

    // The cost estimate only matters once everything else passes.
    if let (true, Some(max_cost), Some(service_point)) =
        (failures.is_empty(), needs.max_cost, service_point)
    {
        let estimated =
            estimate::round_trip_cost(capability, service_point.location, request.delivery);
        if estimated > max_cost {
            failures.push(ConstraintFailure::OverBudget {
                estimated,
                max_cost,
            });
        }
    }

    let available = failures.is_empty();
    let reasons = if available {
        vec![AVAILABLE_NOTE.to_string()]
    } else {
        failures.iter().map(ToString::to_string).collect()
    };

    DroneCheck {
        drone_id: drone.id.clone(),
        drone_name: drone.name.clone(),
        available,
        reasons,
        failures,
    }
}

fn suggest(checks: &[DroneCheck], request: &DeliveryRequest) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();
    if checks.is_empty() || checks.iter().any(|check| check.available) {
        return suggestions;
    }

    let any_failure = |test: fn(&ConstraintFailure) -> bool| {
        checks
            .iter()
            .any(|check| check.failures.iter().any(test))
    };

    let all_fail_capacity = checks
        .iter()
        .all(|check| check.failures.iter().any(ConstraintFailure::is_capacity));
    if all_fail_capacity {
        suggestions.push(Suggestion::SplitShipment);

        let best_capacity = checks
            .iter()
            .flat_map(|check| &check.failures)
            .filter_map(|failure| match failure {
                ConstraintFailure::InsufficientCapacity { available, .. } => Some(*available),
                _ => None,
            })
            .fold(0.0_f64, f64::max);
        if best_capacity > 0.0 {
            let required = request.requirements.capacity;
            let parts = (required / best_capacity).ceil() as u32;
            suggestions.push(Suggestion::SplitInto {
                parts,
                kg_each: required / f64::from(parts),
            });
        }
    }

    if any_failure(ConstraintFailure::is_schedule) {
        suggestions.push(Suggestion::DifferentTime);
    }

    // Only offered when the request did not insist on cooling.
    if any_failure(ConstraintFailure::is_cooling) && request.requirements.cooling == Some(false) {
        suggestions.push(Suggestion::RelaxCooling);
    }

    if any_failure(ConstraintFailure::is_cost) {
        suggestions.push(Suggestion::RaiseBudget);
    }

    suggestions
}
