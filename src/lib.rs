//! drone-route-planner core
//!
//! Plans medical-supply drone trips on a flat lng/lat plane: weighted A* on a
//! 16-direction compass lattice around no-fly zones, drone matching by
//! capability, schedule and budget, greedy multi-delivery consolidation, and
//! per-drone availability diagnostics.

pub mod cache;
pub mod client;
pub mod error;
pub mod estimate;
pub mod explainer;
pub mod fleet;
pub mod geojson;
pub mod geometry;
pub mod matcher;
pub mod model;
pub mod pathfinder;
pub mod planner;
pub mod query;
pub mod traits;

pub use client::{ClientConfig, DataSourceError, IlpClient};
pub use error::PlannerError;
pub use explainer::{AvailabilityExplanation, explain_availability};
pub use fleet::Fleet;
pub use matcher::query_available_drones;
pub use model::{DeliveryPlan, DeliveryRequest, Position};
pub use planner::{PlanOptions, TripPlanner, plan_deliveries, plan_deliveries_geojson};
pub use traits::DataSource;
