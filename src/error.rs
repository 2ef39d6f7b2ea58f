//! Errors that abort a planning call.
//!
//! Infeasibility is not an error: unreachable deliveries, missing drones and
//! exceeded limits show up as requests missing from the plan.

use thiserror::Error;

use crate::client::DataSourceError;
use crate::geometry::GeometryError;

#[derive(Debug, Error)]
pub enum PlannerError {
    /// Malformed input such as an unclosed no-fly polygon.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
}

impl PlannerError {
    /// Whether the fault lies with the caller's input rather than the
    /// service's dependencies.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PlannerError::Geometry(_))
    }
}
