//! Seam to the external drone data service.
//!
//! The planner only ever reads through this trait, so tests and alternative
//! backends can supply their own records.

use crate::client::DataSourceError;
use crate::model::{Drone, NoFlyZone, ServicePoint, ServicePointDrones};

/// Read-only access to fleet records. Every call should return a fresh view;
/// implementations must be safe to call from concurrent planning calls.
pub trait DataSource {
    fn drones(&self) -> Result<Vec<Drone>, DataSourceError>;

    fn service_points(&self) -> Result<Vec<ServicePoint>, DataSourceError>;

    /// Which drones are stationed where, and when they fly.
    fn drone_assignments(&self) -> Result<Vec<ServicePointDrones>, DataSourceError>;

    fn no_fly_zones(&self) -> Result<Vec<NoFlyZone>, DataSourceError>;
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn drones(&self) -> Result<Vec<Drone>, DataSourceError> {
        (**self).drones()
    }

    fn service_points(&self) -> Result<Vec<ServicePoint>, DataSourceError> {
        (**self).service_points()
    }

    fn drone_assignments(&self) -> Result<Vec<ServicePointDrones>, DataSourceError> {
        (**self).drone_assignments()
    }

    fn no_fly_zones(&self) -> Result<Vec<NoFlyZone>, DataSourceError> {
        (**self).no_fly_zones()
    }
}
