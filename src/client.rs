//! HTTP adapter for the ILP drone data service.

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::model::{Drone, NoFlyZone, ServicePoint, ServicePointDrones};
use crate::traits::DataSource;

/// Environment variable consulted by [`ClientConfig::from_env`].
pub const ENDPOINT_ENV: &str = "ILP_ENDPOINT";

const DEFAULT_BASE_URL: &str = "https://ilp-rest-2025-bvh6e9hschfagrgy.ukwest-01.azurewebsites.net";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    /// Defaults, with the base URL overridden by `ILP_ENDPOINT` when set and
    /// non-empty. The variable is read once, here.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(ENDPOINT_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        config
    }
}

#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with status {status}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
    },
    #[error("data source unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone)]
pub struct IlpClient {
    config: ClientConfig,
    client: reqwest::blocking::Client,
}

impl IlpClient {
    pub fn new(config: ClientConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, DataSourceError> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        debug!(%url, "fetching fleet records");

        let http_error = |source: reqwest::Error| DataSourceError::Http {
            endpoint: url.clone(),
            source,
        };
        let response = self.client.get(&url).send().map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataSourceError::Status {
                endpoint: url.clone(),
                status,
            });
        }

        response.json::<T>().map_err(http_error)
    }
}

impl DataSource for IlpClient {
    fn drones(&self) -> Result<Vec<Drone>, DataSourceError> {
        self.fetch("drones")
    }

    fn service_points(&self) -> Result<Vec<ServicePoint>, DataSourceError> {
        self.fetch("service-points")
    }

    fn drone_assignments(&self) -> Result<Vec<ServicePointDrones>, DataSourceError> {
        self.fetch("drones-for-service-points")
    }

    fn no_fly_zones(&self) -> Result<Vec<NoFlyZone>, DataSourceError> {
        self.fetch("restricted-areas")
    }
}
