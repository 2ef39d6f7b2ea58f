//! Line geometry projection of a delivery plan.
//!
//! Each drone trip becomes one GeoJSON `LineString` with `[lng, lat]`
//! coordinates, suitable for dropping straight onto a map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{DeliveryPlan, DronePath, Position};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: LineString,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineString {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<[f64; 2]>,
}

impl LineString {
    pub fn new(points: &[Position]) -> Self {
        Self {
            kind: "LineString".to_string(),
            coordinates: points.iter().map(|p| [p.lng, p.lat]).collect(),
        }
    }
}

impl FeatureCollection {
    pub fn empty() -> Self {
        Self::from_paths(Vec::new())
    }

    pub fn from_paths(paths: Vec<Vec<Position>>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features: paths
                .iter()
                .map(|path| Feature {
                    kind: "Feature".to_string(),
                    geometry: LineString::new(path),
                    properties: Map::new(),
                })
                .collect(),
        }
    }

    pub fn from_plan(plan: &DeliveryPlan) -> Self {
        Self::from_paths(plan.drone_paths.iter().map(join_segments).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Concatenates a trip's delivery segments into one continuous path.
///
/// Consecutive segments share their boundary point, so every segment after
/// the first drops its leading point.
pub fn join_segments(path: &DronePath) -> Vec<Position> {
    let mut points: Vec<Position> = Vec::new();
    for segment in &path.deliveries {
        let skip = usize::from(!points.is_empty());
        points.extend(segment.flight_path.iter().skip(skip));
    }
    points
}
