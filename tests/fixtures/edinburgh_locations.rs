//! Real central-Edinburgh locations for realistic test fixtures.
//!
//! Coordinates are `(lng, lat)` around the University of Edinburgh central
//! area, all within a few hundred moves of Appleton Tower.

use drone_route_planner::model::{Position, Region};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lng: f64,
    pub lat: f64,
}

impl Location {
    pub const fn new(name: &'static str, lng: f64, lat: f64) -> Self {
        Self { name, lng, lat }
    }

    pub const fn position(&self) -> Position {
        Position::new(self.lng, self.lat)
    }
}

// ============================================================================
// Service points
// ============================================================================

pub const APPLETON_TOWER: Location = Location::new("Appleton Tower", -3.186874, 55.944494);
pub const OCEAN_TERMINAL: Location = Location::new("Ocean Terminal", -3.177317, 55.981820);

// ============================================================================
// Delivery targets near Appleton Tower
// ============================================================================

pub const DELIVERY_TARGETS: &[Location] = &[
    Location::new("Informatics Forum", -3.187300, 55.944900),
    Location::new("Potterrow", -3.188500, 55.945600),
    Location::new("Nicolson Square", -3.184600, 55.945700),
    Location::new("Buccleuch Place", -3.185700, 55.942800),
    Location::new("The Meadows", -3.190500, 55.941600),
    Location::new("Surgeons' Hall", -3.183700, 55.946900),
];

pub fn target(name: &str) -> Position {
    DELIVERY_TARGETS
        .iter()
        .find(|location| location.name == name)
        .map(Location::position)
        .unwrap_or_else(|| panic!("unknown fixture location {name}"))
}

// ============================================================================
// No-fly zones
// ============================================================================

/// A closed rectangle; lower-left then counter-clockwise.
pub fn rectangle(name: &str, min: Position, max: Position) -> Region {
    Region::new(
        name,
        vec![
            min,
            Position::new(max.lng, min.lat),
            max,
            Position::new(min.lng, max.lat),
            min,
        ],
    )
}

/// Wall east of Appleton Tower, standing between it and a target 0.003
/// degrees due east.
pub fn eastern_wall() -> Region {
    rectangle(
        "Eastern wall",
        Position::new(APPLETON_TOWER.lng + 0.0012, APPLETON_TOWER.lat - 0.0006),
        Position::new(APPLETON_TOWER.lng + 0.0016, APPLETON_TOWER.lat + 0.0006),
    )
}
