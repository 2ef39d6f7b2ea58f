//! Planar geometry over (lng, lat) degree space.
//!
//! Distances are plain Euclidean distances in degrees. There is no geodesic
//! correction; the service area is small enough for the planar approximation.

use thiserror::Error;

use crate::model::{Position, Region};

/// Length of a single drone move in degrees. Also the proximity tolerance.
pub const MOVE_LENGTH: f64 = 0.00015;

/// Angular resolution of the move set.
pub const COMPASS_STEP_DEGREES: f64 = 22.5;

/// The 16 compass directions a drone may move in.
pub const COMPASS_ANGLES: [f64; 16] = [
    0.0, 22.5, 45.0, 67.5, 90.0, 112.5, 135.0, 157.5, 180.0, 202.5, 225.0, 247.5, 270.0, 292.5,
    315.0, 337.5,
];

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("angle {0} is not a multiple of {COMPASS_STEP_DEGREES} degrees")]
    InvalidAngle(f64),
    #[error("region '{name}' is not a closed polygon with at least 4 vertices (got {vertices})")]
    InvalidRegion { name: String, vertices: usize },
}

pub fn distance(p1: Position, p2: Position) -> f64 {
    let d_lat = p2.lat - p1.lat;
    let d_lng = p2.lng - p1.lng;
    (d_lat * d_lat + d_lng * d_lng).sqrt()
}

/// True when the points are strictly closer than one move.
pub fn close(p1: Position, p2: Position) -> bool {
    distance(p1, p2) < MOVE_LENGTH
}

/// Moves `start` by one move length in the given compass direction.
///
/// 0 degrees is east, 90 is north.
pub fn step(start: Position, angle_deg: f64) -> Result<Position, GeometryError> {
    let quotient = angle_deg / COMPASS_STEP_DEGREES;
    if !quotient.is_finite() || (quotient - quotient.round()).abs() > EPSILON {
        return Err(GeometryError::InvalidAngle(angle_deg));
    }

    Ok(offset(start, angle_deg))
}

/// One move in direction `angle_deg`, without validating the angle.
pub(crate) fn offset(position: Position, angle_deg: f64) -> Position {
    let radians = angle_deg.to_radians();
    Position::new(
        position.lng + MOVE_LENGTH * radians.cos(),
        position.lat + MOVE_LENGTH * radians.sin(),
    )
}

/// Rejects regions that are not closed rings of at least 4 vertices.
pub fn validate_region(region: &Region) -> Result<(), GeometryError> {
    let vertices = &region.vertices;
    let closed = vertices.len() >= 4 && vertices.first() == vertices.last();
    if closed {
        Ok(())
    } else {
        Err(GeometryError::InvalidRegion {
            name: region.name.clone(),
            vertices: vertices.len(),
        })
    }
}

/// Boundary-inclusive point-in-polygon test.
pub fn point_in_region(point: Position, region: &Region) -> Result<bool, GeometryError> {
    validate_region(region)?;
    Ok(contains_point(point, &region.vertices))
}

/// Point-in-polygon over an already validated ring.
pub(crate) fn contains_point(point: Position, vertices: &[Position]) -> bool {
    let on_border = vertices
        .windows(2)
        .any(|edge| point_on_segment(point, edge[0], edge[1]));
    on_border || ray_cast(point, vertices)
}

/// True if the segment `from -> to` touches or crosses any edge of the region.
///
/// Whether the endpoints lie inside the region is the caller's concern.
pub fn line_intersects_region(from: Position, to: Position, region: &Region) -> bool {
    region
        .vertices
        .windows(2)
        .any(|edge| segments_intersect(from, to, edge[0], edge[1]))
}

/// Orientation-based segment intersection with collinear overlap handling.
pub fn segments_intersect(p1: Position, q1: Position, p2: Position, q2: Position) -> bool {
    let o1 = orientation(p1, q1, p2);
    let o2 = orientation(p1, q1, q2);
    let o3 = orientation(p2, q2, p1);
    let o4 = orientation(p2, q2, q1);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && within_bounds(p1, p2, q1))
        || (o2 == Orientation::Collinear && within_bounds(p1, q2, q1))
        || (o3 == Orientation::Collinear && within_bounds(p2, p1, q2))
        || (o4 == Orientation::Collinear && within_bounds(p2, q1, q2))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

fn orientation(p: Position, q: Position, r: Position) -> Orientation {
    let value = (q.lat - p.lat) * (r.lng - q.lng) - (q.lng - p.lng) * (r.lat - q.lat);
    if value.abs() < EPSILON {
        Orientation::Collinear
    } else if value > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// `q` lies within the bounding box of `p..r`.
fn within_bounds(p: Position, q: Position, r: Position) -> bool {
    q.lng <= p.lng.max(r.lng)
        && q.lng >= p.lng.min(r.lng)
        && q.lat <= p.lat.max(r.lat)
        && q.lat >= p.lat.min(r.lat)
}

fn point_on_segment(point: Position, start: Position, end: Position) -> bool {
    let via_point = distance(point, start) + distance(point, end);
    (via_point - distance(start, end)).abs() < EPSILON
}

/// Even-odd rule with a ray cast towards positive longitude.
fn ray_cast(point: Position, vertices: &[Position]) -> bool {
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.lat > point.lat) != (vj.lat > point.lat)
            && point.lng < (vj.lng - vi.lng) * (point.lat - vi.lat) / (vj.lat - vi.lat) + vi.lng
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Region {
        Region::new(
            "square",
            vec![
                Position::new(-1.0, -1.0),
                Position::new(1.0, -1.0),
                Position::new(1.0, 1.0),
                Position::new(-1.0, 1.0),
                Position::new(-1.0, -1.0),
            ],
        )
    }

    #[test]
    fn test_distance_same_point_is_zero() {
        let p = Position::new(-3.186874, 55.944494);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Position::new(-3.192473, 55.946233);
        let b = Position::new(-3.184319, 55.942617);
        assert_eq!(distance(a, b), distance(b, a));
        assert!((distance(Position::new(0.0, 0.0), Position::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_close_is_strict() {
        let a = Position::new(0.0, 0.0);
        assert!(close(a, Position::new(0.0001, 0.0)));
        assert!(!close(a, Position::new(0.0002, 0.0)));
    }

    #[test]
    fn test_step_north_and_east() {
        let start = Position::new(-3.0, 55.0);
        let north = step(start, 90.0).unwrap();
        assert!((north.lng - -3.0).abs() < 1e-9);
        assert!((north.lat - 55.00015).abs() < 1e-9);

        let east = step(start, 0.0).unwrap();
        assert!((east.lng - -2.99985).abs() < 1e-9);
        assert!((east.lat - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_has_move_length_for_every_direction() {
        let start = Position::new(-3.186874, 55.944494);
        for angle in COMPASS_ANGLES {
            let next = step(start, angle).unwrap();
            assert!((distance(start, next) - MOVE_LENGTH).abs() < 1e-12, "angle {angle}");
        }
    }

    #[test]
    fn test_offset_matches_validated_step() {
        let start = Position::new(-3.186874, 55.944494);
        for angle in COMPASS_ANGLES {
            assert_eq!(offset(start, angle), step(start, angle).unwrap());
        }
    }

    #[test]
    fn test_step_rejects_off_compass_angles() {
        let start = Position::new(0.0, 0.0);
        for angle in [10.0, 22.6, 45.000001, f64::NAN] {
            assert!(matches!(step(start, angle), Err(GeometryError::InvalidAngle(_))));
        }
        assert!(step(start, 360.0).is_ok());
        assert!(step(start, 22.5 + 1e-12).is_ok());
    }

    #[test]
    fn test_point_in_region_inside_outside() {
        let region = square();
        assert!(point_in_region(Position::new(0.0, 0.0), &region).unwrap());
        assert!(!point_in_region(Position::new(2.0, 2.0), &region).unwrap());
    }

    #[test]
    fn test_point_in_region_border_and_vertex_are_inside() {
        let region = square();
        assert!(point_in_region(Position::new(1.0, 0.0), &region).unwrap());
        assert!(point_in_region(Position::new(1.0, 1.0), &region).unwrap());
    }

    #[test]
    fn test_point_in_region_rejects_unclosed_ring() {
        let region = Region::new(
            "open",
            vec![
                Position::new(-1.0, -1.0),
                Position::new(1.0, -1.0),
                Position::new(1.0, 1.0),
                Position::new(-1.0, 1.0),
            ],
        );
        let err = point_in_region(Position::new(0.0, 0.0), &region).unwrap_err();
        assert_eq!(
            err,
            GeometryError::InvalidRegion {
                name: "open".to_string(),
                vertices: 4
            }
        );
    }

    #[test]
    fn test_point_in_region_rejects_too_few_vertices() {
        let region = Region::new(
            "triangle-ish",
            vec![
                Position::new(0.0, 0.0),
                Position::new(1.0, 0.0),
                Position::new(0.0, 0.0),
            ],
        );
        assert!(point_in_region(Position::new(0.5, 0.0), &region).is_err());
    }

    #[test]
    fn test_segments_cross() {
        assert!(segments_intersect(
            Position::new(0.0, 0.0),
            Position::new(2.0, 2.0),
            Position::new(0.0, 2.0),
            Position::new(2.0, 0.0),
        ));
        assert!(!segments_intersect(
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(0.0, 1.0),
            Position::new(1.0, 1.0),
        ));
    }

    #[test]
    fn test_collinear_segments_overlap_only_when_touching() {
        assert!(segments_intersect(
            Position::new(0.0, 0.0),
            Position::new(2.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(3.0, 0.0),
        ));
        assert!(!segments_intersect(
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(2.0, 0.0),
            Position::new(3.0, 0.0),
        ));
    }

    #[test]
    fn test_line_through_region() {
        let region = square();
        assert!(line_intersects_region(
            Position::new(-2.0, 0.0),
            Position::new(2.0, 0.0),
            &region
        ));
        assert!(!line_intersects_region(
            Position::new(-2.0, 2.0),
            Position::new(2.0, 2.0),
            &region
        ));
        // Entirely inside: no edge is crossed.
        assert!(!line_intersects_region(
            Position::new(-0.5, 0.0),
            Position::new(0.5, 0.0),
            &region
        ));
    }
}
