//! Weighted A* over the 16-direction move lattice.
//!
//! The heuristic is inflated by `SearchOptions::heuristic_weight`, so paths
//! are found quickly but are not guaranteed to be shortest. Failing to find a
//! path is a normal outcome and yields an empty waypoint list.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::{debug, info, warn};

use crate::geometry::{self, GeometryError, COMPASS_ANGLES, MOVE_LENGTH};
use crate::model::{Position, PositionKey, Region};

const PROGRESS_LOG_INTERVAL: usize = 10_000;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Multiplier applied to the straight-line heuristic.
    pub heuristic_weight: f64,
    /// Node expansions allowed before the search gives up.
    pub max_iterations: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            heuristic_weight: 1.5,
            max_iterations: 100_000,
        }
    }
}

/// Search statistics, mostly useful for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub iterations: usize,
    pub nodes_created: usize,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Waypoints from the start to a point within one move of the goal.
    /// Empty when no path was found.
    pub path: Vec<Position>,
    pub stats: SearchStats,
}

/// An obstacle with its bounding box precomputed for cheap rejection.
#[derive(Debug, Clone)]
struct Obstacle<'a> {
    region: &'a Region,
    min: Position,
    max: Position,
}

impl<'a> Obstacle<'a> {
    fn new(region: &'a Region) -> Self {
        let mut min = Position::new(f64::INFINITY, f64::INFINITY);
        let mut max = Position::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for vertex in &region.vertices {
            min.lng = min.lng.min(vertex.lng);
            min.lat = min.lat.min(vertex.lat);
            max.lng = max.lng.max(vertex.lng);
            max.lat = max.lat.max(vertex.lat);
        }
        Self { region, min, max }
    }

    /// False only when the segment's box is clear of the region's box.
    fn may_touch(&self, from: Position, to: Position) -> bool {
        const MARGIN: f64 = 1e-6;
        from.lng.max(to.lng) >= self.min.lng - MARGIN
            && from.lng.min(to.lng) <= self.max.lng + MARGIN
            && from.lat.max(to.lat) >= self.min.lat - MARGIN
            && from.lat.min(to.lat) <= self.max.lat + MARGIN
    }

    fn blocks(&self, from: Position, to: Position) -> bool {
        self.may_touch(from, to)
            && (geometry::contains_point(to, &self.region.vertices)
                || geometry::line_intersects_region(from, to, self.region))
    }
}

/// Arena entry. `parent` indexes into the same arena.
#[derive(Debug, Clone)]
struct SearchNode {
    position: Position,
    g: f64,
    h: f64,
    parent: Option<usize>,
}

impl SearchNode {
    fn f(&self) -> f64 {
        self.g + self.h
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f64,
    g: f64,
    node: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.node.cmp(&other.node))
    }
}

/// Obstacle-aware path search. Holds only borrowed, validated obstacles;
/// all search state lives inside a single `find_path` call.
#[derive(Debug, Clone)]
pub struct Pathfinder<'a> {
    obstacles: Vec<Obstacle<'a>>,
    options: SearchOptions,
}

impl<'a> Pathfinder<'a> {
    /// Validates every no-fly region up front.
    pub fn new(no_fly_zones: &'a [Region], options: SearchOptions) -> Result<Self, GeometryError> {
        for region in no_fly_zones {
            geometry::validate_region(region)?;
        }
        Ok(Self {
            obstacles: no_fly_zones.iter().map(Obstacle::new).collect(),
            options,
        })
    }

    /// A move is invalid if it lands inside (or on) a no-fly zone, or if the
    /// segment crosses any zone boundary.
    pub fn is_blocked(&self, from: Position, to: Position) -> bool {
        self.obstacles.iter().any(|obstacle| obstacle.blocks(from, to))
    }

    pub fn find_path(&self, start: Position, end: Position) -> Vec<Position> {
        self.search(start, end).path
    }

    pub fn search(&self, start: Position, end: Position) -> SearchOutcome {
        info!(?start, ?end, "A* search starting");
        let weight = self.options.heuristic_weight;

        let mut arena = vec![SearchNode {
            position: start,
            g: 0.0,
            h: geometry::distance(start, end) * weight,
            parent: None,
        }];
        let mut open = BinaryHeap::new();
        let mut open_index: HashMap<PositionKey, usize> = HashMap::new();
        let mut closed: HashSet<PositionKey> = HashSet::new();

        open.push(Reverse(OpenEntry {
            f: arena[0].f(),
            g: 0.0,
            node: 0,
        }));
        open_index.insert(start.key(), 0);

        let mut iterations = 0;
        while iterations < self.options.max_iterations {
            let Some(Reverse(entry)) = open.pop() else {
                break;
            };
            let current = entry.node;
            // Superseded by a later relaxation of the same node.
            if entry.g > arena[current].g {
                continue;
            }
            let position = arena[current].position;
            if closed.contains(&position.key()) {
                continue;
            }

            iterations += 1;
            if iterations % PROGRESS_LOG_INTERVAL == 0 {
                debug!(
                    iterations,
                    open = open.len(),
                    closed = closed.len(),
                    "A* progress"
                );
            }

            if geometry::close(position, end) {
                info!(iterations, "A* found path");
                return SearchOutcome {
                    path: reconstruct(&arena, current),
                    stats: SearchStats {
                        iterations,
                        nodes_created: arena.len(),
                    },
                };
            }

            open_index.remove(&position.key());
            closed.insert(position.key());

            // COMPASS_ANGLES are all valid, so no angle check here.
            for angle in COMPASS_ANGLES {
                let neighbor = geometry::offset(position, angle);
                let key = neighbor.key();
                if closed.contains(&key) || self.is_blocked(position, neighbor) {
                    continue;
                }

                let tentative_g = arena[current].g + MOVE_LENGTH;
                match open_index.get(&key) {
                    None => {
                        let node = arena.len();
                        arena.push(SearchNode {
                            position: neighbor,
                            g: tentative_g,
                            h: geometry::distance(neighbor, end) * weight,
                            parent: Some(current),
                        });
                        open_index.insert(key, node);
                        open.push(Reverse(OpenEntry {
                            f: arena[node].f(),
                            g: tentative_g,
                            node,
                        }));
                    }
                    Some(&node) if tentative_g < arena[node].g => {
                        arena[node].g = tentative_g;
                        arena[node].parent = Some(current);
                        open.push(Reverse(OpenEntry {
                            f: arena[node].f(),
                            g: tentative_g,
                            node,
                        }));
                    }
                    Some(_) => {}
                }
            }
        }

        if iterations >= self.options.max_iterations {
            warn!(
                max_iterations = self.options.max_iterations,
                ?start,
                ?end,
                "A* exceeded iteration cap"
            );
        } else {
            warn!(iterations, ?start, ?end, "A* exhausted search space without a path");
        }

        SearchOutcome {
            path: Vec::new(),
            stats: SearchStats {
                iterations,
                nodes_created: arena.len(),
            },
        }
    }
}

fn reconstruct(arena: &[SearchNode], goal: usize) -> Vec<Position> {
    let mut path = Vec::new();
    let mut cursor = Some(goal);
    while let Some(index) = cursor {
        path.push(arena[index].position);
        cursor = arena[index].parent;
    }
    path.reverse();
    path
}
