//! Run-scoped memoization of path searches.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::model::{Position, PositionKey};
use crate::pathfinder::Pathfinder;

/// Maps (start, end) endpoint pairs to the waypoints found between them.
///
/// "No path" (an empty list) is cached too, so an unreachable pair is only
/// searched once per planning call. A cache lives for exactly one top-level
/// planning call.
#[derive(Debug, Default)]
pub struct PathCache {
    paths: HashMap<(PositionKey, PositionKey), Vec<Position>>,
    hits: usize,
    misses: usize,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_search(
        &mut self,
        pathfinder: &Pathfinder<'_>,
        start: Position,
        end: Position,
    ) -> &[Position] {
        match self.paths.entry((start.key(), end.key())) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                debug!(?start, ?end, "path cache hit");
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                self.misses += 1;
                debug!(?start, ?end, "path cache miss");
                entry.insert(pathfinder.find_path(start, end))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
