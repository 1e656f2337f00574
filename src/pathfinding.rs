//! Shortest-path precomputation module.
//!
//! This module contains the distance field the game draws its path overlay from. The field is a
//! uniform-cost search run once from the goal to every reachable cell, so the remaining path from
//! any cell the player stands on is a walk along precomputed links.

use std::{cmp::Reverse, collections::BinaryHeap};

use tracing::debug;

use crate::grid::{Direction, Level, Position};

/// Distances and next steps towards the goal for every cell of a level.
///
/// Cells are stored row-major. A cell that cannot reach the goal has neither a distance nor a
/// next step.
#[derive(Clone, Debug)]
pub(crate) struct DistanceField {
    /// Number of columns of the level the field was computed for.
    width: u16,
    /// Number of rows of the level the field was computed for.
    height: u16,
    /// Steps to the goal, `None` for unreachable cells and obstacles.
    distances: Vec<Option<u32>>,
    /// Next cell on a shortest path to the goal.
    ///
    /// This is the predecessor of each cell in the search tree rooted at the goal. The goal
    /// itself has no next step.
    next: Vec<Option<Position>>,
}

impl DistanceField {
    /// Runs Dijkstra's algorithm from the goal of `level` over the four-neighbourhood.
    ///
    /// Every step costs one. Obstacles and cells outside the grid are never entered. Equal
    /// distances are popped in position order, which makes the chosen links deterministic.
    pub(crate) fn compute(level: &Level) -> Self {
        let mut field = Self {
            width: level.width,
            height: level.height,
            distances: vec![None; level.area()],
            next: vec![None; level.area()],
        };

        let mut queue = BinaryHeap::new();
        field.set_distance(level.goal, 0);
        queue.push(Reverse((0_u32, level.goal)));

        while let Some(Reverse((distance, current))) = queue.pop() {
            // Stale entry, the cell was settled through a shorter route
            if field.distance(current).is_some_and(|known| known < distance) {
                continue;
            }

            for direction in Direction::SEARCH_ORDER {
                let Some(neighbour) = current.step(direction, level.width, level.height) else {
                    continue;
                };
                if !level.is_walkable(neighbour) {
                    continue;
                }

                let candidate = distance + 1;
                if field
                    .distance(neighbour)
                    .map_or(true, |known| candidate < known)
                {
                    field.set_distance(neighbour, candidate);
                    field.set_next(neighbour, current);
                    queue.push(Reverse((candidate, neighbour)));
                }
            }
        }

        debug!(
            level = %level.key,
            reachable = field.distances.iter().flatten().count(),
            "computed distance field"
        );

        field
    }

    /// Returns the index of `position` in the row-major vectors, if it lies on the grid.
    fn index(&self, position: Position) -> Option<usize> {
        (position.x < self.width && position.y < self.height).then(|| {
            usize::from(position.y) * usize::from(self.width) + usize::from(position.x)
        })
    }

    /// Records the distance of an on-grid cell.
    fn set_distance(&mut self, position: Position, distance: u32) {
        if let Some(slot) = self
            .index(position)
            .and_then(|idx| self.distances.get_mut(idx))
        {
            *slot = Some(distance);
        }
    }

    /// Records the next step of an on-grid cell.
    fn set_next(&mut self, position: Position, next: Position) {
        if let Some(slot) = self.index(position).and_then(|idx| self.next.get_mut(idx)) {
            *slot = Some(next);
        }
    }

    /// Returns the number of steps from `position` to the goal.
    pub(crate) fn distance(&self, position: Position) -> Option<u32> {
        self.index(position)
            .and_then(|idx| self.distances.get(idx).copied())
            .flatten()
    }

    /// Returns the neighbour of `position` that lies one step closer to the goal.
    pub(crate) fn next_step(&self, position: Position) -> Option<Position> {
        self.index(position)
            .and_then(|idx| self.next.get(idx).copied())
            .flatten()
    }

    /// Collects the remaining shortest path from `position`.
    ///
    /// The path excludes `position` itself and ends on the goal. It is empty when `position` is
    /// the goal or cannot reach it.
    pub(crate) fn path_from(&self, position: Position) -> Vec<Position> {
        let mut path = Vec::new();
        let mut current = self.next_step(position);

        while let Some(cell) = current {
            // The links form a tree, a longer walk means the field is corrupt
            if path.len() >= self.distances.len() {
                break;
            }
            path.push(cell);
            current = self.next_step(cell);
        }

        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a level from its text form.
    fn level(data: &str) -> Level {
        Level::parse("test".to_owned(), data).expect("test level should parse")
    }

    #[test]
    fn test_open_grid_distances_are_manhattan() {
        let level = level("S....\n.....\n....G");
        let field = DistanceField::compute(&level);

        for y in 0..level.height {
            for x in 0..level.width {
                let expected = u32::from(4 - x) + u32::from(2 - y);
                assert_eq!(
                    field.distance(Position::new(x, y)),
                    Some(expected),
                    "distance of ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_default_level_start_distance() {
        let level = Level::default();
        let field = DistanceField::compute(&level);

        assert_eq!(field.distance(level.start), Some(29));
        assert_eq!(field.distance(level.goal), Some(0));
        assert_eq!(field.distance(Position::new(4, 3)), None);
    }

    #[test]
    fn test_obstacles_force_a_detour() {
        let level = level("S#G\n.#.\n...");
        let field = DistanceField::compute(&level);

        assert_eq!(field.distance(level.start), Some(6));
        assert_eq!(
            field.path_from(level.start),
            vec![
                Position::new(0, 1),
                Position::new(0, 2),
                Position::new(1, 2),
                Position::new(2, 2),
                Position::new(2, 1),
                Position::new(2, 0),
            ]
        );
    }

    #[test]
    fn test_path_is_connected_and_avoids_obstacles() {
        let level = Level::default();
        let field = DistanceField::compute(&level);
        let path = field.path_from(level.start);

        assert_eq!(path.len(), 29);
        assert_eq!(path.last(), Some(&level.goal));
        assert!(!path.contains(&level.start), "path excludes the player cell");

        let mut previous = level.start;
        for cell in path {
            assert!(level.is_walkable(cell), "{cell:?} should be walkable");
            let dx = previous.x.abs_diff(cell.x);
            let dy = previous.y.abs_diff(cell.y);
            assert_eq!(dx + dy, 1, "{previous:?} and {cell:?} should be adjacent");
            previous = cell;
        }
    }

    #[test]
    fn test_path_from_goal_is_empty() {
        let level = Level::default();
        let field = DistanceField::compute(&level);

        assert!(field.path_from(level.goal).is_empty());
        assert_eq!(field.next_step(level.goal), None);
    }

    #[test]
    fn test_unreachable_cells() {
        let level = level("S#.\n##.\n..G");
        let field = DistanceField::compute(&level);

        assert_eq!(field.distance(level.start), None);
        assert_eq!(field.next_step(level.start), None);
        assert!(field.path_from(level.start).is_empty());
        assert_eq!(field.distance(Position::new(2, 0)), Some(2));
    }

    #[test]
    fn test_off_grid_queries() {
        let field = DistanceField::compute(&Level::default());

        assert_eq!(field.distance(Position::new(20, 0)), None);
        assert_eq!(field.next_step(Position::new(0, 15)), None);
        assert!(field.path_from(Position::new(100, 100)).is_empty());
    }
}
