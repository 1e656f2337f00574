//! Game state and movement rules.

use std::time::{Duration, Instant};

use tracing::{debug, info, trace};

use crate::{
    animation::PlayerAnimator,
    grid::{Direction, Level, Position},
    pathfinding::DistanceField,
};

/// Result of a movement request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MoveOutcome {
    /// The player stepped onto a free tile.
    Moved,
    /// The target tile is an obstacle or lies off the grid.
    Blocked,
    /// The player stepped onto the goal.
    Won,
    /// The level is already won, input is no longer accepted.
    Ignored,
}

/// State of a single play-through of a level.
#[derive(Clone, Debug)]
pub(crate) struct Game {
    /// Level being played.
    pub(crate) level: Level,
    /// Shortest-path data towards the level's goal.
    field: DistanceField,
    /// Logical player position.
    pub(crate) player: Position,
    /// Whether the player has reached the goal.
    pub(crate) won: bool,
    /// Number of successful moves since the level began.
    pub(crate) moves: u32,
    /// Sprite animation of the player.
    pub(crate) animator: PlayerAnimator,
}

impl Game {
    /// Starts a play-through of `level` with the player on its start tile.
    ///
    /// The distance field is computed here, once, and reused for every move.
    pub(crate) fn new(level: Level, move_duration: Duration) -> Self {
        let field = DistanceField::compute(&level);
        let animator = PlayerAnimator::new(level.start, move_duration, Instant::now());

        info!(
            level = %level.key,
            width = level.width,
            height = level.height,
            optimal = ?field.distance(level.start),
            "level started"
        );

        Self {
            player: level.start,
            field,
            level,
            won: false,
            moves: 0,
            animator,
        }
    }

    /// Tries to move the player one tile in `direction`.
    ///
    /// The move is refused when the target is off the grid or an obstacle. Once the goal has been
    /// reached every further request is ignored.
    pub(crate) fn try_move(&mut self, direction: Direction, now: Instant) -> MoveOutcome {
        if self.won {
            return MoveOutcome::Ignored;
        }

        let target = self
            .player
            .step(direction, self.level.width, self.level.height)
            .filter(|&target| self.level.is_walkable(target));
        let Some(target) = target else {
            trace!(?direction, player = ?self.player, "move blocked");
            return MoveOutcome::Blocked;
        };

        self.animator.start(self.player, target, now);
        self.player = target;
        self.moves += 1;
        debug!(?direction, player = ?self.player, moves = self.moves, "player moved");

        if target == self.level.goal {
            self.won = true;
            info!(level = %self.level.key, moves = self.moves, "goal reached");
            return MoveOutcome::Won;
        }

        MoveOutcome::Moved
    }

    /// Puts the player back on the start tile and clears the move counter.
    ///
    /// The distance field is recomputed, as on a fresh start of the level.
    pub(crate) fn restart(&mut self) {
        self.field = DistanceField::compute(&self.level);
        self.player = self.level.start;
        self.won = false;
        self.moves = 0;
        self.animator.snap(self.level.start);
        info!(level = %self.level.key, "level restarted");
    }

    /// Returns the remaining shortest path from the player to the goal.
    pub(crate) fn path_overlay(&self) -> Vec<Position> {
        self.field.path_from(self.player)
    }

    /// Returns the number of steps left on the shortest path, `None` if the goal is out of reach.
    pub(crate) fn remaining_steps(&self) -> Option<u32> {
        self.field.distance(self.player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Creates a game on a small level with the goal two steps right of the start.
    fn create_test_game() -> Game {
        let level = Level::parse("test".to_owned(), "S.G\n.#.\n...").expect("valid level");
        Game::new(level, Duration::from_millis(100))
    }

    #[test]
    fn test_new_game() {
        let game = create_test_game();

        assert_eq!(game.player, game.level.start);
        assert!(!game.won);
        assert_eq!(game.moves, 0);
        assert_eq!(game.remaining_steps(), Some(2));
        assert_eq!(
            game.path_overlay(),
            vec![Position::new(1, 0), Position::new(2, 0)]
        );
    }

    #[test]
    fn test_move_onto_free_tile() {
        let mut game = create_test_game();

        assert_eq!(
            game.try_move(Direction::Down, Instant::now()),
            MoveOutcome::Moved
        );
        assert_eq!(game.player, Position::new(0, 1));
        assert_eq!(game.moves, 1);
        assert_eq!(game.remaining_steps(), Some(3));
    }

    #[test]
    fn test_move_into_obstacle_is_blocked() {
        let mut game = create_test_game();
        let now = Instant::now();
        let _ = game.try_move(Direction::Right, now);

        assert_eq!(game.try_move(Direction::Down, now), MoveOutcome::Blocked);
        assert_eq!(game.player, Position::new(1, 0));
        assert_eq!(game.moves, 1);
    }

    #[test]
    fn test_move_off_grid_is_blocked() {
        let mut game = create_test_game();
        let now = Instant::now();

        assert_eq!(game.try_move(Direction::Up, now), MoveOutcome::Blocked);
        assert_eq!(game.try_move(Direction::Left, now), MoveOutcome::Blocked);
        assert_eq!(game.player, game.level.start);
        assert_eq!(game.moves, 0);
    }

    #[test]
    fn test_reaching_goal_wins() {
        let mut game = create_test_game();
        let now = Instant::now();

        assert_eq!(game.try_move(Direction::Right, now), MoveOutcome::Moved);
        assert_eq!(game.try_move(Direction::Right, now), MoveOutcome::Won);
        assert!(game.won);
        assert_eq!(game.remaining_steps(), Some(0));
        assert!(game.path_overlay().is_empty());
    }

    #[test]
    fn test_input_ignored_after_win() {
        let mut game = create_test_game();
        let now = Instant::now();
        let _ = game.try_move(Direction::Right, now);
        let _ = game.try_move(Direction::Right, now);

        assert_eq!(game.try_move(Direction::Down, now), MoveOutcome::Ignored);
        assert_eq!(game.player, game.level.goal);
        assert_eq!(game.moves, 2);
    }

    #[test]
    fn test_restart() {
        let mut game = create_test_game();
        let now = Instant::now();
        let _ = game.try_move(Direction::Right, now);
        let _ = game.try_move(Direction::Right, now);

        game.restart();

        assert_eq!(game.player, game.level.start);
        assert!(!game.won);
        assert_eq!(game.moves, 0);
        assert!(!game.animator.is_moving(now));
        assert_eq!(game.try_move(Direction::Down, now), MoveOutcome::Moved);
    }

    #[test]
    fn test_default_level_walk_home() {
        let mut game = Game::new(Level::default(), Duration::ZERO);
        let now = Instant::now();

        for _ in 0..17 {
            assert_eq!(game.try_move(Direction::Right, now), MoveOutcome::Moved);
        }
        for _ in 0..11 {
            assert_eq!(game.try_move(Direction::Down, now), MoveOutcome::Moved);
        }

        assert_eq!(game.try_move(Direction::Down, now), MoveOutcome::Won);
        assert_eq!(game.moves, 29);
    }
}
