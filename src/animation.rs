//! Player animation module.
//!
//! This module contains the tween that slides the player sprite from tile to tile and the
//! two-frame running stride. Animation is purely visual: the logical player position changes at
//! once and the animator only decides where, between two tiles, the sprite is drawn.

use std::time::{Duration, Instant};

use crate::grid::Position;

/// Default duration of a tile-to-tile move in milliseconds.
pub(crate) const DEFAULT_MOVE_DURATION_MS: u64 = 100;

/// Frames of the stick figure's running cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StrideFrame {
    /// Left leg forward.
    Left,
    /// Right leg forward.
    Right,
}

impl StrideFrame {
    /// Returns the other frame of the cycle.
    pub(crate) const fn toggled(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// A single tween between two neighbouring tiles.
#[derive(Clone, Copy, Debug)]
struct Movement {
    /// Tile the sprite leaves.
    from: Position,
    /// Tile the sprite arrives on.
    to: Position,
    /// Moment the tween began.
    started: Instant,
}

/// Visual state of the player sprite.
///
/// The animator holds at most one tween in flight. The running stride flips every half move
/// duration while a tween is active and is left alone while the player stands still.
#[derive(Clone, Debug)]
pub(crate) struct PlayerAnimator {
    /// Tile the sprite rests on when no tween is active.
    resting: Position,
    /// Tween in flight, if any.
    movement: Option<Movement>,
    /// Duration of one tween.
    duration: Duration,
    /// Current frame of the running cycle.
    stride: StrideFrame,
    /// Moment the stride last flipped.
    last_stride: Instant,
}

impl PlayerAnimator {
    /// Creates an animator with the sprite resting on `position`.
    pub(crate) fn new(position: Position, duration: Duration, now: Instant) -> Self {
        Self {
            resting: position,
            movement: None,
            duration,
            stride: StrideFrame::Left,
            last_stride: now,
        }
    }

    /// Starts a tween from `from` to `to`.
    ///
    /// A tween still in flight is finished first so the sprite never lags more than one tile
    /// behind the player.
    pub(crate) fn start(&mut self, from: Position, to: Position, now: Instant) {
        self.snap(from);
        self.stride = self.stride.toggled();
        self.last_stride = now;
        self.movement = Some(Movement {
            from,
            to,
            started: now,
        });
    }

    /// Drops any tween and rests the sprite on `position`.
    pub(crate) fn snap(&mut self, position: Position) {
        self.movement = None;
        self.resting = position;
    }

    /// Advances the animation to `now`.
    ///
    /// Finished tweens are retired and the stride flips at half the move duration.
    pub(crate) fn update(&mut self, now: Instant) {
        let Some(movement) = self.movement else {
            return;
        };

        if now.saturating_duration_since(movement.started) >= self.duration {
            self.snap(movement.to);
            return;
        }

        if now.saturating_duration_since(self.last_stride) >= self.duration / 2 {
            self.stride = self.stride.toggled();
            self.last_stride = now;
        }
    }

    /// Checks whether a tween is still running at `now`.
    pub(crate) fn is_moving(&self, now: Instant) -> bool {
        self.movement.is_some_and(|movement| {
            now.saturating_duration_since(movement.started) < self.duration
        })
    }

    /// Returns the current frame of the running cycle.
    pub(crate) const fn stride(&self) -> StrideFrame {
        self.stride
    }

    /// Returns the fractional grid position of the sprite at `now`.
    pub(crate) fn position(&self, now: Instant) -> (f64, f64) {
        let Some(movement) = self.movement else {
            return (f64::from(self.resting.x), f64::from(self.resting.y));
        };

        let progress = if self.duration.is_zero() {
            1.
        } else {
            (now.saturating_duration_since(movement.started).as_secs_f64()
                / self.duration.as_secs_f64())
            .clamp(0., 1.)
        };
        let eased = smoothstep(progress);

        (
            lerp(f64::from(movement.from.x), f64::from(movement.to.x), eased),
            lerp(f64::from(movement.from.y), f64::from(movement.to.y), eased),
        )
    }
}

/// Eases `progress` in and out with the cubic smoothstep curve.
fn smoothstep(progress: f64) -> f64 {
    progress * progress * 2.0_f64.mul_add(-progress, 3.)
}

/// Interpolates linearly between `from` and `to`.
fn lerp(from: f64, to: f64, amount: f64) -> f64 {
    (to - from).mul_add(amount, from)
}
