//! A terminal grid game: walk from the start tile to home, past the obstacles, with the shortest
//! remaining way drawn on the board.
//!
//! The shortest paths are precomputed once per level by a uniform-cost search from the goal, so
//! the overlay is a walk along stored links wherever the player stands.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod animation;
mod app;
mod config;
mod events;
mod game;
mod grid;
mod level_loader;
pub mod logging;
mod pathfinding;
mod types;
mod ui;

pub use app::App;
pub use config::Cli;
