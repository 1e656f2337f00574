//! Core application state and logic for the game.

use std::{
    io,
    path::PathBuf,
    time::{Duration, Instant},
};

use color_eyre::eyre::Result;
use ratatui::DefaultTerminal;
use tracing::info;

use crate::{
    config::Cli,
    events,
    game::Game,
    grid::Level,
    level_loader,
    types::{MainMenuItem, Screen},
    ui,
};

/// Application state container for the game.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the game and Crossterm events will help writing to.
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// wants to quit the game but it starts off `false`.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    ///
    /// This field holds the current screen of the game. It is used to determine which screen to
    /// render and what actions to take based on user input.
    pub(crate) screen: Screen,
    /// Play-through of the active level.
    ///
    /// This field always holds a game, either on the built-in level or on one loaded and selected
    /// by the user. Starting a game from the main menu resets it.
    pub(crate) game: Game,
    /// Collection of all available levels.
    ///
    /// This field holds the built-in level followed by every valid level file found in
    /// [`levels_dir`](App::levels_dir). It is refreshed each time the level menu opens.
    pub(crate) levels: Vec<Level>,
    /// Index of the level under the cursor in the level menu.
    pub(crate) level_cursor: usize,
    /// Scrolling offset for the level list viewport.
    ///
    /// This field holds the offset by which to scroll the sliding window into the
    /// [`levels`](App::levels) vector in the level menu's viewport.
    pub(crate) viewport_offset: usize,
    /// Height of the level list rendering area.
    ///
    /// This field holds the height of the area in which the list of levels is being rendered as a
    /// measure of terminal cells during the last redraw of the on-screen frame.
    pub(crate) viewport_height: usize,
    /// Directory scanned for level files.
    pub(crate) levels_dir: PathBuf,
    /// Duration of one tile-to-tile move.
    pub(crate) move_duration: Duration,
    /// Whether the shortest-path overlay is drawn.
    pub(crate) show_path: bool,
}

impl App {
    /// Creates a new instance of the App structure from the command-line options.
    ///
    /// The game starts on the level file given with `--level`, or on the built-in level.
    ///
    /// # Errors
    ///
    /// This function returns an error when the level file given on the command line cannot be
    /// loaded.
    pub fn new(cli: &Cli) -> Result<Self> {
        let level = match &cli.level {
            Some(path) => level_loader::load_level(path)?,
            None => Level::default(),
        };

        Ok(Self {
            exit: false,
            screen: Screen::MainMenu(MainMenuItem::StartGame),
            game: Game::new(level.clone(), cli.move_duration()),
            levels: vec![level],
            level_cursor: 0,
            viewport_offset: 0,
            viewport_height: 0,
            levels_dir: cli.levels_dir.clone(),
            move_duration: cli.move_duration(),
            show_path: true,
        })
    }

    /// Runs the main loop of the application.
    ///
    /// This function handles user input and updates the application state. The loop continues until
    /// the exit condition is `true`, after which the function returns to the call site.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        info!(level = %self.game.level.key, "application started");

        while !self.exit {
            let _ = terminal.try_draw(|frame| ui::draw(self, frame).map_err(io::Error::other))?;
            events::handle_events(self)?;
            self.tick(Instant::now());
        }

        info!("application exiting");

        Ok(())
    }

    /// Advances time-based state to `now`.
    pub(crate) fn tick(&mut self, now: Instant) {
        if self.screen == Screen::InGame {
            self.game.animator.update(now);
        }
    }

    /// Starts a fresh play-through of `level` and switches to the in-game screen.
    pub(crate) fn start_level(&mut self, level: Level) {
        self.game = Game::new(level, self.move_duration);
        self.screen = Screen::InGame;
    }
}
