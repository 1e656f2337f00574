//! Event handling functions for user input and application state updates.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use tracing::{debug, warn};

use crate::{
    grid::{Direction, Level},
    level_loader,
    types::{MainMenuItem, Screen},
    App,
};

/// Input polling interval in milliseconds.
///
/// This constant bounds how long the main loop waits for a key before redrawing. It has to stay
/// well below the move duration so that tweens are drawn in several frames.
pub(crate) const FRAME_POLL_MS: u64 = 16;

/// Handles input events and updates the application state accordingly.
///
/// This function polls for keyboard events and dispatches them to [`handle_key`]. It uses a
/// timeout to avoid blocking the UI.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(Duration::from_millis(FRAME_POLL_MS))? {
        if let Event::Key(key) = event::read()? {
            handle_key(app, key);
        }
    }

    Ok(())
}

/// Dispatches a single key event to the handler of the current screen.
///
/// Only presses are handled; key releases and repeats reported by some terminals are dropped.
/// The 'q' key quits from every screen.
pub(crate) fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('q') {
        app.exit = true;
        return;
    }

    match app.screen {
        Screen::MainMenu(item) => handle_main_menu(app, item, key.code),
        Screen::LevelMenu => handle_level_menu(app, key.code),
        Screen::InGame => handle_in_game(app, key.code),
    }
}

/// Handles keys on the main menu.
///
/// 'j' and 'k' move the cursor, 'l' selects. Opening the level menu rescans the level directory.
fn handle_main_menu(app: &mut App, item: MainMenuItem, code: KeyCode) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.screen = Screen::MainMenu(item.next()),
        KeyCode::Char('k') | KeyCode::Up => app.screen = Screen::MainMenu(item.previous()),
        KeyCode::Char('l') | KeyCode::Enter => match item {
            MainMenuItem::StartGame => {
                let level = app.game.level.clone();
                app.start_level(level);
            }
            MainMenuItem::Levels => open_level_menu(app),
            MainMenuItem::Quit => app.exit = true,
        },
        _ => {}
    }
}

/// Refreshes the level list and switches to the level menu.
///
/// The cursor starts on the level currently being played, if it is still in the list. An
/// unreadable level directory leaves only the built-in level to choose from.
fn open_level_menu(app: &mut App) {
    let mut levels = vec![Level::default()];
    if let Err(err) = level_loader::fetch_levels(&app.levels_dir, &mut levels) {
        warn!(dir = %app.levels_dir.display(), %err, "failed to scan level directory");
    }

    app.level_cursor = levels
        .iter()
        .position(|level| *level == app.game.level)
        .unwrap_or(0);
    app.levels = levels;
    app.viewport_offset = 0;
    app.screen = Screen::LevelMenu;
}

/// Handles keys on the level menu.
///
/// 'j' and 'k' move the cursor and scroll the viewport, 'l' starts the level under the cursor
/// and 'h' returns to the main menu.
fn handle_level_menu(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.level_cursor + 1 < app.levels.len() {
                app.level_cursor += 1;
            }
            let viewport_end = app.viewport_offset + app.viewport_height;
            if app.viewport_height > 0 && app.level_cursor >= viewport_end {
                app.viewport_offset = app.level_cursor + 1 - app.viewport_height;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.level_cursor = app.level_cursor.saturating_sub(1);
            if app.level_cursor < app.viewport_offset {
                app.viewport_offset = app.level_cursor;
            }
        }
        KeyCode::Char('l') | KeyCode::Enter => {
            if let Some(level) = app.levels.get(app.level_cursor).cloned() {
                debug!(level = %level.key, "level selected");
                app.start_level(level);
            }
        }
        KeyCode::Char('h') | KeyCode::Esc => {
            app.screen = Screen::MainMenu(MainMenuItem::Levels);
        }
        _ => {}
    }
}

/// Handles keys on the in-game screen.
///
/// Arrow keys and 'w'/'a'/'s'/'d' move the player, 'p' toggles the path overlay, 'r' restarts
/// the level and 'h' returns to the main menu.
fn handle_in_game(app: &mut App, code: KeyCode) {
    let direction = match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
        KeyCode::Char('p') => {
            app.show_path = !app.show_path;
            None
        }
        KeyCode::Char('r') => {
            app.game.restart();
            None
        }
        KeyCode::Char('h') | KeyCode::Esc => {
            app.screen = Screen::MainMenu(MainMenuItem::StartGame);
            None
        }
        _ => None,
    };

    if let Some(direction) = direction {
        let _ = app.game.try_move(direction, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use clap::Parser as _;
    use ratatui::crossterm::event::KeyModifiers;

    use super::*;
    use crate::{config::Cli, grid::Position};

    /// Creates an app with default options.
    fn create_test_app() -> App {
        App::new(&Cli::parse_from(["homeward"])).expect("app should build")
    }

    /// Feeds a key press to the app.
    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_quit_from_any_screen() {
        for screen in [
            Screen::MainMenu(MainMenuItem::Levels),
            Screen::LevelMenu,
            Screen::InGame,
        ] {
            let mut app = create_test_app();
            app.screen = screen;
            press(&mut app, KeyCode::Char('q'));
            assert!(app.exit, "'q' should quit from {screen:?}");
        }
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut app = create_test_app();
        let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;

        handle_key(&mut app, key);

        assert!(!app.exit);
    }

    #[test]
    fn test_main_menu_navigation() {
        let mut app = create_test_app();

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Levels));
        press(&mut app, KeyCode::Down);
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Quit));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Levels));
    }

    #[test]
    fn test_main_menu_quit_item() {
        let mut app = create_test_app();
        app.screen = Screen::MainMenu(MainMenuItem::Quit);

        press(&mut app, KeyCode::Enter);

        assert!(app.exit);
    }

    #[test]
    fn test_start_game_resets_progress() {
        let mut app = create_test_app();
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.screen, Screen::InGame);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.game.moves, 1);

        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.game.moves, 0);
        assert_eq!(app.game.player, app.game.level.start);
    }

    #[test]
    fn test_in_game_movement_keys() {
        let mut app = create_test_app();
        app.screen = Screen::InGame;

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.game.player, Position::new(2, 2));

        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('w'));
        assert_eq!(app.game.player, Position::new(1, 1));
        assert_eq!(app.game.moves, 4);
    }

    #[test]
    fn test_in_game_toggles_and_restart() {
        let mut app = create_test_app();
        app.screen = Screen::InGame;

        press(&mut app, KeyCode::Char('p'));
        assert!(!app.show_path);
        press(&mut app, KeyCode::Char('p'));
        assert!(app.show_path);

        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.game.player, app.game.level.start);
        assert_eq!(app.game.moves, 0);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::StartGame));
    }

    #[test]
    fn test_level_menu_with_missing_directory() {
        let mut app = create_test_app();
        app.levels_dir = env::temp_dir().join(format!("homeward-{}-absent", process::id()));
        app.screen = Screen::MainMenu(MainMenuItem::Levels);

        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen, Screen::LevelMenu);
        assert_eq!(app.levels, vec![Level::default()]);
    }

    #[test]
    fn test_level_menu_flow() {
        let dir = env::temp_dir().join(format!("homeward-{}-events", process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("failed to create scratch directory");
        fs::write(dir.join("alpha.level"), "S.G").expect("failed to write level");
        fs::write(dir.join("beta.level"), "S\n.\nG").expect("failed to write level");

        let mut app = create_test_app();
        app.levels_dir.clone_from(&dir);
        app.screen = Screen::MainMenu(MainMenuItem::Levels);

        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.screen, Screen::LevelMenu);
        assert_eq!(app.levels.len(), 3);
        assert_eq!(app.level_cursor, 0);

        app.viewport_height = 2;
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.level_cursor, 2);
        assert_eq!(app.viewport_offset, 1);

        press(&mut app, KeyCode::Char('k'));
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.level_cursor, 0);
        assert_eq!(app.viewport_offset, 0);

        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.screen, Screen::InGame);
        assert_eq!(app.game.level.key, "alpha");

        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.level_cursor, 1, "cursor reopens on the active level");

        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.screen, Screen::MainMenu(MainMenuItem::Levels));

        let _ = fs::remove_dir_all(&dir);
    }
}
