//! Type definitions and enums for the application state and navigation.

/// Enumeration of available application screens.
///
/// This enumeration holds information about the current screen of the game. This is used to
/// determine which screen to render and what actions to take based on user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Main menu screen of the game.
    ///
    /// This variant represents the main menu screen, carrying the item under the cursor.
    MainMenu(MainMenuItem),
    /// Level selection screen.
    ///
    /// This variant represents the level menu. It contains a list of the levels available to the
    /// user.
    LevelMenu,
    /// In-game grid screen.
    ///
    /// This variant represents the screen where the grid is displayed and the player walks to
    /// the goal.
    InGame,
}

/// Main menu navigation options.
///
/// This enumeration holds the different items in the main menu. It is used to determine which items
/// can the user select in the main menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MainMenuItem {
    /// "Start Game" menu option.
    StartGame,
    /// "Levels" menu option.
    Levels,
    /// "Quit" menu option.
    Quit,
}

impl MainMenuItem {
    /// Menu items in display order.
    pub(crate) const ALL: [Self; 3] = [Self::StartGame, Self::Levels, Self::Quit];

    /// Returns the label shown for the item.
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::StartGame => "Start Game",
            Self::Levels => "Levels",
            Self::Quit => "Quit",
        }
    }

    /// Returns the item below this one, staying on the last item.
    pub(crate) const fn next(self) -> Self {
        match self {
            Self::StartGame => Self::Levels,
            Self::Levels | Self::Quit => Self::Quit,
        }
    }

    /// Returns the item above this one, staying on the first item.
    pub(crate) const fn previous(self) -> Self {
        match self {
            Self::StartGame | Self::Levels => Self::StartGame,
            Self::Quit => Self::Levels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_variants() {
        let main_menu = Screen::MainMenu(MainMenuItem::StartGame);
        let level_menu = Screen::LevelMenu;
        let in_game = Screen::InGame;

        assert_eq!(main_menu, Screen::MainMenu(MainMenuItem::StartGame));
        assert_ne!(main_menu, Screen::MainMenu(MainMenuItem::Quit));
        assert_ne!(main_menu, in_game);
        assert_ne!(level_menu, in_game);
    }

    #[test]
    fn test_main_menu_next() {
        assert_eq!(MainMenuItem::StartGame.next(), MainMenuItem::Levels);
        assert_eq!(MainMenuItem::Levels.next(), MainMenuItem::Quit);
        assert_eq!(MainMenuItem::Quit.next(), MainMenuItem::Quit);
    }

    #[test]
    fn test_main_menu_previous() {
        assert_eq!(MainMenuItem::Quit.previous(), MainMenuItem::Levels);
        assert_eq!(MainMenuItem::Levels.previous(), MainMenuItem::StartGame);
        assert_eq!(MainMenuItem::StartGame.previous(), MainMenuItem::StartGame);
    }

    #[test]
    fn test_main_menu_labels() {
        let labels: Vec<&str> = MainMenuItem::ALL.iter().map(|item| item.label()).collect();

        assert_eq!(labels, vec!["Start Game", "Levels", "Quit"]);
    }

    #[test]
    fn test_debug_implementations() {
        assert_eq!(format!("{:?}", Screen::InGame), "InGame");
        assert_eq!(format!("{:?}", MainMenuItem::Levels), "Levels");
    }
}
