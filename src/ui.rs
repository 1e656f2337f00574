//! User interface rendering functions for all application screens.

use std::{rc::Rc, time::Instant};

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::{Marker, DOT},
    text::Line,
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine, Painter, Shape},
        Block, BorderType, Borders, Clear, Paragraph,
    },
    Frame,
};

use crate::{
    animation::StrideFrame,
    game::Game,
    grid::Position,
    types::{MainMenuItem, Screen},
    App,
};

/// Edge length of a tile in canvas units.
const TILE_SIZE: i32 = 32;

/// Edge length of the player's body in canvas units.
const PLAYER_SIZE: i32 = 24;

/// Canvas distance used to test whether a shape edge lies on the canvas boundary.
const EDGE_EPSILON: f64 = 1e-6;

/// Message shown once the goal is reached.
pub(crate) const WIN_MESSAGE: &str = "Congratulations! You've reached home!";

/// Board background.
const BACKGROUND_COLOR: Color = Color::Gray;
/// Shortest-path overlay, a light orange.
const PATH_COLOR: Color = Color::Rgb(255, 223, 186);
/// Obstacle tiles.
const OBSTACLE_COLOR: Color = Color::Red;
/// Goal tile.
const GOAL_COLOR: Color = Color::Green;
/// Player body.
const BODY_COLOR: Color = Color::Blue;
/// Player legs.
const LEG_COLOR: Color = Color::Black;
/// Player arms.
const ARM_COLOR: Color = Color::Red;

/// Updates the application UI based on the persistent state.
///
/// This function renders different screens based on the current state stored in the [`App`]
/// structure, dispatching to the appropriate rendering function for each screen type.
///
/// # Errors
///
/// This function may return errors from drawing operations or data conversion failures.
pub(crate) fn draw(app: &mut App, frame: &mut Frame) -> Result<()> {
    match app.screen {
        Screen::MainMenu(item) => main_menu(frame, item),
        Screen::LevelMenu => level_menu(app, frame)?,
        Screen::InGame => in_game(app, frame)?,
    }

    Ok(())
}

/// Clears the terminal screen by rendering a [`Clear`] widget.
///
/// This function renders a clear widget over the entire area of the frame to prepare for
/// rendering new content without artifacts from previous buffers rendered on the same frame.
pub(crate) fn clear(frame: &mut Frame) {
    let clear = Clear;
    frame.render_widget(clear, frame.area());
}

/// Renders the centred, bordered block a menu lives in.
///
/// The returned layout holds one single-line slot per menu entry.
#[expect(
    clippy::indexing_slicing,
    reason = "The collection is created in-place with few, known elements; there is no risk of bad indexing."
)]
pub(crate) fn init_menu(frame: &mut Frame, title: &str, entries: u16) -> Rc<[Rect]> {
    let space = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Percentage(20),
        Constraint::Percentage(40),
    ])
    .split(frame.area())[1];
    let space = Layout::horizontal([
        Constraint::Percentage(40),
        Constraint::Percentage(20),
        Constraint::Percentage(40),
    ])
    .split(space)[1];

    let layout = Layout::vertical([Constraint::Max(entries + 2)])
        .flex(Flex::Center)
        .split(space)[0];

    let block = Block::bordered()
        .title(title)
        .title_bottom("(j) down / (k) up / (l) select")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(layout);

    frame.render_widget(block, layout);

    Layout::vertical(vec![Constraint::Max(1); entries.into()]).split(inner_space)
}

/// Renders the main menu screen with navigation options.
///
/// This function displays the main menu with options for "Start Game", "Levels", and "Quit". It
/// highlights the currently selected option.
pub(crate) fn main_menu(frame: &mut Frame, item: MainMenuItem) {
    clear(frame);

    let entries = MainMenuItem::ALL;
    let inner_layout = init_menu(frame, "homeward", 3);

    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    for (entry, slot) in entries.iter().zip(inner_layout.iter()) {
        let style = if *entry == item {
            active_content_style
        } else {
            content_style
        };

        frame.render_widget(Line::styled(entry.label(), style).centered(), *slot);
    }
}

/// Renders the level selection menu with a scrollable list of levels.
///
/// This function displays a viewport over the built-in level and the levels loaded from the
/// level directory. The entry under the cursor is highlighted and the level currently being
/// played carries a dot.
///
/// # Errors
///
/// This function may return errors if the layout cannot be split as expected.
pub(crate) fn level_menu(app: &mut App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let space = Layout::horizontal([
        Constraint::Percentage(30),
        Constraint::Fill(1),
        Constraint::Percentage(30),
    ])
    .split(frame.area())
    .get(1)
    .copied()
    .ok_or_eyre("failed to get level list column from layout")?;
    let space = Layout::vertical([
        Constraint::Percentage(30),
        Constraint::Fill(1),
        Constraint::Percentage(30),
    ])
    .split(space)
    .get(1)
    .copied()
    .ok_or_eyre("failed to get level list row from layout")?;

    let block = Block::bordered()
        .title_top("Levels")
        .title_bottom("(j) down / (k) up / (l) play / (h) return")
        .title_alignment(Alignment::Center)
        .style(Color::Green)
        .border_type(BorderType::Rounded);

    let inner_space = block.inner(space);

    frame.render_widget(block, space);

    app.viewport_height = inner_space.height.into();

    // The cursor may sit outside the viewport after reopening the menu or shrinking the terminal
    let height = app.viewport_height.max(1);
    if app.level_cursor < app.viewport_offset {
        app.viewport_offset = app.level_cursor;
    } else if app.level_cursor >= app.viewport_offset + height {
        app.viewport_offset = app.level_cursor + 1 - height;
    }

    let columns = Layout::horizontal([Constraint::Length(2), Constraint::Fill(1)])
        .split(inner_space);
    let selector_column = *columns
        .first()
        .ok_or_eyre("failed to get selector column from layout")?;
    let list_column = *columns
        .last()
        .ok_or_eyre("failed to get list column from layout")?;
    let rows = vec![Constraint::Max(1); inner_space.height.into()];
    let selector_rows = Layout::vertical(rows.clone()).split(selector_column);
    let list_rows = Layout::vertical(rows).split(list_column);

    let content_style = Style::default().fg(Color::Green);
    let active_content_style = Style::default().fg(Color::White).bg(Color::Green);

    let visible = app
        .levels
        .iter()
        .enumerate()
        .skip(app.viewport_offset)
        .take(app.viewport_height);

    for ((idx, level), (selector_row, list_row)) in
        visible.zip(selector_rows.iter().zip(list_rows.iter()))
    {
        let style = if idx == app.level_cursor {
            active_content_style
        } else {
            content_style
        };
        let marker = if *level == app.game.level { DOT } else { " " };
        let entry = format!("{} ({}x{})", level.key, level.width, level.height);

        frame.render_widget(Line::styled(marker, style).centered(), *selector_row);
        frame.render_widget(Line::styled(entry, style), *list_row);
    }

    Ok(())
}

/// Renders the in-game screen with the board, the status line and the win message.
///
/// The board is drawn on a [`Canvas`] in tile units of [`TILE_SIZE`], scaled to the largest
/// whole multiple of two terminal columns and one row per tile that fits the frame.
///
/// # Errors
///
/// This function may return errors from layout lookups.
pub(crate) fn in_game(app: &mut App, frame: &mut Frame) -> Result<()> {
    clear(frame);

    let overall_layout = Layout::vertical([
        Constraint::Min(1),    // Board and padding area
        Constraint::Length(3), // Status block
    ])
    .split(frame.area());

    let board_content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get board content area from layout")?;
    let status_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get status area from layout")?;

    let board_area = board_rect(&app.game, board_content_area);

    frame.render_widget(board(&app.game, app.show_path), board_area);

    let remaining = app
        .game
        .remaining_steps()
        .map_or_else(|| "out of reach".to_owned(), |steps| steps.to_string());
    let status = Paragraph::new(Line::raw(format!(
        "Level: {}  Moves: {}  Steps home: {}",
        app.game.level.key, app.game.moves, remaining
    )))
    .alignment(Alignment::Center)
    .block(
        Block::bordered()
            .title("(arrows/wasd) move / (p) path / (r) restart / (h) menu / (q) quit")
            .title_alignment(Alignment::Center)
            .border_type(BorderType::Plain)
            .borders(Borders::TOP),
    )
    .style(Style::default().fg(Color::Green));

    frame.render_widget(status, status_area);

    if app.game.won {
        win_popup(frame, app.game.moves);
    }

    Ok(())
}

/// Computes the centred rectangle the board is drawn into.
///
/// Each tile takes two columns per row it takes, which keeps tiles roughly square in common
/// terminal fonts. The board shrinks to the available area if the terminal is too small.
fn board_rect(game: &Game, area: Rect) -> Rect {
    let columns = game.level.width.saturating_mul(2);
    let rows = game.level.height;
    let scale = (area.width / columns.max(1))
        .min(area.height / rows.max(1))
        .max(1);

    let width = columns.saturating_mul(scale).min(area.width);
    let height = rows.saturating_mul(scale).min(area.height);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    board
}

/// Builds the canvas widget showing the level, the path overlay and the player.
///
/// Tiles are painted first, the player sprite is painted on a layer of its own so it stays
/// visible on top of the path overlay and the goal.
fn board(game: &Game, show_path: bool) -> Canvas<'_, impl Fn(&mut Context<'_>) + '_> {
    let tile = f64::from(TILE_SIZE);
    let board_width = f64::from(game.level.width) * tile;
    let board_height = f64::from(game.level.height) * tile;
    let path = if show_path {
        game.path_overlay()
    } else {
        Vec::new()
    };

    Canvas::default()
        .x_bounds([0., board_width])
        .y_bounds([0., board_height])
        .background_color(BACKGROUND_COLOR)
        .marker(Marker::Braille)
        .paint(move |ctx| {
            for cell in &path {
                ctx.draw(&FilledRect::tile(*cell, board_height, PATH_COLOR));
            }
            for obstacle in game.level.obstacles() {
                ctx.draw(&FilledRect::tile(obstacle, board_height, OBSTACLE_COLOR));
            }
            ctx.draw(&FilledRect::tile(game.level.goal, board_height, GOAL_COLOR));

            ctx.layer();

            let (grid_x, grid_y) = game.animator.position(Instant::now());
            draw_player(
                ctx,
                (grid_x, grid_y),
                (board_width, board_height),
                game.animator.stride(),
            );
        })
}

/// Draws the stick figure whose tile has its top-left corner at grid position `(x, y)`.
///
/// Sprite offsets are measured from the tile's top-left corner with the vertical axis pointing
/// down, then flipped into canvas coordinates. The figure is a filled body with two legs in the
/// current stride and two raised arms. Limbs reach into the neighbouring tiles, so their ends are
/// pulled back onto the board along its edges; the canvas drops lines with an endpoint outside
/// its bounds.
fn draw_player(
    ctx: &mut Context<'_>,
    (x, y): (f64, f64),
    (board_width, board_height): (f64, f64),
    stride: StrideFrame,
) {
    let tile = f64::from(TILE_SIZE);
    let size = f64::from(PLAYER_SIZE);
    let inset = f64::from(rounded_div::i32(TILE_SIZE - PLAYER_SIZE, 2));

    let left = x * tile + inset;
    let top = board_height - y * tile - inset;
    let at = |dx: f64, dy: f64| {
        (
            (left + dx).clamp(0., board_width),
            (top - dy).clamp(0., board_height),
        )
    };

    let (leg_x, leg_y) = (4., size);
    let (left_foot, right_foot) = match stride {
        StrideFrame::Left => (leg_x - 6., leg_x + size - 2.),
        StrideFrame::Right => (leg_x + 6., leg_x + size - 14.),
    };
    let legs = [
        (at(leg_x, leg_y), at(left_foot, leg_y + 12.)),
        (at(leg_x + size - 8., leg_y), at(right_foot, leg_y + 12.)),
    ];
    for ((x1, y1), (x2, y2)) in legs {
        ctx.draw(&CanvasLine {
            x1,
            y1,
            x2,
            y2,
            color: LEG_COLOR,
        });
    }

    let (arm_x, arm_y) = (2., 6.);
    let arms = [
        (at(arm_x, arm_y), at(arm_x - 10., arm_y - 12.)),
        (
            at(arm_x + size - 4., arm_y),
            at(arm_x + size + 4., arm_y - 12.),
        ),
    ];
    for ((x1, y1), (x2, y2)) in arms {
        ctx.draw(&CanvasLine {
            x1,
            y1,
            x2,
            y2,
            color: ARM_COLOR,
        });
    }

    // Body last, so its colour wins in cells it shares with a limb
    ctx.draw(&FilledRect {
        x: left,
        y: top - size,
        width: size,
        height: size,
        color: BODY_COLOR,
    });
}

/// Renders the centred message shown once the goal is reached.
fn win_popup(frame: &mut Frame, moves: u32) {
    let message_width = u16::try_from(WIN_MESSAGE.len()).unwrap_or(u16::MAX);
    let [row] = Layout::vertical([Constraint::Length(5)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [popup] = Layout::horizontal([Constraint::Length(message_width.saturating_add(4))])
        .flex(Flex::Center)
        .areas(row);

    let text = vec![
        Line::raw(WIN_MESSAGE).centered(),
        Line::raw(format!("{moves} moves")).centered(),
    ];
    let paragraph = Paragraph::new(text).block(
        Block::bordered()
            .title_bottom("(r) play again / (h) menu")
            .title_alignment(Alignment::Center)
            .border_type(BorderType::Rounded),
    );

    frame.render_widget(Clear, popup);
    frame.render_widget(
        paragraph.style(Style::default().fg(Color::White).bg(Color::Black)),
        popup,
    );
}

/// Solid rectangle shape for the canvas.
///
/// The built-in rectangle only strokes its outline; tiles and the player's body are filled.
struct FilledRect {
    /// Left edge in canvas units.
    x: f64,
    /// Bottom edge in canvas units.
    y: f64,
    /// Horizontal extent in canvas units.
    width: f64,
    /// Vertical extent in canvas units.
    height: f64,
    /// Fill colour.
    color: Color,
}

impl FilledRect {
    /// Builds the rectangle covering the tile at `position`.
    ///
    /// Grid rows grow downwards while canvas coordinates grow upwards, hence the flip against
    /// `board_height`.
    fn tile(position: Position, board_height: f64, color: Color) -> Self {
        let tile = f64::from(TILE_SIZE);

        Self {
            x: f64::from(position.x) * tile,
            y: board_height - f64::from(position.y + 1) * tile,
            width: tile,
            height: tile,
            color,
        }
    }
}

impl Shape for FilledRect {
    fn draw(&self, painter: &mut Painter<'_, '_>) {
        let Some((left, top)) = painter.get_point(self.x, self.y + self.height) else {
            return;
        };
        let Some((right, bottom)) = painter.get_point(self.x + self.width, self.y) else {
            return;
        };

        // A dot on a shared edge belongs to the rectangle right of or below it. The last dot
        // column and row are only reached by rectangles ending on the canvas boundary.
        let right = if painter
            .get_point(self.x + self.width + EDGE_EPSILON, self.y)
            .is_some()
        {
            right
        } else {
            right + 1
        };
        let bottom = if painter.get_point(self.x, self.y - EDGE_EPSILON).is_some() {
            bottom
        } else {
            bottom + 1
        };

        for y in top..bottom.max(top + 1) {
            for x in left..right.max(left + 1) {
                painter.paint(x, y, self.color);
            }
        }
    }
}
