use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::pointer::CELL_WIDTH;
use crate::game::{Board, Player, COLS, ROWS};

/// Hover line, top border, rows, bottom border, floor line, indicator.
const BOARD_LINES: u16 = ROWS as u16 + 5;
const BOARD_WIDTH: u16 = COLS as u16 * CELL_WIDTH + 2;

/// Everything the game view draws for one frame.
pub struct ViewModel<'a> {
    pub board: &'a Board,
    /// Cell whose piece is still falling and must not be drawn yet
    pub hidden: Option<(usize, usize)>,
    /// Moving pieces as (column, player, height above the board bottom)
    pub falling: Vec<(usize, Player, f64)>,
    /// Piece waiting above the board for the current player
    pub hover: Option<(usize, Player)>,
    pub highlight: &'a [(usize, usize)],
    pub pointer_column: usize,
    pub status: String,
    pub status_player: Option<Player>,
    pub message: Option<&'a str>,
}

/// Where a piece at some height shows up on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Hover,
    Cell(usize),
    Floor,
}

/// Screen slot for a piece at `height` rows above the board bottom.
pub fn slot_for_height(height: f64) -> Slot {
    let row = height.round();
    if row >= ROWS as f64 {
        Slot::Hover
    } else if row >= 0.0 {
        Slot::Cell(row as usize)
    } else {
        Slot::Floor
    }
}

/// Screen position of the board: `x` is the left border, `y` the hover line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub x: u16,
    pub y: u16,
}

impl BoardLayout {
    /// Screen column of the first cell
    pub fn inner_x(&self) -> u16 {
        self.x + 1
    }
}

fn chunks(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),           // Header
            Constraint::Min(BOARD_LINES),    // Board
            Constraint::Length(3),           // Message
            Constraint::Length(3),           // Controls
        ])
        .split(area)
}

/// Where the board lands inside a frame of the given size. Shared by the
/// renderer and the mouse mapping.
pub fn board_layout(area: Rect) -> BoardLayout {
    let board_area = chunks(area)[1];
    BoardLayout {
        x: board_area.x + board_area.width.saturating_sub(BOARD_WIDTH) / 2,
        y: board_area.y,
    }
}

pub fn render(frame: &mut Frame, view: &ViewModel) {
    let chunks = chunks(frame.area());

    render_header(frame, view, chunks[0]);
    render_board(frame, view, chunks[1]);
    render_message(frame, view.message, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn player_color(player: Player) -> Color {
    match player {
        Player::One => Color::Red,
        Player::Two => Color::Yellow,
    }
}

fn render_header(frame: &mut Frame, view: &ViewModel, area: Rect) {
    let color = view.status_player.map_or(Color::White, player_color);

    let header = Paragraph::new(view.status.as_str())
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn piece_span(player: Option<Player>, highlighted: bool) -> Span<'static> {
    match player {
        None => Span::styled(" . ", Style::default().fg(Color::DarkGray)),
        Some(p) => {
            let mut style = Style::default().fg(player_color(p));
            if highlighted {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            Span::styled(" ● ", style)
        }
    }
}

fn blank_or_piece(player: Option<Player>) -> Span<'static> {
    match player {
        None => Span::raw("   "),
        Some(p) => piece_span(Some(p), false),
    }
}

fn render_board(frame: &mut Frame, view: &ViewModel, area: Rect) {
    // Overlay grids for moving pieces, indexed by column
    let mut hover_line: [Option<Player>; COLS] = [None; COLS];
    let mut floor_line: [Option<Player>; COLS] = [None; COLS];
    let mut cells: [[Option<Player>; COLS]; ROWS] = [[None; COLS]; ROWS];

    for row in 0..ROWS {
        for col in 0..COLS {
            if view.hidden != Some((row, col)) {
                cells[row][col] = view.board.get(row, col);
            }
        }
    }
    if let Some((col, player)) = view.hover {
        hover_line[col.min(COLS - 1)] = Some(player);
    }
    for &(col, player, height) in &view.falling {
        let col = col.min(COLS - 1);
        match slot_for_height(height) {
            Slot::Hover => hover_line[col] = Some(player),
            Slot::Cell(row) => cells[row][col] = Some(player),
            Slot::Floor => floor_line[col] = Some(player),
        }
    }

    let mut lines = Vec::with_capacity(BOARD_LINES as usize);

    let mut spans = vec![Span::raw(" ")];
    spans.extend(hover_line.iter().map(|&p| blank_or_piece(p)));
    lines.push(Line::from(spans));

    lines.push(Line::from(format!("╔{}╗", "═".repeat(BOARD_WIDTH as usize - 2))));

    // Row 0 is the bottom, so draw from the top row down
    for row in (0..ROWS).rev() {
        let mut spans = vec![Span::raw("║")];
        for col in 0..COLS {
            let highlighted = view.highlight.contains(&(row, col));
            spans.push(piece_span(cells[row][col], highlighted));
        }
        spans.push(Span::raw("║"));
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(format!("╚{}╝", "═".repeat(BOARD_WIDTH as usize - 2))));

    let mut spans = vec![Span::raw(" ")];
    spans.extend(floor_line.iter().map(|&p| blank_or_piece(p)));
    lines.push(Line::from(spans));

    let mut indicator = vec![Span::raw(" ")];
    for col in 0..COLS {
        if col == view.pointer_column {
            indicator.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator.push(Span::raw("   "));
        }
    }
    lines.push(Line::from(indicator));

    let layout = board_layout(frame.area());
    let board_rect = Rect {
        x: layout.x,
        y: layout.y,
        width: BOARD_WIDTH.min(area.width),
        height: BOARD_LINES.min(area.height),
    };
    frame.render_widget(Paragraph::new(lines), board_rect);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let text = message.unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let controls = Paragraph::new("Mouse/←→: Aim  |  Click/Enter: Drop  |  R: Restart  |  Q: Quit")
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}
