use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{backend::Backend, layout::Rect, Terminal};

use super::animation::{ClearAnimation, DropAnimation, RenderConfig};
use super::game_view::{self, ViewModel};
use super::pointer::Pointer;
use crate::game::{win, Command, GameEngine, GameResult, Player, Response};

/// What the screen is doing between engine calls.
enum Mode {
    /// Waiting for the current player to drop a piece
    Idle,
    /// A piece is falling; input is suppressed until it lands
    Dropping(DropAnimation),
    /// Game over, waiting for the players to acknowledge
    Announcing {
        result: GameResult,
        highlight: Vec<(usize, usize)>,
    },
    /// Pieces of the finished game falling out of the board
    Clearing(ClearAnimation),
}

pub struct App {
    engine: GameEngine,
    render: RenderConfig,
    pointer: Pointer,
    mode: Mode,
    area: Rect,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(engine: GameEngine, render: RenderConfig) -> Self {
        App {
            engine,
            render,
            pointer: Pointer::default(),
            mode: Mode::Idle,
            area: Rect::default(),
            should_quit: false,
            message: None,
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let frame_interval = Duration::from_millis(self.render.frame_interval_ms);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|f| {
                self.area = f.area();
                self.render(f);
            })?;

            if self.should_quit {
                break;
            }

            let timeout = frame_interval.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }

            if last_tick.elapsed() >= frame_interval {
                self.tick();
                last_tick = Instant::now();
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => self.pointer.move_left(),
            KeyCode::Right => self.pointer.move_right(),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            KeyCode::Char('r') => self.restart(),
            _ => {}
        }
    }

    /// Handle pointer motion and clicks
    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let layout = game_view::board_layout(self.area);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.pointer.track(mouse.column, layout.inner_x());
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer.track(mouse.column, layout.inner_x());
                self.activate();
            }
            _ => {}
        }
    }

    /// Click or Enter: drop a piece, or acknowledge a finished game
    fn activate(&mut self) {
        match self.mode {
            Mode::Idle => self.drop_piece(),
            Mode::Announcing { .. } => self.clear_board(),
            Mode::Dropping(_) | Mode::Clearing(_) => {}
        }
    }

    /// Drop the current player's piece at the pointer
    fn drop_piece(&mut self) {
        let column = self.pointer.column();
        match self.engine.dispatch(Command::TryMove(column)) {
            Ok(Response::Moved(accepted)) => {
                self.message = None;
                self.mode = Mode::Dropping(DropAnimation::new(
                    accepted,
                    self.pointer.x(),
                    self.engine.physics().board_top(),
                    self.render.frame_stride,
                ));
            }
            Ok(_) => {}
            Err(err) => {
                self.message = Some(format!("Cannot drop there: {err}"));
            }
        }
    }

    /// Acknowledge the result and start the clearing animation
    fn clear_board(&mut self) {
        let pieces = self.engine.board().pieces();
        if let Ok(Response::Reset) = self.engine.dispatch(Command::AcknowledgeTerminal) {
            self.mode = Mode::Clearing(ClearAnimation::new(
                pieces,
                self.engine.physics(),
                self.render.frame_stride,
            ));
            self.message = None;
        }
    }

    /// Abandon the current game, and any animation in flight
    fn restart(&mut self) {
        if let Ok(Response::Reset) = self.engine.dispatch(Command::ResetRequested) {
            self.mode = Mode::Idle;
            self.message = Some("New game started!".to_string());
        }
    }

    /// Advance whatever animation is running by one frame
    fn tick(&mut self) {
        match &mut self.mode {
            Mode::Idle | Mode::Announcing { .. } => {}
            Mode::Dropping(animation) => {
                if !animation.advance() {
                    self.landed();
                }
            }
            Mode::Clearing(animation) => {
                if !animation.advance() {
                    self.mode = Mode::Idle;
                    self.message = Some("New game! Player 1 starts.".to_string());
                }
            }
        }
    }

    /// The falling piece came to rest; show the outcome of its move
    fn landed(&mut self) {
        let Mode::Dropping(animation) = &self.mode else {
            return;
        };
        let (row, column, player, outcome) =
            (animation.row, animation.column, animation.player, animation.outcome);

        self.mode = match outcome {
            GameResult::InProgress => Mode::Idle,
            GameResult::Win(winner) => {
                self.message = Some(format!(
                    "{} wins! Click or press Enter to clear the board.",
                    winner.name()
                ));
                Mode::Announcing {
                    result: outcome,
                    highlight: win::winning_cells(self.engine.board(), row, column, player),
                }
            }
            GameResult::Draw => {
                self.message =
                    Some("It's a draw! Click or press Enter to clear the board.".to_string());
                Mode::Announcing {
                    result: outcome,
                    highlight: Vec::new(),
                }
            }
        };
    }

    fn status(&self) -> (String, Option<Player>) {
        match &self.mode {
            Mode::Announcing {
                result: GameResult::Win(p),
                ..
            } => (format!("Game Over  |  {} wins", p.name()), Some(*p)),
            Mode::Announcing { .. } => ("Game Over  |  Draw".to_string(), None),
            Mode::Dropping(animation) => (
                format!("{} dropped in column {}", animation.player.name(), animation.column + 1),
                Some(animation.player),
            ),
            Mode::Clearing(_) => ("Clearing the board".to_string(), None),
            Mode::Idle => match self.engine.current_player() {
                Some(p) => (format!("Current Player: {}", p.name()), Some(p)),
                None => ("Game Over".to_string(), None),
            },
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let (status, status_player) = self.status();
        let mut view = ViewModel {
            board: self.engine.board(),
            hidden: None,
            falling: Vec::new(),
            hover: None,
            highlight: &[],
            pointer_column: self.pointer.column(),
            status,
            status_player,
            message: self.message.as_deref(),
        };

        match &self.mode {
            Mode::Idle => {
                view.hover = self.engine.current_player().map(|p| (self.pointer.column(), p));
            }
            Mode::Dropping(animation) => {
                view.hidden = Some((animation.row, animation.column));
                if let Some(piece) = animation.current() {
                    view.falling
                        .push((piece.x.max(0.0) as usize, animation.player, piece.height));
                }
            }
            Mode::Announcing { highlight, .. } => {
                view.highlight = highlight.as_slice();
            }
            Mode::Clearing(animation) => {
                view.falling.extend(animation.pieces());
            }
        }

        game_view::render(frame, &view);
    }
}
