use tracing::{debug, info};

use super::{win, Board, Player};
use crate::error::{ConfigError, InvalidMove};
use crate::physics::{FallModel, PhysicsConfig, Trajectory};

/// Result of the game after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    InProgress,
    Win(Player),
    Draw,
}

impl GameResult {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameResult::InProgress)
    }
}

/// Engine state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    AwaitingMove(Player),
    /// A move is being applied. Never observable between calls.
    Resolving,
    Terminal(GameResult),
}

/// An accepted move, with the trajectory to animate it.
#[derive(Debug)]
pub struct MoveAccepted {
    pub player: Player,
    pub column: usize,
    pub row: usize,
    pub trajectory: Trajectory,
    pub outcome: GameResult,
}

/// UI events, expressed as commands against the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TryMove(usize),
    AcknowledgeTerminal,
    ResetRequested,
}

/// What a dispatched command produced.
#[derive(Debug)]
pub enum Response {
    Moved(MoveAccepted),
    Reset,
    Ignored,
}

/// Two-player game engine. Owns the board and the turn; every call takes the
/// engine by reference, there is no global state.
#[derive(Debug, Clone)]
pub struct GameEngine {
    board: Board,
    state: EngineState,
    physics: FallModel,
}

impl GameEngine {
    /// Fresh game with default physics
    pub fn new_game() -> Self {
        Self::with_model(FallModel::default())
    }

    /// Fresh game with the given physics, validated up front
    pub fn with_physics(physics: &PhysicsConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_model(physics.build()?))
    }

    pub fn with_model(physics: FallModel) -> Self {
        GameEngine {
            board: Board::new(),
            state: EngineState::AwaitingMove(Player::One),
            physics,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn physics(&self) -> &FallModel {
        &self.physics
    }

    /// Player to move, if the game is still running
    pub fn current_player(&self) -> Option<Player> {
        match self.state {
            EngineState::AwaitingMove(player) => Some(player),
            _ => None,
        }
    }

    /// Terminal result, if the game has ended
    pub fn result(&self) -> Option<GameResult> {
        match self.state {
            EngineState::Terminal(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, EngineState::Terminal(_))
    }

    /// Columns that can still take a piece
    pub fn legal_columns(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        (0..super::COLS).filter(|&c| self.board.can_drop(c)).collect()
    }

    /// Drop the current player's piece into `column`.
    ///
    /// On rejection nothing changes. On success the returned outcome is the
    /// state the engine moved to: `InProgress` means the other player is up.
    pub fn try_move(&mut self, column: usize) -> Result<MoveAccepted, InvalidMove> {
        let player = match self.state {
            EngineState::AwaitingMove(player) => player,
            _ => {
                debug!(column, "move rejected: game over");
                return Err(InvalidMove::GameOver);
            }
        };
        if !self.board.can_drop(column) {
            let err = if column >= super::COLS {
                InvalidMove::OutOfRange { column }
            } else {
                InvalidMove::ColumnFull { column }
            };
            debug!(column, error = %err, "move rejected");
            return Err(err);
        }

        let row = self.board.drop_piece(column, player)?;
        self.state = EngineState::Resolving;
        // The new piece comes to rest on the `row` pieces already below it.
        let trajectory = self.physics.drop_trajectory(row);

        let outcome = if win::check_win(&self.board, row, column, player) {
            GameResult::Win(player)
        } else if self.board.is_full() {
            GameResult::Draw
        } else {
            GameResult::InProgress
        };

        self.state = match outcome {
            GameResult::InProgress => EngineState::AwaitingMove(player.other()),
            result => EngineState::Terminal(result),
        };
        debug!(player = player.number(), column, row, "piece dropped");
        match outcome {
            GameResult::Win(winner) => info!(winner = winner.number(), "game won"),
            GameResult::Draw => info!("game drawn"),
            GameResult::InProgress => {}
        }

        Ok(MoveAccepted {
            player,
            column,
            row,
            trajectory,
            outcome,
        })
    }

    /// Leave the terminal state for a fresh game. Does nothing while a game
    /// is in progress. Returns whether the board was reset.
    pub fn acknowledge_terminal(&mut self) -> bool {
        if !self.is_terminal() {
            return false;
        }
        self.reset();
        true
    }

    /// Start over from any state.
    pub fn reset_requested(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.board.reset();
        self.state = EngineState::AwaitingMove(Player::One);
        info!("new game");
    }

    /// Apply one UI command.
    pub fn dispatch(&mut self, command: Command) -> Result<Response, InvalidMove> {
        match command {
            Command::TryMove(column) => self.try_move(column).map(Response::Moved),
            Command::AcknowledgeTerminal => Ok(if self.acknowledge_terminal() {
                Response::Reset
            } else {
                Response::Ignored
            }),
            Command::ResetRequested => {
                self.reset_requested();
                Ok(Response::Reset)
            }
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new_game()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{COLS, ROWS};

    fn play(engine: &mut GameEngine, columns: &[usize]) -> GameResult {
        let mut outcome = GameResult::InProgress;
        for &col in columns {
            outcome = engine.try_move(col).unwrap().outcome;
        }
        outcome
    }

    #[test]
    fn test_initial_state() {
        let engine = GameEngine::new_game();
        assert_eq!(engine.state(), EngineState::AwaitingMove(Player::One));
        assert_eq!(engine.current_player(), Some(Player::One));
        assert_eq!(engine.legal_columns().len(), COLS);
        assert_eq!(engine.board().piece_count(), 0);
    }

    #[test]
    fn test_move_alternates_turns() {
        let mut engine = GameEngine::new_game();
        let accepted = engine.try_move(3).unwrap();
        assert_eq!(accepted.player, Player::One);
        assert_eq!(accepted.row, 0);
        assert_eq!(accepted.outcome, GameResult::InProgress);
        assert_eq!(engine.current_player(), Some(Player::Two));

        let accepted = engine.try_move(3).unwrap();
        assert_eq!(accepted.player, Player::Two);
        assert_eq!(accepted.row, 1);
        assert_eq!(engine.current_player(), Some(Player::One));
    }

    #[test]
    fn test_trajectory_rests_on_stack() {
        let mut engine = GameEngine::new_game();
        engine.try_move(2).unwrap();
        engine.try_move(2).unwrap();
        let accepted = engine.try_move(2).unwrap();
        assert_eq!(accepted.trajectory.rest_height(), 2.0);
        let values: Vec<f64> = accepted.trajectory.collect();
        assert!(values.iter().all(|&v| v >= 2.0));
    }

    #[test]
    fn test_invalid_move_leaves_state() {
        let mut engine = GameEngine::new_game();
        for _ in 0..ROWS {
            engine.try_move(0).unwrap();
        }
        let before = engine.clone();

        assert_eq!(
            engine.try_move(0).unwrap_err(),
            InvalidMove::ColumnFull { column: 0 }
        );
        assert_eq!(
            engine.try_move(COLS).unwrap_err(),
            InvalidMove::OutOfRange { column: COLS }
        );
        assert_eq!(engine.state(), before.state());
        assert_eq!(engine.board(), before.board());
    }

    #[test]
    fn test_horizontal_win_scenario() {
        let mut engine = GameEngine::new_game();
        let outcome = play(&mut engine, &[0, 0, 1, 1, 2, 2, 3]);
        assert_eq!(outcome, GameResult::Win(Player::One));
        assert_eq!(
            engine.state(),
            EngineState::Terminal(GameResult::Win(Player::One))
        );
    }

    #[test]
    fn test_no_moves_while_terminal() {
        let mut engine = GameEngine::new_game();
        play(&mut engine, &[0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(engine.result(), Some(GameResult::Win(Player::One)));
        assert_eq!(engine.try_move(5).unwrap_err(), InvalidMove::GameOver);
        assert!(engine.legal_columns().is_empty());
    }

    #[test]
    fn test_acknowledge_resets_after_win() {
        let mut engine = GameEngine::new_game();
        play(&mut engine, &[6, 5, 6, 5, 6, 5, 6]);
        assert!(engine.is_terminal());

        assert!(engine.acknowledge_terminal());
        assert_eq!(engine.state(), EngineState::AwaitingMove(Player::One));
        assert_eq!(engine.board(), &Board::new());

        // Second acknowledge is a no-op
        assert!(!engine.acknowledge_terminal());
        assert_eq!(engine.state(), EngineState::AwaitingMove(Player::One));
    }

    #[test]
    fn test_acknowledge_ignored_mid_game() {
        let mut engine = GameEngine::new_game();
        engine.try_move(1).unwrap();
        assert!(!engine.acknowledge_terminal());
        assert_eq!(engine.board().piece_count(), 1);
        assert_eq!(engine.current_player(), Some(Player::Two));
    }

    #[test]
    fn test_dispatch_commands() {
        let mut engine = GameEngine::new_game();
        match engine.dispatch(Command::TryMove(4)).unwrap() {
            Response::Moved(accepted) => assert_eq!(accepted.column, 4),
            other => panic!("unexpected response {:?}", other),
        }
        assert!(matches!(
            engine.dispatch(Command::AcknowledgeTerminal).unwrap(),
            Response::Ignored
        ));
        assert!(matches!(
            engine.dispatch(Command::ResetRequested).unwrap(),
            Response::Reset
        ));
        assert_eq!(engine.board().piece_count(), 0);
        assert!(engine.dispatch(Command::TryMove(9)).is_err());
    }

    #[test]
    fn test_with_physics_rejects_invalid_config() {
        let physics = PhysicsConfig {
            time_step: 0.0,
            ..PhysicsConfig::default()
        };
        assert!(GameEngine::with_physics(&physics).is_err());
        assert!(GameEngine::with_physics(&PhysicsConfig::default()).is_ok());
    }
}
