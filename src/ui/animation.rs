//! Frame-by-frame playback of drop trajectories.
//!
//! Trajectories are sampled at a fixed stride so the animation speed does not
//! depend on the physics time step.

use std::iter::StepBy;

use crate::game::{GameResult, MoveAccepted, Player};
use crate::physics::{simulate_mass_fall, FallModel, MassFall, Trajectory};

/// Animation pacing, loadable from the `[render]` TOML section.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Trajectory samples advanced per frame
    pub frame_stride: usize,
    /// Delay between frames
    pub frame_interval_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            frame_stride: 2,
            frame_interval_ms: 16,
        }
    }
}

/// Position of a piece in board units: `x` in columns (column `c` spans
/// `c..c + 1`), `height` in rows above the board bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceFrame {
    pub x: f64,
    pub height: f64,
}

/// One piece falling into its column.
#[derive(Debug)]
pub struct DropAnimation {
    frames: StepBy<Trajectory>,
    release_x: f64,
    board_top: f64,
    clamped: bool,
    current: Option<PieceFrame>,
    pub player: Player,
    pub column: usize,
    pub row: usize,
    pub outcome: GameResult,
}

impl DropAnimation {
    /// Start animating an accepted move released at horizontal position
    /// `release_x`.
    pub fn new(accepted: MoveAccepted, release_x: f64, board_top: f64, stride: usize) -> Self {
        let MoveAccepted {
            player,
            column,
            row,
            trajectory,
            outcome,
        } = accepted;
        let mut animation = DropAnimation {
            frames: trajectory.step_by(stride.max(1)),
            release_x,
            board_top,
            clamped: false,
            current: None,
            player,
            column,
            row,
            outcome,
        };
        animation.advance();
        animation
    }

    /// Move to the next frame. Returns false once the trajectory is used up.
    pub fn advance(&mut self) -> bool {
        let Some(height) = self.frames.next() else {
            self.current = None;
            return false;
        };
        // The piece keeps its release position until it enters the board,
        // then snaps into the target column.
        if height <= self.board_top {
            self.clamped = true;
        }
        let x = if self.clamped {
            self.column as f64 + 0.5
        } else {
            self.release_x
        };
        self.current = Some(PieceFrame { x, height });
        true
    }

    pub fn current(&self) -> Option<PieceFrame> {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.current.is_none()
    }
}

/// Every piece of a finished game dropping out through the board bottom.
#[derive(Debug)]
pub struct ClearAnimation {
    pieces: Vec<(usize, Player)>,
    frames: StepBy<MassFall>,
    current: Vec<Option<f64>>,
    floor_gap: f64,
}

impl ClearAnimation {
    /// `pieces` as returned by [`crate::game::Board::pieces`].
    pub fn new(pieces: Vec<(usize, usize, Player)>, model: &FallModel, stride: usize) -> Self {
        let rows: Vec<usize> = pieces.iter().map(|&(row, _, _)| row).collect();
        let mut animation = ClearAnimation {
            pieces: pieces.into_iter().map(|(_, col, p)| (col, p)).collect(),
            frames: simulate_mass_fall(rows, model).step_by(stride.max(1)),
            current: Vec::new(),
            floor_gap: model.config().clear_floor_gap,
        };
        animation.advance();
        animation
    }

    /// Move to the next frame. Returns false once every piece has settled.
    pub fn advance(&mut self) -> bool {
        match self.frames.next() {
            Some(frame) => {
                self.current = frame;
                true
            }
            None => {
                self.current.clear();
                false
            }
        }
    }

    /// Pieces still moving as `(column, player, height)`, heights relative
    /// to the board bottom (negative below it).
    pub fn pieces(&self) -> impl Iterator<Item = (usize, Player, f64)> + '_ {
        self.pieces
            .iter()
            .zip(&self.current)
            .filter_map(|(&(col, player), height)| {
                height.map(|h| (col, player, h - self.floor_gap))
            })
    }

    pub fn is_finished(&self) -> bool {
        self.current.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameEngine, ROWS};

    fn drop_in(engine: &mut GameEngine, column: usize, release_x: f64, stride: usize) -> DropAnimation {
        let accepted = engine.try_move(column).unwrap();
        DropAnimation::new(accepted, release_x, ROWS as f64, stride)
    }

    #[test]
    fn test_stays_at_release_x_above_board() {
        let mut engine = GameEngine::new_game();
        let mut animation = drop_in(&mut engine, 4, 4.2, 1);

        let mut seen_above = false;
        while let Some(frame) = animation.current() {
            if frame.height > ROWS as f64 && !seen_above {
                assert_eq!(frame.x, 4.2);
                seen_above = true;
            }
            if frame.height <= ROWS as f64 {
                break;
            }
            animation.advance();
        }
        assert!(seen_above);
    }

    #[test]
    fn test_clamps_to_column_inside_board() {
        let mut engine = GameEngine::new_game();
        let mut animation = drop_in(&mut engine, 2, 2.9, 1);

        let mut clamped = false;
        while let Some(frame) = animation.current() {
            if frame.height <= ROWS as f64 {
                clamped = true;
            }
            if clamped {
                assert_eq!(frame.x, 2.5);
            }
            animation.advance();
        }
        assert!(clamped);
        assert!(animation.is_finished());
    }

    #[test]
    fn test_stride_skips_samples() {
        let mut engine = GameEngine::new_game();
        let total = engine.physics().drop_trajectory(0).count();

        let mut animation = drop_in(&mut engine, 0, 0.5, 3);
        let mut frames = 1;
        while animation.advance() {
            frames += 1;
        }
        assert_eq!(frames, total.div_ceil(3));
    }

    #[test]
    fn test_keeps_move_details() {
        let mut engine = GameEngine::new_game();
        engine.try_move(5).unwrap();
        let animation = drop_in(&mut engine, 5, 5.5, 2);
        assert_eq!(animation.player, Player::Two);
        assert_eq!(animation.row, 1);
        assert_eq!(animation.column, 5);
        assert_eq!(animation.outcome, GameResult::InProgress);
    }

    #[test]
    fn test_clear_animation_drops_every_piece_below_board() {
        let mut engine = GameEngine::new_game();
        for col in [0, 0, 1, 3, 3, 3] {
            engine.try_move(col).unwrap();
        }
        let pieces = engine.board().pieces();
        let count = pieces.len();
        let mut animation = ClearAnimation::new(pieces, engine.physics(), 2);

        assert_eq!(animation.pieces().count(), count);
        let mut last_heights: Vec<f64>;
        loop {
            last_heights = animation.pieces().map(|(_, _, h)| h).collect();
            if !animation.advance() {
                break;
            }
        }
        assert!(animation.is_finished());
        assert_eq!(animation.pieces().count(), 0);
        assert!(last_heights.iter().all(|&h| h < 0.0));
    }
}
