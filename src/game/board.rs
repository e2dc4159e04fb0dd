use super::Player;
use crate::error::InvalidMove;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

type Grid = [[bool; COLS]; ROWS];

/// Board state: one occupancy grid per player plus per-column fill counts.
///
/// Row 0 is the bottom row. Pieces only ever stack from the bottom, so a
/// column's count is also the row index of its next free cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    occupancy: [Grid; 2],
    counts: [usize; COLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            occupancy: [[[false; COLS]; ROWS]; 2],
            counts: [0; COLS],
        }
    }

    /// Owner of the cell at (row, col), if any
    pub fn get(&self, row: usize, col: usize) -> Option<Player> {
        if row >= ROWS || col >= COLS {
            return None;
        }
        [Player::One, Player::Two]
            .into_iter()
            .find(|p| self.occupancy[p.index()][row][col])
    }

    /// Whether `player` owns the cell at (row, col). Positions off the board
    /// are never owned.
    pub fn is_owned_by(&self, row: isize, col: isize, player: Player) -> bool {
        if row < 0 || col < 0 || row >= ROWS as isize || col >= COLS as isize {
            return false;
        }
        self.occupancy[player.index()][row as usize][col as usize]
    }

    /// Number of pieces stacked in a column (0 for columns off the board)
    pub fn column_count(&self, col: usize) -> usize {
        self.counts.get(col).copied().unwrap_or(0)
    }

    pub fn column_counts(&self) -> [usize; COLS] {
        self.counts
    }

    /// Total pieces on the board
    pub fn piece_count(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Check whether a piece can be dropped into a column
    pub fn can_drop(&self, col: usize) -> bool {
        col < COLS && self.counts[col] < ROWS
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn drop_piece(&mut self, col: usize, player: Player) -> Result<usize, InvalidMove> {
        if col >= COLS {
            return Err(InvalidMove::OutOfRange { column: col });
        }
        if !self.can_drop(col) {
            return Err(InvalidMove::ColumnFull { column: col });
        }

        let row = self.counts[col];
        self.occupancy[player.index()][row][col] = true;
        self.counts[col] += 1;
        Ok(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.counts.iter().all(|&n| n == ROWS)
    }

    /// Clear both grids and all column counts
    pub fn reset(&mut self) {
        *self = Board::new();
    }

    /// Every occupied cell as `(row, col, player)`, bottom row first
    pub fn pieces(&self) -> Vec<(usize, usize, Player)> {
        let mut pieces = Vec::with_capacity(self.piece_count());
        for row in 0..ROWS {
            for col in 0..COLS {
                if let Some(player) = self.get(row, col) {
                    pieces.push((row, col, player));
                }
            }
        }
        pieces
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), None);
            }
        }
        assert_eq!(board.piece_count(), 0);
        assert!(board.pieces().is_empty());
    }

    #[test]
    fn test_drop_piece() {
        let mut board = Board::new();

        let row = board.drop_piece(3, Player::One).unwrap();
        assert_eq!(row, 0); // Bottom row
        assert_eq!(board.get(0, 3), Some(Player::One));

        let row = board.drop_piece(3, Player::Two).unwrap();
        assert_eq!(row, 1); // Stacks on the first piece
        assert_eq!(board.get(1, 3), Some(Player::Two));
        assert_eq!(board.column_count(3), 2);
    }

    #[test]
    fn test_column_full() {
        let mut board = Board::new();
        for _ in 0..ROWS {
            assert!(board.can_drop(0));
            board.drop_piece(0, Player::One).unwrap();
        }

        assert!(!board.can_drop(0));
        assert_eq!(
            board.drop_piece(0, Player::Two),
            Err(InvalidMove::ColumnFull { column: 0 })
        );
        assert_eq!(board.column_count(0), ROWS);
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert!(!board.can_drop(7));
        assert_eq!(
            board.drop_piece(7, Player::One),
            Err(InvalidMove::OutOfRange { column: 7 })
        );
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_full_board_and_reset() {
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.drop_piece(col, Player::Two).unwrap();
            }
        }
        assert!(board.is_full());
        assert_eq!(board.piece_count(), ROWS * COLS);

        board.reset();
        assert_eq!(board, Board::new());
        assert!(!board.is_full());
    }

    #[test]
    fn test_grids_stay_disjoint() {
        let mut board = Board::new();
        board.drop_piece(2, Player::One).unwrap();
        board.drop_piece(2, Player::Two).unwrap();
        assert!(board.is_owned_by(0, 2, Player::One));
        assert!(!board.is_owned_by(0, 2, Player::Two));
        assert!(board.is_owned_by(1, 2, Player::Two));
        assert!(!board.is_owned_by(1, 2, Player::One));
    }

    #[test]
    fn test_off_board_is_never_owned() {
        let mut board = Board::new();
        board.drop_piece(0, Player::One).unwrap();
        assert!(!board.is_owned_by(-1, 0, Player::One));
        assert!(!board.is_owned_by(0, -1, Player::One));
        assert!(!board.is_owned_by(ROWS as isize, 0, Player::One));
        assert!(!board.is_owned_by(0, COLS as isize, Player::One));
    }

    #[test]
    fn test_pieces_bottom_up() {
        let mut board = Board::new();
        board.drop_piece(4, Player::One).unwrap();
        board.drop_piece(4, Player::Two).unwrap();
        board.drop_piece(1, Player::One).unwrap();
        assert_eq!(
            board.pieces(),
            vec![
                (0, 1, Player::One),
                (0, 4, Player::One),
                (1, 4, Player::Two)
            ]
        );
    }
}
