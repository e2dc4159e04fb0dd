use crate::game::COLS;

/// Terminal columns taken by one board cell.
pub const CELL_WIDTH: u16 = 3;

/// Horizontal pointer position over the board, in column units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    x: f64,
}

impl Pointer {
    /// Pointer resting over the center of `column`
    pub fn at_column(column: usize) -> Self {
        Pointer {
            x: column.min(COLS - 1) as f64 + 0.5,
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    /// Column under the pointer
    pub fn column(&self) -> usize {
        (self.x.max(0.0) as usize).min(COLS - 1)
    }

    /// Follow the mouse. `inner_x` is the screen column of the board's first
    /// cell. Positions left or right of the board pin to the edge columns.
    pub fn track(&mut self, screen_x: u16, inner_x: u16) {
        let offset = screen_x as f64 - inner_x as f64 + 0.5;
        let max = COLS as f64 - 0.5 / CELL_WIDTH as f64;
        self.x = (offset / CELL_WIDTH as f64).clamp(0.0, max);
    }

    pub fn move_left(&mut self) {
        *self = Pointer::at_column(self.column().saturating_sub(1));
    }

    pub fn move_right(&mut self) {
        *self = Pointer::at_column(self.column() + 1);
    }
}

impl Default for Pointer {
    fn default() -> Self {
        Pointer::at_column(COLS / 2)
    }
}
