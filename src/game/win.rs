//! Win detection for the piece that was just placed.
//!
//! Each axis is scanned as a 7-cell line centered on the play. Cells off the
//! board count as empty, so lines near an edge never wrap or match.

use super::{Board, Player};

/// Pieces in a row needed to win.
pub const WIN_LENGTH: usize = 4;

const REACH: isize = WIN_LENGTH as isize - 1;

/// Axis directions as (row step, col step): vertical, horizontal,
/// diagonal rising to the right, diagonal falling to the right.
pub const AXES: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

/// The 7-cell line through (row, col) along `axis`, center at index 3.
fn line(board: &Board, row: usize, col: usize, player: Player, axis: (isize, isize)) -> [bool; 7] {
    let mut cells = [false; 7];
    for (i, k) in (-REACH..=REACH).enumerate() {
        cells[i] = board.is_owned_by(
            row as isize + k * axis.0,
            col as isize + k * axis.1,
            player,
        );
    }
    cells
}

/// Bounds (inclusive) of the run of `player` cells through the center of the
/// line, or `None` if the center itself is not owned.
fn run_bounds(cells: &[bool; 7]) -> Option<(usize, usize)> {
    let center = REACH as usize;
    if !cells[center] {
        return None;
    }
    let mut lo = center;
    while lo > 0 && cells[lo - 1] {
        lo -= 1;
    }
    let mut hi = center;
    while hi + 1 < cells.len() && cells[hi + 1] {
        hi += 1;
    }
    Some((lo, hi))
}

/// Length of the run through (row, col) along one axis.
pub fn run_length(board: &Board, row: usize, col: usize, player: Player, axis: (isize, isize)) -> usize {
    run_bounds(&line(board, row, col, player, axis)).map_or(0, |(lo, hi)| hi - lo + 1)
}

/// Check whether the piece at (row, col) completes four or more in a row for
/// `player` along any axis.
pub fn check_win(board: &Board, row: usize, col: usize, player: Player) -> bool {
    AXES
        .iter()
        .any(|&axis| run_length(board, row, col, player, axis) >= WIN_LENGTH)
}

/// Cells of every winning run through (row, col), center included once.
/// Empty if the play did not win. Runs are clipped to the 7-cell window.
pub fn winning_cells(board: &Board, row: usize, col: usize, player: Player) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    for &axis in &AXES {
        let Some((lo, hi)) = run_bounds(&line(board, row, col, player, axis)) else {
            continue;
        };
        if hi - lo + 1 < WIN_LENGTH {
            continue;
        }
        for i in lo..=hi {
            let k = i as isize - REACH;
            let cell = (
                (row as isize + k * axis.0) as usize,
                (col as isize + k * axis.1) as usize,
            );
            if !cells.contains(&cell) {
                cells.push(cell);
            }
        }
    }
    cells
}
