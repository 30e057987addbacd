//! Text helpers for the terminal front end: coordinates, grids and clocks.

use std::fmt::Write;

use crate::common::Coordinate;
use crate::grid::Grid;

/// Column letter plus 1-based row, e.g. `B3` for (1, 2).
pub fn coord_to_string(cell: Coordinate) -> String {
    let col = (b'A' + cell.col as u8) as char;
    format!("{}{}", col, cell.row + 1)
}

/// Parse `B3`-style input. Bounds are checked by the caller.
pub fn parse_coord(input: &str) -> Option<Coordinate> {
    let input = input.trim();
    let mut chars = input.chars();
    let col_ch = chars.next()?.to_ascii_uppercase();
    if !col_ch.is_ascii_uppercase() {
        return None;
    }
    let col = (col_ch as u8 - b'A') as usize;
    let row: usize = chars.as_str().parse().ok()?;
    if row == 0 {
        return None;
    }
    Some(Coordinate::new(col, row - 1))
}

/// Render a grid. `X` hit ship, `o` miss, `S` intact ship when `reveal` is
/// set, `.` otherwise.
pub fn render_grid(grid: &Grid, reveal: bool) -> String {
    let n = grid.size();
    let mut out = String::from("   ");
    for c in 0..n {
        let _ = write!(out, " {}", (b'A' + c as u8) as char);
    }
    out.push('\n');
    for r in 0..n {
        let _ = write!(out, "{:2} ", r + 1);
        for c in 0..n {
            let ch = match grid.cell(c, r) {
                Ok(cell) if cell.is_hit() && cell.is_ship() => 'X',
                Ok(cell) if cell.is_hit() => 'o',
                Ok(cell) if reveal && cell.is_ship() => 'S',
                _ => '.',
            };
            let _ = write!(out, " {}", ch);
        }
        out.push('\n');
    }
    out
}

/// `HH:MM:SS`.
pub fn format_clock(seconds: u64) -> String {
    let s = seconds % 60;
    let m = (seconds / 60) % 60;
    let h = seconds / 3600;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Attempts padded to two digits.
pub fn format_attempts(attempts: u32) -> String {
    format!("{:02}", attempts)
}
