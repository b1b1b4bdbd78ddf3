//! Pixel <-> cell mapping for the offset grid
//!
//! Even rows start at the left edge; odd rows are inset by half a cell. Rows
//! are packed tighter than their diameter (pitch = 7/8 d) so bubbles in
//! adjacent rows nest.

use glam::DVec2;

use super::cell::GridPos;
use crate::consts::ROW_PITCH_FACTOR;

/// Translates between continuous scene coordinates and grid cells
pub trait GridGeometry {
    /// Cell containing `point`, or None outside the grid
    fn pixel_to_cell(&self, point: DVec2) -> Option<GridPos>;
    /// Center of the cell at `pos`, or None outside the grid
    fn cell_to_pixel(&self, pos: GridPos) -> Option<DVec2>;
}

/// Concrete brick-wall layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLayout {
    /// Top-left corner of row 0
    pub origin: DVec2,
    /// Bubble diameter (and horizontal cell pitch)
    pub diameter: f64,
    pub rows: usize,
    pub cols_even: usize,
}

impl HexLayout {
    pub fn new(origin: DVec2, diameter: f64, rows: usize, cols_even: usize) -> Self {
        Self {
            origin,
            diameter,
            rows,
            cols_even,
        }
    }

    /// Layout filling `width` with `cols_even` cells from the top-left corner
    pub fn fit_width(width: f64, rows: usize, cols_even: usize) -> Self {
        Self::new(DVec2::ZERO, width / cols_even as f64, rows, cols_even)
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    #[inline]
    pub fn row_pitch(&self) -> f64 {
        self.diameter * ROW_PITCH_FACTOR
    }

    fn cols_in_row(&self, row: usize) -> usize {
        if row % 2 == 0 {
            self.cols_even
        } else {
            self.cols_even.saturating_sub(1)
        }
    }

    fn row_inset(&self, row: usize) -> f64 {
        if row % 2 == 0 { 0.0 } else { self.radius() }
    }
}

impl GridGeometry for HexLayout {
    fn pixel_to_cell(&self, point: DVec2) -> Option<GridPos> {
        let local = point - self.origin;
        if !local.is_finite() || local.y < 0.0 {
            return None;
        }
        let row = (local.y / self.row_pitch()).floor() as usize;
        if row >= self.rows {
            return None;
        }
        let x = local.x - self.row_inset(row);
        if x < 0.0 {
            return None;
        }
        let col = (x / self.diameter).floor() as usize;
        (col < self.cols_in_row(row)).then_some(GridPos::new(row, col))
    }

    fn cell_to_pixel(&self, pos: GridPos) -> Option<DVec2> {
        if pos.row >= self.rows || pos.col >= self.cols_in_row(pos.row) {
            return None;
        }
        let x = self.row_inset(pos.row) + self.diameter * (pos.col as f64 + 0.5);
        let y = self.row_pitch() * pos.row as f64 + self.radius();
        Some(self.origin + DVec2::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> HexLayout {
        HexLayout::fit_width(120.0, 4, 6) // diameter 20
    }

    #[test]
    fn test_cell_centers_round_trip() {
        let l = layout();
        for row in 0..4 {
            let cols = if row % 2 == 0 { 6 } else { 5 };
            for col in 0..cols {
                let pos = GridPos::new(row, col);
                let center = l.cell_to_pixel(pos).unwrap();
                assert_eq!(l.pixel_to_cell(center), Some(pos));
            }
        }
    }

    #[test]
    fn test_odd_rows_are_inset() {
        let l = layout();
        let even = l.cell_to_pixel(GridPos::new(0, 0)).unwrap();
        let odd = l.cell_to_pixel(GridPos::new(1, 0)).unwrap();
        assert!((odd.x - even.x - 10.0).abs() < 1e-9);
        assert!((odd.y - even.y - 17.5).abs() < 1e-9);
    }

    #[test]
    fn test_outside_points_miss() {
        let l = layout();
        assert_eq!(l.pixel_to_cell(DVec2::new(10.0, -1.0)), None);
        // Left gap of an odd row
        assert_eq!(l.pixel_to_cell(DVec2::new(5.0, 20.0)), None);
        // Right gap of an odd row
        assert_eq!(l.pixel_to_cell(DVec2::new(115.0, 20.0)), None);
        // Below the last row
        assert_eq!(l.pixel_to_cell(DVec2::new(10.0, 71.0)), None);
        assert_eq!(l.cell_to_pixel(GridPos::new(1, 5)), None);
        assert_eq!(l.pixel_to_cell(DVec2::new(f64::NAN, 3.0)), None);
    }

    #[test]
    fn test_single_column_odd_rows_are_empty() {
        let l = HexLayout::fit_width(20.0, 2, 1);
        assert!(l.cell_to_pixel(GridPos::new(0, 0)).is_some());
        assert_eq!(l.cell_to_pixel(GridPos::new(1, 0)), None);
        assert_eq!(l.pixel_to_cell(DVec2::new(15.0, 20.0)), None);
    }
}
