//! Grid dimensions and the cell coordinate algorithm.

use std::collections::HashSet;

use serde::Serialize;
use wirekit_core::{LayoutError, Point};

/// Grid dimensions. Both rows and columns are strictly positive.
///
/// A grid is replaced wholesale; its fields cannot be mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Grid {
    rows: u32,
    columns: u32,
}

impl Grid {
    pub fn new(rows: u32, columns: u32) -> Result<Self, LayoutError> {
        if rows == 0 || columns == 0 {
            return Err(LayoutError::InvalidGrid { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cells in the grid.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.columns)
    }

    /// Whether (row, column) lies inside the grid.
    pub fn contains(&self, row: u32, column: u32) -> bool {
        row < self.rows && column < self.columns
    }
}

/// Pixel size of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

/// Requested placement of one entry; `None` leaves that axis to the algorithm.
pub type Slot = (Option<u32>, Option<u32>);

/// Maps logical (row, column) cells to pixel coordinates.
///
/// Stateless: everything it needs is passed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridLayoutAlgorithm;

impl GridLayoutAlgorithm {
    /// Cell size for a container of `width` x `height`.
    pub fn cell_size(grid: Grid, width: f64, height: f64) -> CellSize {
        CellSize {
            width: width / f64::from(grid.columns()),
            height: height / f64::from(grid.rows()),
        }
    }

    /// Pixel origin of cell (row, column).
    pub fn cell_origin(cell: CellSize, row: u32, column: u32) -> Point {
        Point::new(
            f64::from(column) * cell.width,
            f64::from(row) * cell.height,
        )
    }

    /// Final child position: cell origin + frozen initial offset + layout offset.
    pub fn coordinates(
        cell: CellSize,
        (row, column): (u32, u32),
        initial_offset: Point,
        offset: Point,
    ) -> Point {
        Self::cell_origin(cell, row, column)
            .translate(initial_offset)
            .translate(offset)
    }

    /// Resolve the cell of every slot, in slot order.
    ///
    /// Fully assigned slots keep their cell. The others take the first cell
    /// not already taken by an assigned slot or by an earlier auto-placed
    /// slot, scanning rows in ascending order and columns in ascending order
    /// within a row. A slot with only its row (or only its column) fixed
    /// scans along that row (or column). `None` means no cell is left.
    pub fn place(grid: Grid, slots: &[Slot]) -> Vec<Option<(u32, u32)>> {
        let mut occupied: HashSet<(u32, u32)> = slots
            .iter()
            .filter_map(|slot| match *slot {
                (Some(row), Some(column)) if grid.contains(row, column) => Some((row, column)),
                _ => None,
            })
            .collect();

        slots
            .iter()
            .map(|slot| {
                let cell = match *slot {
                    (Some(row), Some(column)) => return Some((row, column)),
                    (Some(row), None) if row < grid.rows() => (0..grid.columns())
                        .map(|column| (row, column))
                        .find(|cell| !occupied.contains(cell)),
                    (None, Some(column)) if column < grid.columns() => (0..grid.rows())
                        .map(|row| (row, column))
                        .find(|cell| !occupied.contains(cell)),
                    (None, None) => Self::first_free(grid, &occupied),
                    _ => None,
                };
                if let Some(cell) = cell {
                    occupied.insert(cell);
                }
                cell
            })
            .collect()
    }

    fn first_free(grid: Grid, occupied: &HashSet<(u32, u32)>) -> Option<(u32, u32)> {
        // At most occupied.len() + 1 cells are inspected.
        (0..grid.cell_count())
            .map(|index| {
                let columns = u64::from(grid.columns());
                ((index / columns) as u32, (index % columns) as u32)
            })
            .find(|cell| !occupied.contains(cell))
    }
}
