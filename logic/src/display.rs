//! The pixel buffer and the row scanner that multiplexes it onto the matrix.

use crate::{
    signal::{Synchronous, Timer},
    LAST_INDEX, MATRIX_SIZE,
};

const SIZE: usize = MATRIX_SIZE as usize;

/// 8×8 cells indexed `[column][row]`.
///
/// The buffer is composed from scratch every tick. Writers only get access to
/// the region they own: a whole column for a paddle, a single cell for the ball.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    cells: [[bool; SIZE]; SIZE],
}

impl PixelBuffer {
    pub fn get(&self, column: u8, row: u8) -> bool {
        self.cells[usize::from(column)][usize::from(row)]
    }

    pub fn column(&mut self, column: u8) -> ColumnWriter<'_> {
        ColumnWriter(&mut self.cells[usize::from(column)])
    }

    pub fn cell(&mut self, column: u8, row: u8) -> CellWriter<'_> {
        CellWriter(&mut self.cells[usize::from(column)][usize::from(row)])
    }

    /// The cells of `row` packed as a column-drive word, bit `c` for column `c`.
    pub fn row_bits(&self, row: u8) -> u8 {
        let row = usize::from(row);
        self.cells
            .iter()
            .enumerate()
            .fold(0, |bits, (column, cells)| {
                bits | (u8::from(cells[row]) << column)
            })
    }

    pub fn lit_count(&self) -> usize {
        self.cells.iter().flatten().filter(|lit| **lit).count()
    }
}

/// Write access to one whole column.
pub struct ColumnWriter<'a>(&'a mut [bool; SIZE]);

impl ColumnWriter<'_> {
    /// Lights row `r` when bit `r` of `mask` is set, clears it otherwise.
    pub fn fill_from(self, mask: u8) {
        for (row, cell) in self.0.iter_mut().enumerate() {
            *cell = mask >> row & 1 == 1;
        }
    }
}

/// Write access to a single cell. The only thing a cell writer can do is turn it on.
pub struct CellWriter<'a>(&'a mut bool);

impl CellWriter<'_> {
    pub fn light(self) {
        *self.0 = true;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanLines {
    /// One-hot row selection.
    pub row_select: u8,
    /// Column levels for the selected row.
    pub column_drive: u8,
}

/// Cycles through the rows, one every `refresh` ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scanner {
    timer: Timer,
    row: u8,
    row_select: u8,
}

impl Scanner {
    pub const fn new(refresh: u32) -> Self {
        Self {
            timer: Timer::new(refresh),
            row: 0,
            row_select: 0b1,
        }
    }

    pub const fn row(&self) -> u8 {
        self.row
    }
}

impl Synchronous for Scanner {
    type Input = PixelBuffer;
    type Output = ScanLines;

    fn output(&self, pixels: &PixelBuffer) -> ScanLines {
        ScanLines {
            row_select: self.row_select,
            column_drive: pixels.row_bits(self.row),
        }
    }

    fn next(&self, _pixels: &PixelBuffer) -> Self {
        if self.timer.expired() {
            Self {
                timer: self.timer.reloaded(),
                row: (self.row + 1) & LAST_INDEX,
                row_select: self.row_select.rotate_left(1),
            }
        } else {
            Self {
                timer: self.timer.countdown(),
                ..*self
            }
        }
    }
}
