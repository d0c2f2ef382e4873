use logic::{display::PixelBuffer, MATRIX_SIZE};

const ROWS: usize = MATRIX_SIZE as usize;

/// Reconstructs the picture a viewer sees from the scanned row and column
/// lines.
///
/// A pixel counts as lit when its column was driven for at least half of the
/// ticks its row was selected. Rows that were not selected at all since the
/// last frame keep what they showed before.
#[derive(Default)]
pub struct Panel {
    shown: [u8; ROWS],
    selected: [u32; ROWS],
    lit: [[u32; ROWS]; ROWS],
}

impl Panel {
    pub fn sample(&mut self, row_select: u8, column_drive: u8) {
        for row in (0..ROWS).filter(|row| row_select >> row & 1 == 1) {
            self.selected[row] += 1;
            for column in (0..ROWS).filter(|column| column_drive >> column & 1 == 1) {
                self.lit[row][column] += 1;
            }
        }
    }

    /// Ends the current frame and returns the picture.
    pub fn frame(&mut self) -> PixelBuffer {
        for row in 0..ROWS {
            let selected = self.selected[row];
            if selected > 0 {
                self.shown[row] = (0..ROWS)
                    .filter(|&column| self.lit[row][column] * 2 >= selected)
                    .fold(0, |bits, column| bits | 1 << column);
            }
        }
        self.selected = Default::default();
        self.lit = Default::default();

        let mut pixels = PixelBuffer::default();
        for (row, bits) in (0..MATRIX_SIZE).zip(self.shown) {
            for column in (0..MATRIX_SIZE).filter(|column| bits >> column & 1 == 1) {
                pixels.cell(column, row).light();
            }
        }
        pixels
    }
}
