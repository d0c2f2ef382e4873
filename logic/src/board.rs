//! The game as it sits on the board: the composer plus the serial
//! transmitter driving the TX pin.

use crate::{
    config::{Timing, TimingError},
    display::PixelBuffer,
    pong::{Buttons, Pong, PongInput},
    score::Scores,
    signal::Synchronous,
    uart::SerialTx,
};

/// Everything visible at the pins, plus what a simulator wants to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardOutput {
    /// One-hot; bit `r` selects row `r`.
    pub row_select: u8,
    /// Bit `c` lights column `c` of the selected row.
    pub column_drive: u8,
    /// Serial line level.
    pub tx: bool,
    pub pixels: PixelBuffer,
    pub scores: Scores,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
    pong: Pong,
    uart: SerialTx,
}

impl Board {
    pub fn new(timing: Timing) -> Result<Self, TimingError> {
        let timing = timing.validate()?;
        Ok(Self {
            pong: Pong::new(&timing),
            uart: SerialTx::new(timing.baud),
        })
    }

    pub const fn pong(&self) -> &Pong {
        &self.pong
    }

    /// The transmitter's ready only depends on its own registers.
    fn pong_input(&self, buttons: &Buttons) -> PongInput {
        PongInput {
            buttons: *buttons,
            serial_ready: self.uart.output(&Default::default()).ready,
        }
    }
}

impl Synchronous for Board {
    type Input = Buttons;
    type Output = BoardOutput;

    fn output(&self, buttons: &Buttons) -> BoardOutput {
        let line = self.uart.output(&Default::default());
        let pong = self.pong.output(&self.pong_input(buttons));
        BoardOutput {
            row_select: pong.scan.row_select,
            column_drive: pong.scan.column_drive,
            tx: line.level,
            pixels: pong.pixels,
            scores: pong.scores,
        }
    }

    fn next(&self, buttons: &Buttons) -> Self {
        let input = self.pong_input(buttons);
        let serial = self.pong.output(&input).serial;
        Self {
            pong: self.pong.next(&input),
            uart: self.uart.next(&serial),
        }
    }

    fn tick(&mut self, buttons: &Buttons) -> BoardOutput {
        let line = self.uart.output(&Default::default());
        let pong = self.pong.tick(&self.pong_input(buttons));
        self.uart.tick(&pong.serial);
        BoardOutput {
            row_select: pong.scan.row_select,
            column_drive: pong.scan.column_drive,
            tx: line.level,
            pixels: pong.pixels,
            scores: pong.scores,
        }
    }
}
