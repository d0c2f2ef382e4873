use crate::{
    signal::{Synchronous, Timer},
    LAST_INDEX,
};

/// Rows covered by a paddle: exactly two adjacent bits, bit `r` for row `r`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaddleMask(u8);

impl PaddleMask {
    /// Centred on rows 3 and 4.
    pub const CENTRED: Self = Self(0b0001_1000);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn covers(self, row: u8) -> bool {
        row <= LAST_INDEX && self.0 >> row & 1 == 1
    }

    /// The lower of the two covered rows.
    #[cfg(test)]
    pub(crate) const fn bottom_row(self) -> u8 {
        self.0.trailing_zeros() as u8
    }

    /// The mask after one step, or unchanged if the step would leave the board.
    pub const fn shifted(self, motion: Motion) -> Self {
        match motion {
            Motion::TowardTop if self.0 & 0b1000_0000 == 0 => Self(self.0 << 1),
            Motion::TowardBottom if self.0 & 0b1 == 0 => Self(self.0 >> 1),
            _ => self,
        }
    }

    #[cfg(test)]
    pub(crate) const fn at_bottom_row(row: u8) -> Self {
        Self(0b11 << row)
    }
}

impl Default for PaddleMask {
    fn default() -> Self {
        Self::CENTRED
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Motion {
    /// Toward row 7.
    TowardTop,
    /// Toward row 0.
    TowardBottom,
}

/// Synchronised button levels of one player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PaddleButtons {
    /// Moves the paddle toward the top.
    pub left: bool,
    /// Moves the paddle toward the bottom.
    pub right: bool,
}

impl PaddleButtons {
    /// The motion the buttons ask for; opposite presses cancel out.
    pub const fn motion(self) -> Option<Motion> {
        match (self.left, self.right) {
            (true, false) => Some(Motion::TowardTop),
            (false, true) => Some(Motion::TowardBottom),
            _ => None,
        }
    }

    pub const fn any(self) -> bool {
        self.left || self.right
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaddleOutput {
    pub mask: PaddleMask,
    /// Present on the one tick the paddle steps.
    pub motion: Option<Motion>,
}

/// Turns held buttons into rate-limited single-row steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paddle {
    mask: PaddleMask,
    timer: Timer,
}

impl Paddle {
    pub const fn new(divisor: u32) -> Self {
        Self {
            mask: PaddleMask::CENTRED,
            timer: Timer::new(divisor),
        }
    }

    pub const fn mask(&self) -> PaddleMask {
        self.mask
    }
}

impl Synchronous for Paddle {
    type Input = PaddleButtons;
    type Output = PaddleOutput;

    fn output(&self, buttons: &PaddleButtons) -> PaddleOutput {
        PaddleOutput {
            mask: self.mask,
            motion: if self.timer.expired() {
                buttons.motion()
            } else {
                None
            },
        }
    }

    fn next(&self, buttons: &PaddleButtons) -> Self {
        let timer = if !self.timer.expired() {
            self.timer.countdown()
        } else if buttons.any() {
            self.timer.reloaded()
        } else {
            // stays expired so the next press moves straight away.
            self.timer
        };
        let mask = match self.output(buttons).motion {
            Some(motion) => self.mask.shifted(motion),
            None => self.mask,
        };
        Self { mask, timer }
    }
}
