//! Ball motion, wall reflection, paddle rebound and scoring.

use log::trace;

use crate::{
    config::Timing,
    paddle::PaddleMask,
    signal::{Synchronous, Timer},
    Side, LAST_INDEX,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Horizontal {
    /// Toward column 0.
    TowardA,
    /// Toward column 7.
    TowardB,
}

impl Horizontal {
    pub const fn flipped(self) -> Self {
        match self {
            Horizontal::TowardA => Horizontal::TowardB,
            Horizontal::TowardB => Horizontal::TowardA,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vertical {
    /// Toward row 7.
    Up,
    /// Toward row 0.
    Down,
}

/// Paddle occupancy as seen by the ball this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Paddles {
    pub a: PaddleMask,
    pub b: PaddleMask,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BallInput {
    pub paddles: Paddles,
    /// Held direction buttons of the paddle on the ball's half.
    pub up: bool,
    pub down: bool,
    /// Re-serve request from the composer.
    pub reset: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BallOutput {
    pub column: u8,
    pub row: u8,
    /// The ball bounces off a paddle on this tick.
    pub rebound: bool,
    /// The ball got past this side's paddle on this tick.
    pub scored_against: Option<Side>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ball {
    column: u8,
    row: u8,
    horizontal: Horizontal,
    vertical: Vertical,
    moving: bool,
    reset_pending: bool,
    column_timer: Timer,
    row_timer: Timer,
}

impl Ball {
    /// Waiting for player A's serve from column 1, mid-height.
    pub const fn new(timing: &Timing) -> Self {
        Self {
            column: 1,
            row: 3,
            horizontal: Horizontal::TowardB,
            vertical: Vertical::Down,
            moving: false,
            reset_pending: false,
            column_timer: Timer::new(timing.ball_column),
            row_timer: Timer::new(timing.ball_row),
        }
    }

    pub const fn column(&self) -> u8 {
        self.column
    }

    pub const fn row(&self) -> u8 {
        self.row
    }

    pub const fn horizontal(&self) -> Horizontal {
        self.horizontal
    }

    pub const fn vertical(&self) -> Vertical {
        self.vertical
    }

    pub const fn is_moving(&self) -> bool {
        self.moving
    }

    pub const fn is_reset_pending(&self) -> bool {
        self.reset_pending
    }

    /// The half of the field the ball is on.
    pub const fn side(&self) -> Side {
        Side::of_column(self.column)
    }

    /// The immediate outputs. Unlike [`Synchronous::next`] these never depend
    /// on the reset request or the aim buttons, so the composer can derive the
    /// reset request from them within the same tick.
    pub fn observe(&self, paddles: Paddles) -> BallOutput {
        let stepping = self.moving && !self.reset_pending && self.column_timer.expired();
        let contact = self.touches(paddles);
        let scored_against = match self.column {
            _ if !stepping || contact => None,
            0 => Some(Side::A),
            LAST_INDEX => Some(Side::B),
            _ => None,
        };
        BallOutput {
            column: self.column,
            row: self.row,
            rebound: stepping && contact,
            scored_against,
        }
    }

    /// The ball sits next to a paddle that covers its row and is heading into it.
    fn touches(&self, paddles: Paddles) -> bool {
        match self.horizontal {
            Horizontal::TowardA => self.column == 1 && paddles.a.covers(self.row),
            Horizontal::TowardB => self.column == LAST_INDEX - 1 && paddles.b.covers(self.row),
        }
    }

    fn at_edge_column(&self) -> bool {
        self.column == 0 || self.column == LAST_INDEX
    }

    #[cfg(test)]
    pub(crate) const fn placed(
        self,
        column: u8,
        row: u8,
        horizontal: Horizontal,
        vertical: Vertical,
    ) -> Self {
        Self {
            column,
            row,
            horizontal,
            vertical,
            ..self
        }
    }

    #[cfg(test)]
    pub(crate) const fn in_play(self) -> Self {
        Self {
            moving: true,
            ..self
        }
    }
}

/// Exactly one of the two buttons held.
const fn aimed(up: bool, down: bool) -> Option<Vertical> {
    match (up, down) {
        (true, false) => Some(Vertical::Up),
        (false, true) => Some(Vertical::Down),
        _ => None,
    }
}

/// One vertical step, reflecting off the top and bottom rows.
const fn stepped_row(row: u8, vertical: Vertical) -> (u8, Vertical) {
    match vertical {
        Vertical::Up if row >= LAST_INDEX => (LAST_INDEX - 1, Vertical::Down),
        Vertical::Up => (row + 1, Vertical::Up),
        Vertical::Down if row == 0 => (1, Vertical::Up),
        Vertical::Down => (row - 1, Vertical::Down),
    }
}

impl Synchronous for Ball {
    type Input = BallInput;
    type Output = BallOutput;

    fn output(&self, input: &BallInput) -> BallOutput {
        self.observe(input.paddles)
    }

    fn next(&self, input: &BallInput) -> Self {
        let output = self.observe(input.paddles);
        let aim = aimed(input.up, input.down);
        let mut next = Self {
            column_timer: self.column_timer.advanced(),
            row_timer: self.row_timer.advanced(),
            ..*self
        };

        if self.moving {
            if output.rebound {
                trace!("ball rebounds at column {} row {}", self.column, self.row);
                next.horizontal = self.horizontal.flipped();
            } else if output.scored_against.is_some() {
                next.reset_pending = true;
            } else if self.column_timer.expired() && !self.reset_pending && !self.at_edge_column()
            {
                next.column = match self.horizontal {
                    Horizontal::TowardA => self.column - 1,
                    Horizontal::TowardB => self.column + 1,
                };
            }

            if self.row_timer.expired() {
                (next.row, next.vertical) = stepped_row(self.row, self.vertical);
            }

            if self.at_edge_column() {
                if let Some(vertical) = aim {
                    next.vertical = vertical;
                }
            }
        } else if input.up && input.down {
            next.moving = true;
        } else if self.row_timer.expired() {
            // lining up the serve.
            match aim {
                Some(Vertical::Up) => next.row = (self.row + 1).min(LAST_INDEX),
                Some(Vertical::Down) => next.row = self.row.saturating_sub(1),
                None => {}
            }
        }

        if input.reset {
            (next.column, next.horizontal) = match self.side() {
                Side::A => (1, Horizontal::TowardB),
                Side::B => (LAST_INDEX - 1, Horizontal::TowardA),
            };
            next.moving = false;
            next.reset_pending = false;
        }
        next
    }
}
