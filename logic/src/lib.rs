//! Tick-accurate model of a two-player Pong played on an 8×8 LED matrix.
//!
//! Every component is a plain value holding its registers. Once per tick the
//! composer evaluates the immediate outputs of all components from one
//! snapshot, then commits every component's next state together (see
//! [`signal::Synchronous`]).

pub mod ball;
pub mod board;
pub mod config;
pub mod display;
pub mod input;
pub mod paddle;
pub mod pong;
pub mod report;
pub mod score;
pub mod signal;
pub mod uart;

/// Rows and columns of the LED matrix.
pub const MATRIX_SIZE: u8 = 8;

/// Highest row or column index on the matrix.
pub const LAST_INDEX: u8 = MATRIX_SIZE - 1;

/// One of the two players. Player A defends column 0, player B column 7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// The column the side's paddle occupies.
    pub const fn paddle_column(self) -> u8 {
        match self {
            Side::A => 0,
            Side::B => LAST_INDEX,
        }
    }

    /// The half of the field a column belongs to, taken from the column's high bit.
    pub const fn of_column(column: u8) -> Self {
        if column & 0b100 == 0 {
            Side::A
        } else {
            Side::B
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Side;

    #[test]
    fn column_halves() {
        for column in 0..4 {
            assert_eq!(Side::of_column(column), Side::A);
        }
        for column in 4..8 {
            assert_eq!(Side::of_column(column), Side::B);
        }
    }

    #[test]
    fn opponents() {
        assert_eq!(Side::A.opponent(), Side::B);
        assert_eq!(Side::B.opponent(), Side::A);
        assert_eq!(Side::A.paddle_column(), 0);
        assert_eq!(Side::B.paddle_column(), 7);
    }
}
