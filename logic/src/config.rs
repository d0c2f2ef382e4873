//! Build-time timing parameters. All behaviour is defined in ticks; these
//! divisors map ticks to wall-clock rates for a given clock.

use thiserror::Error;

/// Clock of the iCEstick board the game was first built for.
pub const ICESTICK_CLOCK_HZ: u32 = 12_000_000;

pub const PADDLE_MOVES_PER_SECOND: u32 = 10;
pub const BALL_MOVES_PER_SECOND: u32 = 7;
pub const DEBOUNCE_MILLIS: u32 = 50;
pub const BAUD_RATE: u32 = 115_200;

/// Ticks each matrix row stays selected, independent of the clock.
pub const REFRESH_DIVISOR: u32 = 1024;

/// The receiver samples mid-bit, so a bit must last at least two ticks.
pub const MIN_BAUD_DIVISOR: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Ticks per displayed row.
    pub refresh: u32,
    /// Ticks between paddle steps while a button is held.
    pub paddle: u32,
    /// Ticks between horizontal ball steps.
    pub ball_column: u32,
    /// Ticks between vertical ball steps.
    pub ball_row: u32,
    /// Ticks a recognised press suppresses further presses.
    pub debounce: u32,
    /// Ticks per serial bit.
    pub baud: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimingError {
    #[error("the {0} divisor must be at least one tick")]
    ZeroDivisor(&'static str),
    #[error("a baud divisor of {0} is too small, serial bits need at least two ticks")]
    BaudTooFast(u32),
}

impl Timing {
    /// Divisors for a clock running at `clock_hz`.
    pub const fn from_clock(clock_hz: u32) -> Self {
        let ball = clock_hz / BALL_MOVES_PER_SECOND;
        Self {
            refresh: REFRESH_DIVISOR,
            paddle: clock_hz / PADDLE_MOVES_PER_SECOND,
            ball_column: ball,
            ball_row: ball,
            debounce: clock_hz / 1000 * DEBOUNCE_MILLIS,
            baud: clock_hz / BAUD_RATE,
        }
    }

    /// Every divisor set to `ticks`. Mostly useful to make every timer fire
    /// on every tick.
    pub const fn uniform(ticks: u32) -> Self {
        Self {
            refresh: ticks,
            paddle: ticks,
            ball_column: ticks,
            ball_row: ticks,
            debounce: ticks,
            baud: ticks,
        }
    }

    pub fn validate(self) -> Result<Self, TimingError> {
        let divisors = [
            ("refresh", self.refresh),
            ("paddle", self.paddle),
            ("ball column", self.ball_column),
            ("ball row", self.ball_row),
            ("debounce", self.debounce),
            ("baud", self.baud),
        ];
        if let Some((name, _)) = divisors.iter().find(|(_, divisor)| *divisor == 0) {
            return Err(TimingError::ZeroDivisor(name));
        }
        if self.baud < MIN_BAUD_DIVISOR {
            return Err(TimingError::BaudTooFast(self.baud));
        }
        Ok(self)
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::from_clock(ICESTICK_CLOCK_HZ)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Timing, TimingError, ICESTICK_CLOCK_HZ};

    #[test]
    fn icestick_divisors() {
        let timing = Timing::from_clock(ICESTICK_CLOCK_HZ);
        assert_eq!(timing.refresh, 1024);
        assert_eq!(timing.paddle, 1_200_000);
        assert_eq!(timing.ball_column, 1_714_285);
        assert_eq!(timing.ball_row, timing.ball_column);
        assert_eq!(timing.debounce, 600_000);
        assert_eq!(timing.baud, 104);
        assert_eq!(timing.validate(), Ok(timing));
    }

    #[test]
    fn rejects_zero_divisors() {
        let timing = Timing {
            paddle: 0,
            ..Timing::default()
        };
        assert_eq!(timing.validate(), Err(TimingError::ZeroDivisor("paddle")));
        // a 100 kHz clock cannot keep up with 115200 baud.
        assert_eq!(
            Timing::from_clock(100_000).validate(),
            Err(TimingError::ZeroDivisor("baud"))
        );
    }

    #[test]
    fn rejects_single_tick_serial_bits() {
        assert_eq!(
            Timing::uniform(1).validate(),
            Err(TimingError::BaudTooFast(1))
        );
        assert!(Timing::uniform(2).validate().is_ok());
    }
}
