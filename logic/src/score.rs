//! Score counters and the transmitter that reports them over the serial channel.

use std::fmt::Display;

use crate::{signal::Synchronous, uart::ByteChannel, Side};

/// A single decimal digit. Incrementing past nine wraps to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    pub const ZERO: Self = Self(0);
    pub const MAX: u8 = 9;

    pub const fn new(value: u8) -> Option<Self> {
        if value <= Self::MAX {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    pub const fn incremented(self) -> Self {
        if self.0 >= Self::MAX {
            Self::ZERO
        } else {
            Self(self.0 + 1)
        }
    }

    pub const fn ascii(self) -> u8 {
        b'0' + self.0
    }

    pub fn from_ascii(byte: u8) -> Option<Self> {
        byte.checked_sub(b'0').and_then(Self::new)
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Scores {
    pub a: Score,
    pub b: Score,
}

impl Scores {
    #[cfg(test)]
    pub(crate) const fn get(&self, side: Side) -> Score {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    /// The scores after `side` wins a point.
    pub const fn credited(self, side: Side) -> Self {
        match side {
            Side::A => Self {
                a: self.a.incremented(),
                ..self
            },
            Side::B => Self {
                b: self.b.incremented(),
                ..self
            },
        }
    }
}

/// Where the transmitter is in a `"<a>-<b>\r\n"` report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TxState {
    #[default]
    Idle,
    FirstDigit,
    Separator,
    SecondDigit,
    CarriageReturn,
    LineFeed,
}

/// Successor of each state once its byte has been accepted, indexed by state.
const TRANSITIONS: [TxState; 6] = [
    TxState::FirstDigit,
    TxState::Separator,
    TxState::SecondDigit,
    TxState::CarriageReturn,
    TxState::LineFeed,
    TxState::Idle,
];

impl TxState {
    pub const fn successor(self) -> Self {
        TRANSITIONS[self as usize]
    }

    /// The byte this state puts on the channel.
    pub const fn byte(self, scores: Scores) -> Option<u8> {
        match self {
            TxState::Idle => None,
            TxState::FirstDigit => Some(scores.a.ascii()),
            TxState::Separator => Some(b'-'),
            TxState::SecondDigit => Some(scores.b.ascii()),
            TxState::CarriageReturn => Some(b'\r'),
            TxState::LineFeed => Some(b'\n'),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransmitterInput {
    /// One-tick request to report the scores.
    pub update: bool,
    pub scores: Scores,
    /// The channel accepts the offered byte this tick.
    pub ready: bool,
}

/// Sends a report over a ready/valid byte channel whenever it is asked to.
///
/// Scores are latched when a report starts, so later changes cannot tear a
/// report that is already on the wire. An update that arrives mid-report is
/// remembered and answered with a fresh report once the current one is done.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreTransmitter {
    state: TxState,
    latched: Scores,
    pending: bool,
}

impl ScoreTransmitter {
    pub const fn state(&self) -> TxState {
        self.state
    }

    #[cfg(test)]
    pub(crate) const fn is_pending(&self) -> bool {
        self.pending
    }
}

impl Synchronous for ScoreTransmitter {
    type Input = TransmitterInput;
    type Output = ByteChannel;

    fn output(&self, _input: &TransmitterInput) -> ByteChannel {
        match self.state.byte(self.latched) {
            Some(data) => ByteChannel { data, valid: true },
            None => ByteChannel::default(),
        }
    }

    fn next(&self, input: &TransmitterInput) -> Self {
        match self.state {
            TxState::Idle if input.update || self.pending => Self {
                state: TxState::FirstDigit,
                latched: input.scores,
                pending: false,
            },
            TxState::Idle => *self,
            state => Self {
                state: if input.ready { state.successor() } else { state },
                pending: self.pending || input.update,
                ..*self
            },
        }
    }
}
