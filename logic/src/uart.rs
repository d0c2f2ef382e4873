//! Asynchronous serial shift registers (8N1) behind a ready/valid byte channel.

use log::warn;

use crate::signal::{Synchronous, Timer};

/// Producer side of a ready/valid byte handshake. A byte moves when `valid`
/// and the consumer's ready are both high on the same tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ByteChannel {
    pub data: u8,
    pub valid: bool,
}

/// Start bit, eight data bits and a stop bit.
const FRAME_BITS: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxLine {
    /// The transmitter can take a byte this tick.
    pub ready: bool,
    /// Serial line level; idles high.
    pub level: bool,
}

/// Shifts accepted bytes out LSB first, `divisor` ticks per bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SerialTx {
    timer: Timer,
    shift: u16,
    bits_left: u8,
}

impl SerialTx {
    pub const fn new(divisor: u32) -> Self {
        Self {
            timer: Timer::new(divisor),
            shift: 0,
            bits_left: 0,
        }
    }

    pub const fn is_idle(&self) -> bool {
        self.bits_left == 0
    }
}

impl Synchronous for SerialTx {
    type Input = ByteChannel;
    type Output = TxLine;

    fn output(&self, _channel: &ByteChannel) -> TxLine {
        TxLine {
            ready: self.is_idle(),
            level: self.is_idle() || self.shift & 1 == 1,
        }
    }

    fn next(&self, channel: &ByteChannel) -> Self {
        if self.is_idle() {
            if channel.valid {
                Self {
                    timer: self.timer.reloaded(),
                    shift: 1 << 9 | u16::from(channel.data) << 1,
                    bits_left: FRAME_BITS,
                }
            } else {
                *self
            }
        } else if self.timer.expired() {
            Self {
                timer: self.timer.reloaded(),
                shift: self.shift >> 1,
                bits_left: self.bits_left - 1,
            }
        } else {
            Self {
                timer: self.timer.countdown(),
                ..*self
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RxPhase {
    Idle,
    Start,
    Data(u8),
    Stop,
}

/// Samples a serial line mid-bit and reassembles bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SerialRx {
    timer: Timer,
    phase: RxPhase,
    shift: u8,
    received: Option<u8>,
    framing_errors: u32,
}

impl SerialRx {
    pub const fn new(divisor: u32) -> Self {
        Self {
            timer: Timer::new(divisor),
            phase: RxPhase::Idle,
            shift: 0,
            received: None,
            framing_errors: 0,
        }
    }

    /// Bytes dropped because their stop bit read low.
    pub const fn framing_errors(&self) -> u32 {
        self.framing_errors
    }
}

impl Synchronous for SerialRx {
    /// Line level.
    type Input = bool;
    /// A byte on the tick after its stop bit was sampled.
    type Output = Option<u8>;

    fn output(&self, _level: &bool) -> Option<u8> {
        self.received
    }

    fn next(&self, level: &bool) -> Self {
        let mut next = Self {
            received: None,
            ..*self
        };
        match self.phase {
            RxPhase::Idle => {
                if !*level {
                    // wait half a bit to sample the start bit in its middle.
                    next.phase = RxPhase::Start;
                    let divisor = self.timer.divisor();
                    next.timer = Timer::starting_at(divisor, (divisor / 2).saturating_sub(1));
                }
            }
            _ if !self.timer.expired() => next.timer = self.timer.countdown(),
            RxPhase::Start => {
                next.timer = self.timer.reloaded();
                next.phase = if *level {
                    // a glitch, not a start bit.
                    RxPhase::Idle
                } else {
                    next.shift = 0;
                    RxPhase::Data(0)
                };
            }
            RxPhase::Data(bit) => {
                next.timer = self.timer.reloaded();
                next.shift = self.shift | u8::from(*level) << bit;
                next.phase = if bit == 7 {
                    RxPhase::Stop
                } else {
                    RxPhase::Data(bit + 1)
                };
            }
            RxPhase::Stop => {
                next.phase = RxPhase::Idle;
                if *level {
                    next.received = Some(self.shift);
                } else {
                    warn!("serial framing error after byte {:#04x}", self.shift);
                    next.framing_errors = self.framing_errors + 1;
                }
            }
        }
        next
    }
}
