//! The evaluation discipline shared by every component.

/// A component that is evaluated once per global tick.
///
/// [`output`](Synchronous::output) is the immediate view: it is a pure
/// function of the current registers and this tick's inputs, and must not
/// depend on anything derived from itself in the same tick.
/// [`next`](Synchronous::next) reads the same snapshot and returns the
/// registers that become visible from the next tick on.
pub trait Synchronous: Sized {
    type Input;
    type Output;

    fn output(&self, input: &Self::Input) -> Self::Output;

    fn next(&self, input: &Self::Input) -> Self;

    /// Evaluates both views from the current snapshot, then commits the next state.
    fn tick(&mut self, input: &Self::Input) -> Self::Output {
        let output = self.output(input);
        *self = self.next(input);
        output
    }
}

/// A reload counter owned by a single component.
///
/// A timer that is reloaded every time it expires expires once every
/// `divisor` ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timer {
    remaining: u32,
    divisor: u32,
}

impl Timer {
    /// A freshly loaded timer: the first expiry is `divisor` ticks away.
    pub const fn new(divisor: u32) -> Self {
        let divisor = if divisor == 0 { 1 } else { divisor };
        Self {
            remaining: divisor - 1,
            divisor,
        }
    }

    /// A timer that reads as expired straight away.
    pub const fn expired_with(divisor: u32) -> Self {
        let divisor = if divisor == 0 { 1 } else { divisor };
        Self {
            remaining: 0,
            divisor,
        }
    }

    /// A timer that expires after `remaining` more ticks, then reloads with `divisor`.
    pub const fn starting_at(divisor: u32, remaining: u32) -> Self {
        let divisor = if divisor == 0 { 1 } else { divisor };
        Self { remaining, divisor }
    }

    pub const fn expired(&self) -> bool {
        self.remaining == 0
    }

    #[cfg(test)]
    pub(crate) const fn remaining(&self) -> u32 {
        self.remaining
    }

    pub const fn divisor(&self) -> u32 {
        self.divisor
    }

    pub const fn countdown(self) -> Self {
        Self {
            remaining: self.remaining.saturating_sub(1),
            ..self
        }
    }

    pub const fn reloaded(self) -> Self {
        Self {
            remaining: self.divisor - 1,
            ..self
        }
    }

    /// Free-running step: reload on expiry, count down otherwise.
    pub const fn advanced(self) -> Self {
        if self.expired() {
            self.reloaded()
        } else {
            self.countdown()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::signal::{Synchronous, Timer};

    #[test]
    fn free_running_period() {
        let mut timer = Timer::new(4);
        let expiries: Vec<bool> = (0..12)
            .map(|_| {
                let expired = timer.expired();
                timer = timer.advanced();
                expired
            })
            .collect();
        assert_eq!(
            expiries,
            [false, false, false, true, false, false, false, true, false, false, false, true]
        );
    }

    #[test]
    fn divisor_of_one_always_expires() {
        let mut timer = Timer::new(1);
        for _ in 0..5 {
            assert!(timer.expired());
            timer = timer.advanced();
        }
        // a zero divisor is treated as one.
        assert_eq!(Timer::new(0), Timer::new(1));
    }

    #[test]
    fn countdown_saturates() {
        let timer = Timer::expired_with(3).countdown();
        assert!(timer.expired());
        assert_eq!(timer.reloaded().remaining(), 2);
        assert_eq!(Timer::starting_at(8, 5).remaining(), 5);
    }

    #[derive(Clone, Copy, Default)]
    struct Counter {
        count: u8,
    }

    impl Synchronous for Counter {
        type Input = bool;
        type Output = u8;

        fn output(&self, _enable: &bool) -> u8 {
            self.count
        }

        fn next(&self, enable: &bool) -> Self {
            Self {
                count: self.count + u8::from(*enable),
            }
        }
    }

    #[test]
    fn registered_values_show_up_one_tick_later() {
        let mut counter = Counter::default();
        assert_eq!(counter.tick(&true), 0);
        assert_eq!(counter.tick(&true), 1);
        assert_eq!(counter.tick(&false), 2);
        assert_eq!(counter.tick(&false), 2);
    }
}
