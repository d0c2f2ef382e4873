//! Conditioning of raw button levels: synchronisation into the clock domain
//! and debounced press edges.
//!
//! Buttons are active-low at the pins; levels arriving here are already
//! normalised so that `true` means pressed.

use crate::signal::{Synchronous, Timer};

/// Two-stage shift register. The output is the level sampled two ticks earlier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Synchronizer {
    stages: [bool; 2],
}

impl Synchronous for Synchronizer {
    type Input = bool;
    type Output = bool;

    fn output(&self, _raw: &bool) -> bool {
        self.stages[1]
    }

    fn next(&self, raw: &bool) -> Self {
        Self {
            stages: [*raw, self.stages[0]],
        }
    }
}

/// Turns a synchronised level into one-tick press edges.
///
/// After a press is recognised the hold timer runs for `hold` ticks. Presses
/// seen while it runs are ignored, and the button only counts as released once
/// the timer has expired and the level reads released.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debouncer {
    pressed: bool,
    hold: Timer,
}

impl Debouncer {
    pub const fn new(hold: u32) -> Self {
        Self {
            pressed: false,
            hold: Timer::expired_with(hold),
        }
    }

    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }
}

impl Synchronous for Debouncer {
    type Input = bool;
    /// `true` on the tick a new press is recognised.
    type Output = bool;

    fn output(&self, level: &bool) -> bool {
        *level && !self.pressed
    }

    fn next(&self, level: &bool) -> Self {
        if self.pressed {
            if !self.hold.expired() {
                Self {
                    hold: self.hold.countdown(),
                    ..*self
                }
            } else if !*level {
                Self {
                    pressed: false,
                    ..*self
                }
            } else {
                *self
            }
        } else if *level {
            Self {
                pressed: true,
                hold: self.hold.reloaded(),
            }
        } else {
            *self
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Conditioned {
    /// The synchronised level.
    pub level: bool,
    /// A debounced press edge.
    pub edge: bool,
}

/// A synchroniser feeding a debouncer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Conditioner {
    synchronizer: Synchronizer,
    debouncer: Debouncer,
}

impl Conditioner {
    pub const fn new(hold: u32) -> Self {
        Self {
            synchronizer: Synchronizer { stages: [false; 2] },
            debouncer: Debouncer::new(hold),
        }
    }
}

impl Synchronous for Conditioner {
    type Input = bool;
    type Output = Conditioned;

    fn output(&self, raw: &bool) -> Conditioned {
        let level = self.synchronizer.output(raw);
        Conditioned {
            level,
            edge: self.debouncer.output(&level),
        }
    }

    fn next(&self, raw: &bool) -> Self {
        let level = self.synchronizer.output(raw);
        Self {
            synchronizer: self.synchronizer.next(raw),
            debouncer: self.debouncer.next(&level),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use crate::{
        input::{Conditioner, Debouncer, Synchronizer},
        signal::Synchronous,
    };

    fn edges<T: Synchronous<Input = bool, Output = bool>>(
        component: &mut T,
        levels: &[bool],
    ) -> Vec<usize> {
        levels
            .iter()
            .enumerate()
            .filter_map(|(tick, level)| component.tick(level).then_some(tick))
            .collect()
    }

    #[test]
    fn synchronizer_delays_by_two_ticks() {
        let mut synchronizer = Synchronizer::default();
        let raw = [true, false, true, true, false, false, false];
        let seen: Vec<bool> = raw.iter().map(|level| synchronizer.tick(level)).collect();
        assert_eq!(seen, [false, false, true, false, true, true, false]);
    }

    #[test]
    fn held_button_gives_a_single_edge() {
        let mut debouncer = Debouncer::new(4);
        assert_eq!(edges(&mut debouncer, &[true; 20]), [0]);
        assert!(debouncer.is_pressed());
    }

    #[test]
    fn presses_inside_the_hold_window_are_ignored() {
        let hold = 5;
        let mut debouncer = Debouncer::new(hold);
        // pressed at tick 0, bouncing until tick 4, released afterwards.
        let mut levels = vec![true, false, true, false, true];
        levels.extend([false; 10]);
        levels.push(true);
        levels.extend([false; 3]);
        let edges = edges(&mut debouncer, &levels);
        assert_eq!(edges, [0, 15]);
    }

    #[test]
    fn release_needs_the_hold_window_to_expire() {
        let hold = 6;
        let mut debouncer = Debouncer::new(hold);
        debouncer.tick(&true);
        for _ in 0..hold - 1 {
            debouncer.tick(&false);
            assert!(debouncer.is_pressed());
        }
        debouncer.tick(&false);
        assert!(!debouncer.is_pressed());
    }

    #[test]
    fn edge_is_suppressed_for_the_whole_hold_time() {
        let hold = 16;
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let mut debouncer = Debouncer::new(hold);
            let levels: Vec<bool> = (0..400).map(|_| rng.gen_bool(0.5)).collect();
            let edges = edges(&mut debouncer, &levels);
            for pair in edges.windows(2) {
                assert!(pair[1] - pair[0] >= hold as usize, "edges at {pair:?}");
            }
        }
    }

    #[test]
    fn bouncy_presses_count_once_each() {
        let hold = 50;
        let mut rng = StdRng::seed_from_u64(7);
        let mut conditioner = Conditioner::new(hold);
        let mut levels = Vec::new();
        let presses = 5;
        for _ in 0..presses {
            levels.extend([false; 80]);
            // contact bounce shorter than the hold window.
            levels.push(true);
            levels.extend((0..30).map(|_| rng.gen_bool(0.5)));
            levels.extend([true; 100]);
        }
        levels.extend([false; 10]);
        let counted = levels
            .iter()
            .filter(|level| conditioner.tick(level).edge)
            .count();
        assert_eq!(counted, presses);
    }

    #[test]
    fn conditioner_reports_the_synchronised_level() {
        let mut conditioner = Conditioner::new(3);
        let outputs: Vec<(bool, bool)> = [true, true, true, false, false]
            .iter()
            .map(|raw| {
                let out = conditioner.tick(raw);
                (out.level, out.edge)
            })
            .collect();
        assert_eq!(
            outputs,
            [(false, false), (false, false), (true, true), (true, false), (true, false)]
        );
    }
}
