//! The top-level composer: wires the components together and owns the pixel
//! buffer, the scores and the report trigger.

use log::{debug, info};

use crate::{
    ball::{Ball, BallInput, BallOutput, Paddles},
    config::Timing,
    display::{PixelBuffer, ScanLines, Scanner},
    input::{Conditioner, Synchronizer},
    paddle::{Paddle, PaddleButtons, PaddleMask},
    score::{ScoreTransmitter, Scores, TransmitterInput},
    signal::Synchronous,
    uart::ByteChannel,
    Side,
};

/// Raw button levels, `true` while pressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Buttons {
    pub a_left: bool,
    pub a_right: bool,
    pub b_left: bool,
    pub b_right: bool,
    pub reset: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PongInput {
    pub buttons: Buttons,
    /// The serial channel accepts a byte this tick.
    pub serial_ready: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PongOutput {
    pub scan: ScanLines,
    pub serial: ByteChannel,
    pub pixels: PixelBuffer,
    pub ball: BallOutput,
    pub scores: Scores,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pong {
    a_left: Synchronizer,
    a_right: Synchronizer,
    b_left: Synchronizer,
    b_right: Synchronizer,
    reset: Conditioner,
    scanner: Scanner,
    paddle_a: Paddle,
    paddle_b: Paddle,
    ball: Ball,
    scores: Scores,
    update: bool,
    transmitter: ScoreTransmitter,
}

impl Pong {
    pub fn new(timing: &Timing) -> Self {
        Self {
            a_left: Synchronizer::default(),
            a_right: Synchronizer::default(),
            b_left: Synchronizer::default(),
            b_right: Synchronizer::default(),
            reset: Conditioner::new(timing.debounce),
            scanner: Scanner::new(timing.refresh),
            paddle_a: Paddle::new(timing.paddle),
            paddle_b: Paddle::new(timing.paddle),
            ball: Ball::new(timing),
            scores: Scores::default(),
            update: false,
            transmitter: ScoreTransmitter::default(),
        }
    }

    pub const fn scores(&self) -> Scores {
        self.scores
    }

    pub const fn ball(&self) -> &Ball {
        &self.ball
    }

    pub const fn paddle(&self, side: Side) -> PaddleMask {
        match side {
            Side::A => self.paddle_a.mask(),
            Side::B => self.paddle_b.mask(),
        }
    }

    pub const fn transmitter(&self) -> &ScoreTransmitter {
        &self.transmitter
    }

    /// Immediate outputs and next registers, both from the current snapshot.
    fn evaluate(&self, input: &PongInput) -> (PongOutput, Self) {
        let raw = input.buttons;
        let buttons_a = PaddleButtons {
            left: self.a_left.output(&raw.a_left),
            right: self.a_right.output(&raw.a_right),
        };
        let buttons_b = PaddleButtons {
            left: self.b_left.output(&raw.b_left),
            right: self.b_right.output(&raw.b_right),
        };
        let reset = self.reset.output(&raw.reset);

        let paddles = Paddles {
            a: self.paddle_a.output(&buttons_a).mask,
            b: self.paddle_b.output(&buttons_b).mask,
        };
        let ball = self.ball.observe(paddles);

        let mut pixels = PixelBuffer::default();
        pixels.column(Side::A.paddle_column()).fill_from(paddles.a.bits());
        pixels.column(Side::B.paddle_column()).fill_from(paddles.b.bits());
        pixels.cell(ball.column, ball.row).light();

        // only the player on the ball's half gets to serve or aim.
        let aim = match Side::of_column(ball.column) {
            Side::A => buttons_a,
            Side::B => buttons_b,
        };

        let transmitter_input = TransmitterInput {
            update: self.update,
            scores: self.scores,
            ready: input.serial_ready,
        };

        let (scores, update) = match (reset.edge, ball.scored_against) {
            (true, _) => (Scores::default(), true),
            (false, Some(side)) => (self.scores.credited(side.opponent()), true),
            (false, None) => (self.scores, false),
        };

        let output = PongOutput {
            scan: self.scanner.output(&pixels),
            serial: self.transmitter.output(&transmitter_input),
            pixels,
            ball,
            scores: self.scores,
        };
        let next = Self {
            a_left: self.a_left.next(&raw.a_left),
            a_right: self.a_right.next(&raw.a_right),
            b_left: self.b_left.next(&raw.b_left),
            b_right: self.b_right.next(&raw.b_right),
            reset: self.reset.next(&raw.reset),
            scanner: self.scanner.next(&pixels),
            paddle_a: self.paddle_a.next(&buttons_a),
            paddle_b: self.paddle_b.next(&buttons_b),
            ball: self.ball.next(&BallInput {
                paddles,
                up: aim.left,
                down: aim.right,
                reset: update,
            }),
            scores,
            update,
            transmitter: self.transmitter.next(&transmitter_input),
        };
        (output, next)
    }

    #[cfg(test)]
    pub(crate) fn with_ball(self, ball: Ball) -> Self {
        Self { ball, ..self }
    }
}

impl Synchronous for Pong {
    type Input = PongInput;
    type Output = PongOutput;

    fn output(&self, input: &PongInput) -> PongOutput {
        self.evaluate(input).0
    }

    fn next(&self, input: &PongInput) -> Self {
        self.evaluate(input).1
    }

    fn tick(&mut self, input: &PongInput) -> PongOutput {
        let (output, next) = self.evaluate(input);
        if next.scores != self.scores {
            info!("score {}-{}", next.scores.a, next.scores.b);
        } else if next.update {
            info!("scores reset");
        }
        if next.ball.is_moving() && !self.ball.is_moving() {
            debug!("serve from column {}", self.ball.column());
        }
        *self = next;
        output
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ball::{Ball, Horizontal, Vertical},
        config::Timing,
        paddle::PaddleMask,
        pong::{Buttons, Pong, PongInput, PongOutput},
        score::Score,
        signal::Synchronous,
        Side,
    };

    const EVERY_TICK: Timing = Timing::uniform(1);

    fn run(pong: &mut Pong, input: PongInput, ticks: usize) -> Vec<PongOutput> {
        (0..ticks).map(|_| pong.tick(&input)).collect()
    }

    fn idle() -> PongInput {
        PongInput {
            buttons: Buttons::default(),
            serial_ready: true,
        }
    }

    fn pressing(buttons: Buttons) -> PongInput {
        PongInput {
            buttons,
            serial_ready: true,
        }
    }

    /// Bytes accepted by an always-ready channel.
    fn sent(outputs: &[PongOutput]) -> Vec<u8> {
        outputs
            .iter()
            .filter(|output| output.serial.valid)
            .map(|output| output.serial.data)
            .collect()
    }

    /// Player A misses: the ball heads past column 0 on a row the paddle leaves open.
    fn about_to_miss(timing: &Timing) -> Pong {
        let ball = Ball::new(timing)
            .placed(1, 0, Horizontal::TowardA, Vertical::Down)
            .in_play();
        Pong::new(timing).with_ball(ball)
    }

    #[test]
    fn draws_paddles_and_ball() {
        let pong = Pong::new(&EVERY_TICK);
        let output = pong.output(&idle());
        let pixels = output.pixels;
        for row in 0..8 {
            assert_eq!(pixels.get(0, row), row == 3 || row == 4);
            assert_eq!(pixels.get(7, row), row == 3 || row == 4);
        }
        assert!(pixels.get(1, 3));
        assert_eq!(pixels.lit_count(), 5);
    }

    #[test]
    fn buttons_reach_the_paddles_after_synchronisation() {
        let mut pong = Pong::new(&EVERY_TICK);
        let up = pressing(Buttons {
            b_left: true,
            ..Buttons::default()
        });
        run(&mut pong, up, 2);
        assert_eq!(pong.paddle(Side::B), PaddleMask::CENTRED);
        pong.tick(&up);
        assert_eq!(pong.paddle(Side::B), PaddleMask::at_bottom_row(4));
        assert_eq!(pong.paddle(Side::A), PaddleMask::CENTRED);
        run(&mut pong, up, 10);
        assert_eq!(pong.paddle(Side::B), PaddleMask::at_bottom_row(6));
    }

    #[test]
    fn scan_lines_show_the_composed_buffer() {
        let mut pong = Pong::new(&EVERY_TICK);
        let outputs = run(&mut pong, idle(), 8);
        for output in outputs {
            let row = output.scan.row_select.trailing_zeros() as u8;
            assert_eq!(output.scan.column_drive, output.pixels.row_bits(row));
        }
    }

    #[test]
    fn miss_scores_for_the_opponent_and_reports_it() {
        let mut pong = about_to_miss(&EVERY_TICK);
        let outputs = run(&mut pong, idle(), 20);
        let events: Vec<Side> = outputs
            .iter()
            .filter_map(|output| output.ball.scored_against)
            .collect();
        assert_eq!(events, [Side::A]);
        assert_eq!(pong.scores().a, Score::ZERO);
        assert_eq!(pong.scores().b.value(), 1);
        assert_eq!(sent(&outputs), b"0-1\r\n");
        // the ball waits at player A's side for the next serve.
        assert_eq!(pong.ball().column(), 1);
        assert_eq!(pong.ball().horizontal(), Horizontal::TowardB);
        assert!(!pong.ball().is_moving());
    }

    #[test]
    fn reset_button_clears_the_scores() {
        let mut pong = about_to_miss(&EVERY_TICK);
        run(&mut pong, idle(), 10);
        assert_eq!(pong.scores().b.value(), 1);
        let reset = pressing(Buttons {
            reset: true,
            ..Buttons::default()
        });
        let outputs = run(&mut pong, reset, 20);
        assert_eq!(pong.scores(), Default::default());
        assert_eq!(sent(&outputs), b"0-0\r\n");
    }

    #[test]
    fn reset_overrides_a_simultaneous_point() {
        let ball = Ball::new(&EVERY_TICK)
            .placed(2, 0, Horizontal::TowardA, Vertical::Down)
            .in_play();
        let mut pong = Pong::new(&EVERY_TICK).with_ball(ball);
        let reset = pressing(Buttons {
            reset: true,
            ..Buttons::default()
        });
        // the reset edge comes out of the synchroniser on the third tick, the same
        // tick the ball gets past player A.
        let outputs = run(&mut pong, reset, 3);
        assert_eq!(outputs[2].ball.scored_against, Some(Side::A));
        assert_eq!(pong.scores(), Default::default());
        let outputs = run(&mut pong, reset, 10);
        assert_eq!(sent(&outputs), b"0-0\r\n");
    }

    #[test]
    fn serve_gesture_comes_from_the_ball_side() {
        let mut pong = Pong::new(&EVERY_TICK);
        let wrong_side = pressing(Buttons {
            b_left: true,
            b_right: true,
            ..Buttons::default()
        });
        run(&mut pong, wrong_side, 10);
        assert!(!pong.ball().is_moving());

        let mut pong = Pong::new(&EVERY_TICK);
        let serve = pressing(Buttons {
            a_left: true,
            a_right: true,
            ..Buttons::default()
        });
        run(&mut pong, serve, 3);
        assert!(pong.ball().is_moving());
    }

    #[test]
    fn player_b_aims_at_the_far_column() {
        let timing = Timing {
            ball_column: 1000,
            ..EVERY_TICK
        };
        let at_b = Ball::new(&timing)
            .placed(7, 3, Horizontal::TowardB, Vertical::Up)
            .in_play();
        let down_for = |a_right, b_right| {
            pressing(Buttons {
                a_right,
                b_right,
                ..Buttons::default()
            })
        };

        let mut pong = Pong::new(&timing).with_ball(at_b);
        run(&mut pong, down_for(false, true), 3);
        assert_eq!(pong.ball().vertical(), Vertical::Down);
        assert_eq!(pong.ball().row(), 6);

        // player A's buttons do nothing while the ball is on B's half.
        let mut pong = Pong::new(&timing).with_ball(at_b);
        run(&mut pong, down_for(true, false), 3);
        assert_eq!(pong.ball().vertical(), Vertical::Up);
        assert_eq!(pong.ball().row(), 6);
    }

    #[test]
    fn rally_with_centred_paddles() {
        // a ball travelling along row 3 hits both centred paddles.
        let timing = Timing {
            ball_row: 1_000_000,
            ..EVERY_TICK
        };
        let ball = Ball::new(&timing)
            .placed(2, 3, Horizontal::TowardB, Vertical::Up)
            .in_play();
        let mut pong = Pong::new(&timing).with_ball(ball);
        let outputs = run(&mut pong, idle(), 40);
        let rebounds = outputs.iter().filter(|output| output.ball.rebound).count();
        assert!(rebounds >= 6, "{rebounds} rebounds");
        assert!(outputs.iter().all(|output| output.ball.scored_against.is_none()));
        assert!(outputs
            .iter()
            .all(|output| (1..=6).contains(&output.ball.column)));
    }

    #[test]
    fn stalled_serial_channel_leaves_the_game_running() {
        let mut pong = about_to_miss(&EVERY_TICK);
        let stalled = PongInput {
            serial_ready: false,
            ..idle()
        };
        let outputs = run(&mut pong, stalled, 50);
        assert!(outputs[10..].iter().all(|output| output.serial.valid));
        assert!(outputs[10..].iter().all(|output| output.serial.data == b'0'));
        let outputs = run(&mut pong, idle(), 10);
        assert_eq!(sent(&outputs)[..5], *b"0-1\r\n");
    }
}
