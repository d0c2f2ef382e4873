use std::{
    fs::File,
    io::stdout,
    path::PathBuf,
    sync::mpsc::channel,
    thread::sleep,
    time::{Duration, Instant},
};

use clap::Parser;
use crossterm::{
    cursor, execute,
    terminal::{self, disable_raw_mode, enable_raw_mode},
};
use env_logger::Target;
use keyboard::{Control, Keyboard};
use link::{LineAssembler, MonitorLink};
use log::{info, warn};
use logic::{board::Board, config::Timing, signal::Synchronous, uart::SerialRx};
use panel::Panel;
use render::Status;

mod keyboard;
mod link;
mod panel;
mod render;

/// Plays LED-matrix Pong in the terminal, one simulated clock tick at a time.
#[derive(Parser)]
struct Cli {
    /// Simulated clock rate
    #[arg(long, default_value_t = 1_000_000)]
    clock_hz: u32,
    /// Frames drawn per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// How long a key press holds its button, in milliseconds
    #[arg(long, default_value_t = 150)]
    hold_ms: u64,
    /// Ticks per displayed row
    #[arg(long)]
    refresh: Option<u32>,
    /// Ticks between paddle steps
    #[arg(long)]
    paddle: Option<u32>,
    /// Ticks between ball steps, horizontally and vertically
    #[arg(long)]
    ball: Option<u32>,
    /// Ticks a reset press locks out further presses
    #[arg(long)]
    debounce: Option<u32>,
    /// Ticks per serial bit
    #[arg(long)]
    baud: Option<u32>,
    /// Forward score reports to a monitor at this address
    #[arg(long)]
    monitor: Option<String>,
    /// Write logs here; the terminal is busy with the board
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn timing(&self) -> Timing {
        let defaults = Timing::from_clock(self.clock_hz);
        Timing {
            refresh: self.refresh.unwrap_or(defaults.refresh),
            paddle: self.paddle.unwrap_or(defaults.paddle),
            ball_column: self.ball.unwrap_or(defaults.ball_column),
            ball_row: self.ball.unwrap_or(defaults.ball_row),
            debounce: self.debounce.unwrap_or(defaults.debounce),
            baud: self.baud.unwrap_or(defaults.baud),
        }
    }
}

/// Raw mode and the alternate screen, undone on drop.
struct Terminal;

impl Terminal {
    fn enter() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;
        Ok(Self)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show);
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        env_logger::Builder::from_default_env()
            .target(Target::Pipe(Box::new(File::create(path)?)))
            .init();
    }
    let timing = cli.timing();
    let mut board = Board::new(timing)?;
    info!("running with {timing:?}");
    let mut rx = SerialRx::new(timing.baud);
    let mut link = cli.monitor.as_deref().map(MonitorLink::connect).transpose()?;

    let fps = cli.fps.max(1);
    let ticks_per_frame = (cli.clock_hz / fps).max(1);
    let frame_time = Duration::from_secs(1) / fps;

    let terminal = Terminal::enter()?;
    let (control_tx, control_rx) = channel();
    keyboard::spawn_listener(control_tx)?;
    let mut keyboard = Keyboard::new(Duration::from_millis(cli.hold_ms));
    let mut panel = Panel::default();
    let mut lines = LineAssembler::default();
    let mut status = Status {
        report: None,
        rejected_lines: 0,
        monitor: cli.monitor.as_deref(),
    };
    let mut stdout = stdout();

    'frames: loop {
        let started = Instant::now();
        for control in control_rx.try_iter() {
            if control == Control::Quit {
                break 'frames;
            }
            keyboard.apply(control, started);
        }
        let buttons = keyboard.buttons(started);

        for _ in 0..ticks_per_frame {
            let output = board.tick(&buttons);
            panel.sample(output.row_select, output.column_drive);
            let Some(line) = rx.tick(&output.tx).and_then(|byte| lines.push(byte)) else {
                continue;
            };
            match link::parse_line(&line) {
                Ok(report) => status.report = Some(report),
                Err(err) => {
                    warn!("garbled report {line:?}: {err}");
                    status.rejected_lines += 1;
                }
            }
            if let Some(monitor) = &mut link {
                if let Err(err) = monitor.send(&line) {
                    warn!("lost the monitor: {err}");
                    link = None;
                }
            }
        }

        render::draw(&mut stdout, &panel.frame(), &status)?;
        sleep(frame_time.saturating_sub(started.elapsed()));
    }

    drop(terminal);
    let scores = board.pong().scores();
    println!("final score {}-{}", scores.a, scores.b);
    Ok(())
}
