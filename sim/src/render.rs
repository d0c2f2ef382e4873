use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use logic::{display::PixelBuffer, report::ScoreReport, LAST_INDEX, MATRIX_SIZE};

const LIT: char = '●';
const DARK: char = '·';

/// What is shown under the matrix.
pub struct Status<'a> {
    pub report: Option<ScoreReport>,
    pub rejected_lines: usize,
    pub monitor: Option<&'a str>,
}

/// The matrix as text, top row first. Row 7 is the top of the board.
pub fn matrix_lines(pixels: &PixelBuffer) -> Vec<String> {
    (0..MATRIX_SIZE)
        .rev()
        .map(|row| {
            (0..MATRIX_SIZE)
                .map(|column| if pixels.get(column, row) { LIT } else { DARK })
                .flat_map(|cell| [cell, ' '])
                .collect::<String>()
                .trim_end()
                .to_owned()
        })
        .collect()
}

pub fn draw<W: Write>(w: &mut W, pixels: &PixelBuffer, status: &Status) -> io::Result<()> {
    queue!(w, MoveTo(0, 0), SetForegroundColor(Color::Red))?;
    for (line, y) in matrix_lines(pixels).into_iter().zip(0..) {
        queue!(w, MoveTo(2, y + 1), Print(line))?;
    }
    queue!(w, SetForegroundColor(Color::Reset))?;

    let below = u16::from(LAST_INDEX) + 3;
    let score = match status.report {
        Some(report) => format!("A {} - {} B", report.a, report.b),
        None => "A - - - B".to_owned(),
    };
    queue!(
        w,
        MoveTo(2, below),
        Clear(ClearType::CurrentLine),
        Print(score)
    )?;
    if status.rejected_lines > 0 {
        queue!(
            w,
            SetForegroundColor(Color::Yellow),
            Print(format!("  ({} garbled lines)", status.rejected_lines)),
            SetForegroundColor(Color::Reset),
        )?;
    }
    queue!(
        w,
        MoveTo(0, below + 2),
        Print("w/s: player A   up/down: player B   both: serve"),
        MoveTo(0, below + 3),
        Print("r: reset scores   q: quit"),
    )?;
    if let Some(monitor) = status.monitor {
        queue!(
            w,
            MoveTo(0, below + 4),
            Print(format!("reporting to {monitor}"))
        )?;
    }
    w.flush()
}

#[cfg(test)]
mod tests {
    use logic::{
        board::Board, config::Timing, display::PixelBuffer, pong::Buttons, signal::Synchronous,
    };

    use crate::render::matrix_lines;

    #[test]
    fn blank_matrix() {
        let lines = matrix_lines(&PixelBuffer::default());
        assert_eq!(lines.len(), 8);
        assert!(lines.iter().all(|line| line == "· · · · · · · ·"));
    }

    #[test]
    fn starting_position() {
        let mut board = Board::new(Timing::default()).unwrap();
        let pixels = board.tick(&Buttons::default()).pixels;
        assert_eq!(
            matrix_lines(&pixels),
            [
                "· · · · · · · ·",
                "· · · · · · · ·",
                "· · · · · · · ·",
                "● · · · · · · ●",
                "● ● · · · · · ●",
                "· · · · · · · ·",
                "· · · · · · · ·",
                "· · · · · · · ·",
            ]
        );
    }
}
