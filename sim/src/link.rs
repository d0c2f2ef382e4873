use std::{
    io::{self, Write},
    net::TcpStream,
};

use anyhow::Context;
use log::{info, warn};
use logic::report::{ParseReportError, ScoreReport, REPORT_DELIMITER, REPORT_LEN};

/// Longest line kept before it is thrown away as noise.
const MAX_LINE_LEN: usize = REPORT_LEN * 4;

/// Collects received serial bytes into report lines.
#[derive(Default)]
pub struct LineAssembler {
    line: Vec<u8>,
}

impl LineAssembler {
    /// Returns the finished line, delimiter included, once `byte` completes one.
    pub fn push(&mut self, byte: u8) -> Option<Vec<u8>> {
        self.line.push(byte);
        if byte == REPORT_DELIMITER {
            return Some(std::mem::take(&mut self.line));
        }
        if self.line.len() >= MAX_LINE_LEN {
            warn!("dropping {} bytes without a line break", self.line.len());
            self.line.clear();
        }
        None
    }
}

pub fn parse_line(line: &[u8]) -> Result<ScoreReport, ParseReportError> {
    ScoreReport::try_from(line.strip_suffix(&[REPORT_DELIMITER]).unwrap_or(line))
}

/// Forwards every report line to a `monitor`.
pub struct MonitorLink {
    stream: TcpStream,
}

impl MonitorLink {
    pub fn connect(addr: &str) -> anyhow::Result<Self> {
        let stream =
            TcpStream::connect(addr).with_context(|| format!("failed to connect to {addr}"))?;
        info!("connected to monitor at {addr}");
        Ok(Self { stream })
    }

    pub fn send(&mut self, line: &[u8]) -> io::Result<()> {
        self.stream.write_all(line)
    }
}

#[cfg(test)]
mod tests {
    use logic::{
        report::{ParseReportError, ScoreReport},
        score::Scores,
        Side,
    };

    use crate::link::{parse_line, LineAssembler, MAX_LINE_LEN};

    fn feed(assembler: &mut LineAssembler, bytes: &[u8]) -> Vec<Vec<u8>> {
        bytes
            .iter()
            .filter_map(|byte| assembler.push(*byte))
            .collect()
    }

    #[test]
    fn splits_on_line_feed() {
        let mut assembler = LineAssembler::default();
        assert_eq!(
            feed(&mut assembler, b"0-1\r\n0-"),
            [b"0-1\r\n".to_vec()]
        );
        assert_eq!(feed(&mut assembler, b"2\r\n"), [b"0-2\r\n".to_vec()]);
    }

    #[test]
    fn drops_runaway_noise() {
        let mut assembler = LineAssembler::default();
        let noise = vec![b'x'; MAX_LINE_LEN + 3];
        assert!(feed(&mut assembler, &noise).is_empty());
        assert_eq!(feed(&mut assembler, b"\n"), [b"xxx\n".to_vec()]);
    }

    #[test]
    fn parses_complete_lines() {
        let expected = ScoreReport::from(Scores::default().credited(Side::A));
        assert_eq!(parse_line(b"1-0\r\n"), Ok(expected));
        assert_eq!(parse_line(b"1-0\r"), Ok(expected));
        assert_eq!(
            parse_line(b"1-0\n"),
            Err(ParseReportError::InvalidByteCount(3))
        );
    }
}
