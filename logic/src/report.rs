//! The text line a board sends whenever the score changes: `"<a>-<b>\r\n"`.

use std::fmt::Display;

use thiserror::Error;

use crate::score::{Score, Scores};

/// Terminates every report.
pub const REPORT_DELIMITER: u8 = b'\n';

/// Length of a serialized report, delimiter included.
pub const REPORT_LEN: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScoreReport {
    pub a: Score,
    pub b: Score,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseReportError {
    #[error("empty report")]
    EmptyReport,
    #[error("invalid amount of bytes: {0}")]
    InvalidByteCount(usize),
    #[error("invalid score digit {0:#04x}")]
    InvalidDigit(u8),
    #[error("missing '-' between the scores")]
    MissingSeparator,
    #[error("missing carriage return")]
    MissingCarriageReturn,
}

impl From<Scores> for ScoreReport {
    fn from(scores: Scores) -> Self {
        Self {
            a: scores.a,
            b: scores.b,
        }
    }
}

impl From<ScoreReport> for Scores {
    fn from(report: ScoreReport) -> Self {
        Self {
            a: report.a,
            b: report.b,
        }
    }
}

impl From<ScoreReport> for Vec<u8> {
    fn from(report: ScoreReport) -> Self {
        vec![
            report.a.ascii(),
            b'-',
            report.b.ascii(),
            b'\r',
            REPORT_DELIMITER,
        ]
    }
}

/// Parses a report line with its [`REPORT_DELIMITER`] already stripped.
impl TryFrom<&[u8]> for ScoreReport {
    type Error = ParseReportError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let [a, separator, b, carriage_return] = match value {
            [] => return Err(ParseReportError::EmptyReport),
            [a, separator, b, carriage_return] => [*a, *separator, *b, *carriage_return],
            _ => return Err(ParseReportError::InvalidByteCount(value.len())),
        };
        let digit = |byte| Score::from_ascii(byte).ok_or(ParseReportError::InvalidDigit(byte));
        let a = digit(a)?;
        if separator != b'-' {
            return Err(ParseReportError::MissingSeparator);
        }
        let b = digit(b)?;
        if carriage_return != b'\r' {
            return Err(ParseReportError::MissingCarriageReturn);
        }
        Ok(Self { a, b })
    }
}

impl Display for ScoreReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

#[cfg(test)]
#[macro_export]
macro_rules! assert_parse {
    ($bytes:expr, $expected:expr $(,)?) => {
        assert_eq!(
            $crate::report::ScoreReport::try_from($bytes.as_slice()),
            $expected
        )
    };
}
