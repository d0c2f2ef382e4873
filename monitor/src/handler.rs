use std::{io::BufRead, net::SocketAddr, sync::Arc};

use log::{debug, info, warn};
use logic::report::{ParseReportError, ScoreReport, REPORT_DELIMITER, REPORT_LEN};
use thiserror::Error;

use crate::scoreboard::Scoreboard;

#[derive(Debug, Error)]
enum ReadReportError {
    #[error("connection closed")]
    Closed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed report {line:?}: {source}")]
    Parse {
        line: Vec<u8>,
        source: ParseReportError,
    },
}

/// What a connection sent before it went away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub reports: usize,
    pub rejected: usize,
    pub last: Option<ScoreReport>,
}

/// Reads score reports from one board until it disconnects.
pub struct ReportHandler<R> {
    reader: R,
    peer: SocketAddr,
    scoreboard: Arc<Scoreboard>,
    line: Vec<u8>,
}

impl<R: BufRead> ReportHandler<R> {
    pub fn new(reader: R, peer: SocketAddr, scoreboard: Arc<Scoreboard>) -> Self {
        Self {
            reader,
            peer,
            scoreboard,
            line: Vec::with_capacity(REPORT_LEN),
        }
    }

    pub fn handle_reports(&mut self) -> Session {
        let mut session = Session::default();
        loop {
            match self.read_report() {
                Ok(report) => {
                    session.reports += 1;
                    session.last = Some(report);
                    if self.scoreboard.record(self.peer, report) != Some(report) {
                        println!("{}: {report}", self.peer);
                    } else {
                        debug!("{} repeated {report}", self.peer);
                    }
                }
                Err(err @ ReadReportError::Parse { .. }) => {
                    session.rejected += 1;
                    warn!("{}: {err}", self.peer);
                }
                Err(ReadReportError::Closed) => break,
                Err(ReadReportError::Io(err)) => {
                    warn!("failed to read from {}: {err}", self.peer);
                    break;
                }
            }
        }
        self.scoreboard.forget(&self.peer);
        info!(
            "connection {} closed after {} reports, {} rejected",
            self.peer, session.reports, session.rejected
        );
        session
    }

    fn read_report(&mut self) -> Result<ScoreReport, ReadReportError> {
        self.line.clear();
        let n = self.reader.read_until(REPORT_DELIMITER, &mut self.line)?;
        if n == 0 {
            return Err(ReadReportError::Closed);
        }
        let line = self.line.strip_suffix(&[REPORT_DELIMITER]).unwrap_or(&self.line);
        ScoreReport::try_from(line).map_err(|source| ReadReportError::Parse {
            line: line.to_vec(),
            source,
        })
    }
}
