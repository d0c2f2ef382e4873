use std::net::SocketAddr;

use dashmap::DashMap;
use logic::report::ScoreReport;

/// The latest report from every connected board.
#[derive(Default)]
pub struct Scoreboard {
    boards: DashMap<SocketAddr, ScoreReport>,
}

impl Scoreboard {
    /// Records `report` for `peer`, returning the report it replaces.
    pub fn record(&self, peer: SocketAddr, report: ScoreReport) -> Option<ScoreReport> {
        self.boards.insert(peer, report)
    }

    #[cfg(test)]
    pub fn latest(&self, peer: &SocketAddr) -> Option<ScoreReport> {
        self.boards.get(peer).map(|entry| *entry.value())
    }

    pub fn forget(&self, peer: &SocketAddr) -> Option<ScoreReport> {
        self.boards.remove(peer).map(|(_, report)| report)
    }

    /// Boards that have reported at least once and are still connected.
    pub fn reporting(&self) -> usize {
        self.boards.len()
    }
}
