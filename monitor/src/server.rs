use std::{
    io::BufReader,
    net::{TcpListener, TcpStream},
    sync::Arc,
    thread::Builder,
};

use anyhow::Context;
use log::{error, info, warn};
use logic::report::REPORT_LEN;

use crate::{handler::ReportHandler, scoreboard::Scoreboard};

pub struct TcpServer {
    inner: TcpListener,
    scoreboard: Arc<Scoreboard>,
}

pub fn start(bind: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind).with_context(|| format!("failed to bind {bind}"))?;
    info!("monitor listening on {}", listener.local_addr()?);
    TcpServer::new(listener).handle_incoming();
    Ok(())
}

impl TcpServer {
    pub fn new(inner: TcpListener) -> Self {
        Self {
            inner,
            scoreboard: Arc::new(Scoreboard::default()),
        }
    }

    fn handle_incoming(&self) {
        for stream in self.inner.incoming() {
            match stream {
                Ok(stream) => self.spawn_handler(stream),
                Err(err) => warn!("incoming connection failure: {err}"),
            }
        }
    }

    fn spawn_handler(&self, stream: TcpStream) {
        let peer = match stream.peer_addr() {
            Ok(peer) => peer,
            Err(err) => {
                warn!("failed to retrieve peer address of connection: {err}");
                return;
            }
        };
        info!(
            "board connected from {peer}, {} already reporting",
            self.scoreboard.reporting()
        );
        let scoreboard = Arc::clone(&self.scoreboard);
        let spawned = Builder::new()
            .name(format!("handler_{peer}"))
            .spawn(move || {
                let reader = BufReader::with_capacity(REPORT_LEN * 16, stream);
                ReportHandler::new(reader, peer, scoreboard).handle_reports()
            });
        if let Err(err) = spawned {
            error!("failed to spawn handler for {peer}: {err}");
        }
    }
}
