use clap::Parser;

mod handler;
mod scoreboard;
mod server;

/// Prints the score reports of every board that connects.
#[derive(Parser)]
struct Cli {
    /// Address to accept board connections on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    server::start(&cli.bind)
}
