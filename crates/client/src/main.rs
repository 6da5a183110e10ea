//! Tower battle demo client.
//!
//! Composition root that assembles an in-memory world, a [`TowerRuntime`]
//! and a terminal renderer for battle frames.
//!
//! # Examples
//!
//! ```bash
//! # Climb five floors with a party of three
//! cargo run -p tower-client -- climb --keys 5 --party 5,4,3
//!
//! # Farm the highest cleared floor
//! cargo run -p tower-client -- reclear --cleared 12 --keys 3
//!
//! # Inspect the enemy of a floor
//! cargo run -p tower-client -- enemy --floor 10
//! ```
//!
//! Press Ctrl-C during a battle to skip its playback.

mod commands;
mod render;
mod world;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use commands::{Climb, Enemy, Ladder, Reclear};

/// Tower battles against generated enemies
#[derive(Parser)]
#[command(name = "tower")]
#[command(about = "Tower battle demo", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Challenge floors one after another
    Climb(Climb),

    /// Spend every key on the highest cleared floor
    Reclear(Reclear),

    /// Show the floors around a position
    Ladder(Ladder),

    /// Print the generated enemy of a floor
    Enemy(Enemy),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Climb(cmd) => cmd.execute().await,
        Command::Reclear(cmd) => cmd.execute().await,
        Command::Ladder(cmd) => cmd.execute().await,
        Command::Enemy(cmd) => cmd.execute(),
    }
}

/// Logs go to stderr so frames on stdout stay clean.
fn setup_logging() {
    let env_filter =
        EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
