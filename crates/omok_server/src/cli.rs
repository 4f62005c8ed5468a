//! Command-line interface for the room host.

use clap::Parser;
use omok_game::WinVariant;
use std::path::PathBuf;

/// Omok room host - authoritative two-player grid game sessions over HTTP
#[derive(Parser, Debug, Default)]
#[command(name = "omok_server")]
#[command(about = "Room host for two-player grid game sessions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (falls back to $PORT, then the config file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Rule variant for new rooms: occupancy-exhaustion or five-in-a-row
    #[arg(long)]
    pub variant: Option<WinVariant>,
}
