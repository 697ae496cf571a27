//! Atribot CLI - License key and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Normalize a key the way the activation form does
//! atribot-cli key format "ab12cd34ef56gh03"
//!
//! # Check a key against the demo admission table
//! atribot-cli key check AB12-CD34-EF56-GH03
//!
//! # Generate a batch of level 2 keys
//! atribot-cli key generate --level LEVEL_2 --count 10
//!
//! # Print the QR payload for a kit card
//! atribot-cli key qr AB12-CD34-EF56-GH03
//! atribot-cli key qr AB12-CD34-EF56-GH03 --svg > card.svg
//!
//! # Export the seeded inventory as CSV
//! atribot-cli export --status unused > keys.csv
//! ```
//!
//! # Commands
//!
//! - `key format|check|generate|qr` - License key tools
//! - `export` - Inventory CSV export
//! - `levels` - List the level catalog
//! - `courses` - List courses, optionally as seen by a learner level

#![cfg_attr(not(test), forbid(unsafe_code))]

use atribot_core::{KeyStatus, LevelId};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "atribot-cli")]
#[command(author, version, about = "Atribot CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// License key tools
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Export the seeded license inventory as CSV
    Export {
        /// Case-insensitive key search
        #[arg(short, long)]
        query: Option<String>,

        /// Only keys for this level (`LEVEL_1` .. `LEVEL_5`)
        #[arg(short, long)]
        level: Option<LevelId>,

        /// Only keys with this status (`used`, `unused`)
        #[arg(short, long)]
        status: Option<KeyStatus>,
    },
    /// List the level catalog
    Levels,
    /// List courses
    Courses {
        /// Mark courses locked or unlocked for a learner at this level
        #[arg(short, long)]
        level: Option<LevelId>,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Normalize a key to `XXXX-XXXX-XXXX-XXXX`
    Format {
        /// Raw key as typed
        raw: String,
    },
    /// Check a key against the demo admission table
    Check {
        /// Raw key as typed
        raw: String,
    },
    /// Generate new random keys
    Generate {
        /// Level the keys unlock
        #[arg(short, long, default_value = "LEVEL_1")]
        level: LevelId,

        /// Number of keys (1 to 100)
        #[arg(short, long, default_value_t = 10)]
        count: u32,
    },
    /// Print the activation URL encoded in a kit-card QR code
    Qr {
        /// Raw key as typed
        raw: String,

        /// Site the QR code points at (default: `ATRIBOT_QR_BASE_URL` or https://www.atribot.in)
        #[arg(short, long)]
        base_url: Option<String>,

        /// Print the code itself as SVG instead of the URL
        #[arg(long)]
        svg: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atribot_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => print_output(&output),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    println!("{output}");
}

fn run(cli: Cli) -> Result<String, commands::CommandError> {
    match cli.command {
        Commands::Key { action } => match action {
            KeyAction::Format { raw } => Ok(commands::key::format(&raw)),
            KeyAction::Check { raw } => commands::key::check(&raw),
            KeyAction::Generate { level, count } => commands::key::generate(level, count),
            KeyAction::Qr { raw, base_url, svg } => commands::key::qr(&raw, base_url, svg),
        },
        Commands::Export {
            query,
            level,
            status,
        } => Ok(commands::export::csv(query, level, status)),
        Commands::Levels => Ok(commands::catalog::levels()),
        Commands::Courses { level } => Ok(commands::catalog::courses(level)),
    }
}
