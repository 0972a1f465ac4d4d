//! CLI argument definitions for SynthQuant.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `profile` | Profile a symbol against real market data |
//! | `generate` | Generate a synthetic dataset |
//! | `datasets list` | List datasets created in this invocation chain |
//! | `datasets show` | Show one dataset with its full series |
//!
//! # Examples
//!
//! ```bash
//! # Profile a US symbol
//! synthquant profile AAPL --region US
//!
//! # Two explicit assets with a crash event
//! synthquant generate --project demo \
//!     --asset AAPL=150 --asset MSFT=300 \
//!     --frequency 1d --horizon-days 30 --seed 42 \
//!     --event '{"type": "crash", "trigger_step": 10, "magnitude": 0.2}'
//!
//! # Calibrated asset with a volatility bump, offline fixture data
//! synthquant generate --offline --project calib \
//!     --asset RELIANCE@IN:1.5 --frequency 1h --horizon-days 7 --seed 7
//! ```

use clap::{Args, Parser, Subcommand};

/// Synthetic financial time-series generator
///
/// Generates GBM price paths calibrated to explicit parameters or to real
/// market statistics, with optional shock events (IPO, crash, earnings).
#[derive(Debug, Parser)]
#[command(
    name = "synthquant",
    author,
    version,
    about = "Synthetic financial time-series generator"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Use the offline fixture data source instead of the network.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Profile a symbol: drift, volatility, and last price from real data.
    Profile(ProfileArgs),

    /// Generate a synthetic dataset and print its preview.
    Generate(GenerateArgs),

    /// Inspect datasets.
    Datasets(DatasetsArgs),
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Symbol to profile, e.g. AAPL or RELIANCE.
    pub symbol: String,

    /// Listing region (US or IN).
    #[arg(long, default_value = "US")]
    pub region: String,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Project label attached to the dataset.
    #[arg(long)]
    pub project: String,

    /// Asset spec, repeatable. `SYMBOL=PRICE` for an explicit start price,
    /// `SYMBOL@REGION[:VOL_MULT[:DRIFT_MULT]]` for calibration.
    #[arg(long = "asset", required = true)]
    pub assets: Vec<String>,

    /// Sampling frequency: 1m, 5m, 15m, 30m, 1h, 4h, 1d.
    #[arg(long, default_value = "1d")]
    pub frequency: String,

    /// Horizon in days.
    #[arg(long, default_value_t = 30)]
    pub horizon_days: u32,

    /// Top-level seed; same seed reproduces the same dataset.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Shock event as JSON, repeatable, applied in order.
    #[arg(long = "event")]
    pub events: Vec<String>,

    /// Print the full series instead of the preview.
    #[arg(long, default_value_t = false)]
    pub full: bool,
}

#[derive(Debug, Args)]
pub struct DatasetsArgs {
    #[command(subcommand)]
    pub command: DatasetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum DatasetsCommand {
    /// List dataset summaries in creation order.
    List,
    /// Show one dataset by identifier.
    Show {
        /// Dataset identifier, e.g. ds-1f0a9c2b3d4e.
        id: String,
    },
}
