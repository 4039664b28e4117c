//! Command line argument parsing for the phonewise CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::nlu::types::UsageType;

/// Phonewise - a conversational smartphone recommender
#[derive(Parser, Debug, Clone)]
#[command(name = "phonewise")]
#[command(about = "A conversational smartphone recommender")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct PhonewiseArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Assistant configuration file (JSON)
    #[arg(short, long, global = true, env = "PHONEWISE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl PhonewiseArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Chat with the assistant, one message per argument or stdin line
    Chat(ChatArgs),

    /// Rank phones directly, without query understanding
    Recommend(RecommendArgs),

    /// Compare two phones attribute by attribute
    Compare(CompareArgs),

    /// Train the statistical intent model
    Train(TrainArgs),
}

/// Arguments for chatting
#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Phone catalog file (JSON array)
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// Messages to send in order. Reads stdin when none are given.
    #[arg(value_name = "MESSAGE")]
    pub messages: Vec<String>,

    /// Session id to continue (a new one is generated when empty)
    #[arg(short, long, default_value = "")]
    pub session: String,

    /// User id; chat history is recorded only for known users
    #[arg(short, long)]
    pub user: Option<String>,

    /// Trained intent model artifact
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Append chat history to this JSON lines file
    #[arg(long)]
    pub history: Option<PathBuf>,
}

/// Arguments for direct recommendations
#[derive(Parser, Debug, Clone)]
pub struct RecommendArgs {
    /// Phone catalog file (JSON array)
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// Ranking strategy
    #[arg(short = 'b', long = "by", default_value = "budget")]
    pub mode: RecommendMode,

    /// Preferred brands (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub brands: Vec<String>,

    /// Excluded brands (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Minimum price in RM
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price in RM
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Usage type for `--by usage`
    #[arg(long)]
    pub usage: Option<UsageArg>,

    /// Feature name for `--by feature`, e.g. "5g" or "nfc"
    #[arg(long)]
    pub feature: Option<String>,

    /// Reference phone id for `--by similar`
    #[arg(long)]
    pub similar_to: Option<u64>,

    /// Maximum number of results to return
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Ranking strategies available in CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendMode {
    /// Best value for money
    Budget,
    /// Largest batteries
    Battery,
    /// Best main cameras
    Camera,
    /// Fit for a usage type
    Usage,
    /// Phones from the given brands
    Brand,
    /// Phones with a feature
    Feature,
    /// Phones priced like a reference phone
    Similar,
}

/// Usage types accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageArg {
    Gaming,
    Photography,
    Business,
    Entertainment,
    SocialMedia,
    Basic,
}

impl From<UsageArg> for UsageType {
    fn from(usage: UsageArg) -> Self {
        match usage {
            UsageArg::Gaming => UsageType::Gaming,
            UsageArg::Photography => UsageType::Photography,
            UsageArg::Business => UsageType::Business,
            UsageArg::Entertainment => UsageType::Entertainment,
            UsageArg::SocialMedia => UsageType::SocialMedia,
            UsageArg::Basic => UsageType::Basic,
        }
    }
}

/// Arguments for comparing phones
#[derive(Parser, Debug, Clone)]
pub struct CompareArgs {
    /// Phone catalog file (JSON array)
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// First phone id
    #[arg(value_name = "PHONE_A")]
    pub phone_a: u64,

    /// Second phone id
    #[arg(value_name = "PHONE_B")]
    pub phone_b: u64,
}

/// Arguments for training the intent model
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Where to write the model artifact
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Labelled training data (JSON); the built-in samples are used when omitted
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Override the configured number of epochs
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Override the configured seed
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
