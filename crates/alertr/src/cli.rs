//! Clap derive structures for the `alertr` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use alertr_core::NodeId;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// alertr -- load, validate, and inspect alert network topologies
#[derive(Debug, Parser)]
#[command(
    name = "alertr",
    version,
    about = "Validate and inspect alertr network topologies",
    long_about = "Loads a topology snapshot (nodes, sensors, alerts, managers,\n\
        alert levels, options and sensor alerts) into the in-memory store,\n\
        enforcing referential integrity, and renders what was kept.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "ALERTR_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ALERTR_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one key per line (scripting)
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a topology and report what was kept and what was rejected
    Check(CheckArgs),

    /// Load a topology and list one kind of record
    #[command(alias = "ls")]
    Show(ShowArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Topology file (TOML)
    pub topology: PathBuf,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Topology file (TOML)
    pub topology: PathBuf,

    /// Kind of record to list
    pub entity: Entity,

    /// Only records owned by this node (sensors, alerts, managers)
    #[arg(long, short = 'n')]
    pub node: Option<NodeId>,

    /// Sort by description (sensors, alerts, managers) or level (alert-levels)
    #[arg(long, short = 's')]
    pub sort: bool,

    /// Prune sensor alerts that expired at this unix time before listing
    #[arg(long)]
    pub now: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Options,
    Nodes,
    Sensors,
    Alerts,
    Managers,
    AlertLevels,
    SensorAlerts,
}

impl Entity {
    pub fn supports_node_filter(self) -> bool {
        matches!(self, Self::Sensors | Self::Alerts | Self::Managers)
    }

    pub fn supports_sort(self) -> bool {
        matches!(
            self,
            Self::Sensors | Self::Alerts | Self::Managers | Self::AlertLevels
        )
    }
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
