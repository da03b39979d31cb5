//! CLI error types with miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use alertr_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const REJECTED: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Topology ─────────────────────────────────────────────────────

    #[error("Could not read topology file {path}")]
    #[diagnostic(code(alertr::topology_read))]
    TopologyRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Topology file {path} is not valid")]
    #[diagnostic(
        code(alertr::topology_parse),
        help(
            "Expected TOML arrays named options, alert_levels, nodes, sensors,\n\
             alerts, managers and sensor_alerts."
        )
    )]
    TopologyParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("{count} record(s) were rejected")]
    #[diagnostic(
        code(alertr::rejected),
        help("Every rejected record is listed in the report above.")
    )]
    Rejected { count: usize },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(alertr::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(alertr::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(alertr::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(alertr::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config(_) => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }
}
