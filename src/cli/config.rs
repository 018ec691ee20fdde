use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::export::exporter::{DEFAULT_PRODUCT_NAME, ExportSettings};
use crate::workflow::registry::builtin_workflows;
use crate::workflow::workflow_model::WorkflowConfig;

pub const DEFAULT_CONFIG_PATH: &str = "study-assistant.yaml";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "study-assistant",
    version,
    about = "Submit study assistant forms and render the results"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Server base URL (default: from config, then http://127.0.0.1:5000)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to config file (default: study-assistant.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a study guide, optionally exporting it as a PDF
    Guide {
        /// Topic to build the guide for
        #[arg(long)]
        topic: String,

        /// Difficulty level (server default when omitted: intermediate)
        #[arg(long)]
        level: Option<String>,

        /// Areas to focus on
        #[arg(long)]
        focus: Option<String>,

        /// Export the guide as a PDF after it renders
        #[arg(long)]
        export: bool,

        /// Directory for the exported PDF
        #[arg(long)]
        output_dir: Option<String>,

        /// Write the rendered page to this HTML file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Generate practice questions
    Questions {
        #[arg(long)]
        topic: String,

        /// Number of questions (default: 5)
        #[arg(long)]
        count: Option<String>,

        /// Question types, comma separated (default: multiple_choice,true_false,short_answer)
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,

        #[arg(short, long)]
        output: Option<String>,
    },

    /// Explain a topic
    Explain {
        #[arg(long)]
        topic: String,

        /// Difficulty level (default: beginner)
        #[arg(long)]
        level: Option<String>,

        #[arg(short, long)]
        output: Option<String>,
    },

    /// Summarize text
    Summarize {
        /// Text to summarize
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,

        /// Read the text to summarize from a file
        #[arg(long)]
        file: Option<String>,

        /// Summary style (default: paragraph)
        #[arg(long)]
        summary_type: Option<String>,

        #[arg(short, long)]
        output: Option<String>,
    },

    /// List the configured workflows
    Workflows,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `study-assistant.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub export: ExportConfig,

    /// Replaces the built-in workflow table when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflows: Option<Vec<WorkflowConfig>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// No timeout when unset
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_product_name")]
    pub product_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            product_name: default_product_name(),
        }
    }
}

// Serde default helpers
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_output_dir() -> String {
    ".".to_string()
}

fn default_product_name() -> String {
    DEFAULT_PRODUCT_NAME.to_string()
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if the file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = config_path, error = %e, "malformed config file, using defaults");
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Resolved settings (CLI > config > defaults)
// ============================================================================

/// Everything a command needs, after merging CLI args with the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub workflows: Vec<WorkflowConfig>,
    pub export: ExportSettings,
}

pub fn resolve_settings(cli_base_url: Option<&str>, config: &AppConfig) -> Settings {
    Settings {
        base_url: cli_base_url
            .map(str::to_string)
            .unwrap_or_else(|| config.server.base_url.clone()),
        timeout: config.server.timeout_secs.map(Duration::from_secs),
        workflows: config.workflows.clone().unwrap_or_else(builtin_workflows),
        export: ExportSettings {
            output_dir: PathBuf::from(&config.export.output_dir),
            product_name: config.export.product_name.clone(),
        },
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Install the stderr subscriber. `RUST_LOG` wins over `-v` flags.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .try_init();
}
