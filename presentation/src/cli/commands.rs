//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for tool results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored summary followed by the payload
    Pretty,
    /// The response envelope as JSON
    Json,
}

impl From<OutputFormat> for marvin_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Pretty => marvin_domain::OutputFormat::Pretty,
            OutputFormat::Json => marvin_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for marvin-bridge
#[derive(Parser, Debug)]
#[command(name = "marvin-bridge")]
#[command(author, version, about = "Tool bridge to the Amazing Marvin task service")]
#[command(long_about = r#"
marvin-bridge exposes tools over the Amazing Marvin API, either one call at a
time from the shell or as an MCP server on stdin/stdout (`serve`).

Whole-forest queries run either as a walk of the category tree (one call per
container) or, when CouchDB credentials are configured, as a single _find query.
Document tools (read_doc, update_doc, create_doc, delete_doc) need
AMAZING_MARVIN_FULL_ACCESS_TOKEN.

Configuration files are loaded from (in priority order):
1. AMAZING_MARVIN_* environment variables
2. --config <path>     Explicit config file
3. ./marvin.toml       Project-level config
4. ~/.config/marvin-bridge/config.toml   Global config

Example:
  marvin-bridge tools
  marvin-bridge call get_all_tasks --arg label=Urgent --arg fields='["title","dueDate"]'
  marvin-bridge call find_tasks --json '{"contains": "report", "due_before": "2025-06-30"}'
  marvin-bridge -o json call get_productivity_summary_for_time_range --arg days=14
  marvin-bridge call create_task --arg title="Write report" --arg project_id=abc123
  marvin-bridge serve
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (default: from config, else pretty)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Include timing metadata in the output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show the effective configuration and its sources, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the available tools and their parameters
    Tools,

    /// Invoke one tool
    Call {
        /// Tool name or alias
        tool: String,

        /// Tool argument as KEY=VALUE (repeatable); VALUE is parsed as JSON when possible
        #[arg(short, long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,

        /// Tool arguments as a JSON object; --arg values take precedence
        #[arg(long, value_name = "JSON")]
        json: Option<String>,
    },

    /// Serve every tool over the Model Context Protocol on stdin/stdout
    Serve,
}
