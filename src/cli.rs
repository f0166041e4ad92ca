//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// orgscope - company intelligence dashboard in the terminal
///
/// Reads company profiles from the backend and renders the dashboard,
/// analytics, filtered company list or a single company's profile as a
/// Markdown or JSON report.
///
/// Examples:
///   orgscope --view dashboard
///   orgscope --view companies --search acme --type Startup --stdout
///   orgscope --view company --company-id 3f6c... --format json
///   orgscope --view analytics --dry-run
///   orgscope --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Which view to render
    #[arg(long, default_value = "dashboard", value_name = "VIEW")]
    pub view: View,

    /// Company to show with --view company
    #[arg(long, value_name = "ID")]
    pub company_id: Option<String>,

    /// Case-insensitive search over name, type and category
    #[arg(short, long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Only companies of this exact type
    #[arg(long = "type", value_name = "TYPE")]
    pub company_type: Option<String>,

    /// Only companies in this exact category
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path for the report
    ///
    /// Default: from config or orgscope_report.md
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the report to stdout instead of writing a file
    #[arg(long)]
    pub stdout: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .orgscope.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Backend project URL (without /rest/v1)
    #[arg(long, value_name = "URL", env = "ORGSCOPE_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Backend API key
    #[arg(long, value_name = "KEY", env = "ORGSCOPE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: print the queries the view would issue and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .orgscope.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Report views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum View {
    /// Totals, recent companies, type and category breakdowns (default)
    #[default]
    Dashboard,
    /// Distributions across companies and satellite collections
    Analytics,
    /// Filtered and searched company list
    Companies,
    /// One company's full profile
    Company,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.view == View::Company {
            match self.company_id.as_deref() {
                Some(id) if !id.trim().is_empty() => {}
                _ => return Err("--view company requires --company-id".to_string()),
            }
        }

        if let Some(ref url) = self.backend_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Backend URL must start with 'http://' or 'https://'".to_string());
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
