//! Command-line interface parsing for the Demoras CLI
//!
//! This module handles parsing of CLI arguments using clap, including the
//! --view flag for opening a dashboard screen directly and the flags that
//! control where data comes from.

use clap::Parser;
use thiserror::Error;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified view name is not recognized
    #[error("Invalid view: '{0}'. Valid views: overview, routes, gates")]
    InvalidView(String),
}

/// Dashboard screens addressable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Headline KPIs, rankings and insights
    Overview,
    /// Filterable routes table
    Routes,
    /// Gate utilization
    Gates,
}

impl View {
    /// Parses a view name, accepting English and Spanish aliases
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "overview" | "resumen" => Some(View::Overview),
            "routes" | "rutas" => Some(View::Routes),
            "gates" | "puertas" => Some(View::Gates),
            _ => None,
        }
    }
}

/// Demoras CLI - Argentine flight punctuality dashboard
#[derive(Parser, Debug)]
#[command(name = "demoras")]
#[command(about = "Argentine flight punctuality statistics in your terminal")]
#[command(version)]
pub struct Cli {
    /// Open directly on a screen
    ///
    /// Examples:
    ///   demoras --view overview   # KPIs, rankings and insights
    ///   demoras --view routes     # filterable routes table
    ///   demoras --view gates      # gate utilization
    ///
    /// Valid views: overview, routes, gates
    #[arg(long, value_name = "VIEW")]
    pub view: Option<String>,

    /// Fetch the export manifest from this URL instead of the default feed
    #[arg(long, value_name = "URL")]
    pub manifest_url: Option<String>,

    /// Refetch from the feed even if a valid cached snapshot exists
    #[arg(long)]
    pub refresh: bool,

    /// Use the bundled sample dataset; no network access
    #[arg(long)]
    pub demo: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    /// Screen to open once data has loaded (defaults to the overview)
    pub initial_view: Option<View>,
    /// Manifest URL override, if specified
    pub manifest_url: Option<String>,
    /// Whether to bypass cached data on the initial load
    pub force_refresh: bool,
    /// Whether to run on the bundled sample dataset
    pub demo: bool,
}

/// Parses a view string argument into a View enum.
///
/// # Arguments
/// * `s` - The view string from CLI
///
/// # Returns
/// * `Ok(View)` if the string matches a valid view
/// * `Err(CliError::InvalidView)` if the string doesn't match
pub fn parse_view_arg(s: &str) -> Result<View, CliError> {
    View::from_str(s).ok_or_else(|| CliError::InvalidView(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if an invalid view was specified
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_view = match &cli.view {
            Some(view_str) => Some(parse_view_arg(view_str)?),
            None => None,
        };
        Ok(StartupConfig {
            initial_view,
            manifest_url: cli.manifest_url.clone(),
            force_refresh: cli.refresh,
            demo: cli.demo,
        })
    }
}
