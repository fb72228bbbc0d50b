//! Command-line argument parsing for Country Registry
//!
//! This module defines the CLI structure using clap derive macros. Running
//! without a subcommand starts the interactive shell.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::{NumericRange, SortField};

/// Country Registry - manage a CSV file of country records
#[derive(Parser, Debug)]
#[command(
    name = "country_registry",
    version,
    about = "Search, filter, sort and edit a CSV file of country records",
    long_about = "Loads country records (name, population, area, continent) from a CSV file,
validates every row, and answers search, filter, sort and statistics queries.
Without a subcommand an interactive menu is started."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand (defaults to the interactive shell)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - only errors are logged
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// CSV data file (overrides configuration)
    #[arg(long, global = true, value_name = "FILE")]
    pub data: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive menu
    Shell,

    /// Print the number of loaded records
    Count,

    /// Search countries by name
    Search(SearchArgs),

    /// Filter countries by continent, population or area
    Filter(FilterArgs),

    /// List countries sorted by a field
    Sort(SortArgs),

    /// Show statistics over all records
    Stats(StatsArgs),

    /// Add a country and save the data file
    Add(AddArgs),

    /// Change population and/or area of a country and save the data file
    Update(UpdateArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the search command
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Name or part of a name (case-insensitive)
    pub query: String,

    /// Match the whole name instead of a substring
    #[arg(short, long)]
    pub exact: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the filter command
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    #[command(subcommand)]
    pub target: FilterTarget,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// Field to filter on
#[derive(Subcommand, Debug, Clone)]
pub enum FilterTarget {
    /// Countries on a continent (case-insensitive)
    Continent {
        /// Continent name
        value: String,
    },

    /// Countries with population in a range (A-B, >=N, <=N or N)
    Population {
        /// Range expression
        #[arg(allow_hyphen_values = true)]
        range: NumericRange,
    },

    /// Countries with area in a range (A-B, >=N, <=N or N)
    Area {
        /// Range expression
        #[arg(allow_hyphen_values = true)]
        range: NumericRange,
    },
}

/// Arguments for the sort command
#[derive(Args, Debug, Clone)]
pub struct SortArgs {
    /// Field to sort by: name, population or area
    pub field: SortField,

    /// Sort in descending order
    #[arg(short, long)]
    pub desc: bool,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the stats command
#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Print statistics as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the add command
#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Country name
    #[arg(long)]
    pub name: String,

    /// Population (separators `_` and spaces allowed)
    #[arg(long)]
    pub population: String,

    /// Area in km² (separators `_` and spaces allowed)
    #[arg(long)]
    pub area: String,

    /// Continent
    #[arg(long)]
    pub continent: String,
}

/// Arguments for the update command
#[derive(Args, Debug, Clone)]
pub struct UpdateArgs {
    /// Country name (exact, or a part matching a single country)
    pub name: String,

    /// New population
    #[arg(long)]
    pub population: Option<String>,

    /// New area in km²
    #[arg(long)]
    pub area: Option<String>,
}

impl UpdateArgs {
    /// Check that at least one field is being changed
    pub fn validate(&self) -> Result<(), String> {
        if self.population.is_none() && self.area.is_none() {
            return Err("Nothing to update: pass --population and/or --area".to_string());
        }
        Ok(())
    }
}

/// Arguments for configuration management
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Write a commented default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run, defaulting to the shell
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Shell)
    }

    /// Get the logging level requested by flags, if any
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}
