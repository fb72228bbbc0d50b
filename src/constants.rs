//! Application constants for Country Registry
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

/// Environment variable names for configuration overrides
pub mod env {
    /// Path of the CSV data file
    pub const DATA_PATH: &str = "COUNTRY_REGISTRY_DATA";

    /// Enable or disable saving after add/update
    pub const AUTO_SAVE: &str = "COUNTRY_REGISTRY_AUTO_SAVE";

    /// Maximum number of records printed per listing
    pub const RESULT_LIMIT: &str = "COUNTRY_REGISTRY_RESULT_LIMIT";
}

/// CSV backing file layout
pub mod csv_format {
    /// Header for the country name column
    pub const NAME: &str = "name";

    /// Header for the population column
    pub const POPULATION: &str = "population";

    /// Header for the area (km²) column
    pub const AREA: &str = "area";

    /// Header for the continent column
    pub const CONTINENT: &str = "continent";

    /// Column order used when writing
    pub const HEADERS: [&str; 4] = [NAME, POPULATION, AREA, CONTINENT];

    /// Legacy header names accepted on read, in the same order as `HEADERS`
    pub const LEGACY_HEADERS: [&str; 4] = ["nombre", "poblacion", "superficie", "continente"];

    /// UTF-8 byte-order mark tolerated at the start of the header row
    pub const BOM: char = '\u{feff}';
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file name
    pub const LOCAL_FILE: &str = "country-registry.toml";

    /// Directory name under the user config directory
    pub const APP_DIR: &str = "country-registry";

    /// Configuration file name under `APP_DIR`
    pub const FILE_NAME: &str = "config.toml";
}

/// Defaults
pub mod defaults {
    /// Data file used when none is given
    pub const DATA_PATH: &str = "data/countries.csv";

    /// Save automatically after add/update
    pub const AUTO_SAVE: bool = true;

    /// Maximum records printed per listing
    pub const RESULT_LIMIT: usize = 50;

    /// Digit group separator for displayed numbers
    pub const THOUSANDS_SEPARATOR: char = '.';

    /// Log level when no CLI flag is given
    pub const LOG_LEVEL: &str = "warn";
}

// Re-export commonly used constants at the top level for convenience
pub use defaults::{DATA_PATH as DEFAULT_DATA_PATH, RESULT_LIMIT as DEFAULT_RESULT_LIMIT};
pub use env::{AUTO_SAVE as ENV_AUTO_SAVE, DATA_PATH as ENV_DATA_PATH};
