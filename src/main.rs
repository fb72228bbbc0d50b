//! Country Registry CLI application
//!
//! Command-line interface for searching, filtering, sorting and editing a
//! CSV file of country records.

use std::io::{self, Write};
use std::process;

use tracing::{debug, info};
use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

use country_registry::cli::{
    handle_add, handle_config, handle_count, handle_filter, handle_search, handle_sort,
    handle_stats, handle_update, open_session, Cli, Commands, Renderer, Shell,
};
use country_registry::config::AppConfig;
use country_registry::errors::Result;

fn main() {
    // Initialize program
    let result = run();

    // Handle any errors that occurred
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok(); // Ignore errors if file doesn't exist

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Flags take precedence over the file, so configuration comes first.
    // Nothing is logged until the subscriber below is installed.
    let mut config = AppConfig::load(cli.global.config.as_deref())?;
    if let Some(path) = &cli.global.data {
        config.data.path = path.clone();
    }

    init_logging(&cli, &config);

    info!("Country Registry v{} starting", env!("CARGO_PKG_VERSION"));
    match &config.source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }
    debug!("Using data file {}", config.data.path.display());

    let renderer = Renderer::from_config(&config.display);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Execute the appropriate command
    match cli.command() {
        Commands::Shell => {
            info!("Starting interactive shell");
            let stdin = io::stdin();
            let mut shell = Shell::new(&config, stdin.lock(), &mut out);
            shell.run()
        }
        Commands::Count => handle_count(&open_session(&config)?, &mut out),
        Commands::Search(args) => handle_search(&open_session(&config)?, &args, &renderer, &mut out),
        Commands::Filter(args) => handle_filter(&open_session(&config)?, &args, &renderer, &mut out),
        Commands::Sort(args) => handle_sort(&open_session(&config)?, &args, &renderer, &mut out),
        Commands::Stats(args) => handle_stats(&open_session(&config)?, &args, &renderer, &mut out),
        Commands::Add(args) => {
            info!("Executing add command");
            handle_add(&mut open_session(&config)?, &args, &mut out)
        }
        Commands::Update(args) => {
            info!("Executing update command");
            handle_update(&mut open_session(&config)?, &args, &renderer, &mut out)
        }
        Commands::Config(args) => handle_config(&args, &config, &mut out),
    }?;

    out.flush()?;
    Ok(())
}

/// Initialize logging from CLI verbosity flags, falling back to the configured level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let log_level = cli
        .log_level()
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| config.logging.level.clone());

    // Create environment filter
    let mut filter = EnvFilter::from_default_env();
    match format!("country_registry={}", log_level).parse::<Directive>() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log level '{}': {}", log_level, e),
    }

    // Initialize subscriber
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
