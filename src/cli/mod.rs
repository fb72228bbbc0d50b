//! Command-line interface components
//!
//! This module contains CLI-specific code for the Country Registry
//! application: argument parsing, one-shot command handlers, the interactive
//! shell and terminal rendering.

pub mod args;
pub mod commands;
pub mod display;
pub mod shell;

pub use args::{
    AddArgs, Cli, Commands, ConfigAction, ConfigArgs, FilterArgs, FilterTarget, GlobalArgs,
    SearchArgs, SortArgs, StatsArgs, UpdateArgs,
};
pub use commands::{
    handle_add, handle_config, handle_count, handle_filter, handle_search, handle_sort,
    handle_stats, handle_update, open_session,
};
pub use display::Renderer;
pub use shell::{continent_choices, Shell};
