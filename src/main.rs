use clap::Parser;

mod cli;
mod commands;
mod domain;
mod services;

pub use cli::{Cli, Commands, ResultFilter, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use domain::models::*;
pub use services::client::{ApiClient, SubmissionError};
pub use services::output::{print_failure, print_one};
pub use services::render::{
    apply_filter, render_and_record, render_cards, render_summary, NO_VIOLATIONS_TEXT,
};
pub use services::report::NoResultError;
pub use services::staging::format_file_size;
pub use services::storage::{load_config, load_state, save_state, AuditLock, StateError};
pub use services::{render, report, staging, stats, storage};

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = commands::handle_command(&cli) {
        print_failure(cli.json, &err);
        std::process::exit(1);
    }
}
