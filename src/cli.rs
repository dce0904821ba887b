use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Parser, Debug)]
#[command(name = "compa", version, about = "Compliance Agent CLI")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Audit API base address (overrides config.toml, default http://localhost:8000)"
    )]
    pub api: Option<String>,
    #[arg(
        long,
        global = true,
        help = "Network deadline in seconds for audit submissions (overrides config.toml)"
    )]
    pub timeout: Option<u64>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Status,
    Stage {
        file: PathBuf,
        #[arg(long, help = "Declared MIME type, for files whose extension is unreliable")]
        content_type: Option<String>,
    },
    Staged,
    Unstage,
    Audit,
    Results {
        #[arg(long, value_enum, default_value_t = ResultFilter::All)]
        filter: ResultFilter,
    },
    Stats,
    Report {
        #[arg(long, help = "Write the report here instead of audit-report-<ts>.txt")]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = false, help = "Print the report instead of writing a file")]
        stdout: bool,
    },
    Theme {
        value: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResultFilter {
    All,
    Violations,
    Compliant,
}
