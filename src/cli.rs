use crate::config::BatchRecordMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "jlens",
    version,
    about = "Java enterprise project scanner",
    after_help = r#"Examples:
  jlens scan --root ./extracted
  jlens summary --root .
  jlens report --root . --section apis
  jlens report --root . --section batch --batch-records per-rule
"#
)]
pub struct Args {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Clone)]
pub struct ScanArgs {
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    /// Skip files ignored by .gitignore.
    #[arg(long)]
    pub respect_gitignore: bool,
    /// How batch detections within one file are recorded.
    #[arg(long, value_enum)]
    pub batch_records: Option<BatchRecordMode>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan a project and print every fact table as JSON.
    Scan {
        #[command(flatten)]
        scan: ScanArgs,
        /// Print single-line JSON.
        #[arg(long)]
        compact: bool,
    },
    /// Print the project summary and scan statistics.
    Summary {
        #[command(flatten)]
        scan: ScanArgs,
    },
    /// Print a single section of the scan result.
    Report {
        #[command(flatten)]
        scan: ScanArgs,
        #[arg(long, value_enum)]
        section: Section,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    Apis,
    Methods,
    Classes,
    Batch,
    Deps,
    Relations,
    Structure,
    Files,
    Roles,
    Packages,
    Extensions,
}
