use anyhow::Result;
use clap::Parser;
use jlens::cli::{self, Section};
use jlens::config::Config;
use jlens::model::ScanResult;
use jlens::scanner::{Scanner, scan::ScanOptions};
use serde_json::{Value, json};

fn run_scan(args: &cli::ScanArgs) -> Result<ScanResult> {
    let mut options =
        ScanOptions::from_config(Config::get()).with_gitignore(args.respect_gitignore);
    if let Some(mode) = args.batch_records {
        options = options.with_batch_records(mode);
    }
    let mut scanner = Scanner::new_with_options(args.root.clone(), options)?;
    tracing::info!("scanning {}", scanner.root().display());
    scanner.scan()
}

fn section_value(result: &ScanResult, section: Section) -> Result<Value> {
    let value = match section {
        Section::Apis => serde_json::to_value(&result.apis)?,
        Section::Methods => serde_json::to_value(&result.functions)?,
        Section::Classes => serde_json::to_value(&result.classes)?,
        Section::Batch => serde_json::to_value(&result.batch_processes)?,
        Section::Deps => serde_json::to_value(&result.dependencies)?,
        Section::Relations => serde_json::to_value(&result.relations)?,
        Section::Structure => serde_json::to_value(&result.structure)?,
        Section::Files => serde_json::to_value(&result.source_files)?,
        Section::Roles => serde_json::to_value(&result.file_roles)?,
        Section::Packages => serde_json::to_value(&result.packages)?,
        Section::Extensions => Value::Array(
            result
                .extensions_by_count()
                .into_iter()
                .map(|(ext, count)| json!({ "extension": ext, "count": count }))
                .collect(),
        ),
    };
    Ok(value)
}

fn main() -> Result<()> {
    let args = cli::Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    match args.command {
        cli::Command::Scan { scan, compact } => {
            let result = run_scan(&scan)?;
            if compact {
                println!("{}", serde_json::to_string(&result)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            Ok(())
        }
        cli::Command::Summary { scan } => {
            let result = run_scan(&scan)?;
            let value = json!({
                "project_summary": result.project_summary,
                "stats": result.stats,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        cli::Command::Report { scan, section } => {
            let result = run_scan(&scan)?;
            let value = section_value(&result, section)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
    }
}
