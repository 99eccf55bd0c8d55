use crate::model::{
    ApiEndpoint, BatchProcess, ClassFact, DependencyRecord, FileRole, MethodFact, ProjectSummary,
    ScanResult, ScanStats,
};
use crate::util;
use anyhow::{Result, bail};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub mod api;
pub mod batch;
pub mod classify;
pub mod deps;
pub mod java;
pub mod manifest;
pub mod members;
pub mod relations;
pub mod scan;
pub mod structure;
pub mod vocab;

pub const DEFAULT_PACKAGE: &str = "default";

/// Accumulators for one scan. Owned by [`Scanner::scan`] and handed to each
/// extraction pass in turn; nothing here outlives the scan.
#[derive(Debug, Default)]
pub struct ScanContext {
    pub apis: Vec<ApiEndpoint>,
    pub classes: Vec<ClassFact>,
    pub functions: BTreeMap<String, Vec<MethodFact>>,
    pub batch_processes: Vec<BatchProcess>,
    pub dependencies: BTreeMap<String, DependencyRecord>,
}

pub struct Scanner {
    root: PathBuf,
    options: scan::ScanOptions,
    parser: java::JavaParser,
}

impl Scanner {
    pub fn new(root: PathBuf) -> Result<Self> {
        Self::new_with_options(root, scan::ScanOptions::default())
    }

    pub fn new_with_options(root: PathBuf, options: scan::ScanOptions) -> Result<Self> {
        if !root.is_dir() {
            bail!("project root {} is not a directory", root.display());
        }
        let root = std::fs::canonicalize(&root).unwrap_or(root);
        Ok(Self {
            root,
            options,
            parser: java::JavaParser::new()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs every pass to completion. Per-file read and parse failures are
    /// logged and counted; only an unreadable root fails the scan.
    pub fn scan(&mut self) -> Result<ScanResult> {
        let start = Instant::now();
        let collected = scan::collect_sources(&self.root, &self.options)?;
        let mut ctx = ScanContext::default();
        let mut stats = ScanStats::default();
        let mut units = Vec::new();
        let mut total_lines = 0;
        let mut file_roles = BTreeMap::new();

        for file in &collected.sources {
            if file.size > self.options.max_file_bytes {
                tracing::warn!(
                    "skipping {} ({} bytes exceeds limit {})",
                    file.rel_path,
                    file.size,
                    self.options.max_file_bytes
                );
                stats.skipped_large += 1;
                continue;
            }
            let content = match util::read_to_string(&file.abs_path) {
                Ok(content) => content,
                Err(err) => {
                    tracing::warn!("error reading {}: {err:#}", file.rel_path);
                    stats.failed += 1;
                    stats.failed_files.push(file.rel_path.clone());
                    continue;
                }
            };
            total_lines += util::line_count(&content);
            file_roles.insert(file.rel_path.clone(), role_for(&file.abs_path, &content));

            let unit = match self.parser.parse(&file.rel_path, &content) {
                Ok(unit) => unit,
                Err(err) => {
                    tracing::warn!("error parsing {}: {err:#}", file.rel_path);
                    stats.failed += 1;
                    stats.failed_files.push(file.rel_path.clone());
                    continue;
                }
            };
            tracing::debug!("parsed {} ({} classes)", file.rel_path, unit.classes.len());
            api::extract_endpoints(&unit, &mut ctx);
            members::extract_methods(&unit, &mut ctx);
            batch::extract_batch(&unit, &content, self.options.batch_records, &mut ctx);
            stats.parsed += 1;
            units.push(unit);
        }

        deps::analyze(&units, &mut ctx);
        let packages = group_by_package(&units);
        drop(units);

        let structure = structure::build_structure(&self.root, &self.options);
        let libraries_used = manifest::probe_libraries(&collected.manifests);
        let relations = relations::derive_relations(&ctx.dependencies, &ctx.functions);

        let project_summary = ProjectSummary {
            total_files: collected.total_files,
            source_files: collected.sources.len(),
            total_classes: ctx.classes.len(),
            total_lines,
            batch_jobs: ctx.batch_processes.len(),
            apis_count: ctx.apis.len(),
            libraries_used,
        };
        tracing::info!(
            "scanned {} source files ({} parsed, {} failed) in {:?}: {} classes, {} endpoints, {} batch",
            project_summary.source_files,
            stats.parsed,
            stats.failed,
            start.elapsed(),
            project_summary.total_classes,
            project_summary.apis_count,
            project_summary.batch_jobs
        );

        Ok(ScanResult {
            structure,
            file_types_count: collected.extension_counts,
            apis: ctx.apis,
            classes: ctx.classes,
            functions: ctx.functions,
            batch_processes: ctx.batch_processes,
            dependencies: ctx.dependencies,
            relations,
            source_files: collected
                .sources
                .iter()
                .map(|file| file.rel_path.clone())
                .collect(),
            file_roles,
            packages,
            project_summary,
            stats,
        })
    }
}

fn role_for(path: &Path, content: &str) -> FileRole {
    let name = util::base_name(path);
    classify::classify_file(&name, content)
}

fn group_by_package(units: &[java::SourceUnit]) -> BTreeMap<String, Vec<String>> {
    let mut packages: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for unit in units {
        let package = if unit.package.is_empty() {
            DEFAULT_PACKAGE.to_string()
        } else {
            unit.package.clone()
        };
        let file_name = unit.rel_path.rsplit('/').next().unwrap_or(&unit.rel_path);
        packages.entry(package).or_default().push(file_name.to_string());
    }
    packages
}
