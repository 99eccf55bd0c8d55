use crate::config::{BatchRecordMode, Config};
use anyhow::Result;
use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub size: u64,
    pub kind: &'static str,
}

#[derive(Debug, Clone)]
pub struct SourceSpec {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub respect_gitignore: bool,
    pub excluded_dirs: Vec<String>,
    pub max_file_bytes: u64,
    pub batch_records: BatchRecordMode,
}

impl ScanOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            respect_gitignore: false,
            excluded_dirs: config.excluded_dirs.clone(),
            max_file_bytes: config.max_file_bytes,
            batch_records: config.batch_records,
        }
    }

    pub fn with_batch_records(mut self, mode: BatchRecordMode) -> Self {
        self.batch_records = mode;
        self
    }

    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::from_config(Config::get())
    }
}

/// Everything the collector finds in one walk.
#[derive(Debug, Default)]
pub struct CollectedSources {
    pub sources: Vec<ScannedFile>,
    pub manifests: Vec<ScannedFile>,
    /// Count of every non-hidden file by extension, not only sources.
    pub extension_counts: BTreeMap<String, usize>,
    /// Files with an extension anywhere under the root, hidden and build
    /// directories included.
    pub total_files: usize,
}

static SOURCE_SPECS: &[SourceSpec] = &[SourceSpec {
    name: "java",
    extensions: &["java"],
}];

static MANIFEST_NAMES: &[&str] = &["pom.xml", "build.gradle", "build.gradle.kts"];

pub fn collect_sources(root: &Path, options: &ScanOptions) -> Result<CollectedSources> {
    let mut collected = CollectedSources::default();
    let mut builder = WalkBuilder::new(root);
    if options.respect_gitignore {
        builder
            .ignore(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .parents(true)
            .require_git(false);
    } else {
        builder
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false);
    }
    let excluded = options.excluded_dirs.clone();
    let walker = builder
        .hidden(true)
        .filter_entry(move |entry| !is_excluded_dir(entry, &excluded))
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("walk error: {err}");
                continue;
            }
        };
        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        if let Some(ext) = path.extension().and_then(|ext| ext.to_str()) {
            *collected.extension_counts.entry(ext.to_string()).or_insert(0) += 1;
        }
        let kind = if let Some(kind) = detect_source_kind(path) {
            kind
        } else if is_manifest(path) {
            "manifest"
        } else {
            continue;
        };
        let rel_path = crate::util::normalize_rel_path(root, path)?;
        let size = entry.metadata().map(|meta| meta.len()).unwrap_or(0);
        let file = ScannedFile {
            rel_path,
            abs_path: path.to_path_buf(),
            size,
            kind,
        };
        if kind == "manifest" {
            collected.manifests.push(file);
        } else {
            collected.sources.push(file);
        }
    }
    collected.sources.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    collected.manifests.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    collected.total_files = count_all_files(root);
    Ok(collected)
}

/// Unfiltered walk: no hidden, ignore-file or excluded-directory pruning.
fn count_all_files(root: &Path) -> usize {
    WalkBuilder::new(root)
        .standard_filters(false)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!("walk error while counting files: {err}");
                None
            }
        })
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .filter(|entry| entry.path().extension().is_some())
        .count()
}

fn is_excluded_dir(entry: &ignore::DirEntry, excluded: &[String]) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    if !entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    excluded.iter().any(|dir| *dir == name)
}

fn detect_source_kind(path: &Path) -> Option<&'static str> {
    let ext = path.extension().and_then(|ext| ext.to_str())?;
    for spec in SOURCE_SPECS {
        if spec.extensions.iter().any(|candidate| *candidate == ext) {
            return Some(spec.name);
        }
    }
    None
}

pub fn is_source_path(path: &Path) -> bool {
    detect_source_kind(path).is_some()
}

fn is_manifest(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| MANIFEST_NAMES.contains(&name))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn skips_hidden_and_build_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/main/java/App.java", "class App {}");
        write(root, "src/main/resources/app.properties", "a=b");
        write(root, "target/classes/Gen.java", "class Gen {}");
        write(root, "module/build/Out.java", "class Out {}");
        write(root, ".idea/Hidden.java", "class Hidden {}");
        write(root, "src/.Secret.java", "class Secret {}");
        write(root, "pom.xml", "<project/>");

        let collected = collect_sources(root, &ScanOptions::from_config(&Config::default())).unwrap();
        let paths: Vec<_> = collected.sources.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(paths, vec!["src/main/java/App.java"]);
        assert_eq!(collected.manifests.len(), 1);
        assert_eq!(collected.manifests[0].rel_path, "pom.xml");
        assert_eq!(collected.extension_counts.get("java"), Some(&1));
        assert_eq!(collected.extension_counts.get("properties"), Some(&1));
        assert_eq!(collected.extension_counts.get("xml"), Some(&1));
        assert_eq!(collected.total_files, 7);
    }

    #[test]
    fn empty_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let collected = collect_sources(dir.path(), &ScanOptions::from_config(&Config::default())).unwrap();
        assert!(collected.sources.is_empty());
        assert!(collected.extension_counts.is_empty());
        assert_eq!(collected.total_files, 0);
    }
}
