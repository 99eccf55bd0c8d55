use crate::model::DirectoryNode;
use crate::scanner::scan::{self, ScanOptions};
use crate::util;
use std::fs;
use std::path::Path;

/// Skipped by the tree view in addition to the configured build directories.
static EXTRA_SKIPPED_DIRS: &[&str] = &["bin", "out"];

/// Mirrors the directory tree, keeping only source files and the directories
/// that still contain one. The root is always returned.
pub fn build_structure(root: &Path, options: &ScanOptions) -> DirectoryNode {
    let name = util::base_name(root);
    build_node(root, root, options)
        .unwrap_or_else(|| DirectoryNode::directory(name, ".".to_string(), Vec::new()))
}

fn build_node(root: &Path, path: &Path, options: &ScanOptions) -> Option<DirectoryNode> {
    let name = util::base_name(path);
    let rel_path = util::normalize_rel_path(root, path).ok()?;
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!("cannot list {}: {err}", path.display());
            return None;
        }
    };
    let mut children = Vec::new();
    for entry in entries.flatten() {
        let child_name = entry.file_name().to_string_lossy().to_string();
        if is_skipped(&child_name, options) {
            continue;
        }
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let child_path = entry.path();
        if file_type.is_dir() {
            if let Some(node) = build_node(root, &child_path, options) {
                children.push(node);
            }
        } else if file_type.is_file() && scan::is_source_path(&child_path) {
            if let Ok(child_rel) = util::normalize_rel_path(root, &child_path) {
                children.push(DirectoryNode::file(child_name, child_rel));
            }
        }
    }
    if children.is_empty() {
        None
    } else {
        Some(DirectoryNode::directory(name, rel_path, children))
    }
}

fn is_skipped(name: &str, options: &ScanOptions) -> bool {
    name.starts_with('.')
        || options.excluded_dirs.iter().any(|dir| dir == name)
        || EXTRA_SKIPPED_DIRS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::NodeKind;

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "class X {}").unwrap();
    }

    #[test]
    fn prunes_empty_and_non_source_branches() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/main/java/com/acme/App.java");
        write(root, "src/main/resources/application.yml");
        write(root, "docs/readme.md");
        write(root, "out/Gen.java");
        write(root, ".git/Hooks.java");
        fs::create_dir_all(root.join("empty/nested")).unwrap();

        let tree = build_structure(root, &ScanOptions::from_config(&Config::default()));
        assert_eq!(tree.kind, NodeKind::Directory);
        assert_eq!(tree.path, ".");
        assert_eq!(tree.file_paths(), vec!["src/main/java/com/acme/App.java"]);
        let top: Vec<_> = tree.children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(top, vec!["src"]);
        let main = &tree.children()[0].children()[0];
        assert_eq!(main.name, "main");
        assert_eq!(main.path, "src/main");
        assert_eq!(main.children().len(), 1);
    }

    #[test]
    fn empty_project_still_has_a_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        let tree = build_structure(dir.path(), &ScanOptions::from_config(&Config::default()));
        assert_eq!(tree.name, util::base_name(dir.path()));
        assert_eq!(tree.kind, NodeKind::Directory);
        assert!(tree.children().is_empty());
    }
}
