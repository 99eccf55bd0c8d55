use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ClassFact {
    pub name: String,
    pub qualified_name: String,
    pub package: String,
    pub annotations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub file: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct MethodFact {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<String>,
    pub file: String,
    pub visibility: Visibility,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    #[serde(rename = "class")]
    pub class_name: String,
    pub method: String,
    pub http_method: String,
    pub path: String,
    pub file: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct BatchProcess {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "class", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub details: String,
    pub file: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    pub file: String,
    pub package: String,
    pub imports: Vec<String>,
    pub uses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    pub implements: Vec<String>,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Directory,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DirectoryNode>>,
}

impl DirectoryNode {
    pub fn file(name: String, path: String) -> Self {
        Self {
            name,
            path,
            kind: NodeKind::File,
            children: None,
        }
    }

    pub fn directory(name: String, path: String, children: Vec<DirectoryNode>) -> Self {
        Self {
            name,
            path,
            kind: NodeKind::Directory,
            children: Some(children),
        }
    }

    pub fn children(&self) -> &[DirectoryNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Depth-first list of file paths below this node.
    pub fn file_paths(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_file_paths(self, &mut out);
        out
    }
}

fn collect_file_paths<'a>(node: &'a DirectoryNode, out: &mut Vec<&'a str>) {
    match node.kind {
        NodeKind::File => out.push(node.path.as_str()),
        NodeKind::Directory => {
            for child in node.children() {
                collect_file_paths(child, out);
            }
        }
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Generalization,
    Implementation,
    Aggregation,
    Association,
}

impl RelationKind {
    pub fn verb(self) -> &'static str {
        match self {
            RelationKind::Generalization => "extends",
            RelationKind::Implementation => "implements",
            RelationKind::Aggregation => "aggregation",
            RelationKind::Association => "association",
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    pub description: String,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Entity,
    Controller,
    Service,
    Repository,
    #[serde(rename = "DTO")]
    Dto,
    #[serde(rename = "Batch/Job")]
    BatchJob,
    Configuration,
    Test,
    #[serde(rename = "Main Class")]
    MainClass,
    Exception,
    Utility,
    Other,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ProjectSummary {
    pub total_files: usize,
    pub source_files: usize,
    pub total_classes: usize,
    pub total_lines: usize,
    pub batch_jobs: usize,
    pub apis_count: usize,
    pub libraries_used: Vec<String>,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub parsed: usize,
    pub failed: usize,
    pub skipped_large: usize,
    pub failed_files: Vec<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ScanResult {
    pub structure: DirectoryNode,
    pub file_types_count: BTreeMap<String, usize>,
    pub apis: Vec<ApiEndpoint>,
    pub classes: Vec<ClassFact>,
    pub functions: BTreeMap<String, Vec<MethodFact>>,
    pub batch_processes: Vec<BatchProcess>,
    pub dependencies: BTreeMap<String, DependencyRecord>,
    pub relations: Vec<Relationship>,
    pub source_files: Vec<String>,
    pub file_roles: BTreeMap<String, FileRole>,
    pub packages: BTreeMap<String, Vec<String>>,
    pub project_summary: ProjectSummary,
    pub stats: ScanStats,
}

impl ScanResult {
    /// Extension counts ordered by descending count, then extension.
    pub fn extensions_by_count(&self) -> Vec<(&str, usize)> {
        let mut out: Vec<(&str, usize)> = self
            .file_types_count
            .iter()
            .map(|(ext, count)| (ext.as_str(), *count))
            .collect();
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        out
    }

    /// Stable digest of the JSON rendering of every fact table.
    pub fn digest(&self) -> anyhow::Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}
