use crate::config::BatchRecordMode;
use crate::model::BatchProcess;
use crate::scanner::ScanContext;
use crate::scanner::java::{Annotation, SourceUnit};
use crate::scanner::vocab;
use regex::Regex;
use std::sync::LazyLock;

pub const UNKNOWN_KIND: &str = "Unknown";
pub const BATCH_CLASS_KIND: &str = "Batch Class";
pub const XML_CONFIG_KIND: &str = "Spring Batch XML Configuration";

static JOB_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<job[^>]*id=['"](.*?)['"]"#).expect("valid job id regex")
});

/// One rule firing. `None` fields leave an earlier value in place when merged.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BatchHit {
    kind: String,
    class_name: Option<String>,
    method: Option<String>,
    details: Option<String>,
}

/// Runs the four detection rules over a unit in fixed order:
/// class name, class annotation, method annotation, embedded job markup.
pub fn extract_batch(unit: &SourceUnit, content: &str, mode: BatchRecordMode, ctx: &mut ScanContext) {
    let hits = detect(unit, content);
    if hits.is_empty() {
        return;
    }
    match mode {
        BatchRecordMode::Merged => ctx.batch_processes.push(merge(&unit.rel_path, hits)),
        BatchRecordMode::PerRule => {
            for hit in hits {
                ctx.batch_processes.push(BatchProcess {
                    kind: hit.kind,
                    class_name: hit.class_name,
                    method: hit.method,
                    details: hit.details.unwrap_or_default(),
                    file: unit.rel_path.clone(),
                });
            }
        }
    }
}

fn detect(unit: &SourceUnit, content: &str) -> Vec<BatchHit> {
    let mut hits = Vec::new();
    for class in &unit.classes {
        if vocab::matches_batch_class_name(&class.name) {
            hits.push(BatchHit {
                kind: BATCH_CLASS_KIND.to_string(),
                class_name: Some(class.name.clone()),
                method: None,
                details: None,
            });
        }
        for annotation in &class.annotations {
            if !vocab::is_batch_annotation(&annotation.name) {
                continue;
            }
            hits.push(BatchHit {
                kind: format!("{BATCH_CLASS_KIND} ({})", annotation.name),
                class_name: Some(class.name.clone()),
                method: None,
                details: annotation_details(annotation),
            });
        }
        for method in &class.methods {
            for annotation in &method.annotations {
                if !vocab::is_batch_annotation(&annotation.name) {
                    continue;
                }
                hits.push(BatchHit {
                    kind: format!("Scheduled Method ({})", annotation.name),
                    class_name: Some(class.name.clone()),
                    method: Some(method.name.clone()),
                    details: annotation_details(annotation),
                });
            }
        }
    }
    if vocab::has_batch_xml_marker(content) {
        hits.push(BatchHit {
            kind: XML_CONFIG_KIND.to_string(),
            class_name: None,
            method: None,
            details: job_id(content).map(|id| format!("Job ID: {id}")),
        });
    }
    hits
}

/// Marker annotations carry no details; anything with arguments yields its first value.
fn annotation_details(annotation: &Annotation) -> Option<String> {
    if annotation.elements.is_empty() {
        return None;
    }
    Some(annotation.value().unwrap_or_default().to_string())
}

fn job_id(content: &str) -> Option<String> {
    JOB_ID_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

fn merge(file: &str, hits: Vec<BatchHit>) -> BatchProcess {
    let mut record = BatchProcess {
        kind: UNKNOWN_KIND.to_string(),
        class_name: None,
        method: None,
        details: String::new(),
        file: file.to_string(),
    };
    for hit in hits {
        record.kind = hit.kind;
        if hit.class_name.is_some() {
            record.class_name = hit.class_name;
        }
        if hit.method.is_some() {
            record.method = hit.method;
        }
        if let Some(details) = hit.details {
            record.details = details;
        }
    }
    record
}
