use crate::scanner::scan::ScannedFile;
use crate::util;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

static ARTIFACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<artifactId>(.*?)</artifactId>").expect("valid artifact regex"));

static GRADLE_DEP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:implementation|compile) ['"]([^:]+:[^:]+:[^'"]+)['"]"#)
        .expect("valid gradle dependency regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    Maven,
    Gradle,
}

pub fn manifest_kind(path: &Path) -> Option<ManifestKind> {
    match path.file_name().and_then(|name| name.to_str())? {
        "pom.xml" => Some(ManifestKind::Maven),
        "build.gradle" | "build.gradle.kts" => Some(ManifestKind::Gradle),
        _ => None,
    }
}

/// Library identifiers declared across every manifest, sorted and deduplicated.
/// Unreadable manifests are skipped.
pub fn probe_libraries(manifests: &[ScannedFile]) -> Vec<String> {
    let mut libraries = BTreeSet::new();
    for manifest in manifests {
        let Some(kind) = manifest_kind(&manifest.abs_path) else {
            continue;
        };
        let content = match util::read_to_string(&manifest.abs_path) {
            Ok(content) => content,
            Err(err) => {
                tracing::debug!("skipping manifest {}: {err:#}", manifest.rel_path);
                continue;
            }
        };
        libraries.extend(libraries_in(kind, &content));
    }
    libraries.into_iter().collect()
}

pub fn libraries_in(kind: ManifestKind, content: &str) -> Vec<String> {
    let re = match kind {
        ManifestKind::Maven => &*ARTIFACT_RE,
        ManifestKind::Gradle => &*GRADLE_DEP_RE,
    };
    re.captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|value| value.as_str().trim().to_string())
        .filter(|value| !value.is_empty() && !value.starts_with("${"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maven_artifacts() {
        let pom = r#"
<project>
  <artifactId>${project.name}</artifactId>
  <dependencies>
    <dependency><groupId>org.springframework.boot</groupId><artifactId>spring-boot-starter-web</artifactId></dependency>
    <dependency><artifactId>spring-batch-core</artifactId></dependency>
  </dependencies>
</project>
"#;
        assert_eq!(
            libraries_in(ManifestKind::Maven, pom),
            vec!["spring-boot-starter-web", "spring-batch-core"]
        );
    }

    #[test]
    fn gradle_coordinates() {
        let gradle = r#"
dependencies {
    implementation 'org.quartz-scheduler:quartz:2.3.2'
    compile "javax.ws.rs:javax.ws.rs-api:2.1"
    testImplementation 'junit:junit:4.13'
}
"#;
        assert_eq!(
            libraries_in(ManifestKind::Gradle, gradle),
            vec![
                "org.quartz-scheduler:quartz:2.3.2",
                "javax.ws.rs:javax.ws.rs-api:2.1",
            ]
        );
    }

    #[test]
    fn kinds_by_file_name() {
        assert_eq!(manifest_kind(Path::new("a/pom.xml")), Some(ManifestKind::Maven));
        assert_eq!(manifest_kind(Path::new("build.gradle.kts")), Some(ManifestKind::Gradle));
        assert_eq!(manifest_kind(Path::new("settings.gradle")), None);
    }
}
