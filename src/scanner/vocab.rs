//! Annotation and naming vocabularies the extractors classify against.
//!
//! Each table maps a name to its role; adding a framework means adding rows,
//! not branches.

/// What a mapping annotation contributes to an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRole {
    /// Fixes the verb and carries the path (`@GetMapping("/x")`).
    VerbMapping(&'static str),
    /// Carries the path and optionally a `method` element (`@RequestMapping`).
    GenericMapping,
    /// Fixes the verb only (JAX-RS `@GET`).
    Verb(&'static str),
    /// Carries the path only (JAX-RS `@Path`).
    PathOnly,
}

pub struct RouteAnnotation {
    pub name: &'static str,
    pub role: RouteRole,
}

/// Class-level annotations that make every method of the class an endpoint.
pub static CONTROLLER_ANNOTATIONS: &[&str] = &["RestController", "Controller", "Path", "WebServlet"];

/// Class-level annotations that carry the route prefix.
pub static CLASS_PATH_ANNOTATIONS: &[&str] = &["RequestMapping", "Path"];

pub static ROUTE_ANNOTATIONS: &[RouteAnnotation] = &[
    RouteAnnotation {
        name: "GetMapping",
        role: RouteRole::VerbMapping("GET"),
    },
    RouteAnnotation {
        name: "PostMapping",
        role: RouteRole::VerbMapping("POST"),
    },
    RouteAnnotation {
        name: "PutMapping",
        role: RouteRole::VerbMapping("PUT"),
    },
    RouteAnnotation {
        name: "DeleteMapping",
        role: RouteRole::VerbMapping("DELETE"),
    },
    RouteAnnotation {
        name: "PatchMapping",
        role: RouteRole::VerbMapping("PATCH"),
    },
    RouteAnnotation {
        name: "RequestMapping",
        role: RouteRole::GenericMapping,
    },
    RouteAnnotation {
        name: "GET",
        role: RouteRole::Verb("GET"),
    },
    RouteAnnotation {
        name: "POST",
        role: RouteRole::Verb("POST"),
    },
    RouteAnnotation {
        name: "PUT",
        role: RouteRole::Verb("PUT"),
    },
    RouteAnnotation {
        name: "DELETE",
        role: RouteRole::Verb("DELETE"),
    },
    RouteAnnotation {
        name: "PATCH",
        role: RouteRole::Verb("PATCH"),
    },
    RouteAnnotation {
        name: "Path",
        role: RouteRole::PathOnly,
    },
];

/// Annotations that mark a class or method as scheduled/batch work.
pub static BATCH_ANNOTATIONS: &[&str] = &["Scheduled", "Schedule", "Quartz", "BatchJob", "Job"];

/// Class-name substrings that suggest batch work.
pub static BATCH_CLASS_PATTERNS: &[&str] = &[
    "BatchJob",
    "Job",
    "Processor",
    "Reader",
    "Writer",
    "TaskExecutor",
    "Scheduler",
    "QuartzJob",
];

/// Markup fragments of a Spring Batch XML job definition.
pub static BATCH_XML_MARKERS: &[&str] = &["<job", "<step", "<tasklet"];

pub fn route_role(annotation: &str) -> Option<RouteRole> {
    ROUTE_ANNOTATIONS
        .iter()
        .find(|entry| entry.name == annotation)
        .map(|entry| entry.role)
}

/// Whether the annotation alone qualifies a method as an endpoint.
/// `@Path` is a route annotation but only sets the path.
pub fn is_method_route_marker(annotation: &str) -> bool {
    matches!(
        route_role(annotation),
        Some(RouteRole::VerbMapping(_) | RouteRole::GenericMapping | RouteRole::Verb(_))
    )
}

pub fn is_controller_annotation(annotation: &str) -> bool {
    CONTROLLER_ANNOTATIONS.contains(&annotation)
}

pub fn is_class_path_annotation(annotation: &str) -> bool {
    CLASS_PATH_ANNOTATIONS.contains(&annotation)
}

pub fn is_batch_annotation(annotation: &str) -> bool {
    BATCH_ANNOTATIONS.contains(&annotation)
}

pub fn matches_batch_class_name(class_name: &str) -> bool {
    BATCH_CLASS_PATTERNS
        .iter()
        .any(|pattern| class_name.contains(pattern))
}

pub fn has_batch_xml_marker(content: &str) -> bool {
    BATCH_XML_MARKERS.iter().any(|marker| content.contains(marker))
}
