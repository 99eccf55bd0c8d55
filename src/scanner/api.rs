use crate::model::ApiEndpoint;
use crate::scanner::ScanContext;
use crate::scanner::java::{ClassDecl, MethodDecl, SourceUnit};
use crate::scanner::vocab::{self, RouteRole};
use crate::util;

pub const DEFAULT_HTTP_METHOD: &str = "GET";

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "HEAD"];

pub fn normalize_method(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('"');
    if trimmed.is_empty() {
        return None;
    }
    let upper = util::short_name(trimmed).to_ascii_uppercase();
    if HTTP_METHODS.iter().any(|method| *method == upper) {
        return Some(upper);
    }
    None
}

/// Literal join: no slash handling, and an empty method path leaves the prefix alone.
pub fn join_route(class_path: &str, method_path: &str) -> String {
    if method_path.is_empty() {
        class_path.to_string()
    } else {
        format!("{class_path}{method_path}")
    }
}

/// Visibility is not consulted: a private mapped method is still an endpoint.
pub fn extract_endpoints(unit: &SourceUnit, ctx: &mut ScanContext) {
    for class in &unit.classes {
        let is_controller = is_rest_controller(class);
        let class_path = class_route_prefix(class).unwrap_or_default();
        for method in &class.methods {
            let annotated = method
                .annotations
                .iter()
                .any(|annotation| vocab::is_method_route_marker(&annotation.name));
            if !annotated && !is_controller {
                continue;
            }
            let (http_method, method_path) = resolve_route(method);
            ctx.apis.push(ApiEndpoint {
                class_name: class.name.clone(),
                method: method.name.clone(),
                http_method,
                path: join_route(&class_path, &method_path),
                file: unit.rel_path.clone(),
            });
        }
    }
}

pub fn is_rest_controller(class: &ClassDecl) -> bool {
    class
        .annotations
        .iter()
        .any(|annotation| vocab::is_controller_annotation(&annotation.name))
}

pub fn class_route_prefix(class: &ClassDecl) -> Option<String> {
    class
        .annotations
        .iter()
        .filter(|annotation| vocab::is_class_path_annotation(&annotation.name))
        .find_map(|annotation| annotation.path())
        .map(|path| path.to_string())
}

/// Verb and method-level path, applied in annotation order.
fn resolve_route(method: &MethodDecl) -> (String, String) {
    let mut http_method = DEFAULT_HTTP_METHOD.to_string();
    let mut path = String::new();
    for annotation in &method.annotations {
        let Some(role) = vocab::route_role(&annotation.name) else {
            continue;
        };
        match role {
            RouteRole::VerbMapping(verb) => {
                http_method = verb.to_string();
                path = annotation.path().unwrap_or_default().to_string();
            }
            RouteRole::GenericMapping => {
                if let Some(verb) = annotation
                    .element("method")
                    .and_then(|element| element.first())
                    .and_then(normalize_method)
                {
                    http_method = verb;
                }
                if let Some(value) = annotation.path() {
                    path = value.to_string();
                }
            }
            RouteRole::Verb(verb) => http_method = verb.to_string(),
            RouteRole::PathOnly => {
                path = annotation.path().unwrap_or_default().to_string();
            }
        }
    }
    (http_method, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::java::JavaParser;

    fn endpoints(source: &str) -> Vec<ApiEndpoint> {
        let unit = JavaParser::new().unwrap().parse("Api.java", source).unwrap();
        let mut ctx = ScanContext::default();
        extract_endpoints(&unit, &mut ctx);
        ctx.apis
    }

    #[test]
    fn normalizes_verbs() {
        assert_eq!(normalize_method("RequestMethod.POST").as_deref(), Some("POST"));
        assert_eq!(normalize_method("\"put\"").as_deref(), Some("PUT"));
        assert_eq!(normalize_method("SOMETHING"), None);
    }

    #[test]
    fn route_join_is_literal() {
        assert_eq!(join_route("/api", "/users"), "/api/users");
        assert_eq!(join_route("/api", ""), "/api");
        assert_eq!(join_route("/api/", "/users"), "/api//users");
        assert_eq!(join_route("", "users"), "users");
    }

    #[test]
    fn spring_controller_endpoints() {
        let apis = endpoints(
            r#"
@RestController
@RequestMapping("/api")
public class UserController {
    @GetMapping("/users")
    public List<User> list() { return null; }

    @PostMapping(value = "/users", consumes = "application/json")
    public User create(@RequestBody User user) { return user; }

    @RequestMapping(value = "/users/{id}", method = RequestMethod.DELETE)
    public void remove(@PathVariable long id) {}

    public String health() { return "ok"; }

    private void hidden() {}
}
"#,
        );
        let got: Vec<_> = apis
            .iter()
            .map(|api| (api.method.as_str(), api.http_method.as_str(), api.path.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                ("list", "GET", "/api/users"),
                ("create", "POST", "/api/users"),
                ("remove", "DELETE", "/api/users/{id}"),
                ("health", "GET", "/api"),
                ("hidden", "GET", "/api"),
            ]
        );
        assert!(apis.iter().all(|api| api.class_name == "UserController"));
        assert!(apis.iter().all(|api| api.file == "Api.java"));
    }

    #[test]
    fn jaxrs_resource_endpoints() {
        let apis = endpoints(
            r#"
@Path("/orders")
public class OrderResource {
    @GET
    @Path("/{id}")
    public Order get(@PathParam("id") String id) { return null; }

    @POST
    public Response create(Order order) { return null; }
}
"#,
        );
        assert_eq!(apis.len(), 2);
        assert_eq!(apis[0].http_method, "GET");
        assert_eq!(apis[0].path, "/orders/{id}");
        assert_eq!(apis[1].http_method, "POST");
        assert_eq!(apis[1].path, "/orders");
    }

    #[test]
    fn annotated_methods_outside_controllers() {
        let apis = endpoints(
            r#"
public class Handlers {
    @PutMapping("/items")
    public void put() {}

    public void notAnEndpoint() {}
}
"#,
        );
        assert_eq!(apis.len(), 1);
        assert_eq!(apis[0].http_method, "PUT");
        assert_eq!(apis[0].path, "/items");
    }

    #[test]
    fn private_mapped_method_is_an_endpoint_but_not_a_member() {
        let unit = JavaParser::new()
            .unwrap()
            .parse(
                "Api.java",
                r#"
public class Hidden {
    @GetMapping("/x")
    private String hidden() { return "x"; }
}
"#,
            )
            .unwrap();
        let mut ctx = ScanContext::default();
        extract_endpoints(&unit, &mut ctx);
        crate::scanner::members::extract_methods(&unit, &mut ctx);

        assert_eq!(ctx.apis.len(), 1);
        assert_eq!(ctx.apis[0].method, "hidden");
        assert_eq!(ctx.apis[0].path, "/x");
        assert!(ctx.functions["Hidden"].is_empty());
    }

    #[test]
    fn first_class_path_annotation_wins() {
        let apis = endpoints(
            r#"
@Controller
@RequestMapping("/first")
@Path("/second")
public class Twice {
    public void go() {}
}
"#,
        );
        assert_eq!(apis[0].path, "/first");
    }
}
