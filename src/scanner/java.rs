use anyhow::{Result, anyhow, bail};
use tree_sitter::{Node, Parser};

/// One parsed compilation unit, reduced to the declarations the extractors read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub rel_path: String,
    pub package: String,
    pub imports: Vec<String>,
    pub classes: Vec<ClassDecl>,
}

impl SourceUnit {
    pub fn qualify(&self, class_name: &str) -> String {
        if self.package.is_empty() {
            class_name.to_string()
        } else {
            format!("{}.{}", self.package, class_name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub annotations: Vec<Annotation>,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub type_name: String,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub modifiers: Vec<String>,
    pub annotations: Vec<Annotation>,
    /// `None` for `void`.
    pub return_type: Option<String>,
    pub parameters: Vec<Parameter>,
}

impl MethodDecl {
    pub fn is_private(&self) -> bool {
        self.has_modifier("private")
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|value| value == modifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Short name, without `@` or package qualifier.
    pub name: String,
    pub elements: Vec<AnnotationElement>,
}

/// A single annotation argument. `key` is `None` for the shorthand `@A("x")` form.
/// String literals are stored without their quotes; array initializers keep every item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationElement {
    pub key: Option<String>,
    pub values: Vec<String>,
}

impl Annotation {
    pub fn element(&self, key: &str) -> Option<&AnnotationElement> {
        self.elements
            .iter()
            .find(|element| element.key.as_deref() == Some(key))
    }

    /// First non-empty value of the first element that has one.
    pub fn value(&self) -> Option<&str> {
        self.elements
            .iter()
            .find_map(|element| element.first())
    }

    /// Route template from `value`/`path`, or the shorthand argument.
    pub fn path(&self) -> Option<&str> {
        if let Some(value) = self.element("value").and_then(|e| e.first()) {
            return Some(value);
        }
        if let Some(value) = self.element("path").and_then(|e| e.first()) {
            return Some(value);
        }
        self.elements
            .iter()
            .filter(|element| element.key.is_none())
            .find_map(|element| element.first())
    }
}

impl AnnotationElement {
    pub fn first(&self) -> Option<&str> {
        self.values
            .iter()
            .map(|value| value.as_str())
            .find(|value| !value.is_empty())
    }
}

pub struct JavaParser {
    parser: Parser,
}

impl JavaParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_java::LANGUAGE;
        parser.set_language(&language.into())?;
        Ok(Self { parser })
    }

    /// Parses one file. Any syntax error fails the whole unit.
    pub fn parse(&mut self, rel_path: &str, source: &str) -> Result<SourceUnit> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| anyhow!("parser returned no tree for {rel_path}"))?;
        let root = tree.root_node();
        if root.has_error() {
            let line = first_error(root)
                .map(|node| node.start_position().row + 1)
                .unwrap_or(1);
            bail!("syntax error in {rel_path} near line {line}");
        }

        let mut unit = SourceUnit {
            rel_path: rel_path.to_string(),
            package: String::new(),
            imports: Vec::new(),
            classes: Vec::new(),
        };
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "package_declaration" => {
                    if let Some(name) = dotted_name(child, source) {
                        unit.package = name;
                    }
                }
                "import_declaration" => {
                    if let Some(path) = import_path(child, source) {
                        unit.imports.push(path);
                    }
                }
                _ => {}
            }
        }
        collect_classes(root, source, &mut unit.classes);
        Ok(unit)
    }
}

fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node
            .children(&mut cursor)
            .filter(|child| child.has_error())
            .collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

fn dotted_name(node: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if matches!(child.kind(), "scoped_identifier" | "identifier") {
            return Some(node_text(child, source));
        }
    }
    None
}

fn import_path(node: Node<'_>, source: &str) -> Option<String> {
    let mut path = dotted_name(node, source)?;
    let mut cursor = node.walk();
    let wildcard = node
        .children(&mut cursor)
        .any(|child| child.kind() == "asterisk");
    if wildcard {
        path.push_str(".*");
    }
    Some(path)
}

/// Pre-order walk, so outer classes precede the classes nested in them.
/// Iterative, since expression nesting depth is unbounded.
fn collect_classes(root: Node<'_>, source: &str, out: &mut Vec<ClassDecl>) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.kind() == "class_declaration" {
            if let Some(class) = class_decl(node, source) {
                out.push(class);
            }
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
}

fn class_decl(node: Node<'_>, source: &str) -> Option<ClassDecl> {
    let name = node_text(node.child_by_field_name("name")?, source);
    if name.is_empty() {
        return None;
    }
    let (_, annotations) = modifiers_of(node, source);
    let superclass = node
        .child_by_field_name("superclass")
        .and_then(|sup| first_type_child(sup))
        .map(|ty| type_name(ty, source));
    let interfaces = node
        .child_by_field_name("interfaces")
        .map(|list| type_list(list, source))
        .unwrap_or_default();

    let mut fields = Vec::new();
    let mut methods = Vec::new();
    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "field_declaration" => {
                    if let Some(field) = field_decl(member, source) {
                        fields.push(field);
                    }
                }
                "method_declaration" => {
                    if let Some(method) = method_decl(member, source) {
                        methods.push(method);
                    }
                }
                _ => {}
            }
        }
    }

    Some(ClassDecl {
        name,
        annotations,
        superclass,
        interfaces,
        fields,
        methods,
    })
}

fn type_list(node: Node<'_>, source: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "type_list" {
            let mut list_cursor = child.walk();
            for ty in child.named_children(&mut list_cursor) {
                out.push(type_name(ty, source));
            }
        }
    }
    out
}

fn first_type_child(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).next();
    found
}

fn field_decl(node: Node<'_>, source: &str) -> Option<FieldDecl> {
    let type_name = type_name(node.child_by_field_name("type")?, source);
    let mut names = Vec::new();
    let mut cursor = node.walk();
    for declarator in node.children_by_field_name("declarator", &mut cursor) {
        if let Some(name) = declarator.child_by_field_name("name") {
            names.push(node_text(name, source));
        }
    }
    Some(FieldDecl { type_name, names })
}

fn method_decl(node: Node<'_>, source: &str) -> Option<MethodDecl> {
    let name = node_text(node.child_by_field_name("name")?, source);
    let (modifiers, annotations) = modifiers_of(node, source);
    let return_type = node
        .child_by_field_name("type")
        .filter(|ty| ty.kind() != "void_type")
        .map(|ty| type_name(ty, source));
    let parameters = node
        .child_by_field_name("parameters")
        .map(|params| parameters_of(params, source))
        .unwrap_or_default();
    Some(MethodDecl {
        name,
        modifiers,
        annotations,
        return_type,
        parameters,
    })
}

fn parameters_of(node: Node<'_>, source: &str) -> Vec<Parameter> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for param in node.named_children(&mut cursor) {
        match param.kind() {
            "formal_parameter" => {
                let (Some(ty), Some(name)) = (
                    param.child_by_field_name("type"),
                    param.child_by_field_name("name"),
                ) else {
                    continue;
                };
                out.push(Parameter {
                    type_name: type_name(ty, source),
                    name: node_text(name, source),
                });
            }
            "spread_parameter" => {
                if let Some(parameter) = spread_parameter(param, source) {
                    out.push(parameter);
                }
            }
            _ => {}
        }
    }
    out
}

fn spread_parameter(node: Node<'_>, source: &str) -> Option<Parameter> {
    let mut type_node = None;
    let mut name = None;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "modifiers" => {}
            "variable_declarator" => {
                name = child
                    .child_by_field_name("name")
                    .map(|n| node_text(n, source));
            }
            _ if type_node.is_none() => type_node = Some(child),
            _ => {}
        }
    }
    Some(Parameter {
        type_name: type_name(type_node?, source),
        name: name?,
    })
}

/// Modifier keywords and annotations of a declaration.
fn modifiers_of(node: Node<'_>, source: &str) -> (Vec<String>, Vec<Annotation>) {
    let mut keywords = Vec::new();
    let mut annotations = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "modifiers" {
            continue;
        }
        let mut mod_cursor = child.walk();
        for item in child.children(&mut mod_cursor) {
            match item.kind() {
                "marker_annotation" | "annotation" => {
                    if let Some(annotation) = annotation(item, source) {
                        annotations.push(annotation);
                    }
                }
                "line_comment" | "block_comment" => {}
                _ => keywords.push(node_text(item, source)),
            }
        }
    }
    (keywords, annotations)
}

fn annotation(node: Node<'_>, source: &str) -> Option<Annotation> {
    let raw = node_text(node.child_by_field_name("name")?, source);
    let name = crate::util::short_name(&raw).to_string();
    if name.is_empty() {
        return None;
    }
    let mut elements = Vec::new();
    if let Some(args) = node.child_by_field_name("arguments") {
        let mut cursor = args.walk();
        for arg in args.named_children(&mut cursor) {
            match arg.kind() {
                "element_value_pair" => {
                    let key = arg
                        .child_by_field_name("key")
                        .map(|key| node_text(key, source));
                    let values = arg
                        .child_by_field_name("value")
                        .map(|value| element_values(value, source))
                        .unwrap_or_default();
                    elements.push(AnnotationElement { key, values });
                }
                "line_comment" | "block_comment" => {}
                _ => elements.push(AnnotationElement {
                    key: None,
                    values: element_values(arg, source),
                }),
            }
        }
    }
    Some(Annotation { name, elements })
}

fn element_values(node: Node<'_>, source: &str) -> Vec<String> {
    if node.kind() == "element_value_array_initializer" {
        let mut out = Vec::new();
        let mut cursor = node.walk();
        for item in node.named_children(&mut cursor) {
            out.extend(element_values(item, source));
        }
        return out;
    }
    vec![literal_value(node, source)]
}

fn literal_value(node: Node<'_>, source: &str) -> String {
    let text = node_text(node, source);
    if node.kind() == "string_literal" {
        text.trim_matches('"').to_string()
    } else {
        text
    }
}

/// Bare type name: generic arguments, array dimensions and qualifiers dropped.
pub(crate) fn type_name(node: Node<'_>, source: &str) -> String {
    match node.kind() {
        "generic_type" | "annotated_type" => {
            let mut cursor = node.walk();
            let inner = node
                .named_children(&mut cursor)
                .filter(|child| {
                    matches!(
                        child.kind(),
                        "type_identifier" | "scoped_type_identifier" | "generic_type"
                    )
                })
                .last();
            match inner {
                Some(inner) => type_name(inner, source),
                None => node_text(node, source),
            }
        }
        "scoped_type_identifier" => {
            let mut cursor = node.walk();
            let last = node
                .named_children(&mut cursor)
                .filter(|child| child.kind() == "type_identifier")
                .last();
            match last {
                Some(last) => node_text(last, source),
                None => node_text(node, source),
            }
        }
        "array_type" => match node.child_by_field_name("element") {
            Some(element) => type_name(element, source),
            None => node_text(node, source),
        },
        _ => node_text(node, source),
    }
}

fn node_text(node: Node<'_>, source: &str) -> String {
    let start = node.start_byte();
    let end = node.end_byte();
    source.get(start..end).unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SourceUnit {
        JavaParser::new().unwrap().parse("src/Test.java", source).unwrap()
    }

    #[test]
    fn reads_package_imports_and_members() {
        let unit = parse(
            r#"
package com.acme.orders;

import java.util.List;
import java.util.*;
import static org.junit.Assert.assertEquals;
import com.acme.model.Order;

@Service
public class OrderService extends BaseService implements Auditable, Comparable<OrderService> {
    private final OrderRepository repository;
    private List<Order> cache, backlog;

    public List<Order> findAll(String region, int[] ids) { return cache; }
    protected void touch(Order... orders) {}
    private Order load(long id) { return null; }
    String[] names() { return null; }
}
"#,
        );
        assert_eq!(unit.package, "com.acme.orders");
        assert_eq!(
            unit.imports,
            vec![
                "java.util.List",
                "java.util.*",
                "org.junit.Assert.assertEquals",
                "com.acme.model.Order"
            ]
        );
        assert_eq!(unit.classes.len(), 1);
        let class = &unit.classes[0];
        assert_eq!(class.name, "OrderService");
        assert_eq!(class.annotations[0].name, "Service");
        assert_eq!(class.superclass.as_deref(), Some("BaseService"));
        assert_eq!(class.interfaces, vec!["Auditable", "Comparable"]);
        assert_eq!(class.fields.len(), 2);
        assert_eq!(class.fields[1].type_name, "List");
        assert_eq!(class.fields[1].names, vec!["cache", "backlog"]);

        let find_all = &class.methods[0];
        assert_eq!(find_all.return_type.as_deref(), Some("List"));
        assert_eq!(find_all.parameters[0].type_name, "String");
        assert_eq!(find_all.parameters[1].type_name, "int");
        assert_eq!(find_all.parameters[1].name, "ids");

        let touch = &class.methods[1];
        assert_eq!(touch.return_type, None);
        assert_eq!(touch.parameters[0].type_name, "Order");
        assert_eq!(touch.parameters[0].name, "orders");
        assert!(touch.has_modifier("protected"));

        assert!(class.methods[2].is_private());
        assert_eq!(class.methods[3].return_type.as_deref(), Some("String"));
    }

    #[test]
    fn reads_annotation_elements() {
        let unit = parse(
            r#"
@RequestMapping(value = "/api", produces = {"application/json", "text/plain"})
class A {
    @org.springframework.web.bind.annotation.GetMapping("/users")
    public void users() {}

    @RequestMapping(path = "/x", method = RequestMethod.POST)
    public void x() {}

    @Scheduled(cron = "0 0 * * * *")
    public void tick() {}
}
"#,
        );
        let class = &unit.classes[0];
        let mapping = &class.annotations[0];
        assert_eq!(mapping.path(), Some("/api"));
        assert_eq!(
            mapping.element("produces").unwrap().values,
            vec!["application/json", "text/plain"]
        );
        let get = &class.methods[0].annotations[0];
        assert_eq!(get.name, "GetMapping");
        assert_eq!(get.path(), Some("/users"));
        let post = &class.methods[1].annotations[0];
        assert_eq!(post.path(), Some("/x"));
        assert_eq!(
            post.element("method").and_then(|e| e.first()),
            Some("RequestMethod.POST")
        );
        assert_eq!(class.methods[2].annotations[0].value(), Some("0 0 * * * *"));
    }

    #[test]
    fn nested_classes_follow_their_outer_class() {
        let unit = parse(
            r#"
class Outer {
    static class Inner {
        public void run() {}
    }
    public void go() {}
}
interface NotAClass { void x(); }
"#,
        );
        let names: Vec<_> = unit.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Outer", "Inner"]);
        assert_eq!(unit.classes[0].methods.len(), 1);
        assert_eq!(unit.classes[1].methods[0].name, "run");
        assert_eq!(unit.qualify("Outer"), "Outer");
    }

    #[test]
    fn syntax_errors_fail_the_unit() {
        let mut parser = JavaParser::new().unwrap();
        let err = parser
            .parse("Broken.java", "public class Broken { void x( { }")
            .unwrap_err();
        assert!(err.to_string().contains("Broken.java"));
    }
}
