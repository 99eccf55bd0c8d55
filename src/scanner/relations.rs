use crate::model::{DependencyRecord, MethodFact, RelationKind, Relationship};
use crate::util::short_name;
use std::collections::{BTreeMap, HashSet};

/// Classifies the dependency edges between project classes.
///
/// Targets outside the scanned project (JDK, libraries) are dropped. A `uses`
/// edge already explained by `extends`/`implements` is not repeated.
pub fn derive_relations(
    dependencies: &BTreeMap<String, DependencyRecord>,
    functions: &BTreeMap<String, Vec<MethodFact>>,
) -> Vec<Relationship> {
    let known_qualified: HashSet<&str> = dependencies.keys().map(|name| name.as_str()).collect();
    let known_short: HashSet<&str> = dependencies.keys().map(|name| short_name(name)).collect();
    let is_known =
        |name: &str| known_qualified.contains(name) || known_short.contains(short_name(name));

    let mut out = Vec::new();
    for (qualified, record) in dependencies {
        let source = short_name(qualified);
        if let Some(parent) = record.extends.as_deref() {
            if is_known(parent) {
                out.push(relationship(source, short_name(parent), RelationKind::Generalization));
            }
        }
        for interface in &record.implements {
            if is_known(interface) {
                out.push(relationship(source, short_name(interface), RelationKind::Implementation));
            }
        }

        let inherited: HashSet<&str> = record
            .extends
            .iter()
            .chain(record.implements.iter())
            .map(|name| short_name(name))
            .collect();
        let methods = functions.get(source).map(|m| m.as_slice()).unwrap_or(&[]);
        for used in &record.uses {
            let target = short_name(used);
            if inherited.contains(target) || !is_known(used) {
                continue;
            }
            let kind = if exposes_accessor(methods, target) {
                RelationKind::Aggregation
            } else {
                RelationKind::Association
            };
            out.push(relationship(source, target, kind));
        }
    }
    out
}

/// Getter heuristic: a parameterless method returning or named after the type.
fn exposes_accessor(methods: &[MethodFact], target: &str) -> bool {
    methods.iter().any(|method| {
        method.parameters.is_empty()
            && (method.return_type.contains(target) || method.name.contains(target))
    })
}

fn relationship(source: &str, target: &str, kind: RelationKind) -> Relationship {
    Relationship {
        source: source.to_string(),
        target: target.to_string(),
        kind,
        description: format!("{source} {} {target}", kind.verb()),
    }
}
