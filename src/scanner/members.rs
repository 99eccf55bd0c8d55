use crate::model::{ClassFact, MethodFact, Visibility};
use crate::scanner::ScanContext;
use crate::scanner::java::{MethodDecl, SourceUnit};

pub const VOID_TYPE: &str = "void";

/// Records every class of the unit and its non-private methods, overloads included.
pub fn extract_methods(unit: &SourceUnit, ctx: &mut ScanContext) {
    for class in &unit.classes {
        ctx.classes.push(ClassFact {
            name: class.name.clone(),
            qualified_name: unit.qualify(&class.name),
            package: unit.package.clone(),
            annotations: class
                .annotations
                .iter()
                .map(|annotation| annotation.name.clone())
                .collect(),
            superclass: class.superclass.clone(),
            interfaces: class.interfaces.clone(),
            file: unit.rel_path.clone(),
        });

        let entry = ctx.functions.entry(class.name.clone()).or_default();
        for method in &class.methods {
            if method.is_private() {
                continue;
            }
            entry.push(MethodFact {
                name: method.name.clone(),
                return_type: method
                    .return_type
                    .clone()
                    .unwrap_or_else(|| VOID_TYPE.to_string()),
                parameters: method
                    .parameters
                    .iter()
                    .map(|param| format!("{} {}", param.type_name, param.name))
                    .collect(),
                file: unit.rel_path.clone(),
                visibility: visibility(method),
            });
        }
    }
}

fn visibility(method: &MethodDecl) -> Visibility {
    if method.has_modifier("public") {
        Visibility::Public
    } else if method.has_modifier("protected") {
        Visibility::Protected
    } else if method.has_modifier("private") {
        Visibility::Private
    } else {
        Visibility::Package
    }
}
