use crate::model::DependencyRecord;
use crate::scanner::ScanContext;
use crate::scanner::java::SourceUnit;

/// Imports of `imports` whose last segment is `short_name`.
///
/// Resolution is purely syntactic: a same-package type used without an
/// import never resolves, and two imports sharing a short name both match.
pub fn resolve_imports<'a>(imports: &'a [String], short_name: &str) -> impl Iterator<Item = &'a String> {
    let suffix = format!(".{short_name}");
    imports.iter().filter(move |import| import.ends_with(&suffix))
}

/// Second pass over every parsed unit. The first class seen under a
/// qualified name owns the record; later duplicates are skipped.
pub fn analyze(units: &[SourceUnit], ctx: &mut ScanContext) {
    for unit in units {
        for class in &unit.classes {
            let qualified = unit.qualify(&class.name);
            if ctx.dependencies.contains_key(&qualified) {
                tracing::debug!("duplicate class {qualified} in {}, keeping first", unit.rel_path);
                continue;
            }
            let referenced = class
                .fields
                .iter()
                .map(|field| field.type_name.as_str())
                .chain(class.interfaces.iter().map(|name| name.as_str()))
                .chain(class.superclass.as_deref());
            let mut uses: Vec<String> = Vec::new();
            for short_name in referenced {
                for import in resolve_imports(&unit.imports, short_name) {
                    if !uses.contains(import) {
                        uses.push(import.clone());
                    }
                }
            }
            ctx.dependencies.insert(
                qualified,
                DependencyRecord {
                    file: unit.rel_path.clone(),
                    package: unit.package.clone(),
                    imports: unit.imports.clone(),
                    uses,
                    extends: class.superclass.clone(),
                    implements: class.interfaces.clone(),
                },
            );
        }
    }
}
