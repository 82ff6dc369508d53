use std::collections::BTreeSet;

use crate::model::{Param, Signature, TypeNode};

use super::Registry;

/// Fixed token appended to a candidate that would shadow a reserved word,
/// a basic type name, or a package qualifier. Distinct from the integer
/// suffixes used for variable-versus-variable collisions; output stability
/// depends on which tier fires.
const FIXED_SUFFIX: &str = "MimicParam";

/// Go reserved words and predeclared basic type names, plus the identifiers
/// the emission templates claim for themselves.
const RESERVED: &[&str] = &[
    "mock", "callInfo", // template-reserved
    "break", "case", "chan", "const", "continue", "default", "defer", "else",
    "fallthrough", "for", "func", "go", "goto", "if", "import", "interface",
    "map", "package", "range", "return", "select", "struct", "switch", "type",
    "var", // keywords
    "string", "bool", "byte", "rune", "uintptr", "int", "int8", "int16",
    "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64",
    "float32", "float64", "complex64", "complex128", // basic types
];

/// Stable handle to a variable inside one [`MethodScope`]. Later
/// allocations may rename earlier variables, so callers hold ids rather
/// than names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarId(usize);

/// One synthesized identifier bound to a method parameter or result.
#[derive(Debug, Clone)]
pub struct Var {
    ty: TypeNode,
    name: String,
    /// Vendor-stripped import paths this variable's type depends on.
    packages: BTreeSet<String>,
}

impl Var {
    /// Final allocated identifier. Unique within the owning scope at the
    /// moment emission reads it.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeNode {
        &self.ty
    }

    pub fn packages(&self) -> &BTreeSet<String> {
        &self.packages
    }
}

/// Per-method allocator of variable names. Mutates the shared registry but
/// does not own it; discarded once the method is emitted.
#[derive(Debug, Default)]
pub struct MethodScope {
    vars: Vec<Var>,
    /// Base names that already required integer disambiguation once; future
    /// collisions skip straight to probing integers.
    conflicted: BTreeSet<String>,
}

impl MethodScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn var(&self, id: VarId) -> &Var {
        &self.vars[id.0]
    }

    pub fn vars(&self) -> impl Iterator<Item = &Var> {
        self.vars.iter()
    }

    /// Allocate a variable for `declared`, registering every package its
    /// type transitively references and resolving all name conflicts.
    ///
    /// `suffix` distinguishes different synthesized uses of the same
    /// declared variable (empty for parameters, `"Out"` for results).
    pub fn add_var(&mut self, registry: &mut Registry, declared: &Param, suffix: &str) -> VarId {
        let mut packages = BTreeSet::new();
        populate_imports(registry, &declared.ty, &mut packages);
        self.resolve_import_var_conflicts(registry, &packages);

        let mut name = var_name(declared, suffix);
        if RESERVED.contains(&name.as_str()) {
            name.push_str(FIXED_SUFFIX);
        }
        if registry.search_import(&name).is_some() {
            name.push_str(FIXED_SUFFIX);
        }
        if self.search_var(&name).is_some() || self.conflicted.contains(&name) {
            name = self.resolve_var_name_conflict(&name);
        }

        self.vars.push(Var {
            ty: declared.ty.clone(),
            name,
            packages,
        });
        VarId(self.vars.len() - 1)
    }

    fn search_var(&self, name: &str) -> Option<usize> {
        self.vars.iter().position(|var| var.name == name)
    }

    /// Packages win naming priority over already-placed variables: their
    /// qualifiers are referenced pervasively, a variable rename is local.
    fn resolve_import_var_conflicts(&mut self, registry: &Registry, packages: &BTreeSet<String>) {
        for path in packages {
            let Some(qualifier) = registry.qualifier_of(path) else {
                continue;
            };
            if let Some(idx) = self.search_var(qualifier) {
                self.vars[idx].name.push_str(FIXED_SUFFIX);
            }
        }
    }

    /// Integer-suffix resolution. The first collision for a base name
    /// retroactively renames the original variable to carry suffix `1` and
    /// marks the base permanently conflicted; probing then continues until
    /// a free name is found.
    fn resolve_var_name_conflict(&mut self, suggested: &str) -> String {
        let mut n = 1;
        loop {
            let candidate = format!("{suggested}{n}");
            if self.search_var(&candidate).is_some() {
                n += 1;
                continue;
            }
            if n == 1 {
                if let Some(idx) = self.search_var(suggested) {
                    self.vars[idx].name.push('1');
                }
                self.conflicted.insert(suggested.to_string());
                n += 1;
                continue;
            }
            return candidate;
        }
    }
}

fn var_name(declared: &Param, suffix: &str) -> String {
    if let Some(name) = declared.name.as_deref() {
        if !name.is_empty() && name != "_" {
            return format!("{name}{suffix}");
        }
    }
    format!("{}{suffix}", var_name_for_type(&declared.ty))
}

/// Synthesize a readable name from the shape of a type.
fn var_name_for_type(ty: &TypeNode) -> String {
    match ty {
        TypeNode::Named { name, .. } | TypeNode::Basic { name } => decapitalize(name),
        TypeNode::Array { elem, .. } | TypeNode::Slice { elem } => {
            format!("{}s", element_name(elem))
        }
        TypeNode::Pointer { elem } => var_name_for_type(elem),
        TypeNode::Map { .. } | TypeNode::Struct { .. } => "val".to_string(),
        TypeNode::Interface { .. } => "ifaceVal".to_string(),
        TypeNode::Func { .. } => "fn".to_string(),
        TypeNode::Chan { .. } => "ch".to_string(),
    }
}

fn element_name(elem: &TypeNode) -> String {
    match elem {
        TypeNode::Basic { name } => decapitalize(name),
        other => var_name_for_type(other),
    }
}

pub(crate) fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Register every package transitively referenced by `ty`. Composite nodes
/// are transparently unwrapped; only leaf named types contribute a package.
fn populate_imports(registry: &mut Registry, ty: &TypeNode, packages: &mut BTreeSet<String>) {
    match ty {
        TypeNode::Named {
            package, type_args, ..
        } => {
            if let Some(pkg) = package {
                if let Some(key) = registry.add_import(pkg) {
                    packages.insert(key);
                }
            }
            for arg in type_args {
                populate_imports(registry, arg, packages);
            }
        }
        TypeNode::Pointer { elem }
        | TypeNode::Array { elem, .. }
        | TypeNode::Slice { elem }
        | TypeNode::Chan { elem, .. } => populate_imports(registry, elem, packages),
        TypeNode::Map { key, value } => {
            populate_imports(registry, key, packages);
            populate_imports(registry, value, packages);
        }
        TypeNode::Struct { fields } => {
            for field in fields {
                populate_imports(registry, &field.ty, packages);
            }
        }
        TypeNode::Interface { methods, embedded } => {
            for method in methods {
                populate_signature_imports(registry, &method.sig, packages);
            }
            for ty in embedded {
                populate_imports(registry, ty, packages);
            }
        }
        TypeNode::Func { sig } => populate_signature_imports(registry, sig, packages),
        TypeNode::Basic { .. } => {}
    }
}

fn populate_signature_imports(
    registry: &mut Registry,
    sig: &Signature,
    packages: &mut BTreeSet<String>,
) {
    for param in sig.params.iter().chain(sig.results.iter()) {
        populate_imports(registry, &param.ty, packages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PackageRef;

    fn registry() -> Registry {
        Registry::new(PackageRef::new("example.com/pkg/db", "db"), true)
    }

    fn context_type() -> TypeNode {
        TypeNode::named(Some(PackageRef::new("context", "context")), "Context")
    }

    #[test]
    fn declared_names_keep_their_name_plus_suffix() {
        let mut reg = registry();
        let mut scope = MethodScope::new();
        let ctx = scope.add_var(&mut reg, &Param::named("ctx", context_type()), "");
        let req = scope.add_var(
            &mut reg,
            &Param::named(
                "req",
                TypeNode::pointer(TypeNode::named(
                    Some(PackageRef::new("example.com/pkg/db", "db")),
                    "Request",
                )),
            ),
            "",
        );
        assert_eq!(scope.var(ctx).name(), "ctx");
        assert_eq!(scope.var(req).name(), "req");
    }

    #[test]
    fn unnamed_vars_get_shape_derived_names() {
        let mut reg = registry();
        let mut scope = MethodScope::new();

        let cases: Vec<(TypeNode, &str)> = vec![
            (TypeNode::slice(TypeNode::basic("byte")), "bytes"),
            // The walk registers the "context" import first, so the
            // shape-derived candidate collides with its own qualifier.
            (TypeNode::pointer(context_type()), "contextMimicParam"),
            (
                TypeNode::Chan {
                    dir: crate::model::ChanDir::Both,
                    elem: Box::new(TypeNode::basic("int")),
                },
                "ch",
            ),
            (
                TypeNode::Map {
                    key: Box::new(TypeNode::basic("string")),
                    value: Box::new(TypeNode::basic("int")),
                },
                "val",
            ),
            (
                TypeNode::Func {
                    sig: Signature::default(),
                },
                "fn",
            ),
            (
                TypeNode::Interface {
                    methods: Vec::new(),
                    embedded: Vec::new(),
                },
                "ifaceVal",
            ),
        ];
        for (ty, expected) in cases {
            let id = scope.add_var(&mut reg, &Param::unnamed(ty), "");
            assert_eq!(scope.var(id).name(), expected);
        }
    }

    #[test]
    fn blank_identifier_counts_as_unnamed() {
        let mut reg = registry();
        let mut scope = MethodScope::new();
        let id = scope.add_var(
            &mut reg,
            &Param::named("_", TypeNode::slice(TypeNode::basic("byte"))),
            "",
        );
        assert_eq!(scope.var(id).name(), "bytes");
    }

    #[test]
    fn reserved_words_and_basic_types_get_the_fixed_suffix() {
        let mut reg = registry();
        let mut scope = MethodScope::new();

        // Unnamed string parameter synthesizes "string", a basic type name.
        let s = scope.add_var(&mut reg, &Param::unnamed(TypeNode::basic("string")), "");
        assert_eq!(scope.var(s).name(), "stringMimicParam");

        // A declared name that is a keyword is caught as well.
        let k = scope.add_var(&mut reg, &Param::named("range", TypeNode::basic("int")), "");
        assert_eq!(scope.var(k).name(), "rangeMimicParam");

        // Template-reserved identifiers are off limits too.
        let m = scope.add_var(&mut reg, &Param::named("mock", TypeNode::basic("int")), "");
        assert_eq!(scope.var(m).name(), "mockMimicParam");
    }

    #[test]
    fn suffix_keeps_reserved_candidates_legal() {
        let mut reg = registry();
        let mut scope = MethodScope::new();
        // "chOut" is not reserved even though "ch" alone would collide with
        // a sibling; the suffix participates in every check.
        let id = scope.add_var(
            &mut reg,
            &Param::unnamed(TypeNode::Chan {
                dir: crate::model::ChanDir::Both,
                elem: Box::new(TypeNode::basic("int")),
            }),
            "Out",
        );
        assert_eq!(scope.var(id).name(), "chOut");
    }

    #[test]
    fn candidate_colliding_with_package_qualifier_gets_fixed_suffix() {
        let mut reg = registry();
        let mut scope = MethodScope::new();
        reg.add_import(&PackageRef::new("example.com/transport/client", "client"));
        let id = scope.add_var(&mut reg, &Param::named("client", TypeNode::basic("int")), "");
        assert_eq!(scope.var(id).name(), "clientMimicParam");
    }

    #[test]
    fn late_import_renames_earlier_variable_with_fixed_suffix() {
        let mut reg = registry();
        let mut scope = MethodScope::new();
        let early = scope.add_var(&mut reg, &Param::named("client", TypeNode::basic("int")), "");
        assert_eq!(scope.var(early).name(), "client");

        // This variable's type drags in a package whose qualifier is
        // "client"; the package wins and the earlier variable is renamed.
        let late = scope.add_var(
            &mut reg,
            &Param::named(
                "conn",
                TypeNode::pointer(TypeNode::named(
                    Some(PackageRef::new("example.com/transport/client", "client")),
                    "Conn",
                )),
            ),
            "",
        );
        assert_eq!(scope.var(early).name(), "clientMimicParam");
        assert_eq!(scope.var(late).name(), "conn");
    }

    #[test]
    fn integer_probing_renames_the_first_collision_retroactively() {
        let mut reg = registry();
        let mut scope = MethodScope::new();
        let mut ids = Vec::new();
        for _ in 0..9 {
            ids.push(scope.add_var(&mut reg, &Param::named("v", TypeNode::basic("int")), ""));
        }
        let names: Vec<&str> = ids.iter().map(|id| scope.var(*id).name()).collect();
        assert_eq!(
            names,
            ["v1", "v2", "v3", "v4", "v5", "v6", "v7", "v8", "v9"]
        );
    }

    #[test]
    fn probing_skips_names_that_are_already_taken() {
        let mut reg = registry();
        let mut scope = MethodScope::new();
        scope.add_var(&mut reg, &Param::named("v2", TypeNode::basic("int")), "");
        let first = scope.add_var(&mut reg, &Param::named("v", TypeNode::basic("int")), "");
        let second = scope.add_var(&mut reg, &Param::named("v", TypeNode::basic("int")), "");
        assert_eq!(scope.var(first).name(), "v1");
        assert_eq!(scope.var(second).name(), "v3");
    }

    #[test]
    fn type_walk_registers_nested_packages() {
        let mut reg = registry();
        let mut scope = MethodScope::new();
        let ty = TypeNode::Map {
            key: Box::new(TypeNode::named(
                Some(PackageRef::new("example.com/a", "a")),
                "Key",
            )),
            value: Box::new(TypeNode::Func {
                sig: Signature {
                    params: vec![Param::unnamed(TypeNode::named(
                        Some(PackageRef::new("example.com/b", "b")),
                        "In",
                    ))],
                    results: vec![Param::unnamed(TypeNode::named(
                        Some(PackageRef::new("example.com/c", "c")),
                        "Out",
                    ))],
                    variadic: false,
                },
            }),
        };
        let id = scope.add_var(&mut reg, &Param::named("handlers", ty), "");
        let paths: Vec<&str> = scope.var(id).packages().iter().map(String::as_str).collect();
        assert_eq!(paths, ["example.com/a", "example.com/b", "example.com/c"]);
        assert!(reg.search_import("a").is_some());
        assert!(reg.search_import("b").is_some());
        assert!(reg.search_import("c").is_some());
    }

    #[test]
    fn scopes_are_isolated_except_through_the_registry() {
        let mut reg = registry();
        let mut first = MethodScope::new();
        first.add_var(&mut reg, &Param::named("v", TypeNode::basic("int")), "");
        first.add_var(&mut reg, &Param::named("v", TypeNode::basic("int")), "");

        let mut second = MethodScope::new();
        let id = second.add_var(&mut reg, &Param::named("v", TypeNode::basic("int")), "");
        assert_eq!(second.var(id).name(), "v");
    }

    #[test]
    fn decapitalize_lowers_only_the_first_character() {
        assert_eq!(decapitalize("Request"), "request");
        assert_eq!(decapitalize("HTTPClient"), "hTTPClient");
        assert_eq!(decapitalize(""), "");
    }
}
