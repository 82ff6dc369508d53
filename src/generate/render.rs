//! Rendering of allocated names and type graphs into Go source text.
//!
//! Everything here reads the registry and the method scopes through their
//! public accessors; by the time rendering runs, every naming decision has
//! been made.

use crate::model::{ChanDir, Param, Signature, TypeNode};
use crate::registry::Registry;

use super::{Config, MethodData, MockData};

pub(crate) fn render_file(
    registry: &Registry,
    pkg_name: &str,
    mocks: &[MockData],
    cfg: &Config,
) -> String {
    let mut out = String::new();
    out.push_str("// Code generated by mimic; DO NOT EDIT.\n\n");
    out.push_str(&format!("package {pkg_name}\n"));

    let imports = render_import_block(registry);
    if !imports.is_empty() {
        out.push('\n');
        out.push_str(&imports);
    }

    for mock in mocks {
        out.push('\n');
        if cfg.stub_impl {
            render_stub(&mut out, registry, mock, cfg);
        } else {
            render_mock(&mut out, registry, mock, cfg);
        }
    }

    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

/// The final qualifier table, flushed after all interfaces were processed.
fn render_import_block(registry: &Registry) -> String {
    let mut lines = Vec::new();
    for pkg in registry.imports() {
        if pkg.qualifier() == pkg.declared_name() {
            lines.push(format!("\t\"{}\"", pkg.path()));
        } else {
            lines.push(format!("\t{} \"{}\"", pkg.qualifier(), pkg.path()));
        }
    }
    if lines.is_empty() {
        return String::new();
    }
    format!("import (\n{}\n)\n", lines.join("\n"))
}

fn render_mock(out: &mut String, registry: &Registry, mock: &MockData, cfg: &Config) {
    let name = &mock.impl_name;
    let iface = interface_ref(registry, &mock.interface);

    if !cfg.skip_ensure {
        out.push_str(&format!(
            "// Ensure {name} implements {iface} at compile time.\n"
        ));
        out.push_str(&format!("var _ {iface} = &{name}{{}}\n\n"));
    }

    out.push_str(&format!(
        "// {name} is a call-tracking mock of the {iface} interface.\n"
    ));
    out.push_str(&format!("type {name} struct {{\n"));
    for method in &mock.methods {
        out.push_str(&format!(
            "\t// {0}Func mocks the {0} method.\n",
            method.name
        ));
        out.push_str(&format!(
            "\t{}Func func({}){}\n",
            method.name,
            param_list(method, registry),
            result_list(method, registry)
        ));
    }
    out.push_str("\n\t// calls tracks the arguments of each call to the mocked methods.\n");
    out.push_str("\tcalls struct {\n");
    for method in &mock.methods {
        out.push_str(&format!(
            "\t\t{} []{}\n",
            method.name,
            call_struct(method, registry, "\t\t")
        ));
    }
    out.push_str("\t}\n");
    out.push_str("\tlock sync.RWMutex\n");
    out.push_str("}\n\n");

    out.push_str(&format!(
        "// New{name} returns a {name} with no behavior installed.\n"
    ));
    out.push_str(&format!(
        "func New{name}() *{name} {{\n\treturn &{name}{{}}\n}}\n\n"
    ));

    out.push_str(&format!(
        "// {name}Expect installs behavior on a {name} through a fluent interface.\n"
    ));
    out.push_str(&format!(
        "type {name}Expect struct {{\n\tmock *{name}\n}}\n\n"
    ));
    out.push_str("// Expect returns a builder for installing method behavior.\n");
    out.push_str(&format!(
        "func (mock *{name}) Expect() *{name}Expect {{\n\treturn &{name}Expect{{mock: mock}}\n}}\n\n"
    ));
    for method in &mock.methods {
        out.push_str(&format!(
            "// {0} installs fn as the behavior of the {0} method.\n",
            method.name
        ));
        out.push_str(&format!(
            "func (e *{name}Expect) {}(fn func({}){}) *{name}Expect {{\n\te.mock.{}Func = fn\n\treturn e\n}}\n\n",
            method.name,
            param_list(method, registry),
            result_list(method, registry),
            method.name
        ));
    }

    for method in &mock.methods {
        render_mock_method(out, registry, name, method);
    }
}

fn render_mock_method(out: &mut String, registry: &Registry, name: &str, method: &MethodData) {
    out.push_str(&format!(
        "// {0} calls {0}Func and records the call.\n",
        method.name
    ));
    out.push_str(&format!(
        "func (mock *{name}) {}({}){} {{\n",
        method.name,
        param_list(method, registry),
        result_list(method, registry)
    ));
    if method.params.is_empty() {
        out.push_str("\tcallInfo := struct{}{}\n");
    } else {
        out.push_str(&format!(
            "\tcallInfo := {}{{\n",
            call_struct(method, registry, "\t")
        ));
        for id in &method.params {
            let var = method.scope.var(*id);
            out.push_str(&format!(
                "\t\t{}: {},\n",
                export_name(var.name()),
                var.name()
            ));
        }
        out.push_str("\t}\n");
    }
    out.push_str("\tmock.lock.Lock()\n");
    out.push_str(&format!(
        "\tmock.calls.{0} = append(mock.calls.{0}, callInfo)\n",
        method.name
    ));
    out.push_str("\tmock.lock.Unlock()\n");
    out.push_str(&format!("\tif mock.{}Func == nil {{\n", method.name));
    out.push_str(&format!(
        "\t\tpanic(\"{name}.{0}: {0}Func is nil but was just called\")\n",
        method.name
    ));
    out.push_str("\t}\n");
    let args = arg_list(method);
    if method.results.is_empty() {
        out.push_str(&format!("\tmock.{}Func({args})\n", method.name));
    } else {
        out.push_str(&format!("\treturn mock.{}Func({args})\n", method.name));
    }
    out.push_str("}\n\n");

    out.push_str(&format!(
        "// {0}Calls returns the arguments recorded for each call to {0}.\n",
        method.name
    ));
    out.push_str(&format!(
        "func (mock *{name}) {}Calls() []{} {{\n",
        method.name,
        call_struct(method, registry, "")
    ));
    out.push_str("\tmock.lock.RLock()\n\tdefer mock.lock.RUnlock()\n");
    out.push_str(&format!("\treturn mock.calls.{}\n", method.name));
    out.push_str("}\n\n");
}

fn render_stub(out: &mut String, registry: &Registry, mock: &MockData, cfg: &Config) {
    let name = &mock.impl_name;
    let iface = interface_ref(registry, &mock.interface);

    if !cfg.skip_ensure {
        out.push_str(&format!(
            "// Ensure {name} implements {iface} at compile time.\n"
        ));
        out.push_str(&format!("var _ {iface} = &{name}{{}}\n\n"));
    }

    out.push_str(&format!(
        "// {name} is a no-op implementation of the {iface} interface.\n"
    ));
    out.push_str(&format!("type {name} struct{{}}\n\n"));
    out.push_str(&format!("// New{name} returns a ready-to-use stub.\n"));
    out.push_str(&format!(
        "func New{name}() *{name} {{\n\treturn &{name}{{}}\n}}\n\n"
    ));

    for method in &mock.methods {
        out.push_str(&format!(
            "func (_ *{name}) {}({}){} {{\n",
            method.name,
            param_list(method, registry),
            result_list(method, registry)
        ));
        if !method.results.is_empty() {
            out.push_str("\tvar (\n");
            for id in &method.results {
                let var = method.scope.var(*id);
                out.push_str(&format!(
                    "\t\t{} {}\n",
                    var.name(),
                    render_type(var.ty(), registry)
                ));
            }
            out.push_str("\t)\n");
            let names: Vec<&str> = method
                .results
                .iter()
                .map(|id| method.scope.var(*id).name())
                .collect();
            out.push_str(&format!("\treturn {}\n", names.join(", ")));
        }
        out.push_str("}\n\n");
    }
}

/// The mocked interface as referenced from the generated package.
fn interface_ref(registry: &Registry, interface: &str) -> String {
    match registry.qualifier_for(registry.src_pkg()) {
        None => interface.to_string(),
        Some(qualifier) => format!("{qualifier}.{interface}"),
    }
}

fn param_list(method: &MethodData, registry: &Registry) -> String {
    let rendered: Vec<String> = method
        .params
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let var = method.scope.var(*id);
            let last = i + 1 == method.params.len();
            let ty = if method.variadic && last {
                variadic_type(var.ty(), registry)
            } else {
                render_type(var.ty(), registry)
            };
            format!("{} {ty}", var.name())
        })
        .collect();
    rendered.join(", ")
}

fn result_list(method: &MethodData, registry: &Registry) -> String {
    match method.results.len() {
        0 => String::new(),
        1 => format!(
            " {}",
            render_type(method.scope.var(method.results[0]).ty(), registry)
        ),
        _ => {
            let rendered: Vec<String> = method
                .results
                .iter()
                .map(|id| render_type(method.scope.var(*id).ty(), registry))
                .collect();
            format!(" ({})", rendered.join(", "))
        }
    }
}

fn arg_list(method: &MethodData) -> String {
    let rendered: Vec<String> = method
        .params
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let name = method.scope.var(*id).name();
            if method.variadic && i + 1 == method.params.len() {
                format!("{name}...")
            } else {
                name.to_string()
            }
        })
        .collect();
    rendered.join(", ")
}

/// The per-method argument record, rendered at the given indent depth.
fn call_struct(method: &MethodData, registry: &Registry, indent: &str) -> String {
    if method.params.is_empty() {
        return "struct{}".to_string();
    }
    let mut out = String::from("struct {\n");
    for id in &method.params {
        let var = method.scope.var(*id);
        out.push_str(&format!(
            "{indent}\t{} {}\n",
            export_name(var.name()),
            render_type(var.ty(), registry)
        ));
    }
    out.push_str(indent);
    out.push('}');
    out
}

fn export_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render a type-node into Go source, qualifying named types through the
/// registry's final table.
pub(crate) fn render_type(ty: &TypeNode, registry: &Registry) -> String {
    match ty {
        TypeNode::Basic { name } => name.clone(),
        TypeNode::Named {
            package,
            name,
            type_args,
        } => {
            let base = match package {
                None => name.clone(),
                Some(pkg) => match registry.qualifier_for(pkg) {
                    None => name.clone(),
                    Some(qualifier) => format!("{qualifier}.{name}"),
                },
            };
            if type_args.is_empty() {
                base
            } else {
                let args: Vec<String> = type_args
                    .iter()
                    .map(|arg| render_type(arg, registry))
                    .collect();
                format!("{base}[{}]", args.join(", "))
            }
        }
        TypeNode::Pointer { elem } => format!("*{}", render_type(elem, registry)),
        TypeNode::Array { len, elem } => format!("[{len}]{}", render_type(elem, registry)),
        TypeNode::Slice { elem } => format!("[]{}", render_type(elem, registry)),
        TypeNode::Map { key, value } => format!(
            "map[{}]{}",
            render_type(key, registry),
            render_type(value, registry)
        ),
        TypeNode::Chan { dir, elem } => {
            let prefix = match dir {
                ChanDir::Both => "chan ",
                ChanDir::Send => "chan<- ",
                ChanDir::Recv => "<-chan ",
            };
            format!("{prefix}{}", render_type(elem, registry))
        }
        TypeNode::Struct { fields } => {
            if fields.is_empty() {
                return "struct{}".to_string();
            }
            let rendered: Vec<String> = fields
                .iter()
                .map(|field| format!("{} {}", field.name, render_type(&field.ty, registry)))
                .collect();
            format!("struct{{ {} }}", rendered.join("; "))
        }
        TypeNode::Interface { methods, embedded } => {
            if methods.is_empty() && embedded.is_empty() {
                return "interface{}".to_string();
            }
            let mut parts: Vec<String> = embedded
                .iter()
                .map(|ty| render_type(ty, registry))
                .collect();
            parts.extend(
                methods
                    .iter()
                    .map(|m| format!("{}{}", m.name, render_signature(&m.sig, registry))),
            );
            format!("interface{{ {} }}", parts.join("; "))
        }
        TypeNode::Func { sig } => format!("func{}", render_signature(sig, registry)),
    }
}

/// Render a signature as it appears inside a type (`(int, ...string) error`).
fn render_signature(sig: &Signature, registry: &Registry) -> String {
    let rendered: Vec<String> = sig
        .params
        .iter()
        .enumerate()
        .map(|(i, param)| {
            let last = i + 1 == sig.params.len();
            let ty = if sig.variadic && last {
                variadic_type(&param.ty, registry)
            } else {
                render_type(&param.ty, registry)
            };
            match param.name.as_deref() {
                Some(name) if !name.is_empty() && name != "_" => format!("{name} {ty}"),
                _ => ty,
            }
        })
        .collect();
    format!(
        "({}){}",
        rendered.join(", "),
        render_signature_results(&sig.results, registry)
    )
}

fn render_signature_results(results: &[Param], registry: &Registry) -> String {
    match results.len() {
        0 => String::new(),
        1 => format!(" {}", render_type(&results[0].ty, registry)),
        _ => {
            let rendered: Vec<String> = results
                .iter()
                .map(|result| render_type(&result.ty, registry))
                .collect();
            format!(" ({})", rendered.join(", "))
        }
    }
}

fn variadic_type(ty: &TypeNode, registry: &Registry) -> String {
    match ty {
        TypeNode::Slice { elem } => format!("...{}", render_type(elem, registry)),
        other => render_type(other, registry),
    }
}
