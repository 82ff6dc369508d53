//! Generator orchestration: per requested interface, allocate names for
//! every method, then render the mock declarations.
//!
//! Rendering is deferred until every interface has been processed so that a
//! qualifier adjustment forced by a later interface is reflected everywhere
//! in the shared output unit, including its import block.

mod render;

use crate::cli::CliError;
use crate::error::{Error, Result};
use crate::model::PackageRef;
use crate::oracle::TypeOracle;
use crate::registry::{MethodScope, Registry, VarId};

/// Options that shape the generated output.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Output package name; defaults to the source package's name.
    pub pkg_name: Option<String>,
    /// Emit minimal zero-value stubs instead of call-tracking mocks.
    pub stub_impl: bool,
    /// Omit the compile-time interface-satisfaction assertion.
    pub skip_ensure: bool,
}

/// One requested interface, optionally with a name override for the
/// generated type (`Interface:Alias`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub interface: String,
    pub alias: Option<String>,
}

impl Selector {
    /// Parse a selector argument of the form `Interface` or
    /// `Interface:Alias`.
    ///
    /// # Errors
    /// Returns a CLI error for empty interface or alias parts.
    pub fn parse(raw: &str) -> Result<Self> {
        let (interface, alias) = match raw.split_once(':') {
            Some((interface, alias)) => (interface, Some(alias)),
            None => (raw, None),
        };
        if interface.is_empty() || alias.is_some_and(str::is_empty) {
            return Err(Error::Cli(CliError::new(format!(
                "invalid interface selector {raw:?}: expected 'Interface' or 'Interface:Alias'"
            ))));
        }
        Ok(Self {
            interface: interface.to_string(),
            alias: alias.map(str::to_string),
        })
    }

    fn impl_name(&self, stub: bool) -> String {
        match &self.alias {
            Some(alias) => alias.clone(),
            None => {
                let suffix = if stub { "Stub" } else { "Mock" };
                format!("{}{suffix}", self.interface)
            }
        }
    }
}

pub(crate) struct MethodData {
    name: String,
    scope: MethodScope,
    params: Vec<VarId>,
    results: Vec<VarId>,
    variadic: bool,
}

pub(crate) struct MockData {
    interface: String,
    impl_name: String,
    methods: Vec<MethodData>,
}

/// Generate one source unit containing a mock for every selector, in order.
///
/// # Errors
/// Fails when a selector names an interface the oracle does not declare, or
/// when a naming invariant is found violated (a bug, surfaced as
/// [`Error::Internal`]).
pub fn generate(
    oracle: &dyn TypeOracle,
    cfg: &Config,
    selectors: &[Selector],
) -> Result<String> {
    let src_pkg = oracle.package().clone();
    let pkg_name = cfg
        .pkg_name
        .clone()
        .unwrap_or_else(|| src_pkg.name.clone());
    let same_package = pkg_name == src_pkg.name;
    let mut registry = Registry::new(src_pkg.clone(), same_package);

    let mut mocks = Vec::with_capacity(selectors.len());
    for selector in selectors {
        let Some(def) = oracle.interface(&selector.interface) else {
            return Err(Error::load(format!(
                "interface {} not found in package {}",
                selector.interface, src_pkg.path
            )));
        };

        // Imports the emitted declarations themselves rely on are routed
        // through the registry like any package found in a signature.
        if !cfg.stub_impl {
            registry.add_import(&PackageRef::new("sync", "sync"));
        }
        if !same_package && !cfg.skip_ensure {
            registry.add_import(&src_pkg);
        }

        let mut methods = Vec::with_capacity(def.methods.len());
        for method in &def.methods {
            let mut scope = MethodScope::new();
            let params = method
                .sig
                .params
                .iter()
                .map(|param| scope.add_var(&mut registry, param, ""))
                .collect();
            let results = method
                .sig
                .results
                .iter()
                .map(|result| scope.add_var(&mut registry, result, "Out"))
                .collect();
            methods.push(MethodData {
                name: method.name.clone(),
                scope,
                params,
                results,
                variadic: method.sig.variadic,
            });
        }
        tracing::debug!(
            interface = %def.name,
            methods = def.methods.len(),
            "processed interface"
        );
        mocks.push(MockData {
            interface: def.name.clone(),
            impl_name: selector.impl_name(cfg.stub_impl),
            methods,
        });
    }

    registry.verify_unique_qualifiers()?;
    Ok(render::render_file(&registry, &pkg_name, &mocks, cfg))
}
