//! The symbol model behind generated mocks: a run-scoped package registry
//! plus a per-method variable allocator.
//!
//! The registry is the single source of truth mapping import paths to
//! display qualifiers. It is shared mutable state threaded explicitly (by
//! `&mut`) through every allocation, so qualifier choices are linearized
//! relative to every read that depends on them.

mod package;
mod scope;

use std::collections::BTreeMap;

pub use package::Package;
pub use scope::{MethodScope, Var, VarId};

use crate::error::{Error, Result};
use crate::model::PackageRef;
use package::strip_vendor_path;

/// Run-scoped table of every package referenced by any mocked signature.
#[derive(Debug)]
pub struct Registry {
    src_pkg: PackageRef,
    /// Whether the generated code lives in the source package itself. When
    /// it does, source-package types need no qualifier and no import.
    same_package: bool,
    /// Keyed by vendor-stripped import path. BTree order keeps every
    /// qualifier decision reproducible run over run.
    imports: BTreeMap<String, Package>,
}

impl Registry {
    pub fn new(src_pkg: PackageRef, same_package: bool) -> Self {
        Self {
            src_pkg,
            same_package,
            imports: BTreeMap::new(),
        }
    }

    /// Identity of the package the mocked interfaces are declared in.
    pub fn src_pkg(&self) -> &PackageRef {
        &self.src_pkg
    }

    /// Register `pkg`, deduplicating by vendor-stripped path, and return the
    /// import key. Returns `None` when the package is the one the generated
    /// code lives in (no qualifier needed).
    ///
    /// On first registration a qualifier collision with an existing package
    /// escalates disambiguation for the new package; the earlier package
    /// keeps its shorter qualifier.
    pub fn add_import(&mut self, pkg: &PackageRef) -> Option<String> {
        let path = strip_vendor_path(&pkg.path).to_string();
        if self.is_mock_package(&path) {
            return None;
        }
        if !self.imports.contains_key(&path) {
            let mut entry = Package::new(path.clone(), pkg.name.clone());
            if self.search_import(entry.qualifier()).is_some() {
                let alias = self.escalated_name(&entry);
                tracing::debug!(path = %path, alias = %alias, "import qualifier collision");
                entry.set_alias(alias);
            }
            self.imports.insert(path.clone(), entry);
        }
        Some(path)
    }

    /// Find a registered package by its current qualifier.
    pub fn search_import(&self, qualifier: &str) -> Option<&Package> {
        self.imports
            .values()
            .find(|pkg| pkg.qualifier() == qualifier)
    }

    /// The qualifier for a type declared in `pkg`, or `None` when the type
    /// renders unqualified (it lives in the generated code's own package).
    pub fn qualifier_for<'a>(&'a self, pkg: &'a PackageRef) -> Option<&'a str> {
        let path = strip_vendor_path(&pkg.path);
        if self.is_mock_package(path) {
            return None;
        }
        match self.imports.get(path) {
            Some(entry) => Some(entry.qualifier()),
            // Unregistered packages only show up when rendering a graph the
            // scopes never walked; fall back to the declared name.
            None => Some(&pkg.name),
        }
    }

    /// Current qualifier for a registered import key.
    pub(crate) fn qualifier_of(&self, key: &str) -> Option<&str> {
        self.imports.get(key).map(Package::qualifier)
    }

    /// Final qualifier table, sorted by import path, for the emitted import
    /// block.
    pub fn imports(&self) -> impl Iterator<Item = &Package> {
        self.imports.values()
    }

    /// Verify that no two registered paths resolved to the same qualifier.
    ///
    /// # Errors
    /// Returns [`Error::Internal`]; a failure here is a bug in the
    /// disambiguation algorithm, not bad input.
    pub fn verify_unique_qualifiers(&self) -> Result<()> {
        let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
        for pkg in self.imports.values() {
            if let Some(previous) = seen.insert(pkg.qualifier(), pkg.path()) {
                return Err(Error::internal(format!(
                    "qualifier {:?} allocated to both {:?} and {:?}",
                    pkg.qualifier(),
                    previous,
                    pkg.path(),
                )));
            }
        }
        Ok(())
    }

    fn is_mock_package(&self, stripped_path: &str) -> bool {
        self.same_package && stripped_path == strip_vendor_path(&self.src_pkg.path)
    }

    fn escalated_name(&self, pkg: &Package) -> String {
        // The sanitized leaf segment can differ from the declared name
        // (versioned module paths ending in `v2`), so level 0 is a real
        // candidate, not a repeat of the qualifier that just collided.
        let depth = pkg.path().split('/').count();
        for lvl in 0..depth {
            let candidate = pkg.unique_name(lvl);
            if self.search_import(&candidate).is_none() {
                return candidate;
            }
        }
        // Distinct paths whose sanitized segments collapse to the same
        // token. The full-depth candidate is taken, so probe integers.
        let full = pkg.unique_name(depth.saturating_sub(1));
        let mut n = 2;
        loop {
            let candidate = format!("{full}{n}");
            if self.search_import(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}
