//! The type oracle: the read-only source of truth for the interfaces being
//! mocked.
//!
//! Type introspection itself happens upstream; this crate consumes a
//! pre-extracted type-graph descriptor. The trait keeps the generator
//! independent of where the graph comes from, which the tests exploit.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{InterfaceDef, PackageRef};

/// File probed inside a source directory when the path itself is not a
/// descriptor file.
pub const DESCRIPTOR_FILE: &str = "typegraph.json";

/// Read-only view over the type graph of one source package.
pub trait TypeOracle {
    /// Identity of the package declared at the source location.
    fn package(&self) -> &PackageRef;

    /// Look up a declared interface by name.
    fn interface(&self, name: &str) -> Option<&InterfaceDef>;
}

#[derive(Debug, Deserialize)]
struct Descriptor {
    package: PackageRef,
    #[serde(default)]
    interfaces: Vec<InterfaceDef>,
}

/// Type oracle backed by a JSON type-graph descriptor.
#[derive(Debug)]
pub struct DescriptorOracle {
    package: PackageRef,
    interfaces: Vec<InterfaceDef>,
}

impl DescriptorOracle {
    /// Load the descriptor stored at `source`, which may name the
    /// descriptor file directly or a directory containing
    /// [`DESCRIPTOR_FILE`].
    ///
    /// # Errors
    /// Returns [`Error::Load`] when the descriptor is missing or malformed.
    pub fn load(source: &Path) -> Result<Self> {
        let path = descriptor_path(source);
        let raw = fs::read_to_string(&path)
            .map_err(|err| Error::load(format!("read {}: {err}", path.display())))?;
        let descriptor: Descriptor = serde_json::from_str(&raw)
            .map_err(|err| Error::load(format!("parse {}: {err}", path.display())))?;
        tracing::debug!(
            package = %descriptor.package.path,
            interfaces = descriptor.interfaces.len(),
            "loaded type-graph descriptor"
        );
        Ok(Self {
            package: descriptor.package,
            interfaces: descriptor.interfaces,
        })
    }

    /// Build an oracle from an in-memory graph. Used by tests and by
    /// callers that extract the graph themselves.
    pub fn from_parts(package: PackageRef, interfaces: Vec<InterfaceDef>) -> Self {
        Self {
            package,
            interfaces,
        }
    }
}

impl TypeOracle for DescriptorOracle {
    fn package(&self) -> &PackageRef {
        &self.package
    }

    fn interface(&self, name: &str) -> Option<&InterfaceDef> {
        self.interfaces.iter().find(|def| def.name == name)
    }
}

fn descriptor_path(source: &Path) -> PathBuf {
    if source.extension().is_some_and(|ext| ext == "json") {
        source.to_path_buf()
    } else {
        source.join(DESCRIPTOR_FILE)
    }
}
