#![deny(clippy::all, clippy::perf, clippy::suspicious)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

//! Core library for `mimic`, a generator of mock implementations of Go
//! interfaces.
//!
//! The pipeline has three layers: the [`oracle`] loads a type-graph
//! descriptor describing a Go package and its interfaces, the [`registry`]
//! allocates collision-free package qualifiers and method-scoped variable
//! names, and [`generate`] renders the mocks as Go source text.

pub mod cli;
pub mod error;
pub mod generate;
pub mod logging;
pub mod model;
pub mod oracle;
pub mod registry;
pub mod version;

pub use error::{Error, Result};
pub use generate::{Config, Selector};
pub use oracle::{DescriptorOracle, TypeOracle};
