//! CAPSTAN Core Types
//!
//! Pure types and logic with no I/O: route namespace derivation and the
//! function/argument schema value objects that capability registries
//! publish and enforce.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod namespace;
pub mod schema;

// Re-exports
pub use schema::{ArgumentMap, ArgumentSpec, FunctionSpec};
