//! CAPSTAN Capability Runtime
//!
//! Per-type capability registries with declarative function schemas,
//! call validation, and dispatch to a backing library object.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dispatch;
pub mod library;
pub mod registry;
pub mod validate;

pub use dispatch::DispatchError;
pub use library::{FnLibrary, Library, LibraryError};
pub use registry::{Capability, CapabilitySchema, FunctionSchema};
