//! Backing library objects that validated calls dispatch to.
//!
//! A library declares the operation names it exposes through an
//! explicit lookup instead of runtime reflection: the registry asks
//! [`Library::provides`] before forwarding a call.

use capstan_core::ArgumentMap;
use indexmap::IndexMap;
use serde_json::Value;

/// Error returned by a library operation.
///
/// Libraries build these from their own failures; dispatch forwards
/// them to the caller verbatim, without translation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LibraryError {
    /// Operation that failed
    pub function: String,
    /// Failure description, surfaced unchanged to the caller
    pub message: String,
}

impl LibraryError {
    /// Create a new library error
    #[must_use]
    pub fn new(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            message: message.into(),
        }
    }
}

/// A backing object that executes a capability's functions.
///
/// The registry requires nothing beyond name matching: every function
/// registered on a capability must be answered by [`provides`], and
/// [`call`] receives the whole argument map as its single input.
///
/// [`provides`]: Library::provides
/// [`call`]: Library::call
pub trait Library: Send + Sync {
    /// Name of the library, used in error context
    fn name(&self) -> &str;

    /// Whether this library exposes an operation with the given name
    fn provides(&self, function: &str) -> bool;

    /// Execute an operation with the call's argument map.
    ///
    /// # Errors
    ///
    /// Returns whatever error the operation itself produces; dispatch
    /// does not retry or translate it.
    fn call(&self, function: &str, args: &ArgumentMap) -> Result<Value, LibraryError>;
}

type Operation = Box<dyn Fn(&ArgumentMap) -> Result<Value, LibraryError> + Send + Sync>;

/// Table-backed [`Library`]: named closures registered up front.
///
/// The operation table doubles as the capability-description interface;
/// `provides` is a plain key lookup.
pub struct FnLibrary {
    name: String,
    operations: IndexMap<String, Operation>,
}

impl FnLibrary {
    /// Create an empty library with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: IndexMap::new(),
        }
    }

    /// Register an operation under a function name.
    ///
    /// Re-registering a name replaces the previous operation.
    #[must_use]
    pub fn operation<F>(mut self, function: impl Into<String>, op: F) -> Self
    where
        F: Fn(&ArgumentMap) -> Result<Value, LibraryError> + Send + Sync + 'static,
    {
        self.operations.insert(function.into(), Box::new(op));
        self
    }

    /// Names of the registered operations, registration order
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }
}

impl Library for FnLibrary {
    fn name(&self) -> &str {
        &self.name
    }

    fn provides(&self, function: &str) -> bool {
        self.operations.contains_key(function)
    }

    fn call(&self, function: &str, args: &ArgumentMap) -> Result<Value, LibraryError> {
        let op = self.operations.get(function).ok_or_else(|| {
            LibraryError::new(
                function,
                format!("library {} does not provide {}", self.name, function),
            )
        })?;
        op(args)
    }
}
