//! Per-type capability registry and schema export.
//!
//! A [`Capability`] owns its function map outright. Deriving a subtype
//! with [`Capability::derive`] hands back a brand-new registry with a
//! recomputed namespace, an empty function map, and a default library;
//! nothing is shared or copied from the parent, so declarations on one
//! capability are never visible to siblings, parents, or children.

use capstan_core::{namespace, ArgumentMap, ArgumentSpec, FunctionSpec};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::library::Library;
use crate::validate;

/// Schema entry for one exported function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSchema {
    /// Free-form return-type tag, omitted when never declared
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub return_type: Option<String>,
    /// Declared arguments in declaration order
    pub arguments: Vec<ArgumentSpec>,
}

/// Serializable schema of a capability: function name to
/// [`FunctionSchema`], declaration order.
///
/// Reflects only functions declared directly on the exporting
/// capability, and is re-derivable at any time after definitions are
/// complete.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySchema(
    /// Exported functions keyed by name, declaration order
    pub IndexMap<String, FunctionSchema>,
);

impl CapabilitySchema {
    /// Get the schema entry for a function name
    #[must_use]
    pub fn get(&self, function: &str) -> Option<&FunctionSchema> {
        self.0.get(function)
    }

    /// Number of exported functions
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the schema exports no functions
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A capability type: a named set of schema-described functions plus
/// the library object that backs them.
///
/// Populated once at definition time through the declaration methods,
/// then treated as read-only: every query and dispatch takes `&self`,
/// so a populated capability can be shared across threads behind an
/// `Arc` without locking.
#[derive(Clone)]
pub struct Capability {
    pub(crate) name: String,
    pub(crate) namespace: String,
    pub(crate) functions: IndexMap<String, FunctionSpec>,
    pub(crate) library: Option<Arc<dyn Library>>,
}

impl Capability {
    /// Create a capability for a type name with an empty registry.
    ///
    /// The namespace is derived from the name once, here, and never
    /// recomputed.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        let name = type_name.into();
        let namespace = namespace::derive(&name);
        Self {
            name,
            namespace,
            functions: IndexMap::new(),
            library: None,
        }
    }

    /// Derive a subtype capability.
    ///
    /// The result starts fresh: its namespace comes from the new type
    /// name, its function map is empty, and its library defaults to the
    /// new type itself. The parent is untouched and shares no state
    /// with the result.
    #[must_use]
    pub fn derive(&self, type_name: impl Into<String>) -> Self {
        Self::new(type_name)
    }

    /// Declared type name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Route namespace derived from the type name
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Register a function with no arguments and no return type.
    pub fn function(&mut self, name: impl Into<String>) -> &mut Self {
        self.declare(FunctionSpec::new(name))
    }

    /// Register a function built by the configure closure.
    ///
    /// Declaration-block equivalent: the closure receives the empty
    /// spec and returns the configured one.
    pub fn function_with<F>(&mut self, name: impl Into<String>, configure: F) -> &mut Self
    where
        F: FnOnce(FunctionSpec) -> FunctionSpec,
    {
        self.declare(configure(FunctionSpec::new(name)))
    }

    /// Register a prebuilt function spec under its own name.
    ///
    /// Re-declaring a name overwrites the previous spec; there is no
    /// duplicate detection.
    pub fn declare(&mut self, spec: FunctionSpec) -> &mut Self {
        self.functions.insert(spec.name.clone(), spec);
        self
    }

    /// Set the backing library for this capability only.
    pub fn library(&mut self, library: Arc<dyn Library>) -> &mut Self {
        self.library = Some(library);
        self
    }

    /// Name of the resolved library: the set library's name, or this
    /// capability's own name when none was set.
    #[must_use]
    pub fn library_name(&self) -> &str {
        match &self.library {
            Some(lib) => lib.name(),
            None => &self.name,
        }
    }

    /// Whether the resolved library provides every registered function.
    ///
    /// Checked on demand, never cached. With no library set the
    /// capability itself is the library and exposes no operations, so
    /// this holds only for an empty registry.
    #[must_use]
    pub fn valid_library(&self) -> bool {
        match &self.library {
            Some(lib) => self.functions.keys().all(|f| lib.provides(f)),
            None => self.functions.is_empty(),
        }
    }

    /// Get a registered function spec by name
    #[must_use]
    pub fn get(&self, function: &str) -> Option<&FunctionSpec> {
        self.functions.get(function)
    }

    /// Whether a function name is registered
    #[must_use]
    pub fn contains(&self, function: &str) -> bool {
        self.functions.contains_key(function)
    }

    /// Registered function names, declaration order
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }

    /// The full function registry, declaration order
    #[must_use]
    pub fn functions(&self) -> &IndexMap<String, FunctionSpec> {
        &self.functions
    }

    /// Number of registered functions
    #[must_use]
    pub fn count(&self) -> usize {
        self.functions.len()
    }

    /// Whether no functions are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Whether a call would pass dispatch validation.
    ///
    /// Never errors: false when the function is unregistered or a
    /// required argument is absent, true otherwise. Extra keys in the
    /// argument map are ignored.
    #[must_use]
    pub fn valid_function_call(&self, function: &str, args: &ArgumentMap) -> bool {
        self.functions
            .get(function)
            .is_some_and(|spec| validate::valid_call(spec, args))
    }

    /// Export the schema of the functions declared on this capability.
    #[must_use]
    pub fn to_schema(&self) -> CapabilitySchema {
        CapabilitySchema(
            self.functions
                .iter()
                .map(|(name, spec)| {
                    (
                        name.clone(),
                        FunctionSchema {
                            return_type: spec.return_type.clone(),
                            arguments: spec.arguments.clone(),
                        },
                    )
                })
                .collect(),
        )
    }
}
