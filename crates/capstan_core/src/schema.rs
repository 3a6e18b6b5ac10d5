//! Function and argument schema value objects.
//!
//! A capability publishes one [`FunctionSpec`] per declared function;
//! each spec carries a free-form return-type tag and the declared
//! [`ArgumentSpec`]s in declaration order. The specs are frozen value
//! objects built once through the chained setters and never mutated
//! after registration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Argument map passed to a function call.
///
/// Keys are argument names; values are arbitrary JSON. Extra keys
/// beyond the declared arguments are permitted and ignored by
/// validation.
pub type ArgumentMap = serde_json::Map<String, Value>;

/// Declared constraints for one named argument of a function.
///
/// All tags are free-form; the core never interprets `kind` or
/// `format`. Only `required` is binding at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Argument name, the key expected in the call's argument map
    pub name: String,
    /// Free-form constraint tag (e.g. "string", "enum")
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub kind: Option<String>,
    /// Free-form format tag (e.g. "anything", "hostname")
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub format: Option<String>,
    /// Whether the value is expected to be a collection
    #[serde(default)]
    pub list: bool,
    /// Whether the argument must be present in a call
    #[serde(default)]
    pub required: bool,
    /// Default value published in the schema; not applied at call time
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_value: Option<Value>,
}

impl ArgumentSpec {
    /// Create a new argument spec with documented defaults:
    /// `list = false`, `required = false`, everything else unset.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            format: None,
            list: false,
            required: false,
            default_value: None,
        }
    }

    /// Set the constraint tag (serialized as `type`)
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the format tag
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set whether the value is expected to be a collection
    #[must_use]
    pub fn with_list(mut self, list: bool) -> Self {
        self.list = list;
        self
    }

    /// Set whether the argument is required
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the published default value
    #[must_use]
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// A named, schema-described operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Function name, the registry key
    pub name: String,
    /// Free-form return-type tag (e.g. "raw", "structured")
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub return_type: Option<String>,
    /// Declared arguments in declaration order
    #[serde(default)]
    pub arguments: Vec<ArgumentSpec>,
}

impl FunctionSpec {
    /// Create a new function spec with no return type and no arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: None,
            arguments: Vec::new(),
        }
    }

    /// Set the return-type tag
    #[must_use]
    pub fn with_return(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    /// Append an argument spec (declaration order is preserved)
    #[must_use]
    pub fn with_argument(mut self, argument: ArgumentSpec) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Iterate over the required arguments, declaration order
    pub fn required_arguments(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.arguments.iter().filter(|a| a.required)
    }
}
