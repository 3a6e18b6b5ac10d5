//! Call validation against a function's declared argument specs.
//!
//! The binding rule is presence of required arguments; extra keys in
//! the call map are permitted and ignored. Deeper checks (type, format,
//! list shape) are opt-in and never consulted by dispatch.

use capstan_core::{ArgumentMap, FunctionSpec};
use serde_json::Value;

/// Names of required arguments absent from the call map, declaration
/// order.
#[must_use]
pub fn missing_required<'a>(spec: &'a FunctionSpec, args: &ArgumentMap) -> Vec<&'a str> {
    spec.required_arguments()
        .filter(|a| !args.contains_key(&a.name))
        .map(|a| a.name.as_str())
        .collect()
}

/// Whether the call satisfies the spec's binding rule: every required
/// argument is present.
#[must_use]
pub fn valid_call(spec: &FunctionSpec, args: &ArgumentMap) -> bool {
    missing_required(spec, args).is_empty()
}

/// Opt-in shape check: names of declared list arguments whose supplied
/// value is not a JSON array. Absent arguments are not reported.
#[must_use]
pub fn list_shape_mismatches<'a>(spec: &'a FunctionSpec, args: &ArgumentMap) -> Vec<&'a str> {
    spec.arguments
        .iter()
        .filter(|a| a.list)
        .filter(|a| {
            args.get(&a.name)
                .is_some_and(|v| !matches!(v, Value::Array(_)))
        })
        .map(|a| a.name.as_str())
        .collect()
}
