//! Dispatch of validated calls to the backing library.
//!
//! `run_function` walks lookup, validation, library resolution, and
//! invocation in that order, failing terminally at the first state
//! that does not hold. Errors raised by the library operation itself
//! are forwarded to the caller untranslated.

use capstan_core::ArgumentMap;
use serde_json::Value;

use crate::library::LibraryError;
use crate::registry::Capability;
use crate::validate;

/// Error from dispatching a function call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Function unregistered on the capability, or required arguments
    /// absent from the call. `missing` is empty in the unregistered
    /// case.
    InvalidFunctionCall {
        /// Capability that was validating
        capability: String,
        /// Requested function name
        function: String,
        /// Required argument names absent from the call
        missing: Vec<String>,
    },
    /// Function registered and arguments valid, but the resolved
    /// library does not provide a matching operation.
    LibraryMissingFunction {
        /// Requested function name
        function: String,
        /// Name of the resolved library
        library: String,
    },
    /// The library operation itself failed; carried verbatim.
    Library(LibraryError),
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFunctionCall {
                capability,
                function,
                missing,
            } => {
                if missing.is_empty() {
                    write!(f, "no function {} registered on {}", function, capability)
                } else {
                    write!(
                        f,
                        "call to {} on {} missing required arguments: {}",
                        function,
                        capability,
                        missing.join(", ")
                    )
                }
            }
            Self::LibraryMissingFunction { function, library } => {
                write!(f, "library {} does not provide function {}", library, function)
            }
            Self::Library(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Library(err) => Some(err),
            _ => None,
        }
    }
}

impl Capability {
    /// Validate a call and forward it to the backing library.
    ///
    /// The library operation's result is returned verbatim, with no
    /// post-processing; an error it produces comes back inside
    /// [`DispatchError::Library`] unchanged.
    ///
    /// # Errors
    ///
    /// [`DispatchError::InvalidFunctionCall`] when the function is
    /// unregistered or a required argument is absent;
    /// [`DispatchError::LibraryMissingFunction`] when the resolved
    /// library does not provide the function.
    pub fn run_function(
        &self,
        function: &str,
        args: &ArgumentMap,
    ) -> Result<Value, DispatchError> {
        let Some(spec) = self.functions.get(function) else {
            tracing::warn!(
                capability = %self.name,
                function,
                "dispatch to unregistered function"
            );
            return Err(DispatchError::InvalidFunctionCall {
                capability: self.name.clone(),
                function: function.to_string(),
                missing: Vec::new(),
            });
        };

        let missing = validate::missing_required(spec, args);
        if !missing.is_empty() {
            tracing::warn!(
                capability = %self.name,
                function,
                ?missing,
                "call rejected, required arguments absent"
            );
            return Err(DispatchError::InvalidFunctionCall {
                capability: self.name.clone(),
                function: function.to_string(),
                missing: missing.into_iter().map(String::from).collect(),
            });
        }

        let library = self
            .library
            .as_deref()
            .filter(|lib| lib.provides(function))
            .ok_or_else(|| DispatchError::LibraryMissingFunction {
                function: function.to_string(),
                library: self.library_name().to_string(),
            })?;

        tracing::debug!(
            capability = %self.name,
            function,
            library = library.name(),
            "dispatching"
        );
        library.call(function, args).map_err(DispatchError::Library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{FnLibrary, Library};
    use capstan_core::ArgumentSpec;
    use serde_json::json;
    use std::sync::Arc;

    fn object(value: Value) -> ArgumentMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn ice_king() -> Capability {
        let mut cap = Capability::new("IceKing");
        cap.function_with("ice_attack", |f| {
            f.with_argument(ArgumentSpec::new("victim").with_required(true).with_kind("string"))
        });
        cap
    }

    fn ice_wand() -> Arc<dyn Library> {
        Arc::new(FnLibrary::new("IceWand").operation("ice_attack", |args| {
            let victim = args
                .get("victim")
                .and_then(Value::as_str)
                .ok_or_else(|| LibraryError::new("ice_attack", "victim must be a string"))?;
            Ok(json!(format!("ZAP {}!", victim.to_uppercase())))
        }))
    }

    #[test]
    fn test_run_unregistered_function() {
        let cap = ice_king();
        let err = cap
            .run_function("icicle", &object(json!({"victim": "Gunther"})))
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::InvalidFunctionCall {
                capability: "IceKing".to_string(),
                function: "icicle".to_string(),
                missing: vec![],
            }
        );
    }

    #[test]
    fn test_run_with_missing_required_argument() {
        let mut cap = ice_king();
        cap.library(ice_wand());

        let err = cap.run_function("ice_attack", &ArgumentMap::new()).unwrap_err();
        assert_eq!(
            err,
            DispatchError::InvalidFunctionCall {
                capability: "IceKing".to_string(),
                function: "ice_attack".to_string(),
                missing: vec!["victim".to_string()],
            }
        );
    }

    #[test]
    fn test_run_without_library() {
        let cap = ice_king();
        let err = cap
            .run_function("ice_attack", &object(json!({"victim": "Gunther"})))
            .unwrap_err();
        // No library declared: the capability itself backs the call and
        // exposes no operations.
        assert_eq!(
            err,
            DispatchError::LibraryMissingFunction {
                function: "ice_attack".to_string(),
                library: "IceKing".to_string(),
            }
        );
    }

    #[test]
    fn test_run_with_library_missing_function() {
        let mut cap = ice_king();
        cap.library(Arc::new(FnLibrary::new("IceWand")));

        let err = cap
            .run_function("ice_attack", &object(json!({"victim": "Gunther"})))
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::LibraryMissingFunction {
                function: "ice_attack".to_string(),
                library: "IceWand".to_string(),
            }
        );
    }

    #[test]
    fn test_run_returns_library_result_verbatim() {
        let mut cap = ice_king();
        cap.library(ice_wand());

        let result = cap
            .run_function("ice_attack", &object(json!({"victim": "Gunther"})))
            .unwrap();
        assert_eq!(result, json!("ZAP GUNTHER!"));
    }

    #[test]
    fn test_run_ignores_extra_argument_keys() {
        let mut cap = ice_king();
        cap.library(ice_wand());

        let args = object(json!({"victim": "Gunther", "weather": "snow"}));
        assert_eq!(cap.run_function("ice_attack", &args).unwrap(), json!("ZAP GUNTHER!"));
    }

    #[test]
    fn test_library_error_propagates_unchanged() {
        let mut cap = ice_king();
        cap.library(ice_wand());

        // A non-string victim passes presence validation but fails
        // inside the library operation.
        let err = cap
            .run_function("ice_attack", &object(json!({"victim": 7})))
            .unwrap_err();
        let DispatchError::Library(inner) = err else {
            panic!("expected library error, got {err}");
        };
        assert_eq!(inner, LibraryError::new("ice_attack", "victim must be a string"));
        assert_eq!(inner.to_string(), "victim must be a string");
    }

    #[test]
    fn test_dispatch_error_display() {
        let err = DispatchError::InvalidFunctionCall {
            capability: "IceKing".to_string(),
            function: "icicle".to_string(),
            missing: vec![],
        };
        assert_eq!(err.to_string(), "no function icicle registered on IceKing");

        let err = DispatchError::InvalidFunctionCall {
            capability: "IceKing".to_string(),
            function: "ice_attack".to_string(),
            missing: vec!["victim".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "call to ice_attack on IceKing missing required arguments: victim"
        );

        let err = DispatchError::LibraryMissingFunction {
            function: "ice_attack".to_string(),
            library: "IceWand".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "library IceWand does not provide function ice_attack"
        );
    }

    #[test]
    fn test_dispatch_error_source() {
        use std::error::Error;

        let err = DispatchError::Library(LibraryError::new("ice_attack", "wand is broken"));
        assert!(err.source().is_some());

        let err = DispatchError::LibraryMissingFunction {
            function: "ice_attack".to_string(),
            library: "IceWand".to_string(),
        };
        assert!(err.source().is_none());
    }
}
