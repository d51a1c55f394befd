//! Parameter binding: call-time arguments to ordered query parameters.
//!
//! Each operation declares a list of [`ParameterRule`]s. Rules are evaluated
//! in declared order and the emitted parameters keep that order, whatever
//! order the caller's argument map happens to have. Argument keys that no
//! rule reads never reach the wire.

use serde_json::{Map, Value};

use crate::coerce::{bool_value_to_wire, date_to_wire, identifier_to_wire, integer_to_wire};
use crate::error::{MarkusError, Result};
use crate::registry::OperationDescriptor;

/// Loosely typed call-time arguments.
pub type Args = Map<String, Value>;

/// Ordered query parameters as `(wire key, value)` pairs.
pub type QueryParams = Vec<(String, String)>;

/// Computes a wire value from the whole argument map.
///
/// Returning `Ok(None)` omits the parameter; an argument the function
/// cannot interpret is an `InvalidArgument` error.
pub type DeriveFn = fn(&Args) -> Result<Option<String>>;

/// Conversion applied to an argument before it is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// `true` / `false`.
    Bool,
    /// `dd.MM.yyyy`.
    Date,
    /// Decimal integer.
    Integer,
}

impl Coercion {
    fn apply(self, key: &str, value: &Value) -> Result<String> {
        match self {
            Self::Bool => bool_value_to_wire(key, value),
            Self::Date => date_to_wire(key, value),
            Self::Integer => integer_to_wire(key, value),
        }
    }
}

/// Rule reading one argument, optionally renamed, defaulted and coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainRule {
    /// Call-time argument name.
    pub source_key: String,

    /// Query-string key actually sent.
    pub wire_key: String,

    /// Wire value used when the argument is absent.
    pub default: Option<String>,

    /// Conversion to apply to a present argument.
    pub coercion: Option<Coercion>,

    /// Whether an absent argument without default is an error.
    pub required: bool,
}

impl PlainRule {
    /// Create a rule sending `source_key` under the same name.
    #[must_use]
    pub fn new(source_key: impl Into<String>) -> Self {
        let source_key = source_key.into();
        Self {
            wire_key: source_key.clone(),
            source_key,
            default: None,
            coercion: None,
            required: false,
        }
    }

    /// Send the argument under a different query key.
    #[must_use]
    pub fn with_wire_key(mut self, wire_key: impl Into<String>) -> Self {
        self.wire_key = wire_key.into();
        self
    }

    /// Use this wire value when the argument is absent.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Convert the argument before sending it.
    #[must_use]
    pub fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = Some(coercion);
        self
    }

    /// Fail the call when the argument is absent and has no default.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn bind(&self, args: &Args) -> Result<Option<String>> {
        // An explicit null is treated like a missing key.
        let value = args.get(&self.source_key).filter(|v| !v.is_null());

        match (value, &self.default) {
            (Some(value), _) => {
                let wire = match self.coercion {
                    Some(coercion) => coercion.apply(&self.source_key, value)?,
                    None => identifier_to_wire(&self.source_key, value)?,
                };
                Ok(Some(wire))
            }
            (None, Some(default)) => Ok(Some(default.clone())),
            (None, None) if self.required => Err(MarkusError::invalid_argument(
                &self.source_key,
                "required argument is missing",
            )),
            (None, None) => Ok(None),
        }
    }
}

/// One transformation step from call-time arguments to a query parameter.
#[derive(Debug, Clone)]
pub enum ParameterRule {
    /// Reads a single argument.
    Plain(PlainRule),

    /// Computes its value from the whole argument map.
    Derived { wire_key: String, derive: DeriveFn },
}

impl ParameterRule {
    /// Start a plain rule for `source_key`.
    #[must_use]
    pub fn plain(source_key: impl Into<String>) -> PlainRule {
        PlainRule::new(source_key)
    }

    /// Create a derived rule.
    #[must_use]
    pub fn derived(wire_key: impl Into<String>, derive: DeriveFn) -> Self {
        Self::Derived {
            wire_key: wire_key.into(),
            derive,
        }
    }

    /// Query key this rule emits.
    #[must_use]
    pub fn wire_key(&self) -> &str {
        match self {
            Self::Plain(rule) => &rule.wire_key,
            Self::Derived { wire_key, .. } => wire_key,
        }
    }

    /// Evaluate the rule. `Ok(None)` means the parameter is omitted.
    pub fn bind(&self, args: &Args) -> Result<Option<(String, String)>> {
        let value = match self {
            Self::Plain(rule) => rule.bind(args)?,
            Self::Derived { derive, .. } => derive(args)?,
        };
        Ok(value.map(|v| (self.wire_key().to_string(), v)))
    }
}

impl From<PlainRule> for ParameterRule {
    fn from(rule: PlainRule) -> Self {
        Self::Plain(rule)
    }
}

/// Bind call-time arguments to the descriptor's query parameters.
///
/// # Examples
/// ```
/// use markus_client::binder::{bind, Args};
/// use markus_client::registry::create_markus_registry;
/// use serde_json::json;
///
/// let registry = create_markus_registry();
/// let descriptor = registry.describe("shows").unwrap();
///
/// let args: Args = json!({"days_from_date": 3, "dummy": "ignored"})
///     .as_object()
///     .cloned()
///     .unwrap_or_default();
/// let params = bind(descriptor, &args).unwrap();
/// assert_eq!(params, vec![("nrOfDays".to_string(), "3".to_string())]);
/// ```
pub fn bind(descriptor: &OperationDescriptor, args: &Args) -> Result<QueryParams> {
    let mut params = QueryParams::with_capacity(descriptor.parameters.len());

    for rule in &descriptor.parameters {
        if let Some(param) = rule.bind(args)? {
            params.push(param);
        }
    }

    tracing::trace!(
        operation = %descriptor.operation,
        params = ?params,
        "Bound query parameters"
    );

    Ok(params)
}
