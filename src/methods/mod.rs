use crate::ast::{Value, ValueKind};
use crate::error::EvalError;
use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

mod catalog;

pub(crate) use catalog::{filter_elements, map_property, reduce_sum};

/// The runnable form of an extension method: receiver plus positional,
/// already-coerced arguments.
pub type MethodImpl = fn(&Value, &[Value]) -> Result<Value, EvalError>;

/// Grouping used by the UI to order suggestions; it never filters anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MethodCategory {
    Suggested,
    Other,
}

/// The declared type of one extension-method parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Any,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default)]
    pub optional: bool,
    #[serde(
        default,
        rename = "defaultValue",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<String>,
}

impl ParameterSpec {
    pub fn required(name: &str, param_type: ParameterType) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            optional: false,
            default_value: None,
        }
    }

    pub fn optional(name: &str, param_type: ParameterType) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            optional: true,
            default_value: None,
        }
    }

    pub fn with_default(mut self, default: &str) -> Self {
        self.default_value = Some(default.to_string());
        self
    }
}

/// Descriptor of one extension method, defined once at startup and consumed
/// verbatim by any UI rendering a suggestion list.
///
/// The name carries the invocation marker: `"filter()"` denotes a callable,
/// `"length"` a bare property read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub name: String,
    pub description: String,
    pub example: String,
    #[serde(rename = "appliesTo")]
    pub applies_to: Vec<ValueKind>,
    pub category: MethodCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSpec>,
}

impl MethodDefinition {
    /// The name without the `()` invocation marker.
    pub fn base_name(&self) -> &str {
        self.name.strip_suffix("()").unwrap_or(&self.name)
    }

    /// Whether calling syntax (rather than a bare property read) applies.
    pub fn is_invocation(&self) -> bool {
        self.name.ends_with("()")
    }

    pub fn applies_to_kind(&self, kind: ValueKind) -> bool {
        self.applies_to.contains(&ValueKind::Any) || self.applies_to.contains(&kind)
    }
}

/// Static catalogue of extension-method descriptors and their
/// implementations, queryable by the runtime kind of a candidate value.
///
/// Built once at startup and never mutated afterwards; evaluation resolves
/// `.method(...)` calls through [`MethodRegistry::dispatch`] instead of
/// installing anything onto shared built-in types, so concurrent evaluations
/// cannot observe each other.
pub struct MethodRegistry {
    definitions: Vec<MethodDefinition>,
    impls: AHashMap<String, MethodImpl>,
}

impl MethodRegistry {
    /// A registry pre-populated with the builtin catalogue.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        catalog::install(&mut registry);
        registry
    }

    pub fn empty() -> Self {
        Self {
            definitions: Vec::new(),
            impls: AHashMap::new(),
        }
    }

    /// Registers one descriptor with its implementation. Later registrations
    /// of the same base name replace the implementation.
    pub fn register(&mut self, definition: MethodDefinition, implementation: MethodImpl) {
        self.impls
            .insert(definition.base_name().to_string(), implementation);
        self.definitions.push(definition);
    }

    pub fn definitions(&self) -> &[MethodDefinition] {
        &self.definitions
    }

    /// Every definition applicable to the runtime kind of `value`, sorted
    /// with `Suggested` first, then alphabetically by name. Values without a
    /// method kind (bool, null, undefined) get an empty list.
    pub fn methods_applicable_to(&self, value: &Value) -> Vec<&MethodDefinition> {
        let Some(kind) = value.method_kind() else {
            return Vec::new();
        };
        self.definitions
            .iter()
            .filter(|def| def.applies_to_kind(kind))
            .sorted_by_key(|def| (def.category, def.name.clone()))
            .collect()
    }

    /// Looks a definition up by name, tolerating the `()` marker on either
    /// side. Used for parameter-shape lookups by the `callMethod` operation.
    pub fn by_name(&self, name: &str) -> Option<&MethodDefinition> {
        let base = name.strip_suffix("()").unwrap_or(name);
        self.definitions.iter().find(|def| def.base_name() == base)
    }

    /// Explicit capability lookup: runs the extension implementation when one
    /// matches the receiver's kind, the base name, and the invocation style.
    /// `None` means no extension claims the call and the caller should fall
    /// back to native member access.
    pub fn dispatch(
        &self,
        receiver: &Value,
        base_name: &str,
        args: &[Value],
        invocation: bool,
    ) -> Option<Result<Value, EvalError>> {
        let kind = receiver.method_kind()?;
        let definition = self.definitions.iter().find(|def| {
            def.base_name() == base_name
                && def.is_invocation() == invocation
                && def.applies_to_kind(kind)
        })?;
        let implementation = self.impls.get(definition.base_name())?;
        Some(implementation(receiver, args))
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}
