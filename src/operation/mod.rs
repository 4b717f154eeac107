use crate::ast::Value;
use crate::methods::MethodRegistry;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

mod collection;
mod method;
mod property;

pub use collection::{FilterOp, MapOp, ReduceSumOp};
pub use method::CallMethodOp;
pub use property::GetPropertyOp;

/// The closed, stable set of operation kinds. The serde names
/// (`getProperty`, `filter`, `map`, `reduceSum`, `callMethod`) are public
/// contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OpKind {
    GetProperty,
    Filter,
    Map,
    ReduceSum,
    CallMethod,
}

impl OpKind {
    pub const ALL: [OpKind; 5] = [
        OpKind::GetProperty,
        OpKind::Filter,
        OpKind::Map,
        OpKind::ReduceSum,
        OpKind::CallMethod,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OpKind::GetProperty => "getProperty",
            OpKind::Filter => "filter",
            OpKind::Map => "map",
            OpKind::ReduceSum => "reduceSum",
            OpKind::CallMethod => "callMethod",
        }
    }

    pub fn parse(tag: &str) -> Option<OpKind> {
        OpKind::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The parameter bag of one step. Every field carries a default so
/// evaluation never needs to null-check; emptiness is checked semantically
/// (an empty property name means the identity transform).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepParams {
    #[serde(default)]
    pub property: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub method: String,
    /// Named arguments for `callMethod`, keyed by parameter name.
    #[serde(default)]
    pub args: AHashMap<String, String>,
}

impl StepParams {
    /// Targeted update by key. Returns false for keys no operation declares.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match key {
            "property" => self.property = value.to_string(),
            "operator" => self.operator = value.to_string(),
            "value" => self.value = value.to_string(),
            "method" => self.method = value.to_string(),
            _ => return false,
        }
        true
    }

    pub fn set_arg(&mut self, name: &str, value: &str) {
        self.args.insert(name.to_string(), value.to_string());
    }

    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(|s| s.as_str())
    }
}

/// One pure transformation unit with its equivalent code emission.
pub trait Operation: Send + Sync {
    fn kind(&self) -> OpKind;

    /// The parameter bag a freshly added step of this kind starts with.
    fn default_params(&self) -> StepParams;

    /// Applies the operation to a live value. Total: inapplicable inputs
    /// degrade to `Value::Undefined` (or the variant's empty result), never
    /// an error.
    fn evaluate(&self, input: &Value, params: &StepParams) -> Value;

    /// Chains this operation's code fragment onto `preceding`. String
    /// composition only; `value_hint` is the preceding live value, consulted
    /// solely for literal rendering, never evaluated.
    fn emit(&self, preceding: &str, params: &StepParams, value_hint: Option<&Value>) -> String;
}

/// Maps an operation-kind tag to its variant implementation. Built once at
/// startup; purely a lookup afterwards.
pub struct OperationRegistry {
    ops: AHashMap<OpKind, Box<dyn Operation>>,
}

impl OperationRegistry {
    pub fn new(methods: Arc<MethodRegistry>) -> Self {
        let mut ops: AHashMap<OpKind, Box<dyn Operation>> = AHashMap::new();
        ops.insert(OpKind::GetProperty, Box::new(GetPropertyOp));
        ops.insert(OpKind::Filter, Box::new(FilterOp));
        ops.insert(OpKind::Map, Box::new(MapOp));
        ops.insert(OpKind::ReduceSum, Box::new(ReduceSumOp));
        ops.insert(OpKind::CallMethod, Box::new(CallMethodOp::new(methods)));
        Self { ops }
    }

    pub fn by_kind(&self, kind: OpKind) -> Option<&dyn Operation> {
        self.ops.get(&kind).map(|op| op.as_ref())
    }

    /// Lookup by the public string tag.
    pub fn by_tag(&self, tag: &str) -> Option<&dyn Operation> {
        OpKind::parse(tag).and_then(|kind| self.by_kind(kind))
    }
}

/// Whether a property name can be emitted with dot access.
pub(crate) fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Renders a string literal for emitted code.
pub(crate) fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

pub(crate) fn looks_numeric(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok()
}

pub(crate) fn looks_boolean(text: &str) -> bool {
    matches!(text.trim(), "true" | "false")
}
