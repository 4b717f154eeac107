use crate::ast::Value;
use crate::error::ContextError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three top-level bindings an expression or pipeline can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootName {
    Json,
    Node,
    Env,
}

impl RootName {
    pub const ALL: [RootName; 3] = [RootName::Json, RootName::Node, RootName::Env];

    pub fn as_str(&self) -> &'static str {
        match self {
            RootName::Json => "json",
            RootName::Node => "node",
            RootName::Env => "env",
        }
    }

    pub fn parse(name: &str) -> Option<RootName> {
        match name {
            "json" => Some(RootName::Json),
            "node" => Some(RootName::Node),
            "env" => Some(RootName::Env),
            _ => None,
        }
    }

    fn index(&self) -> usize {
        match self {
            RootName::Json => 0,
            RootName::Node => 1,
            RootName::Env => 2,
        }
    }
}

impl fmt::Display for RootName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RootName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RootName::parse(s).ok_or_else(|| format!("unknown context root '{}'", s))
    }
}

#[derive(Debug, Clone)]
struct RootSlot {
    raw: String,
    parsed: Result<Value, String>,
}

impl RootSlot {
    fn derive(raw: String) -> Self {
        let parsed = parse_root_text(&raw);
        Self { raw, parsed }
    }
}

/// A blank root derives an empty object rather than a parse error, so an
/// untouched editor pane never invalidates the whole context.
fn parse_root_text(raw: &str) -> Result<Value, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Object(Vec::new()));
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(json) => Ok(Value::from_json(&json)),
        Err(e) => Err(e.to_string()),
    }
}

/// Owns the three independently-editable raw text sources and their derived
/// structured values.
///
/// Each edit re-parses the whole source for that root; there is no
/// incremental state and no persistence. If any root fails to parse, the
/// whole context is invalid and [`ContextModel::snapshot`] reports that
/// root's error instead of a partial view.
#[derive(Debug, Clone)]
pub struct ContextModel {
    roots: [RootSlot; 3],
}

impl ContextModel {
    pub fn new() -> Self {
        Self {
            roots: [
                RootSlot::derive(String::new()),
                RootSlot::derive(String::new()),
                RootSlot::derive(String::new()),
            ],
        }
    }

    /// Replaces one root's raw text and re-derives its structured value.
    pub fn set_root_text(&mut self, root: RootName, text: &str) {
        self.roots[root.index()] = RootSlot::derive(text.to_string());
    }

    pub fn root_text(&self, root: RootName) -> &str {
        &self.roots[root.index()].raw
    }

    /// The parse error for one root, if its current text is invalid.
    pub fn root_error(&self, root: RootName) -> Option<&str> {
        self.roots[root.index()].parsed.as_ref().err().map(|e| e.as_str())
    }

    /// The derived value of a single root.
    pub fn root_value(&self, root: RootName) -> Result<&Value, ContextError> {
        self.roots[root.index()]
            .parsed
            .as_ref()
            .map_err(|message| ContextError::InvalidRoot {
                root,
                message: message.clone(),
            })
    }

    /// All three derived values, or the first root's parse error.
    pub fn snapshot(&self) -> Result<ContextSnapshot, ContextError> {
        let mut values = Vec::with_capacity(3);
        for root in RootName::ALL {
            values.push(self.root_value(root)?.clone());
        }
        let env = values.pop().unwrap_or(Value::Undefined);
        let node = values.pop().unwrap_or(Value::Undefined);
        let json = values.pop().unwrap_or(Value::Undefined);
        Ok(ContextSnapshot { json, node, env })
    }
}

impl Default for ContextModel {
    fn default() -> Self {
        Self::new()
    }
}

/// A coherent, fully-parsed view of the three roots at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextSnapshot {
    pub json: Value,
    pub node: Value,
    pub env: Value,
}

impl ContextSnapshot {
    pub fn empty() -> Self {
        Self {
            json: Value::Object(Vec::new()),
            node: Value::Object(Vec::new()),
            env: Value::Object(Vec::new()),
        }
    }

    pub fn root(&self, name: RootName) -> &Value {
        match name {
            RootName::Json => &self.json,
            RootName::Node => &self.node,
            RootName::Env => &self.env,
        }
    }
}
