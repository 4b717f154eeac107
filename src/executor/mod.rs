use crate::ast::Value;
use crate::context::ContextModel;
use crate::methods::MethodRegistry;
use std::fmt;
use std::sync::Arc;

mod eval;
mod lexer;
mod parser;

use eval::Interpreter;
pub(crate) use parser::parse_expression;

/// What an evaluation hands back to the caller: a value or a user-facing
/// error message, plus the error flag. Raw errors never escape.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    pub value: Value,
    pub is_error: bool,
}

impl ExecutionOutcome {
    fn success(value: Value) -> Self {
        Self {
            value,
            is_error: false,
        }
    }

    fn failure(message: impl fmt::Display) -> Self {
        Self {
            value: Value::String(format!("Erro: {}", message)),
            is_error: true,
        }
    }

    /// The text a result pane shows: strings verbatim, everything else in
    /// display form.
    pub fn rendered(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Strips exactly one `{{ … }}` wrapper pair if present.
fn strip_delimiters(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed
        .strip_prefix("{{")
        .and_then(|rest| rest.strip_suffix("}}"))
    {
        Some(body) => body.trim(),
        None => trimmed,
    }
}

/// Compiles and evaluates expression text against a context model.
///
/// Every call is independent: the expression is parsed fresh, evaluated
/// against a fresh snapshot, and method capability comes from the shared
/// registry by lookup rather than by installation, so calls may run
/// concurrently.
pub struct ExpressionExecutor {
    methods: Arc<MethodRegistry>,
}

impl ExpressionExecutor {
    pub fn new(methods: Arc<MethodRegistry>) -> Self {
        Self { methods }
    }

    pub fn methods(&self) -> &MethodRegistry {
        &self.methods
    }

    /// Evaluates `expression` against `context`.
    ///
    /// An empty body (after delimiter stripping) yields an empty-string,
    /// non-error result. A context whose roots do not parse, a body that
    /// does not parse, and any evaluation failure all come back as an
    /// `"Erro: …"` message with `is_error` set — never a panic.
    pub fn execute(&self, expression: &str, context: &ContextModel) -> ExecutionOutcome {
        let body = strip_delimiters(expression);
        if body.is_empty() {
            return ExecutionOutcome::success(Value::String(String::new()));
        }

        let snapshot = match context.snapshot() {
            Ok(snapshot) => snapshot,
            Err(error) => return ExecutionOutcome::failure(error),
        };

        let expr = match parse_expression(body) {
            Ok(expr) => expr,
            Err(error) => return ExecutionOutcome::failure(error),
        };

        let interpreter = Interpreter::new(&snapshot, &self.methods);
        match interpreter.evaluate(&expr) {
            Ok(value) => ExecutionOutcome::success(value),
            Err(error) => ExecutionOutcome::failure(error),
        }
    }
}
