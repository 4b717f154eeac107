use crate::ast::{BinaryOp, Expr, UnaryOp, Value};
use crate::context::{ContextSnapshot, RootName};
use crate::error::EvalError;
use crate::methods::MethodRegistry;

/// The recursive tree-walking engine for one parsed expression against one
/// context snapshot.
///
/// Method calls are resolved through the registry's explicit dispatch first,
/// then through the value's own members; nothing is ever installed on shared
/// state, so evaluations cannot observe each other.
pub(super) struct Interpreter<'a> {
    snapshot: &'a ContextSnapshot,
    methods: &'a MethodRegistry,
}

impl<'a> Interpreter<'a> {
    pub(super) fn new(snapshot: &'a ContextSnapshot, methods: &'a MethodRegistry) -> Self {
        Self { snapshot, methods }
    }

    pub(super) fn evaluate(&self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Root(name) => match RootName::parse(name) {
                Some(root) => Ok(self.snapshot.root(root).clone()),
                None => Err(EvalError::UnknownRoot { name: name.clone() }),
            },
            Expr::Ident(name) => Err(EvalError::UnknownIdentifier { name: name.clone() }),
            Expr::Member {
                object,
                property,
                optional,
            } => {
                let value = self.evaluate(object)?;
                match missing_label(&value) {
                    Some(_) if *optional => Ok(Value::Undefined),
                    Some(of) => Err(EvalError::PropertyOfMissing {
                        property: property.clone(),
                        of,
                    }),
                    None => Ok(self.member_read(&value, property)),
                }
            }
            Expr::Index {
                object,
                index,
                optional,
            } => {
                let value = self.evaluate(object)?;
                let key = self.evaluate(index)?;
                match missing_label(&value) {
                    Some(_) if *optional => Ok(Value::Undefined),
                    Some(of) => Err(EvalError::PropertyOfMissing {
                        property: key.as_text(),
                        of,
                    }),
                    None => Ok(index_read(&value, &key)),
                }
            }
            Expr::Call {
                object,
                method,
                optional,
                args,
            } => self.call(object, method, *optional, args),
            Expr::Unary { op, operand } => {
                let value = self.evaluate(operand)?;
                match op {
                    UnaryOp::Not => Ok(Value::Bool(!value.truthy())),
                    UnaryOp::Negate => match value.as_number() {
                        Some(n) => Ok(Value::Number(-n)),
                        None => Err(type_mismatch("-", value)),
                    },
                }
            }
            Expr::Binary { op, left, right } => self.binary(*op, left, right),
        }
    }

    /// Bare member read: bare extension properties (such as `length`) win,
    /// then the value's own properties, then `Undefined`.
    fn member_read(&self, value: &Value, property: &str) -> Value {
        if let Some(result) = self.methods.dispatch(value, property, &[], false) {
            return result.unwrap_or(Value::Undefined);
        }
        value.get(property).cloned().unwrap_or(Value::Undefined)
    }

    fn call(
        &self,
        object: &Expr,
        method: &str,
        optional: bool,
        args: &[Expr],
    ) -> Result<Value, EvalError> {
        let receiver = self.evaluate(object)?;
        match missing_label(&receiver) {
            Some(_) if optional => return Ok(Value::Undefined),
            Some(of) => {
                return Err(EvalError::PropertyOfMissing {
                    property: method.to_string(),
                    of,
                });
            }
            None => {}
        }

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.evaluate(arg)?);
        }

        match self.methods.dispatch(&receiver, method, &arg_values, true) {
            Some(result) => result,
            // No extension claims the call and data members are not callable.
            None => Err(EvalError::NotAFunction {
                method: method.to_string(),
                kind: receiver.kind_label(),
            }),
        }
    }

    fn binary(&self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value, EvalError> {
        // Logical operators short-circuit and keep the deciding operand.
        if let BinaryOp::And = op {
            let l = self.evaluate(left)?;
            return if l.truthy() { self.evaluate(right) } else { Ok(l) };
        }
        if let BinaryOp::Or = op {
            let l = self.evaluate(left)?;
            return if l.truthy() { Ok(l) } else { self.evaluate(right) };
        }

        let l = self.evaluate(left)?;
        let r = self.evaluate(right)?;
        match op {
            BinaryOp::Equal => Ok(Value::Bool(l == r)),
            BinaryOp::NotEqual => Ok(Value::Bool(l != r)),
            BinaryOp::Sum => {
                if matches!(l, Value::String(_)) || matches!(r, Value::String(_)) {
                    return Ok(Value::String(format!("{}{}", l.as_text(), r.as_text())));
                }
                numeric(op, l, r).map(Value::Number)
            }
            BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide => {
                numeric(op, l, r).map(Value::Number)
            }
            BinaryOp::GreaterThan
            | BinaryOp::GreaterThanOrEqual
            | BinaryOp::SmallerThan
            | BinaryOp::SmallerThanOrEqual => comparison(op, l, r).map(Value::Bool),
            BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
        }
    }
}

fn missing_label(value: &Value) -> Option<&'static str> {
    match value {
        Value::Undefined => Some("undefined"),
        Value::Null => Some("null"),
        _ => None,
    }
}

fn type_mismatch(operation: &str, found: Value) -> EvalError {
    EvalError::TypeMismatch {
        operation: operation.to_string(),
        expected: "Number".to_string(),
        found,
    }
}

fn numeric(op: BinaryOp, l: Value, r: Value) -> Result<f64, EvalError> {
    let (Some(a), Some(b)) = (l.as_number(), r.as_number()) else {
        let found = if l.as_number().is_none() { l } else { r };
        return Err(type_mismatch(op.symbol(), found));
    };
    Ok(match op {
        BinaryOp::Sum => a + b,
        BinaryOp::Subtract => a - b,
        BinaryOp::Multiply => a * b,
        _ => a / b,
    })
}

fn comparison(op: BinaryOp, l: Value, r: Value) -> Result<bool, EvalError> {
    if let (Some(a), Some(b)) = (l.as_number(), r.as_number()) {
        return Ok(match op {
            BinaryOp::GreaterThan => a > b,
            BinaryOp::GreaterThanOrEqual => a >= b,
            BinaryOp::SmallerThan => a < b,
            _ => a <= b,
        });
    }
    if let (Value::String(a), Value::String(b)) = (&l, &r) {
        return Ok(match op {
            BinaryOp::GreaterThan => a > b,
            BinaryOp::GreaterThanOrEqual => a >= b,
            BinaryOp::SmallerThan => a < b,
            _ => a <= b,
        });
    }
    let found = if l.as_number().is_none() { l } else { r };
    Err(type_mismatch(op.symbol(), found))
}

fn index_read(value: &Value, key: &Value) -> Value {
    match (value, key) {
        (Value::Array(items), Value::Number(n)) => element_at(items, *n),
        (Value::Array(items), Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(n) => element_at(items, n),
            Err(_) => Value::Undefined,
        },
        (Value::Object(_), Value::String(key)) => {
            value.get(key).cloned().unwrap_or(Value::Undefined)
        }
        (Value::String(s), Value::Number(n)) => {
            if *n >= 0.0 && n.fract() == 0.0 {
                s.chars()
                    .nth(*n as usize)
                    .map(|c| Value::String(c.to_string()))
                    .unwrap_or(Value::Undefined)
            } else {
                Value::Undefined
            }
        }
        _ => Value::Undefined,
    }
}

fn element_at(items: &[Value], index: f64) -> Value {
    if index >= 0.0 && index.fract() == 0.0 {
        items.get(index as usize).cloned().unwrap_or(Value::Undefined)
    } else {
        Value::Undefined
    }
}
