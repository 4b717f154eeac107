//! The builtin extension-method catalogue: descriptors for the suggestion
//! list plus the implementations the evaluator dispatches to.

use super::{MethodCategory, MethodDefinition, MethodRegistry, ParameterSpec, ParameterType};
use crate::ast::{Value, ValueKind};
use crate::error::EvalError;
use itertools::Itertools;

/// Compares one element property against a reference value. Ordering
/// operators work on numbers and, lexicographically, on strings; everything
/// else fails the predicate. Unknown operators never match.
fn compare(operator: &str, left: &Value, right: &Value) -> bool {
    match operator {
        "===" => left == right,
        "!==" => left != right,
        ">" | "<" | ">=" | "<=" => {
            if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
                match operator {
                    ">" => l > r,
                    "<" => l < r,
                    ">=" => l >= r,
                    _ => l <= r,
                }
            } else if let (Value::String(l), Value::String(r)) = (left, right) {
                match operator {
                    ">" => l > r,
                    "<" => l < r,
                    ">=" => l >= r,
                    _ => l <= r,
                }
            } else {
                false
            }
        }
        _ => false,
    }
}

/// Keeps the elements whose `property` satisfies `operator` against
/// `against`. Non-object elements fail the predicate; an empty property name
/// keeps everything.
pub(crate) fn filter_elements(
    items: &[Value],
    property: &str,
    operator: &str,
    against: &Value,
) -> Vec<Value> {
    if property.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| {
            item.get(property)
                .is_some_and(|value| compare(operator, value, against))
        })
        .cloned()
        .collect()
}

/// Projects each element to `element[property]`, `Undefined` for elements
/// without that property. An empty property name is the identity.
pub(crate) fn map_property(items: &[Value], property: &str) -> Vec<Value> {
    if property.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .map(|item| item.get(property).cloned().unwrap_or(Value::Undefined))
        .collect()
}

/// Sums all elements coerced to numbers; non-numeric elements count as zero,
/// so the result is never NaN.
pub(crate) fn reduce_sum(items: &[Value]) -> f64 {
    items.iter().map(Value::coerce_number).sum()
}

fn arg_text(args: &[Value], index: usize) -> String {
    args.get(index).map(Value::as_text).unwrap_or_default()
}

// --- implementations -------------------------------------------------------

fn method_length(receiver: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Array(items) => Ok(Value::Number(items.len() as f64)),
        Value::String(s) => Ok(Value::Number(s.chars().count() as f64)),
        _ => Ok(Value::Undefined),
    }
}

fn method_filter(receiver: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Array(items) => {
            let property = arg_text(args, 0);
            let operator = arg_text(args, 1);
            let against = args.get(2).cloned().unwrap_or(Value::Undefined);
            Ok(Value::Array(filter_elements(
                items, &property, &operator, &against,
            )))
        }
        _ => Ok(Value::Array(Vec::new())),
    }
}

fn method_map(receiver: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Array(items) => Ok(Value::Array(map_property(items, &arg_text(args, 0)))),
        _ => Ok(Value::Array(Vec::new())),
    }
}

fn method_reduce_sum(receiver: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Array(items) => Ok(Value::Number(reduce_sum(items))),
        _ => Ok(Value::Number(0.0)),
    }
}

fn method_first(receiver: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Array(items) => Ok(items.first().cloned().unwrap_or(Value::Undefined)),
        _ => Ok(Value::Undefined),
    }
}

fn method_last(receiver: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Array(items) => Ok(items.last().cloned().unwrap_or(Value::Undefined)),
        _ => Ok(Value::Undefined),
    }
}

fn method_join(receiver: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Array(items) => {
            let separator = match args.first() {
                Some(sep) => sep.as_text(),
                None => ",".to_string(),
            };
            let joined = items
                .iter()
                .map(|item| match item {
                    Value::Undefined | Value::Null => String::new(),
                    other => other.as_text(),
                })
                .join(&separator);
            Ok(Value::String(joined))
        }
        _ => Ok(Value::Undefined),
    }
}

fn method_includes(receiver: &Value, args: &[Value]) -> Result<Value, EvalError> {
    let search = args.first().cloned().unwrap_or(Value::Undefined);
    match receiver {
        Value::Array(items) => Ok(Value::Bool(items.iter().any(|item| *item == search))),
        Value::String(s) => Ok(Value::Bool(s.contains(&search.as_text()))),
        _ => Ok(Value::Bool(false)),
    }
}

fn slice_bounds(len: usize, args: &[Value]) -> (usize, usize) {
    let clamp = |raw: f64| -> usize {
        let idx = if raw < 0.0 { raw + len as f64 } else { raw };
        idx.max(0.0).min(len as f64) as usize
    };
    let start = clamp(args.first().map(Value::coerce_number).unwrap_or(0.0));
    let end = clamp(
        args.get(1)
            .map(Value::coerce_number)
            .unwrap_or(len as f64),
    );
    (start, end.max(start))
}

fn method_slice(receiver: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Array(items) => {
            let (start, end) = slice_bounds(items.len(), args);
            Ok(Value::Array(items[start..end].to_vec()))
        }
        Value::String(s) => {
            let chars: Vec<char> = s.chars().collect();
            let (start, end) = slice_bounds(chars.len(), args);
            Ok(Value::String(chars[start..end].iter().collect()))
        }
        _ => Ok(Value::Undefined),
    }
}

fn method_keys(receiver: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Object(entries) => Ok(Value::Array(
            entries
                .iter()
                .map(|(key, _)| Value::String(key.clone()))
                .collect(),
        )),
        _ => Ok(Value::Array(Vec::new())),
    }
}

fn method_values(receiver: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Object(entries) => Ok(Value::Array(
            entries.iter().map(|(_, value)| value.clone()).collect(),
        )),
        _ => Ok(Value::Array(Vec::new())),
    }
}

fn method_to_upper_case(receiver: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::String(s) => Ok(Value::String(s.to_uppercase())),
        _ => Ok(Value::Undefined),
    }
}

fn method_to_lower_case(receiver: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::String(s) => Ok(Value::String(s.to_lowercase())),
        _ => Ok(Value::Undefined),
    }
}

fn method_trim(receiver: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::String(s) => Ok(Value::String(s.trim().to_string())),
        _ => Ok(Value::Undefined),
    }
}

fn method_split(receiver: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::String(s) => {
            let separator = arg_text(args, 0);
            let parts = if separator.is_empty() {
                s.chars().map(|c| Value::String(c.to_string())).collect()
            } else {
                s.split(&separator)
                    .map(|part| Value::String(part.to_string()))
                    .collect()
            };
            Ok(Value::Array(parts))
        }
        _ => Ok(Value::Array(Vec::new())),
    }
}

fn method_replace(receiver: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::String(s) => {
            let search = arg_text(args, 0);
            if search.is_empty() {
                return Ok(Value::String(s.clone()));
            }
            let replacement = arg_text(args, 1);
            Ok(Value::String(s.replacen(&search, &replacement, 1)))
        }
        _ => Ok(Value::Undefined),
    }
}

fn method_to_fixed(receiver: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Number(n) => {
            let digits = args
                .first()
                .map(Value::coerce_number)
                .unwrap_or(0.0)
                .clamp(0.0, 17.0) as usize;
            Ok(Value::String(format!("{:.*}", digits, n)))
        }
        _ => Ok(Value::Undefined),
    }
}

fn method_round(receiver: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Number(n) => Ok(Value::Number(n.round())),
        _ => Ok(Value::Undefined),
    }
}

fn method_floor(receiver: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Number(n) => Ok(Value::Number(n.floor())),
        _ => Ok(Value::Undefined),
    }
}

fn method_abs(receiver: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    match receiver {
        Value::Number(n) => Ok(Value::Number(n.abs())),
        _ => Ok(Value::Undefined),
    }
}

fn method_to_string(receiver: &Value, _args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::String(receiver.as_text()))
}

// --- registration ----------------------------------------------------------

struct Entry {
    name: &'static str,
    description: &'static str,
    example: &'static str,
    applies_to: &'static [ValueKind],
    category: MethodCategory,
    parameters: Vec<ParameterSpec>,
    implementation: super::MethodImpl,
}

pub(super) fn install(registry: &mut MethodRegistry) {
    use MethodCategory::{Other, Suggested};
    use ParameterType::{Any, Number, String as Str};
    use ValueKind::{Array, Number as Num, Object, String as StringKind};

    let entries = vec![
        Entry {
            name: "length",
            description: "Number of elements in a list or characters in a text",
            example: "{{ $json?.pedidos?.length }}",
            applies_to: &[Array, StringKind],
            category: Suggested,
            parameters: vec![],
            implementation: method_length,
        },
        Entry {
            name: "filter()",
            description: "Keeps the elements whose property satisfies the comparison",
            example: "{{ $json?.pedidos?.filter(\"status\", \"===\", \"pago\") }}",
            applies_to: &[Array],
            category: Suggested,
            parameters: vec![
                ParameterSpec::required("property", Str),
                ParameterSpec::required("operator", Str).with_default("==="),
                ParameterSpec::required("value", Any),
            ],
            implementation: method_filter,
        },
        Entry {
            name: "map()",
            description: "Projects each element to one of its properties",
            example: "{{ $json?.pedidos?.map(\"valor\") }}",
            applies_to: &[Array],
            category: Suggested,
            parameters: vec![ParameterSpec::required("property", Str)],
            implementation: method_map,
        },
        Entry {
            name: "reduceSum()",
            description: "Sums all elements as numbers; non-numeric elements count as zero",
            example: "{{ $json?.pedidos?.map(\"valor\")?.reduceSum() }}",
            applies_to: &[Array],
            category: Suggested,
            parameters: vec![],
            implementation: method_reduce_sum,
        },
        Entry {
            name: "first()",
            description: "The first element of a list",
            example: "{{ $json?.pedidos?.first() }}",
            applies_to: &[Array],
            category: Other,
            parameters: vec![],
            implementation: method_first,
        },
        Entry {
            name: "last()",
            description: "The last element of a list",
            example: "{{ $json?.pedidos?.last() }}",
            applies_to: &[Array],
            category: Other,
            parameters: vec![],
            implementation: method_last,
        },
        Entry {
            name: "join()",
            description: "Concatenates the elements into one text with a separator",
            example: "{{ $json?.tags?.join(\", \") }}",
            applies_to: &[Array],
            category: Other,
            parameters: vec![ParameterSpec::optional("separator", Str).with_default(",")],
            implementation: method_join,
        },
        Entry {
            name: "includes()",
            description: "Whether a list contains a value or a text contains a fragment",
            example: "{{ $json?.tags?.includes(\"novo\") }}",
            applies_to: &[Array, StringKind],
            category: Other,
            parameters: vec![ParameterSpec::required("search", Any)],
            implementation: method_includes,
        },
        Entry {
            name: "slice()",
            description: "A sub-range of a list or text; negative indices count from the end",
            example: "{{ $json?.pedidos?.slice(0, 2) }}",
            applies_to: &[Array, StringKind],
            category: Other,
            parameters: vec![
                ParameterSpec::required("start", Number),
                ParameterSpec::optional("end", Number),
            ],
            implementation: method_slice,
        },
        Entry {
            name: "keys()",
            description: "The property names of an object",
            example: "{{ $json?.usuario?.keys() }}",
            applies_to: &[Object],
            category: Suggested,
            parameters: vec![],
            implementation: method_keys,
        },
        Entry {
            name: "values()",
            description: "The property values of an object",
            example: "{{ $json?.usuario?.values() }}",
            applies_to: &[Object],
            category: Other,
            parameters: vec![],
            implementation: method_values,
        },
        Entry {
            name: "toUpperCase()",
            description: "The text in upper case",
            example: "{{ $json?.usuario?.nome?.toUpperCase() }}",
            applies_to: &[StringKind],
            category: Suggested,
            parameters: vec![],
            implementation: method_to_upper_case,
        },
        Entry {
            name: "toLowerCase()",
            description: "The text in lower case",
            example: "{{ $json?.usuario?.nome?.toLowerCase() }}",
            applies_to: &[StringKind],
            category: Other,
            parameters: vec![],
            implementation: method_to_lower_case,
        },
        Entry {
            name: "trim()",
            description: "The text without leading or trailing whitespace",
            example: "{{ $json?.usuario?.nome?.trim() }}",
            applies_to: &[StringKind],
            category: Other,
            parameters: vec![],
            implementation: method_trim,
        },
        Entry {
            name: "split()",
            description: "Splits a text into a list around a separator",
            example: "{{ $json?.usuario?.email?.split(\"@\") }}",
            applies_to: &[StringKind],
            category: Other,
            parameters: vec![ParameterSpec::required("separator", Str)],
            implementation: method_split,
        },
        Entry {
            name: "replace()",
            description: "Replaces the first occurrence of a fragment",
            example: "{{ $json?.usuario?.nome?.replace(\"Ana\", \"Bia\") }}",
            applies_to: &[StringKind],
            category: Other,
            parameters: vec![
                ParameterSpec::required("search", Str),
                ParameterSpec::required("replacement", Str),
            ],
            implementation: method_replace,
        },
        Entry {
            name: "toFixed()",
            description: "Formats a number with a fixed count of decimal places",
            example: "{{ $json?.total?.toFixed(2) }}",
            applies_to: &[Num],
            category: Other,
            parameters: vec![ParameterSpec::optional("digits", Number).with_default("0")],
            implementation: method_to_fixed,
        },
        Entry {
            name: "round()",
            description: "The nearest integer",
            example: "{{ $json?.total?.round() }}",
            applies_to: &[Num],
            category: Other,
            parameters: vec![],
            implementation: method_round,
        },
        Entry {
            name: "floor()",
            description: "Rounds down to an integer",
            example: "{{ $json?.total?.floor() }}",
            applies_to: &[Num],
            category: Other,
            parameters: vec![],
            implementation: method_floor,
        },
        Entry {
            name: "abs()",
            description: "The absolute value",
            example: "{{ $json?.saldo?.abs() }}",
            applies_to: &[Num],
            category: Other,
            parameters: vec![],
            implementation: method_abs,
        },
        Entry {
            name: "toString()",
            description: "The value rendered as text",
            example: "{{ $json?.total?.toString() }}",
            applies_to: &[ValueKind::Any],
            category: Other,
            parameters: vec![],
            implementation: method_to_string,
        },
    ];

    for entry in entries {
        registry.register(
            MethodDefinition {
                name: entry.name.to_string(),
                description: entry.description.to_string(),
                example: entry.example.to_string(),
                applies_to: entry.applies_to.to_vec(),
                category: entry.category,
                parameters: entry.parameters,
            },
            entry.implementation,
        );
    }
}
