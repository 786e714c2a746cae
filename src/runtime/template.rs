use regex::Regex;
use serde_json::Value;

use crate::{MollieflowError, Result, common::Vars, runtime::ExecutionContext};

/// Regex pattern for parameter placeholders
/// Format: `{{$parameter.key}}`, `{{$parameter.key.subkey}}`, optional
/// `?` suffix and a ` | modifier` tail
const PARAMETER_TEMPLATE_PATTERN: &str = r"\{\{\s*\$parameter\.([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)*)(\??)\s*(?:\|\s*([a-z]+)\s*)?\}\}";
/// Regex pattern for credential placeholders
/// Format: `{{$credentials.key}}`
const CREDENTIALS_TEMPLATE_PATTERN: &str = r"\{\{\s*\$credentials\.([A-Za-z0-9_]+)\s*\}\}";

/// The `|| undefined` rule: null, empty string, zero and false all count
/// as unset when a placeholder is optional.
fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Bool(b) => !b,
        _ => false,
    }
}

fn apply_modifier(
    modifier: &str,
    value: &Value,
) -> Result<String> {
    match modifier {
        // two-decimal money format, `10` -> "10.00"
        "money" => {
            let amount = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse::<f64>().ok(),
                _ => None,
            };
            match amount {
                Some(amount) => Ok(format!("{:.2}", amount)),
                None => Err(MollieflowError::Template(format!("money modifier needs a numeric value, got {}", value))),
            }
        }
        other => Err(MollieflowError::Template(format!("unknown template modifier '{}'", other))),
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // objects and arrays travel as JSON text and are parsed back by
        // resolve_json_value
        other => other.to_string(),
    }
}

/// Resolve `{{$parameter.*}}` placeholders in a string template.
/// Returns error if any required placeholder cannot be resolved.
pub fn resolve_template(
    ctx: &ExecutionContext,
    template: &str,
) -> Result<String> {
    match resolve_string(ctx, template)? {
        Some(resolved) => Ok(resolved),
        None => Ok(String::new()),
    }
}

/// Resolve a string template with optional-placeholder semantics:
/// `None` when the template consists of exactly one unresolved optional
/// placeholder, so the caller can drop the enclosing key.
pub fn resolve_string(
    ctx: &ExecutionContext,
    template: &str,
) -> Result<Option<String>> {
    let re = Regex::new(PARAMETER_TEMPLATE_PATTERN).unwrap();
    let mut result = template.to_string();
    let mut errors: Vec<String> = Vec::new();

    for caps in re.captures_iter(template) {
        let full_match = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let key_path = &caps[1];
        let optional = &caps[2] == "?";
        let modifier = caps.get(3).map(|m| m.as_str());

        let value = ctx.param_path(key_path);
        // required placeholders render present-but-empty values as-is;
        // only optional ones apply the unset rule
        let value = if optional {
            value.filter(|v| !is_unset(v))
        } else {
            value.filter(|v| !v.is_null())
        };

        match value {
            Some(value) => {
                let rendered = match modifier {
                    Some(modifier) => apply_modifier(modifier, &value)?,
                    None => value_to_string(&value),
                };
                result = result.replace(full_match, &rendered);
            }
            None if optional => {
                if template.trim() == full_match {
                    return Ok(None);
                }
                result = result.replace(full_match, "");
            }
            None => {
                errors.push(format!("parameter '{}' not found", key_path));
            }
        }
    }

    if !errors.is_empty() {
        return Err(MollieflowError::Template(errors.join(", ")));
    }

    Ok(Some(result))
}

/// Resolve a string template to a JSON value.
///
/// A template that is exactly one placeholder without a modifier yields
/// the parameter's typed value, so booleans, numbers and arrays survive
/// body rendering; any other template renders through `resolve_string`.
pub fn resolve_template_value(
    ctx: &ExecutionContext,
    template: &str,
) -> Result<Option<Value>> {
    let re = Regex::new(PARAMETER_TEMPLATE_PATTERN).unwrap();
    if let Some(caps) = re.captures(template.trim()) {
        let whole = caps.get(0).map(|m| m.as_str()) == Some(template.trim());
        if whole && caps.get(3).is_none() {
            let key_path = &caps[1];
            let optional = &caps[2] == "?";

            let value = ctx.param_path(key_path);
            let value = if optional {
                value.filter(|v| !is_unset(v))
            } else {
                value.filter(|v| !v.is_null())
            };
            return match value {
                Some(value) => Ok(Some(value)),
                None if optional => Ok(None),
                None => Err(MollieflowError::Template(format!("parameter '{}' not found", key_path))),
            };
        }
    }
    Ok(resolve_string(ctx, template)?.map(Value::String))
}

/// Resolve `{{$credentials.*}}` placeholders against stored credential
/// fields (authenticate rules).
pub fn resolve_credentials(
    credentials: &Vars,
    template: &str,
) -> Result<String> {
    let re = Regex::new(CREDENTIALS_TEMPLATE_PATTERN).unwrap();
    let mut result = template.to_string();
    let mut errors: Vec<String> = Vec::new();

    for caps in re.captures_iter(template) {
        let full_match = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let key = &caps[1];

        match credentials.get_value(key).filter(|v| !is_unset(v)) {
            Some(value) => {
                result = result.replace(full_match, &value_to_string(value));
            }
            None => {
                errors.push(format!("credential field '{}' not found", key));
            }
        }
    }

    if !errors.is_empty() {
        return Err(MollieflowError::Template(errors.join(", ")));
    }

    Ok(result)
}

/// Resolve placeholders in a JSON body template recursively.
///
/// Whole-string placeholders keep the parameter's JSON type, object keys
/// whose value resolves as unset are dropped, emptied objects are pruned,
/// and resolved strings that parse as JSON objects or arrays are parsed
/// (free-form metadata fields).
pub fn resolve_json_value(
    ctx: &ExecutionContext,
    value: &Value,
) -> Result<Option<Value>> {
    match value {
        Value::String(s) => {
            let resolved = match resolve_template_value(ctx, s)? {
                Some(resolved) => resolved,
                None => return Ok(None),
            };
            match resolved {
                Value::String(text) if text.starts_with('{') || text.starts_with('[') => {
                    Ok(Some(serde_json::from_str(&text).unwrap_or(Value::String(text))))
                }
                other => Ok(Some(other)),
            }
        }
        Value::Array(arr) => {
            let mut resolved: Vec<Value> = Vec::new();
            for item in arr {
                if let Some(item) = resolve_json_value(ctx, item)? {
                    resolved.push(item);
                }
            }
            Ok(Some(Value::Array(resolved)))
        }
        Value::Object(obj) => {
            let mut resolved = serde_json::Map::new();
            for (key, item) in obj {
                match resolve_json_value(ctx, item)? {
                    Some(Value::Object(inner)) if inner.is_empty() => {}
                    Some(item) => {
                        resolved.insert(key.clone(), item);
                    }
                    None => {}
                }
            }
            Ok(Some(Value::Object(resolved)))
        }
        Value::Null => Ok(None),
        _ => Ok(Some(value.clone())),
    }
}
