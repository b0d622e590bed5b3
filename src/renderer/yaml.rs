//! Block-style YAML lines for example values
//!
//! Scalars and keys are written by the `serde_yaml` serializer, so a value
//! reads back exactly as it was declared. This module only lays out
//! collections, with sequences indented under their key the way the
//! commented examples show them (`#   - <NAME>`).

use serde_yaml::Value;

/// Lines for `key: value`, starting at `depth` (two spaces per level)
pub fn entry_lines(key: &str, value: &Value, depth: usize) -> Result<Vec<String>, serde_yaml::Error> {
    let mut out = Vec::new();
    push_entry(&Value::from(key), value, depth, &mut out)?;
    Ok(out)
}

/// Single-line form of a value for headers, using flow style for collections
pub fn inline(value: &Value) -> Result<String, serde_yaml::Error> {
    match value {
        Value::Sequence(items) => {
            let items = items.iter().map(inline).collect::<Result<Vec<_>, _>>()?;
            Ok(format!("[{}]", items.join(", ")))
        }
        Value::Mapping(map) => {
            let entries = map
                .iter()
                .map(|(k, v)| -> Result<String, serde_yaml::Error> {
                    Ok(format!("{}: {}", inline(k)?, inline(v)?))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{{{}}}", entries.join(", ")))
        }
        Value::String(s) if s.contains('\n') => Ok(format!("{:?}", s)),
        scalar => Ok(scalar_lines(scalar)?.join(" ")),
    }
}

/// Serialized scalar, one string per line (block scalars span several)
fn scalar_lines(value: &Value) -> Result<Vec<String>, serde_yaml::Error> {
    // `...` closes the document after a keep-chomped block scalar
    Ok(serde_yaml::to_string(value)?
        .lines()
        .filter(|line| *line != "...")
        .map(str::to_string)
        .collect())
}

/// Append `lines` to `first_prefix`; continuation lines get `indent`
fn push_scalar(first_prefix: String, indent: &str, lines: Vec<String>, out: &mut Vec<String>) {
    let mut lines = lines.into_iter();
    let first = lines.next().unwrap_or_default();
    out.push(format!("{}{}", first_prefix, first));
    out.extend(lines.map(|line| format!("{}{}", indent, line)));
}

fn key_text(key: &Value) -> Result<String, serde_yaml::Error> {
    Ok(scalar_lines(key)?.join(" "))
}

fn push_entry(key: &Value, value: &Value, depth: usize, out: &mut Vec<String>) -> Result<(), serde_yaml::Error> {
    let indent = "  ".repeat(depth);
    let key = key_text(key)?;
    match value {
        Value::Sequence(items) if !items.is_empty() => {
            out.push(format!("{}{}:", indent, key));
            push_block(value, depth + 1, out)?;
        }
        Value::Mapping(map) if !map.is_empty() => {
            out.push(format!("{}{}:", indent, key));
            push_block(value, depth + 1, out)?;
        }
        _ => push_scalar(format!("{}{}: ", indent, key), &indent, scalar_lines(value)?, out),
    }
    Ok(())
}

fn push_block(value: &Value, depth: usize, out: &mut Vec<String>) -> Result<(), serde_yaml::Error> {
    let indent = "  ".repeat(depth);
    match value {
        Value::Sequence(items) => {
            for item in items {
                match item {
                    Value::Mapping(map) if !map.is_empty() => {
                        // Emit the mapping one level deeper, then hang its first line on the dash
                        let mut nested = Vec::new();
                        push_block(item, depth + 1, &mut nested)?;
                        let child_indent = "  ".repeat(depth + 1);
                        if let Some(first) = nested.first_mut() {
                            let rest = first
                                .strip_prefix(child_indent.as_str())
                                .unwrap_or(first.as_str())
                                .to_string();
                            *first = format!("{}- {}", indent, rest);
                        }
                        out.extend(nested);
                    }
                    Value::Sequence(inner) if !inner.is_empty() => {
                        out.push(format!("{}-", indent));
                        push_block(item, depth + 1, out)?;
                    }
                    _ => push_scalar(format!("{}- ", indent), &indent, scalar_lines(item)?, out),
                }
            }
        }
        Value::Mapping(map) => {
            for (k, v) in map {
                push_entry(k, v, depth, out)?;
            }
        }
        scalar => push_scalar(indent.clone(), &indent, scalar_lines(scalar)?, out),
    }
    Ok(())
}
