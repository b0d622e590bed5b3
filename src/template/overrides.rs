//! Dotted-path overrides applied to an expanded copy of a template
//!
//! Paths address a closed set of attributes. A leading segment that names one
//! of the targeted options selects that option (recursing into section
//! options); otherwise a single-option template takes the path directly:
//!
//! ```text
//! value.example                  # only option of the template
//! timeout.value.example          # option named "timeout"
//! instances.timeout.value.type   # nested option of the "instances" section
//! ```

use std::collections::BTreeMap;

use serde_yaml::Value;

use crate::spec::ast::{OptionSpec, ValueSpec};

use super::registry::SchemaError;

/// Apply every override to the expanded options of `template`
pub fn apply_overrides(
    options: &mut [OptionSpec],
    overrides: &BTreeMap<String, Value>,
    template: &str,
) -> Result<(), SchemaError> {
    for (path, value) in overrides {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid(template, path, "empty path segment"));
        }
        patch_options(options, &segments, value).map_err(|reason| invalid(template, path, &reason))?;
    }
    Ok(())
}

fn invalid(template: &str, path: &str, reason: &str) -> SchemaError {
    SchemaError::InvalidOverridePath {
        template: template.to_string(),
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

fn patch_options(options: &mut [OptionSpec], segments: &[&str], value: &Value) -> Result<(), String> {
    if segments.len() > 1 {
        if let Some(option) = options.iter_mut().find(|o| o.name == segments[0]) {
            return patch_option(option, &segments[1..], value);
        }
    }

    match options {
        [only] => patch_option(only, segments, value),
        [] => Err("template has no options".to_string()),
        _ => Err(format!("no option named '{}'", segments[0])),
    }
}

fn patch_option(option: &mut OptionSpec, segments: &[&str], value: &Value) -> Result<(), String> {
    match segments {
        ["name"] => option.name = expect_string(value)?,
        ["description"] => option.description = expect_string(value)?,
        ["required"] => option.required = expect_bool(value)?,
        ["hidden"] => option.hidden = expect_bool(value)?,
        ["multiple"] => option.multiple = expect_bool(value)?,
        ["value", rest @ ..] => {
            let spec = option
                .value
                .as_mut()
                .ok_or_else(|| format!("option '{}' has no value", option.name))?;
            patch_value(spec, rest, value)?;
        }
        [head, ..] => {
            let nested = option
                .options
                .as_mut()
                .ok_or_else(|| format!("option '{}' has no attribute '{}'", option.name, head))?;
            let child = nested
                .iter_mut()
                .find(|o| o.name == *head)
                .ok_or_else(|| format!("section '{}' has no option named '{}'", option.name, head))?;
            if segments.len() == 1 {
                return Err(format!("path must name an attribute of option '{}'", head));
            }
            patch_option(child, &segments[1..], value)?;
        }
        [] => return Err("path must name an attribute".to_string()),
    }
    Ok(())
}

fn patch_value(spec: &mut ValueSpec, segments: &[&str], value: &Value) -> Result<(), String> {
    match segments {
        [] => *spec = expect_value_spec(value)?,
        ["type"] => spec.value_type = Some(expect_string(value)?),
        ["example"] => spec.example = Some(value.clone()),
        ["default"] => spec.default = Some(value.clone()),
        ["display_default"] => spec.display_default = Some(value.clone()),
        ["items"] => spec.items = Some(Box::new(expect_value_spec(value)?)),
        ["items", rest @ ..] => {
            let items = spec
                .items
                .as_mut()
                .ok_or_else(|| "value has no items".to_string())?;
            patch_value(items, rest, value)?;
        }
        [other, ..] => return Err(format!("value has no attribute '{}'", other)),
    }
    Ok(())
}

fn expect_string(value: &Value) -> Result<String, String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| "expected a string".to_string())
}

fn expect_bool(value: &Value) -> Result<bool, String> {
    value.as_bool().ok_or_else(|| "expected a boolean".to_string())
}

fn expect_value_spec(value: &Value) -> Result<ValueSpec, String> {
    serde_yaml::from_value(value.clone()).map_err(|e| format!("invalid value spec: {}", e))
}
