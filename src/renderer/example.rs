//! Example configuration generation from composed schemas

use serde_yaml::Value;

use crate::spec::ast::{ComposedSchema, OptionSpec};
use crate::template::SchemaError;

use super::yaml::{entry_lines, inline};
use super::RenderConfig;

/// Render a composed schema as a commented example configuration file
///
/// Each parameter gets an `## @param` header, its wrapped description and a
/// commented `# name: example` line. Sections (`init_config`, `instances`) are
/// written as real keys with their options nested below; literal sections
/// (`logs` by default) are written verbatim from their example.
pub fn render(schema: &ComposedSchema, config: &RenderConfig) -> Result<String, SchemaError> {
    let mut writer = ExampleWriter::new(config);
    writer.write_options(&schema.options, 0)?;
    Ok(writer.finish())
}

/// Build example lines incrementally
struct ExampleWriter<'a> {
    config: &'a RenderConfig,
    lines: Vec<String>,
}

impl<'a> ExampleWriter<'a> {
    fn new(config: &'a RenderConfig) -> Self {
        Self {
            config,
            lines: Vec::new(),
        }
    }

    fn write_options(&mut self, options: &[OptionSpec], indent: usize) -> Result<(), SchemaError> {
        for option in options.iter().filter(|o| !o.hidden) {
            if self.config.is_literal_section(&option.name) && !option.is_section() {
                self.write_literal(option, indent)?;
            } else if option.is_section() {
                self.write_section(option, indent)?;
            } else {
                self.write_parameter(option, indent)?;
            }
            self.blank();
        }
        Ok(())
    }

    fn write_parameter(&mut self, option: &OptionSpec, indent: usize) -> Result<(), SchemaError> {
        let pad = " ".repeat(indent);
        let value = option
            .value
            .as_ref()
            .ok_or_else(|| missing(option, "value"))?;
        let value_type = value
            .value_type
            .as_deref()
            .ok_or_else(|| missing(option, "value.type"))?;

        let header = if option.required {
            format!("{}## @param {} - {} - required", pad, option.name, value_type)
        } else {
            let default = match value.shown_default() {
                Some(shown) => inline(shown).map_err(|e| invalid_value(option, e))?,
                None => "none".to_string(),
            };
            format!(
                "{}## @param {} - {} - optional - default: {}",
                pad, option.name, value_type, default
            )
        };
        self.lines.push(header);
        self.write_description(&option.description, &pad);
        self.lines.push(format!("{}#", pad));

        let example_lines = match &value.example {
            Some(example) if !example.is_null() => entry_lines(&option.name, example, 0),
            _ => {
                let token = Value::String(placeholder(&option.name));
                if value.is_array() {
                    entry_lines(&option.name, &Value::Sequence(vec![token]), 0)
                } else {
                    entry_lines(&option.name, &token, 0)
                }
            }
        }
        .map_err(|e| invalid_value(option, e))?;
        for line in example_lines {
            self.lines.push(format!("{}# {}", pad, line));
        }
        Ok(())
    }

    fn write_section(&mut self, option: &OptionSpec, indent: usize) -> Result<(), SchemaError> {
        let pad = " ".repeat(indent);
        if !option.description.trim().is_empty() {
            self.write_description(&option.description, &pad);
            self.lines.push(format!("{}#", pad));
        }
        self.lines.push(format!("{}{}:", pad, option.name));
        self.blank();

        if option.multiple {
            self.lines.push(format!("{}  -", pad));
        }
        let nested = option.options.as_deref().unwrap_or(&[]);
        self.write_options(nested, indent + self.config.indent)
    }

    fn write_literal(&mut self, option: &OptionSpec, indent: usize) -> Result<(), SchemaError> {
        let pad = " ".repeat(indent);
        let example = option
            .value
            .as_ref()
            .and_then(|v| v.example.as_ref())
            .ok_or_else(|| missing(option, "value.example"))?;

        if !option.description.trim().is_empty() {
            self.write_description(&option.description, &pad);
            self.lines.push(format!("{}#", pad));
        }
        let lines = entry_lines(&option.name, example, 0).map_err(|e| invalid_value(option, e))?;
        for line in lines {
            self.lines.push(format!("{}{}", pad, line));
        }
        Ok(())
    }

    fn write_description(&mut self, text: &str, pad: &str) {
        let width = self
            .config
            .wrap_width
            .saturating_sub(pad.len() + 3)
            .max(MIN_TEXT_WIDTH);
        for line in wrap(text, width) {
            if line.is_empty() {
                self.lines.push(format!("{}##", pad));
            } else {
                self.lines.push(format!("{}## {}", pad, line));
            }
        }
    }

    /// Push an empty line unless the previous line is already empty
    fn blank(&mut self) {
        if self.lines.last().map_or(false, |l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn finish(mut self) -> String {
        while self.lines.last().map_or(false, |l| l.is_empty()) {
            self.lines.pop();
        }
        if self.lines.is_empty() {
            return String::new();
        }
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

const MIN_TEXT_WIDTH: usize = 20;

fn missing(option: &OptionSpec, field: &str) -> SchemaError {
    SchemaError::MissingField {
        option: option.name.clone(),
        field: field.to_string(),
    }
}

fn invalid_value(option: &OptionSpec, error: serde_yaml::Error) -> SchemaError {
    SchemaError::InvalidValue {
        option: option.name.clone(),
        reason: error.to_string(),
    }
}

/// `<NAME>` token shown when an option has no example
pub fn placeholder(name: &str) -> String {
    format!("<{}>", name.to_uppercase())
}

/// Greedy word wrap, keeping each source line's leading indentation
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.trim_end().lines() {
        let lead = &raw[..raw.len() - raw.trim_start().len()];
        let mut current = String::new();
        for word in raw.split_whitespace() {
            if current.is_empty() {
                current = format!("{}{}", lead, word);
            } else if current.len() + 1 + word.len() > width {
                lines.push(std::mem::take(&mut current));
                current = format!("{}{}", lead, word);
            } else {
                current.push(' ');
                current.push_str(word);
            }
        }
        lines.push(current);
    }
    lines
}
