//! Settings file support
//!
//! Rendering and output options can be tuned with a TOML file. Keys that are
//! not present fall back to the built-in defaults.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::renderer::RenderConfig;

/// Errors that can occur when loading or parsing settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Pipeline settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Example rendering options
    pub render: RenderConfig,
    /// Extension appended to each file name when writing examples
    pub output_extension: String,
}

/// TOML structure for deserializing settings
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSettings {
    render: Option<TomlRender>,
    output: Option<TomlOutput>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlRender {
    wrap_width: Option<usize>,
    indent: Option<usize>,
    literal_sections: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlOutput {
    extension: Option<String>,
}

/// Default settings
const DEFAULT_SETTINGS: &str = r#"
[render]
# Descriptions are wrapped at this column, comment prefix included
wrap_width = 80
# Indentation of options nested under init_config / instances
indent = 4
# Sections written verbatim from their example
literal_sections = ["logs"]

[output]
extension = "example"
"#;

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load settings from a TOML string, layered over the defaults
    pub fn from_str(content: &str) -> Result<Self, SettingsError> {
        let parsed: TomlSettings = toml::from_str(content)?;
        let mut settings = Self::defaults();

        if let Some(render) = parsed.render {
            if let Some(width) = render.wrap_width {
                settings.render.wrap_width = width;
            }
            if let Some(indent) = render.indent {
                settings.render.indent = indent;
            }
            if let Some(sections) = render.literal_sections {
                settings.render.literal_sections = sections;
            }
        }
        if let Some(output) = parsed.output {
            if let Some(extension) = output.extension {
                settings.output_extension = extension;
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> Self {
        Self {
            render: RenderConfig::default(),
            output_extension: "example".to_string(),
        }
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.render.wrap_width == 0 {
            return Err(SettingsError::Invalid {
                key: "render.wrap_width".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        let extension = self.output_extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains('/') || extension.contains('\\') {
            return Err(SettingsError::Invalid {
                key: "output.extension".to_string(),
                reason: format!("'{}' is not a file extension", self.output_extension),
            });
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_str(DEFAULT_SETTINGS).unwrap_or_else(|_| Self::defaults())
    }
}
