//! Error types for loading spec documents and templates

use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::template::SchemaError;

/// Errors that can occur while reading the input directory
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        /// Full text of the offending file, kept for diagnostics
        text: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
}

impl LoadError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn yaml(path: &Path, text: &str, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.to_path_buf(),
            text: text.to_string(),
            source,
        }
    }

    /// Format the error with source context using ariadne
    ///
    /// YAML errors that carry a location are rendered as an annotated report;
    /// everything else falls back to the plain message.
    pub fn format(&self) -> String {
        let (path, text, source) = match self {
            LoadError::Yaml { path, text, source } => (path, text, source),
            _ => return self.to_string(),
        };
        let Some(location) = source.location() else {
            return self.to_string();
        };

        let filename = path.display().to_string();
        let start = char_offset(text, location.index());
        let end = (start + 1).min(text.chars().count()).max(start);
        let mut buf = Vec::new();

        let written = Report::build(ReportKind::Error, filename.as_str(), start)
            .with_message(format!("invalid YAML in {}", filename))
            .with_label(
                Label::new((filename.as_str(), start..end))
                    .with_message(source.to_string())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename.as_str(), Source::from(text.as_str())), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Character offset of a byte index; ariadne spans count characters
fn char_offset(text: &str, byte: usize) -> usize {
    let mut byte = byte.min(text.len());
    while !text.is_char_boundary(byte) {
        byte -= 1;
    }
    text[..byte].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_offset_counts_multibyte_characters() {
        let text = "name: Café\nfiles: [\n";
        let byte = text.find("files").unwrap();
        assert_eq!(byte, 12);
        assert_eq!(char_offset(text, byte), 11);
        // Inside the two-byte 'é' and past the end
        assert_eq!(char_offset(text, 10), 9);
        assert_eq!(char_offset(text, 1000), text.chars().count());
    }

    #[test]
    fn test_format_points_at_error_after_non_ascii_text() {
        let text = "name: Café\nfiles: [\n";
        let source = serde_yaml::from_str::<serde_yaml::Value>(text).unwrap_err();
        let err = LoadError::yaml(Path::new("spec.yaml"), text, source);

        let formatted = err.format();
        assert!(formatted.contains("spec.yaml"));
    }

    #[test]
    fn test_format_yaml_error_mentions_file() {
        let text = "name: Apache\nfiles: [\n";
        let source = serde_yaml::from_str::<serde_yaml::Value>(text).unwrap_err();
        let err = LoadError::yaml(Path::new("spec.yaml"), text, source);

        let formatted = err.format();
        assert!(formatted.contains("spec.yaml"));
    }

    #[test]
    fn test_format_io_error_is_plain_message() {
        let err = LoadError::io(
            Path::new("missing.yaml"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        assert_eq!(err.format(), err.to_string());
        assert!(err.to_string().contains("missing.yaml"));
    }
}
