//! Template registry for storing and retrieving template specs

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::spec::ast::SectionRef;

/// Errors that can occur while composing or rendering a schema
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    /// Template not found in registry
    #[error("unknown template: {path}")]
    UnknownTemplate { path: String },

    /// Two templates registered under the same path
    #[error("duplicate template definition: {path}")]
    DuplicateTemplate { path: String },

    /// Circular template reference
    #[error("circular template reference detected: {}", chain.join(" -> "))]
    CircularTemplate { chain: Vec<String> },

    /// Override targeting an attribute that does not exist
    #[error("invalid override path '{path}' for template {template}: {reason}")]
    InvalidOverridePath {
        template: String,
        path: String,
        reason: String,
    },

    /// Field needed to render or validate an option is absent
    #[error("option '{option}' is missing required field '{field}'")]
    MissingField { option: String, field: String },

    /// Example or default value that cannot be written as YAML
    #[error("option '{option}' has an unrepresentable value: {reason}")]
    InvalidValue { option: String, reason: String },

    /// Two sibling options share a name
    #[error("duplicate option name '{name}' in {block}")]
    DuplicateOptionName { name: String, block: String },
}

/// A stored template: an ordered list of option entries
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSpec {
    pub entries: Vec<SectionRef>,
    /// File the template was loaded from, if any
    pub source: Option<PathBuf>,
}

impl TemplateSpec {
    pub fn new(entries: Vec<SectionRef>) -> Self {
        Self {
            entries,
            source: None,
        }
    }

    /// Attach the originating file path
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Registry for storing template specs by path
///
/// Populated once at startup; afterwards only shared references are handed
/// out, so templates cannot be modified by composition.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, TemplateSpec>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under a unique path
    pub fn register(
        &mut self,
        path: impl Into<String>,
        spec: TemplateSpec,
    ) -> Result<(), SchemaError> {
        let path = path.into();
        if self.templates.contains_key(&path) {
            return Err(SchemaError::DuplicateTemplate { path });
        }

        debug!(template = %path, entries = spec.entries.len(), "registered template");
        self.templates.insert(path, spec);
        Ok(())
    }

    /// Look up a template, failing if it was never registered
    pub fn resolve(&self, path: &str) -> Result<&TemplateSpec, SchemaError> {
        self.templates
            .get(path)
            .ok_or_else(|| SchemaError::UnknownTemplate {
                path: path.to_string(),
            })
    }

    /// Get a template by path
    pub fn get(&self, path: &str) -> Option<&TemplateSpec> {
        self.templates.get(path)
    }

    /// Check if a template exists
    pub fn contains(&self, path: &str) -> bool {
        self.templates.contains_key(path)
    }

    /// All template paths, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
