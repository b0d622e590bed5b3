//! Schema composition - expands template references into concrete options

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use crate::spec::ast::{ComposedSchema, FileSpec, OptionSpec, RawOption, SectionRef, TemplateRef};

use super::overrides::apply_overrides;
use super::registry::{SchemaError, TemplateRegistry};

/// A composition error together with the templates being resolved when it occurred
#[derive(Debug, Error, PartialEq)]
#[error("{error}")]
pub struct CompositionFailure {
    /// Template paths from outermost to innermost
    pub chain: Vec<String>,
    #[source]
    pub error: SchemaError,
}

/// Context for template resolution
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    /// Templates currently being resolved, outermost first (for cycle detection)
    pub resolving: Vec<String>,
}

impl ResolutionContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a template is currently being resolved (cycle detection)
    pub fn is_resolving(&self, path: &str) -> bool {
        self.resolving.iter().any(|p| p == path)
    }

    /// Mark a template as being resolved
    pub fn start_resolving(&mut self, path: &str) {
        self.resolving.push(path.to_string());
    }

    /// Mark the innermost template as done resolving
    pub fn done_resolving(&mut self) {
        self.resolving.pop();
    }
}

/// Compose a file spec into a flat, reference-free schema
///
/// This function:
/// 1. Expands every entry in declaration order, resolving templates recursively
/// 2. Applies each reference's overrides to its own expanded copy
/// 3. Validates sibling name uniqueness and required examples
///
/// Options listed alongside a reference are appended after the template's
/// options, except when the template expands to a single section: then they
/// are appended to that section's nested options.
pub fn compose(file: &FileSpec, registry: &TemplateRegistry) -> Result<ComposedSchema, CompositionFailure> {
    let mut ctx = ResolutionContext::new();

    // The stack is left as-is on error, so it names the failing chain
    let options = expand_entries(&file.options, registry, &mut ctx).map_err(|error| CompositionFailure {
        chain: ctx.resolving.clone(),
        error,
    })?;

    validate_block(&options, &file.name).map_err(|error| CompositionFailure {
        chain: Vec::new(),
        error,
    })?;

    debug!(file = %file.name, options = options.len(), "composed schema");
    Ok(ComposedSchema {
        file: file.name.clone(),
        options,
    })
}

/// Expand an ordered list of entries
fn expand_entries(
    entries: &[SectionRef],
    registry: &TemplateRegistry,
    ctx: &mut ResolutionContext,
) -> Result<Vec<OptionSpec>, SchemaError> {
    let mut expanded = Vec::new();
    for entry in entries {
        match entry {
            SectionRef::Literal(raw) => expanded.push(expand_literal(raw, registry, ctx)?),
            SectionRef::Template(reference) => {
                expanded.extend(expand_reference(reference, registry, ctx)?);
            }
        }
    }
    Ok(expanded)
}

/// Convert a literal option, expanding references among its nested options
fn expand_literal(
    raw: &RawOption,
    registry: &TemplateRegistry,
    ctx: &mut ResolutionContext,
) -> Result<OptionSpec, SchemaError> {
    let options = match &raw.options {
        Some(nested) => Some(expand_entries(nested, registry, ctx)?),
        None => None,
    };

    Ok(OptionSpec {
        name: raw.name.clone(),
        required: raw.required,
        hidden: raw.hidden,
        multiple: raw.multiple,
        description: raw.description.clone(),
        value: raw.value.clone(),
        options,
    })
}

/// Expand a single template reference into options
fn expand_reference(
    reference: &TemplateRef,
    registry: &TemplateRegistry,
    ctx: &mut ResolutionContext,
) -> Result<Vec<OptionSpec>, SchemaError> {
    let path = reference.template.as_str();

    // Check for circular references
    if ctx.is_resolving(path) {
        let mut chain = ctx.resolving.clone();
        chain.push(path.to_string());
        return Err(SchemaError::CircularTemplate { chain });
    }

    let template = registry.resolve(path)?;

    ctx.start_resolving(path);
    // Expansion builds fresh values; the registry entry is only ever borrowed
    let mut options = expand_entries(&template.entries, registry, ctx)?;
    apply_overrides(&mut options, &reference.overrides, path)?;
    ctx.done_resolving();

    debug!(template = %path, options = options.len(), "expanded template");

    let Some(extra) = &reference.options else {
        return Ok(options);
    };
    let extra = expand_entries(extra, registry, ctx)?;

    match options.as_mut_slice() {
        [section] if section.is_section() => {
            section.options.get_or_insert_with(Vec::new).extend(extra);
        }
        _ => options.extend(extra),
    }
    Ok(options)
}

/// Check sibling name uniqueness and required examples, recursing into sections
fn validate_block(options: &[OptionSpec], block: &str) -> Result<(), SchemaError> {
    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.name.as_str()) {
            return Err(SchemaError::DuplicateOptionName {
                name: option.name.clone(),
                block: block.to_string(),
            });
        }

        match &option.options {
            Some(nested) => validate_block(nested, &format!("{}.{}", block, option.name))?,
            None if option.required => {
                let has_example = option.value.as_ref().map_or(false, |v| v.has_example());
                if !has_example {
                    return Err(SchemaError::MissingField {
                        option: option.name.clone(),
                        field: "value.example".to_string(),
                    });
                }
            }
            None => {}
        }
    }
    Ok(())
}
