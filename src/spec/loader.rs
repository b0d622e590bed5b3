//! Loading spec documents and templates from an input directory
//!
//! Layout:
//!
//! ```text
//! <input>/
//!   spec.yaml                 # spec documents (any *.yaml directly under <input>)
//!   templates/
//!     instances.yaml          # template "instances"
//!     instances/http.yaml     # template "instances/http"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::{debug, info};

use crate::error::LoadError;
use crate::template::{TemplateRegistry, TemplateSpec};

use super::ast::{SectionRef, SpecDocument};

/// Subdirectory holding template files
pub const TEMPLATES_DIR: &str = "templates";

/// Everything loaded from one input directory
#[derive(Debug, Default)]
pub struct Workspace {
    pub registry: TemplateRegistry,
    pub documents: Vec<SpecDocument>,
}

impl Workspace {
    /// Load templates and spec documents from `dir`
    pub fn load(dir: &Path) -> Result<Self, LoadError> {
        let templates_dir = dir.join(TEMPLATES_DIR);
        let registry = if templates_dir.is_dir() {
            load_templates(&templates_dir)?
        } else {
            debug!(dir = %templates_dir.display(), "no templates directory");
            TemplateRegistry::new()
        };

        let mut documents = Vec::new();
        for path in yaml_files(dir, false)? {
            let text = read(&path)?;
            documents.push(parse_document(&path, &text)?);
        }

        info!(
            templates = registry.len(),
            documents = documents.len(),
            "loaded {}",
            dir.display()
        );
        Ok(Self { registry, documents })
    }
}

/// Load every template file below `dir` into a new registry
pub fn load_templates(dir: &Path) -> Result<TemplateRegistry, LoadError> {
    let mut registry = TemplateRegistry::new();
    for path in yaml_files(dir, true)? {
        let text = read(&path)?;
        let spec = parse_template(&path, &text)?;
        let name = template_name(dir, &path);
        registry
            .register(name, spec)
            .map_err(|source| LoadError::Template {
                path: path.clone(),
                source,
            })?;
    }
    Ok(registry)
}

/// Parse a template file holding either one option mapping or a list of entries
pub fn parse_template(path: &Path, text: &str) -> Result<TemplateSpec, LoadError> {
    if text.trim().is_empty() {
        return Ok(TemplateSpec::new(Vec::new()).with_source(path));
    }
    let value: Value = serde_yaml::from_str(text).map_err(|e| LoadError::yaml(path, text, e))?;

    let entries = match value {
        Value::Null => Vec::new(),
        Value::Mapping(_) => {
            let entry: SectionRef =
                serde_yaml::from_value(value).map_err(|e| LoadError::yaml(path, text, e))?;
            vec![entry]
        }
        other => serde_yaml::from_value(other).map_err(|e| LoadError::yaml(path, text, e))?,
    };

    Ok(TemplateSpec::new(entries).with_source(path))
}

/// Parse a spec document
pub fn parse_document(path: &Path, text: &str) -> Result<SpecDocument, LoadError> {
    let mut document: SpecDocument =
        serde_yaml::from_str(text).map_err(|e| LoadError::yaml(path, text, e))?;
    document.path = path.to_path_buf();
    Ok(document)
}

/// Template path for a file: its location relative to `root`, without extension
pub fn template_name(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file).with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|e| LoadError::io(path, e))
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// YAML files in `dir`, sorted so loading order is stable
fn yaml_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))?;

    for entry in entries {
        let path = entry.map_err(|e| LoadError::io(dir, e))?.path();
        if path.is_dir() {
            if recursive {
                files.extend(yaml_files(&path, true)?);
            }
        } else if is_yaml(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_name_uses_relative_path() {
        let root = Path::new("/spec/templates");
        assert_eq!(
            template_name(root, Path::new("/spec/templates/instances/http.yaml")),
            "instances/http"
        );
        assert_eq!(template_name(root, Path::new("/spec/templates/logs.yaml")), "logs");
    }

    #[test]
    fn test_single_mapping_template_is_one_entry() {
        let spec = parse_template(
            Path::new("instances.yaml"),
            "name: instances\nmultiple: true\noptions: []\n",
        )
        .expect("Should parse");
        assert_eq!(spec.entries.len(), 1);
        assert!(matches!(spec.entries[0], SectionRef::Literal(ref o) if o.multiple));
    }

    #[test]
    fn test_sequence_template_keeps_order() {
        let spec = parse_template(
            Path::new("default.yaml"),
            "- template: instances/tags\n- name: service\n  value: {type: string}\n",
        )
        .expect("Should parse");
        assert_eq!(spec.entries.len(), 2);
        assert_eq!(spec.entries[0].template_path(), Some("instances/tags"));
        assert_eq!(spec.entries[1].template_path(), None);
    }

    #[test]
    fn test_empty_template_file() {
        let spec = parse_template(Path::new("empty.yaml"), "").expect("Should parse");
        assert!(spec.entries.is_empty());
    }

    #[test]
    fn test_scalar_template_rejected() {
        let result = parse_template(Path::new("bad.yaml"), "just text");
        assert!(matches!(result, Err(LoadError::Yaml { .. })));
    }

    #[test]
    fn test_parse_document_records_path() {
        let doc = parse_document(
            Path::new("spec.yaml"),
            "name: Apache\nfiles:\n  - name: apache.yaml\n    options: []\n",
        )
        .expect("Should parse");
        assert_eq!(doc.name, "Apache");
        assert_eq!(doc.path, PathBuf::from("spec.yaml"));
        assert_eq!(doc.files[0].name, "apache.yaml");
    }
}
