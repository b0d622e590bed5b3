//! config-spec - compile configuration specs into example configuration files
//!
//! This library loads declarative spec documents and reusable templates,
//! composes them into flat option schemas and renders commented example
//! configuration files for monitoring-agent integrations.
//!
//! # Example
//!
//! ```rust
//! use config_spec::{render_spec, RenderConfig, TemplateRegistry};
//!
//! let files = render_spec(
//!     r#"
//! name: Apache
//! files:
//!   - name: apache.yaml
//!     options:
//!       - name: apache_status_url
//!         required: true
//!         value:
//!           type: string
//!           example: http://localhost/server-status?auto
//! "#,
//!     &TemplateRegistry::new(),
//!     &RenderConfig::default(),
//! )
//! .unwrap();
//!
//! assert!(files[0].contents.contains("# apache_status_url: http://localhost/server-status?auto"));
//! ```

pub mod error;
pub mod logging;
pub mod output;
pub mod renderer;
pub mod settings;
pub mod spec;
pub mod template;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

pub use error::LoadError;
pub use renderer::{render, RenderConfig};
pub use settings::Settings;
pub use spec::{ComposedSchema, FileSpec, OptionSpec, SpecDocument, ValueSpec, Workspace};
pub use template::{compose, CompositionFailure, SchemaError, TemplateRegistry, TemplateSpec};

/// Errors that can occur in [`render_spec`]
#[derive(Debug, Error)]
pub enum RenderError {
    /// The spec document could not be read
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// One or more files failed to compose or render
    #[error("{} file(s) failed: {}", .0.len(), format_failures(.0))]
    Failed(Vec<FileFailure>),
}

fn format_failures(failures: &[FileFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// An example generated for one file spec
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    /// Spec document the file was declared in
    pub spec_path: PathBuf,
    /// File spec name, e.g. `apache.yaml`
    pub file: String,
    pub contents: String,
}

/// A file spec that could not be composed or rendered
#[derive(Debug, Clone, PartialEq)]
pub struct FileFailure {
    pub spec_path: PathBuf,
    pub file: String,
    /// Templates being resolved when the error occurred, outermost first
    pub chain: Vec<String>,
    pub error: SchemaError,
}

impl std::fmt::Display for FileFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.spec_path.display(), self.file, self.error)?;
        if !self.chain.is_empty() {
            write!(f, " [while resolving {}]", self.chain.join(" -> "))?;
        }
        Ok(())
    }
}

/// Outcome of a pipeline run
#[derive(Debug, Default)]
pub struct Report {
    pub generated: Vec<GeneratedFile>,
    pub failures: Vec<FileFailure>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compose and render one file spec
pub fn generate_file(
    spec_path: &Path,
    file: &FileSpec,
    registry: &TemplateRegistry,
    config: &RenderConfig,
) -> Result<GeneratedFile, FileFailure> {
    let failure = |chain: Vec<String>, error: SchemaError| FileFailure {
        spec_path: spec_path.to_path_buf(),
        file: file.name.clone(),
        chain,
        error,
    };

    let schema = compose(file, registry).map_err(|f| failure(f.chain, f.error))?;
    let contents = render(&schema, config).map_err(|e| failure(Vec::new(), e))?;

    Ok(GeneratedFile {
        spec_path: spec_path.to_path_buf(),
        file: file.name.clone(),
        contents,
    })
}

/// Compose and render every file of every spec document
///
/// A failing file is recorded in the report and does not stop the others.
pub fn generate(workspace: &Workspace, config: &RenderConfig) -> Report {
    let mut report = Report::default();

    for document in &workspace.documents {
        for file in &document.files {
            match generate_file(&document.path, file, &workspace.registry, config) {
                Ok(generated) => {
                    info!(spec = %document.name, file = %file.name, "generated example");
                    report.generated.push(generated);
                }
                Err(failure) => {
                    warn!(spec = %document.name, file = %file.name, error = %failure.error, "file failed");
                    report.failures.push(failure);
                }
            }
        }
    }

    report
}

/// Render every file of a spec document given as YAML text
///
/// # Example
///
/// ```rust
/// use config_spec::{render_spec, RenderConfig, RenderError, TemplateRegistry};
///
/// let result = render_spec(
///     "name: Apache\nfiles:\n  - name: apache.yaml\n    options:\n      - template: instances/http\n",
///     &TemplateRegistry::new(),
///     &RenderConfig::default(),
/// );
/// assert!(matches!(result, Err(RenderError::Failed(_))));
/// ```
pub fn render_spec(
    source: &str,
    registry: &TemplateRegistry,
    config: &RenderConfig,
) -> Result<Vec<GeneratedFile>, RenderError> {
    let document = spec::parse_document(Path::new("<input>"), source)?;
    let mut generated = Vec::new();
    let mut failures = Vec::new();
    for file in &document.files {
        match generate_file(&document.path, file, registry, config) {
            Ok(file) => generated.push(file),
            Err(failure) => failures.push(failure),
        }
    }

    if failures.is_empty() {
        Ok(generated)
    } else {
        Err(RenderError::Failed(failures))
    }
}
