//! Spec documents: data model and loading

pub mod ast;
pub mod loader;

pub use ast::*;
pub use loader::{load_templates, parse_document, parse_template, Workspace};
