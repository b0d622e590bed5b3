//! Template system for reusable option fragments
//!
//! Templates are named lists of options stored in a [`TemplateRegistry`]. File
//! specs reference them by path and may override attributes or append options
//! at the reference site; [`compose`] flattens everything into a
//! [`ComposedSchema`](crate::spec::ComposedSchema).
//!
//! # Example
//!
//! ```text
//! # templates/instances/http.yaml
//! - name: timeout
//!   value:
//!     type: integer
//!     example: 5
//!
//! # spec.yaml
//! - template: instances/http
//!   overrides:
//!     value.example: 10
//! ```

mod overrides;
mod registry;
mod resolver;

pub use overrides::apply_overrides;
pub use registry::{SchemaError, TemplateRegistry, TemplateSpec};
pub use resolver::{compose, CompositionFailure, ResolutionContext};
