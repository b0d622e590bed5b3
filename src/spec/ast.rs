//! Data model for spec documents, templates and composed schemas

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

/// A spec document: one integration and the configuration files it describes
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpecDocument {
    /// Integration name (e.g. "Apache")
    pub name: String,
    /// Configuration files, in declaration order
    #[serde(default)]
    pub files: Vec<FileSpec>,
    /// Where the document was loaded from
    #[serde(skip)]
    pub path: PathBuf,
}

/// A top-level configuration file such as `apache.yaml`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSpec {
    pub name: String,
    #[serde(default)]
    pub options: Vec<SectionRef>,
}

/// One entry of an option list: an inline option or a template reference
#[derive(Debug, Clone, PartialEq)]
pub enum SectionRef {
    Literal(RawOption),
    Template(TemplateRef),
}

impl SectionRef {
    /// Template path if this entry is a reference
    pub fn template_path(&self) -> Option<&str> {
        match self {
            SectionRef::Template(r) => Some(r.template.as_str()),
            SectionRef::Literal(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for SectionRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let is_reference = value
            .as_mapping()
            .map_or(false, |m| m.contains_key("template"));

        if is_reference {
            serde_yaml::from_value(value)
                .map(SectionRef::Template)
                .map_err(D::Error::custom)
        } else {
            serde_yaml::from_value(value)
                .map(SectionRef::Literal)
                .map_err(D::Error::custom)
        }
    }
}

/// Reference to a registered template, expanded at this site only
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateRef {
    /// Template path, e.g. `instances/http`
    pub template: String,
    /// Extra options appended after the template's own.
    ///
    /// `None` when the key is omitted, `Some(vec![])` for an explicit `options: []`.
    #[serde(default)]
    pub options: Option<Vec<SectionRef>>,
    /// Dotted attribute path -> replacement value
    #[serde(default)]
    pub overrides: BTreeMap<String, Value>,
}

/// An option as written in a spec document or template, before composition
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOption {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub value: Option<ValueSpec>,
    #[serde(default)]
    pub options: Option<Vec<SectionRef>>,
}

/// Type and example metadata of a parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueSpec {
    /// Declared type; checked when rendering
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Shown in the header instead of `default` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_default: Option<Value>,
    /// Element type for arrays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ValueSpec>>,
}

impl ValueSpec {
    /// Create a value spec with a type and an example
    pub fn new(value_type: impl Into<String>, example: impl Into<Value>) -> Self {
        Self {
            value_type: Some(value_type.into()),
            example: Some(example.into()),
            ..Self::default()
        }
    }

    /// Value shown as the default in rendered headers
    pub fn shown_default(&self) -> Option<&Value> {
        self.display_default.as_ref().or(self.default.as_ref())
    }

    /// Whether the example is present and carries content
    pub fn has_example(&self) -> bool {
        match &self.example {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Sequence(s)) => !s.is_empty(),
            Some(Value::Mapping(m)) => !m.is_empty(),
            Some(_) => true,
        }
    }

    pub fn is_array(&self) -> bool {
        self.value_type.as_deref() == Some("array")
    }
}

/// A fully composed option: no template references remain
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptionSpec {
    pub name: String,
    pub required: bool,
    pub hidden: bool,
    pub multiple: bool,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionSpec>>,
}

impl OptionSpec {
    /// Create a parameter option with the given value spec
    pub fn new(name: impl Into<String>, value: ValueSpec) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
            ..Self::default()
        }
    }

    /// Options with nested options (`init_config`, `instances`) are sections
    pub fn is_section(&self) -> bool {
        self.options.is_some()
    }
}

/// The flattened option list for one configuration file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedSchema {
    /// Name of the file spec this schema was composed from
    pub file: String,
    pub options: Vec<OptionSpec>,
}
