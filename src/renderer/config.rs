//! Configuration for example rendering

/// Configuration options for example output
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Column at which descriptions are wrapped (including the comment prefix)
    pub wrap_width: usize,

    /// Indentation of options nested under a section
    pub indent: usize,

    /// Sections rendered verbatim from their example instead of as parameters
    pub literal_sections: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            wrap_width: 80,
            indent: 4,
            literal_sections: vec!["logs".to_string()],
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the description wrap column
    pub fn with_wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = width;
        self
    }

    /// Set the nested option indentation
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Render another section verbatim from its example
    pub fn with_literal_section(mut self, name: impl Into<String>) -> Self {
        self.literal_sections.push(name.into());
        self
    }

    /// Replace the list of verbatim sections
    pub fn with_literal_sections(mut self, names: Vec<String>) -> Self {
        self.literal_sections = names;
        self
    }

    pub fn is_literal_section(&self, name: &str) -> bool {
        self.literal_sections.iter().any(|s| s == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.wrap_width, 80);
        assert_eq!(config.indent, 4);
        assert!(config.is_literal_section("logs"));
        assert!(!config.is_literal_section("instances"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = RenderConfig::new()
            .with_wrap_width(100)
            .with_indent(2)
            .with_literal_section("event_logs");

        assert_eq!(config.wrap_width, 100);
        assert_eq!(config.indent, 2);
        assert!(config.is_literal_section("logs"));
        assert!(config.is_literal_section("event_logs"));
    }
}
