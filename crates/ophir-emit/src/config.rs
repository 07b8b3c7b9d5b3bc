use serde::{Deserialize, Serialize};

/// Formatting switches forwarded untouched to a [`Printer`](crate::Printer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpPrintingFlags {
    /// Dense attributes with more elements than this print as an elided
    /// resource instead of their data.
    pub elide_large_elements_attrs: Option<usize>,
    pub print_debug_info: bool,
    pub print_value_users: bool,
    pub skip_regions: bool,
    pub use_colors: bool,
    pub indent_style: IndentStyle,
}

impl Default for OpPrintingFlags {
    fn default() -> Self {
        Self {
            elide_large_elements_attrs: None,
            print_debug_info: false,
            print_value_users: false,
            skip_regions: false,
            use_colors: false,
            indent_style: IndentStyle::Spaces(2),
        }
    }
}

impl OpPrintingFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elide_large_elements_attrs(mut self, limit: usize) -> Self {
        self.elide_large_elements_attrs = Some(limit);
        self
    }

    pub fn enable_debug_info(mut self) -> Self {
        self.print_debug_info = true;
        self
    }

    pub fn print_value_users(mut self) -> Self {
        self.print_value_users = true;
        self
    }

    pub fn skip_regions(mut self) -> Self {
        self.skip_regions = true;
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn with_indent(mut self, indent_style: IndentStyle) -> Self {
        self.indent_style = indent_style;
        self
    }

    pub fn should_elide(&self, num_elements: usize) -> bool {
        self.elide_large_elements_attrs
            .is_some_and(|limit| num_elements > limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndentStyle {
    Spaces(usize),
    Tabs,
}

impl IndentStyle {
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Spaces(n) => " ".repeat(*n),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elision_threshold() {
        let flags = OpPrintingFlags::new();
        assert!(!flags.should_elide(1_000_000));

        let flags = flags.elide_large_elements_attrs(4);
        assert!(!flags.should_elide(4));
        assert!(flags.should_elide(5));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let flags: OpPrintingFlags =
            serde_json::from_str(r#"{ "print_debug_info": true }"#).unwrap();
        assert!(flags.print_debug_info);
        assert_eq!(flags.indent_style, IndentStyle::Spaces(2));
        assert_eq!(flags.elide_large_elements_attrs, None);
    }
}
