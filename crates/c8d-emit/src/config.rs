//! Emit configuration.

/// Indentation unit for nested statements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indent {
    Tab,
    Spaces(u8),
}

impl Indent {
    /// Indentation for `depth` levels.
    pub fn repeat(self, depth: usize) -> String {
        match self {
            Self::Tab => "\t".repeat(depth),
            Self::Spaces(width) => " ".repeat(usize::from(width) * depth),
        }
    }
}

impl Default for Indent {
    fn default() -> Self {
        Self::Tab
    }
}

/// Source formatting configuration.
#[derive(Clone, Debug)]
pub struct EmitConfig {
    /// Emit a comment for each quirk the analysis ran with.
    pub quirk_comments: bool,
    pub indent: Indent,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            quirk_comments: true,
            indent: Indent::Tab,
        }
    }
}

impl EmitConfig {
    pub const fn with_quirk_comments(mut self, enabled: bool) -> Self {
        self.quirk_comments = enabled;
        self
    }

    pub const fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_repeat() {
        assert_eq!(Indent::Tab.repeat(2), "\t\t");
        assert_eq!(Indent::Spaces(4).repeat(1), "    ");
        assert_eq!(Indent::Spaces(2).repeat(0), "");
    }
}
