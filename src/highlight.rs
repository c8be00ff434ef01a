//! Terminal syntax highlighting for generated C source using syntect.

use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};

/// Cached syntax highlighting resources.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: "base16-ocean.dark".to_string(),
        }
    }

    /// Highlight C code and return a list of (style, text) spans.
    pub fn highlight_c<'t>(&self, code: &'t str) -> Vec<(Style, &'t str)> {
        // Arduino sketches are C++; the C grammar covers what we generate.
        let syntax = self
            .syntax_set
            .find_syntax_by_extension("c")
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
        else {
            return vec![(Style::default(), code)];
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut result = Vec::new();

        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => result.extend(ranges),
                Err(err) => {
                    log::warn!("highlighting failed, showing plain text: {err}");
                    result.push((Style::default(), line));
                }
            }
        }

        result
    }

    /// Render highlighted code with 24-bit ANSI escapes, reset at the end.
    pub fn to_ansi(&self, code: &str) -> String {
        let spans = self.highlight_c(code);
        let mut out = as_24_bit_terminal_escaped(&spans, false);
        out.push_str("\x1b[0m");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlighter_creation() {
        let highlighter = Highlighter::new();
        // Should not panic
        let _ = highlighter.highlight_c("int main(void) { return 0; }");
    }

    #[test]
    fn test_highlight_c_keeps_text() {
        let highlighter = Highlighter::new();
        let code = "void InitGUI()\n{\n  gslc_SetPageCur(&m_gui,E_PG_MAIN);\n}\n";
        let spans = highlighter.highlight_c(code);
        assert!(!spans.is_empty());
        let joined: String = spans.iter().map(|(_, text)| *text).collect();
        assert_eq!(joined, code);
    }

    #[test]
    fn test_ansi_output() {
        let highlighter = Highlighter::new();
        let out = highlighter.to_ansi("#define MAX_PAGE 1\n");
        assert!(out.contains("\x1b["));
        assert!(out.contains("MAX_PAGE"));
    }
}
