use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodeGenError>;

/// Everything that can abort a generation run.
///
/// None of these are recoverable at the widget level: the first error stops
/// the run and nothing is written.
#[derive(Debug, Error)]
pub enum CodeGenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing template: {name}")]
    TemplateNotFound { name: String },

    #[error("unresolved macro $<{name}> in template {template}{}", widget_suffix(.widget))]
    UnresolvedMacro {
        template: String,
        name: String,
        widget: Option<String>,
    },

    #[error("widget {widget} is a {found}, emitter expects a {expected}")]
    ModelTypeMismatch {
        widget: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("template library malformed at line {line}: {message}")]
    MalformedLibrary { line: usize, message: String },

    #[error("file {} is corrupted, missing tag: {tag}", .path.display())]
    MissingTag { path: PathBuf, tag: String },
}

fn widget_suffix(widget: &Option<String>) -> String {
    match widget {
        Some(key) => format!(" (widget {key})"),
        None => String::new(),
    }
}

impl CodeGenError {
    /// Attaches the offending widget's key to an unresolved macro report.
    #[must_use]
    pub fn for_widget(self, key: &str) -> Self {
        match self {
            Self::UnresolvedMacro { template, name, .. } => Self::UnresolvedMacro {
                template,
                name,
                widget: Some(key.to_string()),
            },
            other => other,
        }
    }

    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedLibrary {
            line,
            message: message.into(),
        }
    }
}
