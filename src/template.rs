//! Named template fragments and the library they are loaded from.
//!
//! A library is plain text: a `<NAME>` line, the body lines, then `<STOP>`.
//! The sequence repeats until `<END>` or the end of input.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::error::{CodeGenError, Result};

const STOP_TEMPLATE: &str = "<STOP>";
const END_TEMPLATE: &str = "<END>";

/// Library compiled into the crate; used unless the caller supplies one.
pub const BUILTIN_LIBRARY: &str = include_str!("../templates/guislice.t");

/// One immutable named block of target source lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    name: String,
    lines: Vec<String>,
}

impl Template {
    pub fn new(name: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            name: name.into(),
            lines,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Parsed template library. Built once per run and only read afterwards.
#[derive(Clone, Debug, Default)]
pub struct TemplateStore {
    templates: HashMap<String, Template>,
    // library order, for listing
    order: Vec<String>,
}

impl TemplateStore {
    /// Parses the library bundled with the crate.
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_LIBRARY)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let store = Self::parse(&text)?;
        log::debug!(
            "loaded {} templates from {}",
            store.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut store = Self::default();
        let mut lines = text.lines().enumerate();

        while let Some((idx, name_line)) = lines.next() {
            let name = name_line.trim_end();
            if name == END_TEMPLATE {
                break;
            }
            if name.is_empty() {
                continue;
            }
            if !(name.starts_with('<') && name.ends_with('>')) {
                return Err(CodeGenError::malformed(
                    idx + 1,
                    format!("expected template name, found {name:?}"),
                ));
            }

            let mut body = Vec::new();
            let mut stopped = false;
            for (_, line) in lines.by_ref() {
                if line.trim_end() == STOP_TEMPLATE {
                    stopped = true;
                    break;
                }
                body.push(line.to_string());
            }
            if !stopped {
                return Err(CodeGenError::malformed(
                    idx + 1,
                    format!("template {name} has no {STOP_TEMPLATE} line"),
                ));
            }
            if store.templates.contains_key(name) {
                return Err(CodeGenError::malformed(
                    idx + 1,
                    format!("duplicate template {name}"),
                ));
            }

            store.order.push(name.to_string());
            store
                .templates
                .insert(name.to_string(), Template::new(name, body));
        }

        Ok(store)
    }

    pub fn load_template(&self, name: &str) -> Result<&Template> {
        self.templates
            .get(name)
            .ok_or_else(|| CodeGenError::TemplateNotFound {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Template names in library order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
