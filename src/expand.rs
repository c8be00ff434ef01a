//! Macro expansion and the writers that feed the output buffer.
//!
//! Macros are written `$<KEY>` and replaced with the mapped value. A purely
//! numeric macro such as `$<18>` pads the value of the next macro on the line
//! with trailing spaces out to that width:
//!
//! ```text
//! gslc_tsElemRef*  $<18>$<ELEMREF>= NULL;
//! gslc_tsElemRef*  m_pElemCnt        = NULL;
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CodeGenError, Result};
use crate::template::Template;

/// Macro name to substitution text, built fresh per emission.
pub type MacroMap = BTreeMap<String, String>;

static MACRO_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$<(.+?)>").expect("macro pattern is valid"));

/// Column at which enum lists wrap.
const CLIP_LINE: usize = 72;

/// Append-only generated source. The generator is its only writer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    lines: Vec<String>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Serialized form, one `\n` after every line.
    pub fn to_source(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
    }
}

/// Expands every macro of `template` against `map`.
///
/// A macro absent from `map` is an error naming the template and macro.
/// Output is one line per template line unless a value contains newlines.
pub fn expand_macros(template: &Template, map: &MacroMap) -> Result<Vec<String>> {
    let mut output = Vec::with_capacity(template.lines().len());

    for (index, line) in template.lines().iter().enumerate() {
        let mut expanded = String::with_capacity(line.len());
        let mut last = 0;
        let mut padding = 0usize;

        for caps in MACRO_PATTERN.captures_iter(line) {
            let whole = caps.get(0).expect("group 0 always matches");
            let key = &caps[1];
            expanded.push_str(&line[last..whole.start()]);
            last = whole.end();

            if key.bytes().all(|b| b.is_ascii_digit()) {
                padding = key.parse().map_err(|_| {
                    CodeGenError::malformed(
                        index + 1,
                        format!("padding $<{key}> in {} is out of range", template.name()),
                    )
                })?;
                continue;
            }

            let value = map
                .get(key)
                .ok_or_else(|| CodeGenError::UnresolvedMacro {
                    template: template.name().to_string(),
                    name: key.to_string(),
                    widget: None,
                })?;
            expanded.push_str(value);
            let width = value.chars().count();
            if padding > width {
                expanded.extend(std::iter::repeat_n(' ', padding - width));
            }
            padding = 0;
        }
        expanded.push_str(&line[last..]);

        if expanded.contains('\n') {
            output.extend(expanded.split('\n').map(str::to_string));
        } else {
            output.push(expanded);
        }
    }

    Ok(output)
}

/// Appends `lines` to the buffer verbatim and in order.
pub fn code_writer<I, S>(buffer: &mut OutputBuffer, lines: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for line in lines {
        buffer.push(line.into());
    }
}

/// Writes `enum {A,B,...};`, wrapping before column 72.
pub fn code_writer_enums<S: AsRef<str>>(buffer: &mut OutputBuffer, enums: &[S]) {
    let mut iter = enums.iter().map(AsRef::as_ref);
    let Some(first) = iter.next() else {
        return;
    };

    let mut line = format!("enum {{{first}");
    for name in iter {
        if line.len() + name.len() + 1 < CLIP_LINE {
            line.push(',');
            line.push_str(name);
        } else {
            buffer.push(std::mem::replace(&mut line, format!("      ,{name}")));
        }
    }
    line.push_str("};");
    buffer.push(line);
}
