//! Tagged regions of a skeleton source file.
//!
//! A region looks like
//!
//! ```text
//! //<InitGUI !Start!>
//! ...regenerated lines...
//! //<InitGUI !End!>
//! ```
//!
//! Tags may be indented; everything between them is replaced on each run.

use std::path::Path;

use crate::error::{CodeGenError, Result};
use crate::expand::OutputBuffer;

pub const FILE_TAG: &str = "File";
pub const ENUM_TAG: &str = "Enum";
pub const ELEMENT_TAG: &str = "ElementDefines";
pub const EXTRA_ELEMENT_TAG: &str = "GUI_Extra_Elements";
pub const SAVEREF_TAG: &str = "Save_References";
pub const INITGUI_TAG: &str = "InitGUI";
pub const INCLUDES_TAG: &str = "Includes";
pub const FONTS_TAG: &str = "Fonts";
pub const RESOURCES_TAG: &str = "Resources";
pub const LOAD_FONTS_TAG: &str = "Load_Fonts";

pub fn start_tag(name: &str) -> String {
    format!("//<{name} !Start!>")
}

pub fn end_tag(name: &str) -> String {
    format!("//<{name} !End!>")
}

/// Generated lines for one tagged region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub name: &'static str,
    pub buffer: OutputBuffer,
}

impl Section {
    pub fn new(name: &'static str, buffer: OutputBuffer) -> Self {
        Self { name, buffer }
    }
}

/// Replaces each section's region in `skeleton`.
///
/// `path` only labels errors. Every section must find both of its tags.
pub fn splice(path: &Path, skeleton: &str, sections: &[Section]) -> Result<String> {
    let missing = |tag: String| CodeGenError::MissingTag {
        path: path.to_path_buf(),
        tag,
    };

    let mut out = String::with_capacity(skeleton.len());
    let mut found = vec![false; sections.len()];
    let mut lines = skeleton.lines();

    while let Some(line) = lines.next() {
        push_line(&mut out, line);

        let trimmed = line.trim_start();
        let Some(idx) = sections
            .iter()
            .position(|s| trimmed == start_tag(s.name))
        else {
            continue;
        };

        let section = &sections[idx];
        found[idx] = true;
        for generated in section.buffer.lines() {
            push_line(&mut out, generated);
        }

        let end = end_tag(section.name);
        let end_line = lines
            .by_ref()
            .find(|l| l.trim_start() == end)
            .ok_or_else(|| missing(end.clone()))?;
        push_line(&mut out, end_line);
    }

    if let Some(idx) = found.iter().position(|f| !f) {
        return Err(missing(start_tag(sections[idx].name)));
    }

    Ok(out)
}

pub(crate) fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::code_writer;

    fn section(name: &'static str, lines: &[&str]) -> Section {
        let mut buffer = OutputBuffer::new();
        code_writer(&mut buffer, lines.iter().copied());
        Section::new(name, buffer)
    }

    #[test]
    fn test_replaces_region_and_keeps_user_code() {
        let skeleton = "\
void InitGUI()
{
  //<InitGUI !Start!>
  old_generated();
  //<InitGUI !End!>
  user_code();
}
";
        let out = splice(
            Path::new("demo.ino"),
            skeleton,
            &[section(INITGUI_TAG, &["  new_generated();"])],
        )
        .unwrap();
        assert_eq!(
            out,
            "\
void InitGUI()
{
  //<InitGUI !Start!>
  new_generated();
  //<InitGUI !End!>
  user_code();
}
"
        );
    }

    #[test]
    fn test_missing_start_tag() {
        let err = splice(
            Path::new("demo.ino"),
            "//<Enum !Start!>\n//<Enum !End!>\n",
            &[section(ENUM_TAG, &[]), section(SAVEREF_TAG, &[])],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CodeGenError::MissingTag { tag, .. } if tag == "//<Save_References !Start!>"
        ));
    }

    #[test]
    fn test_missing_end_tag() {
        let err = splice(
            Path::new("demo.ino"),
            "//<Enum !Start!>\nenum {A};\n",
            &[section(ENUM_TAG, &["enum {B};"])],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CodeGenError::MissingTag { tag, .. } if tag == "//<Enum !End!>"
        ));
    }

    #[test]
    fn test_bundled_skeletons_have_every_tag() {
        let tags = [
            FILE_TAG,
            INCLUDES_TAG,
            FONTS_TAG,
            RESOURCES_TAG,
            ENUM_TAG,
            ELEMENT_TAG,
            EXTRA_ELEMENT_TAG,
            SAVEREF_TAG,
            INITGUI_TAG,
            LOAD_FONTS_TAG,
        ];
        for skeleton in [
            include_str!("../../templates/ino.t"),
            include_str!("../../templates/c.t"),
        ] {
            let sections: Vec<_> = tags.into_iter().map(|t| section(t, &[])).collect();
            assert!(splice(Path::new("skeleton"), skeleton, &sections).is_ok());
        }
    }
}
