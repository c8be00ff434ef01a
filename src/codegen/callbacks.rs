//! Callback functions shared by every element of one kind.
//!
//! A fresh skeleton carries an empty `//<Button Callback !Start!>` region.
//! The first run that needs the callback replaces that whole region with the
//! function, which holds its own `//<Button Enums !Start!>` region of `case`
//! blocks. From then on only the enums region is touched: cases of elements
//! that still exist keep whatever the user wrote inside them, cases of
//! deleted elements are dropped through their `break`, and new elements get
//! a fresh case appended.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::codegen::tags::{end_tag, push_line, start_tag};
use crate::error::{CodeGenError, Result};

static BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bbreak\b").expect("static regex is valid"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackKind {
    Button,
    Checkbox,
    Listbox,
    Spinner,
    Draw,
    Slider,
    Tick,
}

impl CallbackKind {
    /// Skeleton order.
    pub const ALL: [Self; 7] = [
        Self::Button,
        Self::Checkbox,
        Self::Listbox,
        Self::Spinner,
        Self::Draw,
        Self::Slider,
        Self::Tick,
    ];

    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Button => "Button Callback",
            Self::Checkbox => "Checkbox Callback",
            Self::Listbox => "Listbox Callback",
            Self::Spinner => "Spinner Callback",
            Self::Draw => "Draw Callback",
            Self::Slider => "Slider Callback",
            Self::Tick => "Tick Callback",
        }
    }

    /// Region of `case` blocks inside the function. Draw and tick
    /// callbacks are shared by all boxes and have no switch.
    pub const fn enums_tag(&self) -> Option<&'static str> {
        match self {
            Self::Button => Some("Button Enums"),
            Self::Checkbox => Some("Checkbox Enums"),
            Self::Listbox => Some("Listbox Enums"),
            Self::Spinner => Some("Spinner Enums"),
            Self::Slider => Some("Slider Enums"),
            Self::Draw | Self::Tick => None,
        }
    }

    pub const fn template(&self) -> &'static str {
        match self {
            Self::Button => "<BUTTON_CB>",
            Self::Checkbox => "<CHECKBOX_CB>",
            Self::Listbox => "<LISTBOX_CB>",
            Self::Spinner => "<SPINNER_CB>",
            Self::Draw => "<DRAWBOX_CB>",
            Self::Slider => "<SLIDER_CB>",
            Self::Tick => "<TICK_CB>",
        }
    }
}

/// One `case` of a callback switch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Case {
    pub enum_name: String,
    pub lines: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Callback {
    pub kind: CallbackKind,
    /// Expanded function; `None` when no element refers to it.
    pub function: Option<Vec<String>>,
    pub cases: Vec<Case>,
}

/// Applies every callback to `source` in turn. `path` only labels errors.
pub fn splice_callbacks(path: &Path, source: &str, callbacks: &[Callback]) -> Result<String> {
    let mut out = source.to_string();
    for callback in callbacks {
        out = splice_callback(path, &out, callback)?;
    }
    Ok(out)
}

fn splice_callback(path: &Path, source: &str, callback: &Callback) -> Result<String> {
    let missing = |tag: String| CodeGenError::MissingTag {
        path: path.to_path_buf(),
        tag,
    };

    let start = start_tag(callback.kind.tag());
    let end = end_tag(callback.kind.tag());
    let enums_start = callback.kind.enums_tag().map(start_tag);
    let enums_end = callback.kind.enums_tag().map(end_tag);

    let mut out = String::with_capacity(source.len());
    let mut found = false;
    let mut lines = source.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();

        if trimmed == start {
            found = true;
            let Some(function) = &callback.function else {
                push_line(&mut out, line);
                continue;
            };
            lines
                .by_ref()
                .find(|l| l.trim_start() == end)
                .ok_or_else(|| missing(end.clone()))?;
            for generated in function {
                push_line(&mut out, generated);
            }
            continue;
        }

        if let (Some(enums_start), Some(enums_end)) = (&enums_start, &enums_end) {
            if trimmed != enums_start {
                push_line(&mut out, line);
                continue;
            }
            found = true;
            push_line(&mut out, line);
            let mut region = Vec::new();
            let end_line = loop {
                match lines.next() {
                    Some(l) if l.trim_start() == enums_end => break l,
                    Some(l) => region.push(l),
                    None => return Err(missing(enums_end.clone())),
                }
            };
            for merged in merge_cases(&region, &callback.cases) {
                push_line(&mut out, &merged);
            }
            push_line(&mut out, end_line);
            continue;
        }

        push_line(&mut out, line);
    }

    // A draw or tick region is gone once its function has been written.
    if !found && enums_start.is_some() {
        return Err(missing(start));
    }
    Ok(out)
}

/// Enum named by a `case NAME:` line.
fn case_enum(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("case")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let name = rest
        .trim_start()
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .next()?;
    (!name.is_empty()).then_some(name)
}

/// Existing `region` lines with stale cases removed and `cases` that are
/// not yet present appended.
pub fn merge_cases(region: &[&str], cases: &[Case]) -> Vec<String> {
    let mut out = Vec::with_capacity(region.len());
    let mut present: HashSet<&str> = HashSet::new();
    let mut dropping = false;

    for line in region {
        if dropping {
            dropping = !BREAK.is_match(line);
            continue;
        }
        if let Some(name) = case_enum(line) {
            if cases.iter().any(|c| c.enum_name == name) {
                present.insert(name);
            } else {
                log::debug!("dropping callback case {name}");
                dropping = !BREAK.is_match(line);
                continue;
            }
        }
        out.push((*line).to_string());
    }

    for case in cases.iter().filter(|c| !present.contains(c.enum_name.as_str())) {
        out.extend(case.lines.iter().cloned());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(name: &str) -> Case {
        Case {
            enum_name: name.into(),
            lines: vec![format!("      case {name}:"), "        break;".into()],
        }
    }

    fn button(function: bool, cases: &[&str]) -> Callback {
        let cases: Vec<Case> = cases.iter().map(|c| case(c)).collect();
        let function = function.then(|| {
            let mut lines = vec![
                "bool CbBtnCommon(void* pvGui)".to_string(),
                "{".into(),
                "//<Button Enums !Start!>".into(),
            ];
            lines.extend(cases.iter().flat_map(|c| c.lines.clone()));
            lines.push("//<Button Enums !End!>".into());
            lines.push("}".into());
            lines
        });
        Callback {
            kind: CallbackKind::Button,
            function,
            cases,
        }
    }

    const SKELETON: &str = "\
// Callback Methods
//<Button Callback !Start!>
//<Button Callback !End!>
void setup() {}
";

    #[test]
    fn test_first_run_writes_function() {
        let out = splice_callbacks(
            Path::new("demo.ino"),
            SKELETON,
            &[button(true, &["E_BTN1"])],
        )
        .unwrap();
        assert_eq!(
            out,
            "\
// Callback Methods
bool CbBtnCommon(void* pvGui)
{
//<Button Enums !Start!>
      case E_BTN1:
        break;
//<Button Enums !End!>
}
void setup() {}
"
        );
    }

    #[test]
    fn test_unused_callback_keeps_its_tags() {
        let out = splice_callbacks(Path::new("demo.ino"), SKELETON, &[button(false, &[])]).unwrap();
        assert_eq!(out, SKELETON);
    }

    #[test]
    fn test_regenerate_merges_cases() {
        let previous = "\
bool CbBtnCommon(void* pvGui)
{
  switch (nId) {
//<Button Enums !Start!>
      case E_BTN1:
        user_code_one();
        break;
      case E_GONE:
        user_code_gone();
        break;
//<Button Enums !End!>
  }
}
";
        let out = splice_callbacks(
            Path::new("demo.ino"),
            previous,
            &[button(true, &["E_BTN1", "E_BTN3"])],
        )
        .unwrap();
        assert_eq!(
            out,
            "\
bool CbBtnCommon(void* pvGui)
{
  switch (nId) {
//<Button Enums !Start!>
      case E_BTN1:
        user_code_one();
        break;
      case E_BTN3:
        break;
//<Button Enums !End!>
  }
}
"
        );
    }

    #[test]
    fn test_case_names_need_whole_words() {
        assert_eq!(case_enum("      case E_BTN1:"), Some("E_BTN1"));
        assert_eq!(case_enum("case E_X: break;"), Some("E_X"));
        assert_eq!(case_enum("  caseless = 1;"), None);
        assert_eq!(case_enum("  // case notes"), None);
    }

    #[test]
    fn test_one_line_case_dropped_alone() {
        let region = ["    case E_OLD: break;", "    case E_KEEP:", "      break;"];
        let merged = merge_cases(&region, &[case("E_KEEP")]);
        assert_eq!(merged, ["    case E_KEEP:", "      break;"]);
    }

    #[test]
    fn test_missing_callback_tag() {
        let err = splice_callbacks(
            Path::new("demo.ino"),
            "void setup() {}\n",
            &[button(false, &[])],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CodeGenError::MissingTag { tag, .. } if tag == "//<Button Callback !Start!>"
        ));
    }

    #[test]
    fn test_replaced_draw_callback_needs_no_tag() {
        let draw = Callback {
            kind: CallbackKind::Draw,
            function: Some(vec!["bool CbDrawScanner() { return true; }".into()]),
            cases: Vec::new(),
        };
        let source = "bool CbDrawScanner() { return true; }\n";
        let out = splice_callbacks(Path::new("demo.ino"), source, &[draw]).unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn test_unterminated_callback_region() {
        let err = splice_callbacks(
            Path::new("demo.ino"),
            "//<Button Callback !Start!>\n",
            &[button(true, &[])],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CodeGenError::MissingTag { tag, .. } if tag == "//<Button Callback !End!>"
        ));
    }

    #[test]
    fn test_bundled_skeletons_have_every_callback_tag() {
        let unused: Vec<Callback> = CallbackKind::ALL
            .into_iter()
            .map(|kind| Callback {
                kind,
                function: None,
                cases: Vec::new(),
            })
            .collect();
        for skeleton in [
            include_str!("../../templates/ino.t"),
            include_str!("../../templates/c.t"),
        ] {
            for kind in CallbackKind::ALL {
                assert!(skeleton.contains(&start_tag(kind.tag())), "{kind:?}");
                assert!(skeleton.contains(&end_tag(kind.tag())), "{kind:?}");
            }
            assert!(splice_callbacks(Path::new("skeleton"), skeleton, &unused).is_ok());
        }
    }
}
