//! Project description consumed by the generator.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::widget::{Color, WidgetModel};

/// Build target; picks the skeleton, the file extension and UTF8 handling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    #[default]
    Arduino,
    Linux,
}

impl Target {
    pub const fn display_name(&self) -> &'static str {
        match self {
            Target::Arduino => "Arduino",
            Target::Linux => "Linux",
        }
    }

    pub const fn extension(&self) -> &'static str {
        match self {
            Target::Arduino => "ino",
            Target::Linux => "c",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    #[default]
    Page,
    /// Elements on a base page are drawn beneath every other page.
    BasePage,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Key such as `Page$1`.
    pub key: String,
    #[serde(rename = "enum")]
    pub enum_name: String,
    #[serde(default)]
    pub kind: PageKind,
    #[serde(default)]
    pub widgets: Vec<WidgetModel>,
}

impl Page {
    pub fn new(key: &str, enum_name: &str) -> Self {
        Self {
            key: key.into(),
            enum_name: enum_name.into(),
            kind: PageKind::Page,
            widgets: Vec::new(),
        }
    }

    pub fn is_base(&self) -> bool {
        self.kind == PageKind::BasePage
    }

    pub fn flash_count(&self) -> usize {
        self.widgets
            .iter()
            .filter(|w| w.use_flash())
            .count()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub target: Target,
    #[serde(default = "default_background")]
    pub background: Color,
    /// Longest string read back from a listbox in generated callbacks.
    #[serde(default = "default_max_str")]
    pub max_str: u32,
    pub pages: Vec<Page>,
}

fn default_background() -> Color {
    Color::BLACK
}

fn default_max_str() -> u32 {
    100
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: "guislice".to_string(),
            target: Target::default(),
            background: default_background(),
            max_str: default_max_str(),
            pages: vec![Page::new("Page$1", "E_PG_MAIN")],
        }
    }
}

impl Project {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let project = serde_json::from_str::<Project>(&json)?;
        log::debug!(
            "loaded project {} with {} pages from {}",
            project.name,
            project.pages.len(),
            path.display()
        );
        Ok(project)
    }

    pub fn widgets(&self) -> impl Iterator<Item = &WidgetModel> {
        self.pages.iter().flat_map(|p| p.widgets.iter())
    }

    pub fn base_page(&self) -> Option<&Page> {
        self.pages.iter().find(|p| p.is_base())
    }

    /// First page that is not a base page.
    pub fn main_page(&self) -> Option<&Page> {
        self.pages.iter().find(|p| !p.is_base())
    }

    /// Output file name for the target, e.g. `demo.ino`.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.target.extension())
    }
}
