//! Whole-project generation: builds every tagged section and splices them
//! into the skeleton source.

use std::fs;
use std::path::{Path, PathBuf};

use crate::codegen::callbacks::{Callback, CallbackKind, Case, splice_callbacks};
use crate::codegen::emitter::{EmitContext, process};
use crate::codegen::tags::{
    ELEMENT_TAG, ENUM_TAG, EXTRA_ELEMENT_TAG, FILE_TAG, FONTS_TAG, INCLUDES_TAG, INITGUI_TAG,
    LOAD_FONTS_TAG, RESOURCES_TAG, SAVEREF_TAG, Section, splice,
};
use crate::error::Result;
use crate::expand::{MacroMap, OutputBuffer, code_writer, code_writer_enums, expand_macros};
use crate::project::{Page, Project, Target};
use crate::template::TemplateStore;
use crate::widget::{
    FontCatalog, FontInfo, GROUP_ID_NONE, ImageMemory, ImageRef, PageAction, Scrollbar,
    WidgetKind, WidgetModel, WidgetType,
};

pub const ARDUINO_SKELETON: &str = include_str!("../../templates/ino.t");
pub const LINUX_SKELETON: &str = include_str!("../../templates/c.t");

const AUTO_ID: &str = "GSLC_ID_AUTO";
const FONT_ENUM_COMMENT: &str =
    "// Must use separate enum for fonts with MAX_FONT at end to use gslc_FontSet.";

/// Skeleton used when there is no previous output to update.
pub fn bundled_skeleton(target: Target) -> &'static str {
    match target {
        Target::Arduino => ARDUINO_SKELETON,
        Target::Linux => LINUX_SKELETON,
    }
}

/// `E_PG_MAIN` -> `PG_MAIN`.
pub fn convert_enum(name: &str) -> &str {
    name.strip_prefix("E_").unwrap_or(name)
}

/// `Page$1` -> `Page1`.
pub fn convert_key(key: &str) -> String {
    key.replace('$', "")
}

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Written into the file header.
    pub version: String,
    /// Header date; the current local time when unset.
    pub date: Option<String>,
    /// Skeleton for a first run. The bundled one for the target when unset.
    pub skeleton: Option<PathBuf>,
    /// Copy an existing output file to `<file>.bak` before replacing it.
    pub backup: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            date: None,
            skeleton: None,
            backup: true,
        }
    }
}

pub struct CodeGenerator<'a> {
    project: &'a Project,
    store: &'a TemplateStore,
    fonts: &'a FontCatalog,
    config: GeneratorConfig,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(
        project: &'a Project,
        store: &'a TemplateStore,
        fonts: &'a FontCatalog,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            project,
            store,
            fonts,
            config,
        }
    }

    fn context(&self) -> EmitContext<'a> {
        EmitContext {
            target: self.project.target,
            fonts: self.fonts,
        }
    }

    fn write_template(&self, buffer: &mut OutputBuffer, name: &str, map: &MacroMap) -> Result<()> {
        let template = self.store.load_template(name)?;
        code_writer(buffer, expand_macros(template, map)?);
        Ok(())
    }

    fn write_plain(&self, buffer: &mut OutputBuffer, name: &str) -> Result<()> {
        code_writer(buffer, self.store.load_template(name)?.lines());
        Ok(())
    }

    /// Fonts named by any widget, resolved through the catalog and ordered
    /// by enum.
    fn used_fonts(&self) -> Vec<&'a FontInfo> {
        let fonts = self.fonts;
        let mut used: Vec<&FontInfo> = self
            .project
            .widgets()
            .filter_map(WidgetModel::font_display_name)
            .map(|name| fonts.resolve(name))
            .collect();
        used.sort_by(|a, b| a.enum_name.cmp(&b.enum_name));
        used.dedup_by(|a, b| a.enum_name == b.enum_name);
        used
    }

    fn scrollbars(&self) -> Vec<Scrollbar> {
        self.project
            .widgets()
            .filter_map(WidgetModel::scrollbar)
            .collect()
    }

    /// Every generated section, in pipeline order.
    pub fn sections(&self) -> Result<Vec<Section>> {
        Ok(vec![
            Section::new(FILE_TAG, self.file_section()?),
            Section::new(INCLUDES_TAG, self.includes_section()?),
            Section::new(FONTS_TAG, self.fonts_section()?),
            Section::new(RESOURCES_TAG, self.resources_section()?),
            Section::new(ENUM_TAG, self.enum_section()),
            Section::new(ELEMENT_TAG, self.element_section()?),
            Section::new(EXTRA_ELEMENT_TAG, self.extra_element_section()?),
            Section::new(SAVEREF_TAG, self.save_ref_section()?),
            Section::new(INITGUI_TAG, self.init_gui_section()?),
            Section::new(LOAD_FONTS_TAG, self.load_fonts_section()?),
        ])
    }

    /// Callback functions and their cases, in skeleton order.
    pub fn callbacks(&self) -> Result<Vec<Callback>> {
        CallbackKind::ALL
            .into_iter()
            .map(|kind| self.callback(kind))
            .collect()
    }

    fn callback(&self, kind: CallbackKind) -> Result<Callback> {
        let mut used = false;
        let mut cases: Vec<Case> = Vec::new();

        for widget in self.project.widgets().filter(|w| uses_callback(kind, w)) {
            used = true;
            let Some((enum_name, template, map)) = callback_case(kind, widget) else {
                continue;
            };
            if enum_name == AUTO_ID || cases.iter().any(|c| c.enum_name == enum_name) {
                continue;
            }
            let lines = expand_macros(self.store.load_template(template)?, &map)
                .map_err(|e| e.for_widget(&widget.key))?;
            cases.push(Case { enum_name, lines });
        }

        let function = if used {
            let body: Vec<&str> = cases
                .iter()
                .flat_map(|c| c.lines.iter().map(String::as_str))
                .collect();
            let map = MacroMap::from([("CALLBACK".to_string(), body.join("\n"))]);
            Some(expand_macros(self.store.load_template(kind.template())?, &map)?)
        } else {
            None
        };

        Ok(Callback {
            kind,
            function,
            cases,
        })
    }

    fn file_section(&self) -> Result<OutputBuffer> {
        let date = match &self.config.date {
            Some(date) => date.clone(),
            None => chrono::Local::now().format("%m/%d/%Y %H:%M:%S").to_string(),
        };
        let map = MacroMap::from([
            ("FILENAME".to_string(), self.project.file_name()),
            ("VERSION".to_string(), self.config.version.clone()),
            ("DATE".to_string(), date),
        ]);
        let mut buffer = OutputBuffer::new();
        self.write_template(&mut buffer, "<FILE_HDR>", &map)?;
        Ok(buffer)
    }

    fn includes_section(&self) -> Result<OutputBuffer> {
        let mut buffer = OutputBuffer::new();

        let mut headers: Vec<&str> = self.project.widgets().flat_map(element_headers).collect();
        headers.sort_unstable();
        headers.dedup();
        if !headers.is_empty() {
            self.write_plain(&mut buffer, "<ELEM_COMMENT>")?;
        }
        for header in headers {
            let map = MacroMap::from([("WIDGET".to_string(), header.to_string())]);
            self.write_template(&mut buffer, "<ELEM_INCLUDE>", &map)?;
        }

        let compound = self
            .project
            .widgets()
            .any(|w| w.widget_type() == WidgetType::Spinner);
        let sd = self
            .project
            .widgets()
            .flat_map(WidgetModel::images)
            .any(|img| img.uses_define() && img.memory == ImageMemory::Sd);
        if compound || sd {
            self.write_plain(&mut buffer, "<WARNING_CONFIG>")?;
        }
        if compound {
            self.write_plain(&mut buffer, "<WARNING_COMPOUND>")?;
        }
        if sd {
            self.write_plain(&mut buffer, "<WARNING_SD>")?;
        }

        Ok(buffer)
    }

    fn fonts_section(&self) -> Result<OutputBuffer> {
        let mut buffer = OutputBuffer::new();
        let fonts = self.used_fonts();
        let target = self.project.target;

        if target == Target::Arduino && fonts.iter().any(|f| f.include_file.is_some()) {
            self.write_plain(&mut buffer, "<FONT_ADAFRUIT>")?;
        }
        for font in fonts {
            match (&font.include_file, &font.define_file, target) {
                (Some(include), _, _) => {
                    let map = MacroMap::from([("INCLUDE_FILE".to_string(), include.clone())]);
                    self.write_template(&mut buffer, "<FONT_INCLUDE>", &map)?;
                }
                (None, Some(file), Target::Linux) => {
                    let map = MacroMap::from([
                        ("FONT_REF".to_string(), font.font_ref.clone()),
                        ("DEFINE_FILE".to_string(), file.clone()),
                    ]);
                    self.write_template(&mut buffer, "<FONT_DEFINE>", &map)?;
                }
                _ => {}
            }
        }

        Ok(buffer)
    }

    fn resources_section(&self) -> Result<OutputBuffer> {
        let mut buffer = OutputBuffer::new();
        let images: Vec<&ImageRef> = self.project.widgets().flat_map(WidgetModel::images).collect();

        let mut defines: Vec<(&str, &str)> = images
            .iter()
            .filter(|img| img.uses_define())
            .map(|img| (img.define.as_str(), img.file.as_str()))
            .collect();
        defines.sort_unstable();
        defines.dedup_by(|a, b| a.0 == b.0);
        for (define, file) in defines {
            let map = MacroMap::from([
                ("DEFINE".to_string(), define.to_string()),
                ("IMAGE_NAME".to_string(), file.to_string()),
            ]);
            self.write_template(&mut buffer, "<RESOURCE_DEFINE>", &map)?;
        }

        let mut externs: Vec<(&str, ImageMemory)> = images
            .iter()
            .filter(|img| !img.extern_name.is_empty())
            .map(|img| (img.extern_name.as_str(), img.memory))
            .collect();
        externs.sort_by(|a, b| a.0.cmp(b.0));
        externs.dedup_by(|a, b| a.0 == b.0);
        for (name, memory) in externs {
            let template = match memory {
                ImageMemory::Prog => "<RESOURCE_PROGMEM>",
                _ => "<RESOURCE_EXTERN>",
            };
            let map = MacroMap::from([("EXTERN_NAME".to_string(), name.to_string())]);
            self.write_template(&mut buffer, template, &map)?;
        }

        Ok(buffer)
    }

    fn enum_section(&self) -> OutputBuffer {
        let mut buffer = OutputBuffer::new();

        let pages: Vec<&str> = self
            .project
            .pages
            .iter()
            .map(|p| p.enum_name.as_str())
            .collect();
        code_writer_enums(&mut buffer, &pages);

        let scrollbars = self.scrollbars();
        let mut widgets: Vec<&str> = self
            .project
            .widgets()
            .map(|w| w.enum_name.as_str())
            .filter(|e| *e != AUTO_ID)
            .chain(scrollbars.iter().map(|s| s.enum_name.as_str()))
            .collect();
        widgets.sort_unstable();
        widgets.dedup();
        code_writer_enums(&mut buffer, &widgets);

        let mut groups: Vec<&str> = self
            .project
            .widgets()
            .map(WidgetModel::group_id)
            .filter(|g| *g != GROUP_ID_NONE)
            .collect();
        groups.sort_unstable();
        groups.dedup();
        code_writer_enums(&mut buffer, &groups);

        let mut fonts: Vec<&str> = self
            .used_fonts()
            .into_iter()
            .map(|f| f.enum_name.as_str())
            .collect();
        fonts.push("MAX_FONT");
        code_writer(&mut buffer, [FONT_ENUM_COMMENT]);
        code_writer_enums(&mut buffer, &fonts);

        buffer
    }

    fn element_section(&self) -> Result<OutputBuffer> {
        let mut buffer = OutputBuffer::new();

        let map = MacroMap::from([
            ("NAME".to_string(), "MAX_PAGE".to_string()),
            ("COUNT".to_string(), self.project.pages.len().to_string()),
        ]);
        self.write_template(&mut buffer, "<MAX_PAGE>", &map)?;

        let mut first_flash = true;
        for page in &self.project.pages {
            let flash_count = page.flash_count();
            if flash_count > 0 && first_flash {
                self.write_plain(&mut buffer, "<PROGMEM>")?;
                first_flash = false;
            }

            let map = MacroMap::from([
                ("STRIP_ENUM".to_string(), convert_enum(&page.enum_name).to_string()),
                ("COUNT".to_string(), page.widgets.len().to_string()),
                ("FLASH".to_string(), flash_count.to_string()),
            ]);
            self.write_template(&mut buffer, "<DEFINE_ELEM_PAGE>", &map)?;
            let ram = if flash_count > 0 {
                "<DEFINE_ELEM_RAM_P>"
            } else {
                "<DEFINE_ELEM_RAM>"
            };
            self.write_template(&mut buffer, ram, &map)?;
        }

        Ok(buffer)
    }

    fn extra_element_section(&self) -> Result<OutputBuffer> {
        let mut buffer = OutputBuffer::new();

        for page in &self.project.pages {
            self.write_template(&mut buffer, "<GUI_ELEMENT>", &page_map(page))?;
        }

        // Flash widgets keep their state in PROGMEM and need no storage here.
        let storage = self
            .project
            .widgets()
            .filter(|w| !w.use_flash())
            .flat_map(extended_storage);
        code_writer(&mut buffer, storage);

        let map = MacroMap::from([("COUNT".to_string(), self.project.max_str.to_string())]);
        self.write_template(&mut buffer, "<MAX_STR>", &map)?;

        Ok(buffer)
    }

    fn save_ref_section(&self) -> Result<OutputBuffer> {
        let mut buffer = OutputBuffer::new();

        let scrollbars = self.scrollbars();
        let mut refs: Vec<&str> = self
            .project
            .widgets()
            .map(WidgetModel::element_ref)
            .chain(scrollbars.iter().map(|s| s.element_ref.as_str()))
            .filter(|r| !r.is_empty())
            .collect();
        refs.sort_unstable();
        refs.dedup();

        for elem_ref in refs {
            let map = MacroMap::from([("ELEMREF".to_string(), elem_ref.to_string())]);
            self.write_template(&mut buffer, "<ELEMENT_REF_SAVE>", &map)?;
        }

        Ok(buffer)
    }

    fn init_gui_section(&self) -> Result<OutputBuffer> {
        let mut buffer = OutputBuffer::new();
        let pages = &self.project.pages;

        let base_first = pages
            .iter()
            .filter(|p| p.is_base())
            .chain(pages.iter().filter(|p| !p.is_base()));
        for page in base_first {
            self.write_template(&mut buffer, "<PAGEADD>", &page_map(page))?;
        }

        if let Some(base) = self.project.base_page() {
            self.write_template(&mut buffer, "<PAGEBASE>", &page_map(base))?;
        }
        if let Some(main) = self.project.main_page() {
            self.write_template(&mut buffer, "<PAGECUR>", &page_map(main))?;
        }

        let map = MacroMap::from([(
            "BACKGROUND_COLOR".to_string(),
            self.project.background.as_gslc(),
        )]);
        self.write_template(&mut buffer, "<BACKGROUND>", &map)?;

        let ctx = self.context();
        for page in pages {
            log::debug!(
                "page {} ({} widgets)",
                page.enum_name,
                page.widgets.len()
            );
            self.write_template(&mut buffer, "<PAGECOMMENT>", &page_map(page))?;
            for widget in &page.widgets {
                process(&ctx, self.store, &mut buffer, &page.enum_name, widget)?;
            }
        }

        Ok(buffer)
    }

    fn load_fonts_section(&self) -> Result<OutputBuffer> {
        let mut buffer = OutputBuffer::new();
        for font in self.used_fonts() {
            let map = MacroMap::from([
                ("FONT_ID".to_string(), font.enum_name.clone()),
                ("FONT_REFTYPE".to_string(), font.ref_type.clone()),
                ("FONT_REF".to_string(), font.font_ref.clone()),
                ("FONT_SZ".to_string(), font.size.to_string()),
            ]);
            self.write_template(&mut buffer, "<FONT_LOAD>", &map)?;
        }
        Ok(buffer)
    }

    /// Generated source for `skeleton`. `skeleton_path` only labels errors.
    pub fn render(&self, skeleton_path: &Path, skeleton: &str) -> Result<String> {
        let sections = self.sections()?;
        let callbacks = self.callbacks()?;
        let source = splice(skeleton_path, skeleton, &sections)?;
        splice_callbacks(skeleton_path, &source, &callbacks)
    }

    /// Source as it would be written to `out_dir`, without touching disk.
    pub fn preview(&self, out_dir: &Path) -> Result<String> {
        let (skeleton_path, skeleton) = self.load_skeleton(&self.output_path(out_dir))?;
        self.render(&skeleton_path, &skeleton)
    }

    pub fn output_path(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(self.project.file_name())
    }

    fn load_skeleton(&self, output: &Path) -> Result<(PathBuf, String)> {
        if output.exists() {
            return Ok((output.to_path_buf(), fs::read_to_string(output)?));
        }
        if let Some(path) = &self.config.skeleton {
            return Ok((path.clone(), fs::read_to_string(path)?));
        }
        let label = PathBuf::from(format!("<bundled {} skeleton>", self.project.target.display_name()));
        Ok((label, bundled_skeleton(self.project.target).to_string()))
    }

    /// Generates the project source into `out_dir` and returns its path.
    ///
    /// The file is only touched once every section has been produced.
    pub fn generate(&self, out_dir: &Path) -> Result<PathBuf> {
        let output = self.output_path(out_dir);
        let (skeleton_path, skeleton) = self.load_skeleton(&output)?;
        let source = self.render(&skeleton_path, &skeleton)?;

        if output.exists() && self.config.backup {
            let backup = backup_path(&output);
            fs::copy(&output, &backup)?;
            log::info!("backed up {} to {}", output.display(), backup.display());
        }
        fs::write(&output, source)?;
        log::info!("generated {}", output.display());

        Ok(output)
    }
}

fn page_map(page: &Page) -> MacroMap {
    MacroMap::from([
        ("PAGE_ENUM".to_string(), page.enum_name.clone()),
        ("STRIP_KEY".to_string(), convert_key(&page.key)),
        ("STRIP_ENUM".to_string(), convert_enum(&page.enum_name).to_string()),
    ])
}

/// Declarations of a RAM widget's extended state.
fn extended_storage(w: &WidgetModel) -> Vec<String> {
    let n = w.key_count();
    let decl = |ty: &str, name: String| format!("{ty:<32}{name};");
    let mut lines = match &w.kind {
        WidgetKind::CheckBox(_) => vec![decl("gslc_tsXCheckbox", format!("m_asXCheck{n}"))],
        WidgetKind::RadioButton(_) => vec![decl("gslc_tsXCheckbox", format!("m_asXRadio{n}"))],
        WidgetKind::ToggleButton(_) => vec![decl("gslc_tsXTogglebtn", format!("m_asXToggle{n}"))],
        WidgetKind::ProgressBar(_) => vec![decl("gslc_tsXProgress", format!("m_sXBarGauge{n}"))],
        WidgetKind::Slider(_) => vec![decl("gslc_tsXSlider", format!("m_sXSlider{n}"))],
        WidgetKind::Spinner(_) => vec![decl("gslc_tsXSpinner", format!("m_sXSpinner{n}"))],
        WidgetKind::RingGauge(_) => vec![decl("gslc_tsXRingGauge", format!("m_sXRingGauge{n}"))],
        WidgetKind::ImgButton(p) if p.toggle => {
            vec![decl("gslc_tsXToggleImgbtn", format!("m_sToggleImg{n}"))]
        }
        WidgetKind::ListBox(p) => vec![
            decl("gslc_tsXListbox", format!("m_sListbox{n}")),
            "// - Note that XLISTBOX_BUF_OH_R is extra required per item".to_string(),
            decl(
                "char",
                format!("m_acListboxBuf{n}[{} + XLISTBOX_BUF_OH_R]", p.storage_size()),
            ),
        ],
        WidgetKind::TextBox(p) => vec![
            decl("gslc_tsXTextbox", format!("m_sTextbox{n}")),
            format!(
                "{:<32}m_acTextboxBuf{n}[{}]; // NRows={} NCols={}",
                "char",
                p.rows.saturating_mul(p.cols),
                p.rows,
                p.cols
            ),
        ],
        _ => Vec::new(),
    };
    if w.scrollbar().is_some() {
        let prefix = match w.widget_type() {
            WidgetType::ListBox => "m_sListScroll",
            _ => "m_sTextScroll",
        };
        lines.push(decl("gslc_tsXSlider", format!("{prefix}{n}")));
    }
    lines
}

/// `elem/*.h` headers a widget's create calls are declared in.
fn element_headers(w: &WidgetModel) -> Vec<&'static str> {
    let mut headers = match w.widget_type() {
        WidgetType::CheckBox | WidgetType::RadioButton => vec!["XCheckbox"],
        WidgetType::ToggleButton => vec!["XTogglebtn"],
        WidgetType::ProgressBar => vec!["XProgress"],
        WidgetType::Slider => vec!["XSlider"],
        WidgetType::ListBox => vec!["XListbox"],
        WidgetType::Spinner => vec!["XSpinner"],
        WidgetType::TextBox => vec!["XTextbox"],
        WidgetType::RingGauge => vec!["XRingGauge"],
        WidgetType::ImgButton if w.is_toggle() => vec!["XToggleImgbtn"],
        _ => Vec::new(),
    };
    if w.scrollbar().is_some() {
        headers.push("XSlider");
    }
    headers
}

/// The widget's create calls refer to the `kind` callback.
fn uses_callback(kind: CallbackKind, w: &WidgetModel) -> bool {
    let ty = w.widget_type();
    match kind {
        CallbackKind::Button => {
            matches!(
                ty,
                WidgetType::TextButton | WidgetType::ImgButton | WidgetType::ToggleButton
            ) || w.is_touch_en()
        }
        CallbackKind::Checkbox => w.is_callback_en(),
        CallbackKind::Listbox => ty == WidgetType::ListBox,
        CallbackKind::Spinner => ty == WidgetType::Spinner,
        CallbackKind::Draw => w.has_draw_func(),
        CallbackKind::Slider => ty == WidgetType::Slider || w.scrollbar().is_some(),
        CallbackKind::Tick => w.has_tick_func(),
    }
}

/// Enum, case template and macros for a widget's `case` in the `kind`
/// callback. Draw and tick callbacks have no cases.
fn callback_case(kind: CallbackKind, w: &WidgetModel) -> Option<(String, &'static str, MacroMap)> {
    let mut enum_name = w.enum_name.clone();
    let mut map = MacroMap::new();
    let template = match kind {
        CallbackKind::Button => match w.page_action() {
            PageAction::Jump(page) => {
                map.insert("COM-000".to_string(), page.to_string());
                "<BUTTON_CB_CHGPAGE>"
            }
            PageAction::ShowPopup(page) => {
                map.insert("COM-000".to_string(), page.to_string());
                "<BUTTON_CB_SHOWPOPUP>"
            }
            PageAction::HidePopup => "<BUTTON_CB_HIDEPOPUP>",
            PageAction::None => "<BUTTON_CB_CASE>",
        },
        CallbackKind::Checkbox => "<CHECKBOX_CB_CASE>",
        CallbackKind::Listbox => "<LISTBOX_CB_CASE>",
        CallbackKind::Spinner => {
            map.insert("XDATA".to_string(), format!("m_sXSpinner{}", w.key_count()));
            "<SPINNER_CB_CASE>"
        }
        CallbackKind::Slider => {
            if let Some(bar) = w.scrollbar() {
                enum_name = bar.enum_name;
            }
            "<SLIDER_CB_CASE>"
        }
        CallbackKind::Draw | CallbackKind::Tick => return None,
    };
    map.insert("COM-002".to_string(), enum_name.clone());
    Some((enum_name, template, map))
}

fn backup_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodeGenError;
    use crate::project::PageKind;
    use crate::widget::{StorageMode, WidgetKind};

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            version: "0.1.0".into(),
            date: Some("01/02/2026 03:04:05".into()),
            ..Default::default()
        }
    }

    fn demo_project() -> Project {
        let mut base = Page::new("Page$2", "E_PG_BASE");
        base.kind = PageKind::BasePage;

        let mut main = Page::new("Page$1", "E_PG_MAIN");
        let mut text = WidgetModel::new(WidgetType::Text, "Text$1", "E_ELEM_TEXT1");
        if let WidgetKind::Text(p) = &mut text.kind {
            p.text = "Hello".into();
            p.font = "FreeSans9pt7b".into();
        }
        text.element_ref = "m_pElemText1".into();
        let mut bar = WidgetModel::new(WidgetType::ProgressBar, "ProgressBar$2", "E_ELEM_PROGRESS2");
        bar.storage = StorageMode::Flash;
        bar.element_ref = "m_pElemBar2".into();
        let mut toggle = WidgetModel::new(WidgetType::ToggleButton, "Toggle$3", "E_ELEM_TOGGLE3");
        if let WidgetKind::ToggleButton(p) = &mut toggle.kind {
            p.group_id = "GRP_MODE".into();
        }
        let auto = WidgetModel::new(WidgetType::Box, "Box$4", AUTO_ID);
        main.widgets = vec![text, bar, toggle, auto];

        Project {
            name: "demo".into(),
            target: Target::Arduino,
            background: crate::widget::Color::BLACK,
            max_str: 100,
            pages: vec![main, base],
        }
    }

    fn section<'s>(sections: &'s [Section], name: &str) -> &'s [String] {
        sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.buffer.lines())
            .unwrap()
    }

    fn generator_sections(project: &Project) -> Vec<Section> {
        let store = TemplateStore::builtin().unwrap();
        let fonts = FontCatalog::builtin();
        CodeGenerator::new(project, &store, &fonts, config())
            .sections()
            .unwrap()
    }

    #[test]
    fn test_convert_helpers() {
        assert_eq!(convert_enum("E_PG_MAIN"), "PG_MAIN");
        assert_eq!(convert_enum("PG_MAIN"), "PG_MAIN");
        assert_eq!(convert_key("Page$1"), "Page1");
    }

    #[test]
    fn test_file_header() {
        let sections = generator_sections(&demo_project());
        let lines = section(&sections, FILE_TAG);
        assert!(lines.contains(&"// FILE: demo.ino".to_string()));
        assert!(lines.iter().any(|l| l.contains("0.1.0 on 01/02/2026 03:04:05")));
    }

    #[test]
    fn test_enum_section() {
        let sections = generator_sections(&demo_project());
        assert_eq!(
            section(&sections, ENUM_TAG),
            [
                "enum {E_PG_MAIN,E_PG_BASE};",
                "enum {E_ELEM_PROGRESS2,E_ELEM_TEXT1,E_ELEM_TOGGLE3};",
                "enum {GRP_MODE};",
                FONT_ENUM_COMMENT,
                "enum {E_FREESANS9,MAX_FONT};",
            ]
        );
    }

    #[test]
    fn test_element_defines() {
        let sections = generator_sections(&demo_project());
        assert_eq!(
            section(&sections, ELEMENT_TAG),
            [
                "#define MAX_PAGE 2",
                "// Define the maximum number of elements and pages",
                "// - Elements in GSLC_ELEM_RAM_P pages are stored in FLASH (PROGMEM)",
                "#define MAX_ELEM_PG_MAIN 4 // # Elems total on page",
                "#define MAX_ELEM_PG_MAIN_RAM (MAX_ELEM_PG_MAIN - 1) // # Elems in RAM",
                "#define MAX_ELEM_PG_BASE 0 // # Elems total on page",
                "#define MAX_ELEM_PG_BASE_RAM MAX_ELEM_PG_BASE // # Elems in RAM",
            ]
        );
    }

    #[test]
    fn test_extra_elements_skip_flash_widgets() {
        let sections = generator_sections(&demo_project());
        let lines = section(&sections, EXTRA_ELEMENT_TAG);
        assert!(lines[0].ends_with("m_asPage1Elem[MAX_ELEM_PG_MAIN_RAM];"));
        assert!(lines[3].ends_with("m_asPage2ElemRef[MAX_ELEM_PG_BASE];"));
        assert_eq!(
            &lines[4..],
            [
                format!("{:<32}m_asXToggle3;", "gslc_tsXTogglebtn"),
                String::new(),
                "#define MAX_STR                 100".to_string(),
            ]
        );
    }

    #[test]
    fn test_saved_references_sorted_and_padded() {
        let sections = generator_sections(&demo_project());
        assert_eq!(
            section(&sections, SAVEREF_TAG),
            [
                format!("gslc_tsElemRef* {:<32}= NULL;", "m_pElemBar2"),
                format!("gslc_tsElemRef* {:<32}= NULL;", "m_pElemText1"),
            ]
        );
    }

    #[test]
    fn test_init_gui_order() {
        let sections = generator_sections(&demo_project());
        let lines = section(&sections, INITGUI_TAG);
        let pos = |needle: &str| {
            lines
                .iter()
                .position(|l| l.contains(needle))
                .unwrap_or_else(|| panic!("{needle} not found"))
        };

        assert!(lines[0].starts_with("  gslc_PageAdd(&m_gui,E_PG_BASE,m_asPage2Elem,"));
        assert!(lines[1].starts_with("  gslc_PageAdd(&m_gui,E_PG_MAIN,m_asPage1Elem,"));
        assert!(pos("gslc_SetPageBase(&m_gui, E_PG_BASE);") < pos("gslc_SetPageCur(&m_gui,E_PG_MAIN);"));
        assert!(pos("gslc_SetPageCur") < pos("gslc_SetBkgndColor(&m_gui,GSLC_COL_BLACK);"));
        assert!(pos("// PAGE: E_PG_MAIN") < pos("gslc_ElemCreateTxt("));
        assert!(pos("gslc_ElemCreateTxt(") < pos("gslc_ElemXProgressCreate_P("));
        assert!(pos("gslc_ElemXProgressCreate_P(") < pos("gslc_ElemXTogglebtnCreate("));
        assert!(pos("gslc_ElemXTogglebtnCreate(") < pos("// PAGE: E_PG_BASE"));
        assert!(lines.iter().all(|l| !l.contains("$<")));
    }

    #[test]
    fn test_generate_first_run_uses_bundled_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        let project = demo_project();
        let store = TemplateStore::builtin().unwrap();
        let fonts = FontCatalog::builtin();
        let generator = CodeGenerator::new(&project, &store, &fonts, config());

        let path = generator.generate(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("demo.ino"));
        let source = fs::read_to_string(&path).unwrap();
        assert!(source.contains("void setup()"));
        assert!(source.contains("//<InitGUI !Start!>\n  gslc_PageAdd(&m_gui,E_PG_BASE,"));
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn test_regenerate_preserves_user_code_and_backs_up() {
        let dir = tempfile::tempdir().unwrap();
        let mut project = demo_project();
        let store = TemplateStore::builtin().unwrap();
        let fonts = FontCatalog::builtin();

        let path = CodeGenerator::new(&project, &store, &fonts, config())
            .generate(dir.path())
            .unwrap();
        let edited = fs::read_to_string(&path)
            .unwrap()
            .replace("void loop()\n{\n", "void loop()\n{\n  my_user_code();\n");
        fs::write(&path, &edited).unwrap();

        project.pages[0].widgets.pop();
        project.pages[0].widgets.pop();
        CodeGenerator::new(&project, &store, &fonts, config())
            .generate(dir.path())
            .unwrap();

        let source = fs::read_to_string(&path).unwrap();
        assert!(source.contains("  my_user_code();\n"));
        assert!(!source.contains("gslc_ElemXTogglebtnCreate("));
        assert!(source.contains("bool CbBtnCommon("));
        assert!(!source.contains("case E_ELEM_TOGGLE3:"));
        assert!(source.contains("#define MAX_ELEM_PG_MAIN 2 "));
        assert_eq!(fs::read_to_string(backup_path(&path)).unwrap(), edited);
    }

    #[test]
    fn test_linux_target_uses_c_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        let mut project = demo_project();
        project.target = Target::Linux;
        let store = TemplateStore::builtin().unwrap();
        let fonts = FontCatalog::builtin();
        let generator = CodeGenerator::new(&project, &store, &fonts, config());

        let source = generator.preview(dir.path()).unwrap();
        assert!(source.contains("int main( int argc, char* args[] )"));
        assert!(!generator.output_path(dir.path()).exists());
    }

    #[test]
    fn test_corrupted_output_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let project = demo_project();
        let store = TemplateStore::builtin().unwrap();
        let fonts = FontCatalog::builtin();
        let generator = CodeGenerator::new(&project, &store, &fonts, config());

        let path = generator.output_path(dir.path());
        fs::write(&path, "//<File !Start!>\n//<File !End!>\n").unwrap();
        let err = generator.generate(dir.path()).unwrap_err();
        assert!(matches!(err, CodeGenError::MissingTag { .. }));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "//<File !Start!>\n//<File !End!>\n"
        );
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn test_failed_widget_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        let project = demo_project();
        let store = TemplateStore::parse("<FILE_HDR>\n// $<FILENAME>\n<STOP>\n").unwrap();
        let fonts = FontCatalog::builtin();
        let generator = CodeGenerator::new(&project, &store, &fonts, config());

        assert!(generator.generate(dir.path()).is_err());
        assert!(!generator.output_path(dir.path()).exists());
    }

    fn render_bundled(project: &Project) -> String {
        let store = TemplateStore::builtin().unwrap();
        let fonts = FontCatalog::builtin();
        CodeGenerator::new(project, &store, &fonts, config())
            .render(Path::new("skeleton"), bundled_skeleton(project.target))
            .unwrap()
    }

    /// One widget of every kind on one page; widget `n` is `W$n` / `E_ELEM_n`.
    fn every_kind_project() -> Project {
        let mut page = Page::new("Page$1", "E_PG_MAIN");
        for (i, ty) in WidgetType::ALL.into_iter().enumerate() {
            let n = i + 1;
            let mut w = WidgetModel::new(ty, &format!("W${n}"), &format!("E_ELEM_{n}"));
            match &mut w.kind {
                WidgetKind::Box(p) => {
                    p.touch_en = true;
                    p.draw_func = true;
                    p.tick_func = true;
                }
                WidgetKind::CheckBox(p) => p.callback_en = true,
                WidgetKind::Image(p) => {
                    p.image.define = "IMG_LOGO".into();
                    p.image.file = "logo.bmp".into();
                }
                WidgetKind::ImgButton(p) => {
                    p.toggle = true;
                    p.image.extern_name = "img_on".into();
                    p.image.memory = ImageMemory::Prog;
                }
                WidgetKind::ListBox(p) => p.items = vec!["One".into(), "Two".into()],
                WidgetKind::Spinner(p) => p.font = "FreeMono9pt7b".into(),
                _ => {}
            }
            page.widgets.push(w);
        }
        Project {
            name: "all".into(),
            pages: vec![page],
            ..Project::default()
        }
    }

    fn text_button(key: &str, enum_name: &str, jump_page: &str) -> WidgetModel {
        let mut w = WidgetModel::new(WidgetType::TextButton, key, enum_name);
        if let WidgetKind::TextButton(p) = &mut w.kind {
            p.jump_page = jump_page.into();
        }
        w
    }

    #[test]
    fn test_every_referenced_callback_is_defined() {
        let src = render_bundled(&every_kind_project());
        assert!(src.contains("bool CbBtnCommon("));

        let refs = regex::Regex::new(r"&(Cb\w+)").unwrap();
        let mut names: Vec<&str> = refs
            .captures_iter(&src)
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(
            names,
            [
                "CbBtnCommon",
                "CbCheckbox",
                "CbDrawScanner",
                "CbListbox",
                "CbSlidePos",
                "CbSpinner",
                "CbTickScanner",
            ]
        );
        for name in names {
            assert_eq!(src.matches(&format!("bool {name}(")).count(), 1, "{name}");
        }
    }

    #[test]
    fn test_callback_cases_per_element() {
        let src = render_bundled(&every_kind_project());
        for case in [
            "case E_ELEM_1:",
            "case E_ELEM_3:",
            "case E_ELEM_4:",
            "case E_ELEM_8:",
            "case E_ELEM_12:",
            "case E_LISTSCROLL12:",
            "case E_TXTSCROLL14:",
        ] {
            assert!(src.contains(case), "{case}");
        }
        assert!(src.contains("nVal = gslc_ElemXSpinnerGetCounter(pGui, &m_sXSpinner13);"));
        // Radio buttons without a state callback get no case.
        assert!(!src.contains("case E_ELEM_5:"));
    }

    #[test]
    fn test_unused_callbacks_are_not_emitted() {
        let mut project = demo_project();
        project.pages[0]
            .widgets
            .retain(|w| w.widget_type() != WidgetType::ToggleButton);
        let src = render_bundled(&project);
        assert!(!src.contains("CbBtnCommon"));
        assert!(src.contains("//<Button Callback !Start!>\n//<Button Callback !End!>\n"));
        assert!(src.contains("//<Tick Callback !Start!>\n//<Tick Callback !End!>\n"));
    }

    #[test]
    fn test_button_cases_follow_page_action() {
        let mut project = demo_project();
        project.pages[0]
            .widgets
            .push(text_button("Button$5", "E_ELEM_BTN5", "E_PG_BASE"));
        let src = render_bundled(&project);
        assert!(src.contains(
            "      case E_ELEM_BTN5:\n        gslc_SetPageCur(&m_gui, E_PG_BASE);\n        break;\n"
        ));
        assert!(src.contains("      case E_ELEM_TOGGLE3:\n        break;\n"));
    }

    #[test]
    fn test_regenerate_keeps_user_case_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut project = demo_project();
        let store = TemplateStore::builtin().unwrap();
        let fonts = FontCatalog::builtin();

        let path = CodeGenerator::new(&project, &store, &fonts, config())
            .generate(dir.path())
            .unwrap();
        let edited = fs::read_to_string(&path).unwrap().replace(
            "      case E_ELEM_TOGGLE3:\n",
            "      case E_ELEM_TOGGLE3:\n        toggle_mode();\n",
        );
        fs::write(&path, &edited).unwrap();

        project.pages[0]
            .widgets
            .push(text_button("Button$5", "E_ELEM_BTN5", ""));
        CodeGenerator::new(&project, &store, &fonts, config())
            .generate(dir.path())
            .unwrap();

        let source = fs::read_to_string(&path).unwrap();
        assert!(source.contains("      case E_ELEM_TOGGLE3:\n        toggle_mode();\n        break;\n"));
        assert!(source.contains("      case E_ELEM_BTN5:\n        break;\n"));
        assert_eq!(source.matches("bool CbBtnCommon(").count(), 1);
    }

    #[test]
    fn test_includes_section() {
        let sections = generator_sections(&demo_project());
        assert_eq!(
            section(&sections, INCLUDES_TAG),
            [
                "// Include extended elements",
                "#include \"elem/XProgress.h\"",
                "#include \"elem/XTogglebtn.h\"",
            ]
        );
    }

    #[test]
    fn test_arduino_fonts_included_and_loaded() {
        let sections = generator_sections(&demo_project());
        assert_eq!(
            section(&sections, FONTS_TAG),
            [
                "// Note that these files are located within the Adafruit-GFX library folder:",
                "#include <Adafruit_GFX.h>",
                "#include \"Fonts/FreeSans9pt7b.h\"",
            ]
        );
        assert_eq!(
            section(&sections, LOAD_FONTS_TAG),
            ["  if (!gslc_FontSet(&m_gui,E_FREESANS9,GSLC_FONTREF_PTR,&FreeSans9pt7b,1)) { return false; }"]
        );
    }

    #[test]
    fn test_linux_font_file_defined_and_loaded() {
        let mut project = demo_project();
        project.target = Target::Linux;
        if let WidgetKind::Text(p) = &mut project.pages[0].widgets[0].kind {
            p.font = "DejaVuSans12".into();
        }
        let sections = generator_sections(&project);
        assert_eq!(
            section(&sections, FONTS_TAG),
            ["#define FONT_DEJAVUSANS \"/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf\""]
        );
        assert_eq!(
            section(&sections, LOAD_FONTS_TAG),
            ["  if (!gslc_FontSet(&m_gui,E_DEJAVUSANS12,GSLC_FONTREF_FNAME,FONT_DEJAVUSANS,12)) { return false; }"]
        );
    }

    #[test]
    fn test_extended_element_sections() {
        let sections = generator_sections(&every_kind_project());

        let includes = section(&sections, INCLUDES_TAG);
        assert_eq!(includes.iter().filter(|l| l.contains("elem/XSlider.h")).count(), 1);
        for header in ["XListbox", "XSpinner", "XTextbox", "XRingGauge", "XToggleImgbtn"] {
            assert!(includes.contains(&format!("#include \"elem/{header}.h\"")), "{header}");
        }
        assert!(includes.contains(&"#if !(GSLC_FEATURE_COMPOUND)".to_string()));
        assert!(includes.contains(&"#if !(GSLC_SD_EN)".to_string()));

        assert_eq!(
            section(&sections, RESOURCES_TAG),
            [
                "#define IMG_LOGO \"logo.bmp\"",
                "extern const unsigned short img_on[] PROGMEM;",
            ]
        );

        let enums = section(&sections, ENUM_TAG).join("\n");
        assert!(enums.contains("E_LISTSCROLL12"));
        assert!(enums.contains("E_TXTSCROLL14"));

        let refs = section(&sections, SAVEREF_TAG);
        assert!(refs.contains(&format!("gslc_tsElemRef* {:<32}= NULL;", "m_pListSlider12")));
        assert!(refs.contains(&format!("gslc_tsElemRef* {:<32}= NULL;", "m_pTextSlider14")));

        let storage = section(&sections, EXTRA_ELEMENT_TAG);
        for line in [
            format!("{:<32}m_sListbox12;", "gslc_tsXListbox"),
            "// - Note that XLISTBOX_BUF_OH_R is extra required per item".to_string(),
            format!("{:<32}m_acListboxBuf12[8 + XLISTBOX_BUF_OH_R];", "char"),
            format!("{:<32}m_sListScroll12;", "gslc_tsXSlider"),
            format!("{:<32}m_acTextboxBuf14[168]; // NRows=6 NCols=28", "char"),
            format!("{:<32}m_sTextScroll14;", "gslc_tsXSlider"),
            format!("{:<32}m_sXSpinner13;", "gslc_tsXSpinner"),
            format!("{:<32}m_sXRingGauge15;", "gslc_tsXRingGauge"),
            format!("{:<32}m_sToggleImg10;", "gslc_tsXToggleImgbtn"),
        ] {
            assert!(storage.contains(&line), "{line}");
        }
        assert_eq!(storage.last().unwrap(), "#define MAX_STR                 100");
    }
}
