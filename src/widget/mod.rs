//! Widget models: one placed element with a kind-specific payload.

mod color;
mod extended;
mod font;

pub use color::Color;
pub use extended::{
    ImageMemory, ImageProps, ImageRef, ImgButtonProps, LineProps, ListBoxProps, RingGaugeProps,
    ScrollbarProps, SpinnerProps, TextBoxProps,
};
pub use font::{FontCatalog, FontInfo, FontKind};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::expand::MacroMap;

/// Group id meaning "not in any group".
pub const GROUP_ID_NONE: &str = "GSLC_GROUP_ID_NONE";

pub const ALIGN_LEFT: &str = "GSLC_ALIGN_MID_LEFT";
pub const ALIGN_CENTER: &str = "GSLC_ALIGN_MID_MID";

/// Where the element definition lives on the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    #[default]
    Ram,
    /// Constant data kept in program memory (PROGMEM), `_P` API calls.
    Flash,
}

/// Kind tag without payload, used for emitter dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetType {
    Box,
    Text,
    TextButton,
    CheckBox,
    RadioButton,
    ToggleButton,
    ProgressBar,
    Slider,
    Image,
    ImgButton,
    Line,
    ListBox,
    Spinner,
    TextBox,
    RingGauge,
}

impl WidgetType {
    pub const ALL: [Self; 15] = [
        Self::Box,
        Self::Text,
        Self::TextButton,
        Self::CheckBox,
        Self::RadioButton,
        Self::ToggleButton,
        Self::ProgressBar,
        Self::Slider,
        Self::Image,
        Self::ImgButton,
        Self::Line,
        Self::ListBox,
        Self::Spinner,
        Self::TextBox,
        Self::RingGauge,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Box => "Box",
            Self::Text => "Text",
            Self::TextButton => "TextButton",
            Self::CheckBox => "CheckBox",
            Self::RadioButton => "RadioButton",
            Self::ToggleButton => "ToggleButton",
            Self::ProgressBar => "ProgressBar",
            Self::Slider => "Slider",
            Self::Image => "Image",
            Self::ImgButton => "ImgButton",
            Self::Line => "Line",
            Self::ListBox => "ListBox",
            Self::Spinner => "Spinner",
            Self::TextBox => "TextBox",
            Self::RingGauge => "RingGauge",
        }
    }

    /// GUIslice has a `_P` (PROGMEM) create call for this kind.
    pub const fn supports_flash(&self) -> bool {
        matches!(
            self,
            Self::Box
                | Self::Text
                | Self::TextButton
                | Self::CheckBox
                | Self::RadioButton
                | Self::ToggleButton
                | Self::ProgressBar
                | Self::Slider
        )
    }

    /// Size given to a freshly placed widget of this kind.
    pub const fn default_size(&self) -> (u32, u32) {
        match self {
            Self::Box => (300, 150),
            Self::Text => (60, 10),
            Self::TextButton => (80, 40),
            Self::CheckBox | Self::RadioButton => (20, 20),
            Self::ToggleButton => (35, 20),
            Self::ProgressBar => (50, 12),
            Self::Slider => (80, 20),
            Self::Image => (100, 100),
            Self::ImgButton => (40, 40),
            Self::Line => (50, 1),
            Self::ListBox => (200, 100),
            Self::Spinner => (68, 20),
            Self::TextBox => (203, 68),
            Self::RingGauge => (100, 100),
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetModel {
    /// Unique key such as `Box$3`; the digits after `$` are the key count.
    pub key: String,
    #[serde(rename = "enum")]
    pub enum_name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub element_ref: String,
    #[serde(default)]
    pub storage: StorageMode,
    pub kind: WidgetKind,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "props")]
pub enum WidgetKind {
    Box(BoxProps),
    Text(TextProps),
    TextButton(TextButtonProps),
    CheckBox(CheckBoxProps),
    RadioButton(RadioButtonProps),
    ToggleButton(ToggleButtonProps),
    ProgressBar(ProgressBarProps),
    Slider(SliderProps),
    Image(ImageProps),
    ImgButton(ImgButtonProps),
    Line(LineProps),
    ListBox(ListBoxProps),
    Spinner(SpinnerProps),
    TextBox(TextBoxProps),
    RingGauge(RingGaugeProps),
}

impl WidgetKind {
    pub const fn widget_type(&self) -> WidgetType {
        match self {
            Self::Box(_) => WidgetType::Box,
            Self::Text(_) => WidgetType::Text,
            Self::TextButton(_) => WidgetType::TextButton,
            Self::CheckBox(_) => WidgetType::CheckBox,
            Self::RadioButton(_) => WidgetType::RadioButton,
            Self::ToggleButton(_) => WidgetType::ToggleButton,
            Self::ProgressBar(_) => WidgetType::ProgressBar,
            Self::Slider(_) => WidgetType::Slider,
            Self::Image(_) => WidgetType::Image,
            Self::ImgButton(_) => WidgetType::ImgButton,
            Self::Line(_) => WidgetType::Line,
            Self::ListBox(_) => WidgetType::ListBox,
            Self::Spinner(_) => WidgetType::Spinner,
            Self::TextBox(_) => WidgetType::TextBox,
            Self::RingGauge(_) => WidgetType::RingGauge,
        }
    }

    /// Default payload for a widget of type `ty`.
    pub fn default_for(ty: WidgetType) -> Self {
        match ty {
            WidgetType::Box => Self::Box(BoxProps::default()),
            WidgetType::Text => Self::Text(TextProps::default()),
            WidgetType::TextButton => Self::TextButton(TextButtonProps::default()),
            WidgetType::CheckBox => Self::CheckBox(CheckBoxProps::default()),
            WidgetType::RadioButton => Self::RadioButton(RadioButtonProps::default()),
            WidgetType::ToggleButton => Self::ToggleButton(ToggleButtonProps::default()),
            WidgetType::ProgressBar => Self::ProgressBar(ProgressBarProps::default()),
            WidgetType::Slider => Self::Slider(SliderProps::default()),
            WidgetType::Image => Self::Image(ImageProps::default()),
            WidgetType::ImgButton => Self::ImgButton(ImgButtonProps::default()),
            WidgetType::Line => Self::Line(LineProps::default()),
            WidgetType::ListBox => Self::ListBox(ListBoxProps::default()),
            WidgetType::Spinner => Self::Spinner(SpinnerProps::default()),
            WidgetType::TextBox => Self::TextBox(TextBoxProps::default()),
            WidgetType::RingGauge => Self::RingGauge(RingGaugeProps::default()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxProps {
    pub rounded: bool,
    pub touch_en: bool,
    pub draw_func: bool,
    pub tick_func: bool,
    pub frame_en: bool,
    pub default_colors: bool,
    pub frame_color: Color,
    pub fill_color: Color,
    pub selected_color: Color,
}

impl BoxProps {
    pub const DEF_FRAME_COLOR: Color = Color::GRAY;
    pub const DEF_FILL_COLOR: Color = Color::BLACK;
    pub const DEF_SELECTED_COLOR: Color = Color::BLACK;
}

impl Default for BoxProps {
    fn default() -> Self {
        Self {
            rounded: false,
            touch_en: false,
            draw_func: false,
            tick_func: false,
            frame_en: true,
            default_colors: true,
            frame_color: Self::DEF_FRAME_COLOR,
            fill_color: Self::DEF_FILL_COLOR,
            selected_color: Self::DEF_SELECTED_COLOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextProps {
    pub font: String,
    pub text: String,
    pub utf8: bool,
    /// Size of the external buffer for runtime-updated text; 0 for none.
    pub text_storage: u32,
    /// `text` is a C expression (such as a string macro), emitted unquoted.
    pub string_en: bool,
    pub align: String,
    pub text_margin: u32,
    pub fill_en: bool,
    pub frame_en: bool,
    pub text_color: Color,
    pub frame_color: Color,
    pub fill_color: Color,
    pub selected_color: Color,
}

impl TextProps {
    pub const DEF_TEXT_COLOR: Color = Color::YELLOW;
    pub const DEF_FRAME_COLOR: Color = Color::GRAY;
    pub const DEF_FILL_COLOR: Color = Color::BLACK;
    pub const DEF_SELECTED_COLOR: Color = Color::BLACK;
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            font: "BuiltIn(1x)".into(),
            text: String::new(),
            utf8: false,
            text_storage: 0,
            string_en: false,
            align: ALIGN_LEFT.into(),
            text_margin: 0,
            fill_en: true,
            frame_en: false,
            text_color: Self::DEF_TEXT_COLOR,
            frame_color: Self::DEF_FRAME_COLOR,
            fill_color: Self::DEF_FILL_COLOR,
            selected_color: Self::DEF_SELECTED_COLOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextButtonProps {
    pub font: String,
    pub text: String,
    pub utf8: bool,
    pub rounded: bool,
    pub fill_en: bool,
    pub frame_en: bool,
    pub text_storage: u32,
    pub align: String,
    pub text_margin: u32,
    pub jump_page: String,
    pub popup_page: String,
    pub popup_hide: bool,
    pub text_color: Color,
    pub frame_color: Color,
    pub fill_color: Color,
    pub selected_color: Color,
}

impl TextButtonProps {
    pub const DEF_TEXT_COLOR: Color = Color::WHITE;
    pub const DEF_FRAME_COLOR: Color = Color::BLUE_DK2;
    pub const DEF_FILL_COLOR: Color = Color::BLUE_DK4;
    pub const DEF_SELECTED_COLOR: Color = Color::BLUE_DK1;
}

impl Default for TextButtonProps {
    fn default() -> Self {
        Self {
            font: "BuiltIn(1x)".into(),
            text: String::new(),
            utf8: false,
            rounded: false,
            fill_en: true,
            frame_en: false,
            text_storage: 0,
            align: ALIGN_CENTER.into(),
            text_margin: 0,
            jump_page: String::new(),
            popup_page: String::new(),
            popup_hide: false,
            text_color: Self::DEF_TEXT_COLOR,
            frame_color: Self::DEF_FRAME_COLOR,
            fill_color: Self::DEF_FILL_COLOR,
            selected_color: Self::DEF_SELECTED_COLOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckBoxProps {
    pub checked: bool,
    pub callback_en: bool,
    pub mark_color: Color,
    pub frame_color: Color,
    pub fill_color: Color,
    pub selected_color: Color,
}

impl CheckBoxProps {
    pub const DEF_FRAME_COLOR: Color = Color::GRAY;
    pub const DEF_FILL_COLOR: Color = Color::BLACK;
    pub const DEF_SELECTED_COLOR: Color = Color::BLACK;
}

impl Default for CheckBoxProps {
    fn default() -> Self {
        Self {
            checked: false,
            callback_en: false,
            mark_color: Color::ORANGE,
            frame_color: Self::DEF_FRAME_COLOR,
            fill_color: Self::DEF_FILL_COLOR,
            selected_color: Self::DEF_SELECTED_COLOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioButtonProps {
    pub checked: bool,
    pub style: String,
    pub group_id: String,
    pub callback_en: bool,
    pub mark_color: Color,
    pub frame_color: Color,
    pub fill_color: Color,
    pub selected_color: Color,
}

impl RadioButtonProps {
    pub const DEF_FRAME_COLOR: Color = Color::GRAY;
    pub const DEF_FILL_COLOR: Color = Color::BLACK;
    pub const DEF_SELECTED_COLOR: Color = Color::BLACK;
}

impl Default for RadioButtonProps {
    fn default() -> Self {
        Self {
            checked: false,
            style: "GSLCX_CHECKBOX_STYLE_ROUND".into(),
            group_id: GROUP_ID_NONE.into(),
            callback_en: false,
            mark_color: Color::ORANGE,
            frame_color: Self::DEF_FRAME_COLOR,
            fill_color: Self::DEF_FILL_COLOR,
            selected_color: Self::DEF_SELECTED_COLOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleButtonProps {
    pub checked: bool,
    pub circular: bool,
    pub frame_en: bool,
    pub group_id: String,
    pub thumb_color: Color,
    pub on_color: Color,
    pub off_color: Color,
    pub frame_color: Color,
}

impl Default for ToggleButtonProps {
    fn default() -> Self {
        Self {
            checked: false,
            circular: true,
            frame_en: true,
            group_id: GROUP_ID_NONE.into(),
            thumb_color: Color::GRAY,
            on_color: Color::BLUE_DK1,
            off_color: Color::GRAY_LT3,
            frame_color: Color::GRAY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressBarProps {
    pub vertical: bool,
    pub min: i32,
    pub max: i32,
    pub value: i32,
    pub gauge_color: Color,
    pub frame_color: Color,
    pub fill_color: Color,
    pub selected_color: Color,
}

impl ProgressBarProps {
    pub const DEF_FRAME_COLOR: Color = Color::GRAY;
    pub const DEF_FILL_COLOR: Color = Color::BLACK;
    pub const DEF_SELECTED_COLOR: Color = Color::BLACK;
}

impl Default for ProgressBarProps {
    fn default() -> Self {
        Self {
            vertical: false,
            min: 0,
            max: 100,
            value: 0,
            gauge_color: Color::GREEN,
            frame_color: Self::DEF_FRAME_COLOR,
            fill_color: Self::DEF_FILL_COLOR,
            selected_color: Self::DEF_SELECTED_COLOR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderProps {
    pub min: i32,
    pub max: i32,
    pub value: i32,
    pub thumb_size: u32,
    pub vertical: bool,
    pub divisions: u32,
    pub tick_size: u32,
    pub trim: bool,
    pub tick_color: Color,
    pub trim_color: Color,
    pub frame_color: Color,
    pub fill_color: Color,
    pub selected_color: Color,
}

impl SliderProps {
    pub const DEF_FRAME_COLOR: Color = Color::GRAY;
    pub const DEF_FILL_COLOR: Color = Color::BLACK;
    pub const DEF_SELECTED_COLOR: Color = Color::BLACK;
}

impl Default for SliderProps {
    fn default() -> Self {
        Self {
            min: 0,
            max: 100,
            value: 0,
            thumb_size: 5,
            vertical: false,
            divisions: 10,
            tick_size: 5,
            trim: false,
            tick_color: Color::BLUE,
            trim_color: Color::BLUE,
            frame_color: Self::DEF_FRAME_COLOR,
            fill_color: Self::DEF_FILL_COLOR,
            selected_color: Self::DEF_SELECTED_COLOR,
        }
    }
}

/// What a button does on release, in the order buttons are checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageAction<'a> {
    Jump(&'a str),
    ShowPopup(&'a str),
    HidePopup,
    None,
}

impl<'a> PageAction<'a> {
    fn of(jump_page: &'a str, popup_page: &'a str, popup_hide: bool) -> Self {
        if !jump_page.is_empty() {
            Self::Jump(jump_page)
        } else if !popup_page.is_empty() {
            Self::ShowPopup(popup_page)
        } else if popup_hide {
            Self::HidePopup
        } else {
            Self::None
        }
    }
}

/// Names of the slider a listbox or textbox scrolls with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scrollbar {
    pub enum_name: String,
    pub element_ref: String,
}

impl WidgetModel {
    /// A widget of type `ty` with default size and properties.
    pub fn new(ty: WidgetType, key: &str, enum_name: &str) -> Self {
        let (width, height) = ty.default_size();
        Self {
            key: key.into(),
            enum_name: enum_name.into(),
            x: 0,
            y: 0,
            width,
            height,
            element_ref: String::new(),
            storage: StorageMode::Ram,
            kind: WidgetKind::default_for(ty),
        }
    }

    pub const fn widget_type(&self) -> WidgetType {
        self.kind.widget_type()
    }

    /// Flash storage was asked for and the kind has a `_P` API.
    pub fn use_flash(&self) -> bool {
        self.storage == StorageMode::Flash && self.widget_type().supports_flash()
    }

    /// Digits after the `$` in the key, or the whole key when there is none.
    pub fn key_count(&self) -> &str {
        self.key
            .split_once('$')
            .map_or(self.key.as_str(), |(_, count)| count)
    }

    pub fn has_draw_func(&self) -> bool {
        matches!(&self.kind, WidgetKind::Box(p) if p.draw_func)
    }

    pub fn has_tick_func(&self) -> bool {
        matches!(&self.kind, WidgetKind::Box(p) if p.tick_func)
    }

    pub fn is_rounded_en(&self) -> bool {
        match &self.kind {
            WidgetKind::Box(p) => p.rounded,
            WidgetKind::TextButton(p) => p.rounded,
            _ => false,
        }
    }

    pub fn is_touch_en(&self) -> bool {
        match &self.kind {
            WidgetKind::Box(p) => p.touch_en,
            WidgetKind::Image(p) => p.touch_en,
            _ => false,
        }
    }

    pub fn is_fill_enabled(&self) -> bool {
        match &self.kind {
            WidgetKind::Text(p) => p.fill_en,
            WidgetKind::TextButton(p) => p.fill_en,
            _ => true,
        }
    }

    pub fn is_frame_enabled(&self) -> bool {
        match &self.kind {
            WidgetKind::Box(p) => p.frame_en,
            WidgetKind::Text(p) => p.frame_en,
            WidgetKind::TextButton(p) => p.frame_en,
            WidgetKind::ToggleButton(p) => p.frame_en,
            WidgetKind::Image(p) => p.frame_en,
            WidgetKind::ImgButton(p) => p.frame_en,
            WidgetKind::ListBox(p) => p.frame_en,
            _ => false,
        }
    }

    pub fn is_callback_en(&self) -> bool {
        match &self.kind {
            WidgetKind::CheckBox(p) => p.callback_en,
            WidgetKind::RadioButton(p) => p.callback_en,
            _ => false,
        }
    }

    pub fn is_utf8(&self) -> bool {
        match &self.kind {
            WidgetKind::Text(p) => p.utf8,
            WidgetKind::TextButton(p) => p.utf8,
            _ => false,
        }
    }

    pub fn text_storage(&self) -> u32 {
        match &self.kind {
            WidgetKind::Text(p) => p.text_storage,
            WidgetKind::TextButton(p) => p.text_storage,
            _ => 0,
        }
    }

    pub fn text_margin(&self) -> u32 {
        match &self.kind {
            WidgetKind::Text(p) => p.text_margin,
            WidgetKind::TextButton(p) => p.text_margin,
            _ => 0,
        }
    }

    pub fn is_string_enabled(&self) -> bool {
        matches!(&self.kind, WidgetKind::Text(p) if p.string_en)
    }

    pub fn element_ref(&self) -> &str {
        &self.element_ref
    }

    pub fn group_id(&self) -> &str {
        match &self.kind {
            WidgetKind::RadioButton(p) => &p.group_id,
            WidgetKind::ToggleButton(p) => &p.group_id,
            WidgetKind::ImgButton(p) if p.toggle => &p.group_id,
            _ => GROUP_ID_NONE,
        }
    }

    pub fn font_display_name(&self) -> Option<&str> {
        match &self.kind {
            WidgetKind::Text(p) => Some(&p.font),
            WidgetKind::TextButton(p) => Some(&p.font),
            WidgetKind::ListBox(p) => Some(&p.font),
            WidgetKind::Spinner(p) => Some(&p.font),
            WidgetKind::TextBox(p) => Some(&p.font),
            WidgetKind::RingGauge(p) => Some(&p.font),
            _ => None,
        }
    }

    pub fn page_action(&self) -> PageAction<'_> {
        match &self.kind {
            WidgetKind::TextButton(p) => PageAction::of(&p.jump_page, &p.popup_page, p.popup_hide),
            WidgetKind::ImgButton(p) => PageAction::of(&p.jump_page, &p.popup_page, p.popup_hide),
            _ => PageAction::None,
        }
    }

    /// Image references that need a resource declaration.
    pub fn images(&self) -> Vec<&ImageRef> {
        match &self.kind {
            WidgetKind::Image(p) => vec![&p.image],
            WidgetKind::ImgButton(p) => vec![&p.image, p.select_image.or(&p.image)],
            _ => Vec::new(),
        }
    }

    pub fn uses_image_define(&self) -> bool {
        self.images().first().is_some_and(|img| img.uses_define())
    }

    pub fn is_toggle(&self) -> bool {
        matches!(&self.kind, WidgetKind::ImgButton(p) if p.toggle)
    }

    pub fn is_transparent(&self) -> bool {
        match &self.kind {
            WidgetKind::Image(p) => p.transparent,
            WidgetKind::ImgButton(p) => p.transparent,
            _ => false,
        }
    }

    pub fn list_items(&self) -> &[String] {
        match &self.kind {
            WidgetKind::ListBox(p) => &p.items,
            _ => &[],
        }
    }

    pub fn item_gap(&self) -> u32 {
        match &self.kind {
            WidgetKind::ListBox(p) => p.item_gap,
            _ => 0,
        }
    }

    /// Increment and decrement button labels of a spinner.
    pub fn spinner_chars(&self) -> Option<(char, char)> {
        match &self.kind {
            WidgetKind::Spinner(p) => Some((p.incr_char, p.decr_char)),
            _ => None,
        }
    }

    pub fn ring_gauge(&self) -> Option<&RingGaugeProps> {
        match &self.kind {
            WidgetKind::RingGauge(p) => Some(p),
            _ => None,
        }
    }

    fn scrollbar_props(&self) -> Option<(&ScrollbarProps, Scrollbar)> {
        let (props, enum_prefix, ref_prefix) = match &self.kind {
            WidgetKind::ListBox(p) => (&p.scrollbar, "E_LISTSCROLL", "m_pListSlider"),
            WidgetKind::TextBox(p) => (&p.scrollbar, "E_TXTSCROLL", "m_pTextSlider"),
            _ => return None,
        };
        let count = self.key_count();
        let or_derived = |name: &str, prefix: &str| {
            if name.is_empty() {
                format!("{prefix}{count}")
            } else {
                name.to_string()
            }
        };
        let names = Scrollbar {
            enum_name: or_derived(&props.enum_name, enum_prefix),
            element_ref: or_derived(&props.element_ref, ref_prefix),
        };
        Some((props, names))
    }

    /// The attached scrollbar, when the widget has one enabled.
    pub fn scrollbar(&self) -> Option<Scrollbar> {
        self.scrollbar_props()
            .filter(|(props, _)| props.enabled)
            .map(|(_, names)| names)
    }

    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            WidgetKind::Text(p) => Some(&p.text),
            WidgetKind::TextButton(p) => Some(&p.text),
            _ => None,
        }
    }

    /// Alignment differs from the kind's default.
    pub fn has_custom_align(&self) -> bool {
        match &self.kind {
            WidgetKind::Text(p) => p.align != ALIGN_LEFT,
            WidgetKind::TextButton(p) => p.align != ALIGN_CENTER,
            WidgetKind::ListBox(p) => p.align != ALIGN_LEFT,
            _ => false,
        }
    }

    pub fn has_custom_text_color(&self) -> bool {
        match &self.kind {
            WidgetKind::Text(p) => p.text_color != TextProps::DEF_TEXT_COLOR,
            WidgetKind::TextButton(p) => p.text_color != TextButtonProps::DEF_TEXT_COLOR,
            WidgetKind::RingGauge(p) => p.text_color != RingGaugeProps::DEF_TEXT_COLOR,
            _ => false,
        }
    }

    /// Any of frame, fill or selected color differs from the kind's default.
    pub fn has_custom_colors(&self) -> bool {
        macro_rules! differs {
            ($p:expr, $t:ty) => {
                $p.frame_color != <$t>::DEF_FRAME_COLOR
                    || $p.fill_color != <$t>::DEF_FILL_COLOR
                    || $p.selected_color != <$t>::DEF_SELECTED_COLOR
            };
        }
        match &self.kind {
            WidgetKind::Box(p) => differs!(p, BoxProps),
            WidgetKind::Text(p) => differs!(p, TextProps),
            WidgetKind::TextButton(p) => differs!(p, TextButtonProps),
            WidgetKind::CheckBox(p) => differs!(p, CheckBoxProps),
            WidgetKind::RadioButton(p) => differs!(p, RadioButtonProps),
            WidgetKind::ProgressBar(p) => differs!(p, ProgressBarProps),
            WidgetKind::Slider(p) => differs!(p, SliderProps),
            WidgetKind::ToggleButton(_)
            | WidgetKind::Image(_)
            | WidgetKind::ImgButton(_)
            | WidgetKind::Line(_)
            | WidgetKind::ListBox(_)
            | WidgetKind::Spinner(_)
            | WidgetKind::TextBox(_)
            | WidgetKind::RingGauge(_) => false,
        }
    }

    /// Macro map for this widget's templates. `page_enum` fills `COM-000`.
    ///
    /// Literals (`TEXT`, list items, spinner arrows) are not included;
    /// emitters that need them encode them against the widget's font.
    pub fn mapped_properties(&self, page_enum: &str, fonts: &FontCatalog) -> MacroMap {
        let mut map = MacroMap::new();
        let mut put = |key: &str, value: String| {
            map.insert(key.to_string(), value);
        };

        put("COM-000", page_enum.to_string());
        put("COM-001", self.key.clone());
        put("COM-002", self.enum_name.clone());
        put("COM-003", self.x.to_string());
        put("COM-004", self.y.to_string());
        put("COM-005", self.width.to_string());
        put("COM-006", self.height.to_string());
        put("COM-018", self.key_count().to_string());
        put("COM-019", self.element_ref.clone());
        put("COM-020", self.use_flash().to_string());

        match &self.kind {
            WidgetKind::Box(p) => {
                put("COM-010", p.frame_en.to_string());
                put("COM-012", p.rounded.to_string());
                put("COM-016", p.touch_en.to_string());
                put("BOX-100", p.draw_func.to_string());
                put("BOX-101", p.tick_func.to_string());
                put("COL-300", p.default_colors.to_string());
                put("COL-302", p.frame_color.as_gslc());
                put("COL-303", p.fill_color.as_gslc());
                put("COL-304", p.selected_color.as_gslc());
            }
            WidgetKind::Text(p) => {
                put("TXT-201", p.text.clone());
                put("TXT-203", p.utf8.to_string());
                put("TXT-205", p.text_storage.saturating_add(1).to_string());
                put("TXT-211", fonts.font_enum(&p.font).to_string());
                put("TXT-212", p.text_margin.to_string());
                put("TXT-213", p.align.clone());
                put("COM-010", p.frame_en.to_string());
                put("COM-011", p.fill_en.to_string());
                put("COL-301", p.text_color.as_gslc());
                put("COL-302", p.frame_color.as_gslc());
                put("COL-303", p.fill_color.as_gslc());
                put("COL-304", p.selected_color.as_gslc());
            }
            WidgetKind::TextButton(p) => {
                put("TXT-202", p.text.clone());
                put("TXT-203", p.utf8.to_string());
                put("TXT-205", p.text_storage.saturating_add(1).to_string());
                put("TXT-211", fonts.font_enum(&p.font).to_string());
                put("TXT-212", p.text_margin.to_string());
                put("TXT-213", p.align.clone());
                put("COM-010", p.frame_en.to_string());
                put("COM-011", p.fill_en.to_string());
                put("COM-012", p.rounded.to_string());
                put("TBTN-101", p.jump_page.clone());
                put("TBTN-103", p.popup_hide.to_string());
                put("TBTN-104", p.popup_page.clone());
                put("COL-301", p.text_color.as_gslc());
                put("COL-302", p.frame_color.as_gslc());
                put("COL-303", p.fill_color.as_gslc());
                put("COL-304", p.selected_color.as_gslc());
            }
            WidgetKind::CheckBox(p) => {
                put("CBOX-100", p.checked.to_string());
                put("COM-017", p.callback_en.to_string());
                put("COL-302", p.frame_color.as_gslc());
                put("COL-303", p.fill_color.as_gslc());
                put("COL-304", p.selected_color.as_gslc());
                put("COL-305", p.mark_color.as_gslc());
            }
            WidgetKind::RadioButton(p) => {
                put("CBOX-100", p.checked.to_string());
                put("RBTN-101", p.group_id.clone());
                put("RBTN-102", p.style.clone());
                put("COM-017", p.callback_en.to_string());
                put("COL-302", p.frame_color.as_gslc());
                put("COL-303", p.fill_color.as_gslc());
                put("COL-304", p.selected_color.as_gslc());
                put("COL-305", p.mark_color.as_gslc());
            }
            WidgetKind::ToggleButton(p) => {
                put("CBOX-100", p.checked.to_string());
                put("RBTN-101", p.group_id.clone());
                put("RBTN-102", p.circular.to_string());
                put("COM-010", p.frame_en.to_string());
                put("COL-302", p.frame_color.as_gslc());
                put("COL-317", p.thumb_color.as_gslc());
                put("COL-319", p.on_color.as_gslc());
                put("COL-320", p.off_color.as_gslc());
            }
            WidgetKind::ProgressBar(p) => {
                put("BAR-100", p.vertical.to_string());
                put("BAR-102", p.min.to_string());
                put("BAR-103", p.max.to_string());
                put("BAR-104", p.value.to_string());
                put("COL-302", p.frame_color.as_gslc());
                put("COL-303", p.fill_color.as_gslc());
                put("COL-304", p.selected_color.as_gslc());
                put("COL-308", p.gauge_color.as_gslc());
            }
            WidgetKind::Slider(p) => {
                put("SLD-100", p.min.to_string());
                put("SLD-101", p.max.to_string());
                put("SLD-102", p.value.to_string());
                put("SLD-103", p.thumb_size.to_string());
                put("SLD-104", p.vertical.to_string());
                put("SLD-105", p.divisions.to_string());
                put("SLD-106", p.tick_size.to_string());
                put("SLD-107", p.trim.to_string());
                put("COL-302", p.frame_color.as_gslc());
                put("COL-303", p.fill_color.as_gslc());
                put("COL-304", p.selected_color.as_gslc());
                put("COL-306", p.tick_color.as_gslc());
                put("COL-307", p.trim_color.as_gslc());
            }
            WidgetKind::Image(p) => {
                put("IMG-100", p.image.file.clone());
                put("IMG-101", p.image.define.clone());
                put("IMG-108", p.image.extern_name.clone());
                put("IMG-109", p.image.memory.loader().to_string());
                put("IMG-102", p.format.clone());
                put("IMG-107", p.transparent.to_string());
                put("COM-010", p.frame_en.to_string());
                put("COM-016", p.touch_en.to_string());
                put("COL-302", p.frame_color.as_gslc());
            }
            WidgetKind::ImgButton(p) => {
                let select = p.select_image.or(&p.image);
                put("IBTN-100", p.image.file.clone());
                put("IBTN-102", p.image.define.clone());
                put("IBTN-108", p.image.extern_name.clone());
                put("IBTN-110", p.image.memory.loader().to_string());
                put("IBTN-101", select.file.clone());
                put("IBTN-103", select.define.clone());
                put("IBTN-109", select.extern_name.clone());
                put("IBTN-113", select.memory.loader().to_string());
                put("IBTN-104", p.format.clone());
                put("IBTN-107", p.transparent.to_string());
                put("CBOX-100", p.checked.to_string());
                put("RBTN-101", p.group_id.clone());
                put("TBTN-101", p.jump_page.clone());
                put("TBTN-103", p.popup_hide.to_string());
                put("TBTN-104", p.popup_page.clone());
                put("COM-010", p.frame_en.to_string());
                put("COL-302", p.frame_color.as_gslc());
            }
            WidgetKind::Line(p) => {
                let (x1, y1) = if p.vertical {
                    (i64::from(self.x), i64::from(self.y) + i64::from(p.length))
                } else {
                    (i64::from(self.x) + i64::from(p.length), i64::from(self.y))
                };
                put("LINE-100", p.length.to_string());
                put("LINE-101", p.vertical.to_string());
                put("X1", x1.to_string());
                put("Y1", y1.to_string());
                put("COL-303", p.color.as_gslc());
            }
            WidgetKind::ListBox(p) => {
                put("TXT-209", p.rows.to_string());
                put("TXT-210", p.cols.to_string());
                put("TXT-211", fonts.font_enum(&p.font).to_string());
                put("TXT-213", p.align.clone());
                put("LIST-100", p.margin_x.to_string());
                put("LIST-101", p.margin_y.to_string());
                put("LIST-102", p.selected.to_string());
                put("LIST-104", p.storage_size().to_string());
                put("LIST-106", p.item_gap.to_string());
                put("LIST-107", p.gap_color.as_gslc());
                put("LIST-110", p.item_width.to_string());
                put("LIST-111", p.item_height.to_string());
                put("COM-010", p.frame_en.to_string());
                put("COL-301", p.text_color.as_gslc());
                put("COL-302", p.frame_color.as_gslc());
                put("COL-303", p.fill_color.as_gslc());
                put("COL-304", p.selected_color.as_gslc());
            }
            WidgetKind::Spinner(p) => {
                put("TXT-211", fonts.font_enum(&p.font).to_string());
                put("SLD-100", p.min.to_string());
                put("SLD-101", p.max.to_string());
                put("SLD-102", p.value.to_string());
                put("SPIN-100", p.increment.to_string());
                put("COM-013", p.button_size.to_string());
            }
            WidgetKind::TextBox(p) => {
                put("TXT-208", p.wrap.to_string());
                put("TXT-209", p.rows.to_string());
                put("TXT-210", p.cols.to_string());
                put("TXT-211", fonts.font_enum(&p.font).to_string());
                put("COL-301", p.text_color.as_gslc());
                put("COL-302", p.frame_color.as_gslc());
                put("COL-303", p.fill_color.as_gslc());
                put("COL-304", p.selected_color.as_gslc());
            }
            WidgetKind::RingGauge(p) => {
                put("TXT-205", p.text_size.to_string());
                put("TXT-211", fonts.font_enum(&p.font).to_string());
                put("RING-100", p.start_angle.to_string());
                put("RING-101", p.angle_range.to_string());
                put("RING-102", p.clockwise.to_string());
                put("RING-103", p.min.to_string());
                put("RING-104", p.max.to_string());
                put("RING-105", p.value.to_string());
                put("RING-106", p.segments.to_string());
                put("RING-107", p.line_size.to_string());
                put("RING-108", p.gradient.to_string());
                put("RING-109", p.active_color.as_gslc());
                put("RING-110", p.gradient_start.as_gslc());
                put("RING-111", p.gradient_end.as_gslc());
                put("RING-112", p.inactive_color.as_gslc());
                put("COL-301", p.text_color.as_gslc());
                put("COL-303", p.fill_color.as_gslc());
            }
        }

        if let Some((props, names)) = self.scrollbar_props() {
            let inner_width = self.width.saturating_sub(props.width);
            put("BAR-112", props.enabled.to_string());
            put("BAR-113", names.enum_name);
            put("BAR-114", names.element_ref);
            put("BAR-115", props.max.to_string());
            put("BAR-116", props.frame_color.as_gslc());
            put("BAR-117", props.fill_color.as_gslc());
            put("SLD-103", props.thumb_size.to_string());
            put("SLD-111", props.width.to_string());
            put("INNER_W", inner_width.to_string());
            put("SCROLL_X", (i64::from(self.x) + i64::from(inner_width)).to_string());
        }

        map
    }
}
