//! Payloads for images, lines and the GUIslice extended (`X*`) elements.

use serde::{Deserialize, Serialize};

use super::{ALIGN_LEFT, Color, GROUP_ID_NONE};

/// Where image data is read from at runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageMemory {
    #[default]
    Sd,
    Prog,
    Ram,
    File,
}

impl ImageMemory {
    /// Opening of the `gslc_GetImageFrom*` call; the template closes it.
    pub const fn loader(&self) -> &'static str {
        match self {
            Self::Sd => "gslc_GetImageFromSD((const char*)",
            Self::Prog => "gslc_GetImageFromProg((const unsigned char*)",
            Self::Ram => "gslc_GetImageFromRam((const unsigned char*)",
            Self::File => "gslc_GetImageFromFile(",
        }
    }
}

/// One bitmap reference. Either `define` (a file name `#define`d in the
/// Resources section) or `extern_name` (a linked-in array) is set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRef {
    pub file: String,
    pub define: String,
    pub extern_name: String,
    pub memory: ImageMemory,
}

impl ImageRef {
    pub fn uses_define(&self) -> bool {
        !self.define.is_empty()
    }

    /// `self`, or `fallback` when nothing is configured.
    pub fn or<'a>(&'a self, fallback: &'a ImageRef) -> &'a ImageRef {
        if self.define.is_empty() && self.extern_name.is_empty() {
            fallback
        } else {
            self
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageProps {
    pub image: ImageRef,
    pub format: String,
    pub transparent: bool,
    pub touch_en: bool,
    pub frame_en: bool,
    pub frame_color: Color,
}

impl Default for ImageProps {
    fn default() -> Self {
        Self {
            image: ImageRef::default(),
            format: "GSLC_IMGREF_FMT_BMP24".into(),
            transparent: false,
            touch_en: false,
            frame_en: false,
            frame_color: Color::GRAY,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImgButtonProps {
    pub image: ImageRef,
    /// Shown while pressed. Falls back to `image` when unset.
    pub select_image: ImageRef,
    pub format: String,
    pub transparent: bool,
    pub frame_en: bool,
    pub frame_color: Color,
    /// Latching toggle instead of a momentary button.
    pub toggle: bool,
    pub checked: bool,
    pub group_id: String,
    pub jump_page: String,
    pub popup_page: String,
    pub popup_hide: bool,
}

impl Default for ImgButtonProps {
    fn default() -> Self {
        Self {
            image: ImageRef::default(),
            select_image: ImageRef::default(),
            format: "GSLC_IMGREF_FMT_BMP24".into(),
            transparent: false,
            frame_en: false,
            frame_color: Color::WHITE,
            toggle: false,
            checked: false,
            group_id: GROUP_ID_NONE.into(),
            jump_page: String::new(),
            popup_page: String::new(),
            popup_hide: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineProps {
    pub length: u32,
    pub vertical: bool,
    pub color: Color,
}

impl Default for LineProps {
    fn default() -> Self {
        Self {
            length: 50,
            vertical: false,
            color: Color::GRAY_LT2,
        }
    }
}

/// Vertical slider attached to a listbox or textbox.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollbarProps {
    pub enabled: bool,
    /// Element enum; derived from the owner's key count when empty.
    #[serde(rename = "enum")]
    pub enum_name: String,
    pub element_ref: String,
    pub max: u32,
    pub width: u32,
    pub thumb_size: u32,
    pub frame_color: Color,
    pub fill_color: Color,
}

impl Default for ScrollbarProps {
    fn default() -> Self {
        Self {
            enabled: true,
            enum_name: String::new(),
            element_ref: String::new(),
            max: 100,
            width: 20,
            thumb_size: 5,
            frame_color: Color::GRAY,
            fill_color: Color::BLACK,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListBoxProps {
    pub font: String,
    pub items: Vec<String>,
    /// Item buffer size; 0 sizes it to fit `items`.
    pub storage_size: u32,
    pub selected: i32,
    pub rows: u32,
    pub cols: u32,
    pub item_gap: u32,
    pub item_width: i32,
    pub item_height: i32,
    pub margin_x: u32,
    pub margin_y: u32,
    pub align: String,
    pub frame_en: bool,
    pub text_color: Color,
    pub gap_color: Color,
    pub frame_color: Color,
    pub fill_color: Color,
    pub selected_color: Color,
    pub scrollbar: ScrollbarProps,
}

impl ListBoxProps {
    /// Bytes needed for every item plus its terminator.
    pub fn storage_size(&self) -> u32 {
        if self.storage_size > 0 {
            return self.storage_size;
        }
        self.items
            .iter()
            .map(|item| u32::try_from(item.len()).unwrap_or(u32::MAX).saturating_add(1))
            .fold(0, u32::saturating_add)
    }
}

impl Default for ListBoxProps {
    fn default() -> Self {
        Self {
            font: "BuiltIn(1x)".into(),
            items: Vec::new(),
            storage_size: 0,
            selected: 0,
            rows: 5,
            cols: 1,
            item_gap: 5,
            item_width: -1,
            item_height: -1,
            margin_x: 5,
            margin_y: 5,
            align: ALIGN_LEFT.into(),
            frame_en: true,
            text_color: Color::WHITE,
            gap_color: Color::BLACK,
            frame_color: Color::BLUE,
            fill_color: Color::BLACK,
            selected_color: Color::BLACK,
            scrollbar: ScrollbarProps {
                frame_color: Color::BLUE,
                ..ScrollbarProps::default()
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinnerProps {
    pub font: String,
    pub min: i32,
    pub max: i32,
    pub value: i32,
    pub increment: i32,
    pub button_size: u32,
    pub incr_char: char,
    pub decr_char: char,
}

impl SpinnerProps {
    pub const DEF_INCR_CHAR: char = '+';
    pub const DEF_DECR_CHAR: char = '-';
}

impl Default for SpinnerProps {
    fn default() -> Self {
        Self {
            font: "BuiltIn(1x)".into(),
            min: 0,
            max: 99,
            value: 0,
            increment: 1,
            button_size: 20,
            incr_char: Self::DEF_INCR_CHAR,
            decr_char: Self::DEF_DECR_CHAR,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBoxProps {
    pub font: String,
    pub wrap: bool,
    pub rows: u32,
    pub cols: u32,
    pub text_color: Color,
    pub frame_color: Color,
    pub fill_color: Color,
    pub selected_color: Color,
    pub scrollbar: ScrollbarProps,
}

impl Default for TextBoxProps {
    fn default() -> Self {
        Self {
            font: "BuiltIn(1x)".into(),
            wrap: false,
            rows: 6,
            cols: 28,
            text_color: Color::YELLOW,
            frame_color: Color::GRAY,
            fill_color: Color::BLACK,
            selected_color: Color::BLACK,
            scrollbar: ScrollbarProps::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingGaugeProps {
    pub font: String,
    /// Size of the text buffer shown in the ring center.
    pub text_size: u32,
    pub start_angle: i32,
    pub angle_range: i32,
    pub clockwise: bool,
    pub min: i32,
    pub max: i32,
    pub value: i32,
    pub segments: u32,
    pub line_size: u32,
    pub gradient: bool,
    pub active_color: Color,
    pub gradient_start: Color,
    pub gradient_end: Color,
    pub inactive_color: Color,
    pub text_color: Color,
    pub fill_color: Color,
}

impl RingGaugeProps {
    pub const DEF_SEGMENTS: u32 = 72;
    pub const DEF_LINE_SIZE: u32 = 10;
    pub const DEF_ANGLE_RANGE: i32 = 360;
    pub const DEF_ACTIVE_COLOR: Color = Color::BLUE_LT4;
    pub const DEF_INACTIVE_COLOR: Color = Color::GRAY_DK2;
    pub const DEF_TEXT_COLOR: Color = Color::YELLOW;
    pub const DEF_FILL_COLOR: Color = Color::BLACK;

    /// Start, range or direction differ from a full clockwise circle.
    pub fn has_custom_angles(&self) -> bool {
        !self.clockwise || self.start_angle != 0 || self.angle_range != Self::DEF_ANGLE_RANGE
    }
}

impl Default for RingGaugeProps {
    fn default() -> Self {
        Self {
            font: "BuiltIn(1x)".into(),
            text_size: 10,
            start_angle: 0,
            angle_range: Self::DEF_ANGLE_RANGE,
            clockwise: true,
            min: 0,
            max: 100,
            value: 0,
            segments: Self::DEF_SEGMENTS,
            line_size: Self::DEF_LINE_SIZE,
            gradient: false,
            active_color: Self::DEF_ACTIVE_COLOR,
            gradient_start: Color::BLUE_LT4,
            gradient_end: Color::RED,
            inactive_color: Self::DEF_INACTIVE_COLOR,
            text_color: Self::DEF_TEXT_COLOR,
            fill_color: Self::DEF_FILL_COLOR,
        }
    }
}
