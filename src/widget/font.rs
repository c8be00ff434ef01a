//! Fonts as far as code generation cares: the enum a font is registered
//! under and which code points it can draw.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontKind {
    /// Built-in 5x8 bitmap font, one glyph per byte value.
    Glcd,
    /// Adafruit-GFX style font covering `first..=last`.
    Gfx,
    /// Teensy ILI9341_t3 font.
    T3,
    /// TrueType font rendered by SDL on Linux targets.
    Ttf,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontInfo {
    pub display_name: String,
    #[serde(rename = "enum")]
    pub enum_name: String,
    pub kind: FontKind,
    #[serde(default = "default_first")]
    pub first: u32,
    #[serde(default = "default_last")]
    pub last: u32,
    /// Header that declares the font data, included by the Fonts section.
    #[serde(default)]
    pub include_file: Option<String>,
    /// Font file path, `#define`d to `font_ref` on Linux targets.
    #[serde(default)]
    pub define_file: Option<String>,
    #[serde(default = "default_font_ref")]
    pub font_ref: String,
    #[serde(default = "default_ref_type")]
    pub ref_type: String,
    /// Scale (bitmap fonts) or point size (TrueType) passed to `gslc_FontSet`.
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_first() -> u32 {
    0x20
}

fn default_last() -> u32 {
    0x7E
}

fn default_font_ref() -> String {
    "NULL".into()
}

fn default_ref_type() -> String {
    REFTYPE_PTR.into()
}

fn default_size() -> u32 {
    1
}

const REFTYPE_PTR: &str = "GSLC_FONTREF_PTR";
const REFTYPE_FNAME: &str = "GSLC_FONTREF_FNAME";

impl FontInfo {
    pub fn new(
        display_name: &str,
        enum_name: &str,
        kind: FontKind,
        first: u32,
        last: u32,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            enum_name: enum_name.into(),
            kind,
            first,
            last,
            include_file: None,
            define_file: None,
            font_ref: default_font_ref(),
            ref_type: default_ref_type(),
            size: default_size(),
        }
    }

    /// Font data compiled in from `header`, referenced as `&symbol`.
    pub fn with_include(mut self, header: &str, symbol: &str) -> Self {
        self.include_file = Some(header.into());
        self.font_ref = format!("&{symbol}");
        self
    }

    /// Font loaded at runtime from `file` through the `name` define.
    pub fn with_define(mut self, name: &str, file: &str) -> Self {
        self.define_file = Some(file.into());
        self.font_ref = name.into();
        self.ref_type = REFTYPE_FNAME.into();
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Whether the font has a glyph for `ch`. Line breaks never count.
    pub fn can_display(&self, ch: char) -> bool {
        if ch == '\n' || ch == '\r' {
            return false;
        }
        (self.first..=self.last).contains(&(ch as u32))
    }

    /// TrueType fonts take UTF-8 source text as is.
    pub fn renders_utf8(&self) -> bool {
        self.kind == FontKind::Ttf
    }
}

/// Lookup from display name to font. Passed explicitly to the generator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontCatalog {
    default: String,
    fonts: Vec<FontInfo>,
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FontCatalog {
    pub fn builtin() -> Self {
        use FontKind::*;
        Self {
            default: "BuiltIn(1x)".into(),
            fonts: vec![
                FontInfo::new("BuiltIn(1x)", "E_BUILTIN5X8", Glcd, 0x00, 0xFF),
                FontInfo::new("BuiltIn(2x)", "E_BUILTIN10X16", Glcd, 0x00, 0xFF).with_size(2),
                FontInfo::new("BuiltIn(3x)", "E_BUILTIN15X24", Glcd, 0x00, 0xFF).with_size(3),
                FontInfo::new("FreeMono9pt7b", "E_FREEMONO9", Gfx, 0x20, 0x7E)
                    .with_include("Fonts/FreeMono9pt7b.h", "FreeMono9pt7b"),
                FontInfo::new("FreeSans9pt7b", "E_FREESANS9", Gfx, 0x20, 0x7E)
                    .with_include("Fonts/FreeSans9pt7b.h", "FreeSans9pt7b"),
                FontInfo::new("FreeSans12pt7b", "E_FREESANS12", Gfx, 0x20, 0x7E)
                    .with_include("Fonts/FreeSans12pt7b.h", "FreeSans12pt7b"),
                FontInfo::new("FreeSerif12pt8b", "E_FREESERIF12", Gfx, 0x20, 0xFF)
                    .with_include("FreeSerif12pt8b.h", "FreeSerif12pt8b"),
                FontInfo::new("LiberationSans12", "E_AO_LIBERATIONSANS12", T3, 0x20, 0x7E)
                    .with_include("font_LiberationSans.h", "LiberationSans_12"),
                FontInfo::new("DejaVuSans12", "E_DEJAVUSANS12", Ttf, 0x20, 0x10FFFF)
                    .with_define(
                        "FONT_DEJAVUSANS",
                        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                    )
                    .with_size(12),
            ],
        }
    }

    /// Reads a catalog from JSON (`{"default": ..., "fonts": [...]}`).
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let catalog: Self = serde_json::from_str(&json)?;
        log::debug!("loaded {} fonts from {}", catalog.fonts.len(), path.display());
        Ok(catalog)
    }

    pub fn get(&self, display_name: &str) -> Option<&FontInfo> {
        self.fonts.iter().find(|f| f.display_name == display_name)
    }

    pub fn default_font(&self) -> &FontInfo {
        self.get(&self.default)
            .or_else(|| self.fonts.first())
            .unwrap_or(&FALLBACK_FONT)
    }

    /// Font for `display_name`, falling back to the catalog default.
    pub fn resolve(&self, display_name: &str) -> &FontInfo {
        match self.get(display_name) {
            Some(font) => font,
            None => {
                let fallback = self.default_font();
                log::warn!(
                    "unknown font {display_name:?}, using {}",
                    fallback.display_name
                );
                fallback
            }
        }
    }

    pub fn font_enum(&self, display_name: &str) -> &str {
        &self.resolve(display_name).enum_name
    }
}

static FALLBACK_FONT: FontInfo = FontInfo {
    display_name: String::new(),
    enum_name: String::new(),
    kind: FontKind::Glcd,
    first: 0x00,
    last: 0xFF,
    include_file: None,
    define_file: None,
    font_ref: String::new(),
    ref_type: String::new(),
    size: 1,
};
