use serde::{Deserialize, Serialize};
use std::fmt;

/// 24-bit color as stored in a project. Serialized as `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const WHITE: Self = Self(255, 255, 255);
    pub const GRAY: Self = Self(128, 128, 128);
    pub const GRAY_DK2: Self = Self(64, 64, 64);
    pub const GRAY_LT2: Self = Self(192, 192, 192);
    pub const GRAY_LT3: Self = Self(224, 224, 224);
    pub const RED: Self = Self(255, 0, 0);
    pub const YELLOW: Self = Self(255, 255, 0);
    pub const GREEN: Self = Self(0, 255, 0);
    pub const BLUE: Self = Self(0, 0, 255);
    pub const BLUE_DK1: Self = Self(0, 0, 224);
    pub const BLUE_DK2: Self = Self(0, 0, 192);
    pub const BLUE_DK4: Self = Self(0, 0, 128);
    pub const BLUE_LT4: Self = Self(128, 128, 255);
    pub const ORANGE: Self = Self(255, 165, 0);

    /// GUIslice source form: a `GSLC_COL_*` name when one matches exactly,
    /// otherwise an inline `gslc_tsColor` literal.
    pub fn as_gslc(&self) -> String {
        GSLC_COLORS
            .iter()
            .find(|(_, c)| c == self)
            .map(|(name, _)| (*name).to_string())
            .unwrap_or_else(|| format!("((gslc_tsColor){{{},{},{}}})", self.0, self.1, self.2))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_gslc())
    }
}

// Named colors from GUIslice.h
const GSLC_COLORS: &[(&str, Color)] = &[
    ("GSLC_COL_RED_DK4", Color(128, 0, 0)),
    ("GSLC_COL_RED_DK3", Color(160, 0, 0)),
    ("GSLC_COL_RED_DK2", Color(192, 0, 0)),
    ("GSLC_COL_RED_DK1", Color(224, 0, 0)),
    ("GSLC_COL_RED", Color(255, 0, 0)),
    ("GSLC_COL_RED_LT1", Color(255, 32, 32)),
    ("GSLC_COL_RED_LT2", Color(255, 64, 64)),
    ("GSLC_COL_RED_LT3", Color(255, 96, 96)),
    ("GSLC_COL_RED_LT4", Color(255, 128, 128)),
    ("GSLC_COL_GREEN_DK4", Color(0, 128, 0)),
    ("GSLC_COL_GREEN_DK3", Color(0, 160, 0)),
    ("GSLC_COL_GREEN_DK2", Color(0, 192, 0)),
    ("GSLC_COL_GREEN_DK1", Color(0, 224, 0)),
    ("GSLC_COL_GREEN", Color(0, 255, 0)),
    ("GSLC_COL_GREEN_LT1", Color(32, 255, 32)),
    ("GSLC_COL_GREEN_LT2", Color(64, 255, 64)),
    ("GSLC_COL_GREEN_LT3", Color(96, 255, 96)),
    ("GSLC_COL_GREEN_LT4", Color(128, 255, 128)),
    ("GSLC_COL_BLUE_DK4", Color(0, 0, 128)),
    ("GSLC_COL_BLUE_DK3", Color(0, 0, 160)),
    ("GSLC_COL_BLUE_DK2", Color(0, 0, 192)),
    ("GSLC_COL_BLUE_DK1", Color(0, 0, 224)),
    ("GSLC_COL_BLUE", Color(0, 0, 255)),
    ("GSLC_COL_BLUE_LT1", Color(32, 32, 255)),
    ("GSLC_COL_BLUE_LT2", Color(64, 64, 255)),
    ("GSLC_COL_BLUE_LT3", Color(96, 96, 255)),
    ("GSLC_COL_BLUE_LT4", Color(128, 128, 255)),
    ("GSLC_COL_BLACK", Color(0, 0, 0)),
    ("GSLC_COL_GRAY_DK3", Color(32, 32, 32)),
    ("GSLC_COL_GRAY_DK2", Color(64, 64, 64)),
    ("GSLC_COL_GRAY_DK1", Color(96, 96, 96)),
    ("GSLC_COL_GRAY", Color(128, 128, 128)),
    ("GSLC_COL_GRAY_LT1", Color(160, 160, 160)),
    ("GSLC_COL_GRAY_LT2", Color(192, 192, 192)),
    ("GSLC_COL_GRAY_LT3", Color(224, 224, 224)),
    ("GSLC_COL_WHITE", Color(255, 255, 255)),
    ("GSLC_COL_YELLOW", Color(255, 255, 0)),
    ("GSLC_COL_YELLOW_DK", Color(64, 64, 0)),
    ("GSLC_COL_PURPLE", Color(128, 0, 128)),
    ("GSLC_COL_CYAN", Color(0, 255, 255)),
    ("GSLC_COL_MAGENTA", Color(255, 0, 255)),
    ("GSLC_COL_TEAL", Color(0, 128, 128)),
    ("GSLC_COL_ORANGE", Color(255, 165, 0)),
    ("GSLC_COL_BROWN", Color(165, 42, 42)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(Color::BLACK.as_gslc(), "GSLC_COL_BLACK");
        assert_eq!(Color::GRAY.as_gslc(), "GSLC_COL_GRAY");
        assert_eq!(Color::ORANGE.as_gslc(), "GSLC_COL_ORANGE");
        assert_eq!(Color::BLUE_DK2.as_gslc(), "GSLC_COL_BLUE_DK2");
    }

    #[test]
    fn test_unnamed_color_literal() {
        assert_eq!(Color(1, 2, 3).as_gslc(), "((gslc_tsColor){1,2,3})");
        assert_eq!(format!("{}", Color(10, 20, 30)), "((gslc_tsColor){10,20,30})");
    }

    #[test]
    fn test_color_json_is_rgb_array() {
        let c: Color = serde_json::from_str("[255, 165, 0]").unwrap();
        assert_eq!(c, Color::ORANGE);
        assert_eq!(serde_json::to_string(&Color::WHITE).unwrap(), "[255,255,255]");
    }
}
