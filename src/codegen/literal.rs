//! C string and character literals for widget text.

use crate::widget::FontInfo;

/// Encodes `text` as a quoted C string literal that draws correctly in `font`.
///
/// Characters outside printable ASCII become `\xNN` escapes: a single glyph
/// index when the font covers the code point, otherwise one escape per UTF-8
/// byte. Fonts that render UTF-8 themselves get such characters verbatim,
/// but control characters are escaped for every font.
/// A hex escape followed by a hex digit is closed with `""` so the compiler
/// does not read the digit as part of the escape.
pub fn create_literal(font: &FontInfo, text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');

    let mut after_hex = false;
    for ch in text.chars() {
        after_hex = match ch {
            '"' => push_str(&mut out, "\\\""),
            '\\' => push_str(&mut out, "\\\\"),
            '\n' => push_str(&mut out, "\\n"),
            '\r' => push_str(&mut out, "\\r"),
            '\t' => push_str(&mut out, "\\t"),
            ' '..='~' => {
                if after_hex && ch.is_ascii_hexdigit() {
                    out.push_str("\"\"");
                }
                out.push(ch);
                false
            }
            // every control character is below U+00A0
            _ if ch.is_control() => {
                push_hex(&mut out, u32::from(ch));
                true
            }
            _ if font.renders_utf8() => {
                out.push(ch);
                false
            }
            _ if u32::from(ch) <= 0xFF && font.can_display(ch) => {
                push_hex(&mut out, u32::from(ch));
                true
            }
            _ => {
                let mut buf = [0u8; 4];
                for byte in ch.encode_utf8(&mut buf).bytes() {
                    push_hex(&mut out, u32::from(byte));
                }
                true
            }
        };
    }

    out.push('"');
    out
}

/// Encodes `ch` as a C character literal holding one glyph index.
///
/// Code points above `0xFF` have no single-byte form; they are replaced
/// with `'?'` and a warning.
pub fn create_char_literal(ch: char) -> String {
    match ch {
        '\'' => "'\\''".to_string(),
        '\\' => "'\\\\'".to_string(),
        ' '..='~' => format!("'{ch}'"),
        _ if u32::from(ch) <= 0xFF => {
            let mut out = String::from("'");
            push_hex(&mut out, u32::from(ch));
            out.push('\'');
            out
        }
        _ => {
            log::warn!("{ch:?} does not fit a char literal, using '?'");
            "'?'".to_string()
        }
    }
}

fn push_str(out: &mut String, s: &str) -> bool {
    out.push_str(s);
    false
}

fn push_hex(out: &mut String, value: u32) {
    out.push_str(&format!("\\x{value:02X}"));
}
