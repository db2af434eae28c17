//! WinAnsi (Windows-1252) encoding for the standard Type1 fonts.

use crate::objects::literal_string;

/// Encodes `text` as Windows-1252; characters outside the code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

/// Encoded and escaped literal string, ready to precede `Tj`.
pub fn pdf_text_literal(text: &str) -> String {
    literal_string(&encode_win_ansi(text))
}

fn win_ansi_byte(ch: char) -> u8 {
    match ch as u32 {
        0x00..=0x7F | 0xA0..=0xFF => ch as u32 as u8,
        0x20AC => 0x80, // euro
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85, // ellipsis
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95, // bullet
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99, // trade mark
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => b'?',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_and_latin1_pass_through() {
        assert_eq!(encode_win_ansi("Hello"), b"Hello".to_vec());
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
    }

    #[test]
    fn test_cp1252_specials() {
        assert_eq!(encode_win_ansi("€…™"), vec![0x80, 0x85, 0x99]);
        assert_eq!(encode_win_ansi("漢"), vec![b'?']);
    }

    #[test]
    fn test_literal_escapes() {
        assert_eq!(pdf_text_literal("a(b)\\"), "(a\\(b\\)\\\\)");
        assert_eq!(pdf_text_literal("é"), "(\\351)");
    }
}
