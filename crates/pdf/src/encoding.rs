//! Text encoding for the standard Type1 faces.
//!
//! The fonts use WinAnsiEncoding with a `/Differences` array that places the
//! Polish letters missing from it on the unused codes starting at 1.

use lopdf::Object;

/// Polish letters outside WinAnsi with their glyph names, coded from 1.
pub const POLISH_GLYPHS: [(char, &str); 16] = [
    ('Ą', "Aogonek"),
    ('ą', "aogonek"),
    ('Ć', "Cacute"),
    ('ć', "cacute"),
    ('Ę', "Eogonek"),
    ('ę', "eogonek"),
    ('Ł', "Lslash"),
    ('ł', "lslash"),
    ('Ń', "Nacute"),
    ('ń', "nacute"),
    ('Ś', "Sacute"),
    ('ś', "sacute"),
    ('Ź', "Zacute"),
    ('ź', "zacute"),
    ('Ż', "Zdotaccent"),
    ('ż', "zdotaccent"),
];

/// Characters of the 0x80..=0x9F block of WinAnsiEncoding.
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('ˆ', 0x88),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('‹', 0x8B),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('˜', 0x98),
    ('™', 0x99),
    ('š', 0x9A),
    ('›', 0x9B),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

fn encode_char(ch: char) -> Option<u8> {
    match ch {
        '\t' | '\n' | '\r' => Some(b' '),
        ' '..='~' => Some(ch as u8),
        '\u{A0}'..='\u{FF}' => Some(ch as u32 as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, code)| *code)
            .or_else(|| {
                POLISH_GLYPHS
                    .iter()
                    .position(|(c, _)| *c == ch)
                    .map(|idx| idx as u8 + 1)
            }),
    }
}

/// Encodes `text` into single-byte codes. Returns the first character that
/// has no code.
pub fn encode_text(text: &str) -> Result<Vec<u8>, char> {
    text.chars().map(|ch| encode_char(ch).ok_or(ch)).collect()
}

/// `/Differences` array for the font encoding dictionary.
pub(crate) fn differences() -> Vec<Object> {
    let mut diffs = Vec::with_capacity(POLISH_GLYPHS.len() + 1);
    diffs.push(Object::Integer(1));
    for (_, glyph) in POLISH_GLYPHS {
        diffs.push(Object::Name(glyph.as_bytes().to_vec()));
    }
    diffs
}
