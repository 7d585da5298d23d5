//! Transliteration tables between the half-width (single byte) and full-width
//! (double byte) characters the title table can store.

use lazy_static::lazy_static;
use std::collections::HashMap;

const HALF_WIDTH_KANA: &str =
    "｡｢｣､･ｦｧｨｩｪｫｬｭｮｯｰｱｲｳｴｵｶｷｸｹｺｻｼｽｾｿﾀﾁﾂﾃﾄﾅﾆﾇﾈﾉﾊﾋﾌﾍﾎﾏﾐﾑﾒﾓﾔﾕﾖﾗﾘﾙﾚﾛﾜﾝﾞﾟ";
const FULL_WIDTH_KANA: &str =
    "。「」、・ヲァィゥェォャュョッーアイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン゛゜";

/// ASCII characters whose full-width counterpart is not at the fixed 0xFEE0
/// offset, or whose offset form has no Shift-JIS encoding.
const ASCII_OVERRIDES: &[(char, char)] = &[
    (' ', '\u{3000}'),
    ('"', '\u{201D}'),
    ('\'', '\u{2019}'),
    ('~', '\u{301C}'),
];

/// Extra full-width forms that fold onto ASCII but are never produced.
const FULL_WIDTH_ALIASES: &[(char, char)] = &[
    ('\u{FF5E}', '~'),
    ('\u{FF02}', '"'),
    ('\u{FF07}', '\''),
    ('\u{201C}', '"'),
    ('\u{2018}', '\''),
];

pub const DAKUTEN: char = '\u{309B}';
pub const HANDAKUTEN: char = '\u{309C}';
pub const COMBINING_DAKUTEN: char = '\u{3099}';
pub const COMBINING_HANDAKUTEN: char = '\u{309A}';
pub const HALF_WIDTH_DAKUTEN: char = 'ﾞ';
pub const HALF_WIDTH_HANDAKUTEN: char = 'ﾟ';

// Voiced form is the next code point, except for ウ.
const DAKUTEN_BASES: &str = "カキクケコサシスセソタチツテトハヒフヘホウ";
const HANDAKUTEN_BASES: &str = "ハヒフヘホ";

const KATAKANA_FIRST: u32 = 0x30A1;
const KATAKANA_LAST: u32 = 0x30F6;
const HIRAGANA_FIRST: u32 = 0x3041;
const HIRAGANA_LAST: u32 = 0x3096;
const KANA_OFFSET: u32 = 0x60;

/// A full-width character rendered with half-width characters. Voiced kana
/// need a trailing mark byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HalfWidth {
    pub base: char,
    pub mark: Option<char>,
}

impl HalfWidth {
    const fn plain(base: char) -> Self {
        Self { base, mark: None }
    }

    pub fn push_to(self, out: &mut String) {
        out.push(self.base);
        if let Some(mark) = self.mark {
            out.push(mark);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Dakuten,
    Handakuten,
}

fn mark_kind(c: char) -> Option<Mark> {
    match c {
        DAKUTEN | COMBINING_DAKUTEN | HALF_WIDTH_DAKUTEN => Some(Mark::Dakuten),
        HANDAKUTEN | COMBINING_HANDAKUTEN | HALF_WIDTH_HANDAKUTEN => Some(Mark::Handakuten),
        _ => None,
    }
}

lazy_static! {
    static ref HALF_TO_FULL: HashMap<char, char> = build_half_to_full();
    static ref FULL_TO_HALF: HashMap<char, HalfWidth> = build_full_to_half();
}

fn build_half_to_full() -> HashMap<char, char> {
    let mut table = HashMap::new();
    for c in '!'..='~' {
        if let Some(full) = char::from_u32(c as u32 + 0xFEE0) {
            table.insert(c, full);
        }
    }
    for &(half, full) in ASCII_OVERRIDES {
        table.insert(half, full);
    }
    for (half, full) in HALF_WIDTH_KANA.chars().zip(FULL_WIDTH_KANA.chars()) {
        table.insert(half, full);
    }
    table
}

fn build_full_to_half() -> HashMap<char, HalfWidth> {
    let mut table = HashMap::new();
    for (&half, &full) in HALF_TO_FULL.iter() {
        table.insert(full, HalfWidth::plain(half));
        if let Some(hiragana) = to_hiragana(full) {
            table.insert(hiragana, HalfWidth::plain(half));
        }
    }
    for &(full, half) in FULL_WIDTH_ALIASES {
        table.insert(full, HalfWidth::plain(half));
    }
    table.insert(COMBINING_DAKUTEN, HalfWidth::plain(HALF_WIDTH_DAKUTEN));
    table.insert(COMBINING_HANDAKUTEN, HalfWidth::plain(HALF_WIDTH_HANDAKUTEN));

    let voiced = DAKUTEN_BASES
        .chars()
        .map(|base| (base, DAKUTEN, HALF_WIDTH_DAKUTEN))
        .chain(
            HANDAKUTEN_BASES
                .chars()
                .map(|base| (base, HANDAKUTEN, HALF_WIDTH_HANDAKUTEN)),
        );
    for (base, mark, half_mark) in voiced {
        let Some(half_base) = table.get(&base).map(|h| h.base) else {
            continue;
        };
        let entry = HalfWidth {
            base: half_base,
            mark: Some(half_mark),
        };
        if let Some(katakana) = voice(base, mark) {
            table.insert(katakana, entry);
            if let Some(hiragana) = to_hiragana(katakana) {
                table.insert(hiragana, entry);
            }
        }
    }
    table
}

fn to_hiragana(c: char) -> Option<char> {
    let code = c as u32;
    if (KATAKANA_FIRST..=KATAKANA_LAST).contains(&code) {
        char::from_u32(code - KANA_OFFSET)
    } else {
        None
    }
}

fn to_katakana(c: char) -> Option<char> {
    let code = c as u32;
    if (HIRAGANA_FIRST..=HIRAGANA_LAST).contains(&code) {
        char::from_u32(code + KANA_OFFSET)
    } else {
        None
    }
}

/// Full-width form of a half-width character.
pub fn to_full_width(c: char) -> Option<char> {
    HALF_TO_FULL.get(&c).copied()
}

/// Half-width form of a full-width character, including hiragana.
pub fn to_half_width(c: char) -> Option<HalfWidth> {
    FULL_TO_HALF.get(&c).copied()
}

/// Maps every character that has a full-width form, leaving the rest as is.
pub fn remap_to_full_width(value: &str) -> String {
    value
        .chars()
        .map(|c| to_full_width(c).unwrap_or(c))
        .collect()
}

pub fn is_half_width_kana(c: char) -> bool {
    ('\u{FF61}'..='\u{FF9F}').contains(&c)
}

/// True for kana carrying a dakuten or handakuten, which take two bytes once
/// written half-width.
pub fn is_voiced_kana(c: char) -> bool {
    matches!(to_half_width(c), Some(HalfWidth { mark: Some(_), .. }))
}

/// Fuses `base` followed by a (han)dakuten `mark` into the precomposed kana.
/// Works for hiragana and katakana; `None` when the pair has no precomposed
/// form.
pub fn voice(base: char, mark: char) -> Option<char> {
    let mark = mark_kind(mark)?;
    let (katakana, hiragana) = match to_katakana(base) {
        Some(katakana) => (katakana, true),
        None => (base, false),
    };

    let voiced = match mark {
        Mark::Dakuten if katakana == 'ウ' => 'ヴ',
        Mark::Dakuten if DAKUTEN_BASES.contains(katakana) => {
            char::from_u32(katakana as u32 + 1)?
        }
        Mark::Handakuten if HANDAKUTEN_BASES.contains(katakana) => {
            char::from_u32(katakana as u32 + 2)?
        }
        _ => return None,
    };

    if hiragana {
        to_hiragana(voiced)
    } else {
        Some(voiced)
    }
}
