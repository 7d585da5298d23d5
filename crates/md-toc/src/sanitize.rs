use log::debug;
use unicode_normalization::UnicodeNormalization;

use crate::budget::{half_width_length, truncate_half_width};
use crate::common::kana::{self, is_half_width_kana, remap_to_full_width, to_half_width};
use crate::common::sjis::{encoded_len, is_double_byte};

pub const MAX_HALF_WIDTH_TITLE: usize = 120;
pub const MAX_FULL_WIDTH_TITLE: usize = 100;

const HALF_WIDTH_DELIMITER: &str = "//";
const FULL_WIDTH_DELIMITER: &str = "／／";
const FULL_WIDTH_SPACE: char = '\u{3000}';

/// Produces a title the device can store in its half-width slot.
///
/// Full-width letters and kana are folded to their single byte forms, voiced
/// kana become base + mark, and anything else outside ASCII turns into a
/// space. The result is at most [`MAX_HALF_WIDTH_TITLE`] characters long and
/// a voiced kana is never split from its mark. When the result would not
/// encode to the expected number of bytes the title is transliterated to
/// plain ASCII instead.
pub fn sanitize_half_width(title: &str) -> String {
    let title = truncate_half_width(title, MAX_HALF_WIDTH_TITLE);
    let fused = fuse_marks(&remap_to_full_width(title));

    let mut sanitized = String::with_capacity(fused.len());
    for c in fused.chars() {
        match to_half_width(c) {
            Some(half) => half.push_to(&mut sanitized),
            None if c < '\u{7f}' || is_half_width_kana(c) => sanitized.push(c),
            None => sanitized.push(' '),
        }
    }

    let expected = half_width_length(title);
    if encoded_len(&sanitized) != Some(expected) {
        debug!("Half-width title {title:?} does not encode to {expected} bytes, transliterating");
        return transliterate_ascii(title);
    }
    sanitized
}

/// Produces a title for the full-width slot, where every character must take
/// exactly two bytes.
pub fn sanitize_full_width(title: &str) -> String {
    let title = truncate_chars(title, MAX_FULL_WIDTH_TITLE);
    let remapped = remap_to_full_width(title);

    if !is_double_byte(&remapped) {
        debug!("Full-width title {title:?} cannot be stored losslessly, transliterating");
        return transliterate_ascii(title);
    }
    remapped
}

/// Lossy fallback: decompose and drop everything that is not ASCII.
pub fn transliterate_ascii(title: &str) -> String {
    title.nfd().filter(char::is_ascii).collect()
}

/// Keeps a disc or group title from closing its `//` terminator early.
///
/// Inner `//` become ` /`, and a trailing `/` gets a space after it so it
/// cannot merge with the terminator that follows.
pub fn escape_title_delimiters(title: &str) -> String {
    let mut escaped = title.to_string();
    while escaped.contains(HALF_WIDTH_DELIMITER) {
        escaped = escaped.replace(HALF_WIDTH_DELIMITER, " /");
    }
    if escaped.ends_with('/') {
        escaped.push(' ');
    }
    escaped
}

pub fn escape_full_width_title_delimiters(title: &str) -> String {
    let mut escaped = title.to_string();
    while escaped.contains(FULL_WIDTH_DELIMITER) {
        escaped = escaped.replace(FULL_WIDTH_DELIMITER, "／");
    }
    if escaped.ends_with('／') {
        escaped.push(FULL_WIDTH_SPACE);
    }
    escaped
}

fn fuse_marks(title: &str) -> String {
    let mut fused = String::with_capacity(title.len());
    let mut chars = title.chars().peekable();
    while let Some(c) = chars.next() {
        match chars.peek().and_then(|&mark| kana::voice(c, mark)) {
            Some(voiced) => {
                fused.push(voiced);
                chars.next();
            }
            None => fused.push(c),
        }
    }
    fused
}

pub(crate) fn truncate_chars(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}
