//! Shift-JIS, the character set of the title table.

use encoding_rs::SHIFT_JIS;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SjisEncodeError {
    #[error("{0:?} has no Shift-JIS encoding")]
    UnmappableCharacter(char),
}

pub fn encode_sjis(input: &str) -> Result<Vec<u8>, SjisEncodeError> {
    let (encoded, _, had_errors) = SHIFT_JIS.encode(input);
    if had_errors {
        let unmappable = input
            .chars()
            .find(|&c| !is_encodable(c))
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        return Err(SjisEncodeError::UnmappableCharacter(unmappable));
    }

    Ok(encoded.into_owned())
}

pub fn decode_sjis(input: &[u8]) -> String {
    let (decoded, _, _) = SHIFT_JIS.decode(input);
    decoded.into_owned()
}

fn is_encodable(c: char) -> bool {
    let mut buffer = [0; 4];
    let (_, _, had_errors) = SHIFT_JIS.encode(c.encode_utf8(&mut buffer));
    !had_errors
}

/// Number of bytes `value` occupies on the medium, or `None` when some
/// character has no Shift-JIS representation.
pub fn encoded_len(value: &str) -> Option<usize> {
    encode_sjis(value).ok().map(|bytes| bytes.len())
}

/// True when every character takes exactly two bytes and decoding gives back
/// the same text, as the full-width title slot requires.
pub fn is_double_byte(value: &str) -> bool {
    match encode_sjis(value) {
        Ok(bytes) => bytes.len() == value.chars().count() * 2 && decode_sjis(&bytes) == value,
        Err(_) => false,
    }
}
