/*!
  Fixed-width hexadecimal codec for the fixture file formats. Decoding is
  case-insensitive; encoding is zero-padded upper-case with no prefix. The
  width check is an explicit comparison against the exact expected constant,
  made before any indexing into the text.
*/

use crate::errors::ParseError;

fn decode_hex(text: &str, width: usize) -> Result<u32, ParseError> {
  if text.len() != width {
    return Err(ParseError::WrongWidth {
      expected: width,
      found: text.len()
    });
  }
  if let Some(c) = text.chars().find(|c| !c.is_ascii_hexdigit()) {
    return Err(ParseError::NotHexDigit(c));
  }
  // Every character is an ASCII hex digit and at most eight of them fit in
  // a `u32`, so this conversion cannot fail.
  Ok(u32::from_str_radix(text, 16).unwrap())
}

/// Decodes exactly 8 hex characters as a big-endian `u32`.
pub fn decode_hex_u32(text: &str) -> Result<u32, ParseError> {
  decode_hex(text, 8)
}

/// Decodes exactly 2 hex characters as a `u8`.
pub fn decode_hex_u8(text: &str) -> Result<u8, ParseError> {
  decode_hex(text, 2).map(|value| value as u8)
}

/// Encodes a byte as 2 upper-case hex characters.
pub fn encode_hex_u8(value: u8) -> String {
  format!("{:02X}", value)
}
