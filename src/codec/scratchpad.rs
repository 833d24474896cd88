/*!
  The scratchpad codec: a 2 MiB byte buffer serialized as fixed-width hex
  text, eight bytes per line, in ascending offset order. Byte `i` of line `k`
  is offset `k*8 + i` of the buffer. Decode requires exactly
  `SCRATCHPAD_LINES` lines; anything else is a size mismatch, never a silent
  under- or over-fill.
*/

use std::io;
use std::io::Write;

use crate::codec::hex::{decode_hex_u8, encode_hex_u8};
use crate::errors::{HarnessError, ParseError};

/// Size of the scratchpad in bytes.
pub const SCRATCHPAD_SIZE: usize = 2 * 1024 * 1024;

/// Bytes encoded per fixture line.
pub const SCRATCHPAD_LINE_BYTES: usize = 8;

/// Width in characters of one encoded scratchpad line.
pub const SCRATCHPAD_LINE_WIDTH: usize = 2 * SCRATCHPAD_LINE_BYTES;

/// Number of lines in a well-formed scratchpad fixture.
pub const SCRATCHPAD_LINES: usize = SCRATCHPAD_SIZE / SCRATCHPAD_LINE_BYTES;

/**
  The VM's working memory for one run. A single heap allocation, exclusively
  owned by the harness driver, lent `&mut` to the VM backend for the execute
  call, and dropped when the run ends. The length is always exactly
  `SCRATCHPAD_SIZE`.
*/
pub struct Scratchpad {
  bytes: Box<[u8]>
}

impl Scratchpad {
  pub fn zeroed() -> Scratchpad {
    Scratchpad {
      bytes: vec![0u8; SCRATCHPAD_SIZE].into_boxed_slice()
    }
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  pub fn as_bytes_mut(&mut self) -> &mut [u8] {
    &mut self.bytes
  }

  /// Decodes a sequence of fixture lines into a fresh scratchpad.
  pub fn decode<'a, I>(lines: I) -> Result<Scratchpad, HarnessError>
    where I: IntoIterator<Item=&'a str>
  {
    let mut scratchpad = Scratchpad::zeroed();
    let mut count = 0;

    for (number, line) in lines.into_iter().enumerate() {
      if count < SCRATCHPAD_LINES {
        decode_line(line, &mut scratchpad.bytes[count * SCRATCHPAD_LINE_BYTES..])
          .map_err(|source| HarnessError::MalformedScratchpadLine {
            line: number + 1,
            source
          })?;
      }
      // Surplus lines are only counted; the buffer has no room for them and
      // the mismatch is reported below.
      count += 1;
    }

    if count != SCRATCHPAD_LINES {
      return Err(HarnessError::SizeMismatch {
        expected: SCRATCHPAD_LINES,
        found: count
      });
    }
    Ok(scratchpad)
  }

  /// Encodes one eight byte group as a sixteen character upper-case line.
  pub fn encode_line(&self, line: usize) -> String {
    let offset = line * SCRATCHPAD_LINE_BYTES;
    let mut text = String::with_capacity(SCRATCHPAD_LINE_WIDTH);
    for byte in &self.bytes[offset..offset + SCRATCHPAD_LINE_BYTES] {
      text.push_str(&encode_hex_u8(*byte));
    }
    text
  }

  /// Writes the whole buffer as `SCRATCHPAD_LINES` newline-terminated lines
  /// in offset order.
  pub fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
    for line in 0..SCRATCHPAD_LINES {
      writeln!(writer, "{}", self.encode_line(line))?;
    }
    Ok(())
  }
}

fn decode_line(line: &str, bytes: &mut [u8]) -> Result<(), ParseError> {
  if line.len() != SCRATCHPAD_LINE_WIDTH {
    return Err(ParseError::WrongWidth {
      expected: SCRATCHPAD_LINE_WIDTH,
      found: line.len()
    });
  }
  // Reject non-ASCII text up front so the fixed-width slicing below cannot
  // land inside a multi-byte character.
  if let Some(c) = line.chars().find(|c| !c.is_ascii()) {
    return Err(ParseError::NotHexDigit(c));
  }
  for i in 0..SCRATCHPAD_LINE_BYTES {
    bytes[i] = decode_hex_u8(&line[i * 2..i * 2 + 2])?;
  }
  Ok(())
}
