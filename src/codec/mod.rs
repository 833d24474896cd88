/*!

  The fixture text formats and their codecs. Both fixture kinds share the
  same physical shape — one record per line, fixed-width ASCII hex,
  newline-terminated, case-insensitive on input and upper-case on output —
  and differ only in what a line means:

    Program line:    imm32(8) mod(2) src(2) dst(2) opcode(2)
    Scratchpad line: eight consecutive bytes in ascending offset order

  The codecs are strict. A line of the wrong width, a non-hex digit, a
  program of more than 256 instructions, or a scratchpad of anything other
  than exactly 262,144 lines is an error; nothing is truncated, padded, or
  silently skipped. Golden fixtures are compared byte for byte, so any
  leniency here would corrupt the suites that consume them.

*/

mod hex;
mod program;
mod scratchpad;

pub use hex::{decode_hex_u32, decode_hex_u8, encode_hex_u8};
pub use program::{Instruction, Program, INSTRUCTION_LINE_WIDTH, PROGRAM_CAPACITY};
pub use scratchpad::{Scratchpad, SCRATCHPAD_LINES, SCRATCHPAD_LINE_BYTES,
                     SCRATCHPAD_LINE_WIDTH, SCRATCHPAD_SIZE};
