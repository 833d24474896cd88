/*!
  Decoding of the program fixture into an ordered instruction table.

  One instruction per line, sixteen hex characters, fields left to right:
  imm32 (8 characters), mod (2), src (2), dst (2), opcode (2). The field
  order mirrors the packed layout of the VM's binary instruction word and
  must not be reordered. Lines fill program slots in file order starting at
  slot zero, and the table never holds more than `PROGRAM_CAPACITY` entries.
*/

use std::fmt::{Display, Formatter};

use prettytable::{format as TableFormat, Table};

use crate::codec::hex::{decode_hex_u32, decode_hex_u8};
use crate::errors::{HarnessError, ParseError};
use crate::isa;
use crate::isa::Mnemonic;

/// Capacity of the instruction table, fixed by the VM's program size.
pub const PROGRAM_CAPACITY: usize = 256;

/// Width in characters of one encoded instruction line.
pub const INSTRUCTION_LINE_WIDTH: usize = 16;

/// One decoded instruction. Immutable once decoded; the harness hands it to
/// the VM's compile phase and otherwise only pretty-prints it.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct Instruction {
  pub imm32: u32,
  pub mod_: u8,
  pub src: u8,
  pub dst: u8,
  pub opcode: u8,
}

impl Instruction {
  /// Decodes one fixture line. The line must be exactly
  /// `INSTRUCTION_LINE_WIDTH` ASCII hex characters.
  pub fn decode(line: &str) -> Result<Instruction, ParseError> {
    if line.len() != INSTRUCTION_LINE_WIDTH {
      return Err(ParseError::WrongWidth {
        expected: INSTRUCTION_LINE_WIDTH,
        found: line.len()
      });
    }
    // Reject non-ASCII text up front so the fixed-width slicing below cannot
    // land inside a multi-byte character.
    if let Some(c) = line.chars().find(|c| !c.is_ascii()) {
      return Err(ParseError::NotHexDigit(c));
    }

    Ok(Instruction {
      imm32  : decode_hex_u32(&line[0..8])?,
      mod_   : decode_hex_u8(&line[8..10])?,
      src    : decode_hex_u8(&line[10..12])?,
      dst    : decode_hex_u8(&line[12..14])?,
      opcode : decode_hex_u8(&line[14..16])?,
    })
  }

  pub fn mnemonic(&self) -> Mnemonic {
    isa::mnemonic(self.opcode)
  }

  /// Human readable operand listing, in the flavor the VM's own tooling
  /// prints: integer registers reduced modulo the register count, memory
  /// operands annotated with the scratchpad cache level they read.
  pub fn listing(&self) -> String {
    let mnemonic = self.mnemonic();
    let idst = self.dst as usize % isa::REGISTER_COUNT;
    let isrc = self.src as usize % isa::REGISTER_COUNT;

    if mnemonic.is_int_register_op() {
      format!("{} R{}, R{}", mnemonic, idst, isrc)
    } else if mnemonic.is_int_memory_op() {
      let level = isa::read_level(self.src, self.dst, self.mod_, isa::REGISTER_COUNT);
      format!("{} R{}, L{}[mem]", mnemonic, idst, level)
    } else {
      match mnemonic {
        Mnemonic::IMUL_RCP => format!("{} R{}, {}", mnemonic, idst, self.imm32),
        Mnemonic::INEG_R   => format!("{} R{}", mnemonic, idst),
        _                  => format!("{}", mnemonic)
      }
    }
  }
}

impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.listing())
  }
}

/// The ordered, capacity-checked instruction table for one run.
#[derive(Clone, Debug, Default)]
pub struct Program {
  instructions: Vec<Instruction>
}

impl Program {
  pub fn new() -> Program {
    Program {
      instructions: Vec::with_capacity(PROGRAM_CAPACITY)
    }
  }

  /// Appends an instruction to the next free slot. The table never grows
  /// past `PROGRAM_CAPACITY`; insertion beyond it is an error, not an
  /// overwrite.
  pub fn push(&mut self, instruction: Instruction) -> Result<(), HarnessError> {
    if self.instructions.len() == PROGRAM_CAPACITY {
      return Err(HarnessError::ProgramOverflow {
        capacity: PROGRAM_CAPACITY
      });
    }
    self.instructions.push(instruction);
    Ok(())
  }

  /// Decodes a sequence of fixture lines, assigning slots in arrival order.
  pub fn decode<'a, I>(lines: I) -> Result<Program, HarnessError>
    where I: IntoIterator<Item=&'a str>
  {
    let mut program = Program::new();
    for (number, line) in lines.into_iter().enumerate() {
      let instruction =
        Instruction::decode(line).map_err(
          |source| HarnessError::MalformedInstructionLine {
            line: number + 1,
            source
          }
        )?;
      log::debug!("instruction {:>3}: {}  {}", number, line, instruction);
      program.push(instruction)?;
    }
    Ok(program)
  }

  pub fn len(&self) -> usize {
    self.instructions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.instructions.is_empty()
  }

  pub fn get(&self, slot: usize) -> Option<&Instruction> {
    self.instructions.get(slot)
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
    self.instructions.iter()
  }
}


lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for Program {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut table = Table::new();
    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(
      row![ubr->"Slot", ub->"Imm32", ub->"Mod", ub->"Src", ub->"Dst", ub->"Op", ubl->"Listing"]
    );
    for (slot, instruction) in self.instructions.iter().enumerate() {
      table.add_row(row![
        r->slot,
        format!("{:08X}", instruction.imm32),
        format!("{:02X}", instruction.mod_),
        format!("{:02X}", instruction.src),
        format!("{:02X}", instruction.dst),
        format!("{:02X}", instruction.opcode),
        l->instruction.listing()
      ]);
    }
    write!(f, "{}", table)
  }
}
