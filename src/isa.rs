/*!
  The instruction set as far as the harness needs to know it, which is only
  enough to label decoded instructions in diagnostic listings. The opcode byte
  space [0, 256) is partitioned into contiguous buckets whose sizes are the
  published frequency weights of the instruction set; an opcode's mnemonic is
  the bucket it falls in. Execution semantics live entirely inside the
  external VM backend and are never derived from this table.
*/

use strum_macros::{Display as StrumDisplay, IntoStaticStr};
use num_enum::{TryFromPrimitive, IntoPrimitive};

/// Number of integer registers the VM exposes.
pub const REGISTER_COUNT: usize = 8;
/// Number of registers in each floating point group.
pub const REGISTER_COUNT_FLT: usize = 4;

/**
  Instruction mnemonics in bucket order. The discriminant is the bucket index,
  not the opcode byte; use `mnemonic()` to resolve an opcode byte. `NOP`
  carries weight zero and so never appears in the opcode table, but decoded
  fixtures may still want to name it.
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq, PartialEq,  Debug,            Hash
)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum Mnemonic {
  IADD_RS,
  IADD_M,
  ISUB_R,
  ISUB_M,
  IMUL_R,
  IMUL_M,
  IMULH_R,
  IMULH_M,
  ISMULH_R,
  ISMULH_M,
  IMUL_RCP,
  INEG_R,
  IXOR_R,
  IXOR_M,
  IROR_R,
  IROL_R,
  ISWAP_R,
  FSWAP_R,
  FADD_R,
  FADD_M,
  FSUB_R,
  FSUB_M,
  FSCAL_R,
  FMUL_R,
  FDIV_M,
  FSQRT_R,
  CBRANCH,
  CFROUND,
  ISTORE,
  NOP,
}

/// Frequency weights, in bucket order. The weights must sum to 256 so that
/// every opcode byte lands in exactly one bucket.
const MNEMONIC_WEIGHTS: [(Mnemonic, usize); 30] = [
  (Mnemonic::IADD_RS,  16),
  (Mnemonic::IADD_M,    7),
  (Mnemonic::ISUB_R,   16),
  (Mnemonic::ISUB_M,    7),
  (Mnemonic::IMUL_R,   16),
  (Mnemonic::IMUL_M,    4),
  (Mnemonic::IMULH_R,   4),
  (Mnemonic::IMULH_M,   1),
  (Mnemonic::ISMULH_R,  4),
  (Mnemonic::ISMULH_M,  1),
  (Mnemonic::IMUL_RCP,  8),
  (Mnemonic::INEG_R,    2),
  (Mnemonic::IXOR_R,   15),
  (Mnemonic::IXOR_M,    5),
  (Mnemonic::IROR_R,    8),
  (Mnemonic::IROL_R,    2),
  (Mnemonic::ISWAP_R,   4),
  (Mnemonic::FSWAP_R,   4),
  (Mnemonic::FADD_R,   16),
  (Mnemonic::FADD_M,    5),
  (Mnemonic::FSUB_R,   16),
  (Mnemonic::FSUB_M,    5),
  (Mnemonic::FSCAL_R,   6),
  (Mnemonic::FMUL_R,   32),
  (Mnemonic::FDIV_M,    4),
  (Mnemonic::FSQRT_R,   6),
  (Mnemonic::CBRANCH,  25),
  (Mnemonic::CFROUND,   1),
  (Mnemonic::ISTORE,   16),
  (Mnemonic::NOP,       0),
];

lazy_static! {
  /// Opcode byte to mnemonic, one entry per opcode.
  static ref OPCODE_TABLE: [Mnemonic; 256] = {
    let mut table = [Mnemonic::NOP; 256];
    let mut next = 0;
    for &(mnemonic, weight) in MNEMONIC_WEIGHTS.iter() {
      for entry in table[next..next + weight].iter_mut() {
        *entry = mnemonic;
      }
      next += weight;
    }
    assert_eq!(next, 256, "instruction weights should sum to 256");
    table
  };
}

/// Resolves an opcode byte to its mnemonic. Total over all 256 byte values.
pub fn mnemonic(opcode: u8) -> Mnemonic {
  OPCODE_TABLE[opcode as usize]
}

impl Mnemonic {
  pub fn code(&self) -> u8 {
    Into::<u8>::into(*self)
  }

  /// Integer operations with a register source operand.
  pub fn is_int_register_op(&self) -> bool {
    match self {
      Mnemonic::IADD_RS  | Mnemonic::ISUB_R  | Mnemonic::IMUL_R  |
      Mnemonic::IMULH_R  | Mnemonic::ISMULH_R | Mnemonic::IXOR_R |
      Mnemonic::IROR_R   | Mnemonic::IROL_R  | Mnemonic::ISWAP_R => true,
      _ => false
    }
  }

  /// Integer operations with a scratchpad memory source operand.
  pub fn is_int_memory_op(&self) -> bool {
    match self {
      Mnemonic::IADD_M  | Mnemonic::ISUB_M   | Mnemonic::IMUL_M |
      Mnemonic::IMULH_M | Mnemonic::ISMULH_M | Mnemonic::IXOR_M => true,
      _ => false
    }
  }
}

/**
  Scratchpad cache level a memory operand reads from. When source and
  destination name the same register the address comes from the immediate and
  spans the whole scratchpad (L3); otherwise the low bits of `mod` pick L2 or
  L1.
*/
pub fn read_level(src: u8, dst: u8, mod_: u8, register_count: usize) -> u8 {
  if src as usize % register_count == dst as usize % register_count {
    3
  } else if mod_ % 4 == 0 {
    2
  } else {
    1
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use std::convert::TryFrom;

  #[test]
  fn weights_cover_the_opcode_space() {
    let total: usize = MNEMONIC_WEIGHTS.iter().map(|&(_, w)| w).sum();
    assert_eq!(total, 256);
  }

  #[test]
  fn bucket_boundaries() {
    assert_eq!(mnemonic(0),   Mnemonic::IADD_RS);
    assert_eq!(mnemonic(15),  Mnemonic::IADD_RS);
    assert_eq!(mnemonic(16),  Mnemonic::IADD_M);
    assert_eq!(mnemonic(22),  Mnemonic::IADD_M);
    assert_eq!(mnemonic(23),  Mnemonic::ISUB_R);
    assert_eq!(mnemonic(70),  Mnemonic::IMULH_M);
    assert_eq!(mnemonic(76),  Mnemonic::IMUL_RCP);
    assert_eq!(mnemonic(85),  Mnemonic::INEG_R);
    assert_eq!(mnemonic(119), Mnemonic::ISWAP_R);
    assert_eq!(mnemonic(120), Mnemonic::FSWAP_R);
    assert_eq!(mnemonic(213), Mnemonic::FSQRT_R);
    assert_eq!(mnemonic(214), Mnemonic::CBRANCH);
    assert_eq!(mnemonic(238), Mnemonic::CBRANCH);
    assert_eq!(mnemonic(239), Mnemonic::CFROUND);
    assert_eq!(mnemonic(240), Mnemonic::ISTORE);
    assert_eq!(mnemonic(255), Mnemonic::ISTORE);
  }

  #[test]
  fn every_opcode_has_a_real_mnemonic() {
    for opcode in 0..=255u8 {
      assert_ne!(mnemonic(opcode), Mnemonic::NOP);
    }
  }

  #[test]
  fn mnemonic_text_round_trips() {
    use std::str::FromStr;
    assert_eq!(format!("{}", Mnemonic::IADD_RS), "IADD_RS");
    assert_eq!(Mnemonic::from_str("FMUL_R").unwrap(), Mnemonic::FMUL_R);
    assert_eq!(Mnemonic::try_from(0u8).unwrap(), Mnemonic::IADD_RS);
  }

  #[test]
  fn read_level_selection() {
    // Same register for source and destination reads L3.
    assert_eq!(read_level(2, 10, 5, REGISTER_COUNT), 3);
    // Distinct registers, mod divisible by four, reads L2.
    assert_eq!(read_level(1, 2, 4, REGISTER_COUNT), 2);
    // Distinct registers otherwise read L1.
    assert_eq!(read_level(1, 2, 5, REGISTER_COUNT), 1);
  }
}
