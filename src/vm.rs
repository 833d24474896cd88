/*!
  The seam between the harness and the external virtual machine.

  The VM itself — instruction semantics, the bytecode compiler, the dataset,
  the cryptography underneath — is a collaborator, not part of this crate.
  Different builds of it (software AES, hardware AES) expose the identical
  two-call contract, so the backend is a trait injected at harness
  construction and the harness never branches on which variant is active.

  One iteration is exactly one `compile` call with a fresh zeroed register
  file followed by exactly one `execute` call with a default program
  configuration. There is no loop and no multi-iteration chaining here.
*/

use crate::codec::{Program, Scratchpad};
use crate::errors::{HarnessError, VmError};
use crate::isa::{REGISTER_COUNT, REGISTER_COUNT_FLT};

/**
  The VM's native register file, zero-initialized by the harness and handed
  to the compile phase. Opaque to the harness: it never reads the fields
  back, it only owns the allocation for the duration of the run.
*/
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RegisterFile {
  pub r: [u64; REGISTER_COUNT],
  pub f: [[u64; 2]; REGISTER_COUNT_FLT],
  pub e: [[u64; 2]; REGISTER_COUNT_FLT],
  pub a: [[u64; 2]; REGISTER_COUNT_FLT],
}

/// Per-program execution configuration, default-constructed by the harness
/// unless a test fixture specifies otherwise. Also opaque to the harness.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProgramConfiguration {
  pub e_mask: [u64; 2],
  pub read_reg: [usize; 4],
}

/**
  The two-phase contract every VM variant exposes. `Bytecode` is the
  backend's compiled form of a program — a fixed-capacity table of 256
  entries in the real VM — and the harness treats it as opaque: it is
  produced by `compile` and passed through to `execute` uninspected.

  `compile` must be pure with respect to the program; it takes the program by
  shared reference and may only write the register file and its own bytecode
  buffer.
*/
pub trait VmBackend {
  type Bytecode;

  fn compile(&self, program: &Program, registers: &mut RegisterFile)
    -> Result<Self::Bytecode, VmError>;

  fn execute(&self, bytecode: &Self::Bytecode, scratchpad: &mut Scratchpad,
             config: &ProgramConfiguration) -> Result<(), VmError>;
}

/**
  A backend that compiles every program to nothing and leaves the scratchpad
  untouched. It exercises the full fixture plumbing — decode, compile,
  execute, encode — without the external VM, which makes the identity
  round trip (output file equals input file) exact by construction.
*/
pub struct NopVm;

impl VmBackend for NopVm {
  // Only the instruction count survives compilation; there is nothing to
  // interpret later.
  type Bytecode = usize;

  fn compile(&self, program: &Program, _registers: &mut RegisterFile)
    -> Result<usize, VmError>
  {
    Ok(program.len())
  }

  fn execute(&self, _bytecode: &usize, _scratchpad: &mut Scratchpad,
             _config: &ProgramConfiguration) -> Result<(), VmError>
  {
    Ok(())
  }
}

/// Runs exactly one compile+execute pass of `backend` over `program`,
/// mutating `scratchpad` in place. Backend failures abort the run.
pub fn run_one_iteration<B: VmBackend>(
    backend: &B,
    program: &Program,
    scratchpad: &mut Scratchpad
  ) -> Result<(), HarnessError>
{
  let mut registers = RegisterFile::default();
  let bytecode =
    backend.compile(program, &mut registers)
           .map_err(HarnessError::CompileFailure)?;
  log::info!("compiled {} instructions", program.len());

  let config = ProgramConfiguration::default();
  backend.execute(&bytecode, scratchpad, &config)
         .map_err(HarnessError::ExecuteFailure)?;
  log::info!("executed one iteration");

  Ok(())
}


#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::RefCell;

  /// Records the order of contract calls and scribbles on the scratchpad so
  /// tests can see that execution really ran.
  struct ProbeVm {
    calls: RefCell<Vec<&'static str>>,
    fail_compile: bool,
    fail_execute: bool,
  }

  impl ProbeVm {
    fn new(fail_compile: bool, fail_execute: bool) -> ProbeVm {
      ProbeVm {
        calls: RefCell::new(vec![]),
        fail_compile,
        fail_execute
      }
    }
  }

  impl VmBackend for ProbeVm {
    type Bytecode = usize;

    fn compile(&self, program: &Program, registers: &mut RegisterFile)
      -> Result<usize, VmError>
    {
      self.calls.borrow_mut().push("compile");
      assert_eq!(*registers, RegisterFile::default(), "register file must arrive zeroed");
      if self.fail_compile {
        return Err(VmError("probe compile failure".to_string()));
      }
      Ok(program.len())
    }

    fn execute(&self, _bytecode: &usize, scratchpad: &mut Scratchpad,
               config: &ProgramConfiguration) -> Result<(), VmError>
    {
      self.calls.borrow_mut().push("execute");
      assert_eq!(*config, ProgramConfiguration::default());
      if self.fail_execute {
        return Err(VmError("probe execute failure".to_string()));
      }
      scratchpad.as_bytes_mut()[0] = 0xFF;
      Ok(())
    }
  }

  #[test]
  fn one_compile_then_one_execute() {
    let backend = ProbeVm::new(false, false);
    let program = Program::new();
    let mut scratchpad = Scratchpad::zeroed();

    run_one_iteration(&backend, &program, &mut scratchpad).unwrap();
    assert_eq!(*backend.calls.borrow(), vec!["compile", "execute"]);
    assert_eq!(scratchpad.as_bytes()[0], 0xFF);
  }

  #[test]
  fn compile_failure_is_fatal_and_skips_execute() {
    let backend = ProbeVm::new(true, false);
    let program = Program::new();
    let mut scratchpad = Scratchpad::zeroed();

    match run_one_iteration(&backend, &program, &mut scratchpad) {
      Err(HarnessError::CompileFailure(e)) => {
        assert_eq!(e, VmError("probe compile failure".to_string()));
      }
      _ => panic!("expected CompileFailure")
    }
    assert_eq!(*backend.calls.borrow(), vec!["compile"]);
    assert_eq!(scratchpad.as_bytes()[0], 0);
  }

  #[test]
  fn execute_failure_is_fatal() {
    let backend = ProbeVm::new(false, true);
    let program = Program::new();
    let mut scratchpad = Scratchpad::zeroed();

    match run_one_iteration(&backend, &program, &mut scratchpad) {
      Err(HarnessError::ExecuteFailure(_)) => {}
      _ => panic!("expected ExecuteFailure")
    }
  }

  #[test]
  fn nop_backend_leaves_the_scratchpad_unchanged() {
    let program = Program::decode(vec!["000000AA0102030A"]).unwrap();
    let mut scratchpad = Scratchpad::zeroed();
    run_one_iteration(&NopVm, &program, &mut scratchpad).unwrap();
    assert!(scratchpad.as_bytes().iter().all(|&b| b == 0));
  }
}
