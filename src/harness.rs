/*!
  Top-level sequencing of one golden-state run:

    1. read and decode the program fixture,
    2. read and decode the initial scratchpad fixture,
    3. run exactly one VM iteration,
    4. encode and write the final scratchpad fixture.

  There is no branching on content beyond error checks. Any failure aborts
  the run; after a failed run the output file is absent or truncated, and
  callers must check the exit status rather than the file's existence.
*/

use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::codec::{Program, Scratchpad};
use crate::errors::HarnessError;
use crate::vm;
use crate::vm::VmBackend;

/// Fixture paths, fixed relative to the working directory.
pub const PROGRAM_FILE: &str = "program_data.hex";
pub const SCRATCHPAD_INIT_FILE: &str = "scratchpad_init_data.hex";
pub const SCRATCHPAD_FINAL_FILE: &str = "scratchpad_final_data.hex";

/// The harness driver, parameterized over the injected VM variant.
pub struct Harness<B: VmBackend> {
  backend: B
}

impl<B: VmBackend> Harness<B> {
  pub fn new(backend: B) -> Harness<B> {
    Harness { backend }
  }

  /// Runs the whole pipeline once. On success the output file holds the
  /// post-execution scratchpad; on failure it is absent or untrustworthy.
  pub fn run(&self, program_path: &Path, scratchpad_path: &Path,
             output_path: &Path) -> Result<(), HarnessError>
  {
    let program = load_program(program_path)?;
    log::info!("loaded program: {} instructions", program.len());

    #[cfg(feature = "trace_decode")]
    println!("{}", program);

    let mut scratchpad = load_scratchpad(scratchpad_path)?;
    log::info!("loaded scratchpad: {} bytes", scratchpad.as_bytes().len());

    vm::run_one_iteration(&self.backend, &program, &mut scratchpad)?;

    store_scratchpad(&scratchpad, output_path)?;
    log::info!("wrote final scratchpad to {}", output_path.display());
    Ok(())
  }
}

fn load_program(path: &Path) -> Result<Program, HarnessError> {
  let text = fs::read_to_string(path).map_err(|source| HarnessError::IoFailure {
    stage: "reading the program file",
    source
  })?;
  Program::decode(text.lines())
}

fn load_scratchpad(path: &Path) -> Result<Scratchpad, HarnessError> {
  let text = fs::read_to_string(path).map_err(|source| HarnessError::IoFailure {
    stage: "reading the scratchpad file",
    source
  })?;
  Scratchpad::decode(text.lines())
}

fn store_scratchpad(scratchpad: &Scratchpad, path: &Path) -> Result<(), HarnessError> {
  let io_failure = |source| HarnessError::IoFailure {
    stage: "writing the scratchpad file",
    source
  };
  let file = File::create(path).map_err(io_failure)?;
  let mut writer = BufWriter::new(file);
  scratchpad.encode(&mut writer).map_err(io_failure)?;
  writer.flush().map_err(io_failure)
}
