#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;
extern crate strum;
#[macro_use] extern crate strum_macros;

mod codec;
mod errors;
mod harness;
mod isa;
mod vm;

use std::path::Path;
use std::process;

use harness::{Harness, PROGRAM_FILE, SCRATCHPAD_FINAL_FILE, SCRATCHPAD_INIT_FILE};
use vm::NopVm;

fn main() {
  env_logger::init();

  #[cfg(feature = "trace_decode")]
  println!("Decode Tracing ENABLED");

  // The stock binary wires in the no-op backend; a build against the real VM
  // substitutes its own `VmBackend` here.
  let harness = Harness::new(NopVm);

  let result = harness.run(
    Path::new(PROGRAM_FILE),
    Path::new(SCRATCHPAD_INIT_FILE),
    Path::new(SCRATCHPAD_FINAL_FILE)
  );

  if let Err(e) = result {
    log::error!("{}", e);
    eprintln!("Error: {}", e);
    process::exit(1);
  }
}
