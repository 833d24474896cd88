/*!
  The error taxonomy of the harness. Every error here is fatal: the run aborts
  at the point of detection, no retries, no partial-result salvage. A golden
  fixture that is partially correct is worse than no fixture, so the output
  file must never be trusted unless the process exited with status zero.
*/

use thiserror::Error;

/// A fixed-width hex field that could not be decoded.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ParseError {
  #[error("expected {expected} hex characters, found {found}")]
  WrongWidth {
    expected: usize,
    found: usize
  },

  #[error("{0:?} is not a hex digit")]
  NotHexDigit(char),
}

/// An error raised by the external VM collaborator. The harness does not
/// interpret it beyond attributing it to the compile or execute phase.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{0}")]
pub struct VmError(pub String);

/// Top-level error type. The display text names the failing stage, which is
/// all a caller regenerating golden fixtures needs to know.
#[derive(Debug, Error)]
pub enum HarnessError {
  #[error("malformed instruction on line {line}: {source}")]
  MalformedInstructionLine {
    line: usize,
    source: ParseError
  },

  #[error("program overflow: more than {capacity} instructions supplied")]
  ProgramOverflow {
    capacity: usize
  },

  #[error("malformed scratchpad data on line {line}: {source}")]
  MalformedScratchpadLine {
    line: usize,
    source: ParseError
  },

  #[error("scratchpad size mismatch: {found} lines supplied, expected exactly {expected}")]
  SizeMismatch {
    expected: usize,
    found: usize
  },

  #[error("program compilation failed: {0}")]
  CompileFailure(#[source] VmError),

  #[error("program execution failed: {0}")]
  ExecuteFailure(#[source] VmError),

  #[error("{stage} failed: {source}")]
  IoFailure {
    stage: &'static str,
    #[source]
    source: std::io::Error
  },
}
