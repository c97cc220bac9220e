//! Sequential cross-compilation over a resolved build matrix.
//!
//! For each `(os, arch)` pair the [`Executor`] invokes the external compiler
//! once, with the target encoded as environment variables, and reports a
//! [`BuildOutcome`] as soon as the subprocess exits. A failed pair never stops
//! the pairs after it.
//!
//! Process spawning sits behind the [`CommandRunner`] trait so the loop can be
//! exercised without a real toolchain.

pub mod error;
pub mod executor;
pub mod output;
pub mod runner;

pub use error::{ExecError, Result};
pub use executor::{BuildOutcome, ExecConfig, Executor};
pub use output::output_path;
pub use runner::{CommandRunner, Invocation, ProcessRunner, RunOutput};
