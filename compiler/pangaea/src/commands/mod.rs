//! Driver commands: run a script or one-liner, the REPL, the test runner.

mod repl;
mod run;
mod test;

pub use repl::run_repl;
pub use run::{eval_in, run_file, run_one_liner, wrap_source, LineMode};
pub use test::{discover_tests, run_tests, TestOutcome, TestSummary};

use std::path::Path;

use crate::CliError;

/// Read a script, mapping IO failures to [`CliError::Read`].
pub fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
