//! `pangaea test <path>`: run every `*.pg` script under a path.
//!
//! A script passes when it evaluates without raising; test scripts check
//! their expectations with `assert`, `assertEq` and `assertRaises`. Files run
//! in parallel, each in its own interpreter with buffered IO.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use pangaea_eval::{Interpreter, IoHandles};

use super::read_file;
use super::run::eval_in;
use crate::CliError;

/// Result of one test script.
#[derive(Debug)]
pub struct TestOutcome {
    pub path: PathBuf,
    /// Rendered error when the script failed.
    pub error: Option<String>,
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct TestSummary {
    pub outcomes: Vec<TestOutcome>,
}

impl TestSummary {
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.passed()).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// `*.pg` files under `root` (or `root` itself), sorted by path.
///
/// Hidden entries and `target` directories are skipped.
pub fn discover_tests(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }
    let mut files = Vec::new();
    discover_recursive(root, &mut files);
    files.sort();
    files
}

fn discover_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            if name != "target" {
                discover_recursive(&path, files);
            }
        } else if path.extension().is_some_and(|e| e == "pg") {
            files.push(path);
        }
    }
}

fn run_test_file(path: &Path) -> TestOutcome {
    let error = match read_file(path) {
        Ok(source) => {
            let interp = Interpreter::builder()
                .io(IoHandles::buffered(""))
                .build();
            let env = interp.global_env();
            eval_in(&interp, &env, &path.display().to_string(), &source)
                .err()
                .map(|e| e.to_string())
        }
        Err(e) => Some(e.to_string()),
    };
    TestOutcome {
        path: path.to_path_buf(),
        error,
    }
}

/// Run the scripts under `root`, writing one line per file to `out`.
///
/// Fails with [`CliError::TestsFailed`] when any script raised.
pub fn run_tests(root: &Path, mut out: impl Write) -> Result<TestSummary, CliError> {
    let files = discover_tests(root);
    if files.is_empty() {
        return Err(CliError::Usage(format!(
            "no test files found in `{}`",
            root.display()
        )));
    }
    tracing::debug!(count = files.len(), "running test files");

    let outcomes = rayon::ThreadPoolBuilder::new()
        .stack_size(16 * 1024 * 1024)
        .build()
        .map(|pool| {
            pool.install(|| {
                files
                    .par_iter()
                    .map(|f| run_test_file(f))
                    .collect::<Vec<_>>()
            })
        })
        .unwrap_or_else(|e| {
            tracing::warn!("failed to create thread pool ({e}), running sequentially");
            files.iter().map(|f| run_test_file(f)).collect::<Vec<_>>()
        });
    let summary = TestSummary { outcomes };

    report(&summary, &mut out)?;
    match summary.failed() {
        0 => Ok(summary),
        failed => Err(CliError::TestsFailed {
            failed,
            total: summary.total(),
        }),
    }
}

fn report(summary: &TestSummary, out: &mut impl Write) -> io::Result<()> {
    for outcome in &summary.outcomes {
        match &outcome.error {
            None => writeln!(out, "ok  {}", outcome.path.display())?,
            Some(e) => {
                writeln!(out, "FAIL {}", outcome.path.display())?;
                writeln!(out, "{e}")?;
            }
        }
    }
    Ok(())
}
