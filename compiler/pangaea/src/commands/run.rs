//! `pangaea <path>` and `pangaea -e <src>`.

use std::path::Path;

use pangaea_eval::{Env, Interpreter, IoHandles, Value};

use super::read_file;
use crate::diagnostic::render_parse_error;
use crate::CliError;

/// How a one-liner treats stdin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineMode {
    /// Run the source once.
    #[default]
    Whole,
    /// `-n`: run it once per stdin line, with the line bound to `\`.
    EachLine,
    /// `-p`: like `-n`, printing every non-nil result.
    EachLineAndPrint,
}

/// Wrap a one-liner so it runs in `mode`.
pub fn wrap_source(src: &str, mode: LineMode) -> String {
    match mode {
        LineMode::Whole => src.to_string(),
        LineMode::EachLine => format!("<>@{{||\n{src}\n}}"),
        LineMode::EachLineAndPrint => format!("<>@{{||\n{src}\n}}@p"),
    }
}

/// Parse and evaluate `source` in `env`; `name` labels syntax errors.
pub fn eval_in(
    interp: &Interpreter,
    env: &Env,
    name: &str,
    source: &str,
) -> Result<Value, CliError> {
    let program = pangaea_parse::parse(source)
        .map_err(|e| CliError::Syntax(render_parse_error(name, source, &e)))?;
    interp.eval_program(&program, env).map_err(CliError::Runtime)
}

fn run_source(name: &str, source: &str, argv: Vec<String>) -> Result<(), CliError> {
    let interp = Interpreter::builder()
        .io(IoHandles::stdio())
        .argv(argv)
        .build();
    let env = interp.global_env();
    eval_in(&interp, &env, name, source).map(|_| ())
}

pub fn run_one_liner(src: &str, mode: LineMode, argv: Vec<String>) -> Result<(), CliError> {
    run_source("-e", &wrap_source(src, mode), argv)
}

pub fn run_file(path: &Path, argv: Vec<String>) -> Result<(), CliError> {
    let source = read_file(path)?;
    tracing::debug!(path = %path.display(), len = source.len(), "running script");
    run_source(&path.display().to_string(), &source, argv)
}
