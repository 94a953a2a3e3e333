//! Interactive loop.
//!
//! Single-line by default: every line is evaluated on its own. Typing
//! `multi` switches to multi-line mode, where input is gathered until an
//! empty line; `single` switches back. Bindings persist between inputs.

use std::io::{self, BufRead, Write};

use pangaea_eval::Interpreter;

use super::run::eval_in;
use crate::CliError;

const PROMPT: &str = ">>> ";
const CONTINUATION: &str = "... ";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Single,
    Multi,
}

/// Run the REPL on `input` until it is exhausted, echoing results to `out`.
///
/// The interpreter's own `IO` handles serve `p` and `<>` inside scripts.
pub fn run_repl(interp: &Interpreter, input: impl BufRead, mut out: impl Write) -> io::Result<()> {
    let env = interp.global_env();
    let mut mode = Mode::Single;
    let mut pending = String::new();
    let mut lines = input.lines();

    loop {
        let prompt = if pending.is_empty() { PROMPT } else { CONTINUATION };
        write!(out, "{prompt}")?;
        out.flush()?;
        let Some(line) = lines.next().transpose()? else {
            writeln!(out)?;
            return Ok(());
        };

        match (mode, line.trim()) {
            (Mode::Single, "multi") => {
                mode = Mode::Multi;
                writeln!(out, "switched to multi-line mode")?;
                continue;
            }
            (Mode::Multi, "single") if pending.is_empty() => {
                mode = Mode::Single;
                writeln!(out, "switched to single-line mode")?;
                continue;
            }
            (Mode::Single, "") => continue,
            (Mode::Multi, "") => {}
            (Mode::Single, _) => pending = line,
            (Mode::Multi, _) => {
                pending.push_str(&line);
                pending.push('\n');
                continue;
            }
        }
        if pending.trim().is_empty() {
            pending.clear();
            continue;
        }

        let source = std::mem::take(&mut pending);
        match eval_in(interp, &env, "<repl>", &source) {
            Ok(value) => writeln!(out, "{}", value.inspect())?,
            Err(CliError::Runtime(e)) => writeln!(out, "{}", e.report())?,
            Err(e) => writeln!(out, "{e}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pangaea_eval::IoHandles;
    use pretty_assertions::assert_eq;

    fn session(input: &str) -> String {
        let interp = Interpreter::builder().io(IoHandles::buffered("")).build();
        let mut out = Vec::new();
        if let Err(e) = run_repl(&interp, input.as_bytes(), &mut out) {
            panic!("repl failed: {e}");
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    #[test]
    fn test_single_line_echoes_repr() {
        assert_eq!(session("1 + 2\n\"a\"\n"), ">>> 3\n>>> \"a\"\n>>> \n");
    }

    #[test]
    fn test_bindings_persist() {
        assert_eq!(session("a := 2\na * 3\n"), ">>> 2\n>>> 6\n>>> \n");
    }

    #[test]
    fn test_multi_line_until_blank() {
        let out = session("multi\na := 3\na * 2\n\nsingle\n5\n");
        assert_eq!(
            out,
            ">>> switched to multi-line mode\n\
             >>> ... ... 6\n\
             >>> switched to single-line mode\n\
             >>> 5\n\
             >>> \n"
        );
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let out = session("nope\n1\n");
        assert!(out.starts_with(">>> NameErr: "), "{out}");
        assert!(out.ends_with(">>> 1\n>>> \n"), "{out}");
    }
}
