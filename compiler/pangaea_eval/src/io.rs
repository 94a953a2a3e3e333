//! Script-visible input and output.
//!
//! `IO` in a script is a pair of handles: the reader behind `<>` and the
//! writer behind `p`. The CLI uses the process stdio; tests and embedders use
//! in-memory buffers so output can be inspected afterwards.
//!
//! Enum dispatch rather than trait objects: there are only two backends.

use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::rc::Rc;

use parking_lot::Mutex;

/// Where `p` writes.
pub enum Output {
    Stdout,
    Buffer(Mutex<String>),
}

impl Output {
    pub fn write(&self, text: &str) {
        match self {
            Output::Stdout => {
                let mut out = std::io::stdout().lock();
                // a closed stdout (e.g. `| head`) must not abort the script
                if out.write_all(text.as_bytes()).is_ok() {
                    let _ = out.flush();
                }
            }
            Output::Buffer(buf) => buf.lock().push_str(text),
        }
    }

    /// Captured text; empty for stdout.
    pub fn contents(&self) -> String {
        match self {
            Output::Stdout => String::new(),
            Output::Buffer(buf) => buf.lock().clone(),
        }
    }
}

/// Where `<>` reads lines from.
pub enum Input {
    Stdin,
    Buffer(Mutex<VecDeque<String>>),
}

impl Input {
    /// Next line without its terminator; `None` at end of input.
    pub fn read_line(&self) -> Option<String> {
        match self {
            Input::Stdin => {
                let mut line = String::new();
                match std::io::stdin().lock().read_line(&mut line) {
                    Ok(0) | Err(_) => None,
                    Ok(_) => {
                        let trimmed = line.trim_end_matches(['\n', '\r']).len();
                        line.truncate(trimmed);
                        Some(line)
                    }
                }
            }
            Input::Buffer(lines) => lines.lock().pop_front(),
        }
    }
}

/// Reader and writer shared by every `IO` value of one interpreter.
#[derive(Clone)]
pub struct IoHandles {
    input: Rc<Input>,
    output: Rc<Output>,
}

impl IoHandles {
    /// Process stdin and stdout.
    pub fn stdio() -> Self {
        IoHandles {
            input: Rc::new(Input::Stdin),
            output: Rc::new(Output::Stdout),
        }
    }

    /// In-memory handles: `input` is split into lines; output is captured.
    pub fn buffered(input: &str) -> Self {
        IoHandles {
            input: Rc::new(Input::Buffer(Mutex::new(
                input.lines().map(str::to_string).collect(),
            ))),
            output: Rc::new(Output::Buffer(Mutex::new(String::new()))),
        }
    }

    pub fn write(&self, text: &str) {
        self.output.write(text);
    }

    pub fn read_line(&self) -> Option<String> {
        self.input.read_line()
    }

    /// Everything written so far (buffered handles only).
    pub fn output(&self) -> String {
        self.output.contents()
    }
}

impl Default for IoHandles {
    fn default() -> Self {
        IoHandles::stdio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_buffered_output_captures_writes() {
        let io = IoHandles::buffered("");
        io.write("hello");
        io.write("\n");
        assert_eq!(io.output(), "hello\n");
    }

    #[test]
    fn test_buffered_input_yields_lines_then_none() {
        let io = IoHandles::buffered("a\nb\n");
        assert_eq!(io.read_line(), Some("a".to_string()));
        assert_eq!(io.read_line(), Some("b".to_string()));
        assert_eq!(io.read_line(), None);
    }

    #[test]
    fn test_clones_share_buffers() {
        let io = IoHandles::buffered("x");
        let other = io.clone();
        other.write("out");
        assert_eq!(io.output(), "out");
        assert_eq!(io.read_line(), Some("x".to_string()));
        assert_eq!(other.read_line(), None);
    }
}
