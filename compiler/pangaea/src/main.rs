//! Pangaea CLI
//!
//! `pangaea` starts the REPL, `pangaea <path> [args]` runs a script,
//! `pangaea -e <src>` runs a one-liner and `pangaea test <path>` runs the
//! `*.pg` scripts under a path.

use std::io::{self, BufReader};
use std::path::Path;

use pangaea::commands::{run_file, run_one_liner, run_repl, run_tests, LineMode};
use pangaea::tracing_setup::init_tracing;
use pangaea::{CliError, VERSION};
use pangaea_eval::{Interpreter, IoHandles};

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(e) = dispatch(&args) {
        eprintln!("{e}");
        if let CliError::Usage(_) = e {
            print_usage();
        }
        std::process::exit(e.exit_code());
    }
}

fn dispatch(args: &[String]) -> Result<(), CliError> {
    let Some(first) = args.first() else {
        return repl();
    };

    match first.as_str() {
        "test" => {
            let Some(path) = args.get(1) else {
                return Err(CliError::Usage("missing test path".into()));
            };
            run_tests(Path::new(path), io::stdout().lock()).map(|_| ())
        }
        "-v" | "--version" => {
            println!("{VERSION}");
            Ok(())
        }
        "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        "-e" | "-n" | "-p" => one_liner(args),
        flag if flag.starts_with('-') => Err(CliError::Usage(format!("unknown option `{flag}`"))),
        path => run_file(Path::new(path), args[1..].to_vec()),
    }
}

/// `[-n|-p] -e <src> [args...]`.
fn one_liner(args: &[String]) -> Result<(), CliError> {
    let mut mode = LineMode::Whole;
    let mut src = None;
    let mut rest = args.iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "-n" => mode = LineMode::EachLine,
            "-p" => mode = LineMode::EachLineAndPrint,
            "-e" => {
                src = rest.next();
                break;
            }
            other => return Err(CliError::Usage(format!("unexpected argument `{other}`"))),
        }
    }
    let Some(src) = src else {
        return Err(CliError::Usage("`-e` requires a script".into()));
    };
    run_one_liner(src, mode, rest.cloned().collect())
}

fn repl() -> Result<(), CliError> {
    let interp = Interpreter::builder().io(IoHandles::stdio()).build();
    println!("Pangaea {VERSION}");
    // unlocked between reads so `<>` inside the session can read stdin too
    run_repl(&interp, BufReader::new(io::stdin()), io::stdout())?;
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: pangaea [options] [path [args...]]");
    eprintln!();
    eprintln!("  pangaea                start the REPL");
    eprintln!("  pangaea <path>         run the script at <path>");
    eprintln!("  pangaea -e <src>       run a one-line script");
    eprintln!("  pangaea -n -e <src>    run <src> for each stdin line, bound to `\\`");
    eprintln!("  pangaea -p -e <src>    like -n, printing each result");
    eprintln!("  pangaea test <path>    run every *.pg script under <path>");
    eprintln!("  pangaea -v             print the version");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG               log filter, e.g. pangaea_eval=debug");
    eprintln!("  PANGAEA_LOG_TREE=1     show logs as an indented span tree");
}
