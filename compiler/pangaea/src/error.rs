use std::path::PathBuf;

use pangaea_eval::EvalError;

/// Everything that makes the driver exit with a nonzero status.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A rendered syntax error report.
    #[error("{0}")]
    Syntax(String),
    #[error("{}", .0.report())]
    Runtime(EvalError),
    #[error("{failed} of {total} test files failed")]
    TestsFailed { failed: usize, total: usize },
    #[error("cannot write output: {0}")]
    Write(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pangaea_eval::errors::value_err;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_runtime_error_prints_report() {
        let e = CliError::Runtime(value_err("bad"));
        assert_eq!(e.to_string(), "ValueErr: bad");
        assert_eq!(e.exit_code(), 1);
    }

    #[test]
    fn test_usage_exit_code() {
        assert_eq!(CliError::Usage("x".into()).exit_code(), 2);
    }
}
