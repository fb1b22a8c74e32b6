//! Structured logging setup.

use crate::error::{EvalError, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const CRATE_TARGET: &str = "rust_qa_judge";

/// Filter directives for the CLI flags. `level` wins over `verbose`; a bare
/// level applies to this crate and the HTTP trace layer only.
pub fn filter_directives(verbose: bool, level: Option<&str>) -> String {
    let level = match (verbose, level) {
        (_, Some(level)) => level,
        (true, None) => "debug",
        (false, None) => "info",
    };

    if level.contains('=') {
        level.to_string()
    } else {
        format!("{CRATE_TARGET}={level},tower_http={level}")
    }
}

/// Install the global subscriber. Logs go to stderr.
///
/// `RUST_LOG`, then `QA_JUDGE_LOG`, override the CLI flags.
pub fn init_tracing(verbose: bool, level: Option<&str>, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("QA_JUDGE_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(verbose, level)));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    installed.map_err(|e| EvalError::Config(format!("failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(
            filter_directives(false, None),
            "rust_qa_judge=info,tower_http=info"
        );
        assert_eq!(
            filter_directives(true, None),
            "rust_qa_judge=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_explicit_level_wins() {
        assert_eq!(
            filter_directives(true, Some("warn")),
            "rust_qa_judge=warn,tower_http=warn"
        );
        assert_eq!(filter_directives(false, Some("hyper=trace")), "hyper=trace");
    }

    #[test]
    fn test_directives_parse() {
        for (verbose, level) in [(false, None), (true, None), (false, Some("error"))] {
            let directives = filter_directives(verbose, level);
            assert!(EnvFilter::try_new(&directives).is_ok(), "{}", directives);
        }
    }
}
