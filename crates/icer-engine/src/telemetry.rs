//! Tracing setup for the evaluation engine. Log verbosity comes from
//! `RUST_LOG` when set, otherwise from the configured level, so operators can
//! raise verbosity per-process without touching the deployment config.

use std::fmt;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug)]
pub enum TelemetryError {
    /// The configured level string is not a valid filter directive set.
    FilterDirectives {
        directives: String,
        source: ParseError,
    },
    /// A global subscriber was already installed, or installation failed.
    Install(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::FilterDirectives { directives, .. } => {
                write!(f, "log filter directives '{directives}' did not parse")
            }
            TelemetryError::Install(err) => {
                write!(f, "tracing subscriber could not be installed: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::FilterDirectives { source, .. } => Some(source),
            TelemetryError::Install(err) => Some(&**err),
        }
    }
}

/// Install the process-wide subscriber: compact single-line output without
/// ANSI colour or target paths, suitable for container log collection.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(&config.log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::Install)
}

fn env_filter(fallback: &str) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    parse_directives(fallback)
}

fn parse_directives(directives: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directives).map_err(|source| TelemetryError::FilterDirectives {
        directives: directives.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_level_builds_a_filter() {
        parse_directives("info").expect("plain level parses");
        parse_directives("warn,icer_engine=debug").expect("directive list parses");
    }

    #[test]
    fn malformed_directives_are_reported_with_their_text() {
        let err = match parse_directives("icer_engine=debug=extra") {
            Err(err) => err,
            Ok(_) => panic!("directive with two '=' must not parse"),
        };
        assert!(err.to_string().contains("icer_engine=debug=extra"));
    }
}
