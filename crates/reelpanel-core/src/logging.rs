//! Logging setup.
//!
//! `RUST_LOG` takes precedence when set; otherwise the `-v` count picks the
//! level for the reelpanel crates.

use tracing_subscriber::EnvFilter;

/// Map a `-v` count to a filter directive.
pub fn filter_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "reelpanel=info,reelpanel_core=info,warn",
        2 => "reelpanel=debug,reelpanel_core=debug,info",
        _ => "trace",
    }
}

/// Install the global tracing subscriber. Logs go to stderr so command
/// output on stdout stays machine readable.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for_verbosity(verbosity)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_for_verbosity() {
        assert_eq!(filter_for_verbosity(0), "warn");
        assert!(filter_for_verbosity(1).contains("reelpanel_core=info"));
        assert!(filter_for_verbosity(2).contains("reelpanel=debug"));
        assert_eq!(filter_for_verbosity(3), "trace");
        assert_eq!(filter_for_verbosity(9), "trace");
    }

    #[test]
    fn test_filters_parse() {
        for v in 0..4 {
            assert!(EnvFilter::try_new(filter_for_verbosity(v)).is_ok());
        }
    }
}
