//! Diagnostic logging setup.
//!
//! Diagnostics go to stderr so they never mix with the child's stdout.
//! `N8N_LAUNCH_LOG` takes an `EnvFilter` directive and wins over `-v`.

use std::ffi::OsStr;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "N8N_LAUNCH_LOG";

/// Default filter directive for a `-v` count.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Pick the filter from the `N8N_LAUNCH_LOG` value, falling back to the
/// `-v` default.
///
/// The second element describes why a value that was set got rejected.
fn select_filter(raw: Option<&OsStr>, verbose: u8) -> (EnvFilter, Option<String>) {
    let fallback = || EnvFilter::new(default_directive(verbose));

    let Some(raw) = raw else {
        return (fallback(), None);
    };
    let Some(directive) = raw.to_str() else {
        return (fallback(), Some("value is not valid UTF-8".to_string()));
    };

    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(e) => (fallback(), Some(e.to_string())),
    }
}

pub fn init(verbose: u8) {
    let raw = std::env::var_os(LOG_ENV);
    let (filter, rejected) = select_filter(raw.as_deref(), verbose);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Some(reason) = rejected {
        tracing::warn!(
            "ignoring {}: {}; using '{}'",
            LOG_ENV,
            reason,
            default_directive(verbose)
        );
    }
}
