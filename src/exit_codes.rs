//! Exit code constants for n8n-launch.
//!
//! When the child runs, its own exit code is relayed verbatim, so these
//! constants only describe what the supervisor itself decides:
//! - 0: Success (child exited with 0)
//! - 1: Launch failure (child never started) or the OS wait failed
//! - 78: Launcher config could not be loaded (EX_CONFIG from sysexits.h)
//! - 128+N: Child was terminated by signal N

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// The child process could not be started.
pub const LAUNCH_FAILURE: i32 = 1;

/// The launcher config file is unreadable or invalid.
pub const CONFIG_ERROR: i32 = 78;

/// Base for signal terminations; also used when the OS reports neither a
/// code nor a signal.
pub const SIGNAL_BASE: i32 = 128;

/// Largest status a Unix process can report to its parent.
pub const MAX_STATUS: i32 = 255;

/// Exit status for a child killed by `signal`, following the shell
/// convention of `128 + signal`.
pub fn for_signal(signal: i32) -> i32 {
    (SIGNAL_BASE + signal.max(0)).min(MAX_STATUS)
}
