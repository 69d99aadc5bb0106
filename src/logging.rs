//! Diagnostic logging for the generated host.
//!
//! Lifecycle diagnostics (resolved interpreter path, relay channel name, each
//! resource request) go to standard output and only when the caller passed
//! `-verbose`. Without the flag only warnings and errors surface, so the
//! wrapped command's own output stays clean.

use tracing_subscriber::filter::LevelFilter;

/// Install the process-wide subscriber. Must run before any lifecycle
/// logging; calling it twice (tests) is a no-op.
pub fn init(verbose: bool) {
    let filter = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .compact()
        .with_max_level(filter)
        .try_init();
}
