//! Logging setup for the Sanmoku binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are shown at the default level.
const WORKSPACE_CRATES: [&str; 3] = ["sanmoku_shared", "sanmoku_server", "sanmoku_client"];

/// Build the default filter directive for the given binary.
///
/// Every workspace crate plus the binary itself is set to `default_log_level`;
/// everything else (hyper, tungstenite, ...) stays at the subscriber's default.
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let mut targets: Vec<String> = WORKSPACE_CRATES.iter().map(|c| c.to_string()).collect();
    if !targets.contains(&binary_target) {
        targets.push(binary_target);
    }
    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber.
///
/// The filter can be overridden with the `RUST_LOG` environment variable.
///
/// # Examples
///
/// ```no_run
/// use sanmoku_shared::logger::setup_logger;
///
/// setup_logger("sanmoku-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
