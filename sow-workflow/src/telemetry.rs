//! Diagnostic logging setup
//!
//! Progress for humans goes to stdout and structured progress events to
//! stderr through the SDK sinks; `tracing` output also goes to stderr so it
//! never mixes with console progress lines.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber.
///
/// Priority: `RUST_LOG` > `log_level` > "warn". Pretty output in debug
/// builds, JSON lines in release builds. Calling it twice is a no-op.
pub fn init_telemetry_with_level(log_level: &str) {
    let level = if log_level.trim().is_empty() {
        "warn"
    } else {
        log_level
    };
    let default_filter = format!(
        "{level},sow_workflow={level},agent_chat_sdk={level}",
        level = level
    );

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    #[cfg(debug_assertions)]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .ok();
    }
}
