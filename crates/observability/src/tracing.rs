//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Output shape for log lines.
///
/// `Compact` suits a developer console; `Json` feeds log collectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Initialize tracing/logging for the process with the defaults: compact
/// output, `info` unless `RUST_LOG` says otherwise.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with(LogFormat::default(), "info");
}

/// Initialize with an explicit format and fallback filter.
///
/// `RUST_LOG` still wins when set; `fallback_filter` applies when it is
/// absent or unparsable. Safe to call multiple times.
pub fn init_with(format: LogFormat, fallback_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    match format {
        LogFormat::Compact => {
            let _ = builder.compact().try_init();
        }
        LogFormat::Json => {
            let _ = builder.json().try_init();
        }
    }
}
