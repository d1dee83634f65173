//! Tracing initialization.
//!
//! Outside of tests, logs go to stderr; stdout carries the MCP protocol.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

static INIT: Once = Once::new();

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Initialize tracing with compact output. Safe to call multiple times.
pub fn init() {
    init_with(LogFormat::Compact);
}

/// Initialize tracing with the given format. Only the first call takes effect.
pub fn init_with(format: LogFormat) {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let filter = EnvFilter::from_default_env().add_directive(
            if is_test {
                tracing::Level::DEBUG
            } else {
                tracing::Level::INFO
            }
            .into(),
        );

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE);

        let result = match format {
            _ if is_test => builder.compact().with_test_writer().try_init(),
            LogFormat::Compact => builder.compact().with_writer(std::io::stderr).try_init(),
            LogFormat::Json => builder.json().with_writer(std::io::stderr).try_init(),
        };
        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {}", e)
        }
    });
}
