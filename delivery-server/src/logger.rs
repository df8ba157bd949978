//! Logging Infrastructure
//!
//! Console logging in text or JSON, plus an optional daily rotating file.
//! `RUST_LOG` overrides the default filter.

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

use crate::error::BoxError;

pub const DEFAULT_FILTER: &str = "delivery_server=info,tower_http=info";

/// Initialize the global subscriber
///
/// # Arguments
/// * `json_format` - JSON lines (production) instead of text (development)
/// * `log_dir` - Optional directory for daily rotated `delivery.YYYY-MM-DD` files
pub fn init_logger(json_format: bool, log_dir: Option<&str>) -> Result<(), BoxError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let file_layer = match log_dir {
        Some(dir) => {
            let dir = Path::new(dir);
            fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, "delivery");
            let layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(appender));
            Some(if json_format { layer.json().boxed() } else { layer.boxed() })
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
