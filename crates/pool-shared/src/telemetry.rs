//! Telemetry setup

use tracing::Subscriber;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::TelemetrySettings;
use crate::error::AppError;

const LOG_FILE: &str = "pool-server.log";
const ERROR_LOG_FILE: &str = "pool-server-error.log";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Installs the global subscriber.
///
/// The returned guards flush the file writers on drop and must be held for
/// the lifetime of the process when `log_dir` is configured.
pub fn init_telemetry(settings: &TelemetrySettings) -> Result<Vec<WorkerGuard>, AppError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.filter));

    let stdout_layer = if settings.json {
        fmt::layer().json().boxed()
    } else {
        fmt::layer().with_target(true).boxed()
    };

    let (file_layers, guards) = match settings.log_dir.as_deref() {
        Some(dir) => file_layers(dir),
        None => (Vec::new(), Vec::new()),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layers)
        .try_init()
        .map_err(|e| AppError::TelemetryError(e.to_string()))?;

    tracing::debug!("Telemetry initialized (filter: {})", settings.filter);
    Ok(guards)
}

/// Daily-rolling JSON files under `dir`: everything that passes the global
/// filter, plus a second file holding only ERROR events.
fn file_layers<S>(dir: &str) -> (Vec<BoxedLayer<S>>, Vec<WorkerGuard>)
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, LOG_FILE));
    let (error_writer, error_guard) = tracing_appender::non_blocking(rolling::daily(dir, ERROR_LOG_FILE));

    let layers = vec![
        fmt::layer().json().with_ansi(false).with_writer(writer).boxed(),
        fmt::layer()
            .json()
            .with_ansi(false)
            .with_writer(error_writer)
            .with_filter(LevelFilter::ERROR)
            .boxed(),
    ];
    (layers, vec![guard, error_guard])
}
