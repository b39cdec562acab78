use crate::error::ConfigError;
use indexmap::IndexMap;
use std::str::FromStr;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
};

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: Level::INFO,
            format: LogFormat::Compact,
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidParameter(format!(
                "Unknown log format: {}. Use 'compact', 'pretty' or 'json'",
                s
            ))),
        }
    }
}

/// Plain `log` output for the command line, honouring `RUST_LOG`
pub fn init_simple_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}

/// Initialize structured logging through a tracing subscriber.
/// `log` records from the commands are forwarded to the same subscriber.
pub fn init_logging(config: LogConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive(config.level.into());

    let fmt_layer = match config.format {
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Times one command and logs its start and completion
pub struct OperationLogger {
    operation_id: String,
    start_time: Instant,
    metadata: IndexMap<String, String>,
}

impl OperationLogger {
    pub fn new(operation_id: impl Into<String>) -> Self {
        let operation_id = operation_id.into();
        tracing::info!(operation_id = %operation_id, "Operation started");

        OperationLogger {
            operation_id,
            start_time: Instant::now(),
            metadata: IndexMap::new(),
        }
    }

    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl ToString) {
        self.metadata.insert(key.into(), value.to_string());
    }

    pub fn metadata(&self) -> &IndexMap<String, String> {
        &self.metadata
    }

    pub fn log_progress(&self, message: impl AsRef<str>) {
        let elapsed = self.start_time.elapsed();
        tracing::debug!(
            operation_id = %self.operation_id,
            elapsed_ms = elapsed.as_millis() as u64,
            message = %message.as_ref(),
            "Operation progress"
        );
    }

    pub fn log_error(&self, error: &dyn std::error::Error) {
        let elapsed = self.start_time.elapsed();
        tracing::error!(
            operation_id = %self.operation_id,
            elapsed_ms = elapsed.as_millis() as u64,
            error = %error,
            "Operation failed"
        );
    }

    pub fn complete(self) {
        let elapsed = self.start_time.elapsed();
        tracing::info!(
            operation_id = %self.operation_id,
            elapsed_ms = elapsed.as_millis() as u64,
            metadata = ?self.metadata,
            "Operation completed"
        );
    }
}
