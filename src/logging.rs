use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

const DEFAULT_LOG_FILTER: &str = "warn,helpdesk=info";
const DEFAULT_LOG_FILE_PATH: &str = "logs/helpdesk.log";

type SubscriberError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("LOG_OUTPUT={mode}: failed to open log file '{}': {source}", path.display())]
    LogFile {
        mode: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to install log subscriber: {0}")]
    Subscriber(#[source] SubscriberError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogOutput {
    Stderr,
    File,
    Both,
}

impl LogOutput {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Stderr => "stderr",
            Self::File => "file",
            Self::Both => "both",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    format: LogFormat,
    output: LogOutput,
    file_path: PathBuf,
}

impl LogSettings {
    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Self {
        let format = match normalized(get_var("LOG_FORMAT")).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        let output = match normalized(get_var("LOG_OUTPUT")).as_deref() {
            Some("file") => LogOutput::File,
            Some("both") => LogOutput::Both,
            _ => LogOutput::Stderr,
        };
        let file_path = get_var("LOG_FILE_PATH")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_PATH));

        Self {
            format,
            output,
            file_path,
        }
    }
}

fn normalized(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_ascii_lowercase())
}

/// Opens the daily-rotated file appender, creating its directory first.
fn file_writer(
    mode: LogOutput,
    path: &Path,
) -> Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard), LoggingError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("helpdesk.log"));

    fs::create_dir_all(dir).map_err(|source| LoggingError::LogFile {
        mode: mode.as_str(),
        path: path.to_path_buf(),
        source,
    })?;
    let appender = tracing_appender::rolling::daily(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

fn make_writer(
    settings: &LogSettings,
) -> Result<(BoxMakeWriter, Option<WorkerGuard>), LoggingError> {
    match settings.output {
        LogOutput::Stderr => Ok((BoxMakeWriter::new(std::io::stderr), None)),
        LogOutput::File => {
            let (writer, guard) = file_writer(settings.output, &settings.file_path)?;
            Ok((BoxMakeWriter::new(writer), Some(guard)))
        }
        LogOutput::Both => {
            let (writer, guard) = file_writer(settings.output, &settings.file_path)?;
            Ok((BoxMakeWriter::new(std::io::stderr.and(writer)), Some(guard)))
        }
    }
}

fn install(format: LogFormat, writer: BoxMakeWriter) -> Result<(), LoggingError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let result = match format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(writer)
            .try_init(),
    };
    result.map_err(LoggingError::Subscriber)
}

/// Installs the global subscriber from `LOG_FORMAT`, `LOG_OUTPUT`,
/// `LOG_FILE_PATH` and `RUST_LOG`. An unusable log file falls back to
/// stderr. Keep the returned guard alive so file output gets flushed.
pub fn init() -> Option<WorkerGuard> {
    let settings = LogSettings::from_env_with(|key| env::var(key).ok());

    let (writer, guard) = match make_writer(&settings) {
        Ok(parts) => parts,
        Err(err) => {
            eprintln!("helpdesk: {err}; using stderr instead");
            (BoxMakeWriter::new(std::io::stderr), None)
        }
    };

    match install(settings.format, writer) {
        Ok(()) => guard,
        Err(err) => {
            eprintln!("helpdesk: {err}");
            None
        }
    }
}
