//! Logging infrastructure using `tracing` and `tracing-subscriber`.
//!
//! Every event goes to two sinks: stderr and a size-rotated file in the
//! log directory. Both share the layout and the UTC timestamp pattern
//! from `logging_config.yaml`.
//!
//! `logs_formatter` is usually a line template such as
//! `%(asctime)s - %(name)s - %(levelname)s - %(message)s`, rendered by
//! [`TemplateFormat`]. The keywords `full`, `compact` and `json` select
//! the stock `tracing-subscriber` layouts instead.
//!
//! # Log Levels
//!
//! - `error`: A pipeline stage failed
//! - `warn`: Skipped renames, cleanup problems
//! - `info`: Stage progress, row counts, the written output
//! - `debug`: Loaded configuration documents, applied renames
//!
//! # Usage
//!
//! ```ignore
//! use etl_cli::logging::{LogConfig, init_logging};
//!
//! let config = LogConfig::from_settings(&settings, &log_dir)?;
//! init_logging(&config)?;
//! ```

use std::fmt::{self as std_fmt, Write as _};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use thiserror::Error;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{
        self, FmtContext, FormatEvent, FormatFields, MakeWriter, format::Writer,
        time::FormatTime,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use etl_config::{
    FileHandlerSettings, FileMode, LayoutError, LineField, LineTemplate, LogLayout, LogLevel,
    LoggingSettings, Padding, Segment,
};

static LOGGING_INITIALIZED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("logging is already initialized")]
    AlreadyInitialized,

    #[error("failed to create log directory: {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open log file: {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid logs_formatter")]
    Layout(#[from] LayoutError),

    #[error("failed to install the global subscriber: {message}")]
    Subscriber { message: String },
}

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level used when `RUST_LOG` is not set.
    pub level: Level,
    /// Line layout shared by both sinks.
    pub format: LogLayout,
    /// strftime pattern for timestamps, rendered in UTC.
    pub time_format: String,
    /// Log file path. When `None`, only stderr receives events.
    pub log_file: Option<PathBuf>,
    /// Open mode and rotation of the log file.
    pub file_handler: FileHandlerSettings,
    /// Whether to use ANSI colors on stderr.
    pub with_ansi: bool,
    /// Whether to include the target (module path) in log lines.
    pub with_target: bool,
}

impl LogConfig {
    /// Builds the configuration for `settings`, placing the log file in `log_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::Layout`] when `logs_formatter` is not a
    /// valid template.
    pub fn from_settings(
        settings: &LoggingSettings,
        log_dir: &Path,
    ) -> Result<Self, LoggingError> {
        Ok(Self {
            level: level_for(settings.level),
            format: settings.layout()?,
            time_format: settings.time_formatter.clone(),
            log_file: Some(log_dir.join(&settings.file_name)),
            file_handler: settings.file_handler,
            with_ansi: true,
            with_target: true,
        })
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

fn level_for(level: LogLevel) -> Level {
    match level {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

/// Initialize the global tracing subscriber with the given configuration.
///
/// Creates the log directory when needed.
///
/// # Errors
///
/// Returns [`LoggingError::AlreadyInitialized`] on every call after the
/// first successful one, and an I/O error when the log file cannot be
/// opened.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    if LOGGING_INITIALIZED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(LoggingError::AlreadyInitialized);
    }
    let result = install(config);
    if result.is_err() {
        LOGGING_INITIALIZED.store(false, Ordering::Release);
    }
    result
}

fn install(config: &LogConfig) -> Result<(), LoggingError> {
    let timer = UtcTime::new(&config.time_format);
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(fmt_layer(
        config,
        timer.clone(),
        io::stderr,
        config.with_ansi,
    ));
    if let Some(path) = &config.log_file {
        let writer = RotatingFileWriter::open(path, config.file_handler)?;
        layers.push(fmt_layer(config, timer, writer, false));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(build_env_filter(config.level))
        .try_init()
        .map_err(|e| LoggingError::Subscriber {
            message: e.to_string(),
        })
}

fn fmt_layer<W>(
    config: &LogConfig,
    timer: UtcTime,
    writer: W,
    ansi: bool,
) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer);
    match &config.format {
        LogLayout::Template(template) => layer
            .with_ansi(false)
            .event_format(TemplateFormat::new(template.clone(), timer))
            .boxed(),
        LogLayout::Full => layer
            .with_timer(timer)
            .with_target(config.with_target)
            .with_ansi(ansi)
            .boxed(),
        LogLayout::Compact => layer
            .compact()
            .with_timer(timer)
            .with_target(config.with_target)
            .with_ansi(ansi)
            .boxed(),
        LogLayout::Json => layer
            .json()
            .with_timer(timer)
            .with_target(config.with_target)
            .with_ansi(false)
            .boxed(),
    }
}

/// Renders each event through a [`LineTemplate`].
///
/// `%(message)s` carries the event message followed by its fields.
#[derive(Debug, Clone)]
pub struct TemplateFormat {
    template: LineTemplate,
    timer: UtcTime,
}

impl TemplateFormat {
    pub fn new(template: LineTemplate, timer: UtcTime) -> Self {
        Self { template, timer }
    }
}

impl<S, N> FormatEvent<S, N> for TemplateFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std_fmt::Result {
        let metadata = event.metadata();
        let mut message = String::new();
        ctx.format_fields(Writer::new(&mut message), event)?;

        let mut value = String::new();
        for segment in self.template.segments() {
            let (field, padding) = match segment {
                Segment::Literal(text) => {
                    writer.write_str(text)?;
                    continue;
                }
                Segment::Field { field, padding } => (*field, *padding),
            };
            value.clear();
            match field {
                LineField::Time => self.timer.format_time(&mut Writer::new(&mut value))?,
                LineField::Level => value.push_str(level_name(metadata.level())),
                LineField::Target => value.push_str(metadata.target()),
                LineField::Message => value.push_str(&message),
                LineField::Module => value.push_str(metadata.module_path().unwrap_or_default()),
                LineField::File => {
                    if let Some(file) = metadata.file() {
                        value.push_str(base_name(file));
                    }
                }
                LineField::Line => {
                    if let Some(line) = metadata.line() {
                        write!(value, "{line}")?;
                    }
                }
            }
            write_padded(&mut writer, &value, padding)?;
        }
        writeln!(writer)
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        _ => "TRACE",
    }
}

fn base_name(file: &str) -> &str {
    Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file)
}

fn write_padded(writer: &mut Writer<'_>, value: &str, padding: Option<Padding>) -> std_fmt::Result {
    match padding {
        Some(Padding {
            width,
            left_align: true,
        }) => write!(writer, "{value:<width$}"),
        Some(Padding {
            width,
            left_align: false,
        }) => write!(writer, "{value:>width$}"),
        None => writer.write_str(value),
    }
}

/// Build an `EnvFilter` from the given level, respecting `RUST_LOG` env var.
fn build_env_filter(level: Level) -> EnvFilter {
    let level_str = level.as_str().to_lowercase();

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Dependencies stay at warn.
        EnvFilter::new(format!(
            "warn,client_etl={level},etl_cli={level},etl_config={level},\
             etl_ingest={level},etl_transform={level},etl_output={level}",
            level = level_str
        ))
    })
}

/// Timestamps in UTC, formatted with a strftime pattern.
#[derive(Debug, Clone)]
pub struct UtcTime {
    pattern: String,
}

impl UtcTime {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
        }
    }
}

impl FormatTime for UtcTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std_fmt::Result {
        write!(w, "{}", Utc::now().format(&self.pattern))
    }
}

/// Log file that is rotated by size.
///
/// Before a write would take the file past `max_bytes`, the file is
/// renamed to `<name>.1`, older backups shift up by one and
/// `<name>.<backup_count>` is discarded.
#[derive(Clone)]
pub struct RotatingFileWriter {
    inner: Arc<Mutex<RotatingFile>>,
}

struct RotatingFile {
    path: PathBuf,
    file: File,
    size: u64,
    settings: FileHandlerSettings,
}

impl RotatingFileWriter {
    /// Opens (or creates) the file at `path` and its parent directory.
    pub fn open(path: &Path, settings: FileHandlerSettings) -> Result<Self, LoggingError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LoggingError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let open_err = |source| LoggingError::OpenFile {
            path: path.to_path_buf(),
            source,
        };
        let file = open_log_file(path, settings.effective_mode()).map_err(open_err)?;
        let size = file.metadata().map_err(open_err)?.len();
        Ok(Self {
            inner: Arc::new(Mutex::new(RotatingFile {
                path: path.to_path_buf(),
                file,
                size,
                settings,
            })),
        })
    }
}

fn open_log_file(path: &Path, mode: FileMode) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        FileMode::Append => options.append(true),
        FileMode::Truncate => options.write(true).truncate(true),
    };
    options.open(path)
}

fn backup_path(path: &Path, index: u32) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

impl RotatingFile {
    fn should_rotate(&self, incoming: usize) -> bool {
        self.settings.rotation_enabled()
            && self.size > 0
            && self.size + incoming as u64 > self.settings.max_bytes
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let count = self.settings.backup_count;
        for index in (1..count).rev() {
            let source = backup_path(&self.path, index);
            if source.exists() {
                fs::rename(&source, backup_path(&self.path, index + 1))?;
            }
        }
        fs::rename(&self.path, backup_path(&self.path, 1))?;
        self.file = open_log_file(&self.path, FileMode::Truncate)?;
        self.size = 0;
        Ok(())
    }

    fn write_record(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.should_rotate(buf.len()) {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.size += buf.len() as u64;
        Ok(())
    }
}

pub struct RotatingFileGuard {
    inner: Arc<Mutex<RotatingFile>>,
}

impl Write for RotatingFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.write_record(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingFileGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(max_bytes: u64, backup_count: u32) -> FileHandlerSettings {
        FileHandlerSettings {
            mode: FileMode::Append,
            max_bytes,
            backup_count,
        }
    }

    fn write_line(writer: &RotatingFileWriter, line: &str) {
        writer.make_writer().write_all(line.as_bytes()).unwrap();
    }

    #[test]
    fn rotates_when_size_is_exceeded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etl.log");
        let writer = RotatingFileWriter::open(&path, settings(10, 2)).unwrap();

        write_line(&writer, "first-1\n");
        write_line(&writer, "second2\n");
        write_line(&writer, "third-3\n");
        write_line(&writer, "fourth4\n");

        assert_eq!(fs::read_to_string(&path).unwrap(), "fourth4\n");
        assert_eq!(fs::read_to_string(backup_path(&path, 1)).unwrap(), "third-3\n");
        assert_eq!(fs::read_to_string(backup_path(&path, 2)).unwrap(), "second2\n");
        assert!(!backup_path(&path, 3).exists());
    }

    #[test]
    fn zero_backups_disables_rotation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etl.log");
        let writer = RotatingFileWriter::open(&path, settings(4, 0)).unwrap();

        write_line(&writer, "one\n");
        write_line(&writer, "two\n");

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
        assert!(!backup_path(&path, 1).exists());
    }

    #[test]
    fn truncate_mode_clears_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etl.log");
        fs::write(&path, "old run\n").unwrap();
        let handler = FileHandlerSettings {
            mode: FileMode::Truncate,
            max_bytes: 0,
            backup_count: 0,
        };

        let writer = RotatingFileWriter::open(&path, handler).unwrap();
        write_line(&writer, "new run\n");

        assert_eq!(fs::read_to_string(&path).unwrap(), "new run\n");
    }

    #[test]
    fn append_mode_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etl.log");
        fs::write(&path, "old run\n").unwrap();

        let writer = RotatingFileWriter::open(&path, settings(0, 0)).unwrap();
        write_line(&writer, "new run\n");

        assert_eq!(fs::read_to_string(&path).unwrap(), "old run\nnew run\n");
    }

    #[test]
    fn creates_missing_log_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("logs").join("etl.log");

        RotatingFileWriter::open(&path, settings(0, 0)).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn utc_timer_uses_pattern() {
        let timer = UtcTime::new("%Y");
        let mut rendered = String::new();
        timer.format_time(&mut Writer::new(&mut rendered)).unwrap();
        assert_eq!(rendered, Utc::now().format("%Y").to_string());
    }

    #[test]
    fn config_from_settings() {
        let settings = LoggingSettings {
            level: LogLevel::Info,
            logs_formatter: "json".to_string(),
            ..LoggingSettings::default()
        };

        let config = LogConfig::from_settings(&settings, Path::new("/var/log/etl")).unwrap();

        assert_eq!(config.level, Level::INFO);
        assert_eq!(config.format, LogLayout::Json);
        assert_eq!(
            config.log_file,
            Some(PathBuf::from("/var/log/etl/client_etl.log"))
        );
    }

    #[test]
    fn config_rejects_bad_template() {
        let settings = LoggingSettings {
            logs_formatter: "%(asctime)s %(process)d".to_string(),
            ..LoggingSettings::default()
        };

        let err = LogConfig::from_settings(&settings, Path::new("logs")).unwrap_err();

        assert!(matches!(
            err,
            LoggingError::Layout(LayoutError::UnknownField { .. })
        ));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn render(template: &str, emit: impl FnOnce()) -> String {
        let settings = LoggingSettings {
            logs_formatter: template.to_string(),
            time_formatter: "%Y".to_string(),
            ..LoggingSettings::default()
        };
        let config = LogConfig::from_settings(&settings, Path::new("logs")).unwrap();
        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry().with(fmt_layer(
            &config,
            UtcTime::new(&config.time_format),
            captured.clone(),
            true,
        ));
        tracing::subscriber::with_default(subscriber, emit);
        captured.text()
    }

    #[test]
    fn template_substitutes_level_target_and_message() {
        let text = render("%(levelname)-8s|%(name)s|%(message)s", || {
            tracing::warn!(target: "etl_transform", rows = 3, "rename source column not found");
            tracing::info!(target: "etl_cli", "pipeline finished");
        });

        assert_eq!(
            text,
            "WARNING |etl_transform|rename source column not found rows=3\n\
             INFO    |etl_cli|pipeline finished\n"
        );
    }

    #[test]
    fn template_renders_utc_time() {
        let text = render("[%(asctime)s] {levelname:>5} {message}", || {
            tracing::error!(target: "etl_cli", "stage failed");
        });

        assert_eq!(
            text,
            format!("[{}] ERROR stage failed\n", Utc::now().format("%Y"))
        );
    }
}
