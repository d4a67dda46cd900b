// worklog-report - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every failure aborts the run: there is no partial report.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all worklog-report operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum ReportError {
    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Reading or decoding the input export failed.
    Input(InputError),

    /// A log-work cell could not be turned into a work-log entry.
    Extract(ExtractError),

    /// Rendering the report failed.
    Export(ExportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

/// Coarse error category, for callers that only need to tell
/// configuration problems apart from bad data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The config document is missing, unreadable, or invalid, or the
    /// export references a user the config does not know.
    Configuration,
    /// The export itself is unreadable or malformed.
    MalformedData,
    /// Writing the report failed.
    Output,
}

impl ReportError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::Extract(ExtractError::UnknownUser { .. }) => ErrorKind::Configuration,
            Self::Extract(_) | Self::Input(_) => ErrorKind::MalformedData,
            Self::Export(_) | Self::Io { .. } => ErrorKind::Output,
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Input(e) => write!(f, "Input error: {e}"),
            Self::Extract(e) => write!(f, "Worklog error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Input(e) => Some(e),
            Self::Extract(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading and validation.
#[derive(Debug)]
pub enum ConfigError {
    /// No config file was given and none was found in the search locations.
    NotFound { searched: Vec<PathBuf> },

    /// JSON parsing failed.
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A configured user has an empty id.
    EmptyUserId { name: String },

    /// Two configured users share one id.
    DuplicateUserId { id: String },

    /// `workLogs.filter.from` is not a parseable date.
    InvalidFilterDate { value: String },

    /// The log-work delimiter is not exactly one character.
    InvalidDelimiter { value: String },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { searched } => {
                let list: Vec<String> = searched.iter().map(|p| p.display().to_string()).collect();
                write!(
                    f,
                    "No config file found (searched: {}). Pass one with --config.",
                    list.join(", ")
                )
            }
            Self::JsonParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Config '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::EmptyUserId { name } => {
                write!(f, "User '{name}' has an empty id")
            }
            Self::DuplicateUserId { id } => {
                write!(f, "User id '{id}' is defined more than once")
            }
            Self::InvalidFilterDate { value } => write!(
                f,
                "workLogs.filter.from = '{value}' is not a valid date. \
                 Expected e.g. 2024-01-31 or 2024-01-31T00:00:00Z"
            ),
            Self::InvalidDelimiter { value } => write!(
                f,
                "input.delimiter = '{value}' must be exactly one character"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::JsonParse { source, .. } => Some(source),
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for ReportError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

/// Errors related to reading and decoding the tabular export.
#[derive(Debug)]
pub enum InputError {
    /// Input file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// CSV decoding failed.
    Csv { path: PathBuf, source: csv::Error },

    /// I/O error reading the input file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Csv { path, source } => {
                write!(f, "'{}': cannot decode CSV: {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "'{}': I/O error: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<InputError> for ReportError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Extract errors
// ---------------------------------------------------------------------------

/// Position of a log-work cell in the export.
///
/// `row` is 1-based as a spreadsheet shows it (the header is row 1);
/// `column` is the 0-based cell index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub column: usize,
    pub header: String,
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}, column {} ('{}')",
            self.row,
            self.column + 1,
            self.header
        )
    }
}

/// Errors turning log-work cells into work-log entries.
#[derive(Debug)]
pub enum ExtractError {
    /// The cell names a user id absent from configuration.
    UnknownUser { cell: CellRef, user_id: String },

    /// The cell does not split into four fields, or its duration is not a
    /// finite non-negative number.
    MalformedEntry {
        cell: CellRef,
        raw: String,
        reason: String,
    },

    /// The date field could not be parsed.
    InvalidDate { cell: CellRef, raw_date: String },

    /// The export has no header row.
    EmptyInput,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownUser { cell, user_id } => write!(
                f,
                "{cell}: cannot find user with id '{user_id}' in config"
            ),
            Self::MalformedEntry { cell, raw, reason } => {
                write!(f, "{cell}: malformed log-work entry '{raw}': {reason}")
            }
            Self::InvalidDate { cell, raw_date } => {
                write!(f, "{cell}: cannot parse date '{raw_date}'")
            }
            Self::EmptyInput => write!(f, "export is empty (no header row)"),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<ExtractError> for ReportError {
    fn from(e: ExtractError) -> Self {
        Self::Extract(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to rendering the aggregated report.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the report.
    Io { source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { source } => write!(f, "write failed: {source}"),
            Self::Csv { source } => write!(f, "CSV serialisation failed: {source}"),
            Self::Json { source } => write!(f, "JSON serialisation failed: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
        }
    }
}

impl From<ExportError> for ReportError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for worklog-report results.
pub type Result<T> = std::result::Result<T, ReportError>;
