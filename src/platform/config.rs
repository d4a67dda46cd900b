// worklog-report - platform/config.rs
//
// Config directory resolution, and loading of the config document
// (known users, date-floor filter, input layout, logging) with startup
// validation.
//
// The document is JSON by default; a `.toml` extension selects TOML.
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::extract::{parse_date, ExtractConfig, InputLayout};
use crate::core::model::User;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Resolved platform paths for worklog-report configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/worklog-report/ or %APPDATA%\worklog-report\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

/// Pick the config file to load.
///
/// An explicit path always wins (and is not checked here, so a typo
/// surfaces as an I/O error naming it). Otherwise the known file names are
/// tried in `cwd`, then in the platform config directory.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    cwd: &Path,
    paths: &PlatformPaths,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let mut searched = Vec::new();
    for dir in [cwd, paths.config_dir.as_path()] {
        for name in constants::CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                tracing::debug!(path = %candidate.display(), "Found config file");
                return Ok(candidate);
            }
            searched.push(candidate);
        }
    }
    Err(ConfigError::NotFound { searched })
}

// =============================================================================
// Document shape
// =============================================================================

/// Raw deserialisable shape of the config document.
///
/// Keys are camelCase (`workLogs`, `summaryColumn`); snake_case aliases are
/// accepted so TOML files can use their native style.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    pub users: Vec<User>,
    #[serde(default, alias = "work_logs")]
    pub work_logs: WorkLogsSection,
    #[serde(default)]
    pub input: InputSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// `workLogs` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct WorkLogsSection {
    pub filter: FilterSection,
}

/// `workLogs.filter` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FilterSection {
    /// Only entries strictly after this date are kept.
    pub from: Option<String>,
}

/// `input` section. Every key falls back to the built-in layout.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputSection {
    #[serde(alias = "summary_column")]
    pub summary_column: Option<usize>,
    #[serde(alias = "log_work_header")]
    pub log_work_header: Option<String>,
    pub delimiter: Option<String>,
}

/// `logging` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Users, floor and layout handed to the extractor.
    pub extract: ExtractConfig,
    /// Logging level from the document, if valid.
    pub log_level: Option<String>,
    /// File the configuration was read from.
    pub source: PathBuf,
}

// =============================================================================
// Loading and validation
// =============================================================================

/// Load and validate a config document.
///
/// Structural problems are fatal. Cosmetic ones (unknown log level,
/// duplicate display names) come back as warnings.
pub fn load_config(path: &Path) -> Result<(ReportConfig, Vec<String>), ConfigError> {
    let metadata = std::fs::metadata(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if metadata.len() > constants::MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: constants::MAX_CONFIG_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let result = parse_config(&content, path)?;
    tracing::info!(
        path = %path.display(),
        users = result.0.extract.users.len(),
        floor = ?result.0.extract.date_floor,
        "Loaded config"
    );
    Ok(result)
}

/// Parse and validate config text. `path` selects the format and is used
/// in error messages.
pub fn parse_config(
    content: &str,
    path: &Path,
) -> Result<(ReportConfig, Vec<String>), ConfigError> {
    let is_toml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let raw: RawConfig = if is_toml {
        toml::from_str(content).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_json::from_str(content).map_err(|source| ConfigError::JsonParse {
            path: path.to_path_buf(),
            source,
        })?
    };

    validate(raw, path)
}

fn validate(raw: RawConfig, path: &Path) -> Result<(ReportConfig, Vec<String>), ConfigError> {
    let mut warnings: Vec<String> = Vec::new();

    // -- users --
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for user in &raw.users {
        if user.id.trim().is_empty() {
            return Err(ConfigError::EmptyUserId {
                name: user.name.clone(),
            });
        }
        if !ids.insert(user.id.as_str()) {
            return Err(ConfigError::DuplicateUserId {
                id: user.id.clone(),
            });
        }
        if !names.insert(user.name.as_str()) {
            warnings.push(format!(
                "users: display name \"{}\" is used more than once; \
                 report columns will be told apart by id only",
                user.name
            ));
        }
    }

    // -- workLogs.filter.from -- (empty string means unset)
    let date_floor = match raw.work_logs.filter.from.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(parse_date(value).ok_or_else(|| ConfigError::InvalidFilterDate {
            value: value.to_string(),
        })?),
    };

    // -- input --
    let mut layout = InputLayout::default();
    if let Some(column) = raw.input.summary_column {
        layout.summary_column = column;
    }
    if let Some(header) = raw.input.log_work_header {
        layout.log_work_header = header;
    }
    if let Some(ref delimiter) = raw.input.delimiter {
        let mut chars = delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => layout.delimiter = c,
            _ => {
                return Err(ConfigError::InvalidDelimiter {
                    value: delimiter.clone(),
                })
            }
        }
    }

    // -- logging.level --
    let mut log_level = None;
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default ({}).",
                constants::DEFAULT_LOG_LEVEL
            ));
        }
    }

    let config = ReportConfig {
        extract: ExtractConfig {
            users: raw.users.into_iter().map(Rc::new).collect(),
            date_floor,
            layout,
        },
        log_level,
        source: path.to_path_buf(),
    };

    Ok((config, warnings))
}
