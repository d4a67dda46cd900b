// worklog-report - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "worklog-report";

/// Application identifier used for the platform config directory.
pub const APP_ID: &str = "worklog-report";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Configuration
// =============================================================================

/// Config file names searched (in order) when no explicit path is given.
pub const CONFIG_FILE_NAMES: &[&str] = &["config.json", "config.toml"];

/// Default log level when no override is provided.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in the `logging.level` config key.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Input layout
// =============================================================================

/// Header label identifying a log-work column. Matched by exact equality.
pub const DEFAULT_LOG_WORK_HEADER: &str = "Log Work";

/// Column holding the task label.
pub const DEFAULT_SUMMARY_COLUMN: usize = 0;

/// Separator between the fields embedded in a log-work cell.
pub const DEFAULT_LOG_WORK_DELIMITER: char = ';';

/// Number of fields in a log-work cell: tag, date, user id, minutes.
pub const LOG_WORK_FIELD_COUNT: usize = 4;

/// Input files larger than this are rejected before decoding.
pub const MAX_INPUT_FILE_SIZE: u64 = 64 * 1024 * 1024; // 64 MB

/// Maximum config document size in bytes.
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024; // 1 MB

// =============================================================================
// Time units
// =============================================================================

/// Seconds in one minute.
pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Minutes in one hour.
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// Working hours that make up one reported day (not 24).
pub const HOURS_PER_WORKDAY: u64 = 8;
