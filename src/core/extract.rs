// worklog-report - core/extract.rs
//
// Record Extractor: decoded export rows -> Tasks with typed work-log entries.
// Core layer: works on rows already in memory, never touches the filesystem.

use crate::core::model::{Task, User, WorkLogEntry};
use crate::util::constants;
use crate::util::error::{CellRef, ExtractError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::HashMap;
use std::rc::Rc;

/// Where the task label and log-work cells live in the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLayout {
    /// Column holding the task label.
    pub summary_column: usize,
    /// Exact header label of every log-work column.
    pub log_work_header: String,
    /// Separator between the fields of a log-work cell.
    pub delimiter: char,
}

impl Default for InputLayout {
    fn default() -> Self {
        Self {
            summary_column: constants::DEFAULT_SUMMARY_COLUMN,
            log_work_header: constants::DEFAULT_LOG_WORK_HEADER.to_string(),
            delimiter: constants::DEFAULT_LOG_WORK_DELIMITER,
        }
    }
}

/// Everything the extractor needs from configuration.
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    /// Known users. Ids are unique (enforced by the config loader).
    pub users: Vec<Rc<User>>,
    /// Entries dated on or before this instant are dropped.
    pub date_floor: Option<DateTime<Utc>>,
    pub layout: InputLayout,
}

/// Counters reported after extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub tasks: usize,
    pub entries_kept: usize,
    pub entries_before_floor: usize,
}

/// Parse a date or timestamp from a log-work cell or the config floor.
///
/// Accepts RFC 3339 (offset honoured), `YYYY-MM-DD[ T]HH:MM[:SS]` read as
/// UTC, and a bare `YYYY-MM-DD` meaning midnight UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}

/// Turn decoded rows into tasks. Row 0 is the header.
///
/// Fails on the first bad cell: unknown user, wrong field count,
/// non-numeric or negative duration, or unparseable date.
pub fn extract(rows: &[Vec<String>], config: &ExtractConfig) -> Result<Vec<Task>, ExtractError> {
    extract_with_stats(rows, config).map(|(tasks, _)| tasks)
}

/// As [`extract`], also returning counters for logging.
pub fn extract_with_stats(
    rows: &[Vec<String>],
    config: &ExtractConfig,
) -> Result<(Vec<Task>, ExtractStats), ExtractError> {
    let (header, body) = rows.split_first().ok_or(ExtractError::EmptyInput)?;
    let layout = &config.layout;

    let log_work_columns: Vec<usize> = header
        .iter()
        .enumerate()
        .filter(|(_, label)| **label == layout.log_work_header)
        .map(|(idx, _)| idx)
        .collect();

    if log_work_columns.is_empty() {
        tracing::warn!(
            header = %layout.log_work_header,
            "No log-work columns in export; every task will be empty"
        );
    }

    let users: HashMap<&str, &Rc<User>> =
        config.users.iter().map(|u| (u.id.as_str(), u)).collect();

    let mut stats = ExtractStats::default();
    let mut tasks = Vec::with_capacity(body.len());

    for (row_idx, row) in body.iter().enumerate() {
        // 1-based, with the header on row 1.
        let row_number = row_idx + 2;
        let label = row
            .get(layout.summary_column)
            .cloned()
            .unwrap_or_default();
        let mut work_logs = Vec::new();

        for &column in &log_work_columns {
            let cell = match row.get(column) {
                Some(c) if !c.is_empty() => c,
                _ => continue,
            };
            let cell_ref = CellRef {
                row: row_number,
                column,
                header: layout.log_work_header.clone(),
            };
            let entry = parse_cell(cell, cell_ref, &users, layout.delimiter)?;

            match config.date_floor {
                Some(floor) if entry.date() <= floor => {
                    tracing::debug!(
                        row = row_number,
                        column,
                        user = %entry.user().id,
                        date = %entry.date(),
                        "Entry on or before filter floor; excluded"
                    );
                    stats.entries_before_floor += 1;
                }
                _ => {
                    stats.entries_kept += 1;
                    work_logs.push(entry);
                }
            }
        }

        tasks.push(Task { label, work_logs });
    }

    stats.tasks = tasks.len();
    tracing::info!(
        tasks = stats.tasks,
        log_work_columns = log_work_columns.len(),
        entries = stats.entries_kept,
        filtered = stats.entries_before_floor,
        "Extraction complete"
    );

    Ok((tasks, stats))
}

/// Parse one `tag;date;user;minutes` cell.
fn parse_cell(
    raw: &str,
    cell: CellRef,
    users: &HashMap<&str, &Rc<User>>,
    delimiter: char,
) -> Result<WorkLogEntry, ExtractError> {
    let fields: Vec<&str> = raw.split(delimiter).collect();
    let [_tag, date_str, user_id, minutes_str] = fields.as_slice() else {
        return Err(ExtractError::MalformedEntry {
            reason: format!(
                "expected {} '{delimiter}'-separated fields, found {}",
                constants::LOG_WORK_FIELD_COUNT,
                fields.len()
            ),
            raw: raw.to_string(),
            cell,
        });
    };

    let user = match users.get(*user_id) {
        Some(u) => Rc::clone(u),
        None => {
            return Err(ExtractError::UnknownUser {
                cell,
                user_id: user_id.to_string(),
            })
        }
    };

    let minutes: f64 = match minutes_str.trim().parse() {
        Ok(m) => m,
        Err(_) => {
            return Err(ExtractError::MalformedEntry {
                reason: format!("duration '{minutes_str}' is not a number"),
                raw: raw.to_string(),
                cell,
            })
        }
    };

    let Some(date) = parse_date(date_str) else {
        return Err(ExtractError::InvalidDate {
            cell,
            raw_date: date_str.to_string(),
        });
    };

    WorkLogEntry::new(date, user, minutes).ok_or_else(|| ExtractError::MalformedEntry {
        reason: format!("duration '{minutes_str}' must be a finite, non-negative number"),
        raw: raw.to_string(),
        cell,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn config(floor: Option<&str>) -> ExtractConfig {
        ExtractConfig {
            users: vec![
                Rc::new(User::new("alice", "Alice")),
                Rc::new(User::new("bob", "Bob")),
            ],
            date_floor: floor.map(|f| parse_date(f).unwrap()),
            layout: InputLayout::default(),
        }
    }

    #[test]
    fn test_parse_date_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2024-01-15"), Some(midnight));
        assert_eq!(
            parse_date("2024-01-15 10:30"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-01-15T10:30:05+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 5).unwrap())
        );
        assert_eq!(parse_date(" 2024-01-15 "), Some(midnight));
        assert_eq!(parse_date("15/01/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_extract_basic() {
        let data = rows(&[
            &["Summary", "Key", "Log Work", "Log Work"],
            &["Build API", "P-1", "c;2024-01-02;alice;90", "c;2024-01-03;bob;30"],
            &["Write docs", "P-2", "", ""],
        ]);
        let tasks = extract(&data, &config(None)).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].label, "Build API");
        assert_eq!(tasks[0].work_logs.len(), 2);
        assert_eq!(tasks[0].work_logs[0].user().id, "alice");
        assert_eq!(tasks[0].work_logs[0].minutes(), 90.0);
        assert_eq!(tasks[0].work_logs[1].user().id, "bob");
        assert_eq!(tasks[1].label, "Write docs");
        assert!(tasks[1].work_logs.is_empty());
    }

    #[test]
    fn test_entries_share_configured_user() {
        let cfg = config(None);
        let data = rows(&[
            &["Summary", "Log Work", "Log Work"],
            &["T", "a;2024-01-02;alice;1", "b;2024-01-03;alice;2"],
        ]);
        let tasks = extract(&data, &cfg).unwrap();
        assert!(Rc::ptr_eq(tasks[0].work_logs[0].user(), &cfg.users[0]));
        assert!(Rc::ptr_eq(tasks[0].work_logs[1].user(), &cfg.users[0]));
    }

    #[test]
    fn test_header_match_is_exact() {
        let data = rows(&[
            &["Summary", "log work", "Log Work "],
            &["T", "c;2024-01-02;alice;90", "c;2024-01-02;alice;90"],
        ]);
        let tasks = extract(&data, &config(None)).unwrap();
        assert!(tasks[0].work_logs.is_empty());
    }

    #[test]
    fn test_date_floor_is_exclusive() {
        let data = rows(&[
            &["Summary", "Log Work", "Log Work", "Log Work"],
            &[
                "T",
                "c;2024-01-01;alice;10",
                "c;2024-01-02;alice;20",
                "c;2023-12-31;bob;40",
            ],
        ]);
        let (tasks, stats) = extract_with_stats(&data, &config(Some("2024-01-01"))).unwrap();
        assert_eq!(tasks[0].work_logs.len(), 1);
        assert_eq!(tasks[0].work_logs[0].minutes(), 20.0);
        assert_eq!(stats.entries_kept, 1);
        assert_eq!(stats.entries_before_floor, 2);
    }

    #[test]
    fn test_unknown_user_fails() {
        let data = rows(&[
            &["Summary", "Log Work"],
            &["T", "c;2024-01-02;alice;10"],
            &["U", "c;2024-01-02;mallory;10"],
        ]);
        let err = extract(&data, &config(None)).unwrap_err();
        match err {
            ExtractError::UnknownUser { cell, user_id } => {
                assert_eq!(user_id, "mallory");
                assert_eq!(cell.row, 3);
                assert_eq!(cell.column, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_user_fails_even_before_floor() {
        let data = rows(&[&["Summary", "Log Work"], &["T", "c;2000-01-01;mallory;10"]]);
        let err = extract(&data, &config(Some("2024-01-01"))).unwrap_err();
        assert!(matches!(err, ExtractError::UnknownUser { .. }));
    }

    #[test]
    fn test_wrong_field_count_fails() {
        let data = rows(&[&["Summary", "Log Work"], &["T", "2024-01-02;alice;10"]]);
        let err = extract(&data, &config(None)).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedEntry { .. }));

        let data = rows(&[&["Summary", "Log Work"], &["T", "c;2024-01-02;alice;10;x"]]);
        let err = extract(&data, &config(None)).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedEntry { .. }));
    }

    #[test]
    fn test_non_numeric_duration_fails() {
        for bad in ["abc", "", "-5", "NaN", "inf"] {
            let cell = format!("c;2024-01-02;alice;{bad}");
            let data = rows(&[&["Summary", "Log Work"], &["T", cell.as_str()]]);
            let err = extract(&data, &config(None)).unwrap_err();
            assert!(
                matches!(err, ExtractError::MalformedEntry { .. }),
                "duration {bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_decimal_duration_accepted() {
        let data = rows(&[&["Summary", "Log Work"], &["T", "c;2024-01-02;alice;7.5"]]);
        let tasks = extract(&data, &config(None)).unwrap();
        assert_eq!(tasks[0].work_logs[0].minutes(), 7.5);
    }

    #[test]
    fn test_invalid_date_fails() {
        let data = rows(&[&["Summary", "Log Work"], &["T", "c;yesterday;alice;10"]]);
        let err = extract(&data, &config(None)).unwrap_err();
        match err {
            ExtractError::InvalidDate { raw_date, .. } => assert_eq!(raw_date, "yesterday"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_short_rows_and_empty_cells_are_skipped() {
        let data = rows(&[
            &["Summary", "Log Work", "Log Work"],
            &["T", ""],
            &[],
        ]);
        let tasks = extract(&data, &config(None)).unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks[0].work_logs.is_empty());
        assert_eq!(tasks[1].label, "");
    }

    #[test]
    fn test_whitespace_only_cell_fails() {
        let data = rows(&[&["Summary", "Log Work"], &["T", "   "]]);
        let err = extract(&data, &config(None)).unwrap_err();
        match err {
            ExtractError::MalformedEntry { cell, raw, .. } => {
                assert_eq!(raw, "   ");
                assert_eq!(cell.row, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_user_id_matched_exactly() {
        let data = rows(&[&["Summary", "Log Work"], &["T", "c;2024-01-02; alice;10"]]);
        let err = extract(&data, &config(None)).unwrap_err();
        match err {
            ExtractError::UnknownUser { user_id, .. } => assert_eq!(user_id, " alice"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_fails() {
        let err = extract(&[], &config(None)).unwrap_err();
        assert!(matches!(err, ExtractError::EmptyInput));
    }

    #[test]
    fn test_custom_layout() {
        let mut cfg = config(None);
        cfg.layout = InputLayout {
            summary_column: 1,
            log_work_header: "Worklog".to_string(),
            delimiter: '|',
        };
        let data = rows(&[&["Key", "Summary", "Worklog"], &["P-1", "T", "c|2024-01-02|bob|15"]]);
        let tasks = extract(&data, &cfg).unwrap();
        assert_eq!(tasks[0].label, "T");
        assert_eq!(tasks[0].work_logs[0].user().id, "bob");
    }
}
