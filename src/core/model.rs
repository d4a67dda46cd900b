// worklog-report - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

// =============================================================================
// User (reference data from configuration)
// =============================================================================

/// A person who can log work. Identity is `id`; `name` is display-only.
///
/// Users come from configuration only and are shared by reference
/// (`Rc<User>`) between every entry that names them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// =============================================================================
// Work-log entry (one parsed log-work cell)
// =============================================================================

/// One recorded (date, user, duration) tuple.
///
/// Immutable once built. The user is always a resolved configuration user:
/// there is no way to construct an entry from a bare id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkLogEntry {
    date: DateTime<Utc>,
    user: Rc<User>,
    minutes: f64,
}

impl WorkLogEntry {
    /// Build an entry. Returns `None` if `minutes` is negative, NaN or infinite.
    pub fn new(date: DateTime<Utc>, user: Rc<User>, minutes: f64) -> Option<Self> {
        if !minutes.is_finite() || minutes < 0.0 {
            return None;
        }
        Some(Self {
            date,
            user,
            minutes,
        })
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn user(&self) -> &Rc<User> {
        &self.user
    }

    pub fn minutes(&self) -> f64 {
        self.minutes
    }
}

// =============================================================================
// Task (one export row)
// =============================================================================

/// One unit of work from the export, with every entry logged against it.
///
/// An empty `work_logs` list is valid: nobody logged time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    /// Raw summary label from the designated column.
    pub label: String,

    /// Entries in column-then-cell order.
    pub work_logs: Vec<WorkLogEntry>,
}

// =============================================================================
// Aggregated report
// =============================================================================

/// Time attributed to one user, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserTime {
    pub user: Rc<User>,
    pub seconds: f64,
}

/// Per-user totals across the whole dataset share the per-task shape.
pub type UserTotal = UserTime;

/// One retained row of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskSummary {
    pub label: String,

    /// One element per user in the dataset-wide user ordering,
    /// zero-filled for users who did not log time on this task.
    pub per_user: Vec<UserTime>,

    /// Sum over all of the task's entries.
    pub total_seconds: f64,
}

impl TaskSummary {
    /// True if at least one user has logged a positive amount of time.
    pub fn has_logged_time(&self) -> bool {
        self.per_user.iter().any(|u| u.seconds > 0.0)
    }
}

/// The final report: retained tasks sorted by total time, plus a per-user
/// total row in the same user order as every task's `per_user`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Aggregated {
    pub tasks: Vec<TaskSummary>,
    pub total: Vec<UserTotal>,
}

impl Aggregated {
    /// Users in report column order.
    pub fn users(&self) -> impl Iterator<Item = &Rc<User>> {
        self.total.iter().map(|t| &t.user)
    }

    /// Sum of the per-user total row.
    pub fn grand_total_seconds(&self) -> f64 {
        self.total.iter().map(|t| t.seconds).sum()
    }
}
