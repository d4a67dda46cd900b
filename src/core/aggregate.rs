// worklog-report - core/aggregate.rs
//
// Aggregator: Tasks -> Aggregated report.
// Core layer: pure function of its input, no I/O.
//
// Every per-task row and the total row list users in one dataset-wide
// order, so columns line up positionally across the whole report.

use crate::core::model::{Aggregated, Task, TaskSummary, User, UserTime};
use crate::util::constants::SECONDS_PER_MINUTE;
use feruca::{Collator, Locale, Tailoring};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

/// Collator for report column order: CLDR root collation, punctuation
/// significant, with a code-point tie-break between distinct strings.
pub fn name_collator() -> Collator {
    Collator::new(Tailoring::Cldr(Locale::Root), false, true)
}

/// Display-name ordering for report columns.
///
/// Locale-aware and case-sensitive: "Émile" sorts before "Frank", Latin
/// before Cyrillic, and on a case-only difference lowercase comes first.
/// The id breaks any remaining tie so the order is total.
pub fn compare_users(collator: &mut Collator, a: &User, b: &User) -> Ordering {
    collator
        .collate(a.name.as_str(), b.name.as_str())
        .then_with(|| a.id.cmp(&b.id))
}

/// Distinct users with at least one entry anywhere, sorted by name.
pub fn user_universe(tasks: &[Task]) -> Vec<Rc<User>> {
    let mut seen: HashMap<&str, Rc<User>> = HashMap::new();
    for entry in tasks.iter().flat_map(|t| &t.work_logs) {
        seen.entry(entry.user().id.as_str())
            .or_insert_with(|| Rc::clone(entry.user()));
    }
    let mut users: Vec<Rc<User>> = seen.into_values().collect();
    let mut collator = name_collator();
    users.sort_by(|a, b| compare_users(&mut collator, a, b));
    users
}

/// Build the report from extracted tasks.
///
/// Tasks where nobody logged a positive amount of time are dropped; the
/// rest are sorted by total time, largest first, keeping input order on
/// ties. The total row covers every entry, including those on dropped tasks.
pub fn aggregate(tasks: &[Task]) -> Aggregated {
    let users = user_universe(tasks);
    let index: HashMap<&str, usize> = users
        .iter()
        .enumerate()
        .map(|(i, u)| (u.id.as_str(), i))
        .collect();

    let mut total_minutes = vec![0.0_f64; users.len()];
    let mut summaries = Vec::with_capacity(tasks.len());

    for task in tasks {
        let mut task_minutes = vec![0.0_f64; users.len()];
        for entry in &task.work_logs {
            // Every entry's user is in the universe by construction.
            if let Some(&i) = index.get(entry.user().id.as_str()) {
                task_minutes[i] += entry.minutes();
                total_minutes[i] += entry.minutes();
            }
        }

        let task_total: f64 = task.work_logs.iter().map(|e| e.minutes()).sum();

        let summary = TaskSummary {
            label: task.label.clone(),
            per_user: users
                .iter()
                .zip(&task_minutes)
                .map(|(user, minutes)| UserTime {
                    user: Rc::clone(user),
                    seconds: minutes * SECONDS_PER_MINUTE,
                })
                .collect(),
            total_seconds: task_total * SECONDS_PER_MINUTE,
        };

        if summary.has_logged_time() {
            summaries.push(summary);
        } else {
            tracing::debug!(task = %task.label, "No time logged; task dropped from report");
        }
    }

    // Stable: equal totals keep extraction order.
    summaries.sort_by(|a, b| b.total_seconds.total_cmp(&a.total_seconds));

    let total = users
        .iter()
        .zip(&total_minutes)
        .map(|(user, minutes)| UserTime {
            user: Rc::clone(user),
            seconds: minutes * SECONDS_PER_MINUTE,
        })
        .collect();

    tracing::info!(
        users = users.len(),
        tasks_in = tasks.len(),
        tasks_kept = summaries.len(),
        "Aggregation complete"
    );

    Aggregated {
        tasks: summaries,
        total,
    }
}
