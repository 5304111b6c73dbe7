//! Display ordering: priority sort, status filters and manual reordering.

use std::cmp::{Ordering, Reverse};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{days_until_deadline, Task, TaskStatus};
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
    Overdue,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => task.status == TaskStatus::Pending,
            TaskFilter::Completed => task.status == TaskStatus::Completed,
            TaskFilter::Overdue => task.status == TaskStatus::Overdue,
        }
    }
}

impl FromStr for TaskFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "pending" => Ok(TaskFilter::Pending),
            "completed" => Ok(TaskFilter::Completed),
            "overdue" => Ok(TaskFilter::Overdue),
            other => Err(ValidationError::invalid(
                "filter",
                format!("'{other}' is not one of all, pending, completed, overdue"),
            )),
        }
    }
}

fn overdue_days(task: &Task, today: NaiveDate) -> Option<i64> {
    task.deadline
        .map(|d| days_until_deadline(d, today))
        .filter(|days| *days < 0)
}

fn compare(a: &Task, b: &Task, today: NaiveDate) -> Ordering {
    let a_done = a.status == TaskStatus::Completed;
    let b_done = b.status == TaskStatus::Completed;
    match (a_done, b_done) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        // Most recently completed first; missing timestamps last.
        (true, true) => return b.completed_at.cmp(&a.completed_at),
        (false, false) => {}
    }

    match (overdue_days(a, today), overdue_days(b, today)) {
        (Some(x), Some(y)) => return x.cmp(&y),
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        (None, None) => {}
    }

    match (a.deadline, b.deadline) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Reverse(a.created_at).cmp(&Reverse(b.created_at)),
    }
}

/// Default display order:
///
/// 1. open tasks before completed ones (completed: newest completion first)
/// 2. overdue before not overdue (most overdue first)
/// 3. dated before undated (nearest deadline first)
/// 4. undated by creation time, newest first
///
/// The sort is stable, so ties keep their input order.
pub fn sort_by_priority(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| compare(a, b, today));
    sorted
}

/// Tasks matching `filter`, in manual sort order.
pub fn filter_tasks(tasks: &[Task], filter: TaskFilter) -> Vec<Task> {
    let mut matching: Vec<Task> = tasks.iter().filter(|t| filter.matches(t)).cloned().collect();
    matching.sort_by_key(|t| t.sort_order);
    matching
}

/// Assign `sort_order` from the position of each id in `ids`. Tasks not
/// listed keep their relative order after the listed ones.
pub fn reorder(tasks: &mut [Task], ids: &[String]) {
    let position = |task: &Task| ids.iter().position(|id| *id == task.id);
    let mut rest = ids.len() as i32;
    let mut unlisted: Vec<usize> = (0..tasks.len())
        .filter(|&i| position(&tasks[i]).is_none())
        .collect();
    unlisted.sort_by_key(|&i| tasks[i].sort_order);

    for task in tasks.iter_mut() {
        if let Some(pos) = position(task) {
            task.sort_order = pos as i32;
        }
    }
    for i in unlisted {
        tasks[i].sort_order = rest;
        rest += 1;
    }
}
