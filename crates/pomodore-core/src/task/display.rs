//! Deadline labels and color classes for task lists.

use chrono::NaiveDate;

use super::{days_until_deadline, Task, TaskStatus};

pub fn format_deadline_text(deadline: NaiveDate, today: NaiveDate) -> String {
    match days_until_deadline(deadline, today) {
        -1 => "Overdue yesterday".to_string(),
        days if days < 0 => format!("Overdue by {} days", -days),
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        days if days <= 7 => format!("In {days} days"),
        _ => deadline.format("%b %d").to_string(),
    }
}

pub fn deadline_color_class(task: &Task, today: NaiveDate) -> &'static str {
    let Some(deadline) = task.deadline else {
        return "text-muted";
    };
    if task.status == TaskStatus::Completed {
        return "text-success";
    }
    match days_until_deadline(deadline, today) {
        days if days < 0 => "text-error",
        0..=2 => "text-warning",
        _ => "text-secondary",
    }
}
