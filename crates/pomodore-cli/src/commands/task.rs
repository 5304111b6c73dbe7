use clap::Subcommand;
use pomodore_core::dates::parse_date;
use pomodore_core::task::{
    calculate_progress, deadline_color_class, filter_tasks, format_deadline_text, sort_by_priority,
    TaskFilter,
};
use pomodore_core::{Clock, CreateTaskInput, EffortTier, Task};
use serde_json::{json, Value};

use super::{print_with_events, CliResult, Session};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Effort tier: trivial, common, challenging, heroic, epic, legendary
        #[arg(long, default_value = "common")]
        effort: EffortTier,
        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Subtask title (repeatable)
        #[arg(long = "subtask")]
        subtasks: Vec<String>,
    },
    /// List tasks
    List {
        /// all, pending, completed or overdue
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
        /// Sort by deadline priority instead of manual order
        #[arg(long)]
        priority: bool,
    },
    /// Show one task with its subtasks
    Show {
        id: String,
    },
    /// Complete a task and collect its remaining XP
    Complete {
        id: String,
    },
    /// Link future focus cycles to this task
    Activate {
        id: String,
    },
    /// Stop linking focus cycles to any task
    Deactivate,
    /// Set the manual order; unlisted tasks keep their order after these
    Reorder {
        ids: Vec<String>,
    },
    /// Add a subtask to an existing task
    SubtaskAdd {
        task_id: String,
        title: String,
    },
    /// Check or uncheck a subtask
    SubtaskToggle {
        task_id: String,
        subtask_id: String,
    },
    /// Delete a subtask
    SubtaskRemove {
        task_id: String,
        subtask_id: String,
    },
}

fn task_view(session: &Session, task: &Task) -> Result<Value, serde_json::Error> {
    let today = session.clock.today();
    let mut value = serde_json::to_value(task)?;
    if let Value::Object(map) = &mut value {
        if let Some(deadline) = task.deadline {
            map.insert("deadline_text".into(), json!(format_deadline_text(deadline, today)));
        }
        map.insert("deadline_class".into(), json!(deadline_color_class(task, today)));
        map.insert(
            "active".into(),
            json!(session.ledger.active_task_id.as_deref() == Some(task.id.as_str())),
        );
    }
    Ok(value)
}

fn show(session: &Session, id: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let task = session
        .ledger
        .task(id)
        .ok_or_else(|| format!("task not found: {id}"))?;
    let subtasks = session.ledger.subtasks_for(id);
    Ok(json!({
        "task": task_view(session, task)?,
        "subtasks": subtasks,
        "progress": calculate_progress(&subtasks),
    }))
}

pub fn run(action: TaskAction) -> CliResult {
    let mut session = Session::open()?;

    let value = match action {
        TaskAction::Add {
            title,
            effort,
            deadline,
            description,
            subtasks,
        } => {
            let mut input = CreateTaskInput::new(title, effort);
            if let Some(raw) = deadline {
                input = input.with_deadline(parse_date(&raw)?);
            }
            input.description = description;
            let task = session.ledger.add_task(input, &subtasks, &session.clock)?;
            show(&session, &task.id)?
        }
        TaskAction::List { filter, priority } => {
            let mut tasks = filter_tasks(&session.ledger.tasks, filter);
            if priority {
                tasks = sort_by_priority(&tasks, session.clock.today());
            }
            let views = tasks
                .iter()
                .map(|t| task_view(&session, t))
                .collect::<Result<Vec<_>, _>>()?;
            json!(views)
        }
        TaskAction::Show { id } => show(&session, &id)?,
        TaskAction::Complete { id } => {
            let events = session.ledger.complete_task(&id, &session.clock)?;
            session.push_events(events);
            show(&session, &id)?
        }
        TaskAction::Activate { id } => {
            session.ledger.set_active_task(Some(&id))?;
            show(&session, &id)?
        }
        TaskAction::Deactivate => {
            session.ledger.set_active_task(None)?;
            json!({ "active_task_id": null })
        }
        TaskAction::Reorder { ids } => {
            session.ledger.reorder_tasks(&ids)?;
            json!(filter_tasks(&session.ledger.tasks, TaskFilter::All))
        }
        TaskAction::SubtaskAdd { task_id, title } => {
            session.ledger.add_subtask(&task_id, &title)?;
            show(&session, &task_id)?
        }
        TaskAction::SubtaskToggle {
            task_id,
            subtask_id,
        } => {
            let events = session
                .ledger
                .toggle_subtask(&task_id, &subtask_id, &session.clock)?;
            session.push_events(events);
            show(&session, &task_id)?
        }
        TaskAction::SubtaskRemove {
            task_id,
            subtask_id,
        } => {
            let events = session
                .ledger
                .remove_subtask(&task_id, &subtask_id, &session.clock)?;
            session.push_events(events);
            show(&session, &task_id)?
        }
    };

    session.save()?;
    print_with_events(&session, "task", &value)
}
