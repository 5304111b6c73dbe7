//! Subtask XP distribution, progress and toggling.
//!
//! A task's reward is split evenly across its current subtasks and rounded
//! down; the remainder of the integer division is never paid out through
//! subtasks. Completing the task itself still settles the full reward.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{new_id, Subtask, Task, TaskStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskProgress {
    pub completed: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent.
    pub percentage: u32,
}

fn share(total_xp: u32, count: usize) -> u32 {
    if count == 0 {
        0
    } else {
        total_xp / count as u32
    }
}

pub fn create_subtasks(task_id: &str, titles: &[String], total_xp: u32) -> Vec<Subtask> {
    let xp = share(total_xp, titles.len());
    titles
        .iter()
        .enumerate()
        .map(|(order, title)| Subtask {
            id: new_id(),
            task_id: task_id.to_string(),
            title: title.clone(),
            completed: false,
            xp_reward: xp,
            completed_at: None,
            order: order as u32,
        })
        .collect()
}

/// Re-split `total_xp` across the given set. Completion state is kept.
pub fn recalculate_subtask_xp(subtasks: &[Subtask], total_xp: u32) -> Vec<Subtask> {
    let xp = share(total_xp, subtasks.len());
    subtasks
        .iter()
        .map(|s| Subtask {
            xp_reward: xp,
            ..s.clone()
        })
        .collect()
}

pub fn calculate_progress(subtasks: &[Subtask]) -> SubtaskProgress {
    let total = subtasks.len();
    if total == 0 {
        return SubtaskProgress::default();
    }
    let completed = subtasks.iter().filter(|s| s.completed).count();
    let percentage = (2 * completed * 100 + total) / (2 * total);
    SubtaskProgress {
        completed,
        total,
        percentage: percentage as u32,
    }
}

/// Vacuously true for a task without subtasks.
pub fn are_all_subtasks_complete(subtasks: &[Subtask]) -> bool {
    subtasks.iter().all(|s| s.completed)
}

/// Flip a subtask and move its XP share in or out of the task's
/// `xp_earned`. Returns the signed XP delta to apply to the user.
///
/// The task's earned XP stays within `0..=xp_reward`; the returned delta is
/// the amount actually moved. Subtasks of a completed task are frozen.
pub fn toggle_subtask(task: &mut Task, subtask: &mut Subtask, now: NaiveDateTime) -> i64 {
    if task.status == TaskStatus::Completed {
        return 0;
    }
    subtask.completed = !subtask.completed;
    if subtask.completed {
        subtask.completed_at = Some(now);
        let credit = subtask.xp_reward.min(task.xp_reward.saturating_sub(task.xp_earned));
        task.xp_earned += credit;
        credit as i64
    } else {
        subtask.completed_at = None;
        let debit = subtask.xp_reward.min(task.xp_earned);
        task.xp_earned -= debit;
        -(debit as i64)
    }
}

/// Append a subtask and re-split the reward over the whole set.
pub fn add_subtask(task: &Task, subtasks: &[Subtask], title: &str) -> Vec<Subtask> {
    let mut next: Vec<Subtask> = subtasks.to_vec();
    let order = next.iter().map(|s| s.order + 1).max().unwrap_or(0);
    next.push(Subtask {
        id: new_id(),
        task_id: task.id.clone(),
        title: title.to_string(),
        completed: false,
        xp_reward: 0,
        completed_at: None,
        order,
    });
    recalculate_subtask_xp(&next, task.xp_reward)
}

/// Remove a subtask and re-split the reward over the rest. A completed
/// subtask's share is debited from the task first; the debit is returned as
/// a negative delta (0 when nothing was removed or nothing was earned).
pub fn remove_subtask(
    task: &mut Task,
    subtasks: &[Subtask],
    subtask_id: &str,
) -> (Vec<Subtask>, i64) {
    let Some(removed) = subtasks.iter().find(|s| s.id == subtask_id) else {
        return (subtasks.to_vec(), 0);
    };

    let mut delta = 0;
    if removed.completed && task.status != TaskStatus::Completed {
        let debit = removed.xp_reward.min(task.xp_earned);
        task.xp_earned -= debit;
        delta = -(debit as i64);
    }

    let rest: Vec<Subtask> = subtasks
        .iter()
        .filter(|s| s.id != subtask_id)
        .cloned()
        .collect();
    (recalculate_subtask_xp(&rest, task.xp_reward), delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use crate::task::{create_task, CreateTaskInput, EffortTier};
    use chrono::NaiveDate;

    fn setup(effort: EffortTier, titles: &[&str]) -> (Task, Vec<Subtask>, ManualClock) {
        let clock = ManualClock::at(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), 10, 0);
        let task = create_task(CreateTaskInput::new("parent", effort), &clock);
        let titles: Vec<String> = titles.iter().map(|t| t.to_string()).collect();
        let subtasks = create_subtasks(&task.id, &titles, task.xp_reward);
        (task, subtasks, clock)
    }

    #[test]
    fn even_split_rounds_down() {
        let (_, subtasks, _) = setup(EffortTier::Challenging, &["a", "b", "c"]);
        assert!(subtasks.iter().all(|s| s.xp_reward == 7));
        assert_eq!(subtasks.iter().map(|s| s.order).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn empty_titles_yield_nothing() {
        assert!(create_subtasks("t", &[], 50).is_empty());
        assert!(recalculate_subtask_xp(&[], 50).is_empty());
    }

    #[test]
    fn progress_rounds_to_nearest() {
        let (_, mut subtasks, _) = setup(EffortTier::Common, &["a", "b", "c"]);
        assert_eq!(calculate_progress(&[]), SubtaskProgress::default());
        subtasks[0].completed = true;
        assert_eq!(
            calculate_progress(&subtasks),
            SubtaskProgress { completed: 1, total: 3, percentage: 33 }
        );
        subtasks[1].completed = true;
        assert_eq!(calculate_progress(&subtasks).percentage, 67);
    }

    #[test]
    fn progress_half_rounds_up() {
        let titles = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let (_, mut subtasks, _) = setup(EffortTier::Common, &titles);
        // 1 of 8 = 12.5%
        subtasks[0].completed = true;
        assert_eq!(calculate_progress(&subtasks).percentage, 13);
    }

    #[test]
    fn all_complete_is_vacuous_for_empty() {
        assert!(are_all_subtasks_complete(&[]));
        let (_, mut subtasks, _) = setup(EffortTier::Common, &["a", "b"]);
        assert!(!are_all_subtasks_complete(&subtasks));
        subtasks.iter_mut().for_each(|s| s.completed = true);
        assert!(are_all_subtasks_complete(&subtasks));
    }

    #[test]
    fn toggle_credits_and_debits() {
        let (mut task, mut subtasks, clock) = setup(EffortTier::Common, &["a", "b", "c"]);
        let now = clock.local_now();
        assert_eq!(toggle_subtask(&mut task, &mut subtasks[0], now), 5);
        assert_eq!(task.xp_earned, 5);
        assert_eq!(subtasks[0].completed_at, Some(now));
        assert_eq!(toggle_subtask(&mut task, &mut subtasks[0], now), -5);
        assert_eq!(task.xp_earned, 0);
        assert!(subtasks[0].completed_at.is_none());
    }

    #[test]
    fn toggle_never_exceeds_reward() {
        let (mut task, mut subtasks, clock) = setup(EffortTier::Trivial, &["a"]);
        task.xp_earned = 3;
        assert_eq!(toggle_subtask(&mut task, &mut subtasks[0], clock.local_now()), 2);
        assert_eq!(task.xp_earned, task.xp_reward);
    }

    #[test]
    fn toggle_on_completed_task_is_frozen() {
        let (mut task, mut subtasks, clock) = setup(EffortTier::Common, &["a"]);
        task.status = TaskStatus::Completed;
        assert_eq!(toggle_subtask(&mut task, &mut subtasks[0], clock.local_now()), 0);
        assert!(!subtasks[0].completed);
    }

    #[test]
    fn add_subtask_resplits() {
        let (task, subtasks, _) = setup(EffortTier::Epic, &["a", "b"]);
        assert_eq!(subtasks[0].xp_reward, 20);
        let next = add_subtask(&task, &subtasks, "c");
        assert_eq!(next.len(), 3);
        assert!(next.iter().all(|s| s.xp_reward == 13));
        assert_eq!(next[2].order, 2);
        assert_eq!(next[2].task_id, task.id);
    }

    #[test]
    fn remove_completed_subtask_debits() {
        let (mut task, mut subtasks, clock) = setup(EffortTier::Legendary, &["a", "b"]);
        toggle_subtask(&mut task, &mut subtasks[0], clock.local_now());
        assert_eq!(task.xp_earned, 25);

        let id = subtasks[0].id.clone();
        let (rest, delta) = remove_subtask(&mut task, &subtasks, &id);
        assert_eq!(delta, -25);
        assert_eq!(task.xp_earned, 0);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].xp_reward, 50);
    }

    #[test]
    fn remove_unknown_subtask_is_noop() {
        let (mut task, subtasks, _) = setup(EffortTier::Common, &["a"]);
        let (rest, delta) = remove_subtask(&mut task, &subtasks, "missing");
        assert_eq!(rest, subtasks);
        assert_eq!(delta, 0);
    }
}
