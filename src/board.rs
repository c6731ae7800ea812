use crate::ordering::{self, SortMode};
use crate::store::{KeyValueStore, Persistence};
use crate::task::{Priority, Status, Task, TaskOrder};
use crate::theme::Theme;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

/// Hands out strictly increasing order keys.
///
/// Keys follow the wall clock in milliseconds, but never repeat or go backwards: when the
/// clock has not moved past the last key, the next key is last + 1. Once the key space is
/// spent no further keys are handed out.
#[derive(Debug, Clone, Default)]
pub struct OrderSequence {
    last: Option<u64>,
}

impl OrderSequence {
    /// Continues after the largest key in `tasks`.
    pub fn after(tasks: &[Task]) -> Self {
        Self {
            last: tasks.iter().map(|t| t.order().0).max(),
        }
    }

    /// Returns `None` when the last key was `u64::MAX`.
    pub fn next_at(&mut self, now_millis: u64) -> Option<TaskOrder> {
        let next = match self.last {
            Some(last) if now_millis <= last => last.checked_add(1)?,
            _ => now_millis,
        };
        self.last = Some(next);
        Some(TaskOrder(next))
    }

    pub fn next(&mut self) -> Option<TaskOrder> {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        self.next_at(now)
    }
}

/// Totals shown under the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub total: usize,
    pub completed: usize,
}

impl Counters {
    pub fn of(tasks: &[Task]) -> Self {
        Self {
            total: tasks.len(),
            completed: tasks.iter().filter(|t| t.is_completed()).count(),
        }
    }

    pub const fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    /// Share of completed tasks, 0 to 100. Zero for an empty board.
    pub fn progress_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }

    /// "1 task left", "3 tasks left", "0 tasks left".
    pub fn remaining_label(&self) -> String {
        let left = self.remaining();
        let plural = if left == 1 { "" } else { "s" };
        format!("{left} task{plural} left")
    }
}

/// The task list: owns every live task and keeps the store in step with it.
///
/// Tasks are held in display order, grouped lane by lane. Every mutation, sort and reset
/// writes a full snapshot.
#[derive(Debug)]
pub struct TaskBoard<S> {
    tasks: Vec<Task>,
    theme: Theme,
    sequence: OrderSequence,
    persistence: Persistence<S>,
}

impl<S: KeyValueStore> TaskBoard<S> {
    /// Loads whatever `store` holds; an empty or unreadable store gives an empty board.
    pub fn open(store: S) -> Self {
        let persistence = Persistence::new(store);
        let mut tasks = persistence.load_all();
        ordering::group_lanes(&mut tasks);
        let theme = persistence.load_theme();
        info!(tasks = tasks.len(), %theme, "opened board");
        Self {
            sequence: OrderSequence::after(&tasks),
            tasks,
            theme,
            persistence,
        }
    }

    /// Every task, lane after lane.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn lane(&self, status: Status) -> Vec<&Task> {
        ordering::lane(&self.tasks, status)
    }

    /// All three lanes in [`Status::ALL`] order.
    pub fn lanes(&self) -> [(Status, Vec<&Task>); 3] {
        Status::ALL.map(|status| (status, self.lane(status)))
    }

    pub fn get(&self, order: TaskOrder) -> Option<&Task> {
        self.tasks.iter().find(|t| t.order() == order)
    }

    pub fn counters(&self) -> Counters {
        Counters::of(&self.tasks)
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    pub fn into_store(self) -> S {
        self.persistence.into_store()
    }

    /// Adds a task at the end of the created lane.
    ///
    /// Returns `None` and changes nothing when `text` is blank or no order key is left.
    pub fn add_task(
        &mut self,
        text: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
    ) -> Option<TaskOrder> {
        if text.trim().is_empty() {
            return None;
        }
        let Some(order) = self.sequence.next() else {
            warn!("order keys exhausted, not adding task");
            return None;
        };
        let task = Task::new(text, priority, due_date, order)?;
        let order = task.order();
        debug!(%order, %priority, "adding task");
        self.tasks.push(task);
        self.regroup_and_save();
        Some(order)
    }

    /// Moves a task to the end of the `status` lane. Any lane may follow any other.
    ///
    /// Returns `false` when no task has that order key.
    pub fn move_task(&mut self, order: TaskOrder, status: Status) -> bool {
        let Some(index) = self.position(order) else {
            return false;
        };
        let mut task = self.tasks.remove(index);
        debug!(%order, from = %task.status(), to = %status, "moving task");
        task.set_status(status);
        self.tasks.push(task);
        self.regroup_and_save();
        true
    }

    /// Removes a task for good. Returns `false` when no task has that order key.
    pub fn delete_task(&mut self, order: TaskOrder) -> bool {
        let Some(index) = self.position(order) else {
            return false;
        };
        self.tasks.remove(index);
        debug!(%order, "deleted task");
        self.save();
        true
    }

    pub fn sort_tasks(&mut self, mode: SortMode) {
        ordering::sort_tasks(&mut self.tasks, mode);
        debug!(?mode, "sorted lanes");
        self.save();
    }

    pub fn reset_order(&mut self) {
        ordering::reset_order(&mut self.tasks);
        debug!("restored creation order");
        self.save();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.persistence.save_theme(self.theme);
        debug!(theme = %self.theme, "toggled theme");
        self.theme
    }

    fn position(&self, order: TaskOrder) -> Option<usize> {
        self.tasks.iter().position(|t| t.order() == order)
    }

    fn regroup_and_save(&mut self) {
        ordering::group_lanes(&mut self.tasks);
        self.save();
    }

    fn save(&mut self) {
        self.persistence.save_all(&self.tasks);
    }
}
