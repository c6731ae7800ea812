//! Display ordering of the board: sort a lane by priority or due date, or put it back in
//! creation order.
//!
//! Every function here works lane by lane. Tasks never change lane, and the resulting
//! sequence is grouped lane after lane in [`Status::ALL`] order.

use crate::task::{Status, Task};
use std::cmp::{Ordering, Reverse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// High before medium before low.
    Priority,
    /// Earliest due date first; undated tasks last.
    Date,
}

/// Sorts each lane of `tasks` by `mode`. Ties keep their current relative order.
pub fn sort_tasks(tasks: &mut Vec<Task>, mode: SortMode) {
    per_lane(tasks, |a, b| match mode {
        SortMode::Priority => Reverse(a.priority().rank()).cmp(&Reverse(b.priority().rank())),
        SortMode::Date => a.due_or_sentinel().cmp(&b.due_or_sentinel()),
    });
}

/// Restores creation order inside each lane.
pub fn reset_order(tasks: &mut Vec<Task>) {
    per_lane(tasks, |a, b| a.order().cmp(&b.order()));
}

/// Splits `tasks` into lanes, stable-sorts each with `compare`, and joins them back.
fn per_lane<F>(tasks: &mut Vec<Task>, compare: F)
where
    F: Fn(&Task, &Task) -> Ordering,
{
    let mut lanes: [Vec<Task>; 3] = Default::default();
    for task in tasks.drain(..) {
        lanes[task.status().index()].push(task);
    }
    for lane in &mut lanes {
        lane.sort_by(&compare);
    }
    tasks.extend(lanes.into_iter().flatten());
}

/// Groups `tasks` lane after lane without reordering within a lane.
pub(crate) fn group_lanes(tasks: &mut Vec<Task>) {
    per_lane(tasks, |_, _| Ordering::Equal);
}

/// Tasks of one lane, in display order.
pub fn lane(tasks: &[Task], status: Status) -> Vec<&Task> {
    tasks.iter().filter(|t| t.status() == status).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, TaskOrder};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn task(text: &str, priority: Priority, due: Option<(i32, u32, u32)>, status: Status, order: u64) -> Task {
        let due = due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d));
        Task::restore(text, priority, due, status, TaskOrder(order)).unwrap()
    }

    fn texts(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(Task::text).collect()
    }

    #[rstest]
    fn priority_sort_is_descending_and_stable() {
        let mut tasks = vec![
            task("a", Priority::Low, None, Status::Created, 1),
            task("b", Priority::High, None, Status::Created, 2),
            task("c", Priority::Low, None, Status::Created, 3),
            task("d", Priority::Medium, None, Status::Created, 4),
            task("e", Priority::High, None, Status::Created, 5),
        ];
        sort_tasks(&mut tasks, SortMode::Priority);
        assert_eq!(texts(&tasks), ["b", "e", "d", "a", "c"]);
    }

    #[rstest]
    fn date_sort_puts_undated_last() {
        let mut tasks = vec![
            task("none", Priority::Low, None, Status::Progress, 1),
            task("late", Priority::Low, Some((2031, 3, 1)), Status::Progress, 2),
            task("early", Priority::Low, Some((2030, 1, 9)), Status::Progress, 3),
            task("none2", Priority::Low, None, Status::Progress, 4),
            task("early2", Priority::Low, Some((2030, 1, 9)), Status::Progress, 5),
        ];
        sort_tasks(&mut tasks, SortMode::Date);
        assert_eq!(texts(&tasks), ["early", "early2", "late", "none", "none2"]);
    }

    #[rstest]
    fn sorting_never_moves_tasks_between_lanes() {
        let mut tasks = vec![
            task("c-low", Priority::Low, None, Status::Completed, 1),
            task("p-low", Priority::Low, None, Status::Progress, 2),
            task("c-high", Priority::High, None, Status::Completed, 3),
            task("n-high", Priority::High, None, Status::Created, 4),
        ];
        sort_tasks(&mut tasks, SortMode::Priority);

        assert_eq!(texts(&tasks), ["n-high", "p-low", "c-high", "c-low"]);
        assert_eq!(
            tasks.iter().map(Task::status).collect::<Vec<_>>(),
            [Status::Created, Status::Progress, Status::Completed, Status::Completed]
        );
    }

    #[rstest]
    #[case(SortMode::Priority)]
    #[case(SortMode::Date)]
    fn reset_restores_creation_order_after_any_sort(#[case] mode: SortMode) {
        let mut tasks = vec![
            task("1", Priority::Low, Some((2032, 1, 1)), Status::Created, 10),
            task("2", Priority::High, None, Status::Created, 20),
            task("3", Priority::Medium, Some((2030, 1, 1)), Status::Created, 30),
        ];
        sort_tasks(&mut tasks, mode);
        reset_order(&mut tasks);
        assert_eq!(texts(&tasks), ["1", "2", "3"]);
    }

    #[rstest]
    fn lane_filters_by_status_in_display_order() {
        let tasks = vec![
            task("a", Priority::Low, None, Status::Progress, 1),
            task("b", Priority::Low, None, Status::Created, 2),
            task("c", Priority::Low, None, Status::Progress, 3),
        ];
        let progress: Vec<_> = lane(&tasks, Status::Progress).into_iter().map(Task::text).collect();
        assert_eq!(progress, ["a", "c"]);
        assert!(lane(&tasks, Status::Completed).is_empty());
    }

    #[rstest]
    fn group_lanes_keeps_relative_order() {
        let mut tasks = vec![
            task("p1", Priority::Low, None, Status::Progress, 5),
            task("n1", Priority::Low, None, Status::Created, 9),
            task("p2", Priority::Low, None, Status::Progress, 1),
        ];
        group_lanes(&mut tasks);
        assert_eq!(texts(&tasks), ["n1", "p1", "p2"]);
    }
}
