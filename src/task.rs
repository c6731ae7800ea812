//! The task record and its small value types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stand-in due date for tasks without a deadline, so date ordering is total.
pub fn no_deadline() -> NaiveDate {
    NaiveDate::from_ymd_opt(2100, 1, 1).unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Sort weight: high 3, medium 2, low 1.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Next priority in `ALL`, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::Medium => Self::Low,
            Self::High => Self::Medium,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(UnknownValue(other.to_owned())),
        }
    }
}

/// The lane a task lives in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Created,
    Progress,
    Completed,
}

impl Status {
    /// Lanes in display order.
    pub const ALL: [Status; 3] = [Status::Created, Status::Progress, Status::Completed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Progress => "progress",
            Self::Completed => "completed",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Progress => "Progress",
            Self::Completed => "Completed",
        }
    }

    /// Position of the lane in `ALL`.
    pub const fn index(self) -> usize {
        match self {
            Self::Created => 0,
            Self::Progress => 1,
            Self::Completed => 2,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(Self::Created),
            "progress" => Ok(Self::Progress),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownValue(other.to_owned())),
        }
    }
}

/// Returned when a stored enum value is not one we know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownValue(pub String);

/// Creation-time ordering key. Also identifies a task on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskOrder(pub u64);

impl fmt::Display for TaskOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    text: String,
    priority: Priority,
    due_date: Option<NaiveDate>,
    status: Status,
    order: TaskOrder,
}

impl Task {
    /// Builds a task in the created lane.
    ///
    /// Returns `None` when `text` is empty after trimming.
    pub fn new(
        text: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
        order: TaskOrder,
    ) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_owned(),
            priority,
            due_date,
            status: Status::Created,
            order,
        })
    }

    /// Same as [`Task::new`] but placed straight into `status`, for records read back from storage.
    pub fn restore(
        text: &str,
        priority: Priority,
        due_date: Option<NaiveDate>,
        status: Status,
        order: TaskOrder,
    ) -> Option<Self> {
        let mut task = Self::new(text, priority, due_date, order)?;
        task.status = status;
        Some(task)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn priority(&self) -> Priority {
        self.priority
    }

    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Due date, or [`no_deadline`] when there is none.
    pub fn due_or_sentinel(&self) -> NaiveDate {
        self.due_date.unwrap_or_else(no_deadline)
    }

    pub const fn status(&self) -> Status {
        self.status
    }

    pub const fn order(&self) -> TaskOrder {
        self.order
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_text_is_rejected(#[case] text: &str) {
        assert!(Task::new(text, Priority::High, None, TaskOrder(1)).is_none());
    }

    #[rstest]
    fn text_is_trimmed_and_task_starts_created() {
        let task = Task::new("  Buy milk ", Priority::default(), None, TaskOrder(7)).unwrap();
        assert_eq!(task.text(), "Buy milk");
        assert_eq!(task.priority(), Priority::Low);
        assert_eq!(task.status(), Status::Created);
        assert!(!task.is_completed());
        assert_eq!(task.order(), TaskOrder(7));
    }

    #[rstest]
    fn missing_due_date_uses_far_future_sentinel() {
        let task = Task::new("x", Priority::Low, None, TaskOrder(1)).unwrap();
        assert_eq!(task.due_or_sentinel(), NaiveDate::from_ymd_opt(2100, 1, 1).unwrap());

        let due = NaiveDate::from_ymd_opt(2030, 5, 4).unwrap();
        let dated = Task::new("y", Priority::Low, Some(due), TaskOrder(2)).unwrap();
        assert_eq!(dated.due_or_sentinel(), due);
    }

    #[rstest]
    #[case(Priority::Low, 1)]
    #[case(Priority::Medium, 2)]
    #[case(Priority::High, 3)]
    fn priority_ranks(#[case] priority: Priority, #[case] rank: u8) {
        assert_eq!(priority.rank(), rank);
        assert_eq!(priority.as_str().parse::<Priority>(), Ok(priority));
    }

    #[rstest]
    fn priority_cycles_both_ways() {
        for priority in Priority::ALL {
            assert_eq!(priority.next().previous(), priority);
        }
        assert_eq!(Priority::High.next(), Priority::Low);
    }

    #[rstest]
    fn status_wire_names_round_trip() {
        for (index, status) in Status::ALL.into_iter().enumerate() {
            assert_eq!(status.index(), index);
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
        assert_eq!(
            "done".parse::<Status>(),
            Err(UnknownValue("done".to_owned()))
        );
    }

    #[rstest]
    fn restore_keeps_status_and_completion_mark() {
        let task = Task::restore("x", Priority::Medium, None, Status::Completed, TaskOrder(3)).unwrap();
        assert!(task.is_completed());
    }
}
