//! tasklane: a three-lane task list with priorities, due dates, sorting and a persisted
//! light/dark theme.

pub mod app;
pub mod board;
pub mod config;
pub mod error;
pub mod logging;
pub mod ordering;
pub mod store;
pub mod task;
pub mod theme;
pub mod ui;

pub use board::{Counters, OrderSequence, TaskBoard};
pub use ordering::SortMode;
pub use store::{FileStore, KeyValueStore, MemoryStore, Persistence};
pub use task::{Priority, Status, Task, TaskOrder};
pub use theme::Theme;
