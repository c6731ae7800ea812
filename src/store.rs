//! Durable storage for the board: a flat key-value store plus the adapter that maps the
//! task set and the theme onto two of its entries.
//!
//! The adapter never fails outward. Reads of a missing or malformed entry fall back to an
//! empty board (or the light theme) and writes that fail are logged and dropped.

use crate::error::StoreError;
use crate::task::{Priority, Status, Task, TaskOrder};
use crate::theme::Theme;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const TASKS_KEY: &str = "tasks";
pub const THEME_KEY: &str = "theme";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A flat string-to-string store that outlives the process.
pub trait KeyValueStore {
    /// Returns `Ok(None)` when nothing has been stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces whatever is stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// The directory is created on the first write, not here.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(path, err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|err| StoreError::io(&self.dir, err))?;
        let path = self.path_for(key);
        // Write beside the target and rename, so a crash never leaves half an entry.
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value).map_err(|err| StoreError::io(&staging, err))?;
        fs::rename(&staging, &path).map_err(|err| StoreError::io(&path, err))
    }
}

/// In-process store, for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Stored shape of one task.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    text: String,
    #[serde(default, deserialize_with = "lenient_priority")]
    priority: Priority,
    /// `YYYY-MM-DD`, or empty for no deadline.
    #[serde(default, deserialize_with = "lenient_due_date")]
    due_date: String,
    status: Status,
    #[serde(deserialize_with = "order_number_or_text")]
    order: TaskOrder,
}

impl TaskRecord {
    fn from_task(task: &Task) -> Self {
        Self {
            text: task.text().to_owned(),
            priority: task.priority(),
            due_date: task
                .due_date()
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            status: task.status(),
            order: task.order(),
        }
    }

    fn into_task(self) -> Option<Task> {
        let due_date = match self.due_date.trim() {
            "" => None,
            raw => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(err) => {
                    warn!(order = %self.order, due_date = raw, error = %err, "dropping unreadable due date");
                    None
                }
            },
        };
        Task::restore(&self.text, self.priority, due_date, self.status, self.order)
    }
}

/// Unknown or missing priorities read back as low.
fn lenient_priority<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default())
}

/// A null or non-string due date reads back as no deadline.
fn lenient_due_date<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned).unwrap_or_default())
}

/// Older snapshots stored the order key as a decimal string.
fn order_number_or_text<'de, D>(deserializer: D) -> Result<TaskOrder, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawOrder {
        Number(u64),
        Text(String),
    }

    match RawOrder::deserialize(deserializer)? {
        RawOrder::Number(n) => Ok(TaskOrder(n)),
        RawOrder::Text(text) => text
            .trim()
            .parse()
            .map(TaskOrder)
            .map_err(serde::de::Error::custom),
    }
}

/// Saves and restores the board and the theme through a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Overwrites the stored task set with `tasks`, keeping their sequence.
    pub fn save_all(&mut self, tasks: &[Task]) {
        let records: Vec<TaskRecord> = tasks.iter().map(TaskRecord::from_task).collect();
        let result = serde_json::to_string(&records)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(TASKS_KEY, &json));
        match result {
            Ok(()) => debug!(count = records.len(), "saved tasks"),
            Err(err) => warn!(error = %err, "failed to save tasks"),
        }
    }

    /// Reads the stored task set in stored sequence. Missing or malformed data gives an empty board;
    /// individual unreadable records and repeated order keys are skipped.
    pub fn load_all(&self) -> Vec<Task> {
        let raw = match self.store.get(TASKS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read tasks, starting empty");
                return Vec::new();
            }
        };
        let entries: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "stored tasks are malformed, starting empty");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let tasks: Vec<Task> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<TaskRecord>(entry) {
                Ok(record) => record.into_task(),
                Err(err) => {
                    warn!(error = %err, "skipping unreadable task record");
                    None
                }
            })
            .filter(|task| {
                let fresh = seen.insert(task.order());
                if !fresh {
                    warn!(order = %task.order(), "skipping task with repeated order key");
                }
                fresh
            })
            .collect();
        debug!(count = tasks.len(), "loaded tasks");
        tasks
    }

    pub fn save_theme(&mut self, theme: Theme) {
        let result = serde_json::to_string(&theme)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(THEME_KEY, &json));
        if let Err(err) = result {
            warn!(error = %err, "failed to save theme");
        }
    }

    /// Light unless a dark preference was stored.
    pub fn load_theme(&self) -> Theme {
        match self.store.get(THEME_KEY) {
            Ok(Some(raw)) => parse_theme(&raw),
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!(error = %err, "failed to read theme");
                Theme::default()
            }
        }
    }
}

/// Accepts the JSON string form and the bare word.
fn parse_theme(raw: &str) -> Theme {
    serde_json::from_str(raw).unwrap_or_else(|_| match raw.trim() {
        "dark" => Theme::Dark,
        _ => Theme::Light,
    })
}
