//! Terminal-side state: which lane and task are selected, the add form, and the mapping
//! from key presses to board operations. Nothing here draws.

use crate::board::TaskBoard;
use crate::error::InputError;
use crate::ordering::SortMode;
use crate::store::KeyValueStore;
use crate::task::{Priority, Status, TaskOrder};
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};

/// Reads the due-date field. Empty means no deadline; dates before `today` are refused.
pub fn parse_due_date(raw: &str, today: NaiveDate) -> Result<Option<NaiveDate>, InputError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| InputError::InvalidDate(raw.to_owned()))?;
    if date < today {
        return Err(InputError::PastDate { date, today });
    }
    Ok(Some(date))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Text,
    Priority,
    DueDate,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            Self::Text => Self::Priority,
            Self::Priority => Self::DueDate,
            Self::DueDate => Self::Text,
        }
    }

    fn previous(self) -> Self {
        match self {
            Self::Text => Self::DueDate,
            Self::Priority => Self::Text,
            Self::DueDate => Self::Priority,
        }
    }
}

/// Contents of the add-task form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    pub text: String,
    pub priority: Priority,
    pub due_date: String,
    pub field: FormField,
    pub error: Option<InputError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Adding(AddForm),
}

pub struct App<S> {
    pub board: TaskBoard<S>,
    pub mode: Mode,
    pub selected_lane: Status,
    pub selected_task: usize,
    pub should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(board: TaskBoard<S>) -> Self {
        Self {
            board,
            mode: Mode::Normal,
            selected_lane: Status::Created,
            selected_task: 0,
            should_quit: false,
        }
    }

    /// Order key of the highlighted task, if the selected lane has one.
    pub fn selected_order(&self) -> Option<TaskOrder> {
        self.board
            .lane(self.selected_lane)
            .get(self.selected_task)
            .map(|task| task.order())
    }

    /// Applies one key press. `today` bounds the due date of new tasks.
    pub fn handle_key(&mut self, key: KeyEvent, today: NaiveDate) {
        if self.mode == Mode::Normal {
            self.handle_normal_key(key);
            return;
        }
        let Mode::Adding(form) = &mut self.mode else {
            return;
        };
        match handle_form_key(form, key) {
            Some(FormOutcome::Cancel) => self.mode = Mode::Normal,
            Some(FormOutcome::Submit) => self.submit_form(today),
            None => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a') => self.mode = Mode::Adding(AddForm::default()),
            KeyCode::Left => self.select_lane(self.selected_lane.index().saturating_sub(1)),
            KeyCode::Right => self.select_lane(self.selected_lane.index() + 1),
            KeyCode::Up => self.selected_task = self.selected_task.saturating_sub(1),
            KeyCode::Down => {
                let len = self.board.lane(self.selected_lane).len();
                if self.selected_task + 1 < len {
                    self.selected_task += 1;
                }
            }
            KeyCode::Char('1') => self.move_selected(Status::Created),
            KeyCode::Char('2') => self.move_selected(Status::Progress),
            KeyCode::Char('3') => self.move_selected(Status::Completed),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(order) = self.selected_order() {
                    self.board.delete_task(order);
                    self.clamp_selection();
                }
            }
            KeyCode::Char('p') => self.board.sort_tasks(SortMode::Priority),
            KeyCode::Char('s') => self.board.sort_tasks(SortMode::Date),
            KeyCode::Char('r') => self.board.reset_order(),
            KeyCode::Char('t') => {
                self.board.toggle_theme();
            }
            _ => {}
        }
    }

    fn select_lane(&mut self, index: usize) {
        if let Some(status) = Status::ALL.get(index) {
            self.selected_lane = *status;
            self.clamp_selection();
        }
    }

    fn move_selected(&mut self, status: Status) {
        if let Some(order) = self.selected_order() {
            self.board.move_task(order, status);
            self.clamp_selection();
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.board.lane(self.selected_lane).len();
        self.selected_task = self.selected_task.min(len.saturating_sub(1));
    }

    fn submit_form(&mut self, today: NaiveDate) {
        let Mode::Adding(form) = &mut self.mode else {
            return;
        };
        let due_date = match parse_due_date(&form.due_date, today) {
            Ok(due_date) => due_date,
            Err(err) => {
                form.error = Some(err);
                return;
            }
        };
        // Blank text leaves the form open, untouched.
        if self
            .board
            .add_task(&form.text, form.priority, due_date)
            .is_some()
        {
            self.mode = Mode::Normal;
            self.selected_lane = Status::Created;
            self.selected_task = self.board.lane(Status::Created).len().saturating_sub(1);
        }
    }
}

enum FormOutcome {
    Submit,
    Cancel,
}

fn handle_form_key(form: &mut AddForm, key: KeyEvent) -> Option<FormOutcome> {
    match key.code {
        KeyCode::Esc => return Some(FormOutcome::Cancel),
        KeyCode::Enter => return Some(FormOutcome::Submit),
        KeyCode::Tab => form.field = form.field.next(),
        KeyCode::BackTab => form.field = form.field.previous(),
        KeyCode::Left if form.field == FormField::Priority => form.priority = form.priority.previous(),
        KeyCode::Right if form.field == FormField::Priority => form.priority = form.priority.next(),
        KeyCode::Char(c) => match form.field {
            FormField::Text => form.text.push(c),
            FormField::DueDate => {
                form.due_date.push(c);
                form.error = None;
            }
            FormField::Priority => {}
        },
        KeyCode::Backspace => match form.field {
            FormField::Text => {
                form.text.pop();
            }
            FormField::DueDate => {
                form.due_date.pop();
                form.error = None;
            }
            FormField::Priority => {}
        },
        _ => {}
    }
    None
}
