use crate::app::{AddForm, App, FormField, Mode};
use crate::store::KeyValueStore;
use crate::task::{Priority, Status, Task};
use crate::theme::Theme;
use chrono::Local;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

const HELP: &str =
    "a add  ←/→ lane  ↑/↓ task  1/2/3 move  d delete  p priority  s date  r reset  t theme  q quit";

/// Colours for one theme.
struct Palette {
    text: Color,
    background: Color,
    muted: Color,
    accent: Color,
}

impl Palette {
    fn of(theme: Theme) -> Self {
        if theme.is_dark() {
            Self {
                text: Color::White,
                background: Color::Black,
                muted: Color::Gray,
                accent: Color::Cyan,
            }
        } else {
            Self {
                text: Color::Black,
                background: Color::White,
                muted: Color::DarkGray,
                accent: Color::Blue,
            }
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Green,
        Priority::Medium => Color::Yellow,
        Priority::High => Color::Red,
    }
}

/// Draws and reads keys until the user quits.
pub fn run_app<B: Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key, Local::now().date_naive());
            }
        }
    }
    Ok(())
}

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>) {
    let palette = Palette::of(app.board.theme());
    f.render_widget(Block::default().style(palette.base()), f.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let header = Line::from(vec![
        Span::styled("tasklane", Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)),
        Span::styled(format!("  [{}]  ", app.board.theme()), Style::default().fg(palette.muted)),
        Span::styled(HELP, Style::default().fg(palette.muted)),
    ]);
    f.render_widget(Paragraph::new(header), rows[0]);

    draw_lanes(f, app, &palette, rows[1]);
    draw_footer(f, app, &palette, rows[2]);

    if let Mode::Adding(form) = &app.mode {
        draw_form(f, form, &palette);
    }
}

fn draw_lanes<S: KeyValueStore>(f: &mut Frame, app: &App<S>, palette: &Palette, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    for ((status, tasks), column) in app.board.lanes().into_iter().zip(columns.iter()) {
        let selected = status == app.selected_lane;
        let items: Vec<ListItem> = tasks.iter().map(|t| task_item(t, palette)).collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("{} ({})", status.label(), tasks.len()))
                    .borders(Borders::ALL)
                    .border_style(if selected {
                        Style::default().fg(palette.accent)
                    } else {
                        Style::default().fg(palette.muted)
                    }),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        if selected && !tasks.is_empty() {
            state.select(Some(app.selected_task));
        }
        f.render_stateful_widget(list, *column, &mut state);
    }
}

fn task_item<'a>(task: &'a Task, palette: &Palette) -> ListItem<'a> {
    let mut text_style = Style::default().fg(palette.text);
    if task.status() == Status::Completed {
        text_style = text_style.add_modifier(Modifier::CROSSED_OUT);
    }

    let mut spans = vec![
        Span::styled(task.text(), text_style),
        Span::raw(" "),
        Span::styled(
            format!("[{}]", task.priority()),
            Style::default().fg(priority_color(task.priority())),
        ),
    ];
    if let Some(due) = task.due_date() {
        spans.push(Span::styled(
            format!(" (Due: {due})"),
            Style::default().fg(palette.muted),
        ));
    }
    ListItem::new(Line::from(spans))
}

fn draw_footer<S: KeyValueStore>(f: &mut Frame, app: &App<S>, palette: &Palette, area: Rect) {
    let counters = app.board.counters();
    let percent = counters.progress_percent();
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(counters.remaining_label())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.muted)),
        )
        .gauge_style(Style::default().fg(palette.accent).bg(palette.background))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{percent:.0}%"));
    f.render_widget(gauge, area);
}

fn draw_form(f: &mut Frame, form: &AddForm, palette: &Palette) {
    let area = centered(f.area(), 60, 8);
    let field_style = |field: FormField| {
        if form.field == field {
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text)
        }
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Task:     ", field_style(FormField::Text)),
            Span::raw(form.text.as_str()),
        ]),
        priority_picker(form.priority, field_style(FormField::Priority), palette),
        Line::from(vec![
            Span::styled("Due:      ", field_style(FormField::DueDate)),
            Span::raw(form.due_date.as_str()),
            Span::styled("  YYYY-MM-DD, blank for none", Style::default().fg(palette.muted)),
        ]),
    ];
    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
    }
    lines.push(Line::from(Span::styled(
        "Tab next field  Enter add  Esc cancel",
        Style::default().fg(palette.muted),
    )));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).style(palette.base()).block(
            Block::default()
                .title("New task")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent)),
        ),
        area,
    );
}

/// Every priority side by side, the chosen one marked `< >` in its badge colour.
fn priority_picker<'a>(chosen: Priority, label_style: Style, palette: &Palette) -> Line<'a> {
    let mut spans = vec![Span::styled("Priority: ", label_style)];
    for priority in Priority::ALL {
        if priority == chosen {
            spans.push(Span::styled(
                format!("< {priority} > "),
                Style::default()
                    .fg(priority_color(priority))
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                format!("  {priority}   "),
                Style::default().fg(palette.muted),
            ));
        }
    }
    Line::from(spans)
}

/// A `width` x `height` box in the middle of `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
