use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tasklane::{app::App, config::Config, logging, ui, FileStore, TaskBoard};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    let _log_guard = logging::init(&config.log_dir)?;
    let store = FileStore::new(&config.data_dir);
    info!(data_dir = %store.dir().display(), "starting tasklane");

    let board = TaskBoard::open(store);
    let mut app = App::new(board);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = %err, "terminal loop failed");
        eprintln!("{err:?}");
    }
    info!("exiting");
    Ok(())
}
