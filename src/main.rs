mod app;
mod domain;
mod history;
mod input;
mod manager;
mod persistence;
mod ui;

use anyhow::Result;
use app::{format_date, parse_date_input, AppState};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::{
    has_due_date, quadrant_of, sort_tasks_by_relevance, today, Importance, Quadrant, Relevance,
    Task,
};
use manager::TaskManager;
use persistence::{
    ensure_dir, init_local_store, load_settings, resolve_tasks_file, save_settings,
    sibling_dir, JsonStore, Settings, TaskStore, CURRENT_VERSION, LOG_FILE_NAME,
    SETTINGS_FILE_NAME,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;

const TICK_RATE: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "eisenhower")]
#[command(about = "A terminal task manager built around the Eisenhower matrix", long_about = None)]
struct Cli {
    /// Task file to use instead of the store directory's tasks.json
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .eisenhower directory in the current directory
    Init,
    /// Print the matrix grouped by quadrant and relevance
    List,
    /// Add a task without opening the TUI
    Add {
        /// Task name
        name: String,
        /// Mark the task as important
        #[arg(long)]
        important: bool,
        /// Due date (YYYY-MM-DD, +N, today or tomorrow)
        #[arg(long)]
        due: Option<String>,
    },
    /// Edit a task by name; all changes are applied as one step
    Edit {
        /// Name of the task to edit
        name: String,
        /// New name
        #[arg(long)]
        rename: Option<String>,
        /// Mark the task as important
        #[arg(long, conflicts_with = "unimportant")]
        important: bool,
        /// Mark the task as unimportant
        #[arg(long)]
        unimportant: bool,
        /// New due date (YYYY-MM-DD, +N, today or tomorrow)
        #[arg(long)]
        due: Option<String>,
        /// Append a note
        #[arg(long)]
        note: Option<String>,
    },
    /// Upgrade the task file to the current schema, keeping a backup
    Migrate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Init) = cli.command {
        let store_dir = init_local_store(&std::env::current_dir()?)?;
        save_settings(store_dir.join(SETTINGS_FILE_NAME), &Settings::default())?;
        println!("Initialized eisenhower directory: {}", store_dir.display());
        println!();
        println!("Run 'eisenhower' here to use this local task list.");
        return Ok(());
    }

    let tasks_file = resolve_tasks_file(cli.file)?;
    let store_dir = sibling_dir(&tasks_file);
    ensure_dir(&store_dir)?;
    let _guard = init_logging(&store_dir.join(LOG_FILE_NAME));
    tracing::info!(file = %tasks_file.display(), "starting");

    let store = JsonStore::new(&tasks_file);
    match cli.command {
        Some(Commands::Init) => Ok(()),
        Some(Commands::List) => list(&store),
        Some(Commands::Add {
            name,
            important,
            due,
        }) => add(&store, &name, important, due.as_deref()),
        Some(Commands::Edit {
            name,
            rename,
            important,
            unimportant,
            due,
            note,
        }) => {
            let importance = match (important, unimportant) {
                (true, _) => Some(Importance::Important),
                (_, true) => Some(Importance::Unimportant),
                _ => None,
            };
            let changes = TaskEdit {
                rename,
                importance,
                due,
                note,
            };
            edit(&store, &name, changes)
        }
        Some(Commands::Migrate) => migrate(&store),
        None => {
            let settings = load_settings(store_dir.join(SETTINGS_FILE_NAME))?;
            run_tui(store, settings)
        }
    }
}

/// Route tracing output to a log file; the terminal belongs to the TUI
fn init_logging(log_path: &Path) -> Option<WorkerGuard> {
    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

fn list(store: &JsonStore) -> Result<()> {
    let tasks = store.load()?;
    let today = today();

    for quadrant in Quadrant::all() {
        let in_quadrant: Vec<&Task> = tasks
            .iter()
            .filter(|task| quadrant_of(task, today) == *quadrant)
            .collect();
        if in_quadrant.is_empty() {
            continue;
        }

        println!("== {} ==", quadrant.name());
        let groups = sort_tasks_by_relevance(in_quadrant, today);
        for relevance in Relevance::all() {
            for task in groups.bucket(*relevance) {
                println!("  {}", describe(task, *relevance, today));
            }
        }
        println!();
    }
    Ok(())
}

fn describe(task: &Task, relevance: Relevance, today: chrono::NaiveDate) -> String {
    let mut line = format!("[{}] {}", relevance.label(), task.name());
    match relevance {
        Relevance::Due | Relevance::Normal => {
            if has_due_date(task, today) {
                if let Some(due) = task.due(today) {
                    line.push_str(&format!(" (due {})", format_date(due)));
                }
            }
        }
        Relevance::Snoozed => {
            if let Some(snooze) = task.snooze(today) {
                line.push_str(&format!(" (snoozed until {})", format_date(snooze)));
            }
        }
        Relevance::Completed => {
            if let Some(completed) = task.completed() {
                line.push_str(&format!(" (done {})", format_date(completed)));
            }
        }
    }
    line
}

fn add(store: &JsonStore, name: &str, important: bool, due: Option<&str>) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Task name cannot be empty");
    }

    let importance = if important {
        Importance::Important
    } else {
        Importance::Unimportant
    };
    let mut task = Task::new(name).with_importance(importance);
    if let Some(due) = due {
        task = task.with_due(Some(parse_date_input(due, today())?));
    }

    let mut manager = TaskManager::new(store.load()?);
    manager.add(task);
    store.save(manager.tasks())?;
    println!("Added: {}", name);
    Ok(())
}

/// Field changes for `edit`
struct TaskEdit {
    rename: Option<String>,
    importance: Option<Importance>,
    due: Option<String>,
    note: Option<String>,
}

fn edit(store: &JsonStore, name: &str, changes: TaskEdit) -> Result<()> {
    let mut manager = TaskManager::new(store.load()?);
    let Some(old) = manager.tasks().iter().find(|t| t.name() == name).cloned() else {
        anyhow::bail!("No task named '{}'", name);
    };

    let mut new = old.clone();
    if let Some(rename) = changes.rename {
        let rename = rename.trim();
        if rename.is_empty() {
            anyhow::bail!("Task name cannot be empty");
        }
        new = new.with_name(rename);
    }
    if let Some(importance) = changes.importance {
        new = new.with_importance(importance);
    }
    if let Some(due) = changes.due {
        new = new.with_due(Some(parse_date_input(&due, today())?));
    }
    if let Some(note) = changes.note {
        let mut notes = new.notes().to_vec();
        notes.push(note);
        new = new.with_notes(notes);
    }

    if new == old {
        println!("Nothing to change");
        return Ok(());
    }
    manager.replace(&old, new);
    store.save(manager.tasks())?;
    println!("Updated: {}", name);
    Ok(())
}

fn migrate(store: &JsonStore) -> Result<()> {
    let Some(schema) = store.read_schema()? else {
        println!("Nothing to migrate: {} is empty", store.path().display());
        return Ok(());
    };

    let version = schema.version();
    if version == CURRENT_VERSION {
        println!("Already at version {}", CURRENT_VERSION);
        return Ok(());
    }

    if let Some(backup) = store.backup_if_outdated()? {
        println!("Backup written to {}", backup.display());
    }
    let tasks = store.load()?;
    store.save(&tasks)?;
    tracing::info!(from = version, to = CURRENT_VERSION, "migrated task file");
    println!(
        "Migrated {} tasks from version {} to {}",
        tasks.len(),
        version,
        CURRENT_VERSION
    );
    Ok(())
}

fn run_tui(store: JsonStore, settings: Settings) -> Result<()> {
    let tasks = store.load()?;
    let title = store.path().display().to_string();
    let mut app = AppState::new(Box::new(store), tasks, settings, title);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Save on exit, only if something changed
    let saved = if app.needs_save { app.save() } else { Ok(()) };
    session_outcome(result, saved)
}

/// The loop's error wins over a failed exit save; either one fails the process
fn session_outcome(run: Result<()>, save: Result<()>) -> Result<()> {
    if let Err(e) = &save {
        tracing::error!("failed to save on exit: {:#}", e);
    }
    match run {
        Err(e) => {
            tracing::error!("{:#}", e);
            Err(e)
        }
        Ok(()) => save,
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key)? {
                    return Ok(());
                }
            }
        }

        if app.needs_save {
            if let Err(e) = app.save() {
                tracing::error!("autosave failed: {:#}", e);
                app.status = Some(format!("Save failed: {}", e));
            }
        }
    }
}
