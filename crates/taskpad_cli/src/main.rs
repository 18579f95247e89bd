//! Taskpad command-line front end.
//!
//! # Responsibility
//! - Parse arguments, open the data directory and drive `taskpad_core::App`.
//! - Print the rendered view and ask confirmations on stdin.

mod args;

use args::{Cli, Command};
use clap::Parser;
use log::info;
use std::error::Error;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use taskpad_core::db::open_db;
use taskpad_core::{
    core_version, init_logging, App, AppConfig, AppEvent, EditOutcome, EventOutcome,
    KeyValueStore, Notice, Prompter, RecordId, SqliteKeyValueStore, SystemClock,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

/// Stdin/stdout prompter. `--yes` answers every confirmation with yes.
struct TerminalPrompter {
    assume_yes: bool,
}

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{message} [y/N] ");
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes" | "YES" | "Yes")
    }

    fn notify(&mut self, notice: &Notice) {
        match notice {
            Notice::ImportSucceeded(summary) if summary.skipped > 0 => println!(
                "{} ({} records, {} entries skipped)",
                notice.message(),
                summary.imported,
                summary.skipped
            ),
            Notice::ImportSucceeded(summary) => {
                println!("{} ({} records)", notice.message(), summary.imported)
            }
            Notice::ImportFailed => eprintln!("{}", notice.message()),
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    if cli.command == Command::Version {
        println!("taskpad {}", core_version());
        return Ok(());
    }

    let data_dir = absolute(&cli.data_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    let config = AppConfig::load_from_dir(&data_dir)?;
    init_logging(config.log_level(), &AppConfig::log_dir(&data_dir))?;

    let conn = open_db(AppConfig::db_path(&data_dir))?;
    let kv = SqliteKeyValueStore::try_new(&conn)?;
    let mut app = App::open(&kv, SystemClock, &config);
    let mut prompter = TerminalPrompter {
        assume_yes: cli.yes,
    };
    info!(
        "event=cli_command module=cli status=start records={}",
        app.store().len()
    );

    execute(&mut app, cli.command, &mut prompter)
}

fn execute<S: KeyValueStore + Clone>(
    app: &mut App<S, SystemClock>,
    command: Command,
    prompter: &mut TerminalPrompter,
) -> CliResult<()> {
    match command {
        Command::Add { title, body } => {
            let body = body.join(" ");
            match app.dispatch(AppEvent::Submit { title, body }, prompter)? {
                EventOutcome::Rejected => return Err("title must not be empty".into()),
                _ => print_view(app),
            }
        }
        Command::List {
            search,
            filter,
            sort,
        } => {
            if let Some(text) = search {
                app.dispatch(AppEvent::SearchInput(text), prompter)?;
            }
            if let Some(filter) = filter {
                app.dispatch(AppEvent::FilterChanged(filter), prompter)?;
            }
            if let Some(sort) = sort {
                app.dispatch(AppEvent::SortChanged(sort), prompter)?;
            }
            print_view(app);
        }
        Command::Toggle { id } => {
            let id = resolve_id(app, &id)?;
            app.dispatch(AppEvent::ToggleDone(id), prompter)?;
            print_view(app);
        }
        Command::Edit { id, field, value } => {
            let id = resolve_id(app, &id)?;
            let field = field.into();
            app.dispatch(AppEvent::FocusEdit { id, field }, prompter)?;
            app.dispatch(AppEvent::EditInput(value.join(" ")), prompter)?;
            match app.dispatch(AppEvent::BlurEdit, prompter)? {
                EventOutcome::Edit(EditOutcome::Committed) => print_view(app),
                _ => println!("no change"),
            }
        }
        Command::Duplicate { id } => {
            let id = resolve_id(app, &id)?;
            app.dispatch(AppEvent::Duplicate(id), prompter)?;
            print_view(app);
        }
        Command::Remove { id } => {
            let id = resolve_id(app, &id)?;
            match app.dispatch(AppEvent::Delete(id), prompter)? {
                EventOutcome::Declined => println!("cancelled"),
                _ => print_view(app),
            }
        }
        Command::Clear => match app.dispatch(AppEvent::ClearAll, prompter)? {
            EventOutcome::Declined => println!("cancelled"),
            _ => print_view(app),
        },
        Command::Export { path } => {
            if let EventOutcome::Exported { file_name, json } =
                app.dispatch(AppEvent::Export, prompter)?
            {
                let path = path.unwrap_or_else(|| PathBuf::from(file_name));
                std::fs::write(&path, json)?;
                println!(
                    "exported {} records to {}",
                    app.store().len(),
                    path.display()
                );
            }
        }
        Command::Import { path } => match app.import_file(&path, prompter)? {
            EventOutcome::ImportFailed => return Err("import failed".into()),
            _ => print_view(app),
        },
        Command::Theme => {
            app.dispatch(AppEvent::ToggleTheme, prompter)?;
            println!("theme: {}", app.ui().theme.as_str());
        }
        Command::Version => {}
    }
    Ok(())
}

fn print_view<S: KeyValueStore + Clone>(app: &App<S, SystemClock>) {
    if let Some(view) = app.view() {
        print!("{view}");
    }
}

/// Resolves a full id or a unique id prefix.
fn resolve_id<S: KeyValueStore + Clone>(
    app: &App<S, SystemClock>,
    needle: &str,
) -> CliResult<RecordId> {
    let records = app.store().records();
    if let Some(record) = records.iter().find(|record| record.id.as_str() == needle) {
        return Ok(record.id.clone());
    }

    let mut matches = records
        .iter()
        .filter(|record| record.id.as_str().starts_with(needle));
    match (matches.next(), matches.next()) {
        (Some(record), None) => Ok(record.id.clone()),
        (Some(_), Some(_)) => Err(format!("id prefix `{needle}` is ambiguous").into()),
        (None, _) => Err(format!("no record with id `{needle}`").into()),
    }
}

fn absolute(path: &Path) -> CliResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
