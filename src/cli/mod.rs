use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use crate::app::{Journal, SessionState};
use crate::config::{AppConfig, ConfigLoader, ConfigPaths, CONFIG_ENV, DATA_ENV};
use crate::preferences::{Settings, TomlPreferenceStore};
use crate::storage;

pub mod commands;
pub mod render;

use self::commands::{CalendarArgs, DateArgs, SelectArgs, SettingsArgs, WriteArgs};

#[derive(Parser, Debug)]
#[command(
    name = "daybook",
    version,
    about = "Calendar journal with one plain-text note per day"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Override the config file location (takes precedence over DAYBOOK_CONFIG)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the data directory (takes precedence over DAYBOOK_DATA)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Minimum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the displayed month (default)
    Calendar(CalendarArgs),
    /// Select a day of the displayed month and print its note
    Select(SelectArgs),
    /// Select today and print its note
    Today,
    /// Print the note for a date
    Show(DateArgs),
    /// Save a note for a date, replacing any previous text
    Write(WriteArgs),
    /// Delete the note for a date
    Delete(DateArgs),
    /// Show or change theme and text size
    Settings(SettingsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        env::set_var(CONFIG_ENV, path);
    }
    if let Some(path) = &cli.data_dir {
        env::set_var(DATA_ENV, path);
    }

    let loader = ConfigLoader::discover()?;
    let paths = loader.paths().clone();
    init_tracing(&cli.log_level)
        .with_context(|| format!("initialising logging at level {}", cli.log_level))?;
    let config = loader.load_or_init()?;

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Calendar(CalendarArgs::default()));
    let output = match command {
        Commands::Settings(args) => {
            let mut store = TomlPreferenceStore::open(&paths.preferences_file)
                .context("opening preferences")?;
            commands::settings(&mut store, args)?
        }
        Commands::Calendar(args) => with_journal(&paths, &config, |journal| {
            let palette = config
                .calendar
                .color
                .enabled()
                .then(|| load_settings(&paths).theme().palette());
            Ok(commands::calendar(journal, args, palette.as_ref()))
        })?,
        Commands::Select(args) => with_journal(&paths, &config, |journal| {
            commands::select(journal, args)
        })?,
        Commands::Today => with_journal(&paths, &config, commands::today)?,
        Commands::Show(args) => with_journal(&paths, &config, |journal| {
            commands::show(journal, args)
        })?,
        Commands::Write(args) => with_journal(&paths, &config, |journal| {
            commands::write(journal, args)
        })?,
        Commands::Delete(args) => with_journal(&paths, &config, |journal| {
            commands::delete(journal, args)
        })?,
    };
    print!("{output}");
    Ok(())
}

/// Restores the saved session, runs `f`, then persists the session.
/// Notes are read only by commands that need them.
fn with_journal<F>(paths: &ConfigPaths, config: &AppConfig, f: F) -> Result<String>
where
    F: FnOnce(&mut Journal) -> Result<String>,
{
    let store = storage::init(paths, &config.storage).context("opening note store")?;
    let today = commands::local_today();
    let state = SessionState::load_or_default(&paths.session_file, today)
        .context("loading session state")?;
    let mut journal = Journal::new(store, state, today);

    let output = f(&mut journal)?;

    journal
        .state()
        .save(&paths.session_file)
        .context("saving session state")?;
    Ok(output)
}

fn load_settings(paths: &ConfigPaths) -> Settings {
    match TomlPreferenceStore::open(&paths.preferences_file) {
        Ok(store) => Settings::load(&store),
        Err(err) => {
            tracing::warn!(%err, "using default display settings");
            Settings::default()
        }
    }
}

fn init_tracing(level: &str) -> Result<()> {
    static INIT: OnceCell<()> = OnceCell::new();
    INIT.get_or_try_init(|| {
        let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
        Ok(())
    })
    .map(|_| ())
}
