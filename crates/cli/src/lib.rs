//! # stacks
//!
//! Command-line front end for the library catalog. Every subcommand opens
//! the catalog, runs one typed [`Command`] or query against it, prints the
//! result and exits; `watch` keeps the session open and runs the periodic
//! overdue sweep until Ctrl-C.

mod confirm;
pub mod error;
mod render;

pub use crate::confirm::TerminalConfirm;
use crate::error::{ErrorKind, Result};
use crate::render::{BookCard, BookList, Recommendations};
use clap::{Args, Parser, Subcommand};
use exn::ResultExt;
use stacks_catalog::{
    Book, BookId, Catalog, CatalogOptions, ClockHandle, Command, Confirm, Draft, Outcome, ScanReport, StatusFilter,
    snapshot, spawn_sweeper,
};
use stacks_config::Config;
use stacks_storage::backend::{LocalBackend, ReadOnlyBackend};
use stacks_storage::{BackendHandle, validate_key};
use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Library catalog.
#[derive(Debug, Parser)]
#[command(name = "stacks", author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the catalog slot.
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Name of the catalog slot.
    #[arg(long, global = true, value_name = "NAME")]
    pub slot: Option<String>,

    /// Never write changes back to storage.
    #[arg(long, global = true)]
    pub read_only: bool,

    /// Answer yes to every confirmation.
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List books, optionally filtered by status.
    List {
        /// One of `all`, `available`, `checked-out` or `overdue`.
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// Add a new book.
    Add(BookArgs),
    /// Change a book's title, author and ISBN.
    Edit {
        id: String,
        #[command(flatten)]
        book: BookArgs,
    },
    /// Check a book out.
    Checkout { id: String },
    /// Return a checked-out book.
    Return { id: String },
    /// Delete a book.
    Delete { id: String },
    /// Search title, author and ISBN.
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Look a book up by its ISBN/RFID tag.
    Scan { tag: String },
    /// Suggest books based on what's checked out.
    Recommend,
    /// Recompute overdue flags now.
    Sweep,
    /// Write a JSON backup of the whole catalog.
    Export {
        /// Defaults to `library-backup-<today>.json` in the current directory.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace the catalog with a JSON backup.
    Import { file: PathBuf },
    /// Keep the catalog open and sweep for overdue books periodically.
    Watch,
}

#[derive(Debug, Clone, Args)]
pub struct BookArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub author: String,
    #[arg(long)]
    pub isbn: Option<String>,
}
impl From<BookArgs> for Draft {
    fn from(args: BookArgs) -> Self {
        let draft = Draft::new(args.title, args.author);
        match args.isbn {
            Some(isbn) => draft.with_isbn(isbn),
            None => draft,
        }
    }
}

impl Cli {
    /// Configuration from every source, with command-line flags on top.
    pub fn config(&self) -> Result<Config> {
        let figment = error::config(stacks_config::figment(self.config.as_deref()))?;
        let mut config = error::config(Config::from_figment(&figment))?;
        if let Some(root) = &self.root {
            config.storage.root = std::path::absolute(root).or_raise(|| ErrorKind::StorageRoot(root.clone()))?;
        }
        if let Some(slot) = &self.slot {
            config.storage.slot = slot.clone();
        }
        config.storage.read_only |= self.read_only;
        error::config(config.validate())?;
        Ok(config)
    }
}

/// Run one invocation of the CLI, writing its output to `out`.
pub async fn run<C, W>(cli: Cli, clock: ClockHandle, confirm: &C, out: &mut W) -> Result<()>
where
    C: Confirm + ?Sized,
    W: Write,
{
    let config = cli.config()?;
    let mut catalog = open(&config, clock.clone()).await?;
    let command = match cli.command {
        Commands::Add(book) => Command::Add(book.into()),
        Commands::Edit { id, book } => Command::Update { id: BookId::new(id), draft: book.into() },
        Commands::Checkout { id } => Command::Checkout(BookId::new(id)),
        Commands::Return { id } => Command::Return(BookId::new(id)),
        Commands::Delete { id } => Command::Delete(BookId::new(id)),
        Commands::Sweep => Command::Sweep,
        Commands::Import { file } => {
            Command::Import(tokio::fs::read(&file).await.or_raise(|| ErrorKind::File(file.clone()))?)
        },
        Commands::List { status } => {
            let filter: StatusFilter = error::catalog(status.parse())?;
            let books: Vec<&Book> = catalog.filter_by_status(filter).collect();
            return emit(out, BookList(&books));
        },
        Commands::Search { query } => {
            let books: Vec<&Book> = catalog.search(&query).collect();
            return emit(out, BookList(&books));
        },
        Commands::Scan { tag } => return emit(out, ScanReport(error::catalog(catalog.scan_tag(&tag))?)),
        Commands::Recommend => {
            let picks = catalog.recommend();
            if picks.is_empty() {
                return Ok(());
            }
            return emit(out, Recommendations(&picks));
        },
        Commands::Export { output } => {
            let path = output.unwrap_or_else(|| PathBuf::from(snapshot::file_name(clock.today())));
            let data = error::catalog(catalog.export_snapshot())?;
            tokio::fs::write(&path, data).await.or_raise(|| ErrorKind::File(path.clone()))?;
            tracing::info!(path = %path.display(), books = catalog.len(), "Exported catalog");
            return emit(out, format_args!("Exported {} books to {}", catalog.len(), path.display()));
        },
        Commands::Watch => return watch(catalog, config.catalog.sweep_interval(), tokio::signal::ctrl_c(), out).await,
    };
    let outcome = error::catalog(catalog.execute(command, confirm).await)?;
    emit(out, &outcome)?;
    if let Outcome::Added(book) | Outcome::Updated(book) | Outcome::CheckedOut(book) = &outcome {
        emit(out, BookCard(book))?;
    }
    Ok(())
}

async fn open(config: &Config, clock: ClockHandle) -> Result<Catalog> {
    let root = &config.storage.root;
    let local = LocalBackend::new("local", root).or_raise(|| ErrorKind::StorageRoot(root.clone()))?;
    let backend: BackendHandle = if config.storage.read_only {
        Arc::new(ReadOnlyBackend::new(Arc::new(local)))
    } else {
        Arc::new(local)
    };
    let slot = validate_key(&config.storage.slot).or_raise(|| ErrorKind::StorageRoot(root.clone()))?;
    let options = CatalogOptions { loan_period: time::Duration::days(i64::from(config.catalog.loan_days)) };
    error::catalog(Catalog::open(backend, slot, clock, options).await)
}

/// Hold the catalog open, sweeping every `period` and reporting the overdue
/// count whenever it changes, until `shutdown` resolves.
async fn watch<W: Write>(
    catalog: Catalog,
    period: Duration,
    shutdown: impl Future<Output = std::io::Result<()>>,
    out: &mut W,
) -> Result<()> {
    let mut revisions = catalog.subscribe();
    let overdue = catalog.filter_by_status(StatusFilter::Overdue).count();
    let count = catalog.len();
    let catalog = Arc::new(Mutex::new(catalog));
    emit(out, format_args!("Watching {count} books, sweeping every {}s. Press Ctrl-C to stop.", period.as_secs()))?;
    emit(out, Outcome::Swept { overdue })?;

    let sweeper = spawn_sweeper(catalog.clone(), period);
    tokio::pin!(shutdown);
    let result = loop {
        tokio::select! {
            signal = &mut shutdown => break signal.or_raise(|| ErrorKind::Signal),
            changed = revisions.changed() => {
                if changed.is_err() {
                    break Ok(());
                }
                let overdue = catalog.lock().await.filter_by_status(StatusFilter::Overdue).count();
                if let Err(err) = emit(out, Outcome::Swept { overdue }) {
                    break Err(err);
                }
            },
        }
    };
    sweeper.abort();
    tracing::debug!("Stopped watching");
    result
}

fn emit<W: Write>(out: &mut W, value: impl Display) -> Result<()> {
    writeln!(out, "{value}").or_raise(|| ErrorKind::Output)
}
