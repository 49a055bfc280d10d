//! ClipKeep command-line entry point.
//!
//! # Responsibility
//! - Stand in for the UI layer: capture, list, edit, delete and copy clips.
//! - Wire configuration, logging, SQLite slot storage and the clip store.

use clap::{Parser, Subcommand};
use clipkeep_core::db::open_db;
use clipkeep_core::{
    init_logging, ClipFilter, ClipId, ClipStore, ClipStoreError, ClipboardError,
    ClipboardWriter, CopyOutcome, CoreConfig, SlotClipPersistence, SqliteKeyValueSlot,
    ALL_TAGS, TAG_SUGGESTIONS,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "clipkeep", version, about = "Keep short text snippets close at hand")]
struct Args {
    /// Directory holding the clip database and logs
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Save a new clip
    Add {
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    /// List clips, newest first
    List {
        #[arg(long, default_value = ALL_TAGS)]
        tag: String,
        #[arg(long)]
        search: Option<String>,
        /// Print clips as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Replace the content and tag of a clip
    Edit {
        id: String,
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Delete a clip
    Rm { id: String },
    /// Copy a clip's content to the system clipboard
    Copy { id: String },
    /// Show suggested tags
    Tags,
}

struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|err| ClipboardError::AccessDenied(err.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|err| ClipboardError::WriteFailed(err.to_string()))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("clipkeep: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode, Box<dyn Error>> {
    let config = resolve_config(&args)?;
    config.ensure_data_dir()?;
    init_logging(config.log_level, &config.log_dir())?;

    let conn = open_db(config.db_path())?;
    let mut store = ClipStore::new(SlotClipPersistence::new(SqliteKeyValueSlot::new(&conn)));
    store.hydrate();

    let outcome = match args.command {
        Command::Add { content, tag } => {
            store
                .create(&content.join(" "), tag.as_deref())
                .map(|clip| println!("{}", clip.id()))
        }
        Command::List { tag, search, json } => {
            let filter = ClipFilter {
                tag: Some(tag),
                search_text: search,
            };
            let clips = store.query(&filter);
            if json {
                println!("{}", serde_json::to_string_pretty(&clips)?);
            } else if clips.is_empty() {
                println!("No clips yet. Add one with `clipkeep add <text>`.");
            } else {
                for clip in &clips {
                    println!(
                        "{}  [{}]  {}",
                        clip.id(),
                        clip.display_tag(),
                        clip.updated_at().format("%Y-%m-%d %H:%M")
                    );
                    for line in clip.content().lines() {
                        println!("    {line}");
                    }
                }
            }
            Ok(())
        }
        Command::Edit { id, content, tag } => {
            let id = parse_id(&id)?;
            store
                .update(id, &content.join(" "), tag.as_deref())
                .map(|_| println!("Clip updated."))
        }
        Command::Rm { id } => {
            let id = parse_id(&id)?;
            if store.delete(id) {
                println!("Clip removed.");
                Ok(())
            } else {
                Err(ClipStoreError::NotFound(id))
            }
        }
        Command::Copy { id } => {
            let id = parse_id(&id)?;
            match store.copy_to_clipboard(id, &SystemClipboard) {
                Ok(CopyOutcome::Copied) => {
                    println!("Copied to clipboard.");
                    Ok(())
                }
                Ok(CopyOutcome::Failed(err)) => {
                    eprintln!("clipkeep: {err}");
                    return Ok(ExitCode::FAILURE);
                }
                Err(err) => Err(err),
            }
        }
        Command::Tags => {
            for tag in TAG_SUGGESTIONS {
                println!("{tag}");
            }
            Ok(())
        }
    };

    info!(
        "event=cli_command module=cli status={} total={}",
        if outcome.is_ok() { "ok" } else { "error" },
        store.len()
    );

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("clipkeep: {err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn resolve_config(args: &Args) -> Result<CoreConfig, Box<dyn Error>> {
    let config = match &args.data_dir {
        Some(dir) => CoreConfig::new(dir),
        None => CoreConfig::from_env(),
    };
    let mut config = config.anchored_at(&std::env::current_dir()?);
    if let Some(level) = &args.log_level {
        config = config.with_log_level(level)?;
    }
    Ok(config)
}

fn parse_id(value: &str) -> Result<ClipId, Box<dyn Error>> {
    ClipId::parse_str(value.trim()).map_err(|err| format!("invalid clip id `{value}`: {err}").into())
}
