pub mod output;
pub mod prompt;

use std::{
    io::{self, IsTerminal, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use output::Output;
use prompt::TerminalConfirm;
use tracing::{info, level_filters::LevelFilter};

use crate::{
    card::{
        confirm::Confirm,
        error::ValidationError,
        id::{CardId, Selector},
        lifecycle::{clear, rename, ClearOutcome},
        punch::{punch_in, punch_out},
        report::{write_list, write_show, write_total},
        store::{CardStore, CARD_MAX},
    },
    storage::card_storage::{CardStorage, JsonCardStorage},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, create_dir},
        logging::{enable_logging, CLI_PREFIX},
    },
};

const LONG_ABOUT: &str = "\
A command line time-card system.

Specify the card after any command to run the command on that card. Commands `show`, `total` \
and `clear` run against all cards when no card (or card 0) is given, `in`, `out` and `rename` \
default to card 1.

The system maintains 10 cards simultaneously.

When punching in while already in, punching out while already out or clearing the clock, \
confirmation is always requested. Then in/out punches will overwrite the previous saved in/out \
punch.";

#[derive(Parser, Debug)]
#[command(name = "clock", version, long_about = LONG_ABOUT)]
#[command(about = "A command line time-card system")]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Data directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable logging to the console")]
    log: bool,
    #[arg(long = "log-filter", global = true, help = "Level of the log file")]
    log_filter: Option<LevelFilter>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Punches in on the specified card")]
    In {
        card: Option<CardId>,
        #[arg(short, long, help = "How the time is going to be spent")]
        message: Option<String>,
    },
    #[command(about = "Punches out on the specified card")]
    Out {
        card: Option<CardId>,
        #[arg(short, long, help = "How the time was spent")]
        message: Option<String>,
    },
    #[command(visible_alias = "s", about = "Shows time details for the specified card")]
    Show { card: Option<Selector> },
    #[command(visible_alias = "t", about = "Totals the time for the specified card")]
    Total { card: Option<Selector> },
    #[command(visible_alias = "c", about = "Clears punches for the specified card")]
    Clear { card: Option<Selector> },
    #[command(visible_alias = "ls", about = "Lists the existing cards")]
    List,
    #[command(visible_alias = "r", about = "Renames a card")]
    Rename {
        card: Option<CardId>,
        #[arg(short = 'm', long = "message", value_name = "NEW", help = "New name of the card")]
        new_name: Option<CardId>,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = match args.dir {
        Some(dir) => create_dir(dir)?,
        None => create_application_default_path()?,
    };
    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        args.log_filter
    };
    enable_logging(CLI_PREFIX, &app_dir, logging_level, args.log)?;

    let storage = JsonCardStorage::new(app_dir)?;
    let lock = storage.lock().await?;
    let stdout = io::stdout();
    let styled = stdout.is_terminal();
    let result = execute(
        args.commands,
        &storage,
        &mut TerminalConfirm::stdio(),
        &DefaultClock,
        &mut Output::new(stdout, styled),
    )
    .await;
    lock.release().await?;

    result.map_err(into_usage_error)
}

/// Validation problems are shown the same way clap shows bad arguments.
fn into_usage_error(error: anyhow::Error) -> anyhow::Error {
    match error.downcast::<ValidationError>() {
        Ok(validation) => Args::command()
            .error(ErrorKind::ValueValidation, validation)
            .into(),
        Err(error) => error,
    }
}

/// Loads the cards, runs one command on them and saves them back if anything changed.
async fn execute(
    command: Commands,
    storage: &impl CardStorage,
    confirm: &mut impl Confirm,
    clock: &impl Clock,
    output: &mut Output<impl Write>,
) -> Result<()> {
    let mut store = storage.load().await?;

    let mutated = match command {
        Commands::In { card, message } => {
            let id = card.unwrap_or_default();
            let outcome = punch_in(&mut store, &id, message.as_deref(), confirm, clock)?;
            output.punch_in(&id, &outcome)?;
            outcome.is_mutation()
        }
        Commands::Out { card, message } => {
            if let Some(id) = &card {
                require_card(&store, id)?;
            }
            let id = card.unwrap_or_default();
            let outcome = punch_out(&mut store, &id, message.as_deref(), confirm, clock)?;
            output.punch_out(&id, &outcome)?;
            outcome.is_mutation()
        }
        Commands::Show { card } => {
            let selector = card.unwrap_or_default();
            require_selected(&store, &selector)?;
            write_show(output.writer(), &store, &selector, clock.time())?;
            false
        }
        Commands::Total { card } => {
            let selector = card.unwrap_or_default();
            require_selected(&store, &selector)?;
            write_total(output.writer(), &store, &selector, clock.time())?;
            false
        }
        Commands::Clear { card } => {
            let selector = card.unwrap_or_default();
            require_selected(&store, &selector)?;
            write_show(output.writer(), &store, &selector, clock.time())?;
            let outcome = clear(&mut store, &selector, confirm)?;
            if let ClearOutcome::Cleared(removed) = &outcome {
                storage.archive(removed).await?;
            }
            output.clear(&outcome)?;
            outcome.is_mutation()
        }
        Commands::List => {
            write_list(output.writer(), &store)?;
            false
        }
        Commands::Rename { card, new_name } => {
            let from = card.unwrap_or_default();
            let to = new_name.ok_or(ValidationError::MissingNewName)?;
            let outcome = rename(&mut store, &from, &to, confirm)?;
            output.rename(&from, &to, &outcome)?;
            outcome.is_mutation()
        }
    };

    if mutated {
        storage.save(&store).await?;
        info!("Saved {} card(s) of at most {CARD_MAX}", store.len());
    }
    Ok(())
}

fn require_card(store: &CardStore, id: &CardId) -> Result<(), ValidationError> {
    if store.exists(id) {
        Ok(())
    } else {
        Err(ValidationError::CardNotFound(id.clone()))
    }
}

fn require_selected(store: &CardStore, selector: &Selector) -> Result<(), ValidationError> {
    match selector {
        Selector::All => Ok(()),
        Selector::Single(id) => require_card(store, id),
    }
}
