use std::sync::Arc;

use clap::Parser;
use owo_colors::{OwoColorize, Style};
use ripple_core::db;
use ripple_core::error::CoreError;
use ripple_core::store::SqliteStore;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod sink;
mod util;
mod views;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = config::Config::new().unwrap_or_default();
    let actor = util::resolve_actor(&config);

    let pool = match db::establish_connection(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    let store = Arc::new(SqliteStore::new(pool));

    let cli = cli::Cli::parse();

    let result = match cli.command {
        cli::Commands::Add(command) => commands::add::add_task(&store, command, &actor).await,
        cli::Commands::List => commands::list::list_tasks(&store).await,
        cli::Commands::Show(command) => commands::show::show_task(&store, command).await,
        cli::Commands::Start(command) => commands::start::start_task(&store, command).await,
        cli::Commands::Block(command) => commands::block::block_task(&store, command).await,
        cli::Commands::Do(command) => commands::r#do::do_task(&store, command, &actor).await,
        cli::Commands::Delete(command) => commands::delete::delete_task(&store, command).await,
        cli::Commands::Attach(command) => {
            commands::attach::attach_file(&store, command, &actor).await
        }
        cli::Commands::Comment(command) => {
            commands::comment::comment_on_task(&store, command, &actor).await
        }
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    if let Some(core_error) = err.downcast_ref::<CoreError>() {
        match core_error {
            CoreError::NotFound(s) => {
                eprintln!("{} {}", "Error:".style(error_style), s);
            }
            CoreError::SubtasksOpen => {
                eprintln!("{} {}", "Error:".style(error_style), core_error);
            }
            CoreError::AmbiguousId(tasks) => {
                eprintln!("{}", "Error: Ambiguous ID.".style(error_style));
                eprintln!("Did you mean one of these?");
                for (id, title) in tasks {
                    eprintln!("  {} ({})", id.yellow(), title);
                }
            }
            CoreError::InvalidInput(s) => {
                eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
            }
            _ => eprintln!("{} {}", "Error:".style(error_style), err),
        }
    } else {
        eprintln!("{} {}", "Error:".style(error_style), err);
    }
}
