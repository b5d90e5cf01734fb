mod cli;
mod dashboard;
mod db;
mod error;
mod fmt;
mod gateway;
mod logging;
mod models;
mod service;
mod settings;
mod tui;

use clap::{CommandFactory, Parser};

use cli::edit::Changes;
use cli::{Cli, Commands, Context};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref());

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "tally", &mut std::io::stdout());
        return;
    }

    let ctx = Context::load(cli.db);
    let result = match cli.command {
        Commands::Init { data_dir, currency } => cli::init::run(&ctx, data_dir, currency),
        Commands::Add {
            amount,
            category,
            kind,
            date,
            notes,
        } => cli::add::run(&ctx, amount, category, kind, date, notes),
        Commands::Edit {
            id,
            amount,
            category,
            kind,
            date,
            notes,
        } => cli::edit::run(
            &ctx,
            id,
            Changes {
                amount,
                category,
                kind,
                date,
                notes,
            },
        ),
        Commands::Delete { id, yes } => cli::delete::run(&ctx, id, yes),
        Commands::List { filter, json } => cli::list::run(&ctx, filter.into(), json),
        Commands::Summary { json } => cli::summary::run(&ctx, json),
        Commands::Chart => cli::summary::chart(&ctx),
        Commands::Export { filter, output } => cli::export::run(&ctx, filter.into(), output),
        Commands::Dashboard => cli::dashboard::run(&ctx),
        Commands::Status => cli::status::run(&ctx),
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
