mod analysis;
mod cli;
mod client;
mod commands;
mod config;
mod error;
mod metrics;
mod normalize;
mod output;
mod responses;
mod snapshot;
mod store;
mod types;

use std::error::Error;
use std::io;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use cli::{Cli, Commands, SourceCommands, TeamCommands};
use config::Config;
use error::Result;
use store::SnapshotStore;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");

        // Show error chain if verbose flag was passed
        if verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    output::set_json_output(cli.json);
    output::set_quiet(cli.quiet);

    match cli.command {
        // Commands that don't touch the snapshot store
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "caplan", &mut io::stdout());
        }
        Commands::Init => {
            commands::init::run()?;
        }
        // Commands operating on the working set
        command => {
            let store = SnapshotStore::open();

            match command {
                Commands::Source { action } => match action {
                    SourceCommands::List => {
                        commands::sources::list(&store);
                    }
                    SourceCommands::Connect(args) => {
                        let config = Config::load()?;
                        commands::sources::connect(&config, &store, args).await?;
                    }
                    SourceCommands::Paste(args) => {
                        commands::sources::paste(&store, args)?;
                    }
                    SourceCommands::Remove { tag } => {
                        commands::sources::remove(&store, &tag)?;
                    }
                },
                Commands::Issues(args) => {
                    commands::issues::list(&store, args);
                }
                Commands::Team { action } => match action {
                    TeamCommands::List => {
                        commands::team::list(&store);
                    }
                    TeamCommands::Capacity { id, capacity } => {
                        commands::team::set_capacity(&store, &id, capacity)?;
                    }
                },
                Commands::Dashboard => {
                    commands::dashboard::run(&store);
                }
                Commands::Forecast => {
                    commands::forecast::run(&store);
                }
                Commands::Timetrack => {
                    commands::timetrack::run(&store);
                }
                Commands::Profit(args) => {
                    let config = Config::load()?;
                    commands::profit::run(&config, &store, args)?;
                }
                Commands::Analyze => {
                    let config = Config::load()?;
                    commands::analyze::run(&config, &store).await?;
                }
                Commands::Completions { .. } | Commands::Init => {
                    // Already handled above
                }
            }
        }
    }

    Ok(())
}
