mod cli;
mod db;
mod error;
mod fmt;
mod models;
mod settings;
mod stats;

use clap::Parser;

use cli::{
    Cli, Commands, LocalesCommands, ProjectsCommands, RatesCommands, WorkersCommands,
};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Workers { command } => match command {
            WorkersCommands::Add { name, email, locale } => {
                cli::workers::add(&name, &email, locale.as_deref())
            }
            WorkersCommands::List => cli::workers::list(),
        },
        Commands::Projects { command } => match command {
            ProjectsCommands::Add {
                code,
                name,
                locale,
                rate_card,
            } => cli::projects::add(&code, name.as_deref(), locale.as_deref(), rate_card.as_deref()),
            ProjectsCommands::List => cli::projects::list(),
        },
        Commands::Locales { command } => match command {
            LocalesCommands::Add { client, iso } => cli::locales::add(&client, &iso),
            LocalesCommands::List => cli::locales::list(),
        },
        Commands::Rates { command } => match command {
            RatesCommands::Add {
                locale,
                tier,
                per_unit,
                per_hour,
                currency,
                effective_from,
                effective_to,
            } => cli::rates::add(
                &locale,
                tier.as_deref(),
                per_unit,
                per_hour,
                &currency,
                &effective_from,
                effective_to.as_deref(),
            ),
            RatesCommands::List => cli::rates::list(),
        },
        Commands::Template { output } => cli::template::run(output),
        Commands::Import {
            file,
            default_locale,
            batch_size,
            validate_only,
        } => cli::import::run(&file, default_locale.as_deref(), batch_size, validate_only),
        Commands::Stats {
            month,
            worker,
            project,
        } => cli::stats::list(month.as_deref(), worker.as_deref(), project.as_deref()),
        Commands::Status => cli::status::run(),
        Commands::Backup { output } => cli::backup::run(output),
        Commands::Demo => cli::demo::run(),
        Commands::Completions { shell } => cli::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
