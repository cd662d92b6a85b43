use clap::Parser;
use folio::cli::{Cli, Commands};
use folio::Config;
use std::path::Path;

fn setup(config_path: &Path) -> anyhow::Result<Config> {
    let config = Config::load(config_path)?;
    folio::logging::init(Some(&config));
    tracing::debug!(
        "Loaded {} config from {}",
        config.environment,
        config_path.display()
    );
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { path, name }) => {
            folio::logging::init(None);
            folio::cli::init::run(path, name).await?;
        }
        Some(Commands::Migrate { command }) => {
            let config = setup(&cli.config)?;
            folio::cli::migrate::run(&config, command).await?;
        }
        Some(Commands::Seed {
            posts,
            projects,
            clear,
        }) => {
            let config = setup(&cli.config)?;
            folio::cli::seed::run(&config, posts, projects, clear).await?;
        }
        Some(Commands::Posts { command }) => {
            let config = setup(&cli.config)?;
            folio::cli::posts::run(&config, command).await?;
        }
        Some(Commands::Projects { command }) => {
            let config = setup(&cli.config)?;
            folio::cli::projects::run(&config, command).await?;
        }
        None => {
            // No subcommand provided, print help
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
