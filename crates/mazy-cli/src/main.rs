use clap::Parser;

mod cli;
mod commands;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("mazy error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = mazy_config::MazyConfig::load_with_dotenv()?;

    if let cli::Commands::Config { action } = &cli.command {
        return commands::config::handle(action, cli.format, &config);
    }

    let controller = mazy_session::SessionController::new(&config)?;
    controller.init().await?;

    match &cli.command {
        cli::Commands::Auth { action } => {
            commands::auth::handle(action, cli.format, &controller).await
        }
        cli::Commands::User { action } => {
            commands::user::handle(action, cli.format, &controller).await
        }
        cli::Commands::Config { .. } => unreachable!("handled above"),
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("MAZY_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
