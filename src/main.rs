use assessor::cli::{Cli, Commands};
use assessor::types::config::Config;
use assessor::AssessorResult;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> AssessorResult<()> {
    let cli = Cli::parse();

    // Load configuration first (no logging yet)
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default_config()
    };

    // CLI flags take precedence over config
    let log_level = if cli.quiet {
        "error".to_string()
    } else if cli.verbose {
        "debug".to_string()
    } else {
        config.general.log_level.clone()
    };

    let filter = EnvFilter::from_default_env().add_directive(
        format!("assessor={}", log_level)
            .parse()
            .unwrap_or_else(|_| "assessor=info".parse().expect("fallback directive is valid")),
    );

    let (text_layer, json_layer) = if config.general.log_format == "json" {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .init();

    tracing::debug!("Configuration loaded from: {}", cli.config.display());

    match cli.command {
        Commands::Init { path } => {
            assessor::cli::commands::init(path).await?;
        }
        Commands::Evaluate(args) => {
            assessor::cli::commands::evaluate(&args, &config).await?;
        }
        Commands::Strategies => {
            assessor::cli::commands::strategies();
        }
        Commands::Version => {
            assessor::cli::commands::version();
        }
    }

    Ok(())
}
