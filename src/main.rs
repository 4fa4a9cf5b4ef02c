//! LiveScribe CLI entry point

use std::process::ExitCode;

use clap::Parser;

use live_scribe::cli::{
    app::{load_merged_config, run_record, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    RecordOptions,
};
use live_scribe::domain::capture::{CaptureSource, Duration};
use live_scribe::domain::config::AppConfig;
use live_scribe::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        endpoint: cli.endpoint.clone(),
        source: cli.source.map(|s| CaptureSource::from(s).as_str().to_string()),
        duration: cli.duration.clone(),
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    // Parse duration limit, if any was given
    let duration = match config.duration.as_ref() {
        Some(s) => match s.parse::<Duration>() {
            Ok(d) => Some(d),
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => None,
    };

    let options = RecordOptions {
        source: config.source_or_default(),
        title: cli.title.clone(),
        endpoint: config.endpoint_or_default().to_string(),
        duration,
        discard: cli.discard,
    };

    run_record(options).await
}
