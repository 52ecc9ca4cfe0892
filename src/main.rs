use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use std::process::ExitCode;

use suma_migrate::api::{SumaClient, TlsVerification};
use suma_migrate::auth::Credentials;
use suma_migrate::cli::Cli;
use suma_migrate::config::{FileConfig, Settings};
use suma_migrate::migration::{MigrationPipeline, RunOutcome};
use suma_migrate::ui::Console;

fn init_logging(cli: &Cli) -> Result<()> {
    let env = env_logger::Env::default().default_filter_or(cli.log_filter());
    let mut builder = env_logger::Builder::from_env(env);

    // Truncate on each run, like a fresh transcript
    if let Some(path) = &cli.log_file {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(log_file)));
    }

    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut console = Console::stdout();

    if let Err(e) = init_logging(&cli) {
        console.error(format!("Failed to open log file: {}", e));
        return ExitCode::from(2);
    }
    info!("Starting suma-migrate");

    let settings = match FileConfig::load(cli.config.as_deref())
        .and_then(|file| Settings::resolve(file, cli.overrides(), Credentials::resolve))
    {
        Ok(settings) => settings,
        Err(e) => {
            console.error(format!("{:#}", e));
            return ExitCode::from(2);
        }
    };
    debug!("Resolved settings: {:?}", settings);

    if settings.connection.tls == TlsVerification::Insecure {
        console.warn(format!(
            "TLS certificate verification is DISABLED for {}",
            settings.connection.url
        ));
    }

    let client = match SumaClient::new(&settings.connection) {
        Ok(client) => client,
        Err(e) => {
            console.failure(&e);
            return ExitCode::from(e.exit_code() as u8);
        }
    };

    let outcome = MigrationPipeline::new(&client, &mut console)
        .run(&settings.job)
        .await;

    match outcome {
        Ok(RunOutcome::Scheduled(scheduled)) => {
            info!(
                "Dry run for SID {} to {} is action {}",
                scheduled.sid, scheduled.base_channel_label, scheduled.action_id
            );
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Listed(targets)) => {
            info!("Listed {} migration targets", targets.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            console.failure(&e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
