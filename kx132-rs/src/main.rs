use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;

use kx132_rs::config::Settings;
use kx132_rs::{services, Kx132Error, RunSummary};

#[derive(Parser, Debug)]
#[command(name = "kx132", version, about = "KX132 accelerometer acquisition")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configures the device and records a run
    Run {
        /// Run file
        config: PathBuf,
        /// Stop after this many milliseconds instead of waiting for Ctrl+C
        #[arg(long)]
        duration_ms: Option<u64>,
        /// Use the simulated device
        #[arg(long)]
        mock: bool,
    },
    /// Prints the device command of a run file
    Encode { config: PathBuf },
    /// Sends the trigger configuration of a run file to a running device
    ResendTrigger { config: PathBuf },
}

fn report(summary: &RunSummary) {
    info!(
        "{} run finished: {} rows, {} blocks, {} reads discarded at shutdown",
        summary.mode, summary.rows_written, summary.blocks_written, summary.discarded_reads
    );
    if let Some(path) = &summary.output {
        info!("Record written to {}", path.display());
    }
}

async fn execute(cli: Cli) -> Result<(), Kx132Error> {
    match cli.command {
        Commands::Run {
            config,
            duration_ms,
            mock,
        } => {
            let mut settings = Settings::from_file(&config)?;
            if duration_ms.is_some() {
                settings.session.duration_ms = duration_ms;
            }

            let handle = if mock {
                services::run_mock_service(&settings).await?.0
            } else {
                services::run_service(&settings).await?.0
            };
            let summary = handle
                .await
                .map_err(|e| Kx132Error::Join(e.to_string()))??;
            report(&summary);
        }
        Commands::Encode { config } => {
            let settings = Settings::from_file(&config)?;
            println!("{}", services::encode(&settings));
        }
        Commands::ResendTrigger { config } => {
            let settings = Settings::from_file(&config)?;
            services::resend_trigger(&settings).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = execute(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
