use std::io::BufRead;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use keyhole_client::{AccessGate, ClientConfig, GateState, KeyholeClient};
use tracing_subscriber::EnvFilter;
use url::Url;

const BASE_URL_ENV: &str = "KEYHOLE_BASE_URL";
const TIMEOUT_SECS_ENV: &str = "KEYHOLE_TIMEOUT_SECS";
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000/";

#[derive(Debug, Parser)]
#[command(name = "keyhole", about = "Talk to a keyhole gateway")]
struct Cli {
    #[arg(long, global = true, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    base_url: Url,

    #[arg(long, global = true, env = TIMEOUT_SECS_ENV, default_value_t = 10)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Unlock a link. Reads the access code from stdin when omitted.
    Verify {
        code: Option<String>,
        #[arg(long)]
        game_version: Option<String>,
    },
    /// Check whether a link was issued by the gateway.
    VerifyLink { link: String },
    /// List the game versions that have records.
    Versions,
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = KeyholeClient::new(
        ClientConfig::builder()
            .base_url(cli.base_url)
            .timeout(Duration::from_secs(cli.timeout_secs))
            .build(),
    )?;

    match cli.command {
        Command::Verify { code, game_version } => {
            let code = match code {
                Some(code) => code,
                None => read_code()?,
            };
            let gate = AccessGate::new(client);
            match gate.submit(&code, game_version.as_deref()).await? {
                GateState::Granted { link } => println!("{link}"),
                GateState::Denied { message } => {
                    eprintln!("{message}");
                    return Ok(ExitCode::FAILURE);
                }
                state => anyhow::bail!("verification ended in unexpected state {state:?}"),
            }
        }
        Command::VerifyLink { link } => match client.verify_link(&link).await {
            Ok(valid) => {
                println!("{valid}");
                if !valid {
                    return Ok(ExitCode::FAILURE);
                }
            }
            Err(err) => return report(err),
        },
        Command::Versions => match client.game_versions().await {
            Ok(versions) => versions.iter().for_each(|version| println!("{version}")),
            Err(err) => return report(err),
        },
        Command::Health => match client.health().await {
            Ok(health) => println!("{} {}", health.status, health.timestamp),
            Err(err) => return report(err),
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn read_code() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read access code from stdin")?;
    Ok(line)
}

fn report(err: keyhole_client::ClientError) -> anyhow::Result<ExitCode> {
    tracing::debug!(error = %err, "request failed");
    eprintln!("{}", err.user_message());
    Ok(ExitCode::FAILURE)
}
