mod cli;
mod output;
mod settings;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use caddie_core::credentials::{Credential, CredentialStore};
use caddie_core::error::CaddieError;
use caddie_core::gateway::{ConnectGateway, GatewayConfig};
use caddie_core::inventory;
use caddie_core::overrides::OverrideStore;
use caddie_core::scan::ScanService;
use caddie_model::ClubId;
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

use cli::{Cli, Command, OverrideAction, TokenAction};
use settings::Settings;

/// How long `scan` waits for the whole pipeline before giving up. Generous:
/// thousands of scorecards at ~100 ms each is tens of minutes.
const SCAN_DEADLINE: Duration = Duration::from_secs(60 * 60);

const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::load()?;

    match cli.command {
        Command::Token { action } => run_token(action, &settings),
        Command::Clubs => run_clubs(&settings).await,
        Command::Override { action } => run_override(action, &settings),
        Command::Scan => run_scan(&settings).await,
    }
}

fn run_token(action: TokenAction, settings: &Settings) -> anyhow::Result<()> {
    let store = CredentialStore::new(settings.credential_path());
    match action {
        TokenAction::Set { token } => {
            store.set(Credential::new(token))?;
            println!("Token saved.");
        }
        TokenAction::Clear => {
            store.clear()?;
            println!("Token cleared.");
        }
        TokenAction::Show => match store.get() {
            Some(_) => println!("A bearer token is saved."),
            None => println!("No token saved."),
        },
    }
    Ok(())
}

async fn run_clubs(settings: &Settings) -> anyhow::Result<()> {
    let credentials = Arc::new(CredentialStore::new(settings.credential_path()));
    let gateway = build_gateway(settings, Arc::clone(&credentials))?;

    match inventory::player_club_report(&gateway).await {
        Ok(reports) => {
            output::print_club_reports(&reports);
            Ok(())
        }
        Err(err) => Err(with_credential_hint(err, &credentials, settings)),
    }
}

fn run_override(action: OverrideAction, settings: &Settings) -> anyhow::Result<()> {
    let store = OverrideStore::new(settings.overrides_path());
    match action {
        OverrideAction::Set { club_id, max_meters } => {
            if max_meters <= 0.0 {
                bail!("max_meters must be positive");
            }
            store.set(ClubId(club_id), max_meters)?;
            println!("Override saved: club {club_id} flags past {max_meters:.0} m.");
        }
        OverrideAction::Rm { club_id } => {
            if store.remove(ClubId(club_id))? {
                println!("Override removed for club {club_id}.");
            } else {
                println!("No override configured for club {club_id}.");
            }
        }
        OverrideAction::List => {
            let ranges = store.load()?;
            if ranges.is_empty() {
                println!("No overrides configured.");
            } else {
                let mut rows: Vec<_> = ranges.iter().collect();
                rows.sort_by_key(|(club_id, _)| *club_id);
                for (club_id, over) in rows {
                    println!("club {club_id}: flag past {:.0} m", over.max_meters);
                }
            }
        }
    }
    Ok(())
}

async fn run_scan(settings: &Settings) -> anyhow::Result<()> {
    let credentials = Arc::new(CredentialStore::new(settings.credential_path()));
    let gateway = Arc::new(build_gateway(settings, Arc::clone(&credentials))?);
    let overrides = Arc::new(OverrideStore::new(settings.overrides_path()));

    let (handle, _service) = ScanService::spawn(gateway, overrides, settings.reply_timeout);

    // Subscribe before starting so no early frame is missed.
    let mut progress = handle.subscribe().await?;
    let ack = handle.start().await?;
    info!(scan_id = %ack.scan_id, "scan started");

    let started = std::time::Instant::now();
    loop {
        if started.elapsed() > SCAN_DEADLINE {
            bail!("scan did not finish within {} s", SCAN_DEADLINE.as_secs());
        }

        match tokio::time::timeout(STATUS_POLL_INTERVAL, progress.recv()).await {
            Ok(Ok(frame)) => {
                output::print_progress(&frame);
                continue;
            }
            Ok(Err(RecvError::Lagged(_))) => continue,
            Ok(Err(RecvError::Closed)) => break,
            Err(_) => {
                // No frame for a while; check whether the scan is done.
                if !handle.status().await?.in_progress {
                    break;
                }
            }
        }
    }
    output::finish_progress_line();

    let snapshot = handle.status().await?;
    let Some(outcome) = snapshot.last_outcome else {
        println!("Scan ended without a recorded result (superseded or cancelled).");
        return Ok(());
    };

    match outcome.status {
        caddie_model::ScanStatus::Failed => {
            let message = outcome.error.unwrap_or_else(|| "unknown error".to_string());
            if message.contains("401") || message.contains("403") {
                credentials.clear().ok();
                eprintln!(
                    "The remote service refused the saved token; it has been cleared. \
                     Log in to {} in a browser and save a fresh token with `caddiectl token set`.",
                    settings.base_url
                );
            }
            bail!("scan failed: {message}");
        }
        _ => {
            output::print_flagged_shots(&outcome.flagged);
            Ok(())
        }
    }
}

fn build_gateway(
    settings: &Settings,
    credentials: Arc<CredentialStore>,
) -> anyhow::Result<ConnectGateway> {
    ConnectGateway::new(
        GatewayConfig {
            base_url: settings.base_url.clone(),
            request_timeout: settings.request_timeout,
        },
        credentials,
    )
    .context("failed to build remote gateway")
}

fn with_credential_hint(
    err: CaddieError,
    credentials: &CredentialStore,
    settings: &Settings,
) -> anyhow::Error {
    if err.invalidates_credential() {
        credentials.clear().ok();
        eprintln!(
            "The remote service refused the saved token; it has been cleared. \
             Log in to {} in a browser and save a fresh token with `caddiectl token set`.",
            settings.base_url
        );
    }
    anyhow::Error::new(err)
}
