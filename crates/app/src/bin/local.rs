// Asset Intake - Headless Manifest Runner

use tokio::signal;
use tracing::{error, info};

use intake_app::{IntakeApp, Manifest};
use intake_common::config::IntakeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = IntakeConfig::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        transfer_provider = %config.transfer_provider,
        notify_provider = %config.notify_provider,
        "Configuration loaded successfully"
    );

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("INTAKE_MANIFEST").ok())
        .ok_or_else(|| {
            anyhow::anyhow!("Usage: local <manifest.json> (or set INTAKE_MANIFEST)")
        })?;

    let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
        error!("Failed to read manifest {}: {}", path, e);
        anyhow::anyhow!("Cannot read manifest {}: {}", path, e)
    })?;
    let manifest: Manifest = serde_json::from_str(&raw)?;

    info!(
        manifest = %path,
        asset_types = manifest.asset_types.len(),
        files = manifest.files.len(),
        links = manifest.links.len(),
        "Manifest loaded"
    );

    let app = IntakeApp::create(config, manifest.asset_types.clone())?;

    // Dropping the run future aborts an in-flight transfer
    let report = tokio::select! {
        report = app.run_manifest(manifest) => report?,
        _ = shutdown_signal() => {
            info!("Intake run interrupted, session discarded");
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&report)?);

    info!("Intake run complete");
    Ok(())
}

fn init_tracing() {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr);

    if std::env::var("INTAKE_LOG_FORMAT").as_deref() == Ok("json") {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, stopping");
        },
        _ = terminate => {
            info!("Received terminate signal, stopping");
        },
    }
}
