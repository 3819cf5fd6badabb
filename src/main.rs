use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use panorama_device_manager::{
    ApplianceManagerConnector, BootstrapInfo, DeviceApiConfig, ManagerDeviceApi, PanDeviceApi,
    VirtualSystem,
};
use panorama_shared::{ClientConfig, PanoramaClient};
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Manage the device group of one virtual system on Panorama.
#[derive(Parser, Debug)]
#[command(name = "pan-device", version, about = "Panorama device group manager")]
struct Cli {
    /// Panorama management address.
    #[arg(long, env = "PANORAMA_HOST")]
    host: String,

    /// XML API key.
    #[arg(long, env = "PANORAMA_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Virtual system whose device group is managed.
    #[arg(long, env = "PANORAMA_VS_NAME")]
    vs_name: String,

    /// Accept self-signed appliance certificates.
    #[arg(long, env = "PANORAMA_INSECURE")]
    insecure: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List device groups.
    List,
    /// Create the device group and wait until Panorama lists it.
    Create,
    /// Delete the device group and wait until Panorama drops it.
    Delete,
    /// Print the bootstrap package for a firewall, base64 encoded.
    Bootstrap {
        /// Firewall name.
        device: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let client_config = ClientConfig {
        host: cli.host.clone(),
        api_key: cli.api_key,
        accept_invalid_certs: cli.insecure,
        ..Default::default()
    };

    info!("Panorama device manager starting: {}", cli.vs_name);
    info!("  Panorama: {}", cli.host);

    let client = Arc::new(PanoramaClient::new(client_config).context("failed to build Panorama client")?);
    let api = PanDeviceApi::new(
        ApplianceManagerConnector::new("panorama", cli.host),
        VirtualSystem::new(cli.vs_name),
        client,
        DeviceApiConfig::default(),
    )
    .await
    .context("failed to open device session")?;

    let result = run(&api, cli.command).await;
    api.close();
    result
}

async fn run(api: &PanDeviceApi, command: Command) -> Result<()> {
    match command {
        Command::List => {
            let groups = api.list_devices().await?;
            for group in &groups {
                println!("{}", group);
            }
            info!("{} device groups", groups.len());
        }
        Command::Create => match api.create_device_group().await {
            Ok(outcome) => info!("Device group {}: {}", api.device_group_name(), outcome),
            Err(e) => {
                if let Some(outcome) = e.outcome() {
                    error!("Device group {}: {}", api.device_group_name(), outcome);
                }
                return Err(e.into());
            }
        },
        Command::Delete => {
            let outcome = api.delete_device_group().await?;
            if outcome.is_converged() {
                info!("Device group {}: {}", api.device_group_name(), outcome);
            } else {
                warn!("Device group {}: {}", api.device_group_name(), outcome);
            }
        }
        Command::Bootstrap { device } => {
            let package = api.get_bootstrap_package(&BootstrapInfo::new(device)).await?;
            for (path, data) in package.encoded() {
                println!("{} {}", path, data);
            }
        }
    }
    Ok(())
}
