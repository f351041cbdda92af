use alloy::primitives::Address;
use anyhow::Error;
use clap::{Parser, Subcommand};
use common::config::Config;
use tokio::signal::unix::{SignalKind, signal};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "surge-inspector")]
#[command(about = "Inspect and follow a Surge rollup deployment on L1 and L2")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print protocol configuration, inbox state and fork progress.
    Status,
    /// Print a single batch stored in the inbox.
    Batch { batch_id: u64 },
    /// List batch lifecycle events in a block range.
    Events {
        #[arg(long)]
        from: Option<u64>,
        #[arg(long)]
        to: Option<u64>,
    },
    /// Follow batch lifecycle events until interrupted.
    Watch {
        #[arg(long)]
        from: Option<u64>,
    },
    /// Print the sub-verifiers behind the inbox verifier.
    Verifiers {
        /// Read the verifier as a Surge verifier instead of a compose verifier.
        #[arg(long)]
        surge: bool,
    },
    /// Print the bond balance of an address.
    Bond { address: Address },
    /// Print owner, pause and upgrade state of the inbox proxy.
    Owner,
    /// Check that the L2 genesis block matches the one verified by the inbox.
    Genesis,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    common::utils::logging::init_logging();

    let cli = Cli::parse();
    info!("🔍 Starting Surge inspector v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::read_env_variables()?;
    info!("Config:\n{}", config);

    let clients = pacaya::create_pacaya_clients(&config).await?;

    match cli.command {
        Command::Status => commands::status(&clients).await,
        Command::Batch { batch_id } => commands::batch(&clients, batch_id).await,
        Command::Events { from, to } => {
            let from = from.unwrap_or(config.l1_start_block);
            commands::events(&clients, from, to, config.rpc_timeout).await
        }
        Command::Verifiers { surge } => {
            commands::verifiers(&clients, surge, config.rpc_timeout).await
        }
        Command::Bond { address } => commands::bond(&clients, address).await,
        Command::Owner => commands::owner(&clients, config.rpc_timeout).await,
        Command::Genesis => clients.ensure_genesis_matched().await,
        Command::Watch { from } => {
            let cancel_token = CancellationToken::new();

            let panic_cancel_token = cancel_token.clone();
            std::panic::set_hook(Box::new(move |panic_info| {
                error!("Panic occurred: {:?}", panic_info);
                panic_cancel_token.cancel();
                info!("Cancellation token triggered, initiating shutdown...");
            }));

            let start_block =
                from.or((config.l1_start_block > 0).then_some(config.l1_start_block));
            let monitor =
                pacaya::start_chain_monitor(&clients, &config, start_block, cancel_token.clone());
            wait_for_the_termination(cancel_token).await?;
            monitor
                .await
                .map_err(|e| anyhow::anyhow!("Chain monitor task failed: {e}"))
        }
    }
}

async fn wait_for_the_termination(cancel_token: CancellationToken) -> Result<(), Error> {
    info!("Starting signal handler...");
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to set up SIGTERM handler: {e}"))?;
    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
            cancel_token.cancel();
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            cancel_token.cancel();
            Ok(())
        }
        _ = cancel_token.cancelled() => {
            Err(anyhow::anyhow!("Chain monitor gave up, exiting inspector..."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events_range() {
        let cli = Cli::try_parse_from(["surge-inspector", "events", "--from", "10", "--to", "20"])
            .unwrap();
        match cli.command {
            Command::Events { from, to } => {
                assert_eq!(from, Some(10));
                assert_eq!(to, Some(20));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_bond_address() {
        let cli = Cli::try_parse_from([
            "surge-inspector",
            "bond",
            "0x79C9109b764609df928d16fC4a91e9081F7e87DB",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Bond { .. }));
    }

    #[test]
    fn test_rejects_bad_batch_id() {
        assert!(Cli::try_parse_from(["surge-inspector", "batch", "latest"]).is_err());
    }
}
