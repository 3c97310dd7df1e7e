use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use wallet_bridge::config::load_config;
use wallet_bridge::network;
use wallet_bridge::observability::logging::init_logging;
use wallet_bridge::{WalletBridge, WalletError};

#[derive(Parser)]
#[command(name = "wallet-bridge")]
#[command(about = "Connect to a JSON-RPC wallet and run transactions", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported networks
    Networks,
    /// Show the wallet state
    Status,
    /// Request wallet access
    Connect,
    /// Disconnect and disable auto-connect
    Disconnect,
    /// Switch the wallet to another network
    Switch {
        #[arg(long)]
        network: u64,
    },
    /// Send native currency
    Send {
        #[arg(long)]
        to: Address,
        /// Amount in ether units, e.g. 0.025
        #[arg(long)]
        amount: String,
    },
    /// Approve a token allowance
    Approve {
        #[arg(long)]
        token: Address,
        #[arg(long)]
        spender: Address,
        #[arg(long)]
        amount: String,
    },
    /// Mint an NFT
    Mint {
        #[arg(long)]
        contract: Address,
        /// Mint price in wei
        #[arg(long, default_value_t = 0)]
        price: u128,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.observability);

    tracing::debug!(
        endpoint = %config.provider.endpoint,
        provider_enabled = config.provider.enabled,
        state_file = %config.persistence.state_file,
        "Configuration loaded"
    );

    let bridge = WalletBridge::from_config(&config)?;
    if !matches!(cli.command, Commands::Networks) {
        bridge.connection().auto_connect().await;
    }

    match cli.command {
        Commands::Networks => print_json(network::supported_networks())?,
        Commands::Status => print_json(&bridge.wallet())?,
        Commands::Connect => {
            let result = bridge.connection().connect().await;
            print_json(&bridge.wallet())?;
            result?;
        }
        Commands::Disconnect => {
            bridge.connection().disconnect();
            print_json(&bridge.wallet())?;
        }
        Commands::Switch { network } => {
            let result = bridge.connection().switch_network(network).await;
            print_json(&bridge.wallet())?;
            result?;
        }
        Commands::Send { to, amount } => {
            let result = bridge.transactions().send_native_token(to, &amount).await;
            finish_transaction(&bridge, result)?;
        }
        Commands::Approve {
            token,
            spender,
            amount,
        } => {
            let result = bridge.transactions().approve_token(token, spender, &amount).await;
            finish_transaction(&bridge, result)?;
        }
        Commands::Mint { contract, price } => {
            let result = bridge.transactions().mint_nft(contract, U256::from(price)).await;
            finish_transaction(&bridge, result)?;
        }
    }

    Ok(())
}

fn finish_transaction<T>(
    bridge: &WalletBridge,
    result: Result<T, WalletError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = bridge.transaction();
    print_json(&state)?;

    if let (Some(network_id), Some(hash)) = (bridge.wallet().network_id, state.tx_hash.as_deref()) {
        if let Some(url) = network::explorer_tx_url(network_id, hash) {
            eprintln!("View on explorer: {}", url);
        }
    }

    result?;
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
