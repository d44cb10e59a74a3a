mod commands;
mod config;
mod keystore;

use clap::{Parser, Subcommand};
use commands::App;
use config::CliConfig;
use ethvault_core::VaultError;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ethvault")]
#[command(about = "ethvault - HD wallet for Ethereum-family networks")]
#[command(version)]
struct Cli {
    /// Data directory for the wallet vault and config
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wallet management commands
    #[command(subcommand)]
    Wallet(commands::WalletCommands),

    /// Balance commands
    #[command(subcommand)]
    Balance(commands::BalanceCommands),

    /// Transaction commands
    #[command(subcommand)]
    Transaction(commands::TransactionCommands),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "ethvault={}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = cli.data_dir.unwrap_or_else(CliConfig::default_data_dir);
    tokio::fs::create_dir_all(&data_dir).await?;

    let config = CliConfig::load(&data_dir).await?;
    let mut app = App::new(data_dir, config);

    let result = match cli.command {
        Commands::Wallet(cmd) => commands::handle_wallet_command(cmd, &mut app).await,
        Commands::Balance(cmd) => commands::handle_balance_command(cmd, &app).await,
        Commands::Transaction(cmd) => commands::handle_transaction_command(cmd, &app).await,
    };

    if let Err(e) = result {
        match e {
            VaultError::WalletNotReady => {
                eprintln!("Error: No wallet found in {}", app.data_dir.display());
                eprintln!("Use 'ethvault wallet create' or 'ethvault wallet import' first");
            }
            VaultError::InvalidMnemonic(reason) => {
                eprintln!("Error: Invalid mnemonic: {}", reason);
            }
            VaultError::InsufficientFunds { need, available } => {
                eprintln!("Error: Insufficient funds");
                eprintln!("Need: {}, Available: {}", need, available);
            }
            VaultError::InvalidRecipient(addr) | VaultError::InvalidAddress(addr) => {
                eprintln!("Error: Invalid address: {}", addr);
            }
            VaultError::NetworkUnavailable(reason) => {
                eprintln!("Error: Network unavailable: {}", reason);
                eprintln!("Check the RPC endpoint and try again");
            }
            VaultError::Rejected(reason) => {
                eprintln!("Error: Node rejected the request: {}", reason);
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
