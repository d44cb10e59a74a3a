use crate::commands::{prompt_password, App};

use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use dialoguer::{Confirm, Password};
use ethvault_core::{
    validate_mnemonic, KnownNetwork, Result, VaultError, WalletAccount, WalletSession, WordCount,
};
use zeroize::Zeroizing;

#[derive(Subcommand)]
pub enum WalletCommands {
    /// Create a new wallet
    Create {
        /// Mnemonic length (12, 15, 18, 21 or 24)
        #[arg(short, long, default_value = "12")]
        words: usize,
        /// Network (ethereum, sepolia, polygon, bsc, local)
        #[arg(short, long)]
        network: Option<String>,
        /// Replace an existing wallet
        #[arg(long)]
        force: bool,
    },
    /// Import a wallet from mnemonic
    Import {
        /// Mnemonic phrase (will prompt if not provided)
        #[arg(short, long)]
        mnemonic: Option<String>,
        /// Network (ethereum, sepolia, polygon, bsc, local)
        #[arg(short, long)]
        network: Option<String>,
        /// Number of accounts to derive
        #[arg(short, long)]
        accounts: Option<u32>,
        /// Replace an existing wallet
        #[arg(long)]
        force: bool,
    },
    /// Check a mnemonic phrase without importing it
    Validate {
        /// Mnemonic phrase (will prompt if not provided)
        mnemonic: Option<String>,
    },
    /// List derived accounts
    Accounts,
    /// Derive the next account
    AddAccount,
    /// Show per-coin addresses
    Coins,
    /// Show wallet information
    Info,
    /// Delete the wallet from this data directory
    Wipe {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn handle_wallet_command(cmd: WalletCommands, app: &mut App) -> Result<()> {
    match cmd {
        WalletCommands::Create {
            words,
            network,
            force,
        } => {
            ensure_vacant(app, force).await?;
            apply_network(app, network.as_deref())?;
            let word_count = WordCount::from_words(words)?;

            let session = WalletSession::new(app.wallet_config()?)?;
            println!("Creating wallet...");
            let mnemonic = session.generate(word_count, app.config.account_count.max(1))?;

            let password = prompt_password("New wallet password", true)?;
            app.keystore.save(&session.seal(&password)?).await?;
            app.config.save(&app.data_dir).await?;

            println!("Wallet created successfully!");
            println!();
            println!("IMPORTANT: Save your mnemonic phrase securely!");
            println!("Mnemonic: {}", mnemonic.as_str());
            println!();
            print_accounts(&session.accounts()?);
        }

        WalletCommands::Import {
            mnemonic,
            network,
            accounts,
            force,
        } => {
            ensure_vacant(app, force).await?;
            apply_network(app, network.as_deref())?;
            if let Some(count) = accounts {
                app.config.account_count = count.max(1);
            }

            let mnemonic = match mnemonic {
                Some(m) => Zeroizing::new(m),
                None => prompt_mnemonic()?,
            };

            let session = WalletSession::new(app.wallet_config()?)?;
            session.recover(&mnemonic, app.config.account_count)?;

            let password = prompt_password("New wallet password", true)?;
            app.keystore.save(&session.seal(&password)?).await?;
            app.config.save(&app.data_dir).await?;

            println!("Wallet imported successfully!");
            print_accounts(&session.accounts()?);
        }

        WalletCommands::Validate { mnemonic } => {
            let mnemonic = match mnemonic {
                Some(m) => Zeroizing::new(m),
                None => prompt_mnemonic()?,
            };

            if validate_mnemonic(&mnemonic) {
                println!("Mnemonic is valid.");
            } else {
                // Re-parse for the reason; the phrase itself is never echoed.
                let reason = ethvault_core::parse_mnemonic(&mnemonic)
                    .err()
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                println!("Mnemonic is NOT valid: {}", reason);
            }
        }

        WalletCommands::Accounts => {
            let session = app.unlock_session().await?;
            print_accounts(&session.accounts()?);
        }

        WalletCommands::AddAccount => {
            let session = app.unlock_session().await?;
            let account = session.add_account()?;

            app.config.account_count = session.accounts()?.len() as u32;
            app.config.save(&app.data_dir).await?;

            println!(
                "Added account #{}: {}",
                account.index(),
                account.address_string()
            );
        }

        WalletCommands::Coins => {
            let session = app.unlock_session().await?;
            let coins = session.coin_wallets()?;

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Coin", "Symbol", "Network", "Path", "Address"]);
            for coin in &coins {
                table.add_row(vec![
                    coin.coin_id.clone(),
                    coin.symbol.clone(),
                    coin.network.descriptor().name,
                    coin.account.path_string(),
                    coin.account.address_string(),
                ]);
            }
            println!("{}", table);
        }

        WalletCommands::Info => {
            let sealed = app.keystore.load().await?;
            let network = app.wallet_config()?.network_descriptor();

            println!("Wallet Information:");
            println!("  Vault: {}", app.keystore.path().display());
            println!("  Created: {}", sealed.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
            println!("  Encryption: {}", sealed.encryption_method);
            println!("  Network: {} (chain id {})", network.name, network.chain_id);
            println!("  RPC: {}", network.rpc_url);
            println!("  Accounts: {}", app.config.account_count);
        }

        WalletCommands::Wipe { force } => {
            if !force {
                let confirm = Confirm::new()
                    .with_prompt(
                        "Delete the wallet vault? Without the mnemonic the funds are unrecoverable.",
                    )
                    .default(false)
                    .interact()
                    .map_err(|e| VaultError::dialog(e.to_string()))?;

                if !confirm {
                    println!("Wipe cancelled.");
                    return Ok(());
                }
            }

            app.keystore.delete().await?;
            println!("Wallet deleted.");
        }
    }

    Ok(())
}

async fn ensure_vacant(app: &App, force: bool) -> Result<()> {
    if app.keystore.exists().await && !force {
        return Err(VaultError::config(format!(
            "A wallet already exists at {}. Use --force to replace it",
            app.keystore.path().display()
        )));
    }
    Ok(())
}

fn apply_network(app: &mut App, network: Option<&str>) -> Result<()> {
    if let Some(name) = network {
        app.config.network = KnownNetwork::parse(name)?;
    }
    Ok(())
}

fn prompt_mnemonic() -> Result<Zeroizing<String>> {
    Password::new()
        .with_prompt("Enter mnemonic phrase")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| VaultError::dialog(e.to_string()))
}

pub(crate) fn print_accounts(accounts: &[WalletAccount]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Index", "Path", "Address"]);
    for account in accounts {
        table.add_row(vec![
            account.index().to_string(),
            account.path_string(),
            account.address_string(),
        ]);
    }
    println!("{}", table);
}
