use crate::commands::App;

use clap::Subcommand;
use dialoguer::Confirm;
use ethvault_core::evm::address::parse_address;
use ethvault_core::{
    format_amount, parse_amount, AssetDescriptor, BalanceReader, Result, TransactionSigner,
    VaultError,
};

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Send native coin or an ERC-20 token
    Send {
        /// Recipient address
        to: String,
        /// Amount in whole units, e.g. 0.25
        amount: String,
        /// Account index to send from
        #[arg(short, long, default_value = "0")]
        account: u32,
        /// ERC-20 token contract
        #[arg(short, long)]
        token: Option<String>,
        /// Sign only; print the transaction without broadcasting
        #[arg(long)]
        dry_run: bool,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub async fn handle_transaction_command(cmd: TransactionCommands, app: &App) -> Result<()> {
    match cmd {
        TransactionCommands::Send {
            to,
            amount,
            account,
            token,
            dry_run,
            yes,
        } => {
            let config = app.wallet_config()?;
            let network = config.network_descriptor();
            let rpc = app.rpc()?;

            let session = app.unlock_session().await?;
            let from = session.select_account(account)?;

            let asset = match token {
                Some(token) => {
                    let contract = parse_address(&token).map_err(VaultError::InvalidAddress)?;
                    // Decimals come from the contract itself.
                    let held = BalanceReader::new(network.clone(), rpc.clone())
                        .get_token_balance(&token, &from.address_string())
                        .await?;
                    AssetDescriptor::Token {
                        contract,
                        symbol: held.symbol,
                        decimals: held.decimals,
                    }
                }
                None => AssetDescriptor::Native,
            };

            let (decimals, symbol) = match &asset {
                AssetDescriptor::Native => (network.native_decimals, network.native_symbol.clone()),
                AssetDescriptor::Token {
                    symbol, decimals, ..
                } => (*decimals, symbol.clone()),
            };
            let value = parse_amount(&amount, decimals)?;

            let signer = TransactionSigner::new(network.clone(), rpc, config.fee_policy.clone());

            if dry_run {
                let signed = signer.prepare(&from, &to, value, &asset).await?;
                println!("Signed transaction (not broadcast):");
                println!("  Hash: {}", signed.hash);
                println!("  Nonce: {}", signed.nonce);
                println!("  Gas: {} @ {} wei", signed.gas_limit, signed.gas_price);
                println!("  Raw: 0x{}", hex::encode(&signed.raw));
                return Ok(());
            }

            if !yes {
                let confirm = Confirm::new()
                    .with_prompt(format!(
                        "Send {} {} from {} to {} on {}?",
                        format_amount(value, decimals),
                        symbol,
                        from.address_string(),
                        to,
                        network.name
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| VaultError::dialog(e.to_string()))?;

                if !confirm {
                    println!("Transaction cancelled.");
                    return Ok(());
                }
            }

            println!("Sending {} {} to {}...", format_amount(value, decimals), symbol, to);
            let txid = session.sign_and_send(&signer, &to, value, &asset).await?;
            println!("Transaction sent successfully!");
            println!("  Transaction ID: {}", txid);
        }
    }

    Ok(())
}
