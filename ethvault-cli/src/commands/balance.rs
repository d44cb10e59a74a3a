use crate::commands::App;

use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Table};
use ethvault_core::{Address, BalanceReader, Result};

#[derive(Subcommand)]
pub enum BalanceCommands {
    /// Show the balance of one account
    Show {
        /// Account index
        #[arg(short, long, default_value = "0")]
        account: u32,
        /// ERC-20 token contract to query instead of the native coin
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Show native balances of every derived account
    All,
    /// Show the balance of any address, no wallet needed
    Address {
        /// Address to query
        address: String,
        /// ERC-20 token contract
        #[arg(short, long)]
        token: Option<String>,
    },
}

pub async fn handle_balance_command(cmd: BalanceCommands, app: &App) -> Result<()> {
    let network = app.wallet_config()?.network_descriptor();
    let reader = BalanceReader::new(network.clone(), app.rpc()?);

    match cmd {
        BalanceCommands::Show { account, token } => {
            let session = app.unlock_session().await?;
            let account = session.select_account(account)?;
            let address = account.address_string();

            let balance = match token {
                Some(token) => reader.get_token_balance(&token, &address).await?,
                None => reader.get_balance(&address).await?,
            };

            println!("Account #{} on {}:", account.index(), network.name);
            println!("  Address: {}", address);
            println!("  Balance: {}", balance);
        }

        BalanceCommands::All => {
            let session = app.unlock_session().await?;
            let accounts = session.accounts()?;
            let addresses: Vec<Address> = accounts.iter().map(|a| a.address()).collect();
            let balances = reader.get_balances(&addresses).await?;

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["Index", "Address", "Balance"]);
            for (account, balance) in accounts.iter().zip(&balances) {
                table.add_row(vec![
                    account.index().to_string(),
                    account.address_string(),
                    balance.to_string(),
                ]);
            }
            println!("Balances on {}:", network.name);
            println!("{}", table);
        }

        BalanceCommands::Address { address, token } => {
            let balance = match token {
                Some(token) => reader.get_token_balance(&token, &address).await?,
                None => reader.get_balance(&address).await?,
            };
            println!("{}: {}", address, balance);
        }
    }

    Ok(())
}
