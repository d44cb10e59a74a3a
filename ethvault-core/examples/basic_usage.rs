use ethvault_core::{
    generate_mnemonic, BalanceReader, KnownNetwork, RpcClient, WalletConfig, WalletSession,
    WordCount,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let session = WalletSession::new(WalletConfig::new(KnownNetwork::Local))?;

    println!("Creating wallet...");
    let mnemonic = session.generate(WordCount::Twelve, 3)?;
    println!("Mnemonic: {}", mnemonic.as_str());

    println!("\nAccounts:");
    for account in session.accounts()? {
        println!(
            "  #{} {} ({})",
            account.index(),
            account.address_string(),
            account.path_string()
        );
    }

    println!("\nCoin wallets:");
    for coin in session.coin_wallets()? {
        println!("  {:<5} {}", coin.symbol, coin.address().to_checksum(None));
    }

    let added = session.add_account()?;
    println!("\nAdded account #{} {}", added.index(), added.address_string());

    // Sealing round trip
    let sealed = session.seal("example-password")?;
    session.clear();
    session.unlock(&sealed, "example-password", 1)?;
    println!("Unlocked again as {}", session.current_account()?.address_string());

    // A second, independent phrase
    let other = generate_mnemonic(WordCount::TwentyFour)?;
    println!("\n24-word phrase has {} words", other.split_whitespace().count());

    // Balance lookup against a local node, if one is running
    let network = session.config().network_descriptor();
    let reader = BalanceReader::new(
        network.clone(),
        RpcClient::http(&network.rpc_url, Duration::from_secs(2))?,
    );
    match reader.get_balance(&session.current_account()?.address_string()).await {
        Ok(balance) => println!("Balance: {}", balance),
        Err(e) => println!("Balance unavailable ({})", e),
    }

    Ok(())
}
