use anyhow::Result;
use clap::{Parser, Subcommand};
use payment_verifier::config::Config;
use payment_verifier::formatters::{OutputFormat, format_balances, format_verification};
use payment_verifier::rpc::RpcClient;
use payment_verifier::treasury::WalletClient;
use payment_verifier::verifier::{TransferVerifier, parse_tx_hash};
use tracing::info;

#[derive(Parser)]
#[command(name = "verifier")]
#[command(about = "Verify token payments to the treasury address", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "table")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a transaction transferred an exact token amount to the treasury
    Verify {
        tx_hash: String,
        amount: String,
    },
    /// List the treasury's confirmed token holdings
    Balances,
    /// Print the treasury address to share with payers
    Address,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    let format = OutputFormat::from(cli.format.as_str());

    let config = Config::from_env()?;
    info!("Configuration loaded");

    let wallet = WalletClient::new(
        &config.wallet_api_url,
        &config.wallet_api_key,
        config.request_timeout,
    )?;
    let account = wallet
        .get_or_create_account(&config.treasury_account_name)
        .await?;
    info!("Treasury address: {}", account.address);

    match cli.command {
        Commands::Verify { tx_hash, amount } => {
            let tx_hash = parse_tx_hash(&tx_hash)?;

            let client = RpcClient::new(&config.json_rpc_url, config.request_timeout)?;
            let verifier = TransferVerifier::new(
                client,
                config.token_contract_address,
                account.address,
                config.token_decimals,
            );

            info!("Checking transaction {:?}", tx_hash);
            let result = verifier.verify(tx_hash, &amount).await?;
            println!("{}", format_verification(&result, &format));
        }
        Commands::Balances => {
            let balances = wallet
                .list_token_balances(account.address, &config.network)
                .await?;
            println!("{}", format_balances(&balances, &format));
        }
        Commands::Address => {
            println!("{}", account.address);
        }
    }

    Ok(())
}
