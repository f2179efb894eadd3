use alloy_primitives::Address;
use anyhow::{Context, Result};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_TOKEN_DECIMALS: u8 = 6; // USDC
const DEFAULT_NETWORK: &str = "base";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub json_rpc_url: String,
    pub token_contract_address: Address,
    pub token_decimals: u8,
    pub treasury_account_name: String,
    pub network: String,
    pub wallet_api_url: String,
    pub wallet_api_key: String,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let json_rpc_url =
            std::env::var("JSON_RPC_URL").context("JSON_RPC_URL must be set in .env")?;

        let contract_address_str = std::env::var("TOKEN_CONTRACT_ADDRESS")
            .context("TOKEN_CONTRACT_ADDRESS must be set in .env")?;

        let token_contract_address = Address::from_str(&contract_address_str)
            .context("Invalid TOKEN_CONTRACT_ADDRESS format")?;

        let token_decimals = match std::env::var("TOKEN_DECIMALS") {
            Ok(raw) => raw
                .parse::<u8>()
                .context("TOKEN_DECIMALS must be an integer between 0 and 255")?,
            Err(_) => DEFAULT_TOKEN_DECIMALS,
        };

        let treasury_account_name = std::env::var("TREASURY_ACCOUNT_NAME")
            .context("TREASURY_ACCOUNT_NAME must be set in .env")?;

        let network = std::env::var("NETWORK").unwrap_or_else(|_| DEFAULT_NETWORK.to_string());

        let wallet_api_url =
            std::env::var("WALLET_API_URL").context("WALLET_API_URL must be set in .env")?;

        let wallet_api_key =
            std::env::var("WALLET_API_KEY").context("WALLET_API_KEY must be set in .env")?;

        let request_timeout = match std::env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .context("REQUEST_TIMEOUT_SECS must be a positive integer")?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(Config {
            json_rpc_url,
            token_contract_address,
            token_decimals,
            treasury_account_name,
            network,
            wallet_api_url,
            wallet_api_key,
            request_timeout,
        })
    }
}
