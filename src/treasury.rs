use alloy_primitives::Address;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Client for the custodial wallet API that holds the treasury account.
///
/// Provisioning and balance listing only; verification never goes through
/// this client.
#[derive(Clone)]
pub struct WalletClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub address: Address,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenBalance {
    pub token: TokenInfo,
    pub amount: TokenAmount,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub contract_address: String,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenAmount {
    pub amount: String,
    pub decimals: u8,
}

#[derive(Debug, Deserialize)]
struct BalancesResponse {
    balances: Vec<TokenBalance>,
}

#[derive(Serialize)]
struct CreateAccountRequest<'a> {
    name: &'a str,
}

impl WalletClient {
    pub fn new(base_url: &str, api_key: &str, request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .context("Failed to build wallet API client")?;

        Ok(WalletClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetches the account registered under `name`, creating it if it does
    /// not exist yet. A persistent name yields the same treasury address on
    /// every run.
    pub async fn get_or_create_account(&self, name: &str) -> Result<Account> {
        let url = format!("{}/v2/evm/accounts/by-name/{}", self.base_url, name);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Wallet API unreachable")?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                info!("No account named {name:?} yet, creating one");
                self.create_account(name).await
            }
            status if status.is_success() => response
                .json::<Account>()
                .await
                .context("Malformed account response from wallet API"),
            status => anyhow::bail!("Wallet API returned {status} for account {name:?}"),
        }
    }

    async fn create_account(&self, name: &str) -> Result<Account> {
        let url = format!("{}/v2/evm/accounts", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&CreateAccountRequest { name })
            .send()
            .await
            .context("Wallet API unreachable")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Wallet API returned {} creating account {name:?}",
                response.status()
            );
        }

        response
            .json::<Account>()
            .await
            .context("Malformed account response from wallet API")
    }

    /// Lists the confirmed token holdings of `address` on `network`.
    pub async fn list_token_balances(
        &self,
        address: Address,
        network: &str,
    ) -> Result<Vec<TokenBalance>> {
        let url = format!(
            "{}/v2/evm/token-balances/{}/{}",
            self.base_url, network, address
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Wallet API unreachable")?;

        if !response.status().is_success() {
            anyhow::bail!("Wallet API returned {} listing balances", response.status());
        }

        let body: BalancesResponse = response
            .json()
            .await
            .context("Malformed balances response from wallet API")?;

        Ok(body.balances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const TREASURY: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");

    fn client(server: &mockito::Server) -> WalletClient {
        WalletClient::new(&server.url(), "test-key", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetches_existing_account_by_name() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v2/evm/accounts/by-name/treasury")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"address":"{TREASURY}","name":"treasury"}}"#
            ))
            .create_async()
            .await;

        let account = client(&server)
            .get_or_create_account("treasury")
            .await
            .unwrap();

        assert_eq!(account.address, TREASURY);
        assert_eq!(account.name, "treasury");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn creates_account_when_name_is_unknown() {
        let mut server = mockito::Server::new_async().await;
        let lookup = server
            .mock("GET", "/v2/evm/accounts/by-name/treasury")
            .with_status(404)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/v2/evm/accounts")
            .match_body(mockito::Matcher::JsonString(
                r#"{"name":"treasury"}"#.to_string(),
            ))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"address":"{TREASURY}","name":"treasury"}}"#
            ))
            .create_async()
            .await;

        let account = client(&server)
            .get_or_create_account("treasury")
            .await
            .unwrap();

        assert_eq!(account.address, TREASURY);
        lookup.assert_async().await;
        create.assert_async().await;
    }

    #[tokio::test]
    async fn lists_token_balances() {
        let mut server = mockito::Server::new_async().await;
        let path = format!("/v2/evm/token-balances/base/{TREASURY}");
        let mock = server
            .mock("GET", path.as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"balances":[{"token":{"contractAddress":"0x833589fcd6edb6e08f4c7c32d4f71b54bda02913","symbol":"USDC"},"amount":{"amount":"10000","decimals":6}}]}"#,
            )
            .create_async()
            .await;

        let balances = client(&server)
            .list_token_balances(TREASURY, "base")
            .await
            .unwrap();

        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].token.symbol.as_deref(), Some("USDC"));
        assert_eq!(balances[0].amount.amount, "10000");
        assert_eq!(balances[0].amount.decimals, 6);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn surfaces_server_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v2/evm/accounts/by-name/treasury")
            .with_status(500)
            .create_async()
            .await;

        let err = client(&server)
            .get_or_create_account("treasury")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("500"));
    }
}
