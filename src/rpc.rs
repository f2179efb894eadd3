use crate::error::VerifyError;
use crate::verifier::{Receipt, ReceiptProvider};
use alloy::providers::fillers::FillProvider;
use alloy::providers::{Provider, ProviderBuilder};
use alloy_primitives::B256;
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

type AlloyFullProvider = FillProvider<
    alloy::providers::fillers::JoinFill<
        alloy::providers::Identity,
        alloy::providers::fillers::JoinFill<
            alloy::providers::fillers::GasFiller,
            alloy::providers::fillers::JoinFill<
                alloy::providers::fillers::BlobGasFiller,
                alloy::providers::fillers::JoinFill<
                    alloy::providers::fillers::NonceFiller,
                    alloy::providers::fillers::ChainIdFiller,
                >,
            >,
        >,
    >,
    alloy::providers::RootProvider,
>;

/// Read-only JSON-RPC client exposing the one call verification needs.
///
/// Every request is bounded by the configured timeout so a hung provider
/// cannot stall the caller; a timed-out or failed fetch surfaces as
/// `VerifyError::Provider`. Retry and endpoint rotation are left to the
/// calling layer.
#[derive(Clone)]
pub struct RpcClient {
    provider: AlloyFullProvider,
    url: String,
    request_timeout: Duration,
}

impl RpcClient {
    pub fn new(rpc_url: &str, request_timeout: Duration) -> Result<Self> {
        let parsed_url = rpc_url
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid RPC URL: {}", rpc_url))?;
        let provider: AlloyFullProvider = ProviderBuilder::new().connect_http(parsed_url);

        Ok(RpcClient {
            provider,
            url: rpc_url.to_string(),
            request_timeout,
        })
    }
}

#[async_trait]
impl ReceiptProvider for RpcClient {
    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Receipt, VerifyError> {
        let future = self.provider.get_transaction_receipt(tx_hash);

        match timeout(self.request_timeout, future).await {
            Ok(Ok(Some(receipt))) => Ok(Receipt {
                status: receipt.status(),
                logs: receipt.inner.logs().to_vec(),
            }),
            Ok(Ok(None)) => Err(VerifyError::NotFound(format!("{tx_hash:?}"))),
            Ok(Err(e)) => {
                warn!("RPC error on {}: {}", self.url, e);
                Err(VerifyError::Provider(e.to_string()))
            }
            Err(_) => {
                warn!(
                    "Request timeout after {} seconds on {}",
                    self.request_timeout.as_secs(),
                    self.url
                );
                Err(VerifyError::Provider(format!(
                    "request timeout after {} seconds",
                    self.request_timeout.as_secs()
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc_response(request: &mockito::Request, result: &str) -> Vec<u8> {
        let body: serde_json::Value = serde_json::from_slice(request.body().unwrap()).unwrap();
        format!(
            r#"{{"jsonrpc":"2.0","id":{},"result":{}}}"#,
            body["id"], result
        )
        .into_bytes()
    }

    #[tokio::test]
    async fn null_receipt_maps_to_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body_from_request(|request| rpc_response(request, "null"))
            .create_async()
            .await;

        let client = RpcClient::new(&server.url(), Duration::from_secs(5)).unwrap();

        let err = client.transaction_receipt(B256::ZERO).await.unwrap_err();
        assert!(matches!(err, VerifyError::NotFound(_)));
    }

    #[tokio::test]
    async fn hung_provider_times_out_as_provider_fault() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_chunked_body(|_writer| {
                std::thread::sleep(Duration::from_secs(1));
                Ok(())
            })
            .create_async()
            .await;

        let client = RpcClient::new(&server.url(), Duration::from_millis(50)).unwrap();

        let err = client.transaction_receipt(B256::ZERO).await.unwrap_err();
        assert!(matches!(err, VerifyError::Provider(_)));
    }

    #[tokio::test]
    async fn provider_error_response_maps_to_provider_fault() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(503)
            .create_async()
            .await;

        let client = RpcClient::new(&server.url(), Duration::from_secs(5)).unwrap();

        let err = client.transaction_receipt(B256::ZERO).await.unwrap_err();
        assert!(matches!(err, VerifyError::Provider(_)));
    }
}
