use crate::error::VerifyError;
use crate::events::decode_transfer_event;
use alloy::rpc::types::Log;
use alloy_primitives::utils::{format_units, parse_units};
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use std::str::FromStr;
use tracing::{debug, info};

/// Parses caller-supplied transaction hash input.
///
/// A string that is not a 32-byte hex hash can never name a known
/// transaction, so it surfaces in the same bad-input lane as an unknown
/// hash rather than as an infrastructure fault.
pub fn parse_tx_hash(input: &str) -> Result<B256, VerifyError> {
    B256::from_str(input).map_err(|_| VerifyError::NotFound(input.to_string()))
}

/// The finalized outcome of a transaction, narrowed to what verification
/// needs: whether it succeeded and the logs it emitted, in emission order.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub status: bool,
    pub logs: Vec<Log>,
}

/// The one read the verifier performs against chain data.
#[async_trait]
pub trait ReceiptProvider {
    async fn transaction_receipt(&self, tx_hash: B256) -> Result<Receipt, VerifyError>;
}

/// Outcome of a verification call: whether an exact-amount transfer to the
/// treasury was found, plus every treasury-bound amount observed in the
/// transaction so callers can diagnose mismatches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub verified: bool,
    pub observed_amounts: Vec<String>,
}

impl Verification {
    fn no_match() -> Self {
        Verification {
            verified: false,
            observed_amounts: Vec::new(),
        }
    }
}

/// Confirms that a transaction carried an ERC20 transfer of an exact amount
/// to the treasury address.
///
/// All deployment configuration is explicit constructor state; a verifier
/// holds no mutable state and every call independently re-fetches and
/// re-decodes the receipt.
pub struct TransferVerifier<P> {
    provider: P,
    token_contract: Address,
    treasury: Address,
    token_decimals: u8,
}

impl<P: ReceiptProvider> TransferVerifier<P> {
    pub fn new(provider: P, token_contract: Address, treasury: Address, token_decimals: u8) -> Self {
        TransferVerifier {
            provider,
            token_contract,
            treasury,
            token_decimals,
        }
    }

    /// Verifies that `tx_hash` transferred exactly `expected_amount` (a
    /// human-readable decimal string, e.g. "0.01") of the configured token
    /// to the treasury.
    ///
    /// The expected amount is scaled to the token's base units up front, so
    /// the comparison is integer equality on the raw transfer value. No
    /// floating point is involved at any stage.
    pub async fn verify(
        &self,
        tx_hash: B256,
        expected_amount: &str,
    ) -> Result<Verification, VerifyError> {
        let expected = parse_units(expected_amount, self.token_decimals)
            .map_err(|_| VerifyError::InvalidAmount(expected_amount.to_string()))?;
        if expected.is_negative() {
            return Err(VerifyError::InvalidAmount(expected_amount.to_string()));
        }
        let expected_raw = expected.get_absolute();

        let receipt = self.provider.transaction_receipt(tx_hash).await?;

        if !receipt.status {
            debug!("Transaction {:?} failed or reverted", tx_hash);
            return Ok(Verification::no_match());
        }

        let mut observed_amounts = Vec::new();

        for log in receipt
            .logs
            .iter()
            .filter(|log| log.address() == self.token_contract)
        {
            let Some(transfer) = decode_transfer_event(log) else {
                continue;
            };

            if transfer.to != self.treasury {
                continue;
            }

            let amount = format_units(transfer.value, self.token_decimals)
                .unwrap_or_else(|_| transfer.value.to_string());
            debug!(
                "Transfer to treasury: {} (raw {})",
                amount, transfer.value
            );
            observed_amounts.push(amount);

            if transfer.value == expected_raw {
                info!(
                    "Payment verified: {} sent to treasury in {:?}",
                    expected_amount, tx_hash
                );
                return Ok(Verification {
                    verified: true,
                    observed_amounts,
                });
            }
        }

        debug!(
            "No transfer of {} to treasury in {:?}; observed {:?}",
            expected_amount, tx_hash, observed_amounts
        );
        Ok(Verification {
            verified: false,
            observed_amounts,
        })
    }
}
