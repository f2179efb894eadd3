use thiserror::Error;

/// Faults a verification caller can branch on.
///
/// Infrastructure problems and bad input surface as distinct variants; a
/// completed verification that simply did not match is not an error and is
/// reported through [`crate::verifier::Verification`] instead.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The chain-data provider was unreachable, timed out, or returned a
    /// malformed response. Never collapsed into "not verified".
    #[error("chain data provider error: {0}")]
    Provider(String),

    /// The transaction hash is syntactically invalid or unknown to the
    /// provider.
    #[error("transaction not found: {0}")]
    NotFound(String),

    /// The expected amount could not be parsed as a decimal at the configured
    /// token precision.
    #[error("invalid expected amount: {0}")]
    InvalidAmount(String),
}
