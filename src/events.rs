use alloy::rpc::types::Log;
use alloy::sol;
use alloy::sol_types::SolEvent;

sol! {
    event Transfer(address indexed from, address indexed to, uint256 value);
}

/// Decodes an ERC20 Transfer event from a raw log entry.
///
/// Returns `None` for any log that does not match the Transfer shape
/// (wrong signature topic, fewer than 3 topics, or a data payload that is
/// not a single 32-byte amount word). A malformed log is "not a transfer
/// we understand", never a fault.
pub fn decode_transfer_event(log: &Log) -> Option<Transfer> {
    let log_data = log.data();
    Transfer::decode_raw_log(log.topics(), &log_data.data).ok()
}
