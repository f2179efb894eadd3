pub mod config;
pub mod error;
pub mod events;
pub mod formatters;
pub mod rpc;
pub mod treasury;
pub mod verifier;
