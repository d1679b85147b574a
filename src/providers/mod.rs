//! Provider implementations

pub mod coinbase;
pub mod json_rpc;

pub use coinbase::CoinbaseProvider;
pub use json_rpc::JsonRpcWallet;
