// Raw-log queue and chain bookkeeping
pub mod evm_chains;
pub mod evm_logs;
pub mod evm_sync_logs;

// Lending entities
pub mod account;
pub mod market;
pub mod position;
pub mod position_transaction;
pub mod rate_per_block;

// Re-exports for convenience
pub use evm_chains::EvmChains;
pub use evm_logs::EvmLogs;
pub use evm_sync_logs::EvmSyncLogs;

pub use account::Account;
pub use market::{Market, NewMarket};
pub use position::Position;
pub use position_transaction::{NewPositionTransaction, PositionTransaction};
pub use rate_per_block::{NewRatePerBlock, RatePerBlock};
