// Service layer module for the aid dashboard
pub mod connection_service;
pub mod contracts;
pub mod distribution_service;
pub mod faucet_service;
pub mod json_rpc_wallet;
pub mod lifecycle;
pub mod read_model_service;
pub mod voting_service;
pub mod wallet_provider;

#[cfg(test)]
pub(crate) mod mock_wallet;

pub use connection_service::{ConnectOutcome, ConnectionError, ConnectionService, LogNotifier, Notifier};
pub use distribution_service::DistributionService;
pub use faucet_service::FaucetService;
pub use json_rpc_wallet::{JsonRpcWallet, JsonRpcWalletConfig};
pub use lifecycle::LifecycleError;
pub use read_model_service::{ChainReadModels, ReadModelError, ReadModelSource, StaticReadModels};
pub use voting_service::VotingService;
pub use wallet_provider::{AbsentWallet, WalletError, WalletProvider};
