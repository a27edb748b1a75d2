//! Wallet collaborator seam
//!
//! Everything the lifecycle managers need from a wallet goes through
//! [`WalletProvider`]: account access, network switching, signing and
//! submitting transactions, and read-only chain queries.

use async_trait::async_trait;
use ethers::abi::{self, Token};
use ethers::providers::{ProviderError, RpcError};
use ethers::types::{Bytes, U256};
use ethers::utils;
use thiserror::Error;

use crate::models::{NetworkDescriptor, TransactionHandle, TransactionRequest, TxReceipt};

/// EIP-1193 "user rejected request"
pub const CODE_USER_REJECTED: i64 = 4001;
/// "Unrecognized chain ID" from `wallet_switchEthereumChain`
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;
/// "Request of this type already pending"
pub const CODE_REQUEST_PENDING: i64 = -32002;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("No wallet is available")]
    NotInstalled,

    #[error("User rejected the request")]
    UserRejected,

    #[error("Another wallet request is already pending")]
    RequestPending,

    #[error("Chain {0} is not recognized by the wallet")]
    UnrecognizedChain(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Provider error: {0}")]
    Provider(#[source] ProviderError),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl WalletError {
    /// Map a JSON-RPC error object onto the wallet error taxonomy.
    ///
    /// Some wallets nest the real code under `data.code`.
    pub fn from_rpc(code: i64, message: String, data: Option<&serde_json::Value>) -> Self {
        let nested = data
            .and_then(|d| d.get("code"))
            .and_then(serde_json::Value::as_i64);

        match (code, nested) {
            (CODE_USER_REJECTED, _) | (_, Some(CODE_USER_REJECTED)) => WalletError::UserRejected,
            (CODE_REQUEST_PENDING, _) | (_, Some(CODE_REQUEST_PENDING)) => {
                WalletError::RequestPending
            }
            (CODE_UNRECOGNIZED_CHAIN, _) | (_, Some(CODE_UNRECOGNIZED_CHAIN)) => {
                WalletError::UnrecognizedChain(message)
            }
            _ => WalletError::Rpc { code, message },
        }
    }

    /// Transient conditions the user can resolve and retry
    pub fn is_transient(&self) -> bool {
        matches!(self, WalletError::UserRejected | WalletError::RequestPending)
    }
}

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        match err.as_error_response() {
            Some(rpc) => WalletError::from_rpc(rpc.code, rpc.message.clone(), rpc.data.as_ref()),
            None => WalletError::Provider(err),
        }
    }
}

impl From<abi::Error> for WalletError {
    fn from(err: abi::Error) -> Self {
        WalletError::InvalidResponse(err.to_string())
    }
}

/// A call to a contract method, encoded by the wallet before submission
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCall {
    pub address: String,
    /// Canonical signature, e.g. `distributeAid(string,uint256)`
    pub signature: &'static str,
    pub args: Vec<Token>,
    /// Payable value in wei
    pub value: Option<U256>,
}

impl ContractCall {
    pub fn new(address: impl Into<String>, signature: &'static str, args: Vec<Token>) -> Self {
        Self {
            address: address.into(),
            signature,
            args,
            value: None,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Method name without the parameter list
    pub fn method(&self) -> &str {
        self.signature
            .split_once('(')
            .map(|(name, _)| name)
            .unwrap_or(self.signature)
    }

    /// Selector followed by the ABI-encoded arguments
    pub fn calldata(&self) -> Bytes {
        let mut data = utils::id(self.signature).to_vec();
        data.extend(abi::encode(&self.args));
        data.into()
    }
}

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether a wallet is available at all
    fn is_present(&self) -> bool;

    /// Ask for account access. The first account is the active one.
    async fn request_accounts(&self) -> Result<Vec<String>, WalletError>;

    /// Fails with [`WalletError::UnrecognizedChain`] when the wallet does not know the chain
    async fn switch_network(&self, chain_id_hex: &str) -> Result<(), WalletError>;

    async fn register_network(&self, network: &NetworkDescriptor) -> Result<(), WalletError>;

    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// Balance in wei
    async fn get_balance(&self, address: &str) -> Result<U256, WalletError>;

    async fn send_transaction(
        &self,
        tx: &TransactionRequest,
    ) -> Result<TransactionHandle, WalletError>;

    /// Submit a state-changing contract call
    async fn call_contract(&self, call: &ContractCall) -> Result<TransactionHandle, WalletError>;

    /// Execute a view call and return the raw return data
    async fn read_contract(&self, call: &ContractCall) -> Result<Vec<u8>, WalletError>;

    /// Suspend until the transaction is mined
    async fn wait_for_confirmation(
        &self,
        handle: &TransactionHandle,
    ) -> Result<TxReceipt, WalletError>;
}

/// Stand-in used when no wallet endpoint is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsentWallet;

#[async_trait]
impl WalletProvider for AbsentWallet {
    fn is_present(&self) -> bool {
        false
    }

    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        Err(WalletError::NotInstalled)
    }

    async fn switch_network(&self, _chain_id_hex: &str) -> Result<(), WalletError> {
        Err(WalletError::NotInstalled)
    }

    async fn register_network(&self, _network: &NetworkDescriptor) -> Result<(), WalletError> {
        Err(WalletError::NotInstalled)
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Err(WalletError::NotInstalled)
    }

    async fn get_balance(&self, _address: &str) -> Result<U256, WalletError> {
        Err(WalletError::NotInstalled)
    }

    async fn send_transaction(
        &self,
        _tx: &TransactionRequest,
    ) -> Result<TransactionHandle, WalletError> {
        Err(WalletError::NotInstalled)
    }

    async fn call_contract(&self, _call: &ContractCall) -> Result<TransactionHandle, WalletError> {
        Err(WalletError::NotInstalled)
    }

    async fn read_contract(&self, _call: &ContractCall) -> Result<Vec<u8>, WalletError> {
        Err(WalletError::NotInstalled)
    }

    async fn wait_for_confirmation(
        &self,
        _handle: &TransactionHandle,
    ) -> Result<TxReceipt, WalletError> {
        Err(WalletError::NotInstalled)
    }
}
