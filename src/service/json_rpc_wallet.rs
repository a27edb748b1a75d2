//! JSON-RPC wallet
//!
//! Talks to a wallet endpoint (a signing node or a wallet bridge) through an
//! `ethers` provider. The EIP-1193 wallet methods go through raw
//! `request`s; everything else uses the provider's typed middleware.
//!
//! # Methods
//! - `eth_requestAccounts`, `eth_accounts`
//! - `wallet_switchEthereumChain`, `wallet_addEthereumChain`
//! - `eth_chainId`, `eth_getBalance`, `eth_call`
//! - `eth_sendTransaction`, `eth_getTransactionReceipt`

use async_trait::async_trait;
use ethers::providers::{Http, Middleware, PendingTransaction, Provider};
use ethers::types::{
    Address, TransactionReceipt, TransactionRequest as EthTransactionRequest, TxHash, U256, U64,
};
use ethers::utils::to_checksum;
use std::str::FromStr;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::wallet_provider::{ContractCall, WalletError, WalletProvider};
use crate::models::{NetworkDescriptor, TransactionHandle, TransactionRequest, TxReceipt, TxStatus};

/// Connection settings for the wallet endpoint
#[derive(Debug, Clone)]
pub struct JsonRpcWalletConfig {
    pub rpc_url: String,
    /// Interval between receipt lookups while waiting for confirmation
    pub confirmation_poll_interval: Duration,
}

impl JsonRpcWalletConfig {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            confirmation_poll_interval: Duration::from_millis(2000),
        }
    }
}

fn parse_address(raw: &str) -> Result<Address, WalletError> {
    Address::from_str(raw).map_err(|_| WalletError::InvalidAddress(raw.to_string()))
}

fn parse_tx_hash(raw: &str) -> Result<TxHash, WalletError> {
    TxHash::from_str(raw)
        .map_err(|_| WalletError::InvalidResponse(format!("invalid transaction hash {}", raw)))
}

fn into_receipt(receipt: TransactionReceipt) -> TxReceipt {
    let status = if receipt.status == Some(U64::from(1)) {
        TxStatus::Success
    } else {
        TxStatus::Reverted
    };
    TxReceipt {
        hash: format!("{:#x}", receipt.transaction_hash),
        status,
        block_number: receipt.block_number.map(|block| block.as_u64()),
    }
}

pub struct JsonRpcWallet {
    provider: Provider<Http>,
    active_account: RwLock<Option<Address>>,
}

impl JsonRpcWallet {
    pub fn new(config: JsonRpcWalletConfig) -> Result<Self, WalletError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| WalletError::InvalidResponse(format!("invalid wallet URL: {}", e)))?
            .interval(config.confirmation_poll_interval);

        Ok(Self {
            provider,
            active_account: RwLock::new(None),
        })
    }

    fn remember_account(&self, account: Option<&Address>) {
        if let Ok(mut active) = self.active_account.write() {
            *active = account.copied();
        }
    }

    /// Account used as `from` for submitted transactions
    async fn sender(&self) -> Result<Address, WalletError> {
        let cached = self.active_account.read().ok().and_then(|active| *active);
        if let Some(account) = cached {
            return Ok(account);
        }

        let accounts = self.provider.get_accounts().await?;
        self.remember_account(accounts.first());
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| WalletError::InvalidResponse("wallet exposes no accounts".to_string()))
    }

    async fn submit(&self, tx: EthTransactionRequest) -> Result<TransactionHandle, WalletError> {
        let pending = self.provider.send_transaction(tx, None).await?;
        let hash = format!("{:#x}", *pending);
        info!(tx_hash = %hash, "Transaction submitted");
        Ok(TransactionHandle::new(hash))
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    fn is_present(&self) -> bool {
        true
    }

    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        let accounts: Vec<Address> = self
            .provider
            .request("eth_requestAccounts", Vec::<serde_json::Value>::new())
            .await?;
        self.remember_account(accounts.first());
        Ok(accounts
            .iter()
            .map(|account| to_checksum(account, None))
            .collect())
    }

    async fn switch_network(&self, chain_id_hex: &str) -> Result<(), WalletError> {
        let _: serde_json::Value = self
            .provider
            .request(
                "wallet_switchEthereumChain",
                [serde_json::json!({ "chainId": chain_id_hex })],
            )
            .await?;
        Ok(())
    }

    async fn register_network(&self, network: &NetworkDescriptor) -> Result<(), WalletError> {
        let _: serde_json::Value = self
            .provider
            .request("wallet_addEthereumChain", [network.to_wallet_params()])
            .await?;
        Ok(())
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        let chain_id = self.provider.get_chainid().await?;
        if chain_id > U256::from(u64::MAX) {
            return Err(WalletError::InvalidResponse(format!(
                "chain id {} out of range",
                chain_id
            )));
        }
        Ok(chain_id.as_u64())
    }

    async fn get_balance(&self, address: &str) -> Result<U256, WalletError> {
        let address = parse_address(address)?;
        Ok(self.provider.get_balance(address, None).await?)
    }

    async fn send_transaction(
        &self,
        tx: &TransactionRequest,
    ) -> Result<TransactionHandle, WalletError> {
        let request = EthTransactionRequest::new()
            .from(self.sender().await?)
            .to(parse_address(&tx.to)?)
            .value(tx.value);
        self.submit(request).await
    }

    async fn call_contract(&self, call: &ContractCall) -> Result<TransactionHandle, WalletError> {
        let mut request = EthTransactionRequest::new()
            .from(self.sender().await?)
            .to(parse_address(&call.address)?)
            .data(call.calldata());
        if let Some(value) = call.value {
            request = request.value(value);
        }

        debug!(contract = %call.address, method = call.method(), "Submitting contract call");
        self.submit(request).await
    }

    async fn read_contract(&self, call: &ContractCall) -> Result<Vec<u8>, WalletError> {
        let request = EthTransactionRequest::new()
            .to(parse_address(&call.address)?)
            .data(call.calldata());
        let output = self.provider.call(&request.into(), None).await?;
        Ok(output.to_vec())
    }

    async fn wait_for_confirmation(
        &self,
        handle: &TransactionHandle,
    ) -> Result<TxReceipt, WalletError> {
        let hash = parse_tx_hash(&handle.hash)?;
        debug!(tx_hash = %handle.hash, "Waiting for confirmation");

        let receipt = PendingTransaction::new(hash, &self.provider)
            .await?
            .ok_or_else(|| {
                WalletError::TransactionFailed(format!(
                    "{} was dropped before it was mined",
                    handle.hash
                ))
            })?;

        let receipt = into_receipt(receipt);
        if receipt.is_success() {
            info!(tx_hash = %receipt.hash, block = ?receipt.block_number, "Transaction confirmed");
        } else {
            warn!(tx_hash = %receipt.hash, "Transaction reverted");
        }
        Ok(receipt)
    }
}
