//! Scripted in-memory wallet for lifecycle tests

use async_trait::async_trait;
use ethers::types::U256;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use super::wallet_provider::{ContractCall, WalletError, WalletProvider};
use crate::models::{NetworkDescriptor, TransactionHandle, TransactionRequest, TxReceipt, TxStatus};

pub const FAUCET: &str = "0x1234567890123456789012345678901234567890";
pub const ACCOUNT: &str = "0xabcdefabcdefabcdefabcdefabcdefabcdefabcd";

pub struct MockWallet {
    present: bool,
    chain_id: Mutex<u64>,
    known_chains: Mutex<Vec<String>>,
    accounts: Mutex<Vec<String>>,
    balances: Mutex<HashMap<String, U256>>,
    /// Value transfers waiting to be credited on confirmation
    in_flight_transfers: Mutex<HashMap<String, TransactionRequest>>,
    fail_next_submission: Mutex<Option<fn() -> WalletError>>,
    fail_accounts: Mutex<Option<fn() -> WalletError>>,
    fail_chain_id: Mutex<bool>,
    fail_confirmation: Mutex<Option<fn() -> WalletError>>,
    revert_next: Mutex<bool>,
    read_responses: Mutex<HashMap<(String, String), VecDeque<Vec<u8>>>>,
    /// When set, `request_accounts` waits for a notification
    hold_accounts: Mutex<Option<Arc<Notify>>>,
    /// When set, `wait_for_confirmation` waits for a notification
    hold_confirmation: Mutex<Option<Arc<Notify>>>,
    calls: Mutex<Vec<String>>,
    submitted: Mutex<Vec<ContractCall>>,
    next_tx: AtomicU64,
}

impl MockWallet {
    pub fn new() -> Self {
        Self::with_presence(true)
    }

    pub fn absent() -> Self {
        Self::with_presence(false)
    }

    fn with_presence(present: bool) -> Self {
        Self {
            present,
            chain_id: Mutex::new(11_155_111),
            known_chains: Mutex::new(vec!["0xaa36a7".to_string()]),
            accounts: Mutex::new(vec![ACCOUNT.to_string()]),
            balances: Mutex::new(HashMap::new()),
            in_flight_transfers: Mutex::new(HashMap::new()),
            fail_next_submission: Mutex::new(None),
            fail_accounts: Mutex::new(None),
            fail_chain_id: Mutex::new(false),
            fail_confirmation: Mutex::new(None),
            revert_next: Mutex::new(false),
            read_responses: Mutex::new(HashMap::new()),
            hold_accounts: Mutex::new(None),
            hold_confirmation: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            next_tx: AtomicU64::new(1),
        }
    }

    pub fn forget_chains(&self) {
        self.known_chains.lock().unwrap().clear();
    }

    pub fn set_chain_id(&self, chain_id: u64) {
        *self.chain_id.lock().unwrap() = chain_id;
    }

    pub fn set_accounts(&self, accounts: Vec<&str>) {
        *self.accounts.lock().unwrap() = accounts.into_iter().map(String::from).collect();
    }

    pub fn set_balance(&self, address: &str, wei: U256) {
        self.balances
            .lock()
            .unwrap()
            .insert(address.to_lowercase(), wei);
    }

    pub fn fail_next_submission(&self, make: fn() -> WalletError) {
        *self.fail_next_submission.lock().unwrap() = Some(make);
    }

    pub fn fail_accounts(&self, make: fn() -> WalletError) {
        *self.fail_accounts.lock().unwrap() = Some(make);
    }

    pub fn fail_chain_id(&self) {
        *self.fail_chain_id.lock().unwrap() = true;
    }

    /// The next confirmation wait fails instead of returning a receipt
    pub fn fail_confirmation(&self, make: fn() -> WalletError) {
        *self.fail_confirmation.lock().unwrap() = Some(make);
    }

    pub fn revert_next(&self) {
        *self.revert_next.lock().unwrap() = true;
    }

    pub fn respond_to_read(&self, address: &str, signature: &str, data: Vec<u8>) {
        self.read_responses
            .lock()
            .unwrap()
            .entry((address.to_string(), signature.to_string()))
            .or_default()
            .push_back(data);
    }

    pub fn hold_accounts(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.hold_accounts.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn hold_confirmation(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.hold_confirmation.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Wallet methods invoked so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == method).count()
    }

    pub fn submitted(&self) -> Vec<ContractCall> {
        self.submitted.lock().unwrap().clone()
    }

    fn record(&self, method: &str) {
        self.calls.lock().unwrap().push(method.to_string());
    }

    fn next_hash(&self) -> String {
        format!("0x{:064x}", self.next_tx.fetch_add(1, Ordering::Relaxed))
    }

    fn take_submission_failure(&self) -> Option<WalletError> {
        self.fail_next_submission.lock().unwrap().take().map(|make| make())
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    fn is_present(&self) -> bool {
        self.present
    }

    async fn request_accounts(&self) -> Result<Vec<String>, WalletError> {
        self.record("request_accounts");
        let gate = self.hold_accounts.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if let Some(make) = *self.fail_accounts.lock().unwrap() {
            return Err(make());
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn switch_network(&self, chain_id_hex: &str) -> Result<(), WalletError> {
        self.record("switch_network");
        if !self
            .known_chains
            .lock()
            .unwrap()
            .iter()
            .any(|c| c == chain_id_hex)
        {
            return Err(WalletError::UnrecognizedChain(chain_id_hex.to_string()));
        }
        Ok(())
    }

    async fn register_network(&self, network: &NetworkDescriptor) -> Result<(), WalletError> {
        self.record("register_network");
        self.known_chains.lock().unwrap().push(network.chain_id_hex());
        Ok(())
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        self.record("chain_id");
        if *self.fail_chain_id.lock().unwrap() {
            return Err(WalletError::InvalidResponse("chain id unavailable".to_string()));
        }
        Ok(*self.chain_id.lock().unwrap())
    }

    async fn get_balance(&self, address: &str) -> Result<U256, WalletError> {
        self.record("get_balance");
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&address.to_lowercase())
            .copied()
            .unwrap_or_default())
    }

    async fn send_transaction(
        &self,
        tx: &TransactionRequest,
    ) -> Result<TransactionHandle, WalletError> {
        self.record("send_transaction");
        if let Some(err) = self.take_submission_failure() {
            return Err(err);
        }
        let hash = self.next_hash();
        self.in_flight_transfers
            .lock()
            .unwrap()
            .insert(hash.clone(), tx.clone());
        Ok(TransactionHandle::new(hash))
    }

    async fn call_contract(&self, call: &ContractCall) -> Result<TransactionHandle, WalletError> {
        self.record("call_contract");
        if let Some(err) = self.take_submission_failure() {
            return Err(err);
        }
        self.submitted.lock().unwrap().push(call.clone());
        Ok(TransactionHandle::new(self.next_hash()))
    }

    async fn read_contract(&self, call: &ContractCall) -> Result<Vec<u8>, WalletError> {
        self.record("read_contract");
        self.read_responses
            .lock()
            .unwrap()
            .get_mut(&(call.address.clone(), call.signature.to_string()))
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| WalletError::Rpc {
                code: -32000,
                message: "execution reverted".to_string(),
            })
    }

    async fn wait_for_confirmation(
        &self,
        handle: &TransactionHandle,
    ) -> Result<TxReceipt, WalletError> {
        self.record("wait_for_confirmation");
        let gate = self.hold_confirmation.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let transfer = self.in_flight_transfers.lock().unwrap().remove(&handle.hash);
        if let Some(make) = self.fail_confirmation.lock().unwrap().take() {
            return Err(make());
        }

        let reverted = std::mem::take(&mut *self.revert_next.lock().unwrap());
        if let (Some(transfer), false) = (transfer, reverted) {
            *self
                .balances
                .lock()
                .unwrap()
                .entry(transfer.to.to_lowercase())
                .or_default() += transfer.value;
        }

        Ok(TxReceipt {
            hash: handle.hash.clone(),
            status: if reverted {
                TxStatus::Reverted
            } else {
                TxStatus::Success
            },
            block_number: Some(1),
        })
    }
}
