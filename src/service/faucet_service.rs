//! Faucet Lifecycle Manager
//!
//! Donations are plain value transfers to the faucet address. Each call gets
//! its own donation id for the submitting phase; once the wallet returns a
//! transaction it is tracked by hash until mined.

use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::lifecycle::{LifecycleError, ReleaseOnDrop};
use super::wallet_provider::WalletProvider;
use crate::models::units::{format_ether, parse_positive_ether_str};
use crate::models::{FaucetState, TransactionRequest, TxReceipt};

const DONATE_FALLBACK: &str = "Failed to donate to faucet";

pub struct FaucetService {
    wallet: Arc<dyn WalletProvider>,
    faucet_address: String,
    /// The only chain on which the faucet balance is meaningful
    chain_id: u64,
    state: watch::Sender<FaucetState>,
}

impl FaucetService {
    pub fn new(wallet: Arc<dyn WalletProvider>, faucet_address: String, chain_id: u64) -> Self {
        let (state, _) = watch::channel(FaucetState::default());
        Self {
            wallet,
            faucet_address,
            chain_id,
            state,
        }
    }

    pub fn state(&self) -> FaucetState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FaucetState> {
        self.state.subscribe()
    }

    /// Donate `amount` ETH (a user-entered decimal string) to the faucet.
    ///
    /// On confirmation the faucet balance is refreshed.
    pub async fn donate(&self, amount: &str) -> Result<TxReceipt, LifecycleError> {
        let donation_id = Uuid::new_v4().to_string();
        self.state.send_modify(|state| {
            state.donating.insert(donation_id.clone(), true);
            state.last_error = None;
        });

        let _submitting = ReleaseOnDrop::new(&self.state, |state: &mut FaucetState| {
            state.donating.remove(&donation_id);
        });

        let result = self.submit_donation(&donation_id, amount).await;
        if let Err(err) = &result {
            error!(donation_id = %donation_id, error = %err, "Donation error");
            let message = err.user_message(DONATE_FALLBACK);
            self.state.send_modify(|state| state.last_error = Some(message));
        }
        result
    }

    async fn submit_donation(
        &self,
        donation_id: &str,
        amount: &str,
    ) -> Result<TxReceipt, LifecycleError> {
        if !self.wallet.is_present() {
            return Err(LifecycleError::WalletNotInstalled("donate"));
        }

        let value = parse_positive_ether_str(amount)?;
        let request = TransactionRequest {
            to: self.faucet_address.clone(),
            value,
        };
        let handle = self.wallet.send_transaction(&request).await?;

        let tx_hash = handle.hash.clone();
        self.state
            .send_modify(|state| state.pending.mark_pending(&tx_hash));
        info!(
            donation_id = donation_id,
            amount = amount.trim(),
            tx_hash = %tx_hash,
            "Donation submitted"
        );

        let confirmation = self.wallet.wait_for_confirmation(&handle).await;
        self.state
            .send_modify(|state| state.pending.mark_settled(&tx_hash));

        let receipt = confirmation?;
        if !receipt.is_success() {
            return Err(LifecycleError::Reverted(receipt.hash));
        }

        info!(donation_id = donation_id, tx_hash = %receipt.hash, "Donation confirmed");
        self.get_balance().await;
        Ok(receipt)
    }

    /// Refresh the faucet balance. Never fails: any problem reads as zero.
    pub async fn get_balance(&self) -> Decimal {
        let balance = match self.query_balance().await {
            Ok(balance) => balance,
            Err(err) => {
                warn!(error = %err, "Error fetching faucet balance");
                Decimal::ZERO
            }
        };
        self.state.send_modify(|state| state.balance = balance);
        balance
    }

    async fn query_balance(&self) -> Result<Decimal, LifecycleError> {
        if !self.wallet.is_present() {
            return Ok(Decimal::ZERO);
        }

        let active_chain = self.wallet.chain_id().await?;
        if active_chain != self.chain_id {
            debug!(
                active_chain = active_chain,
                expected_chain = self.chain_id,
                "Wallet on another network, faucet balance unavailable"
            );
            return Ok(Decimal::ZERO);
        }

        let wei = self.wallet.get_balance(&self.faucet_address).await?;
        Ok(format_ether(wei)?)
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.last_error.take().is_some());
    }
}
