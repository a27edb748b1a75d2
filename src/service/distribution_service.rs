//! Distribution Lifecycle Manager
//!
//! Submits `distributeAid` disbursements and tracks them per aid request.

use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::contracts;
use super::lifecycle::{LifecycleError, ReleaseOnDrop};
use super::wallet_provider::WalletProvider;
use crate::models::units::parse_ether;
use crate::models::{DistributionState, TxReceipt};

const DISTRIBUTE_FALLBACK: &str = "Failed to distribute aid";

pub struct DistributionService {
    wallet: Arc<dyn WalletProvider>,
    aid_contract: String,
    state: watch::Sender<DistributionState>,
}

impl DistributionService {
    pub fn new(wallet: Arc<dyn WalletProvider>, aid_contract: String) -> Self {
        let (state, _) = watch::channel(DistributionState::default());
        Self {
            wallet,
            aid_contract,
            state,
        }
    }

    pub fn state(&self) -> DistributionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DistributionState> {
        self.state.subscribe()
    }

    /// Disburse `amount` ETH to aid request `request_id`.
    ///
    /// The amount is sent both as the call argument and as the attached
    /// value, in wei.
    pub async fn distribute_aid(
        &self,
        request_id: &str,
        amount: Decimal,
    ) -> Result<TxReceipt, LifecycleError> {
        let mut acquired = false;
        self.state.send_if_modified(|state| {
            if state.is_busy(request_id) {
                return false;
            }
            state.distributing.insert(request_id.to_string(), true);
            state.last_error = None;
            acquired = true;
            true
        });
        if !acquired {
            warn!(request_id = request_id, "Distribution already in flight");
            return Err(LifecycleError::AlreadyInFlight(format!("Aid request {}", request_id)));
        }

        let _submitting = ReleaseOnDrop::new(&self.state, |state: &mut DistributionState| {
            state.distributing.insert(request_id.to_string(), false);
        });

        let result = self.submit_distribution(request_id, amount).await;
        if let Err(err) = &result {
            error!(request_id = request_id, error = %err, "Distribution error");
            let message = err.user_message(DISTRIBUTE_FALLBACK);
            self.state.send_modify(|state| state.last_error = Some(message));
        }
        result
    }

    async fn submit_distribution(
        &self,
        request_id: &str,
        amount: Decimal,
    ) -> Result<TxReceipt, LifecycleError> {
        if !self.wallet.is_present() {
            return Err(LifecycleError::WalletNotInstalled("distribute aid"));
        }

        let amount_wei = parse_ether(amount)?;
        let call = contracts::distribute_aid(&self.aid_contract, request_id, amount_wei);
        let handle = self.wallet.call_contract(&call).await?;

        self.state
            .send_modify(|state| state.pending.mark_pending(request_id));
        info!(
            request_id = request_id,
            amount = %amount,
            tx_hash = %handle.hash,
            "Aid distribution submitted"
        );

        let confirmation = self.wallet.wait_for_confirmation(&handle).await;
        self.state
            .send_modify(|state| state.pending.mark_settled(request_id));

        let receipt = confirmation?;
        if !receipt.is_success() {
            return Err(LifecycleError::Reverted(receipt.hash));
        }

        info!(request_id = request_id, tx_hash = %receipt.hash, "Aid distributed");
        Ok(receipt)
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.last_error.take().is_some());
    }
}
