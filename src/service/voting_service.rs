//! Voting Lifecycle Manager
//!
//! Tracks, per proposal, the two phases of a vote: submitting (until the
//! wallet hands back a transaction) and confirming (until it is mined).

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::contracts;
use super::lifecycle::{LifecycleError, ReleaseOnDrop};
use super::wallet_provider::WalletProvider;
use crate::models::{TxReceipt, VotingState};

const VOTE_FALLBACK: &str = "Failed to submit vote";

pub struct VotingService {
    wallet: Arc<dyn WalletProvider>,
    voting_contract: String,
    state: watch::Sender<VotingState>,
}

impl VotingService {
    pub fn new(wallet: Arc<dyn WalletProvider>, voting_contract: String) -> Self {
        let (state, _) = watch::channel(VotingState::default());
        Self {
            wallet,
            voting_contract,
            state,
        }
    }

    pub fn state(&self) -> VotingState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<VotingState> {
        self.state.subscribe()
    }

    /// Cast a vote for `proposal_id`.
    ///
    /// Does not check the wallet session. A proposal that is already being
    /// voted on or confirmed is rejected with `AlreadyInFlight` and the state
    /// is left untouched. Any other failure is also recorded in `last_error`.
    pub async fn vote(&self, proposal_id: &str) -> Result<TxReceipt, LifecycleError> {
        let mut acquired = false;
        self.state.send_if_modified(|state| {
            if state.is_busy(proposal_id) {
                return false;
            }
            state.voting.insert(proposal_id.to_string(), true);
            state.last_error = None;
            acquired = true;
            true
        });
        if !acquired {
            warn!(proposal_id = proposal_id, "Vote already in flight");
            return Err(LifecycleError::AlreadyInFlight(format!("Proposal {}", proposal_id)));
        }

        let _submitting = ReleaseOnDrop::new(&self.state, |state: &mut VotingState| {
            state.voting.insert(proposal_id.to_string(), false);
        });

        let result = self.submit_vote(proposal_id).await;
        if let Err(err) = &result {
            error!(proposal_id = proposal_id, error = %err, "Voting error");
            let message = err.user_message(VOTE_FALLBACK);
            self.state.send_modify(|state| state.last_error = Some(message));
        }
        result
    }

    async fn submit_vote(&self, proposal_id: &str) -> Result<TxReceipt, LifecycleError> {
        if !self.wallet.is_present() {
            return Err(LifecycleError::WalletNotInstalled("vote"));
        }

        let call = contracts::vote(&self.voting_contract, proposal_id);
        let handle = self.wallet.call_contract(&call).await?;

        self.state
            .send_modify(|state| state.pending.mark_pending(proposal_id));
        info!(proposal_id = proposal_id, tx_hash = %handle.hash, "Vote submitted");

        let confirmation = self.wallet.wait_for_confirmation(&handle).await;
        self.state
            .send_modify(|state| state.pending.mark_settled(proposal_id));

        let receipt = confirmation?;
        if !receipt.is_success() {
            return Err(LifecycleError::Reverted(receipt.hash));
        }

        info!(proposal_id = proposal_id, tx_hash = %receipt.hash, "Vote confirmed");
        Ok(receipt)
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|state| state.last_error.take().is_some());
    }
}
