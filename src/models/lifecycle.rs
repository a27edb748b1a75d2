//! Observable state owned by the lifecycle managers.
//!
//! Each manager keeps one of these inside a `watch` channel and is the only
//! writer. Readers get whole snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::transaction::PendingTransactionSet;

fn is_flagged(flags: &BTreeMap<String, bool>, key: &str) -> bool {
    flags.get(key).copied().unwrap_or(false)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingState {
    /// proposal id -> vote submission in flight
    pub voting: BTreeMap<String, bool>,
    /// proposal id -> waiting for confirmation
    pub pending: PendingTransactionSet,
    pub last_error: Option<String>,
}

impl VotingState {
    pub fn is_voting(&self, proposal_id: &str) -> bool {
        is_flagged(&self.voting, proposal_id)
    }

    /// Submitting or confirming
    pub fn is_busy(&self, proposal_id: &str) -> bool {
        self.is_voting(proposal_id) || self.pending.is_pending(proposal_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionState {
    /// aid request id -> disbursement submission in flight
    pub distributing: BTreeMap<String, bool>,
    /// aid request id -> waiting for confirmation
    pub pending: PendingTransactionSet,
    pub last_error: Option<String>,
}

impl DistributionState {
    pub fn is_distributing_request(&self, request_id: &str) -> bool {
        is_flagged(&self.distributing, request_id)
    }

    /// Any disbursement currently being submitted
    pub fn is_distributing(&self) -> bool {
        self.distributing.values().any(|flag| *flag)
    }

    pub fn is_busy(&self, request_id: &str) -> bool {
        self.is_distributing_request(request_id) || self.pending.is_pending(request_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaucetState {
    /// Faucet holding, ETH
    pub balance: Decimal,
    /// donation id -> transfer submission in flight
    pub donating: BTreeMap<String, bool>,
    /// tx hash -> waiting for confirmation
    pub pending: PendingTransactionSet,
    pub last_error: Option<String>,
}

impl Default for FaucetState {
    fn default() -> Self {
        Self {
            balance: Decimal::ZERO,
            donating: BTreeMap::new(),
            pending: PendingTransactionSet::new(),
            last_error: None,
        }
    }
}

impl FaucetState {
    /// Any donation currently being submitted
    pub fn is_donating(&self) -> bool {
        self.donating.values().any(|flag| *flag)
    }
}
