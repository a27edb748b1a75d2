use chrono::{DateTime, Utc};
use ethers::types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Receipt status of a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Reverted,
}

/// A submitted transaction, identified by its hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHandle {
    pub hash: String,
    pub submitted_at: DateTime<Utc>,
}

impl TransactionHandle {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            submitted_at: Utc::now(),
        }
    }
}

/// Outcome of waiting for a transaction to be mined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub hash: String,
    pub status: TxStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl TxReceipt {
    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Success
    }
}

/// A plain value transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub to: String,
    /// Value in wei
    pub value: U256,
}

/// Entity key -> "awaiting confirmation". A missing key reads as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingTransactionSet(BTreeMap<String, bool>);

impl PendingTransactionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.0.get(key).copied().unwrap_or(false)
    }

    pub fn mark_pending(&mut self, key: &str) {
        self.0.insert(key.to_string(), true);
    }

    pub fn mark_settled(&mut self, key: &str) {
        if let Some(flag) = self.0.get_mut(key) {
            *flag = false;
        }
    }

    pub fn any_pending(&self) -> bool {
        self.0.values().any(|pending| *pending)
    }

    /// Keys currently awaiting confirmation
    pub fn pending_keys(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|(_, pending)| **pending)
            .map(|(key, _)| key.clone())
            .collect()
    }
}
