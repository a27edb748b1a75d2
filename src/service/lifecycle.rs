//! Pieces shared by the transaction lifecycle managers

use thiserror::Error;
use tokio::sync::watch;

use super::wallet_provider::WalletError;
use crate::models::units::UnitError;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Please install a wallet to {0}")]
    WalletNotInstalled(&'static str),

    #[error("{0} already has a transaction in flight")]
    AlreadyInFlight(String),

    #[error(transparent)]
    InvalidAmount(#[from] UnitError),

    #[error("Transaction {0} reverted")]
    Reverted(String),

    #[error(transparent)]
    Wallet(#[from] WalletError),
}

impl LifecycleError {
    /// Message stored in `last_error` for the presentation layer.
    ///
    /// `fallback` is used for errors with no user-meaningful detail.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            LifecycleError::WalletNotInstalled(_)
            | LifecycleError::AlreadyInFlight(_)
            | LifecycleError::InvalidAmount(_)
            | LifecycleError::Reverted(_) => self.to_string(),
            LifecycleError::Wallet(err) => match err {
                WalletError::NotInstalled => "Please install a wallet to continue".to_string(),
                WalletError::UserRejected => "Transaction was rejected in your wallet".to_string(),
                WalletError::RequestPending => {
                    "Another wallet request is pending. Please check your wallet window".to_string()
                }
                WalletError::TransactionFailed(message) => {
                    format!("Transaction failed: {}", message)
                }
                WalletError::Rpc { message, .. } => format!("{}: {}", fallback, message),
                _ => fallback.to_string(),
            },
        }
    }
}

/// Applies `release` to a manager's state when dropped.
///
/// Holding one of these across the awaits of an operation guarantees the
/// in-progress flag is released on every exit path, including `?` returns
/// and a dropped future.
pub(crate) struct ReleaseOnDrop<'a, S, F>
where
    F: FnMut(&mut S),
{
    state: &'a watch::Sender<S>,
    release: Option<F>,
}

impl<'a, S, F> ReleaseOnDrop<'a, S, F>
where
    F: FnMut(&mut S),
{
    pub(crate) fn new(state: &'a watch::Sender<S>, release: F) -> Self {
        Self {
            state,
            release: Some(release),
        }
    }

    /// Apply `update` and the release in a single state change.
    pub(crate) fn release_with(mut self, update: impl FnOnce(&mut S)) {
        let release = self.release.take();
        self.state.send_modify(|state| {
            update(state);
            if let Some(mut release) = release {
                release(state);
            }
        });
    }
}

impl<S, F> Drop for ReleaseOnDrop<'_, S, F>
where
    F: FnMut(&mut S),
{
    fn drop(&mut self) {
        if let Some(release) = self.release.as_mut() {
            self.state.send_modify(|state| release(state));
        }
    }
}
