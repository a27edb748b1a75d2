//! Connection Manager
//!
//! Owns the wallet session. Every other manager assumes the caller has
//! checked [`ConnectionService::require_connected`] first.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::lifecycle::ReleaseOnDrop;
use super::wallet_provider::{WalletError, WalletProvider};
use crate::models::{NetworkDescriptor, WalletSession};

/// Blocking user notification for connection problems
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Notifier that writes alerts to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        warn!(alert = message, "User alert");
    }
}

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Please install a wallet to use this application")]
    WalletNotInstalled,

    #[error("Please connect your wallet to continue")]
    UserRejected,

    #[error("Wallet connection in progress. Please check your wallet window")]
    RequestPending,

    #[error("Failed to connect wallet. Please try again")]
    Failed(#[source] WalletError),

    #[error("Please connect your wallet to {0}")]
    NotConnected(&'static str),
}

impl From<WalletError> for ConnectionError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::NotInstalled => ConnectionError::WalletNotInstalled,
            WalletError::UserRejected => ConnectionError::UserRejected,
            WalletError::RequestPending => ConnectionError::RequestPending,
            other => ConnectionError::Failed(other),
        }
    }
}

/// Result of a `connect()` call that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected(String),
    AlreadyConnected(String),
    /// Another `connect()` is still running; nothing was requested
    InProgress,
}

pub struct ConnectionService {
    wallet: Arc<dyn WalletProvider>,
    network: NetworkDescriptor,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<WalletSession>,
}

impl ConnectionService {
    pub fn new(
        wallet: Arc<dyn WalletProvider>,
        network: NetworkDescriptor,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(WalletSession::disconnected());
        Self {
            wallet,
            network,
            notifier,
            state,
        }
    }

    pub fn session(&self) -> WalletSession {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WalletSession> {
        self.state.subscribe()
    }

    /// Gate for state-changing operations. Returns the connected address.
    pub fn require_connected(&self, action: &'static str) -> Result<String, ConnectionError> {
        let session = self.state.borrow();
        match (&session.address, session.is_connected) {
            (Some(address), true) => Ok(address.clone()),
            _ => Err(ConnectionError::NotConnected(action)),
        }
    }

    /// Connect the wallet to the designated network.
    ///
    /// Returns immediately when already connected or connecting.
    pub async fn connect(&self) -> Result<ConnectOutcome, ConnectionError> {
        let mut skipped = None;
        self.state.send_if_modified(|session| {
            if session.is_connected {
                skipped = Some(ConnectOutcome::AlreadyConnected(
                    session.address.clone().unwrap_or_default(),
                ));
                false
            } else if session.is_connecting {
                skipped = Some(ConnectOutcome::InProgress);
                false
            } else {
                session.is_connecting = true;
                true
            }
        });
        if let Some(outcome) = skipped {
            return Ok(outcome);
        }

        let connecting = ReleaseOnDrop::new(&self.state, |session: &mut WalletSession| {
            session.is_connecting = false;
        });
        let result = self.establish().await;

        connecting.release_with(|session| {
            if let Ok(address) = &result {
                session.address = Some(address.clone());
                session.is_connected = true;
            }
        });

        match result {
            Ok(address) => {
                info!(address = %address, chain_id = self.network.chain_id, "Wallet connected");
                Ok(ConnectOutcome::Connected(address))
            }
            Err(err) => {
                if err.is_transient() {
                    info!(reason = %err, "Wallet connection not completed");
                } else {
                    error!(error = %err, "Error connecting wallet");
                }
                let err = ConnectionError::from(err);
                self.notifier.alert(&err.to_string());
                Err(err)
            }
        }
    }

    async fn establish(&self) -> Result<String, WalletError> {
        if !self.wallet.is_present() {
            return Err(WalletError::NotInstalled);
        }

        let chain_id_hex = self.network.chain_id_hex();
        match self.wallet.switch_network(&chain_id_hex).await {
            Ok(()) => {}
            Err(WalletError::UnrecognizedChain(_)) => {
                info!(
                    chain_id = %chain_id_hex,
                    chain_name = %self.network.chain_name,
                    "Registering network with wallet"
                );
                self.wallet.register_network(&self.network).await?;
                self.wallet.switch_network(&chain_id_hex).await?;
            }
            Err(err) => return Err(err),
        }

        let accounts = self.wallet.request_accounts().await?;
        accounts
            .into_iter()
            .next()
            .ok_or_else(|| WalletError::InvalidResponse("wallet returned no accounts".to_string()))
    }

    pub fn disconnect(&self) {
        self.state.send_replace(WalletSession::disconnected());
        info!("Wallet disconnected");
    }
}
