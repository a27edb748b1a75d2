//! Read models for aid requests and proposals
//!
//! The lifecycle managers never hold these records. They come from a
//! [`ReadModelSource`]: either a JSON fixture, or a fixture catalog overlaid
//! with the contracts' view methods.

use async_trait::async_trait;
use ethers::types::U256;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::contracts;
use super::wallet_provider::{WalletError, WalletProvider};
use crate::models::units::{format_ether, UnitError};
use crate::models::{AidRequest, AidStatus, Proposal};

#[derive(Debug, Error)]
pub enum ReadModelError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixture: {0}")]
    InvalidFixture(#[from] serde_json::Error),

    #[error("Contract read failed: {0}")]
    Contract(#[from] WalletError),

    #[error("Invalid on-chain amount: {0}")]
    Amount(#[from] UnitError),
}

#[async_trait]
pub trait ReadModelSource: Send + Sync {
    async fn aid_requests(&self) -> Result<Vec<AidRequest>, ReadModelError>;

    async fn proposals(&self) -> Result<Vec<Proposal>, ReadModelError>;

    async fn aid_request(&self, id: &str) -> Result<Option<AidRequest>, ReadModelError> {
        Ok(self.aid_requests().await?.into_iter().find(|r| r.id == id))
    }

    async fn proposal(&self, id: &str) -> Result<Option<Proposal>, ReadModelError> {
        Ok(self.proposals().await?.into_iter().find(|p| p.id == id))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Fixture {
    #[serde(default)]
    aid_requests: Vec<AidRequest>,
    #[serde(default)]
    proposals: Vec<Proposal>,
}

/// Records loaded once from a JSON fixture
#[derive(Debug, Clone, Default)]
pub struct StaticReadModels {
    aid_requests: Vec<AidRequest>,
    proposals: Vec<Proposal>,
}

impl StaticReadModels {
    pub fn new(aid_requests: Vec<AidRequest>, proposals: Vec<Proposal>) -> Self {
        Self {
            aid_requests,
            proposals,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ReadModelError> {
        let fixture: Fixture = serde_json::from_str(json)?;
        Ok(Self::new(fixture.aid_requests, fixture.proposals))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReadModelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ReadModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let models = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            aid_requests = models.aid_requests.len(),
            proposals = models.proposals.len(),
            "Loaded read model fixture"
        );
        Ok(models)
    }
}

#[async_trait]
impl ReadModelSource for StaticReadModels {
    async fn aid_requests(&self) -> Result<Vec<AidRequest>, ReadModelError> {
        Ok(self.aid_requests.clone())
    }

    async fn proposals(&self) -> Result<Vec<Proposal>, ReadModelError> {
        Ok(self.proposals.clone())
    }
}

/// Catalog records refreshed from the aid distribution and voting contracts
pub struct ChainReadModels {
    catalog: StaticReadModels,
    wallet: Arc<dyn WalletProvider>,
    aid_contract: String,
    voting_contract: String,
}

impl ChainReadModels {
    pub fn new(
        catalog: StaticReadModels,
        wallet: Arc<dyn WalletProvider>,
        aid_contract: String,
        voting_contract: String,
    ) -> Self {
        Self {
            catalog,
            wallet,
            aid_contract,
            voting_contract,
        }
    }

    async fn refresh_aid_request(&self, mut request: AidRequest) -> Result<AidRequest, ReadModelError> {
        let call = contracts::get_aid_request(&self.aid_contract, &request.id);
        let data = self.wallet.read_contract(&call).await?;
        let on_chain = contracts::decode_aid_request(&data)?;

        if !on_chain.is_registered() {
            debug!(request_id = %request.id, "Aid request not registered on chain, keeping catalog record");
            return Ok(request);
        }

        debug!(
            request_id = %request.id,
            is_active = on_chain.is_active,
            "Read aid request from chain"
        );

        if !on_chain.location.is_empty() {
            request.location = on_chain.location.clone();
        }
        request.required_amount = format_ether(on_chain.required_amount)?;
        if on_chain.is_fully_distributed() {
            request.status = AidStatus::Distributed;
        }
        Ok(request)
    }

    async fn refresh_votes(&self, mut proposal: Proposal) -> Result<Proposal, ReadModelError> {
        let call = contracts::get_votes(&self.voting_contract, &proposal.id);
        let data = self.wallet.read_contract(&call).await?;
        let votes = contracts::decode_uint(&data)?;
        proposal.votes = if votes > U256::from(u64::MAX) {
            u64::MAX
        } else {
            votes.as_u64()
        };
        Ok(proposal)
    }
}

#[async_trait]
impl ReadModelSource for ChainReadModels {
    async fn aid_requests(&self) -> Result<Vec<AidRequest>, ReadModelError> {
        let mut refreshed = Vec::new();
        for request in self.catalog.aid_requests().await? {
            refreshed.push(self.refresh_aid_request(request).await?);
        }
        Ok(refreshed)
    }

    async fn proposals(&self) -> Result<Vec<Proposal>, ReadModelError> {
        let mut refreshed = Vec::new();
        for proposal in self.catalog.proposals().await? {
            refreshed.push(self.refresh_votes(proposal).await?);
        }
        Ok(refreshed)
    }
}
