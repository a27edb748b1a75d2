use crate::api_error::ApiError;
use crate::http::faucet_handler::{spawn_donation, DonateRequest};
use crate::http::AppState;
use crate::models::{GovernanceParams, Proposal, ProposalStatus, VotingState};
use crate::service::LifecycleError;
use actix_web::{web, HttpResponse, Responder};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

/// A proposal with the rules the dashboard derives from it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalView {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub has_majority: bool,
    /// Percent of the requested amount received so far
    pub funding_progress: Decimal,
    /// Initial faucet allocation, only for passed proposals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faucet_share: Option<Decimal>,
    pub is_voting: bool,
    pub is_pending: bool,
}

impl ProposalView {
    pub fn new(
        proposal: Proposal,
        governance: &GovernanceParams,
        voting: &VotingState,
        faucet_balance: Decimal,
    ) -> Self {
        let faucet_share = (proposal.status == ProposalStatus::Passed)
            .then(|| governance.faucet_share(faucet_balance));
        Self {
            has_majority: governance.has_majority(&proposal),
            funding_progress: proposal.funding_progress(),
            faucet_share,
            is_voting: voting.is_voting(&proposal.id),
            is_pending: voting.pending.is_pending(&proposal.id),
            proposal,
        }
    }
}

pub(crate) async fn proposal_views(state: &AppState) -> Result<Vec<ProposalView>, ApiError> {
    let proposals = state.read_models.proposals().await?;
    let voting = state.voting.state();
    let balance = state.faucet.state().balance;
    Ok(proposals
        .into_iter()
        .map(|p| ProposalView::new(p, &state.governance, &voting, balance))
        .collect())
}

/// GET /api/proposals
pub async fn list_proposals(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let views = proposal_views(&state).await?;
    Ok(HttpResponse::Ok().json(views))
}

/// POST /api/proposals/:id/vote
/// Submit a vote; the client follows progress through GET /api/voting
pub async fn vote(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let proposal_id = path.into_inner();
    state.connection.require_connected("vote")?;

    if state.read_models.proposal(&proposal_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("proposal {}", proposal_id)));
    }
    if state.voting.state().is_busy(&proposal_id) {
        return Err(LifecycleError::AlreadyInFlight(format!("Proposal {}", proposal_id)).into());
    }

    info!(proposal_id = %proposal_id, "Received vote request");

    let voting = state.voting.clone();
    let id = proposal_id.clone();
    tokio::spawn(async move {
        if let Err(err) = voting.vote(&id).await {
            debug!(proposal_id = %id, error = %err, "Vote task finished with error");
        }
    });

    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "status": "submitted",
        "proposalId": proposal_id
    })))
}

/// POST /api/proposals/:id/donate
/// Donations towards a proposal go to the faucet
pub async fn donate_to_proposal(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<DonateRequest>,
) -> Result<impl Responder, ApiError> {
    let proposal_id = path.into_inner();
    state.connection.require_connected("donate")?;

    if state.read_models.proposal(&proposal_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("proposal {}", proposal_id)));
    }

    debug!(proposal_id = %proposal_id, "Donation towards proposal");
    spawn_donation(&state, &req)
}

/// GET /api/voting
pub async fn get_voting_state(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    Ok(HttpResponse::Ok().json(state.voting.state()))
}

/// DELETE /api/voting/error
pub async fn clear_voting_error(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    state.voting.clear_error();
    Ok(HttpResponse::NoContent().finish())
}
