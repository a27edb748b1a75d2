use crate::api_error::ApiError;
use crate::http::aid_request_handler::{aid_request_views, AidRequestView};
use crate::http::proposal_handler::{proposal_views, ProposalView};
use crate::http::AppState;
use crate::models::{DistributionState, FaucetState, VotingState, WalletSessionResponse};
use actix_web::{web, HttpResponse, Responder};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceSummary {
    pub dao_members: u64,
    pub proposal_threshold: u64,
    pub faucet_distribution_ratio: Decimal,
}

/// Everything the dashboard screen renders, in one snapshot
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub session: WalletSessionResponse,
    pub governance: GovernanceSummary,
    pub faucet: FaucetState,
    pub voting: VotingState,
    pub distribution: DistributionState,
    pub proposals: Vec<ProposalView>,
    pub aid_requests: Vec<AidRequestView>,
}

/// GET /api/dashboard
pub async fn get_dashboard(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let proposals = proposal_views(&state).await?;
    let aid_requests = aid_request_views(&state).await?;

    let view = DashboardView {
        session: WalletSessionResponse::from(state.connection.session()),
        governance: GovernanceSummary {
            dao_members: state.governance.dao_members,
            proposal_threshold: state.governance.proposal_threshold(),
            faucet_distribution_ratio: state.governance.faucet_distribution_ratio,
        },
        faucet: state.faucet.state(),
        voting: state.voting.state(),
        distribution: state.distribution.state(),
        proposals,
        aid_requests,
    };

    Ok(HttpResponse::Ok().json(view))
}
