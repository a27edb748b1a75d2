pub mod aid_request_handler;
pub mod dashboard_handler;
pub mod faucet_handler;
pub mod health;
pub mod proposal_handler;
pub mod session_handler;

use actix_web::web;
use std::sync::Arc;

use crate::models::GovernanceParams;
use crate::service::{
    ConnectionService, DistributionService, FaucetService, ReadModelSource, VotingService,
    WalletProvider,
};

/// Shared handles to the managers and collaborators
pub struct AppState {
    pub wallet: Arc<dyn WalletProvider>,
    pub connection: Arc<ConnectionService>,
    pub voting: Arc<VotingService>,
    pub distribution: Arc<DistributionService>,
    pub faucet: Arc<FaucetService>,
    pub read_models: Arc<dyn ReadModelSource>,
    pub governance: GovernanceParams,
}

/// Configure dashboard routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .route("/session", web::get().to(session_handler::get_session))
            .route("/session/connect", web::post().to(session_handler::connect))
            .route("/session/disconnect", web::post().to(session_handler::disconnect))
            .route("/dashboard", web::get().to(dashboard_handler::get_dashboard))
            .route("/proposals", web::get().to(proposal_handler::list_proposals))
            .route("/proposals/{id}/vote", web::post().to(proposal_handler::vote))
            .route(
                "/proposals/{id}/donate",
                web::post().to(proposal_handler::donate_to_proposal),
            )
            .route("/voting", web::get().to(proposal_handler::get_voting_state))
            .route("/voting/error", web::delete().to(proposal_handler::clear_voting_error))
            .route("/aid-requests", web::get().to(aid_request_handler::list_aid_requests))
            .route(
                "/aid-requests/{id}/distribute",
                web::post().to(aid_request_handler::distribute_aid),
            )
            .route(
                "/distribution",
                web::get().to(aid_request_handler::get_distribution_state),
            )
            .route(
                "/distribution/error",
                web::delete().to(aid_request_handler::clear_distribution_error),
            )
            .route("/faucet", web::get().to(faucet_handler::get_faucet_state))
            .route("/faucet/balance", web::post().to(faucet_handler::refresh_balance))
            .route("/faucet/donate", web::post().to(faucet_handler::donate))
            .route("/faucet/error", web::delete().to(faucet_handler::clear_faucet_error)),
    );
}
