use crate::api_error::ApiError;
use crate::http::AppState;
use crate::models::units::parse_positive_ether_str;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

const INVALID_DONATION: &str = "Please enter a valid donation amount";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DonateRequest {
    /// ETH, as entered by the user
    #[validate(length(min = 1, max = 64))]
    pub amount: String,
}

impl DonateRequest {
    /// The amount must parse as a positive ETH value
    pub fn validated_amount(&self) -> Result<String, ApiError> {
        let invalid = || ApiError::BadRequest(INVALID_DONATION.to_string());
        self.validate().map_err(|_| invalid())?;
        parse_positive_ether_str(&self.amount).map_err(|_| invalid())?;
        Ok(self.amount.trim().to_string())
    }
}

/// Gate, validate and spawn a faucet donation. Shared by the faucet and
/// proposal donation routes.
pub(crate) fn spawn_donation(
    state: &AppState,
    req: &DonateRequest,
) -> Result<HttpResponse, ApiError> {
    state.connection.require_connected("donate")?;
    let amount = req.validated_amount()?;

    info!(amount = %amount, "Received donation request");

    let faucet = state.faucet.clone();
    let submitted = amount.clone();
    tokio::spawn(async move {
        if let Err(err) = faucet.donate(&submitted).await {
            debug!(error = %err, "Donation task finished with error");
        }
    });

    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "status": "submitted",
        "amount": amount
    })))
}

/// GET /api/faucet
pub async fn get_faucet_state(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    Ok(HttpResponse::Ok().json(state.faucet.state()))
}

/// POST /api/faucet/balance
/// Re-read the faucet balance; reads as zero off the designated network
pub async fn refresh_balance(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let balance = state.faucet.get_balance().await;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "balance": balance })))
}

/// POST /api/faucet/donate
pub async fn donate(
    state: web::Data<AppState>,
    req: web::Json<DonateRequest>,
) -> Result<impl Responder, ApiError> {
    spawn_donation(&state, &req)
}

/// DELETE /api/faucet/error
pub async fn clear_faucet_error(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    state.faucet.clear_error();
    Ok(HttpResponse::NoContent().finish())
}
