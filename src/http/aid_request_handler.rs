use crate::api_error::ApiError;
use crate::http::AppState;
use crate::models::{AidRequest, DistributionState, UrgencyTier};
use crate::service::LifecycleError;
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use tracing::{debug, info};

/// An aid request with its derived display rules and busy flags
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AidRequestView {
    #[serde(flatten)]
    pub request: AidRequest,
    pub urgency_tier: UrgencyTier,
    pub confidence_percent: u8,
    pub auto_distribution_eligible: bool,
    pub is_distributing: bool,
    pub is_pending: bool,
}

impl AidRequestView {
    pub fn new(request: AidRequest, distribution: &DistributionState) -> Self {
        Self {
            urgency_tier: request.urgency_tier(),
            confidence_percent: request.ai_prediction.confidence_percent(),
            auto_distribution_eligible: request.is_auto_distribution_eligible(),
            is_distributing: distribution.is_distributing_request(&request.id),
            is_pending: distribution.pending.is_pending(&request.id),
            request,
        }
    }
}

pub(crate) async fn aid_request_views(state: &AppState) -> Result<Vec<AidRequestView>, ApiError> {
    let requests = state.read_models.aid_requests().await?;
    let distribution = state.distribution.state();
    Ok(requests
        .into_iter()
        .map(|r| AidRequestView::new(r, &distribution))
        .collect())
}

/// GET /api/aid-requests
pub async fn list_aid_requests(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let views = aid_request_views(&state).await?;
    Ok(HttpResponse::Ok().json(views))
}

/// POST /api/aid-requests/:id/distribute
/// Disburse the request's required amount
pub async fn distribute_aid(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let request_id = path.into_inner();
    state.connection.require_connected("distribute aid")?;

    let request = state
        .read_models
        .aid_request(&request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("aid request {}", request_id)))?;

    if state.distribution.state().is_busy(&request_id) {
        return Err(LifecycleError::AlreadyInFlight(format!("Aid request {}", request_id)).into());
    }

    let amount = request.required_amount;
    info!(request_id = %request_id, amount = %amount, "Received distribution request");

    let distribution = state.distribution.clone();
    let id = request_id.clone();
    tokio::spawn(async move {
        if let Err(err) = distribution.distribute_aid(&id, amount).await {
            debug!(request_id = %id, error = %err, "Distribution task finished with error");
        }
    });

    Ok(HttpResponse::Accepted().json(serde_json::json!({
        "status": "submitted",
        "requestId": request_id,
        "amount": amount
    })))
}

/// GET /api/distribution
pub async fn get_distribution_state(
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    Ok(HttpResponse::Ok().json(state.distribution.state()))
}

/// DELETE /api/distribution/error
pub async fn clear_distribution_error(
    state: web::Data<AppState>,
) -> Result<impl Responder, ApiError> {
    state.distribution.clear_error();
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AiAssessment, AidStatus};
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[test]
    fn test_view_flags_follow_distribution_state() {
        let request = AidRequest {
            id: "2".to_string(),
            location: "Pazarcık, Kahramanmaraş".to_string(),
            urgency_level: 8,
            description: "Food and water supplies for earthquake victims".to_string(),
            required_amount: Decimal::new(75, 1),
            status: AidStatus::Approved,
            timestamp: Utc::now(),
            ai_prediction: AiAssessment {
                confidence: 0.85,
                recommendation: "Distribution advised within 24 hours".to_string(),
                risk_factors: vec!["Infrastructure damage".to_string()],
            },
        };
        let mut distribution = DistributionState::default();
        distribution.distributing.insert("2".to_string(), true);

        let view = AidRequestView::new(request, &distribution);

        assert_eq!(view.urgency_tier, UrgencyTier::High);
        assert_eq!(view.confidence_percent, 85);
        assert!(view.auto_distribution_eligible);
        assert!(view.is_distributing);
        assert!(!view.is_pending);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["urgencyTier"], "high");
        assert_eq!(json["location"], "Pazarcık, Kahramanmaraş");
    }
}
