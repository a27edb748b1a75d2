use actix_web::{web, HttpResponse, Result};
use crate::api_error::ApiError;
use crate::http::AppState;

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let wallet = if state.wallet.is_present() { "present" } else { "absent" };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "wallet": wallet,
        "connected": state.connection.session().is_connected
    })))
}
