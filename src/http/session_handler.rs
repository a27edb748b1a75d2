use crate::api_error::ApiError;
use crate::http::AppState;
use crate::models::WalletSessionResponse;
use crate::service::ConnectOutcome;
use actix_web::{web, HttpResponse, Responder};
use tracing::info;

/// GET /api/session
pub async fn get_session(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    let session = WalletSessionResponse::from(state.connection.session());
    Ok(HttpResponse::Ok().json(session))
}

/// POST /api/session/connect
/// Connect the wallet and switch it to the designated network.
/// A connect already in progress answers 202 with the current session.
pub async fn connect(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    info!("Received connect request");

    let outcome = state.connection.connect().await?;
    let session = WalletSessionResponse::from(state.connection.session());

    Ok(match outcome {
        ConnectOutcome::InProgress => HttpResponse::Accepted().json(session),
        ConnectOutcome::Connected(_) | ConnectOutcome::AlreadyConnected(_) => {
            HttpResponse::Ok().json(session)
        }
    })
}

/// POST /api/session/disconnect
pub async fn disconnect(state: web::Data<AppState>) -> Result<impl Responder, ApiError> {
    state.connection.disconnect();
    let session = WalletSessionResponse::from(state.connection.session());
    Ok(HttpResponse::Ok().json(session))
}
