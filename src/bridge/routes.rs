use super::Backend;
use crate::config::BridgeMode;
use crate::context;
use crate::network::CHOICE_COUNT;
use crate::session::{BallotTally, ContractAddress};
use crate::{logging, BallotError};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

#[derive(Debug, Clone)]
pub struct AppState {
    pub backend: Backend,
    pub timeout: Duration,
    pub network_id: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .route("/api/deploy", post(deploy))
        .route("/api/contract/:address/state", get(contract_state))
        .route("/api/contract/:address/vote", post(vote))
        .with_state(state)
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub mode: BridgeMode,
    pub network_id: String,
    pub version: String,
    pub commit: String,
    pub build_date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeployRequest {
    pub choices: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeployResponse {
    pub contract_address: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteRequest {
    pub choice: i64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub success: bool,
    pub tx_id: String,
}

/// Error body: `{ "error": "<message>" }`.
#[derive(Debug)]
pub struct ApiError(pub BallotError);

impl From<BallotError> for ApiError {
    fn from(err: BallotError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let message = self.0.to_string();
        if status.is_server_error() {
            error!(error = %message, "Bridge request failed");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    logging::log_bridge_request("GET", "/api/status");
    Json(StatusResponse {
        status: "ok".to_string(),
        mode: state.backend.mode(),
        network_id: state.network_id.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_date: option_env!("BUILD_DATE").unwrap_or("0").to_string(),
    })
}

async fn deploy(
    State(state): State<AppState>,
    Json(request): Json<DeployRequest>,
) -> Result<Json<DeployResponse>, ApiError> {
    logging::log_bridge_request("POST", "/api/deploy");
    if request.choices.len() != CHOICE_COUNT {
        return Err(BallotError::Validation(format!(
            "exactly {} choices are required, got {}",
            CHOICE_COUNT,
            request.choices.len()
        ))
        .into());
    }
    let address = state.backend.deploy(request.choices, state.timeout).await?;
    Ok(Json(DeployResponse {
        contract_address: address.to_string(),
    }))
}

async fn contract_state(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BallotTally>, ApiError> {
    logging::log_bridge_request("GET", "/api/contract/:address/state");
    let address = ContractAddress::parse(&address)?;
    Ok(Json(state.backend.state(address, state.timeout).await?))
}

async fn vote(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, ApiError> {
    logging::log_bridge_request("POST", "/api/contract/:address/vote");
    let address = ContractAddress::parse(&address)?;
    context::parse_choice(&request.choice.to_string())?;
    let tx_id = state
        .backend
        .vote(address, request.choice, state.timeout)
        .await?;
    Ok(Json(VoteResponse {
        success: true,
        tx_id,
    }))
}
