use std::collections::HashMap;

use alloy::primitives::Address;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::auth::Satellite;
use crate::dto::{InsertedResponse, NewWalletDto, PaymentDto, PaymentsResponse, WhoamiResponse};
use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v0/auth/whoami", get(whoami))
        .route("/api/v0/tokens/payments/{address}", get(payments_for_address))
        .route("/api/v0/tokens/payments", get(all_payments))
        .route("/api/v0/wallets/claim", post(claim_wallet))
        .route("/api/v0/wallets/", post(insert_wallets))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .with_state(state)
}

async fn whoami(satellite: Satellite) -> Json<WhoamiResponse> {
    Json(WhoamiResponse { id: satellite.0 })
}

fn parse_from_by_chain(query: &HashMap<String, String>) -> Result<HashMap<u64, u64>, ApiError> {
    query
        .iter()
        .map(|(chain, from)| {
            let chain_id: u64 = chain
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("invalid chain id {chain:?}")))?;
            let from_block: u64 = from
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("invalid fromBlock {from:?}")))?;
            Ok((chain_id, from_block))
        })
        .collect()
}

async fn payments_for_address(
    State(state): State<AppState>,
    _satellite: Satellite,
    Path(address): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<Vec<PaymentDto>>, ApiError> {
    let address: Address =
        address.parse().map_err(|_| ApiError::BadRequest(format!("invalid address {address:?}")))?;
    let from_by_chain = parse_from_by_chain(&query)?;

    let result = state.payments.payments(address, &from_by_chain).await?;
    Ok(Json(result.payments.iter().map(Into::into).collect()))
}

async fn all_payments(
    State(state): State<AppState>,
    satellite: Satellite,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<PaymentsResponse>, ApiError> {
    let from_by_chain = parse_from_by_chain(&query)?;
    let result = state.payments.all_payments(&satellite.0, &from_by_chain).await?;
    Ok(Json((&result).into()))
}

async fn claim_wallet(
    State(state): State<AppState>,
    satellite: Satellite,
) -> Result<Json<String>, ApiError> {
    let wallet = state.wallets.claim(&satellite.0).await?;
    Ok(Json(wallet.address.to_string()))
}

async fn insert_wallets(
    State(state): State<AppState>,
    satellite: Satellite,
    Json(wallets): Json<Vec<NewWalletDto>>,
) -> Result<Json<InsertedResponse>, ApiError> {
    let parsed: Vec<tokenscan_wallets::NewWallet> = wallets
        .into_iter()
        .map(|w| {
            let address: Address = w
                .address
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("invalid address {:?}", w.address)))?;
            Ok(tokenscan_wallets::NewWallet { address, info: w.info })
        })
        .collect::<Result<_, ApiError>>()?;

    let inserted = state.wallets.insert_batch(&satellite.0, &parsed).await?;
    Ok(Json(InsertedResponse { inserted }))
}

async fn health_live() -> &'static str {
    "ok"
}

async fn health_ready(State(state): State<AppState>) -> Result<String, (axum::http::StatusCode, String)> {
    let db_ok = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();
    if !db_ok {
        return Err((axum::http::StatusCode::SERVICE_UNAVAILABLE, "database: unreachable\n".to_string()));
    }

    let ping = state.payments.ping().await;
    let mut report = String::from("database: ok\n");
    if ping.is_healthy() {
        report.push_str("chains: ok\n");
    } else {
        for (chain_id, message) in &ping.failures {
            report.push_str(&format!("chain {chain_id}: {message}\n"));
        }
    }

    Ok(report)
}
