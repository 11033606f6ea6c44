use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Maps every component error into the `{"error": "<message>"}` body and
/// status code spec.md §7 requires.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Payments(#[from] tokenscan_payments::PaymentsError),
    #[error(transparent)]
    Wallet(#[from] tokenscan_wallets::WalletError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Wallet(tokenscan_wallets::WalletError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Wallet(_) | ApiError::Payments(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorBody { error: self.to_string() };

        if status == StatusCode::UNAUTHORIZED {
            return (
                status,
                [("WWW-Authenticate", "Basic realm=storjscan")],
                axum::Json(body),
            )
                .into_response();
        }

        (status, axum::Json(body)).into_response()
    }
}
