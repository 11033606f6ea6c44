//! Authenticated REST surface (component H): adapts the Wallet pool and
//! Payments service over HTTP Basic auth, plus liveness/readiness probes.

mod auth;
mod dto;
mod error;
mod routes;
mod state;

pub use auth::Satellite;
pub use error::ApiError;
pub use state::AppState;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the full router: `/api/v0/*` handlers plus the unauthenticated
/// `/health/*` probes, wrapped in request tracing.
pub fn app(state: AppState) -> Router {
    routes::router(state).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokenscan_chain::test_client::TestChainClient;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let pool = sqlx::PgPool::connect_lazy("postgres://unused/unused").unwrap();
        let client: Arc<dyn tokenscan_chain::ChainClient> = Arc::new(TestChainClient::new(1337));
        let mut clients = HashMap::new();
        clients.insert(1337u64, client);

        let payments = tokenscan_payments::PaymentsService::new(
            tokenscan_events::EventCache::new(pool.clone()),
            tokenscan_headers::HeaderCache::new(pool.clone()),
            tokenscan_prices::PriceOracle::new(
                pool.clone(),
                Arc::new(tokenscan_prices::TestPriceSource),
                std::time::Duration::from_secs(60),
            ),
            tokenscan_wallets::WalletPool::new(pool.clone()),
            clients,
        );

        let mut keys = HashMap::new();
        keys.insert("eu1".to_string(), "s3cret".to_string());

        AppState::new(payments, tokenscan_wallets::WalletPool::new(pool.clone()), pool, keys)
    }

    #[tokio::test]
    async fn whoami_without_auth_is_unauthorized() {
        let app = app(test_state());
        let response = app
            .oneshot(Request::builder().uri("/api/v0/auth/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get("WWW-Authenticate").unwrap(),
            "Basic realm=storjscan"
        );
    }

    #[tokio::test]
    async fn health_live_needs_no_auth() {
        let app = app(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
