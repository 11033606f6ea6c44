use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;
use tokenscan_payments::PaymentsService;
use tokenscan_wallets::WalletPool;

/// Shared state reachable from every handler.
#[derive(Clone)]
pub struct AppState {
    pub payments: PaymentsService,
    pub wallets: WalletPool,
    pub db: PgPool,
    /// `satellite -> secret`, built from `API.Keys` at startup.
    pub api_keys: Arc<HashMap<String, String>>,
}

impl AppState {
    pub fn new(
        payments: PaymentsService,
        wallets: WalletPool,
        db: PgPool,
        api_keys: HashMap<String, String>,
    ) -> Self {
        Self { payments, wallets, db, api_keys: Arc::new(api_keys) }
    }

    /// Parses `API.Keys` entries of the form `"satellite:secret"`.
    pub fn parse_keys(raw: &[String]) -> HashMap<String, String> {
        raw.iter()
            .filter_map(|entry| entry.split_once(':'))
            .map(|(satellite, secret)| (satellite.to_string(), secret.to_string()))
            .collect()
    }
}
