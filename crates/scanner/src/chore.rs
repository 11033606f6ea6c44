use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use async_trait::async_trait;
use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument};

use crate::{Scanner, ScannerError};

/// Supplies the set of addresses the refresh chore should scan for:
/// every claimed deposit wallet, across all satellites.
#[async_trait]
pub trait AddressSource: Send + Sync {
    async fn addresses(&self) -> Result<Vec<Address>, ScannerError>;
}

/// Drives [`Scanner::run_refresh_pass`] on a fixed cadence until `shutdown`
/// fires. A failed pass does not advance anything; the next tick retries.
/// A panic inside a pass is caught so the chore keeps running.
pub async fn run_refresh_chore(
    scanner: Arc<Scanner>,
    addresses: Arc<dyn AddressSource>,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.cancelled() => {
                info!("scan chore shutting down");
                return;
            }
        }

        if let Err(err) = run_pass(&scanner, addresses.as_ref()).await {
            error!(error = %err, "scan pass failed, retrying next tick");
        }
    }
}

#[instrument(skip_all)]
async fn run_pass(scanner: &Scanner, addresses: &dyn AddressSource) -> Result<(), ScannerError> {
    let wallets = addresses.addresses().await?;

    match AssertUnwindSafe(scanner.run_refresh_pass(&wallets)).catch_unwind().await {
        Ok(result) => {
            result?;
            Ok(())
        }
        Err(_) => Err(ScannerError::PassPanicked),
    }
}
