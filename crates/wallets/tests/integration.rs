//! DB-backed tests for the wallet pool (component D) against an ephemeral
//! Postgres container; see `tokenscan-testutil::migrated_pool`.

use tokenscan_wallets::keygen::derive_addresses;
use tokenscan_wallets::{NewWallet, WalletError, WalletPool};

const TEST_MNEMONIC: &str = "leader pause fashion picnic green elder rebuild health valley alert cactus latin skull antique arrest skirt health chaos student will north garbage wagon before";

/// The literal "generate and claim" scenario: derive the first 5 BIP-44
/// addresses from the documented mnemonic, bulk-insert under `"eu1"`, claim
/// 5 times (each a distinct address in insertion order), and fail the 6th.
#[tokio::test]
async fn generate_and_claim_scenario() {
    let (_container, pool) = tokenscan_testutil::migrated_pool().await;
    let wallets = WalletPool::new(pool);

    let derived = derive_addresses(TEST_MNEMONIC, 5).unwrap();
    let new_wallets: Vec<NewWallet> =
        derived.iter().map(|w| NewWallet { address: w.address, info: Some(w.path.clone()) }).collect();

    let inserted = wallets.insert_batch("eu1", &new_wallets).await.unwrap();
    assert_eq!(inserted, 5);

    let mut claimed = Vec::new();
    for _ in 0..5 {
        let claim = wallets.claim("eu1").await.unwrap();
        claimed.push(claim.address);
    }

    let expected: Vec<_> = derived.iter().map(|w| w.address).collect();
    assert_eq!(claimed, expected, "claims must come out in insertion (id) order");

    let sixth = wallets.claim("eu1").await;
    assert!(matches!(sixth, Err(WalletError::NoAvailableWallets)));
}

/// Claim uniqueness: under `k` concurrent callers against a pool of `n`
/// wallets, exactly `min(k, n)` succeed with distinct addresses and the
/// rest fail with `ErrNoAvailableWallets`.
#[tokio::test]
async fn claim_uniqueness_under_concurrency() {
    let (_container, pool) = tokenscan_testutil::migrated_pool().await;
    let wallets = WalletPool::new(pool);

    let n = 5;
    let k = 8;
    let new_wallets: Vec<NewWallet> = (0..n)
        .map(|i| NewWallet {
            address: alloy::primitives::Address::repeat_byte(i as u8 + 1),
            info: None,
        })
        .collect();
    wallets.insert_batch("eu1", &new_wallets).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..k {
        let wallets = wallets.clone();
        handles.push(tokio::spawn(async move { wallets.claim("eu1").await }));
    }

    let mut successes = Vec::new();
    let mut failures = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(wallet) => successes.push(wallet.address),
            Err(WalletError::NoAvailableWallets) => failures += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes.len(), n);
    assert_eq!(failures, k - n);
    let mut distinct = successes.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), n, "every successful claim got a distinct address");
}
