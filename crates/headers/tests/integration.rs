//! DB-backed tests for the header cache (component B) against an ephemeral
//! Postgres container; see `tokenscan-testutil::migrated_pool`.

use alloy::primitives::b256;
use chrono::{Duration, Utc};
use tokenscan_chain::test_client::TestChainClient;
use tokenscan_chain::Header;
use tokenscan_headers::HeaderCache;

/// `Get(chainId, hash)` against an empty cache with a live chain returns
/// the same `(number, timestamp)` as the chain and persists it; a
/// subsequent call returns without an RPC.
#[tokio::test]
async fn header_read_through() {
    let (_container, pool) = tokenscan_testutil::migrated_pool().await;
    let cache = HeaderCache::new(pool);
    let client = TestChainClient::new(1337);

    let header =
        Header { chain_id: 1337, hash: b256!("333333333333333333333333333333333333333333333333333333333333333c"), number: 42, timestamp: 1_700_000_000 };
    client.push_header(header);

    let fetched = cache.get(&client, header.hash).await.unwrap();
    assert_eq!(fetched.number, header.number);
    assert_eq!(fetched.timestamp, header.timestamp);
    assert_eq!(client.header_by_hash_calls(), 1);

    let second = cache.get(&client, header.hash).await.unwrap();
    assert_eq!(second.number, header.number);
    assert_eq!(client.header_by_hash_calls(), 1, "cache hit must not re-fetch from the chain");
}

/// After `HeaderCleanup` with `RetainDays = 30`, every row with
/// `timestamp < now - 30d` is absent; all others are present.
#[tokio::test]
async fn retention_scenario() {
    let (_container, pool) = tokenscan_testutil::migrated_pool().await;
    let cache = HeaderCache::new(pool);
    let client = TestChainClient::new(1337);

    let now = Utc::now();
    let ages_days = [0i64, 29, 31, 365];
    let hashes = [
        b256!("010101010101010101010101010101010101010101010101010101010101010a"),
        b256!("020202020202020202020202020202020202020202020202020202020202020b"),
        b256!("030303030303030303030303030303030303030303030303030303030303030c"),
        b256!("040404040404040404040404040404040404040404040404040404040404040d"),
    ];

    for (i, (age, hash)) in ages_days.iter().zip(hashes.iter()).enumerate() {
        let timestamp = now - Duration::days(*age);
        let header =
            Header { chain_id: 1337, hash: *hash, number: i as u64, timestamp: timestamp.timestamp() as u64 };
        client.push_header(header);
        cache.get(&client, *hash).await.unwrap();
    }

    let cutoff = now - Duration::days(30);
    cache.delete_before(cutoff).await.unwrap();

    // now and now-29d survive, and stay cache hits (no further RPC calls).
    assert!(cache.get(&client, hashes[0]).await.is_ok());
    assert_eq!(client.header_by_hash_calls(), 4, "surviving rows must still be cache hits");
    assert!(cache.get(&client, hashes[1]).await.is_ok());
    assert_eq!(client.header_by_hash_calls(), 4);

    // now-31d and now-365d were pruned. A chain client that never saw
    // these headers (matching the scenario's "ErrNoHeader on lookup")
    // surfaces the underlying ChainError once the cache misses.
    let empty_client = TestChainClient::new(1337);
    assert!(cache.get(&empty_client, hashes[2]).await.is_err());
    assert!(cache.get(&empty_client, hashes[3]).await.is_err());
}
