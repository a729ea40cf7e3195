//! Tests for utility modules (cache, timeout).

use std::time::Duration;

use lyric::error::LyricError;
use lyric::util::cache::ResponseCache;
use lyric::util::timeout::with_timeout;
use serde_json::json;

#[tokio::test(start_paused = true)]
async fn with_timeout_reports_elapsed_budget() {
    let result = with_timeout(Duration::from_millis(250), async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok::<_, LyricError>(())
    })
    .await;

    assert!(matches!(result, Err(LyricError::Timeout(250))));
}

#[test]
fn response_cache_clear_drops_everything() {
    let cache = ResponseCache::new(8, Duration::from_secs(60));
    cache.insert("locations".to_string(), json!([{"locationID": 1}]));
    cache.insert("devices".to_string(), json!([]));
    assert_eq!(cache.len(), 2);

    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.get("locations"), None);
}

#[test]
fn response_cache_never_drops_below_one_entry() {
    let cache = ResponseCache::new(0, Duration::from_secs(60));
    cache.insert("a".to_string(), json!(1));
    assert_eq!(cache.get("a"), Some(json!(1)));
}
