mod common;

use common::StaticGeocoder;
use geoprompt_core::Geocoder;
use std::time::Duration;

const BAYONNE: [f64; 2] = [-1.4748, 43.4929];

#[tokio::test]
async fn test_repeat_lookups_hit_remote_once() {
    let remote = StaticGeocoder::with(&[("Bayonne", BAYONNE)]);
    let geocoder = Geocoder::new(16).with_provider(remote.clone(), Duration::from_secs(1));

    let first = geocoder.geocode("Bayonne").await;
    let second = geocoder.geocode("  bayonne ").await;
    let third = geocoder.geocode("BAYONNE").await;
    assert_eq!(first, Some(BAYONNE));
    assert_eq!(second, first);
    assert_eq!(third, first);
    assert_eq!(remote.calls(), 1);
}

#[tokio::test]
async fn test_gazetteer_names_skip_remote() {
    let remote = StaticGeocoder::with(&[]);
    let geocoder = Geocoder::new(16).with_provider(remote.clone(), Duration::from_secs(1));

    assert_eq!(geocoder.geocode("London").await, Some([-0.1278, 51.5074]));
    assert_eq!(geocoder.geocode("NYC").await, Some([-74.0060, 40.7128]));
    assert_eq!(remote.calls(), 0);
}

#[tokio::test]
async fn test_remote_miss_falls_back_to_fuzzy_prefix() {
    let remote = StaticGeocoder::with(&[]);
    let geocoder = Geocoder::new(16).with_provider(remote.clone(), Duration::from_secs(1));

    assert_eq!(geocoder.geocode("Barcelonna").await, Some([2.1686, 41.3874]));
    assert_eq!(remote.calls(), 1);
    assert_eq!(geocoder.geocode("barcelonna").await, Some([2.1686, 41.3874]));
    assert_eq!(remote.calls(), 1);
}

#[tokio::test]
async fn test_misses_are_not_cached() {
    let remote = StaticGeocoder::with(&[]);
    let geocoder = Geocoder::new(16).with_provider(remote.clone(), Duration::from_secs(1));

    assert_eq!(geocoder.geocode("Qwxyzzy").await, None);
    assert_eq!(geocoder.geocode("Qwxyzzy").await, None);
    assert_eq!(remote.calls(), 2);
    assert_eq!(geocoder.cache_len(), 0);
}

#[tokio::test]
async fn test_cache_is_bounded() {
    let geocoder = Geocoder::new(2);
    for name in ["Paris", "London", "Berlin", "Madrid"] {
        assert!(geocoder.geocode(name).await.is_some());
    }
    assert_eq!(geocoder.cache_len(), 2);
    assert!(geocoder.cached("Madrid").is_some());
    assert!(geocoder.cached("Paris").is_none());
}
