// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::CoreError;
use async_trait::async_trait;
use geoprompt_nlp::gazetteer::{Gazetteer, Place};
use geoprompt_nlp::Coordinates;
use lru::LruCache;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const MAPBOX_API_BASE: &str = "https://api.mapbox.com";
pub const DEFAULT_CACHE_CAPACITY: usize = 512;

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoding service returned HTTP {0}")]
    Status(u16),
    #[error("invalid geocoding URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Remote forward geocoding. `Ok(None)` means the service answered but
/// knows no such place.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn forward(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Mapbox `geocoding/v5/mapbox.places` client.
#[derive(Clone)]
pub struct MapboxGeocoder {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl MapboxGeocoder {
    pub fn new(token: impl Into<String>, timeout: Duration) -> Result<Self, CoreError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(CoreError::MissingCredential("Mapbox access token"));
        }
        Ok(Self {
            client: crate::http_client(timeout)?,
            token,
            base_url: MAPBOX_API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_url(&self, query: &str) -> Result<Url, GeocodeError> {
        let mut url = Url::parse(&self.base_url)?;
        let file = format!("{}.json", query);
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["geocoding", "v5", "mapbox.places", file.as_str()]);
        url.query_pairs_mut()
            .append_pair("access_token", &self.token)
            .append_pair("limit", "1");
        Ok(url)
    }
}

#[async_trait]
impl GeocodeProvider for MapboxGeocoder {
    async fn forward(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let url = self.request_url(query)?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }
        let body: Value = response.json().await?;
        Ok(parse_geocode_response(&body))
    }
}

/// Accepts `{"coordinates": [lon, lat]}` as well as the Mapbox
/// `features[0].center` shape.
pub fn parse_geocode_response(body: &Value) -> Option<Coordinates> {
    let pair = |v: &Value| -> Option<Coordinates> {
        let arr = v.as_array()?;
        if arr.len() < 2 {
            return None;
        }
        let lon = arr[0].as_f64()?;
        let lat = arr[1].as_f64()?;
        ((-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)).then_some([lon, lat])
    };
    body.get("coordinates")
        .and_then(pair)
        .or_else(|| body.pointer("/features/0/center").and_then(pair))
}

/// Cache key: lower-cased with whitespace collapsed.
pub fn cache_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Resolves place names through a bounded cache, the gazetteer and an
/// optional remote provider.
pub struct Geocoder {
    cache: Mutex<LruCache<String, Coordinates>>,
    provider: Option<Arc<dyn GeocodeProvider>>,
    gazetteer: &'static Gazetteer,
    timeout: Duration,
}

impl Geocoder {
    /// Offline geocoder: cache and gazetteer only.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            provider: None,
            gazetteer: Gazetteer::global(),
            timeout: Duration::from_secs(4),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn GeocodeProvider>, timeout: Duration) -> Self {
        self.provider = Some(provider);
        self.timeout = timeout;
        self
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Cache, exact gazetteer, single-word gazetteer, remote, then a fuzzy
    /// gazetteer prefix. Every hit is cached under the normalized name.
    pub async fn geocode(&self, name: &str) -> Option<Coordinates> {
        let key = cache_key(name);
        if key.is_empty() {
            return None;
        }
        if let Some(coords) = self.cached(&key) {
            log::debug!("[Geocoder] Cache hit for '{}'", key);
            return Some(coords);
        }

        let resolved = match self.local_lookup(&key) {
            Some(place) => Some(place.coordinates()),
            None => match self.remote_lookup(name.trim()).await {
                Some(coords) => Some(coords),
                None => self.gazetteer.fuzzy_prefix(&key).map(|p| {
                    log::debug!("[Geocoder] Fuzzy match '{}' -> {}", key, p.name);
                    p.coordinates()
                }),
            },
        };

        match resolved {
            Some(coords) => {
                self.lock_cache().put(key, coords);
                Some(coords)
            }
            None => {
                log::info!("[Geocoder] No coordinates for '{}'", name.trim());
                None
            }
        }
    }

    pub fn cached(&self, name: &str) -> Option<Coordinates> {
        self.lock_cache().get(&cache_key(name)).copied()
    }

    pub fn cache_len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    /// Gazetteer entry for a name, exact or by single word. Used for the
    /// coastal check on sea legs.
    pub fn place_for(&self, name: &str) -> Option<&'static Place> {
        self.local_lookup(&cache_key(name))
    }

    fn local_lookup(&self, key: &str) -> Option<&'static Place> {
        self.gazetteer
            .lookup(key)
            .or_else(|| self.gazetteer.partial_word(key))
    }

    async fn remote_lookup(&self, name: &str) -> Option<Coordinates> {
        let provider = self.provider.as_ref()?;
        match tokio::time::timeout(self.timeout, provider.forward(name)).await {
            Ok(Ok(coords)) => coords,
            Ok(Err(e)) => {
                log::warn!("[Geocoder] Remote lookup for '{}' failed: {}", name, e);
                None
            }
            Err(_) => {
                log::warn!(
                    "[Geocoder] Remote lookup for '{}' timed out after {:?}",
                    name,
                    self.timeout
                );
                None
            }
        }
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, LruCache<String, Coordinates>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for Geocoder {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_both_response_shapes() {
        assert_eq!(
            parse_geocode_response(&json!({"coordinates": [2.35, 48.85]})),
            Some([2.35, 48.85])
        );
        let mapbox = json!({
            "type": "FeatureCollection",
            "features": [{"place_name": "Lyon, France", "center": [4.8357, 45.764]}]
        });
        assert_eq!(parse_geocode_response(&mapbox), Some([4.8357, 45.764]));
        assert_eq!(parse_geocode_response(&json!({"features": []})), None);
        assert_eq!(
            parse_geocode_response(&json!({"coordinates": [200.0, 10.0]})),
            None
        );
    }

    #[test]
    fn test_cache_key_normalizes() {
        assert_eq!(cache_key("  New   York "), "new york");
    }

    #[test]
    fn test_request_url_encodes_query() {
        let g = MapboxGeocoder::new("tok", Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://localhost:9999/");
        let url = g.request_url("São Paulo").unwrap();
        assert!(url
            .as_str()
            .starts_with("http://localhost:9999/geocoding/v5/mapbox.places/S%C3%A3o%20Paulo.json?"));
        assert!(url.as_str().contains("access_token=tok"));
    }

    #[test]
    fn test_missing_token_is_rejected() {
        assert!(matches!(
            MapboxGeocoder::new(" ", Duration::from_secs(1)),
            Err(CoreError::MissingCredential(_))
        ));
    }

    #[tokio::test]
    async fn test_offline_chain() {
        let g = Geocoder::new(4);
        assert_eq!(g.geocode("Paris").await, Some([2.3522, 48.8566]));
        assert_eq!(g.geocode("downtown Chicago").await, Some([-87.6298, 41.8781]));
        assert_eq!(g.geocode("Barcelonna").await, Some([2.1686, 41.3874]));
        assert_eq!(g.geocode("Qwxyzzy").await, None);
        assert_eq!(g.cache_len(), 3);
    }
}
