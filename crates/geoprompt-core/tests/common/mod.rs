#![allow(dead_code)]

use async_trait::async_trait;
use geoprompt_core::classifier::{ClassifierError, LlmBackend};
use geoprompt_core::directions::{DirectionsError, DirectionsProvider, RouteGeometry};
use geoprompt_core::geocoder::{GeocodeError, GeocodeProvider};
use geoprompt_nlp::{Coordinates, TravelMode};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn init_logging() {
    let _ = simplelog::TestLogger::init(log::LevelFilter::Debug, simplelog::Config::default());
}

/// Answers from a fixed table and counts every call.
#[derive(Default)]
pub struct StaticGeocoder {
    places: HashMap<String, Coordinates>,
    calls: AtomicUsize,
}

impl StaticGeocoder {
    pub fn with(entries: &[(&str, Coordinates)]) -> Arc<Self> {
        Arc::new(Self {
            places: entries
                .iter()
                .map(|(name, c)| (name.to_lowercase(), *c))
                .collect(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodeProvider for StaticGeocoder {
    async fn forward(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.places.get(&query.to_lowercase()).copied())
    }
}

/// Replies with canned text, optionally after a delay.
pub struct ScriptedLlm {
    reply: String,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            delay: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn slow(reply: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmBackend for ScriptedLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.reply.clone())
    }
}

/// Every request fails.
#[derive(Default)]
pub struct FailingDirections {
    calls: AtomicUsize,
}

impl FailingDirections {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectionsProvider for FailingDirections {
    async fn route(
        &self,
        _waypoints: &[Coordinates],
        _mode: TravelMode,
    ) -> Result<RouteGeometry, DirectionsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(DirectionsError::Status(503))
    }
}

/// Returns a three-point path through the midpoint.
#[derive(Default)]
pub struct MidpointDirections;

#[async_trait]
impl DirectionsProvider for MidpointDirections {
    async fn route(
        &self,
        waypoints: &[Coordinates],
        _mode: TravelMode,
    ) -> Result<RouteGeometry, DirectionsError> {
        let (a, b) = (waypoints[0], waypoints[waypoints.len() - 1]);
        Ok(RouteGeometry {
            coordinates: vec![a, [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0 + 0.1], b],
            distance_m: 100_000.0,
            duration_s: 3600.0,
        })
    }
}
