// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! The map surface the dispatcher draws on, plus an in-memory recorder
//! used by the CLI and tests.

use crate::geometry::Bounds;
use geoprompt_nlp::Coordinates;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

pub const LOCATIONS_SOURCE: &str = "locations";
pub const ROUTE_SOURCE: &str = "route";
pub const REGION_SOURCE: &str = "region";

#[derive(Error, Debug, PartialEq)]
pub enum MapError {
    #[error("Unknown source '{0}'")]
    UnknownSource(String),
    #[error("Unknown layer '{0}'")]
    UnknownLayer(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Circle,
    Line,
    Fill,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub source: String,
    pub paint: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
}

impl LayerSpec {
    pub fn new(id: &str, kind: LayerKind, source: &str, paint: Value) -> Self {
        Self {
            id: id.to_string(),
            kind,
            source: source.to_string(),
            paint,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Resolves once the map has finished loading.
#[derive(Debug, Clone)]
pub struct LoadSignal(watch::Receiver<bool>);

impl LoadSignal {
    pub fn is_loaded(&self) -> bool {
        *self.0.borrow()
    }

    /// `false` when the map did not load within `timeout` or the notifier
    /// went away first.
    pub async fn wait(mut self, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, self.0.wait_for(|loaded| *loaded)).await {
            Ok(Ok(_)) => true,
            Ok(Err(_)) | Err(_) => false,
        }
    }
}

#[derive(Debug)]
pub struct LoadNotifier(watch::Sender<bool>);

impl LoadNotifier {
    pub fn new(loaded: bool) -> Self {
        Self(watch::Sender::new(loaded))
    }

    pub fn signal(&self) -> LoadSignal {
        LoadSignal(self.0.subscribe())
    }

    pub fn mark_loaded(&self) {
        self.0.send_replace(true);
    }
}

pub trait MapHandle {
    fn ready(&self) -> LoadSignal;
    fn has_source(&self, id: &str) -> bool;
    fn add_source(&mut self, id: &str, data: Value);
    fn set_data(&mut self, id: &str, data: Value) -> Result<(), MapError>;
    fn has_layer(&self, id: &str) -> bool;
    fn add_layer(&mut self, layer: LayerSpec);
    fn set_paint_property(&mut self, layer: &str, property: &str, value: Value)
        -> Result<(), MapError>;
    fn fit_bounds(&mut self, bounds: Bounds, padding: u32);
}

pub fn empty_collection() -> Value {
    json!({"type": "FeatureCollection", "features": []})
}

pub fn feature_collection(features: Vec<Value>) -> Value {
    json!({"type": "FeatureCollection", "features": features})
}

pub fn point_feature(coords: Coordinates, properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": coords},
        "properties": properties,
    })
}

pub fn line_feature(coords: &[Coordinates], properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {"type": "LineString", "coordinates": coords},
        "properties": properties,
    })
}

pub fn polygon_feature(ring: &[Coordinates], properties: Value) -> Value {
    json!({
        "type": "Feature",
        "geometry": {"type": "Polygon", "coordinates": [ring]},
        "properties": properties,
    })
}

/// Records every draw call. Serializes to a style-like JSON document.
#[derive(Debug)]
pub struct SceneRecorder {
    notifier: LoadNotifier,
    sources: BTreeMap<String, Value>,
    layers: Vec<LayerSpec>,
    bounds: Option<(Bounds, u32)>,
}

impl SceneRecorder {
    /// A map that is already loaded.
    pub fn new() -> Self {
        Self::with_notifier(LoadNotifier::new(true))
    }

    /// A map that reports ready only after `mark_loaded`.
    pub fn new_pending() -> Self {
        Self::with_notifier(LoadNotifier::new(false))
    }

    fn with_notifier(notifier: LoadNotifier) -> Self {
        Self {
            notifier,
            sources: BTreeMap::new(),
            layers: Vec::new(),
            bounds: None,
        }
    }

    pub fn mark_loaded(&self) {
        self.notifier.mark_loaded();
    }

    pub fn source(&self, id: &str) -> Option<&Value> {
        self.sources.get(id)
    }

    /// Features of a source, empty when the source is missing.
    pub fn features(&self, id: &str) -> Vec<Value> {
        self.sources
            .get(id)
            .and_then(|s| s.get("features"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds.map(|(b, _)| b)
    }

    /// Drops a source and the layers drawing from it, as a map style reload
    /// would.
    pub fn remove_source(&mut self, id: &str) {
        self.sources.remove(id);
        self.layers.retain(|l| l.source != id);
    }

    pub fn to_json(&self) -> Value {
        json!({
            "sources": self.sources,
            "layers": self.layers,
            "bounds": self.bounds.map(|(b, padding)| json!({
                "sw": b.min,
                "ne": b.max,
                "padding": padding,
            })),
        })
    }
}

impl Default for SceneRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MapHandle for SceneRecorder {
    fn ready(&self) -> LoadSignal {
        self.notifier.signal()
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn add_source(&mut self, id: &str, data: Value) {
        self.sources.insert(id.to_string(), data);
    }

    fn set_data(&mut self, id: &str, data: Value) -> Result<(), MapError> {
        let slot = self
            .sources
            .get_mut(id)
            .ok_or_else(|| MapError::UnknownSource(id.to_string()))?;
        *slot = data;
        Ok(())
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layer(id).is_some()
    }

    fn add_layer(&mut self, layer: LayerSpec) {
        self.layers.retain(|l| l.id != layer.id);
        self.layers.push(layer);
    }

    fn set_paint_property(
        &mut self,
        layer: &str,
        property: &str,
        value: Value,
    ) -> Result<(), MapError> {
        let spec = self
            .layers
            .iter_mut()
            .find(|l| l.id == layer)
            .ok_or_else(|| MapError::UnknownLayer(layer.to_string()))?;
        match spec.paint.as_object_mut() {
            Some(paint) => {
                paint.insert(property.to_string(), value);
            }
            None => {
                let mut paint = Map::new();
                paint.insert(property.to_string(), value);
                spec.paint = Value::Object(paint);
            }
        }
        Ok(())
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding: u32) {
        self.bounds = Some((bounds, padding));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pending_map_resolves_after_load() {
        let map = SceneRecorder::new_pending();
        let signal = map.ready();
        assert!(!signal.is_loaded());
        assert!(!signal.clone().wait(Duration::from_millis(10)).await);
        map.mark_loaded();
        assert!(signal.wait(Duration::from_millis(10)).await);
    }

    #[test]
    fn test_set_data_requires_source() {
        let mut map = SceneRecorder::new();
        assert_eq!(
            map.set_data(ROUTE_SOURCE, empty_collection()),
            Err(MapError::UnknownSource("route".into()))
        );
        map.add_source(ROUTE_SOURCE, empty_collection());
        map.add_layer(LayerSpec::new(
            "route-line",
            LayerKind::Line,
            ROUTE_SOURCE,
            json!({}),
        ));
        map.set_paint_property("route-line", "line-width", json!(3)).unwrap();
        assert_eq!(map.layer("route-line").unwrap().paint["line-width"], 3);

        map.remove_source(ROUTE_SOURCE);
        assert!(!map.has_source(ROUTE_SOURCE));
        assert!(!map.has_layer("route-line"));
    }
}
