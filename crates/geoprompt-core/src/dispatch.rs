// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::directions::{DirectionsError, DirectionsProvider, RouteGeometry};
use crate::geocoder::Geocoder;
use crate::geometry::{self, Bounds};
use crate::map::{
    empty_collection, feature_collection, line_feature, point_feature, polygon_feature,
    LayerKind, LayerSpec, MapError, MapHandle, LOCATIONS_SOURCE, REGION_SOURCE, ROUTE_SOURCE,
};
use futures::future::join_all;
use geoprompt_nlp::timeline::sort_chronologically;
use geoprompt_nlp::{
    continent_of, Coordinates, IntentResult, Location, TravelMode, VisualizationType,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const GROUND_COLOR: &str = "#3b82f6";
pub const AIR_COLOR: &str = "#ff69b4";
pub const SEA_COLOR: &str = "#14b8a6";
pub const REGION_COLOR: &str = "#6366f1";
pub const REGION_OPACITY: f64 = 0.15;

/// Legs longer than this are flown or sailed rather than driven.
pub const LONG_HAUL_KM: f64 = 5000.0;
const SEA_PREFERENCES: [&str; 5] = ["sea", "ship", "ferry", "boat", "cruise"];
const FIT_PADDING: u32 = 50;
const SEA_SEGMENTS: usize = 32;

pub const ROUTE_FAILED_MESSAGE: &str =
    "Could not calculate a route between these places; showing them as markers";

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Map did not finish loading within {0:?}")]
    MapNotReady(Duration),
    #[error("No locations found")]
    NoLocations,
    #[error(transparent)]
    Map(#[from] MapError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegMode {
    Ground,
    Air,
    Sea,
}

impl LegMode {
    fn as_str(&self) -> &'static str {
        match self {
            LegMode::Ground => "ground",
            LegMode::Air => "air",
            LegMode::Sea => "sea",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub from: String,
    pub to: String,
    pub mode: LegMode,
    pub distance_km: f64,
    /// Whether the path came from the directions service.
    pub routed: bool,
    #[serde(skip)]
    pub path: Vec<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedLocation {
    pub name: String,
    pub coordinates: Coordinates,
    pub time_context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutcome {
    pub visualization: VisualizationType,
    pub rendered: Vec<RenderedLocation>,
    /// Names that could not be geocoded.
    pub dropped: Vec<String>,
    pub legs: Vec<Leg>,
    pub hull: Option<Vec<Coordinates>>,
    pub total_km: f64,
    pub message: Option<String>,
}

impl RenderOutcome {
    pub fn legs_of(&self, mode: LegMode) -> usize {
        self.legs.iter().filter(|l| l.mode == mode).count()
    }

    /// e.g. "3 stops, 1 air leg, ~5,837 km".
    pub fn summary(&self) -> String {
        let stops = self.rendered.len();
        let mut parts = vec![format!("{} stop{}", stops, plural(stops))];
        for mode in [LegMode::Air, LegMode::Sea] {
            let n = self.legs_of(mode);
            if n > 0 {
                parts.push(format!("{} {} leg{}", n, mode.as_str(), plural(n)));
            }
        }
        if self.total_km > 0.0 {
            parts.push(format!("~{} km", thousands(self.total_km.round() as u64)));
        }
        parts.join(", ")
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Draws an `IntentResult` onto a `MapHandle`.
pub struct VisualizationDispatcher {
    geocoder: Arc<Geocoder>,
    directions: Option<Arc<dyn DirectionsProvider>>,
    directions_timeout: Duration,
    hull_buffer: f64,
    ready_timeout: Duration,
}

impl VisualizationDispatcher {
    pub fn new(geocoder: Arc<Geocoder>) -> Self {
        Self {
            geocoder,
            directions: None,
            directions_timeout: Duration::from_secs(8),
            hull_buffer: 0.5,
            ready_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_directions(mut self, provider: Arc<dyn DirectionsProvider>, timeout: Duration) -> Self {
        self.directions = Some(provider);
        self.directions_timeout = timeout;
        self
    }

    pub fn with_hull_buffer(mut self, degrees: f64) -> Self {
        self.hull_buffer = degrees;
        self
    }

    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    pub fn geocoder(&self) -> &Arc<Geocoder> {
        &self.geocoder
    }

    pub async fn render<M: MapHandle + ?Sized>(
        &self,
        intent: &IntentResult,
        map: &mut M,
    ) -> Result<RenderOutcome, DispatchError> {
        if !map.ready().wait(self.ready_timeout).await {
            return Err(DispatchError::MapNotReady(self.ready_timeout));
        }
        ensure_sources(map);
        for source in [LOCATIONS_SOURCE, ROUTE_SOURCE, REGION_SOURCE] {
            map.set_data(source, empty_collection())?;
        }

        let mut locations = intent.locations.clone();
        if intent.visualization_type == VisualizationType::Timeline {
            sort_chronologically(&mut locations);
        } else if let Some(sequence) = &intent.suggested_sequence {
            locations = order_by_sequence(locations, sequence);
        }

        let resolved = join_all(locations.iter().map(|loc| async move {
            match loc.coordinates {
                Some(coords) => Some(coords),
                None => self.geocoder.geocode(&loc.name).await,
            }
        }))
        .await;

        let mut rendered = Vec::new();
        let mut dropped = Vec::new();
        for (loc, coords) in locations.into_iter().zip(resolved) {
            match coords {
                Some(coordinates) => rendered.push(RenderedLocation {
                    name: loc.name,
                    coordinates,
                    time_context: loc.time_context,
                }),
                None => {
                    log::warn!("[Dispatch] Dropping '{}': no coordinates", loc.name);
                    dropped.push(loc.name);
                }
            }
        }
        if rendered.is_empty() {
            return Err(DispatchError::NoLocations);
        }

        let markers = rendered
            .iter()
            .enumerate()
            .map(|(i, r)| {
                point_feature(
                    r.coordinates,
                    json!({"name": r.name, "order": i + 1, "timeContext": r.time_context}),
                )
            })
            .collect();
        map.set_data(LOCATIONS_SOURCE, feature_collection(markers))?;

        let mut outcome = RenderOutcome {
            visualization: intent.visualization_type,
            rendered,
            dropped,
            legs: Vec::new(),
            hull: None,
            total_km: 0.0,
            message: None,
        };

        if intent.visualization_type.draws_line() && outcome.rendered.len() >= 2 {
            self.draw_legs(intent, &mut outcome, map).await?;
        }

        let region = intent.visualization_type == VisualizationType::Region;
        if region {
            self.draw_region(&mut outcome, map)?;
        }
        let opacity = if outcome.hull.is_some() { REGION_OPACITY } else { 0.0 };
        map.set_paint_property("region-fill", "fill-opacity", json!(opacity))?;

        let points: Vec<Coordinates> = outcome.rendered.iter().map(|r| r.coordinates).collect();
        if let Some(mut bounds) = Bounds::from_points(&points) {
            for leg in &outcome.legs {
                leg.path.iter().for_each(|p| bounds.extend(*p));
            }
            if let Some(hull) = &outcome.hull {
                hull.iter().for_each(|p| bounds.extend(*p));
            }
            map.fit_bounds(bounds, FIT_PADDING);
        }

        if outcome.message.is_none() && !outcome.dropped.is_empty() {
            outcome.message = Some(format!("Could not locate: {}", outcome.dropped.join(", ")));
        }
        log::info!(
            "[Dispatch] Rendered {:?}: {}",
            outcome.visualization,
            outcome.summary()
        );
        Ok(outcome)
    }

    async fn draw_legs<M: MapHandle + ?Sized>(
        &self,
        intent: &IntentResult,
        outcome: &mut RenderOutcome,
        map: &mut M,
    ) -> Result<(), DispatchError> {
        let wants_sea = intent
            .preferences
            .iter()
            .any(|p| SEA_PREFERENCES.contains(&p.as_str()));
        let use_directions = intent.visualization_type == VisualizationType::Route;
        let travel = intent.travel_mode.unwrap_or(TravelMode::Driving);

        let pairs: Vec<_> = outcome.rendered.windows(2).map(|w| (&w[0], &w[1])).collect();
        let legs = join_all(pairs.into_iter().map(|(a, b)| async move {
            let mode = self.leg_mode(a, b, wants_sea);
            let direct_km = geometry::haversine_km(a.coordinates, b.coordinates);
            let (path, routed, distance_km) = match mode {
                LegMode::Air => (geometry::bezier_arc(a.coordinates, b.coordinates), false, direct_km),
                LegMode::Sea => (
                    geometry::interpolate_line(a.coordinates, b.coordinates, SEA_SEGMENTS),
                    false,
                    direct_km,
                ),
                LegMode::Ground if use_directions && self.directions.is_some() => {
                    match self.route(&[a.coordinates, b.coordinates], travel).await {
                        Ok(route) => (route.coordinates, true, route.distance_m / 1000.0),
                        Err(e) => {
                            log::warn!(
                                "[Dispatch] Directions {} -> {} failed: {}",
                                a.name,
                                b.name,
                                e
                            );
                            (vec![a.coordinates, b.coordinates], false, direct_km)
                        }
                    }
                }
                LegMode::Ground => (vec![a.coordinates, b.coordinates], false, direct_km),
            };
            Leg {
                from: a.name.clone(),
                to: b.name.clone(),
                mode,
                distance_km,
                routed,
                path,
            }
        }))
        .await;

        let ground: Vec<&Leg> = legs.iter().filter(|l| l.mode == LegMode::Ground).collect();
        let all_ground_failed = use_directions
            && self.directions.is_some()
            && ground.len() == legs.len()
            && ground.iter().all(|l| !l.routed);
        if all_ground_failed {
            outcome.message = Some(ROUTE_FAILED_MESSAGE.to_string());
            return Ok(());
        }
        if use_directions && self.directions.is_some() && ground.iter().any(|l| !l.routed) {
            outcome.message =
                Some("Some legs could not be routed and are drawn as straight lines".to_string());
        }

        let features = legs
            .iter()
            .map(|leg| {
                line_feature(
                    &leg.path,
                    json!({"mode": leg.mode.as_str(), "from": leg.from, "to": leg.to}),
                )
            })
            .collect();
        map.set_data(ROUTE_SOURCE, feature_collection(features))?;
        outcome.total_km = legs.iter().map(|l| l.distance_km).sum();
        outcome.legs = legs;
        Ok(())
    }

    fn draw_region<M: MapHandle + ?Sized>(
        &self,
        outcome: &mut RenderOutcome,
        map: &mut M,
    ) -> Result<(), DispatchError> {
        let points: Vec<Coordinates> = outcome.rendered.iter().map(|r| r.coordinates).collect();
        let hull = geometry::convex_hull(&points);
        if hull.len() < 3 {
            outcome.message = Some("Need at least three distinct places to outline a region".into());
            return Ok(());
        }
        let ring = geometry::close_ring(geometry::buffer_hull(&hull, self.hull_buffer));
        map.set_data(
            REGION_SOURCE,
            feature_collection(vec![polygon_feature(&ring, json!({"places": points.len()}))]),
        )?;
        outcome.hull = Some(ring);
        Ok(())
    }

    fn leg_mode(&self, a: &RenderedLocation, b: &RenderedLocation, wants_sea: bool) -> LegMode {
        let crosses_continents = match (continent_of(a.coordinates), continent_of(b.coordinates)) {
            (Some(ca), Some(cb)) => ca != cb,
            _ => false,
        };
        let long_haul = crosses_continents
            || geometry::haversine_km(a.coordinates, b.coordinates) > LONG_HAUL_KM;
        if !long_haul {
            return LegMode::Ground;
        }
        let coastal = |name: &str| self.geocoder.place_for(name).is_some_and(|p| p.coastal);
        if wants_sea && coastal(&a.name) && coastal(&b.name) {
            LegMode::Sea
        } else {
            LegMode::Air
        }
    }

    async fn route(
        &self,
        waypoints: &[Coordinates],
        mode: TravelMode,
    ) -> Result<RouteGeometry, DirectionsError> {
        let provider = self.directions.as_ref().ok_or(DirectionsError::NoRoute)?;
        tokio::time::timeout(self.directions_timeout, provider.route(waypoints, mode))
            .await
            .map_err(|_| DirectionsError::Timeout)?
    }
}

/// Puts locations in the order `sequence` names them. Locations the
/// sequence does not mention keep their relative order at the end.
pub fn order_by_sequence(mut locations: Vec<Location>, sequence: &[String]) -> Vec<Location> {
    let mut ordered = Vec::with_capacity(locations.len());
    for name in sequence {
        let key = name.trim().to_lowercase();
        if let Some(i) = locations.iter().position(|l| l.key() == key) {
            ordered.push(locations.remove(i));
        }
    }
    ordered.extend(locations);
    ordered
}

/// Adds whichever sources and layers are missing. Safe to call on every
/// render.
pub fn ensure_sources<M: MapHandle + ?Sized>(map: &mut M) {
    for source in [LOCATIONS_SOURCE, ROUTE_SOURCE, REGION_SOURCE] {
        if !map.has_source(source) {
            log::debug!("[Dispatch] Creating missing source '{}'", source);
            map.add_source(source, empty_collection());
        }
    }

    let mode_filter = |mode: LegMode| json!(["==", ["get", "mode"], mode.as_str()]);
    let layers = [
        LayerSpec::new(
            "region-fill",
            LayerKind::Fill,
            REGION_SOURCE,
            json!({"fill-color": REGION_COLOR, "fill-opacity": REGION_OPACITY}),
        ),
        LayerSpec::new(
            "region-outline",
            LayerKind::Line,
            REGION_SOURCE,
            json!({"line-color": REGION_COLOR, "line-width": 2}),
        ),
        LayerSpec::new(
            "route-ground",
            LayerKind::Line,
            ROUTE_SOURCE,
            json!({"line-color": GROUND_COLOR, "line-width": 4}),
        )
        .with_filter(mode_filter(LegMode::Ground)),
        LayerSpec::new(
            "route-air",
            LayerKind::Line,
            ROUTE_SOURCE,
            json!({"line-color": AIR_COLOR, "line-width": 3, "line-dasharray": [2, 2]}),
        )
        .with_filter(mode_filter(LegMode::Air)),
        LayerSpec::new(
            "route-sea",
            LayerKind::Line,
            ROUTE_SOURCE,
            json!({"line-color": SEA_COLOR, "line-width": 3}),
        )
        .with_filter(mode_filter(LegMode::Sea)),
        LayerSpec::new(
            "locations-circle",
            LayerKind::Circle,
            LOCATIONS_SOURCE,
            json!({"circle-radius": 7, "circle-color": "#ef4444", "circle-stroke-width": 2}),
        ),
    ];
    for layer in layers {
        if !map.has_layer(&layer.id) {
            map.add_layer(layer);
        }
    }
}
