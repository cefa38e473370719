// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geocoder::MAPBOX_API_BASE;
use crate::CoreError;
use async_trait::async_trait;
use geoprompt_nlp::{Coordinates, TravelMode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum DirectionsError {
    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("directions service returned HTTP {0}")]
    Status(u16),
    #[error("invalid directions URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("no route found")]
    NoRoute,
    #[error("malformed directions response: {0}")]
    Malformed(&'static str),
    #[error("directions request timed out")]
    Timeout,
    #[error("a route needs at least two waypoints")]
    TooFewWaypoints,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteGeometry {
    pub coordinates: Vec<Coordinates>,
    pub distance_m: f64,
    pub duration_s: f64,
}

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn route(
        &self,
        waypoints: &[Coordinates],
        mode: TravelMode,
    ) -> Result<RouteGeometry, DirectionsError>;
}

/// Mapbox `directions/v5` client returning GeoJSON geometries.
#[derive(Clone)]
pub struct MapboxDirections {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl MapboxDirections {
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

    fn request_url(
        &self,
        waypoints: &[Coordinates],
        mode: TravelMode,
    ) -> Result<Url, DirectionsError> {
        let coords = waypoints
            .iter()
            .map(|[lon, lat]| format!("{:.6},{:.6}", lon, lat))
            .collect::<Vec<_>>()
            .join(";");
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["directions", "v5", "mapbox", mode.profile(), coords.as_str()]);
        url.query_pairs_mut()
            .append_pair("geometries", "geojson")
            .append_pair("overview", "full")
            .append_pair("access_token", &self.token);
        Ok(url)
    }
}

#[async_trait]
impl DirectionsProvider for MapboxDirections {
    async fn route(
        &self,
        waypoints: &[Coordinates],
        mode: TravelMode,
    ) -> Result<RouteGeometry, DirectionsError> {
        if waypoints.len() < 2 {
            return Err(DirectionsError::TooFewWaypoints);
        }
        let url = self.request_url(waypoints, mode)?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(DirectionsError::Status(response.status().as_u16()));
        }
        let body: Value = response.json().await?;
        parse_directions_response(&body)
    }
}

/// Reads `{"routes": [{geometry, distance, duration}]}` or the single
/// `{"route": {...}}` shape.
pub fn parse_directions_response(body: &Value) -> Result<RouteGeometry, DirectionsError> {
    let route = match body.get("routes") {
        Some(routes) => routes
            .as_array()
            .and_then(|r| r.first())
            .ok_or(DirectionsError::NoRoute)?,
        None => body.get("route").ok_or(DirectionsError::NoRoute)?,
    };

    let raw = route
        .pointer("/geometry/coordinates")
        .and_then(Value::as_array)
        .ok_or(DirectionsError::Malformed("geometry.coordinates missing"))?;
    let coordinates = raw
        .iter()
        .map(|p| {
            let pair = p.as_array()?;
            Some([pair.first()?.as_f64()?, pair.get(1)?.as_f64()?])
        })
        .collect::<Option<Vec<Coordinates>>>()
        .ok_or(DirectionsError::Malformed("non-numeric coordinate"))?;
    if coordinates.len() < 2 {
        return Err(DirectionsError::NoRoute);
    }

    Ok(RouteGeometry {
        coordinates,
        distance_m: route.get("distance").and_then(Value::as_f64).unwrap_or(0.0),
        duration_s: route.get("duration").and_then(Value::as_f64).unwrap_or(0.0),
    })
}
