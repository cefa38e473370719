// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// `[lon, lat]`, the order map sources expect.
pub type Coordinates = [f64; 2];

pub const CONFIDENCE_CLEAR: f32 = 0.95;
pub const CONFIDENCE_UNCLEAR: f32 = 0.7;
pub const CONFIDENCE_DEFAULT: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub time_context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptive_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_context: Option<String>,
}

impl Location {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time_context: String::new(),
            coordinates: None,
            historical_context: None,
            descriptive_context: None,
            relationship_context: None,
        }
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    pub fn with_time_context(mut self, time_context: impl Into<String>) -> Self {
        self.time_context = time_context.into();
        self
    }

    /// Identity of a location within one request: lower-cased, trimmed name.
    pub fn key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentType {
    Route,
    Locations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualizationType {
    Route,
    Sequence,
    #[serde(alias = "locations", alias = "points", alias = "informational")]
    Markers,
    #[serde(alias = "scope", alias = "hull")]
    Region,
    #[serde(alias = "chronological")]
    Timeline,
}

impl VisualizationType {
    /// Whether the rendering connects locations with a line.
    pub fn draws_line(&self) -> bool {
        matches!(
            self,
            VisualizationType::Route | VisualizationType::Sequence | VisualizationType::Timeline
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
    Walking,
    Cycling,
    Transit,
}

impl TravelMode {
    /// Routing profile name used by the directions endpoint. Transit has no
    /// dedicated profile there, so it is routed over roads.
    pub fn profile(&self) -> &'static str {
        match self {
            TravelMode::Driving | TravelMode::Transit => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClarificationKind {
    Location,
    Intent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clarification {
    #[serde(rename = "type")]
    pub kind: ClarificationKind,
    pub message: String,
    #[serde(default)]
    pub alternatives: Vec<String>,
}

/// Where a result came from. `Default` marks the never-empty fallback so a
/// front end can choose to show an "I couldn't understand this" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentSource {
    #[default]
    Pattern,
    Remote,
    Context,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResult {
    pub intent_type: IntentType,
    pub locations: Vec<Location>,
    pub visualization_type: VisualizationType,
    #[serde(default)]
    pub travel_mode: Option<TravelMode>,
    #[serde(default)]
    pub preferences: BTreeSet<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub suggested_sequence: Option<Vec<String>>,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
    #[serde(default)]
    pub needs_clarification: bool,
    #[serde(default)]
    pub clarification: Option<Clarification>,
    #[serde(default)]
    pub skip_clarification: bool,
    #[serde(default)]
    pub source: IntentSource,
}

fn default_confidence() -> f32 {
    CONFIDENCE_CLEAR
}

impl IntentResult {
    pub fn new(
        intent_type: IntentType,
        locations: Vec<Location>,
        visualization_type: VisualizationType,
    ) -> Self {
        Self {
            intent_type,
            locations,
            visualization_type,
            travel_mode: None,
            preferences: BTreeSet::new(),
            message: String::new(),
            suggested_sequence: None,
            confidence: CONFIDENCE_CLEAR,
            needs_clarification: false,
            clarification: None,
            skip_clarification: false,
            source: IntentSource::Pattern,
        }
    }

    pub fn route<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let locations = names.into_iter().map(Location::named).collect();
        Self::new(IntentType::Route, locations, VisualizationType::Route)
    }

    pub fn markers<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let locations = names.into_iter().map(Location::named).collect();
        Self::new(IntentType::Locations, locations, VisualizationType::Markers)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn location_names(&self) -> Vec<&str> {
        self.locations.iter().map(|l| l.name.as_str()).collect()
    }

    /// Drops repeated names (case-insensitive), keeping the first occurrence.
    pub fn dedup_locations(&mut self) {
        let mut seen = BTreeSet::new();
        self.locations.retain(|l| seen.insert(l.key()));
    }
}
