// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Offline half of geoprompt: the intent model, the gazetteer and the
//! rule cascade that turns free text into places to draw.

pub mod clarify;
pub mod config;
pub mod extractor;
pub mod gazetteer;
pub mod intent;
pub mod rules;
pub mod timeline;
pub mod validate;

pub use clarify::Clarifier;
pub use config::{NlpRulesConfig, Vocabulary};
pub use extractor::{default_result, PatternExtractor};
pub use gazetteer::{continent_of, Continent, Gazetteer, Place, PlaceKind};
pub use intent::{
    Clarification, ClarificationKind, Coordinates, IntentResult, IntentSource, IntentType,
    Location, TravelMode, VisualizationType,
};
pub use validate::ValidationError;
