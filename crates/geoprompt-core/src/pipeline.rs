// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::classifier::{GeminiBackend, RemoteIntentClassifier};
use crate::config::AppConfig;
use crate::directions::MapboxDirections;
use crate::dispatch::{DispatchError, RenderOutcome, VisualizationDispatcher};
use crate::geocoder::{Geocoder, MapboxGeocoder};
use crate::history::HistoryManager;
use crate::map::MapHandle;
use crate::session::{merge_follow_up, mode_change, strip_follow_up, ConversationContext};
use crate::CoreError;
use geoprompt_nlp::{Clarifier, IntentResult, IntentSource, PatternExtractor, Vocabulary};
use std::sync::Arc;

/// Query in, intent out: fast pattern rules, then the remote classifier
/// for complex text, then the catch-all rules. Never fails.
pub struct QueryProcessor {
    extractor: PatternExtractor,
    clarifier: Clarifier,
    classifier: Option<RemoteIntentClassifier>,
    dispatcher: VisualizationDispatcher,
    history: Option<HistoryManager>,
}

impl QueryProcessor {
    pub fn new(vocab: Vocabulary, dispatcher: VisualizationDispatcher) -> Self {
        Self {
            clarifier: Clarifier::new(vocab.clone()),
            extractor: PatternExtractor::with_vocabulary(vocab),
            classifier: None,
            dispatcher,
            history: None,
        }
    }

    /// Built-in vocabulary, gazetteer-only geocoding, no remote services.
    pub fn offline() -> Self {
        Self::new(
            Vocabulary::default(),
            VisualizationDispatcher::new(Arc::new(Geocoder::default())),
        )
    }

    pub fn from_config(config: &AppConfig, vocab: Vocabulary) -> Result<Self, CoreError> {
        let mapbox_token = config
            .mapbox_token
            .as_deref()
            .filter(|t| !t.trim().is_empty());

        let mut geocoder = Geocoder::new(config.geocode_cache_capacity);
        if let Some(token) = mapbox_token {
            let provider = MapboxGeocoder::new(token, config.geocoder_timeout())?;
            geocoder = geocoder.with_provider(Arc::new(provider), config.geocoder_timeout());
        } else {
            log::info!("[Pipeline] No Mapbox token; geocoding from the built-in gazetteer only");
        }

        let mut dispatcher = VisualizationDispatcher::new(Arc::new(geocoder))
            .with_hull_buffer(config.hull_buffer_degrees);
        if let Some(token) = mapbox_token {
            let directions = MapboxDirections::new(token, config.directions_timeout())?;
            dispatcher = dispatcher.with_directions(Arc::new(directions), config.directions_timeout());
        }

        let mut processor = Self::new(vocab, dispatcher)
            .with_history(HistoryManager::new().with_limit(config.history_limit));

        let gemini_key = config
            .gemini_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty());
        match (config.remote_classifier_enabled, gemini_key) {
            (true, Some(key)) => {
                let backend =
                    GeminiBackend::new(key, config.gemini_model.as_str(), config.classifier_timeout())?;
                processor = processor.with_classifier(RemoteIntentClassifier::new(
                    Arc::new(backend),
                    config.classifier_timeout(),
                ));
            }
            (true, None) => {
                log::info!("[Pipeline] No Gemini API key; remote classification disabled")
            }
            (false, _) => log::debug!("[Pipeline] Remote classification turned off in config"),
        }
        Ok(processor)
    }

    pub fn with_classifier(mut self, classifier: RemoteIntentClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_history(mut self, history: HistoryManager) -> Self {
        self.history = Some(history);
        self
    }

    pub fn extractor(&self) -> &PatternExtractor {
        &self.extractor
    }

    pub fn dispatcher(&self) -> &VisualizationDispatcher {
        &self.dispatcher
    }

    pub fn history(&self) -> Option<&HistoryManager> {
        self.history.as_ref()
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Single-turn processing.
    pub async fn process(&self, query: &str) -> IntentResult {
        let query = query.trim();
        let result = self.resolve(query).await;
        self.remember(query);
        result
    }

    /// Multi-turn processing. Follow-ups ("add Lyon", "same but by bike")
    /// build on the previous turn held in `ctx`.
    pub async fn process_in_context(
        &self,
        query: &str,
        ctx: &mut ConversationContext,
    ) -> IntentResult {
        let query = query.trim();
        // The three-city fallback is not something to build on.
        let previous = ctx
            .last_intent
            .as_ref()
            .filter(|p| p.source != IntentSource::Default);
        let from_context = match previous {
            Some(previous) => self.resolve_follow_up(query, previous).map(|mut result| {
                let combined = match ctx.last_query.as_deref() {
                    Some(last) => format!("{} {}", last, query),
                    None => query.to_string(),
                };
                self.clarifier.apply(&combined, &mut result);
                result
            }),
            None => None,
        };
        let result = match from_context {
            Some(result) => result,
            None => self.resolve(query).await,
        };
        ctx.record(query, &result);
        self.remember(query);
        result
    }

    pub async fn render<M: MapHandle + ?Sized>(
        &self,
        result: &IntentResult,
        map: &mut M,
    ) -> Result<RenderOutcome, DispatchError> {
        self.dispatcher.render(result, map).await
    }

    async fn resolve(&self, query: &str) -> IntentResult {
        let mut result = match self.extractor.extract_fast(query) {
            Some(result) => result,
            None => match self.classify_remote(query).await {
                Some(result) => result,
                None => self.extractor.extract_catch_all(query),
            },
        };
        self.clarifier.apply(query, &mut result);
        log::debug!(
            "[Pipeline] '{}' -> {:?} {:?} ({:?})",
            query,
            result.visualization_type,
            result.location_names(),
            result.source
        );
        result
    }

    async fn classify_remote(&self, query: &str) -> Option<IntentResult> {
        let classifier = self.classifier.as_ref()?;
        if !self.extractor.is_complex_query(query) {
            return None;
        }
        match classifier.classify(query).await {
            Ok(mut result) => {
                if result.travel_mode.is_none() {
                    result.travel_mode = self.extractor.travel_mode(query);
                }
                result.preferences.extend(self.extractor.preferences(query));
                Some(result)
            }
            Err(e) => {
                log::warn!("[Pipeline] Remote classification failed, using patterns: {}", e);
                None
            }
        }
    }

    fn resolve_follow_up(&self, query: &str, previous: &IntentResult) -> Option<IntentResult> {
        if let Some(mode) = mode_change(query) {
            let mut result = previous.clone();
            result.travel_mode = Some(mode);
            result.source = IntentSource::Context;
            log::debug!("[Pipeline] Re-using last locations with {:?}", mode);
            return Some(result);
        }
        let rest = strip_follow_up(query)?;
        let addition = self.extractor.extract(rest)?;
        log::debug!(
            "[Pipeline] Follow-up adds {:?} to {:?}",
            addition.location_names(),
            previous.location_names()
        );
        Some(merge_follow_up(previous, &addition))
    }

    fn remember(&self, query: &str) {
        if let Some(history) = &self.history {
            if let Err(e) = history.record(query) {
                log::warn!("[Pipeline] Could not update search history: {:#}", e);
            }
        }
    }
}
