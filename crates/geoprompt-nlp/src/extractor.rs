// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::config::Vocabulary;
use crate::gazetteer::Gazetteer;
use crate::intent::{
    IntentResult, IntentSource, IntentType, Location, TravelMode, VisualizationType,
    CONFIDENCE_DEFAULT,
};
use crate::rules::{prepare, RuleContext, RULES};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

pub const DEFAULT_CITIES: [&str; 3] = ["New York", "Los Angeles", "Chicago"];

/// Regex cascade that turns a query into an [`IntentResult`].
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    vocab: Vocabulary,
    gazetteer: &'static Gazetteer,
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternExtractor {
    /// Built-in vocabulary; nothing is read from disk.
    pub fn new() -> Self {
        Self::with_vocabulary(Vocabulary::default())
    }

    pub fn with_vocabulary(vocab: Vocabulary) -> Self {
        Self {
            vocab,
            gazetteer: Gazetteer::global(),
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn gazetteer(&self) -> &'static Gazetteer {
        self.gazetteer
    }

    /// Runs the full rule table. `Some` always carries at least one location.
    pub fn extract(&self, text: &str) -> Option<IntentResult> {
        self.run(text, |_| true)
    }

    /// Only the cheap, specific rules; the scraper is skipped.
    pub fn extract_fast(&self, text: &str) -> Option<IntentResult> {
        self.run(text, |fast| fast)
    }

    /// The rules that run after the fast path and the remote classifier
    /// have both passed, ending in the default result.
    pub fn extract_catch_all(&self, text: &str) -> IntentResult {
        self.run(text, |fast| !fast)
            .unwrap_or_else(|| self.default_for(text))
    }

    pub fn extract_or_default(&self, text: &str) -> IntentResult {
        self.extract(text).unwrap_or_else(|| self.default_for(text))
    }

    fn run(&self, text: &str, select: impl Fn(bool) -> bool) -> Option<IntentResult> {
        let ctx = RuleContext::new(text, &self.vocab, self.gazetteer);
        if ctx.text.is_empty() {
            return None;
        }
        for rule in RULES.iter().filter(|r| select(r.fast)) {
            if let Some(result) = (rule.handler)(&ctx) {
                match self.finish(text, result) {
                    Some(result) => {
                        log::debug!(
                            "[Extractor] Rule '{}' matched {:?}",
                            rule.name,
                            result.location_names()
                        );
                        return Some(result);
                    }
                    None => continue,
                }
            }
        }
        None
    }

    /// Applies the attributes every path shares and enforces the
    /// at-least-one-location contract.
    fn finish(&self, text: &str, mut result: IntentResult) -> Option<IntentResult> {
        result.dedup_locations();
        result.locations.retain(|l| !l.name.trim().is_empty());
        if result.locations.is_empty() {
            return None;
        }
        // "Paris to Paris" is not a route.
        if result.intent_type == IntentType::Route && result.locations.len() < 2 {
            return None;
        }
        if result.travel_mode.is_none() {
            result.travel_mode = self.travel_mode(text);
        }
        result.preferences.extend(self.preferences(text));
        result.source = IntentSource::Pattern;
        Some(result)
    }

    fn default_for(&self, text: &str) -> IntentResult {
        let mut result = default_result();
        result.travel_mode = self.travel_mode(text);
        result.preferences = self.preferences(text);
        result
    }

    pub fn travel_mode(&self, text: &str) -> Option<TravelMode> {
        detect_travel_mode(text)
    }

    pub fn preferences(&self, text: &str) -> BTreeSet<String> {
        let mut prefs = detect_preferences(text);
        if self.vocab.mentions_sea(text) {
            prefs.insert("sea".to_string());
        }
        prefs
    }

    /// Queries worth a remote round trip: long, touristic or historical, or
    /// phrased as a question. Short "X to Y" queries never are.
    pub fn is_complex_query(&self, text: &str) -> bool {
        if self.is_short_route(text) {
            return false;
        }
        text.split_whitespace().count() >= self.vocab.config.complex_word_count
            || self.vocab.mentions_historical(text)
            || self.vocab.mentions_touristic(text)
            || text.contains('?')
    }

    pub fn is_short_route(&self, text: &str) -> bool {
        static SHAPE_RE: OnceLock<Regex> = OnceLock::new();
        let re = SHAPE_RE.get_or_init(|| Regex::new(r"(?i)^\S.*?\s+to\s+\S").unwrap());
        let prepared = prepare(text);
        prepared.split_whitespace().count() <= 6 && re.is_match(&prepared)
    }
}

/// Result used when nothing in the text could be understood. Tagged
/// [`IntentSource::Default`] so front ends can say so.
pub fn default_result() -> IntentResult {
    let locations = DEFAULT_CITIES.iter().map(|c| Location::named(*c)).collect();
    let mut result =
        IntentResult::new(IntentType::Locations, locations, VisualizationType::Markers);
    result.confidence = CONFIDENCE_DEFAULT;
    result.source = IntentSource::Default;
    result.message = "I couldn't find any places in that, so here are a few major cities. \
                      Try something like \"Route from Paris to London\"."
        .to_string();
    result
}

pub fn detect_travel_mode(text: &str) -> Option<TravelMode> {
    static MODE_RES: OnceLock<Vec<(TravelMode, Regex)>> = OnceLock::new();
    let modes = MODE_RES.get_or_init(|| {
        [
            (
                TravelMode::Walking,
                r"(?i)\b(?:walk|walking|walks|on\s+foot|hike|hiking|stroll)\b",
            ),
            (
                TravelMode::Cycling,
                r"(?i)\b(?:cycle|cycling|bike|biking|bicycle|bicycling)\b",
            ),
            (
                TravelMode::Transit,
                r"(?i)\b(?:transit|train|trains|bus|subway|metro|tram|rail|public\s+transport(?:ation)?)\b",
            ),
            (
                TravelMode::Driving,
                r"(?i)\b(?:drive|driving|car|road\s+trip|by\s+road)\b",
            ),
        ]
        .into_iter()
        .map(|(mode, p)| (mode, Regex::new(p).unwrap()))
        .collect()
    });
    modes
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(mode, _)| *mode)
}

pub fn detect_preferences(text: &str) -> BTreeSet<String> {
    static PREF_RES: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    let prefs = PREF_RES.get_or_init(|| {
        [
            ("scenic", r"(?i)\b(?:scenic|picturesque|pretty)\b"),
            ("fastest", r"(?i)\b(?:fastest|quickest)\b"),
            ("shortest", r"(?i)\bshortest\b"),
            (
                "avoid tolls",
                r"(?i)\b(?:avoid(?:ing)?\s+tolls?|no\s+tolls?|toll[- ]free)\b",
            ),
            (
                "avoid highways",
                r"(?i)\b(?:avoid(?:ing)?\s+(?:the\s+)?(?:highways?|motorways?|freeways?)|no\s+(?:highways?|motorways?))\b",
            ),
            ("coastal", r"(?i)\b(?:coastal|along\s+the\s+coast|by\s+the\s+coast)\b"),
        ]
        .into_iter()
        .map(|(name, p)| (name, Regex::new(p).unwrap()))
        .collect()
    });
    prefs
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_travel_mode_keywords() {
        assert_eq!(
            detect_travel_mode("walk from the Louvre to Notre Dame"),
            Some(TravelMode::Walking)
        );
        assert_eq!(detect_travel_mode("Paris to Lyon by train"), Some(TravelMode::Transit));
        assert_eq!(detect_travel_mode("road trip to Denver"), Some(TravelMode::Driving));
        assert_eq!(detect_travel_mode("Paris to Lyon"), None);
    }

    #[test]
    fn test_preferences() {
        let p = detect_preferences("scenic drive avoiding tolls, the fastest way");
        assert!(p.contains("scenic"));
        assert!(p.contains("avoid tolls"));
        assert!(p.contains("fastest"));
        assert!(!p.contains("shortest"));
    }

    #[test]
    fn test_default_result_shape() {
        let r = default_result();
        assert_eq!(r.location_names(), DEFAULT_CITIES.to_vec());
        assert_eq!(r.confidence, CONFIDENCE_DEFAULT);
        assert_eq!(r.source, IntentSource::Default);
    }

    #[test]
    fn test_short_route_is_never_complex() {
        let e = PatternExtractor::new();
        assert!(e.is_short_route("Boston to Denver?"));
        assert!(!e.is_complex_query("Boston to Denver?"));
        assert!(e.is_complex_query("What are the best museums in Madrid"));
        assert!(e.is_complex_query("Where did the Roman legions march?"));
        assert!(!e.is_complex_query("Paris"));
    }

    #[test]
    fn test_fast_path_skips_scraper() {
        let e = PatternExtractor::new();
        let text = "We spent a week wandering around Lisbon";
        assert!(e.extract_fast(text).is_none());
        let r = e.extract(text).unwrap();
        assert_eq!(r.location_names(), vec!["Lisbon"]);
        assert_eq!(e.extract_catch_all(text).location_names(), vec!["Lisbon"]);
    }

    #[test]
    fn test_route_to_itself_is_not_a_route() {
        let e = PatternExtractor::new();
        for text in ["Paris to Paris", "from Paris to paris"] {
            let r = e.extract(text).unwrap();
            assert_eq!(r.intent_type, IntentType::Locations, "query: {:?}", text);
            assert_eq!(r.location_names(), vec!["Paris"], "query: {:?}", text);
        }
    }

    #[test]
    fn test_unmatched_text_defaults() {
        let e = PatternExtractor::new();
        assert!(e.extract("hello there").is_none());
        let r = e.extract_or_default("hello there");
        assert_eq!(r.source, IntentSource::Default);
        assert_eq!(r.locations.len(), 3);
    }
}
