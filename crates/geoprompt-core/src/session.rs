// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use chrono::Utc;
use geoprompt_nlp::intent::IntentSource;
use geoprompt_nlp::{IntentResult, IntentType, Location, TravelMode};
use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

/// What the previous turns of a conversation resolved to. Owned by the
/// caller and passed by `&mut` into each turn.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    pub session_id: String,
    pub last_query: Option<String>,
    pub last_locations: Vec<Location>,
    pub last_intent: Option<IntentResult>,
    pub turn_count: u32,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationContext {
    pub fn new() -> Self {
        let suffix: u32 = rand::thread_rng().gen();
        Self {
            session_id: format!("{}-{:08x}", Utc::now().format("%Y%m%d%H%M%S"), suffix),
            last_query: None,
            last_locations: Vec::new(),
            last_intent: None,
            turn_count: 0,
        }
    }

    /// Forgets every turn and starts a new session id.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn has_history(&self) -> bool {
        self.last_intent.is_some()
    }

    pub fn record(&mut self, query: &str, result: &IntentResult) {
        self.turn_count += 1;
        self.last_query = Some(query.to_string());
        self.last_locations = result.locations.clone();
        self.last_intent = Some(result.clone());
    }
}

fn follow_up_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*(add|also|and|then|plus|include)\b[\s,]*").unwrap())
}

fn mode_change_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:(?:the\s+)?same(?:\s+route)?(?:\s+but)?\s+)?(?:by|via|on)\s+(car|driving|foot|walking|bike|bicycle|cycling|transit|train|bus)\s*[.!?]?\s*$",
        )
        .unwrap()
    })
}

/// Text after the follow-up keyword, when the query starts with one.
pub fn strip_follow_up(query: &str) -> Option<&str> {
    let m = follow_up_re().find(query)?;
    let rest = query[m.end()..].trim();
    (!rest.is_empty()).then_some(rest)
}

/// "same but by bike", "by transit".
pub fn mode_change(query: &str) -> Option<TravelMode> {
    let caps = mode_change_re().captures(query)?;
    let mode = match caps.get(1)?.as_str().to_lowercase().as_str() {
        "car" | "driving" => TravelMode::Driving,
        "foot" | "walking" => TravelMode::Walking,
        "bike" | "bicycle" | "cycling" => TravelMode::Cycling,
        _ => TravelMode::Transit,
    };
    Some(mode)
}

/// Appends the follow-up's locations to the previous turn. Names already
/// present are skipped; the previous intent type is kept.
pub fn merge_follow_up(previous: &IntentResult, follow_up: &IntentResult) -> IntentResult {
    let mut merged = previous.clone();
    merged.locations.extend(follow_up.locations.iter().cloned());
    merged.dedup_locations();
    if merged.intent_type == IntentType::Route {
        merged.suggested_sequence = None;
    }
    if follow_up.travel_mode.is_some() {
        merged.travel_mode = follow_up.travel_mode;
    }
    merged.preferences.extend(follow_up.preferences.iter().cloned());
    merged.message = String::new();
    merged.needs_clarification = false;
    merged.clarification = None;
    merged.source = IntentSource::Context;
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_up_prefixes() {
        assert_eq!(strip_follow_up("add Lyon"), Some("Lyon"));
        assert_eq!(strip_follow_up("Also, Nice and Cannes"), Some("Nice and Cannes"));
        assert_eq!(strip_follow_up("and"), None);
        assert_eq!(strip_follow_up("Andorra to Barcelona"), None);
        assert_eq!(strip_follow_up("Paris to Lyon"), None);
    }

    #[test]
    fn test_mode_change() {
        assert_eq!(mode_change("same but by bike"), Some(TravelMode::Cycling));
        assert_eq!(mode_change("by transit"), Some(TravelMode::Transit));
        assert_eq!(mode_change("The same route but on foot"), Some(TravelMode::Walking));
        assert_eq!(mode_change("by the river in Paris"), None);
    }

    #[test]
    fn test_merge_keeps_order_and_type() {
        let previous = IntentResult::route(["Paris", "Lyon"]);
        let follow = IntentResult::markers(["lyon", "Nice"]);
        let merged = merge_follow_up(&previous, &follow);
        assert_eq!(merged.intent_type, IntentType::Route);
        assert_eq!(merged.location_names(), vec!["Paris", "Lyon", "Nice"]);
        assert_eq!(merged.source, IntentSource::Context);
    }

    #[test]
    fn test_record_and_reset() {
        let mut ctx = ConversationContext::new();
        let id = ctx.session_id.clone();
        ctx.record("Paris to Lyon", &IntentResult::route(["Paris", "Lyon"]));
        assert_eq!(ctx.turn_count, 1);
        assert_eq!(ctx.last_locations.len(), 2);
        ctx.reset();
        assert_eq!(ctx.turn_count, 0);
        assert!(!ctx.has_history());
        assert_ne!(ctx.session_id, id);
    }
}
