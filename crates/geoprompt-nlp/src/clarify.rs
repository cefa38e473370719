// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::config::Vocabulary;
use crate::gazetteer::Gazetteer;
use crate::intent::{
    Clarification, ClarificationKind, IntentResult, IntentSource, CONFIDENCE_CLEAR,
    CONFIDENCE_UNCLEAR,
};

/// Queries shorter than this say too little to act on confidently.
const MIN_CLEAR_QUERY_CHARS: usize = 10;
const MAX_CLEAR_LOCATIONS: usize = 3;

/// Flags results whose place names or intent could reasonably be read
/// more than one way.
#[derive(Debug, Clone, Default)]
pub struct Clarifier {
    vocab: Vocabulary,
}

impl Clarifier {
    pub fn new(vocab: Vocabulary) -> Self {
        Self { vocab }
    }

    /// Sets `needs_clarification`, `clarification` and `confidence`.
    /// Results from the "show me" path and the default fallback are left
    /// unflagged.
    pub fn apply(&self, query: &str, result: &mut IntentResult) {
        if result.source == IntentSource::Default {
            result.needs_clarification = false;
            result.clarification = None;
            return;
        }
        let clarification = if result.skip_clarification {
            None
        } else {
            self.assess(query, result)
        };
        result.needs_clarification = clarification.is_some();
        result.confidence = if clarification.is_some() {
            CONFIDENCE_UNCLEAR
        } else {
            CONFIDENCE_CLEAR
        };
        if let Some(c) = &clarification {
            log::debug!("[Clarifier] {:?}: {}", c.kind, c.message);
        }
        result.clarification = clarification;
    }

    pub fn assess(&self, query: &str, result: &IntentResult) -> Option<Clarification> {
        if let Some(name) = result
            .locations
            .iter()
            .map(|l| l.name.trim())
            .find(|n| self.is_ambiguous_location(n))
        {
            return Some(Clarification {
                kind: ClarificationKind::Location,
                message: format!("Which {} do you mean?", name),
                alternatives: self.alternatives(name),
            });
        }

        if self.is_ambiguous_intent(query, result) {
            return Some(Clarification {
                kind: ClarificationKind::Intent,
                message: "Do you want a route between these places, or just to see them on the map?"
                    .to_string(),
                alternatives: vec![
                    "Show a route connecting them".to_string(),
                    "Show them as separate locations".to_string(),
                ],
            });
        }
        None
    }

    pub fn is_ambiguous_location(&self, name: &str) -> bool {
        let name = name.trim();
        if self.vocab.alternatives_for(name).is_some() {
            return true;
        }
        name.chars().count() < 4
            && !self.vocab.is_known_short_name(name)
            && !Gazetteer::global().is_known(name)
    }

    fn is_ambiguous_intent(&self, query: &str, result: &IntentResult) -> bool {
        let query = query.trim();
        if query.chars().count() < MIN_CLEAR_QUERY_CHARS {
            return true;
        }
        let starts_with_generic_verb = query
            .split_whitespace()
            .next()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .is_some_and(|w| !w.eq_ignore_ascii_case("show") && self.vocab.is_generic_verb(w));
        starts_with_generic_verb || result.locations.len() > MAX_CLEAR_LOCATIONS
    }

    /// Known readings for a toponym, else a generic USA / Europe split.
    pub fn alternatives(&self, name: &str) -> Vec<String> {
        match self.vocab.alternatives_for(name) {
            Some(alts) => alts.to_vec(),
            None => vec![format!("{}, USA", name), format!("{}, Europe", name)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::IntentResult;

    #[test]
    fn test_known_ambiguous_toponym() {
        let c = Clarifier::default();
        let mut r = IntentResult::route(["Portland", "Seattle"]);
        c.apply("Route from Portland to Seattle", &mut r);
        assert!(r.needs_clarification);
        assert_eq!(r.confidence, CONFIDENCE_UNCLEAR);
        let clar = r.clarification.unwrap();
        assert_eq!(clar.kind, ClarificationKind::Location);
        assert_eq!(clar.alternatives, vec!["Portland, Oregon", "Portland, Maine"]);
    }

    #[test]
    fn test_short_unknown_name_gets_generic_alternatives() {
        let c = Clarifier::default();
        assert!(c.is_ambiguous_location("Zed"));
        assert!(!c.is_ambiguous_location("NYC"));
        assert_eq!(c.alternatives("Zed"), vec!["Zed, USA", "Zed, Europe"]);
    }

    #[test]
    fn test_clear_route_keeps_high_confidence() {
        let c = Clarifier::default();
        let mut r = IntentResult::route(["Paris", "London"]);
        c.apply("Route from Paris to London", &mut r);
        assert!(!r.needs_clarification);
        assert!(r.clarification.is_none());
        assert_eq!(r.confidence, CONFIDENCE_CLEAR);
    }

    #[test]
    fn test_generic_verb_and_many_locations_are_unclear() {
        let c = Clarifier::default();
        let mut r = IntentResult::markers(["Paris"]);
        c.apply("Find something near Paris", &mut r);
        assert_eq!(r.clarification.unwrap().kind, ClarificationKind::Intent);

        let mut r = IntentResult::route(["Paris", "Lyon", "Nice", "Marseille"]);
        c.apply("Route from Paris to Lyon to Nice to Marseille", &mut r);
        assert!(r.needs_clarification);
    }

    #[test]
    fn test_show_me_path_is_exempt() {
        let c = Clarifier::default();
        let mut r = IntentResult::route(["Portland", "A", "B", "C"]);
        r.skip_clarification = true;
        c.apply("show me Portland, A, B and C", &mut r);
        assert!(!r.needs_clarification);
        assert_eq!(r.confidence, CONFIDENCE_CLEAR);
    }
}
