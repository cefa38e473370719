// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Checks for intent results that did not come from the pattern rules.

use crate::gazetteer::Gazetteer;
use crate::intent::IntentResult;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("no locations returned")]
    NoLocations,
    #[error("location #{0} has an empty name")]
    EmptyName(usize),
    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f32),
    #[error("location '{0}' is not mentioned in the query")]
    Implausible(String),
}

const FILLER: &[&str] = &[
    "the", "of", "to", "in", "and", "a", "an", "de", "la", "le", "city", "from", "at", "on",
];

fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .map(|t| t.trim_matches('\'').to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn validate_structure(result: &IntentResult) -> Result<(), ValidationError> {
    if result.locations.is_empty() {
        return Err(ValidationError::NoLocations);
    }
    if let Some(i) = result
        .locations
        .iter()
        .position(|l| l.name.trim().is_empty())
    {
        return Err(ValidationError::EmptyName(i));
    }
    if !(0.0..=1.0).contains(&result.confidence) {
        return Err(ValidationError::ConfidenceOutOfRange(result.confidence));
    }
    Ok(())
}

/// Every location must share a word with the query, or be a gazetteer
/// alias of something the query says ("NYC" -> "New York").
pub fn validate_plausibility(
    query: &str,
    result: &IntentResult,
    gazetteer: &Gazetteer,
) -> Result<(), ValidationError> {
    let query_tokens = tokens(query);
    let significant: HashSet<&str> = query_tokens
        .iter()
        .map(|t| t.as_str())
        .filter(|t| !FILLER.contains(t))
        .collect();

    // Places the query names, looking at runs of up to three words.
    let mut mentioned = HashSet::new();
    for n in 1..=3 {
        for window in query_tokens.windows(n) {
            if let Some(place) = gazetteer.lookup(&window.join(" ")) {
                mentioned.insert(place.name);
            }
        }
    }

    for loc in &result.locations {
        let shares_token = tokens(&loc.name)
            .iter()
            .any(|t| significant.contains(t.as_str()));
        let is_alias = gazetteer
            .lookup(&loc.name)
            .is_some_and(|p| mentioned.contains(p.name));
        if !shares_token && !is_alias {
            return Err(ValidationError::Implausible(loc.name.clone()));
        }
    }
    Ok(())
}

pub fn validate(
    query: &str,
    result: &IntentResult,
    gazetteer: &Gazetteer,
) -> Result<(), ValidationError> {
    validate_structure(result)?;
    validate_plausibility(query, result, gazetteer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure() {
        let mut r = IntentResult::route(["Paris", " "]);
        assert_eq!(validate_structure(&r), Err(ValidationError::EmptyName(1)));
        r.locations.clear();
        assert_eq!(validate_structure(&r), Err(ValidationError::NoLocations));
        let mut r = IntentResult::markers(["Paris"]);
        r.confidence = 1.5;
        assert!(matches!(
            validate_structure(&r),
            Err(ValidationError::ConfidenceOutOfRange(_))
        ));
    }

    #[test]
    fn test_plausibility_accepts_aliases() {
        let g = Gazetteer::global();
        let r = IntentResult::route(["New York", "Los Angeles"]);
        assert!(validate_plausibility("nyc to la please", &r, g).is_ok());
    }

    #[test]
    fn test_plausibility_rejects_prompt_echoes() {
        let g = Gazetteer::global();
        let r = IntentResult::route(["Paris", "London"]);
        assert_eq!(
            validate_plausibility("a slow trip around Kyoto temples", &r, g),
            Err(ValidationError::Implausible("Paris".into()))
        );
    }
}
