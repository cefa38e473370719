// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod data;

use crate::intent::Coordinates;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceKind {
    City,
    Country,
    Region,
    /// Ancient cities and empires; coordinates are approximate centres.
    Historical,
    Landmark,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: &'static str,
    /// Lower-case alternative spellings. The lower-cased `name` is always a key too.
    pub aliases: &'static [&'static str],
    pub lat: f64,
    pub lon: f64,
    pub kind: PlaceKind,
    /// Sea legs are only drawn between coastal places.
    pub coastal: bool,
}

impl Place {
    pub fn coordinates(&self) -> Coordinates {
        [self.lon, self.lat]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Continent {
    Europe,
    Asia,
    Africa,
    NorthAmerica,
    SouthAmerica,
    Oceania,
}

// Checked in order; the boxes overlap around the Mediterranean, so the
// Middle East box sits between Europe and Africa and counts as Asia.
const CONTINENT_BOXES: &[(Continent, BoundingBox)] = &[
    (Continent::Europe, BoundingBox::new(34.0, 72.0, -25.0, 45.0)),
    (Continent::Asia, BoundingBox::new(12.0, 42.0, 34.0, 63.0)),
    (Continent::Africa, BoundingBox::new(-35.0, 38.0, -18.0, 52.0)),
    (
        Continent::NorthAmerica,
        BoundingBox::new(7.0, 84.0, -170.0, -52.0),
    ),
    (
        Continent::SouthAmerica,
        BoundingBox::new(-56.0, 13.5, -82.0, -34.0),
    ),
    (Continent::Oceania, BoundingBox::new(-47.5, 0.0, 110.0, 180.0)),
    (Continent::Asia, BoundingBox::new(-11.0, 82.0, 25.0, 180.0)),
];

/// Coarse continent classification for `[lon, lat]`. Open ocean and the
/// poles classify as `None`.
pub fn continent_of(coords: Coordinates) -> Option<Continent> {
    let [lon, lat] = coords;
    CONTINENT_BOXES
        .iter()
        .find(|(_, b)| b.contains(lat, lon))
        .map(|(c, _)| *c)
}

/// Lower-case, drop commas and a leading "the", collapse whitespace.
pub fn normalize(name: &str) -> String {
    let lower = name.to_lowercase().replace(',', " ");
    let collapsed = lower.split_whitespace().collect::<Vec<_>>().join(" ");
    match collapsed.strip_prefix("the ") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => collapsed,
    }
}

// Place names that are also ordinary English words. The scanner only takes
// them when written with a capital letter.
const COMMON_WORD_NAMES: &[&str] = &[
    "nice", "split", "turkey", "phoenix", "charlotte", "austin", "sofia", "reading",
];

/// A place mention found by [`Gazetteer::scan`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScanHit {
    pub place: &'static Place,
    /// The text as written in the input.
    pub matched: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug)]
pub struct Gazetteer {
    places: &'static [Place],
    index: HashMap<String, usize>,
    scanner: Option<Regex>,
}

static GLOBAL: OnceLock<Gazetteer> = OnceLock::new();

impl Gazetteer {
    /// Shared instance over the built-in table; the index is built once.
    pub fn global() -> &'static Gazetteer {
        GLOBAL.get_or_init(|| Gazetteer::new(data::PLACES))
    }

    pub fn new(places: &'static [Place]) -> Self {
        let mut index = HashMap::new();
        for (i, place) in places.iter().enumerate() {
            index.entry(normalize(place.name)).or_insert(i);
            for alias in place.aliases {
                index.entry(normalize(alias)).or_insert(i);
            }
        }

        // Longest keys first so "new york city" wins over "york".
        let mut keys: Vec<&String> = index
            .keys()
            .filter(|k| {
                k.chars().count() >= 3
                    && k.chars().next().is_some_and(char::is_alphanumeric)
                    && k.chars().last().is_some_and(char::is_alphanumeric)
            })
            .collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let scanner = if keys.is_empty() {
            None
        } else {
            let alternation = keys
                .iter()
                .map(|k| regex::escape(k).replace("\\ ", " ").replace(' ', r"\s+"))
                .collect::<Vec<_>>()
                .join("|");
            match Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)) {
                Ok(re) => Some(re),
                Err(e) => {
                    log::warn!("[Gazetteer] Scanner disabled: {}", e);
                    None
                }
            }
        };

        log::debug!(
            "[Gazetteer] Indexed {} places under {} keys",
            places.len(),
            index.len()
        );

        Self {
            places,
            index,
            scanner,
        }
    }

    pub fn places(&self) -> &'static [Place] {
        self.places
    }

    /// Exact match on the normalized name or any alias.
    pub fn lookup(&self, name: &str) -> Option<&'static Place> {
        let places = self.places;
        self.index.get(&normalize(name)).map(|&i| &places[i])
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// First word longer than three characters that is itself a known key,
    /// e.g. "downtown Chicago" or "Paris in spring".
    pub fn partial_word(&self, name: &str) -> Option<&'static Place> {
        normalize(name)
            .split(' ')
            .filter(|w| w.chars().count() > 3)
            .find_map(|w| self.lookup(w))
    }

    /// Last-resort match on the first five characters, for misspellings
    /// like "Barcelonna". Table order breaks ties.
    pub fn fuzzy_prefix(&self, name: &str) -> Option<&'static Place> {
        let key = normalize(name);
        let prefix: String = key.chars().take(5).collect();
        if prefix.chars().count() < 5 {
            return None;
        }
        self.places.iter().find(|p| {
            std::iter::once(p.name)
                .chain(p.aliases.iter().copied())
                .any(|k| normalize(k).starts_with(&prefix))
        })
    }

    /// All known place mentions in `text`, left to right, without overlaps.
    pub fn scan(&self, text: &str) -> Vec<ScanHit> {
        let Some(scanner) = &self.scanner else {
            return Vec::new();
        };
        let mut hits: Vec<ScanHit> = Vec::new();
        for m in scanner.find_iter(text) {
            let matched = m.as_str();
            let key = normalize(matched);
            if COMMON_WORD_NAMES.contains(&key.as_str())
                && matched.chars().next().is_some_and(char::is_lowercase)
            {
                continue;
            }
            let Some(place) = self.lookup(&key) else {
                continue;
            };
            if hits.iter().any(|h| std::ptr::eq(h.place, place)) {
                continue;
            }
            hits.push(ScanHit {
                place,
                matched: matched.to_string(),
                start: m.start(),
                end: m.end(),
            });
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_returns_lon_lat() {
        let g = Gazetteer::global();
        assert_eq!(g.lookup("Paris").unwrap().coordinates(), [2.3522, 48.8566]);
        assert_eq!(
            g.lookup("  LONDON ").unwrap().coordinates(),
            [-0.1278, 51.5074]
        );
    }

    #[test]
    fn test_lookup_aliases_and_articles() {
        let g = Gazetteer::global();
        assert_eq!(g.lookup("NYC").unwrap().name, "New York");
        assert_eq!(g.lookup("ancient rome").unwrap().name, "Ancient Rome");
        assert_eq!(g.lookup("the Roman Empire").unwrap().name, "Ancient Rome");
        assert_eq!(g.lookup("Paris, France").unwrap().name, "Paris");
    }

    #[test]
    fn test_partial_word_skips_short_words() {
        let g = Gazetteer::global();
        assert_eq!(g.partial_word("downtown Chicago").unwrap().name, "Chicago");
        assert!(g.partial_word("in la").is_none());
    }

    #[test]
    fn test_fuzzy_prefix() {
        let g = Gazetteer::global();
        assert_eq!(g.fuzzy_prefix("Barcelonna").unwrap().name, "Barcelona");
        assert!(g.fuzzy_prefix("Bar").is_none());
    }

    #[test]
    fn test_scan_prefers_longest_name() {
        let g = Gazetteer::global();
        let hits = g.scan("Trip through New York City, then York and Edinburgh");
        let names: Vec<_> = hits.iter().map(|h| h.place.name).collect();
        assert_eq!(names, vec!["New York", "York", "Edinburgh"]);
        assert_eq!(hits[0].matched, "New York City");
    }

    #[test]
    fn test_scan_ignores_lowercase_common_words() {
        let g = Gazetteer::global();
        let hits = g.scan("a nice day to split the bill in Nice");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].matched, "Nice");
    }

    #[test]
    fn test_continents() {
        let g = Gazetteer::global();
        let c = |n: &str| continent_of(g.lookup(n).unwrap().coordinates());
        assert_eq!(c("Paris"), Some(Continent::Europe));
        assert_eq!(c("Cairo"), Some(Continent::Africa));
        assert_eq!(c("Dubai"), Some(Continent::Asia));
        assert_eq!(c("Tokyo"), Some(Continent::Asia));
        assert_eq!(c("Sydney"), Some(Continent::Oceania));
        assert_eq!(c("New York"), Some(Continent::NorthAmerica));
        assert_eq!(c("Lima"), Some(Continent::SouthAmerica));
        assert_eq!(continent_of([-30.0, 0.0]), None);
    }
}
