// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use directories::ProjectDirs;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// User-editable vocabulary behind the extractor and clarifier heuristics.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NlpRulesConfig {
    pub historical_terms: Vec<String>,
    pub touristic_terms: Vec<String>,
    pub route_keywords: Vec<String>,
    pub region_terms: Vec<String>,
    pub timeline_terms: Vec<String>,
    pub sea_terms: Vec<String>,
    /// Leading verbs that make a query's intent unclear ("show" is exempt).
    pub generic_verbs: Vec<String>,
    /// Names shorter than four characters that are still unambiguous.
    pub known_short_names: Vec<String>,
    /// Lower-case toponym -> alternatives offered when it shows up alone.
    #[serde(default)]
    pub ambiguous_toponyms: BTreeMap<String, Vec<String>>,
    #[serde(default = "default_complex_word_count")]
    pub complex_word_count: usize,
    #[serde(default = "default_long_input_chars")]
    pub long_input_chars: usize,
    /// Schema version for migration. Increment when the default vocabulary changes.
    #[serde(default)]
    pub schema_version: u32,
}

/// Files with a lower version get their vocabulary lists reset on load.
pub const CURRENT_SCHEMA_VERSION: u32 = 3;

fn default_complex_word_count() -> usize {
    8
}

fn default_long_input_chars() -> usize {
    100
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for NlpRulesConfig {
    fn default() -> Self {
        let mut ambiguous_toponyms = BTreeMap::new();
        for (name, alternatives) in [
            ("portland", &["Portland, Oregon", "Portland, Maine"][..]),
            (
                "springfield",
                &[
                    "Springfield, Illinois",
                    "Springfield, Massachusetts",
                    "Springfield, Missouri",
                ][..],
            ),
            ("washington", &["Washington, D.C.", "Washington State"][..]),
            ("york", &["York, England", "York, Pennsylvania"][..]),
            (
                "manchester",
                &["Manchester, England", "Manchester, New Hampshire"][..],
            ),
            ("franklin", &["Franklin, Tennessee", "Franklin, Massachusetts"][..]),
            ("san jose", &["San Jose, California", "San José, Costa Rica"][..]),
            ("san juan", &["San Juan, Puerto Rico", "San Juan, Argentina"][..]),
            (
                "georgetown",
                &[
                    "Georgetown, Washington D.C.",
                    "Georgetown, Guyana",
                    "George Town, Malaysia",
                ][..],
            ),
        ] {
            ambiguous_toponyms.insert(name.to_string(), strings(alternatives));
        }

        Self {
            historical_terms: strings(&[
                "ancient",
                "historical",
                "historic",
                "history",
                "empire",
                "kingdom",
                "dynasty",
                "medieval",
                "century",
                "civilization",
                "civilisation",
                "ruins",
                "archaeological",
                "battle",
                "war",
                "pharaoh",
                "heritage",
                "colonial",
                "bce",
                "bc",
            ]),
            touristic_terms: strings(&[
                "sites",
                "places",
                "attractions",
                "landmarks",
                "sights",
                "sightseeing",
                "things to do",
                "things to see",
                "must see",
                "museums",
                "famous",
                "popular",
                "visit",
                "explore",
                "tour",
                "best",
            ]),
            route_keywords: strings(&[
                "route",
                "directions",
                "drive",
                "driving",
                "road trip",
                "itinerary",
                "journey",
                "navigate",
                "get from",
                "travel from",
                "how do i get",
            ]),
            region_terms: strings(&[
                "region",
                "area",
                "territory",
                "extent",
                "spanning",
                "across",
                "covering",
                "borders",
                "boundary",
                "boundaries",
                "empire",
                "kingdom",
            ]),
            timeline_terms: strings(&[
                "timeline",
                "chronological",
                "chronologically",
                "chronology",
                "over time",
                "through history",
                "history of",
                "evolution",
                "in order of",
            ]),
            sea_terms: strings(&["sea", "ship", "ferry", "boat", "cruise", "sail", "sailing"]),
            generic_verbs: strings(&[
                "go", "get", "find", "take", "make", "do", "give", "tell", "help", "plan", "look",
            ]),
            known_short_names: strings(&[
                "nyc", "la", "dc", "sf", "rio", "kl", "uk", "usa", "nz", "ur",
            ]),
            ambiguous_toponyms,
            complex_word_count: default_complex_word_count(),
            long_input_chars: default_long_input_chars(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }
}

/// Compiled view of an [`NlpRulesConfig`], plus where it lives on disk.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub config: Arc<NlpRulesConfig>,
    config_path: Option<PathBuf>,
    historical: Option<Regex>,
    touristic: Option<Regex>,
    route: Option<Regex>,
    region: Option<Regex>,
    timeline: Option<Regex>,
    sea: Option<Regex>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::from_config(NlpRulesConfig::default())
    }
}

impl Vocabulary {
    /// Built-in vocabulary, not tied to any file.
    pub fn from_config(config: NlpRulesConfig) -> Self {
        Self {
            historical: build_matcher(&config.historical_terms),
            touristic: build_matcher(&config.touristic_terms),
            route: build_matcher(&config.route_keywords),
            region: build_matcher(&config.region_terms),
            timeline: build_matcher(&config.timeline_terms),
            sea: build_matcher(&config.sea_terms),
            config: Arc::new(config),
            config_path: None,
        }
    }

    /// Loads `nlp_rules.json` from the user config directory, or defaults.
    pub fn load() -> Self {
        Self::at_path(Self::get_config_path())
    }

    pub fn at_path(path: PathBuf) -> Self {
        let config = load_config(&path).unwrap_or_else(|e| {
            log::warn!("[Vocabulary] Falling back to defaults: {:#}", e);
            NlpRulesConfig::default()
        });
        let mut vocab = Self::from_config(config);
        vocab.config_path = Some(path);
        vocab
    }

    fn get_config_path() -> PathBuf {
        ProjectDirs::from("org", "geoprompt", "geoprompt")
            .map(|dirs| dirs.config_dir().join("nlp_rules.json"))
            .unwrap_or_else(|| PathBuf::from("nlp_rules.json"))
    }

    pub fn update_config(&mut self, config: NlpRulesConfig) {
        let path = self.config_path.take();
        *self = Self::from_config(config);
        self.config_path = path;
    }

    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.config_path else {
            anyhow::bail!("vocabulary has no backing file");
        };
        log::debug!("[Vocabulary] Saving rules to {:?}", path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config dir {:?}", parent))?;
        }
        let content = serde_json::to_string_pretty(self.config.as_ref())?;
        fs::write(path, content).with_context(|| format!("writing {:?}", path))?;
        Ok(())
    }

    pub fn reset_defaults(&mut self) -> Result<()> {
        self.update_config(NlpRulesConfig::default());
        self.save()
    }

    pub fn mentions_historical(&self, text: &str) -> bool {
        matches(&self.historical, text)
    }

    pub fn mentions_touristic(&self, text: &str) -> bool {
        matches(&self.touristic, text)
    }

    pub fn has_route_keyword(&self, text: &str) -> bool {
        matches(&self.route, text)
    }

    pub fn mentions_region(&self, text: &str) -> bool {
        matches(&self.region, text)
    }

    pub fn mentions_timeline(&self, text: &str) -> bool {
        matches(&self.timeline, text)
    }

    pub fn mentions_sea(&self, text: &str) -> bool {
        matches(&self.sea, text)
    }

    pub fn is_generic_verb(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.config.generic_verbs.iter().any(|v| *v == word)
    }

    pub fn is_known_short_name(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        self.config.known_short_names.iter().any(|n| *n == name)
    }

    pub fn alternatives_for(&self, name: &str) -> Option<&[String]> {
        self.config
            .ambiguous_toponyms
            .get(&name.trim().to_lowercase())
            .map(|v| v.as_slice())
    }
}

fn build_matcher(terms: &[String]) -> Option<Regex> {
    let alternation = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| regex::escape(t).replace(' ', r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    if alternation.is_empty() {
        return None;
    }
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).ok()
}

fn matches(re: &Option<Regex>, text: &str) -> bool {
    re.as_ref().is_some_and(|r| r.is_match(text))
}

fn load_config(path: &Path) -> Result<NlpRulesConfig> {
    if !path.exists() {
        log::debug!("[Vocabulary] No rules file at {:?}, using defaults", path);
        return Ok(NlpRulesConfig::default());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let mut config: NlpRulesConfig = serde_json::from_str(&content).map_err(|e| {
        log::error!("[Vocabulary] JSON parse error for {:?}: {}", path, e);
        e
    })?;

    if config.schema_version < CURRENT_SCHEMA_VERSION {
        log::info!(
            "[Vocabulary] Migrating nlp_rules.json from schema v{} to v{}",
            config.schema_version,
            CURRENT_SCHEMA_VERSION
        );
        // Vocabulary lists are reset; toponyms the user added survive.
        let user_toponyms = std::mem::take(&mut config.ambiguous_toponyms);
        let mut migrated = NlpRulesConfig::default();
        for (name, alternatives) in user_toponyms {
            migrated.ambiguous_toponyms.entry(name).or_insert(alternatives);
        }
        config = migrated;

        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let _ = fs::write(
            path,
            serde_json::to_string_pretty(&config).unwrap_or_default(),
        );
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matchers_respect_word_boundaries() {
        let v = Vocabulary::default();
        assert!(v.mentions_historical("Historical sites in ancient Rome"));
        assert!(!v.mentions_historical("a warm day"));
        assert!(v.has_route_keyword("Directions from Paris to Lyon"));
        assert!(v.mentions_touristic("things to  do in Kyoto"));
        assert!(v.mentions_sea("by ferry please"));
    }

    #[test]
    fn test_alternatives_lookup_is_case_insensitive() {
        let v = Vocabulary::default();
        assert_eq!(v.alternatives_for("PORTLAND").unwrap().len(), 2);
        assert!(v.alternatives_for("Paris").is_none());
    }

    #[test]
    fn test_outdated_schema_is_migrated_and_resaved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nlp_rules.json");
        let mut old = NlpRulesConfig::default();
        old.schema_version = 1;
        old.historical_terms = vec!["zzz".into()];
        old.ambiguous_toponyms
            .insert("paris".into(), vec!["Paris, Texas".into()]);
        fs::write(&path, serde_json::to_string(&old).unwrap()).unwrap();

        let v = Vocabulary::at_path(path.clone());
        assert_eq!(v.config.schema_version, CURRENT_SCHEMA_VERSION);
        assert!(v.mentions_historical("ancient"));
        assert!(v.alternatives_for("paris").is_some());

        let saved: NlpRulesConfig =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.schema_version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_save_round_trips_user_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("nlp_rules.json");
        let mut v = Vocabulary::at_path(path.clone());
        let mut config = (*v.config).clone();
        config.sea_terms.push("hovercraft".into());
        v.update_config(config);
        v.save().unwrap();

        let reloaded = Vocabulary::at_path(path);
        assert!(reloaded.mentions_sea("by hovercraft"));
    }
}
