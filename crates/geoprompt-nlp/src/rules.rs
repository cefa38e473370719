// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! The ordered rule table behind [`crate::extractor::PatternExtractor`].
//!
//! Each rule sees the prepared query and either claims it with a result or
//! declines. Rules run in ascending priority; the first claim wins.

use crate::config::Vocabulary;
use crate::gazetteer::{continent_of, Gazetteer};
use crate::intent::{IntentResult, IntentType, Location, VisualizationType};
use crate::timeline::find_time_mention;
use regex::Regex;
use std::sync::OnceLock;

/// What a rule handler sees.
pub struct RuleContext<'a> {
    /// The query as typed.
    pub raw: &'a str,
    /// Trimmed, whitespace-collapsed, trailing sentence punctuation removed.
    pub text: String,
    pub vocab: &'a Vocabulary,
    pub gazetteer: &'a Gazetteer,
}

impl<'a> RuleContext<'a> {
    pub fn new(raw: &'a str, vocab: &'a Vocabulary, gazetteer: &'a Gazetteer) -> Self {
        Self {
            raw,
            text: prepare(raw),
            vocab,
            gazetteer,
        }
    }
}

pub type RuleHandler = fn(&RuleContext<'_>) -> Option<IntentResult>;

#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub priority: u8,
    /// Fast rules are cheap and specific; the remote classifier only runs
    /// after all of them decline.
    pub fast: bool,
    pub handler: RuleHandler,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("fast", &self.fast)
            .finish()
    }
}

pub static RULES: &[Rule] = &[
    Rule {
        name: "intercontinental_pair",
        priority: 1,
        fast: true,
        handler: intercontinental_pair,
    },
    Rule {
        name: "from_to_chain",
        priority: 2,
        fast: true,
        handler: from_to_chain,
    },
    Rule {
        name: "route_keyword",
        priority: 3,
        fast: true,
        handler: route_keyword,
    },
    Rule {
        name: "bare_to",
        priority: 4,
        fast: true,
        handler: bare_to,
    },
    Rule {
        name: "show_me_list",
        priority: 5,
        fast: true,
        handler: show_me_list,
    },
    Rule {
        name: "informational",
        priority: 6,
        fast: true,
        handler: informational,
    },
    Rule {
        name: "scrape",
        priority: 7,
        fast: false,
        handler: scrape,
    },
];

/// Cities the intercontinental shortcut recognises. Each must resolve in
/// the gazetteer.
pub const HUB_CITIES: &[&str] = &[
    "new york",
    "nyc",
    "los angeles",
    "san francisco",
    "chicago",
    "miami",
    "toronto",
    "mexico city",
    "london",
    "paris",
    "rome",
    "berlin",
    "madrid",
    "amsterdam",
    "istanbul",
    "moscow",
    "tokyo",
    "beijing",
    "shanghai",
    "hong kong",
    "singapore",
    "seoul",
    "bangkok",
    "mumbai",
    "delhi",
    "dubai",
    "cairo",
    "nairobi",
    "johannesburg",
    "cape town",
    "sydney",
    "melbourne",
    "auckland",
    "rio de janeiro",
    "rio",
    "sao paulo",
    "são paulo",
    "buenos aires",
    "lima",
];

const PLACE_STOPWORDS: &[&str] = &[
    "i", "me", "my", "we", "us", "you", "it", "this", "that", "there", "want", "need", "how",
    "what", "where", "when", "why", "things", "stuff", "places", "going", "like", "would",
    "could", "should", "is", "are", "was", "have", "has", "had", "able", "due", "next", "close",
    "back", "up", "down", "way", "listen", "talk", "according", "compared", "used", "set",
];

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

/// Trim, collapse whitespace and drop trailing sentence punctuation.
pub fn prepare(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | ';' | ':'))
        .trim()
        .to_string()
}

/// Cuts travel modifiers off the end of a waypoint or query:
/// "Rome by train" -> "Rome", "Lyon avoiding tolls" -> "Lyon".
pub fn strip_modifiers(text: &str) -> String {
    static MODIFIER_RE: OnceLock<Regex> = OnceLock::new();
    let re = MODIFIER_RE.get_or_init(|| {
        Regex::new(
            r"(?i)(?:,\s*|\s+)(?:by|using|with|avoiding|avoid|for|taking|while|please|during|this|next|today|tomorrow|tonight|on\s+foot|in\s+(?:a|an|the|my)\s|(?:the\s+)?(?:scenic|fastest|quickest|shortest)\b|along\s+the\s+coast)\b.*$",
        )
        .unwrap()
    });
    re.replace(text.trim(), "").trim().to_string()
}

/// Removes leading and trailing list glue ("and", "then", commas).
fn trim_connectors(text: &str) -> String {
    static LEAD_RE: OnceLock<Regex> = OnceLock::new();
    static TAIL_RE: OnceLock<Regex> = OnceLock::new();
    let lead = LEAD_RE
        .get_or_init(|| Regex::new(r"(?i)^(?:\s|,|;|&|\band\b|\bthen\b|\bfinally\b)+").unwrap());
    let tail = TAIL_RE.get_or_init(|| {
        Regex::new(r"(?i)(?:\s|,|;|&|[.!?:]|\band|\bthen|\bfinally)+$").unwrap()
    });
    let s = lead.replace(text, "");
    tail.replace(&s, "").trim().to_string()
}

fn clean_place(text: &str) -> String {
    trim_connectors(&strip_modifiers(&trim_connectors(text)))
}

/// Like [`strip_modifiers`], but keeps the text when a capitalised word
/// follows the modifier keyword, as in "Weston by Welland".
fn strip_lowercase_modifiers(text: &str) -> String {
    let trimmed = text.trim();
    let stripped = strip_modifiers(trimmed);
    let removed = trimmed.get(stripped.len()..).unwrap_or_default();
    let names_a_place = removed
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|w| !w.is_empty())
        .skip(1)
        .any(|w| w.chars().next().is_some_and(char::is_uppercase));
    if names_a_place {
        trimmed.to_string()
    } else {
        stripped
    }
}

/// Cleans a waypoint that is followed by another one. Travel modifiers
/// only trail the destination, so a capitalised continuation is kept.
fn clean_waypoint(text: &str) -> String {
    trim_connectors(&strip_lowercase_modifiers(&trim_connectors(text)))
}

/// Splits the part of a query after "from" into ordered waypoints.
/// "A to B via C to D" gives [A, C, B, D]; a via on the origin segment
/// follows the origin.
pub fn split_chain(rest: &str) -> Vec<String> {
    static TO_RE: OnceLock<Regex> = OnceLock::new();
    static VIA_RE: OnceLock<Regex> = OnceLock::new();
    let to_re = TO_RE.get_or_init(|| Regex::new(r"(?i)\s*\bto\b\s*").unwrap());
    let via_re = VIA_RE.get_or_init(|| Regex::new(r"(?i)\s+\bvia\b\s+").unwrap());

    let segments: Vec<&str> = to_re.split(rest).collect();
    let last = segments.len().saturating_sub(1);
    let mut names = Vec::new();
    for (i, segment) in segments.into_iter().enumerate() {
        let segment = if i == last {
            clean_place(segment)
        } else {
            clean_waypoint(segment)
        };
        if segment.is_empty() {
            continue;
        }
        let mut parts = via_re.split(&segment);
        let head = parts.next().map(trim_connectors).unwrap_or_default();
        let vias: Vec<String> = parts
            .flat_map(split_list)
            .filter(|v| !v.is_empty())
            .collect();
        if i == 0 {
            if !head.is_empty() {
                names.push(head);
            }
            names.extend(vias);
        } else {
            names.extend(vias);
            if !head.is_empty() {
                names.push(head);
            }
        }
    }
    names
}

/// Splits "A, B and C" / "A & B then C" into items.
pub fn split_list(text: &str) -> Vec<String> {
    static LIST_RE: OnceLock<Regex> = OnceLock::new();
    let re = LIST_RE.get_or_init(|| {
        Regex::new(r"(?i)\s*(?:,|;|&|\band\b|\bthen\b|\bto\b)\s*").unwrap()
    });
    re.split(text)
        .map(clean_place)
        .filter(|s| !s.is_empty())
        .collect()
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Whether a bare fragment plausibly names a place rather than prose.
fn looks_like_place(fragment: &str, gazetteer: &Gazetteer) -> bool {
    if fragment.is_empty() {
        return false;
    }
    if gazetteer.is_known(fragment) {
        return true;
    }
    let raw: Vec<&str> = fragment
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();
    if raw.is_empty() || raw.len() > 4 {
        return false;
    }
    let is_stopword = |w: &str| PLACE_STOPWORDS.contains(&w.to_lowercase().as_str());
    // "Up Holland", "Back Bay": capitalised names may contain stopwords.
    let capitalised = raw
        .iter()
        .all(|w| w.chars().next().is_some_and(char::is_uppercase));
    if capitalised {
        return !raw.iter().all(|w| is_stopword(w));
    }
    !raw.iter().any(|w| is_stopword(w))
}

fn has_show_prefix(text: &str) -> bool {
    static SHOW_RE: OnceLock<Regex> = OnceLock::new();
    let re = SHOW_RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:(?:please|can\s+you|could\s+you)\s+)*show\b").unwrap()
    });
    re.is_match(text)
}

fn informational_regexes() -> &'static [Regex] {
    static INFO_RES: OnceLock<Vec<Regex>> = OnceLock::new();
    INFO_RES.get_or_init(|| {
        [
            r"(?i)\b((?:historical|historic|popular|famous|best|top|interesting|notable|main|must[- ]see|tourist|cultural|ancient|religious)\s+(?:sites|places|spots|attractions|landmarks|sights|monuments|buildings|museums|destinations|ruins|temples))\s+(?:in|of|around|near|at)\s+(.+)$",
            r"(?i)\b((?:things|stuff)\s+to\s+(?:do|see|visit))\s+(?:in|at|around|near)\s+(.+)$",
            r"(?i)\b(places\s+to\s+(?:visit|see|go|eat|stay))\s+(?:in|at|around|near)\s+(.+)$",
            r"(?i)\b(what(?:'s|\s+is|\s+can\s+i\s+(?:do|see))\s+(?:there\s+)?(?:to\s+(?:do|see)\s+)?)in\s+(.+)$",
            r"(?i)^(?:(?:i\s+want\s+to|i'd\s+like\s+to|i\s+would\s+like\s+to|let's|lets|we\s+want\s+to)\s+)?(visit|explore|tour|discover|sightsee\s+in)\s+(.+)$",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    })
}

/// Descriptor and location of an informational phrase, if any.
fn match_informational(text: &str) -> Option<(String, String)> {
    informational_regexes().iter().find_map(|re| {
        let caps = re.captures(text)?;
        let descriptor = caps.get(1)?.as_str().trim().to_lowercase();
        let place = clean_place(caps.get(2)?.as_str());
        (!place.is_empty()).then_some((descriptor, place))
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn intercontinental_pair(ctx: &RuleContext<'_>) -> Option<IntentResult> {
    static PAIR_RE: OnceLock<Regex> = OnceLock::new();
    let re = PAIR_RE.get_or_init(|| {
        let hubs = HUB_CITIES
            .iter()
            .map(|h| regex::escape(h).replace(' ', r"\s+"))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(
            r"(?i)^(?:(?:fly|flight|flights|flying|travel|go|trip|route)\s+)?(?:from\s+)?({hubs})\s+to\s+({hubs})$"
        ))
        .unwrap()
    });

    let core = strip_modifiers(&ctx.text);
    let caps = re.captures(&core)?;
    let (a, b) = (caps[1].to_string(), caps[2].to_string());
    let pa = ctx.gazetteer.lookup(&a)?;
    let pb = ctx.gazetteer.lookup(&b)?;
    let ca = continent_of(pa.coordinates())?;
    let cb = continent_of(pb.coordinates())?;
    if ca == cb {
        return None;
    }

    let locations = vec![
        Location::named(a.as_str()).with_coordinates(pa.coordinates()),
        Location::named(b.as_str()).with_coordinates(pb.coordinates()),
    ];
    Some(
        IntentResult::new(IntentType::Route, locations, VisualizationType::Route)
            .with_message(format!("Intercontinental route from {} to {}", a, b)),
    )
}

fn from_to_chain(ctx: &RuleContext<'_>) -> Option<IntentResult> {
    static FROM_RE: OnceLock<Regex> = OnceLock::new();
    let re = FROM_RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:.*?\b(?:get|go|travel|drive|walk|cycle|bike|ride|fly|head|navigate|sail|commute|ferry|cruise|boat|train|bus|flight|flights|take\s+me|get\s+me)\s+)?from\s+(.+)$",
        )
        .unwrap()
    });
    let caps = re.captures(&ctx.text)?;
    let names = split_chain(caps.get(1)?.as_str());
    if names.len() < 2 {
        return None;
    }
    let message = format!("Route from {} to {}", names[0], names[names.len() - 1]);
    Some(IntentResult::route(names).with_message(message))
}

fn route_keyword(ctx: &RuleContext<'_>) -> Option<IntentResult> {
    static ROUTE_RE: OnceLock<Regex> = OnceLock::new();
    let re = ROUTE_RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:route|routes|directions|path|way|journey|trip|drive|itinerary)\s+from\s+(.+)$",
        )
        .unwrap()
    });
    let caps = re.captures(&ctx.text)?;
    let names = split_chain(caps.get(1)?.as_str());
    if names.len() < 2 {
        return None;
    }
    let message = format!("Route from {} to {}", names[0], names[names.len() - 1]);
    Some(IntentResult::route(names).with_message(message))
}

fn bare_to(ctx: &RuleContext<'_>) -> Option<IntentResult> {
    if has_show_prefix(&ctx.text) || match_informational(&ctx.text).is_some() {
        return None;
    }
    static LEAD_VERB_RE: OnceLock<Regex> = OnceLock::new();
    let lead_verb = LEAD_VERB_RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:please\s+)?(?:(?:drive|fly|go|travel|walk|cycle|bike|ride|head|sail|navigate|take\s+me|get\s+me)\s+)?(?:from\s+)?",
        )
        .unwrap()
    });
    let text = lead_verb.replace(&ctx.text, "");

    static TO_RE: OnceLock<Regex> = OnceLock::new();
    let to_re = TO_RE.get_or_init(|| Regex::new(r"(?i)\bto\b").unwrap());
    // Modifiers follow the destination, so only the part after the first
    // "to" is stripped.
    let first_to = to_re.find(&text)?;
    let tail = strip_modifiers(&text[first_to.end()..]);
    let core = format!("{} to {}", text[..first_to.start()].trim(), tail);
    let sides: Vec<&str> = to_re.split(&core).collect();
    if sides.len() < 2 || sides.iter().any(|s| word_count(s) > 12) {
        return None;
    }

    let names = split_chain(&core);
    if names.len() < 2 || !names.iter().all(|n| looks_like_place(n, ctx.gazetteer)) {
        return None;
    }
    let message = format!("Route from {} to {}", names[0], names[names.len() - 1]);
    Some(IntentResult::route(names).with_message(message))
}

// Leftovers of an unfinished "show me ..." that are not places.
const SHOW_FILLER: &[&str] = &[
    "me", "us", "it", "them", "this", "that", "these", "those", "here", "there", "from", "to",
    "and", "the", "a", "an", "where", "map", "more",
];

fn show_me_list(ctx: &RuleContext<'_>) -> Option<IntentResult> {
    static SHOW_RE: OnceLock<Regex> = OnceLock::new();
    let re = SHOW_RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:(?:please|can\s+you|could\s+you)\s+)*show\s+(?:me\s+|us\s+)?(?:(?:a\s+|the\s+)?map\s+of\s+|(?:the\s+)?locations?\s+of\s+|where\s+)?(.+)$",
        )
        .unwrap()
    });
    let caps = re.captures(&ctx.text)?;
    let remainder = caps.get(1)?.as_str();
    if match_informational(remainder).is_some() {
        return None;
    }

    static FROM_RE: OnceLock<Regex> = OnceLock::new();
    let from_re = FROM_RE.get_or_init(|| Regex::new(r"(?i)\bfrom\s+(.+)$").unwrap());
    let mut names = match from_re.captures(remainder) {
        Some(caps) => split_chain(&caps[1]),
        None => split_list(remainder),
    };
    names.retain(|n| !SHOW_FILLER.contains(&n.to_lowercase().as_str()));
    if names.is_empty() {
        return None;
    }

    let mut result = if names.len() == 1 {
        IntentResult::markers(names.clone())
            .with_message(format!("Showing {}", names[0]))
    } else {
        let locations = names.iter().map(Location::named).collect();
        IntentResult::new(IntentType::Route, locations, VisualizationType::Sequence)
            .with_message(format!("Showing {} places in the order given", names.len()))
    };
    result.suggested_sequence = Some(names);
    result.skip_clarification = true;
    Some(result)
}

fn informational(ctx: &RuleContext<'_>) -> Option<IntentResult> {
    let (descriptor, place) = match_informational(&ctx.text)?;

    let items = split_list(&place);
    let names: Vec<String> = if items.len() > 1 && items.iter().all(|i| ctx.gazetteer.is_known(i))
    {
        items
    } else {
        vec![place]
    };

    let locations: Vec<Location> = names
        .iter()
        .map(|n| {
            let name = ctx
                .gazetteer
                .lookup(n)
                .map(|p| p.name.to_string())
                .unwrap_or_else(|| n.clone());
            let mut loc = Location::named(name);
            loc.descriptive_context = Some(descriptor.clone());
            loc
        })
        .collect();

    let message = format!(
        "Showing {} for {}",
        descriptor,
        locations
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Some(
        IntentResult::new(IntentType::Locations, locations, VisualizationType::Markers)
            .with_message(message),
    )
}

const NOT_PLACES: &[&str] = &[
    "I", "The", "My", "Our", "A", "An", "This", "That", "Monday", "Tuesday", "Wednesday",
    "Thursday", "Friday", "Saturday", "Sunday", "January", "February", "March", "April", "May",
    "June", "July", "August", "September", "October", "November", "December", "Christmas",
    "Easter", "Show", "Route",
];

fn scrape(ctx: &RuleContext<'_>) -> Option<IntentResult> {
    let text = ctx.raw.trim();

    let mut found: Vec<(usize, usize, String)> = ctx
        .gazetteer
        .scan(text)
        .into_iter()
        .map(|h| (h.start, h.end, h.matched))
        .collect();

    static CAPITAL_RE: OnceLock<Regex> = OnceLock::new();
    let capital_re = CAPITAL_RE.get_or_init(|| {
        Regex::new(
            r"\b(?i:in|at|to|from|near|visit|visiting|through|via|between|and|around)\s+(\p{Lu}[\p{L}'\-]+(?:\s+(?:(?:de|da|del|la|le|of|upon|on)\s+)?\p{Lu}[\p{L}'\-]+)*)",
        )
        .unwrap()
    });
    for caps in capital_re.captures_iter(text) {
        let Some(m) = caps.get(1) else { continue };
        let overlaps = found
            .iter()
            .any(|(s, e, _)| m.start() < *e && *s < m.end());
        if overlaps || NOT_PLACES.contains(&m.as_str()) {
            continue;
        }
        found.push((m.start(), m.end(), m.as_str().to_string()));
    }
    if found.is_empty() {
        return None;
    }
    found.sort_by_key(|(start, _, _)| *start);

    let mut locations: Vec<Location> = Vec::with_capacity(found.len());
    for (i, (start, end, name)) in found.iter().enumerate() {
        let window_end = found.get(i + 1).map(|(s, _, _)| *s).unwrap_or(text.len());
        let mut time = find_time_mention(&text[*end..window_end]);
        if time.is_none() && i == 0 {
            time = find_time_mention(&text[..*start]);
        }
        let mut loc = Location::named(name.as_str());
        if let Some(t) = time {
            loc.time_context = t;
        }
        locations.push(loc);
    }

    let historical = ctx.vocab.mentions_historical(text);
    let timed = locations
        .iter()
        .filter(|l| !l.time_context.is_empty())
        .count();
    let chronological = timed >= 2 || (ctx.vocab.mentions_timeline(text) && locations.len() >= 2);
    let regional = locations.len() >= 3 && ctx.vocab.mentions_region(text);
    let long_historical = text.chars().count() > ctx.vocab.config.long_input_chars
        && historical
        && !ctx.vocab.has_route_keyword(text);

    let count = locations.len();
    let (intent_type, visualization_type) = if regional {
        (IntentType::Locations, VisualizationType::Region)
    } else if chronological {
        (IntentType::Locations, VisualizationType::Timeline)
    } else if long_historical || count == 1 {
        (IntentType::Locations, VisualizationType::Markers)
    } else {
        (IntentType::Route, VisualizationType::Route)
    };

    if historical {
        for loc in locations.iter_mut() {
            if !loc.time_context.is_empty() {
                loc.historical_context = Some(loc.time_context.clone());
            }
        }
    }

    let message = match visualization_type {
        VisualizationType::Region => format!("Showing the region spanned by {} places", count),
        VisualizationType::Timeline => format!("Showing {} places in chronological order", count),
        VisualizationType::Route => format!("Route through {} places found in your text", count),
        _ => format!("Found {} place(s) in your text", count),
    };
    Some(IntentResult::new(intent_type, locations, visualization_type).with_message(message))
}
