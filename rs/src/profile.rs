//! Semantic profiling of gifts and queries
//!
//! Turns free text into a ten-dimension affinity vector (romantic, sustainable,
//! tech, ...). Item profiles come from weighted keyword hits; query profiles
//! come from a fixed rule table over interests, occasion and recipient.

use crate::constants::{
    BUDGET_PRICE_PENALTY, BUDGET_PRICE_THRESHOLD, CATEGORY_MATCH_WEIGHT, DESCRIPTION_MATCH_WEIGHT,
    LUXURY_PRICE_BOOST, LUXURY_PRICE_THRESHOLD, PREMIUM_PRICE_BOOST, PREMIUM_PRICE_THRESHOLD,
    PROFILE_SENSITIVITY, TITLE_MATCH_WEIGHT,
};
use crate::models::Gift;
use crate::price::estimate_price;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One axis of a semantic profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Romantic,
    Sustainable,
    Tech,
    Funny,
    Minimalist,
    Luxury,
    Practical,
    Creative,
    Wellness,
    Experiential,
}

impl Dimension {
    pub const ALL: [Dimension; 10] = [
        Dimension::Romantic,
        Dimension::Sustainable,
        Dimension::Tech,
        Dimension::Funny,
        Dimension::Minimalist,
        Dimension::Luxury,
        Dimension::Practical,
        Dimension::Creative,
        Dimension::Wellness,
        Dimension::Experiential,
    ];

    /// Display name shown next to a result
    pub fn label_name(self) -> &'static str {
        match self {
            Dimension::Romantic => "Romantisch",
            Dimension::Sustainable => "Duurzaam",
            Dimension::Tech => "Tech & Gadgets",
            Dimension::Funny => "Grappig",
            Dimension::Minimalist => "Minimalistisch",
            Dimension::Luxury => "Luxe",
            Dimension::Practical => "Praktisch",
            Dimension::Creative => "Creatief",
            Dimension::Wellness => "Wellness",
            Dimension::Experiential => "Beleving",
        }
    }

    /// Adjective used in sentences ("... in duurzame cadeaus")
    pub fn adjective(self) -> &'static str {
        match self {
            Dimension::Romantic => "romantische",
            Dimension::Sustainable => "duurzame",
            Dimension::Tech => "tech",
            Dimension::Funny => "grappige",
            Dimension::Minimalist => "minimalistische",
            Dimension::Luxury => "luxe",
            Dimension::Practical => "praktische",
            Dimension::Creative => "creatieve",
            Dimension::Wellness => "wellness",
            Dimension::Experiential => "beleving",
        }
    }

    /// Bilingual keywords that signal this dimension
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Dimension::Romantic => &[
                "romantic", "romantisch", "love", "liefde", "valentine", "valentijn", "couple",
                "koppel", "together", "samen", "date", "heart", "hart", "roses", "rozen",
                "chocolade", "chocolate", "champagne", "wine", "wijn",
            ],
            Dimension::Sustainable => &[
                "sustainable", "duurzaam", "eco", "bio", "organic", "biologisch", "recycled",
                "gerecycled", "vegan", "ethical", "eerlijk", "fair trade", "bamboo", "bamboe",
                "natural", "natuurlijk", "green", "groen",
            ],
            Dimension::Tech => &[
                "tech", "smart", "digital", "digitaal", "electronic", "elektronisch", "wireless",
                "draadloos", "bluetooth", "usb", "gadget", "device", "app", "software", "hardware",
                "gaming", "computer", "laptop", "phone",
            ],
            Dimension::Funny => &[
                "funny", "grappig", "humor", "lol", "joke", "grap", "novelty", "quirky", "gekke",
                "bizarre", "silly", "sarcastic", "sarcastisch", "prank", "meme", "comic",
                "cartoon",
            ],
            Dimension::Minimalist => &[
                "minimal", "minimalist", "minimalistisch", "simple", "simpel", "clean", "basic",
                "essentieel", "essential", "sleek", "strak", "modern", "scandinavian",
                "scandinavisch", "japanese", "japans", "zen",
            ],
            Dimension::Luxury => &[
                "luxury", "luxe", "premium", "exclusive", "exclusief", "designer", "high-end",
                "deluxe", "sophisticated", "elegant", "prestigious", "gold", "goud", "silver",
                "zilver", "leather", "leer", "silk", "zijde",
            ],
            Dimension::Practical => &[
                "practical", "praktisch", "useful", "nuttig", "functional", "functioneel", "handy",
                "handig", "versatile", "veelzijdig", "everyday", "dagelijks", "tool", "organize",
                "storage", "opslag",
            ],
            Dimension::Creative => &[
                "creative", "creatief", "art", "kunst", "diy", "craft", "handmade", "handgemaakt",
                "artistic", "artistiek", "design", "drawing", "tekenen", "painting", "schilderen",
                "music", "muziek",
            ],
            Dimension::Wellness => &[
                "wellness", "health", "gezondheid", "fitness", "yoga", "meditation", "meditatie",
                "spa", "massage", "relaxation", "ontspanning", "selfcare", "beauty", "skincare",
                "aromatherapy", "essential oil",
            ],
            Dimension::Experiential => &[
                "experience", "ervaring", "beleving", "activity", "activiteit", "adventure",
                "avontuur", "trip", "reis", "workshop", "course", "cursus", "lesson", "voucher",
                "bon", "ticket", "event", "evenement",
            ],
        }
    }
}

/// Affinity of an item across all ten dimensions, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticProfile {
    pub romantic: f64,
    pub sustainable: f64,
    pub tech: f64,
    pub funny: f64,
    pub minimalist: f64,
    pub luxury: f64,
    pub practical: f64,
    pub creative: f64,
    pub wellness: f64,
    pub experiential: f64,
}

impl SemanticProfile {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Romantic => self.romantic,
            Dimension::Sustainable => self.sustainable,
            Dimension::Tech => self.tech,
            Dimension::Funny => self.funny,
            Dimension::Minimalist => self.minimalist,
            Dimension::Luxury => self.luxury,
            Dimension::Practical => self.practical,
            Dimension::Creative => self.creative,
            Dimension::Wellness => self.wellness,
            Dimension::Experiential => self.experiential,
        }
    }

    /// Set a dimension, clamped to [0, 1]
    pub fn set(&mut self, dimension: Dimension, value: f64) {
        let value = value.clamp(0.0, 1.0);
        let slot = match dimension {
            Dimension::Romantic => &mut self.romantic,
            Dimension::Sustainable => &mut self.sustainable,
            Dimension::Tech => &mut self.tech,
            Dimension::Funny => &mut self.funny,
            Dimension::Minimalist => &mut self.minimalist,
            Dimension::Luxury => &mut self.luxury,
            Dimension::Practical => &mut self.practical,
            Dimension::Creative => &mut self.creative,
            Dimension::Wellness => &mut self.wellness,
            Dimension::Experiential => &mut self.experiential,
        };
        *slot = value;
    }

    /// Add to a dimension, clamped to [0, 1]
    pub fn adjust(&mut self, dimension: Dimension, delta: f64) {
        self.set(dimension, self.get(dimension) + delta);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        Dimension::ALL.into_iter().map(move |dimension| (dimension, self.get(dimension)))
    }

    pub fn magnitude(&self) -> f64 {
        self.iter().map(|(_, value)| value * value).sum::<f64>().sqrt()
    }
}

/// Query-side preferences; dimensions without a rule hit are absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialProfile(BTreeMap<Dimension, f64>);

impl PartialProfile {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, dimension: Dimension) -> Option<f64> {
        self.0.get(&dimension).copied()
    }

    pub fn set(&mut self, dimension: Dimension, value: f64) {
        self.0.insert(dimension, value);
    }

    pub fn add(&mut self, dimension: Dimension, delta: f64) {
        *self.0.entry(dimension).or_insert(0.0) += delta;
    }

    /// Full profile with absent dimensions as 0
    pub fn to_full(&self) -> SemanticProfile {
        let mut full = SemanticProfile::default();
        for (&dimension, &value) in &self.0 {
            full.set(dimension, value);
        }
        full
    }

    fn clamp(&mut self) {
        for value in self.0.values_mut() {
            *value = value.clamp(0.0, 1.0);
        }
    }
}

/// Price thresholds used for the luxury adjustment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceThresholds {
    pub luxury: f64,
    pub premium: f64,
    pub budget: f64,
}

impl Default for PriceThresholds {
    fn default() -> Self {
        Self {
            luxury: LUXURY_PRICE_THRESHOLD,
            premium: PREMIUM_PRICE_THRESHOLD,
            budget: BUDGET_PRICE_THRESHOLD,
        }
    }
}

/// Text fields of an item, each with its own trust weight
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileFields<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub tags: &'a [String],
}

impl<'a> From<&'a Gift> for ProfileFields<'a> {
    fn from(gift: &'a Gift) -> Self {
        Self {
            title: &gift.product_name,
            description: &gift.description,
            category: gift.category.as_deref().unwrap_or_default(),
            tags: &gift.tags,
        }
    }
}

/// Builds semantic profiles for items
#[derive(Debug, Clone, Default)]
pub struct SemanticProfiler {
    thresholds: PriceThresholds,
}

impl SemanticProfiler {
    pub fn new(thresholds: PriceThresholds) -> Self {
        Self { thresholds }
    }

    /// Profile a catalog gift using its estimated price
    pub fn profile_gift(&self, gift: &Gift) -> SemanticProfile {
        self.profile(&ProfileFields::from(gift), estimate_price(&gift.price_range))
    }

    /// Profile arbitrary text fields at the given price
    pub fn profile(&self, fields: &ProfileFields<'_>, price: f64) -> SemanticProfile {
        let title = fields.title.to_lowercase();
        let description = fields.description.to_lowercase();
        let category = fields.category.to_lowercase();
        let tags: Vec<String> = fields.tags.iter().map(|tag| tag.to_lowercase()).collect();

        let mut profile = SemanticProfile::default();
        for dimension in Dimension::ALL {
            let keywords = dimension.keywords();
            let total_weight: f64 = keywords
                .iter()
                .map(|keyword| {
                    if title.contains(keyword) {
                        TITLE_MATCH_WEIGHT
                    } else if category.contains(keyword) || tags.iter().any(|tag| tag.contains(keyword)) {
                        CATEGORY_MATCH_WEIGHT
                    } else if description.contains(keyword) {
                        DESCRIPTION_MATCH_WEIGHT
                    } else {
                        0.0
                    }
                })
                .sum();

            let saturation = keywords.len() as f64 * TITLE_MATCH_WEIGHT * PROFILE_SENSITIVITY;
            profile.set(dimension, total_weight / saturation);
        }

        self.apply_adjustments(&mut profile, price);
        profile
    }

    fn apply_adjustments(&self, profile: &mut SemanticProfile, price: f64) {
        if price > self.thresholds.luxury {
            profile.adjust(Dimension::Luxury, LUXURY_PRICE_BOOST);
        } else if price > self.thresholds.premium {
            profile.adjust(Dimension::Luxury, PREMIUM_PRICE_BOOST);
        }
        if price < self.thresholds.budget && profile.luxury > 0.0 {
            profile.adjust(Dimension::Luxury, -BUDGET_PRICE_PENALTY);
        }

        // Wellness items tend to be sustainable too
        if profile.wellness > 0.5 && profile.sustainable > 0.3 {
            profile.adjust(Dimension::Sustainable, 0.1);
        }
        if profile.tech > 0.5 {
            profile.adjust(Dimension::Practical, 0.2);
        }
    }
}

/// Cosine similarity of two profiles; 0 when either has no magnitude
pub fn similarity(a: &SemanticProfile, b: &SemanticProfile) -> f64 {
    let magnitude_a = a.magnitude();
    let magnitude_b = b.magnitude();
    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|((_, x), (_, y))| x * y).sum();
    dot / (magnitude_a * magnitude_b)
}

/// Dimensions scoring at least `threshold`, strongest first
pub fn top_labels(profile: &SemanticProfile, threshold: f64) -> Vec<Dimension> {
    let mut labels: Vec<(Dimension, f64)> =
        profile.iter().filter(|(_, value)| *value >= threshold).collect();
    labels.sort_by(|a, b| b.1.total_cmp(&a.1));
    labels.into_iter().map(|(dimension, _)| dimension).collect()
}

enum Contribution {
    Add(Dimension, f64),
    Set(Dimension, f64),
}

struct PreferenceRule {
    triggers: &'static [&'static str],
    contributions: &'static [Contribution],
}

const INTEREST_RULES: &[PreferenceRule] = &[
    PreferenceRule {
        triggers: &["tech", "gaming", "gadget"],
        contributions: &[Contribution::Add(Dimension::Tech, 0.4)],
    },
    PreferenceRule {
        triggers: &["duurzaam", "eco", "bio"],
        contributions: &[Contribution::Add(Dimension::Sustainable, 0.4)],
    },
    PreferenceRule {
        triggers: &["wellness", "yoga", "selfcare"],
        contributions: &[Contribution::Add(Dimension::Wellness, 0.4)],
    },
    PreferenceRule {
        triggers: &["koken", "bbq"],
        contributions: &[Contribution::Add(Dimension::Practical, 0.3)],
    },
    PreferenceRule {
        triggers: &["creatief", "kunst", "muziek"],
        contributions: &[Contribution::Add(Dimension::Creative, 0.4)],
    },
    PreferenceRule {
        triggers: &["reizen", "avontuur"],
        contributions: &[Contribution::Add(Dimension::Experiential, 0.4)],
    },
    PreferenceRule {
        triggers: &["mode", "sieraden"],
        contributions: &[Contribution::Add(Dimension::Luxury, 0.2)],
    },
    PreferenceRule {
        triggers: &["sport", "fitness"],
        contributions: &[
            Contribution::Add(Dimension::Practical, 0.3),
            Contribution::Add(Dimension::Wellness, 0.2),
        ],
    },
    PreferenceRule {
        triggers: &["boeken"],
        contributions: &[Contribution::Add(Dimension::Creative, 0.2)],
    },
];

const OCCASION_RULES: &[PreferenceRule] = &[
    PreferenceRule {
        triggers: &["valentijn", "valentine"],
        contributions: &[
            Contribution::Set(Dimension::Romantic, 0.8),
            Contribution::Add(Dimension::Luxury, 0.3),
        ],
    },
    PreferenceRule {
        triggers: &["jubileum", "anniversary"],
        contributions: &[
            Contribution::Add(Dimension::Romantic, 0.5),
            Contribution::Add(Dimension::Luxury, 0.4),
        ],
    },
    PreferenceRule {
        triggers: &["kerst", "christmas"],
        contributions: &[Contribution::Add(Dimension::Luxury, 0.2)],
    },
];

/// Recipient rules match the whole recipient, not a substring
const RECIPIENT_RULES: &[PreferenceRule] = &[
    PreferenceRule {
        triggers: &["partner"],
        contributions: &[Contribution::Add(Dimension::Romantic, 0.3)],
    },
    PreferenceRule {
        triggers: &["collega", "colleague"],
        contributions: &[
            Contribution::Add(Dimension::Practical, 0.3),
            Contribution::Add(Dimension::Funny, 0.2),
        ],
    },
    PreferenceRule {
        triggers: &["kind", "child"],
        contributions: &[
            Contribution::Add(Dimension::Funny, 0.3),
            Contribution::Add(Dimension::Creative, 0.2),
        ],
    },
];

fn apply_rule(profile: &mut PartialProfile, rule: &PreferenceRule) {
    for contribution in rule.contributions {
        match *contribution {
            Contribution::Add(dimension, delta) => profile.add(dimension, delta),
            Contribution::Set(dimension, value) => profile.set(dimension, value),
        }
    }
}

/// Derive the preference profile of a query
///
/// Contributions are additive and only clamped at the end, so several matching
/// rules can saturate a dimension.
pub fn user_profile_from_query(interests: &[String], occasion: &str, recipient: &str) -> PartialProfile {
    let mut profile = PartialProfile::default();

    for interest in interests {
        let interest = interest.to_lowercase();
        for rule in INTEREST_RULES {
            if rule.triggers.iter().any(|trigger| interest.contains(trigger)) {
                apply_rule(&mut profile, rule);
            }
        }
    }

    let occasion = occasion.to_lowercase();
    for rule in OCCASION_RULES {
        if rule.triggers.iter().any(|trigger| occasion.contains(trigger)) {
            apply_rule(&mut profile, rule);
        }
    }

    let recipient = recipient.trim().to_lowercase();
    for rule in RECIPIENT_RULES {
        if rule.triggers.contains(&recipient.as_str()) {
            apply_rule(&mut profile, rule);
        }
    }

    profile.clamp();
    profile
}
