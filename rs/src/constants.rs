//! Tunable constants for the gift scoring engine
//!
//! These are the defaults behind `EngineConfig::default()`. A TOML config file
//! can override everything that is exposed there.

// Aggregation weights (must sum to 1.0)

/// Weight for the budget fit component of the total score.
pub const WEIGHT_BUDGET_FIT: f64 = 0.35;

/// Weight for the occasion fit component of the total score.
pub const WEIGHT_OCCASION_FIT: f64 = 0.25;

/// Weight for the persona (semantic similarity) component of the total score.
pub const WEIGHT_PERSONA_FIT: f64 = 0.30;

/// Weight for the trend (popularity/quality) component of the total score.
pub const WEIGHT_TREND_SCORE: f64 = 0.10;

/// Tolerance used when checking that weights sum to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

// Semantic profiler

/// Weight credited for a keyword found in the title.
pub const TITLE_MATCH_WEIGHT: f64 = 3.0;

/// Weight credited for a keyword found in the category or a tag.
pub const CATEGORY_MATCH_WEIGHT: f64 = 2.0;

/// Weight credited for a keyword found only in the description.
pub const DESCRIPTION_MATCH_WEIGHT: f64 = 1.0;

/// Fraction of the title-strength maximum at which a dimension saturates.
pub const PROFILE_SENSITIVITY: f64 = 0.3;

/// Price above which an item gets the full luxury bump.
pub const LUXURY_PRICE_THRESHOLD: f64 = 100.0;

/// Price above which an item gets the partial luxury bump.
pub const PREMIUM_PRICE_THRESHOLD: f64 = 50.0;

/// Price below which a luxury signal is dampened.
pub const BUDGET_PRICE_THRESHOLD: f64 = 20.0;

pub const LUXURY_PRICE_BOOST: f64 = 0.3;
pub const PREMIUM_PRICE_BOOST: f64 = 0.15;
pub const BUDGET_PRICE_PENALTY: f64 = 0.2;

/// Minimum score for a dimension to count as a label of an item.
pub const TOP_LABEL_THRESHOLD: f64 = 0.3;

// Budget fit

/// Budget fit when no budget was given at all.
pub const NEUTRAL_BUDGET_FIT: f64 = 0.7;

/// Budget fit lost between the midpoint and either edge of the budget.
pub const IN_BUDGET_EDGE_DECAY: f64 = 0.2;

/// Starting score for items cheaper than the budget.
pub const UNDER_BUDGET_START: f64 = 0.6;

/// Penalty per budget-range of shortfall.
pub const UNDER_BUDGET_PENALTY: f64 = 0.5;

/// Starting score for items more expensive than the budget.
pub const OVER_BUDGET_START: f64 = 0.5;

/// Penalty per budget-range of excess.
pub const OVER_BUDGET_PENALTY: f64 = 0.8;

/// Default allowance over `budget_max` admitted by the hard budget filter.
pub const BUDGET_OVERSHOOT_ALLOWANCE: f64 = 0.2;

/// Default allowance under `budget_min` admitted by the hard budget filter.
pub const BUDGET_UNDERSHOOT_ALLOWANCE: f64 = 0.0;

// Occasion fit

pub const NEUTRAL_OCCASION_FIT: f64 = 0.5;
pub const VALENTINE_TEXT_BONUS: f64 = 0.3;
pub const VALENTINE_TAG_BONUS: f64 = 0.2;
pub const CHRISTMAS_BONUS: f64 = 0.3;
pub const BIRTHDAY_BONUS: f64 = 0.2;
pub const ANNIVERSARY_BONUS: f64 = 0.3;
pub const PARTNER_BONUS: f64 = 0.15;
pub const COLLEAGUE_BONUS: f64 = 0.15;
pub const CHILD_BONUS: f64 = 0.2;

// Persona fit

/// Persona fit when the query carries no preference signal.
pub const NEUTRAL_PERSONA_FIT: f64 = 0.6;

/// Minimum item dimension score to be named in a persona explanation.
pub const PERSONA_LABEL_THRESHOLD: f64 = 0.4;

// Trend score

pub const NEUTRAL_TREND_SCORE: f64 = 0.5;
pub const SUSTAINABILITY_TREND_BONUS: f64 = 0.1;
pub const PRICE_MARKER_TREND_BONUS: f64 = 0.05;

/// Review count brackets, highest first: (more than, bonus).
pub const REVIEW_BRACKETS: [(u32, f64); 4] = [(500, 0.2), (100, 0.15), (50, 0.1), (10, 0.05)];

/// Rating brackets, highest first: (at least, bonus).
pub const RATING_BRACKETS: [(f64, f64); 3] = [(4.5, 0.15), (4.0, 0.1), (3.5, 0.05)];

// Explanation thresholds

pub const EXPLAIN_BUDGET_STRONG: f64 = 0.8;
pub const EXPLAIN_BUDGET_WEAK: f64 = 0.6;

/// Weak budget explanations rank below their raw sub-score.
pub const EXPLAIN_BUDGET_WEAK_DISCOUNT: f64 = 0.8;
pub const EXPLAIN_OCCASION: f64 = 0.7;
pub const EXPLAIN_PERSONA: f64 = 0.6;
pub const EXPLAIN_TREND: f64 = 0.7;

/// Generic persona and trend sentences rank below any rule-specific one.
pub const EXPLAIN_GENERIC_DISCOUNT: f64 = 0.5;

/// Maximum number of explanations attached to a score.
pub const MAX_EXPLANATIONS: usize = 2;

// Feedback adapter

/// Maximum number of feedback entries kept in the rolling buffer.
pub const FEEDBACK_BUFFER_CAPACITY: usize = 100;

/// Cap on the accumulated weight of a single keyword when boosting.
pub const FEEDBACK_WEIGHT_CAP: u32 = 5;

/// Boost per unit of (capped) keyword weight.
pub const FEEDBACK_BOOST_PER_WEIGHT: f64 = 0.3;

/// Domain keywords extracted from free-text feedback.
pub const FEEDBACK_KEYWORD_WHITELIST: [&str; 14] = [
    "duurzaam", "vegan", "man", "vrouw", "grooming", "sieraden", "budget", "eco", "sport", "tech",
    "kids", "kind", "wellness", "gaming",
];

// Keyword relevance channel

pub const RELEVANCE_INTEREST_HIT: f64 = 10.0;
pub const RELEVANCE_RECIPIENT_HIT: f64 = 5.0;
pub const RELEVANCE_OCCASION_HIT: f64 = 5.0;
pub const RELEVANCE_BUDGET_BAND: f64 = 3.0;
pub const RELEVANCE_GOOD_RATING: f64 = 2.0;
pub const RELEVANCE_MANY_REVIEWS: f64 = 1.0;
pub const RELEVANCE_PARTNER_BONUS: f64 = 4.0;
pub const RELEVANCE_NOT_SUSTAINABLE_PENALTY: f64 = 1.0;

/// Lower end of the price/budget ratio that earns the budget band bonus.
pub const RELEVANCE_BUDGET_BAND_MIN_RATIO: f64 = 0.3;

// Item decoration

/// Rating at which an item earns the top-rated badge.
pub const TOP_RATED_MIN_RATING: f64 = 4.5;

/// Review count an item must exceed for the top-rated badge.
pub const TOP_RATED_MIN_REVIEWS: u32 = 100;

pub const SEASONAL_MIN_OCCASION_FIT: f64 = 0.8;
pub const TRENDING_MIN_TREND_SCORE: f64 = 0.8;

/// Occasion fragments that mark a seasonal holiday.
pub const SEASONAL_OCCASIONS: [&str; 9] = [
    "valentijn", "valentine", "kerst", "christmas", "sinterklaas", "moederdag", "vaderdag", "pasen",
    "easter",
];

// Output

/// Default number of results returned by a search.
pub const DEFAULT_RESULT_COUNT: usize = 8;
