//! Weighted gift scoring with explanations
//!
//! `total = w1*budget_fit + w2*occasion_fit + w3*persona_fit + w4*trend_score`.
//! Every component is a transparent rule table over the item text and metadata,
//! so each score can be explained in a sentence.

use crate::constants::{
    ANNIVERSARY_BONUS, BIRTHDAY_BONUS, CHILD_BONUS, CHRISTMAS_BONUS, COLLEAGUE_BONUS,
    EXPLAIN_BUDGET_STRONG, EXPLAIN_BUDGET_WEAK, EXPLAIN_BUDGET_WEAK_DISCOUNT, EXPLAIN_GENERIC_DISCOUNT, EXPLAIN_OCCASION,
    EXPLAIN_PERSONA, EXPLAIN_TREND, IN_BUDGET_EDGE_DECAY, MAX_EXPLANATIONS, NEUTRAL_BUDGET_FIT,
    NEUTRAL_OCCASION_FIT, NEUTRAL_PERSONA_FIT, NEUTRAL_TREND_SCORE, OVER_BUDGET_PENALTY,
    OVER_BUDGET_START, PARTNER_BONUS, PERSONA_LABEL_THRESHOLD, PRICE_MARKER_TREND_BONUS,
    RATING_BRACKETS, REVIEW_BRACKETS, SUSTAINABILITY_TREND_BONUS, UNDER_BUDGET_PENALTY,
    UNDER_BUDGET_START, VALENTINE_TAG_BONUS, VALENTINE_TEXT_BONUS, WEIGHT_BUDGET_FIT,
    WEIGHT_OCCASION_FIT, WEIGHT_PERSONA_FIT, WEIGHT_TREND_SCORE,
};
use crate::models::{Gift, GiftQuery};
use crate::price::estimate_price;
use crate::profile::{similarity, top_labels, PartialProfile, SemanticProfile};
use serde::{Deserialize, Serialize};

/// Weights of the four sub-scores; callers keep them summing to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub budget_fit: f64,
    pub occasion_fit: f64,
    pub persona_fit: f64,
    pub trend_score: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.budget_fit + self.occasion_fit + self.persona_fit + self.trend_score
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            budget_fit: WEIGHT_BUDGET_FIT,
            occasion_fit: WEIGHT_OCCASION_FIT,
            persona_fit: WEIGHT_PERSONA_FIT,
            trend_score: WEIGHT_TREND_SCORE,
        }
    }
}

/// Trend heuristics that depend on the catalog's price formatting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Substrings of the price text that mark a high-value item
    pub luxury_price_markers: Vec<String>,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            luxury_price_markers: vec!["€75".to_string(), "€100".to_string(), "€150".to_string()],
        }
    }
}

/// Score of one gift for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftScore {
    pub total_score: f64,
    pub budget_fit: f64,
    pub occasion_fit: f64,
    pub persona_fit: f64,
    pub trend_score: f64,
    /// At most two reasons, strongest first
    pub explanations: Vec<String>,
}

/// Budget fit of a price against `[budget_min, budget_max]`
///
/// Peaks at the midpoint and decays to 0.8 at either edge. Overshooting the
/// budget is penalized harder than undershooting it. An unknown price (0) or an
/// absent budget yields a neutral score.
pub fn budget_fit(price: f64, budget_min: f64, budget_max: f64) -> f64 {
    if (budget_min == 0.0 && budget_max == 0.0) || price <= 0.0 {
        return NEUTRAL_BUDGET_FIT;
    }

    // A single-point budget has no range; scale deviations by the budget itself
    let range = if budget_max > budget_min {
        budget_max - budget_min
    } else {
        budget_max.max(1.0)
    };

    if price < budget_min {
        let deficit = budget_min - price;
        (UNDER_BUDGET_START - deficit / range * UNDER_BUDGET_PENALTY).max(0.0)
    } else if price > budget_max {
        let excess = price - budget_max;
        (OVER_BUDGET_START - excess / range * OVER_BUDGET_PENALTY).max(0.0)
    } else {
        let midpoint = (budget_min + budget_max) / 2.0;
        1.0 - (price - midpoint).abs() / range * IN_BUDGET_EDGE_DECAY
    }
}

/// Where an occasion rule looks for its keywords
enum MatchOn {
    /// Substring of name, description or category
    Text(&'static [&'static str]),
    /// Exact (lowercased) tag
    Tag(&'static [&'static str]),
}

struct FitRule {
    triggers: &'static [&'static str],
    evidence: MatchOn,
    bonus: f64,
}

const OCCASION_FIT_RULES: &[FitRule] = &[
    FitRule {
        triggers: &["valentijn", "valentine"],
        evidence: MatchOn::Text(&["romantic", "romantisch", "love", "liefde"]),
        bonus: VALENTINE_TEXT_BONUS,
    },
    FitRule {
        triggers: &["valentijn", "valentine"],
        evidence: MatchOn::Tag(&["romantic", "valentijn"]),
        bonus: VALENTINE_TAG_BONUS,
    },
    FitRule {
        triggers: &["kerst", "christmas"],
        evidence: MatchOn::Text(&["kerst", "christmas", "winter", "holiday"]),
        bonus: CHRISTMAS_BONUS,
    },
    FitRule {
        triggers: &["verjaardag", "birthday"],
        evidence: MatchOn::Text(&["verjaardag", "birthday", "feest", "party"]),
        bonus: BIRTHDAY_BONUS,
    },
    FitRule {
        triggers: &["jubileum", "anniversary"],
        evidence: MatchOn::Text(&["jubileum", "anniversary", "luxury", "luxe", "premium", "exclusive"]),
        bonus: ANNIVERSARY_BONUS,
    },
];

/// Recipient rules trigger on the whole recipient
const RECIPIENT_FIT_RULES: &[FitRule] = &[
    FitRule {
        triggers: &["partner"],
        evidence: MatchOn::Text(&["romantic", "couple", "together", "samen"]),
        bonus: PARTNER_BONUS,
    },
    FitRule {
        triggers: &["collega", "colleague"],
        evidence: MatchOn::Text(&["professional", "office", "kantoor", "werk"]),
        bonus: COLLEAGUE_BONUS,
    },
    FitRule {
        triggers: &["kind", "child"],
        evidence: MatchOn::Text(&["kind", "child", "toy", "speelgoed"]),
        bonus: CHILD_BONUS,
    },
];

impl FitRule {
    fn supported_by(&self, text: &str, tags: &[String]) -> bool {
        match self.evidence {
            MatchOn::Text(keywords) => keywords.iter().any(|keyword| text.contains(keyword)),
            MatchOn::Tag(keywords) => tags.iter().any(|tag| keywords.contains(&tag.as_str())),
        }
    }
}

/// Occasion and recipient fit of a gift, starting from a neutral 0.5
pub fn occasion_fit(gift: &Gift, occasion: &str, recipient: &str) -> f64 {
    let occasion = occasion.to_lowercase();
    let recipient = recipient.trim().to_lowercase();

    let mut text = format!("{} {}", gift.product_name, gift.description);
    if let Some(category) = &gift.category {
        text.push(' ');
        text.push_str(category);
    }
    let text = text.to_lowercase();
    let tags: Vec<String> = gift.tags.iter().map(|tag| tag.to_lowercase()).collect();

    let occasion_bonus: f64 = OCCASION_FIT_RULES
        .iter()
        .filter(|rule| rule.triggers.iter().any(|trigger| occasion.contains(trigger)))
        .filter(|rule| rule.supported_by(&text, &tags))
        .map(|rule| rule.bonus)
        .sum();
    let recipient_bonus: f64 = RECIPIENT_FIT_RULES
        .iter()
        .filter(|rule| rule.triggers.contains(&recipient.as_str()))
        .filter(|rule| rule.supported_by(&text, &tags))
        .map(|rule| rule.bonus)
        .sum();

    (NEUTRAL_OCCASION_FIT + occasion_bonus + recipient_bonus).min(1.0)
}

/// Cosine similarity between item and user preferences; neutral without preferences
pub fn persona_fit(item_profile: &SemanticProfile, user_profile: &PartialProfile) -> f64 {
    if user_profile.is_empty() {
        return NEUTRAL_PERSONA_FIT;
    }
    similarity(item_profile, &user_profile.to_full())
}

/// Popularity and quality signal from reviews, rating and sustainability
pub fn trend_score(gift: &Gift, config: &TrendConfig) -> f64 {
    let mut score = NEUTRAL_TREND_SCORE;

    if let Some(reviews) = gift.review_count {
        if let Some((_, bonus)) = REVIEW_BRACKETS.iter().find(|(above, _)| reviews > *above) {
            score += bonus;
        }
    }
    if let Some(rating) = gift.rating {
        if let Some((_, bonus)) = RATING_BRACKETS.iter().find(|(at_least, _)| rating >= *at_least) {
            score += bonus;
        }
    }
    if gift.sustainability {
        score += SUSTAINABILITY_TREND_BONUS;
    }

    let price_text = gift.price_range.to_lowercase();
    if config
        .luxury_price_markers
        .iter()
        .any(|marker| price_text.contains(&marker.to_lowercase()))
    {
        score += PRICE_MARKER_TREND_BONUS;
    }

    score.min(1.0)
}

/// Scores gifts against a query with fixed weights
#[derive(Debug, Clone, Default)]
pub struct GiftScorer {
    weights: ScoringWeights,
    trend: TrendConfig,
}

impl GiftScorer {
    pub fn new(weights: ScoringWeights, trend: TrendConfig) -> Self {
        Self { weights, trend }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score one gift and explain the strongest reasons
    pub fn score(
        &self,
        gift: &Gift,
        item_profile: &SemanticProfile,
        user_profile: &PartialProfile,
        query: &GiftQuery,
    ) -> GiftScore {
        let price = estimate_price(&gift.price_range);

        let budget_fit = budget_fit(price, query.budget_min, query.budget_max);
        let occasion_fit = occasion_fit(gift, &query.occasion, &query.recipient);
        let persona_fit = persona_fit(item_profile, user_profile);
        let trend_score = trend_score(gift, &self.trend);

        let total_score = budget_fit * self.weights.budget_fit
            + occasion_fit * self.weights.occasion_fit
            + persona_fit * self.weights.persona_fit
            + trend_score * self.weights.trend_score;

        let mut score = GiftScore {
            total_score,
            budget_fit,
            occasion_fit,
            persona_fit,
            trend_score,
            explanations: Vec::new(),
        };
        score.explanations = explain(gift, &score, item_profile, query);
        score
    }
}

/// Candidate sentences for every sub-score over its threshold, top two kept
fn explain(gift: &Gift, score: &GiftScore, item_profile: &SemanticProfile, query: &GiftQuery) -> Vec<String> {
    let mut candidates: Vec<(String, f64)> = Vec::new();

    if score.budget_fit > EXPLAIN_BUDGET_STRONG {
        let text = format!(
            "Past perfect binnen jouw budget van €{}-€{}",
            format_amount(query.budget_min),
            format_amount(query.budget_max)
        );
        candidates.push((text, score.budget_fit));
    } else if score.budget_fit > EXPLAIN_BUDGET_WEAK {
        let text = if gift.price_range.trim().is_empty() {
            "Betaalbaar cadeau".to_string()
        } else {
            format!("Betaalbaar cadeau: {}", gift.price_range.trim())
        };
        candidates.push((text, score.budget_fit * EXPLAIN_BUDGET_WEAK_DISCOUNT));
    }

    if score.occasion_fit > EXPLAIN_OCCASION {
        let occasion = query.occasion.trim().to_lowercase();
        let recipient = query.recipient.trim().to_lowercase();
        let text = if occasion.contains("valentijn") || occasion.contains("valentine") {
            "Romantisch cadeau perfect voor Valentijnsdag".to_string()
        } else if occasion.contains("kerst") || occasion.contains("christmas") {
            "Ideaal kerstcadeau om de feestdagen mee te vieren".to_string()
        } else if recipient == "partner" {
            "Speciaal geselecteerd voor je partner".to_string()
        } else if occasion.is_empty() {
            format!("Perfect voor {}", recipient)
        } else {
            format!("Perfect voor {}", occasion)
        };
        candidates.push((text, score.occasion_fit));
    }

    if score.persona_fit > EXPLAIN_PERSONA {
        let labels: Vec<_> = top_labels(item_profile, PERSONA_LABEL_THRESHOLD)
            .into_iter()
            .filter(|dimension| item_profile.get(*dimension) > PERSONA_LABEL_THRESHOLD)
            .take(2)
            .collect();
        let candidate = match labels.as_slice() {
            [first, second] => (
                format!(
                    "Matcht met jouw interesse in {} en {} cadeaus",
                    first.adjective(),
                    second.adjective()
                ),
                score.persona_fit,
            ),
            [first] => (
                format!("Matcht met jouw interesse in {} cadeaus", first.adjective()),
                score.persona_fit,
            ),
            _ => (
                "Sluit goed aan bij de interesses van de ontvanger".to_string(),
                score.persona_fit * EXPLAIN_GENERIC_DISCOUNT,
            ),
        };
        candidates.push(candidate);
    }

    if score.trend_score > EXPLAIN_TREND {
        let rating = gift.rating.unwrap_or(0.0);
        let reviews = gift.review_count.unwrap_or(0);
        let candidate = if rating >= 4.5 && reviews > 50 {
            (
                format!("Hoog beoordeeld: {} sterren ({} reviews)", rating, reviews),
                score.trend_score,
            )
        } else if gift.sustainability {
            ("Duurzame keuze: goed voor mens en milieu".to_string(), score.trend_score)
        } else if reviews > 100 {
            (format!("Populair cadeau met {}+ reviews", reviews), score.trend_score)
        } else {
            (
                "Populaire keuze met sterke beoordelingen".to_string(),
                score.trend_score * EXPLAIN_GENERIC_DISCOUNT,
            )
        };
        candidates.push(candidate);
    }

    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates
        .into_iter()
        .take(MAX_EXPLANATIONS)
        .map(|(text, _)| text)
        .collect()
}

/// Whole amounts without decimals, others with two
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{user_profile_from_query, Dimension, SemanticProfiler};

    fn gift_with_text(name: &str, description: &str) -> Gift {
        Gift::new(name, description, "€40")
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((ScoringWeights::default().sum() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_budget_fit_neutral_without_budget() {
        assert_eq!(budget_fit(40.0, 0.0, 0.0), 0.7);
        assert_eq!(budget_fit(0.0, 30.0, 50.0), 0.7);
    }

    #[test]
    fn test_budget_fit_peaks_at_midpoint() {
        assert!((budget_fit(40.0, 30.0, 50.0) - 1.0).abs() < 1e-10);
        assert!((budget_fit(30.0, 30.0, 50.0) - 0.9).abs() < 1e-10);
        assert!((budget_fit(50.0, 30.0, 50.0) - 0.9).abs() < 1e-10);

        let mut previous = budget_fit(40.0, 30.0, 50.0);
        for price in [42.0, 44.0, 46.0, 48.0, 50.0] {
            let current = budget_fit(price, 30.0, 50.0);
            assert!(current < previous, "{price} should score below its predecessor");
            previous = current;
        }
        let mut previous = budget_fit(40.0, 30.0, 50.0);
        for price in [38.0, 35.0, 32.0, 30.0] {
            let current = budget_fit(price, 30.0, 50.0);
            assert!(current < previous, "{price} should score below its predecessor");
            previous = current;
        }
    }

    #[test]
    fn test_budget_fit_outside_range() {
        // 5 under: 0.6 - 5/20 * 0.5
        assert!((budget_fit(25.0, 30.0, 50.0) - 0.475).abs() < 1e-10);
        // 5 over: 0.5 - 5/20 * 0.8
        assert!((budget_fit(55.0, 30.0, 50.0) - 0.3).abs() < 1e-10);
        assert_eq!(budget_fit(70.0, 30.0, 50.0), 0.0);
        assert_eq!(budget_fit(1.0, 30.0, 50.0), 0.0);
    }

    #[test]
    fn test_overshoot_penalized_harder_than_undershoot() {
        for distance in [1.0, 4.0, 8.0, 12.0] {
            let over = budget_fit(50.0 + distance, 30.0, 50.0);
            let under = budget_fit(30.0 - distance, 30.0, 50.0);
            assert!(over < under, "distance {distance}: over {over} vs under {under}");
        }
        assert!(budget_fit(70.0, 30.0, 50.0) < budget_fit(25.0, 30.0, 50.0));
    }

    #[test]
    fn test_budget_fit_single_point_budget() {
        assert_eq!(budget_fit(50.0, 50.0, 50.0), 1.0);
        assert!(budget_fit(45.0, 50.0, 50.0) > budget_fit(55.0, 50.0, 50.0));
    }

    #[test]
    fn test_occasion_fit_valentine() {
        let gift = gift_with_text("Duo mokken", "romantisch cadeau voor koppels");
        assert!((occasion_fit(&gift, "Valentijnsdag", "vriend(in)") - 0.8).abs() < 1e-10);

        let mut tagged = gift.clone();
        tagged.tags = vec!["Valentijn".to_string()];
        assert_eq!(occasion_fit(&tagged, "Valentijnsdag", ""), 1.0);
    }

    #[test]
    fn test_occasion_fit_neutral_and_capped() {
        let plain = gift_with_text("Sokken", "warme sokken");
        assert_eq!(occasion_fit(&plain, "verjaardag", "collega"), 0.5);

        let mut loaded = gift_with_text("Romantic love box", "samen genieten");
        loaded.tags = vec!["romantic".to_string()];
        // 0.5 + 0.3 + 0.2 + 0.15 would exceed 1.0
        assert_eq!(occasion_fit(&loaded, "valentine", "partner"), 1.0);
    }

    #[test]
    fn test_occasion_fit_recipient_rules() {
        let office = gift_with_text("Bureau organizer", "voor op kantoor");
        assert!((occasion_fit(&office, "", "Collega") - 0.65).abs() < 1e-10);

        let toy = gift_with_text("Houten speelgoed trein", "");
        assert!((occasion_fit(&toy, "", "kind") - 0.7).abs() < 1e-10);
    }

    #[test]
    fn test_persona_fit() {
        let profiler = SemanticProfiler::default();
        let item = profiler.profile_gift(&gift_with_text("Smart gaming headset", "draadloos"));

        assert_eq!(persona_fit(&item, &PartialProfile::default()), 0.6);

        let tech_fan = user_profile_from_query(&["gaming".to_string()], "", "");
        let fit = persona_fit(&item, &tech_fan);
        assert!(fit > 0.6 && fit <= 1.0 + 1e-10);

        let empty_item = SemanticProfile::default();
        assert_eq!(persona_fit(&empty_item, &tech_fan), 0.0);
    }

    #[test]
    fn test_trend_score_brackets() {
        let config = TrendConfig::default();
        let mut gift = Gift::new("Boek", "", "€20");
        assert_eq!(trend_score(&gift, &config), 0.5);

        // Only the highest bracket counts
        gift.review_count = Some(600);
        gift.rating = Some(4.6);
        assert!((trend_score(&gift, &config) - 0.85).abs() < 1e-10);

        gift.review_count = Some(60);
        gift.rating = Some(3.9);
        assert!((trend_score(&gift, &config) - 0.65).abs() < 1e-10);
    }

    #[test]
    fn test_trend_score_sustainability_marker_and_cap() {
        let config = TrendConfig::default();
        let mut gift = Gift::new("Leren tas", "", "€100-€150");
        gift.sustainability = true;
        assert!((trend_score(&gift, &config) - 0.65).abs() < 1e-10);

        gift.review_count = Some(1000);
        gift.rating = Some(5.0);
        assert_eq!(trend_score(&gift, &config), 1.0);
    }

    #[test]
    fn test_total_score_is_weighted_sum() {
        let scorer = GiftScorer::default();
        let gift = gift_with_text("Sokken", "warme sokken");
        let item = SemanticProfiler::default().profile_gift(&gift);
        let query = GiftQuery::new("", 30.0, 50.0, "");

        let score = scorer.score(&gift, &item, &PartialProfile::default(), &query);
        let expected = 0.35 * score.budget_fit
            + 0.25 * score.occasion_fit
            + 0.30 * score.persona_fit
            + 0.10 * score.trend_score;
        assert!((score.total_score - expected).abs() < 1e-10);
        assert!((0.0..=1.0).contains(&score.total_score));
    }

    #[test]
    fn test_explanations_top_two_strongest_first() {
        let scorer = GiftScorer::default();
        let mut gift = Gift::new("Romantische wijn voor samen", "liefde", "€40");
        gift.rating = Some(4.8);
        gift.review_count = Some(700);
        let item = SemanticProfiler::default().profile_gift(&gift);
        let query = GiftQuery::new("partner", 30.0, 50.0, "Valentijnsdag");
        let user = user_profile_from_query(&query.interests, &query.occasion, &query.recipient);

        let score = scorer.score(&gift, &item, &user, &query);
        assert_eq!(score.explanations.len(), 2);
        assert_eq!(
            score.explanations[0],
            "Past perfect binnen jouw budget van €30-€50"
        );
        assert!(item.get(Dimension::Romantic) > 0.4);
    }

    #[test]
    fn test_generic_persona_sentence_ranks_below_occasion() {
        let scorer = GiftScorer::default();
        let gift = Gift::new("Duo mokken", "romantisch cadeau voor koppels", "€40");
        let item = SemanticProfiler::default().profile_gift(&gift);
        let query = GiftQuery::new("partner", 30.0, 50.0, "Valentijnsdag");
        let user = user_profile_from_query(&query.interests, &query.occasion, &query.recipient);

        let score = scorer.score(&gift, &item, &user, &query);
        assert!(score.persona_fit > score.occasion_fit);
        assert_eq!(
            score.explanations,
            vec![
                "Past perfect binnen jouw budget van €30-€50".to_string(),
                "Romantisch cadeau perfect voor Valentijnsdag".to_string(),
            ]
        );
    }

    #[test]
    fn test_generic_trend_sentence_is_discounted() {
        let scorer = GiftScorer::default();
        let mut gift = Gift::new("Sokken", "warme sokken", "€75");
        gift.rating = Some(4.2);
        gift.review_count = Some(80);
        let item = SemanticProfiler::default().profile_gift(&gift);
        let query = GiftQuery::new("", 0.0, 0.0, "");
        let user = user_profile_from_query(&[], "", "");

        let score = scorer.score(&gift, &item, &user, &query);
        assert!((score.trend_score - 0.75).abs() < 1e-10);
        // Weak budget sentence ranks at 0.7 * 0.8, the generic trend one at 0.75 * 0.5
        assert_eq!(
            score.explanations,
            vec![
                "Betaalbaar cadeau: €75".to_string(),
                "Populaire keuze met sterke beoordelingen".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_explanations_when_nothing_stands_out() {
        let scorer = GiftScorer::default();
        let gift = gift_with_text("Sokken", "warme sokken");
        let item = SemanticProfiler::default().profile_gift(&gift);
        let query = GiftQuery::new("", 100.0, 200.0, "");
        let user = user_profile_from_query(&["tech".to_string()], "", "");

        let score = scorer.score(&gift, &item, &user, &query);
        assert!(score.budget_fit <= 0.6);
        assert!(score.occasion_fit <= 0.7);
        assert!(score.persona_fit <= 0.6);
        assert!(score.trend_score <= 0.7);
        assert!(score.explanations.is_empty());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(30.0), "30");
        assert_eq!(format_amount(29.5), "29.50");
    }
}
