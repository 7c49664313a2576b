//! Candidate filtering
//!
//! Two stages run over the catalog. Hard filters are a strict conjunction over
//! the query's filter fields. The soft relevance gate then admits items with any
//! textual or keyword-table match to the query. Survivors carry a keyword
//! relevance score that ranks ties of the weighted total score.

use crate::constants::{
    BUDGET_OVERSHOOT_ALLOWANCE, BUDGET_UNDERSHOOT_ALLOWANCE, RELEVANCE_BUDGET_BAND,
    RELEVANCE_BUDGET_BAND_MIN_RATIO, RELEVANCE_GOOD_RATING, RELEVANCE_INTEREST_HIT,
    RELEVANCE_MANY_REVIEWS, RELEVANCE_NOT_SUSTAINABLE_PENALTY, RELEVANCE_OCCASION_HIT,
    RELEVANCE_PARTNER_BONUS, RELEVANCE_RECIPIENT_HIT,
};
use crate::feedback::FeedbackAdapter;
use crate::models::{Availability, Gender, Gift, GiftQuery, HardFilters};
use crate::price::estimate_price;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Admission band of the hard budget filter, as fractions of the budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetPolicy {
    /// Items up to `budget_max * (1 + overshoot_allowance)` pass
    pub overshoot_allowance: f64,
    /// Items down to `budget_min * (1 - undershoot_allowance)` pass
    pub undershoot_allowance: f64,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self {
            overshoot_allowance: BUDGET_OVERSHOOT_ALLOWANCE,
            undershoot_allowance: BUDGET_UNDERSHOOT_ALLOWANCE,
        }
    }
}

/// Keyword tables behind the soft relevance gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateTables {
    /// Recipient (lowercased) to keywords that make an item relevant for them
    pub recipients: BTreeMap<String, Vec<String>>,
    /// Occasion (lowercased) to keywords that make an item relevant for it
    pub occasions: BTreeMap<String, Vec<String>>,
    /// Interest token to bilingual synonyms searched alongside it
    pub interest_synonyms: BTreeMap<String, Vec<String>>,
    /// Retailer name or link fragments identifying the sustainable partner
    pub partner_markers: Vec<String>,
}

fn table(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(key, keywords)| {
            (
                key.to_string(),
                keywords.iter().map(|keyword| keyword.to_string()).collect(),
            )
        })
        .collect()
}

impl Default for GateTables {
    fn default() -> Self {
        Self {
            recipients: table(&[
                ("partner", &["romantic", "couple", "valentine", "anniversary", "love", "romantisch", "koppel", "liefde", "relatie"]),
                ("vriend(in)", &["fun", "social", "friend", "party", "trendy", "leuk", "gezellig", "vrienden", "feest", "hip"]),
                ("familielid", &["family", "traditional", "practical", "home", "familie", "praktisch", "thuis", "huis"]),
                ("collega", &["professional", "office", "business", "practical", "professioneel", "kantoor", "werk", "zakelijk"]),
                ("kind", &["kids", "children", "toy", "educational", "fun", "game", "kinderen", "speelgoed", "educatief", "spel", "junior"]),
                ("man", &["man", "men", "male", "heren", "gentlemen", "jongens", "boys", "mannelijk"]),
                ("vrouw", &["vrouw", "women", "female", "dames", "ladies", "meisjes", "girls", "vrouwelijk"]),
            ]),
            occasions: table(&[
                ("verjaardag", &["birthday", "celebration", "party", "special", "verjaardag", "feest", "viering", "speciaal"]),
                ("kerstmis", &["christmas", "holiday", "winter", "festive", "december", "kerst", "feestdagen", "winterdag"]),
                ("valentijnsdag", &["valentine", "romantic", "love", "couple", "valentijn", "romantisch", "liefde", "romantiek"]),
                ("jubileum", &["anniversary", "milestone", "celebration", "special", "jubileum", "mijlpaal", "viering"]),
                ("zomaar", &["surprise", "spontaneous", "just because", "thoughtful", "verrassing", "spontaan", "attent", "lief"]),
            ]),
            interest_synonyms: table(&[
                ("tech", &["technologie", "gadgets", "electronica", "electronics"]),
                ("koken", &["cooking", "kitchen", "food", "culinary", "keuken", "eten"]),
                ("sport", &["fitness", "exercise", "workout", "sports", "sporten", "bewegen"]),
                ("muziek", &["music", "audio", "sound", "muziek", "geluid"]),
                ("games", &["gaming", "console", "pc", "spellen", "gamen"]),
                ("boeken", &["books", "reading", "literature", "lezen", "literatuur"]),
                ("reizen", &["travel", "vacation", "trip", "vakantie", "reis"]),
                ("mode", &["fashion", "clothing", "style", "kleding", "stijl"]),
                ("beauty", &["cosmetics", "skincare", "makeup", "cosmetica", "verzorging"]),
                ("tuinieren", &["gardening", "plants", "garden", "tuin", "planten"]),
            ]),
            partner_markers: vec![
                "shop like you give a damn".to_string(),
                "shoplikeyougiveadamn".to_string(),
                "slygad".to_string(),
            ],
        }
    }
}

impl GateTables {
    pub fn relevant_for_recipient(&self, text: &str, recipient: &str) -> bool {
        Self::lookup_hit(&self.recipients, text, recipient)
    }

    pub fn relevant_for_occasion(&self, text: &str, occasion: &str) -> bool {
        Self::lookup_hit(&self.occasions, text, occasion)
    }

    /// Any interest, or one of its synonyms, occurs in the text
    pub fn relevant_for_interests(&self, text: &str, interests: &[String]) -> bool {
        interests.iter().any(|interest| {
            text.contains(interest.as_str())
                || self
                    .interest_synonyms
                    .get(interest)
                    .is_some_and(|synonyms| synonyms.iter().any(|synonym| text.contains(synonym.as_str())))
        })
    }

    /// The item is sold by the sustainable partner
    pub fn is_partner_item(&self, gift: &Gift) -> bool {
        gift.retailers.iter().any(|retailer| {
            let name = retailer.name.to_lowercase();
            let link = retailer.link.to_lowercase();
            self.partner_markers.iter().any(|marker| {
                let marker = marker.to_lowercase();
                name.contains(&marker) || link.contains(&marker)
            })
        })
    }

    fn lookup_hit(table: &BTreeMap<String, Vec<String>>, text: &str, key: &str) -> bool {
        table
            .get(&key.trim().to_lowercase())
            .is_some_and(|keywords| keywords.iter().any(|keyword| text.contains(keyword.as_str())))
    }
}

/// A gift that passed filtering, with its keyword relevance
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub gift: &'a Gift,
    pub relevance_score: f64,
}

/// Hard filters, soft relevance gate and relevance scoring
#[derive(Debug, Clone, Default)]
pub struct FilterPipeline {
    gate: GateTables,
    budget: BudgetPolicy,
}

impl FilterPipeline {
    pub fn new(gate: GateTables, budget: BudgetPolicy) -> Self {
        Self { gate, budget }
    }

    pub fn gate(&self) -> &GateTables {
        &self.gate
    }

    /// Filter the catalog down to candidates for the query
    pub fn filter<'a>(
        &self,
        catalog: &'a [Gift],
        query: &GiftQuery,
        feedback: &FeedbackAdapter,
    ) -> Vec<Candidate<'a>> {
        let hard_passed: Vec<&Gift> = catalog
            .iter()
            .filter(|gift| self.passes_hard_filters(gift, query))
            .collect();
        debug!(
            "Hard filters kept {} of {} items",
            hard_passed.len(),
            catalog.len()
        );

        let candidates: Vec<Candidate<'a>> = hard_passed
            .into_iter()
            .filter(|gift| self.passes_soft_gate(gift, query))
            .map(|gift| Candidate {
                gift,
                relevance_score: self.relevance_score(gift, query, feedback),
            })
            .collect();
        debug!("Relevance gate kept {} items", candidates.len());

        candidates
    }

    /// Strict conjunction of the budget band and every filter the query sets
    pub fn passes_hard_filters(&self, gift: &Gift, query: &GiftQuery) -> bool {
        let price = estimate_price(&gift.price_range);
        self.within_budget(price, query) && matches_filters(gift, price, &query.filters)
    }

    fn within_budget(&self, price: f64, query: &GiftQuery) -> bool {
        if price <= 0.0 || query.has_no_budget() {
            return true;
        }
        let floor = query.budget_min * (1.0 - self.budget.undershoot_allowance);
        if price < floor {
            return false;
        }
        if query.budget_max > 0.0 {
            let ceiling = query.budget_max * (1.0 + self.budget.overshoot_allowance);
            if price > ceiling {
                return false;
            }
        }
        true
    }

    /// Any textual or keyword-table match; skipped when the query carries no signal
    pub fn passes_soft_gate(&self, gift: &Gift, query: &GiftQuery) -> bool {
        if query.has_no_signal() {
            return true;
        }
        if query.filters.prefers_sustainable_partner() && self.gate.is_partner_item(gift) {
            return true;
        }

        let text = gift.searchable_text();
        let direct_match = query_terms(query).any(|term| text.contains(term.as_str()));

        direct_match
            || self.gate.relevant_for_recipient(&text, &query.recipient)
            || self.gate.relevant_for_occasion(&text, &query.occasion)
            || self.gate.relevant_for_interests(&text, &query.interests)
    }

    /// Keyword relevance plus the feedback boost
    pub fn relevance_score(&self, gift: &Gift, query: &GiftQuery, feedback: &FeedbackAdapter) -> f64 {
        let text = gift.searchable_text();
        let mut score = 0.0;

        score += query
            .interests
            .iter()
            .filter(|interest| text.contains(interest.as_str()))
            .count() as f64
            * RELEVANCE_INTEREST_HIT;

        if self.gate.relevant_for_recipient(&text, &query.recipient) {
            score += RELEVANCE_RECIPIENT_HIT;
        }
        if self.gate.relevant_for_occasion(&text, &query.occasion) {
            score += RELEVANCE_OCCASION_HIT;
        }

        let price = estimate_price(&gift.price_range);
        if price > 0.0 && query.budget_max > 0.0 {
            let ratio = price / query.budget_max;
            if (RELEVANCE_BUDGET_BAND_MIN_RATIO..=1.0).contains(&ratio) {
                score += RELEVANCE_BUDGET_BAND;
            }
        }

        if gift.rating.is_some_and(|rating| rating >= 4.0) {
            score += RELEVANCE_GOOD_RATING;
        }
        if gift.review_count.is_some_and(|reviews| reviews > 100) {
            score += RELEVANCE_MANY_REVIEWS;
        }

        if query.filters.prefers_sustainable_partner() {
            if self.gate.is_partner_item(gift) {
                score += RELEVANCE_PARTNER_BONUS;
            } else if !gift.sustainability {
                score -= RELEVANCE_NOT_SUSTAINABLE_PENALTY;
            }
        }

        score + feedback.boost(&text)
    }
}

/// Non-empty lowercased interests, recipient and occasion
fn query_terms(query: &GiftQuery) -> impl Iterator<Item = String> + '_ {
    query
        .interests
        .iter()
        .cloned()
        .chain([query.recipient.trim().to_lowercase(), query.occasion.trim().to_lowercase()])
        .filter(|term| !term.is_empty())
}

fn matches_filters(gift: &Gift, price: f64, filters: &HardFilters) -> bool {
    if let Some(bounds) = filters.price_range {
        if price > 0.0 && (price < bounds.min || price > bounds.max) {
            return false;
        }
    }

    let wanted_categories: Vec<String> = filters
        .categories
        .iter()
        .map(|category| category.trim().to_lowercase())
        .filter(|category| !category.is_empty())
        .collect();
    if !wanted_categories.is_empty() {
        let category = gift.category.as_deref().unwrap_or_default().to_lowercase();
        if !wanted_categories.iter().any(|wanted| category.contains(wanted.as_str())) {
            return false;
        }
    }

    if filters.gift_type.is_some() && gift.gift_type != filters.gift_type {
        return false;
    }
    if filters.delivery_speed.is_some() && gift.delivery_speed != filters.delivery_speed {
        return false;
    }
    if let Some(age_group) = &filters.age_group {
        let matches = gift
            .age_group
            .as_deref()
            .is_some_and(|item_age| item_age.eq_ignore_ascii_case(age_group.trim()));
        if !matches {
            return false;
        }
    }
    if let Some(gender) = filters.gender {
        if gift.gender != Some(gender) && gift.gender != Some(Gender::Unisex) {
            return false;
        }
    }

    if filters.sustainability && !gift.sustainability {
        return false;
    }
    if filters.personalization && !gift.personalization {
        return false;
    }

    if let Some(required) = filters.availability.and_then(|filter| filter.required()) {
        // Catalog items without a status are sellable
        let availability = gift.availability.unwrap_or(Availability::InStock);
        if availability != required {
            return false;
        }
    }

    true
}
