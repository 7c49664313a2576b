//! Core data models for the gift scoring engine
//!
//! Field names serialize in camelCase so catalogs exported by the web front-end
//! deserialize without a translation layer.

use crate::constants::DEFAULT_RESULT_COUNT;
use crate::profile::Dimension;
use crate::scoring::GiftScore;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A shop that sells a gift
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Retailer {
    pub name: String,

    /// Affiliate or product link
    #[serde(alias = "affiliateLink")]
    pub link: String,
}

impl Retailer {
    pub fn new(name: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum GiftType {
    Physical,
    Experience,
    Digital,
    Subscription,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DeliverySpeed {
    Standard,
    Fast,
    Instant,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Unisex,
}

/// Stock status of a catalog item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    InStock,
    PreOrder,
    OutOfStock,
}

/// Stock status requested by a query; `All` disables the filter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityFilter {
    InStock,
    PreOrder,
    All,
}

impl AvailabilityFilter {
    /// The item status this filter requires, if any
    pub fn required(self) -> Option<Availability> {
        match self {
            AvailabilityFilter::InStock => Some(Availability::InStock),
            AvailabilityFilter::PreOrder => Some(Availability::PreOrder),
            AvailabilityFilter::All => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PreferredPartner {
    All,
    Sustainable,
}

/// A candidate gift from the catalog
///
/// Built fresh per search from an external catalog source and never mutated
/// while scoring. Derived fields live on [`ScoredGift`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Gift {
    pub product_name: String,

    #[serde(default)]
    pub description: String,

    /// Human-readable price text such as "€25-€50" or "€39,99"
    #[serde(default)]
    pub price_range: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Average rating from 0 to 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(default, alias = "reviews", skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,

    #[serde(default)]
    pub sustainability: bool,

    #[serde(default)]
    pub personalization: bool,

    #[serde(default)]
    pub retailers: Vec<Retailer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gift_type: Option<GiftType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_speed: Option<DeliverySpeed>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    /// Curated popularity from 0 to 10
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Gift {
    /// Create a gift with the given name, description and price text
    pub fn new(
        product_name: impl Into<String>,
        description: impl Into<String>,
        price_range: impl Into<String>,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            description: description.into(),
            price_range: price_range.into(),
            ..Self::default()
        }
    }

    /// Lowercased name, description, category and tags joined for keyword matching
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.product_name, &self.description];
        if let Some(category) = &self.category {
            parts.push(category);
        }
        parts.extend(self.tags.iter().map(String::as_str));
        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    /// Name of the first listed retailer, if any
    pub fn primary_retailer(&self) -> Option<&str> {
        self.retailers.first().map(|retailer| retailer.name.as_str())
    }
}

/// Badge shown next to a result
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TrendingBadge {
    Trending,
    Seasonal,
    TopRated,
}

/// A gift augmented with its score and presentation fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredGift {
    #[serde(flatten)]
    pub gift: Gift,

    #[serde(flatten)]
    pub score: GiftScore,

    /// Keyword relevance plus feedback boost; ranks ties of `total_score`
    pub relevance_score: f64,

    /// Strongest semantic labels of the item
    pub labels: Vec<Dimension>,

    pub match_reason: String,

    pub trending_badge: Option<TrendingBadge>,
}

/// Hard filters a query can carry
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HardFilters {
    /// Strict price bounds, no allowance
    #[serde(default)]
    pub price_range: Option<PriceBounds>,
    /// Item category must contain one of these (case-insensitive)
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub gift_type: Option<GiftType>,
    #[serde(default)]
    pub delivery_speed: Option<DeliverySpeed>,
    #[serde(default)]
    pub age_group: Option<String>,
    /// Matches the item gender exactly, or items marked unisex
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Require sustainable items
    #[serde(default)]
    pub sustainability: bool,
    /// Require personalizable items
    #[serde(default)]
    pub personalization: bool,
    #[serde(default)]
    pub availability: Option<AvailabilityFilter>,
    /// Partner preference; `sustainable` keeps partner items past the relevance gate
    #[serde(default)]
    pub preferred_partner: Option<PreferredPartner>,
}

impl HardFilters {
    pub fn prefers_sustainable_partner(&self) -> bool {
        self.preferred_partner == Some(PreferredPartner::Sustainable)
    }
}

/// Inclusive price bounds
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PriceBounds {
    pub min: f64,
    pub max: f64,
}

/// Pagination parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PaginationLimit {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    DEFAULT_RESULT_COUNT
}

impl Default for PaginationLimit {
    fn default() -> Self {
        Self {
            offset: 0,
            count: DEFAULT_RESULT_COUNT,
        }
    }
}

/// Parameters for a gift search
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GiftQuery {
    /// Who the gift is for, e.g. "partner", "collega", "kind"
    #[serde(default)]
    pub recipient: String,
    /// Lower end of the budget; 0 together with a 0 maximum means "no budget"
    #[serde(default)]
    pub budget_min: f64,
    /// Upper end of the budget
    #[serde(default)]
    pub budget_max: f64,
    /// The occasion, e.g. "Valentijnsdag", "verjaardag"
    #[serde(default)]
    pub occasion: String,
    /// Interest tokens; a comma separated string is accepted as well
    #[serde(default, deserialize_with = "deserialize_interests")]
    #[schemars(with = "Vec<String>")]
    pub interests: Vec<String>,
    #[serde(default)]
    pub filters: HardFilters,
    /// Result pagination
    #[serde(default)]
    pub limit: Option<PaginationLimit>,
}

impl GiftQuery {
    pub fn new(recipient: impl Into<String>, budget_min: f64, budget_max: f64, occasion: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            budget_min,
            budget_max,
            occasion: occasion.into(),
            ..Self::default()
        }
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = normalize_interests(interests.into_iter().map(Into::into));
        self
    }

    pub fn with_filters(mut self, filters: HardFilters) -> Self {
        self.filters = filters;
        self
    }

    /// True when neither recipient, occasion nor interests carry any signal
    pub fn has_no_signal(&self) -> bool {
        self.recipient.trim().is_empty()
            && self.occasion.trim().is_empty()
            && self.interests.is_empty()
    }

    /// True when no budget was given at all
    pub fn has_no_budget(&self) -> bool {
        self.budget_min == 0.0 && self.budget_max == 0.0
    }
}

/// Split a comma separated interest string into trimmed, lowercased tokens
pub fn split_interests(raw: &str) -> Vec<String> {
    normalize_interests(raw.split(',').map(str::to_string))
}

fn normalize_interests(items: impl Iterator<Item = String>) -> Vec<String> {
    items
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InterestsInput {
    List(Vec<String>),
    Csv(String),
}

fn deserialize_interests<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match InterestsInput::deserialize(deserializer)? {
        InterestsInput::List(items) => normalize_interests(items.into_iter()),
        InterestsInput::Csv(raw) => split_interests(&raw),
    })
}

/// Free-text relevance feedback from a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: Uuid,

    pub comment: String,

    #[serde(default)]
    pub recipient: Option<String>,

    #[serde(default)]
    pub occasion: Option<String>,

    #[serde(default)]
    pub interests: Vec<String>,

    pub created_at: DateTime<Utc>,
}

impl FeedbackEntry {
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            comment: comment.into(),
            recipient: None,
            occasion: None,
            interests: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Attach the search context the feedback was given in
    pub fn with_context(
        mut self,
        recipient: Option<String>,
        occasion: Option<String>,
        interests: Vec<String>,
    ) -> Self {
        self.recipient = recipient;
        self.occasion = occasion;
        self.interests = interests;
        self
    }

    /// Lowercased comment and context joined for keyword extraction
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.comment];
        parts.extend(self.interests.iter().map(String::as_str));
        parts.extend(self.recipient.as_deref());
        parts.extend(self.occasion.as_deref());
        parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

/// Parameters for submitting relevance feedback
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SubmitFeedbackParams {
    /// What the user thought of the results
    pub comment: String,
    /// Recipient of the search the feedback refers to
    #[serde(default)]
    pub recipient: Option<String>,
    /// Occasion of the search the feedback refers to
    #[serde(default)]
    pub occasion: Option<String>,
    /// Interests of the search the feedback refers to
    #[serde(default, deserialize_with = "deserialize_interests")]
    #[schemars(with = "Vec<String>")]
    pub interests: Vec<String>,
}

impl From<SubmitFeedbackParams> for FeedbackEntry {
    fn from(params: SubmitFeedbackParams) -> Self {
        FeedbackEntry::new(params.comment).with_context(
            params.recipient,
            params.occasion,
            params.interests,
        )
    }
}
