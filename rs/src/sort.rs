//! Presentation ordering of scored results

use crate::models::ScoredGift;
use crate::price::estimate_price;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Axis to order results by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Engine order: total score, then keyword relevance
    #[default]
    Relevance,
    /// Cheapest first
    Price,
    /// Best rated first
    Rating,
    /// Most popular first
    Popularity,
}

/// Stable re-sort of already scored results
///
/// `Relevance` keeps the incoming order. Missing ratings and popularity count as 0.
pub fn sort_gifts(gifts: &mut [ScoredGift], sort_by: SortBy) {
    match sort_by {
        SortBy::Relevance => {}
        SortBy::Price => gifts.sort_by(|a, b| {
            estimate_price(&a.gift.price_range).total_cmp(&estimate_price(&b.gift.price_range))
        }),
        SortBy::Rating => gifts.sort_by(|a, b| descending(a.gift.rating, b.gift.rating)),
        SortBy::Popularity => gifts.sort_by(|a, b| descending(a.gift.popularity, b.gift.popularity)),
    }
}

/// Engine default order: total score then relevance, both descending
pub fn rank_by_score(gifts: &mut [ScoredGift]) {
    gifts.sort_by(|a, b| {
        b.score
            .total_score
            .total_cmp(&a.score.total_score)
            .then_with(|| b.relevance_score.total_cmp(&a.relevance_score))
    });
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    b.unwrap_or(0.0).total_cmp(&a.unwrap_or(0.0))
}
