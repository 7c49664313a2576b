//! Search orchestration
//!
//! One search runs the whole pipeline: filter the catalog, profile each
//! candidate and the query, score, decorate for presentation, order and page.

use crate::catalog::CatalogSource;
use crate::config::EngineConfig;
use crate::constants::{
    SEASONAL_MIN_OCCASION_FIT, SEASONAL_OCCASIONS, TOP_LABEL_THRESHOLD, TOP_RATED_MIN_RATING,
    TOP_RATED_MIN_REVIEWS, TRENDING_MIN_TREND_SCORE,
};
use crate::feedback::{FeedbackAdapter, FeedbackError, SharedFeedback};
use crate::filter::FilterPipeline;
use crate::models::{FeedbackEntry, Gift, GiftQuery, ScoredGift, TrendingBadge};
use crate::profile::{top_labels, user_profile_from_query, SemanticProfiler};
use crate::scoring::{GiftScore, GiftScorer};
use crate::sort::{rank_by_score, sort_gifts, SortBy};
use std::sync::PoisonError;
use tracing::{debug, info, warn};

/// Gift recommendation engine
pub struct GiftEngine {
    profiler: SemanticProfiler,
    filter: FilterPipeline,
    scorer: GiftScorer,
    feedback: SharedFeedback,
}

impl GiftEngine {
    /// Create an engine reading feedback from the given shared adapter
    pub fn new(config: EngineConfig, feedback: SharedFeedback) -> Self {
        Self {
            profiler: SemanticProfiler::new(config.price),
            filter: FilterPipeline::new(config.gate, config.budget),
            scorer: GiftScorer::new(config.weights, config.trend),
            feedback,
        }
    }

    /// Handle to the feedback adapter this engine reads
    pub fn feedback(&self) -> SharedFeedback {
        SharedFeedback::clone(&self.feedback)
    }

    /// Register relevance feedback; later searches see the new boosts
    pub fn submit_feedback(&self, entry: FeedbackEntry) -> Result<(), FeedbackError> {
        let mut adapter = self.feedback.write().unwrap_or_else(PoisonError::into_inner);
        let result = adapter.submit(entry);
        if let Err(e) = &result {
            warn!("Rejected feedback: {}", e);
        }
        result
    }

    /// Rank the catalog for a query
    ///
    /// An empty catalog yields an empty result.
    pub fn search(&self, catalog: &[Gift], query: &GiftQuery, sort_by: SortBy) -> Vec<ScoredGift> {
        if catalog.is_empty() {
            debug!("Empty catalog, nothing to rank");
            return Vec::new();
        }

        let candidates = {
            let feedback = self.feedback.read().unwrap_or_else(PoisonError::into_inner);
            self.filter.filter(catalog, query, &feedback)
        };

        let user_profile = user_profile_from_query(&query.interests, &query.occasion, &query.recipient);
        debug!("Query profile: {:?}", user_profile);

        let mut results: Vec<ScoredGift> = candidates
            .into_iter()
            .map(|candidate| {
                let item_profile = self.profiler.profile_gift(candidate.gift);
                let score = self.scorer.score(candidate.gift, &item_profile, &user_profile, query);
                let labels = top_labels(&item_profile, TOP_LABEL_THRESHOLD);

                ScoredGift {
                    match_reason: match_reason(&score, query),
                    trending_badge: trending_badge(candidate.gift, &score, query),
                    gift: candidate.gift.clone(),
                    score,
                    relevance_score: candidate.relevance_score,
                    labels,
                }
            })
            .collect();

        rank_by_score(&mut results);
        sort_gifts(&mut results, sort_by);

        let total = results.len();
        let limit = query.limit.unwrap_or_default();
        let page: Vec<ScoredGift> = results
            .into_iter()
            .skip(limit.offset)
            .take(limit.count)
            .collect();

        info!(
            "Search ranked {} of {} catalog items, returning {}",
            total,
            catalog.len(),
            page.len()
        );
        page
    }

    /// Load the catalog from a source and rank it
    pub async fn search_source(
        &self,
        source: &dyn CatalogSource,
        query: &GiftQuery,
        sort_by: SortBy,
    ) -> crate::Result<Vec<ScoredGift>> {
        let catalog = source.load_catalog().await?;
        Ok(self.search(&catalog, query, sort_by))
    }
}

impl Default for GiftEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default(), FeedbackAdapter::shared())
    }
}

fn match_reason(score: &GiftScore, query: &GiftQuery) -> String {
    if let Some(first) = score.explanations.first() {
        return first.clone();
    }
    let recipient = query.recipient.trim();
    if recipient.is_empty() {
        "Past bij jouw zoekopdracht".to_string()
    } else {
        format!("Past bij {}", recipient)
    }
}

fn trending_badge(gift: &Gift, score: &GiftScore, query: &GiftQuery) -> Option<TrendingBadge> {
    let rating = gift.rating.unwrap_or(0.0);
    let reviews = gift.review_count.unwrap_or(0);
    if rating >= TOP_RATED_MIN_RATING && reviews > TOP_RATED_MIN_REVIEWS {
        return Some(TrendingBadge::TopRated);
    }

    let occasion = query.occasion.to_lowercase();
    let seasonal = SEASONAL_OCCASIONS.iter().any(|holiday| occasion.contains(holiday));
    if seasonal && score.occasion_fit >= SEASONAL_MIN_OCCASION_FIT {
        return Some(TrendingBadge::Seasonal);
    }

    if score.trend_score >= TRENDING_MIN_TREND_SCORE {
        return Some(TrendingBadge::Trending);
    }
    None
}
