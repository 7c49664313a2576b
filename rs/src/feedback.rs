//! Relevance feedback adapter
//!
//! Keeps a rolling buffer of free-text feedback and derives keyword weights
//! from it. Products mentioning a weighted keyword get a small boost in the
//! keyword relevance channel. Keywords match as plain substrings.

use crate::constants::{
    FEEDBACK_BOOST_PER_WEIGHT, FEEDBACK_BUFFER_CAPACITY, FEEDBACK_KEYWORD_WHITELIST,
    FEEDBACK_WEIGHT_CAP,
};
use crate::models::FeedbackEntry;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when submitting feedback
#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Feedback comment is empty")]
    EmptyComment,
}

/// Feedback adapter shared between an engine and whoever submits feedback
pub type SharedFeedback = Arc<RwLock<FeedbackAdapter>>;

/// Rolling feedback buffer with derived keyword weights
#[derive(Debug, Clone, Default)]
pub struct FeedbackAdapter {
    entries: VecDeque<FeedbackEntry>,
    keyword_weights: BTreeMap<String, u32>,
}

impl FeedbackAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh adapter for sharing
    pub fn shared() -> SharedFeedback {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Add an entry, evicting the oldest past capacity, and rebuild the weights
    pub fn submit(&mut self, entry: FeedbackEntry) -> Result<(), FeedbackError> {
        if entry.comment.trim().is_empty() {
            return Err(FeedbackError::EmptyComment);
        }

        debug!("Registering feedback {}", entry.id);
        self.entries.push_back(entry);
        while self.entries.len() > FEEDBACK_BUFFER_CAPACITY {
            self.entries.pop_front();
        }
        self.rebuild();

        info!(
            "Feedback buffer holds {} entries, {} weighted keywords",
            self.entries.len(),
            self.keyword_weights.len()
        );
        Ok(())
    }

    /// Recompute keyword weights from the buffered entries
    fn rebuild(&mut self) {
        let mut weights = BTreeMap::new();
        for entry in &self.entries {
            let text = entry.searchable_text();
            for keyword in FEEDBACK_KEYWORD_WHITELIST {
                if text.contains(keyword) {
                    *weights.entry(keyword.to_string()).or_insert(0) += 1;
                }
            }
        }
        self.keyword_weights = weights;
    }

    /// Number of entries mentioning each keyword
    pub fn keyword_weights(&self) -> &BTreeMap<String, u32> {
        &self.keyword_weights
    }

    /// Relevance boost for lowercased product text
    pub fn boost(&self, product_text: &str) -> f64 {
        self.keyword_weights
            .iter()
            .filter(|(keyword, _)| product_text.contains(keyword.as_str()))
            .map(|(_, weight)| (*weight).min(FEEDBACK_WEIGHT_CAP) as f64 * FEEDBACK_BOOST_PER_WEIGHT)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Buffered entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &FeedbackEntry> {
        self.entries.iter()
    }
}
