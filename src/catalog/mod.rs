//! Topic and Snippet Catalog
//!
//! Data model for topics and their feedback-tagged snippets, plus the store
//! interfaces the generation core reads from and writes into.

pub mod feedback;
pub mod persistence;

pub use feedback::{FeedbackCategorization, FeedbackUpdate};
pub use persistence::SledCatalogStore;

use crate::error::StorageError;
use crate::types::{SnippetId, TopicId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named subject area. Read-only from the generation core's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub topic_id: TopicId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A short educational text unit owned by exactly one topic.
///
/// `liked` and `disliked` are never both true; see [`FeedbackUpdate::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub snippet_id: SnippetId,
    pub topic_id: TopicId,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub liked: bool,
    pub disliked: bool,
    pub deep_dive: bool,
}

/// Topic lookups consumed by the generation core
pub trait TopicStore: Send + Sync {
    /// All topics in a stable order (ascending id).
    fn list_topics(&self) -> Result<Vec<Topic>, StorageError>;

    fn get_topic(&self, topic_id: TopicId) -> Result<Option<Topic>, StorageError>;
}

/// Snippet history reads and generated-snippet writes
pub trait SnippetStore: Send + Sync {
    /// Snippets of one topic in creation order.
    fn list_snippets(&self, topic_id: TopicId) -> Result<Vec<Snippet>, StorageError>;

    /// Create a single snippet with all feedback flags cleared.
    fn create_snippet(&self, topic_id: TopicId, body: &str) -> Result<Snippet, StorageError>;

    /// Create several snippets for one topic in a single transaction.
    ///
    /// Either every body is committed or none is.
    fn create_snippets(
        &self,
        topic_id: TopicId,
        bodies: &[String],
    ) -> Result<Vec<Snippet>, StorageError>;
}

/// Everything a generation pass needs from storage.
pub trait CatalogStore: TopicStore + SnippetStore {}

impl<T: TopicStore + SnippetStore + ?Sized> CatalogStore for T {}

/// Filtered, paginated snippet listing (newest first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetQuery {
    pub topic_id: Option<TopicId>,
    pub liked: Option<bool>,
    pub disliked: Option<bool>,
    pub deep_dive: Option<bool>,
    pub limit: usize,
    pub offset: usize,
}

impl SnippetQuery {
    pub const DEFAULT_LIMIT: usize = 50;
    pub const MAX_LIMIT: usize = 100;

    pub fn matches(&self, snippet: &Snippet) -> bool {
        self.topic_id.map_or(true, |id| snippet.topic_id == id)
            && self.liked.map_or(true, |v| snippet.liked == v)
            && self.disliked.map_or(true, |v| snippet.disliked == v)
            && self.deep_dive.map_or(true, |v| snippet.deep_dive == v)
    }

    /// Limit clamped into `1..=MAX_LIMIT`.
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }
}

impl Default for SnippetQuery {
    fn default() -> Self {
        Self {
            topic_id: None,
            liked: None,
            disliked: None,
            deep_dive: None,
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// One page of a [`SnippetQuery`]
#[derive(Debug, Clone, Serialize)]
pub struct SnippetPage {
    pub snippets: Vec<Snippet>,
    pub total_count: usize,
    pub has_more: bool,
    pub next_offset: Option<usize>,
}

/// Aggregate feedback counters across the whole catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total_topics: usize,
    pub total_snippets: usize,
    pub liked_snippets: usize,
    pub disliked_snippets: usize,
    pub deep_dive_snippets: usize,
    /// Percentage of snippets with like or dislike feedback, one decimal.
    pub engagement_rate: f64,
}

impl CatalogStats {
    pub fn engagement_rate(liked: usize, disliked: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let rate = (liked + disliked) as f64 / total as f64 * 100.0;
        (rate * 10.0).round() / 10.0
    }
}
