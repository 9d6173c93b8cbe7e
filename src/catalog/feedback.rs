//! Feedback flags: partial updates with like/dislike exclusion, and the
//! per-topic categorization consumed by prompt construction.

use crate::catalog::Snippet;
use serde::{Deserialize, Serialize};

/// Partial feedback update. `None` leaves the flag untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackUpdate {
    pub liked: Option<bool>,
    pub disliked: Option<bool>,
    pub deep_dive: Option<bool>,
}

impl FeedbackUpdate {
    pub fn is_empty(&self) -> bool {
        self.liked.is_none() && self.disliked.is_none() && self.deep_dive.is_none()
    }

    /// Apply the update in field order: liked, then disliked, then deep_dive.
    ///
    /// Setting `liked = true` clears `disliked` and vice versa; `deep_dive` is
    /// independent of both. When an update sets both to true the later field
    /// (disliked) wins.
    pub fn apply(&self, snippet: &mut Snippet) {
        if let Some(liked) = self.liked {
            snippet.liked = liked;
            if liked {
                snippet.disliked = false;
            }
        }

        if let Some(disliked) = self.disliked {
            snippet.disliked = disliked;
            if disliked {
                snippet.liked = false;
            }
        }

        if let Some(deep_dive) = self.deep_dive {
            snippet.deep_dive = deep_dive;
        }
    }
}

/// Derived view over a topic's history, partitioned by feedback flag.
///
/// Recomputed for every generation pass. Order inside each category follows
/// the order of the history it was built from. A snippet flagged for deep
/// dive can also appear under liked or disliked.
#[derive(Debug, Clone, Default)]
pub struct FeedbackCategorization<'a> {
    pub liked: Vec<&'a Snippet>,
    pub disliked: Vec<&'a Snippet>,
    pub deep_dive: Vec<&'a Snippet>,
}

impl<'a> FeedbackCategorization<'a> {
    pub fn from_history(history: &'a [Snippet]) -> Self {
        let mut view = Self::default();
        for snippet in history {
            if snippet.liked {
                view.liked.push(snippet);
            }
            if snippet.disliked {
                view.disliked.push(snippet);
            }
            if snippet.deep_dive {
                view.deep_dive.push(snippet);
            }
        }
        view
    }

    pub fn is_empty(&self) -> bool {
        self.liked.is_empty() && self.disliked.is_empty() && self.deep_dive.is_empty()
    }
}
