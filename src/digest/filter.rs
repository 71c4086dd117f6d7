//! Author filtering

use crate::types::{Author, EnrichedMergeRequest};

/// Identity a merge request author is matched against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorMatcher {
    /// Numeric user ID (zero never matches)
    Id(u64),
    /// Exact, case-sensitive username (empty never matches)
    Username(String),
}

impl AuthorMatcher {
    /// Check whether `author` is this identity
    pub fn matches(&self, author: &Author) -> bool {
        match self {
            Self::Id(id) => *id != 0 && *id == author.id,
            Self::Username(username) => !username.is_empty() && *username == author.username,
        }
    }
}

/// Keep merge requests authored by any of `matchers`
///
/// An empty matcher list keeps everything. Relative order is preserved and
/// each merge request is kept at most once, however many matchers it hits.
pub fn filter_by_author(
    mrs: Vec<EnrichedMergeRequest>,
    matchers: &[AuthorMatcher],
) -> Vec<EnrichedMergeRequest> {
    if matchers.is_empty() {
        return mrs;
    }

    mrs.into_iter()
        .filter(|mr| {
            matchers
                .iter()
                .any(|m| m.matches(&mr.merge_request.author))
        })
        .collect()
}
