//! Core types for mr-reminder

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A GitLab group (container of projects and subgroups)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Group {
    /// Group ID
    pub id: u64,
    /// Full namespace path (e.g. "acme/backend")
    #[serde(default)]
    pub full_path: String,
}

/// A GitLab project
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Project {
    /// Project ID
    pub id: u64,
    /// Path including namespace (e.g. "acme/backend/api")
    #[serde(default)]
    pub path_with_namespace: String,
}

/// Author of a merge request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Author {
    /// Numeric user ID
    pub id: u64,
    /// Login name
    pub username: String,
    /// Display name
    pub name: String,
}

/// Merge request state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MrState {
    /// Open and awaiting review
    Opened,
    /// Closed without merging
    Closed,
    /// Merged
    Merged,
    /// Locked while a merge is in progress
    Locked,
}

/// A merge request snapshot, fetched fresh every run
#[derive(Debug, Clone)]
pub struct MergeRequest {
    /// Project the merge request belongs to
    pub project_id: u64,
    /// Per-project sequence number (the `!N` number)
    pub iid: u64,
    /// Title
    pub title: String,
    /// Web URL
    pub web_url: String,
    /// Author identity
    pub author: Author,
    /// When the merge request was opened
    pub created_at: DateTime<Utc>,
    /// Current state
    pub state: MrState,
    /// Whether blocking discussions are still unresolved
    pub has_unresolved_discussions: bool,
}

/// A merge request paired with the display names of its approvers
#[derive(Debug, Clone)]
pub struct EnrichedMergeRequest {
    /// The merge request
    pub merge_request: MergeRequest,
    /// Approver display names, in the order GitLab returned them
    pub approved_by: Vec<String>,
}

/// Pagination metadata of a single page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    /// Page this response corresponds to (1-based)
    pub current_page: u32,
    /// Next page to request, if any
    pub next_page: Option<u32>,
    /// Total number of pages
    pub total_pages: u32,
}

impl PageMeta {
    /// Metadata for a collection that fits on a single page
    pub const fn single() -> Self {
        Self {
            current_page: 1,
            next_page: None,
            total_pages: 1,
        }
    }

    /// Whether this is the last page to request
    pub const fn is_last(&self) -> bool {
        self.current_page >= self.total_pages || self.next_page.is_none()
    }
}

/// One page of a paginated collection
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Pagination metadata
    pub meta: PageMeta,
}

impl<T> Page<T> {
    /// Create a page from items and metadata
    pub const fn new(items: Vec<T>, meta: PageMeta) -> Self {
        Self { items, meta }
    }
}
