//! GitLab collection access
//!
//! The digest pipeline only talks to GitLab through [`CollectionClient`],
//! so tests can swap in canned responses for the real HTTP adapter.

mod service;

pub use service::GitLabService;

use crate::error::Result;
use crate::types::{Group, MergeRequest, Page, Project};
use async_trait::async_trait;
use std::future::Future;
use tracing::{debug, warn};

/// Page size used for every paginated call
pub const PER_PAGE: u32 = 50;

/// Query parameters applied to every merge request listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestFilter {
    /// Merge request state (`opened`)
    pub state: &'static str,
    /// Ordering field (`updated_at`)
    pub order_by: &'static str,
    /// Sort direction (`desc`)
    pub sort: &'static str,
    /// Work-in-progress/draft filter (`no` excludes drafts)
    pub wip: &'static str,
}

impl MergeRequestFilter {
    /// Open, non-draft merge requests, most recently updated first
    pub const OPEN: Self = Self {
        state: "opened",
        order_by: "updated_at",
        sort: "desc",
        wip: "no",
    };

    /// The filter as query parameters
    pub const fn as_query(&self) -> [(&'static str, &'static str); 4] {
        [
            ("state", self.state),
            ("order_by", self.order_by),
            ("sort", self.sort),
            ("wip", self.wip),
        ]
    }
}

/// Paginated read access to groups, projects and merge requests
#[async_trait]
pub trait CollectionClient: Send + Sync {
    /// List the direct subgroups of a group
    async fn list_subgroups(&self, group_id: u64, page: u32, per_page: u32)
    -> Result<Page<Group>>;

    /// List the projects directly owned by a group
    async fn list_group_projects(
        &self,
        group_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Project>>;

    /// List merge requests of a project matching `filter`
    async fn list_merge_requests(
        &self,
        project_id: u64,
        filter: &MergeRequestFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Page<MergeRequest>>;

    /// Display names of the users who approved a merge request
    async fn get_approvals(&self, project_id: u64, mr_iid: u64) -> Result<Vec<String>>;
}

/// Exhaust a paginated collection
///
/// Requests page 1, then follows `next_page` until the response reports
/// `current_page >= total_pages`. A missing `next_page`, or one that does
/// not move past the page just fetched, also ends it. Items are
/// concatenated in page order. The first failing page aborts the traversal.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        let Page { items: batch, meta } = fetch(page).await?;
        debug!(
            page,
            count = batch.len(),
            total_pages = meta.total_pages,
            "fetched page"
        );
        items.extend(batch);

        if meta.is_last() {
            break;
        }
        match meta.next_page {
            Some(next) if next > page => page = next,
            Some(next) => {
                warn!(page, next, "next page does not advance, stopping pagination");
                break;
            }
            None => break,
        }
    }

    Ok(items)
}
