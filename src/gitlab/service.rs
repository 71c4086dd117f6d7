//! GitLab REST v4 implementation of [`CollectionClient`]

use crate::error::{Error, Result};
use crate::gitlab::{CollectionClient, MergeRequestFilter};
use crate::types::{Author, Group, MergeRequest, MrState, Page, PageMeta, Project};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// GitLab service using reqwest
pub struct GitLabService {
    client: Client,
    token: String,
    base_url: String,
}

#[derive(Deserialize)]
struct WireUser {
    id: u64,
    username: String,
    name: String,
}

#[derive(Deserialize)]
struct WireMergeRequest {
    iid: u64,
    project_id: u64,
    title: String,
    web_url: String,
    author: WireUser,
    created_at: DateTime<Utc>,
    state: String, // "opened", "closed", "merged", "locked"
    #[serde(default = "resolved_by_default")]
    blocking_discussions_resolved: bool,
}

/// Absent on instances that don't track blocking discussions
const fn resolved_by_default() -> bool {
    true
}

/// MR approvals response
#[derive(Deserialize)]
struct MrApprovals {
    #[serde(default)]
    approved_by: Vec<Approver>,
}

#[derive(Deserialize)]
struct Approver {
    user: ApproverUser,
}

#[derive(Deserialize)]
struct ApproverUser {
    name: String,
}

impl From<WireUser> for Author {
    fn from(user: WireUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
            name: user.name,
        }
    }
}

impl From<WireMergeRequest> for MergeRequest {
    fn from(mr: WireMergeRequest) -> Self {
        let state = match mr.state.as_str() {
            "opened" => MrState::Opened,
            "merged" => MrState::Merged,
            "locked" => MrState::Locked,
            _ => MrState::Closed,
        };

        Self {
            project_id: mr.project_id,
            iid: mr.iid,
            title: mr.title,
            web_url: mr.web_url,
            author: mr.author.into(),
            created_at: mr.created_at,
            state,
            has_unresolved_discussions: !mr.blocking_discussions_resolved,
        }
    }
}

/// Read pagination metadata from GitLab's `x-*` response headers
///
/// `x-total-pages` is omitted for very large collections; in that case the
/// total is derived from whether `x-next-page` is present.
fn page_meta(headers: &HeaderMap, requested_page: u32) -> PageMeta {
    let get_header = |name: &str| -> Option<u32> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse().ok())
    };

    let current_page = get_header("x-page").unwrap_or(requested_page);
    let next_page = get_header("x-next-page");
    let total_pages = get_header("x-total-pages").unwrap_or_else(|| {
        if next_page.is_some() {
            current_page.saturating_add(1)
        } else {
            current_page
        }
    });

    PageMeta {
        current_page,
        next_page,
        total_pages,
    }
}

impl GitLabService {
    /// Create a new GitLab service for the instance at `base_url`
    pub fn new(base_url: &str, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::GitLabApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url, path)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        page: u32,
        per_page: u32,
    ) -> Result<Page<T>> {
        let url = self.api_url(path);

        let response = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .query(query)
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?;

        let meta = page_meta(response.headers(), page);
        let items: Vec<T> = response.json().await?;

        Ok(Page::new(items, meta))
    }
}

#[async_trait]
impl CollectionClient for GitLabService {
    async fn list_subgroups(
        &self,
        group_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Group>> {
        debug!(group_id, page, "listing subgroups");
        let groups: Page<Group> = self
            .get_page(&format!("/groups/{group_id}/subgroups"), &[], page, per_page)
            .await?;
        debug!(group_id, count = groups.items.len(), "listed subgroups");
        Ok(groups)
    }

    async fn list_group_projects(
        &self,
        group_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Project>> {
        debug!(group_id, page, "listing group projects");
        let projects: Page<Project> = self
            .get_page(&format!("/groups/{group_id}/projects"), &[], page, per_page)
            .await?;
        debug!(
            group_id,
            count = projects.items.len(),
            "listed group projects"
        );
        Ok(projects)
    }

    async fn list_merge_requests(
        &self,
        project_id: u64,
        filter: &MergeRequestFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Page<MergeRequest>> {
        debug!(project_id, page, "listing merge requests");
        let Page { items, meta } = self
            .get_page::<WireMergeRequest>(
                &format!("/projects/{project_id}/merge_requests"),
                &filter.as_query(),
                page,
                per_page,
            )
            .await?;

        let mrs: Vec<MergeRequest> = items.into_iter().map(Into::into).collect();
        debug!(project_id, count = mrs.len(), "listed merge requests");
        Ok(Page::new(mrs, meta))
    }

    async fn get_approvals(&self, project_id: u64, mr_iid: u64) -> Result<Vec<String>> {
        debug!(project_id, mr_iid, "getting MR approvals");
        let url = self.api_url(&format!(
            "/projects/{project_id}/merge_requests/{mr_iid}/approvals"
        ));

        let approvals: MrApprovals = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        let names: Vec<String> = approvals
            .approved_by
            .into_iter()
            .map(|a| a.user.name)
            .collect();
        debug!(project_id, mr_iid, count = names.len(), "got MR approvals");
        Ok(names)
    }
}
