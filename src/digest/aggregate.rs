//! Merge request aggregation
//!
//! Collects every open merge request of the configured projects (explicit
//! and group-derived) and attaches its approvers. All calls are issued
//! sequentially; the first failure aborts the whole aggregation.

use crate::digest::groups::group_project_ids;
use crate::error::{Error, Result, Stage};
use crate::gitlab::{CollectionClient, MergeRequestFilter, PER_PAGE, collect_pages};
use crate::types::EnrichedMergeRequest;
use tracing::debug;

/// Fetch open merge requests with their approvers
///
/// Projects are visited group-derived first (in group expansion order),
/// then `projects` in the given order. Duplicate project IDs are fetched
/// once per occurrence. Within a project, GitLab's updated-descending order
/// is kept.
pub async fn aggregate(
    client: &dyn CollectionClient,
    groups: &[u64],
    projects: &[u64],
) -> Result<Vec<EnrichedMergeRequest>> {
    let mut project_ids = group_project_ids(client, groups).await?;
    project_ids.extend_from_slice(projects);
    debug!(projects = project_ids.len(), "aggregating merge requests");

    let mut result = Vec::new();
    for project_id in project_ids {
        let mrs = collect_pages(move |page| {
            client.list_merge_requests(project_id, &MergeRequestFilter::OPEN, page, PER_PAGE)
        })
        .await
        .map_err(|e| {
            Error::fetch(
                Stage::MergeRequestListing,
                format!("project {project_id}"),
                e,
            )
        })?;

        for merge_request in mrs {
            let approved_by = client
                .get_approvals(project_id, merge_request.iid)
                .await
                .map_err(|e| {
                    Error::fetch(
                        Stage::ApprovalFetch,
                        format!("merge request !{} of project {project_id}", merge_request.iid),
                        e,
                    )
                })?;

            result.push(EnrichedMergeRequest {
                merge_request,
                approved_by,
            });
        }
    }

    debug!(count = result.len(), "aggregated merge requests");
    Ok(result)
}
