//! Group expansion and project resolution
//!
//! Turns the configured root groups into the ordered list of project IDs
//! they own, descending into subgroups.

use crate::error::{Error, Result, Stage};
use crate::gitlab::{CollectionClient, PER_PAGE, collect_pages};
use tracing::{debug, warn};

/// Expand root groups into themselves plus every reachable subgroup
///
/// Depth-first per root, roots in the given order, subgroups in the order
/// GitLab lists them. Each root is expanded on its own, so a repeated root
/// or a root nested under an earlier one shows up once per occurrence. A
/// group that is its own ancestor (a back-link in a malformed hierarchy) is
/// skipped instead of descended into again.
pub async fn expand_groups(client: &dyn CollectionClient, roots: &[u64]) -> Result<Vec<u64>> {
    let mut expanded = Vec::new();

    for &root in roots {
        // Explicit stack keeps the pre-order of a recursive descent; `path`
        // holds the ancestors of the group being visited
        let mut pending = vec![(root, 0)];
        let mut path: Vec<u64> = Vec::new();

        while let Some((group_id, depth)) = pending.pop() {
            path.truncate(depth);
            if path.contains(&group_id) {
                warn!(group_id, root, "group is its own ancestor, skipping");
                continue;
            }
            path.push(group_id);
            expanded.push(group_id);

            let subgroups = list_subgroups(client, group_id).await?;
            pending.extend(subgroups.into_iter().rev().map(|id| (id, depth + 1)));
        }
    }

    debug!(
        roots = roots.len(),
        groups = expanded.len(),
        "expanded groups"
    );
    Ok(expanded)
}

/// Project IDs directly owned by each group, in group order
///
/// Projects shared between groups appear once per owning group.
pub async fn resolve_projects(
    client: &dyn CollectionClient,
    group_ids: &[u64],
) -> Result<Vec<u64>> {
    let mut project_ids = Vec::new();

    for &group_id in group_ids {
        let projects = collect_pages(move |page| client.list_group_projects(group_id, page, PER_PAGE))
            .await
            .map_err(|e| Error::fetch(Stage::ProjectListing, format!("group {group_id}"), e))?;

        project_ids.extend(projects.into_iter().map(|p| {
            debug!(group_id, project_id = p.id, path = %p.path_with_namespace, "found group project");
            p.id
        }));
    }

    debug!(count = project_ids.len(), "resolved group projects");
    Ok(project_ids)
}

/// Expand `roots` and resolve the projects of every resulting group
pub async fn group_project_ids(client: &dyn CollectionClient, roots: &[u64]) -> Result<Vec<u64>> {
    if roots.is_empty() {
        return Ok(Vec::new());
    }
    let groups = expand_groups(client, roots).await?;
    resolve_projects(client, &groups).await
}

async fn list_subgroups(client: &dyn CollectionClient, group_id: u64) -> Result<Vec<u64>> {
    let subgroups = collect_pages(move |page| client.list_subgroups(group_id, page, PER_PAGE))
        .await
        .map_err(|e| Error::fetch(Stage::SubgroupListing, format!("group {group_id}"), e))?;

    Ok(subgroups
        .into_iter()
        .map(|g| {
            debug!(parent = group_id, group_id = g.id, path = %g.full_path, "found subgroup");
            g.id
        })
        .collect())
}
