//! Mock collection client and notifier for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use mr_reminder::error::{Error, Result};
use mr_reminder::gitlab::{CollectionClient, MergeRequestFilter};
use mr_reminder::notify::Notifier;
use mr_reminder::types::{Group, MergeRequest, Page, PageMeta, Project};
use std::collections::HashMap;
use std::sync::Mutex;

/// A recorded call to the mock client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `list_subgroups`
    Subgroups { group_id: u64, page: u32, per_page: u32 },
    /// `list_group_projects`
    GroupProjects { group_id: u64, page: u32, per_page: u32 },
    /// `list_merge_requests`
    MergeRequests {
        project_id: u64,
        page: u32,
        per_page: u32,
        filter: MergeRequestFilter,
    },
    /// `get_approvals`
    Approvals { project_id: u64, mr_iid: u64 },
}

/// Split `pages` into `Page`s carrying GitLab-style pagination metadata
fn paginate<T: Clone>(pages: &[Vec<T>]) -> Vec<Page<T>> {
    let total = u32::try_from(pages.len()).unwrap().max(1);
    if pages.is_empty() {
        return vec![Page::new(Vec::new(), PageMeta::single())];
    }
    pages
        .iter()
        .zip(1..)
        .map(|(items, current)| {
            Page::new(
                items.clone(),
                PageMeta {
                    current_page: current,
                    next_page: (current < total).then_some(current + 1),
                    total_pages: total,
                },
            )
        })
        .collect()
}

fn page_or_empty<T: Clone>(pages: Option<&Vec<Page<T>>>, page: u32) -> Page<T> {
    pages
        .and_then(|p| p.get(page as usize - 1))
        .cloned()
        .unwrap_or_else(|| Page::new(Vec::new(), PageMeta::single()))
}

/// In-memory GitLab with canned responses
///
/// Unknown groups have no subgroups or projects, unknown projects have no
/// merge requests, and unknown merge requests have no approvers.
///
/// Features:
/// - Multi-page responses per group/project
/// - Call tracking for verification
/// - Error injection per call target
#[derive(Default)]
pub struct MockGitLab {
    subgroups: Mutex<HashMap<u64, Vec<Page<Group>>>>,
    group_projects: Mutex<HashMap<u64, Vec<Page<Project>>>>,
    merge_requests: Mutex<HashMap<u64, Vec<Page<MergeRequest>>>>,
    approvals: Mutex<HashMap<(u64, u64), Vec<String>>>,
    // Call tracking
    calls: Mutex<Vec<Call>>,
    // Error injection
    error_on_subgroups: Mutex<HashMap<u64, String>>,
    error_on_group_projects: Mutex<HashMap<u64, String>>,
    error_on_merge_requests: Mutex<HashMap<u64, String>>,
    error_on_approvals: Mutex<HashMap<(u64, u64), String>>,
}

impl MockGitLab {
    /// Create an empty mock
    pub fn new() -> Self {
        Self::default()
    }

    // === Response setup ===

    /// Set the direct subgroups of a group (single page)
    pub fn set_subgroups(&self, group_id: u64, subgroup_ids: &[u64]) {
        self.set_subgroup_pages(group_id, &[subgroup_ids]);
    }

    /// Set the direct subgroups of a group, one slice per page
    pub fn set_subgroup_pages(&self, group_id: u64, pages: &[&[u64]]) {
        let pages: Vec<Vec<Group>> = pages
            .iter()
            .map(|ids| ids.iter().map(|&id| group(id)).collect())
            .collect();
        self.subgroups
            .lock()
            .unwrap()
            .insert(group_id, paginate(&pages));
    }

    /// Set the projects of a group, one slice per page
    pub fn set_group_project_pages(&self, group_id: u64, pages: &[&[u64]]) {
        let pages: Vec<Vec<Project>> = pages
            .iter()
            .map(|ids| ids.iter().map(|&id| project(id)).collect())
            .collect();
        self.group_projects
            .lock()
            .unwrap()
            .insert(group_id, paginate(&pages));
    }

    /// Set the projects of a group (single page)
    pub fn set_group_projects(&self, group_id: u64, project_ids: &[u64]) {
        self.set_group_project_pages(group_id, &[project_ids]);
    }

    /// Set the open merge requests of a project, one vec per page
    pub fn set_merge_request_pages(&self, project_id: u64, pages: Vec<Vec<MergeRequest>>) {
        self.merge_requests
            .lock()
            .unwrap()
            .insert(project_id, paginate(&pages));
    }

    /// Set the open merge requests of a project (single page)
    pub fn set_merge_requests(&self, project_id: u64, mrs: Vec<MergeRequest>) {
        self.set_merge_request_pages(project_id, vec![mrs]);
    }

    /// Set the approver names of a merge request
    pub fn set_approvals(&self, project_id: u64, mr_iid: u64, names: &[&str]) {
        self.approvals.lock().unwrap().insert(
            (project_id, mr_iid),
            names.iter().map(ToString::to_string).collect(),
        );
    }

    // === Error injection methods ===

    /// Make `list_subgroups` fail for a group
    pub fn fail_subgroups(&self, group_id: u64, msg: &str) {
        self.error_on_subgroups
            .lock()
            .unwrap()
            .insert(group_id, msg.to_string());
    }

    /// Make `list_group_projects` fail for a group
    pub fn fail_group_projects(&self, group_id: u64, msg: &str) {
        self.error_on_group_projects
            .lock()
            .unwrap()
            .insert(group_id, msg.to_string());
    }

    /// Make `list_merge_requests` fail for a project
    pub fn fail_merge_requests(&self, project_id: u64, msg: &str) {
        self.error_on_merge_requests
            .lock()
            .unwrap()
            .insert(project_id, msg.to_string());
    }

    /// Make `get_approvals` fail for a merge request
    pub fn fail_approvals(&self, project_id: u64, mr_iid: u64, msg: &str) {
        self.error_on_approvals
            .lock()
            .unwrap()
            .insert((project_id, mr_iid), msg.to_string());
    }

    // === Call verification methods ===

    /// All calls, in the order they were made
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// `(group_id, page)` of every `list_group_projects` call
    pub fn group_project_calls(&self) -> Vec<(u64, u32)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::GroupProjects { group_id, page, .. } => Some((group_id, page)),
                _ => None,
            })
            .collect()
    }

    /// `(group_id, page)` of every `list_subgroups` call
    pub fn subgroup_calls(&self) -> Vec<(u64, u32)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Subgroups { group_id, page, .. } => Some((group_id, page)),
                _ => None,
            })
            .collect()
    }

    /// `(project_id, page)` of every `list_merge_requests` call
    pub fn merge_request_calls(&self) -> Vec<(u64, u32)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::MergeRequests {
                    project_id, page, ..
                } => Some((project_id, page)),
                _ => None,
            })
            .collect()
    }

    /// `(project_id, mr_iid)` of every `get_approvals` call
    pub fn approval_calls(&self) -> Vec<(u64, u64)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Approvals { project_id, mr_iid } => Some((project_id, mr_iid)),
                _ => None,
            })
            .collect()
    }

    /// Assert that every paginated call used the same page size
    pub fn assert_per_page(&self, expected: u32) {
        for call in self.calls() {
            let per_page = match call {
                Call::Subgroups { per_page, .. }
                | Call::GroupProjects { per_page, .. }
                | Call::MergeRequests { per_page, .. } => per_page,
                Call::Approvals { .. } => continue,
            };
            assert_eq!(per_page, expected, "unexpected page size in {call:?}");
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CollectionClient for MockGitLab {
    async fn list_subgroups(
        &self,
        group_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Group>> {
        self.record(Call::Subgroups {
            group_id,
            page,
            per_page,
        });
        if let Some(msg) = self.error_on_subgroups.lock().unwrap().get(&group_id) {
            return Err(Error::GitLabApi(msg.clone()));
        }
        Ok(page_or_empty(
            self.subgroups.lock().unwrap().get(&group_id),
            page,
        ))
    }

    async fn list_group_projects(
        &self,
        group_id: u64,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Project>> {
        self.record(Call::GroupProjects {
            group_id,
            page,
            per_page,
        });
        if let Some(msg) = self.error_on_group_projects.lock().unwrap().get(&group_id) {
            return Err(Error::GitLabApi(msg.clone()));
        }
        Ok(page_or_empty(
            self.group_projects.lock().unwrap().get(&group_id),
            page,
        ))
    }

    async fn list_merge_requests(
        &self,
        project_id: u64,
        filter: &MergeRequestFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Page<MergeRequest>> {
        self.record(Call::MergeRequests {
            project_id,
            page,
            per_page,
            filter: filter.clone(),
        });
        if let Some(msg) = self
            .error_on_merge_requests
            .lock()
            .unwrap()
            .get(&project_id)
        {
            return Err(Error::GitLabApi(msg.clone()));
        }
        Ok(page_or_empty(
            self.merge_requests.lock().unwrap().get(&project_id),
            page,
        ))
    }

    async fn get_approvals(&self, project_id: u64, mr_iid: u64) -> Result<Vec<String>> {
        self.record(Call::Approvals { project_id, mr_iid });
        if let Some(msg) = self
            .error_on_approvals
            .lock()
            .unwrap()
            .get(&(project_id, mr_iid))
        {
            return Err(Error::GitLabApi(msg.clone()));
        }
        Ok(self
            .approvals
            .lock()
            .unwrap()
            .get(&(project_id, mr_iid))
            .cloned()
            .unwrap_or_default())
    }
}

fn group(id: u64) -> Group {
    Group {
        id,
        full_path: format!("group-{id}"),
    }
}

fn project(id: u64) -> Project {
    Project {
        id,
        path_with_namespace: format!("group/project-{id}"),
    }
}

/// Notifier that records what it was asked to send
#[derive(Default)]
pub struct MockNotifier {
    sent: Mutex<Vec<String>>,
    error: Mutex<Option<String>>,
}

impl MockNotifier {
    /// Create a notifier that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `send` fail
    pub fn fail(&self, msg: &str) {
        *self.error.lock().unwrap() = Some(msg.to_string());
    }

    /// Every message sent so far
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        if let Some(msg) = self.error.lock().unwrap().clone() {
            return Err(Error::Webhook(msg));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
