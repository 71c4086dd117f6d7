//! Merge request digest pipeline
//!
//! Group expansion → aggregation → author filtering → rendering.
//! 1. Gather - expand groups and fetch merge requests with approvals (effectful)
//! 2. Filter - keep merge requests by configured authors (pure)
//! 3. Render - build the summary text (pure)

mod aggregate;
mod filter;
mod groups;
mod render;

pub use aggregate::aggregate;
pub use filter::{AuthorMatcher, filter_by_author};
pub use groups::{expand_groups, group_project_ids, resolve_projects};
pub use render::render_summary;
