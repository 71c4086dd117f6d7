//! mr-reminder - periodic digest of open GitLab merge requests
//!
//! Collects the open merge requests of configured projects and groups
//! (including subgroups), attaches approvers, optionally filters by
//! author, and posts a summary to a Slack webhook.

pub mod config;
pub mod digest;
pub mod error;
pub mod gitlab;
pub mod notify;
pub mod run;
pub mod schedule;
pub mod types;
