//! Error types for mr-reminder

use thiserror::Error;

/// Pipeline stage a remote call belonged to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Listing the subgroups of a group
    SubgroupListing,
    /// Listing the projects of a group
    ProjectListing,
    /// Listing the open merge requests of a project
    MergeRequestListing,
    /// Fetching the approvals of a merge request
    ApprovalFetch,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubgroupListing => write!(f, "subgroup listing"),
            Self::ProjectListing => write!(f, "project listing"),
            Self::MergeRequestListing => write!(f, "merge request listing"),
            Self::ApprovalFetch => write!(f, "approval fetch"),
        }
    }
}

/// Errors that can occur in mr-reminder
#[derive(Error, Debug)]
pub enum Error {
    /// GitLab answered with an error status or an unexpected body
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A remote call inside the digest pipeline failed
    #[error("{stage} failed for {target}: {source}")]
    Fetch {
        /// Stage the failing call belonged to
        stage: Stage,
        /// What was being fetched (e.g. "group 12")
        target: String,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Invalid or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Delivering the summary failed
    #[error("webhook error: {0}")]
    Webhook(String),

    /// Invalid schedule or timezone
    #[error("schedule error: {0}")]
    Schedule(String),
}

impl Error {
    /// Wrap a remote failure with the stage and target it happened in
    pub fn fetch(stage: Stage, target: impl Into<String>, source: Self) -> Self {
        Self::Fetch {
            stage,
            target: target.into(),
            source: Box::new(source),
        }
    }

    /// Stage of a wrapped remote failure, if this is one
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Fetch { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
