//! Configuration loading
//!
//! Settings come from a TOML file, overridden by environment variables.
//! Everything is validated here, before any remote call is made.

mod env;

pub use env::{EnvSource, OsEnv, parse_authors, parse_ids};

use crate::digest::AuthorMatcher;
use crate::error::{Error, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;
use url::Url;

/// Config file used when neither `--config` nor `CONFIG_PATH` is given
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// GitLab instance used when none is configured
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";

/// Validated configuration for a run
#[derive(Debug, Clone)]
pub struct Config {
    /// GitLab base URL
    pub gitlab_url: String,
    /// GitLab access token
    pub gitlab_token: String,
    /// Slack incoming-webhook URL (absent only for dry runs)
    pub webhook_url: Option<String>,
    /// Root group IDs, in configured order
    pub groups: Vec<u64>,
    /// Explicit project IDs, in configured order
    pub projects: Vec<u64>,
    /// Author filter (empty keeps every merge request)
    pub authors: Vec<AuthorMatcher>,
    /// Cron schedule for daemon mode (None runs once)
    pub schedule: Option<cron::Schedule>,
    /// Timezone for schedules and rendered timestamps
    pub timezone: Tz,
}

/// Options that affect how configuration is loaded
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Config file given on the command line
    pub path: Option<PathBuf>,
    /// Print instead of posting, so no webhook is needed
    pub dry_run: bool,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    gitlab: FileGitLab,
    #[serde(default)]
    slack: FileSlack,
    #[serde(default)]
    groups: Vec<IdEntry>,
    #[serde(default)]
    projects: Vec<IdEntry>,
    #[serde(default)]
    authors: Vec<AuthorEntry>,
    cron_schedule: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileGitLab {
    url: Option<String>,
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSlack {
    webhook_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdEntry {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct AuthorEntry {
    id: Option<u64>,
    username: Option<String>,
}

impl TryFrom<AuthorEntry> for AuthorMatcher {
    type Error = Error;

    fn try_from(entry: AuthorEntry) -> Result<Self> {
        match (entry.id, entry.username) {
            (Some(0), None) => Err(Error::Config("author id must not be 0".to_string())),
            (Some(id), None) => Ok(Self::Id(id)),
            (None, Some(username)) if username.is_empty() => {
                Err(Error::Config("author username must not be empty".to_string()))
            }
            (None, Some(username)) => Ok(Self::Username(username)),
            (Some(_), Some(_)) => Err(Error::Config(
                "author entry must set either id or username, not both".to_string(),
            )),
            (None, None) => Err(Error::Config(
                "author entry must set id or username".to_string(),
            )),
        }
    }
}

/// Resolve which config file to read
fn config_path(env: &dyn EnvSource, options: &LoadOptions) -> PathBuf {
    options
        .path
        .clone()
        .or_else(|| env.non_empty("CONFIG_PATH").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Read and parse a config file
fn read_file(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

fn validate_url(what: &str, value: &str) -> Result<()> {
    let url = Url::parse(value).map_err(|e| Error::Config(format!("invalid {what} '{value}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "{what} must be an http(s) URL, got '{value}'"
        )));
    }
    Ok(())
}

/// Parse a cron expression (seconds field first, as the `cron` crate expects)
pub fn parse_schedule(expr: &str) -> Result<cron::Schedule> {
    cron::Schedule::from_str(expr)
        .map_err(|e| Error::Schedule(format!("invalid cron schedule '{expr}': {e}")))
}

/// Parse an IANA timezone name
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| Error::Schedule(format!("unknown timezone '{name}'")))
}

/// Load configuration from file and environment
///
/// A missing config file is fine unless it was passed explicitly; the
/// environment may provide everything.
pub fn load(env: &dyn EnvSource, options: &LoadOptions) -> Result<Config> {
    let path = config_path(env, options);

    let file = if path.exists() {
        debug!(path = %path.display(), "reading config file");
        read_file(&path)?
    } else if options.path.is_some() {
        return Err(Error::Config(format!(
            "config file {} not found",
            path.display()
        )));
    } else {
        debug!(path = %path.display(), "no config file, using environment only");
        FileConfig::default()
    };

    let groups = match env.non_empty("GROUPS") {
        Some(value) => parse_ids("GROUPS", &value)?,
        None => file.groups.iter().map(|g| g.id).collect(),
    };
    let projects = match env.non_empty("PROJECTS") {
        Some(value) => parse_ids("PROJECTS", &value)?,
        None => file.projects.iter().map(|p| p.id).collect(),
    };
    let authors = match env.non_empty("AUTHORS") {
        Some(value) => parse_authors(&value)?,
        None => file
            .authors
            .into_iter()
            .map(AuthorMatcher::try_from)
            .collect::<Result<Vec<_>>>()?,
    };

    let gitlab_url = env
        .non_empty("GITLAB_URL")
        .or(file.gitlab.url)
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_GITLAB_URL.to_string());
    validate_url("GitLab URL", &gitlab_url)?;

    let gitlab_token = env
        .non_empty("GITLAB_TOKEN")
        .or(file.gitlab.token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Config("GITLAB_TOKEN environment variable is required".to_string()))?;

    let webhook_url = env
        .non_empty("SLACK_WEBHOOK_URL")
        .or(file.slack.webhook_url)
        .filter(|u| !u.is_empty());
    match &webhook_url {
        Some(url) => validate_url("Slack webhook URL", url)?,
        None if !options.dry_run => {
            return Err(Error::Config(
                "SLACK_WEBHOOK_URL environment variable is required".to_string(),
            ));
        }
        None => {}
    }

    let schedule = env
        .non_empty("CRON_SCHEDULE")
        .or(file.cron_schedule)
        .filter(|s| !s.trim().is_empty())
        .map(|expr| parse_schedule(&expr))
        .transpose()?;

    let timezone = env
        .non_empty("TIMEZONE")
        .or(file.timezone)
        .filter(|s| !s.is_empty())
        .map_or(Ok(Tz::UTC), |name| parse_timezone(&name))?;

    if groups.is_empty() && projects.is_empty() {
        return Err(Error::Config(
            "neither groups nor projects were provided".to_string(),
        ));
    }

    Ok(Config {
        gitlab_url,
        gitlab_token,
        webhook_url,
        groups,
        projects,
        authors,
        schedule,
        timezone,
    })
}
