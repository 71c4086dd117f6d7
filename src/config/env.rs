//! Environment variable access and parsing

use crate::digest::AuthorMatcher;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Source of environment variables
///
/// Lets tests supply variables without touching the process environment.
pub trait EnvSource {
    /// Value of `key`, if set
    fn var(&self, key: &str) -> Option<String>;

    /// Value of `key` if set to a non-empty string
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|v| !v.trim().is_empty())
    }
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEnv;

impl EnvSource for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<S: std::hash::BuildHasher> EnvSource for HashMap<String, String, S> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Parse a comma-separated list of numeric IDs from variable `name`
pub fn parse_ids(name: &str, value: &str) -> Result<Vec<u64>> {
    value
        .split(',')
        .map(str::trim)
        .map(|part| {
            part.parse::<u64>()
                .map_err(|e| Error::Config(format!("invalid ID '{part}' in {name}: {e}")))
        })
        .collect()
}

/// Parse a comma-separated list of author identities
///
/// All-digit entries are user IDs, anything else is a username.
pub fn parse_authors(value: &str) -> Result<Vec<AuthorMatcher>> {
    value
        .split(',')
        .map(str::trim)
        .map(|part| {
            if part.is_empty() {
                return Err(Error::Config("empty entry in AUTHORS".to_string()));
            }
            if part.bytes().all(|b| b.is_ascii_digit()) {
                match part.parse::<u64>() {
                    Ok(0) => Err(Error::Config("author ID 0 in AUTHORS".to_string())),
                    Ok(id) => Ok(AuthorMatcher::Id(id)),
                    Err(e) => Err(Error::Config(format!(
                        "invalid author ID '{part}' in AUTHORS: {e}"
                    ))),
                }
            } else {
                Ok(AuthorMatcher::Username(part.to_string()))
            }
        })
        .collect()
}
