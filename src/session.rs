//! Local session resolution
//!
//! Region and profile come from the document first, then the
//! `DAGCTL_REGION` / `DAGCTL_PROFILE` environment variables, then the
//! config file. Region falls back to `local`.

use dagkit::{GraphDocument, Session};

use crate::config::Config;

pub const ENV_REGION: &str = "DAGCTL_REGION";
pub const ENV_PROFILE: &str = "DAGCTL_PROFILE";

const DEFAULT_REGION: &str = "local";

/// Session for services that act on the local machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSession {
    region: String,
    profile: Option<String>,
}

impl LocalSession {
    /// Resolve from the process environment
    pub fn resolve(document: &GraphDocument, config: &Config) -> Self {
        Self::resolve_with(document, config, |key| std::env::var(key).ok())
    }

    /// Resolve with an injectable environment lookup
    pub fn resolve_with<F>(document: &GraphDocument, config: &Config, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let region = non_empty(document.region.clone())
            .or_else(|| non_empty(env(ENV_REGION)))
            .or_else(|| non_empty(config.region.clone()))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let profile = non_empty(document.profile.clone())
            .or_else(|| non_empty(env(ENV_PROFILE)))
            .or_else(|| non_empty(config.profile.clone()));

        log::debug!("session region={} profile={:?}", region, profile);
        Self { region, profile }
    }
}

impl Session for LocalSession {
    fn region(&self) -> &str {
        &self.region
    }

    fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn config(region: Option<&str>, profile: Option<&str>) -> Config {
        Config {
            region: region.map(String::from),
            profile: profile.map(String::from),
            ..Config::default()
        }
    }

    #[test]
    fn test_document_wins() {
        let doc = GraphDocument {
            region: Some("doc-region".into()),
            profile: Some("doc-profile".into()),
            ..GraphDocument::default()
        };
        let session = LocalSession::resolve_with(
            &doc,
            &config(Some("cfg-region"), Some("cfg-profile")),
            env(&[(ENV_REGION, "env-region"), (ENV_PROFILE, "env-profile")]),
        );
        assert_eq!(session.region(), "doc-region");
        assert_eq!(session.profile(), Some("doc-profile"));
    }

    #[test]
    fn test_environment_before_config() {
        let session = LocalSession::resolve_with(
            &GraphDocument::default(),
            &config(Some("cfg-region"), Some("cfg-profile")),
            env(&[(ENV_REGION, "env-region")]),
        );
        assert_eq!(session.region(), "env-region");
        assert_eq!(session.profile(), Some("cfg-profile"));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let doc = GraphDocument {
            region: Some("  ".into()),
            ..GraphDocument::default()
        };
        let session = LocalSession::resolve_with(&doc, &config(None, None), env(&[(ENV_REGION, "")]));
        assert_eq!(session.region(), "local");
        assert_eq!(session.profile(), None);
    }
}
