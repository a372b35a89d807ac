//! Runtime configuration for the keyword manager.
//!
//! All knobs are explicit values handed to [`KeywordManager::new`]
//! (crate::KeywordManager) at construction and immutable afterwards. Hosts
//! that load configuration from files deserialize this with serde; every
//! field has a default so partial documents work.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::matcher::MatcherConfig;

/// Deployment settings for bulk keyword operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Fields reindexed alongside any changed field. Most deployments leave
    /// this empty.
    #[serde(default)]
    pub always_reindex: BTreeSet<String>,

    /// Keyword fields hidden from management, e.g. host-internal indexes
    /// that would misbehave under bulk rewrites.
    #[serde(default)]
    pub ignored_fields: BTreeSet<String>,

    /// Match finder settings.
    #[serde(default)]
    pub matcher: MatcherConfig,
}

impl ManagerConfig {
    /// The full set of fields to reindex when `field` changes: the field
    /// itself plus the always-reindex set, deduplicated and ordered.
    pub fn reindex_set(&self, field: &str) -> Vec<String> {
        let mut fields = self.always_reindex.clone();
        fields.insert(field.to_string());
        fields.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reindex_set_includes_changed_field() {
        let config = ManagerConfig::default();
        assert_eq!(config.reindex_set("Subject"), vec!["Subject".to_string()]);
    }

    #[test]
    fn test_reindex_set_merges_auxiliary_fields() {
        let config = ManagerConfig {
            always_reindex: ["SearchableText".to_string()].into(),
            ..ManagerConfig::default()
        };
        assert_eq!(
            config.reindex_set("Subject"),
            vec!["SearchableText".to_string(), "Subject".to_string()]
        );
        // The auxiliary set is independent of which field changed.
        assert_eq!(
            config.reindex_set("SearchableText"),
            vec!["SearchableText".to_string()]
        );
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: ManagerConfig =
            serde_json::from_str(r#"{"ignored_fields": ["internal_marker"]}"#)
                .expect("deserialize");
        assert!(config.ignored_fields.contains("internal_marker"));
        assert!(config.always_reindex.is_empty());
        assert_eq!(config.matcher, MatcherConfig::default());
    }
}
