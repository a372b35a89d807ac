//! Bulk keyword operations over a host catalog.
//!
//! [`KeywordManager`] is the tool surface: merge or delete keyword values
//! across every matching object, list the managed fields, and rank existing
//! vocabulary against a query word. Each batch call is a single synchronous
//! pass over a snapshot of matching objects; there is no persisted progress
//! state and no rollback if the host interrupts partway.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, FieldAccess, PermissionGate, Reindex, WriteOutcome};
use crate::config::ManagerConfig;
use crate::error::{KeywordError, KeywordResult};
use crate::matcher::MatchFinder;
use crate::types::{FieldValue, KeywordQuery, ObjectId, ScopePath, TextInput};

/// Counts for one batch mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReport {
    /// Objects returned by the catalog query.
    pub matched: usize,
    /// Objects whose field value was written.
    pub updated: usize,
    /// Objects left unchanged because no mutator could be resolved.
    pub skipped: usize,
}

impl MutationReport {
    /// The historical one-number contract: how many objects matched the
    /// query, whether or not every one of them could be written. Callers
    /// that care about the difference read `updated` and `skipped`.
    pub fn count(&self) -> usize {
        self.matched
    }
}

/// Repository-wide keyword manager.
///
/// Generic over the host `H`, which supplies the catalog query surface,
/// field access, and reindexing. The permission gate is injected separately
/// so hosts can share one gate across tools.
pub struct KeywordManager<H> {
    host: Arc<H>,
    gate: Arc<dyn PermissionGate>,
    finder: MatchFinder,
    config: ManagerConfig,
}

impl<H> KeywordManager<H>
where
    H: Catalog + FieldAccess + Reindex,
{
    pub fn new(host: Arc<H>, gate: Arc<dyn PermissionGate>, config: ManagerConfig) -> Self {
        let finder = MatchFinder::new(config.matcher.clone());
        Self {
            host,
            gate,
            finder,
            config,
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn finder(&self) -> &MatchFinder {
        &self.finder
    }

    /// Replace `old_keywords` with `new_keyword` on every object holding any
    /// of them on `field`, optionally restricted to `scope`.
    ///
    /// Multi-valued fields lose every member of `old_keywords` and gain
    /// `new_keyword` once; mono-valued fields are replaced outright, which
    /// mirrors the query's selection. Every written object is reindexed for
    /// the changed field plus the configured always-reindex set.
    pub fn change(
        &self,
        old_keywords: &BTreeSet<String>,
        new_keyword: &str,
        scope: Option<&ScopePath>,
        field: &str,
    ) -> KeywordResult<MutationReport> {
        self.authorize(scope)?;

        let ids = self.find_holders(old_keywords, scope, field)?;
        let mut report = MutationReport {
            matched: ids.len(),
            ..MutationReport::default()
        };

        for id in &ids {
            let next = match self.host.read(id, field)? {
                FieldValue::Multi(mut values) => {
                    for keyword in old_keywords {
                        values.remove(keyword);
                    }
                    values.insert(new_keyword.to_string());
                    FieldValue::Multi(values)
                }
                FieldValue::Mono(_) => FieldValue::Mono(Some(new_keyword.to_string())),
            };
            self.apply(id, field, next, &mut report)?;
        }

        info!(
            field,
            new_keyword,
            matched = report.matched,
            updated = report.updated,
            skipped = report.skipped,
            "merged keywords"
        );
        Ok(report)
    }

    /// Strip `keywords` from every object holding any of them on `field`,
    /// optionally restricted to `scope`.
    ///
    /// Multi-valued fields lose every listed keyword; mono-valued fields are
    /// cleared. Reindex and count semantics match [`change`](Self::change).
    pub fn delete(
        &self,
        keywords: &BTreeSet<String>,
        scope: Option<&ScopePath>,
        field: &str,
    ) -> KeywordResult<MutationReport> {
        self.authorize(scope)?;

        let ids = self.find_holders(keywords, scope, field)?;
        let mut report = MutationReport {
            matched: ids.len(),
            ..MutationReport::default()
        };

        for id in &ids {
            let next = match self.host.read(id, field)? {
                FieldValue::Multi(mut values) => {
                    for keyword in keywords {
                        values.remove(keyword);
                    }
                    FieldValue::Multi(values)
                }
                FieldValue::Mono(_) => FieldValue::Mono(None),
            };
            self.apply(id, field, next, &mut report)?;
        }

        info!(
            field,
            matched = report.matched,
            updated = report.updated,
            skipped = report.skipped,
            "deleted keywords"
        );
        Ok(report)
    }

    /// Names of the managed keyword fields, sorted.
    ///
    /// Catalog fields that are not keyword-bearing, and fields listed in
    /// `ManagerConfig::ignored_fields`, are excluded.
    pub fn keyword_fields(&self) -> KeywordResult<Vec<String>> {
        let mut names: Vec<String> = self
            .host
            .fields()?
            .into_iter()
            .filter(|spec| spec.is_keyword() && !self.config.ignored_fields.contains(&spec.name))
            .map(|spec| spec.name)
            .collect();
        names.sort();
        Ok(names)
    }

    /// The distinct vocabulary of `field`, sorted case-insensitively.
    /// Empty entries are dropped; they break sorting and mean nothing as
    /// keywords.
    pub fn keyword_values(&self, field: &str) -> KeywordResult<Vec<String>> {
        self.authorize(None)?;
        self.require_keyword_field(field)?;

        let mut values: Vec<String> = self
            .host
            .unique_values(field)?
            .into_iter()
            .filter(|value| !value.is_empty())
            .collect();
        values.sort_by_cached_key(|value| value.to_lowercase());
        Ok(values)
    }

    /// The vocabulary of `field` with per-keyword object counts, sorted
    /// case-insensitively by keyword.
    pub fn keyword_usage(&self, field: &str) -> KeywordResult<Vec<(String, usize)>> {
        self.authorize(None)?;
        self.require_keyword_field(field)?;

        let mut counts: Vec<(String, usize)> = self
            .host
            .value_counts(field)?
            .into_iter()
            .filter(|(value, _)| !value.is_empty())
            .collect();
        counts.sort_by_cached_key(|(value, _)| value.to_lowercase());
        Ok(counts)
    }

    /// How many objects hold `keyword` on `field`. Zero when the keyword is
    /// not indexed at all.
    pub fn usage_count(&self, field: &str, keyword: &str) -> KeywordResult<usize> {
        self.authorize(None)?;
        self.require_keyword_field(field)?;

        let count = self
            .host
            .value_counts(field)?
            .into_iter()
            .find(|(value, _)| value == keyword)
            .map(|(_, count)| count)
            .unwrap_or(0);
        Ok(count)
    }

    /// Rank `possibilities` against `word`; see
    /// [`MatchFinder::find_matches`].
    pub fn find_matches(
        &self,
        word: &TextInput,
        possibilities: &[TextInput],
        limit: usize,
        threshold: f64,
    ) -> KeywordResult<Vec<String>> {
        self.authorize(None)?;
        self.finder.find_matches(word, possibilities, limit, threshold)
    }

    /// Ranked suggestions for `word` drawn from the existing vocabulary of
    /// `field`.
    pub fn suggest(
        &self,
        word: &str,
        field: &str,
        limit: usize,
        threshold: f64,
    ) -> KeywordResult<Vec<String>> {
        let vocabulary = self.keyword_values(field)?;
        Ok(self.finder.find_similar(
            word,
            vocabulary.iter().map(String::as_str),
            limit,
            threshold,
        ))
    }

    fn find_holders(
        &self,
        keywords: &BTreeSet<String>,
        scope: Option<&ScopePath>,
        field: &str,
    ) -> KeywordResult<Vec<ObjectId>> {
        let mut query = KeywordQuery::new(field, keywords.iter().cloned());
        if let Some(scope) = scope {
            query = query.with_scope(scope.clone());
        }
        Ok(self.host.find(&query)?)
    }

    fn apply(
        &self,
        id: &ObjectId,
        field: &str,
        value: FieldValue,
        report: &mut MutationReport,
    ) -> KeywordResult<()> {
        match self.host.write(id, field, value)? {
            WriteOutcome::Updated => {
                report.updated += 1;
                let fields = self.config.reindex_set(field);
                if let Err(err) = self.host.reindex(id, &fields) {
                    warn!(%id, %err, "reindex request failed");
                }
            }
            WriteOutcome::NoMutator => {
                report.skipped += 1;
                debug!(%id, field, "no mutator resolved, object left unchanged");
            }
        }
        Ok(())
    }

    fn authorize(&self, scope: Option<&ScopePath>) -> KeywordResult<()> {
        if self.gate.can_manage(scope) {
            Ok(())
        } else {
            Err(KeywordError::Unauthorized {
                scope: scope.map(|s| s.as_str().to_string()),
            })
        }
    }

    fn require_keyword_field(&self, field: &str) -> KeywordResult<()> {
        if self.keyword_fields()?.iter().any(|name| name == field) {
            Ok(())
        } else {
            Err(KeywordError::InvalidField(field.to_string()))
        }
    }
}
