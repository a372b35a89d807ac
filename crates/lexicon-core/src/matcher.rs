//! Scored candidate lookup over a keyword vocabulary.
//!
//! Given a query word and the known keywords of a field, rank the candidates
//! by similarity and keep the best few. This backs the "did you mean one of
//! these existing keywords" flow that precedes a bulk merge.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::KeywordResult;
use crate::similarity::{score_normalized, SimilarityBackend};
use crate::types::TextInput;

const DEFAULT_LIMIT: usize = 10;
const DEFAULT_THRESHOLD: f64 = 0.6;

/// Settings for [`MatchFinder`]. Fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Scoring back-end.
    #[serde(default)]
    pub backend: SimilarityBackend,

    /// Score a candidate 1.0 when it contains the query as a
    /// (case-insensitive) substring, without consulting the back-end.
    ///
    /// Biases exact-substring hits to the top of the ranking; disable for
    /// pure ratio ordering.
    #[serde(default = "default_substring_shortcut")]
    pub substring_shortcut: bool,

    /// Result cap used when the caller does not pass one.
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Score threshold used when the caller does not pass one.
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,
}

fn default_substring_shortcut() -> bool {
    true
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            backend: SimilarityBackend::default(),
            substring_shortcut: default_substring_shortcut(),
            default_limit: default_limit(),
            default_threshold: default_threshold(),
        }
    }
}

/// Ranks vocabulary candidates by similarity to a query word.
#[derive(Debug, Clone, Default)]
pub struct MatchFinder {
    config: MatcherConfig,
}

impl MatchFinder {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Return at most `limit` candidates scoring strictly above `threshold`,
    /// best first.
    ///
    /// Candidates are ordered by score descending. Equal scores are broken
    /// by case-insensitive lexical order of the candidate text, then by
    /// input order. Scores never exceed 1.0, so a threshold at or above 1.0
    /// admits nothing.
    ///
    /// Operands may be text or byte input; bytes that are not valid UTF-8
    /// fail the whole call.
    pub fn find_matches(
        &self,
        word: &TextInput,
        possibilities: &[TextInput],
        limit: usize,
        threshold: f64,
    ) -> KeywordResult<Vec<String>> {
        let needle = word.as_text()?.to_lowercase();
        let mut candidates = Vec::with_capacity(possibilities.len());
        for item in possibilities {
            candidates.push(item.as_text()?);
        }
        Ok(self.rank(&needle, candidates.into_iter(), limit, threshold))
    }

    /// [`find_matches`](Self::find_matches) over plain text candidates.
    pub fn find_similar<'a, I>(
        &self,
        word: &str,
        possibilities: I,
        limit: usize,
        threshold: f64,
    ) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.rank(
            &word.to_lowercase(),
            possibilities.into_iter(),
            limit,
            threshold,
        )
    }

    fn rank<'a>(
        &self,
        needle: &str,
        candidates: impl Iterator<Item = &'a str>,
        limit: usize,
        threshold: f64,
    ) -> Vec<String> {
        if limit == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(String, String, f64)> = Vec::new();
        for candidate in candidates {
            let lowered = candidate.to_lowercase();
            let score = if self.config.substring_shortcut
                && !needle.is_empty()
                && lowered.contains(needle)
            {
                1.0
            } else {
                score_normalized(self.config.backend, needle, &lowered)
            };
            if score > threshold {
                scored.push((candidate.to_string(), lowered, score));
            }
        }

        // Stable sort: input order survives for candidates equal in both
        // score and lowercased text.
        scored.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(&b.1))
        });
        scored.truncate(limit);

        debug!(query = needle, hits = scored.len(), "ranked keyword candidates");
        scored.into_iter().map(|(candidate, _, _)| candidate).collect()
    }

    /// `find_similar` with the configured default limit and threshold.
    pub fn find_similar_default<'a, I>(&self, word: &str, possibilities: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.find_similar(
            word,
            possibilities,
            self.config.default_limit,
            self.config.default_threshold,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finder() -> MatchFinder {
        MatchFinder::new(MatcherConfig::default())
    }

    fn ratio_finder() -> MatchFinder {
        MatchFinder::new(MatcherConfig {
            substring_shortcut: false,
            ..MatcherConfig::default()
        })
    }

    fn inputs(words: &[&str]) -> Vec<TextInput> {
        words.iter().map(|w| TextInput::from(*w)).collect()
    }

    #[test]
    fn test_exact_match_ranked_first() {
        let matches = finder()
            .find_matches(
                &TextInput::from("foo"),
                &inputs(&["foo", "bar", "baz"]),
                7,
                0.6,
            )
            .unwrap();
        assert_eq!(matches, vec!["foo".to_string()]);
    }

    #[test]
    fn test_threshold_is_strict() {
        // normalized_levenshtein("ab", "ax") == 0.5 exactly.
        let f = ratio_finder();
        let possibilities = inputs(&["ax"]);
        let word = TextInput::from("ab");

        let at = f.find_matches(&word, &possibilities, 5, 0.5).unwrap();
        assert!(at.is_empty(), "score equal to threshold must not qualify");

        let below = f.find_matches(&word, &possibilities, 5, 0.49).unwrap();
        assert_eq!(below, vec!["ax".to_string()]);
    }

    #[test]
    fn test_limit_respected() {
        let f = finder();
        let possibilities = inputs(&["key1", "key2", "key3", "key4"]);
        let matches = f
            .find_matches(&TextInput::from("key"), &possibilities, 2, 0.1)
            .unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_zero_limit_yields_nothing() {
        let matches = finder()
            .find_matches(&TextInput::from("foo"), &inputs(&["foo"]), 0, 0.1)
            .unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_empty_possibilities_yield_nothing() {
        let matches = finder()
            .find_matches(&TextInput::from("foo"), &[], 5, 0.1)
            .unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_threshold_at_one_admits_nothing() {
        let matches = finder()
            .find_matches(&TextInput::from("foo"), &inputs(&["foo"]), 5, 1.0)
            .unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_tie_break_is_lexical() {
        // Both candidates are one substitution away from the query.
        let f = ratio_finder();
        let matches = f
            .find_matches(
                &TextInput::from("abcd"),
                &inputs(&["abcy", "abcx"]),
                5,
                0.5,
            )
            .unwrap();
        assert_eq!(matches, vec!["abcx".to_string(), "abcy".to_string()]);
    }

    #[test]
    fn test_substring_shortcut_promotes_containing_candidates() {
        let with = finder().find_similar("foo", ["xxfooxx", "fob"], 5, 0.3);
        assert_eq!(with[0], "xxfooxx");

        // Without the shortcut the containing candidate scores poorly and
        // the close edit wins.
        let without = ratio_finder().find_similar("foo", ["xxfooxx", "fob"], 5, 0.3);
        assert_eq!(without[0], "fob");
    }

    #[test]
    fn test_byte_candidates_ranked() {
        let possibilities = vec![
            TextInput::from("Frühstück".as_bytes()),
            TextInput::from("Abendessen"),
        ];
        let matches = finder()
            .find_matches(&TextInput::from("frühstück"), &possibilities, 5, 0.6)
            .unwrap();
        assert_eq!(matches, vec!["Frühstück".to_string()]);
    }

    #[test]
    fn test_invalid_byte_candidate_fails_call() {
        let possibilities = vec![TextInput::Bytes(vec![0xff])];
        let err = finder()
            .find_matches(&TextInput::from("foo"), &possibilities, 5, 0.1)
            .unwrap_err();
        assert!(matches!(err, crate::KeywordError::InvalidInput(_)));
    }

    #[test]
    fn test_default_limit_and_threshold_applied() {
        let matches = finder().find_similar_default("foo", ["foo", "foe", "bar"]);
        assert_eq!(matches, vec!["foo".to_string(), "foe".to_string()]);
    }

    #[test]
    fn test_config_defaults() {
        let config = MatcherConfig::default();
        assert_eq!(config.backend, SimilarityBackend::Ratio);
        assert!(config.substring_shortcut);
        assert_eq!(config.default_limit, 10);
        assert_eq!(config.default_threshold, 0.6);
    }

    #[test]
    fn test_config_partial_deserialization() {
        let config: MatcherConfig =
            serde_json::from_str(r#"{"backend": "dice"}"#).expect("deserialize");
        assert_eq!(config.backend, SimilarityBackend::Dice);
        assert_eq!(config.default_limit, 10);
    }
}
