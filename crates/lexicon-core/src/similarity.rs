//! Normalized string similarity scoring.
//!
//! Scores are in [0.0, 1.0]: 1.0 for identical strings, 0.0 for no
//! similarity. Operands are normalized to lowercase UTF-8 text before
//! scoring, so comparison is case-insensitive regardless of how keywords are
//! stored.
//!
//! Two back-ends are available, selected by configuration at construction
//! rather than probed at runtime. They are not required to produce identical
//! rankings; the contract downstream is "at most N candidates above the
//! threshold, best first".

use serde::{Deserialize, Serialize};

use crate::error::KeywordResult;
use crate::types::TextInput;

/// Selectable scoring back-end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityBackend {
    /// Normalized Levenshtein ratio. The primary metric.
    #[default]
    Ratio,
    /// Sørensen–Dice bigram coefficient. Coarser best-effort alternative;
    /// ranks short edits differently than [`SimilarityBackend::Ratio`].
    Dice,
}

impl SimilarityBackend {
    fn score(self, a: &str, b: &str) -> f64 {
        match self {
            SimilarityBackend::Ratio => strsim::normalized_levenshtein(a, b),
            SimilarityBackend::Dice => strsim::sorensen_dice(a, b),
        }
    }
}

/// Score two operands, decoding and lowercasing both first.
///
/// Accepts text or byte operands transparently; bytes that are not valid
/// UTF-8 fail with [`KeywordError::InvalidInput`](crate::KeywordError).
pub fn similarity(
    backend: SimilarityBackend,
    a: &TextInput,
    b: &TextInput,
) -> KeywordResult<f64> {
    let a = a.as_text()?.to_lowercase();
    let b = b.as_text()?.to_lowercase();
    Ok(score_normalized(backend, &a, &b))
}

/// Score two already-normalized strings.
///
/// Empty operands short-circuit: both empty scores 1.0, exactly one empty
/// scores 0.0.
pub(crate) fn score_normalized(backend: SimilarityBackend, a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    backend.score(a, b)
}
