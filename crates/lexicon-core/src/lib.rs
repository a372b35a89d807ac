//! Keyword curation for indexed content repositories.
//!
//! Administrators accumulate near-duplicate keywords ("Salmon", "salmon",
//! "salomon") as content grows. This crate provides the tool surface for
//! cleaning that up: rank existing vocabulary against a query word with
//! normalized similarity scoring, then merge or delete keyword values across
//! every object the catalog knows about, reindexing as it goes.
//!
//! The crate owns no storage. Hosts supply four capabilities through the
//! [`catalog`] traits: the index query surface, per-object field access,
//! reindex requests, and the permission gate. `lexicon-memory` ships an
//! in-memory host for embedding and tests.
//!
//! # Example
//!
//! ```ignore
//! use std::collections::BTreeSet;
//! use std::sync::Arc;
//! use lexicon_core::{AllowAll, KeywordManager, ManagerConfig};
//!
//! let manager = KeywordManager::new(host, Arc::new(AllowAll), ManagerConfig::default());
//!
//! // What did editors mean by "salomon"?
//! let nearby = manager.suggest("salomon", "Subject", 10, 0.6)?;
//!
//! // Fold the typos into the canonical keyword.
//! let typos: BTreeSet<String> = nearby.into_iter().collect();
//! let report = manager.change(&typos, "Salmon", None, "Subject")?;
//! println!("rewrote {} objects", report.count());
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod manager;
pub mod matcher;
pub mod similarity;
pub mod types;

pub use catalog::{AllowAll, Catalog, FieldAccess, PermissionGate, Reindex, WriteOutcome};
pub use config::ManagerConfig;
pub use error::{CatalogError, CatalogResult, KeywordError, KeywordResult};
pub use manager::{KeywordManager, MutationReport};
pub use matcher::{MatchFinder, MatcherConfig};
pub use similarity::{similarity, SimilarityBackend};
pub use types::{
    FieldKind, FieldSpec, FieldValue, KeywordQuery, ObjectId, ScopePath, TextInput,
};
