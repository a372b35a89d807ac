//! Host interfaces consumed by the keyword manager.
//!
//! The manager never owns content objects. It reaches them through four
//! narrow capabilities provided by the embedding host: the catalog's query
//! surface, per-object field access, reindex requests, and the permission
//! gate. All traits are synchronous: one invocation processes its batch
//! sequentially inside whatever transaction boundary the host provides, and
//! the manager assumes the host serializes conflicting mutations (e.g. via
//! optimistic-conflict retry at its transaction layer).

use std::sync::Arc;

use crate::error::CatalogResult;
use crate::types::{FieldSpec, FieldValue, KeywordQuery, ObjectId, ScopePath};

// ============================================================================
// Catalog
// ============================================================================

/// Query surface of the content repository index.
pub trait Catalog: Send + Sync {
    /// Handles of the objects whose `query.field` holds any of
    /// `query.values`, restricted to `query.scope` when present.
    fn find(&self, query: &KeywordQuery) -> CatalogResult<Vec<ObjectId>>;

    /// Distinct values indexed for `field` across the repository.
    fn unique_values(&self, field: &str) -> CatalogResult<Vec<String>>;

    /// Distinct values for `field` with the number of objects holding each.
    fn value_counts(&self, field: &str) -> CatalogResult<Vec<(String, usize)>>;

    /// Fields the catalog declares, keyword-bearing or not.
    fn fields(&self) -> CatalogResult<Vec<FieldSpec>>;
}

// ============================================================================
// Field access
// ============================================================================

/// Outcome of a field write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value was stored.
    Updated,
    /// No mutator could be resolved for this object and field; the object
    /// is unchanged.
    NoMutator,
}

/// Read/write capability for a field on a single object.
///
/// The value shape (multi- or mono-valued) is resolved per object at read
/// time; callers must handle either variant for the same field name.
pub trait FieldAccess: Send + Sync {
    /// Current value of `field` on the object.
    fn read(&self, id: &ObjectId, field: &str) -> CatalogResult<FieldValue>;

    /// Attempt to store `value`. Hosts report [`WriteOutcome::NoMutator`]
    /// when the object exposes no setter for `field`; that is not an error.
    fn write(&self, id: &ObjectId, field: &str, value: FieldValue)
        -> CatalogResult<WriteOutcome>;
}

// ============================================================================
// Reindex
// ============================================================================

/// Reindex hook, fire-and-forget from the manager's perspective.
pub trait Reindex: Send + Sync {
    /// Request reindexing of `fields` for one object.
    fn reindex(&self, id: &ObjectId, fields: &[String]) -> CatalogResult<()>;
}

// ============================================================================
// Permission gate
// ============================================================================

/// Pluggable manage-keywords capability check.
pub trait PermissionGate: Send + Sync {
    /// True when the caller may manage keywords under `scope`, or across
    /// the whole repository when `scope` is absent.
    fn can_manage(&self, scope: Option<&ScopePath>) -> bool;
}

/// Gate that admits every caller. For hosts that authorize further out, and
/// for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionGate for AllowAll {
    fn can_manage(&self, _scope: Option<&ScopePath>) -> bool {
        true
    }
}

// ============================================================================
// Blanket implementations
// ============================================================================

impl<T: Catalog + ?Sized> Catalog for Arc<T> {
    fn find(&self, query: &KeywordQuery) -> CatalogResult<Vec<ObjectId>> {
        (**self).find(query)
    }

    fn unique_values(&self, field: &str) -> CatalogResult<Vec<String>> {
        (**self).unique_values(field)
    }

    fn value_counts(&self, field: &str) -> CatalogResult<Vec<(String, usize)>> {
        (**self).value_counts(field)
    }

    fn fields(&self) -> CatalogResult<Vec<FieldSpec>> {
        (**self).fields()
    }
}

impl<T: FieldAccess + ?Sized> FieldAccess for Arc<T> {
    fn read(&self, id: &ObjectId, field: &str) -> CatalogResult<FieldValue> {
        (**self).read(id, field)
    }

    fn write(
        &self,
        id: &ObjectId,
        field: &str,
        value: FieldValue,
    ) -> CatalogResult<WriteOutcome> {
        (**self).write(id, field, value)
    }
}

impl<T: Reindex + ?Sized> Reindex for Arc<T> {
    fn reindex(&self, id: &ObjectId, fields: &[String]) -> CatalogResult<()> {
        (**self).reindex(id, fields)
    }
}

impl<T: PermissionGate + ?Sized> PermissionGate for Arc<T> {
    fn can_manage(&self, scope: Option<&ScopePath>) -> bool {
        (**self).can_manage(scope)
    }
}
