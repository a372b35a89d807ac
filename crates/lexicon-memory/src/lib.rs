//! In-memory host for the lexicon keyword manager.
//!
//! [`MemoryHost`] implements the core catalog, field access, and reindex
//! traits over a lock-guarded object map. It is the reference host for
//! embedding the library and the fixture behind the integration suite:
//! every capability a real repository host must provide (scoped queries,
//! per-object value shapes, unresolvable mutators, reindex requests) can be
//! staged here directly.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lexicon_core::{
    Catalog, CatalogError, CatalogResult, FieldAccess, FieldSpec, FieldValue, KeywordQuery,
    ObjectId, Reindex, WriteOutcome,
};

/// A content object held by [`MemoryHost`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredObject {
    /// Handle the catalog hands out.
    pub id: ObjectId,
    /// Location in the content tree, used for scope restriction.
    pub path: String,
    /// Field values keyed by field name.
    pub fields: HashMap<String, FieldValue>,
    /// When a field was last written through the host.
    pub updated_at: DateTime<Utc>,
}

impl StoredObject {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            id: ObjectId::random(),
            path: path.into(),
            fields: HashMap::new(),
            updated_at: Utc::now(),
        }
    }

    /// Builder-style: set a field value.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

#[derive(Default)]
struct Inner {
    fields: Vec<FieldSpec>,
    objects: BTreeMap<ObjectId, StoredObject>,
    /// Object/field pairs with no resolvable mutator.
    sealed: HashSet<(ObjectId, String)>,
    /// Log of reindex requests, in arrival order.
    reindexed: Vec<(ObjectId, Vec<String>)>,
}

/// In-memory content repository implementing the host side of the keyword
/// manager.
#[derive(Default)]
pub struct MemoryHost {
    inner: RwLock<Inner>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host with the given catalog fields declared.
    pub fn with_fields<I>(specs: I) -> Self
    where
        I: IntoIterator<Item = FieldSpec>,
    {
        let host = Self::new();
        host.inner.write().fields = specs.into_iter().collect();
        host
    }

    /// Declare a catalog field.
    pub fn declare_field(&self, spec: FieldSpec) {
        self.inner.write().fields.push(spec);
    }

    /// Add an object, returning its handle.
    pub fn insert(&self, object: StoredObject) -> ObjectId {
        let id = object.id;
        self.inner.write().objects.insert(id, object);
        id
    }

    /// Drop the mutator for `field` on one object; subsequent writes report
    /// [`WriteOutcome::NoMutator`].
    pub fn seal_field(&self, id: &ObjectId, field: &str) {
        self.inner.write().sealed.insert((*id, field.to_string()));
    }

    /// Snapshot of one object.
    pub fn object(&self, id: &ObjectId) -> Option<StoredObject> {
        self.inner.read().objects.get(id).cloned()
    }

    /// Current value of `field` on one object, if the object exists and the
    /// field is set.
    pub fn field_value(&self, id: &ObjectId, field: &str) -> Option<FieldValue> {
        self.inner
            .read()
            .objects
            .get(id)
            .and_then(|object| object.fields.get(field).cloned())
    }

    /// Reindex requests observed so far, in arrival order.
    pub fn reindex_log(&self) -> Vec<(ObjectId, Vec<String>)> {
        self.inner.read().reindexed.clone()
    }

    pub fn clear_reindex_log(&self) {
        self.inner.write().reindexed.clear();
    }

    fn value_matches(value: &FieldValue, wanted: &BTreeSet<String>) -> bool {
        match value {
            FieldValue::Multi(values) => wanted.iter().any(|kw| values.contains(kw)),
            FieldValue::Mono(Some(value)) => wanted.contains(value),
            FieldValue::Mono(None) => false,
        }
    }
}

impl Catalog for MemoryHost {
    fn find(&self, query: &KeywordQuery) -> CatalogResult<Vec<ObjectId>> {
        let inner = self.inner.read();
        let mut ids = Vec::new();
        for (id, object) in &inner.objects {
            if let Some(scope) = &query.scope {
                if !scope.contains(&object.path) {
                    continue;
                }
            }
            let Some(value) = object.fields.get(&query.field) else {
                continue;
            };
            if Self::value_matches(value, &query.values) {
                ids.push(*id);
            }
        }
        Ok(ids)
    }

    fn unique_values(&self, field: &str) -> CatalogResult<Vec<String>> {
        let inner = self.inner.read();
        let mut values = BTreeSet::new();
        for object in inner.objects.values() {
            if let Some(value) = object.fields.get(field) {
                values.extend(value.keywords().iter().map(|kw| kw.to_string()));
            }
        }
        Ok(values.into_iter().collect())
    }

    fn value_counts(&self, field: &str) -> CatalogResult<Vec<(String, usize)>> {
        let inner = self.inner.read();
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for object in inner.objects.values() {
            if let Some(value) = object.fields.get(field) {
                for keyword in value.keywords() {
                    *counts.entry(keyword.to_string()).or_insert(0) += 1;
                }
            }
        }
        Ok(counts.into_iter().collect())
    }

    fn fields(&self) -> CatalogResult<Vec<FieldSpec>> {
        Ok(self.inner.read().fields.clone())
    }
}

impl FieldAccess for MemoryHost {
    /// Fields never set on an object read as an empty multi-valued
    /// collection, matching how repository accessors default missing
    /// attributes.
    fn read(&self, id: &ObjectId, field: &str) -> CatalogResult<FieldValue> {
        let inner = self.inner.read();
        let object = inner
            .objects
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        Ok(object
            .fields
            .get(field)
            .cloned()
            .unwrap_or_else(FieldValue::empty))
    }

    fn write(
        &self,
        id: &ObjectId,
        field: &str,
        value: FieldValue,
    ) -> CatalogResult<WriteOutcome> {
        let mut inner = self.inner.write();
        if inner.sealed.contains(&(*id, field.to_string())) {
            return Ok(WriteOutcome::NoMutator);
        }
        let object = inner
            .objects
            .get_mut(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        object.fields.insert(field.to_string(), value);
        object.updated_at = Utc::now();
        debug!(%id, field, "stored field value");
        Ok(WriteOutcome::Updated)
    }
}

impl Reindex for MemoryHost {
    fn reindex(&self, id: &ObjectId, fields: &[String]) -> CatalogResult<()> {
        self.inner.write().reindexed.push((*id, fields.to_vec()));
        Ok(())
    }
}
