//! In-memory document store.
//!
//! Used for local development (`store.backend = "memory"`) and as the test
//! double for every handler that talks to a store. Every call is recorded
//! in order, and failures can be injected per call.

use async_trait::async_trait;
use besso_core::{
    document::{DocumentPath, DocumentSnapshot, FieldValue, Fields},
    error::BessoError,
    traits::DocumentStore,
};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};

/// A store call, as recorded by [`InMemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Query {
        collection: String,
        field: String,
        value: FieldValue,
    },
    Update {
        path: String,
        fields: Vec<String>,
    },
}

#[derive(Default)]
struct Inner {
    docs: BTreeMap<DocumentPath, Fields>,
    calls: Vec<StoreCall>,
    updates_seen: usize,
    fail_update_at: Option<usize>,
    fail_queries: bool,
}

/// Map-backed [`DocumentStore`].
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load documents from a JSON object keyed by document path.
    ///
    /// ```json
    /// { "CheckInCheckOut/B42": { "deviceId": "D1", "status": 1 } }
    /// ```
    pub fn from_seed_json(json: &str) -> Result<Self, BessoError> {
        let root: BTreeMap<String, BTreeMap<String, Value>> = serde_json::from_str(json)?;
        let store = Self::new();
        for (raw_path, raw_fields) in root {
            let path = DocumentPath::parse(&raw_path)?;
            let mut fields = Fields::new();
            for (name, raw) in raw_fields {
                let value = FieldValue::from_json(&raw).ok_or_else(|| {
                    BessoError::Store(format!("{raw_path}.{name}: unsupported seed value {raw}"))
                })?;
                fields.insert(name, value);
            }
            store.insert(path, fields);
        }
        Ok(store)
    }

    /// Load a seed file (see [`InMemoryStore::from_seed_json`]).
    pub fn from_seed_file(path: &str) -> Result<Self, BessoError> {
        let content = std::fs::read_to_string(Path::new(path))?;
        let store = Self::from_seed_json(&content)?;
        if store.is_empty() {
            warn!("memory store: seed file {path} holds no documents");
        } else {
            info!("memory store: seeded {} documents from {path}", store.len());
        }
        Ok(store)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves the map consistent; keep going.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create or replace a document.
    pub fn insert(&self, path: DocumentPath, fields: Fields) {
        self.lock().docs.insert(path, fields);
    }

    pub fn get(&self, path: &DocumentPath) -> Option<Fields> {
        self.lock().docs.get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every call made so far, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Make the `n`th update (zero-based) fail.
    pub fn fail_update_at(&self, n: usize) {
        self.lock().fail_update_at = Some(n);
    }

    /// Make every query fail.
    pub fn fail_queries(&self) {
        self.lock().fail_queries = true;
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
        limit: usize,
    ) -> Result<Vec<DocumentSnapshot>, BessoError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Query {
            collection: collection.to_string(),
            field: field.to_string(),
            value: value.clone(),
        });
        if inner.fail_queries {
            return Err(BessoError::Store(format!("injected query failure on {collection}")));
        }

        Ok(inner
            .docs
            .iter()
            .filter(|(path, _)| path.is_top_level() && path.collection() == collection)
            .filter(|(_, fields)| fields.get(field) == Some(value))
            .take(limit)
            .map(|(path, fields)| DocumentSnapshot {
                path: path.clone(),
                fields: fields.clone(),
            })
            .collect())
    }

    async fn update(&self, path: &DocumentPath, fields: &Fields) -> Result<(), BessoError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Update {
            path: path.to_string(),
            fields: fields.keys().cloned().collect(),
        });
        let index = inner.updates_seen;
        inner.updates_seen += 1;
        if inner.fail_update_at == Some(index) {
            return Err(BessoError::Store(format!("injected update failure on {path}")));
        }

        let doc = inner
            .docs
            .get_mut(path)
            .ok_or_else(|| BessoError::Store(format!("no document to update: {path}")))?;
        for (k, v) in fields {
            doc.insert(k.clone(), v.clone());
        }
        Ok(())
    }
}
