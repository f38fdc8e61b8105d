use crate::{
    document::{DocumentPath, DocumentSnapshot, FieldValue, Fields},
    error::BessoError,
};
use async_trait::async_trait;

/// Document store trait. The building records live behind it.
///
/// The Firestore REST client and the in-memory store both implement this
/// so the skill handlers never depend on a concrete backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Return up to `limit` top-level documents of `collection` whose
    /// `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
        limit: usize,
    ) -> Result<Vec<DocumentSnapshot>, BessoError>;

    /// Overwrite the given fields of an existing document.
    ///
    /// Fails if the document does not exist. Fields not named are left
    /// untouched.
    async fn update(&self, path: &DocumentPath, fields: &Fields) -> Result<(), BessoError>;
}
