//! Firestore document store over the REST API.

use async_trait::async_trait;
use besso_core::{
    document::{DocumentPath, DocumentSnapshot, FieldValue, Fields},
    error::BessoError,
    traits::DocumentStore,
};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::credentials::ServiceAccountKey;
use crate::token::TokenSource;

/// Firestore-backed store.
pub struct FirestoreStore {
    client: reqwest::Client,
    tokens: TokenSource,
    /// `projects/{p}/databases/{d}/documents`.
    documents_name: String,
    base_url: String,
}

impl FirestoreStore {
    /// Create from a decoded credential. No network traffic until first use.
    pub fn new(
        key: ServiceAccountKey,
        project_id: Option<&str>,
        database: &str,
        base_url: &str,
    ) -> Self {
        let client = reqwest::Client::new();
        let project = project_id.unwrap_or(&key.project_id).to_string();
        Self {
            tokens: TokenSource::new(client.clone(), key),
            client,
            documents_name: format!("projects/{project}/databases/{database}/documents"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn documents_url(&self) -> String {
        format!("{}/{}", self.base_url, self.documents_name)
    }
}

/// One element of a `runQuery` response stream.
#[derive(Deserialize)]
struct RunQueryItem {
    document: Option<RestDocument>,
}

#[derive(Deserialize)]
struct RestDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Encode a field value in the REST wire format.
pub(crate) fn encode_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::String(s) => json!({ "stringValue": s }),
        FieldValue::Integer(n) => json!({ "integerValue": n.to_string() }),
        FieldValue::Double(d) => json!({ "doubleValue": d }),
        FieldValue::Boolean(b) => json!({ "booleanValue": b }),
        FieldValue::Timestamp(ts) => {
            json!({ "timestampValue": ts.to_rfc3339_opts(SecondsFormat::Micros, true) })
        }
        FieldValue::Null => json!({ "nullValue": null }),
    }
}

/// Decode a REST field value. Maps, arrays and references are skipped.
pub(crate) fn decode_value(value: &Value) -> Option<FieldValue> {
    let obj = value.as_object()?;
    if let Some(s) = obj.get("stringValue").and_then(Value::as_str) {
        return Some(FieldValue::String(s.to_string()));
    }
    if let Some(n) = obj.get("integerValue") {
        // Integers travel as decimal strings.
        let parsed = match n {
            Value::String(s) => s.parse().ok(),
            other => other.as_i64(),
        };
        return parsed.map(FieldValue::Integer);
    }
    if let Some(d) = obj.get("doubleValue").and_then(Value::as_f64) {
        return Some(FieldValue::Double(d));
    }
    if let Some(b) = obj.get("booleanValue").and_then(Value::as_bool) {
        return Some(FieldValue::Boolean(b));
    }
    if let Some(ts) = obj.get("timestampValue").and_then(Value::as_str) {
        return DateTime::parse_from_rfc3339(ts)
            .ok()
            .map(|t| FieldValue::Timestamp(t.with_timezone(&Utc)));
    }
    if obj.contains_key("nullValue") {
        return Some(FieldValue::Null);
    }
    None
}

/// Build a `runQuery` body: equality filter on one field, limited.
pub(crate) fn build_query(collection: &str, field: &str, value: &FieldValue, limit: usize) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection }],
            "where": {
                "fieldFilter": {
                    "field": { "fieldPath": field },
                    "op": "EQUAL",
                    "value": encode_value(value),
                }
            },
            "limit": limit,
        }
    })
}

/// Build the `PATCH` target and body for an update of `fields` on `path`.
///
/// Ids are percent-encoded per segment, so `?`, `#` or a space inside an id
/// stay part of the document name. Each field gets its own
/// `updateMask.fieldPaths` entry and the write requires an existing document.
pub(crate) fn build_update(
    documents_url: &str,
    path: &DocumentPath,
    fields: &Fields,
) -> Result<(Url, Value), BessoError> {
    let mut url = Url::parse(documents_url)
        .map_err(|e| BessoError::Store(format!("invalid firestore url {documents_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| BessoError::Store(format!("firestore url cannot be a base: {documents_url}")))?
        .extend(path.segments());
    {
        let mut query = url.query_pairs_mut();
        for name in fields.keys() {
            query.append_pair("updateMask.fieldPaths", name);
        }
        query.append_pair("currentDocument.exists", "true");
    }

    let body: Map<String, Value> = fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect();
    Ok((url, json!({ "fields": body })))
}

/// Turn a REST document into a snapshot with a path relative to the database.
fn to_snapshot(documents_name: &str, doc: RestDocument) -> Result<DocumentSnapshot, BessoError> {
    let relative = doc
        .name
        .strip_prefix(documents_name)
        .ok_or_else(|| BessoError::Store(format!("document outside database: {}", doc.name)))?;
    let path = DocumentPath::parse(relative)?;

    let mut fields = Fields::new();
    for (name, raw) in &doc.fields {
        match decode_value(raw) {
            Some(v) => {
                fields.insert(name.clone(), v);
            }
            None => debug!("firestore: skipping unsupported value for field {name}"),
        }
    }
    Ok(DocumentSnapshot { path, fields })
}

/// Parse a full `runQuery` response array.
pub(crate) fn parse_query_response(
    documents_name: &str,
    body: &str,
) -> Result<Vec<DocumentSnapshot>, BessoError> {
    let items: Vec<RunQueryItem> = serde_json::from_str(body)?;
    items
        .into_iter()
        .filter_map(|item| item.document)
        .map(|doc| to_snapshot(documents_name, doc))
        .collect()
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &FieldValue,
        limit: usize,
    ) -> Result<Vec<DocumentSnapshot>, BessoError> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}:runQuery", self.documents_url());
        debug!("firestore: POST {url} {collection}.{field}");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&build_query(collection, field, value, limit))
            .send()
            .await
            .map_err(|e| BessoError::Store(format!("firestore query failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(BessoError::Store(format!(
                "firestore returned {status}: {text}"
            )));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| BessoError::Store(format!("firestore: failed to read response: {e}")))?;
        parse_query_response(&self.documents_name, &body)
    }

    async fn update(&self, path: &DocumentPath, fields: &Fields) -> Result<(), BessoError> {
        let token = self.tokens.access_token().await?;
        let (url, body) = build_update(&self.documents_url(), path, fields)?;
        debug!("firestore: PATCH {url}");

        let resp = self
            .client
            .patch(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| BessoError::Store(format!("firestore update failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(BessoError::Store(format!(
                "firestore returned {status} updating {path}: {text}"
            )));
        }
        Ok(())
    }
}
