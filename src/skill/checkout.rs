//! Checkout: mark a building record as vacated and reset its cleaning
//! checklists.
//!
//! The three writes are independent: a failure part way through leaves the
//! earlier writes in place. There is no rollback and no retry.

use besso_core::{
    document::{DocumentPath, FieldValue, Fields},
    error::BessoError,
    record,
    traits::DocumentStore,
};
use chrono::Utc;
use tracing::{error, info};

/// Check `record_id` out on behalf of `device_id`.
///
/// Returns `true` only when all three writes succeed. Failures are logged
/// and reported as `false`; nothing propagates to the caller.
pub async fn checkout(store: &dyn DocumentStore, record_id: &str, device_id: &str) -> bool {
    match apply_checkout(store, record_id, device_id).await {
        Ok(()) => true,
        Err(e) => {
            error!("checkout of {record_id} failed: {e}");
            false
        }
    }
}

async fn apply_checkout(
    store: &dyn DocumentStore,
    record_id: &str,
    device_id: &str,
) -> Result<(), BessoError> {
    if record_id.is_empty() {
        return Err(BessoError::Store("empty record id".into()));
    }
    let building = DocumentPath::new(record::CHECK_IN_CHECK_OUT, record_id);

    let mut update = Fields::new();
    update.insert(record::STATUS.into(), record::STATUS_CHECKED_OUT.into());
    update.insert(record::CHECK_OUT.into(), Utc::now().into());
    update.insert(record::LAST_DEVICE.into(), FieldValue::from(device_id));
    store.update(&building, &update).await?;
    info!("document {record_id} updated: status=checked-out lastDevice={device_id}");

    let out_list = building.child(record::CLEANING, record::OUT_CHECK_LIST);
    store
        .update(&out_list, &reset_flag(record::IN_CHECK))
        .await?;

    let in_list = building.child(record::CLEANING, record::IN_CHECK_LIST);
    store
        .update(&in_list, &reset_flag(record::OUT_CHECK))
        .await?;
    info!("cleaning checklists reset for {record_id}");

    Ok(())
}

fn reset_flag(flag: &str) -> Fields {
    Fields::from([(flag.to_string(), false.into())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use besso_store::{InMemoryStore, StoreCall};

    fn provisioned() -> InMemoryStore {
        let store = InMemoryStore::new();
        let building = DocumentPath::new(record::CHECK_IN_CHECK_OUT, "B42");
        store.insert(
            building.clone(),
            Fields::from([
                (record::DEVICE_ID.to_string(), FieldValue::from("D1")),
                (record::STATUS.to_string(), FieldValue::Integer(1)),
            ]),
        );
        store.insert(
            building.child(record::CLEANING, record::OUT_CHECK_LIST),
            Fields::from([(record::IN_CHECK.to_string(), FieldValue::Boolean(true))]),
        );
        store.insert(
            building.child(record::CLEANING, record::IN_CHECK_LIST),
            Fields::from([(record::OUT_CHECK.to_string(), FieldValue::Boolean(true))]),
        );
        store
    }

    fn update_paths(store: &InMemoryStore) -> Vec<String> {
        store
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::Update { path, .. } => Some(path),
                StoreCall::Query { .. } => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_three_updates_in_order() {
        let store = provisioned();
        assert!(checkout(&store, "B42", "D9").await);

        assert_eq!(
            update_paths(&store),
            [
                "CheckInCheckOut/B42",
                "CheckInCheckOut/B42/cleaning/outCheckList",
                "CheckInCheckOut/B42/cleaning/inCheckList",
            ]
        );
        match &store.calls()[0] {
            StoreCall::Update { fields, .. } => {
                assert_eq!(fields, &["checkOut", "lastDevice", "status"])
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_record_state_after_checkout() {
        let store = provisioned();
        assert!(checkout(&store, "B42", "D9").await);

        let building = DocumentPath::new(record::CHECK_IN_CHECK_OUT, "B42");
        let doc = store.get(&building).unwrap();
        assert_eq!(doc[record::STATUS], FieldValue::Integer(2));
        assert_eq!(doc[record::LAST_DEVICE], FieldValue::String("D9".into()));
        assert!(matches!(doc[record::CHECK_OUT], FieldValue::Timestamp(_)));
        // Untouched fields survive.
        assert_eq!(doc[record::DEVICE_ID], FieldValue::String("D1".into()));

        let out_list = store
            .get(&building.child(record::CLEANING, record::OUT_CHECK_LIST))
            .unwrap();
        assert_eq!(out_list[record::IN_CHECK], FieldValue::Boolean(false));
        let in_list = store
            .get(&building.child(record::CLEANING, record::IN_CHECK_LIST))
            .unwrap();
        assert_eq!(in_list[record::OUT_CHECK], FieldValue::Boolean(false));
    }

    #[tokio::test]
    async fn test_any_failed_write_returns_false() {
        for failing in 0..3 {
            let store = provisioned();
            store.fail_update_at(failing);
            assert!(!checkout(&store, "B42", "D1").await, "write {failing}");
            // Writes after the failing one are never attempted.
            assert_eq!(update_paths(&store).len(), failing + 1);
        }
    }

    #[tokio::test]
    async fn test_partial_application_is_left_in_place() {
        let store = provisioned();
        store.fail_update_at(1);
        assert!(!checkout(&store, "B42", "D1").await);

        let building = DocumentPath::new(record::CHECK_IN_CHECK_OUT, "B42");
        assert_eq!(
            store.get(&building).unwrap()[record::STATUS],
            FieldValue::Integer(2)
        );
        let out_list = store
            .get(&building.child(record::CLEANING, record::OUT_CHECK_LIST))
            .unwrap();
        assert_eq!(out_list[record::IN_CHECK], FieldValue::Boolean(true));
    }

    #[tokio::test]
    async fn test_missing_cleaning_document_returns_false() {
        let store = InMemoryStore::new();
        store.insert(
            DocumentPath::new(record::CHECK_IN_CHECK_OUT, "B1"),
            Fields::new(),
        );
        assert!(!checkout(&store, "B1", "D1").await);
    }

    #[tokio::test]
    async fn test_empty_record_id_returns_false_without_writes() {
        let store = provisioned();
        assert!(!checkout(&store, "", "D1").await);
        assert!(store.calls().is_empty());
    }
}
