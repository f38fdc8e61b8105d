use super::*;
use besso_core::{
    document::{DocumentPath, FieldValue, Fields},
    envelope::RequestEnvelope,
    record,
};
use besso_store::{InMemoryStore, StoreCall};
use serde_json::json;
use std::sync::Arc;

fn launch(locale: &str) -> RequestEnvelope {
    serde_json::from_value(json!({
        "request": {"type": "LaunchRequest", "requestId": "r-launch", "locale": locale}
    }))
    .unwrap()
}

fn intent(name: &str, locale: &str, device_id: &str) -> RequestEnvelope {
    serde_json::from_value(json!({
        "context": {"System": {"device": {"deviceId": device_id}}},
        "request": {
            "type": "IntentRequest",
            "requestId": "r-intent",
            "locale": locale,
            "intent": {"name": name}
        }
    }))
    .unwrap()
}

fn session_ended() -> RequestEnvelope {
    serde_json::from_value(json!({
        "request": {"type": "SessionEndedRequest", "locale": "en-US", "reason": "USER_INITIATED"}
    }))
    .unwrap()
}

/// A store holding building `B42` registered to device `D1`.
fn provisioned_store() -> Arc<InMemoryStore> {
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
    Arc::new(store)
}

fn skill_with(store: &Arc<InMemoryStore>) -> Skill {
    Skill::new(StoreHandle::Ready(store.clone()))
}

fn unavailable_skill() -> Skill {
    Skill::new(StoreHandle::Unavailable("SECRET_KEY env var is missing".into()))
}

#[tokio::test]
async fn test_launch_greets_and_keeps_session_open() {
    let skill = unavailable_skill();
    let resp = skill.dispatch(&launch("en-US")).await;
    assert_eq!(resp.speech(), Some(i18n::t(Msg::Launch, Lang::En)));
    assert_eq!(resp.reprompt(), Some(i18n::t(Msg::Launch, Lang::En)));
    assert!(resp.keeps_session_open());
}

#[tokio::test]
async fn test_launch_localized() {
    let skill = unavailable_skill();
    let resp = skill.dispatch(&launch("ja-JP")).await;
    assert_eq!(resp.speech(), Some(i18n::t(Msg::Launch, Lang::Ja)));
}

#[tokio::test]
async fn test_checkout_end_to_end_german() {
    let store = provisioned_store();
    let skill = skill_with(&store);

    let resp = skill
        .dispatch(&intent(CHECK_OUT_INTENT, "de-DE", "D1"))
        .await;
    assert_eq!(resp.speech(), Some("Sie wurden ausgecheckt."));
    assert!(!resp.keeps_session_open());

    let building = DocumentPath::new(record::CHECK_IN_CHECK_OUT, "B42");
    let doc = store.get(&building).unwrap();
    assert_eq!(doc[record::STATUS], FieldValue::Integer(2));
    assert_eq!(doc[record::LAST_DEVICE], FieldValue::String("D1".into()));
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
async fn test_checkout_queries_by_device_id_once() {
    let store = provisioned_store();
    let skill = skill_with(&store);
    skill
        .dispatch(&intent(CHECK_OUT_INTENT, "en-US", "D1"))
        .await;

    let calls = store.calls();
    assert_eq!(
        calls[0],
        StoreCall::Query {
            collection: record::CHECK_IN_CHECK_OUT.into(),
            field: record::DEVICE_ID.into(),
            value: FieldValue::from("D1"),
        }
    );
    assert_eq!(calls.len(), 4);
}

#[tokio::test]
async fn test_checkout_without_store_speaks_error() {
    let skill = unavailable_skill();
    for lang in Lang::ALL {
        let locale = format!("{}-XX", lang.code());
        let resp = skill
            .dispatch(&intent(CHECK_OUT_INTENT, &locale, "D1"))
            .await;
        assert_eq!(resp.speech(), Some(i18n::t(Msg::Error, lang)));
        assert!(resp.reprompt().is_none());
    }
}

#[tokio::test]
async fn test_checkout_unknown_device_speaks_unknown_building() {
    let store = provisioned_store();
    let skill = skill_with(&store);
    for lang in Lang::ALL {
        let locale = format!("{}-XX", lang.code());
        let resp = skill
            .dispatch(&intent(CHECK_OUT_INTENT, &locale, "D-unregistered"))
            .await;
        let speech = resp.speech().unwrap();
        assert_eq!(speech, i18n::t(Msg::UnknownBuilding, lang));
        assert_ne!(speech, i18n::t(Msg::Error, lang));
    }
    // Only queries, never an update.
    assert!(store
        .calls()
        .iter()
        .all(|c| matches!(c, StoreCall::Query { .. })));
}

#[tokio::test]
async fn test_checkout_write_failure_speaks_error() {
    let store = provisioned_store();
    store.fail_update_at(2);
    let skill = skill_with(&store);
    let resp = skill
        .dispatch(&intent(CHECK_OUT_INTENT, "ar-SA", "D1"))
        .await;
    assert_eq!(resp.speech(), Some(i18n::t(Msg::Error, Lang::Ar)));
    // The gateway's failure is an answer, not a boundary error: no reprompt.
    assert!(resp.reprompt().is_none());
}

#[tokio::test]
async fn test_checkout_query_failure_hits_error_boundary() {
    let store = provisioned_store();
    store.fail_queries();
    let skill = skill_with(&store);
    let resp = skill
        .dispatch(&intent(CHECK_OUT_INTENT, "en-US", "D1"))
        .await;
    assert_eq!(resp.speech(), Some(i18n::t(Msg::Error, Lang::En)));
    assert_eq!(resp.reprompt(), Some(i18n::t(Msg::Error, Lang::En)));
}

#[tokio::test]
async fn test_checkout_without_device_id_hits_error_boundary() {
    let store = provisioned_store();
    let skill = skill_with(&store);
    let resp = skill
        .dispatch(&intent(CHECK_OUT_INTENT, "en-US", ""))
        .await;
    assert_eq!(resp.speech(), Some(i18n::t(Msg::Error, Lang::En)));
    assert!(resp.keeps_session_open());
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_help_reprompts() {
    let skill = unavailable_skill();
    let resp = skill.dispatch(&intent(HELP_INTENT, "de-DE", "D1")).await;
    assert_eq!(resp.speech(), Some(i18n::t(Msg::Help, Lang::De)));
    assert_eq!(resp.reprompt(), Some(i18n::t(Msg::Help, Lang::De)));
    assert!(resp.keeps_session_open());
}

#[tokio::test]
async fn test_cancel_and_stop_end_session_silently() {
    let skill = unavailable_skill();
    for name in [CANCEL_INTENT, STOP_INTENT] {
        let resp = skill.dispatch(&intent(name, "en-US", "D1")).await;
        assert_eq!(resp.speech(), Some(""));
        assert_eq!(resp.response.should_end_session, Some(true));
    }
}

#[tokio::test]
async fn test_fallback_reprompts_with_help() {
    let skill = unavailable_skill();
    let resp = skill
        .dispatch(&intent(FALLBACK_INTENT, "ja-JP", "D1"))
        .await;
    assert_eq!(resp.speech(), Some(i18n::t(Msg::Fallback, Lang::Ja)));
    assert_eq!(resp.reprompt(), Some(i18n::t(Msg::Help, Lang::Ja)));
}

#[tokio::test]
async fn test_session_ended_is_empty() {
    let skill = unavailable_skill();
    let resp = skill.dispatch(&session_ended()).await;
    assert!(resp.speech().is_none());
    assert!(resp.reprompt().is_none());
    assert!(resp.response.should_end_session.is_none());
}

#[tokio::test]
async fn test_unknown_intent_is_reflected() {
    let skill = unavailable_skill();
    let resp = skill
        .dispatch(&intent("OrderTaxiIntent", "en-US", "D1"))
        .await;
    assert_eq!(resp.speech(), Some("You just triggered OrderTaxiIntent."));
}

#[tokio::test]
async fn test_unknown_request_type_hits_error_boundary() {
    let skill = unavailable_skill();
    let envelope: RequestEnvelope = serde_json::from_value(json!({
        "request": {"type": "CanFulfillIntentRequest", "locale": "de-DE"}
    }))
    .unwrap();
    let resp = skill.dispatch(&envelope).await;
    assert_eq!(resp.speech(), Some(i18n::t(Msg::Error, Lang::De)));
    assert!(resp.keeps_session_open());
}

#[tokio::test]
async fn test_launch_takes_priority_over_intent_payload() {
    // A launch request that happens to carry an intent is still a launch.
    let skill = unavailable_skill();
    let envelope: RequestEnvelope = serde_json::from_value(json!({
        "request": {
            "type": "LaunchRequest",
            "locale": "en-US",
            "intent": {"name": "CheckOutIntent"}
        }
    }))
    .unwrap();
    let resp = skill.dispatch(&envelope).await;
    assert_eq!(resp.speech(), Some(i18n::t(Msg::Launch, Lang::En)));
}
