//! The dispatch table, in priority order.

use async_trait::async_trait;
use besso_core::{
    document::FieldValue,
    envelope::{
        ResponseBuilder, ResponseEnvelope, INTENT_REQUEST, LAUNCH_REQUEST, SESSION_ENDED_REQUEST,
    },
    error::BessoError,
    record,
};
use tracing::{error, info, warn};

use super::{
    checkout::checkout, HandlerInput, RequestHandler, CANCEL_INTENT, CHECK_OUT_INTENT,
    FALLBACK_INTENT, HELP_INTENT, STOP_INTENT,
};
use crate::i18n::{self, t, Msg};

pub(super) fn default_handlers() -> Vec<Box<dyn RequestHandler>> {
    vec![
        Box::new(LaunchHandler),
        Box::new(CheckOutHandler),
        Box::new(HelpHandler),
        Box::new(CancelOrStopHandler),
        Box::new(FallbackHandler),
        Box::new(SessionEndedHandler),
        Box::new(IntentReflectorHandler),
    ]
}

/// Session start: greet and keep listening.
struct LaunchHandler;

#[async_trait]
impl RequestHandler for LaunchHandler {
    fn name(&self) -> &str {
        "launch"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.is_request_type(LAUNCH_REQUEST)
    }

    async fn handle(&self, input: &HandlerInput<'_>) -> Result<ResponseEnvelope, BessoError> {
        let speak = t(Msg::Launch, input.lang());
        Ok(ResponseBuilder::new().speak(speak).ask(speak).build())
    }
}

/// Check the requesting device's building out.
struct CheckOutHandler;

#[async_trait]
impl RequestHandler for CheckOutHandler {
    fn name(&self) -> &str {
        "checkout"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.is_intent_name(CHECK_OUT_INTENT)
    }

    async fn handle(&self, input: &HandlerInput<'_>) -> Result<ResponseEnvelope, BessoError> {
        let lang = input.lang();

        let Some(store) = input.store.ready() else {
            error!("checkout: document store is not available");
            return Ok(ResponseBuilder::new().speak(t(Msg::Error, lang)).build());
        };

        let device_id = input
            .envelope
            .device_id()
            .ok_or_else(|| BessoError::Request("checkout request carries no device id".into()))?;
        info!("checkout requested from device_id={device_id}");

        let records = store
            .find_by_field(
                record::CHECK_IN_CHECK_OUT,
                record::DEVICE_ID,
                &FieldValue::from(device_id),
                1,
            )
            .await?;

        let Some(building) = records.first() else {
            warn!("checkout: no building registered for device_id={device_id}");
            return Ok(ResponseBuilder::new()
                .speak(t(Msg::UnknownBuilding, lang))
                .build());
        };

        let success = checkout(store, building.id(), device_id).await;
        let speak = if success {
            t(Msg::Checkout, lang)
        } else {
            t(Msg::Error, lang)
        };
        Ok(ResponseBuilder::new().speak(speak).build())
    }
}

struct HelpHandler;

#[async_trait]
impl RequestHandler for HelpHandler {
    fn name(&self) -> &str {
        "help"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.is_intent_name(HELP_INTENT)
    }

    async fn handle(&self, input: &HandlerInput<'_>) -> Result<ResponseEnvelope, BessoError> {
        let speak = t(Msg::Help, input.lang());
        Ok(ResponseBuilder::new().speak(speak).ask(speak).build())
    }
}

/// Cancel or stop: say nothing and close the session.
struct CancelOrStopHandler;

#[async_trait]
impl RequestHandler for CancelOrStopHandler {
    fn name(&self) -> &str {
        "cancel-or-stop"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.is_intent_name(CANCEL_INTENT) || input.is_intent_name(STOP_INTENT)
    }

    async fn handle(&self, _input: &HandlerInput<'_>) -> Result<ResponseEnvelope, BessoError> {
        Ok(ResponseBuilder::new().speak("").end_session().build())
    }
}

struct FallbackHandler;

#[async_trait]
impl RequestHandler for FallbackHandler {
    fn name(&self) -> &str {
        "fallback"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.is_intent_name(FALLBACK_INTENT)
    }

    async fn handle(&self, input: &HandlerInput<'_>) -> Result<ResponseEnvelope, BessoError> {
        let lang = input.lang();
        Ok(ResponseBuilder::new()
            .speak(t(Msg::Fallback, lang))
            .ask(t(Msg::Help, lang))
            .build())
    }
}

/// Session ended: the platform expects an empty body.
struct SessionEndedHandler;

#[async_trait]
impl RequestHandler for SessionEndedHandler {
    fn name(&self) -> &str {
        "session-ended"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.is_request_type(SESSION_ENDED_REQUEST)
    }

    async fn handle(&self, input: &HandlerInput<'_>) -> Result<ResponseEnvelope, BessoError> {
        info!(
            "session ended: {}",
            input.envelope.request.reason.as_deref().unwrap_or("unknown")
        );
        Ok(ResponseBuilder::new().build())
    }
}

/// Any other intent: name it back. Must stay last.
struct IntentReflectorHandler;

#[async_trait]
impl RequestHandler for IntentReflectorHandler {
    fn name(&self) -> &str {
        "intent-reflector"
    }

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool {
        input.is_request_type(INTENT_REQUEST)
    }

    async fn handle(&self, input: &HandlerInput<'_>) -> Result<ResponseEnvelope, BessoError> {
        let intent = input.envelope.intent_name().unwrap_or_default();
        Ok(ResponseBuilder::new()
            .speak(&i18n::intent_triggered(intent))
            .build())
    }
}
