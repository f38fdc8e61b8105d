//! Intent dispatch: each voice request goes to the first handler that
//! accepts it.
//!
//! Handlers are tried in registration order. Any error a handler returns,
//! or a request nobody accepts, lands in one boundary that logs it and
//! answers with the localized error message.

pub mod checkout;
mod handlers;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use besso_core::{
    envelope::{RequestEnvelope, ResponseBuilder, ResponseEnvelope},
    error::BessoError,
};
use besso_store::StoreHandle;
use tracing::{debug, error, info};

use crate::i18n::{self, Lang, Msg};

/// Intent names the skill answers.
pub const CHECK_OUT_INTENT: &str = "CheckOutIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const FALLBACK_INTENT: &str = "AMAZON.FallbackIntent";

/// Everything a handler may look at for one invocation.
pub struct HandlerInput<'a> {
    pub envelope: &'a RequestEnvelope,
    pub store: &'a StoreHandle,
}

impl HandlerInput<'_> {
    pub fn lang(&self) -> Lang {
        i18n::resolve_lang(self.envelope.locale())
    }

    pub fn is_request_type(&self, request_type: &str) -> bool {
        self.envelope.request_type() == request_type
    }

    pub fn is_intent_name(&self, name: &str) -> bool {
        self.envelope.intent_name() == Some(name)
    }
}

/// One entry in the dispatch table.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    fn can_handle(&self, input: &HandlerInput<'_>) -> bool;

    async fn handle(&self, input: &HandlerInput<'_>) -> Result<ResponseEnvelope, BessoError>;
}

/// The skill: a store handle plus the ordered handler table.
pub struct Skill {
    store: StoreHandle,
    handlers: Vec<Box<dyn RequestHandler>>,
}

impl Skill {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store,
            handlers: handlers::default_handlers(),
        }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Answer one request. Never fails; errors become spoken apologies.
    pub async fn dispatch(&self, envelope: &RequestEnvelope) -> ResponseEnvelope {
        let input = HandlerInput {
            envelope,
            store: &self.store,
        };
        info!(
            "request {} type={} intent={} lang={}",
            envelope.request.request_id,
            envelope.request_type(),
            envelope.intent_name().unwrap_or("-"),
            input.lang().code()
        );

        match self.route(&input).await {
            Ok(response) => response,
            Err(e) => {
                error!("request {} failed: {e}", envelope.request.request_id);
                let speak = i18n::t(Msg::Error, input.lang());
                ResponseBuilder::new().speak(speak).ask(speak).build()
            }
        }
    }

    async fn route(&self, input: &HandlerInput<'_>) -> Result<ResponseEnvelope, BessoError> {
        for handler in &self.handlers {
            if handler.can_handle(input) {
                debug!("dispatch: {}", handler.name());
                return handler.handle(input).await;
            }
        }
        Err(BessoError::Request(format!(
            "no handler for request type '{}'",
            input.envelope.request_type()
        )))
    }
}
