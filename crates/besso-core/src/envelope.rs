//! Voice-platform request and response envelopes.
//!
//! Mirrors the JSON the voice platform posts to a custom-skill endpoint.
//! Only the fields the skill reads are modelled; everything else is ignored.

use serde::{Deserialize, Serialize};

pub const LAUNCH_REQUEST: &str = "LaunchRequest";
pub const INTENT_REQUEST: &str = "IntentRequest";
pub const SESSION_ENDED_REQUEST: &str = "SessionEndedRequest";

const ENVELOPE_VERSION: &str = "1.0";

fn default_version() -> String {
    ENVELOPE_VERSION.to_string()
}

/// An incoming skill invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub context: InvocationContext,
    pub request: Request,
}

/// Device and application state attached to every invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvocationContext {
    #[serde(rename = "System", default)]
    pub system: SystemState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemState {
    #[serde(default)]
    pub device: Option<Device>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub device_id: String,
}

/// The request body: launch, intent, or session-ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub intent: Option<Intent>,
    /// Why the session ended (session-ended requests only).
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
}

impl RequestEnvelope {
    /// Locale tag, empty when the platform did not send one.
    pub fn locale(&self) -> &str {
        self.request.locale.as_deref().unwrap_or("")
    }

    pub fn request_type(&self) -> &str {
        &self.request.request_type
    }

    /// Intent name, for intent requests only.
    pub fn intent_name(&self) -> Option<&str> {
        if self.request.request_type != INTENT_REQUEST {
            return None;
        }
        self.request.intent.as_ref().map(|i| i.name.as_str())
    }

    /// Device the request came from, if the platform identified one.
    pub fn device_id(&self) -> Option<&str> {
        self.context
            .system
            .device
            .as_ref()
            .map(|d| d.device_id.as_str())
            .filter(|id| !id.is_empty())
    }
}

/// The skill's reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub version: String,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Spoken output. The skill always produces SSML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
    PlainText { text: String },
}

impl OutputSpeech {
    fn ssml(text: &str) -> Self {
        Self::Ssml {
            ssml: format!("<speak>{text}</speak>"),
        }
    }

    /// The spoken text without the SSML wrapper.
    pub fn text(&self) -> &str {
        match self {
            Self::Ssml { ssml } => ssml
                .strip_prefix("<speak>")
                .and_then(|s| s.strip_suffix("</speak>"))
                .unwrap_or(ssml),
            Self::PlainText { text } => text,
        }
    }
}

impl ResponseEnvelope {
    /// Spoken text, if the response speaks at all.
    pub fn speech(&self) -> Option<&str> {
        self.response.output_speech.as_ref().map(OutputSpeech::text)
    }

    pub fn reprompt(&self) -> Option<&str> {
        self.response
            .reprompt
            .as_ref()
            .map(|r| r.output_speech.text())
    }

    /// Whether the platform should keep listening after this response.
    pub fn keeps_session_open(&self) -> bool {
        self.response.should_end_session == Some(false)
    }
}

/// Fluent builder for [`ResponseEnvelope`].
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    body: ResponseBody,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spoken output.
    pub fn speak(mut self, text: &str) -> Self {
        self.body.output_speech = Some(OutputSpeech::ssml(text));
        self
    }

    /// Set the re-prompt and keep the session open.
    pub fn ask(mut self, text: &str) -> Self {
        self.body.reprompt = Some(Reprompt {
            output_speech: OutputSpeech::ssml(text),
        });
        self.body.should_end_session = Some(false);
        self
    }

    /// Close the session after speaking.
    pub fn end_session(mut self) -> Self {
        self.body.should_end_session = Some(true);
        self
    }

    pub fn build(self) -> ResponseEnvelope {
        ResponseEnvelope {
            version: default_version(),
            response: self.body,
        }
    }
}
