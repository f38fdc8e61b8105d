//! Localized speech for skill responses.
//!
//! Uses a simple `t(msg, lang)` function for static strings.
//! Supported languages: English (fallback), Japanese, Arabic, German.

mod messages;


pub use messages::Msg;

/// A supported response language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Ja,
    Ar,
    De,
    En,
}

impl Lang {
    #[cfg(test)]
    pub const ALL: [Lang; 4] = [Lang::Ja, Lang::Ar, Lang::De, Lang::En];

    pub fn code(self) -> &'static str {
        match self {
            Self::Ja => "ja",
            Self::Ar => "ar",
            Self::De => "de",
            Self::En => "en",
        }
    }
}

/// Map a locale tag (`de-DE`, `ja-JP`, ...) to a supported language.
/// Anything unrecognized, including an empty tag, falls back to English.
pub fn resolve_lang(locale: &str) -> Lang {
    // Checked in this order; the first matching prefix wins.
    const PREFIXES: [(&str, Lang); 3] = [("ja", Lang::Ja), ("ar", Lang::Ar), ("de", Lang::De)];
    PREFIXES
        .iter()
        .find(|(prefix, _)| locale.starts_with(prefix))
        .map(|(_, lang)| *lang)
        .unwrap_or(Lang::En)
}

/// Return the localized text for `msg` in `lang`.
pub fn t(msg: Msg, lang: Lang) -> &'static str {
    messages::lookup(msg, lang)
}

/// Diagnostic echo for intents with no dedicated handler.
pub fn intent_triggered(intent: &str) -> String {
    format!("You just triggered {intent}.")
}
