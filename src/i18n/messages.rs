//! Static speech table.

use super::Lang;

/// Kinds of localized speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Launch,
    Checkout,
    Help,
    Fallback,
    Error,
    UnknownBuilding,
}

impl Msg {
    #[cfg(test)]
    pub const ALL: [Msg; 6] = [
        Msg::Launch,
        Msg::Checkout,
        Msg::Help,
        Msg::Fallback,
        Msg::Error,
        Msg::UnknownBuilding,
    ];
}

pub(super) fn lookup(msg: Msg, lang: Lang) -> &'static str {
    match msg {
        Msg::Launch => match lang {
            Lang::Ja => "こんにちは。こちらはフロントです。ご用件をお伺いいたします。",
            Lang::Ar => "مرحبًا، هذا هو مكتب الاستقبال. كيف يمكنني مساعدتك؟",
            Lang::De => "Hallo, hier ist die Rezeption. Wie kann ich Ihnen helfen?",
            Lang::En => "Hello. This is the front desk. How may I help you?",
        },
        Msg::Checkout => match lang {
            Lang::Ja => "チェックアウトしました",
            Lang::Ar => "تم تسجيل الخروج.",
            Lang::De => "Sie wurden ausgecheckt.",
            Lang::En => "You have been checked out.",
        },
        Msg::Help => match lang {
            Lang::Ja => "どうされましたか？",
            Lang::Ar => "كيف يمكنني مساعدتك؟",
            Lang::De => "Wie kann ich Ihnen helfen?",
            Lang::En => "How can I assist you?",
        },
        Msg::Fallback => match lang {
            Lang::Ja => "すみません、よくわかりません。挨拶かヘルプを言ってください。どのようにお手伝いできますか？",
            Lang::Ar => "همم، لست متأكدًا. يمكنك أن تقول مرحبًا أو مساعدة. ماذا تريد أن تفعل؟",
            Lang::De => "Ähm, ich bin nicht sicher. Du kannst Hallo oder Hilfe sagen. Wie kann ich dir helfen?",
            Lang::En => "Hmm, I'm not sure. You can say Hello or Help. What would you like to do?",
        },
        Msg::Error => match lang {
            Lang::Ja => "すみません。問題が発生しました。もう一度お願いいたします。",
            Lang::Ar => "آسف، حدثت مشكلة. حاول مرة أخرى.",
            Lang::De => "Entschuldigung, es gab ein Problem. Bitte versuche es noch einmal.",
            Lang::En => "I'm sorry, there was an issue. Please try again.",
        },
        Msg::UnknownBuilding => match lang {
            Lang::Ja => "申し訳ありません。どのビルか認識できませんでした。管理者にご連絡ください。",
            Lang::Ar => "آسف، لا أعرف أي مبنى هذا. يرجى الاتصال بالمسؤول.",
            Lang::De => "Entschuldigung, mir ist nicht bekannt, um welches Gebäude es sich handelt. Bitte kontaktieren Sie den Administrator.",
            Lang::En => "Sorry, I don\u{2019}t know which building this is. Please contact the administrator.",
        },
    }
}
