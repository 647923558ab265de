//! 支持的语言列表

use serde::Serialize;

/// 语言代码与本地名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

const fn lang(code: &'static str, name: &'static str) -> Language {
    Language { code, name }
}

/// 客户端可选择的语言，顺序即展示顺序
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    lang("en", "English"),
    lang("es", "Español"),
    lang("fr", "Français"),
    lang("de", "Deutsch"),
    lang("hi", "हिन्दी"),
    lang("zh", "中文"),
    lang("ru", "Русский"),
    lang("ar", "العربية"),
    lang("ja", "日本語"),
    lang("ko", "한국어"),
    lang("it", "Italiano"),
    lang("pt", "Português"),
    lang("tr", "Türkçe"),
    lang("th", "ไทย"),
    lang("pl", "Polski"),
    lang("nl", "Nederlands"),
    lang("sv", "Svenska"),
    lang("no", "Norsk"),
    lang("da", "Dansk"),
    lang("bn", "বাংলা"),
    lang("ta", "தமிழ்"),
    lang("te", "తెలుగు"),
    lang("ml", "മലയാളം"),
    lang("kn", "ಕನ್ನಡ"),
    lang("gu", "ગુજરાતી"),
    lang("pa", "ਪੰਜਾਬੀ"),
    lang("he", "עברית"),
];

pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|l| l.code == code)
}

pub fn find(code: &str) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES.iter().find(|l| l.code == code)
}
