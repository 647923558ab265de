//! 语言检测模块
//!
//! 基于字符集的启发式检测：按固定优先级依次匹配规则，第一条命中的规则胜出。
//! 非拉丁文字优先，其次是带有特征变音符号的拉丁语言；都不命中时返回 `en`。
//!
//! 这不是统计分类器，短文本或没有特征字符的文本都会落到默认语言。
//!
//! 已知歧义：`no` 与 `da` 使用完全相同的字符集，`no` 声明在前，因此 `da`
//! 永远不会被检测出来。`nl` 的字符集同样被 `fr` 完全覆盖。
//!
//! 规则只包含非 ASCII 字符，纯 ASCII 文本一定得到 `en`。

use std::sync::OnceLock;

use regex::Regex;

/// 没有任何规则命中时的默认语言
pub const BASELINE_LANGUAGE: &str = "en";

/// 规则表：(语言代码, 字符类)，顺序即优先级
const RULE_PATTERNS: &[(&str, &str)] = &[
    // 非拉丁文字
    ("hi", r"[\x{0900}-\x{097F}]"),
    ("zh", r"[\x{4E00}-\x{9FFF}]"),
    ("ru", r"[\x{0400}-\x{04FF}]"),
    ("ar", r"[\x{0600}-\x{06FF}]"),
    ("ja", r"[\x{3040}-\x{309F}\x{30A0}-\x{30FF}]"),
    ("ko", r"[\x{AC00}-\x{D7AF}]"),
    ("th", r"[\x{0E00}-\x{0E7F}]"),
    ("he", r"[\x{0590}-\x{05FF}]"),
    ("bn", r"[\x{0980}-\x{09FF}]"),
    ("ta", r"[\x{0B80}-\x{0BFF}]"),
    ("te", r"[\x{0C00}-\x{0C7F}]"),
    ("ml", r"[\x{0D00}-\x{0D7F}]"),
    ("kn", r"[\x{0C80}-\x{0CFF}]"),
    ("gu", r"[\x{0A80}-\x{0AFF}]"),
    ("pa", r"[\x{0A00}-\x{0A7F}]"),
    // 拉丁文字 + 变音符号
    ("es", r"(?i)[ñáéíóúü¿¡]"),
    ("fr", r"(?i)[àâäéèêëïîôöùûüÿç]"),
    ("de", r"(?i)[äöüß]"),
    ("it", r"(?i)[àèéìíîòóù]"),
    ("pt", r"(?i)[ãâàáêéçõôóü]"),
    ("pl", r"(?i)[ąćęłńóśźż]"),
    ("tr", r"(?i)[çğıöşü]"),
    ("sv", r"(?i)[åäö]"),
    ("no", r"(?i)[æøå]"),
    ("da", r"(?i)[æøå]"),
    ("nl", r"(?i)[ëï]"),
];

/// 一条检测规则
#[derive(Debug)]
pub struct DetectionRule {
    pub code: &'static str,
    pattern: Regex,
}

impl DetectionRule {
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// 编译后的规则表，进程内只编译一次
pub fn rules() -> &'static [DetectionRule] {
    static RULES: OnceLock<Vec<DetectionRule>> = OnceLock::new();

    RULES.get_or_init(|| {
        RULE_PATTERNS
            .iter()
            .filter_map(|&(code, pattern)| match Regex::new(pattern) {
                Ok(pattern) => Some(DetectionRule { code, pattern }),
                Err(e) => {
                    tracing::error!("语言检测规则 {} 编译失败: {}", code, e);
                    None
                }
            })
            .collect()
    })
}

/// 检测文本语言，永不失败
pub fn detect(text: &str) -> &'static str {
    rules()
        .iter()
        .find(|rule| rule.matches(text))
        .map(|rule| rule.code)
        .unwrap_or(BASELINE_LANGUAGE)
}

/// 语言检测器
///
/// 无状态，仅为了能作为依赖注入到 [`Translator`](crate::translation::Translator)。
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageDetector;

impl LanguageDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, text: &str) -> &'static str {
        detect(text)
    }
}
