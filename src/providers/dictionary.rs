//! 静态词典回退
//!
//! 两个后端都无产出时的最后一级：对固定的领域短语表
//! （问候语、维修名词、时间词、形容词）做西班牙语到英语的替换。
//! 先做整句精确匹配（大小写不敏感），再按表序做逐条大小写不敏感
//! 的词边界子串替换。仅支持 es -> en。

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;

use crate::error::{TranslationError, TranslationResult};
use crate::providers::TranslationProvider;

/// 领域短语表，长短语在前（复合短语必须先于其组成词被替换）
const PHRASES: &[(&str, &str)] = &[
    ("buenas tardes", "good afternoon"),
    ("buenas noches", "good evening"),
    ("agua caliente", "hot water"),
    ("electricidad", "electricity"),
    ("refrigerador", "refrigerator"),
    ("buenos días", "good morning"),
    ("calefacción", "heating"),
    ("no funciona", "is not working"),
    ("lavaplatos", "dishwasher"),
    ("caliente", "hot"),
    ("gracias", "thank you"),
    ("hay una", "there is a"),
    ("inodoro", "toilet"),
    ("urgente", "urgent"),
    ("ventana", "window"),
    ("cocina", "kitchen"),
    ("hay un", "there is a"),
    ("mañana", "tomorrow"),
    ("puerta", "door"),
    ("semana", "week"),
    ("ahora", "now"),
    ("grifo", "faucet"),
    ("llave", "faucet"),
    ("techo", "ceiling"),
    ("agua", "water"),
    ("ayer", "yesterday"),
    ("baño", "bathroom"),
    ("está", "is"),
    ("frío", "cold"),
    ("fuga", "leak"),
    ("hola", "hello"),
    ("rota", "broken"),
    ("roto", "broken"),
    ("hoy", "today"),
    ("luz", "light"),
    ("de", "of"),
    ("el", "the"),
    ("la", "the"),
    ("y", "and"),
];

/// 替换用正则缓存，词边界匹配避免命中单词内部
fn substitutions() -> &'static Vec<(Regex, &'static str)> {
    static SUBSTITUTIONS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    SUBSTITUTIONS.get_or_init(|| {
        PHRASES
            .iter()
            .filter_map(|(phrase, replacement)| {
                Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase)))
                    .ok()
                    .map(|re| (re, *replacement))
            })
            .collect()
    })
}

pub struct DictionaryProvider;

impl DictionaryProvider {
    pub fn new() -> Self {
        Self
    }

    /// 整句精确匹配
    fn exact_match(text: &str) -> Option<&'static str> {
        let needle = text.trim().to_lowercase();
        PHRASES
            .iter()
            .find(|(phrase, _)| *phrase == needle)
            .map(|(_, replacement)| *replacement)
    }

    /// 逐条子串替换；没有任何命中时视为无产出
    fn substitute(text: &str) -> Option<String> {
        let mut result = text.to_string();

        for (re, replacement) in substitutions() {
            if re.is_match(&result) {
                result = re.replace_all(&result, *replacement).into_owned();
            }
        }

        if result == text {
            None
        } else {
            Some(result)
        }
    }
}

impl Default for DictionaryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for DictionaryProvider {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    fn supports(&self, source_lang: &str, target_lang: &str) -> bool {
        source_lang == "es" && target_lang == "en"
    }

    async fn translate(
        &self,
        text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> TranslationResult<String> {
        if let Some(replacement) = Self::exact_match(text) {
            return Ok(replacement.to_string());
        }

        Self::substitute(text).ok_or_else(|| {
            TranslationError::NoTranslationAvailable("词典中无匹配短语".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_ordered_longest_first() {
        let lengths: Vec<usize> = PHRASES
            .iter()
            .map(|(phrase, _)| phrase.chars().count())
            .collect();
        for pair in lengths.windows(2) {
            assert!(
                pair[0] >= pair[1],
                "phrase table must keep longer phrases first"
            );
        }
    }

    #[test]
    fn test_exact_phrase_match() {
        assert_eq!(DictionaryProvider::exact_match("hola"), Some("hello"));
        assert_eq!(
            DictionaryProvider::exact_match("  Gracias  "),
            Some("thank you")
        );
        assert_eq!(
            DictionaryProvider::exact_match("Buenos Días"),
            Some("good morning")
        );
        assert_eq!(DictionaryProvider::exact_match("algo raro"), None);
    }

    #[tokio::test]
    async fn test_word_for_word_substitution() {
        let provider = DictionaryProvider::new();
        let result = provider
            .translate("hay una fuga de agua", "es", "en")
            .await
            .unwrap();
        assert_eq!(result, "there is a leak of water");
    }

    #[tokio::test]
    async fn test_substitution_is_case_insensitive() {
        let provider = DictionaryProvider::new();
        let result = provider.translate("Hay Una FUGA", "es", "en").await.unwrap();
        assert_eq!(result, "there is a leak");
    }

    #[tokio::test]
    async fn test_compound_phrases_replace_before_parts() {
        let provider = DictionaryProvider::new();
        let result = provider
            .translate("el agua caliente no funciona", "es", "en")
            .await
            .unwrap();
        assert_eq!(result, "the hot water is not working");
    }

    #[tokio::test]
    async fn test_accented_words_substitute() {
        let provider = DictionaryProvider::new();
        let result = provider
            .translate("el baño está roto", "es", "en")
            .await
            .unwrap();
        assert_eq!(result, "the bathroom is broken");
    }

    #[test]
    fn test_word_boundaries_protect_inner_matches() {
        // "aguacate" 包含 "agua"，但词边界禁止替换单词内部
        assert_eq!(DictionaryProvider::substitute("aguacate"), None);
    }

    #[tokio::test]
    async fn test_unmatched_text_reports_unavailable() {
        let provider = DictionaryProvider::new();
        let err = provider
            .translate("texto sin coincidencias", "es", "en")
            .await
            .unwrap_err();
        assert!(matches!(err, TranslationError::NoTranslationAvailable(_)));
    }

    #[test]
    fn test_supports_only_spanish_to_english() {
        let provider = DictionaryProvider::new();
        assert!(provider.supports("es", "en"));
        assert!(!provider.supports("pt", "en"));
        assert!(!provider.supports("es", "fr"));
        assert!(!provider.supports("en", "es"));
    }
}
