//! 次级翻译后端：LibreTranslate 风格 REST 端点
//!
//! 仅在主后端给出空或不可解析结果时才会被级联链消费。

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{TranslationError, TranslationResult};
use crate::providers::TranslationProvider;

pub struct LibreProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl LibreProvider {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LibreResponse {
    translated_text: String,
}

fn build_payload(text: &str, source_lang: &str, target_lang: &str) -> serde_json::Value {
    serde_json::json!({
        "q": text,
        "source": source_lang,
        "target": target_lang,
        "format": "text",
    })
}

fn parse_response(body: &str) -> TranslationResult<String> {
    let response: LibreResponse = serde_json::from_str(body)?;

    if response.translated_text.trim().is_empty() {
        return Err(TranslationError::NoTranslationAvailable(
            "次级后端返回空译文".to_string(),
        ));
    }

    Ok(response.translated_text)
}

#[async_trait]
impl TranslationProvider for LibreProvider {
    fn name(&self) -> &'static str {
        "libre"
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        let payload = build_payload(text, source_lang, target_lang);

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::NetworkFailure(format!(
                "次级后端返回状态 {}",
                status
            )));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}
