//! 主翻译后端：公共 Web 端点
//!
//! 无需 API Key 的 GET 接口，响应是嵌套的数组套数组：
//! 第一个元素是分段数组，每个分段的第一个元素是该段译文，
//! 按顺序拼接即可重组整段译文。结构必须防御性解析。

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{TranslationError, TranslationResult};
use crate::providers::TranslationProvider;

pub struct GoogleWebProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleWebProvider {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl TranslationProvider for GoogleWebProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", source_lang),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::NetworkFailure(format!(
                "主后端返回状态 {}",
                status
            )));
        }

        let body = response.text().await?;
        parse_segments(&body)
    }
}

/// 从嵌套数组响应中重组译文
fn parse_segments(body: &str) -> TranslationResult<String> {
    let value: Value = serde_json::from_str(body)?;

    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| TranslationError::ParseFailure("响应缺少分段数组".to_string()))?;

    let mut translation = String::new();
    for segment in segments {
        if let Some(piece) = segment.get(0).and_then(|v| v.as_str()) {
            translation.push_str(piece);
        }
    }

    if translation.trim().is_empty() {
        return Err(TranslationError::ParseFailure(
            "分段重组后译文为空".to_string(),
        ));
    }

    Ok(translation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_segment() {
        let body = r#"[[["There is a leak","Hay una fuga",null,null,10]],null,"es"]"#;
        assert_eq!(parse_segments(body).unwrap(), "There is a leak");
    }

    #[test]
    fn test_parse_concatenates_segments_in_order() {
        let body = r#"[[["There is a leak ","Hay una fuga ",null,null,10],["in the kitchen.","en la cocina.",null,null,10]],null,"es"]"#;
        assert_eq!(
            parse_segments(body).unwrap(),
            "There is a leak in the kitchen."
        );
    }

    #[test]
    fn test_parse_skips_malformed_segments() {
        // 非字符串首元素的分段被跳过，其余照常拼接
        let body = r#"[[["Good morning","Buenos días"],[42],["!","!"]],null,"es"]"#;
        assert_eq!(parse_segments(body).unwrap(), "Good morning!");
    }

    #[test]
    fn test_parse_rejects_non_array_body() {
        assert!(parse_segments(r#"{"error":"quota"}"#).is_err());
        assert!(parse_segments("not json at all").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_reconstruction() {
        assert!(parse_segments(r#"[[],null,"es"]"#).is_err());
        assert!(parse_segments(r#"[[[ " ","Hay" ]],null,"es"]"#).is_err());
    }
}
