//! 翻译后端适配层
//!
//! 把"主 API -> 次级 API -> 静态词典"的级联回退表达为有序的
//! 提供者策略列表：链条按优先级逐个尝试，取第一个非空结果。
//! 任何网络或解析异常都被就地捕获并落到下一个提供者，绝不向
//! 调用方传播，翻译失败不允许阻塞工单提交。

mod dictionary;
mod google;
mod libre;

pub use dictionary::DictionaryProvider;
pub use google::GoogleWebProvider;
pub use libre::LibreProvider;

use async_trait::async_trait;

use crate::config::{constants, TranslationConfig};
use crate::error::{TranslationError, TranslationResult};

/// 单次翻译的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationOutcome {
    /// 某个提供者给出了可用译文
    Success,
    /// 所有尝试落空，原文原样返回
    Degraded,
    /// 未能产出任何文本（级联链自身永远不返回这个值，
    /// 它存在于提供者层面的上报与调用方的防御性匹配）
    Failed,
}

/// 适配层的翻译产出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutput {
    pub text: String,
    pub outcome: TranslationOutcome,
}

impl TranslationOutput {
    pub fn success(text: String) -> Self {
        Self {
            text,
            outcome: TranslationOutcome::Success,
        }
    }

    pub fn degraded(text: String) -> Self {
        Self {
            text,
            outcome: TranslationOutcome::Degraded,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == TranslationOutcome::Success
    }

    pub fn is_degraded(&self) -> bool {
        self.outcome == TranslationOutcome::Degraded
    }
}

/// 翻译提供者策略
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// 提供者名称（日志与配置引用）
    fn name(&self) -> &'static str;

    /// 是否支持该语言对
    fn supports(&self, _source_lang: &str, _target_lang: &str) -> bool {
        true
    }

    /// 翻译一段文本；空结果或错误都表示本提供者无产出
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationResult<String>;
}

/// 按优先级排列的提供者级联链
pub struct ProviderChain {
    providers: Vec<Box<dyn TranslationProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Box<dyn TranslationProvider>>) -> Self {
        Self { providers }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// 链上各提供者的名称，按尝试顺序
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// 级联翻译
    ///
    /// 空输入与同语言对直接短路返回，不触发任何网络调用。
    /// 三种尝试全部落空时原文原样返回并标记 Degraded。
    pub async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> TranslationOutput {
        if text.trim().is_empty() {
            return TranslationOutput::success(String::new());
        }

        if source_lang == target_lang {
            return TranslationOutput::success(text.to_string());
        }

        for provider in &self.providers {
            if !provider.supports(source_lang, target_lang) {
                tracing::debug!(
                    "提供者 {} 不支持语言对 {} -> {}，跳过",
                    provider.name(),
                    source_lang,
                    target_lang
                );
                continue;
            }

            match provider.translate(text, source_lang, target_lang).await {
                Ok(result) if !result.trim().is_empty() => {
                    tracing::debug!(
                        "提供者 {} 翻译成功 ({} -> {}, {} 字符)",
                        provider.name(),
                        source_lang,
                        target_lang,
                        result.len()
                    );
                    return TranslationOutput::success(result);
                }
                Ok(_) => {
                    tracing::debug!("提供者 {} 返回空结果，落到下一个", provider.name());
                }
                Err(e) => {
                    tracing::warn!(
                        "提供者 {} 失败 ({} -> {}): {}",
                        provider.name(),
                        source_lang,
                        target_lang,
                        e
                    );
                }
            }
        }

        tracing::warn!(
            "所有翻译尝试落空 ({} -> {})，原文降级返回",
            source_lang,
            target_lang
        );
        TranslationOutput::degraded(text.to_string())
    }
}

/// 按配置的顺序组装提供者级联链
pub fn build_chain(
    config: &TranslationConfig,
    client: &reqwest::Client,
) -> TranslationResult<ProviderChain> {
    let mut providers: Vec<Box<dyn TranslationProvider>> = Vec::new();

    for name in &config.providers {
        match name.as_str() {
            constants::PROVIDER_GOOGLE => providers.push(Box::new(GoogleWebProvider::new(
                client.clone(),
                config.google.endpoint.clone(),
            ))),
            constants::PROVIDER_LIBRE => providers.push(Box::new(LibreProvider::new(
                client.clone(),
                config.libre.endpoint.clone(),
            ))),
            constants::PROVIDER_DICTIONARY => {
                providers.push(Box::new(DictionaryProvider::new()))
            }
            other => {
                return Err(TranslationError::ConfigError(format!(
                    "未知的翻译提供者: {}",
                    other
                )));
            }
        }
    }

    tracing::info!(
        "提供者级联链已组装: {:?}",
        providers.iter().map(|p| p.name()).collect::<Vec<_>>()
    );

    Ok(ProviderChain::new(providers))
}
