//! 翻译编排服务
//!
//! 工单翻译的主入口，协调语言判定、缓存与后端级联链：
//!
//! 1. 语言判定：英语或未声明语言的提交直接跳过，基础字段即权威文本
//! 2. 缓存查询：以内容指纹为键，命中即返回，不触发网络调用
//! 3. 级联翻译：按配置顺序尝试各提供者，全部落空时降级保留原文
//! 4. 缓存回写：仅成功译文写入，降级结果不产生负缓存
//!
//! 三个可翻译字段相互独立解析，单个字段的降级不影响其余字段。
//!
//! ## 线程安全
//!
//! 统计信息使用原子操作，缓存内部自带锁，服务可通过 `&self`
//! 在多任务间共享。

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;

use crate::cache::{fingerprint, CacheStats, TranslationCache};
use crate::config::TranslationConfig;
use crate::error::TranslationResult;
use crate::model::{normalize_language, FieldTranslation, MaintenanceRequest, TranslatableField};
use crate::providers::{build_chain, ProviderChain, TranslationOutcome};

/// 统一的翻译服务
///
/// 持有配置、缓存和提供者级联链。实例化后内部组件不再更换；
/// 配置热更新由调用方通过 `ConfigManager` 检测并重建服务。
pub struct TranslationService {
    config: TranslationConfig,
    cache: TranslationCache,
    chain: ProviderChain,
    stats: ServiceStats,
}

impl TranslationService {
    /// 创建新的翻译服务实例
    ///
    /// 校验配置、构建 HTTP 客户端并按配置顺序组装提供者级联链。
    pub fn new(config: TranslationConfig) -> TranslationResult<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(&config.http.user_agent)
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        let chain = build_chain(&config, &client)?;

        Ok(Self {
            config,
            cache: TranslationCache::new(),
            chain,
            stats: ServiceStats::default(),
        })
    }

    /// 使用默认配置创建翻译服务
    pub fn create_default() -> TranslationResult<Self> {
        Self::new(TranslationConfig::default())
    }

    /// 从现成组件装配服务
    ///
    /// 测试与自定义装配用，调用方负责传入已验证的配置。
    pub fn with_components(
        config: TranslationConfig,
        cache: TranslationCache,
        chain: ProviderChain,
    ) -> Self {
        Self {
            config,
            cache,
            chain,
            stats: ServiceStats::default(),
        }
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    /// 链上各提供者名称，按尝试顺序
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.chain.provider_names()
    }

    /// 解析单个字段的翻译
    ///
    /// 英语（或未声明语言）的提交、空白文本以及翻译功能关闭时
    /// 直接返回未翻译结果。其余路径先查缓存，未命中时走级联链，
    /// 成功译文按配置的 TTL 回写缓存；降级结果保留原文、译文列
    /// 留空且不写缓存，工单重新提交时会再次尝试。
    pub async fn resolve_field(
        &self,
        text: &str,
        declared_language: Option<&str>,
    ) -> FieldTranslation {
        let Some(source_lang) = normalize_language(declared_language) else {
            return FieldTranslation::untranslated(text);
        };

        if text.trim().is_empty() {
            return FieldTranslation::untranslated(text);
        }

        if !self.config.enabled {
            tracing::debug!("翻译功能已关闭，字段保持原文");
            return FieldTranslation::untranslated(text);
        }

        self.stats.inc_fields_resolved();

        let target_lang = &self.config.target_lang;
        let key = fingerprint(text, &source_lang, target_lang);

        if self.config.cache.enabled {
            if let Some(cached) = self.cache.get(&key) {
                self.stats.inc_cache_hits();
                return FieldTranslation::new(text, cached);
            }
            self.stats.inc_cache_misses();
        }

        let output = self.chain.translate(text, &source_lang, target_lang).await;

        match output.outcome {
            TranslationOutcome::Success => {
                self.stats.inc_provider_successes();
                if self.config.cache.enabled && !output.text.is_empty() {
                    self.cache.put(&key, &output.text, self.config.cache_ttl());
                }
                FieldTranslation::new(text, output.text)
            }
            TranslationOutcome::Degraded | TranslationOutcome::Failed => {
                self.stats.inc_degraded_results();
                tracing::debug!(
                    "字段翻译降级 ({} -> {})，原文保留、译文列留空",
                    source_lang,
                    target_lang
                );
                FieldTranslation::new(text, String::new())
            }
        }
    }

    /// 解析整张工单的可翻译字段
    ///
    /// 英语提交不写任何翻译列。非英语提交时三个字段并发解析，
    /// 解析结果逐字段写回工单实体。
    pub async fn translate_request(&self, request: &mut MaintenanceRequest) {
        let Some(lang) = request.effective_language() else {
            tracing::debug!("工单 #{} 为基准语言提交，翻译列保持空置", request.id);
            return;
        };

        let work = request.work_requested.clone();
        let instructions = request.special_instructions.clone();
        let reason = request.no_permission_reason.clone();

        let (work, instructions, reason) = futures::join!(
            self.resolve_field(&work, Some(&lang)),
            self.resolve_field(&instructions, Some(&lang)),
            self.resolve_field(&reason, Some(&lang)),
        );

        if self.config.enabled {
            for (field, resolved) in [
                (TranslatableField::WorkRequested, &work),
                (TranslatableField::SpecialInstructions, &instructions),
                (TranslatableField::NoPermissionReason, &reason),
            ] {
                if !resolved.original.trim().is_empty() && resolved.translated.is_empty() {
                    tracing::warn!(
                        "工单 #{} 字段 {} 翻译降级 ({} -> {})",
                        request.id,
                        field.as_str(),
                        lang,
                        self.config.target_lang
                    );
                }
            }
        }

        request.set_field_translation(TranslatableField::WorkRequested, work);
        request.set_field_translation(TranslatableField::SpecialInstructions, instructions);
        request.set_field_translation(TranslatableField::NoPermissionReason, reason);

        tracing::info!(
            "工单 #{} 字段翻译解析完成 ({} -> {})",
            request.id,
            lang,
            self.config.target_lang
        );
    }

    /// 清理过期缓存条目，返回移除数量
    pub fn cleanup_cache(&self) -> usize {
        self.cache.cleanup_expired()
    }

    /// 缓存统计快照
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.get_stats()
    }

    /// 获取服务统计信息
    pub fn get_stats(&self) -> &ServiceStats {
        &self.stats
    }

    /// 健康检查
    ///
    /// 逐组件给出健康级别并汇总整体状态：任一组件不健康即整体
    /// 不健康，全部健康才算健康，其余为降级。
    pub fn health_check(&self) -> HealthStatus {
        let mut components = HashMap::new();

        components.insert(
            "config".to_string(),
            if self.config.validate().is_ok() {
                HealthLevel::Healthy
            } else {
                HealthLevel::Unhealthy
            },
        );

        // 缓存关闭时服务仍可用，但每次解析都要走网络
        let cache_level = if !self.config.cache.enabled {
            HealthLevel::Degraded
        } else {
            let stats = self.cache.get_stats();
            if stats.total_requests > 100 && stats.hit_rate() < 0.1 {
                HealthLevel::Degraded
            } else {
                HealthLevel::Healthy
            }
        };
        components.insert("cache".to_string(), cache_level);

        components.insert(
            "providers".to_string(),
            if self.chain.is_empty() {
                HealthLevel::Unhealthy
            } else {
                HealthLevel::Healthy
            },
        );

        let overall = if components
            .values()
            .any(|level| *level == HealthLevel::Unhealthy)
        {
            HealthLevel::Unhealthy
        } else if components
            .values()
            .all(|level| *level == HealthLevel::Healthy)
        {
            HealthLevel::Healthy
        } else {
            HealthLevel::Degraded
        };

        HealthStatus {
            overall,
            components,
        }
    }
}

/// 翻译服务统计信息（线程安全）
///
/// 所有计数器使用原子操作，适合在并发解析中无锁更新。
#[derive(Debug, Default)]
pub struct ServiceStats {
    /// 实际进入解析流程的字段数（短路路径不计）
    pub fields_resolved: AtomicUsize,

    /// 缓存命中次数
    pub cache_hits: AtomicUsize,

    /// 缓存未命中次数
    pub cache_misses: AtomicUsize,

    /// 级联链成功产出译文的次数
    pub provider_successes: AtomicUsize,

    /// 降级返回原文的次数
    pub degraded_results: AtomicUsize,
}

impl ServiceStats {
    pub fn inc_fields_resolved(&self) {
        self.fields_resolved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cache_hits(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_cache_misses(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_provider_successes(&self) {
        self.provider_successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_degraded_results(&self) {
        self.degraded_results.fetch_add(1, Ordering::Relaxed);
    }

    /// 获取统计数据的一致性快照
    pub fn snapshot(&self) -> ServiceStatsSnapshot {
        ServiceStatsSnapshot {
            fields_resolved: self.fields_resolved.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            provider_successes: self.provider_successes.load(Ordering::Relaxed),
            degraded_results: self.degraded_results.load(Ordering::Relaxed),
        }
    }
}

/// 统计数据的不可变快照，适合展示与日志
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ServiceStatsSnapshot {
    pub fields_resolved: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub provider_successes: usize,
    pub degraded_results: usize,
}

/// 健康状态报告
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub overall: HealthLevel,
    pub components: HashMap<String, HealthLevel>,
}

/// 健康级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthLevel {
    Healthy,
    Degraded,
    Unhealthy,
}
