//! 翻译结果缓存模块
//!
//! 以内容指纹为键的记忆化层，挡在翻译后端前面避免重复网络调用。
//! 策略为纯 TTL：窗口内不限容量，过期由读取或清扫移除，写入为
//! 后写覆盖。失败的翻译永远不会写入（无负缓存）。

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

// ============================================================================
// 指纹
// ============================================================================

/// 生成缓存指纹键
///
/// 对 (文本, 源语言, 目标语言) 做 blake3 散列，字段间插入分隔字节
/// 避免拼接歧义；相同输入无论调用顺序总是命中同一条目。
pub fn fingerprint(text: &str, source_lang: &str, target_lang: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(text.as_bytes());
    hasher.update(&[0x1f]);
    hasher.update(source_lang.as_bytes());
    hasher.update(&[0x1f]);
    hasher.update(target_lang.as_bytes());
    format!("translation_{}", hasher.finalize().to_hex())
}

// ============================================================================
// 核心类型
// ============================================================================

/// 缓存条目
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub translated_text: String,
    pub created_at: Instant,
    pub ttl: Duration,
    pub access_count: u64,
    pub last_accessed: Instant,
}

impl CacheEntry {
    pub fn new(translated_text: String, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            translated_text,
            created_at: now,
            ttl,
            access_count: 0,
            last_accessed: now,
        }
    }

    /// 更新访问信息
    pub fn access(&mut self) {
        self.access_count += 1;
        self.last_accessed = Instant::now();
    }

    /// 检查条目是否过期
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

/// 缓存统计信息
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub total_requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub total_entries: usize,
    pub expirations: u64,
}

impl CacheStats {
    /// 计算缓存命中率
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64
        }
    }

    /// 计算缓存未命中率
    pub fn miss_rate(&self) -> f64 {
        1.0 - self.hit_rate()
    }

    /// 重置统计信息
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 翻译缓存
///
/// 锁中毒不会让提交流程停摆：读侧按未命中处理，写侧丢弃本次写入，
/// 两侧都只留一条告警。
pub struct TranslationCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    stats: Arc<RwLock<CacheStats>>,
}

// ============================================================================
// 实现
// ============================================================================

impl TranslationCache {
    /// 创建新的翻译缓存
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            stats: Arc::new(RwLock::new(CacheStats::default())),
        }
    }

    /// 获取缓存条目，过期条目当场移除
    pub fn get(&self, fingerprint: &str) -> Option<String> {
        if let Ok(mut stats) = self.stats.write() {
            stats.total_requests += 1;
        }

        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("缓存读取锁中毒，按未命中处理: {}", e);
                return None;
            }
        };

        if let Some(entry) = entries.get_mut(fingerprint) {
            if !entry.is_expired() {
                entry.access();
                if let Ok(mut stats) = self.stats.write() {
                    stats.cache_hits += 1;
                }
                return Some(entry.translated_text.clone());
            }

            // 删除过期条目
            entries.remove(fingerprint);
            if let Ok(mut stats) = self.stats.write() {
                stats.expirations += 1;
            }
        }

        if let Ok(mut stats) = self.stats.write() {
            stats.cache_misses += 1;
        }
        None
    }

    /// 插入缓存条目，后写覆盖
    pub fn put(&self, fingerprint: &str, value: &str, ttl: Duration) {
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("缓存写入锁中毒，丢弃本次写入: {}", e);
                return;
            }
        };

        entries.insert(
            fingerprint.to_string(),
            CacheEntry::new(value.to_string(), ttl),
        );

        let total = entries.len();
        drop(entries);

        if let Ok(mut stats) = self.stats.write() {
            stats.total_entries = total;
        }
    }

    /// 清空缓存
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
        if let Ok(mut stats) = self.stats.write() {
            stats.total_entries = 0;
        }
    }

    /// 清理过期条目，返回移除数量
    pub fn cleanup_expired(&self) -> usize {
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("缓存清扫锁中毒，跳过本轮清理: {}", e);
                return 0;
            }
        };

        let initial_size = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let removed = initial_size - entries.len();
        let total = entries.len();
        drop(entries);

        if let Ok(mut stats) = self.stats.write() {
            stats.total_entries = total;
            stats.expirations += removed as u64;
        }

        removed
    }

    /// 获取统计信息
    pub fn get_stats(&self) -> CacheStats {
        let mut result = self
            .stats
            .read()
            .map(|stats| stats.clone())
            .unwrap_or_default();

        if let Ok(entries) = self.entries.read() {
            result.total_entries = entries.len();
        }
        result
    }

    /// 获取缓存命中率
    pub fn hit_rate(&self) -> f64 {
        self.get_stats().hit_rate()
    }

    /// 获取缓存大小
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 检查是否包含未过期的指定键
    pub fn contains_key(&self, fingerprint: &str) -> bool {
        self.entries
            .read()
            .map(|entries| {
                entries
                    .get(fingerprint)
                    .map(|entry| !entry.is_expired())
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    }

    /// 重置统计信息
    pub fn reset_stats(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.reset();
        }
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            stats: Arc::clone(&self.stats),
        }
    }
}
