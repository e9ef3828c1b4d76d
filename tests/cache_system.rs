//! 缓存系统集成测试
//!
//! 验证缓存与解析服务的协作：共享句柄、TTL、统计与并发安全

use std::sync::atomic::Ordering;
use std::time::Duration;

use worklingo::cache::{fingerprint, TranslationCache};
use worklingo::config::TranslationConfig;
use worklingo::providers::{ProviderChain, TranslationProvider};
use worklingo::service::TranslationService;

mod common {
    include!("common/mod.rs");
}

use common::{scripted_service, ProviderScript, ScriptedProvider};

/// 测试解析结果写入共享缓存句柄
#[tokio::test]
async fn test_resolution_populates_shared_cache() {
    let (service, _, cache) = scripted_service(vec![(
        "primary",
        ProviderScript::Reply("there is a leak"),
    )]);

    service.resolve_field("hay una fuga", Some("es")).await;

    let key = fingerprint("hay una fuga", "es", "en");
    assert!(cache.contains_key(&key), "resolved text must be cached");
    assert_eq!(cache.get(&key), Some("there is a leak".to_string()));

    println!("✅ Shared cache handle test passed");
}

/// 测试停用缓存后每次解析都落到后端
#[tokio::test]
async fn test_cache_disabled_bypasses_storage() {
    let (provider, counter) = ScriptedProvider::new("primary", ProviderScript::Reply("hello"));
    let chain = ProviderChain::new(vec![
        Box::new(provider) as Box<dyn TranslationProvider>
    ]);

    let mut config = TranslationConfig::default();
    config.cache.enabled = false;

    let cache = TranslationCache::new();
    let service = TranslationService::with_components(config, cache.clone(), chain);

    service.resolve_field("hola", Some("es")).await;
    service.resolve_field("hola", Some("es")).await;

    assert_eq!(
        counter.load(Ordering::SeqCst),
        2,
        "disabled cache means every resolution hits the backend"
    );
    assert!(cache.is_empty());

    println!("✅ Disabled cache bypass test passed");
}

/// 测试缓存条目按配置的 TTL 过期后重新计算
#[tokio::test]
async fn test_cache_entry_expires_through_service() {
    let (provider, counter) = ScriptedProvider::new("primary", ProviderScript::Reply("hello"));
    let chain = ProviderChain::new(vec![
        Box::new(provider) as Box<dyn TranslationProvider>
    ]);

    let mut config = TranslationConfig::default();
    config.cache.ttl_secs = 1;

    let service =
        TranslationService::with_components(config, TranslationCache::new(), chain);

    service.resolve_field("hola", Some("es")).await;
    tokio::time::sleep(Duration::from_millis(1100)).await;
    service.resolve_field("hola", Some("es")).await;

    assert_eq!(
        counter.load(Ordering::SeqCst),
        2,
        "expired entry must be recomputed"
    );

    println!("✅ TTL expiry test passed");
}

/// 测试清扫接口上报移除数量
#[tokio::test]
async fn test_cleanup_cache_reports_removals() {
    let (service, _, cache) =
        scripted_service(vec![("primary", ProviderScript::Reply("unused"))]);

    cache.put(
        &fingerprint("uno", "es", "en"),
        "one",
        Duration::from_millis(1),
    );
    cache.put(
        &fingerprint("dos", "es", "en"),
        "two",
        Duration::from_millis(1),
    );
    cache.put(
        &fingerprint("tres", "es", "en"),
        "three",
        Duration::from_secs(3600),
    );

    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(service.cleanup_cache(), 2);
    assert_eq!(cache.len(), 1);

    println!("✅ Cache cleanup test passed");
}

/// 测试通过服务观察缓存统计
#[tokio::test]
async fn test_cache_stats_through_service() {
    let (service, _, _) =
        scripted_service(vec![("primary", ProviderScript::Reply("translated"))]);

    service.resolve_field("primer texto", Some("es")).await;
    service.resolve_field("primer texto", Some("es")).await;
    service.resolve_field("segundo texto", Some("es")).await;

    let stats = service.cache_stats();
    assert_eq!(stats.total_requests, 3);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(stats.cache_misses, 2);
    assert_eq!(stats.total_entries, 2);
    assert!((stats.hit_rate() - 1.0 / 3.0).abs() < 1e-9);

    println!("✅ Cache stats test passed");
}

/// 测试失败结果不产生负缓存，后端恢复后立即生效
#[tokio::test]
async fn test_failure_leaves_no_negative_cache() {
    let cache = TranslationCache::new();

    let (broken, _) = ScriptedProvider::new("primary", ProviderScript::Fail);
    let degraded_service = TranslationService::with_components(
        TranslationConfig::default(),
        cache.clone(),
        ProviderChain::new(vec![Box::new(broken) as Box<dyn TranslationProvider>]),
    );

    let resolved = degraded_service.resolve_field("hola", Some("es")).await;
    assert_eq!(resolved.translated, "");
    assert!(cache.is_empty(), "failures must not be cached");

    // 后端恢复：同一份缓存上的新服务立刻拿到真实译文
    let (recovered, counter) = ScriptedProvider::new("primary", ProviderScript::Reply("hello"));
    let healthy_service = TranslationService::with_components(
        TranslationConfig::default(),
        cache.clone(),
        ProviderChain::new(vec![Box::new(recovered) as Box<dyn TranslationProvider>]),
    );

    let resolved = healthy_service.resolve_field("hola", Some("es")).await;
    assert_eq!(resolved.translated, "hello");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);

    println!("✅ No negative caching test passed");
}

/// 测试多任务并发读写缓存
#[tokio::test]
async fn test_concurrent_cache_access() {
    let cache = TranslationCache::new();

    let mut handles = Vec::new();
    for i in 0..32 {
        let handle = cache.clone();
        handles.push(tokio::spawn(async move {
            let key = fingerprint(&format!("texto {}", i % 8), "es", "en");
            handle.put(&key, &format!("text {}", i % 8), Duration::from_secs(3600));
            handle.get(&key)
        }));
    }

    for handle in handles {
        let value = handle.await.expect("cache task should complete");
        assert!(value.is_some(), "value written by the task must be readable");
    }

    assert_eq!(cache.len(), 8);

    println!("✅ Concurrent cache access test passed");
}
