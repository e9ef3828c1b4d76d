// 集成测试公共模块
//
// 提供脚本化提供者、服务装配和样例工单等共享工具

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use worklingo::cache::TranslationCache;
use worklingo::config::TranslationConfig;
use worklingo::error::{TranslationError, TranslationResult};
use worklingo::model::MaintenanceRequest;
use worklingo::providers::{ProviderChain, TranslationProvider};
use worklingo::service::TranslationService;

/// 脚本化提供者的行为
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderScript {
    /// 返回固定译文
    Reply(&'static str),
    /// 返回网络错误
    Fail,
    /// 返回空译文
    Empty,
}

/// 记录调用次数的测试提供者
pub struct ScriptedProvider {
    name: &'static str,
    script: ProviderScript,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    pub fn new(name: &'static str, script: ProviderScript) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = Self {
            name,
            script,
            calls: Arc::clone(&calls),
        };
        (provider, calls)
    }
}

#[async_trait]
impl TranslationProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn translate(
        &self,
        _text: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> TranslationResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script {
            ProviderScript::Reply(text) => Ok(text.to_string()),
            ProviderScript::Fail => Err(TranslationError::NetworkFailure(
                "模拟的下游故障".to_string(),
            )),
            ProviderScript::Empty => Ok(String::new()),
        }
    }
}

/// 用脚本化提供者装配翻译服务
///
/// 返回服务、每个提供者的调用计数器和共享的缓存句柄。
pub fn scripted_service(
    scripts: Vec<(&'static str, ProviderScript)>,
) -> (TranslationService, Vec<Arc<AtomicUsize>>, TranslationCache) {
    let mut providers: Vec<Box<dyn TranslationProvider>> = Vec::new();
    let mut counters = Vec::new();

    for (name, script) in scripts {
        let (provider, calls) = ScriptedProvider::new(name, script);
        counters.push(calls);
        providers.push(Box::new(provider));
    }

    let cache = TranslationCache::new();
    let service = TranslationService::with_components(
        TranslationConfig::default(),
        cache.clone(),
        ProviderChain::new(providers),
    );

    (service, counters, cache)
}

/// 一张西语提交的样例工单
pub fn sample_spanish_request() -> MaintenanceRequest {
    let mut request = MaintenanceRequest::new(101, "Ana García", "4B");
    request.selected_language = Some("es".to_string());
    request.work_requested = "Hay una fuga de agua en el baño".to_string();
    request.special_instructions = "Llamar antes de venir".to_string();
    request.permission_to_enter = false;
    request.no_permission_reason = "Perro en casa".to_string();
    request
}

/// 一张英语提交的样例工单
pub fn sample_english_request() -> MaintenanceRequest {
    let mut request = MaintenanceRequest::new(102, "John Doe", "2A");
    request.selected_language = Some("en".to_string());
    request.work_requested = "Leaky faucet in the kitchen".to_string();
    request.special_instructions = "Call before entering".to_string();
    request
}
