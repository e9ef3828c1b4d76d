//! 翻译管线配置管理模块
//!
//! 提供配置加载、验证和热重载功能，支持多种配置源。
//! 平台设置（公司名称、邮件主题等）以显式结构体承载，
//! 每个可选字段都有具名默认值。

use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{TranslationError, TranslationResult};

/// 翻译配置常量
pub mod constants {
    /// 主翻译后端（公共 Web 端点，无需 API Key）
    pub const DEFAULT_GOOGLE_ENDPOINT: &str =
        "https://translate.googleapis.com/translate_a/single";

    /// 次级翻译后端（LibreTranslate 风格 REST 端点）
    pub const DEFAULT_LIBRE_ENDPOINT: &str = "https://libretranslate.com/translate";

    /// 工单平台的目标语言
    pub const DEFAULT_TARGET_LANG: &str = "en";

    /// 缓存条目有效期：一天
    pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;

    /// 单次后端请求的硬超时上限，保证提交延迟有界
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 3;
    pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// 公共端点要求浏览器形态的 User-Agent
    pub const DEFAULT_USER_AGENT: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/119.0";

    /// 提供者名称
    pub const PROVIDER_GOOGLE: &str = "google";
    pub const PROVIDER_LIBRE: &str = "libre";
    pub const PROVIDER_DICTIONARY: &str = "dictionary";

    /// 默认的级联顺序：主后端 -> 次级后端 -> 静态词典
    pub const DEFAULT_PROVIDER_ORDER: &[&str] =
        &[PROVIDER_GOOGLE, PROVIDER_LIBRE, PROVIDER_DICTIONARY];

    /// 配置文件搜索路径（按优先级）
    pub const CONFIG_PATHS: &[&str] = &[
        "worklingo.toml",
        "translation-config.toml",
        ".worklingo.toml",
        "~/.config/worklingo/translation.toml",
        "/etc/worklingo/translation.toml",
    ];

    /// 环境变量前缀
    pub const ENV_PREFIX: &str = "WORKLINGO_TRANSLATION";

    // 平台设置默认值
    pub const DEFAULT_COMPANY_NAME: &str = "Oakline Property Management";
    pub const DEFAULT_SUPPORT_EMAIL: &str = "support@oakline.example";
    pub const DEFAULT_MAIL_FROM: &str = "no-reply@oakline.example";
    pub const DEFAULT_ADMIN_SUBJECT: &str = "New maintenance request";
    pub const DEFAULT_TENANT_SUBJECT: &str = "We received your maintenance request";
}

fn default_enabled() -> bool {
    true
}

fn default_target_lang() -> String {
    constants::DEFAULT_TARGET_LANG.to_string()
}

fn default_provider_order() -> Vec<String> {
    constants::DEFAULT_PROVIDER_ORDER
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_google_endpoint() -> String {
    constants::DEFAULT_GOOGLE_ENDPOINT.to_string()
}

fn default_libre_endpoint() -> String {
    constants::DEFAULT_LIBRE_ENDPOINT.to_string()
}

fn default_request_timeout_secs() -> u64 {
    constants::DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    constants::DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    constants::DEFAULT_USER_AGENT.to_string()
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl_secs() -> u64 {
    constants::DEFAULT_CACHE_TTL_SECS
}

fn default_company_name() -> String {
    constants::DEFAULT_COMPANY_NAME.to_string()
}

fn default_support_email() -> String {
    constants::DEFAULT_SUPPORT_EMAIL.to_string()
}

fn default_mail_from() -> String {
    constants::DEFAULT_MAIL_FROM.to_string()
}

fn default_admin_subject() -> String {
    constants::DEFAULT_ADMIN_SUBJECT.to_string()
}

fn default_tenant_subject() -> String {
    constants::DEFAULT_TENANT_SUBJECT.to_string()
}

/// 翻译管线配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// 是否启用翻译功能
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 翻译目标语言（工作人员阅读的语言）
    #[serde(default = "default_target_lang")]
    pub target_lang: String,

    /// 提供者级联顺序
    #[serde(default = "default_provider_order")]
    pub providers: Vec<String>,

    /// 主后端配置
    #[serde(default)]
    pub google: GoogleConfig,

    /// 次级后端配置
    #[serde(default)]
    pub libre: LibreConfig,

    /// HTTP 客户端配置
    #[serde(default)]
    pub http: HttpConfig,

    /// 缓存配置
    #[serde(default)]
    pub cache: CacheSettings,

    /// 平台设置（渲染消费方使用）
    #[serde(default)]
    pub platform: PlatformSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    #[serde(default = "default_google_endpoint")]
    pub endpoint: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            endpoint: default_google_endpoint(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibreConfig {
    #[serde(default = "default_libre_endpoint")]
    pub endpoint: String,
}

impl Default for LibreConfig {
    fn default() -> Self {
        Self {
            endpoint: default_libre_endpoint(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// 单次请求的硬超时（秒）
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// 连接建立超时（秒）
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// 缓存条目有效期（秒），到期后由调用方重新计算
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

/// 平台设置
///
/// 取代前代系统中"单行设置表 + 动态属性访问"的读取方式：
/// 所有可选字段都有具名默认值，缺失字段不会在模板渲染时炸出空值。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSettings {
    #[serde(default = "default_company_name")]
    pub company_name: String,

    #[serde(default = "default_support_email")]
    pub support_email: String,

    #[serde(default = "default_mail_from")]
    pub mail_from: String,

    /// 管理员通知邮件主题
    #[serde(default = "default_admin_subject")]
    pub admin_request_subject: String,

    /// 租户确认邮件主题
    #[serde(default = "default_tenant_subject")]
    pub tenant_confirmation_subject: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            company_name: default_company_name(),
            support_email: default_support_email(),
            mail_from: default_mail_from(),
            admin_request_subject: default_admin_subject(),
            tenant_confirmation_subject: default_tenant_subject(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            target_lang: default_target_lang(),
            providers: default_provider_order(),
            google: GoogleConfig::default(),
            libre: LibreConfig::default(),
            http: HttpConfig::default(),
            cache: CacheSettings::default(),
            platform: PlatformSettings::default(),
        }
    }
}

impl TranslationConfig {
    /// 缓存有效期
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    /// 单次请求超时
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_secs)
    }

    /// 连接超时
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http.connect_timeout_secs)
    }

    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        let lang = self.target_lang.trim();
        if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(TranslationError::ConfigError(format!(
                "目标语言必须是两位 ISO 639-1 代码: {:?}",
                self.target_lang
            )));
        }

        if self.providers.is_empty() {
            return Err(TranslationError::ConfigError(
                "提供者列表不能为空".to_string(),
            ));
        }

        for name in &self.providers {
            match name.as_str() {
                constants::PROVIDER_GOOGLE
                | constants::PROVIDER_LIBRE
                | constants::PROVIDER_DICTIONARY => {}
                other => {
                    return Err(TranslationError::ConfigError(format!(
                        "未知的翻译提供者: {}",
                        other
                    )));
                }
            }
        }

        for (label, endpoint) in [
            ("google", &self.google.endpoint),
            ("libre", &self.libre.endpoint),
        ] {
            let parsed = url::Url::parse(endpoint).map_err(|e| {
                TranslationError::ConfigError(format!("{} 端点无效: {}", label, e))
            })?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(TranslationError::ConfigError(format!(
                    "{} 端点必须是 http/https: {}",
                    label, endpoint
                )));
            }
        }

        if self.http.request_timeout_secs == 0
            || self.http.request_timeout_secs > constants::MAX_REQUEST_TIMEOUT_SECS
        {
            return Err(TranslationError::ConfigError(format!(
                "请求超时必须在 1-{} 秒之间",
                constants::MAX_REQUEST_TIMEOUT_SECS
            )));
        }

        if self.http.connect_timeout_secs == 0 {
            return Err(TranslationError::ConfigError(
                "连接超时不能为0".to_string(),
            ));
        }

        if self.cache.enabled && self.cache.ttl_secs == 0 {
            return Err(TranslationError::ConfigError(
                "启用缓存时有效期不能为0".to_string(),
            ));
        }

        if self.platform.company_name.trim().is_empty() {
            return Err(TranslationError::ConfigError(
                "公司名称不能为空".to_string(),
            ));
        }

        Ok(())
    }
}

/// 配置管理器
pub struct ConfigManager {
    config: Arc<RwLock<TranslationConfig>>,
    last_modified: Arc<RwLock<Option<SystemTime>>>,
    config_path: Option<String>,
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new() -> TranslationResult<Self> {
        let (config, config_path) = Self::load_config()?;

        let manager = Self {
            config: Arc::new(RwLock::new(config)),
            last_modified: Arc::new(RwLock::new(None)),
            config_path,
        };

        manager.update_last_modified()?;

        Ok(manager)
    }

    /// 获取当前配置（每次请求克隆一份，调用方持有快照）
    pub fn get_config(&self) -> TranslationResult<TranslationConfig> {
        self.config
            .read()
            .map_err(|e| TranslationError::ConfigError(format!("读取配置失败: {}", e)))
            .map(|config| config.clone())
    }

    /// 检查并重新加载配置（如果文件有更改）
    pub fn reload_if_changed(&self) -> TranslationResult<bool> {
        if let Some(ref path) = self.config_path {
            let metadata = std::fs::metadata(path).map_err(|e| {
                TranslationError::ConfigError(format!("无法读取配置文件元数据: {}", e))
            })?;

            let modified = metadata.modified().map_err(|e| {
                TranslationError::ConfigError(format!("无法获取文件修改时间: {}", e))
            })?;

            let last_modified = self
                .last_modified
                .read()
                .map_err(|e| TranslationError::ConfigError(format!("读取锁失败: {}", e)))?;

            if last_modified.map_or(true, |last| modified > last) {
                drop(last_modified);

                let (new_config, _) = Self::load_config()?;

                *self
                    .config
                    .write()
                    .map_err(|e| TranslationError::ConfigError(format!("写入锁失败: {}", e)))? =
                    new_config;

                self.update_last_modified()?;

                tracing::info!("配置文件已重新加载: {}", path);
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// 加载翻译配置
    fn load_config() -> TranslationResult<(TranslationConfig, Option<String>)> {
        // 首先尝试加载 .env 文件
        Self::load_dotenv();

        let mut builder = Config::builder();

        // 添加默认配置
        builder = builder.add_source(
            Config::try_from(&TranslationConfig::default())
                .map_err(|e| TranslationError::ConfigError(format!("默认配置错误: {}", e)))?,
        );

        // 查找并加载配置文件
        let mut config_path = None;
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                builder = builder.add_source(File::with_name(&expanded_path));
                config_path = Some(expanded_path.to_string());
                tracing::info!("加载配置文件: {}", expanded_path);
                break;
            }
        }

        // 添加环境变量覆盖（启用类型转换）
        builder = builder.add_source(
            Environment::with_prefix(constants::ENV_PREFIX)
                .prefix_separator("_")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("构建配置失败: {}", e)))?;

        let mut translation_config: TranslationConfig = config
            .try_deserialize()
            .map_err(|e| TranslationError::ConfigError(format!("反序列化配置失败: {}", e)))?;

        // 手动处理多段字段名的环境变量覆盖
        Self::apply_env_overrides(&mut translation_config);

        translation_config.validate()?;

        Ok((translation_config, config_path))
    }

    /// 手动应用环境变量覆盖
    ///
    /// Environment 源以 "_" 作为层级分隔符，无法表达 target_lang
    /// 这类本身含下划线的字段名，这里逐个补齐。
    fn apply_env_overrides(config: &mut TranslationConfig) {
        if let Ok(val) = std::env::var("WORKLINGO_TRANSLATION_ENABLED") {
            if let Ok(enabled) = val.parse::<bool>() {
                config.enabled = enabled;
            }
        }

        if let Ok(val) = std::env::var("WORKLINGO_TRANSLATION_TARGET_LANG") {
            config.target_lang = val;
        }

        if let Ok(val) = std::env::var("WORKLINGO_TRANSLATION_PROVIDER_ORDER") {
            let providers: Vec<String> = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !providers.is_empty() {
                config.providers = providers;
            }
        }

        if let Ok(val) = std::env::var("WORKLINGO_TRANSLATION_GOOGLE_ENDPOINT") {
            config.google.endpoint = val;
            tracing::info!("环境变量覆盖主后端端点: {}", config.google.endpoint);
        }

        if let Ok(val) = std::env::var("WORKLINGO_TRANSLATION_LIBRE_ENDPOINT") {
            config.libre.endpoint = val;
            tracing::info!("环境变量覆盖次级后端端点: {}", config.libre.endpoint);
        }

        if let Ok(val) = std::env::var("WORKLINGO_TRANSLATION_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse::<u64>() {
                config.http.request_timeout_secs = secs;
            }
        }

        if let Ok(val) = std::env::var("WORKLINGO_TRANSLATION_CACHE_TTL_SECS") {
            if let Ok(secs) = val.parse::<u64>() {
                config.cache.ttl_secs = secs;
            }
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        // 按优先级加载 .env 文件
        let env_files = [
            ".env.local",       // 本地环境，最高优先级
            ".env.development", // 开发环境
            ".env.production",  // 生产环境
            ".env",             // 默认 .env 文件
        ];

        for env_file in &env_files {
            if Path::new(env_file).exists() {
                match dotenv::from_filename(env_file) {
                    Ok(_) => {
                        tracing::info!("已加载环境变量文件: {}", env_file);
                        break;
                    }
                    Err(e) => {
                        tracing::warn!("无法加载环境变量文件 {}: {}", env_file, e);
                    }
                }
            }
        }

        if !env_files.iter().any(|f| Path::new(f).exists()) {
            if let Err(e) = dotenv::dotenv() {
                tracing::debug!("未找到 .env 文件或加载失败: {}", e);
            }
        }
    }

    /// 更新最后修改时间
    fn update_last_modified(&self) -> TranslationResult<()> {
        if let Some(ref path) = self.config_path {
            let metadata = std::fs::metadata(path).map_err(|e| {
                TranslationError::ConfigError(format!("无法读取配置文件元数据: {}", e))
            })?;

            let modified = metadata.modified().map_err(|e| {
                TranslationError::ConfigError(format!("无法获取文件修改时间: {}", e))
            })?;

            *self
                .last_modified
                .write()
                .map_err(|e| TranslationError::ConfigError(format!("写入锁失败: {}", e)))? =
                Some(modified);
        }

        Ok(())
    }

    /// 生成带注释的示例配置文件
    pub fn generate_example_config<P: AsRef<Path>>(path: P) -> TranslationResult<()> {
        let example = TranslationConfig::default();
        let toml_string = toml::to_string_pretty(&example)?;

        let content = format!(
            "# worklingo 翻译管线配置示例\n\
             # 所有字段均可省略，省略时使用默认值。\n\
             # 环境变量覆盖使用 {} 前缀。\n\n{}",
            constants::ENV_PREFIX,
            toml_string
        );

        std::fs::write(path.as_ref(), content)?;
        tracing::info!("示例配置已写入: {}", path.as_ref().display());

        Ok(())
    }
}

/// 检查配置文件是否存在
pub fn config_file_exists() -> bool {
    constants::CONFIG_PATHS
        .iter()
        .any(|path| Path::new(shellexpand::tilde(path).as_ref()).exists())
}
