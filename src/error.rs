//! 翻译管线统一错误处理
//!
//! 提供结构化错误类型和错误处理机制

use std::fmt;

use thiserror::Error;

/// 翻译错误类型
#[derive(Error, Debug, Clone)]
pub enum TranslationError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 网络错误（连接失败或请求超时）
    #[error("网络错误: {0}")]
    NetworkFailure(String),

    /// 响应解析错误（后端返回了无法解析的结构）
    #[error("解析错误: {0}")]
    ParseFailure(String),

    /// 当前后端无可用翻译
    #[error("无可用翻译: {0}")]
    NoTranslationAvailable(String),

    /// 缓存错误
    #[error("缓存错误: {0}")]
    CacheError(String),

    /// 不支持的语言对
    #[error("不支持的语言对: {0} -> {1}")]
    UnsupportedLanguagePair(String, String),
}

impl TranslationError {
    /// 检查错误是否可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::NetworkFailure(_) => true,
            TranslationError::CacheError(_) => true,
            TranslationError::ParseFailure(_) => false,
            TranslationError::NoTranslationAvailable(_) => false,
            TranslationError::ConfigError(_) => false,
            TranslationError::UnsupportedLanguagePair(_, _) => false,
        }
    }

    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::NetworkFailure(_) => ErrorSeverity::Warning,
            TranslationError::ParseFailure(_) => ErrorSeverity::Warning,
            TranslationError::NoTranslationAvailable(_) => ErrorSeverity::Info,
            TranslationError::CacheError(_) => ErrorSeverity::Warning,
            TranslationError::UnsupportedLanguagePair(_, _) => ErrorSeverity::Info,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::NetworkFailure(_) => ErrorCategory::Network,
            TranslationError::ParseFailure(_) => ErrorCategory::Parsing,
            TranslationError::NoTranslationAvailable(_) => ErrorCategory::Service,
            TranslationError::CacheError(_) => ErrorCategory::Cache,
            TranslationError::UnsupportedLanguagePair(_, _) => ErrorCategory::Input,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        let current_msg = self.to_string();
        let new_msg = format!("{} (上下文: {})", current_msg, context);

        match &mut self {
            TranslationError::ConfigError(ref mut msg) => *msg = new_msg,
            TranslationError::NetworkFailure(ref mut msg) => *msg = new_msg,
            TranslationError::ParseFailure(ref mut msg) => *msg = new_msg,
            TranslationError::NoTranslationAvailable(ref mut msg) => *msg = new_msg,
            TranslationError::CacheError(ref mut msg) => *msg = new_msg,
            TranslationError::UnsupportedLanguagePair(_, _) => {
                return self;
            }
        }

        self
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Parsing,
    Service,
    Cache,
    Input,
}

/// 标准错误转换
impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::NetworkFailure(format!("请求超时: {}", error))
        } else if error.is_connect() {
            TranslationError::NetworkFailure(format!("连接失败: {}", error))
        } else {
            TranslationError::NetworkFailure(format!("请求失败: {}", error))
        }
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::ParseFailure(format!("JSON解析错误: {}", error))
    }
}

impl From<config::ConfigError> for TranslationError {
    fn from(error: config::ConfigError) -> Self {
        TranslationError::ConfigError(format!("配置加载错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<toml::ser::Error> for TranslationError {
    fn from(error: toml::ser::Error) -> Self {
        TranslationError::ConfigError(format!("TOML序列化错误: {}", error))
    }
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::ConfigError(format!("IO错误: {}", error))
    }
}

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 记录并返回错误
    pub fn log_error<T>(error: TranslationError) -> TranslationResult<T> {
        match error.severity() {
            ErrorSeverity::Info => tracing::info!("翻译信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!("翻译警告: {}", error),
            ErrorSeverity::Error => tracing::error!("翻译错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("翻译严重错误: {}", error),
        }

        Err(error)
    }

    /// 创建网络错误
    pub fn network_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::NetworkFailure(msg.to_string())
    }

    /// 创建解析错误
    pub fn parse_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ParseFailure(msg.to_string())
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ConfigError(msg.to_string())
    }

    /// 创建缓存错误
    pub fn cache_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::CacheError(msg.to_string())
    }

    /// 创建无可用翻译错误
    pub fn unavailable_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::NoTranslationAvailable(msg.to_string())
    }
}
