//! # WorkLingo Library
//!
//! 物业维修工单平台的翻译解析管线。租户用母语提交维修请求，
//! 工作人员读到英语译文，双方始终能看到租户的原话。
//!
//! ## 模块组织
//!
//! - `model` - 工单实体与可翻译字段
//! - `config` - 配置加载、校验与热更新
//! - `error` - 统一错误类型与严重级别
//! - `cache` - 以内容指纹为键的 TTL 缓存
//! - `providers` - 翻译后端级联链（主 API、次级 API、静态词典）
//! - `service` - 翻译编排服务
//! - `render` - 面向受众的显示文本选择

pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod providers;
pub mod render;
pub mod service;

// Re-export commonly used items for convenience
pub use cache::*;
pub use config::*;
pub use error::*;
pub use model::*;
pub use providers::*;
pub use render::*;
pub use service::*;
