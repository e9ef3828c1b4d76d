//! 工单实体与可翻译字段定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 平台的权威语言（工作人员阅读的语言）
pub const ENGLISH_LANG: &str = "en";

/// 规范化租户声明的语言代码
///
/// `None`、空串和任意大小写的 "en" 都视为英语路径，返回 `None`；
/// 其余返回 trim + 小写后的代码。
pub fn normalize_language(raw: Option<&str>) -> Option<String> {
    let lang = raw?.trim().to_lowercase();
    if lang.is_empty() || lang == ENGLISH_LANG {
        None
    } else {
        Some(lang)
    }
}

/// 工单上的三个可翻译字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslatableField {
    WorkRequested,
    SpecialInstructions,
    NoPermissionReason,
}

impl TranslatableField {
    pub const ALL: [TranslatableField; 3] = [
        TranslatableField::WorkRequested,
        TranslatableField::SpecialInstructions,
        TranslatableField::NoPermissionReason,
    ];

    /// 字段名（日志与审计用）
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslatableField::WorkRequested => "work_requested",
            TranslatableField::SpecialInstructions => "special_instructions",
            TranslatableField::NoPermissionReason => "no_permission_reason",
        }
    }
}

impl std::fmt::Display for TranslatableField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个字段的翻译解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTranslation {
    pub original: String,
    pub translated: String,
}

impl FieldTranslation {
    pub fn new(original: impl Into<String>, translated: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translated: translated.into(),
        }
    }

    /// 英语提交：原文即权威文本，不产生翻译
    pub fn untranslated(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            translated: String::new(),
        }
    }
}

/// 工单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Submitted,
    Approved,
    Rejected,
    Closed,
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::Submitted
    }
}

/// 维修工单实体
///
/// 实体本身由数据层持有；翻译管线只读写三组
/// `<字段>_original` / `<字段>_translated` 列和 `selected_language` 标记。
/// 不变式：`selected_language` 为英语（或未设置）时三组列保持空置，
/// 基础字段为权威文本。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub id: u64,

    pub tenant_name: String,
    pub unit: String,

    /// 租户提交表单时声明的语言
    pub selected_language: Option<String>,

    /// 维修内容描述
    pub work_requested: String,
    #[serde(default)]
    pub work_requested_original: String,
    #[serde(default)]
    pub work_requested_translated: String,

    /// 特殊说明
    #[serde(default)]
    pub special_instructions: String,
    #[serde(default)]
    pub special_instructions_original: String,
    #[serde(default)]
    pub special_instructions_translated: String,

    /// 是否允许进入住所
    #[serde(default)]
    pub permission_to_enter: bool,

    /// 不允许进入时的原因说明
    #[serde(default)]
    pub no_permission_reason: String,
    #[serde(default)]
    pub no_permission_reason_original: String,
    #[serde(default)]
    pub no_permission_reason_translated: String,

    #[serde(default)]
    pub status: RequestStatus,

    pub submitted_at: DateTime<Utc>,
}

impl MaintenanceRequest {
    pub fn new(id: u64, tenant_name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            id,
            tenant_name: tenant_name.into(),
            unit: unit.into(),
            submitted_at: Utc::now(),
            permission_to_enter: true,
            ..Default::default()
        }
    }

    /// 提交时声明的非英语语言（英语/未设置返回 None）
    pub fn effective_language(&self) -> Option<String> {
        normalize_language(self.selected_language.as_deref())
    }

    /// 字段的提交原文（基础列）
    pub fn field_text(&self, field: TranslatableField) -> &str {
        match field {
            TranslatableField::WorkRequested => &self.work_requested,
            TranslatableField::SpecialInstructions => &self.special_instructions,
            TranslatableField::NoPermissionReason => &self.no_permission_reason,
        }
    }

    /// 字段的原文快照列
    pub fn field_original(&self, field: TranslatableField) -> &str {
        match field {
            TranslatableField::WorkRequested => &self.work_requested_original,
            TranslatableField::SpecialInstructions => &self.special_instructions_original,
            TranslatableField::NoPermissionReason => &self.no_permission_reason_original,
        }
    }

    /// 字段的译文列
    pub fn field_translated(&self, field: TranslatableField) -> &str {
        match field {
            TranslatableField::WorkRequested => &self.work_requested_translated,
            TranslatableField::SpecialInstructions => &self.special_instructions_translated,
            TranslatableField::NoPermissionReason => &self.no_permission_reason_translated,
        }
    }

    /// 写回一个字段的解析结果
    pub fn set_field_translation(&mut self, field: TranslatableField, value: FieldTranslation) {
        match field {
            TranslatableField::WorkRequested => {
                self.work_requested_original = value.original;
                self.work_requested_translated = value.translated;
            }
            TranslatableField::SpecialInstructions => {
                self.special_instructions_original = value.original;
                self.special_instructions_translated = value.translated;
            }
            TranslatableField::NoPermissionReason => {
                self.no_permission_reason_original = value.original;
                self.no_permission_reason_translated = value.translated;
            }
        }
    }

    /// 字段是否带有非空译文
    pub fn has_translation(&self, field: TranslatableField) -> bool {
        !self.field_translated(field).trim().is_empty()
    }
}
