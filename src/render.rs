//! 展示文本选择
//!
//! 工单字段在各渲染面（邮件、管理列表、详情页）上显示哪一列，
//! 由这里的单一优先级策略决定，所有调用方共用同一规则：
//!
//! 1. 英语（或未声明语言）提交：基础字段即权威文本，直接显示
//! 2. 非英语提交、面向工作人员：译文列 -> 原文列 -> 基础字段
//! 3. 非英语提交、面向租户本人：原文列 -> 基础字段
//!
//! 空白列视为缺失，逐级回退。管线上线前的历史工单两列皆空，
//! 自然落回基础字段。选择函数为纯函数，不做任何 IO。

use crate::model::{MaintenanceRequest, TranslatableField};

/// 渲染面的受众
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerContext {
    /// 租户本人（确认邮件、租户详情页）
    Tenant,
    /// 工作人员（管理通知、管理列表）
    Admin,
}

impl ViewerContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerContext::Tenant => "tenant",
            ViewerContext::Admin => "admin",
        }
    }
}

impl std::fmt::Display for ViewerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ViewerContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tenant" => Ok(ViewerContext::Tenant),
            "admin" => Ok(ViewerContext::Admin),
            other => Err(format!("未知的受众: {} (可选 tenant/admin)", other)),
        }
    }
}

/// 选出一个字段面向指定受众的显示文本
pub fn select_display_text<'a>(
    request: &'a MaintenanceRequest,
    field: TranslatableField,
    viewer: ViewerContext,
) -> &'a str {
    if request.effective_language().is_none() {
        return request.field_text(field);
    }

    let original = request.field_original(field);

    match viewer {
        ViewerContext::Admin => {
            let translated = request.field_translated(field);
            if !translated.trim().is_empty() {
                translated
            } else if !original.trim().is_empty() {
                original
            } else {
                request.field_text(field)
            }
        }
        ViewerContext::Tenant => {
            if !original.trim().is_empty() {
                original
            } else {
                request.field_text(field)
            }
        }
    }
}

/// 一张工单三个字段的显示文本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDisplay<'a> {
    pub work_requested: &'a str,
    pub special_instructions: &'a str,
    pub no_permission_reason: &'a str,
}

/// 选出整张工单面向指定受众的显示文本
pub fn select_request_fields(
    request: &MaintenanceRequest,
    viewer: ViewerContext,
) -> RequestDisplay<'_> {
    RequestDisplay {
        work_requested: select_display_text(request, TranslatableField::WorkRequested, viewer),
        special_instructions: select_display_text(
            request,
            TranslatableField::SpecialInstructions,
            viewer,
        ),
        no_permission_reason: select_display_text(
            request,
            TranslatableField::NoPermissionReason,
            viewer,
        ),
    }
}
