//! 翻译解析管线命令行入口
//!
//! 模拟一次工单提交：按参数构造工单、跑完整的翻译解析流程，
//! 然后分别以工作人员和租户两个受众渲染结果。

use std::path::PathBuf;

use clap::Parser;

use worklingo::config::{ConfigManager, TranslationConfig};
use worklingo::model::MaintenanceRequest;
use worklingo::render::{select_request_fields, ViewerContext};
use worklingo::service::TranslationService;

#[derive(Parser, Debug)]
#[command(name = "worklingo", version, about = "维修工单翻译解析管线")]
struct Cli {
    /// 维修内容描述
    #[arg(long, default_value = "Hay una fuga de agua en el baño")]
    text: String,

    /// 特殊说明
    #[arg(long, default_value = "")]
    instructions: String,

    /// 不允许进入住所时的原因说明
    #[arg(long = "no-permission-reason", default_value = "")]
    no_permission_reason: String,

    /// 租户声明的语言代码
    #[arg(long, default_value = "es")]
    language: String,

    /// 只输出指定受众的视图
    #[arg(long, value_name = "tenant|admin")]
    viewer: Option<ViewerContext>,

    /// 解析后输出服务统计（JSON）
    #[arg(long)]
    stats: bool,

    /// 生成带注释的示例配置文件后退出
    #[arg(long, value_name = "PATH")]
    generate_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();

    if let Some(path) = &cli.generate_config {
        ConfigManager::generate_example_config(path)?;
        println!("示例配置已写入 {}", path.display());
        return Ok(());
    }

    let manager = ConfigManager::new()?;
    let config = manager.get_config()?;
    let service = TranslationService::new(config)?;
    tracing::debug!("提供者级联链: {:?}", service.provider_names());

    let mut request = MaintenanceRequest::new(1, "Demo Tenant", "1A");
    request.selected_language = Some(cli.language.clone());
    request.work_requested = cli.text.clone();
    request.special_instructions = cli.instructions.clone();
    request.permission_to_enter = cli.no_permission_reason.is_empty();
    request.no_permission_reason = cli.no_permission_reason.clone();

    service.translate_request(&mut request).await;

    match cli.viewer {
        Some(viewer) => print_view(&request, viewer, service.config()),
        None => {
            print_view(&request, ViewerContext::Admin, service.config());
            println!();
            print_view(&request, ViewerContext::Tenant, service.config());
        }
    }

    if cli.stats {
        println!();
        println!(
            "{}",
            serde_json::to_string_pretty(&service.get_stats().snapshot())?
        );
    }

    Ok(())
}

/// 按受众渲染一张工单
fn print_view(request: &MaintenanceRequest, viewer: ViewerContext, config: &TranslationConfig) {
    let fields = select_request_fields(request, viewer);
    let subject = match viewer {
        ViewerContext::Admin => &config.platform.admin_request_subject,
        ViewerContext::Tenant => &config.platform.tenant_confirmation_subject,
    };

    println!("=== {} [{}] ===", subject, viewer);
    println!("{} - 工单 #{}", config.platform.company_name, request.id);
    println!("租户: {} (单元 {})", request.tenant_name, request.unit);
    println!("维修内容: {}", fields.work_requested);
    if !fields.special_instructions.is_empty() {
        println!("特殊说明: {}", fields.special_instructions);
    }
    if !request.permission_to_enter && !fields.no_permission_reason.is_empty() {
        println!("不允许进入原因: {}", fields.no_permission_reason);
    }
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
