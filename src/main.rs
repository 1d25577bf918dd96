// ==========================================
// 建筑碳排放核算系统 - 命令行入口
// ==========================================
// 用法: carbon-compliance <project.json> [csv|json] [db_path]
// 输出: 核算 + 合规报告（stdout）, 同时写入核算历史与合规存档
// ==========================================

use anyhow::{anyhow, Context, Result};
use carbon_compliance::app::{get_default_db_path, AppState};
use carbon_compliance::export::ExportFormat;
use carbon_compliance::{logging, ProjectInput};

const CLI_USER_ID: &str = "cli";

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(input_path) = args.first() else {
        eprintln!("用法: carbon-compliance <project.json> [csv|json] [db_path]");
        std::process::exit(2);
    };

    let format: ExportFormat = match args.get(1) {
        Some(raw) => raw.parse().map_err(|e| anyhow!("{}", e))?,
        None => ExportFormat::Json,
    };
    let db_path = args.get(2).cloned().unwrap_or_else(get_default_db_path);

    tracing::info!("{} v{}", carbon_compliance::APP_NAME, carbon_compliance::VERSION);
    tracing::info!("使用数据库: {}", db_path);

    let raw = std::fs::read_to_string(input_path)
        .with_context(|| format!("无法读取项目文件: {}", input_path))?;
    let input: ProjectInput =
        serde_json::from_str(&raw).with_context(|| format!("项目文件格式错误: {}", input_path))?;

    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
    let api = &state.carbon_api;

    let output = if input.project_id.trim().is_empty() {
        api.export_report(&input, format).await?
    } else {
        api.archive_and_export(CLI_USER_ID, &input, format).await?
    };
    println!("{}", output);
    Ok(())
}
