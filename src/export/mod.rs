// ==========================================
// 建筑碳排放核算系统 - 报告导出
// ==========================================
// 职责: 核算结果 + 合规报告 → CSV / JSON
// 约束: 输出顺序确定（同一输入 → 同一字节序列）
// ==========================================

pub mod csv_export;
pub mod json_export;

use crate::domain::calculation::CalculationResult;
use crate::domain::compliance::DetailedComplianceReport;
use crate::domain::epd::Epd;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub use csv_export::to_csv_string;
pub use json_export::to_json_string;

// ==========================================
// 错误类型
// ==========================================
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("导出格式不支持: {0}（仅支持 csv/json）")]
    UnsupportedFormat(String),

    #[error("CSV 写入失败: {0}")]
    Csv(String),

    #[error("JSON 序列化失败: {0}")]
    Json(String),

    #[error("文件写入失败: {0}")]
    Io(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Json(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

// ==========================================
// 导出格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

// ==========================================
// ReportBundle - 导出内容
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportBundle {
    pub project_id: String,
    pub project_name: Option<String>,
    pub generated_at: NaiveDateTime,
    pub calculation: CalculationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance: Option<DetailedComplianceReport>,
    #[serde(default)]
    pub epds: Vec<Epd>,
}

/// 按格式渲染为字符串
pub fn render(bundle: &ReportBundle, format: ExportFormat) -> ExportResult<String> {
    match format {
        ExportFormat::Csv => to_csv_string(bundle),
        ExportFormat::Json => to_json_string(bundle),
    }
}

/// 渲染并写入文件
pub fn write_report(path: &Path, bundle: &ReportBundle, format: ExportFormat) -> ExportResult<()> {
    let content = render(bundle, format)?;
    std::fs::write(path, content)?;
    tracing::info!(
        project_id = %bundle.project_id,
        format = %format,
        path = %path.display(),
        "报告已导出"
    );
    Ok(())
}
