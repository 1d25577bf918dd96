// ==========================================
// 建筑碳排放核算系统 - JSON 导出
// ==========================================
// 格式: pretty-printed, 字段顺序与 ReportBundle 定义一致
// ==========================================

use crate::export::{ExportResult, ReportBundle};

pub fn to_json_string(bundle: &ReportBundle) -> ExportResult<String> {
    Ok(serde_json::to_string_pretty(bundle)?)
}

/// 读回导出的 JSON（用于导入历史导出文件）
pub fn from_json_str(raw: &str) -> ExportResult<ReportBundle> {
    Ok(serde_json::from_str(raw)?)
}
