// ==========================================
// 建筑碳排放核算系统 - 历史记录与个性化实体
// ==========================================
// 职责: 核算历史、合规报告存档、告警、用户目标与收藏
// 红线: 实体不含数据访问逻辑
// ==========================================

use crate::domain::calculation::CalculationResult;
use crate::domain::compliance::DetailedComplianceReport;
use crate::domain::types::{ComplianceStandard, EmissionCategory, Severity};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// CalculationRecord - 核算历史记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRecord {
    pub record_id: String,
    pub project_id: String,
    pub user_id: String,
    pub result: CalculationResult,
    pub created_at: NaiveDateTime,
}

impl CalculationRecord {
    pub fn total_emissions(&self) -> f64 {
        self.result.total_emissions
    }
}

// ==========================================
// StoredComplianceReport - 已存档的合规报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredComplianceReport {
    pub report_id: String,
    pub project_id: String,
    pub report: DetailedComplianceReport,
    /// 评估时的配置快照（JSON）
    pub config_snapshot: Option<String>,
    pub created_at: NaiveDateTime,
}

// ==========================================
// ComplianceAlert - 合规告警
// ==========================================
// 每条 critical 违规生成一条告警, 人工处理后关闭
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceAlert {
    pub alert_id: String,
    pub project_id: String,
    pub standard: ComplianceStandard,
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub resolved: bool,
    pub created_at: NaiveDateTime,
    pub resolved_at: Option<NaiveDateTime>,
}

// ==========================================
// UserGoal - 用户减排目标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGoal {
    pub user_id: String,
    pub project_id: String,
    /// 基线排放 (kg CO2e)
    pub baseline_emissions: f64,
    /// 目标减排比例 (%)
    pub target_reduction_pct: f64,
    pub target_date: Option<NaiveDate>,
}

// ==========================================
// GoalProgress - 目标进度（派生）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub current_emissions: f64,
    pub target_emissions: f64,
    /// 已实现减排比例 (%), 可为负（排放增加）
    pub reduction_achieved_pct: f64,
    /// 目标完成度 (%), 限定在 [0, 100]
    pub progress_pct: f64,
    pub on_track: bool,
}

// ==========================================
// HistorySummary - 历史汇总（派生）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub count: usize,
    pub average_total: f64,
    pub min_total: f64,
    pub max_total: f64,
    pub latest_total: Option<f64>,
    /// 最早一次到最近一次的变化比例 (%)
    pub trend_pct: Option<f64>,
}

// ==========================================
// MaterialFavorite - 常用建材收藏
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialFavorite {
    pub user_id: String,
    pub category: EmissionCategory,
    pub item_type: String,
    pub created_at: NaiveDateTime,
}
