// ==========================================
// 建筑碳排放核算系统 - 合规评估结果
// ==========================================
// 红线: score ∈ [0, 100]
// 红线: 每次评估生成新对象, 不原地修改
// ==========================================

use crate::domain::types::{ComplianceStandard, Severity};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 全部规则通过时的固定建议文案
pub const ALL_REQUIREMENTS_MET: &str = "All compliance requirements met";

// ==========================================
// Violation - 规则违规
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub rule_id: String,
    pub category: String,
    pub severity: Severity,
    pub message: String,
    pub remediation: String,
}

// ==========================================
// ComplianceResult - 单标准评估结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResult {
    pub standard: ComplianceStandard,
    pub compliant: bool,
    pub score: u32,
    /// 参与计分的规则数（不含跳过的规则）
    pub evaluated_rules: usize,
    pub passed_rules: usize,
    /// 评估出错而跳过的规则 ID
    pub skipped_rules: Vec<String>,
    pub violations: Vec<Violation>,
    pub recommendations: Vec<String>,
}

impl ComplianceResult {
    pub fn has_critical_violation(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Critical)
    }
}

// ==========================================
// NabersResult - NABERS 评估结果（含星级）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NabersResult {
    #[serde(flatten)]
    pub result: ComplianceResult,
    /// 0-5 星
    pub star_rating: u8,
}

// ==========================================
// OverallCompliance - 综合结论
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallCompliance {
    pub score: u32,
    pub compliant: bool,
}

impl OverallCompliance {
    /// score = round((ncc + nabers) / 2); compliant = ncc && nabers
    pub fn combine(ncc: &ComplianceResult, nabers: &NabersResult) -> Self {
        let score = ((ncc.score + nabers.result.score) as f64 / 2.0).round() as u32;
        Self {
            score: score.min(100),
            compliant: ncc.compliant && nabers.result.compliant,
        }
    }
}

// ==========================================
// DetailedComplianceReport - 综合合规报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedComplianceReport {
    pub ncc: ComplianceResult,
    pub nabers: NabersResult,
    pub overall: OverallCompliance,
    pub generated_at: NaiveDateTime,
}

impl DetailedComplianceReport {
    pub fn new(ncc: ComplianceResult, nabers: NabersResult, generated_at: NaiveDateTime) -> Self {
        let overall = OverallCompliance::combine(&ncc, &nabers);
        Self {
            ncc,
            nabers,
            overall,
            generated_at,
        }
    }

    /// 两个标准下的全部违规
    pub fn all_violations(&self) -> impl Iterator<Item = (ComplianceStandard, &Violation)> {
        self.ncc
            .violations
            .iter()
            .map(|v| (ComplianceStandard::Ncc2025, v))
            .chain(
                self.nabers
                    .result
                    .violations
                    .iter()
                    .map(|v| (ComplianceStandard::Nabers, v)),
            )
    }
}
