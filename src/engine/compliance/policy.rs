// ==========================================
// 建筑碳排放核算系统 - 合规判定策略
// ==========================================
// 职责: 每个标准的 "是否合规" 判定为具名、可替换的策略
// 默认: NCC = 无 critical 失败; NABERS = 星级 ≥ 4
// ==========================================

use crate::domain::compliance::Violation;
use crate::domain::types::Severity;
use serde::{Deserialize, Serialize};

/// NABERS 星级: clamp(round(score / 20), 0, 5)
pub fn star_rating_for(score: u32) -> u8 {
    let stars = (score as f64 / 20.0).round();
    stars.clamp(0.0, 5.0) as u8
}

/// 策略判定输入
#[derive(Debug, Clone, Copy)]
pub struct PolicyInput<'a> {
    pub score: u32,
    pub star_rating: u8,
    pub violations: &'a [Violation],
}

// ==========================================
// CompliancePolicy - 合规判定策略
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CompliancePolicy {
    /// 无 critical 级失败即合规（与得分无关）
    NoCriticalFailures,
    /// 星级不低于阈值
    MinimumStarRating(u8),
    /// 得分不低于阈值
    MinimumScore(u32),
    /// 所有子策略均满足
    AllOf(Vec<CompliancePolicy>),
}

impl CompliancePolicy {
    pub fn name(&self) -> String {
        match self {
            CompliancePolicy::NoCriticalFailures => "no_critical_failures".to_string(),
            CompliancePolicy::MinimumStarRating(n) => format!("minimum_star_rating({})", n),
            CompliancePolicy::MinimumScore(n) => format!("minimum_score({})", n),
            CompliancePolicy::AllOf(policies) => format!(
                "all_of({})",
                policies
                    .iter()
                    .map(|p| p.name())
                    .collect::<Vec<_>>()
                    .join(",")
            ),
        }
    }

    pub fn is_compliant(&self, input: &PolicyInput<'_>) -> bool {
        match self {
            CompliancePolicy::NoCriticalFailures => !input
                .violations
                .iter()
                .any(|v| v.severity == Severity::Critical),
            CompliancePolicy::MinimumStarRating(min) => input.star_rating >= *min,
            CompliancePolicy::MinimumScore(min) => input.score >= *min,
            CompliancePolicy::AllOf(policies) => policies.iter().all(|p| p.is_compliant(input)),
        }
    }
}
