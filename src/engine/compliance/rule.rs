// ==========================================
// 建筑碳排放核算系统 - 合规规则定义
// ==========================================
// 职责: 规则 = 谓词 + 严重度 + 文案 + 整改建议
// 红线: 规则在进程启动时定义, 之后不可变
// 红线: 单条规则评估出错只影响该规则（跳过, 不计分）
// ==========================================

use crate::domain::compliance::Violation;
use crate::domain::types::{ComplianceStandard, Severity};
use crate::engine::error::RuleError;
use std::fmt;
use std::sync::Arc;

/// 规则谓词: 输入明细切片, 返回 通过/不通过/无法评估
pub type RuleCondition<T> = Arc<dyn Fn(&[T]) -> Result<bool, RuleError> + Send + Sync>;

// ==========================================
// ComplianceRule - 合规规则
// ==========================================
pub struct ComplianceRule<T> {
    pub id: String,
    pub standard: ComplianceStandard,
    pub category: String,
    pub severity: Severity,
    pub message: String,
    pub remediation: String,
    condition: RuleCondition<T>,
}

impl<T> ComplianceRule<T> {
    pub fn new<F>(
        id: &str,
        standard: ComplianceStandard,
        category: &str,
        severity: Severity,
        message: &str,
        remediation: &str,
        condition: F,
    ) -> Self
    where
        F: Fn(&[T]) -> Result<bool, RuleError> + Send + Sync + 'static,
    {
        Self {
            id: id.to_string(),
            standard,
            category: category.to_string(),
            severity,
            message: message.to_string(),
            remediation: remediation.to_string(),
            condition: Arc::new(condition),
        }
    }

    /// 评估规则谓词
    pub fn evaluate(&self, items: &[T]) -> Result<bool, RuleError> {
        (self.condition)(items)
    }

    pub fn to_violation(&self) -> Violation {
        Violation {
            rule_id: self.id.clone(),
            category: self.category.clone(),
            severity: self.severity,
            message: self.message.clone(),
            remediation: self.remediation.clone(),
        }
    }
}

impl<T> Clone for ComplianceRule<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            standard: self.standard,
            category: self.category.clone(),
            severity: self.severity,
            message: self.message.clone(),
            remediation: self.remediation.clone(),
            condition: Arc::clone(&self.condition),
        }
    }
}

impl<T> fmt::Debug for ComplianceRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComplianceRule")
            .field("id", &self.id)
            .field("standard", &self.standard)
            .field("category", &self.category)
            .field("severity", &self.severity)
            .finish()
    }
}

// ==========================================
// RuleSetEvaluation - 规则集评估明细
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSetEvaluation {
    pub evaluated: usize,
    pub passed: usize,
    pub skipped: Vec<String>,
    pub violations: Vec<Violation>,
}

impl RuleSetEvaluation {
    /// score = round(passed / evaluated × 100); 无可评估规则时为 0
    pub fn score(&self) -> u32 {
        if self.evaluated == 0 {
            return 0;
        }
        let score = (self.passed as f64 / self.evaluated as f64 * 100.0).round() as u32;
        score.min(100)
    }

    /// 失败规则的整改建议（去重, 保持规则顺序）
    pub fn remediations(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for v in &self.violations {
            if !out.contains(&v.remediation) {
                out.push(v.remediation.clone());
            }
        }
        out
    }
}

// ==========================================
// RuleSet - 单标准规则集
// ==========================================
#[derive(Debug, Clone)]
pub struct RuleSet<T> {
    pub standard: ComplianceStandard,
    rules: Vec<ComplianceRule<T>>,
}

impl<T> RuleSet<T> {
    pub fn new(standard: ComplianceStandard, rules: Vec<ComplianceRule<T>>) -> Self {
        Self { standard, rules }
    }

    pub fn rules(&self) -> &[ComplianceRule<T>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 逐条线性评估
    pub fn evaluate(&self, items: &[T]) -> RuleSetEvaluation {
        let mut evaluation = RuleSetEvaluation::default();

        for rule in &self.rules {
            match rule.evaluate(items) {
                Ok(true) => {
                    evaluation.evaluated += 1;
                    evaluation.passed += 1;
                }
                Ok(false) => {
                    evaluation.evaluated += 1;
                    evaluation.violations.push(rule.to_violation());
                }
                Err(e) => {
                    tracing::warn!(
                        rule_id = %rule.id,
                        standard = %self.standard,
                        error = %e,
                        "规则评估失败, 已跳过"
                    );
                    evaluation.skipped.push(rule.id.clone());
                }
            }
        }

        evaluation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: &str, severity: Severity, outcome: Result<bool, RuleError>) -> ComplianceRule<u32> {
        ComplianceRule::new(
            id,
            ComplianceStandard::Ncc2025,
            "test",
            severity,
            &format!("{} failed", id),
            &format!("fix {}", id),
            move |_items: &[u32]| outcome.clone(),
        )
    }

    #[test]
    fn test_skipped_rule_excluded_from_denominator() {
        let set = RuleSet::new(
            ComplianceStandard::Ncc2025,
            vec![
                rule("a", Severity::Warning, Ok(true)),
                rule("b", Severity::Warning, Err(RuleError::Internal("boom".to_string()))),
                rule("c", Severity::Warning, Ok(false)),
            ],
        );

        let evaluation = set.evaluate(&[]);
        assert_eq!(evaluation.evaluated, 2);
        assert_eq!(evaluation.passed, 1);
        assert_eq!(evaluation.skipped, vec!["b".to_string()]);
        assert_eq!(evaluation.score(), 50);
    }

    #[test]
    fn test_score_zero_when_nothing_evaluated() {
        let set = RuleSet::new(
            ComplianceStandard::Ncc2025,
            vec![rule("a", Severity::Info, Err(RuleError::InsufficientData("x".to_string())))],
        );
        assert_eq!(set.evaluate(&[]).score(), 0);
    }

    #[test]
    fn test_remediations_deduplicated() {
        let mut r1 = rule("a", Severity::Warning, Ok(false));
        let mut r2 = rule("b", Severity::Warning, Ok(false));
        r1.remediation = "same".to_string();
        r2.remediation = "same".to_string();
        let set = RuleSet::new(ComplianceStandard::Nabers, vec![r1, r2]);
        assert_eq!(set.evaluate(&[]).remediations(), vec!["same".to_string()]);
    }

    #[test]
    fn test_score_rounds_half_up() {
        let set = RuleSet::new(
            ComplianceStandard::Ncc2025,
            vec![
                rule("a", Severity::Info, Ok(true)),
                rule("b", Severity::Info, Ok(true)),
                rule("c", Severity::Info, Ok(false)),
            ],
        );
        // 2/3 = 66.67 → 67
        assert_eq!(set.evaluate(&[]).score(), 67);
    }
}
