// ==========================================
// 建筑碳排放核算系统 - 合规评估引擎
// ==========================================
// 职责: NCC2025（建材）与 NABERS（能耗）两套独立规则集评估
// 输出: 单标准得分/合规结论/违规/整改建议 + 综合结论
// ==========================================
// 计分: score = round(passed / evaluated × 100)
// 跳过: 规则评估出错 → 告警日志, 不计入分子分母
// 合规: 由各标准的 CompliancePolicy 判定
// ==========================================

pub mod nabers;
pub mod ncc;
pub mod policy;
pub mod rule;
pub mod settings;

use crate::domain::compliance::{
    ComplianceResult, DetailedComplianceReport, NabersResult, ALL_REQUIREMENTS_MET,
};
use crate::domain::line_item::{EnergyLineItem, MaterialLineItem};
use crate::domain::types::ComplianceStandard;
use crate::factors::EmissionFactorTable;
use chrono::Utc;
use std::sync::Arc;

pub use nabers::nabers_rules;
pub use ncc::ncc_rules;
pub use policy::{star_rating_for, CompliancePolicy, PolicyInput};
pub use rule::{ComplianceRule, RuleCondition, RuleSet, RuleSetEvaluation};
pub use settings::ComplianceSettings;

// ==========================================
// ComplianceEngine - 合规评估引擎
// ==========================================
pub struct ComplianceEngine {
    ncc_rules: RuleSet<MaterialLineItem>,
    nabers_rules: RuleSet<EnergyLineItem>,
    ncc_policy: CompliancePolicy,
    nabers_policy: CompliancePolicy,
}

impl ComplianceEngine {
    /// 使用指定规则集与默认判定策略
    pub fn new(ncc_rules: RuleSet<MaterialLineItem>, nabers_rules: RuleSet<EnergyLineItem>) -> Self {
        Self {
            ncc_rules,
            nabers_rules,
            ncc_policy: CompliancePolicy::NoCriticalFailures,
            nabers_policy: CompliancePolicy::MinimumStarRating(4),
        }
    }

    /// 标准规则集 + 按配置阈值设置判定策略
    pub fn standard(factors: Arc<EmissionFactorTable>, settings: &ComplianceSettings) -> Self {
        let mut engine = Self::new(
            ncc_rules(Arc::clone(&factors), settings),
            nabers_rules(factors, settings),
        );
        engine.nabers_policy = CompliancePolicy::MinimumStarRating(settings.nabers_min_star_rating);
        engine
    }

    pub fn with_policies(mut self, ncc_policy: CompliancePolicy, nabers_policy: CompliancePolicy) -> Self {
        self.ncc_policy = ncc_policy;
        self.nabers_policy = nabers_policy;
        self
    }

    pub fn ncc_policy(&self) -> &CompliancePolicy {
        &self.ncc_policy
    }

    pub fn nabers_policy(&self) -> &CompliancePolicy {
        &self.nabers_policy
    }

    // ==========================================
    // 评估方法
    // ==========================================

    /// NCC 2025 评估（建材）
    pub fn evaluate_ncc(&self, materials: &[MaterialLineItem]) -> ComplianceResult {
        let evaluation = self.ncc_rules.evaluate(materials);
        let score = evaluation.score();
        let compliant = self.ncc_policy.is_compliant(&PolicyInput {
            score,
            star_rating: star_rating_for(score),
            violations: &evaluation.violations,
        });

        tracing::debug!(
            standard = %self.ncc_rules.standard,
            score,
            compliant,
            policy = %self.ncc_policy.name(),
            "NCC 评估完成"
        );

        build_result(self.ncc_rules.standard, evaluation, score, compliant)
    }

    /// NABERS 评估（能耗）, 附 0-5 星级
    pub fn evaluate_nabers(&self, energy: &[EnergyLineItem]) -> NabersResult {
        let evaluation = self.nabers_rules.evaluate(energy);
        let score = evaluation.score();
        let star_rating = star_rating_for(score);
        let compliant = self.nabers_policy.is_compliant(&PolicyInput {
            score,
            star_rating,
            violations: &evaluation.violations,
        });

        tracing::debug!(
            standard = %self.nabers_rules.standard,
            score,
            star_rating,
            compliant,
            policy = %self.nabers_policy.name(),
            "NABERS 评估完成"
        );

        NabersResult {
            result: build_result(self.nabers_rules.standard, evaluation, score, compliant),
            star_rating,
        }
    }

    /// 综合合规评估
    pub fn check_compliance(
        &self,
        materials: &[MaterialLineItem],
        energy: &[EnergyLineItem],
    ) -> DetailedComplianceReport {
        let ncc = self.evaluate_ncc(materials);
        let nabers = self.evaluate_nabers(energy);
        let report = DetailedComplianceReport::new(ncc, nabers, Utc::now().naive_utc());

        tracing::info!(
            overall_score = report.overall.score,
            overall_compliant = report.overall.compliant,
            ncc_score = report.ncc.score,
            nabers_stars = report.nabers.star_rating,
            "合规评估完成"
        );

        report
    }
}

fn build_result(
    standard: ComplianceStandard,
    evaluation: RuleSetEvaluation,
    score: u32,
    compliant: bool,
) -> ComplianceResult {
    let mut recommendations = evaluation.remediations();
    if recommendations.is_empty() {
        recommendations.push(ALL_REQUIREMENTS_MET.to_string());
    }

    ComplianceResult {
        standard,
        compliant,
        score,
        evaluated_rules: evaluation.evaluated,
        passed_rules: evaluation.passed,
        skipped_rules: evaluation.skipped,
        violations: evaluation.violations,
        recommendations,
    }
}
