// ==========================================
// ComplianceEngine 集成测试
// ==========================================
// 测试目标: NCC2025 / NABERS 规则集评估、星级、综合结论
// ==========================================

mod test_helpers;

use carbon_compliance::domain::{EnergyLineItem, MaterialLineItem, ALL_REQUIREMENTS_MET};
use carbon_compliance::engine::{ComplianceEngine, CompliancePolicy, ComplianceSettings};
use carbon_compliance::factors::EmissionFactorTable;
use carbon_compliance::{logging, Severity};
use std::sync::Arc;
use test_helpers::{compliant_materials, green_energy};

fn engine_with(settings: &ComplianceSettings) -> ComplianceEngine {
    ComplianceEngine::standard(Arc::new(EmissionFactorTable::standard()), settings)
}

fn standard_engine() -> ComplianceEngine {
    engine_with(&ComplianceSettings::default())
}

fn failing_materials() -> Vec<MaterialLineItem> {
    vec![
        MaterialLineItem::new("concrete", 1000.0, "kg"),
        MaterialLineItem::new("aluminium", 10.0, "kg"),
    ]
}

fn failing_energy() -> Vec<EnergyLineItem> {
    vec![EnergyLineItem::new("electricityVic", 100_000.0, "kWh")]
}

#[test]
fn test_fully_compliant_project() {
    logging::init_test();

    let report = standard_engine().check_compliance(&compliant_materials(), &green_energy());

    assert_eq!(report.ncc.score, 100);
    assert!(report.ncc.compliant);
    assert!(report.ncc.violations.is_empty());
    assert_eq!(report.ncc.recommendations, vec![ALL_REQUIREMENTS_MET.to_string()]);

    assert_eq!(report.nabers.result.score, 100);
    assert_eq!(report.nabers.star_rating, 5);
    assert!(report.nabers.result.compliant);

    assert_eq!(report.overall.score, 100);
    assert!(report.overall.compliant);
}

#[test]
fn test_non_compliant_project() {
    let report = standard_engine().check_compliance(&failing_materials(), &failing_energy());

    // NCC: 保温/强度/低碳混凝土失败, 3/6 通过
    assert_eq!(report.ncc.evaluated_rules, 6);
    assert_eq!(report.ncc.passed_rules, 3);
    assert_eq!(report.ncc.score, 50);
    assert!(!report.ncc.compliant);
    assert!(report.ncc.has_critical_violation());

    // NABERS: 可再生占比与排放上限失败, 3/5 通过
    assert_eq!(report.nabers.result.score, 60);
    assert_eq!(report.nabers.star_rating, 3);
    assert!(!report.nabers.result.compliant);

    assert_eq!(report.overall.score, 55);
    assert!(!report.overall.compliant);

    let critical: Vec<_> = report
        .all_violations()
        .filter(|(_, v)| v.severity == Severity::Critical)
        .collect();
    assert_eq!(critical.len(), 2);
}

#[test]
fn test_recommendations_follow_violations() {
    let report = standard_engine().check_compliance(&failing_materials(), &failing_energy());

    assert_eq!(report.ncc.recommendations.len(), report.ncc.violations.len());
    for violation in &report.ncc.violations {
        assert!(report.ncc.recommendations.contains(&violation.remediation));
        assert!(!violation.message.is_empty());
    }
}

#[test]
fn test_empty_energy_is_not_rated() {
    let result = standard_engine().evaluate_nabers(&[]);

    // 无能耗数据 → 全部规则跳过, 不给出评级
    assert_eq!(result.result.skipped_rules.len(), 5);
    assert_eq!(result.result.evaluated_rules, 0);
    assert_eq!(result.result.score, 0);
    assert_eq!(result.star_rating, 0);
    assert!(!result.result.compliant);
    assert!(result.result.violations.is_empty());

    let report = standard_engine().check_compliance(&compliant_materials(), &[]);
    assert!(report.ncc.compliant);
    assert!(!report.nabers.result.compliant);
    assert!(!report.overall.compliant);
    assert_eq!(report.overall.score, 50);
}

#[test]
fn test_star_threshold_from_settings() {
    let energy = vec![
        EnergyLineItem::new("electricityNsw", 1000.0, "kWh"),
        EnergyLineItem::new("diesel", 10.0, "L"),
    ];

    // 可再生占比失败 + 柴油失败: 3/5 → 3 星
    let strict = standard_engine().evaluate_nabers(&energy);
    assert_eq!(strict.star_rating, 3);
    assert!(!strict.result.compliant);

    let relaxed = engine_with(&ComplianceSettings {
        nabers_min_star_rating: 3,
        ..ComplianceSettings::default()
    })
    .evaluate_nabers(&energy);
    assert!(relaxed.result.compliant);
}

#[test]
fn test_material_threshold_from_settings() {
    let materials = vec![
        MaterialLineItem::new("insulation", 10.0, "kg"),
        MaterialLineItem::new("timber", 10.0, "kg"),
    ];
    // 平均因子 (1.86 + 0.46) / 2 = 1.16
    let default_result = standard_engine().evaluate_ncc(&materials);
    assert_eq!(default_result.score, 83);

    let lenient = engine_with(&ComplianceSettings {
        ncc_max_avg_material_factor: 1.2,
        ..ComplianceSettings::default()
    })
    .evaluate_ncc(&materials);
    assert_eq!(lenient.score, 100);
}

#[test]
fn test_policy_override() {
    let engine = standard_engine().with_policies(
        CompliancePolicy::MinimumScore(90),
        CompliancePolicy::NoCriticalFailures,
    );

    // NCC: 强度规则失败（warning）, 5/6 = 83 < 90
    let materials = vec![
        MaterialLineItem::new("insulation", 10.0, "kg"),
        MaterialLineItem::new("timber", 10.0, "kg"),
    ];
    assert!(!engine.evaluate_ncc(&materials).compliant);

    // NABERS: 仅 warning 失败 → 合规
    let energy = vec![EnergyLineItem::new("electricityNsw", 1000.0, "kWh")];
    let nabers = engine.evaluate_nabers(&energy);
    assert!(nabers.result.compliant);
    assert_eq!(engine.nabers_policy(), &CompliancePolicy::NoCriticalFailures);
}
