// ==========================================
// 建筑碳排放核算系统 - NCC 2025 规则集
// ==========================================
// 依据: NCC 2025 Volume One Section J（能效）
// 输入: 建材明细
// ==========================================
// 类型匹配规则: 小写后子串匹配（不同于因子表的精确匹配）
// ==========================================

use crate::domain::line_item::MaterialLineItem;
use crate::domain::types::{ComplianceStandard, EmissionCategory, Severity};
use crate::engine::compliance::rule::{ComplianceRule, RuleSet};
use crate::engine::compliance::settings::ComplianceSettings;
use crate::engine::error::RuleError;
use crate::factors::EmissionFactorTable;
use std::sync::Arc;

pub const RULE_THERMAL_PERFORMANCE: &str = "ncc-thermal-performance";
pub const RULE_EMBODIED_CARBON_INTENSITY: &str = "ncc-embodied-carbon-intensity";
pub const RULE_LOW_CARBON_CONCRETE: &str = "ncc-low-carbon-concrete";
pub const RULE_GLAZING_PERFORMANCE: &str = "ncc-glazing-performance";
pub const RULE_QUANTITY_COMPLETENESS: &str = "ncc-quantity-completeness";
pub const RULE_STEEL_RECYCLED_CONTENT: &str = "ncc-steel-recycled-content";

/// 低碳混凝土关键字（归一化后匹配）
const LOW_CARBON_CONCRETE_KEYWORDS: &[&str] = &["lowcarbon", "geopolymer", "recycled", "scm"];

/// 高性能玻璃关键字（归一化后匹配）
const HIGH_PERFORMANCE_GLAZING_KEYWORDS: &[&str] = &["doubleglaz", "tripleglaz", "lowe"];

/// 小写并去除空格/连字符/下划线
fn normalize(item_type: &str) -> String {
    item_type
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

fn type_contains(item: &MaterialLineItem, needle: &str) -> bool {
    normalize(&item.item_type).contains(needle)
}

fn contains_any(item: &MaterialLineItem, needles: &[&str]) -> bool {
    let normalized = normalize(&item.item_type);
    needles.iter().any(|n| normalized.contains(n))
}

/// 构建 NCC 2025 标准规则集
pub fn ncc_rules(factors: Arc<EmissionFactorTable>, settings: &ComplianceSettings) -> RuleSet<MaterialLineItem> {
    let max_avg_factor = settings.ncc_max_avg_material_factor;
    let min_quantity = settings.ncc_min_quantity;

    let rules = vec![
        // 规则 1: 围护结构保温（critical）
        ComplianceRule::new(
            RULE_THERMAL_PERFORMANCE,
            ComplianceStandard::Ncc2025,
            "energy-efficiency",
            Severity::Critical,
            "No thermal insulation specified for the building envelope (NCC 2025 Part J4)",
            "Specify insulation achieving the minimum total R-values required by NCC 2025 Part J4",
            |items: &[MaterialLineItem]| Ok(items.iter().any(|i| type_contains(i, "insulation"))),
        ),
        // 规则 2: 平均隐含碳强度
        ComplianceRule::new(
            RULE_EMBODIED_CARBON_INTENSITY,
            ComplianceStandard::Ncc2025,
            "embodied-carbon",
            Severity::Warning,
            "Average embodied carbon intensity of specified materials exceeds the target",
            "Substitute high-intensity materials with lower carbon alternatives backed by EPDs",
            move |items: &[MaterialLineItem]| {
                let resolved: Vec<f64> = items
                    .iter()
                    .filter_map(|i| {
                        i.carbon_footprint.or_else(|| {
                            factors
                                .lookup(EmissionCategory::Material, &i.item_type)
                                .map(|f| f.factor)
                        })
                    })
                    .collect();
                if resolved.is_empty() {
                    return Err(RuleError::InsufficientData(
                        "no material with a resolvable carbon footprint".to_string(),
                    ));
                }
                let average = resolved.iter().sum::<f64>() / resolved.len() as f64;
                Ok(average <= max_avg_factor)
            },
        ),
        // 规则 3: 低碳混凝土占比 ≥ 50%（无混凝土则不适用, 视为通过）
        ComplianceRule::new(
            RULE_LOW_CARBON_CONCRETE,
            ComplianceStandard::Ncc2025,
            "embodied-carbon",
            Severity::Warning,
            "Less than half of specified concrete is a low carbon mix",
            "Use supplementary cementitious materials or geopolymer concrete for at least 50% of concrete volume",
            |items: &[MaterialLineItem]| {
                let concrete: Vec<&MaterialLineItem> =
                    items.iter().filter(|i| type_contains(i, "concrete")).collect();
                if concrete.is_empty() {
                    return Ok(true);
                }
                let total: f64 = concrete.iter().map(|i| i.quantity).sum();
                if total <= 0.0 {
                    return Err(RuleError::InvalidInput(format!(
                        "total concrete quantity is {}",
                        total
                    )));
                }
                let low_carbon: f64 = concrete
                    .iter()
                    .filter(|i| contains_any(i, LOW_CARBON_CONCRETE_KEYWORDS))
                    .map(|i| i.quantity)
                    .sum();
                Ok(low_carbon / total >= 0.5)
            },
        ),
        // 规则 4: 玻璃性能（有玻璃时须为双层/三层/Low-E）
        ComplianceRule::new(
            RULE_GLAZING_PERFORMANCE,
            ComplianceStandard::Ncc2025,
            "energy-efficiency",
            Severity::Warning,
            "Glazing specified without a high performance glazing unit (NCC 2025 Part J4D6)",
            "Specify double glazed or low-e glazing units to meet the total system U-value",
            |items: &[MaterialLineItem]| {
                let glazing: Vec<&MaterialLineItem> = items
                    .iter()
                    .filter(|i| type_contains(i, "glass") || type_contains(i, "glaz"))
                    .collect();
                if glazing.is_empty() {
                    return Ok(true);
                }
                Ok(glazing
                    .iter()
                    .any(|i| contains_any(i, HIGH_PERFORMANCE_GLAZING_KEYWORDS)))
            },
        ),
        // 规则 5: 数量完整性
        ComplianceRule::new(
            RULE_QUANTITY_COMPLETENESS,
            ComplianceStandard::Ncc2025,
            "data-quality",
            Severity::Warning,
            "One or more material line items have a missing or non-positive quantity",
            "Complete the bill of quantities with measured quantities for every material",
            move |items: &[MaterialLineItem]| {
                if items.is_empty() {
                    return Err(RuleError::InsufficientData("no material line items".to_string()));
                }
                Ok(items.iter().all(|i| i.quantity > min_quantity))
            },
        ),
        // 规则 6: 钢材再生含量（info）
        ComplianceRule::new(
            RULE_STEEL_RECYCLED_CONTENT,
            ComplianceStandard::Ncc2025,
            "circularity",
            Severity::Info,
            "Steel specified without recycled content",
            "Source steel with recycled content (EAF route) where structurally permissible",
            |items: &[MaterialLineItem]| {
                let steel: Vec<&MaterialLineItem> =
                    items.iter().filter(|i| type_contains(i, "steel")).collect();
                if steel.is_empty() {
                    return Ok(true);
                }
                Ok(steel.iter().any(|i| type_contains(i, "recycled")))
            },
        ),
    ];

    RuleSet::new(ComplianceStandard::Ncc2025, rules)
}
