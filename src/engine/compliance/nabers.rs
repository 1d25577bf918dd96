// ==========================================
// 建筑碳排放核算系统 - NABERS 规则集
// ==========================================
// 依据: NABERS Energy 评级口径（运行能耗）
// 输入: 能耗明细
// ==========================================

use crate::domain::line_item::EnergyLineItem;
use crate::domain::types::{ComplianceStandard, EmissionCategory, Severity};
use crate::engine::compliance::rule::{ComplianceRule, RuleSet};
use crate::engine::compliance::settings::ComplianceSettings;
use crate::engine::error::RuleError;
use crate::factors::{is_renewable, EmissionFactorTable};
use std::sync::Arc;

pub const RULE_RENEWABLE_SHARE: &str = "nabers-renewable-share";
pub const RULE_EMISSIONS_INTENSITY: &str = "nabers-emissions-intensity";
pub const RULE_NO_DIESEL_GENERATION: &str = "nabers-no-diesel-generation";
pub const RULE_GAS_SHARE: &str = "nabers-gas-share";
pub const RULE_METERED_UNITS: &str = "nabers-metered-units";

/// 单行能耗排放（显式碳足迹优先, 未知类型为 0）
fn item_emissions(factors: &EmissionFactorTable, item: &EnergyLineItem) -> f64 {
    let factor = item.carbon_footprint.or_else(|| {
        factors
            .lookup(EmissionCategory::Energy, &item.item_type)
            .map(|f| f.factor)
    });
    factor.unwrap_or(0.0) * item.amount
}

fn is_gas(item: &EnergyLineItem) -> bool {
    let lower = item.item_type.to_lowercase();
    lower.contains("gas") || lower.contains("lpg")
}

/// 构建 NABERS 规则集
pub fn nabers_rules(factors: Arc<EmissionFactorTable>, settings: &ComplianceSettings) -> RuleSet<EnergyLineItem> {
    let min_renewable_share = settings.nabers_min_renewable_share;
    let max_gas_share = settings.nabers_max_gas_share;
    let max_energy_emissions = settings.nabers_max_energy_emissions;
    let intensity_factors = Arc::clone(&factors);
    let gas_factors = factors;

    let rules = vec![
        // 规则 1: 可再生电力占比（按 kWh 计）
        ComplianceRule::new(
            RULE_RENEWABLE_SHARE,
            ComplianceStandard::Nabers,
            "renewables",
            Severity::Warning,
            "Renewable electricity share is below the NABERS target",
            "Add on-site solar PV or contract GreenPower / a renewable PPA",
            move |items: &[EnergyLineItem]| {
                let electricity: Vec<&EnergyLineItem> = items
                    .iter()
                    .filter(|i| i.unit.trim().eq_ignore_ascii_case("kwh"))
                    .collect();
                let total: f64 = electricity.iter().map(|i| i.amount).sum();
                if total <= 0.0 {
                    return Err(RuleError::InsufficientData(
                        "no electricity consumption in kWh".to_string(),
                    ));
                }
                let renewable: f64 = electricity
                    .iter()
                    .filter(|i| is_renewable(&i.item_type))
                    .map(|i| i.amount)
                    .sum();
                Ok(renewable / total >= min_renewable_share)
            },
        ),
        // 规则 2: 运行排放总量上限（critical）
        ComplianceRule::new(
            RULE_EMISSIONS_INTENSITY,
            ComplianceStandard::Nabers,
            "operational-emissions",
            Severity::Critical,
            "Operational energy emissions exceed the NABERS benchmark",
            "Reduce operational energy demand through efficient HVAC, lighting and controls",
            move |items: &[EnergyLineItem]| {
                if items.is_empty() {
                    return Err(RuleError::InsufficientData("no energy line items".to_string()));
                }
                let total: f64 = items
                    .iter()
                    .map(|i| item_emissions(&intensity_factors, i))
                    .sum();
                Ok(total <= max_energy_emissions)
            },
        ),
        // 规则 3: 不使用柴油发电
        ComplianceRule::new(
            RULE_NO_DIESEL_GENERATION,
            ComplianceStandard::Nabers,
            "fuel-use",
            Severity::Warning,
            "Diesel generation is included in the energy profile",
            "Replace diesel generation with grid connection, batteries or renewable supply",
            |items: &[EnergyLineItem]| {
                if items.is_empty() {
                    return Err(RuleError::InsufficientData("no energy line items".to_string()));
                }
                Ok(!items
                    .iter()
                    .any(|i| i.item_type.to_lowercase().contains("diesel")))
            },
        ),
        // 规则 4: 燃气排放占比上限（按排放量计）
        ComplianceRule::new(
            RULE_GAS_SHARE,
            ComplianceStandard::Nabers,
            "electrification",
            Severity::Warning,
            "Gas accounts for too large a share of operational emissions",
            "Electrify space and water heating with heat pumps",
            move |items: &[EnergyLineItem]| {
                if items.is_empty() {
                    return Err(RuleError::InsufficientData("no energy line items".to_string()));
                }
                let gas: f64 = items
                    .iter()
                    .filter(|i| is_gas(i))
                    .map(|i| item_emissions(&gas_factors, i))
                    .sum();
                if gas <= 0.0 {
                    return Ok(true);
                }
                let total: f64 = items.iter().map(|i| item_emissions(&gas_factors, i)).sum();
                if total <= 0.0 {
                    return Err(RuleError::InvalidInput(format!(
                        "total energy emissions is {}",
                        total
                    )));
                }
                Ok(gas / total <= max_gas_share)
            },
        ),
        // 规则 5: 计量单位齐全（info）
        ComplianceRule::new(
            RULE_METERED_UNITS,
            ComplianceStandard::Nabers,
            "data-quality",
            Severity::Info,
            "One or more energy line items have no metering unit",
            "Record the metered unit (kWh, MJ, L) for every energy source",
            |items: &[EnergyLineItem]| {
                if items.is_empty() {
                    return Err(RuleError::InsufficientData("no energy line items".to_string()));
                }
                Ok(items.iter().all(|i| !i.unit.trim().is_empty()))
            },
        ),
    ];

    RuleSet::new(ComplianceStandard::Nabers, rules)
}
