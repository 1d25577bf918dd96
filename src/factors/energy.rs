// ==========================================
// 建筑碳排放核算系统 - 能源排放因子表
// ==========================================
// 口径: National Greenhouse Accounts 范围 1/2 因子
// 电力按州电网区分（Scope2）, 燃料燃烧计入 Scope1
// ==========================================

use crate::domain::types::EmissionScope;
use crate::factors::FactorEntry;

pub static ENERGY_FACTORS: &[FactorEntry] = &[
    // ===== 电网电力 (Scope2) =====
    FactorEntry::scoped("electricityNsw", "Grid electricity NSW/ACT", 0.66, "kWh", EmissionScope::Scope2),
    FactorEntry::scoped("electricityVic", "Grid electricity VIC", 0.79, "kWh", EmissionScope::Scope2),
    FactorEntry::scoped("electricityQld", "Grid electricity QLD", 0.71, "kWh", EmissionScope::Scope2),
    FactorEntry::scoped("electricitySa", "Grid electricity SA", 0.23, "kWh", EmissionScope::Scope2),
    FactorEntry::scoped("electricityWa", "Grid electricity WA (SWIS)", 0.51, "kWh", EmissionScope::Scope2),
    FactorEntry::scoped("electricityTas", "Grid electricity TAS", 0.15, "kWh", EmissionScope::Scope2),
    FactorEntry::scoped("electricityNt", "Grid electricity NT", 0.54, "kWh", EmissionScope::Scope2),
    // ===== 可再生 (Scope2, 零排放) =====
    FactorEntry::scoped("solarPv", "On-site solar PV", 0.0, "kWh", EmissionScope::Scope2),
    FactorEntry::scoped("windPpa", "Wind power purchase agreement", 0.0, "kWh", EmissionScope::Scope2),
    FactorEntry::scoped("greenPower", "GreenPower accredited electricity", 0.0, "kWh", EmissionScope::Scope2),
    // ===== 燃料燃烧 (Scope1) =====
    FactorEntry::scoped("naturalGas", "Natural gas (pipeline)", 0.0514, "MJ", EmissionScope::Scope1),
    FactorEntry::scoped("lpg", "Liquefied petroleum gas", 1.56, "L", EmissionScope::Scope1),
    FactorEntry::scoped("diesel", "Diesel oil", 2.70, "L", EmissionScope::Scope1),
    FactorEntry::scoped("petrol", "Petrol", 2.31, "L", EmissionScope::Scope1),
];

/// 可再生能源类型键关键字（小写匹配）
pub const RENEWABLE_KEYWORDS: &[&str] = &["solar", "wind", "renewable", "greenpower", "hydro"];

/// 判断能源类型是否为可再生能源
pub fn is_renewable(item_type: &str) -> bool {
    let lower = item_type.to_lowercase();
    RENEWABLE_KEYWORDS.iter().any(|k| lower.contains(k))
}
