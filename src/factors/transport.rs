// ==========================================
// 建筑碳排放核算系统 - 运输排放因子表
// ==========================================
// 口径: kg CO2e / 吨公里（无载重时按单位重量, 即 kg CO2e / km）
// ==========================================

use crate::factors::FactorEntry;

pub static TRANSPORT_FACTORS: &[FactorEntry] = &[
    FactorEntry::new("ausTruck", "Articulated truck (Australia average)", 0.089, "t-km"),
    FactorEntry::new("rigidTruck", "Rigid truck", 0.205, "t-km"),
    FactorEntry::new("lightCommercial", "Light commercial vehicle", 0.451, "t-km"),
    FactorEntry::new("concreteAgitator", "Concrete agitator truck", 0.312, "t-km"),
    FactorEntry::new("rail", "Rail freight", 0.022, "t-km"),
    FactorEntry::new("coastalShipping", "Coastal shipping", 0.0108, "t-km"),
    FactorEntry::new("internationalShipping", "International container shipping", 0.0161, "t-km"),
    FactorEntry::new("airFreight", "Air freight", 1.13, "t-km"),
];
