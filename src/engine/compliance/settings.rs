// ==========================================
// 建筑碳排放核算系统 - 合规阈值参数
// ==========================================
// 来源: config_kv（见 config::config_keys）, 缺省值如下
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSettings {
    /// NCC: 建材平均因子上限 (kg CO2e / 单位)
    pub ncc_max_avg_material_factor: f64,
    /// NCC: 明细数量下限（严格大于）
    pub ncc_min_quantity: f64,
    /// NABERS: 合规最低星级
    pub nabers_min_star_rating: u8,
    /// NABERS: 可再生电力最低占比
    pub nabers_min_renewable_share: f64,
    /// NABERS: 燃气排放最高占比
    pub nabers_max_gas_share: f64,
    /// NABERS: 运行能耗排放上限 (kg CO2e)
    pub nabers_max_energy_emissions: f64,
}

impl Default for ComplianceSettings {
    fn default() -> Self {
        Self {
            ncc_max_avg_material_factor: 1.0,
            ncc_min_quantity: 0.0,
            nabers_min_star_rating: 4,
            nabers_min_renewable_share: 0.2,
            nabers_max_gas_share: 0.3,
            nabers_max_energy_emissions: 50_000.0,
        }
    }
}
