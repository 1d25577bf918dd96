// ==========================================
// 建筑碳排放核算系统 - 环境产品声明 (EPD)
// ==========================================
// 依据: ISO 14025 / EN 15804 A1-A3 阶段
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 环境产品声明
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Epd {
    pub epd_id: String,
    pub product_name: String,
    pub manufacturer: String,
    /// 声明单位（如 "m3", "t", "kg"）
    pub declared_unit: String,
    /// A1-A3 全球变暖潜势 (kg CO2e / 声明单位)
    pub gwp_a1_a3: f64,
    pub program_operator: String,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
}

impl Epd {
    /// 判断在指定日期是否有效（含首尾）
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        date >= self.valid_from && date <= self.valid_until
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_window_inclusive() {
        let epd = Epd {
            epd_id: "S-P-01234".to_string(),
            product_name: "Low carbon concrete 32MPa".to_string(),
            manufacturer: "Acme Concrete".to_string(),
            declared_unit: "m3".to_string(),
            gwp_a1_a3: 245.0,
            program_operator: "EPD Australasia".to_string(),
            valid_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            valid_until: NaiveDate::from_ymd_opt(2028, 12, 31).unwrap(),
        };

        assert!(epd.is_valid_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(epd.is_valid_on(NaiveDate::from_ymd_opt(2028, 12, 31).unwrap()));
        assert!(!epd.is_valid_on(NaiveDate::from_ymd_opt(2029, 1, 1).unwrap()));
    }
}
