// ==========================================
// 建筑碳排放核算系统 - 配置读取 Trait
// ==========================================
// 职责: 定义引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::engine::aggregator::AggregatorSettings;
use crate::engine::compliance::ComplianceSettings;
use crate::engine::enhanced::RemoteSettings;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// CarbonConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
// 约定: 键缺失 → 默认值; 值非法 → 告警日志 + 默认值
#[async_trait]
pub trait CarbonConfigReader: Send + Sync {
    /// 合规阈值
    ///
    /// # 默认值
    /// - ncc_max_avg_material_factor = 1.0
    /// - nabers_min_star_rating = 4
    async fn get_compliance_settings(&self) -> Result<ComplianceSettings, Box<dyn Error>>;

    /// 范围拆分比例与因子解析模式
    ///
    /// # 默认值
    /// - material_scope_split = "0.1,0.2,0.7"
    /// - transport_scope_split = "0.3,0,0.7"
    /// - strict_factor_resolution = false
    async fn get_aggregator_settings(&self) -> Result<AggregatorSettings, Box<dyn Error>>;

    /// 远程校验缓存 TTL 与限流
    async fn get_remote_settings(&self) -> Result<RemoteSettings, Box<dyn Error>>;
}
