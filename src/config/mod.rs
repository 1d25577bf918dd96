// ==========================================
// 建筑碳排放核算系统 - 配置层
// ==========================================
// 职责: 合规阈值/范围拆分/远程校验参数管理
// 存储: config_kv 表
// ==========================================

pub mod carbon_config_trait;
pub mod config_manager;

// 重导出核心配置管理器
pub use carbon_config_trait::CarbonConfigReader;
pub use config_manager::{config_keys, ConfigManager};
