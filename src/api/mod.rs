// ==========================================
// 建筑碳排放核算系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口, 供 CLI 及上层调用
// ==========================================

pub mod carbon_api;
pub mod error;

// 重导出核心类型
pub use carbon_api::CarbonApi;
pub use error::{ApiError, ApiResult};
