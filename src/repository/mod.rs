// ==========================================
// 建筑碳排放核算系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口, 屏蔽数据库细节
// 约束: 所有查询使用参数化, 防止 SQL 注入
// ==========================================

pub mod compliance_repo;
pub mod error;
pub mod history_repo;
pub mod preference_repo;

// 重导出核心仓储
pub use compliance_repo::ComplianceReportRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use history_repo::CalculationHistoryRepository;
pub use preference_repo::UserPreferenceRepository;

use chrono::{NaiveDateTime, Timelike, Utc};

/// 数据库时间戳格式
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 当前 UTC 时间（秒级, 与落库精度一致）
pub(crate) fn now_naive() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

pub(crate) fn format_datetime(value: &NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// 解析失败时回落为默认值
pub(crate) fn parse_datetime(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).unwrap_or_default()
}
