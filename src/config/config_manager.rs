// ==========================================
// 建筑碳排放核算系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::carbon_config_trait::CarbonConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::calculation::ScopeSplit;
use crate::engine::aggregator::AggregatorSettings;
use crate::engine::compliance::ComplianceSettings;
use crate::engine::enhanced::RemoteSettings;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式, 按键排序）
    ///
    /// # 用途
    /// - 随合规报告存档, 便于追溯评估时的阈值
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key"
        )?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    /// 读取并解析配置, 非法值回落默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                tracing::warn!(key, value = %raw, "配置值非法, 使用默认值");
                Ok(default)
            }
        }
    }

    /// 读取 [0, 1] 区间的比例配置
    fn get_share_or_default(&self, key: &str, default: f64) -> Result<f64, Box<dyn Error>> {
        let value = self.get_parsed_or_default(key, default)?;
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            tracing::warn!(key, value, "比例配置超出 [0, 1], 使用默认值");
            Ok(default)
        }
    }

    /// 读取有限数值配置; 非有限值或低于下限（positive 时需大于 0）回落默认值
    fn get_bounded_or_default(
        &self,
        key: &str,
        default: f64,
        positive: bool,
    ) -> Result<f64, Box<dyn Error>> {
        let value = self.get_parsed_or_default(key, default)?;
        let in_range = if positive { value > 0.0 } else { value >= 0.0 };
        if value.is_finite() && in_range {
            Ok(value)
        } else {
            tracing::warn!(key, value, "数值配置非有限或超出下限, 使用默认值");
            Ok(default)
        }
    }

    fn get_split_or_default(&self, key: &str, default: ScopeSplit) -> Result<ScopeSplit, Box<dyn Error>> {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };
        match ScopeSplit::parse(&raw) {
            Some(split) => Ok(split),
            None => {
                tracing::warn!(key, value = %raw, "范围拆分配置非法, 使用默认值");
                Ok(default)
            }
        }
    }

    // ==========================================
    // 同步加载（供 AppState 初始化使用）
    // ==========================================

    pub fn load_compliance_settings(&self) -> Result<ComplianceSettings, Box<dyn Error>> {
        let defaults = ComplianceSettings::default();

        let star = self.get_parsed_or_default(
            config_keys::NABERS_MIN_STAR_RATING,
            defaults.nabers_min_star_rating,
        )?;

        Ok(ComplianceSettings {
            ncc_max_avg_material_factor: self.get_bounded_or_default(
                config_keys::NCC_MAX_AVG_MATERIAL_FACTOR,
                defaults.ncc_max_avg_material_factor,
                true,
            )?,
            ncc_min_quantity: self.get_bounded_or_default(
                config_keys::NCC_MIN_QUANTITY,
                defaults.ncc_min_quantity,
                false,
            )?,
            nabers_min_star_rating: if star <= 5 {
                star
            } else {
                tracing::warn!(value = star, "星级配置超出 0-5, 使用默认值");
                defaults.nabers_min_star_rating
            },
            nabers_min_renewable_share: self.get_share_or_default(
                config_keys::NABERS_MIN_RENEWABLE_SHARE,
                defaults.nabers_min_renewable_share,
            )?,
            nabers_max_gas_share: self.get_share_or_default(
                config_keys::NABERS_MAX_GAS_SHARE,
                defaults.nabers_max_gas_share,
            )?,
            nabers_max_energy_emissions: self.get_bounded_or_default(
                config_keys::NABERS_MAX_ENERGY_EMISSIONS,
                defaults.nabers_max_energy_emissions,
                true,
            )?,
        })
    }

    pub fn load_aggregator_settings(&self) -> Result<AggregatorSettings, Box<dyn Error>> {
        let defaults = AggregatorSettings::default();
        Ok(AggregatorSettings {
            material_split: self
                .get_split_or_default(config_keys::MATERIAL_SCOPE_SPLIT, defaults.material_split)?,
            transport_split: self
                .get_split_or_default(config_keys::TRANSPORT_SCOPE_SPLIT, defaults.transport_split)?,
            strict_factor_resolution: self.get_parsed_or_default(
                config_keys::STRICT_FACTOR_RESOLUTION,
                defaults.strict_factor_resolution,
            )?,
        })
    }

    pub fn load_remote_settings(&self) -> Result<RemoteSettings, Box<dyn Error>> {
        let defaults = RemoteSettings::default();
        let ttl_secs = self.get_parsed_or_default(
            config_keys::REMOTE_CACHE_TTL_SECS,
            defaults.cache_ttl.as_secs(),
        )?;
        Ok(RemoteSettings {
            cache_ttl: Duration::from_secs(ttl_secs),
            cache_max_entries: defaults.cache_max_entries,
            rate_limit_per_minute: self.get_parsed_or_default(
                config_keys::REMOTE_RATE_LIMIT_PER_MINUTE,
                defaults.rate_limit_per_minute,
            )?,
        })
    }
}

#[async_trait]
impl CarbonConfigReader for ConfigManager {
    async fn get_compliance_settings(&self) -> Result<ComplianceSettings, Box<dyn Error>> {
        self.load_compliance_settings()
    }

    async fn get_aggregator_settings(&self) -> Result<AggregatorSettings, Box<dyn Error>> {
        self.load_aggregator_settings()
    }

    async fn get_remote_settings(&self) -> Result<RemoteSettings, Box<dyn Error>> {
        self.load_remote_settings()
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // NCC 2025
    pub const NCC_MAX_AVG_MATERIAL_FACTOR: &str = "ncc_max_avg_material_factor";
    pub const NCC_MIN_QUANTITY: &str = "ncc_min_quantity";

    // NABERS
    pub const NABERS_MIN_STAR_RATING: &str = "nabers_min_star_rating";
    pub const NABERS_MIN_RENEWABLE_SHARE: &str = "nabers_min_renewable_share";
    pub const NABERS_MAX_GAS_SHARE: &str = "nabers_max_gas_share";
    pub const NABERS_MAX_ENERGY_EMISSIONS: &str = "nabers_max_energy_emissions";

    // 核算汇总
    pub const MATERIAL_SCOPE_SPLIT: &str = "material_scope_split";
    pub const TRANSPORT_SCOPE_SPLIT: &str = "transport_scope_split";
    pub const STRICT_FACTOR_RESOLUTION: &str = "strict_factor_resolution";

    // 远程校验
    pub const REMOTE_CACHE_TTL_SECS: &str = "remote_cache_ttl_secs";
    pub const REMOTE_RATE_LIMIT_PER_MINUTE: &str = "remote_rate_limit_per_minute";
}
