// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================
#![allow(dead_code)]

use carbon_compliance::db::{ensure_schema, open_sqlite_connection};
use carbon_compliance::domain::{EnergyLineItem, MaterialLineItem, ProjectInput, TransportLineItem};
use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径非 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 插入测试配置数据
pub fn insert_test_config(conn: &Connection) -> Result<(), Box<dyn Error>> {
    conn.execute(
        r#"
        INSERT OR REPLACE INTO config_kv (scope_id, key, value, updated_at) VALUES
        ('global', 'ncc_max_avg_material_factor', '0.8', datetime('now')),
        ('global', 'nabers_min_star_rating', '3', datetime('now')),
        ('global', 'nabers_min_renewable_share', '0.25', datetime('now')),
        ('global', 'material_scope_split', '0.2,0.2,0.6', datetime('now')),
        ('global', 'strict_factor_resolution', 'true', datetime('now')),
        ('global', 'remote_cache_ttl_secs', '0', datetime('now')),
        ('global', 'remote_rate_limit_per_minute', '10', datetime('now'))
        "#,
        [],
    )?;
    Ok(())
}

/// 写入单个全局配置
pub fn set_config(conn: &Connection, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
        [key, value],
    )?;
    Ok(())
}

// ==========================================
// 测试数据
// ==========================================

/// 满足 NCC 全部规则的建材清单
pub fn compliant_materials() -> Vec<MaterialLineItem> {
    vec![
        MaterialLineItem::new("geopolymerConcrete", 1000.0, "kg"),
        MaterialLineItem::new("insulation", 50.0, "kg"),
        MaterialLineItem::new("timber", 200.0, "kg"),
    ]
}

/// 高可再生占比的能耗清单
pub fn green_energy() -> Vec<EnergyLineItem> {
    vec![
        EnergyLineItem::new("electricityNsw", 6000.0, "kWh"),
        EnergyLineItem::new("solarPv", 4000.0, "kWh"),
    ]
}

/// 典型项目输入
pub fn sample_project(project_id: &str) -> ProjectInput {
    ProjectInput {
        project_id: project_id.to_string(),
        project_name: Some("Parramatta Office Fitout".to_string()),
        materials: vec![
            MaterialLineItem::new("concrete", 1000.0, "kg"),
            MaterialLineItem::new("steel", 200.0, "kg"),
            MaterialLineItem::new("insulation", 40.0, "kg"),
        ],
        transport: vec![TransportLineItem::new("ausTruck", 100.0).with_weight(12.0)],
        energy: vec![
            EnergyLineItem::new("electricityNsw", 1000.0, "kWh"),
            EnergyLineItem::new("solarPv", 500.0, "kWh"),
        ],
        ..Default::default()
    }
}
