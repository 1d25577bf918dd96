// ==========================================
// ConfigManager 测试
// ==========================================
// 测试目标: 默认值、覆盖值、非法值回落、配置快照
// ==========================================

mod test_helpers;

use carbon_compliance::config::{config_keys, CarbonConfigReader, ConfigManager};
use carbon_compliance::domain::ScopeSplit;
use carbon_compliance::engine::{AggregatorSettings, ComplianceSettings, RemoteSettings};
use carbon_compliance::logging;
use std::time::Duration;
use test_helpers::{create_test_db, insert_test_config, open_test_connection, set_config};

#[tokio::test]
async fn test_defaults_when_config_empty() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let compliance = config
        .get_compliance_settings()
        .await
        .expect("Failed to load compliance settings");
    assert_eq!(compliance, ComplianceSettings::default());

    let aggregator = config
        .get_aggregator_settings()
        .await
        .expect("Failed to load aggregator settings");
    assert_eq!(aggregator, AggregatorSettings::default());

    let remote = config
        .get_remote_settings()
        .await
        .expect("Failed to load remote settings");
    assert_eq!(remote.cache_ttl, RemoteSettings::default().cache_ttl);
    assert_eq!(remote.rate_limit_per_minute, 30);
}

#[tokio::test]
async fn test_overrides_from_config_kv() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open connection");
    insert_test_config(&conn).expect("Failed to insert config");

    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let compliance = config
        .get_compliance_settings()
        .await
        .expect("Failed to load compliance settings");
    assert_eq!(compliance.ncc_max_avg_material_factor, 0.8);
    assert_eq!(compliance.nabers_min_star_rating, 3);
    assert_eq!(compliance.nabers_min_renewable_share, 0.25);
    // 未配置的键仍为默认值
    assert_eq!(compliance.nabers_max_gas_share, 0.3);

    let aggregator = config
        .get_aggregator_settings()
        .await
        .expect("Failed to load aggregator settings");
    assert_eq!(aggregator.material_split, ScopeSplit::new(0.2, 0.2, 0.6));
    assert_eq!(aggregator.transport_split, ScopeSplit::TRANSPORT);
    assert!(aggregator.strict_factor_resolution);

    let remote = config
        .get_remote_settings()
        .await
        .expect("Failed to load remote settings");
    assert_eq!(remote.cache_ttl, Duration::ZERO);
    assert_eq!(remote.rate_limit_per_minute, 10);
}

#[test]
fn test_malformed_values_fall_back_to_defaults() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open connection");

    set_config(&conn, config_keys::NCC_MAX_AVG_MATERIAL_FACTOR, "abc").expect("Failed to set config");
    set_config(&conn, config_keys::NABERS_MIN_STAR_RATING, "9").expect("Failed to set config");
    set_config(&conn, config_keys::NABERS_MIN_RENEWABLE_SHARE, "1.5").expect("Failed to set config");
    set_config(&conn, config_keys::NABERS_MAX_ENERGY_EMISSIONS, "-10").expect("Failed to set config");
    set_config(&conn, config_keys::MATERIAL_SCOPE_SPLIT, "0.5,0.5,0.5").expect("Failed to set config");
    set_config(&conn, config_keys::STRICT_FACTOR_RESOLUTION, "yes").expect("Failed to set config");

    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let compliance = config
        .load_compliance_settings()
        .expect("Failed to load compliance settings");
    assert_eq!(compliance, ComplianceSettings::default());

    let aggregator = config
        .load_aggregator_settings()
        .expect("Failed to load aggregator settings");
    assert_eq!(aggregator, AggregatorSettings::default());
}

#[test]
fn test_non_finite_thresholds_fall_back_to_defaults() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open connection");

    set_config(&conn, config_keys::NCC_MIN_QUANTITY, "NaN").expect("Failed to set config");
    set_config(&conn, config_keys::NCC_MAX_AVG_MATERIAL_FACTOR, "inf").expect("Failed to set config");
    set_config(&conn, config_keys::NABERS_MAX_ENERGY_EMISSIONS, "NaN").expect("Failed to set config");

    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let compliance = config
        .load_compliance_settings()
        .expect("Failed to load compliance settings");
    assert_eq!(compliance, ComplianceSettings::default());

    // 负数下限同样回落
    set_config(&conn, config_keys::NCC_MIN_QUANTITY, "-1").expect("Failed to set config");
    let compliance = config
        .load_compliance_settings()
        .expect("Failed to load compliance settings");
    assert_eq!(compliance.ncc_min_quantity, ComplianceSettings::default().ncc_min_quantity);

    // 0 是合法的数量下限
    set_config(&conn, config_keys::NCC_MIN_QUANTITY, "0").expect("Failed to set config");
    let compliance = config
        .load_compliance_settings()
        .expect("Failed to load compliance settings");
    assert_eq!(compliance.ncc_min_quantity, 0.0);
}

#[test]
fn test_set_value_and_snapshot() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    config
        .set_global_config_value(config_keys::NABERS_MIN_STAR_RATING, "5")
        .expect("Failed to set value");
    config
        .set_global_config_value(config_keys::NABERS_MIN_STAR_RATING, "2")
        .expect("Failed to update value");
    config
        .set_global_config_value(config_keys::NCC_MIN_QUANTITY, "0.5")
        .expect("Failed to set value");

    assert_eq!(
        config
            .get_global_config_value(config_keys::NABERS_MIN_STAR_RATING)
            .expect("Failed to read value"),
        Some("2".to_string())
    );
    assert!(config
        .get_global_config_value("missing_key")
        .expect("Failed to read value")
        .is_none());

    let snapshot = config.get_config_snapshot().expect("Failed to take snapshot");
    let parsed: serde_json::Value = serde_json::from_str(&snapshot).expect("snapshot is JSON");
    assert_eq!(parsed[config_keys::NABERS_MIN_STAR_RATING], "2");
    assert_eq!(parsed[config_keys::NCC_MIN_QUANTITY], "0.5");
    assert_eq!(parsed.as_object().map(|o| o.len()), Some(2));

    let loaded = config
        .load_compliance_settings()
        .expect("Failed to load compliance settings");
    assert_eq!(loaded.nabers_min_star_rating, 2);
    assert_eq!(loaded.ncc_min_quantity, 0.5);
}
