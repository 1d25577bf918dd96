// ==========================================
// API 层端到端测试
// ==========================================
// 测试目标: AppState 组装 → 核算存档 → 合规存档/告警 → 目标进度 → 导入导出
// ==========================================

mod test_helpers;

use carbon_compliance::api::ApiError;
use carbon_compliance::app::AppState;
use carbon_compliance::domain::{Epd, UserGoal};
use carbon_compliance::export::{json_export, ExportFormat};
use carbon_compliance::{logging, EmissionCategory};
use chrono::{Duration, Utc};
use std::io::Write;
use tempfile::Builder;
use test_helpers::{create_test_db, open_test_connection, sample_project, set_config};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

fn create_state(db_path: &str) -> AppState {
    AppState::new(db_path.to_string()).expect("Failed to create AppState")
}

#[test]
fn test_calculate_and_save_history() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = create_state(&db_path);
    let api = &state.carbon_api;

    let input = sample_project("P-API-001");
    let first = api
        .calculate_and_save("alice", &input)
        .expect("Failed to calculate");
    assert!(approx(first.total_emissions(), 1258.2));

    // 第二次核算: 去掉钢材
    let mut improved = input.clone();
    improved.materials.retain(|m| m.item_type != "steel");
    let second = api
        .calculate_and_save("alice", &improved)
        .expect("Failed to calculate");
    assert!(approx(second.total_emissions(), 948.2));

    let summary = api.history_summary("P-API-001").expect("Failed to summarize");
    assert_eq!(summary.count, 2);
    assert!(approx(summary.min_total, 948.2));
    assert!(approx(summary.max_total, 1258.2));
    assert_eq!(summary.latest_total.map(|v| approx(v, 948.2)), Some(true));
    let trend = summary.trend_pct.expect("trend with two records");
    assert!(approx(trend, (948.2 - 1258.2) / 1258.2 * 100.0));

    // 空 project_id 拒绝写入
    let mut anonymous = input;
    anonymous.project_id = " ".to_string();
    assert!(matches!(
        api.calculate_and_save("alice", &anonymous),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_goal_progress() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = create_state(&db_path);
    let api = &state.carbon_api;

    // 无目标 → NotFound
    assert!(matches!(
        api.goal_progress("alice", "P-API-002"),
        Err(ApiError::NotFound(_))
    ));

    api.set_goal(&UserGoal {
        user_id: "alice".to_string(),
        project_id: "P-API-002".to_string(),
        baseline_emissions: 1500.0,
        target_reduction_pct: 20.0,
        target_date: None,
    })
    .expect("Failed to set goal");

    // 有目标无历史 → NotFound
    assert!(matches!(
        api.goal_progress("alice", "P-API-002"),
        Err(ApiError::NotFound(_))
    ));

    api.calculate_and_save("alice", &sample_project("P-API-002"))
        .expect("Failed to calculate");

    let progress = api
        .goal_progress("alice", "P-API-002")
        .expect("Failed to compute progress");
    assert!(approx(progress.target_emissions, 1200.0));
    assert!(approx(progress.current_emissions, 1258.2));
    // (1500 - 1258.2) / 1500 = 16.12%, 目标 20% 的 80.6%
    assert!(approx(progress.reduction_achieved_pct, 16.12));
    assert!(approx(progress.progress_pct, 80.6));
    assert!(!progress.on_track);

    let invalid = UserGoal {
        user_id: String::new(),
        project_id: "P-API-002".to_string(),
        baseline_emissions: 1.0,
        target_reduction_pct: 1.0,
        target_date: None,
    };
    assert!(matches!(api.set_goal(&invalid), Err(ApiError::InvalidInput(_))));
}

#[tokio::test]
async fn test_compliance_persistence_and_alerts() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open connection");
    set_config(&conn, "nabers_min_star_rating", "3").expect("Failed to set config");
    drop(conn);

    let state = create_state(&db_path);
    let api = &state.carbon_api;

    // 无保温 → NCC critical
    let mut input = sample_project("P-API-003");
    input.materials.retain(|m| m.item_type != "insulation");

    let report = api
        .check_compliance(&input, true)
        .await
        .expect("Failed to check compliance");
    assert!(!report.ncc.compliant);
    assert!(report.nabers.result.compliant);
    assert!(!report.overall.compliant);

    let alerts = api.list_open_alerts("P-API-003").expect("Failed to list alerts");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].rule_id, "ncc-thermal-performance");

    assert!(api.resolve_alert(&alerts[0].alert_id).expect("Failed to resolve"));
    assert!(api
        .list_open_alerts("P-API-003")
        .expect("Failed to list alerts")
        .is_empty());
    assert!(matches!(
        api.resolve_alert("missing-alert"),
        Err(ApiError::NotFound(_))
    ));

    // 不存档 → 不产生告警
    api.check_compliance(&input, false)
        .await
        .expect("Failed to check compliance");
    assert!(api
        .list_open_alerts("P-API-003")
        .expect("Failed to list alerts")
        .is_empty());

    // 存档要求 project_id
    input.project_id = String::new();
    assert!(matches!(
        api.check_compliance(&input, true).await,
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_export_report_with_project_epd() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = create_state(&db_path);
    let api = &state.carbon_api;

    let today = Utc::now().date_naive();
    let mut input = sample_project("P-API-004");
    input.epds.insert(
        "concrete".to_string(),
        Epd {
            epd_id: "EPD-AU-0042".to_string(),
            product_name: "Envirocrete 32".to_string(),
            manufacturer: "Acme".to_string(),
            declared_unit: "kg".to_string(),
            gwp_a1_a3: 0.05,
            program_operator: "EPD Australasia".to_string(),
            valid_from: today - Duration::days(365),
            valid_until: today + Duration::days(365),
        },
    );

    let raw = api
        .export_report(&input, ExportFormat::Json)
        .await
        .expect("Failed to export");
    let bundle = json_export::from_json_str(&raw).expect("Failed to parse export");
    assert_eq!(bundle.project_id, "P-API-004");
    assert_eq!(bundle.epds.len(), 1);
    // EPD 覆盖混凝土因子: 1000 × 0.05
    assert!(approx(bundle.calculation.breakdown_by_material["concrete"], 50.0));
    assert!(bundle.compliance.is_some());

    let csv = api
        .export_report(&input, ExportFormat::Csv)
        .await
        .expect("Failed to export");
    assert!(csv.starts_with("category,field,value"));
    assert!(csv.contains("epd,EPD-AU-0042,Envirocrete 32"));

    // 过期 EPD 被忽略, 回落标准因子
    if let Some(epd) = input.epds.get_mut("concrete") {
        epd.valid_until = today - Duration::days(1);
    }
    let result = api.calculate(&input).expect("Failed to calculate");
    assert!(approx(result.breakdown_by_material["concrete"], 107.0));
}

#[test]
fn test_import_materials_and_favorites() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = create_state(&db_path);
    let api = &state.carbon_api;

    let mut file = Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create temp file");
    writeln!(file, "type,quantity,unit").expect("Failed to write");
    writeln!(file, "clt,2400,kg").expect("Failed to write");
    writeln!(file, "glulam,600,kg").expect("Failed to write");

    let materials = api.import_materials(file.path()).expect("Failed to import");
    assert_eq!(materials.len(), 2);
    assert_eq!(materials[0].item_type, "clt");

    let bad = Builder::new()
        .suffix(".pdf")
        .tempfile()
        .expect("Failed to create temp file");
    assert!(matches!(
        api.import_materials(bad.path()),
        Err(ApiError::ImportError(_))
    ));

    assert!(api
        .add_favorite("alice", EmissionCategory::Material, "clt")
        .expect("Failed to add favorite"));
    assert!(!api
        .add_favorite("alice", EmissionCategory::Material, "clt")
        .expect("Failed to add favorite"));
    assert!(matches!(
        api.add_favorite("alice", EmissionCategory::Material, ""),
        Err(ApiError::InvalidInput(_))
    ));

    let favorites = api.list_favorites("alice").expect("Failed to list favorites");
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].item_type, "clt");
}

#[tokio::test]
async fn test_archive_and_export_share_one_evaluation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = create_state(&db_path);
    let api = &state.carbon_api;

    let input = sample_project("P-API-005");
    let raw = api
        .archive_and_export("cli", &input, ExportFormat::Json)
        .await
        .expect("Failed to archive and export");
    let bundle = json_export::from_json_str(&raw).expect("Failed to parse export");

    // 导出与存档为同一次评估
    let stored = api
        .latest_report("P-API-005")
        .expect("Failed to query report")
        .expect("report should be archived");
    assert_eq!(bundle.compliance.as_ref(), Some(&stored.report));
    assert_eq!(bundle.generated_at, stored.report.generated_at);

    let summary = api.history_summary("P-API-005").expect("Failed to summarize");
    assert_eq!(summary.count, 1);
    assert_eq!(summary.latest_total, Some(bundle.calculation.total_emissions));

    // 空 project_id 不存档
    let mut anonymous = input;
    anonymous.project_id = String::new();
    assert!(matches!(
        api.archive_and_export("cli", &anonymous, ExportFormat::Csv).await,
        Err(ApiError::InvalidInput(_))
    ));
}
