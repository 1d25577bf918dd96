// ==========================================
// 报告导出测试
// ==========================================
// 测试目标: CSV 行序与内容、JSON 读回、写文件
// ==========================================

mod test_helpers;

use carbon_compliance::domain::{CalculationResult, Epd, MaterialLineItem, UnresolvedFactor};
use carbon_compliance::engine::{ComplianceEngine, ComplianceSettings};
use carbon_compliance::export::{
    csv_export, json_export, render, write_report, ExportError, ExportFormat, ReportBundle,
};
use carbon_compliance::factors::EmissionFactorTable;
use carbon_compliance::EmissionCategory;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use test_helpers::green_energy;

fn sample_bundle() -> ReportBundle {
    let mut calculation = CalculationResult::from_subtotals(100.0, 25.5, 12.25);
    calculation.scopes.scope1 = 10.0;
    calculation.scopes.scope2 = 32.25;
    calculation.scopes.scope3 = 95.5;
    calculation.scopes.estimated = true;
    calculation.breakdown_by_material = BTreeMap::from([
        ("timber".to_string(), 40.0),
        ("concrete".to_string(), 60.0),
    ]);
    calculation.breakdown_by_transport = BTreeMap::from([("ausTruck".to_string(), 25.5)]);
    calculation.breakdown_by_energy = BTreeMap::from([("electricityNsw".to_string(), 12.25)]);
    calculation.unresolved = vec![UnresolvedFactor {
        category: EmissionCategory::Material,
        item_type: "mystery".to_string(),
    }];

    let engine = ComplianceEngine::standard(
        Arc::new(EmissionFactorTable::standard()),
        &ComplianceSettings::default(),
    );
    // 无保温 → 一条 NCC critical 违规
    let compliance = engine.check_compliance(
        &[MaterialLineItem::new("timber", 100.0, "kg")],
        &green_energy(),
    );

    ReportBundle {
        project_id: "P-EXP-001".to_string(),
        project_name: Some("Harbour, Stage 2".to_string()),
        generated_at: NaiveDate::from_ymd_opt(2026, 5, 4)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .expect("valid datetime"),
        calculation,
        compliance: Some(compliance),
        epds: vec![Epd {
            epd_id: "EPD-AU-7".to_string(),
            product_name: "Envirocrete".to_string(),
            manufacturer: "Acme".to_string(),
            declared_unit: "m3".to_string(),
            gwp_a1_a3: 250.0,
            program_operator: "EPD Australasia".to_string(),
            valid_from: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            valid_until: NaiveDate::from_ymd_opt(2029, 1, 1).expect("valid date"),
        }],
    }
}

fn csv_rows(raw: &str) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_reader(raw.as_bytes());
    reader
        .records()
        .map(|r| {
            r.expect("valid csv row")
                .iter()
                .map(|f| f.to_string())
                .collect()
        })
        .collect()
}

#[test]
fn test_csv_header_and_row_order() {
    let raw = csv_export::to_csv_string(&sample_bundle()).expect("Failed to render csv");
    assert!(raw.starts_with("category,field,value\n"));

    let rows = csv_rows(&raw);
    let categories: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();

    // 分类按固定顺序出现, 不交错
    let mut order: Vec<&str> = Vec::new();
    for c in categories {
        if order.last() != Some(&c) {
            order.push(c);
        }
    }
    assert_eq!(
        order,
        vec![
            "summary",
            "scope",
            "material",
            "transport",
            "energy",
            "unresolved",
            "compliance",
            "violation",
            "epd"
        ]
    );

    assert_eq!(rows[0], vec!["summary", "project_id", "P-EXP-001"]);
    // 含逗号的字段被正确转义并读回
    assert_eq!(rows[1], vec!["summary", "project_name", "Harbour, Stage 2"]);
    assert_eq!(rows[2], vec!["summary", "generated_at", "2026-05-04 09:30:00"]);
    assert_eq!(rows[6], vec!["summary", "total_emissions", "137.75"]);

    // 分项按键排序
    let materials: Vec<&str> = rows
        .iter()
        .filter(|r| r[0] == "material")
        .map(|r| r[1].as_str())
        .collect();
    assert_eq!(materials, vec!["concrete", "timber"]);

    assert!(rows
        .iter()
        .any(|r| r[0] == "unresolved" && r[1] == "material" && r[2] == "mystery"));
    assert!(rows
        .iter()
        .any(|r| r[0] == "violation" && r[1] == "NCC2025:ncc-thermal-performance"));
    assert_eq!(
        rows.last().expect("epd row"),
        &vec!["epd".to_string(), "EPD-AU-7".to_string(), "Envirocrete".to_string()]
    );
}

#[test]
fn test_csv_without_compliance() {
    let mut bundle = sample_bundle();
    bundle.compliance = None;
    bundle.epds.clear();

    let rows = csv_rows(&csv_export::to_csv_string(&bundle).expect("Failed to render csv"));
    assert!(rows.iter().all(|r| r[0] != "compliance" && r[0] != "violation"));
    assert_eq!(rows.last().map(|r| r[0].as_str()), Some("unresolved"));
}

#[test]
fn test_json_reads_back() {
    let bundle = sample_bundle();
    let raw = json_export::to_json_string(&bundle).expect("Failed to render json");
    assert!(raw.contains("\"projectId\": \"P-EXP-001\""));

    let parsed = json_export::from_json_str(&raw).expect("Failed to parse json");
    assert_eq!(parsed, bundle);

    assert!(matches!(
        json_export::from_json_str("{\"projectId\": 1}"),
        Err(ExportError::Json(_))
    ));
}

#[test]
fn test_write_report_to_file() {
    let bundle = sample_bundle();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let format: ExportFormat = "CSV".parse().expect("Failed to parse format");
    let path = dir.path().join(format!("report.{}", format.extension()));

    write_report(&path, &bundle, format).expect("Failed to write report");

    let written = std::fs::read_to_string(&path).expect("Failed to read report");
    assert_eq!(written, render(&bundle, ExportFormat::Csv).expect("Failed to render"));
}
