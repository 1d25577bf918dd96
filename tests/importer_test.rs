// ==========================================
// 工程量清单导入测试
// ==========================================
// 测试目标: CSV 文件 → MaterialLineItem, 错误行号与格式校验
// ==========================================

mod test_helpers;

use carbon_compliance::importer::{BoqImporter, ImportError, UniversalFileParser};
use carbon_compliance::logging;
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn write_temp(suffix: &str, lines: &[&str]) -> NamedTempFile {
    let mut temp_file = Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    for line in lines {
        writeln!(temp_file, "{}", line).expect("Failed to write line");
    }
    temp_file
}

#[test]
fn test_import_csv_bill_of_quantities() {
    logging::init_test();

    let file = write_temp(
        ".csv",
        &[
            "Material,Qty,UOM,GWP",
            "concrete,\"12,500\",kg,",
            "",
            "recycledSteel,800,kg,0.45",
            "insulation,120.5,kg,",
        ],
    );

    let items = BoqImporter
        .import_file(file.path())
        .expect("Failed to import file");

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].item_type, "concrete");
    assert_eq!(items[0].quantity, 12_500.0);
    assert_eq!(items[0].unit, "kg");
    assert_eq!(items[0].carbon_footprint, None);
    assert_eq!(items[1].carbon_footprint, Some(0.45));
    assert_eq!(items[2].quantity, 120.5);
}

#[test]
fn test_invalid_quantity_reports_source_row() {
    let file = write_temp(
        ".csv",
        &["type,quantity,unit", "timber,40,kg", "brick,-3,kg"],
    );

    let err = BoqImporter.import_file(file.path()).unwrap_err();
    match err {
        ImportError::TypeConversionError { row, field, .. } => {
            // 表头为第 1 行
            assert_eq!(row, 3);
            assert_eq!(field, "quantity");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_columns_and_values() {
    let file = write_temp(".csv", &["description,unit", "slab,m3"]);
    assert!(matches!(
        BoqImporter.import_file(file.path()),
        Err(ImportError::MissingColumn(col)) if col == "type"
    ));

    let file = write_temp(".csv", &["type,quantity,unit", "timber,,kg"]);
    assert!(matches!(
        BoqImporter.import_file(file.path()),
        Err(ImportError::MissingValue { row: 2, .. })
    ));
}

#[test]
fn test_unsupported_and_missing_files() {
    let file = write_temp(".txt", &["type,quantity", "timber,1"]);
    assert!(matches!(
        UniversalFileParser.parse(file.path()),
        Err(ImportError::UnsupportedFormat(ext)) if ext == "txt"
    ));

    assert!(matches!(
        BoqImporter.import_file("/nonexistent/boq.csv"),
        Err(ImportError::FileNotFound(_))
    ));
}
