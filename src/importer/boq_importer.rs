// ==========================================
// 建筑碳排放核算系统 - 工程量清单导入
// ==========================================
// 职责: 原始行记录 → MaterialLineItem
// 列: type / quantity / unit 必需, carbon_footprint 可选
// 列名匹配: 忽略大小写, 接受常见别名
// ==========================================

use crate::domain::line_item::MaterialLineItem;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRecord, UniversalFileParser};
use std::path::Path;

const TYPE_COLUMNS: &[&str] = &["type", "material", "item_type", "material_type"];
const QUANTITY_COLUMNS: &[&str] = &["quantity", "qty", "amount"];
const UNIT_COLUMNS: &[&str] = &["unit", "units", "uom"];
const FOOTPRINT_COLUMNS: &[&str] = &["carbon_footprint", "carbonfootprint", "factor", "gwp"];

/// 在记录中按别名查找列值（别名靠前者优先）
fn lookup<'a>(record: &'a RawRecord, aliases: &[&str]) -> Option<&'a str> {
    aliases.iter().find_map(|alias| {
        record
            .fields
            .iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(alias))
            .map(|(_, v)| v.as_str())
    })
}

fn has_column(records: &[RawRecord], aliases: &[&str]) -> bool {
    records.iter().any(|r| lookup(r, aliases).is_some())
}

fn parse_number(row: usize, field: &str, raw: &str) -> ImportResult<f64> {
    let cleaned = raw.replace(',', "");
    let value = cleaned
        .trim()
        .parse::<f64>()
        .map_err(|e| ImportError::TypeConversionError {
            row,
            field: field.to_string(),
            message: format!("'{}': {}", raw, e),
        })?;
    if !value.is_finite() || value < 0.0 {
        return Err(ImportError::TypeConversionError {
            row,
            field: field.to_string(),
            message: format!("'{}' 不是非负有限数", raw),
        });
    }
    Ok(value)
}

pub struct BoqImporter;

impl BoqImporter {
    /// 读取文件并映射
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<MaterialLineItem>> {
        let path = file_path.as_ref();
        let records = UniversalFileParser.parse(path)?;
        let items = self.map_records(&records)?;
        tracing::info!(file = %path.display(), rows = items.len(), "工程量清单导入完成");
        Ok(items)
    }

    /// 映射原始记录（任一行失败即整体失败）
    pub fn map_records(&self, records: &[RawRecord]) -> ImportResult<Vec<MaterialLineItem>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        if !has_column(records, TYPE_COLUMNS) {
            return Err(ImportError::MissingColumn("type".to_string()));
        }
        if !has_column(records, QUANTITY_COLUMNS) {
            return Err(ImportError::MissingColumn("quantity".to_string()));
        }

        records.iter().map(|r| self.map_record(r)).collect()
    }

    fn map_record(&self, record: &RawRecord) -> ImportResult<MaterialLineItem> {
        let item_type = lookup(record, TYPE_COLUMNS)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ImportError::MissingValue {
                row: record.row,
                field: "type".to_string(),
            })?;

        let quantity_raw = lookup(record, QUANTITY_COLUMNS)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ImportError::MissingValue {
                row: record.row,
                field: "quantity".to_string(),
            })?;
        let quantity = parse_number(record.row, "quantity", quantity_raw)?;

        let unit = lookup(record, UNIT_COLUMNS).unwrap_or("");

        let mut item = MaterialLineItem::new(item_type, quantity, unit);
        if let Some(raw) = lookup(record, FOOTPRINT_COLUMNS).filter(|v| !v.is_empty()) {
            item = item.with_carbon_footprint(parse_number(record.row, "carbon_footprint", raw)?);
        }
        Ok(item)
    }
}
