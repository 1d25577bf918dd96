// ==========================================
// 建筑碳排放核算系统 - CSV 导出
// ==========================================
// 表头: category,field,value
// 行序: summary → scope → 分项明细（键序）→ unresolved → compliance → violation → epd
// ==========================================

use crate::export::{ExportError, ExportResult, ReportBundle};
use csv::Writer;
use std::collections::BTreeMap;

struct Rows<W: std::io::Write> {
    wtr: Writer<W>,
}

impl<W: std::io::Write> Rows<W> {
    fn push(&mut self, category: &str, field: &str, value: impl ToString) -> ExportResult<()> {
        let value = value.to_string();
        self.wtr.write_record([category, field, value.as_str()])?;
        Ok(())
    }

    fn push_map(&mut self, category: &str, map: &BTreeMap<String, f64>) -> ExportResult<()> {
        for (key, value) in map {
            self.push(category, key, value)?;
        }
        Ok(())
    }
}

pub fn to_csv_string(bundle: &ReportBundle) -> ExportResult<String> {
    let mut rows = Rows {
        wtr: Writer::from_writer(Vec::new()),
    };
    rows.wtr.write_record(["category", "field", "value"])?;

    let calc = &bundle.calculation;

    // ===== 汇总 =====
    rows.push("summary", "project_id", &bundle.project_id)?;
    rows.push(
        "summary",
        "project_name",
        bundle.project_name.as_deref().unwrap_or(""),
    )?;
    rows.push(
        "summary",
        "generated_at",
        bundle.generated_at.format("%Y-%m-%d %H:%M:%S"),
    )?;
    rows.push("summary", "material_emissions", calc.material_emissions)?;
    rows.push("summary", "transport_emissions", calc.transport_emissions)?;
    rows.push("summary", "energy_emissions", calc.energy_emissions)?;
    rows.push("summary", "total_emissions", calc.total_emissions)?;

    // ===== 范围 =====
    rows.push("scope", "scope1", calc.scopes.scope1)?;
    rows.push("scope", "scope2", calc.scopes.scope2)?;
    rows.push("scope", "scope3", calc.scopes.scope3)?;
    rows.push("scope", "estimated", calc.scopes.estimated)?;

    // ===== 分项 =====
    rows.push_map("material", &calc.breakdown_by_material)?;
    rows.push_map("transport", &calc.breakdown_by_transport)?;
    rows.push_map("energy", &calc.breakdown_by_energy)?;

    for unresolved in &calc.unresolved {
        rows.push("unresolved", unresolved.category.as_str(), &unresolved.item_type)?;
    }

    // ===== 合规 =====
    if let Some(report) = &bundle.compliance {
        rows.push("compliance", "ncc_score", report.ncc.score)?;
        rows.push("compliance", "ncc_compliant", report.ncc.compliant)?;
        rows.push("compliance", "nabers_score", report.nabers.result.score)?;
        rows.push("compliance", "nabers_star_rating", report.nabers.star_rating)?;
        rows.push("compliance", "nabers_compliant", report.nabers.result.compliant)?;
        rows.push("compliance", "overall_score", report.overall.score)?;
        rows.push("compliance", "overall_compliant", report.overall.compliant)?;

        for (standard, violation) in report.all_violations() {
            rows.push(
                "violation",
                &format!("{}:{}", standard.as_str(), violation.rule_id),
                &violation.message,
            )?;
        }
    }

    for epd in &bundle.epds {
        rows.push("epd", &epd.epd_id, &epd.product_name)?;
    }

    let bytes = rows
        .wtr
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Csv(e.to_string()))
}
