// ==========================================
// 建筑碳排放核算系统 - 导入层
// ==========================================
// 职责: 工程量清单（BoQ）文件导入为建材明细
// 支持: Excel, CSV
// ==========================================

pub mod boq_importer;
pub mod error;
pub mod file_parser;

// 重导出核心类型
pub use boq_importer::BoqImporter;
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRecord, UniversalFileParser};
