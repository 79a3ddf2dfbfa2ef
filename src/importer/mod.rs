// ==========================================
// 库存差异分析 - 导入层
// ==========================================
// 职责: 外部库存文件导入, 生成宽表
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod inventory_importer;
pub mod inventory_importer_trait;
pub mod inventory_validator;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{decode_bytes, CsvParser, ExcelParser, SourceEncoding, UniversalFileParser};
pub use inventory_importer::{FileInfo, InventoryImporter};
pub use inventory_validator::InventoryValidator;

// 重导出 Trait 接口
pub use inventory_importer_trait::{WideTableParser, WideTableValidator};
