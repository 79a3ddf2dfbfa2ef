// ==========================================
// 库存差异分析 - 导出层
// ==========================================
// 职责: 将宽表/长表/差异结果写出为 CSV 或 JSON
// 红线: 导出不改变数据, 只负责格式
// ==========================================

pub mod error;
pub mod table_exporter;

pub use error::{ExportError, ExportResult};
pub use table_exporter::{default_export_path, ExportDataset, ExportFormat, TableExporter};
