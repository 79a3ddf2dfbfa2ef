// ==========================================
// 库存差异分析 - 库存文件导入器实现
// ==========================================
// 流程: 解析 → 结构校验 → WideTable
// ==========================================

use crate::domain::inventory::{CellValue, WideTable};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::inventory_importer_trait::{WideTableParser, WideTableValidator};
use crate::importer::inventory_validator::InventoryValidator;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument, warn};

/// 样例行数
const SAMPLE_ROWS: usize = 3;

/// 文件信息（不做结构校验）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileInfo {
    pub path: String,
    pub exists: bool,
    pub size_bytes: u64,
    pub column_count: usize,
    pub store_column_count: usize,
    pub sample_rows: Vec<Vec<CellValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ==========================================
// InventoryImporter - 库存导入器
// ==========================================
pub struct InventoryImporter {
    parser: Box<dyn WideTableParser>,
    validator: Box<dyn WideTableValidator>,
}

impl Default for InventoryImporter {
    fn default() -> Self {
        Self::new(Box::new(UniversalFileParser), Box::new(InventoryValidator))
    }
}

impl InventoryImporter {
    /// 创建新的导入器实例
    ///
    /// # 参数
    /// - parser: 文件解析器
    /// - validator: 结构校验器
    pub fn new(parser: Box<dyn WideTableParser>, validator: Box<dyn WideTableValidator>) -> Self {
        Self { parser, validator }
    }

    /// 导入库存文件
    ///
    /// # 返回
    /// - Ok(WideTable): 通过结构校验的宽表
    /// - Err(ImportError): 读取错误或结构错误
    #[instrument(skip(self, file_path), fields(path = %file_path.as_ref().display()))]
    pub fn import<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<WideTable> {
        let path = file_path.as_ref();
        let table = self.parser.parse_wide_table(path)?;
        self.validate(&table, &path.display().to_string())?;

        info!(
            rows = table.row_count(),
            columns = table.column_count(),
            "库存文件导入成功"
        );
        Ok(table)
    }

    /// 校验已在内存中的宽表
    pub fn validate(&self, table: &WideTable, source: &str) -> ImportResult<usize> {
        self.validator.validate(table, source)
    }

    /// 获取文件信息（读取失败时记录错误, 不返回 Err）
    pub fn file_info<P: AsRef<Path>>(&self, file_path: P) -> FileInfo {
        let path = file_path.as_ref();
        let mut info = FileInfo {
            path: path.display().to_string(),
            exists: path.exists(),
            size_bytes: std::fs::metadata(path).map(|m| m.len()).unwrap_or(0),
            ..FileInfo::default()
        };

        match self.parser.parse_wide_table(path) {
            Ok(table) => {
                info.column_count = table.column_count();
                info.store_column_count = table.store_columns().len();
                info.sample_rows = table.rows.into_iter().take(SAMPLE_ROWS).collect();
            }
            Err(e) => {
                warn!(path = %info.path, error = %e, "获取文件信息失败");
                info.error = Some(e.to_string());
            }
        }

        info
    }
}
