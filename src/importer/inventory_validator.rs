// ==========================================
// 库存差异分析 - 宽表结构校验器实现
// ==========================================
// 职责: DataValidation 规则（空表 / 列数 / 仓库列后缀）
// 红线: 只校验结构, 不校验单元格数值（数值问题在重塑阶段按缺失处理）
// ==========================================

use crate::domain::inventory::WideTable;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::inventory_importer_trait::WideTableValidator;
use tracing::info;

pub struct InventoryValidator;

impl WideTableValidator for InventoryValidator {
    fn validate(&self, table: &WideTable, source: &str) -> ImportResult<usize> {
        if table.is_empty() {
            return Err(ImportError::EmptyFile(source.to_string()));
        }

        if table.column_count() < 2 {
            return Err(ImportError::TooFewColumns {
                path: source.to_string(),
                found: table.column_count(),
            });
        }

        let store_columns = table.store_columns().len();
        if store_columns == 0 {
            return Err(ImportError::NoStoreColumns(source.to_string()));
        }

        info!(source = %source, store_columns, "结构校验通过");
        Ok(store_columns)
    }
}
