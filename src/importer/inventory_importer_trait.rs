// ==========================================
// 库存差异分析 - 导入 Trait
// ==========================================
// 职责: 定义宽表解析/校验接口（不包含实现）
// ==========================================

use crate::domain::inventory::WideTable;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// WideTableParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait WideTableParser: Send + Sync {
    /// 解析文件为宽表
    ///
    /// # 参数
    /// - file_path: 文件路径
    ///
    /// # 返回
    /// - Ok(WideTable): 表头 + 数据行（已跳过全空行）
    /// - Err: 文件不存在、格式错误、编码错误
    fn parse_wide_table(&self, file_path: &Path) -> ImportResult<WideTable>;
}

// ==========================================
// WideTableValidator Trait
// ==========================================
// 用途: 输入结构校验（阶段 1）
// 实现者: InventoryValidator
pub trait WideTableValidator: Send + Sync {
    /// 校验宽表结构
    ///
    /// # 规则
    /// 1. 至少一行数据
    /// 2. 至少 2 列
    /// 3. 第一列之后至少一列以 -U / -C 结尾
    ///
    /// # 返回
    /// - Ok(usize): 检测到的仓库列数
    /// - Err: EmptyFile / TooFewColumns / NoStoreColumns
    fn validate(&self, table: &WideTable, source: &str) -> ImportResult<usize>;
}
