// ==========================================
// 库存差异分析 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 读取错误 / 输入结构错误（DataValidation）
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 输入结构错误 =====
    #[error("文件为空: {0}")]
    EmptyFile(String),

    #[error("列数不足: {path} 至少需要 2 列（nomenclature + 仓库列），实际 {found}")]
    TooFewColumns { path: String, found: usize },

    #[error("未找到以 -U 或 -C 结尾的仓库列: {0}")]
    NoStoreColumns(String),
}

impl ImportError {
    /// 是否为输入结构错误（不可恢复，直接返回调用方）
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ImportError::EmptyFile(_)
                | ImportError::TooFewColumns { .. }
                | ImportError::NoStoreColumns(_)
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
