// ==========================================
// 库存差异分析 - 导出模块错误类型
// ==========================================

use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON 序列化失败: {0}")]
    Json(#[from] serde_json::Error),

    #[error("导出格式不支持: {0}（仅支持 csv/json）")]
    Unsupported(String),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
