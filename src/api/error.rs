// ==========================================
// 库存差异分析 - API层错误类型
// ==========================================
// 职责: 汇总各层错误, 调用方可按类别区分展示
// 分类: 未加载数据 / 导入 / 分析 / 导出 / 配置
// ==========================================

use crate::config::ConfigError;
use crate::engine::EngineError;
use crate::exporter::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("尚未加载数据, 请先导入文件")]
    NoData,

    // ==========================================
    // 分层错误
    // ==========================================
    #[error("导入失败: {0}")]
    Import(#[from] ImportError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("导出失败: {0}")]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 错误类别（供命令行等调用方区分展示）
    pub fn category(&self) -> &'static str {
        match self {
            ApiError::NoData => "no_data",
            ApiError::Import(e) if e.is_validation_error() => "input_shape",
            ApiError::Import(_) => "import",
            ApiError::Engine(EngineError::Transformation(_)) => "transformation",
            ApiError::Engine(EngineError::Analysis(_)) => "analysis",
            ApiError::Engine(EngineError::DuplicateEntry { .. }) => "input_shape",
            ApiError::Export(_) => "export",
            ApiError::Config(_) => "config",
            ApiError::Other(_) => "internal",
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
