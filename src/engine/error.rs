// ==========================================
// 库存差异分析 - 引擎层错误类型
// ==========================================
// 分类: 重塑错误 / 分析错误 / 重复键（输入结构错误）
// 红线: 非数值单元格不是错误, 在重塑阶段按缺失处理
// ==========================================

use crate::domain::types::DataKind;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 宽表 → 长表重塑失败
    #[error("数据重塑失败: {0}")]
    Transformation(String),

    /// 差异/统计分析失败（如空输入）
    #[error("分析失败: {0}")]
    Analysis(String),

    /// 重复键（DuplicatePolicy::Reject）
    #[error("重复记录: magasin={magasin}, nomenclature={nomenclature}, type={kind}")]
    DuplicateEntry {
        magasin: String,
        nomenclature: String,
        kind: DataKind,
    },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
