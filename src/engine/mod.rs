// ==========================================
// 库存差异分析 - 引擎层
// ==========================================
// 职责: 宽表重塑 / 差异计算 / 统计分析 / 结果缓存
// 红线: 引擎无 IO, 不修改输入, 相同输入得到相同输出
// ==========================================

pub mod cache;
pub mod deficit;
pub mod error;
pub mod numeric;
pub mod reshaper;
pub mod stats;

// 重导出核心引擎
pub use cache::{content_key, AnalysisCache};
pub use deficit::{DeficitEngine, RATIO_SMOOTHING};
pub use error::{EngineError, EngineResult};
pub use reshaper::{ReshapeReport, Reshaper};
pub use stats::StatsEngine;
