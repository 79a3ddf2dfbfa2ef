// ==========================================
// 库存差异分析 - 领域模型层
// ==========================================
// 职责: 定义宽表/长表/差异表实体与统计结构
// 红线: 不含文件读写逻辑,不含计算逻辑
// ==========================================

pub mod deficit;
pub mod inventory;
pub mod stats;
pub mod types;

// 重导出核心类型
pub use deficit::{
    AnalysisMetadata, DeficitAnalysis, DeficitRecord, DeficitSummary, ItemDeficitSummary,
    StoreDeficitSummary,
};
pub use inventory::{CellValue, LongRecord, WideTable};
pub use stats::{
    DataOverview, DistributionReport, InventoryStats, KindBreakdown, KindComparison,
    KindComparisonRow, OutlierReport, RankedQuantity, StoreDetails, TopRanking,
};
pub use types::{DataKind, DeficitKind, DuplicatePolicy, ExploitationBand};
