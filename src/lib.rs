// ==========================================
// 库存差异分析 - 核心库
// ==========================================
// 流程: 宽表导入 → 长表重塑 → U/C 全外连接 → 差异汇总
// 符号约定: deficit = stock - exploitation
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部文件
pub mod importer;

// 引擎层 - 重塑/差异/统计
pub mod engine;

// 配置层 - 分析参数
pub mod config;

// 导出层 - CSV/JSON
pub mod exporter;

// 日志系统
pub mod logging;

// API 层 - 分析会话
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DataKind, DeficitKind, DuplicatePolicy, ExploitationBand};

// 领域实体
pub use domain::{
    CellValue, DeficitAnalysis, DeficitRecord, DeficitSummary, LongRecord, StoreDeficitSummary,
    WideTable,
};

// 引擎
pub use engine::{AnalysisCache, DeficitEngine, EngineError, Reshaper, StatsEngine};

// API
pub use api::{ApiError, ApiResult, InventorySession};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "库存差异分析";
