// ==========================================
// 库存差异分析 - API 层
// ==========================================
// 职责: 提供会话式业务接口, 供命令行等调用方使用
// ==========================================

pub mod error;
pub mod session;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use session::InventorySession;
