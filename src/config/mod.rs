// ==========================================
// 库存差异分析 - 配置层
// ==========================================
// 职责: 分析参数管理, 支持文件 + 环境变量两级覆写
// 存储: JSON 配置文件
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{
    env_keys, AnalysisConfig, ConfigError, ConfigManager, ConfigResult, APP_CONFIG_DIR,
    CONFIG_FILE_NAME,
};
