// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 优先级: RUST_LOG > 配置中的 log_level
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日志系统
///
/// # 参数
/// - level: 配置中的日志级别（如 "info"、"debug"）
///
/// # 环境变量
/// - RUST_LOG: 设置时覆盖 level
///   例如: RUST_LOG=material_deficit=trace
///
/// # 示例
/// ```no_run
/// use material_deficit::logging;
/// logging::init("info");
/// ```
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init 仅在全局订阅器已安装时返回错误, 此时保持首次配置
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .try_init();
}

/// 初始化测试环境的日志系统
///
/// 使用更详细的日志级别，便于调试
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
