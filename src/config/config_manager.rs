// ==========================================
// 库存差异分析 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写、校验
// 存储: JSON 文件（默认 <config_dir>/material-deficit/config.json）
// 优先级: 环境变量 > 配置文件 > 内置默认值
// ==========================================

use crate::domain::types::DuplicatePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 配置目录名
pub const APP_CONFIG_DIR: &str = "material-deficit";
/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "config.json";

// ==========================================
// 环境变量键
// ==========================================
pub mod env_keys {
    pub const LOG_LEVEL: &str = "MATERIAL_DEFICIT_LOG_LEVEL";
    pub const USE_CACHE: &str = "MATERIAL_DEFICIT_USE_CACHE";
    pub const TOP_N: &str = "MATERIAL_DEFICIT_TOP_N";
    pub const DUPLICATE_POLICY: &str = "MATERIAL_DEFICIT_DUPLICATE_POLICY";
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件解析失败: {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置项取值无效: {key}={value}")]
    InvalidValue { key: String, value: String },

    #[error("配置校验失败: {0}")]
    Validation(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// AnalysisConfig - 分析配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub log_level: String,
    pub use_cache: bool,
    pub top_n: usize,
    pub duplicate_policy: DuplicatePolicy,
    pub over_exploitation_ratio: f64,  // U/(C+1) 高于此值视为超额运营
    pub under_exploitation_ratio: f64, // U/(C+1) 低于此值视为运营不足
    pub export_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            use_cache: true,
            top_n: 10,
            duplicate_policy: DuplicatePolicy::Sum,
            over_exploitation_ratio: 1.1,
            under_exploitation_ratio: 0.9,
            export_dir: PathBuf::from("deficits_output"),
        }
    }
}

impl AnalysisConfig {
    /// 校验配置
    ///
    /// # 返回
    /// - Err(ConfigError::Validation): top_n 为 0, 或比例区间为空
    pub fn validate(&self) -> ConfigResult<()> {
        if self.top_n == 0 {
            return Err(ConfigError::Validation("top_n 必须大于 0".to_string()));
        }
        if !self.over_exploitation_ratio.is_finite() || !self.under_exploitation_ratio.is_finite()
        {
            return Err(ConfigError::Validation(
                "运营比例阈值必须为有限数值".to_string(),
            ));
        }
        if self.under_exploitation_ratio >= self.over_exploitation_ratio {
            return Err(ConfigError::Validation(format!(
                "under_exploitation_ratio ({}) 必须小于 over_exploitation_ratio ({})",
                self.under_exploitation_ratio, self.over_exploitation_ratio
            )));
        }
        Ok(())
    }

    /// 按键查询函数应用覆写
    ///
    /// # 参数
    /// - lookup: 键 → 值（通常为 std::env::var）
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(env_keys::LOG_LEVEL) {
            self.log_level = level.trim().to_string();
        }

        if let Some(raw) = lookup(env_keys::USE_CACHE) {
            self.use_cache = parse_bool(&raw).ok_or_else(|| invalid(env_keys::USE_CACHE, &raw))?;
        }

        if let Some(raw) = lookup(env_keys::TOP_N) {
            self.top_n = raw
                .trim()
                .parse()
                .map_err(|_| invalid(env_keys::TOP_N, &raw))?;
        }

        if let Some(raw) = lookup(env_keys::DUPLICATE_POLICY) {
            self.duplicate_policy = DuplicatePolicy::parse(&raw)
                .ok_or_else(|| invalid(env_keys::DUPLICATE_POLICY, &raw))?;
        }

        Ok(())
    }

    /// 应用进程环境变量覆写
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AnalysisConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 从已有配置创建（会执行校验）
    pub fn new(config: AnalysisConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            source: None,
        })
    }

    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    /// 从 JSON 文件加载配置
    ///
    /// # 说明
    /// - 缺省字段取内置默认值
    /// - 加载后应用环境变量覆写并校验
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: shown.clone(),
            source,
        })?;
        let mut config: AnalysisConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: shown.clone(),
                source,
            })?;

        config.apply_env_overrides()?;
        config.validate()?;

        info!(path = %shown, "配置文件已加载");
        Ok(Self {
            config,
            source: Some(path.to_path_buf()),
        })
    }

    /// 加载配置, 文件不存在时使用内置默认值
    ///
    /// # 参数
    /// - path: 显式路径（None 时使用默认路径）
    ///
    /// # 说明
    /// - 显式路径不存在时报错; 默认路径不存在时静默回退
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(default) if default.is_file() => Self::load(default),
            _ => {
                debug!("未找到配置文件, 使用内置默认值");
                let mut config = AnalysisConfig::default();
                config.apply_env_overrides()?;
                Self::new(config)
            }
        }
    }

    /// 保存配置到 JSON 文件（自动创建父目录）
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: shown.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.config).map_err(|source| {
            ConfigError::Parse {
                path: shown.clone(),
                source,
            }
        })?;
        fs::write(path, json).map_err(io_err)?;
        Ok(())
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn into_config(self) -> AnalysisConfig {
        self.config
    }

    /// 配置来源文件（内置默认值时为 None）
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(config.use_cache);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Sum);
        assert_eq!(config.over_exploitation_ratio, 1.1);
        assert_eq!(config.under_exploitation_ratio, 0.9);
        assert_eq!(config.export_dir, PathBuf::from("deficits_output"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AnalysisConfig {
            top_n: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        let config = AnalysisConfig {
            under_exploitation_ratio: 1.2,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = AnalysisConfig::default();
        config
            .apply_overrides(lookup_from(&[
                (env_keys::LOG_LEVEL, "debug"),
                (env_keys::USE_CACHE, "false"),
                (env_keys::TOP_N, "25"),
                (env_keys::DUPLICATE_POLICY, "Reject"),
            ]))
            .unwrap();

        assert_eq!(config.log_level, "debug");
        assert!(!config.use_cache);
        assert_eq!(config.top_n, 25);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
    }

    #[test]
    fn test_apply_overrides_invalid_value() {
        let mut config = AnalysisConfig::default();
        let err = config
            .apply_overrides(lookup_from(&[(env_keys::TOP_N, "many")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == env_keys::TOP_N));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"top_n": 3, "duplicate_policy": "reject"}"#).unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.log_level, "info");
        assert!(config.use_cache);
    }

    #[test]
    fn test_default_path_layout() {
        if let Some(path) = ConfigManager::default_path() {
            assert!(path.ends_with(Path::new(APP_CONFIG_DIR).join(CONFIG_FILE_NAME)));
        }
    }
}
