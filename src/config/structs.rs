use chrono::Datelike;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::session::Role;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "brandtracker.toml";

/// How an edit's history append and field write reach the store
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EditConsistency {
    /// Two independent writes: history append, then field update
    #[default]
    Sequential,
    /// One atomic store commit carrying both
    Atomic,
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 优先级：ENV > brandtracker.toml > 默认值
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// ENV 前缀：BT，分隔符：__
    /// 示例：BT__STORE__BACKEND=memory
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 BT，分隔符 __
            .add_source(
                Environment::with_prefix("BT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> crate::errors::Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// memory | file
    #[serde(default = "default_store_backend")]
    pub backend: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_collection_prefix")]
    pub collection_prefix: String,
    #[serde(default)]
    pub consistency: EditConsistency,
}

/// 会话默认值（可被命令行参数覆盖）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_year")]
    pub year: u16,
    #[serde(default = "default_editor")]
    pub editor: String,
    #[serde(default)]
    pub role: Role,
}

/// 列表视图配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_store_backend() -> String {
    "file".to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_collection_prefix() -> String {
    "campaigns_".to_string()
}

fn default_year() -> u16 {
    u16::try_from(chrono::Utc::now().year()).unwrap_or(2025)
}

fn default_editor() -> String {
    "unknown".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            data_dir: default_data_dir(),
            collection_prefix: default_collection_prefix(),
            consistency: EditConsistency::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            year: default_year(),
            editor: default_editor(),
            role: Role::default(),
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.store.backend, "file");
        assert_eq!(config.store.collection_prefix, "campaigns_");
        assert_eq!(config.store.consistency, EditConsistency::Sequential);
        assert_eq!(config.session.role, Role::Viewer);
        assert_eq!(config.view.page_size, 10);
    }

    #[test]
    fn test_sample_config_round_trips() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[store]"));
        let parsed: StaticConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.view.page_size, 10);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str(
            r#"
            [store]
            backend = "memory"
            consistency = "atomic"

            [session]
            role = "admin"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.store.backend, "memory");
        assert_eq!(parsed.store.consistency, EditConsistency::Atomic);
        assert_eq!(parsed.store.data_dir, "data");
        assert_eq!(parsed.session.role, Role::Admin);
    }

    #[test]
    fn test_consistency_parses_case_insensitively() {
        assert_eq!(
            "ATOMIC".parse::<EditConsistency>().unwrap(),
            EditConsistency::Atomic
        );
    }
}
