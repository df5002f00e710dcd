//! 组合层配置
//!
//! 配置来源依次为可选的配置文件（按扩展名识别 YAML/JSON/TOML）和
//! `CROSSBINDER` 前缀的环境变量，后者覆盖前者，例如 `CROSSBINDER__RESOLVER__CACHE_DESCRIPTORS=false`。

use crossbinder_common::{ConfigError, ConfigResult};
use extern_impl::LookupOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// 组合层配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossbinderSettings {
    /// 解析器配置
    pub resolver: ResolverSettings,
    /// 日志配置
    pub logging: LoggingSettings,
}

/// 解析器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// 匿名查找未命中匿名对象时是否扫描具名对象
    pub anonymous_includes_named: bool,
    /// 是否缓存类型描述符
    pub cache_descriptors: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            anonymous_includes_named: true,
            cache_descriptors: true,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// 日志过滤指令，例如 `info` 或 `info,extern_impl=debug`
    pub level: String,
    /// 是否使用 JSON 格式
    pub json: bool,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名和行号
    pub show_location: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            show_target: true,
            show_thread_ids: false,
            show_location: false,
        }
    }
}

impl CrossbinderSettings {
    /// 环境变量前缀
    pub const ENV_PREFIX: &'static str = "CROSSBINDER";
    /// 环境变量层级分隔符
    pub const ENV_SEPARATOR: &'static str = "__";

    /// 加载配置，`path` 为空时只读取环境变量
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                error!("配置文件不存在: {}", path.display());
                return Err(ConfigError::LoadFailed {
                    source: format!("配置文件不存在: {}", path.display()).into(),
                });
            }
            debug!("加载配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(Self::ENV_PREFIX)
                    .separator(Self::ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| {
                error!("配置构建失败: {}", e);
                ConfigError::LoadFailed {
                    source: Box::new(e),
                }
            })?;

        let parsed: Self = settings.try_deserialize().map_err(|e| {
            error!("配置绑定失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// 从配置文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        Self::load(Some(path.as_ref()))
    }

    /// 校验配置值
    pub fn validate(&self) -> ConfigResult<()> {
        EnvFilter::try_new(&self.logging.level).map_err(|e| ConfigError::InvalidValue {
            key: "logging.level".to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// 注册表查找选项
    pub fn lookup_options(&self) -> LookupOptions {
        LookupOptions {
            anonymous_includes_named: self.resolver.anonymous_includes_named,
        }
    }
}
