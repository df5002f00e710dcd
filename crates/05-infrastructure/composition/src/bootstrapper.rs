//! 外部依赖启动器

use crate::chain::LifecycleChain;
use crate::infrastructure::CrossbinderInfrastructure;
use crate::logging::{init_logging, LoggingConfig};
use crate::settings::CrossbinderSettings;
use crossbinder_common::InfrastructureResult;
use extern_abstractions::LifecycleInterceptor;
use extern_impl::{ExternInterceptor, ExternalObject, ExternalRegistryBuilder};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// 外部依赖启动器
///
/// 启动阶段收集外部对象，`bootstrap` 时冻结注册表并组装拦截器链。
/// 外部依赖拦截器总是位于链首，其余拦截器按添加顺序排在其后。
#[derive(Default)]
pub struct ExternBootstrapper {
    /// 外部对象注册表构建器
    registry: ExternalRegistryBuilder,
    /// 组合层配置
    settings: CrossbinderSettings,
    /// 附加的拦截器
    interceptors: Vec<Arc<dyn LifecycleInterceptor>>,
    /// 是否初始化日志
    logging_enabled: bool,
}

impl ExternBootstrapper {
    /// 创建新的启动器，使用默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从配置文件和环境变量加载配置后创建启动器
    pub fn from_config(path: Option<&Path>) -> InfrastructureResult<Self> {
        let settings = CrossbinderSettings::load(path)?;
        Ok(Self::new().with_settings(settings))
    }

    /// 设置组合层配置
    pub fn with_settings(mut self, settings: CrossbinderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 启用日志初始化
    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// 注册匿名外部对象
    pub fn add(mut self, extern_obj: impl Into<ExternalObject>) -> Self {
        self.registry = self.registry.add(extern_obj);
        self
    }

    /// 注册具名外部对象
    pub fn add_named(
        mut self,
        name: &str,
        extern_obj: impl Into<ExternalObject>,
    ) -> InfrastructureResult<Self> {
        self.registry = self.registry.add_named(name, extern_obj)?;
        Ok(self)
    }

    /// 追加生命周期拦截器
    pub fn add_interceptor(mut self, interceptor: Arc<dyn LifecycleInterceptor>) -> Self {
        debug!("添加生命周期拦截器");
        self.interceptors.push(interceptor);
        self
    }

    /// 当前配置
    pub fn settings(&self) -> &CrossbinderSettings {
        &self.settings
    }

    /// 冻结注册表并组装基础设施
    pub fn bootstrap(self) -> InfrastructureResult<CrossbinderInfrastructure> {
        info!("开始启动外部依赖基础设施");

        if self.logging_enabled {
            init_logging(&LoggingConfig::from(&self.settings.logging))?;
        }

        let registry = Arc::new(
            self.registry
                .with_options(self.settings.lookup_options())
                .build(),
        );
        let interceptor = Arc::new(
            ExternInterceptor::new(registry)
                .with_descriptor_cache(self.settings.resolver.cache_descriptors),
        );

        let mut chain = LifecycleChain::new().with(interceptor.clone());
        for extra in self.interceptors {
            chain.push(extra);
        }

        info!("外部依赖基础设施启动完成: 拦截器 {} 个", chain.len());
        Ok(CrossbinderInfrastructure::new(
            interceptor,
            chain,
            self.settings,
        ))
    }
}

impl fmt::Debug for ExternBootstrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternBootstrapper")
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .field("interceptors", &self.interceptors.len())
            .field("logging_enabled", &self.logging_enabled)
            .finish()
    }
}
