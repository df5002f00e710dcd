//! 外部依赖基础设施主入口

use crate::bootstrapper::ExternBootstrapper;
use crate::chain::LifecycleChain;
use crate::settings::CrossbinderSettings;
use crossbinder_common::{LifecycleResult, ResolutionResult};
use extern_abstractions::ExternalTarget;
use extern_impl::{ExternInterceptor, ExternalRegistry};
use std::sync::Arc;

/// 外部依赖基础设施
///
/// 持有冻结的注册表、外部依赖拦截器和拦截器链，可在多个线程间共享。
#[derive(Debug, Clone)]
pub struct CrossbinderInfrastructure {
    interceptor: Arc<ExternInterceptor>,
    chain: LifecycleChain,
    settings: CrossbinderSettings,
}

impl CrossbinderInfrastructure {
    /// 创建启动器
    pub fn builder() -> ExternBootstrapper {
        ExternBootstrapper::new()
    }

    pub(crate) fn new(
        interceptor: Arc<ExternInterceptor>,
        chain: LifecycleChain,
        settings: CrossbinderSettings,
    ) -> Self {
        Self {
            interceptor,
            chain,
            settings,
        }
    }

    /// 外部依赖拦截器
    pub fn interceptor(&self) -> &Arc<ExternInterceptor> {
        &self.interceptor
    }

    /// 外部对象注册表
    pub fn registry(&self) -> &ExternalRegistry {
        self.interceptor.registry()
    }

    /// 拦截器链
    pub fn chain(&self) -> &LifecycleChain {
        &self.chain
    }

    /// 生效的配置
    pub fn settings(&self) -> &CrossbinderSettings {
        &self.settings
    }

    /// 经由拦截器链创建受管对象
    pub fn create<T, F>(&self, factory: F) -> LifecycleResult<T>
    where
        T: ExternalTarget,
        F: FnOnce() -> T,
    {
        self.chain.create(factory)
    }

    /// 经由拦截器链销毁受管对象
    pub fn dispose<T: ExternalTarget>(&self, target: T) -> LifecycleResult<()> {
        self.chain.dispose(target)
    }

    /// 直接解析已有对象，不经过其他拦截器
    pub fn resolve<T: ExternalTarget>(&self, target: &mut T) -> ResolutionResult<()> {
        self.interceptor.resolve(target)
    }
}
