//! 外部依赖生命周期拦截器

use crate::registry::ExternalRegistry;
use crate::resolver::ExternResolver;
use crossbinder_common::{LifecycleError, ResolutionResult};
use extern_abstractions::{ExternalTarget, LifecycleInterceptor, Managed};
use std::sync::Arc;
use tracing::debug;

/// 外部依赖拦截器
///
/// 在宿主容器完成自身注入之后解析目标对象的外部依赖，其余生命周期阶段不做处理。
#[derive(Debug)]
pub struct ExternInterceptor {
    registry: Arc<ExternalRegistry>,
    resolver: ExternResolver,
}

impl ExternInterceptor {
    /// 基于已冻结的注册表创建拦截器
    pub fn new(registry: Arc<ExternalRegistry>) -> Self {
        let resolver = ExternResolver::new(registry.clone());
        Self { registry, resolver }
    }

    /// 设置是否缓存类型描述符
    pub fn with_descriptor_cache(mut self, enabled: bool) -> Self {
        self.resolver = self.resolver.with_descriptor_cache(enabled);
        self
    }

    /// 外部对象注册表
    pub fn registry(&self) -> &ExternalRegistry {
        &self.registry
    }

    /// 外部依赖解析器
    pub fn resolver(&self) -> &ExternResolver {
        &self.resolver
    }

    /// 直接解析类型化目标
    pub fn resolve<T: ExternalTarget>(&self, target: &mut T) -> ResolutionResult<()> {
        self.resolver.resolve(target)
    }
}

impl LifecycleInterceptor for ExternInterceptor {
    fn after_injection(&self, target: &mut dyn Managed) -> Result<(), LifecycleError> {
        debug!("after_injection: {}", target.managed_type());
        self.resolver.resolve_managed(target)?;
        Ok(())
    }
}
