//! 生命周期拦截器链
//!
//! 按注册顺序驱动拦截器，模拟宿主容器创建与销毁对象的过程。

use crossbinder_common::{LifecycleResult, TypeInfo};
use extern_abstractions::{ExternalTarget, LifecycleInterceptor, LifecyclePhase, Managed};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// 生命周期拦截器链
#[derive(Clone, Default)]
pub struct LifecycleChain {
    interceptors: Vec<Arc<dyn LifecycleInterceptor>>,
}

impl LifecycleChain {
    /// 创建空的拦截器链
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加拦截器
    pub fn with(mut self, interceptor: Arc<dyn LifecycleInterceptor>) -> Self {
        self.push(interceptor);
        self
    }

    /// 追加拦截器
    pub fn push(&mut self, interceptor: Arc<dyn LifecycleInterceptor>) {
        self.interceptors.push(interceptor);
    }

    /// 拦截器数量
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// 创建对象并依次执行创建、注入、初始化阶段的钩子
    ///
    /// 任一钩子失败时立即返回，对象随之丢弃。
    pub fn create<T, F>(&self, factory: F) -> LifecycleResult<T>
    where
        T: ExternalTarget,
        F: FnOnce() -> T,
    {
        let mut target = factory();
        debug!("创建受管对象: {}", TypeInfo::of::<T>());

        self.run(LifecyclePhase::AfterCreation, &mut target, |i, t| {
            i.after_creation(t)
        })?;
        self.run(LifecyclePhase::AfterInjection, &mut target, |i, t| {
            i.after_injection(t)
        })?;
        self.run(LifecyclePhase::AfterInitialization, &mut target, |i, t| {
            i.after_initialization(t)
        })?;

        Ok(target)
    }

    /// 销毁对象，先执行销毁前钩子，释放对象后再执行销毁后钩子
    pub fn dispose<T: ExternalTarget>(&self, mut target: T) -> LifecycleResult<()> {
        self.run(LifecyclePhase::BeforeDisposal, &mut target, |i, t| {
            i.before_disposal(t)
        })?;

        let info = TypeInfo::of::<T>();
        drop(target);
        debug!("受管对象已释放: {}", info);

        for interceptor in &self.interceptors {
            interceptor.after_disposal(&info).map_err(|e| {
                error!("生命周期阶段 {} 执行失败: {}", LifecyclePhase::AfterDisposal, e);
                e
            })?;
        }
        Ok(())
    }

    fn run<H>(
        &self,
        phase: LifecyclePhase,
        target: &mut dyn Managed,
        hook: H,
    ) -> LifecycleResult<()>
    where
        H: Fn(&dyn LifecycleInterceptor, &mut dyn Managed) -> LifecycleResult<()>,
    {
        for interceptor in &self.interceptors {
            hook(interceptor.as_ref(), &mut *target).map_err(|e| {
                error!("生命周期阶段 {} 执行失败: {}: {}", phase, target.managed_type(), e);
                e
            })?;
        }
        Ok(())
    }
}

impl fmt::Debug for LifecycleChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleChain")
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}
