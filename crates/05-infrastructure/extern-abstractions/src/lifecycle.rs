//! 生命周期拦截器接口

use crate::target::Managed;
use crossbinder_common::{LifecycleError, TypeInfo};
use std::fmt;

/// 生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    /// 对象创建之后
    AfterCreation,
    /// 宿主完成自身注入之后
    AfterInjection,
    /// 对象初始化完成之后
    AfterInitialization,
    /// 对象销毁之前
    BeforeDisposal,
    /// 对象销毁之后
    AfterDisposal,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AfterCreation => "after_creation",
            Self::AfterInjection => "after_injection",
            Self::AfterInitialization => "after_initialization",
            Self::BeforeDisposal => "before_disposal",
            Self::AfterDisposal => "after_disposal",
        };
        f.write_str(name)
    }
}

/// 生命周期拦截器 trait
///
/// 宿主容器在对象生命周期的各个阶段依次调用，默认实现均为空操作。
pub trait LifecycleInterceptor: Send + Sync {
    /// 对象创建之后
    fn after_creation(&self, _target: &mut dyn Managed) -> Result<(), LifecycleError> {
        Ok(())
    }

    /// 宿主完成自身注入之后
    fn after_injection(&self, _target: &mut dyn Managed) -> Result<(), LifecycleError> {
        Ok(())
    }

    /// 对象初始化完成之后
    fn after_initialization(&self, _target: &mut dyn Managed) -> Result<(), LifecycleError> {
        Ok(())
    }

    /// 对象销毁之前
    fn before_disposal(&self, _target: &mut dyn Managed) -> Result<(), LifecycleError> {
        Ok(())
    }

    /// 对象销毁之后，此时只剩类型信息
    fn after_disposal(&self, _target: &TypeInfo) -> Result<(), LifecycleError> {
        Ok(())
    }
}
