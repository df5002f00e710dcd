//! 解析目标接口

use crate::descriptor::{MethodDescriptor, TypeDescriptor};
use crossbinder_common::TypeInfo;
use std::any::Any;

/// 可解析外部依赖的类型
///
/// 通常通过 `#[derive(ExternalTarget)]` 自动实现。
pub trait ExternalTarget: Any + Send + Sized {
    /// 构建该类型的成员描述符
    fn type_descriptor() -> TypeDescriptor;
}

/// 运行时方法列表
///
/// 由 `#[extern_methods]` 为 impl 块生成，`#[extern_target(methods)]` 将其并入类型描述符。
pub trait ExternMethods {
    /// 声明的方法描述符，按源码顺序排列
    fn extern_methods() -> Vec<MethodDescriptor>;
}

/// 宿主容器管理的对象
///
/// [`ExternalTarget`] 的对象安全版本，供生命周期拦截器使用。
pub trait Managed: Send {
    /// 对象的运行时类型
    fn managed_type(&self) -> TypeInfo;

    /// 构建对象类型的成员描述符
    fn describe(&self) -> TypeDescriptor;

    /// 以 `Any` 形式访问对象
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: ExternalTarget> Managed for T {
    fn managed_type(&self) -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn describe(&self) -> TypeDescriptor {
        T::type_descriptor()
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
