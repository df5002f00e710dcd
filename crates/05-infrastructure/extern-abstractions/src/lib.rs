//! # External Binding Abstractions
//!
//! 外部依赖绑定抽象层，定义成员描述、能力匹配和生命周期拦截的核心接口。
//!
//! ## 核心接口
//!
//! - [`Binding`] - 字段/参数上的外部绑定声明
//! - [`Capability`] - 成员所需的能力（类型）
//! - [`TypeDescriptor`] - 替代运行时反射的成员模型
//! - [`ExternalTarget`] - 可被解析外部依赖的类型
//! - [`ExternLookup`] - 外部对象查找接口
//! - [`LifecycleInterceptor`] - 宿主容器的生命周期钩子

pub mod binding;
pub mod descriptor;
pub mod handle;
pub mod lifecycle;
pub mod lookup;
pub mod target;

pub use binding::*;
pub use descriptor::*;
pub use handle::*;
pub use lifecycle::*;
pub use lookup::*;
pub use target::*;

pub use crossbinder_common::TypeInfo;
