//! # Crossbinder Common
//!
//! 这个 crate 提供了 Crossbinder 各层共享的错误类型和类型元数据。
//!
//! ## 核心类型
//!
//! - [`TypeInfo`] - 运行时类型标识
//! - [`ResolutionError`] - 外部依赖解析错误
//! - [`RegistrationError`] - 外部对象注册错误
//! - [`LifecycleError`] - 生命周期拦截器错误
//! - [`InfrastructureError`] - 启动阶段的顶层错误

pub mod errors;
pub mod metadata;

pub use errors::*;
pub use metadata::*;
