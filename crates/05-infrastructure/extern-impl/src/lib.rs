//! # 外部依赖解析实现
//!
//! 提供外部对象注册表、外部依赖解析器以及对接宿主容器的生命周期拦截器。
//!
//! ```rust
//! use extern_abstractions::{Binding, ExternalTarget, TypeDescriptor};
//! use extern_impl::{ExternInterceptor, ExternalObject, ExternalRegistry};
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct SystemClock;
//!
//! impl Clock for SystemClock {
//!     fn now(&self) -> u64 {
//!         42
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Scheduler {
//!     clock: Option<Arc<dyn Clock>>,
//! }
//!
//! impl ExternalTarget for Scheduler {
//!     fn type_descriptor() -> TypeDescriptor {
//!         TypeDescriptor::builder::<Self>()
//!             .field("clock", Binding::anonymous(), |s| &mut s.clock)
//!             .build()
//!     }
//! }
//!
//! let registry = ExternalRegistry::builder()
//!     .add(ExternalObject::new(SystemClock).provides::<dyn Clock>(|c| c))
//!     .build();
//! let interceptor = ExternInterceptor::new(Arc::new(registry));
//!
//! let mut scheduler = Scheduler::default();
//! interceptor.resolve(&mut scheduler).unwrap();
//! assert_eq!(scheduler.clock.unwrap().now(), 42);
//! ```

pub mod interceptor;
pub mod registry;
pub mod resolver;

pub use interceptor::ExternInterceptor;
pub use registry::{
    ExternalObject, ExternalObjectBuilder, ExternalRegistry, ExternalRegistryBuilder, LookupOptions,
};
pub use resolver::ExternResolver;
