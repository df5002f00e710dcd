//! # Extern Macros
//!
//! 这个 crate 提供了用于生成外部绑定描述符的过程宏。
//!
//! ## 核心宏
//!
//! - [`ExternalTarget`] - 为结构体生成字段与父类型描述
//! - [`macro@extern_methods`] - 为 impl 块生成运行时方法列表
//!
//! ## 使用示例
//!
//! ```rust
//! use extern_macros::{extern_methods, ExternalTarget};
//! use std::sync::Arc;
//!
//! pub trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! #[derive(Default, ExternalTarget)]
//! #[extern_target(methods)]
//! pub struct Scheduler {
//!     #[external("clock")]
//!     clock: Option<Arc<dyn Clock>>,
//!     backup: Option<Arc<dyn Clock>>,
//! }
//!
//! #[extern_methods]
//! impl Scheduler {
//!     pub fn use_backup(&mut self, #[external(optional)] clock: Option<Arc<dyn Clock>>) {
//!         self.backup = clock;
//!     }
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod derive;
mod methods;
mod utils;

/// 外部绑定目标派生宏
///
/// 为结构体实现 `ExternalTarget`，字段上的标记决定描述符内容。
///
/// # 属性
///
/// - `#[external]` - 匿名绑定，字段类型须为 `Option<Arc<T>>`
/// - `#[external("name")]` - 具名绑定
/// - `#[external(name = "..", value = "..", optional)]` - 完整形式，`name` 非空时优先
/// - `#[extern_parent]` - 内嵌的父类型，最多一个
/// - `#[extern_target(methods)]` - 并入 `#[extern_methods]` 生成的方法列表
///
/// # 示例
///
/// ```rust,ignore
/// #[derive(ExternalTarget)]
/// pub struct ReportJob {
///     #[extern_parent]
///     base: BaseJob,
///     #[external(name = "archive", optional)]
///     archive: Option<Arc<dyn Archive>>,
/// }
/// ```
#[proc_macro_derive(ExternalTarget, attributes(external, extern_parent, extern_target))]
pub fn derive_external_target(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::derive_external_target_impl(input)
}

/// 运行时方法列表宏
///
/// 用于固有 impl 块，所有 `pub fn` 都会出现在方法列表中。参数可以使用 `#[external(...)]`
/// 标记，类型为 `Arc<T>` 或 `Option<Arc<T>>`。只有声明了 `optional` 的绑定是可选的，
/// 且可选绑定的参数必须是 `Option<Arc<T>>`。没有接收者的函数视为类级别方法。
///
/// # 示例
///
/// ```rust,ignore
/// #[extern_methods]
/// impl ReportJob {
///     pub fn attach(&mut self, #[external] sink: Arc<dyn Sink>) -> Result<(), String> {
///         self.sink = Some(sink);
///         Ok(())
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn extern_methods(args: TokenStream, input: TokenStream) -> TokenStream {
    methods::extern_methods_impl(args, input)
}
