//! # 外部依赖组合层
//!
//! 负责将外部对象注册表、解析器和生命周期拦截器组合成可运行的基础设施。
//!
//! ## 主要功能
//!
//! - **配置加载**: 从配置文件和环境变量读取解析器与日志配置
//! - **日志初始化**: 基于 `tracing-subscriber` 初始化全局日志
//! - **启动器**: 收集外部对象并冻结注册表
//! - **拦截器链**: 按生命周期阶段驱动拦截器
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use crossbinder_composition::ExternBootstrapper;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let infrastructure = ExternBootstrapper::from_config(Some(Path::new("config/crossbinder.yaml")))?
//!         .with_logging(true)
//!         .bootstrap()?;
//!
//!     println!("外部对象: {}", infrastructure.registry().anonymous_count());
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod chain;
pub mod infrastructure;
pub mod logging;
pub mod settings;

// 重新导出主要类型
pub use bootstrapper::ExternBootstrapper;
pub use chain::LifecycleChain;
pub use infrastructure::CrossbinderInfrastructure;
pub use logging::{init_logging, LoggingConfig};
pub use settings::{CrossbinderSettings, LoggingSettings, ResolverSettings};

// 重新导出错误类型
pub use crossbinder_common::InfrastructureError;
