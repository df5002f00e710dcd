//! 错误类型定义

use thiserror::Error;

/// 外部依赖解析错误类型
///
/// 解析失败属于启动阶段的致命错误，调用方不应重试。
#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("unresolved external assignment for field {owner}#{field}: target not found")]
    FieldTargetNotFound { owner: String, field: String },

    #[error("unresolved external assignment for field {owner}#{field}: unable to set value")]
    FieldAssignment {
        owner: String,
        field: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(
        "unresolved external dependency for method parameter {owner}::{method}->{parameter}: target not found"
    )]
    ParameterTargetNotFound {
        owner: String,
        method: String,
        parameter: String,
    },

    #[error("unable to execute method for dependency injection {owner}:{method}")]
    MethodInvocation {
        owner: String,
        method: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("解析目标类型不匹配: 期望 {expected}")]
    TargetMismatch { expected: String },
}

impl ResolutionError {
    /// 出错成员所属的类型名称
    pub fn owner(&self) -> &str {
        match self {
            Self::FieldTargetNotFound { owner, .. }
            | Self::FieldAssignment { owner, .. }
            | Self::ParameterTargetNotFound { owner, .. }
            | Self::MethodInvocation { owner, .. } => owner,
            Self::TargetMismatch { expected } => expected,
        }
    }

    /// 出错的成员名称（字段名或方法名）
    pub fn member(&self) -> Option<&str> {
        match self {
            Self::FieldTargetNotFound { field, .. } | Self::FieldAssignment { field, .. } => {
                Some(field)
            }
            Self::ParameterTargetNotFound { method, .. }
            | Self::MethodInvocation { method, .. } => Some(method),
            Self::TargetMismatch { .. } => None,
        }
    }

    /// 是否为"未找到目标"类错误
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FieldTargetNotFound { .. } | Self::ParameterTargetNotFound { .. }
        )
    }
}

/// 外部对象注册错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("外部对象名称不能为空")]
    EmptyName,
}

/// 生命周期拦截器错误类型
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("外部依赖解析失败: {source}")]
    Resolution {
        #[from]
        source: ResolutionError,
    },

    #[error("生命周期钩子执行失败: {phase}, 原因: {message}")]
    HookFailed { phase: String, message: String },
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置加载失败: {source}")]
    LoadFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置值无效: {key}, 原因: {message}")]
    InvalidValue { key: String, message: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("注册错误: {source}")]
    RegistrationError {
        #[from]
        source: RegistrationError,
    },

    #[error("生命周期错误: {source}")]
    LifecycleError {
        #[from]
        source: LifecycleError,
    },

    #[error("依赖解析错误: {source}")]
    ResolutionError {
        #[from]
        source: ResolutionError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ResolutionResult<T> = Result<T, ResolutionError>;
pub type RegistrationResult<T> = Result<T, RegistrationError>;
pub type LifecycleResult<T> = Result<T, LifecycleError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
