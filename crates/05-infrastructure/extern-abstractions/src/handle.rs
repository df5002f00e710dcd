//! 类型擦除的外部对象句柄与成员访问

use crossbinder_common::TypeInfo;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// 成员访问错误
///
/// 由描述符中的字段设置器或方法调用器产生。
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("目标类型不匹配: 期望 {expected}")]
    TargetMismatch { expected: &'static str },

    #[error("参数类型不匹配: 位置 {index}, 期望 {expected}, 实际 {actual}")]
    ArgumentMismatch {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("缺少参数: 位置 {index}")]
    MissingArgument { index: usize },

    #[error("成员拒绝写入: {message}")]
    Rejected { message: String },

    #[error("方法执行失败: {source}")]
    Failed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl AccessError {
    /// 包装目标方法返回的错误
    pub fn failed(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Failed {
            source: source.into(),
        }
    }

    /// 创建拒绝写入错误
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// 外部对象在某个能力下的句柄
///
/// 内部保存 `Arc<C>`，其中 `C` 为能力类型。
#[derive(Clone)]
pub struct ExternHandle {
    capability: TypeInfo,
    value: Arc<dyn Any + Send + Sync>,
}

impl ExternHandle {
    /// 创建句柄
    pub fn new<C>(value: Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        Self {
            capability: TypeInfo::of::<C>(),
            value: Arc::new(value),
        }
    }

    /// 句柄对应的能力
    pub fn capability(&self) -> TypeInfo {
        self.capability
    }

    /// 取出能力视图，能力不一致时返回 `None`
    pub fn downcast<C>(&self) -> Option<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.value.downcast_ref::<Arc<C>>().cloned()
    }

    /// 两个句柄是否指向同一个对象视图
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.capability == other.capability && Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for ExternHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternHandle")
            .field("capability", &self.capability.name)
            .finish()
    }
}

/// 方法调用参数
///
/// 按声明顺序排列，可选且未解析的参数为 `None`。
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Vec<Option<ExternHandle>>,
}

impl Arguments {
    /// 从参数列表创建
    pub fn new(values: Vec<Option<ExternHandle>>) -> Self {
        Self { values }
    }

    /// 参数数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 获取必需参数
    pub fn required<C>(&self, index: usize) -> Result<Arc<C>, AccessError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.optional::<C>(index)?
            .ok_or(AccessError::MissingArgument { index })
    }

    /// 获取可选参数
    pub fn optional<C>(&self, index: usize) -> Result<Option<Arc<C>>, AccessError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let slot = self
            .values
            .get(index)
            .ok_or(AccessError::MissingArgument { index })?;
        match slot {
            None => Ok(None),
            Some(handle) => handle.downcast::<C>().map(Some).ok_or_else(|| {
                AccessError::ArgumentMismatch {
                    index,
                    expected: std::any::type_name::<C>(),
                    actual: handle.capability().name,
                }
            }),
        }
    }
}

/// 将类型擦除的目标还原为具体类型
pub fn downcast_target<T: Any>(target: &mut dyn Any) -> Result<&mut T, AccessError> {
    target
        .downcast_mut::<T>()
        .ok_or(AccessError::TargetMismatch {
            expected: std::any::type_name::<T>(),
        })
}
