//! 类型元数据
//!
//! 提供不依赖反射的类型标识信息

use std::any::TypeId;
use std::fmt;

/// 类型信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 完整类型名称（包含模块路径）
    pub name: &'static str,
    /// 类型ID
    pub id: TypeId,
}

impl TypeInfo {
    /// 从类型获取类型信息，支持 `dyn Trait` 等非 Sized 类型
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }

    /// 是否为指定类型
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 去掉类型名称中的模块路径
///
/// 泛型参数部分保持原样，只处理最外层路径。
pub fn short_type_name(full: &str) -> &str {
    let head = full.find('<').map_or(full, |idx| &full[..idx]);
    let start = head.rfind("::").map_or(0, |idx| idx + 2);
    &full[start..]
}
