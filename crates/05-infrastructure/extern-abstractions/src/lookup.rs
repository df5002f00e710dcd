//! 外部对象查找接口

use crate::binding::Binding;
use crate::handle::ExternHandle;
use crossbinder_common::TypeInfo;

/// 外部对象查找 trait
///
/// 按能力匿名查找，或按名称加能力查找。未找到与能力不符返回同样的 `None`。
pub trait ExternLookup: Send + Sync {
    /// 查找满足能力的匿名外部对象
    fn find_anonymous(&self, capability: &TypeInfo) -> Option<ExternHandle>;

    /// 查找指定名称且满足能力的外部对象
    fn find_named(&self, name: &str, capability: &TypeInfo) -> Option<ExternHandle>;

    /// 按绑定声明查找
    fn find(&self, binding: &Binding, capability: &TypeInfo) -> Option<ExternHandle> {
        match binding.declared_name() {
            Some(name) => self.find_named(name, capability),
            None => self.find_anonymous(capability),
        }
    }
}
