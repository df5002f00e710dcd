//! 外部对象注册表
//!
//! 注册表在启动阶段通过 [`ExternalRegistryBuilder`] 填充，`build()` 之后只读。
//! 每个外部对象在注册时声明自己满足的能力集合，查找即集合成员判断。

use crossbinder_common::{RegistrationError, TypeInfo};
use extern_abstractions::{ExternHandle, ExternLookup};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 已注册的外部对象
#[derive(Clone)]
pub struct ExternalObject {
    info: TypeInfo,
    capabilities: HashMap<TypeId, ExternHandle>,
}

impl ExternalObject {
    /// 包装一个值，具体类型自动作为能力之一
    pub fn new<T: Send + Sync + 'static>(value: T) -> ExternalObjectBuilder<T> {
        Self::of(Arc::new(value))
    }

    /// 包装一个共享值
    pub fn of<T: Send + Sync + 'static>(value: Arc<T>) -> ExternalObjectBuilder<T> {
        let mut capabilities = HashMap::new();
        capabilities.insert(TypeId::of::<T>(), ExternHandle::new(value.clone()));
        ExternalObjectBuilder {
            value,
            capabilities,
        }
    }

    /// 对象的具体类型
    pub fn info(&self) -> TypeInfo {
        self.info
    }

    /// 是否满足指定能力
    pub fn satisfies(&self, capability: &TypeInfo) -> bool {
        self.capabilities.contains_key(&capability.id)
    }

    /// 获取指定能力下的视图
    pub fn view(&self, capability: &TypeInfo) -> Option<ExternHandle> {
        self.capabilities.get(&capability.id).cloned()
    }

    /// 已声明的能力
    pub fn capabilities(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.capabilities.values().map(ExternHandle::capability)
    }
}

impl fmt::Debug for ExternalObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut capabilities: Vec<_> = self.capabilities().map(|c| c.name).collect();
        capabilities.sort_unstable();
        f.debug_struct("ExternalObject")
            .field("type", &self.info.name)
            .field("capabilities", &capabilities)
            .finish()
    }
}

/// 外部对象构建器，用于声明对象满足的能力
pub struct ExternalObjectBuilder<T> {
    value: Arc<T>,
    capabilities: HashMap<TypeId, ExternHandle>,
}

impl<T: Send + Sync + 'static> ExternalObjectBuilder<T> {
    /// 声明对象满足能力 `C`，`view` 负责转换，通常写作 `|v| v`
    pub fn provides<C>(mut self, view: impl FnOnce(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let handle = ExternHandle::new(view(self.value.clone()));
        self.capabilities.insert(TypeId::of::<C>(), handle);
        self
    }

    /// 构建外部对象
    pub fn build(self) -> ExternalObject {
        ExternalObject {
            info: TypeInfo::of::<T>(),
            capabilities: self.capabilities,
        }
    }
}

impl<T: Send + Sync + 'static> From<ExternalObjectBuilder<T>> for ExternalObject {
    fn from(builder: ExternalObjectBuilder<T>) -> Self {
        builder.build()
    }
}

/// 查找选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOptions {
    /// 匿名查找在匿名对象中未命中时，是否继续按能力扫描具名对象
    pub anonymous_includes_named: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            anonymous_includes_named: true,
        }
    }
}

/// 外部对象注册表
#[derive(Debug, Clone, Default)]
pub struct ExternalRegistry {
    anonymous: Vec<ExternalObject>,
    named: HashMap<String, ExternalObject>,
    options: LookupOptions,
}

impl ExternalRegistry {
    /// 创建注册表构建器
    pub fn builder() -> ExternalRegistryBuilder {
        ExternalRegistryBuilder::new()
    }

    /// 匿名对象数量
    pub fn anonymous_count(&self) -> usize {
        self.anonymous.len()
    }

    /// 具名对象数量
    pub fn named_count(&self) -> usize {
        self.named.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.anonymous.is_empty() && self.named.is_empty()
    }

    /// 是否存在指定名称
    pub fn contains_name(&self, name: &str) -> bool {
        self.named.contains_key(name.trim())
    }

    /// 获取指定名称的对象，不做能力检查
    pub fn get_named(&self, name: &str) -> Option<&ExternalObject> {
        self.named.get(name.trim())
    }

    /// 查找选项
    pub fn options(&self) -> LookupOptions {
        self.options
    }
}

impl ExternLookup for ExternalRegistry {
    fn find_anonymous(&self, capability: &TypeInfo) -> Option<ExternHandle> {
        let found = self.anonymous.iter().find_map(|obj| obj.view(capability));
        if found.is_some() || !self.options.anonymous_includes_named {
            return found;
        }
        self.named.values().find_map(|obj| obj.view(capability))
    }

    fn find_named(&self, name: &str, capability: &TypeInfo) -> Option<ExternHandle> {
        let name = name.trim();
        let obj = self.named.get(name)?;
        let view = obj.view(capability);
        if view.is_none() {
            debug!(
                "具名外部对象 {} ({}) 不满足能力 {}",
                name, obj.info, capability
            );
        }
        view
    }
}

/// 注册表构建器
#[derive(Debug, Default)]
pub struct ExternalRegistryBuilder {
    anonymous: Vec<ExternalObject>,
    named: HashMap<String, ExternalObject>,
    options: LookupOptions,
}

impl ExternalRegistryBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册匿名外部对象
    pub fn add(mut self, extern_obj: impl Into<ExternalObject>) -> Self {
        let extern_obj = extern_obj.into();
        debug!("注册匿名外部对象: {}", extern_obj.info);
        self.anonymous.push(extern_obj);
        self
    }

    /// 注册具名外部对象，同名时后注册者覆盖
    pub fn add_named(
        mut self,
        name: &str,
        extern_obj: impl Into<ExternalObject>,
    ) -> Result<Self, RegistrationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        let extern_obj = extern_obj.into();
        debug!("注册具名外部对象: {} ({})", name, extern_obj.info);
        if let Some(previous) = self.named.insert(name.to_string(), extern_obj) {
            warn!("具名外部对象 {} 已存在，覆盖原对象 {}", name, previous.info);
        }
        Ok(self)
    }

    /// 设置查找选项
    pub fn with_options(mut self, options: LookupOptions) -> Self {
        self.options = options;
        self
    }

    /// 设置匿名查找是否包含具名对象
    pub fn anonymous_includes_named(mut self, enabled: bool) -> Self {
        self.options.anonymous_includes_named = enabled;
        self
    }

    /// 构建只读注册表
    pub fn build(self) -> ExternalRegistry {
        info!(
            "外部对象注册表构建完成: 匿名 {} 个, 具名 {} 个",
            self.anonymous.len(),
            self.named.len()
        );
        ExternalRegistry {
            anonymous: self.anonymous,
            named: self.named,
            options: self.options,
        }
    }
}
