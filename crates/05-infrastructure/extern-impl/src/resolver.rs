//! 外部依赖解析器
//!
//! 在宿主容器完成自身注入之后，对目标对象执行两轮处理：
//!
//! 1. 字段轮：沿父类型链逐层写入带外部绑定的实例字段；
//! 2. 方法轮：调用运行时方法列表中参数全部可注入的无返回值实例方法。

use crossbinder_common::{ResolutionError, ResolutionResult, TypeInfo};
use dashmap::DashMap;
use extern_abstractions::{
    Arguments, ExternLookup, ExternalTarget, Managed, MethodDescriptor, ParamDescriptor,
    TypeDescriptor,
};
use std::any::{Any, TypeId};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// 外部依赖解析器
pub struct ExternResolver {
    lookup: Arc<dyn ExternLookup>,
    descriptors: DashMap<TypeId, Arc<TypeDescriptor>>,
    cache_descriptors: bool,
}

impl ExternResolver {
    /// 创建解析器
    pub fn new(lookup: Arc<dyn ExternLookup>) -> Self {
        Self {
            lookup,
            descriptors: DashMap::new(),
            cache_descriptors: true,
        }
    }

    /// 设置是否缓存类型描述符
    pub fn with_descriptor_cache(mut self, enabled: bool) -> Self {
        self.cache_descriptors = enabled;
        self
    }

    /// 外部对象查找器
    pub fn lookup(&self) -> &Arc<dyn ExternLookup> {
        &self.lookup
    }

    /// 已缓存的描述符数量
    pub fn cached_descriptor_count(&self) -> usize {
        self.descriptors.len()
    }

    /// 解析类型化目标
    pub fn resolve<T: ExternalTarget>(&self, target: &mut T) -> ResolutionResult<()> {
        let descriptor = self.descriptor_for(TypeInfo::of::<T>(), T::type_descriptor);
        self.resolve_with(&descriptor, target)
    }

    /// 解析宿主容器管理的对象
    pub fn resolve_managed(&self, target: &mut dyn Managed) -> ResolutionResult<()> {
        let descriptor = self.descriptor_for(target.managed_type(), || target.describe());
        self.resolve_with(&descriptor, target.as_any_mut())
    }

    /// 按给定描述符解析目标
    pub fn resolve_with(
        &self,
        descriptor: &TypeDescriptor,
        target: &mut dyn Any,
    ) -> ResolutionResult<()> {
        if Any::type_id(&*target) != descriptor.info().id {
            error!("解析目标类型不匹配: 期望 {}", descriptor.info());
            return Err(ResolutionError::TargetMismatch {
                expected: descriptor.info().name.to_string(),
            });
        }

        debug!("开始解析外部依赖: {}", descriptor.info());
        self.assign_fields(descriptor, target)?;
        for method in descriptor.methods() {
            self.assign_method(method, target)?;
        }
        debug!("外部依赖解析完成: {}", descriptor.info());
        Ok(())
    }

    fn descriptor_for(
        &self,
        info: TypeInfo,
        build: impl FnOnce() -> TypeDescriptor,
    ) -> Arc<TypeDescriptor> {
        if !self.cache_descriptors {
            return Arc::new(build());
        }
        if let Some(cached) = self.descriptors.get(&info.id) {
            return cached.value().clone();
        }
        let descriptor = Arc::new(build());
        self.descriptors
            .entry(info.id)
            .or_insert(descriptor)
            .value()
            .clone()
    }

    fn assign_fields(
        &self,
        descriptor: &TypeDescriptor,
        target: &mut dyn Any,
    ) -> ResolutionResult<()> {
        for field in descriptor.fields() {
            if field.is_static() {
                // 类级别字段不允许注入
                warn!(
                    "fqcn = {}, field = {} (skip_external_assignment: static field)",
                    field.owner, field.name
                );
                continue;
            }

            let Some(value) = self.lookup.find(&field.binding, &field.declared_type) else {
                if field.binding.is_optional() {
                    debug!("可选外部字段未解析，保持原值: {}#{}", field.owner, field.name);
                    continue;
                }
                error!("外部字段未找到目标: {}#{}", field.owner, field.name);
                return Err(ResolutionError::FieldTargetNotFound {
                    owner: field.owner.name.to_string(),
                    field: field.name.to_string(),
                });
            };

            field
                .assign(target, value)
                .map_err(|e| ResolutionError::FieldAssignment {
                    owner: field.owner.name.to_string(),
                    field: field.name.to_string(),
                    source: Box::new(e),
                })?;
            debug!("外部字段已赋值: {}#{}", field.owner, field.name);
        }

        if let Some(superclass) = descriptor.superclass() {
            let parent = superclass.project(target).ok_or_else(|| {
                ResolutionError::TargetMismatch {
                    expected: descriptor.info().name.to_string(),
                }
            })?;
            self.assign_fields(&superclass.descriptor, parent)?;
        }
        Ok(())
    }

    fn assign_method(
        &self,
        method: &MethodDescriptor,
        target: &mut dyn Any,
    ) -> ResolutionResult<()> {
        if !is_eligible(method) {
            return Ok(());
        }

        let mut values = Vec::with_capacity(method.params.len());
        for param in &method.params {
            let (Some(binding), Some(capability)) = (&param.binding, &param.capability) else {
                return Ok(());
            };
            match self.lookup.find(binding, &capability.info) {
                Some(value) => values.push(Some(value)),
                None if binding.is_optional() => values.push(None),
                None => {
                    error!(
                        "外部方法参数未找到目标: {}::{}->{}",
                        method.owner, method.name, param.name
                    );
                    return Err(ResolutionError::ParameterTargetNotFound {
                        owner: method.owner.name.to_string(),
                        method: method.name.to_string(),
                        parameter: param.name.to_string(),
                    });
                }
            }
        }

        method
            .invoke(target, &Arguments::new(values))
            .map_err(|e| ResolutionError::MethodInvocation {
                owner: method.owner.name.to_string(),
                method: method.name.to_string(),
                source: Box::new(e),
            })?;
        debug!("外部依赖方法已调用: {}:{}", method.owner, method.name);
        Ok(())
    }
}

impl std::fmt::Debug for ExternResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternResolver")
            .field("cached_descriptors", &self.descriptors.len())
            .field("cache_descriptors", &self.cache_descriptors)
            .finish()
    }
}

/// 方法是否参与注入：非抽象、非静态、无返回值、至少一个参数且参数全部可注入
fn is_eligible(method: &MethodDescriptor) -> bool {
    !method.is_abstract
        && !method.is_static()
        && method.returns_unit()
        && !method.params.is_empty()
        && method.params.iter().all(ParamDescriptor::is_injectable)
}
