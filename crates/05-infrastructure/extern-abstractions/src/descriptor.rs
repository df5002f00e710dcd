//! 成员描述符
//!
//! 用显式的描述符代替运行时反射：每个类型通过 [`TypeDescriptor`] 列出带外部绑定的
//! 字段、父类型以及运行时方法列表，成员的写入和调用由描述符中的闭包完成。

use crate::binding::{Binding, Capability};
use crate::handle::{downcast_target, AccessError, Arguments, ExternHandle};
use crate::target::ExternalTarget;
use crossbinder_common::TypeInfo;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// 字段设置器
pub type FieldSetter =
    Arc<dyn Fn(&mut dyn Any, ExternHandle) -> Result<(), AccessError> + Send + Sync>;

/// 方法调用器
pub type MethodInvoker =
    Arc<dyn Fn(&mut dyn Any, &Arguments) -> Result<(), AccessError> + Send + Sync>;

/// 父类型投影：从子类型实例取得内嵌的父类型实例
pub type Projection =
    Arc<dyn for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync>;

fn projection<F>(f: F) -> Projection
where
    F: for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// 字段存储方式
#[derive(Clone)]
pub enum FieldStorage {
    /// 实例字段
    Instance(FieldSetter),
    /// 类级别（静态）字段，永不写入
    Static,
}

/// 字段描述符
#[derive(Clone)]
pub struct FieldDescriptor {
    /// 字段名称
    pub name: &'static str,
    /// 声明该字段的类型
    pub owner: TypeInfo,
    /// 字段声明的能力类型
    pub declared_type: TypeInfo,
    /// 外部绑定声明
    pub binding: Binding,
    storage: FieldStorage,
}

impl FieldDescriptor {
    /// 从组成部分创建实例字段描述符
    pub fn from_parts(
        name: &'static str,
        owner: TypeInfo,
        declared_type: TypeInfo,
        binding: Binding,
        setter: FieldSetter,
    ) -> Self {
        Self {
            name,
            owner,
            declared_type,
            binding,
            storage: FieldStorage::Instance(setter),
        }
    }

    /// 创建类级别字段描述符
    pub fn class_level(
        name: &'static str,
        owner: TypeInfo,
        declared_type: TypeInfo,
        binding: Binding,
    ) -> Self {
        Self {
            name,
            owner,
            declared_type,
            binding,
            storage: FieldStorage::Static,
        }
    }

    /// 是否为类级别字段
    pub fn is_static(&self) -> bool {
        matches!(self.storage, FieldStorage::Static)
    }

    /// 将外部对象写入目标字段
    pub fn assign(&self, target: &mut dyn Any, value: ExternHandle) -> Result<(), AccessError> {
        match &self.storage {
            FieldStorage::Instance(setter) => setter(target, value),
            FieldStorage::Static => Err(AccessError::rejected(format!(
                "类级别字段 {}#{} 不允许写入",
                self.owner, self.name
            ))),
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("owner", &self.owner.name)
            .field("declared_type", &self.declared_type.name)
            .field("binding", &self.binding)
            .field("static", &self.is_static())
            .finish()
    }
}

/// 方法参数描述符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescriptor {
    /// 参数名称
    pub name: &'static str,
    /// 声明的参数类型（源码形式）
    pub declared_type: &'static str,
    /// 参数能力，非 `Arc<C>` 形式的参数为 `None`
    pub capability: Option<Capability>,
    /// 外部绑定声明
    pub binding: Option<Binding>,
}

impl ParamDescriptor {
    /// 参数是否可由外部对象注入：接口能力且带绑定声明
    pub fn is_injectable(&self) -> bool {
        self.binding.is_some() && self.capability.is_some_and(|cap| cap.is_interface())
    }
}

/// 方法接收者
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// 实例方法
    Instance,
    /// 类级别（静态）方法
    Static,
}

/// 方法返回类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    /// 无返回值（`()` 或 `Result<(), E>`）
    Unit,
    /// 有返回值
    Value(&'static str),
}

/// 方法描述符
#[derive(Clone)]
pub struct MethodDescriptor {
    /// 方法名称
    pub name: &'static str,
    /// 声明该方法的类型
    pub owner: TypeInfo,
    /// 接收者
    pub receiver: Receiver,
    /// 是否为抽象方法
    pub is_abstract: bool,
    /// 返回类型
    pub returns: ReturnKind,
    /// 参数列表
    pub params: Vec<ParamDescriptor>,
    invoker: Option<MethodInvoker>,
}

impl MethodDescriptor {
    /// 创建方法描述符构建器
    pub fn builder<T: Any>(name: &'static str) -> MethodBuilder<T> {
        MethodBuilder::new(name)
    }

    /// 是否为类级别方法
    pub fn is_static(&self) -> bool {
        self.receiver == Receiver::Static
    }

    /// 是否无返回值
    pub fn returns_unit(&self) -> bool {
        self.returns == ReturnKind::Unit
    }

    /// 是否带有调用器
    pub fn is_invocable(&self) -> bool {
        self.invoker.is_some()
    }

    /// 方法签名：名称加参数类型，用于判断覆盖
    pub fn signature(&self) -> (&'static str, Vec<&'static str>) {
        (
            self.name,
            self.params.iter().map(|p| p.declared_type).collect(),
        )
    }

    /// 在目标上调用方法
    pub fn invoke(&self, target: &mut dyn Any, args: &Arguments) -> Result<(), AccessError> {
        match &self.invoker {
            Some(invoker) => invoker(target, args),
            None => Err(AccessError::rejected(format!(
                "方法 {}:{} 没有可用的调用器",
                self.owner, self.name
            ))),
        }
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("owner", &self.owner.name)
            .field("receiver", &self.receiver)
            .field("is_abstract", &self.is_abstract)
            .field("returns", &self.returns)
            .field("params", &self.params)
            .field("invocable", &self.is_invocable())
            .finish()
    }
}

/// 方法描述符构建器
pub struct MethodBuilder<T> {
    name: &'static str,
    receiver: Receiver,
    is_abstract: bool,
    returns: ReturnKind,
    params: Vec<ParamDescriptor>,
    invoker: Option<MethodInvoker>,
    _marker: PhantomData<fn(&mut T)>,
}

impl<T: Any> MethodBuilder<T> {
    /// 创建新的方法构建器，默认为无返回值的实例方法
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            receiver: Receiver::Instance,
            is_abstract: false,
            returns: ReturnKind::Unit,
            params: Vec::new(),
            invoker: None,
            _marker: PhantomData,
        }
    }

    /// 添加接口能力参数
    ///
    /// `C` 必须是 `dyn Trait`，具体类型参数请使用 [`Self::concrete_param`]。
    pub fn param<C: ?Sized + 'static>(mut self, name: &'static str, binding: Binding) -> Self {
        self.params.push(ParamDescriptor {
            name,
            declared_type: std::any::type_name::<C>(),
            capability: Some(Capability::interface::<C>()),
            binding: Some(binding),
        });
        self
    }

    /// 添加具体类型参数
    pub fn concrete_param<C: 'static>(
        mut self,
        name: &'static str,
        binding: Option<Binding>,
    ) -> Self {
        self.params.push(ParamDescriptor {
            name,
            declared_type: std::any::type_name::<C>(),
            capability: Some(Capability::concrete::<C>()),
            binding,
        });
        self
    }

    /// 添加接口能力但未标记绑定的参数
    pub fn unbound_param<C: ?Sized + 'static>(mut self, name: &'static str) -> Self {
        self.params.push(ParamDescriptor {
            name,
            declared_type: std::any::type_name::<C>(),
            capability: Some(Capability::interface::<C>()),
            binding: None,
        });
        self
    }

    /// 添加与外部对象无关的普通参数
    pub fn plain_param(mut self, name: &'static str, declared_type: &'static str) -> Self {
        self.params.push(ParamDescriptor {
            name,
            declared_type,
            capability: None,
            binding: None,
        });
        self
    }

    /// 设置参数描述符
    pub fn raw_param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    /// 标记为有返回值
    pub fn returns_value(mut self, type_name: &'static str) -> Self {
        self.returns = ReturnKind::Value(type_name);
        self
    }

    /// 标记为类级别方法
    pub fn class_level(mut self) -> Self {
        self.receiver = Receiver::Static;
        self
    }

    /// 标记为抽象方法
    pub fn abstract_method(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// 设置类型化调用器
    pub fn invoker<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut T, &Arguments) -> Result<(), AccessError> + Send + Sync + 'static,
    {
        self.invoker = Some(Arc::new(move |target: &mut dyn Any, args: &Arguments| {
            let this = downcast_target::<T>(target)?;
            f(this, args)
        }));
        self
    }

    /// 设置类型擦除的调用器
    pub fn raw_invoker(mut self, invoker: MethodInvoker) -> Self {
        self.invoker = Some(invoker);
        self
    }

    /// 构建方法描述符
    pub fn build(self) -> MethodDescriptor {
        MethodDescriptor {
            name: self.name,
            owner: TypeInfo::of::<T>(),
            receiver: self.receiver,
            is_abstract: self.is_abstract,
            returns: self.returns,
            params: self.params,
            invoker: self.invoker,
        }
    }
}

/// 父类型链接
#[derive(Clone)]
pub struct SuperType {
    /// 父类型描述符
    pub descriptor: Arc<TypeDescriptor>,
    projection: Projection,
}

impl SuperType {
    /// 从子类型实例取得父类型实例
    pub fn project<'a>(&self, target: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        (self.projection)(target)
    }
}

impl fmt::Debug for SuperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperType")
            .field("descriptor", &self.descriptor.info.name)
            .finish()
    }
}

/// 类型描述符
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    info: TypeInfo,
    fields: Vec<FieldDescriptor>,
    superclass: Option<SuperType>,
    methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// 创建类型描述符构建器
    pub fn builder<T: Any>() -> TypeDescriptorBuilder<T> {
        TypeDescriptorBuilder::new()
    }

    /// 被描述的类型
    pub fn info(&self) -> TypeInfo {
        self.info
    }

    /// 本类型声明的字段（不含父类型）
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// 父类型
    pub fn superclass(&self) -> Option<&SuperType> {
        self.superclass.as_ref()
    }

    /// 运行时方法列表（含未被覆盖的继承方法）
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// 按名称查找方法
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// 从自身开始沿父类型链遍历
    pub fn lineage(&self) -> impl Iterator<Item = &TypeDescriptor> {
        std::iter::successors(Some(self), |d| {
            d.superclass.as_ref().map(|s| s.descriptor.as_ref())
        })
    }
}

/// 类型描述符构建器
pub struct TypeDescriptorBuilder<T> {
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
    superclass: Option<SuperType>,
    inherited: Vec<MethodDescriptor>,
    _marker: PhantomData<fn(&mut T)>,
}

impl<T: Any> TypeDescriptorBuilder<T> {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            methods: Vec::new(),
            superclass: None,
            inherited: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// 添加实例字段，字段以 `Option<Arc<C>>` 保存外部对象
    pub fn field<C>(
        mut self,
        name: &'static str,
        binding: Binding,
        accessor: fn(&mut T) -> &mut Option<Arc<C>>,
    ) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let setter: FieldSetter = Arc::new(move |target: &mut dyn Any, value: ExternHandle| {
            let this = downcast_target::<T>(target)?;
            let resolved = value.downcast::<C>().ok_or_else(|| {
                AccessError::rejected(format!(
                    "外部对象能力 {} 无法赋值给 {}",
                    value.capability(),
                    std::any::type_name::<C>()
                ))
            })?;
            *accessor(this) = Some(resolved);
            Ok(())
        });
        self.fields.push(FieldDescriptor::from_parts(
            name,
            TypeInfo::of::<T>(),
            TypeInfo::of::<C>(),
            binding,
            setter,
        ));
        self
    }

    /// 添加类级别字段
    pub fn static_field<C: ?Sized + 'static>(
        mut self,
        name: &'static str,
        binding: Binding,
    ) -> Self {
        self.fields.push(FieldDescriptor::class_level(
            name,
            TypeInfo::of::<T>(),
            TypeInfo::of::<C>(),
            binding,
        ));
        self
    }

    /// 添加字段描述符
    pub fn raw_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// 添加方法描述符
    pub fn method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// 声明父类型，`accessor` 返回内嵌的父类型实例
    ///
    /// 父类型的方法并入运行时方法列表，除非被同名同参数的方法覆盖。
    pub fn extends<P: ExternalTarget>(mut self, accessor: fn(&mut T) -> &mut P) -> Self {
        let parent = Arc::new(P::type_descriptor());

        self.inherited = parent
            .methods()
            .iter()
            .map(|method| {
                let mut inherited = method.clone();
                inherited.invoker = method.invoker.clone().map(|inner| -> MethodInvoker {
                    Arc::new(move |target: &mut dyn Any, args: &Arguments| {
                        let this = downcast_target::<T>(target)?;
                        inner(accessor(this) as &mut dyn Any, args)
                    })
                });
                inherited
            })
            .collect();

        self.superclass = Some(SuperType {
            descriptor: parent,
            projection: projection(move |target| {
                target
                    .downcast_mut::<T>()
                    .map(|this| accessor(this) as &mut dyn Any)
            }),
        });
        self
    }

    /// 构建类型描述符
    pub fn build(self) -> TypeDescriptor {
        let mut methods = self.methods;
        let overridden: Vec<_> = methods.iter().map(MethodDescriptor::signature).collect();
        methods.extend(
            self.inherited
                .into_iter()
                .filter(|m| !overridden.contains(&m.signature())),
        );

        TypeDescriptor {
            info: TypeInfo::of::<T>(),
            fields: self.fields,
            superclass: self.superclass,
            methods,
        }
    }
}

impl<T: Any> Default for TypeDescriptorBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
