//! 外部绑定声明与能力描述

use crossbinder_common::TypeInfo;
use std::fmt;

/// 外部绑定声明
///
/// 对应字段或方法参数上的 `#[external(...)]` 标记。名称在构造时去除首尾空白，
/// 空名称表示按能力匿名查找。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Binding {
    name: Option<String>,
    optional: bool,
}

impl Binding {
    /// 匿名绑定，仅按能力匹配
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// 具名绑定
    pub fn named(name: impl AsRef<str>) -> Self {
        Self {
            name: normalize(name.as_ref()),
            optional: false,
        }
    }

    /// 从标记属性构造：`name` 非空时优先，否则使用 `value`
    pub fn from_attribute(name: &str, value: &str, optional: bool) -> Self {
        let name = normalize(name).or_else(|| normalize(value));
        Self { name, optional }
    }

    /// 标记为可选绑定
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// 设置是否可选
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// 声明的查找名称
    pub fn declared_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 是否为具名绑定
    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    /// 是否为可选绑定
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "external(name = \"{}\"", name)?,
            None => f.write_str("external(")?,
        }
        if self.optional {
            if self.name.is_some() {
                f.write_str(", ")?;
            }
            f.write_str("optional")?;
        }
        f.write_str(")")
    }
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// 能力种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    /// 接口能力（`dyn Trait`）
    Interface,
    /// 具体类型
    Concrete,
}

/// 成员所需的能力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capability {
    /// 能力类型
    pub info: TypeInfo,
    /// 能力种类
    pub kind: CapabilityKind,
}

impl Capability {
    /// 接口能力，`C` 通常为 `dyn Trait`
    pub fn interface<C: ?Sized + 'static>() -> Self {
        Self {
            info: TypeInfo::of::<C>(),
            kind: CapabilityKind::Interface,
        }
    }

    /// 具体类型能力
    pub fn concrete<C: 'static>() -> Self {
        Self {
            info: TypeInfo::of::<C>(),
            kind: CapabilityKind::Concrete,
        }
    }

    /// 是否为接口能力
    pub fn is_interface(&self) -> bool {
        self.kind == CapabilityKind::Interface
    }
}
