//! 宏工具函数

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, LitBool, LitStr, Meta, Result, Type};

/// `#[external(...)]` 标记参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalArgs {
    /// 查找名称，优先于 `value`
    pub name: String,
    /// 查找名称的简写形式
    pub value: String,
    /// 是否可选
    pub optional: bool,
}

impl ExternalArgs {
    /// 生成 `Binding` 构造表达式
    pub fn binding_tokens(&self) -> TokenStream {
        let name = &self.name;
        let value = &self.value;
        let optional = self.optional;
        quote! {
            ::extern_abstractions::Binding::from_attribute(#name, #value, #optional)
        }
    }
}

/// 解析 `#[external]`、`#[external("name")]` 或 `#[external(name = "..", value = "..", optional)]`
pub fn parse_external_args(attr: &Attribute) -> Result<ExternalArgs> {
    let mut args = ExternalArgs::default();

    match &attr.meta {
        Meta::Path(_) => {}
        Meta::List(list) => {
            if let Ok(lit) = syn::parse2::<LitStr>(list.tokens.clone()) {
                args.value = lit.value();
                return Ok(args);
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    args.name = meta.value()?.parse::<LitStr>()?.value();
                } else if meta.path.is_ident("value") {
                    args.value = meta.value()?.parse::<LitStr>()?.value();
                } else if meta.path.is_ident("optional") {
                    args.optional = if meta.input.peek(syn::Token![=]) {
                        meta.value()?.parse::<LitBool>()?.value
                    } else {
                        true
                    };
                } else {
                    return Err(meta.error("不支持的 external 参数，可用参数: name, value, optional"));
                }
                Ok(())
            })?;
        }
        Meta::NameValue(nv) => {
            return Err(syn::Error::new_spanned(
                nv,
                "请使用 #[external(\"name\")] 或 #[external(name = \"name\")] 形式",
            ));
        }
    }

    Ok(args)
}

/// 查找唯一的同名属性
pub fn find_single_attribute<'a>(
    attrs: &'a [Attribute],
    attr_name: &str,
) -> Result<Option<&'a Attribute>> {
    let mut found = attrs.iter().filter(|attr| attr.path().is_ident(attr_name));
    let first = found.next();
    if let Some(duplicate) = found.next() {
        return Err(syn::Error::new_spanned(
            duplicate,
            format!("#[{}] 不能重复声明", attr_name),
        ));
    }
    Ok(first)
}

/// 从类型中提取泛型参数
pub fn extract_generic_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(syn::GenericArgument::Type(inner_type)) = args.args.first() {
                    return Some(inner_type);
                }
            }
        }
    }
    None
}

fn last_segment_is(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == name)
            .unwrap_or(false),
        _ => false,
    }
}

/// 检查类型是否为 Option<T>
pub fn is_option_type(ty: &Type) -> bool {
    last_segment_is(ty, "Option")
}

/// 检查类型是否为 Result<T, E>
pub fn is_result_type(ty: &Type) -> bool {
    last_segment_is(ty, "Result")
}

/// 检查类型是否为 ()
pub fn is_unit_type(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

/// 提取 `Arc<C>` 中的 `C`
pub fn arc_inner(ty: &Type) -> Option<&Type> {
    if last_segment_is(ty, "Arc") {
        extract_generic_type(ty)
    } else {
        None
    }
}

/// 拆分 `Arc<C>` 或 `Option<Arc<C>>`，返回 `C` 以及是否为 Option
pub fn split_shared_type(ty: &Type) -> Option<(&Type, bool)> {
    if is_option_type(ty) {
        extract_generic_type(ty)
            .and_then(arc_inner)
            .map(|inner| (inner, true))
    } else {
        arc_inner(ty).map(|inner| (inner, false))
    }
}

/// 检查类型是否为 trait 对象
pub fn is_trait_object(ty: &Type) -> bool {
    match ty {
        Type::TraitObject(_) => true,
        Type::Paren(paren) => is_trait_object(&paren.elem),
        Type::Group(group) => is_trait_object(&group.elem),
        _ => false,
    }
}

/// 类型的源码形式
pub fn type_to_string(ty: &Type) -> String {
    quote!(#ty).to_string()
}
