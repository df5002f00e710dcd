//! ExternalTarget 派生宏实现

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

use crate::utils::{find_single_attribute, parse_external_args, split_shared_type};

/// 实现 #[derive(ExternalTarget)]
pub fn derive_external_target_impl(input: DeriveInput) -> TokenStream {
    match expand(&input) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// 结构体级别的 `#[extern_target(...)]` 参数
#[derive(Debug, Default)]
struct TargetArgs {
    /// 是否并入 `#[extern_methods]` 生成的方法列表
    methods: bool,
}

fn parse_target_args(input: &DeriveInput) -> Result<TargetArgs> {
    let mut args = TargetArgs::default();
    if let Some(attr) = find_single_attribute(&input.attrs, "extern_target")? {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("methods") {
                args.methods = true;
                Ok(())
            } else {
                Err(meta.error("不支持的 extern_target 参数，可用参数: methods"))
            }
        })?;
    }
    Ok(args)
}

fn expand(input: &DeriveInput) -> Result<TokenStream2> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "ExternalTarget 派生不支持泛型类型",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => {
                return expand_with(struct_name, Vec::new(), Vec::new(), parse_target_args(input)?)
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "ExternalTarget 只能用于具名字段结构体",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "ExternalTarget 只能用于结构体",
            ))
        }
    };

    let mut accessors = Vec::new();
    let mut registrations = Vec::new();
    let mut has_parent = false;

    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };
        let ty = &field.ty;
        let external = find_single_attribute(&field.attrs, "external")?;
        let parent = find_single_attribute(&field.attrs, "extern_parent")?;

        match (external, parent) {
            (Some(attr), Some(_)) => {
                return Err(syn::Error::new_spanned(
                    attr,
                    "#[external] 与 #[extern_parent] 不能用于同一字段",
                ));
            }
            (Some(attr), None) => {
                let args = parse_external_args(attr)?;
                match split_shared_type(ty) {
                    Some((_, true)) => {}
                    _ => {
                        return Err(syn::Error::new_spanned(
                            ty,
                            "外部字段类型必须为 Option<Arc<T>>",
                        ));
                    }
                }

                let accessor = format_ident!("__extern_field_{}", ident.unraw());
                let field_name = ident.unraw().to_string();
                let binding = args.binding_tokens();
                accessors.push(quote! {
                    fn #accessor(this: &mut #struct_name) -> &mut #ty {
                        &mut this.#ident
                    }
                });
                registrations.push(quote! {
                    .field(#field_name, #binding, #accessor)
                });
            }
            (None, Some(attr)) => {
                if has_parent {
                    return Err(syn::Error::new_spanned(
                        attr,
                        "最多只能声明一个 #[extern_parent] 字段",
                    ));
                }
                has_parent = true;

                let accessor = format_ident!("__extern_parent_{}", ident.unraw());
                accessors.push(quote! {
                    fn #accessor(this: &mut #struct_name) -> &mut #ty {
                        &mut this.#ident
                    }
                });
                registrations.push(quote! {
                    .extends::<#ty>(#accessor)
                });
            }
            (None, None) => {}
        }
    }

    expand_with(struct_name, accessors, registrations, parse_target_args(input)?)
}

fn expand_with(
    struct_name: &syn::Ident,
    accessors: Vec<TokenStream2>,
    registrations: Vec<TokenStream2>,
    args: TargetArgs,
) -> Result<TokenStream2> {
    let methods = if args.methods {
        quote! {
            for method in <#struct_name as ::extern_abstractions::ExternMethods>::extern_methods() {
                builder = builder.method(method);
            }
        }
    } else {
        quote! {}
    };

    Ok(quote! {
        impl ::extern_abstractions::ExternalTarget for #struct_name {
            fn type_descriptor() -> ::extern_abstractions::TypeDescriptor {
                #(#accessors)*

                #[allow(unused_mut)]
                let mut builder = ::extern_abstractions::TypeDescriptor::builder::<Self>()
                    #(#registrations)*;
                #methods
                builder.build()
            }
        }
    })
}
