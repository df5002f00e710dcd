//! 运行时方法列表宏实现

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    FnArg, ImplItem, ImplItemFn, ItemImpl, Pat, Result, ReturnType, Type, Visibility,
};

use crate::utils::{
    extract_generic_type, find_single_attribute, is_result_type, is_trait_object, is_unit_type,
    parse_external_args, split_shared_type, type_to_string, ExternalArgs,
};

/// 实现 #[extern_methods]
pub fn extern_methods_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "extern_methods 宏不接受参数",
        )
        .to_compile_error()
        .into();
    }

    let mut item = match syn::parse::<ItemImpl>(input) {
        Ok(item) => item,
        Err(e) => return e.to_compile_error().into(),
    };

    match expand(&mut item) {
        Ok(methods_impl) => quote! {
            #item

            #methods_impl
        }
        .into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(item: &mut ItemImpl) -> Result<TokenStream2> {
    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "extern_methods 只能用于固有 impl 块",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "extern_methods 不支持泛型 impl 块",
        ));
    }

    let self_ty = item.self_ty.clone();
    let mut descriptors = Vec::new();

    for impl_item in &mut item.items {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        // 参数上的 #[external] 由本宏消费，需从输出中移除
        let bindings = take_param_bindings(method)?;
        if !matches!(method.vis, Visibility::Public(_)) {
            continue;
        }
        if let Some(descriptor) = describe_method(&self_ty, method, &bindings)? {
            descriptors.push(descriptor);
        }
    }

    Ok(quote! {
        impl ::extern_abstractions::ExternMethods for #self_ty {
            fn extern_methods() -> ::std::vec::Vec<::extern_abstractions::MethodDescriptor> {
                ::std::vec![#(#descriptors),*]
            }
        }
    })
}

fn take_param_bindings(method: &mut ImplItemFn) -> Result<Vec<Option<ExternalArgs>>> {
    let mut bindings = Vec::new();
    for input in &mut method.sig.inputs {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };
        let args = find_single_attribute(&pat_type.attrs, "external")?
            .map(parse_external_args)
            .transpose()?;
        pat_type.attrs.retain(|attr| !attr.path().is_ident("external"));
        bindings.push(args);
    }
    Ok(bindings)
}

/// 方法返回类型分类
enum Returns {
    Unit,
    Fallible,
    Value(String),
}

fn classify_return(output: &ReturnType) -> Returns {
    match output {
        ReturnType::Default => Returns::Unit,
        ReturnType::Type(_, ty) if is_unit_type(ty) => Returns::Unit,
        ReturnType::Type(_, ty)
            if is_result_type(ty) && extract_generic_type(ty).is_some_and(is_unit_type) =>
        {
            Returns::Fallible
        }
        ReturnType::Type(_, ty) => Returns::Value(type_to_string(ty)),
    }
}

fn describe_method(
    self_ty: &Type,
    method: &ImplItemFn,
    bindings: &[Option<ExternalArgs>],
) -> Result<Option<TokenStream2>> {
    let sig = &method.sig;
    let receiver = sig.receiver();

    // 按值接收 self 或带泛型参数的方法无法在运行时调用
    if receiver.is_some_and(|r| r.reference.is_none()) || !sig.generics.params.is_empty() {
        return Ok(None);
    }

    let method_ident = &sig.ident;
    let method_name = method_ident.unraw().to_string();
    let mut params = Vec::new();
    let mut arguments = Vec::new();
    let mut injectable = true;

    let typed = sig.inputs.iter().filter_map(|input| match input {
        FnArg::Typed(pat_type) => Some(pat_type),
        FnArg::Receiver(_) => None,
    });

    for (index, (pat_type, binding)) in typed.zip(bindings).enumerate() {
        let param_name = match pat_type.pat.as_ref() {
            Pat::Ident(pat_ident) => pat_ident.ident.unraw().to_string(),
            _ => format!("arg{}", index),
        };
        let ty = pat_type.ty.as_ref();

        match (split_shared_type(ty), binding) {
            (Some((inner, is_optional)), Some(args)) => {
                if args.optional && !is_optional {
                    return Err(syn::Error::new_spanned(
                        ty,
                        "可选外部参数必须声明为 Option<Arc<T>>",
                    ));
                }
                let binding = args.binding_tokens();
                if is_trait_object(inner) {
                    params.push(quote! { .param::<#inner>(#param_name, #binding) });
                } else {
                    injectable = false;
                    params.push(quote! {
                        .concrete_param::<#inner>(#param_name, ::std::option::Option::Some(#binding))
                    });
                }
                arguments.push(if is_optional {
                    quote! { args.optional::<#inner>(#index)? }
                } else {
                    quote! { args.required::<#inner>(#index)? }
                });
            }
            (Some((inner, _)), None) => {
                injectable = false;
                if is_trait_object(inner) {
                    params.push(quote! { .unbound_param::<#inner>(#param_name) });
                } else {
                    params.push(quote! {
                        .concrete_param::<#inner>(#param_name, ::std::option::Option::None)
                    });
                }
            }
            (None, Some(_)) => {
                return Err(syn::Error::new_spanned(
                    ty,
                    "外部参数类型必须为 Arc<T> 或 Option<Arc<T>>",
                ));
            }
            (None, None) => {
                injectable = false;
                let declared = type_to_string(ty);
                params.push(quote! { .plain_param(#param_name, #declared) });
            }
        }
    }

    let returns = if sig.asyncness.is_some() {
        Returns::Value("impl Future".to_string())
    } else {
        classify_return(&sig.output)
    };

    let class_level = if receiver.is_none() {
        quote! { .class_level() }
    } else {
        quote! {}
    };

    let return_kind = match &returns {
        Returns::Value(type_name) => quote! { .returns_value(#type_name) },
        Returns::Unit | Returns::Fallible => quote! {},
    };

    let invoker = if receiver.is_some() && injectable && !arguments.is_empty() {
        let call = quote! { this.#method_ident(#(#arguments),*) };
        match returns {
            Returns::Unit => quote! {
                .invoker(|this: &mut #self_ty, args: &::extern_abstractions::Arguments| {
                    #call;
                    ::std::result::Result::Ok(())
                })
            },
            Returns::Fallible => quote! {
                .invoker(|this: &mut #self_ty, args: &::extern_abstractions::Arguments| {
                    #call.map_err(::extern_abstractions::AccessError::failed)?;
                    ::std::result::Result::Ok(())
                })
            },
            Returns::Value(_) => quote! {},
        }
    } else {
        quote! {}
    };

    Ok(Some(quote! {
        ::extern_abstractions::MethodDescriptor::builder::<#self_ty>(#method_name)
            #(#params)*
            #class_level
            #return_kind
            #invoker
            .build()
    }))
}
