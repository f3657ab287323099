use crate::derive_utils::apply_derives;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, ItemStruct, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[value_object] 宏实现
/// - 支持结构体（具名或 tuple）与枚举
/// - 合并/追加派生：Default（可控）, Clone, Debug（可控）, Serialize, Deserialize, PartialEq, Eq
/// - `scalar`：单字段 tuple struct 的标量值对象，按内部值比较、哈希与显示
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as ValueObjectAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Clone),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
    ];
    if cfg.default.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Default));
    }
    if cfg.debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }

    match &mut input {
        Item::Struct(st) if cfg.scalar => {
            required.push(syn::parse_quote!(Hash));
            apply_derives(&mut st.attrs, required);
            match scalar_impls(st) {
                Ok(extra) => TokenStream::from(quote! { #st #extra }),
                Err(err) => err.to_compile_error().into(),
            }
        }
        Item::Struct(st) => {
            apply_derives(&mut st.attrs, required);
            TokenStream::from(quote! { #st })
        }
        Item::Enum(en) if !cfg.scalar => {
            apply_derives(&mut en.attrs, required);
            TokenStream::from(quote! { #en })
        }
        Item::Enum(en) => syn::Error::new(en.span(), "`scalar` is only valid on tuple structs")
            .to_compile_error()
            .into(),
        other => syn::Error::new(other.span(), "#[value_object] only supports struct or enum")
            .to_compile_error()
            .into(),
    }
}

fn scalar_impls(st: &ItemStruct) -> Result<TokenStream2> {
    let inner_ty = match &st.fields {
        syn::Fields::Unnamed(f) if f.unnamed.len() == 1 => &f.unnamed[0].ty,
        other => {
            return Err(syn::Error::new(
                other.span(),
                "#[value_object(scalar)] requires a tuple struct with exactly one field",
            ));
        }
    };

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            pub fn new(value: impl ::core::convert::Into<#inner_ty>) -> Self { Self(value.into()) }

            pub fn value(&self) -> &#inner_ty { &self.0 }
        }

        impl #impl_generics ::std::fmt::Display for #ident #ty_generics #where_clause
        where #inner_ty: ::std::fmt::Display
        {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl #impl_generics ::core::convert::AsRef<#inner_ty> for #ident #ty_generics #where_clause {
            fn as_ref(&self) -> &#inner_ty { &self.0 }
        }

        impl #impl_generics ::core::convert::From<#inner_ty> for #ident #ty_generics #where_clause {
            fn from(value: #inner_ty) -> Self { Self(value) }
        }

        impl #impl_generics ::core::convert::From<#ident #ty_generics> for #inner_ty #where_clause {
            fn from(value: #ident #ty_generics) -> Self { value.0 }
        }
    })
}

// -------- parsing --------

#[derive(Default)]
struct ValueObjectAttrConfig {
    debug: Option<bool>,
    default: Option<bool>,
    scalar: bool,
}

impl Parse for ValueObjectAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self::default();
        if input.is_empty() {
            return Ok(cfg);
        }

        let pairs: Punctuated<ValueObjectAttrElem, Token![,]> =
            Punctuated::parse_terminated(input)?;
        for elem in pairs {
            let duplicate = match elem {
                ValueObjectAttrElem::Debug(b) => cfg.debug.replace(b).is_some(),
                ValueObjectAttrElem::Default(b) => cfg.default.replace(b).is_some(),
                ValueObjectAttrElem::Scalar => std::mem::replace(&mut cfg.scalar, true),
            };
            if duplicate {
                return Err(syn::Error::new(
                    proc_macro2::Span::call_site(),
                    "duplicate key in #[value_object] attribute",
                ));
            }
        }
        Ok(cfg)
    }
}

enum ValueObjectAttrElem {
    Debug(bool),
    Default(bool),
    Scalar,
}

impl Parse for ValueObjectAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        match key.to_string().as_str() {
            "scalar" => Ok(Self::Scalar),
            "debug" => Ok(Self::Debug(parse_bool(input, "debug")?)),
            "default" => Ok(Self::Default(parse_bool(input, "default")?)),
            _ => Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'debug', 'default' or 'scalar'",
            )),
        }
    }
}

fn parse_bool(input: ParseStream, key: &str) -> Result<bool> {
    let _eq: Token![=] = input.parse()?;
    let expr: syn::Expr = input.parse()?;
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Bool(b),
            ..
        }) => Ok(b.value()),
        other => Err(syn::Error::new(
            other.span(),
            format!("expected boolean literal for '{key}'"),
        )),
    }
}
