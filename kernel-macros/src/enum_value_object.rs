use crate::derive_utils::{apply_derives, screaming_snake};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{ItemEnum, Result, Token, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[enum_value_object] 宏实现
/// - 校验：无字段变体、显式整数判别值、存在值为 0 的未知变体
/// - 派生：Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize（按 SCREAMING_SNAKE_CASE 序列化）
/// - 生成：EnumValueObject / ValueObject / Default / Display
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EnumAttrConfig);
    let en = parse_macro_input!(item as ItemEnum);
    match expand_enum(cfg, en) {
        Ok(ts) => ts.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_enum(cfg: EnumAttrConfig, mut en: ItemEnum) -> Result<TokenStream2> {
    let Some(unknown) = cfg.unknown else {
        return Err(syn::Error::new(
            en.ident.span(),
            "#[enum_value_object] requires `unknown = <NotificationKind expr>`",
        ));
    };

    let mut idents = Vec::with_capacity(en.variants.len());
    let mut values = Vec::with_capacity(en.variants.len());
    let mut names = Vec::with_capacity(en.variants.len());
    let mut zero = None;

    for v in &en.variants {
        if !matches!(v.fields, syn::Fields::Unit) {
            return Err(syn::Error::new(
                v.span(),
                "#[enum_value_object] variants must not carry fields",
            ));
        }
        let value = match &v.discriminant {
            Some((
                _,
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Int(lit),
                    ..
                }),
            )) => lit.base10_parse::<i32>()?,
            _ => {
                return Err(syn::Error::new(
                    v.span(),
                    "#[enum_value_object] variants need an explicit integer discriminant",
                ));
            }
        };
        if value == 0 {
            zero = Some(v.ident.clone());
        }
        names.push(screaming_snake(&v.ident.to_string()));
        idents.push(v.ident.clone());
        values.push(value);
    }

    let Some(zero) = zero else {
        return Err(syn::Error::new(
            en.ident.span(),
            "#[enum_value_object] requires an unknown variant with discriminant 0",
        ));
    };

    let required: Vec<syn::Path> = vec![
        syn::parse_quote!(Debug),
        syn::parse_quote!(Clone),
        syn::parse_quote!(Copy),
        syn::parse_quote!(PartialEq),
        syn::parse_quote!(Eq),
        syn::parse_quote!(Hash),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    apply_derives(&mut en.attrs, required);
    en.attrs
        .push(syn::parse_quote!(#[serde(rename_all = "SCREAMING_SNAKE_CASE")]));

    let ident = &en.ident;
    let type_name = cfg.type_name.unwrap_or_else(|| ident.to_string());

    Ok(quote! {
        #en

        impl ::core::default::Default for #ident {
            fn default() -> Self { Self::#zero }
        }

        impl ::kernel_domain::value_object::EnumValueObject for #ident {
            const TYPE_NAME: &'static str = #type_name;

            fn value(&self) -> i32 {
                match self { #(Self::#idents => #values,)* }
            }

            fn name(&self) -> &'static str {
                match self { #(Self::#idents => #names,)* }
            }

            fn variants() -> &'static [Self] {
                &[#(Self::#idents),*]
            }

            fn unknown_notification() -> ::kernel_domain::notification::NotificationKind {
                #unknown
            }
        }

        impl ::kernel_domain::value_object::ValueObject for #ident {
            fn is_valid(
                &self,
                field_name: ::core::option::Option<&str>,
                ctx: ::core::option::Option<&mut ::kernel_domain::notification::NotificationContext>,
            ) -> bool {
                ::kernel_domain::value_object::EnumValueObject::check_known(self, field_name, ctx)
            }
        }

        impl ::std::fmt::Display for #ident {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(::kernel_domain::value_object::EnumValueObject::name(self))
            }
        }
    })
}

// -------- parsing --------

#[derive(Default)]
struct EnumAttrConfig {
    unknown: Option<syn::Expr>,
    type_name: Option<String>,
}

impl Parse for EnumAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self::default();
        let pairs: Punctuated<EnumAttrElem, Token![,]> = Punctuated::parse_terminated(input)?;
        for elem in pairs {
            let duplicate = match elem {
                EnumAttrElem::Unknown(e) => cfg.unknown.replace(e).is_some(),
                EnumAttrElem::TypeName(s) => cfg.type_name.replace(s).is_some(),
            };
            if duplicate {
                return Err(syn::Error::new(
                    proc_macro2::Span::call_site(),
                    "duplicate key in #[enum_value_object] attribute",
                ));
            }
        }
        Ok(cfg)
    }
}

enum EnumAttrElem {
    Unknown(syn::Expr),
    TypeName(String),
}

impl Parse for EnumAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        match key.to_string().as_str() {
            "unknown" => Ok(Self::Unknown(input.parse()?)),
            "type_name" => {
                let lit: syn::LitStr = input.parse()?;
                Ok(Self::TypeName(lit.value()))
            }
            _ => Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'unknown' or 'type_name'",
            )),
        }
    }
}
