use fxhash::FxHashSet;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::{Attribute, ItemFn, ItemStruct, LitBool, LitStr};

/// Arguments accepted by `#[api_model(...)]`.
struct ModelArgs {
    rename_all: LitStr,
    deny_unknown_fields: bool,
}

impl ModelArgs {
    fn parse(args: TokenStream) -> syn::Result<Self> {
        let mut rename_all = None;
        let mut deny_unknown_fields = None;

        let parser = syn::meta::parser(|meta| {
            if meta.path.is_ident("rename_all") {
                if rename_all.is_some() {
                    return Err(meta.error("duplicate `rename_all`"));
                }
                rename_all = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else if meta.path.is_ident("deny_unknown_fields") {
                if deny_unknown_fields.is_some() {
                    return Err(meta.error("duplicate `deny_unknown_fields`"));
                }
                deny_unknown_fields = Some(meta.value()?.parse::<LitBool>()?.value);
                Ok(())
            } else {
                Err(meta.error("unsupported argument; expected rename_all or deny_unknown_fields"))
            }
        });
        parser.parse2(args)?;

        Ok(Self {
            rename_all: rename_all.unwrap_or_else(|| LitStr::new("snake_case", Span::call_site())),
            deny_unknown_fields: deny_unknown_fields.unwrap_or(true),
        })
    }
}

/// Serde container attributes already present on the struct.
#[derive(Default)]
struct SerdeAttrs {
    rename_all: Option<LitStr>,
    deny_unknown_fields: bool,
}

impl SerdeAttrs {
    fn collect(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut found = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    found.rename_all = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("deny_unknown_fields") {
                    found.deny_unknown_fields = true;
                } else if meta.input.peek(syn::Token![=]) {
                    // Other container attributes are left to serde itself.
                    let _: syn::Expr = meta.value()?.parse()?;
                }
                Ok(())
            })?;
        }
        Ok(found)
    }
}

/// Expands `#[api_model]`: common derives, `ToSchema`, and the serde naming policy.
pub fn expand_api_model(args: TokenStream, input: ItemStruct) -> TokenStream {
    model(args, &input).unwrap_or_else(syn::Error::into_compile_error)
}

fn model(args: TokenStream, input: &ItemStruct) -> syn::Result<TokenStream> {
    let args = ModelArgs::parse(args)?;
    let serde = SerdeAttrs::collect(&input.attrs)?;
    let derived = derived_traits(&input.attrs);

    let derives = ["Debug", "Serialize", "Deserialize", "ToSchema"]
        .into_iter()
        .filter(|name| !derived.contains(*name))
        .map(|name| match name {
            "Debug" => quote! { Debug },
            "Serialize" => quote! { ::serde::Serialize },
            "Deserialize" => quote! { ::serde::Deserialize },
            _ => quote! { ::utoipa::ToSchema },
        })
        .collect::<Vec<_>>();
    let derive_attr = if derives.is_empty() { quote! {} } else { quote! { #[derive(#(#derives),*)] } };

    let rename_attr = match &serde.rename_all {
        Some(existing) if existing.value() != args.rename_all.value() => {
            return Err(syn::Error::new_spanned(
                existing,
                "conflicting serde rename_all; remove it or pass the same value to api_model",
            ));
        },
        Some(_) => quote! {},
        None => {
            let value = &args.rename_all;
            quote! { #[serde(rename_all = #value)] }
        },
    };

    let deny_attr = match (serde.deny_unknown_fields, args.deny_unknown_fields) {
        (true, false) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "deny_unknown_fields is already set via serde; remove it before disabling",
            ));
        },
        (false, true) => quote! { #[serde(deny_unknown_fields)] },
        _ => quote! {},
    };

    Ok(quote! {
        #derive_attr
        #rename_attr
        #deny_attr
        #input
    })
}

/// Expands `#[api_handler]` into a `utoipa::path` documented handler.
pub fn expand_api_handler(args: TokenStream, input: ItemFn) -> TokenStream {
    let ItemFn { attrs, vis, sig, block } = input;

    quote! {
        #(#attrs)*
        #[allow(clippy::unused_async)]
        #[::utoipa::path(#args)]
        #vis #sig #block
    }
}

fn derived_traits(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                traits.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }
    traits
}
