use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Path, Type, parse_macro_input, spanned::Spanned};

use crate::utils;

/// A struct field that can be set from `--<long> <value>`.
struct CliField {
    ident: Ident,
    ty: Type,
    long: String,
    parse_with: Option<Path>,
}

pub fn derive_cli_options_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_ident = &input.ident;
    let fields = collect_fields(input)?;

    let arms = fields.iter().map(|field| {
        let ident = &field.ident;
        let long = LitStr::new(&field.long, ident.span());
        let parse_expr = utils::build_cli_parse_expr(&field.ty, field.parse_with.as_ref());
        quote! {
            #long => {
                let raw = value.ok_or_else(|| {
                    crate::Error::invalid_input(format!("Missing value for --{name}"))
                })?;
                self.#ident = #parse_expr;
                Ok(true)
            }
        }
    });

    Ok(quote! {
        impl #struct_ident {
            /// Splits `name=value`, or takes the next argument as the value when it
            /// does not look like another option.
            fn split_arg(
                raw_name: &str,
                args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
            ) -> (String, Option<String>) {
                if let Some((name, value)) = raw_name.split_once('=') {
                    return (name.to_string(), Some(value.to_string()));
                }

                let value = match args.peek() {
                    Some(next) if !next.starts_with("--") => args.next(),
                    _ => None,
                };
                (raw_name.to_string(), value)
            }

            /// Returns `Ok(false)` when `name` is not a derived option.
            fn apply_cli_option(
                &mut self,
                name: &str,
                value: Option<String>,
            ) -> crate::Result<bool> {
                match name {
                    #(#arms,)*
                    _ => Ok(false),
                }
            }
        }
    })
}

fn collect_fields(input: &DeriveInput) -> syn::Result<Vec<CliField>> {
    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "CliOptions can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data_struct.fields else {
        return Err(syn::Error::new(
            input.span(),
            "CliOptions requires named fields",
        ));
    };

    let mut fields = Vec::new();
    for field in &named.named {
        let Some(ident) = &field.ident else {
            continue;
        };

        let mut long = None;
        let mut parse_with = None;
        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("cli")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("long") {
                    let lit: LitStr = meta.value()?.parse()?;
                    long = Some(lit.value());
                    Ok(())
                } else if meta.path.is_ident("parse_with") {
                    let lit: LitStr = meta.value()?.parse()?;
                    parse_with = Some(syn::parse_str::<Path>(&lit.value())?);
                    Ok(())
                } else {
                    Err(meta.error("unsupported cli attribute; expected long/parse_with"))
                }
            })?;
        }

        // Fields without `long` are handled by hand in the options parser.
        if let Some(long) = long {
            fields.push(CliField {
                ident: ident.clone(),
                ty: field.ty.clone(),
                long,
                parse_with,
            });
        }
    }
    Ok(fields)
}
