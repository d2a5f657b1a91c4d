use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, parse_macro_input, spanned::Spanned};

use crate::utils;

/// One unit variant with its canonical spelling and accepted aliases.
struct ValueVariant {
    ident: Ident,
    canonical: String,
    aliases: Vec<String>,
}

pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let enum_ident = &input.ident;
    let option_name = option_name(input)?;
    let variants = collect_variants(input)?;

    let parse_arms = variants.iter().map(|variant| {
        let ident = &variant.ident;
        let spellings = std::iter::once(&variant.canonical)
            .chain(&variant.aliases)
            .map(|value| LitStr::new(value, Span::call_site()));
        quote! { #(#spellings)|* => Ok(Self::#ident), }
    });
    let display_arms = variants.iter().map(|variant| {
        let ident = &variant.ident;
        let canonical = LitStr::new(&variant.canonical, Span::call_site());
        quote! { Self::#ident => #canonical, }
    });

    let expected = variants
        .iter()
        .map(|variant| variant.canonical.as_str())
        .collect::<Vec<_>>()
        .join("|");
    let expected_lit = LitStr::new(&expected, Span::call_site());
    let option_lit = LitStr::new(&option_name, Span::call_site());

    Ok(quote! {
        impl #enum_ident {
            pub fn parse(raw: &str) -> crate::Result<Self> {
                match raw.to_ascii_lowercase().as_str() {
                    #(#parse_arms)*
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid value for --{}: {} (expected {})",
                        #option_lit,
                        raw,
                        #expected_lit
                    ))),
                }
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    #(#display_arms)*
                })
            }
        }
    })
}

fn option_name(input: &DeriveInput) -> syn::Result<String> {
    let mut name = utils::to_kebab_case(&input.ident.to_string());
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("cli_value")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("option") {
                let lit: LitStr = meta.value()?.parse()?;
                name = lit.value();
                Ok(())
            } else {
                Err(meta.error("unsupported cli_value attribute; expected option = \"...\""))
            }
        })?;
    }
    Ok(name)
}

fn collect_variants(input: &DeriveInput) -> syn::Result<Vec<ValueVariant>> {
    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "CliValue can only be derived for enums",
        ));
    };

    let mut variants = Vec::with_capacity(data_enum.variants.len());
    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "CliValue only supports enums with unit variants",
            ));
        }

        let mut canonical = utils::to_kebab_case(&variant.ident.to_string());
        let mut aliases = Vec::new();
        for attr in variant.attrs.iter().filter(|attr| attr.path().is_ident("cli")) {
            attr.parse_nested_meta(|meta| {
                let lit: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident("name") {
                    canonical = lit.value();
                } else if meta.path.is_ident("alias") {
                    aliases.push(lit.value());
                } else {
                    return Err(meta.error("unsupported cli attribute; expected name/alias"));
                }
                Ok(())
            })?;
        }

        variants.push(ValueVariant {
            ident: variant.ident.clone(),
            canonical,
            aliases,
        });
    }
    Ok(variants)
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::{collect_variants, expand, option_name};

    #[test]
    fn option_name_defaults_to_kebab_case_enum_name() {
        let input: syn::DeriveInput = parse_quote! {
            enum FirstCity { Read, Origin }
        };
        assert_eq!(option_name(&input).expect("name"), "first-city");
    }

    #[test]
    fn option_name_uses_override() {
        let input: syn::DeriveInput = parse_quote! {
            #[cli_value(option = "operators")]
            enum OperatorSet { Pair, Extended }
        };
        assert_eq!(option_name(&input).expect("name"), "operators");
    }

    #[test]
    fn collect_variants_reads_names_and_aliases() {
        let input: syn::DeriveInput = parse_quote! {
            enum LogLevel {
                #[cli(alias = "warning")]
                Warn,
                #[cli(name = "quiet")]
                Off,
            }
        };

        let variants = collect_variants(&input).expect("variants");
        assert_eq!(variants[0].canonical, "warn");
        assert_eq!(variants[0].aliases, vec!["warning".to_string()]);
        assert_eq!(variants[1].canonical, "quiet");
        assert!(variants[1].aliases.is_empty());
    }

    #[test]
    fn expand_rejects_tuple_variants() {
        let input: syn::DeriveInput = parse_quote! {
            enum Mode { Fixed(u8) }
        };
        let err = expand(&input).expect_err("tuple variants should fail");
        assert!(err.to_string().contains("unit variants"));
    }
}
