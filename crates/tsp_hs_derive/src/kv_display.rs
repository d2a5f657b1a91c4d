use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

pub fn derive_kv_display_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_ident = &input.ident;

    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "KvDisplay can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data_struct.fields else {
        return Err(syn::Error::new(input.span(), "KvDisplay requires named fields"));
    };

    let mut keys = Vec::new();
    let mut vals = Vec::new();
    for field in &fields.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let mut key = ident.to_string();
        let mut fmt_mode = String::from("display");

        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("kv")) {
            attr.parse_nested_meta(|meta| {
                let lit: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident("name") {
                    key = lit.value();
                } else if meta.path.is_ident("fmt") {
                    fmt_mode = lit.value();
                } else {
                    return Err(meta.error("unsupported kv attribute; expected name/fmt"));
                }
                Ok(())
            })?;
        }

        vals.push(match fmt_mode.as_str() {
            "display" => quote! { &self.#ident },
            "len" => quote! { &self.#ident.len() },
            "opt" => quote! {
                &self.#ident
                    .as_ref()
                    .map_or_else(|| String::from("-"), |value| value.to_string())
            },
            other => {
                return Err(syn::Error::new(
                    field.span(),
                    format!("unsupported kv fmt mode: {other}"),
                ));
            }
        });
        keys.push(key);
    }

    let format_lit = LitStr::new(&format_string(&keys), Span::call_site());
    Ok(quote! {
        impl std::fmt::Display for #struct_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, #format_lit, #(#vals),*)
            }
        }
    })
}

/// One tab-indented `key = {}` line per field with the `=` signs aligned.
fn format_string(keys: &[String]) -> String {
    let width = keys.iter().map(String::len).max().unwrap_or(0);
    keys.iter()
        .map(|key| format!("\n\t{key:<width$} = {{}}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::{expand, format_string};

    #[test]
    fn format_string_aligns_keys() {
        let keys = vec!["seed".to_string(), "population_size".to_string()];
        assert_eq!(
            format_string(&keys),
            "\n\tseed            = {}\n\tpopulation_size = {}"
        );
    }

    #[test]
    fn format_string_is_empty_without_keys() {
        assert_eq!(format_string(&[]), "");
    }

    #[test]
    fn expand_rejects_unknown_fmt_mode() {
        let input: syn::DeriveInput = parse_quote! {
            struct Opts {
                #[kv(fmt = "hex")]
                seed: u64,
            }
        };
        let err = expand(&input).expect_err("unknown mode should fail");
        assert!(err.to_string().contains("unsupported kv fmt mode: hex"));
    }

    #[test]
    fn expand_accepts_only_display_len_and_opt_modes() {
        let input: syn::DeriveInput = parse_quote! {
            struct Opts {
                name: String,
                #[kv(fmt = "len")]
                cities: Vec<u8>,
                #[kv(fmt = "opt")]
                seed: Option<u64>,
            }
        };
        let rendered = expand(&input).expect("expand").to_string();
        assert!(rendered.contains("len ()"));
        assert!(rendered.contains("map_or_else"));

        let input: syn::DeriveInput = parse_quote! {
            struct Opts {
                #[kv(fmt = "path")]
                input: std::path::PathBuf,
            }
        };
        let Err(err) = expand(&input) else {
            panic!("path mode should be rejected");
        };
        assert!(err.to_string().contains("unsupported kv fmt mode: path"));
    }
}
