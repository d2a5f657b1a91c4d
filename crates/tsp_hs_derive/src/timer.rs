use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, LitStr, ReturnType, parse_macro_input, parse_quote};

pub fn timer_inner(attr: TokenStream, item: TokenStream) -> TokenStream {
    let label = parse_macro_input!(attr as LitStr);
    let func = parse_macro_input!(item as ItemFn);
    match expand(&label, func) {
        Ok(func) => quote!(#func).into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(label: &LitStr, mut func: ItemFn) -> syn::Result<ItemFn> {
    if func.sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(
            func.sig.fn_token,
            "timer does not support async functions",
        ));
    }

    let output = match &func.sig.output {
        ReturnType::Default => quote!(()),
        ReturnType::Type(_, ty) => quote!(#ty),
    };
    let block = &func.block;
    func.block = Box::new(parse_quote!({
        let __timer_start = std::time::Instant::now();
        let __timer_result = (|| -> #output #block)();
        log::debug!(
            "{}: elapsed secs={:.3}",
            #label,
            __timer_start.elapsed().as_secs_f64()
        );
        __timer_result
    }));
    Ok(func)
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::{ItemFn, LitStr, parse_quote};

    use super::expand;

    #[test]
    fn expand_wraps_body_and_keeps_signature() {
        let label: LitStr = parse_quote!("search.init");
        let func: ItemFn = parse_quote! {
            fn build(n: usize) -> usize { n * 2 }
        };

        let wrapped = expand(&label, func).expect("expand");
        let rendered = quote!(#wrapped).to_string();
        assert!(rendered.starts_with("fn build (n : usize) -> usize"));
        assert!(rendered.contains("__timer_start"));
        assert!(rendered.contains("\"search.init\""));
    }

    #[test]
    fn expand_rejects_async_functions() {
        let label: LitStr = parse_quote!("x");
        let func: ItemFn = parse_quote! {
            async fn run() {}
        };
        let Err(err) = expand(&label, func) else {
            panic!("async should fail");
        };
        assert!(err.to_string().contains("async"));
    }
}
