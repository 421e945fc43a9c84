//! Test attribute for database integration tests.
//!
//! `#[db_test]` turns an async test into a synchronous `#[test]` that runs on
//! the shared runtime in `crate::common::test_db`. The function may take one
//! argument, which receives a clone of the shared test pool.
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, FnArg, ItemFn, Meta};

/// Marks an async function as a test that runs against the shared test database.
#[proc_macro_attribute]
pub fn db_test(attr: TokenStream, item: TokenStream) -> TokenStream {
    parse_macro_input!(attr as syn::parse::Nothing);

    let input_fn = parse_macro_input!(item as ItemFn);

    if input_fn.sig.asyncness.is_none() {
        return syn::Error::new(input_fn.sig.span(), "db_test requires an async function")
            .to_compile_error()
            .into();
    }

    if !input_fn.sig.generics.params.is_empty() {
        return syn::Error::new(
            input_fn.sig.generics.span(),
            "db_test does not support generic parameters",
        )
        .to_compile_error()
        .into();
    }

    if input_fn.sig.inputs.len() > 1 {
        return syn::Error::new(
            input_fn.sig.inputs.span(),
            "db_test accepts at most one argument (the pool)",
        )
        .to_compile_error()
        .into();
    }

    let pool_binding = match input_fn.sig.inputs.first() {
        None => quote! {},
        Some(FnArg::Typed(arg)) => {
            let pat = &arg.pat;
            let ty = &arg.ty;
            quote! {
                let #pat: #ty = crate::common::test_db::get_test_db().await.pool().clone();
            }
        }
        Some(receiver @ FnArg::Receiver(_)) => {
            return syn::Error::new(receiver.span(), "db_test functions cannot take self")
                .to_compile_error()
                .into();
        }
    };

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input_fn;

    let name = sig.ident;
    let output = sig.output;

    let filtered_attrs = attrs
        .into_iter()
        .filter(|attr| !matches!(attr.meta, Meta::Path(ref path) if path.is_ident("db_test")));

    TokenStream::from(quote! {
        #(#filtered_attrs)*
        #[test]
        #vis fn #name() #output {
            crate::common::test_db::run_test(async {
                #pool_binding
                #block
            })
        }
    })
}
