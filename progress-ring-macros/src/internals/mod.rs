use proc_macro2::TokenStream;
use quote::quote;
use syn::{ItemFn, ReturnType, Signature, Stmt};

pub enum TokioMode {
    Main,
    Test,
}

/// See `#[progress_ring_macros::runtime]` for details.
///
/// Works on proc_macro2 streams so the expansion can be unit tested.
pub fn runtime_macro(item: TokenStream, tokio: TokioMode) -> TokenStream {
    let progress_ring = quote!(::progress_ring);

    let input: ItemFn = match syn::parse2(item) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = input;

    // The generated function drives its own runtime: it is no longer async.
    let sync_sig = Signature {
        asyncness: None,
        ..sig
    };

    let mut stmts = block.stmts;

    let has_return_type = match &sync_sig.output {
        ReturnType::Default => false,
        ReturnType::Type(_, ty) => {
            !matches!(&**ty, syn::Type::Tuple(tuple) if tuple.elems.is_empty())
        }
    };

    // The trailing expression is the value returned once all tasks are joined.
    let return_expr = if has_return_type {
        match stmts.pop() {
            Some(Stmt::Expr(expr, None)) => Some(expr),
            Some(stmt) => {
                stmts.push(stmt);
                None
            }
            None => None,
        }
    } else {
        None
    };

    let test_attr = match tokio {
        TokioMode::Main => quote! {},
        TokioMode::Test => quote! {#[test]},
    };

    let tokio_runtime = match tokio {
        TokioMode::Main => quote! {
            let rt = #progress_ring::utils::tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("Failed to build the tokio runtime");
        },
        TokioMode::Test => quote! {
            let rt = #progress_ring::utils::tokio::runtime::Runtime::new()
                .expect("Failed to build the tokio runtime");
        },
    };

    let body = stmts.into_iter().map(|stmt| match stmt {
        // A bare `()` would otherwise end up in the middle of the generated block.
        Stmt::Expr(syn::Expr::Tuple(ref tuple), _) if tuple.elems.is_empty() => quote!(),
        _ => quote! { #stmt },
    });

    quote! {
        #test_attr
        #(#attrs)*
        #vis #sync_sig {
            #tokio_runtime
            rt.block_on(async {
                #progress_ring::utils::task::init_task_channel().await;
                #(#body)*
                #progress_ring::utils::task::join_all().await;
                #return_expr
            })
        }
    }
}
