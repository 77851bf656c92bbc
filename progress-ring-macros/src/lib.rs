//! Defines the progress-ring runtime macros.

extern crate proc_macro;

use proc_macro::TokenStream;

use crate::internals::{runtime_macro, TokioMode};

mod internals;

/// Macro definition for the progress-ring runtime.
///
/// This macro should be used once in a program, above your main.
/// It replaces the standard tokio [`#[tokio::main]`] which it depends on.
///
/// _Executes the entire function inside a tokio runtime and waits for every task spawned through
/// `progress_ring::utils::task::run` (frame loops, event callbacks) before returning._
///
/// # Example
/// ```ignore
/// #[progress_ring::runtime]
/// async fn main() {
///     // whatever
/// }
/// ```
#[proc_macro_attribute]
pub fn runtime(_: TokenStream, item: TokenStream) -> TokenStream {
    runtime_macro(item.into(), TokioMode::Main).into()
}

/// Same as `#[progress_ring::runtime]` but for tests.
#[proc_macro_attribute]
pub fn test(_: TokenStream, item: TokenStream) -> TokenStream {
    runtime_macro(item.into(), TokioMode::Test).into()
}
