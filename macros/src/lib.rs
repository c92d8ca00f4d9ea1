use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Ident, ItemFn};

/// Marks a test function.
///
/// - sync functions become plain `#[test]`s.
/// - async functions run on a current-thread tokio runtime, which keeps the
///   `!Send` form handles on one thread.
/// - `#[rxform_macro::test(paused)]` also starts the tokio clock paused, for
///   tests that drive timers.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);

  let is_async = input.sig.asyncness.is_some();

  let raw_args = proc_macro2::TokenStream::from(attr);
  let paused = if raw_args.is_empty() {
    false
  } else {
    if !is_async {
      return TokenStream::from(
        syn::Error::new(
          raw_args.span(),
          "rxform_macro::test(paused) only applies to async tests; sync tests take no arguments",
        )
        .to_compile_error(),
      );
    }

    match syn::parse2::<Ident>(raw_args.clone()) {
      Ok(ident) if ident == "paused" => true,
      Ok(ident) => {
        return TokenStream::from(
          syn::Error::new(
            ident.span(),
            "rxform_macro::test only accepts: #[rxform_macro::test] or \
             #[rxform_macro::test(paused)]",
          )
          .to_compile_error(),
        );
      }
      Err(err) => return TokenStream::from(err.to_compile_error()),
    }
  };

  let expanded = if !is_async {
    quote! {
        #[test]
        #input
    }
  } else if paused {
    quote! {
        #[tokio::test(flavor = "current_thread", start_paused = true)]
        #input
    }
  } else {
    quote! {
        #[tokio::test(flavor = "current_thread")]
        #input
    }
  };

  TokenStream::from(expanded)
}
