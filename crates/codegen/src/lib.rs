#![deny(warnings)]

extern crate proc_macro;
#[macro_use]
extern crate quote;
extern crate syn;

mod dao_derive;

use proc_macro::TokenStream;

/// Implements `redshift_dao::FromDao`, reading each field from the column of the same name
#[proc_macro_derive(FromDao)]
pub fn from_dao(input: TokenStream) -> TokenStream {
    let s = input.to_string();
    let ast = syn::parse_macro_input(&s).unwrap();
    let gen = dao_derive::impl_from_dao(&ast);
    gen.parse().unwrap()
}
