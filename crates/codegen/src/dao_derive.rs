pub fn impl_from_dao(ast: &syn::MacroInput) -> quote::Tokens {
    let name = &ast.ident;
    let fields: Vec<&syn::Ident> = match ast.body {
        syn::Body::Struct(ref data) => {
            match *data {
                syn::VariantData::Struct(ref fields) => {
                    fields
                        .iter()
                        .map(|f| f.ident.as_ref().unwrap())
                        .collect::<Vec<_>>()
                }
                _ => panic!("Only struct with named fields is supported for #[derive(FromDao)]"),
            }
        }
        syn::Body::Enum(_) => panic!("#[derive(FromDao)] can only be used with structs"),
    };
    let from_fields: Vec<quote::Tokens> = fields
        .iter()
        .map(|field| {
            quote! {
                #field: dao.get(stringify!(#field))?,
            }
        })
        .collect();

    quote! {
        impl redshift_dao::FromDao for #name {
            fn from_dao(dao: &redshift_dao::Dao) -> Result<Self, redshift_dao::DaoError> {
                Ok(#name {
                    #(#from_fields)*
                })
            }
        }
    }
}
