use syn::{Data, DeriveInput, Fields, Ident, Index, Member};
use proc_macro::TokenStream;
use quote::{format_ident, quote};

pub fn impl_component(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &ast.ident;

    if !ast.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.generics,
            "#[derive(Component)] does not support generic types",
        ));
    }

    let fields = match &ast.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "#[derive(Component)] can only be used on structs",
            ))
        },
    };

    let cardinality = parse_cardinality(ast)?;

    let (members, types): (Vec<Member>, Vec<_>) = match fields {
        Fields::Named(named) => named
            .named
            .iter()
            .filter_map(|f| Some((Member::Named(f.ident.clone()?), f.ty.clone())))
            .unzip(),
        Fields::Unnamed(unnamed) => unnamed
            .unnamed
            .iter()
            .enumerate()
            .map(|(i, f)| (Member::Unnamed(Index::from(i)), f.ty.clone()))
            .unzip(),
        Fields::Unit => (vec![], vec![]),
    };

    let field_names: Vec<String> = members
        .iter()
        .map(|m| match m {
            Member::Named(ident) => ident.to_string(),
            Member::Unnamed(index) => index.index.to_string(),
        })
        .collect();

    let column_indices: Vec<Index> = (0..members.len()).map(Index::from).collect();

    let gen = quote! {
        impl cinder_ecs::components::Component for #name {
            type Columns = (#(#types,)*);

            const CARDINALITY: cinder_ecs::components::Cardinality =
                cinder_ecs::components::Cardinality::#cardinality;

            const FIELDS: &'static [cinder_ecs::components::FieldInfo] = &[
                #(
                    cinder_ecs::components::FieldInfo::new(
                        #field_names,
                        ::core::mem::offset_of!(#name, #members),
                        ::core::mem::size_of::<#types>(),
                    ),
                )*
            ];

            #[inline(always)]
            fn into_columns(self) -> Self::Columns {
                (#(self.#members,)*)
            }

            #[inline(always)]
            #[allow(unused_variables)]
            fn from_columns(columns: Self::Columns) -> Self {
                Self { #(#members: columns.#column_indices,)* }
            }
        }
    };
    Ok(gen.into())
}

fn parse_cardinality(ast: &DeriveInput) -> syn::Result<Ident> {
    let mut cardinality = format_ident!("Singleton");

    for attr in ast.attrs.iter().filter(|a| a.path.is_ident("component")) {
        let tag: Ident = attr.parse_args()?;
        cardinality = match tag.to_string().as_str() {
            "singleton" => Ident::new("Singleton", tag.span()),
            "plural" => Ident::new("Plural", tag.span()),
            _ => {
                return Err(syn::Error::new_spanned(
                    tag,
                    "expected #[component(singleton)] or #[component(plural)]",
                ))
            },
        };
    }

    Ok(cardinality)
}
