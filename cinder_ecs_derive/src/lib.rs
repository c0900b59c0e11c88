mod component;

use proc_macro::TokenStream;
use syn::DeriveInput;

/// Implements `cinder_ecs::components::Component` for a struct.
///
/// Every field becomes one column of the component's SOA storage, in declaration order.
/// The cardinality defaults to `Singleton`; annotate the type with `#[component(plural)]`
/// to allow several live instances per entity.
#[proc_macro_derive(Component, attributes(component))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);
    match component::impl_component(&ast) {
        Ok(tokens) => tokens,
        Err(error) => error.to_compile_error().into(),
    }
}
