//! `Record` and `ArgType` implementations for structs.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Type, parse_quote};

use super::super::parse::{DefaultAttr, FieldInput, RecordInput, generic_param, literal_base};

/// Expression producing the typed default of a field, if it has one.
fn default_value(field: &FieldInput) -> Option<TokenStream> {
    let ty = &field.ty;
    field.attrs.default.as_ref().map(|default| match default {
        DefaultAttr::Expr(expr) => quote! { { let value: #ty = #expr; value } },
        DefaultAttr::Trait => quote! { <#ty as ::core::default::Default>::default() },
        DefaultAttr::Factory(path) => quote! { { let value: #ty = #path(); value } },
    })
}

fn field_shape(field: &FieldInput, record: &RecordInput, krate: &TokenStream) -> TokenStream {
    let ty = &field.ty;
    if field.attrs.skip {
        return quote! { #krate::TypeShape::Excluded };
    }
    let base = generic_param(ty, &record.generics).map_or_else(
        || quote! { <#ty as #krate::ArgType>::shape() },
        |param| {
            let name = param.to_string();
            quote! { #krate::TypeShape::Generic(#name) }
        },
    );
    let literal = field.attrs.literal.as_ref().map_or(base.clone(), |values| {
        let inner = literal_base(ty);
        quote! {
            #krate::TypeShape::with_literal(
                #base,
                ::std::vec![#(
                    #krate::ArgType::to_arg_value(&{ let value: #inner = #values; value })
                ),*],
            )
        }
    });
    field.attrs.label.as_ref().map_or(literal.clone(), |label| {
        quote! { (#literal).labeled(#label) }
    })
}

fn field_descriptor(field: &FieldInput, record: &RecordInput, krate: &TokenStream) -> TokenStream {
    let name = field.ident.to_string();
    let shape = field_shape(field, record, krate);
    let default = match (&field.attrs.default, default_value(field)) {
        (_, None) => TokenStream::new(),
        (_, Some(_)) if field.attrs.skip => TokenStream::new(),
        (Some(DefaultAttr::Factory(_)), Some(value)) => quote! {
            .with_default(#krate::DefaultSource::Factory(|| #krate::ArgType::to_arg_value(&#value)))
        },
        (_, Some(value)) => quote! {
            .with_default(#krate::DefaultSource::Value(|| #krate::ArgType::to_arg_value(&#value)))
        },
    };
    let doc = field
        .doc
        .as_ref()
        .map(|doc| quote! { .with_doc(#doc) });
    quote! {
        #krate::FieldDescriptor::new(#name, #shape) #default #doc
    }
}

/// Generates `impl Record` and `impl ArgType` for a struct.
pub(crate) fn record_impls(record: &RecordInput, krate: &TokenStream) -> TokenStream {
    let ident = &record.ident;
    let name = ident.to_string();
    let mut generics = record.generics.clone();
    let params: Vec<_> = record
        .generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();
    {
        let where_clause = generics.make_where_clause();
        for param in &params {
            let bound: syn::WherePredicate = parse_quote!(#param: #krate::ArgType);
            where_clause.predicates.push(bound);
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let doc = record
        .doc
        .as_ref()
        .map_or_else(|| quote! { ::core::option::Option::None }, |doc| {
            quote! { ::core::option::Option::Some(#doc) }
        });
    let substitutions = params.iter().map(|param| {
        let param_name = param.to_string();
        quote! { (#param_name, <#param as #krate::ArgType>::shape()) }
    });
    let descriptors = record
        .fields
        .iter()
        .map(|field| field_descriptor(field, record, krate));

    let (skipped, kept): (Vec<&FieldInput>, Vec<&FieldInput>) =
        record.fields.iter().partition(|field| field.attrs.skip);
    let kept_idents: Vec<_> = kept.iter().map(|field| &field.ident).collect();
    let kept_names: Vec<_> = kept.iter().map(|field| field.ident.to_string()).collect();
    let kept_types: Vec<&Type> = kept.iter().map(|field| &field.ty).collect();
    let skipped_idents = skipped.iter().map(|field| &field.ident);
    let skipped_inits = skipped.iter().map(|field| {
        default_value(field).unwrap_or_else(|| quote! { ::core::default::Default::default() })
    });
    let fields_binding = if kept.is_empty() {
        quote! { _fields }
    } else {
        quote! { mut fields }
    };

    quote! {
        impl #impl_generics #krate::Record for #ident #ty_generics #where_clause {
            fn schema() -> #krate::RecordSchema {
                let mut schema = #krate::RecordSchema::new(
                    #name,
                    ::core::any::type_name::<Self>(),
                );
                schema.doc = #doc;
                schema.substitutions = ::std::vec![#(#substitutions),*];
                schema #(.field(#descriptors))*
            }
        }

        impl #impl_generics #krate::ArgType for #ident #ty_generics #where_clause {
            fn shape() -> #krate::TypeShape {
                #krate::TypeShape::Record(#krate::RecordRef::of::<Self>())
            }

            fn to_arg_value(&self) -> #krate::ArgValue {
                let mut fields = ::std::collections::BTreeMap::new();
                #(
                    fields.insert(
                        ::std::string::String::from(#kept_names),
                        #krate::ArgType::to_arg_value(&self.#kept_idents),
                    );
                )*
                #krate::ArgValue::Record(fields)
            }

            fn from_arg_value(
                value: #krate::ArgValue,
            ) -> ::core::result::Result<Self, #krate::ValueError> {
                let #fields_binding = value.into_record(#name)?;
                ::core::result::Result::Ok(Self {
                    #( #kept_idents: fields.take::<#kept_types>(#kept_names)?, )*
                    #( #skipped_idents: #skipped_inits, )*
                })
            }
        }
    }
}
