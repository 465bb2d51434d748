//! `ArgType` implementation for unit-variant enums.

use proc_macro2::TokenStream;
use quote::quote;

use super::super::parse::ArgEnumInput;

/// Generates `impl ArgType` addressing members by variant name.
pub(crate) fn arg_enum_impl(arg_enum: &ArgEnumInput, krate: &TokenStream) -> TokenStream {
    let ident = &arg_enum.ident;
    let name = ident.to_string();
    let variants = &arg_enum.variants;
    let members: Vec<String> = variants.iter().map(ToString::to_string).collect();

    quote! {
        impl #krate::ArgType for #ident {
            fn shape() -> #krate::TypeShape {
                #krate::TypeShape::Enum {
                    name: #name,
                    members: ::std::vec![#(#members),*],
                }
            }

            fn to_arg_value(&self) -> #krate::ArgValue {
                let member = match self {
                    #( Self::#variants => #members, )*
                };
                #krate::ArgValue::Member(::std::string::String::from(member))
            }

            fn from_arg_value(
                value: #krate::ArgValue,
            ) -> ::core::result::Result<Self, #krate::ValueError> {
                match value {
                    #krate::ArgValue::Member(member) => {
                        let found = match member.as_str() {
                            #( #members => ::core::option::Option::Some(Self::#variants), )*
                            _ => ::core::option::Option::None,
                        };
                        found.ok_or(#krate::ValueError::UnknownMember {
                            member,
                            target: #name,
                        })
                    }
                    other => ::core::result::Result::Err(#krate::ValueError::mismatch(#name, &other)),
                }
            }
        }
    }
}
