//! Derive macro for `fieldcheck_registry::Validatable`.
//!
//! Field annotations become explicit registration calls:
//!
//! ```text
//! #[derive(Validatable)]
//! #[validatable(class = "Course")]
//! struct Course {
//!     #[validate(required)]
//!     title: String,
//!     #[validate(positive)]
//!     price: f64,
//! }
//! ```
//!
//! expands to an impl whose `register_rules` calls
//! `registry.register("Course", "title", ValidationRule::Required)` and
//! `registry.register("Course", "price", ValidationRule::Positive)` in field
//! declaration order.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, PathArguments, Type,
};

/// Derive `fieldcheck_registry::Validatable` from field-level annotations.
#[proc_macro_derive(Validatable, attributes(validate, validatable))]
pub fn derive_validatable(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_validatable(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_validatable(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    let class_name = parse_class_name(&input.attrs)?.unwrap_or_else(|| input.ident.to_string());
    let Data::Struct(struct_data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Validatable can only be derived for structs",
        ));
    };

    let fields = match &struct_data.fields {
        Fields::Named(fields) => &fields.named,
        Fields::Unit => {
            return Err(syn::Error::new_spanned(
                input,
                "Validatable requires named fields",
            ));
        },
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                &struct_data.fields,
                "Validatable requires named fields",
            ));
        },
    };

    let class_lit = LitStr::new(&class_name, proc_macro2::Span::call_site());
    let mut registrations = Vec::new();
    let mut snapshots = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let (field_name, rules) = parse_field_rules(&field.attrs, ident)?;
        if rules.is_empty() {
            continue;
        }
        let field_lit = LitStr::new(&field_name, proc_macro2::Span::call_site());
        for rule in rules {
            if matches!(rule, Rule::Positive) {
                ensure_numeric(&field.ty)?;
            }
            let variant = rule.variant();
            registrations.push(quote! {
                registry.register(
                    #class_lit,
                    #field_lit,
                    ::fieldcheck_registry::ValidationRule::#variant,
                );
            });
        }
        snapshots.push(quote! {
            .with_field(
                #field_lit,
                ::fieldcheck_registry::IntoFieldValue::to_field_value(&self.#ident),
            )
        });
    }

    let registry_arg = if registrations.is_empty() {
        quote!(_registry)
    } else {
        quote!(registry)
    };

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::fieldcheck_registry::Validatable for #name #ty_generics #where_clause {
            const CLASS_NAME: &'static str = #class_lit;

            fn register_rules(#registry_arg: &mut ::fieldcheck_registry::ValidatorRegistry) {
                #(#registrations)*
            }

            fn to_candidate(&self) -> ::fieldcheck_registry::Candidate {
                ::fieldcheck_registry::Candidate::new(#class_lit)
                    #(#snapshots)*
            }
        }
    })
}

fn parse_class_name(attrs: &[Attribute]) -> Result<Option<String>, syn::Error> {
    let mut class_name: Option<String> = None;
    for attr in attrs {
        if !attr.path().is_ident("validatable") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("class") {
                let value: LitStr = meta.value()?.parse()?;
                if class_name.is_some() {
                    return Err(meta.error("duplicate validatable(class = ...)"));
                }
                if value.value().trim().is_empty() {
                    return Err(meta.error("validatable(class = ...) must be non-empty"));
                }
                class_name = Some(value.value());
                return Ok(());
            }
            Err(meta.error("unsupported validatable attribute on container"))
        })?;
    }
    Ok(class_name)
}

fn parse_field_rules(attrs: &[Attribute], ident: &Ident) -> Result<(String, Vec<Rule>), syn::Error> {
    let mut rules = Vec::new();
    let mut field_name_override: Option<String> = None;
    for attr in attrs {
        if !attr.path().is_ident("validate") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("field") {
                let value: LitStr = meta.value()?.parse()?;
                if field_name_override.is_some() {
                    return Err(meta.error("duplicate validate(field = ...)"));
                }
                field_name_override = Some(value.value());
                return Ok(());
            }
            if meta.path.is_ident("required") {
                rules.push(Rule::Required);
                return Ok(());
            }
            if meta.path.is_ident("positive") {
                rules.push(Rule::Positive);
                return Ok(());
            }
            Err(meta.error("unsupported validate attribute on field"))
        })?;
    }
    let name = field_name_override.unwrap_or_else(|| ident.to_string());
    Ok((name, rules))
}

#[derive(Debug, Clone, Copy)]
enum Rule {
    Required,
    Positive,
}

impl Rule {
    fn variant(self) -> Ident {
        let name = match self {
            Self::Required => "Required",
            Self::Positive => "Positive",
        };
        Ident::new(name, proc_macro2::Span::call_site())
    }
}

fn ensure_numeric(ty: &Type) -> Result<(), syn::Error> {
    let inner = option_inner(ty).unwrap_or(ty);
    if is_numeric(inner) {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            ty,
            "positive can only be used on numeric fields",
        ))
    }
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    let mut type_arg = None;
    for arg in &args.args {
        if let GenericArgument::Type(inner) = arg {
            type_arg = Some(inner);
            break;
        }
    }
    type_arg
}

fn is_numeric(ty: &Type) -> bool {
    match ty {
        Type::Reference(reference) => is_numeric(&reference.elem),
        Type::Path(type_path) => {
            let Some(segment) = type_path.path.segments.last() else {
                return false;
            };
            let ident = segment.ident.to_string();
            // FieldValue carries its own number variant.
            matches!(
                ident.as_str(),
                "f32"
                    | "f64"
                    | "u8"
                    | "u16"
                    | "u32"
                    | "u64"
                    | "u128"
                    | "usize"
                    | "i8"
                    | "i16"
                    | "i32"
                    | "i64"
                    | "i128"
                    | "isize"
                    | "FieldValue"
            )
        },
        _ => false,
    }
}
