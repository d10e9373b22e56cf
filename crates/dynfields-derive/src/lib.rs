//! Derive macro for the `DynamicFields` trait.
//!
//! Generates `declare()` from a struct's field definitions, so the struct
//! that is serialized is also the schema that is filtered.
//!
//! # Usage
//!
//! ```ignore
//! use dynfields::DynamicFields;
//!
//! #[derive(Serialize, DynamicFields)]
//! struct School {
//!     id: u64,
//!     #[fields(nested)]
//!     teachers: Vec<Teacher>,
//!     #[serde(skip)]
//!     internal_note: String,
//! }
//! ```
//!
//! Generates:
//!
//! ```ignore
//! schema.field("id");
//! schema.many::<Teacher>("teachers");
//! ```
//!
//! Field attributes (`#[fields(...)]`):
//! - `nested`: the field holds a `DynamicFields` type. `Vec<T>` becomes a
//!   collection node, `Option<T>` and `Box<T>` are unwrapped.
//! - `many`: force a collection node.
//! - `flatten`: declare the inner type's fields on this struct's node, as
//!   `#[serde(flatten)]` does when serializing. `Option<T>` and `Box<T>` are
//!   unwrapped.
//! - `rename = "name"`: declared name.
//! - `skip`: not declared.
//!
//! Container attribute: `#[fields(rename_all = "camelCase")]`. The serde
//! attributes `rename`, `rename_all` (including their `serialize = ".."`
//! forms), `skip`, `skip_serializing` and `flatten` are honoured too, so the
//! declared names match the serialized ones.

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use proc_macro::TokenStream;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr, Type};

/// Derive `DynamicFields` for a struct.
///
/// Each field becomes a declaration:
/// - Plain fields → `schema.field(name)`
/// - `#[fields(nested)]` fields → `schema.nested::<Inner>(name)` or
///   `schema.many::<Inner>(name)` for `Vec`s
#[proc_macro_derive(DynamicFields, attributes(fields))]
pub fn derive_dynamic_fields(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct FieldAttrs {
    nested: bool,
    many: bool,
    flatten: bool,
    rename: Option<String>,
    skip: bool,
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "DynamicFields can only be derived on structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "DynamicFields can only be derived on structs",
            ));
        }
    };

    let rename_all = container_rename_all(&input.attrs)?;
    let mut declarations = Vec::new();

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        // Handle raw identifiers (r#type → type).
        let rust_name = ident.to_string();
        let clean_name = rust_name.strip_prefix("r#").unwrap_or(&rust_name);
        let declared = match (&attrs.rename, &rename_all) {
            (Some(rename), _) => rename.clone(),
            (None, Some(rule)) => apply_rename_rule(rule, clean_name, field)?,
            (None, None) => clean_name.to_string(),
        };

        if attrs.flatten {
            if attrs.nested || attrs.many {
                return Err(syn::Error::new_spanned(
                    field,
                    "`flatten` cannot be combined with `nested` or `many`",
                ));
            }
            let (inner_ty, is_vec) = unwrap_type(&field.ty);
            if is_vec {
                return Err(syn::Error::new_spanned(
                    &field.ty,
                    "a flattened field cannot be a collection",
                ));
            }
            declarations.push(quote! {
                schema.flatten::<#inner_ty>();
            });
        } else if attrs.nested || attrs.many {
            let (inner_ty, is_vec) = unwrap_type(&field.ty);
            if attrs.many || is_vec {
                declarations.push(quote! {
                    schema.many::<#inner_ty>(#declared);
                });
            } else {
                declarations.push(quote! {
                    schema.nested::<#inner_ty>(#declared);
                });
            }
        } else {
            declarations.push(quote! {
                schema.field(#declared);
            });
        }
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::dynfields::DynamicFields for #name #ty_generics #where_clause {
            fn declare(schema: &mut ::dynfields::SchemaBuilder<'_>) {
                #(#declarations)*
            }
        }
    })
}

fn container_rename_all(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut ours = None;
    let mut serde = None;
    for attr in attrs {
        if attr.path().is_ident("fields") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") {
                    ours = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported container attribute, expected `rename_all`"))
                }
            })?;
        } else if attr.path().is_ident("serde") {
            // serde reports its own attribute errors.
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename_all") && meta.input.peek(syn::Token![=]) {
                    serde = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else if meta.path.is_ident("rename_all") {
                    if let Some(rule) = serialize_name(&meta)? {
                        serde = Some(rule);
                    }
                    Ok(())
                } else {
                    skip_meta_value(&meta)
                }
            });
        }
    }
    Ok(ours.or(serde))
}

fn field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    let mut serde_rename = None;
    for attr in attrs {
        if attr.path().is_ident("fields") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("nested") {
                    out.nested = true;
                } else if meta.path.is_ident("many") {
                    out.many = true;
                } else if meta.path.is_ident("flatten") {
                    out.flatten = true;
                } else if meta.path.is_ident("skip") {
                    out.skip = true;
                } else if meta.path.is_ident("rename") {
                    out.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                } else {
                    return Err(meta.error(
                        "unsupported field attribute, expected `nested`, `many`, `flatten`, `rename` or `skip`",
                    ));
                }
                Ok(())
            })?;
        } else if attr.path().is_ident("serde") {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                    out.skip = true;
                    Ok(())
                } else if meta.path.is_ident("flatten") {
                    out.flatten = true;
                    Ok(())
                } else if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
                    serde_rename = Some(meta.value()?.parse::<LitStr>()?.value());
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    if let Some(name) = serialize_name(&meta)? {
                        serde_rename = Some(name);
                    }
                    Ok(())
                } else {
                    skip_meta_value(&meta)
                }
            });
        }
    }
    if out.rename.is_none() {
        out.rename = serde_rename;
    }
    Ok(out)
}

/// The `serialize = ".."` entry of `rename(...)` / `rename_all(...)`.
/// The `deserialize` side has no bearing on output keys.
fn serialize_name(meta: &ParseNestedMeta<'_>) -> syn::Result<Option<String>> {
    let mut name = None;
    if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| {
            if inner.path.is_ident("serialize") {
                name = Some(inner.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                skip_meta_value(&inner)
            }
        })?;
    }
    Ok(name)
}

/// Consume `= value` or `(...)` after a meta path we don't interpret.
fn skip_meta_value(meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta_value(&inner))?;
    }
    Ok(())
}

fn apply_rename_rule(rule: &str, name: &str, field: &syn::Field) -> syn::Result<String> {
    let renamed = match rule {
        "lowercase" => name.to_lowercase(),
        "UPPERCASE" => name.to_uppercase(),
        "camelCase" => name.to_lower_camel_case(),
        "PascalCase" => name.to_upper_camel_case(),
        "snake_case" => name.to_snake_case(),
        "SCREAMING_SNAKE_CASE" => name.to_shouty_snake_case(),
        "kebab-case" => name.to_kebab_case(),
        other => {
            return Err(syn::Error::new_spanned(
                field,
                format!("unknown rename_all rule `{}`", other),
            ));
        }
    };
    Ok(renamed)
}

/// Unwrap wrapper types to get the "leaf" type for nested declarations.
/// `Option<Box<Foo>>` → `Foo`, `Vec<Bar>` → `Bar`, `Option<Vec<Baz>>` → `Baz`.
/// The flag reports whether a `Vec` was seen on the way down.
fn unwrap_type(ty: &Type) -> (&Type, bool) {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            let ident = segment.ident.to_string();
            if ident == "Option" || ident == "Vec" || ident == "Box" {
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                        let (leaf, is_vec) = unwrap_type(inner);
                        return (leaf, is_vec || ident == "Vec");
                    }
                }
            }
        }
    }
    (ty, false)
}
