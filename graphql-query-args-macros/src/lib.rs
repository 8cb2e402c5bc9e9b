//! Procedural macros for graphql-query-args
//!
//! - `#[derive(GraphObject)]` - Describe a struct as an object graph type

use convert_case::{Case, Casing};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, ExprLit, Fields, GenericArgument, Lit,
    LitStr, Meta, PathArguments, Type,
};

/// Implement `GraphObject` for a struct with named fields.
///
/// # Usage
///
/// ```ignore
/// #[derive(GraphObject)]
/// #[graph_object(name = "Room", model = "RoomEntity")]
/// pub struct RoomType {
///     /// Room number
///     pub number: i32,
///     pub name: Option<String>,
///     #[graph(enumeration = "RoomStatus")]
///     pub status: RoomStatus,
///     pub room_detail: Option<RoomDetailType>,
///     pub guests: Vec<GuestType>,
///     #[graph(skip)]
///     pub internal: String,
/// }
/// ```
///
/// # Type mapping
///
/// - integers -> `Int`, floats -> `Float`, `bool` -> `Boolean`, `String` -> `String`
/// - `NaiveDate` -> `Date`, `NaiveDateTime` / `DateTime<_>` -> `DateTime`
/// - `Option<T>` is nullable, everything else non-null
/// - `Vec<T>` is a list, `Box<T>` is transparent
/// - any other type is an object reference to `<T as GraphObject>::TYPE_NAME`
///
/// The type name defaults to the struct name without a `Type` suffix, the
/// model to the type name, and field names to PascalCase. Doc comments
/// become field descriptions unless `#[graph(description = "..")]` is given.
#[proc_macro_derive(GraphObject, attributes(graph_object, graph))]
pub fn derive_graph_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct ContainerAttrs {
    name: Option<String>,
    model: Option<String>,
}

#[derive(Default)]
struct FieldAttrs {
    name: Option<String>,
    enumeration: Option<String>,
    scalar: Option<String>,
    description: Option<String>,
    skip: bool,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let container = container_attrs(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    ident,
                    "GraphObject requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "GraphObject can only be derived for structs",
            ))
        }
    };

    let name = container.name.unwrap_or_else(|| {
        let ident = ident.to_string();
        match ident.strip_suffix("Type") {
            Some(stripped) if !stripped.is_empty() => stripped.to_string(),
            _ => ident,
        }
    });
    let model = container.model.unwrap_or_else(|| name.clone());

    let mut field_defs = Vec::new();
    for field in fields {
        let attrs = field_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        let field_name = match attrs.name.clone() {
            Some(name) => name,
            None => field
                .ident
                .as_ref()
                .map(|i| i.to_string().trim_start_matches("r#").to_case(Case::Pascal))
                .unwrap_or_default(),
        };
        let ty = field_type(&field.ty, &attrs);

        let description = attrs.description.map(|d| quote! { .description(#d) });
        field_defs.push(quote! {
            ::graphql_query_args::schema::FieldDef::new(#field_name, #ty) #description
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::graphql_query_args::schema::GraphObject for #ident #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #name;

            fn object_type() -> ::graphql_query_args::schema::ObjectType {
                ::graphql_query_args::schema::ObjectType::new(#name, #model)
                    #( .field_def(#field_defs) )*
            }
        }
    })
}

fn container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut parsed = ContainerAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("graph_object")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                parsed.name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("model") {
                parsed.model = Some(meta.value()?.parse::<LitStr>()?.value());
            } else {
                return Err(meta.error("expected `name` or `model`"));
            }
            Ok(())
        })?;
    }
    Ok(parsed)
}

fn field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();
    let mut docs = Vec::new();

    for attr in attrs {
        if attr.path().is_ident("doc") {
            if let Meta::NameValue(meta) = &attr.meta {
                if let Expr::Lit(ExprLit {
                    lit: Lit::Str(doc), ..
                }) = &meta.value
                {
                    docs.push(doc.value().trim().to_string());
                }
            }
            continue;
        }
        if !attr.path().is_ident("graph") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                parsed.skip = true;
                return Ok(());
            }

            let value = meta.value()?.parse::<LitStr>()?.value();
            if meta.path.is_ident("name") {
                parsed.name = Some(value);
            } else if meta.path.is_ident("enumeration") {
                parsed.enumeration = Some(value);
            } else if meta.path.is_ident("scalar") {
                parsed.scalar = Some(value);
            } else if meta.path.is_ident("description") {
                parsed.description = Some(value);
            } else {
                return Err(meta.error(
                    "expected `name`, `enumeration`, `scalar`, `description` or `skip`",
                ));
            }
            Ok(())
        })?;
    }

    if parsed.enumeration.is_some() && parsed.scalar.is_some() {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "`enumeration` and `scalar` cannot be combined",
        ));
    }
    if parsed.description.is_none() && !docs.is_empty() {
        parsed.description = Some(docs.join(" "));
    }
    Ok(parsed)
}

/// `GraphType` expression for a field, non-null unless wrapped in `Option`.
fn field_type(ty: &Type, attrs: &FieldAttrs) -> TokenStream2 {
    match generic_argument(ty, "Option") {
        Some(inner) => nullable_type(inner, attrs),
        None => {
            let inner = nullable_type(ty, attrs);
            quote! { ::graphql_query_args::schema::GraphType::non_null(#inner) }
        }
    }
}

fn nullable_type(ty: &Type, attrs: &FieldAttrs) -> TokenStream2 {
    if let Some(inner) = generic_argument(ty, "Box") {
        return nullable_type(inner, attrs);
    }
    if let Some(element) = generic_argument(ty, "Vec") {
        let element = field_type(element, attrs);
        return quote! { ::graphql_query_args::schema::GraphType::list(#element) };
    }
    if let Some(ref name) = attrs.enumeration {
        return quote! { ::graphql_query_args::schema::GraphType::enumeration(#name) };
    }
    if let Some(ref name) = attrs.scalar {
        return quote! {
            ::graphql_query_args::schema::GraphType::scalar(
                ::graphql_query_args::schema::ScalarKind::from_name(#name)
            )
        };
    }

    let scalar = match last_ident(ty).as_deref() {
        Some(
            "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64" | "u128"
            | "usize",
        ) => Some(quote! { Int }),
        Some("f32" | "f64") => Some(quote! { Float }),
        Some("bool") => Some(quote! { Boolean }),
        Some("String" | "str") => Some(quote! { String }),
        Some("NaiveDate") => Some(quote! { Date }),
        Some("NaiveDateTime" | "DateTime") => Some(quote! { DateTime }),
        _ => None,
    };

    match scalar {
        Some(kind) => quote! {
            ::graphql_query_args::schema::GraphType::scalar(::graphql_query_args::schema::ScalarKind::#kind)
        },
        None => quote! {
            ::graphql_query_args::schema::GraphType::object(
                <#ty as ::graphql_query_args::schema::GraphObject>::TYPE_NAME
            )
        },
    }
}

/// The single type argument of `wrapper<T>`, if `ty` is one.
fn generic_argument<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

fn last_ident(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        Type::Reference(reference) => last_ident(&reference.elem),
        _ => None,
    }
}
