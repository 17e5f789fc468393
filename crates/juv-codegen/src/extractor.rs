//! Source file parser that extracts struct declarations.
//!
//! Every top-level, non-generic `struct` in a file becomes a [`RecordToken`].
//! Field types go through [`describe_type`]; a field whose type has no
//! descriptor is not copied, but is kept as a [`ShadowField`] so that it is
//! still decoded and validated.

use crate::error::CodegenError;
use crate::types::{FieldToken, RecordToken, ShadowField, TypeDescriptor};
use proc_macro2::{Group, TokenStream, TokenTree};
use quote::ToTokens;
use std::fs;
use std::path::Path;
use syn::{Attribute, Fields, GenericArgument, Ident, Item, ItemStruct, PathArguments, Type};

/// Syntactic shape of a field type.
enum Shape<'a> {
    Plain(&'a Ident),
    Qualified(&'a Ident, &'a Ident),
    Sequence(&'a Type),
    Optional(&'a Type),
}

fn shape_of(ty: &Type) -> Option<Shape<'_>> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() || type_path.path.leading_colon.is_some() {
        return None;
    }

    let segments = &type_path.path.segments;
    // `Self` would name the shadow type once the field is replayed there.
    if segments.first()?.ident == "Self" {
        return None;
    }
    match segments.len() {
        1 => {
            let segment = &segments[0];
            match &segment.arguments {
                PathArguments::None => Some(Shape::Plain(&segment.ident)),
                PathArguments::AngleBracketed(_) if segment.ident == "Vec" => {
                    get_single_generic_arg(segment).map(Shape::Sequence)
                }
                PathArguments::AngleBracketed(_) if segment.ident == "Option" => {
                    get_single_generic_arg(segment).map(Shape::Optional)
                }
                _ => None,
            }
        }
        2 => {
            let (namespace, name) = (&segments[0], &segments[1]);
            if namespace.arguments.is_empty() && name.arguments.is_empty() {
                Some(Shape::Qualified(&namespace.ident, &name.ident))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn get_single_generic_arg(segment: &syn::PathSegment) -> Option<&Type> {
    match &segment.arguments {
        PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first()? {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        },
        _ => None,
    }
}

/// Describe a field type, or `None` if its shape is unsupported.
///
/// Supported shapes compose as `Vec<E>` and `Option<P>`, where `E` is plain,
/// qualified or optional and `P` is plain, qualified or a sequence.
pub fn describe_type(ty: &Type) -> Option<TypeDescriptor> {
    match shape_of(ty)? {
        Shape::Plain(ident) => Some(TypeDescriptor::Plain(ident.to_string())),
        Shape::Qualified(namespace, name) => Some(TypeDescriptor::Qualified {
            namespace: namespace.to_string(),
            name: name.to_string(),
        }),
        Shape::Sequence(elem) => describe_element(elem).map(TypeDescriptor::sequence),
        Shape::Optional(inner) => describe_pointee(inner).map(TypeDescriptor::optional),
    }
}

fn describe_element(ty: &Type) -> Option<TypeDescriptor> {
    match shape_of(ty)? {
        Shape::Sequence(_) => None,
        _ => describe_type(ty),
    }
}

fn describe_pointee(ty: &Type) -> Option<TypeDescriptor> {
    match shape_of(ty)? {
        Shape::Optional(_) => None,
        _ => describe_type(ty),
    }
}

/// Attributes replayed on the shadow type, rendered back to token text.
fn passthrough_attributes(attrs: &[Attribute], names: &[&str]) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| names.iter().any(|name| attr.path().is_ident(name)))
        .map(|attr| attr.to_token_stream().to_string())
        .collect()
}

/// Rewrite `Self` to the record's own name, at any depth.
fn replace_self(tokens: TokenStream, record: &Ident) -> TokenStream {
    tokens
        .into_iter()
        .map(|tree| match tree {
            TokenTree::Ident(ident) if ident == "Self" => {
                let mut renamed = record.clone();
                renamed.set_span(ident.span());
                TokenTree::Ident(renamed)
            }
            TokenTree::Group(group) => {
                let mut replaced = Group::new(group.delimiter(), replace_self(group.stream(), record));
                replaced.set_span(group.span());
                TokenTree::Group(replaced)
            }
            other => other,
        })
        .collect()
}

fn extract_fields(record: &Ident, fields: &Fields) -> (Vec<FieldToken>, Vec<ShadowField>) {
    let Fields::Named(named) = fields else {
        // Tuple and unit structs have no field names to copy.
        return (Vec::new(), Vec::new());
    };

    let mut tokens = Vec::with_capacity(named.named.len());
    let mut shadow_only = Vec::new();
    for field in &named.named {
        let Some(ident) = &field.ident else {
            continue;
        };
        let attributes = passthrough_attributes(&field.attrs, &["serde", "validate"]);
        let Some(ty) = describe_type(&field.ty) else {
            tracing::trace!(
                field = %ident,
                ty = %field.ty.to_token_stream(),
                "not copying field with unsupported type"
            );
            shadow_only.push(ShadowField {
                name: ident.to_string(),
                ty: replace_self(field.ty.to_token_stream(), record).to_string(),
                attributes,
            });
            continue;
        };
        tokens.push(FieldToken {
            name: ident.to_string(),
            ty,
            attributes,
        });
    }
    (tokens, shadow_only)
}

fn extract_struct(item: &ItemStruct) -> Option<RecordToken> {
    if !item.generics.params.is_empty() {
        tracing::debug!(record = %item.ident, "skipping generic struct");
        return None;
    }

    let (fields, shadow_only) = extract_fields(&item.ident, &item.fields);
    Some(RecordToken {
        name: item.ident.to_string(),
        fields,
        shadow_only,
        attributes: passthrough_attributes(&item.attrs, &["serde"]),
    })
}

/// Parse Rust source and extract its top-level structs in declaration order.
pub fn parse_source(source: &str) -> Result<Vec<RecordToken>, syn::Error> {
    let file = syn::parse_file(source)?;

    let records = file
        .items
        .iter()
        .filter_map(|item| match item {
            Item::Struct(s) => extract_struct(s),
            _ => None,
        })
        .collect();
    Ok(records)
}

/// Read and parse a single source file.
pub fn parse_file(path: &Path) -> Result<Vec<RecordToken>, CodegenError> {
    let source = fs::read_to_string(path).map_err(|source| CodegenError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_source(&source).map_err(|source| CodegenError::Syntax {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), records = records.len(), "parsed source file");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe(source: &str) -> Option<String> {
        let ty: Type = syn::parse_str(source).unwrap();
        describe_type(&ty).map(|d| d.to_string())
    }

    fn field_names(record: &RecordToken) -> Vec<&str> {
        record.fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_describe_plain_and_qualified() {
        assert_eq!(describe("i64").as_deref(), Some("i64"));
        assert_eq!(describe("String").as_deref(), Some("String"));
        assert_eq!(describe("uuid::Uuid").as_deref(), Some("uuid::Uuid"));
    }

    #[test]
    fn test_describe_containers_round_trip() {
        for source in [
            "Vec<u8>",
            "Option<bool>",
            "Vec<Option<bool>>",
            "Option<Vec<uuid::Uuid>>",
            "Vec<Option<Vec<i32>>>",
            "Option<uuid::Uuid>",
        ] {
            assert_eq!(describe(source).as_deref(), Some(source));
        }
    }

    #[test]
    fn test_describe_is_deterministic() {
        let first = describe("Option<Vec<chrono::NaiveDate>>");
        let second = describe("Option<Vec<chrono::NaiveDate>>");
        assert_eq!(first, second);
    }

    #[test]
    fn test_describe_rejects_unsupported_shapes() {
        for source in [
            "std::time::Duration",
            "::uuid::Uuid",
            "Vec<Vec<u8>>",
            "Option<Option<bool>>",
            "HashMap<String, u32>",
            "Box<Post>",
            "&'static str",
            "(u8, u8)",
            "[u8; 4]",
            "fn(u8) -> u8",
            "Vec<HashMap<String, u32>>",
            "Option<Box<Post>>",
            "<T as Trait>::Assoc",
        ] {
            assert_eq!(describe(source), None, "{source} should be unsupported");
        }
    }

    #[test]
    fn test_extract_simple_struct() {
        let source = r#"
            struct Point {
                x: f64,
                y: f64,
            }
        "#;

        let records = parse_source(source).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Point");
        assert_eq!(field_names(&records[0]), ["x", "y"]);
        assert_eq!(records[0].fields[0].ty, TypeDescriptor::plain("f64"));
    }

    #[test]
    fn test_ignores_non_struct_items() {
        let source = r#"
            use std::collections::HashMap;

            type Id = u64;

            enum Status { Draft, Published }

            trait Render { fn render(&self) -> String; }

            fn helper() {}

            mod inner {
                struct Hidden { x: u8 }
            }

            struct Post {
                id: i64,
            }
        "#;

        let records = parse_source(source).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Post");
    }

    #[test]
    fn test_drops_unsupported_fields_in_order() {
        let source = r#"
            struct Post {
                id: i64,
                metadata: HashMap<String, String>,
                title: String,
                callback: fn(),
                tags: Vec<String>,
                grid: Vec<Vec<u8>>,
                draft: Option<bool>,
            }
        "#;

        let records = parse_source(source).unwrap();
        assert_eq!(field_names(&records[0]), ["id", "title", "tags", "draft"]);
        assert_eq!(records[0].fields[2].ty.to_string(), "Vec<String>");
        assert_eq!(records[0].fields[3].ty.to_string(), "Option<bool>");

        let shadow_only: Vec<_> = records[0].shadow_only.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(shadow_only, ["metadata", "callback", "grid"]);
    }

    #[test]
    fn test_unsupported_field_keeps_type_and_attributes() {
        let source = r#"
            struct Labels {
                id: i64,
                #[serde(default)]
                #[validate(length(min = 1))]
                labels: HashMap<String, String>,
            }
        "#;

        let records = parse_source(source).unwrap();
        let labels = &records[0].shadow_only[0];
        assert_eq!(labels.name, "labels");
        let ty: Type = syn::parse_str(&labels.ty).unwrap();
        assert_eq!(ty, syn::parse_str::<Type>("HashMap<String, String>").unwrap());
        assert_eq!(labels.attributes.len(), 2);
    }

    #[test]
    fn test_self_is_unsupported_and_renamed() {
        assert_eq!(describe("Self"), None);
        assert_eq!(describe("Vec<Self>"), None);
        assert_eq!(describe("Self::Id"), None);

        let source = "struct Node { id: u32, children: Vec<Box<Self>> }";

        let records = parse_source(source).unwrap();
        assert_eq!(field_names(&records[0]), ["id"]);
        let ty: Type = syn::parse_str(&records[0].shadow_only[0].ty).unwrap();
        assert_eq!(ty, syn::parse_str::<Type>("Vec<Box<Node>>").unwrap());
    }

    #[test]
    fn test_keeps_records_in_declaration_order() {
        let source = r#"
            struct B { b: u8 }
            struct A { a: u8 }
            struct C { c: u8 }
        "#;

        let records = parse_source(source).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["B", "A", "C"]);
    }

    #[test]
    fn test_tuple_and_unit_structs_have_no_fields() {
        let source = r#"
            struct Meters(f64);
            struct Marker;
        "#;

        let records = parse_source(source).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.fields.is_empty()));
    }

    #[test]
    fn test_skips_generic_structs() {
        let source = r#"
            struct Page<T> { items: Vec<T> }
            struct Borrowed<'a> { name: &'a str }
            struct Post { id: i64 }
        "#;

        let records = parse_source(source).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Post");
    }

    #[test]
    fn test_captures_serde_and_validate_attributes() {
        let source = r#"
            #[derive(Serialize, Validate)]
            #[serde(rename_all = "camelCase")]
            struct Post {
                /// The post id.
                #[serde(rename = "id")]
                #[validate(range(min = 1))]
                #[allow(dead_code)]
                id: i64,
            }
        "#;

        let records = parse_source(source).unwrap();
        let record = &records[0];
        assert_eq!(record.attributes.len(), 1);
        assert!(record.attributes[0].contains("rename_all"));

        let attributes = &record.fields[0].attributes;
        assert_eq!(attributes.len(), 2);
        assert!(attributes[0].contains("serde"));
        assert!(attributes[1].contains("validate"));
    }

    #[test]
    fn test_raw_identifier_field() {
        let source = "struct Token { r#type: String }";

        let records = parse_source(source).unwrap();
        assert_eq!(records[0].fields[0].name, "r#type");
    }

    #[test]
    fn test_syntax_error_is_reported() {
        assert!(parse_source("struct Post { id: i64").is_err());
    }

    #[test]
    fn test_parse_file_reports_path_on_syntax_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.rs");
        fs::write(&path, "struct {").unwrap();

        match parse_file(&path) {
            Err(CodegenError::Syntax { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.rs");

        assert!(matches!(parse_file(&path), Err(CodegenError::Read { .. })));
    }
}
