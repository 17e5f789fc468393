//! Token model shared by the extractor and the generator.

use std::fmt;

/// Canonical description of a field type the generator knows how to replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// A single identifier: `i64`, `String`, `Tag`.
    Plain(String),

    /// A two-segment path: `uuid::Uuid`.
    Qualified { namespace: String, name: String },

    /// `Vec<T>`
    Sequence(Box<TypeDescriptor>),

    /// `Option<T>`
    Optional(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn plain(name: impl Into<String>) -> Self {
        TypeDescriptor::Plain(name.into())
    }

    pub fn qualified(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeDescriptor::Qualified {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn sequence(elem: TypeDescriptor) -> Self {
        TypeDescriptor::Sequence(Box::new(elem))
    }

    pub fn optional(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Optional(Box::new(inner))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Plain(name) => f.write_str(name),
            TypeDescriptor::Qualified { namespace, name } => write!(f, "{namespace}::{name}"),
            TypeDescriptor::Sequence(elem) => write!(f, "Vec<{elem}>"),
            TypeDescriptor::Optional(inner) => write!(f, "Option<{inner}>"),
        }
    }
}

/// One field of a discovered struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldToken {
    pub name: String,
    pub ty: TypeDescriptor,
    /// `#[serde(..)]` and `#[validate(..)]` attributes, as token text.
    pub attributes: Vec<String>,
}

impl FieldToken {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }
}

/// A field whose type has no descriptor.
///
/// It is still decoded and validated, so the shadow type mirrors the whole
/// record, but it is never copied back to the receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowField {
    pub name: String,
    /// The declared type as token text, `Self` replaced by the record name.
    pub ty: String,
    pub attributes: Vec<String>,
}

/// One discovered struct, fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordToken {
    pub name: String,
    pub fields: Vec<FieldToken>,
    /// Fields decoded into the shadow type but not copied.
    pub shadow_only: Vec<ShadowField>,
    /// Container-level `#[serde(..)]` attributes, as token text.
    pub attributes: Vec<String>,
}

impl RecordToken {
    pub fn new(name: impl Into<String>, fields: Vec<FieldToken>) -> Self {
        Self {
            name: name.into(),
            fields,
            shadow_only: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn with_shadow_field(mut self, field: ShadowField) -> Self {
        self.shadow_only.push(field);
        self
    }
}

/// Everything one output module is rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationUnit {
    /// Path of the module the records live in, as seen from the generated module.
    pub module: String,
    pub records: Vec<RecordToken>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_qualified_display() {
        assert_eq!(TypeDescriptor::plain("i64").to_string(), "i64");
        assert_eq!(
            TypeDescriptor::qualified("uuid", "Uuid").to_string(),
            "uuid::Uuid"
        );
    }

    #[test]
    fn test_container_display() {
        let bytes = TypeDescriptor::sequence(TypeDescriptor::plain("u8"));
        assert_eq!(bytes.to_string(), "Vec<u8>");

        let flag = TypeDescriptor::optional(TypeDescriptor::plain("bool"));
        assert_eq!(flag.to_string(), "Option<bool>");
    }

    #[test]
    fn test_nested_display() {
        let nested = TypeDescriptor::optional(TypeDescriptor::sequence(
            TypeDescriptor::qualified("uuid", "Uuid"),
        ));
        assert_eq!(nested.to_string(), "Option<Vec<uuid::Uuid>>");

        let nested = TypeDescriptor::sequence(TypeDescriptor::optional(TypeDescriptor::plain(
            "bool",
        )));
        assert_eq!(nested.to_string(), "Vec<Option<bool>>");
    }
}
