//! # juv-codegen
//!
//! Generates validating JSON unmarshalers for plain Rust structs. For every
//! top-level struct in the input files, the generated module adds an
//! `unmarshal_json(&mut self, bytes: &[u8])` method that decodes the bytes
//! with `serde_json`, checks them with `validator`, and only then copies the
//! fields into `self`.
//!
//! ## Usage
//!
//! ### 1. Annotate your types
//!
//! `#[serde(..)]` and `#[validate(..)]` attributes are copied onto the
//! decoding type, so derive something that accepts them:
//!
//! ```rust,ignore
//! use serde::Serialize;
//! use validator::Validate;
//!
//! #[derive(Debug, Default, Serialize, Validate)]
//! pub struct Post {
//!     #[validate(range(min = 1))]
//!     pub id: i64,
//!     #[validate(length(min = 1))]
//!     pub title: String,
//!     pub draft: Option<bool>,
//! }
//! ```
//!
//! ### 2. Generate the module in build.rs
//!
//! ```rust,no_run
//! // build.rs
//! use juv_codegen::CodeGenerator;
//!
//! fn main() {
//!     let out_dir = std::env::var("OUT_DIR").unwrap();
//!
//!     CodeGenerator::new("super")
//!         .add_source_file("src/model.rs").unwrap()
//!         .write_to_file(format!("{out_dir}/juv_gen.rs")).unwrap();
//!
//!     println!("cargo:rerun-if-changed=src/model.rs");
//! }
//! ```
//!
//! ## Supported field types
//!
//! | Shape | Example |
//! |-------|---------|
//! | Plain identifier | `i64`, `String`, `Tag` |
//! | Two-segment path | `uuid::Uuid` |
//! | `Vec<T>` (T not itself a `Vec`) | `Vec<u8>`, `Vec<Option<bool>>` |
//! | `Option<T>` (T not itself an `Option`) | `Option<bool>`, `Option<Vec<uuid::Uuid>>` |
//!
//! Fields of any other type are still decoded and validated, with their type
//! written as declared, but they are not copied: they keep whatever value the
//! receiver already had.
//!
//! ## Validation only runs through `unmarshal_json`
//!
//! The generated code adds no `Deserialize` impl to your types. If a type
//! also derives `Deserialize`, `serde_json::from_slice::<Post>(..)` decodes it
//! without checking any `#[validate(..)]` rule; call `unmarshal_json` (or
//! `Validate::validate` yourself) when the input is untrusted.
//!
//! ## Container attributes
//!
//! `#[serde(default)]` on a struct makes the decoding type derive `Default`,
//! so a missing key takes its field type's default rather than the value from
//! a hand-written `Default` impl on your struct.
//! `from`, `try_from`, `remote` and `default = ".."` can't apply to the
//! decoding type and fail generation with [`CodegenError::Render`]. `into`
//! only affects serialization and is dropped.

mod discovery;
mod error;
mod extractor;
mod generator;
mod types;

pub use discovery::find_files;
pub use error::CodegenError;
pub use extractor::{describe_type, parse_file, parse_source};
pub use generator::{format_source, render, CodeGenerator};
pub use types::{FieldToken, GenerationUnit, RecordToken, ShadowField, TypeDescriptor};
