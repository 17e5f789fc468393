//! Renders collected records into a Rust module of validating unmarshalers.

use crate::discovery::find_files;
use crate::error::CodegenError;
use crate::extractor;
use crate::types::{GenerationUnit, RecordToken};
use quote::ToTokens;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Attribute, Meta, Token};

/// Items emitted once per generated module, ahead of the per-record impls.
const SUPPORT_ITEMS: &str = r#"
/// Error returned by the generated `unmarshal_json` methods.
#[derive(Debug)]
pub enum UnmarshalError {
    /// The input is not valid JSON for the record.
    Json(::serde_json::Error),
    /// The decoded record failed validation.
    Validation(::validator::ValidationErrors),
}

impl ::std::fmt::Display for UnmarshalError {
    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
        match self {
            UnmarshalError::Json(err) => ::std::fmt::Display::fmt(err, f),
            UnmarshalError::Validation(err) => ::std::fmt::Display::fmt(err, f),
        }
    }
}

impl ::std::error::Error for UnmarshalError {
    fn source(&self) -> ::std::option::Option<&(dyn ::std::error::Error + 'static)> {
        match self {
            UnmarshalError::Json(err) => ::std::option::Option::Some(err),
            UnmarshalError::Validation(err) => ::std::option::Option::Some(err),
        }
    }
}

impl ::std::convert::From<::serde_json::Error> for UnmarshalError {
    fn from(err: ::serde_json::Error) -> Self {
        UnmarshalError::Json(err)
    }
}

impl ::std::convert::From<::validator::ValidationErrors> for UnmarshalError {
    fn from(err: ::validator::ValidationErrors) -> Self {
        UnmarshalError::Validation(err)
    }
}
"#;

/// Code generator that collects struct records and outputs the unmarshaler module.
#[derive(Debug)]
pub struct CodeGenerator {
    unit: GenerationUnit,

    /// Custom header comment
    header: Option<String>,
}

impl CodeGenerator {
    /// Create a generator for records living in `module`.
    ///
    /// `module` is a Rust path seen from the generated module: a bare name
    /// such as `model` is imported as `crate::model`, while `super`, `self`,
    /// `crate` and multi-segment paths are used as written.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            unit: GenerationUnit {
                module: module.into(),
                records: Vec::new(),
            },
            header: None,
        }
    }

    /// Set a custom header comment for the generated file.
    pub fn set_header(&mut self, header: impl Into<String>) -> &mut Self {
        self.header = Some(header.into());
        self
    }

    pub fn module(&self) -> &str {
        &self.unit.module
    }

    /// Records collected so far, in discovery order.
    pub fn records(&self) -> &[RecordToken] {
        &self.unit.records
    }

    /// Add a record directly, bypassing source parsing.
    pub fn add_record(&mut self, record: RecordToken) -> &mut Self {
        self.unit.records.push(record);
        self
    }

    /// Parse a single Rust source file and collect its structs.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use juv_codegen::CodeGenerator;
    ///
    /// let mut generator = CodeGenerator::new("model");
    /// generator.add_source_file("src/model.rs")?;
    /// generator.write_to_file("src/model/juv_gen.rs")?;
    /// # Ok::<(), juv_codegen::CodegenError>(())
    /// ```
    pub fn add_source_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, CodegenError> {
        let records = extractor::parse_file(path.as_ref())?;
        self.unit.records.extend(records);
        Ok(self)
    }

    /// Parse Rust source from a string and collect its structs.
    pub fn add_source_str(&mut self, source: &str) -> Result<&mut Self, CodegenError> {
        let records = extractor::parse_source(source).map_err(|source| CodegenError::Syntax {
            path: PathBuf::from("<string>"),
            source,
        })?;
        self.unit.records.extend(records);
        Ok(self)
    }

    /// Resolve files and directories, then parse every discovered file in order.
    ///
    /// The first file that fails to parse aborts the whole call; records from
    /// files parsed before it are not kept.
    pub fn add_paths<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<&mut Self, CodegenError> {
        let mut records = Vec::new();
        for file in find_files(paths)? {
            records.extend(extractor::parse_file(&file)?);
        }
        self.unit.records.extend(records);
        Ok(self)
    }

    /// Render and format the generated module.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let rendered = render(&self.unit)?;
        let formatted = format_source(&rendered)?;

        let mut output = self.header_comment();
        output.push('\n');
        output.push_str(&formatted);
        Ok(output)
    }

    /// Write the generated code to a file.
    ///
    /// Nothing is created or truncated unless generation succeeds.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), CodegenError> {
        let path = path.as_ref();
        let code = self.generate()?;
        fs::write(path, code).map_err(|source| CodegenError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(
            path = %path.display(),
            records = self.unit.records.len(),
            "wrote generated module"
        );
        Ok(())
    }

    /// Write the generated code to a writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), CodegenError> {
        let code = self.generate()?;
        writer.write_all(code.as_bytes())?;
        Ok(())
    }

    fn header_comment(&self) -> String {
        let mut output = String::new();
        match &self.header {
            Some(header) => {
                for line in header.lines() {
                    output.push_str("// ");
                    output.push_str(line);
                    output.push('\n');
                }
            }
            None => {
                output.push_str(&format!(
                    "// Code generated by juv for `{}`. DO NOT EDIT.\n",
                    self.unit.module
                ));
            }
        }
        output
    }
}

/// Turn the configured module into the path used by the glob import.
fn import_path(module: &str) -> Result<String, CodegenError> {
    let path: syn::Path = syn::parse_str(module)
        .map_err(|err| CodegenError::Render(format!("invalid module path `{module}`: {err}")))?;

    let bare_name = path.leading_colon.is_none()
        && path.segments.len() == 1
        && !["crate", "self", "super"]
            .iter()
            .any(|keyword| path.segments[0].ident == keyword);

    if bare_name {
        Ok(format!("crate::{}", module.trim()))
    } else {
        Ok(module.trim().to_string())
    }
}

/// Render the unformatted module source for `unit`.
///
/// Refuses to render a module with no records.
pub fn render(unit: &GenerationUnit) -> Result<String, CodegenError> {
    if unit.records.is_empty() {
        return Err(CodegenError::NoTypesFound);
    }

    let mut output = String::new();
    output.push_str("#[allow(unused_imports)]\n");
    output.push_str(&format!("use {}::*;\n", import_path(&unit.module)?));
    output.push_str(SUPPORT_ITEMS);

    for record in &unit.records {
        output.push('\n');
        output.push_str(&render_record(record)?);
    }

    Ok(output)
}

/// Name of the fn-local decoding type.
const SHADOW: &str = "__JuvShadow";

/// Container options the shadow type cannot satisfy.
const REJECTED_CONTAINER_OPTIONS: &[&str] = &["from", "try_from", "remote"];

/// Container options that only affect serialization.
const SERIALIZE_ONLY_CONTAINER_OPTIONS: &[&str] = &["into"];

/// Container attributes as they apply to the shadow type.
struct ShadowContainer {
    derive_default: bool,
    attributes: Vec<String>,
}

fn shadow_container(record: &RecordToken) -> Result<ShadowContainer, CodegenError> {
    let invalid = |err: syn::Error| {
        CodegenError::Render(format!("invalid attribute on `{}`: {err}", record.name))
    };

    let mut container = ShadowContainer {
        derive_default: false,
        attributes: Vec::new(),
    };
    for text in &record.attributes {
        for attr in Attribute::parse_outer.parse_str(text).map_err(invalid)? {
            if !attr.path().is_ident("serde") {
                container.attributes.push(attr.to_token_stream().to_string());
                continue;
            }

            let options = attr
                .parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
                .map_err(invalid)?;
            for option in options {
                let path = option.path();
                if path.is_ident("default") && matches!(option, Meta::Path(_)) {
                    container.derive_default = true;
                } else if path.is_ident("default")
                    || REJECTED_CONTAINER_OPTIONS.iter().any(|name| path.is_ident(name))
                {
                    return Err(CodegenError::Render(format!(
                        "`#[serde({})]` on `{}` can't apply to its decoding type",
                        option.to_token_stream(),
                        record.name
                    )));
                } else if SERIALIZE_ONLY_CONTAINER_OPTIONS
                    .iter()
                    .any(|name| path.is_ident(name))
                {
                    continue;
                } else {
                    container
                        .attributes
                        .push(format!("#[serde({})]", option.to_token_stream()));
                }
            }
        }
    }
    Ok(container)
}

fn render_record(record: &RecordToken) -> Result<String, CodegenError> {
    let container = shadow_container(record)?;
    let mut output = String::new();

    output.push_str(&format!("impl {} {{\n", record.name));
    output.push_str(
        "/// Decodes `bytes` as JSON into `self`, rejecting input that fails validation.\n\
         ///\n\
         /// `self` is only modified when both decoding and validation succeed.\n",
    );
    output.push_str(
        "pub fn unmarshal_json(&mut self, bytes: &[u8]) \
         -> ::std::result::Result<(), UnmarshalError> {\n",
    );

    // Shadow type: every named field, no unmarshal_json of its own.
    if container.derive_default {
        output.push_str(
            "#[derive(::serde::Deserialize, ::validator::Validate, ::std::default::Default)]\n",
        );
    } else {
        output.push_str("#[derive(::serde::Deserialize, ::validator::Validate)]\n");
    }
    for attribute in &container.attributes {
        output.push_str(attribute);
        output.push('\n');
    }
    output.push_str(&format!("struct {SHADOW} {{\n"));
    for field in &record.fields {
        for attribute in &field.attributes {
            output.push_str(attribute);
            output.push('\n');
        }
        output.push_str(&format!("{}: {},\n", field.name, field.ty));
    }
    for field in &record.shadow_only {
        for attribute in &field.attributes {
            output.push_str(attribute);
            output.push('\n');
        }
        output.push_str(&format!("{}: {},\n", field.name, field.ty));
    }
    output.push_str("}\n\n");

    output.push_str(&format!(
        "let shadow: {SHADOW} = ::serde_json::from_slice(bytes)?;\n"
    ));
    output.push_str("::validator::Validate::validate(&shadow)?;\n");
    for field in &record.fields {
        output.push_str(&format!("self.{0} = shadow.{0};\n", field.name));
    }
    output.push_str("::std::result::Result::Ok(())\n");

    output.push_str("}\n}\n");
    Ok(output)
}

/// Canonicalize rendered source, failing if it is not valid Rust.
pub fn format_source(source: &str) -> Result<String, CodegenError> {
    let file = syn::parse_file(source).map_err(CodegenError::Format)?;
    Ok(prettyplease::unparse(&file))
}
