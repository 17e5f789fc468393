use juv_codegen::CodeGenerator;
use std::env;
use std::path::PathBuf;

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let mut codegen = CodeGenerator::new("super");

    codegen.set_header(
        "Generated unmarshalers for juv-example\n\
         These match the structs in src/model.rs. DO NOT EDIT.",
    );

    codegen
        .add_source_file(manifest_dir.join("src/model.rs"))
        .expect("Failed to parse source file");

    // Included by src/model.rs
    codegen
        .write_to_file(out_dir.join("juv_gen.rs"))
        .expect("Failed to write unmarshalers");

    println!("cargo:rerun-if-changed=src/model.rs");
    println!("cargo:rerun-if-changed=build.rs");
}
