//! Example crate demonstrating juv-codegen usage.
//!
//! `build.rs` scans `src/model.rs` and writes `juv_gen.rs` into `OUT_DIR`;
//! the model module includes it, which gives every struct there an
//! `unmarshal_json` method.
//!
//! The models derive `Serialize` only. Validation runs inside
//! `unmarshal_json`; a plain serde `Deserialize` derive would skip it.

pub mod model;

pub use model::{Comment, Labels, Listing, Post, UnmarshalError};
