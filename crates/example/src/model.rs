//! Blog model whose structs get generated unmarshalers.

use serde::Serialize;
use std::collections::HashMap;
use validator::Validate;

/// A blog post.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Validate)]
pub struct Post {
    #[validate(range(min = 1))]
    pub id: i64,
    #[validate(length(min = 1))]
    pub title: String,
    pub draft: Option<bool>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub reference: Option<uuid::Uuid>,
    /// Decoded but never copied: maps have no type descriptor.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Labels attached to a post.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Validate)]
pub struct Labels {
    #[validate(range(min = 1))]
    pub id: i64,
    #[validate(length(min = 1))]
    pub labels: HashMap<String, String>,
}

/// Listing options; missing keys take their type's default.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Validate)]
#[serde(default)]
pub struct Listing {
    #[validate(range(max = 1000))]
    pub page: u32,
    pub tag: Option<String>,
}

/// A comment on a post, serialized with camelCase keys.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[validate(range(min = 1))]
    pub post_id: i64,
    #[validate(length(min = 1, max = 32))]
    pub author_name: String,
    pub reply_ids: Option<Vec<i64>>,
    #[serde(default)]
    pub attachments: Vec<Option<uuid::Uuid>>,
}

mod juv_gen {
    include!(concat!(env!("OUT_DIR"), "/juv_gen.rs"));
}

pub use juv_gen::UnmarshalError;
