//! # vivid-core
//!
//! A dynamic JSON document model for code that wants to poke at JSON without
//! declaring its shape first.
//!
//! Parse text into a tree of [`Json`] handles, then read and write it through
//! unchecked paths. Reads never fail: a missing key or index yields an *absent*
//! value that can be navigated further and coerced to any scalar with a safe
//! default. Writes through an absent path create the missing objects and
//! arrays on the way (auto-vivification).
//!
//! ## Quick start
//!
//! ```rust
//! use vivid_core::parse;
//!
//! let doc = parse(r#"{"streams":[{"codec_name":"h264","width":1920}]}"#).unwrap();
//!
//! // Unchecked reads with defaults
//! assert_eq!(doc.get("streams").at(0).get("width").as_int(), 1920);
//! assert_eq!(doc.get("streams").at(5).get("width").as_int_or(-1), -1);
//! assert_eq!(doc.get("format").get("duration").as_string(), "");
//!
//! // Writes create missing containers
//! doc.get("format").set("duration", 12.5).unwrap();
//! assert_eq!(doc.get("format").get("duration").as_double(), 12.5);
//!
//! // Recursive search
//! assert_eq!(doc.find("codec_name").as_string(), "h264");
//!
//! // Rendering: compact by default, `{:#}` for indented
//! assert_eq!(
//!     doc.to_string(),
//!     r#"{"format":{"duration":12.5},"streams":[{"codec_name":"h264","width":1920}]}"#
//! );
//! ```
//!
//! ## Modules
//!
//! - [`value`]: `Json` handle, kinds, scalar coercions, collection views
//! - [`parser`]: JSON text → `Json`, with line/column error positions
//! - [`source`]: byte buffers, readers and files as parser input
//! - [`navigate`]: `get`/`at`/`set`/`set_at`/`push` and auto-vivification
//! - [`query`]: recursive search by key name or predicate
//! - [`render`]: compact and indented JSON output
//! - [`convert`]: native Rust values and serde types → `Json`
//! - [`error`]: error types
//!
//! `Json` handles are reference counted and not thread-safe; a document
//! belongs to one thread.

pub mod convert;
pub mod error;
pub mod navigate;
pub mod parser;
pub mod query;
pub mod render;
pub mod source;
pub mod value;

pub use error::{JsonError, Result};
pub use navigate::{normalize_index, Step};
pub use parser::{parse, parse_with, ParseOptions};
pub use query::Matches;
pub use render::Style;
pub use source::{
    from_path, from_path_with, from_reader, from_reader_with, from_slice, from_slice_with,
};
pub use value::{Json, Kind};
