// ABOUTME: Main library entry point for the tidings content normalization pipeline.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, NormalizedItem, the error taxonomy, and Options.

//! tidings-extract - fetch a web document and normalize it into a canonical,
//! deduplicated record.
//!
//! The pipeline runs fetch -> structural parse -> {content, media/links,
//! metadata} -> classify -> hash -> assemble and emits one [`NormalizedItem`]
//! per URL. All extraction steps are pure and synchronous; the only await
//! point is the network fetch.
//!
//! # Example
//!
//! ```no_run
//! use tidings_extract::{Client, NormalizeError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), NormalizeError> {
//!     let client = Client::builder().source_name("Example Blog").build();
//!     let item = client.normalize("https://example.com/article").await?;
//!     println!("{} -> {}", item.canonical_url, item.content_hash);
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod client;
pub mod dom;
pub mod error;
pub mod extractors;
pub mod identity;
pub mod item;
pub mod options;
pub mod resource;

pub use crate::client::Client;
pub use crate::error::{ExtractionError, FetchError, NormalizeError};
pub use crate::item::{ContentType, ImagePosition, NormalizedItem, PipelineStatus, SourceType};
pub use crate::options::{ClientBuilder, Options};
pub use crate::resource::{fetch, FetchResult};
