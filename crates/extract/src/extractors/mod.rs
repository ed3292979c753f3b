// ABOUTME: Extraction stages that walk the parsed tree: content text, media with context, outbound links, metadata.
// ABOUTME: All stages are pure, synchronous functions over the same immutable document.

pub mod content;
pub mod links;
pub mod media;
pub mod metadata;
