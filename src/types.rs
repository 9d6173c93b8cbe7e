//! Shared identifier types.

/// Topic identifier (allocated by the catalog store)
pub type TopicId = u64;

/// Snippet identifier (allocated by the catalog store, monotonically increasing)
pub type SnippetId = u64;
