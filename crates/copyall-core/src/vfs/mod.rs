//! Filesystem capability interface for the aggregator.
//!
//! The aggregator never touches `std::fs` directly. It only needs three
//! operations, expressed by the [`Filesystem`] trait:
//!
//! - `stat`: what kind of thing lives at a path
//! - `list`: the immediate children of a directory, in native order
//! - `read`: the raw bytes of a file
//!
//! Two backends are provided:
//!
//! - **LocalFs**: the real filesystem, via `tokio::fs`
//! - **MemoryFs**: an in-memory tree with controllable listing order and
//!   injectable read failures (tests, embedding)

mod local;
mod memory;
mod traits;

pub use local::LocalFs;
pub use memory::MemoryFs;
pub use traits::{DirEntry, EntryKind, Filesystem};
