//! copyall-core: gather the text of every file under a path into one blob.
//!
//! The crate is split into two layers:
//!
//! - **vfs**: a narrow filesystem capability interface (`stat`, `list`, `read`)
//!   with a real-disk backend ([`LocalFs`]) and an in-memory one ([`MemoryFs`]).
//! - **aggregate**: the [`Aggregator`], which walks a root depth-first and
//!   renders each file as a block headed by its path.
//!
//! ```no_run
//! # async fn demo() -> copyall_core::Result<()> {
//! use copyall_core::{Aggregator, LocalFs};
//!
//! let aggregator = Aggregator::new(LocalFs::new());
//! let text = aggregator.aggregate("/home/amy/project/src".as_ref()).await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod error;
pub mod vfs;

pub use aggregate::{file_block, AggregateOptions, Aggregation, Aggregator, EntryOrder, SkippedFile};
pub use error::{AggregationError, Result};
pub use vfs::{DirEntry, EntryKind, Filesystem, LocalFs, MemoryFs};
