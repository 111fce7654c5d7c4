//! Virtual filesystem for the Folio document store.
//!
//! The store never touches `std::fs` directly. Everything goes through the
//! [`FileSystem`] trait, addressed by platform-independent [`AbsolutePath`]s,
//! so the same database code runs against a real directory or an in-memory
//! table.
//!
//! # Modules
//!
//! - [`path`] -- [`AbsolutePath`]: rooted path with validated name parts
//! - [`naming`] -- [`NamingStrategy`]: Unix and Windows root/name rules
//! - [`traits`] -- The [`FileSystem`] backend trait
//! - [`entry`] -- [`Directory`], [`File`] and [`WritableFile`] handles
//! - [`memory`] -- [`MemoryFileSystem`] for tests and embedding
//! - [`physical`] -- [`PhysicalFileSystem`] backed by `tokio::fs`
//!
//! # Design Rules
//!
//! 1. Handle construction is pure path computation; only awaited calls do I/O.
//! 2. "Not there" is an answer, not an error: existence checks return `false`,
//!    listings of a missing directory are empty, deletes report `false`.
//! 3. Reading a missing file is an error ([`VfsError::NotFound`]).
//! 4. Writing creates the file and any missing parent directories.

pub mod entry;
pub mod error;
pub mod memory;
pub mod naming;
pub mod path;
pub mod physical;
pub mod traits;

pub use entry::{Directory, File, WritableFile};
pub use error::{VfsError, VfsResult};
pub use memory::MemoryFileSystem;
pub use naming::NamingStrategy;
pub use path::AbsolutePath;
pub use physical::PhysicalFileSystem;
pub use traits::FileSystem;
