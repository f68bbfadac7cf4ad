//! Random access to the members of tar archive files.
//!
//! An [`Index`] scans a seekable tar archive once, recording where the content
//! of every regular file and directory starts.  Afterwards, members can be
//! opened by name at any time and in any order, each yielding a
//! [`PartialReader`] that reads exactly that member's bytes straight from the
//! archive file.
//!
//! The index and every reader own their own duplicated file descriptor, so
//! their file positions never interfere with each other.  This makes it safe
//! to read several members concurrently from different threads, and readers
//! stay usable after the index that created them has been closed.
//!
//! ```no_run
//! use std::io::Read;
//!
//! # fn main() -> tar_index::Result<()> {
//! let index = tar_index::Index::new("layer.tar")?;
//! for path in index.regular_file_paths() {
//!     println!("{path}");
//! }
//!
//! let mut contents = String::new();
//! index.open("etc/os-release")?.read_to_string(&mut contents)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod index;
pub mod iter;
pub mod partial_reader;
pub mod util;


pub use error::{Error, Result};
pub use index::{Index, Member};
pub use partial_reader::PartialReader;
