//! Reading a fixed byte range of a file.
//!
//! A [`PartialReader`] returns the bytes of exactly one range within a file and then reports
//! end-of-file, no matter how much data follows the range.  This is what [`Index::open`] hands
//! out for archive members, but it works on any file.
//!
//! [`Index::open`]: crate::Index::open

use std::{
    fs::File,
    io::{self, Read},
    os::{fd::AsFd, unix::fs::FileExt},
};

use log::trace;
use rustix::fs::fstat;

use crate::{
    error::{Error, Result},
    util::dup_file,
};

/// A reader over the range `offset..offset + len` of a file.
///
/// Every `PartialReader` owns its own duplicate of the descriptor it was created from, so it stays
/// valid after the original descriptor has been closed.  Reads are positional: they never move the
/// file position shared by duplicated descriptors, so any number of readers over the same file can
/// be used at the same time, from different threads, without disturbing each other.
#[derive(Debug)]
pub struct PartialReader {
    file: File,
    offset: u64,
    len: u64,
    position: u64,
    remaining: u64,
}

impl PartialReader {
    /// Creates a reader over `length` bytes of `fd`, starting at `offset`.
    ///
    /// Fails with [`Error::RangeOutOfBounds`] when `offset` is at or beyond the current end of the
    /// file, which includes any offset into an empty file.  Only the start of the range is checked:
    /// a range running past the end of the file simply yields fewer than `length` bytes.
    pub fn new(fd: impl AsFd, offset: u64, length: u64) -> Result<Self> {
        let file = dup_file(fd)?;
        match fstat(&file) {
            Ok(stat) if offset < u64::try_from(stat.st_size).unwrap_or(0) => {}
            _ => return Err(Error::RangeOutOfBounds { offset }),
        }
        trace!("reading range [{offset}:{}]", offset.saturating_add(length));
        Ok(Self {
            file,
            offset,
            len: length,
            position: offset,
            remaining: length,
        })
    }

    /// Offset of the first byte of the range within the file.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Length of the range, as requested on creation.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the range is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bytes this reader may still return.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Closes the reader, releasing its file descriptor.  Dropping the reader does the same.
    pub fn close(self) {}
}

impl Read for PartialReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Ok(0);
        }
        let len = usize::try_from(self.remaining).map_or(buf.len(), |r| r.min(buf.len()));
        let n = self.file.read_at(&mut buf[..len], self.position)?;
        self.position += n as u64;
        self.remaining -= n as u64;
        Ok(n)
    }
}
