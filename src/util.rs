//! File descriptor helpers shared by the index and its readers.

use std::{
    cell::Cell,
    fs::File,
    io::{Read, Result},
    os::{
        fd::{AsFd, AsRawFd},
        unix::{ffi::OsStrExt, fs::FileExt},
    },
    path::PathBuf,
};

use rustix::{fs::readlink, io::fcntl_dupfd_cloexec};

/// Formats a string like "/proc/self/fd/3" for the given fd.  This can be used to work with kernel
/// APIs that don't directly accept file descriptors.
///
/// This call never fails.
pub(crate) fn proc_self_fd(fd: impl AsFd) -> String {
    format!("/proc/self/fd/{}", fd.as_fd().as_raw_fd())
}

/// Duplicates `fd` into a new close-on-exec descriptor owned by the returned [`File`].
///
/// The duplicate stays open independently of `fd`, so the caller may close its own handle right
/// away.  Note that both descriptors refer to the same open file description and thus share a
/// file position: everything in this crate reads positionally and never relies on it.
pub fn dup_file(fd: impl AsFd) -> Result<File> {
    Ok(File::from(fcntl_dupfd_cloexec(fd, 0)?))
}

/// Returns a human-readable name for `fd`, for use in error messages.
///
/// This is the target of the fd's "/proc/self/fd" magic link when it can be resolved, or the
/// "/proc/self/fd/N" path itself otherwise.
pub fn fd_name(fd: impl AsFd) -> PathBuf {
    let link = proc_self_fd(fd);
    match readlink(link.as_str(), Vec::new()) {
        Ok(target) => PathBuf::from(std::ffi::OsStr::from_bytes(target.as_bytes())),
        Err(_) => PathBuf::from(link),
    }
}

/// A `Read` adapter that reads from a file using positional reads (pread/read_at).
///
/// Reading never touches the file position of the underlying descriptor.  The offset lives in a
/// [`Cell`] and `Read` is implemented for shared references, so the current offset can be queried
/// while a parser holds on to the reader.
#[derive(Debug)]
pub(crate) struct ReadAtReader<'a> {
    file: &'a File,
    offset: Cell<u64>,
}

impl<'a> ReadAtReader<'a> {
    /// Create a new positional reader for the given file, starting at offset 0.
    pub(crate) fn new(file: &'a File) -> Self {
        Self {
            file,
            offset: Cell::new(0),
        }
    }

    /// The offset the next read will start at.
    pub(crate) fn position(&self) -> u64 {
        self.offset.get()
    }
}

impl Read for &ReadAtReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.file.read_at(buf, self.offset.get())?;
        self.offset.set(self.offset.get() + n as u64);
        Ok(n)
    }
}
