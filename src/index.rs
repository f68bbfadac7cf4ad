//! Indexing the members of a tar archive for random access.
//!
//! Building an [`Index`] walks the archive once from front to back.  For every member, the tar
//! parser reads the header, which leaves the read position at the first content byte; that
//! position gets recorded.  The member's contents are then drained, which must leave the read
//! position exactly `size` bytes further.  Anything else means that the contents are not stored
//! contiguously (GNU sparse files with holes), which is rejected.  Block padding up to the next
//! 512 byte boundary is skipped by the parser when it reads the next header.
//!
//! Only regular files and directories are indexed.  Symlinks, hard links, devices and other entry
//! types are checked like any other member but then skipped.
//!
//! Archive member names need not be unique.  When a name occurs more than once, the last
//! indexed occurrence wins, while keeping the position of the first one in enumeration order.

use std::{
    fs::File,
    io::{self, ErrorKind},
    os::fd::AsFd,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, trace};
use rustix::fs::FileType;
use tar::{Archive, EntryType, Header};

use crate::{
    error::{Error, Result},
    iter::{Entries, RegularFilePaths, RegularFiles},
    partial_reader::PartialReader,
    util::{dup_file, fd_name, ReadAtReader},
};

/// Permission bits of a file mode.
const PERMISSION_BITS: u32 = 0o777;

/// Permission plus setuid, setgid and sticky bits, as carried by tar headers.
const MODE_BITS: u32 = 0o7777;

/// A regular file or directory within an indexed tar archive.
#[derive(Debug, Clone)]
pub struct Member {
    name: String,
    header: Header,
    mode: u32,
    offset: u64,
    size: u64,
}

impl Member {
    /// The member's path as recorded in the archive, including GNU long names and PAX path
    /// overrides.  Bytes that are not valid UTF-8 are replaced.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The member's tar header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Size of the member's contents in bytes; zero for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Absolute offset of the first content byte within the archive file, or zero for members
    /// without contents.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// The member's mode in `st_mode` form: file type bits plus the header's permission, setuid,
    /// setgid and sticky bits.
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// The member's file type.
    pub fn file_type(&self) -> FileType {
        FileType::from_raw_mode(self.mode)
    }

    /// Whether this member is a directory.
    pub fn is_dir(&self) -> bool {
        self.file_type() == FileType::Directory
    }

    /// Whether this member is a plain regular file: no mode bits are set beyond the permission
    /// bits and the regular file type.  Setuid, setgid or sticky files don't qualify.
    pub fn is_regular_file(&self) -> bool {
        self.mode & !PERMISSION_BITS == FileType::RegularFile.as_raw_mode()
    }
}

/// Maps an entry to the file type it is indexed as, or `None` if it isn't indexed at all.
fn indexed_file_type(header: &Header, name: &str) -> Option<FileType> {
    match header.entry_type() {
        EntryType::Directory => Some(FileType::Directory),
        // pre-POSIX archives mark directories with a trailing slash only
        EntryType::Regular if name.ends_with('/') => Some(FileType::Directory),
        EntryType::Regular | EntryType::Continuous | EntryType::GNUSparse => {
            Some(FileType::RegularFile)
        }
        _ => None,
    }
}

/// Random access index over the members of a tar archive file.
///
/// The index keeps its own duplicated file descriptor open until it is closed or dropped.  Readers
/// returned from [`Index::open`] get descriptors of their own and stay usable after the index is
/// gone.
///
/// The index is never modified after it has been built, so it can be shared between threads for
/// concurrent lookups, enumeration and opening of members.  It must not be used after the archive
/// file has been modified or replaced on disk.
#[derive(Debug)]
pub struct Index {
    members: IndexMap<String, Member>,
    file: File,
    name: PathBuf,
}

impl Index {
    /// Builds an index of the tar archive at `path`.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => Error::NotFound {
                path: path.to_path_buf(),
                source,
            },
            _ => Error::Io(source),
        })?;
        Self::build(file, path.to_path_buf())
    }

    /// Builds an index of the tar archive open as `fd`.
    ///
    /// The index works on its own duplicate of `fd`, so the caller remains responsible for closing
    /// `fd` and can do so right after this call returns.  The file position of `fd` is not used
    /// and left unchanged.
    pub fn from_fd(fd: impl AsFd) -> Result<Self> {
        let file = dup_file(fd)?;
        let name = fd_name(&file);
        Self::build(file, name)
    }

    fn build(file: File, name: PathBuf) -> Result<Self> {
        let members = scan(&file, &name)?;
        debug!("indexed {} members of tar file {name:?}", members.len());
        Ok(Self {
            members,
            file,
            name,
        })
    }

    /// Closes the index, releasing its file descriptor.  Dropping the index does the same.
    /// Readers opened from this index are not affected.
    pub fn close(self) {}

    /// Name of the indexed archive: the path it was opened from, or whatever its descriptor
    /// resolves to.
    pub fn name(&self) -> &Path {
        &self.name
    }

    /// Number of indexed members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the archive has no indexed members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Looks up a member by name.
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    /// Whether the index has a member by this name.
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Opens the named member for reading.
    ///
    /// Each call allocates a new file descriptor, owned by the returned reader.  Directories and
    /// other empty members yield a reader that immediately reports end-of-file.
    pub fn open(&self, name: &str) -> Result<PartialReader> {
        let member = self.get(name).ok_or_else(|| Error::NoSuchMember {
            archive: self.name.clone(),
            name: name.to_owned(),
        })?;
        debug!("opening {name:?} in tar file {:?}", self.name);
        PartialReader::new(&self.file, member.offset, member.size)
    }

    /// Iterates over all members, yielding their names and metadata.
    pub fn all(&self) -> Entries<'_> {
        Entries::new(self.members.iter())
    }

    /// Iterates over the plain regular files, see [`Member::is_regular_file`].
    pub fn regular_files(&self) -> RegularFiles<'_> {
        RegularFiles::new(self.all())
    }

    /// Iterates over the paths of the plain regular files.
    pub fn regular_file_paths(&self) -> RegularFilePaths<'_> {
        RegularFilePaths::new(self.regular_files())
    }
}

impl<'a> IntoIterator for &'a Index {
    type Item = (&'a str, &'a Member);
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.all()
    }
}

/// Walks the whole archive once, returning its regular files and directories.
fn scan(file: &File, archive: &Path) -> Result<IndexMap<String, Member>> {
    let scan_error = |source: io::Error| Error::Scan {
        archive: archive.to_path_buf(),
        source,
    };

    let reader = ReadAtReader::new(file);
    let mut tar = Archive::new(&reader);
    let mut members = IndexMap::new();

    for entry in tar.entries().map_err(scan_error)? {
        let mut entry = entry.map_err(scan_error)?;
        let pos = reader.position();
        let drained = io::copy(&mut entry, &mut io::sink()).map_err(scan_error)?;
        let end = reader.position();

        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let size = entry.size();
        // the parser yields short contents instead of failing when the archive is cut off
        if drained < size {
            return Err(scan_error(io::Error::new(
                ErrorKind::UnexpectedEof,
                format!("contents of {name:?} end after {drained} of {size} bytes"),
            )));
        }
        if pos.checked_add(size) != Some(end) {
            return Err(Error::UnsupportedLayout {
                archive: archive.to_path_buf(),
                member: name,
            });
        }

        let header = entry.header();
        let Some(file_type) = indexed_file_type(header, &name) else {
            trace!("skipping {:?} entry {name:?}", header.entry_type());
            continue;
        };
        let mode = file_type.as_raw_mode() | (header.mode().map_err(scan_error)? & MODE_BITS);
        let offset = if size == 0 { 0 } else { pos };
        trace!("indexed {name:?} at [{offset}:{}]", offset + size);

        members.insert(
            name.clone(),
            Member {
                name,
                header: header.clone(),
                mode,
                offset,
                size,
            },
        );
    }

    Ok(members)
}
