//! Iterators over the members of an [`Index`](crate::Index).
//!
//! All iterators borrow the index and hold no other resources, so they can be dropped at any
//! point.  Their order is unspecified.

use std::iter::FusedIterator;

use indexmap::map::Iter;

use crate::index::Member;

/// Iterator over all indexed members, see [`Index::all`](crate::Index::all).
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    inner: Iter<'a, String, Member>,
}

impl<'a> Entries<'a> {
    pub(crate) fn new(inner: Iter<'a, String, Member>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a str, &'a Member);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(name, member)| (name.as_str(), member))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}

impl FusedIterator for Entries<'_> {}

/// Iterator over the plain regular files, see
/// [`Index::regular_files`](crate::Index::regular_files).
#[derive(Debug, Clone)]
pub struct RegularFiles<'a> {
    inner: Entries<'a>,
}

impl<'a> RegularFiles<'a> {
    pub(crate) fn new(inner: Entries<'a>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for RegularFiles<'a> {
    type Item = (&'a str, &'a Member);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find(|(_, member)| member.is_regular_file())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl FusedIterator for RegularFiles<'_> {}

/// Iterator over the paths of the plain regular files, see
/// [`Index::regular_file_paths`](crate::Index::regular_file_paths).
#[derive(Debug, Clone)]
pub struct RegularFilePaths<'a> {
    inner: RegularFiles<'a>,
}

impl<'a> RegularFilePaths<'a> {
    pub(crate) fn new(inner: RegularFiles<'a>) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for RegularFilePaths<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(name, _)| name)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl FusedIterator for RegularFilePaths<'_> {}
