//! The set of documents known to a translation session.
//!
//! Diagnostics need to point back at the text they were raised against. As
//! well as the input file this includes intermediate snapshots of the
//! document, so that a failure part way through the pipeline can be labelled
//! against the text the failing pass actually saw.

use std::fmt;
use std::num::NonZeroU32;
use std::ops::Range;

use codespan_reporting::files::{Error, SimpleFile};

/// Handle to a document in [`Files`].
///
/// Ids are allocated from one, so that `Option<FileId>` is the same size as
/// `FileId`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FileId(NonZeroU32);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<u32> for FileId {
    type Error = <NonZeroU32 as TryFrom<u32>>::Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(FileId(NonZeroU32::try_from(value)?))
    }
}

impl From<FileId> for usize {
    fn from(value: FileId) -> Self {
        value.0.get() as usize
    }
}

/// The documents loaded or produced during a session, indexed by [`FileId`].
pub struct Files<Name, Source> {
    files: Vec<SimpleFile<Name, Source>>,
}

impl<Name, Source> Default for Files<Name, Source> {
    fn default() -> Self {
        Files { files: Vec::new() }
    }
}

impl<Name, Source> Files<Name, Source>
where
    Name: fmt::Display,
    Source: AsRef<str>,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, returning the handle that refers to it.
    pub fn add(&mut self, name: Name, source: Source) -> FileId {
        self.files.push(SimpleFile::new(name, source));
        // The length is at least one after the push, so it is never zero.
        let id = u32::try_from(self.files.len())
            .ok()
            .and_then(NonZeroU32::new)
            .expect("too many documents in one session");
        FileId(id)
    }

    pub fn get(&self, file_id: FileId) -> Result<&SimpleFile<Name, Source>, Error> {
        self.files
            .get(usize::from(file_id) - 1)
            .ok_or(Error::FileMissing)
    }

    pub fn name(&self, file_id: FileId) -> Result<&Name, Error> {
        Ok(self.get(file_id)?.name())
    }

    pub fn source(&self, file_id: FileId) -> Result<&str, Error> {
        Ok(self.get(file_id)?.source().as_ref())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<'a, Name, Source> codespan_reporting::files::Files<'a> for Files<Name, Source>
where
    Name: 'a + fmt::Display + Clone,
    Source: 'a + AsRef<str>,
{
    type FileId = FileId;
    type Name = Name;
    type Source = &'a str;

    fn name(&self, file_id: FileId) -> Result<Name, Error> {
        Ok(self.get(file_id)?.name().clone())
    }

    fn source(&self, file_id: FileId) -> Result<&str, Error> {
        Ok(self.get(file_id)?.source().as_ref())
    }

    fn line_index(&self, file_id: FileId, byte_index: usize) -> Result<usize, Error> {
        self.get(file_id)?.line_index((), byte_index)
    }

    fn line_range(&self, file_id: FileId, line_index: usize) -> Result<Range<usize>, Error> {
        self.get(file_id)?.line_range((), line_index)
    }
}
