use std::path::Path;

use time::PrimitiveDateTime;

use crate::cabinet::Cabinet;
use crate::consts;
use crate::datetime;
use crate::engine::{FileDesc, FileHandle};
use crate::error::{Error, Result};
use crate::extract;

/// A lazy cursor over the files contained in a cabinet.
///
/// Each step re-reads the next record from the engine by its handle; no
/// native state is retained between steps. The cursor ends at the record
/// without a successor and cannot be restarted midway, but a fresh cursor
/// can always be obtained from an open [`Cabinet`]. If the session's
/// context is released while the cursor is live, the next step yields
/// [`Error::InvalidState`] and the cursor stops.
pub struct FileEntries<'a> {
    cabinet: &'a Cabinet,
    next: Option<FileHandle>,
}

impl<'a> FileEntries<'a> {
    pub(crate) fn new(cabinet: &'a Cabinet, head: Option<FileHandle>) -> FileEntries<'a> {
        FileEntries { cabinet, next: head }
    }
}

impl<'a> Iterator for FileEntries<'a> {
    type Item = Result<FileEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let handle = self.next?;
        match read_entry(self.cabinet, handle) {
            Ok(entry) => {
                self.next = entry.desc.next;
                Some(Ok(entry))
            }
            Err(err) => {
                self.next = None;
                Some(Err(err))
            }
        }
    }
}

fn read_entry(cabinet: &Cabinet, handle: FileHandle) -> Result<FileEntry<'_>> {
    let (ctx, _) = cabinet.ensure_open()?;
    let desc = cabinet.engine().file(ctx, handle).ok_or(Error::InvalidState)?;
    Ok(FileEntry { cabinet, handle, desc })
}

/// Metadata about one file stored in a cabinet.
///
/// An entry is a non-owning view: a snapshot of the record plus the handle
/// needed for extraction. It is only usable while the owning [`Cabinet`]
/// stays open.
pub struct FileEntry<'a> {
    cabinet: &'a Cabinet,
    handle: FileHandle,
    desc: FileDesc,
}

impl<'a> FileEntry<'a> {
    /// Returns the name of file.
    pub fn name(&self) -> &str {
        &self.desc.name
    }

    /// Returns the total size of the file when decompressed, in bytes.
    pub fn length(&self) -> u64 {
        self.desc.length
    }

    /// Returns the last-modified datetime for this file, in the local
    /// calendar time the cabinet recorded it in, or [`None`] if the stored
    /// fields do not name a real instant.
    pub fn datetime(&self) -> Option<PrimitiveDateTime> {
        datetime::datetime_from_fields(self.desc.datetime)
    }

    /// Returns the raw DOS attribute bitmask.
    pub fn attributes(&self) -> u16 {
        self.desc.attributes
    }

    /// Returns true if this file has the "read-only" attribute set.
    pub fn is_read_only(&self) -> bool {
        (self.desc.attributes & consts::ATTR_READ_ONLY) != 0
    }

    /// Returns true if this file has the "hidden" attribute set.
    pub fn is_hidden(&self) -> bool {
        (self.desc.attributes & consts::ATTR_HIDDEN) != 0
    }

    /// Returns true if this file has the "system file" attribute set.
    pub fn is_system(&self) -> bool {
        (self.desc.attributes & consts::ATTR_SYSTEM) != 0
    }

    /// Returns true if this file has the "archive" (modified since last
    /// backup) attribute set.
    pub fn is_archive(&self) -> bool {
        (self.desc.attributes & consts::ATTR_ARCH) != 0
    }

    /// Returns true if this file has the "execute after extraction"
    /// attribute set.
    pub fn is_exec(&self) -> bool {
        (self.desc.attributes & consts::ATTR_EXEC) != 0
    }

    /// Returns true if this file has the "name is UTF" attribute set.
    pub fn is_name_utf(&self) -> bool {
        (self.desc.attributes & consts::ATTR_NAME_IS_UTF) != 0
    }

    /// Extracts this file to `dest` and restores its metadata.
    ///
    /// The destination is upgraded to extended-length form where the
    /// platform needs it, the engine writes the decompressed bytes, and the
    /// entry's timestamp and DOS attributes are then stamped onto the
    /// produced file. A metadata failure after a successful extraction
    /// surfaces as [`Error::MetadataRestore`] with the extracted bytes left
    /// in place.
    pub fn extract_to(&self, dest: impl AsRef<Path>) -> Result<()> {
        extract::extract(self.cabinet, self.handle, &self.desc, dest.as_ref())
    }
}
