//! The capability surface of the external decompression engine.
//!
//! The engine owns the CAB binary format and its codecs; this crate only
//! drives it. All engine resources are addressed through opaque typed
//! handles rather than raw pointers, and the descriptions the engine keeps
//! for open cabinets and their file records are re-read on demand as value
//! snapshots ([`CabinetDesc`], [`FileDesc`]).

use std::path::Path;

use crate::datetime::DosDateTime;

/// Opaque identifier for one engine decompressor context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextHandle(u64);

impl ContextHandle {
    /// Wraps a raw engine-assigned id.
    pub fn from_raw(raw: u64) -> ContextHandle {
        ContextHandle(raw)
    }

    /// Returns the raw engine-assigned id.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

/// Opaque identifier for one open cabinet within a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CabinetHandle(u64);

impl CabinetHandle {
    /// Wraps a raw engine-assigned id.
    pub fn from_raw(raw: u64) -> CabinetHandle {
        CabinetHandle(raw)
    }

    /// Returns the raw engine-assigned id.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

/// Opaque identifier for one file record in a cabinet's file list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileHandle(u64);

impl FileHandle {
    /// Wraps a raw engine-assigned id.
    pub fn from_raw(raw: u64) -> FileHandle {
        FileHandle(raw)
    }

    /// Returns the raw engine-assigned id.
    pub fn as_raw(self) -> u64 {
        self.0
    }
}

/// Snapshot of the engine's description of an open cabinet.
///
/// A successful [`CabEngine::append`] mutates engine state reachable from
/// both joined cabinets, so holders of a snapshot must re-read it afterward.
#[derive(Debug, Clone)]
pub struct CabinetDesc {
    /// Header flags (see [`crate::consts`]).
    pub flags: u16,
    /// Name of the predecessor disk, when part of a multi-disk set.
    pub prev_name: Option<String>,
    /// Name of the successor disk, when part of a multi-disk set.
    pub next_name: Option<String>,
    /// Set id shared by every disk of a cabinet set.
    pub set_id: u16,
    /// Zero-based index of this disk within its set.
    pub set_index: u16,
    /// Head of the contained-file list, absent for an empty cabinet.
    pub first_file: Option<FileHandle>,
}

/// Snapshot of one file record in a cabinet's file list.
#[derive(Debug, Clone)]
pub struct FileDesc {
    /// File name as stored in the cabinet.
    pub name: String,
    /// Uncompressed length in bytes.
    pub length: u64,
    /// DOS attribute bits (see [`crate::consts`]).
    pub attributes: u16,
    /// Last-modified stamp in local calendar time.
    pub datetime: DosDateTime,
    /// The following record in the list, absent at the tail.
    pub next: Option<FileHandle>,
}

/// The operations this crate needs from an external CAB decompression
/// engine.
///
/// Fallible operations report the engine's own error codes (see
/// [`crate::consts`]); `ERR_OK` (zero) means success. Every handle obtained
/// from a context is invalidated when that context is destroyed.
pub trait CabEngine: Send + Sync {
    /// Allocates a decompressor context, or `None` if the engine refuses.
    fn create_context(&self) -> Option<ContextHandle>;

    /// Frees a context and everything opened through it.
    fn destroy_context(&self, context: ContextHandle);

    /// Opens a cabinet file and reads its contents.
    fn open(&self, context: ContextHandle, path: &Path) -> Option<CabinetHandle>;

    /// Returns the error code set by the most recently failed operation on
    /// `context`.
    fn last_error(&self, context: ContextHandle) -> i32;

    /// Closes a cabinet previously opened on `context`.
    fn close(&self, context: ContextHandle, cabinet: CabinetHandle);

    /// Appends `next` to `cabinet`, forming or extending a cabinet set.
    fn append(
        &self,
        context: ContextHandle,
        cabinet: CabinetHandle,
        next: CabinetHandle,
    ) -> i32;

    /// Extracts one contained file to `dest`.
    fn extract(&self, context: ContextHandle, file: FileHandle, dest: &Path) -> i32;

    /// Re-reads the engine's description of an open cabinet.
    fn cabinet(&self, context: ContextHandle, cabinet: CabinetHandle) -> Option<CabinetDesc>;

    /// Re-reads one file record by its handle.
    fn file(&self, context: ContextHandle, file: FileHandle) -> Option<FileDesc>;
}
