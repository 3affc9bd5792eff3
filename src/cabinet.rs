use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::consts;
use crate::decompressor::Decompressor;
use crate::engine::{CabEngine, CabinetDesc, CabinetHandle, ContextHandle};
use crate::error::{Error, Result};
use crate::file::FileEntries;

/// One open cabinet archive, possibly the head of a multi-disk set.
///
/// A session moves `Open → (appended)* → Closed`; `Closed` is terminal and
/// every operation other than a repeated [`close`](Self::close) then fails
/// with [`Error::InvalidState`]. Sessions are not meant to be shared across
/// threads; parallelize across independent archives instead, each with its
/// own session.
pub struct Cabinet {
    context: ContextRef,
    handle: Option<CabinetHandle>,
    path: PathBuf,
    desc: CabinetDesc,
}

/// How a session holds its decompressor context: privately, released at
/// close, or shared, owned by the caller.
enum ContextRef {
    Owned(Decompressor),
    Shared(Arc<Decompressor>),
}

impl ContextRef {
    fn get(&self) -> &Decompressor {
        match self {
            ContextRef::Owned(context) => context,
            ContextRef::Shared(context) => context,
        }
    }
}

impl Cabinet {
    /// Opens the cabinet at `path` with a private decompressor context.
    ///
    /// The context lives exactly as long as the session, so teardown order
    /// is deterministic. On failure nothing stays allocated and the engine's
    /// error code is carried in [`Error::Open`].
    pub fn open(engine: Arc<dyn CabEngine>, path: impl AsRef<Path>) -> Result<Cabinet> {
        let context = Decompressor::new(engine)?;
        Cabinet::open_inner(ContextRef::Owned(context), path.as_ref())
    }

    /// Opens the cabinet at `path` against a caller-shared context.
    ///
    /// The session never releases `context`; whoever constructed it owns its
    /// lifetime and must keep it valid until every session bound to it is
    /// closed. Releasing it earlier leaks the native cabinet handle (see
    /// [`close`](Self::close)).
    pub fn open_with(context: Arc<Decompressor>, path: impl AsRef<Path>) -> Result<Cabinet> {
        Cabinet::open_inner(ContextRef::Shared(context), path.as_ref())
    }

    fn open_inner(context: ContextRef, path: &Path) -> Result<Cabinet> {
        // A just-created owned context is released by drop on every error
        // path below.
        let ctx = context.get().handle()?;
        let engine = context.get().engine();
        let handle = match engine.open(ctx, path) {
            Some(handle) => handle,
            None => {
                return Err(Error::Open {
                    path: path.to_path_buf(),
                    code: engine.last_error(ctx),
                });
            }
        };
        let desc = match engine.cabinet(ctx, handle) {
            Some(desc) => desc,
            None => {
                let code = engine.last_error(ctx);
                engine.close(ctx, handle);
                return Err(Error::Open { path: path.to_path_buf(), code });
            }
        };
        Ok(Cabinet { context, handle: Some(handle), path: path.to_path_buf(), desc })
    }

    /// Returns the path this session was opened from. Unlike the header
    /// accessors this stays available after close.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the raw cabinet header flags.
    pub fn flags(&self) -> Result<u16> {
        self.ensure_open()?;
        Ok(self.desc.flags)
    }

    /// Returns true if the header marks a predecessor disk.
    pub fn has_predecessor(&self) -> Result<bool> {
        Ok(self.flags()? & consts::FLAG_PREV_CABINET != 0)
    }

    /// Returns true if the header marks a successor disk.
    pub fn has_successor(&self) -> Result<bool> {
        Ok(self.flags()? & consts::FLAG_NEXT_CABINET != 0)
    }

    /// Returns true if the header carries reserved space.
    pub fn has_reserved_space(&self) -> Result<bool> {
        Ok(self.flags()? & consts::FLAG_RESERVE_PRESENT != 0)
    }

    /// Returns the name of the predecessor disk, when this cabinet is part
    /// of a multi-disk set.
    pub fn prev_name(&self) -> Result<Option<&str>> {
        self.ensure_open()?;
        Ok(self.desc.prev_name.as_deref())
    }

    /// Returns the name of the successor disk, when this cabinet is part of
    /// a multi-disk set.
    pub fn next_name(&self) -> Result<Option<&str>> {
        self.ensure_open()?;
        Ok(self.desc.next_name.as_deref())
    }

    /// Returns the cabinet set id shared by all disks of a set.
    pub fn set_id(&self) -> Result<u16> {
        self.ensure_open()?;
        Ok(self.desc.set_id)
    }

    /// Returns this cabinet's (zero-based) index within its cabinet set.
    pub fn set_index(&self) -> Result<u16> {
        self.ensure_open()?;
        Ok(self.desc.set_index)
    }

    /// Returns a cursor over the files contained in this cabinet; after a
    /// successful [`append`](Self::append), that is the union across the
    /// joined set.
    pub fn files(&self) -> Result<FileEntries<'_>> {
        self.ensure_open()?;
        Ok(FileEntries::new(self, self.desc.first_file))
    }

    /// Appends `next` to this session, forming or extending a cabinet set.
    ///
    /// Disks join in ascending order, the first session staying the
    /// authoritative head. A successful merge mutates engine state reachable
    /// from either side, so both sessions' cached descriptions are re-read
    /// here. On failure both sessions are left exactly as they were and the
    /// engine's code is carried in [`Error::Append`].
    pub fn append(&mut self, next: &mut Cabinet) -> Result<()> {
        let (ctx, handle) = self.ensure_open()?;
        let (next_ctx, next_handle) = next.ensure_open()?;
        let engine = Arc::clone(self.context.get().engine());
        let code = engine.append(ctx, handle, next_handle);
        if code != consts::ERR_OK {
            return Err(Error::Append {
                path: self.path.clone(),
                next: next.path.clone(),
                code,
            });
        }
        let desc = engine.cabinet(ctx, handle).ok_or(Error::InvalidState)?;
        let next_engine = Arc::clone(next.context.get().engine());
        let next_desc =
            next_engine.cabinet(next_ctx, next_handle).ok_or(Error::InvalidState)?;
        self.desc = desc;
        next.desc = next_desc;
        Ok(())
    }

    /// Closes the session. Idempotent, and also run on drop.
    ///
    /// The native cabinet handle can only be returned to the engine while
    /// the bound context is still valid. If a shared context was released
    /// before its sessions, the handle is unreachable; that leak is reported
    /// as a warning rather than crashing or being silently ignored. A
    /// privately owned context is released here as the final step.
    pub fn close(&mut self) {
        if let Some(handle) = self.handle.take() {
            let context = self.context.get();
            match context.handle() {
                Ok(ctx) => {
                    debug!(path = %self.path.display(), "closing cabinet");
                    context.engine().close(ctx, handle);
                }
                Err(_) => {
                    warn!(
                        path = %self.path.display(),
                        "leaking native cabinet handle: its decompressor context \
                         was released before the session was closed"
                    );
                }
            }
        }
        if let ContextRef::Owned(context) = &self.context {
            context.release();
        }
    }

    /// The handles needed for an engine call, refused once the session is
    /// closed or its context released.
    pub(crate) fn ensure_open(&self) -> Result<(ContextHandle, CabinetHandle)> {
        let handle = self.handle.ok_or(Error::InvalidState)?;
        let ctx = self.context.get().handle()?;
        Ok((ctx, handle))
    }

    pub(crate) fn engine(&self) -> &Arc<dyn CabEngine> {
        self.context.get().engine()
    }
}

impl std::fmt::Debug for Cabinet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let context = match self.context {
            ContextRef::Owned(_) => "owned",
            ContextRef::Shared(_) => "shared",
        };
        f.debug_struct("Cabinet")
            .field("context", &context)
            .field("handle", &self.handle)
            .field("path", &self.path)
            .field("desc", &self.desc)
            .finish()
    }
}

impl Drop for Cabinet {
    fn drop(&mut self) {
        self.close();
    }
}
