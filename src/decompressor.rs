use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::engine::{CabEngine, ContextHandle};
use crate::error::{Error, Result};

/// Owns one decompressor context allocated from the external engine.
///
/// A context is live from construction until [`release`](Self::release) (or
/// drop) and is returned to the engine exactly once. Sessions opened with
/// [`Cabinet::open`](crate::Cabinet::open) each own a private context, which
/// keeps teardown order deterministic. Callers wanting to amortize context
/// allocation across many archives may instead construct one
/// `Arc<Decompressor>` and pass clones to
/// [`Cabinet::open_with`](crate::Cabinet::open_with); such a shared context
/// is never released by the sessions bound to it and must outlive them all.
pub struct Decompressor {
    engine: Arc<dyn CabEngine>,
    handle: ContextHandle,
    released: AtomicBool,
}

impl Decompressor {
    /// Allocates a fresh context from `engine`.
    pub fn new(engine: Arc<dyn CabEngine>) -> Result<Decompressor> {
        let handle = engine.create_context().ok_or(Error::EngineInit)?;
        Ok(Decompressor { engine, handle, released: AtomicBool::new(false) })
    }

    /// Returns true while the context has not been released.
    pub fn is_valid(&self) -> bool {
        !self.released.load(Ordering::Acquire)
    }

    /// Returns the context to the engine. The first call frees the native
    /// resource; every later call is a no-op.
    pub fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            self.engine.destroy_context(self.handle);
        }
    }

    /// The raw handle for engine calls, refused once released.
    pub(crate) fn handle(&self) -> Result<ContextHandle> {
        if self.is_valid() {
            Ok(self.handle)
        } else {
            Err(Error::InvalidState)
        }
    }

    pub(crate) fn engine(&self) -> &Arc<dyn CabEngine> {
        &self.engine
    }
}

impl Drop for Decompressor {
    fn drop(&mut self) {
        self.release();
    }
}
