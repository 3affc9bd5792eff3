//! A library for reading and extracting [Windows
//! cabinet](https://en.wikipedia.org/wiki/Cabinet_(file_format)) (CAB)
//! files through a pluggable decompression engine.
//!
//! The CAB binary format and its codecs (MSZIP, Quantum, LZX) are owned by
//! an external engine that the caller supplies as an implementation of
//! [`CabEngine`]. This crate manages everything around that engine: the
//! lifetimes of its non-garbage-collected resources (decompressor contexts
//! and cabinet handles), safe traversal of its linked file lists, joining
//! multi-disk cabinet sets, and restoring timestamps and DOS attributes on
//! extracted files, including destinations beyond the platform's default
//! path-length limit.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mscabd::{CabEngine, Cabinet};
//!
//! fn explode(engine: Arc<dyn CabEngine>) -> mscabd::Result<()> {
//!     let mut cabinet = Cabinet::open(engine, "install.cab")?;
//!     for entry in cabinet.files()? {
//!         let entry = entry?;
//!         entry.extract_to(format!("out/{}", entry.name()))?;
//!     }
//!     cabinet.close();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod cabinet;
pub mod consts;
mod datetime;
mod decompressor;
mod engine;
mod error;
mod extract;
mod file;
mod path;

pub use crate::cabinet::Cabinet;
pub use crate::datetime::DosDateTime;
pub use crate::decompressor::Decompressor;
pub use crate::engine::{
    CabEngine, CabinetDesc, CabinetHandle, ContextHandle, FileDesc, FileHandle,
};
pub use crate::error::{Error, Result};
pub use crate::file::{FileEntries, FileEntry};
