use std::io;
use std::path::PathBuf;

use crate::consts;

/// Failures surfaced by cabinet operations.
///
/// Engine-reported failures carry the engine's error code verbatim. No
/// failed operation is retried internally; the engine gives no guidance on
/// retry-safety.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The engine refused to allocate a decompressor context.
    #[error("decompression engine failed to allocate a context")]
    EngineInit,

    /// The engine could not open a cabinet file.
    #[error(
        "failed to open cabinet '{}': {} (engine code {code})",
        .path.display(),
        consts::describe_code(*.code)
    )]
    Open {
        /// Path of the cabinet that failed to open.
        path: PathBuf,
        /// Error code reported by the engine.
        code: i32,
    },

    /// The engine rejected joining two cabinets into a set.
    #[error(
        "failed to append cabinet '{}' to '{}': {} (engine code {code})",
        .next.display(),
        .path.display(),
        consts::describe_code(*.code)
    )]
    Append {
        /// Path of the cabinet being appended to.
        path: PathBuf,
        /// Path of the cabinet that was to be appended.
        next: PathBuf,
        /// Error code reported by the engine.
        code: i32,
    },

    /// The engine failed to extract a contained file. Bytes the engine
    /// already wrote to the destination are left in place.
    #[error(
        "failed to extract '{name}' to '{}': {} (engine code {code})",
        .path.display(),
        consts::describe_code(*.code)
    )]
    Extract {
        /// Name of the contained file.
        name: String,
        /// Destination path handed to the engine.
        path: PathBuf,
        /// Error code reported by the engine.
        code: i32,
    },

    /// Extraction succeeded but the file's timestamp or attributes could
    /// not be restored. The extracted bytes are left in place.
    #[error("extracted '{}' but failed to restore its metadata", .path.display())]
    MetadataRestore {
        /// Path of the extracted file.
        path: PathBuf,
        /// The underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// Use of a closed session or a released decompressor context.
    #[error("cabinet resource is closed or its decompressor context was released")]
    InvalidState,
}

/// Shorthand for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;
