//! Cabinet header flags, file attribute bits, and the error codes reported
//! by the external decompression engine.

/// Cabinet header flag: cabinet has a predecessor disk.
pub const FLAG_PREV_CABINET: u16 = 0x1;
/// Cabinet header flag: cabinet has a successor disk.
pub const FLAG_NEXT_CABINET: u16 = 0x2;
/// Cabinet header flag: cabinet has reserved header space.
pub const FLAG_RESERVE_PRESENT: u16 = 0x4;

/// File attribute: read-only.
pub const ATTR_READ_ONLY: u16 = 0x01;
/// File attribute: hidden.
pub const ATTR_HIDDEN: u16 = 0x02;
/// File attribute: system file.
pub const ATTR_SYSTEM: u16 = 0x04;
/// File attribute: modified since last backup.
pub const ATTR_ARCH: u16 = 0x20;
/// File attribute: execute after extraction.
pub const ATTR_EXEC: u16 = 0x40;
/// File attribute: name is UTF-encoded.
pub const ATTR_NAME_IS_UTF: u16 = 0x80;

/// Every attribute bit a file record may legally carry.
pub const ATTR_MASK: u16 = ATTR_READ_ONLY
    | ATTR_HIDDEN
    | ATTR_SYSTEM
    | ATTR_ARCH
    | ATTR_EXEC
    | ATTR_NAME_IS_UTF;

/// Engine error code: no error.
pub const ERR_OK: i32 = 0;
/// Engine error code: bad arguments to an engine call.
pub const ERR_ARGS: i32 = 1;
/// Engine error code: error opening a file.
pub const ERR_OPEN: i32 = 2;
/// Engine error code: error reading a file.
pub const ERR_READ: i32 = 3;
/// Engine error code: error writing a file.
pub const ERR_WRITE: i32 = 4;
/// Engine error code: seek error.
pub const ERR_SEEK: i32 = 5;
/// Engine error code: out of memory.
pub const ERR_NOMEMORY: i32 = 6;
/// Engine error code: bad "MSCF" signature.
pub const ERR_SIGNATURE: i32 = 7;
/// Engine error code: bad or corrupt file format.
pub const ERR_DATAFORMAT: i32 = 8;
/// Engine error code: bad checksum or CRC.
pub const ERR_CHECKSUM: i32 = 9;
/// Engine error code: error during compression.
pub const ERR_CRUNCH: i32 = 10;
/// Engine error code: error during decompression.
pub const ERR_DECRUNCH: i32 = 11;

pub(crate) fn describe_code(code: i32) -> &'static str {
    match code {
        ERR_OK => "no error",
        ERR_ARGS => "bad arguments",
        ERR_OPEN => "error opening file",
        ERR_READ => "error reading file",
        ERR_WRITE => "error writing file",
        ERR_SEEK => "seek error",
        ERR_NOMEMORY => "out of memory",
        ERR_SIGNATURE => "bad cabinet signature",
        ERR_DATAFORMAT => "bad or corrupt file format",
        ERR_CHECKSUM => "checksum mismatch",
        ERR_CRUNCH => "compression error",
        ERR_DECRUNCH => "decompression error",
        _ => "unknown engine error",
    }
}
