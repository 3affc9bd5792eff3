//! Extraction of one contained file and restoration of its metadata.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use crate::cabinet::Cabinet;
use crate::consts;
use crate::datetime;
use crate::engine::{FileDesc, FileHandle};
use crate::error::{Error, Result};
use crate::path;

pub(crate) fn extract(
    cabinet: &Cabinet,
    file: FileHandle,
    desc: &FileDesc,
    dest: &Path,
) -> Result<()> {
    let (ctx, _) = cabinet.ensure_open()?;
    let dest = path::extended_length(dest);
    let code = cabinet.engine().extract(ctx, file, &dest);
    if code != consts::ERR_OK {
        return Err(Error::Extract { name: desc.name.clone(), path: dest, code });
    }
    if let Err(source) = restore_metadata(&dest, desc) {
        return Err(Error::MetadataRestore { path: dest, source });
    }
    Ok(())
}

/// Timestamps go first: the attribute bits may remove write access, and the
/// engine-written file is still plain at this point.
fn restore_metadata(dest: &Path, desc: &FileDesc) -> io::Result<()> {
    if let Some(stamp) = datetime::datetime_from_fields(desc.datetime) {
        set_file_times(dest, datetime::to_system_time(stamp))?;
    }
    restore_attributes(dest, desc.attributes)
}

fn set_file_times(dest: &Path, stamp: SystemTime) -> io::Result<()> {
    let file = fs::OpenOptions::new().write(true).open(dest)?;
    let times = fs::FileTimes::new().set_modified(stamp);
    #[cfg(windows)]
    let times = {
        use std::os::windows::fs::FileTimesExt;
        times.set_created(stamp)
    };
    file.set_times(times)
}

#[cfg(windows)]
fn restore_attributes(dest: &Path, attributes: u16) -> io::Result<()> {
    use std::os::windows::ffi::OsStrExt;

    use winapi::um::fileapi::{
        GetFileAttributesW, SetFileAttributesW, INVALID_FILE_ATTRIBUTES,
    };
    use winapi::um::winnt::{
        FILE_ATTRIBUTE_ARCHIVE, FILE_ATTRIBUTE_HIDDEN, FILE_ATTRIBUTE_READONLY,
        FILE_ATTRIBUTE_SYSTEM,
    };

    let mut wide: Vec<u16> = dest.as_os_str().encode_wide().collect();
    wide.push(0);
    // SAFETY: `wide` is NUL-terminated and outlives both calls.
    let mut current = unsafe { GetFileAttributesW(wide.as_ptr()) };
    if current == INVALID_FILE_ATTRIBUTES {
        return Err(io::Error::last_os_error());
    }
    // OR the entry's bits onto whatever the file already carries; bits not
    // covered by the DOS mask are preserved.
    if attributes & consts::ATTR_ARCH != 0 {
        current |= FILE_ATTRIBUTE_ARCHIVE;
    }
    if attributes & consts::ATTR_HIDDEN != 0 {
        current |= FILE_ATTRIBUTE_HIDDEN;
    }
    if attributes & consts::ATTR_READ_ONLY != 0 {
        current |= FILE_ATTRIBUTE_READONLY;
    }
    if attributes & consts::ATTR_SYSTEM != 0 {
        current |= FILE_ATTRIBUTE_SYSTEM;
    }
    if unsafe { SetFileAttributesW(wide.as_ptr(), current) } == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(windows))]
fn restore_attributes(dest: &Path, attributes: u16) -> io::Result<()> {
    // Only the read-only bit has a counterpart here; the other DOS bits are
    // dropped, and existing permissions are never cleared.
    if attributes & consts::ATTR_READ_ONLY != 0 {
        let mut permissions = fs::metadata(dest)?.permissions();
        permissions.set_readonly(true);
        fs::set_permissions(dest, permissions)?;
    }
    Ok(())
}
