use std::path::{Path, PathBuf};

/// Returns `path` in the form handed to the engine for writing.
///
/// On Windows the extended-length prefix lifts the default 260-character
/// ceiling: `\\?\`-prefixed paths pass through unchanged, `\\server\share`
/// paths become `\\?\UNC\server\share`, and everything else gains the plain
/// prefix. Other platforms have no such ceiling and the path is returned as
/// given.
pub(crate) fn extended_length(path: &Path) -> PathBuf {
    #[cfg(windows)]
    {
        match path.to_str() {
            Some(utf8) => PathBuf::from(add_extended_prefix(utf8)),
            // Not representable as UTF-8; hand it to the engine untouched.
            None => path.to_path_buf(),
        }
    }
    #[cfg(not(windows))]
    {
        path.to_path_buf()
    }
}

#[cfg(any(windows, test))]
fn add_extended_prefix(path: &str) -> String {
    if path.starts_with(r"\\?\") {
        path.to_string()
    } else if let Some(server_share) = path.strip_prefix(r"\\") {
        format!(r"\\?\UNC\{}", server_share)
    } else {
        format!(r"\\?\{}", path)
    }
}
