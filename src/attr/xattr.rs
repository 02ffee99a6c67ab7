//! Extended-attribute source for Unix systems.
//!
//! Two `getxattr` calls per read (size probe, then fetch), with errno
//! normalized into the three outcome classes.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::error::ReadError;

use super::AttrSource;

#[cfg(target_os = "macos")]
const NO_ATTRIBUTE: i32 = libc::ENOATTR;
#[cfg(not(target_os = "macos"))]
const NO_ATTRIBUTE: i32 = libc::ENODATA;

/// Reads extended attributes through `getxattr(2)`.
pub struct XattrSource;

fn classify(err: std::io::Error) -> ReadError {
    let msg = err.to_string();
    match err.raw_os_error() {
        Some(code) if code == NO_ATTRIBUTE || code == libc::ENOTSUP => ReadError::Absent(msg),
        Some(
            libc::ENOENT
            | libc::ENOTDIR
            | libc::EISDIR
            | libc::ENAMETOOLONG
            | libc::EACCES
            | libc::ELOOP,
        ) => ReadError::FileAbsent(msg),
        _ => ReadError::Other(msg),
    }
}

fn c_string(bytes: &[u8]) -> Result<CString, ReadError> {
    CString::new(bytes).map_err(|e| ReadError::Other(e.to_string()))
}

fn getxattr(path: &Path, name: &str, buf: Option<&mut [u8]>) -> Result<usize, ReadError> {
    let c_path = c_string(path.as_os_str().as_bytes())?;
    let c_name = c_string(name.as_bytes())?;

    let (ptr, len) = match buf {
        Some(b) => (b.as_mut_ptr().cast::<libc::c_void>(), b.len()),
        None => (std::ptr::null_mut(), 0),
    };

    #[cfg(target_os = "macos")]
    let ret = unsafe { libc::getxattr(c_path.as_ptr(), c_name.as_ptr(), ptr, len, 0, 0) };
    #[cfg(not(target_os = "macos"))]
    let ret = unsafe { libc::getxattr(c_path.as_ptr(), c_name.as_ptr(), ptr, len) };

    if ret < 0 {
        Err(classify(std::io::Error::last_os_error()))
    } else {
        Ok(ret as usize)
    }
}

impl AttrSource for XattrSource {
    fn size(&self, path: &Path, name: &str) -> Result<usize, ReadError> {
        getxattr(path, name, None)
    }

    fn fetch(&self, path: &Path, name: &str, buf: &mut [u8]) -> Result<usize, ReadError> {
        getxattr(path, name, Some(buf))
    }
}
