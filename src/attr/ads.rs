//! Alternate-data-stream source for Windows.
//!
//! An attribute named `attr` on `file` is the NTFS stream
//! `file:attr:$DATA`. A missing stream on an existing file is the
//! Absent outcome; a missing file is FileAbsent.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::ReadError;

use super::AttrSource;

/// Reads NTFS alternate data streams through the regular file API.
pub struct StreamSource;

fn stream_path(path: &Path, name: &str) -> PathBuf {
    let mut s = path.as_os_str().to_os_string();
    s.push(format!(":{name}:$DATA"));
    PathBuf::from(s)
}

fn classify(path: &Path, err: std::io::Error) -> ReadError {
    let msg = err.to_string();
    match err.kind() {
        std::io::ErrorKind::NotFound => {
            if path.exists() {
                // The file is there; only the stream is missing.
                ReadError::Absent(msg)
            } else {
                ReadError::FileAbsent(msg)
            }
        }
        std::io::ErrorKind::PermissionDenied => ReadError::FileAbsent(msg),
        _ => ReadError::Other(msg),
    }
}

fn read_stream(path: &Path, name: &str) -> Result<Vec<u8>, ReadError> {
    let stream = stream_path(path, name);
    let mut file = File::open(&stream).map_err(|e| classify(path, e))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .map_err(|e| ReadError::Other(e.to_string()))?;
    Ok(data)
}

impl AttrSource for StreamSource {
    fn size(&self, path: &Path, name: &str) -> Result<usize, ReadError> {
        let stream = stream_path(path, name);
        match std::fs::metadata(&stream) {
            Ok(meta) => Ok(meta.len() as usize),
            Err(e) => Err(classify(path, e)),
        }
    }

    fn fetch(&self, path: &Path, name: &str, buf: &mut [u8]) -> Result<usize, ReadError> {
        let data = read_stream(path, name)?;
        let n = data.len().min(buf.len());
        buf[..n].copy_from_slice(&data[..n]);
        Ok(data.len())
    }
}
