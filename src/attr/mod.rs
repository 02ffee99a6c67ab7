//! Raw attribute access: one read primitive, platform sources behind a
//! trait.
//!
//! The size-probe/fetch pair is a trait so tests can stub the two calls
//! independently; the shared protocol in [`read_attribute`] is what
//! detects a size mismatch between them.

use std::path::Path;

use tracing::debug;

use crate::error::ReadError;

#[cfg(unix)]
pub mod xattr;
#[cfg(windows)]
pub mod ads;

#[cfg(unix)]
pub use xattr::XattrSource as PlatformSource;
#[cfg(windows)]
pub use ads::StreamSource as PlatformSource;

/// Low-level access to one named attribute of a file.
///
/// Implementations classify their own OS errors into [`ReadError`]
/// variants; the shared read protocol never inspects errno itself.
pub trait AttrSource {
    /// Size in bytes of the stored value.
    fn size(&self, path: &Path, name: &str) -> Result<usize, ReadError>;

    /// Fetch the value into `buf`, returning the number of bytes the
    /// attribute actually held.
    fn fetch(&self, path: &Path, name: &str, buf: &mut [u8]) -> Result<usize, ReadError>;
}

/// Read one named attribute: size-probe, then fetch into a freshly
/// sized buffer.
///
/// The attribute changing size between the two calls is reported as an
/// explicit "attribute size mismatch" rather than silently truncating
/// or padding.
pub fn read_attribute(
    source: &dyn AttrSource,
    path: &Path,
    name: &str,
) -> Result<Vec<u8>, ReadError> {
    let size = source.size(path, name)?;
    let mut buf = vec![0u8; size];
    let got = source.fetch(path, name, &mut buf)?;
    if got != size {
        debug!(
            path = %path.display(),
            name,
            probed = size,
            fetched = got,
            "attribute changed size between probe and fetch"
        );
        return Err(ReadError::Other("attribute size mismatch".to_string()));
    }
    Ok(buf)
}
