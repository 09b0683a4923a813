//! Version-checked binary file access.

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::ops::{BitOr, BitOrAssign};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::{VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH};

/// File errors
#[derive(Error, Debug)]
pub enum FileError {
    /// The file could not be opened; carries the OS error
    #[error("couldn't open {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    /// A header field disagrees with the crate version under the active policy
    #[error("{field} version mismatch, got {got} but expected {expected}")]
    VersionMismatch {
        field: &'static str,
        got: u32,
        expected: u32,
    },

    /// Fewer bytes available than a read demanded
    #[error("file truncated: {0}")]
    Truncated(#[source] io::Error),

    /// Any other I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Caller violated a documented precondition
    #[error("precondition violated: {0}")]
    Precondition(&'static str),
}

pub type FileResult<T> = Result<T, FileError>;

/// Bitset of open flags.
///
/// The empty set is the default value; flags combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mode(u32);

impl Mode {
    pub const READ: Mode = Mode(1 << 0);
    pub const WRITE: Mode = Mode(1 << 1);
    pub const APPEND: Mode = Mode(1 << 2);
    /// Accepted for symmetry with text-mode platforms; all access is binary.
    pub const BINARY: Mode = Mode(1 << 3);
    /// Store/check a version header
    pub const VERSIONED: Mode = Mode(1 << 4);
    /// Requires a full match, down to the patch level
    pub const VERSIONED_EXACT: Mode = Mode(1 << 5);
    /// Requires a match down to the minor version only
    pub const VERSIONED_MINOR: Mode = Mode(1 << 6);
    /// Requires a match of the major version only
    pub const VERSIONED_MAJOR: Mode = Mode(1 << 7);
    /// Downgrade any mismatch to a logged warning
    pub const VERSIONED_WARNING: Mode = Mode(1 << 8);

    pub const fn empty() -> Mode {
        Mode(0)
    }

    pub const fn contains(self, flag: Mode) -> bool {
        self.0 & flag.0 == flag.0
    }

    pub const fn intersects(self, flags: Mode) -> bool {
        self.0 & flags.0 != 0
    }
}

impl BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mode {
    fn bitor_assign(&mut self, rhs: Mode) {
        self.0 |= rhs.0;
    }
}

/// Fixed-layout value with an explicit little-endian bit image.
///
/// The encoded image is exactly [`Pod::SIZE`] bytes, independent of the
/// host's endianness or struct padding.
pub trait Pod: Copy {
    const SIZE: usize;

    /// Append the little-endian image to `out`.
    fn encode_le(&self, out: &mut Vec<u8>);

    /// Decode from the first [`Pod::SIZE`] bytes of `bytes`.
    fn decode_le(bytes: &[u8]) -> Self;
}

macro_rules! int_pod {
    ($($int:ty),*) => {$(
        impl Pod for $int {
            const SIZE: usize = std::mem::size_of::<$int>();

            fn encode_le(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn decode_le(bytes: &[u8]) -> Self {
                let mut image = [0u8; std::mem::size_of::<$int>()];
                image.copy_from_slice(&bytes[..Self::SIZE]);
                Self::from_le_bytes(image)
            }
        }
    )*};
}

int_pod!(u8, u32, u64, i64);

/// Objects that read and write themselves through a [`File`].
///
/// Implementations compose: a decorator stores its base graph first, then
/// its own decoration, and loads in the same order.
pub trait Persist: Sized {
    fn store(&self, file: &mut File) -> FileResult<()>;
    fn load(file: &mut File) -> FileResult<Self>;
}

// Byte strings persist as a nested pod container, which gives byte
// decorations their length-prefixed encoding.
impl Persist for Vec<u8> {
    fn store(&self, file: &mut File) -> FileResult<()> {
        file.write_pod_container(self)
    }

    fn load(file: &mut File) -> FileResult<Self> {
        file.read_pod_container()
    }
}

/// Manages access to a file, including version checks on open.
#[derive(Debug)]
pub struct File {
    path: PathBuf,
    inner: fs::File,
}

impl File {
    /// Open `path` with the access and versioning behavior selected by
    /// `mode`. For `WRITE`/`APPEND` with `VERSIONED` the header is written
    /// immediately; for `READ` with `VERSIONED` it is read and checked
    /// immediately.
    pub fn open(path: impl AsRef<Path>, mode: Mode) -> FileResult<Self> {
        let path = path.as_ref().to_path_buf();

        let mut options = OpenOptions::new();
        if mode.contains(Mode::READ) {
            options.read(true);
        }
        if mode.contains(Mode::APPEND) {
            options.append(true).create(true);
        } else if mode.contains(Mode::WRITE) {
            options.write(true).create(true).truncate(true);
        }

        let inner = options.open(&path).map_err(|source| FileError::Open {
            path: path.clone(),
            source,
        })?;
        let mut file = File { path, inner };

        if mode.intersects(Mode::WRITE | Mode::APPEND) && mode.contains(Mode::VERSIONED) {
            file.write_version()?;
        }
        if mode.contains(Mode::READ) && mode.contains(Mode::VERSIONED) {
            file.read_and_check_version(mode)?;
        }

        Ok(file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and release the handle. Dropping the file closes it as well;
    /// this variant surfaces flush errors.
    pub fn close(mut self) -> FileResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Write the raw little-endian image of a fixed-layout value.
    pub fn write_pod<T: Pod>(&mut self, value: &T) -> FileResult<()> {
        let mut buf = Vec::with_capacity(T::SIZE);
        value.encode_le(&mut buf);
        self.inner.write_all(&buf)?;
        Ok(())
    }

    /// Read back a fixed-layout value.
    pub fn read_pod<T: Pod>(&mut self) -> FileResult<T> {
        let mut buf = vec![0u8; T::SIZE];
        self.inner.read_exact(&mut buf).map_err(Self::read_error)?;
        Ok(T::decode_le(&buf))
    }

    /// Write a u64 length prefix followed by the packed images of all
    /// elements.
    pub fn write_pod_container<T: Pod>(&mut self, items: &[T]) -> FileResult<()> {
        self.write_pod(&(items.len() as u64))?;
        let mut buf = Vec::with_capacity(items.len() * T::SIZE);
        for item in items {
            item.encode_le(&mut buf);
        }
        self.inner.write_all(&buf)?;
        Ok(())
    }

    /// Read a length-prefixed sequence of fixed-layout elements.
    pub fn read_pod_container<T: Pod>(&mut self) -> FileResult<Vec<T>> {
        // the prefix is untrusted input; reading one element at a time keeps
        // a corrupt length from sizing a huge allocation and lets it surface
        // as a short read instead
        let len = self.read_pod::<u64>()?;
        let mut buf = vec![0u8; T::SIZE];
        let mut items = Vec::new();
        for _ in 0..len {
            self.inner.read_exact(&mut buf).map_err(Self::read_error)?;
            items.push(T::decode_le(&buf));
        }
        Ok(items)
    }

    /// Write a u64 count followed by each element's own encoding.
    pub fn write_container<T: Persist>(&mut self, items: &[T]) -> FileResult<()> {
        self.write_pod(&(items.len() as u64))?;
        for item in items {
            item.store(self)?;
        }
        Ok(())
    }

    /// Read a count-prefixed sequence of self-describing elements.
    pub fn read_container<T: Persist>(&mut self) -> FileResult<Vec<T>> {
        let len = self.read_pod::<u64>()?;
        let mut items = Vec::new();
        for _ in 0..len {
            items.push(T::load(self)?);
        }
        Ok(items)
    }

    fn write_version(&mut self) -> FileResult<()> {
        self.write_pod(&VERSION_MAJOR)?;
        self.write_pod(&VERSION_MINOR)?;
        self.write_pod(&VERSION_PATCH)
    }

    fn read_and_check_version(&mut self, mode: Mode) -> FileResult<()> {
        let major: u32 = self.read_pod()?;
        let minor: u32 = self.read_pod()?;
        let patch: u32 = self.read_pod()?;

        let path = self.path.as_path();
        let mismatch = |field: &'static str, got: u32, expected: u32| -> FileResult<()> {
            if mode.contains(Mode::VERSIONED_WARNING) {
                warn!(
                    field,
                    got,
                    expected,
                    path = %path.display(),
                    "version mismatch"
                );
                Ok(())
            } else {
                Err(FileError::VersionMismatch {
                    field,
                    got,
                    expected,
                })
            }
        };

        let requires_major = mode.intersects(Mode::VERSIONED_EXACT | Mode::VERSIONED_MAJOR);
        if requires_major && major != VERSION_MAJOR {
            mismatch("major", major, VERSION_MAJOR)?;
        }
        if minor != VERSION_MINOR {
            mismatch("minor", minor, VERSION_MINOR)?;
        }
        if patch != VERSION_PATCH {
            mismatch("patch", patch, VERSION_PATCH)?;
        }
        Ok(())
    }

    fn read_error(err: io::Error) -> FileError {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            FileError::Truncated(err)
        } else {
            FileError::Io(err)
        }
    }
}
