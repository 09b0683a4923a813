//! Versioned binary file I/O.
//!
//! Graphs and their decorations are stored in a little-endian binary format
//! behind an optional version header. The [`Persist`] trait is the
//! composition seam: a decorated graph stores its base first, then its own
//! decoration array.

pub mod file;

pub use file::{File, FileError, FileResult, Mode, Persist, Pod};
