//! Byte View Module
//!
//! Immutable byte payload handed out to callers of `Group::get`.

use std::fmt;

use bytes::Bytes;

use crate::cache::ByteSize;

// == Byte View ==
/// Read-only view over a cached payload.
///
/// Cloning is cheap (the buffer is reference counted) and there is no way to
/// obtain a mutable handle to the cached bytes: `byte_slice` returns a copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    /// Wraps an existing buffer.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Number of payload bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns an owned copy of the payload.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Returns the shared immutable buffer, used to build response bodies
    /// without copying.
    pub fn to_bytes(&self) -> Bytes {
        self.bytes.clone()
    }
}

impl fmt::Display for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::new(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl ByteSize for ByteView {
    fn byte_len(&self) -> usize {
        self.len()
    }
}
