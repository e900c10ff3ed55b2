//! Byte sources and slices.
//!
//! The engine never performs I/O of its own. A [`ByteStream`] is the
//! collaborator that owns the underlying bytes; [`Source`] is the handle the
//! parse state carries: such a stream, an in-memory byte buffer for
//! constants, or the window of a value's bytes that `Tie` parses over.

use std::fmt;
use std::sync::Arc;

/// Random-access, read-only byte provider.
pub trait ByteStream: Send + Sync {
    /// The `length` bytes starting at `offset`, or `None` if any of them is
    /// past the end of the stream.
    fn read(&self, offset: u64, length: u64) -> Option<Vec<u8>>;

    /// Returns `true` if `length` bytes starting at `offset` exist.
    fn is_available(&self, offset: u64, length: u64) -> bool;
}

/// A [`ByteStream`] over an owned buffer.
#[derive(Clone, Debug, Default)]
pub struct InMemoryByteStream {
    data: Arc<[u8]>,
}

impl InMemoryByteStream {
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        InMemoryByteStream { data: data.into() }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ByteStream for InMemoryByteStream {
    fn read(&self, offset: u64, length: u64) -> Option<Vec<u8>> {
        byte_range(&self.data, offset, length).map(<[u8]>::to_vec)
    }

    fn is_available(&self, offset: u64, length: u64) -> bool {
        byte_range(&self.data, offset, length).is_some()
    }
}

fn byte_range(data: &[u8], offset: u64, length: u64) -> Option<&[u8]> {
    let start = usize::try_from(offset).ok()?;
    let end = start.checked_add(usize::try_from(length).ok()?)?;
    data.get(start..end)
}

/// Where a slice's bytes come from.
#[derive(Clone)]
pub enum Source {
    Stream(Arc<dyn ByteStream>),
    /// An in-memory buffer.
    Bytes(Arc<[u8]>),
    /// The bytes of one parsed value, re-parsed by `Tie`. Two windows are the
    /// same source only if they share the value's buffer, so equal bytes read
    /// at different places stay apart.
    Window(Arc<[u8]>),
}

impl Source {
    pub fn stream(stream: impl ByteStream + 'static) -> Self {
        Source::Stream(Arc::new(stream))
    }

    pub fn bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Source::Bytes(bytes.into())
    }

    /// The window over `slice`'s bytes.
    pub fn window(slice: &Slice) -> Self {
        Source::Window(slice.shared_bytes())
    }

    /// Read `length` bytes at `offset`. Fails (rather than errors) when the
    /// range extends past the end of the source.
    pub fn slice(&self, offset: u64, length: u64) -> Option<Slice> {
        let bytes: Arc<[u8]> = match self {
            Source::Stream(stream) => stream.read(offset, length)?.into(),
            Source::Bytes(data) | Source::Window(data) => byte_range(data, offset, length)?.into(),
        };
        Some(Slice {
            source: self.clone(),
            offset,
            bytes,
        })
    }

    pub fn is_available(&self, offset: u64, length: u64) -> bool {
        match self {
            Source::Stream(stream) => stream.is_available(offset, length),
            Source::Bytes(data) | Source::Window(data) => byte_range(data, offset, length).is_some(),
        }
    }
}

impl PartialEq for Source {
    /// Streams and windows compare by identity, buffers by content.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Source::Stream(a), Source::Stream(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Source::Bytes(a), Source::Bytes(b)) => a == b,
            (Source::Window(a), Source::Window(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for Source {}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stream(_) => f.write_str("Stream"),
            Source::Bytes(data) => write!(f, "Bytes({})", data.len()),
            Source::Window(data) => write!(f, "Window({})", data.len()),
        }
    }
}

/// An immutable byte range read from a [`Source`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slice {
    source: Source,
    offset: u64,
    bytes: Arc<[u8]>,
}

impl Slice {
    /// A slice over a standalone buffer, at offset 0.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Slice {
            source: Source::Bytes(Arc::clone(&bytes)),
            offset: 0,
            bytes,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }
}
