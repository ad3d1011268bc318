use std::cmp;
use std::ops;

use super::IoBuf;

/// An owned view into a contiguous sequence of bytes.
///
/// This is similar to Rust slices (`&buf[..]`) but owns the underlying buffer,
/// so the view itself can be handed to an I/O call.
///
/// Slices are created using [`IoBuf::slice`].
pub struct Slice<T> {
    buf: T,
    begin: usize,
    end: usize,
}

impl<T: IoBuf> Slice<T> {
    pub(crate) fn new(buf: T, begin: usize, end: usize) -> Slice<T> {
        assert!(end <= buf.bytes_init());
        assert!(begin <= end);
        Slice { buf, begin, end }
    }
}

impl<T> Slice<T> {
    /// Offset in the underlying buffer at which this slice starts.
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// Offset in the underlying buffer at which this slice ends.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Gets a reference to the underlying buffer.
    ///
    /// This method escapes the slice's view.
    pub fn get_ref(&self) -> &T {
        &self.buf
    }

    /// Unwraps this `Slice`, returning the underlying buffer.
    pub fn into_inner(self) -> T {
        self.buf
    }
}

impl<T: IoBuf> ops::Deref for Slice<T> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        let buf_bytes = super::deref(&self.buf);
        let end = cmp::min(self.end, buf_bytes.len());
        &buf_bytes[self.begin..end]
    }
}

unsafe impl<T: IoBuf> IoBuf for Slice<T> {
    fn read_ptr(&self) -> *const u8 {
        super::deref(&self.buf)[self.begin..].as_ptr()
    }

    fn bytes_init(&self) -> usize {
        ops::Deref::deref(self).len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn narrows_a_vec() {
        let slice = b"hello world".to_vec().slice(6..11);
        assert_eq!(&slice[..], b"world");
        assert_eq!(slice.begin(), 6);
        assert_eq!(slice.end(), 11);
        assert_eq!(slice.bytes_init(), 5);
        assert_eq!(slice.into_inner(), b"hello world".to_vec());
    }

    #[test]
    fn open_range_covers_the_rest() {
        let slice = b"hello world".to_vec().slice(6..);
        assert_eq!(&slice[..], b"world");
    }

    #[test]
    #[should_panic]
    fn rejects_out_of_range() {
        let _ = b"short".to_vec().slice(2..9);
    }
}
